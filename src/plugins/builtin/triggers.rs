use rand::seq::IndexedRandom;

use crate::plugins::TriggerPlugin;

pub struct Hi;

impl TriggerPlugin for Hi {
    fn name(&self) -> &str {
        "hi"
    }

    fn triggers(&self) -> &[&str] {
        &["hi", "hey", "hello"]
    }

    fn response(&self, _trigger: &str, _content: &str) -> String {
        "Hi! :wave:".to_string()
    }
}

const EIGHT_BALL_ANSWERS: [&str; 10] = [
    "It is certain.",
    "Without a doubt.",
    "You may rely on it.",
    "Most likely.",
    "Signs point to yes.",
    "Reply hazy, try again.",
    "Ask again later.",
    "Don't count on it.",
    "My sources say no.",
    "Very doubtful.",
];

pub struct EightBall;

impl TriggerPlugin for EightBall {
    fn name(&self) -> &str {
        "8ball"
    }

    fn triggers(&self) -> &[&str] {
        &["8ball", "8"]
    }

    fn response(&self, _trigger: &str, content: &str) -> String {
        if content.is_empty() {
            return "Ask me a question first. :8ball:".to_string();
        }
        let answer = EIGHT_BALL_ANSWERS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(EIGHT_BALL_ANSWERS[0]);
        format!(":8ball: {}", answer)
    }
}
