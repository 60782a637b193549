use async_trait::async_trait;
use rand::seq::IndexedRandom;

use crate::application::errors::PluginError;
use crate::application::messaging::InvocationContext;
use crate::plugins::CommandPlugin;

/// `_choose pizza | pasta | salad`
pub struct Choice;

/// Non-empty, trimmed `|`-separated options
pub fn options(content: &str) -> Vec<&str> {
    content
        .split('|')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .collect()
}

fn pick(content: &str) -> Option<String> {
    options(content).choose(&mut rand::rng()).map(|o| o.to_string())
}

#[async_trait]
impl CommandPlugin for Choice {
    fn name(&self) -> &str {
        "choice"
    }

    fn commands(&self) -> &[&str] {
        &["choice", "choose"]
    }

    async fn action(&self, ctx: InvocationContext) -> Result<(), PluginError> {
        let text = match pick(&ctx.content) {
            Some(option) => format!("I've chosen **{}**", option),
            None => ctx.text("plugins.choice.empty"),
        };
        ctx.reply(&text).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_trim_and_skip_empty() {
        assert_eq!(options(" pizza |pasta||  salad "), vec!["pizza", "pasta", "salad"]);
        assert!(options("  | ").is_empty());
    }
}
