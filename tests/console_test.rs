//! Console loop integration tests
//! Run with: cargo test --test console_test

mod common;

use async_trait::async_trait;
use tokio::io::BufReader;

use common::Harness;
use robyul_bot::application::errors::PluginError;
use robyul_bot::application::messaging::{EventParser, InvocationContext};
use robyul_bot::infrastructure::adapters::console::ConsoleAdapter;
use robyul_bot::infrastructure::config::ConsoleConfig;
use robyul_bot::plugins::CommandPlugin;

struct Echo;

#[async_trait]
impl CommandPlugin for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn commands(&self) -> &[&str] {
        &["echo"]
    }

    async fn action(&self, ctx: InvocationContext) -> Result<(), PluginError> {
        ctx.reply(&ctx.content).await?;
        Ok(())
    }
}

fn harness() -> Harness {
    Harness::new(|b| {
        b.register_command(Echo).unwrap();
    })
}

#[tokio::test]
async fn test_pump_dispatches_until_eof() {
    let h = harness();
    let adapter = ConsoleAdapter::new(ConsoleConfig::default());
    let parser = EventParser::new("_", "1");

    let input: &[u8] = b"_echo one\n\nnot a command\n_echo two\n";
    let scheduled = adapter
        .pump(BufReader::new(input), &parser, &h.dispatcher, std::future::pending())
        .await;
    h.drain().await;

    assert_eq!(scheduled, 2);
    let mut texts = h.gateway.texts();
    texts.sort();
    assert_eq!(texts, vec!["one", "two"]);
}

#[tokio::test]
async fn test_read_error_ends_pump_and_work_still_drains() {
    let h = harness();
    let adapter = ConsoleAdapter::new(ConsoleConfig::default());
    let parser = EventParser::new("_", "1");

    // invalid UTF-8 on the second line fails the read
    let input: &[u8] = b"_echo first\n\xff\xfe\n_echo never\n";
    let scheduled = adapter
        .pump(BufReader::new(input), &parser, &h.dispatcher, std::future::pending())
        .await;
    h.drain().await;

    assert_eq!(scheduled, 1);
    assert_eq!(h.gateway.texts(), vec!["first"]);
}

#[tokio::test]
async fn test_shutdown_signal_stops_pump() {
    let h = harness();
    let adapter = ConsoleAdapter::new(ConsoleConfig::default());
    let parser = EventParser::new("_", "1");

    let (_tx, rx) = tokio::io::duplex(64);
    let scheduled = adapter
        .pump(BufReader::new(rx), &parser, &h.dispatcher, async {})
        .await;

    assert_eq!(scheduled, 0);
}
