//! Isolated invoker - runs each handler as its own supervised task.
//!
//! A handler's error or panic ends at this boundary. Handled errors are
//! dropped silently; everything else is reported once to the originating
//! channel and once to the telemetry sink.

use futures::FutureExt;
use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Once};
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;

use super::context::Origin;
use super::messenger::Messenger;
use crate::application::errors::PluginError;
use crate::domain::traits::{ErrorReport, TelemetrySink};
use crate::infrastructure::i18n::Texts;

thread_local! {
    /// Stack of the most recent panic on this thread, recorded by the hook
    static PANIC_TRACE: RefCell<Option<String>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Chain a hook that records the panicking thread's stack before the
/// previous hook runs. Unwinding happens on the polling thread, so the
/// invoker can pick the trace up right after `catch_unwind`.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let trace = Backtrace::force_capture().to_string();
            PANIC_TRACE.with(|slot| *slot.borrow_mut() = Some(trace));
            previous(info);
        }));
    });
}

fn take_panic_trace() -> Option<String> {
    PANIC_TRACE.with(|slot| slot.borrow_mut().take())
}

/// How an invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Handled,
    Failed,
}

#[derive(Clone)]
pub struct Invoker {
    tracker: TaskTracker,
    messenger: Messenger,
    telemetry: Arc<dyn TelemetrySink>,
    texts: Arc<Texts>,
    debug: bool,
}

impl Invoker {
    pub fn new(messenger: Messenger, telemetry: Arc<dyn TelemetrySink>, texts: Arc<Texts>, debug: bool) -> Self {
        if debug {
            install_panic_hook();
        }
        Self {
            tracker: TaskTracker::new(),
            messenger,
            telemetry,
            texts,
            debug,
        }
    }

    /// Start `job` as an independent task; never waits for it
    pub fn spawn<F>(&self, origin: Origin, job: F) -> JoinHandle<Outcome>
    where
        F: Future<Output = Result<(), PluginError>> + Send + 'static,
    {
        let this = self.clone();
        self.tracker.spawn(async move { this.run(&origin, job).await })
    }

    /// Run `job` to completion inside the failure boundary
    pub async fn run<F>(&self, origin: &Origin, job: F) -> Outcome
    where
        F: Future<Output = Result<(), PluginError>>,
    {
        let mut trace = None;
        let result = match AssertUnwindSafe(job).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                trace = take_panic_trace();
                Err(PluginError::Panicked(panic_message(panic)))
            }
        };

        match result {
            Ok(()) => Outcome::Completed,
            Err(PluginError::Handled) => {
                tracing::debug!(
                    "[{}] {} ended with a handled error",
                    origin.message.channel_id,
                    origin.handler
                );
                Outcome::Handled
            }
            Err(err) => {
                self.report(origin, &err, trace.as_deref()).await;
                Outcome::Failed
            }
        }
    }

    /// Invocations started and not yet finished
    pub fn outstanding(&self) -> usize {
        self.tracker.len()
    }

    /// Stop accepting work and wait for running invocations to finish
    pub async fn shutdown(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }

    /// User-facing diagnostic for an unexpected failure.
    ///
    /// Debug mode shows the error structure, plus the stack recorded at the
    /// panic site when the handler panicked. Returned errors carry no stack.
    pub fn format_error(&self, err: &PluginError, trace: Option<&str>) -> String {
        let detail = if self.debug {
            match trace {
                Some(trace) => format!("{:#?}\n{}", err, trace),
                None => format!("{:#?}", err),
            }
        } else {
            match err {
                PluginError::Gateway(e) => e.rest_message().map(str::to_string).unwrap_or_else(|| e.to_string()),
                other => other.to_string(),
            }
        };
        format!("{}\n```\n{}\n```", self.texts.get("bot.errors.header"), detail)
    }

    async fn report(&self, origin: &Origin, err: &PluginError, trace: Option<&str>) {
        let message = &origin.message;
        tracing::error!(
            invocation = %origin.invocation_id,
            handler = %origin.handler,
            "[{}] handler failed: {}",
            message.channel_id,
            err
        );

        let reply = self.format_error(err, trace);
        if let Err(e) = self.messenger.send_message(&message.channel_id, &reply).await {
            tracing::warn!("[{}] could not deliver error message: {}", message.channel_id, e);
        }

        let tags = BTreeMap::from([
            ("ChannelID".to_string(), message.channel_id.clone()),
            ("Content".to_string(), message.content.clone()),
            ("Timestamp".to_string(), message.timestamp.to_rfc3339()),
            ("TTS".to_string(), message.tts.to_string()),
            ("MentionEveryone".to_string(), message.mention_everyone.to_string()),
            ("IsBot".to_string(), message.author.is_bot.to_string()),
            ("Handler".to_string(), origin.handler.clone()),
            ("InvocationID".to_string(), origin.invocation_id.clone()),
        ]);

        self.telemetry.capture(ErrorReport {
            error: err.to_string(),
            user_id: message.author.id.clone(),
            username: message.author.display_name(),
            tags,
        });
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
