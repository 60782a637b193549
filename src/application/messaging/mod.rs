//! Message handling - Event parsing, dispatch and isolated execution

pub mod context;
pub mod dispatcher;
pub mod invoker;
pub mod messenger;
pub mod pagify;
pub mod parser;

pub use context::{InvocationContext, Origin, Session};
pub use dispatcher::Dispatcher;
pub use invoker::{Invoker, Outcome};
pub use messenger::Messenger;
pub use pagify::{auto_pagify, pagify, PagifyError, MESSAGE_LIMIT};
pub use parser::{EventParser, InboundEvent};
