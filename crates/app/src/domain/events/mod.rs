//! Order events
//!
//! Status transitions are handed to an in-process queue. A single background
//! worker writes the audit record and then sends the shopper notification.
//! Both steps are best effort: each runs at most once, and a failure is
//! logged and dropped so it never reaches the request that caused it.

mod dispatcher;
mod models;
mod notifier;
mod recorder;

pub use dispatcher::OrderEventsDispatcher;
pub use models::OrderEvent;
pub use notifier::*;
pub use recorder::*;
