//! Outbound notifications
//!
//! Delivery is fire-and-forget: callers log dispatch failures and carry on.

pub mod dispatcher;

pub use dispatcher::{send_best_effort, DispatchError, LogDispatcher, Message, NotificationDispatcher};

#[cfg(test)]
pub use dispatcher::MockNotificationDispatcher;
