use std::time::Duration;

use crate::command::Command;
use crate::event::Event;

use transport::QoS;

/// The broker connection as seen by the panel. Calls return immediately;
/// outcomes come back later through the event queue.
pub trait Transport {
    /// Starts a handshake. Its outcome is reported as
    /// [`Event::ConnectSucceeded`] or [`Event::ConnectFailed`] carrying the
    /// same `attempt`.
    fn connect(&self, attempt: u64);
    fn subscribe(&self, topics: &[String], qos: QoS);
    fn publish(&self, command: &Command);
    fn disconnect(&self);
}

pub trait Scheduler {
    /// Delivers `event` to the queue after `delay`.
    fn schedule(&self, delay: Duration, event: Event);
}
