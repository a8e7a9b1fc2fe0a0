use transport::{DeviceId, SwitchState};

use crate::connectivity::Network;

/// Everything the panel reacts to. Events are handled one at a time, each to
/// completion, by [`crate::panel::run`].
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Connect,
    Retry { generation: u64 },
    ConnectSucceeded { attempt: u64 },
    ConnectFailed { attempt: u64, reason: String },
    ConnectionLost { code: i32, reason: String },
    Message { topic: String, payload: Vec<u8> },
    Network(Network),
    Toggle { device: DeviceId, state: SwitchState },
    Shutdown,
}
