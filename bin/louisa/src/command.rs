use std::fmt;

use log::debug;
use transport::{DeviceId, QoS, SwitchState, Topic};

use crate::capability::Transport;
use crate::connectivity::Network;
use crate::storage::{DeviceKind, Storage};

/// Publish request for one switch.
#[derive(Clone, Debug, PartialEq)]
pub struct Command {
    pub topic: Topic,
    pub state: SwitchState,
    pub qos: QoS,
    pub retain: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Rejection {
    NoNetwork,
    UnknownDevice(DeviceId),
    NotASwitch(DeviceId),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoNetwork => write!(f, "no network"),
            Self::UnknownDevice(id) => write!(f, "unknown device {id}"),
            Self::NotASwitch(id) => write!(f, "{id} is not a switch"),
        }
    }
}

/// Turns toggles into publishes. The store is left alone: the new state shows
/// up once the broker echoes the command back on the same channel.
pub struct Emitter {
    token: String,
    qos: QoS,
    retain: bool,
}

impl Emitter {
    pub fn new(token: String, qos: QoS, retain: bool) -> Emitter {
        Emitter { token, qos, retain }
    }

    pub fn submit(
        &self,
        network: Network,
        storage: &Storage,
        device: &DeviceId,
        state: SwitchState,
        transport: &impl Transport,
    ) -> Result<Command, Rejection> {
        if network == Network::Unavailable {
            return Err(Rejection::NoNetwork);
        }

        match storage.get(device) {
            Some(known) if known.kind == DeviceKind::Switch => (),
            Some(_) => return Err(Rejection::NotASwitch(device.clone())),
            None => return Err(Rejection::UnknownDevice(device.clone())),
        }

        let command = Command {
            topic: Topic::device(self.token.clone(), device.clone()),
            state,
            qos: self.qos,
            retain: self.retain,
        };

        debug!("publish to {}: {}", command.topic, state.payload());
        transport.publish(&command);

        Ok(command)
    }
}
