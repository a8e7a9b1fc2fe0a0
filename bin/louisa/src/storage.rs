use std::str::FromStr;

use log::{debug, error, info, trace};
use transport::{Channel, DeviceId, Liveness, SensorReading, SwitchState, Topic};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeviceKind {
    Switch,
    Sensor,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeviceSpec {
    pub id: DeviceId,
    pub name: String,
    pub kind: DeviceKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeviceValue {
    Switch(SwitchState),
    Sensor(SensorReading),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub kind: DeviceKind,
    /// `None` until the first retained or live message arrives.
    pub value: Option<DeviceValue>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Applied {
    Updated(DeviceId),
    Unchanged(DeviceId),
    Liveness(Liveness),
    Discarded(DeviceId),
    Ignored,
}

/// Mirror of the board as last reported by the broker.
pub struct Storage {
    token: String,
    devices: Vec<Device>,
}

impl Storage {
    pub fn new(token: String, specs: &[DeviceSpec]) -> Storage {
        let devices = specs
            .iter()
            .map(|spec| Device {
                id: spec.id.clone(),
                name: spec.name.clone(),
                kind: spec.kind,
                value: None,
            })
            .collect();

        Storage { token, devices }
    }

    /// The only way device values change. Liveness messages are not stored
    /// here, they are handed back to the caller.
    pub fn apply_inbound_message(&mut self, topic: &str, payload: &[u8]) -> Applied {
        let parsed = match Topic::from_str(topic) {
            Ok(parsed) => parsed,
            Err(err) => {
                trace!("ignored message on {topic}: {err}");
                return Applied::Ignored;
            }
        };

        if parsed.token != self.token {
            trace!("ignored message for foreign token on {topic}");
            return Applied::Ignored;
        }

        let id = match parsed.channel {
            Channel::Online => return Applied::Liveness(Liveness::from_payload(payload)),
            Channel::Device(id) => id,
        };

        let device = match self.devices.iter_mut().find(|device| device.id == id) {
            Some(device) => device,
            None => {
                trace!("ignored message for unknown device {id}");
                return Applied::Ignored;
            }
        };

        let value = match device.kind {
            DeviceKind::Switch => DeviceValue::Switch(SwitchState::from_payload(payload)),
            DeviceKind::Sensor => match SensorReading::from_payload(payload) {
                Ok(reading) => DeviceValue::Sensor(reading),
                Err(err) => {
                    error!("discarded malformed reading from {id}: {err}");
                    error!("{}", String::from_utf8_lossy(payload));
                    return Applied::Discarded(id);
                }
            },
        };

        if device.value.as_ref() == Some(&value) {
            trace!("{id} unchanged");
            return Applied::Unchanged(id);
        }

        match &value {
            DeviceValue::Switch(state) => info!("{} ({id}) is {state}", device.name),
            DeviceValue::Sensor(reading) => debug!("{} ({id}) reads {reading:?}", device.name),
        }

        device.value = Some(value);

        Applied::Updated(id)
    }

    pub fn get(&self, id: &DeviceId) -> Option<&Device> {
        self.devices.iter().find(|device| &device.id == id)
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn switch_state(&self, id: &DeviceId) -> Option<SwitchState> {
        match self.get(id)?.value {
            Some(DeviceValue::Switch(state)) => Some(state),
            _ => None,
        }
    }

    pub fn reading(&self, id: &DeviceId) -> Option<&SensorReading> {
        match &self.get(id)?.value {
            Some(DeviceValue::Sensor(reading)) => Some(reading),
            _ => None,
        }
    }

    pub fn channels(&self) -> impl Iterator<Item = Topic> + '_ {
        self.devices
            .iter()
            .map(|device| Topic::device(self.token.clone(), device.id.clone()))
    }
}
