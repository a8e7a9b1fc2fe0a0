mod device_id;
pub use device_id::DeviceId;

mod topic;
pub use topic::{Channel, Topic};

use serde::{Deserialize, Serialize};
use str_derive::Str;

/// Channel the board publishes its own availability on.
pub const LIVENESS_CHANNEL: &str = "online";

const ON_PAYLOAD: &[u8] = b"1";

#[derive(Copy, Clone, Debug, Deserialize, Serialize, Str, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SwitchState {
    On,
    Off,
}

impl SwitchState {
    /// `"1"` is on, every other payload is off.
    pub fn from_payload(payload: &[u8]) -> SwitchState {
        if payload == ON_PAYLOAD {
            SwitchState::On
        } else {
            SwitchState::Off
        }
    }

    pub fn payload(self) -> &'static str {
        match self {
            SwitchState::On => "1",
            SwitchState::Off => "0",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Liveness {
    Live,
    Offline,
}

impl Liveness {
    pub fn from_payload(payload: &[u8]) -> Liveness {
        if payload == ON_PAYLOAD {
            Liveness::Live
        } else {
            Liveness::Offline
        }
    }
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize, Str, PartialEq, Eq, Hash)]
pub enum QoS {
    #[serde(rename = "0")]
    AtMostOnce,
    #[serde(rename = "1")]
    AtLeastOnce,
    #[serde(rename = "2")]
    ExactlyOnce,
}

impl From<QoS> for i32 {
    fn from(qos: QoS) -> i32 {
        match qos {
            QoS::AtMostOnce => 0,
            QoS::AtLeastOnce => 1,
            QoS::ExactlyOnce => 2,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Timestamp {
    Seconds(i64),
    Fractional(f64),
    Text(String),
}

/// Reading published by the temperature/humidity sensor pin.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct SensorReading {
    pub temperature: f32,
    pub humidity: f32,
    pub heat_index: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
}

impl SensorReading {
    pub fn from_payload(payload: &[u8]) -> serde_json::Result<SensorReading> {
        serde_json::from_slice(payload)
    }
}
