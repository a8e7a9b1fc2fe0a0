use log::info;

use crate::connectivity::{ConnectivityStatus, Controls};
use crate::session::SessionState;
use crate::storage::{Device, DeviceKind, DeviceValue};

/// What the panel hands out after every change.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub status: ConnectivityStatus,
    pub controls: Controls,
    pub session: SessionState,
    pub devices: Vec<Device>,
}

pub trait Presenter {
    fn render(&mut self, snapshot: &Snapshot);
}

/// Renders snapshots into the log, one line per device.
pub struct LogPresenter {
    user_name: String,
}

impl LogPresenter {
    pub fn new(user_name: String) -> LogPresenter {
        LogPresenter { user_name }
    }

    pub fn lines(&self, snapshot: &Snapshot) -> Vec<String> {
        let mut status = snapshot.status.describe(&self.user_name);
        if snapshot.session == SessionState::Connecting {
            status.push_str(" …");
        }

        let mut lines = vec![status];
        lines.extend(
            snapshot
                .devices
                .iter()
                .map(|device| describe_device(device, snapshot.controls)),
        );
        lines
    }
}

impl Presenter for LogPresenter {
    fn render(&mut self, snapshot: &Snapshot) {
        for line in self.lines(snapshot) {
            info!("{line}");
        }
    }
}

fn describe_device(device: &Device, controls: Controls) -> String {
    let value = match (&device.value, device.kind) {
        (Some(DeviceValue::Sensor(reading)), _) => {
            return format!(
                "{}: 🌡 {}°C, 💧 {}%, 🙎 {}°C",
                device.name, reading.temperature, reading.humidity, reading.heat_index
            );
        }
        (None, DeviceKind::Sensor) => return format!("{}: no reading yet", device.name),
        (Some(DeviceValue::Switch(state)), _) => state.to_string(),
        (None, DeviceKind::Switch) => "unknown".to_string(),
    };

    match controls {
        Controls::Enabled => format!("{}: {value}", device.name),
        Controls::Disabled => format!("{}: {value} (locked)", device.name),
    }
}
