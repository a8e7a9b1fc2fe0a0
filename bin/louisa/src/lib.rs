mod capability;
mod command;
mod config;
mod connectivity;
mod error;
mod event;
mod forecast;
mod input;
mod mqtt;
mod network;
mod panel;
mod presenter;
mod session;
mod storage;
mod timer;

#[cfg(test)]
mod testing;

pub use capability::{Scheduler, Transport};
pub use command::{Command, Emitter, Rejection};
pub use config::{BrokerConfig, Config, ConfigError, Credentials, ProbeConfig, WeatherConfig};
pub use connectivity::{ConnectivityStatus, Controls, Network};
pub use error::Error;
pub use event::Event;
pub use forecast::watch_weather;
pub use input::{parse_line, read_commands, Input, InputError};
pub use mqtt::MqttTransport;
pub use network::watch_network;
pub use panel::{run, Outcome, Panel};
pub use presenter::{LogPresenter, Presenter, Snapshot};
pub use session::{Session, SessionManager, SessionState, CLEAN_DISCONNECT};
pub use storage::{Applied, Device, DeviceKind, DeviceSpec, DeviceValue, Storage};
pub use timer::TimerScheduler;

pub type Result<T> = std::result::Result<T, Error>;
