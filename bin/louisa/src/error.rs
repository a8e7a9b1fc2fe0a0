use std::fmt;

use crate::config::ConfigError;

#[derive(Debug)]
pub enum Error {
    Config(ConfigError),
    Mqtt(paho_mqtt::Error),
    Io(std::io::Error),
    Weather(weather::Error),
    QueueClosed,
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<paho_mqtt::Error> for Error {
    fn from(err: paho_mqtt::Error) -> Self {
        Self::Mqtt(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<weather::Error> for Error {
    fn from(err: weather::Error) -> Self {
        Self::Weather(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "config error: {err}"),
            Self::Mqtt(err) => write!(f, "mqtt error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Weather(err) => write!(f, "weather error: {err}"),
            Self::QueueClosed => write!(f, "event queue closed"),
        }
    }
}

impl std::error::Error for Error {}
