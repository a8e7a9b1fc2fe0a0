use std::fmt;
use std::str::FromStr;

use serde::de::{value, Error};

use crate::{DeviceId, LIVENESS_CHANNEL};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Online,
    Device(DeviceId),
}

/// `{token}/{channel}`. Anything after the channel segment is ignored when
/// parsing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Topic {
    pub token: String,
    pub channel: Channel,
}

impl Topic {
    pub fn online(token: impl Into<String>) -> Topic {
        Topic {
            token: token.into(),
            channel: Channel::Online,
        }
    }

    pub fn device(token: impl Into<String>, device_id: DeviceId) -> Topic {
        Topic {
            token: token.into(),
            channel: Channel::Device(device_id),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Channel::Online => f.write_str(LIVENESS_CHANNEL),
            Channel::Device(device_id) => write!(f, "{}", device_id),
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.token, self.channel)
    }
}

impl FromStr for Topic {
    type Err = value::Error;

    fn from_str(s: &str) -> std::result::Result<Topic, Self::Err> {
        const ERROR_MSG: &str = "supported topics are <token>/online and <token>/<pin>";

        let mut split = s.split('/');

        let token = split
            .next()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| value::Error::custom(ERROR_MSG))?;

        let channel = split
            .next()
            .ok_or_else(|| value::Error::custom(ERROR_MSG))?;

        let channel = if channel == LIVENESS_CHANNEL {
            Channel::Online
        } else {
            Channel::Device(DeviceId::from_str(channel)?)
        };

        Ok(Topic {
            token: token.to_string(),
            channel,
        })
    }
}
