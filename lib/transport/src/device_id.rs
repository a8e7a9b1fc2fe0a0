use std::fmt;
use std::str::FromStr;

use serde::de::{value, Error, Unexpected};

use crate::LIVENESS_CHANNEL;

/// Name of a pin on the board, e.g. `D1`. Used verbatim as the last topic
/// segment, so it can't contain `/` or MQTT wildcards and can't collide with
/// the liveness channel.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DeviceId {
    type Err = value::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const EXPECTED: &str = "a non-empty pin name without '/', '+' or '#'";

        let s = s.trim();

        if s.is_empty() || s.contains(['/', '+', '#']) {
            return Err(value::Error::invalid_value(Unexpected::Str(s), &EXPECTED));
        }

        if s == LIVENESS_CHANNEL {
            return Err(value::Error::custom(format!(
                "`{LIVENESS_CHANNEL}` is reserved for the liveness channel"
            )));
        }

        Ok(DeviceId(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(DeviceId::from_str("D1").unwrap().as_str(), "D1");
        assert_eq!(DeviceId::from_str(" D5 ").unwrap().as_str(), "D5");

        assert!(DeviceId::from_str("").is_err());
        assert!(DeviceId::from_str("D1/state").is_err());
        assert!(DeviceId::from_str("#").is_err());
        assert!(DeviceId::from_str("online").is_err());
    }
}
