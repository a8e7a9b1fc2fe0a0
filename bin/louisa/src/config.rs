use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use transport::{DeviceId, QoS};
use weather::Location;

use crate::storage::{DeviceKind, DeviceSpec};

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(var) => write!(f, "set ENV variable {var}"),
            Self::Invalid(var, value) => write!(f, "invalid value of {var}: {value:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug, PartialEq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BrokerConfig {
    pub address: String,
    pub port: u16,
    pub base_path: String,
    pub use_ssl: bool,
    pub use_websocket: bool,
    pub clean_session: bool,
    pub keep_alive: Duration,
    pub credentials: Option<Credentials>,
}

impl BrokerConfig {
    pub fn server_uri(&self) -> String {
        let scheme = match (self.use_websocket, self.use_ssl) {
            (true, true) => "wss",
            (true, false) => "ws",
            (false, true) => "ssl",
            (false, false) => "tcp",
        };

        let path = if self.use_websocket {
            self.base_path.as_str()
        } else {
            ""
        };

        format!("{scheme}://{}:{}{path}", self.address, self.port)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProbeConfig {
    pub address: String,
    pub interval: Duration,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeatherConfig {
    pub url: String,
    pub interval: Duration,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub broker: BrokerConfig,
    pub token: String,
    pub user_name: String,
    pub devices: Vec<DeviceSpec>,
    pub qos: QoS,
    pub retained: bool,
    pub reconnect_timeout: Duration,
    pub probe: ProbeConfig,
    pub weather: Option<WeatherConfig>,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let credentials = if env.flag("USE_CREDS", false)? {
            Some(Credentials {
                user: env.required("MQTT_USER")?,
                password: env.required("MQTT_PASS")?,
            })
        } else {
            None
        };

        let broker = BrokerConfig {
            address: env.required("BROKER_ADDRESS")?,
            port: env.parsed("BROKER_PORT", 8081)?,
            base_path: env.or("BROKER_BASEPATH", ""),
            use_ssl: env.flag("BROKER_USE_SSL", false)?,
            use_websocket: env.flag("BROKER_USE_WEBSOCKET", true)?,
            clean_session: env.flag("CLEAN_SESSION", true)?,
            keep_alive: Duration::from_secs(env.parsed("KEEP_ALIVE", 30)?),
            credentials,
        };

        let reconnect_timeout = Duration::from_millis(env.non_zero("RECONNECT_TIMEOUT", 5000)?);

        let probe = ProbeConfig {
            address: env.or("PROBE_ADDRESS", "1.1.1.1:53"),
            interval: Duration::from_secs(env.non_zero("PROBE_INTERVAL", 5)?),
        };

        let weather = match env.optional("WEATHER_URL") {
            Some(url) => Some(WeatherConfig {
                url,
                interval: Duration::from_secs(env.non_zero("WEATHER_INTERVAL", 3600)?),
                location: Location {
                    city: env.or("CITY", ""),
                    state: env.or("STATE", ""),
                    pincode: env.or("PINCODE", ""),
                },
            }),
            None => None,
        };

        Ok(Config {
            broker,
            token: env.required("TOKEN")?,
            user_name: env.or("USER_NAME", "user"),
            devices: devices(&env)?,
            qos: env.parsed("QOS", QoS::AtLeastOnce)?,
            retained: env.flag("RETAINED", true)?,
            reconnect_timeout,
            probe,
            weather,
        })
    }
}

fn devices<F>(env: &Env<F>) -> Result<Vec<DeviceSpec>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let pins = env.or("PINS", "D1,D2,D3,D4");
    let ids = pins
        .split(',')
        .map(DeviceId::from_str)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ConfigError::Invalid("PINS", pins.clone()))?;

    if ids
        .iter()
        .enumerate()
        .any(|(index, id)| ids[..index].contains(id))
    {
        return Err(ConfigError::Invalid("PINS", pins));
    }

    let names = env.optional("SWITCH_NAME").unwrap_or_else(|| pins.clone());
    let names: Vec<&str> = names.split(',').map(str::trim).collect();
    if names.len() > ids.len() {
        return Err(ConfigError::Invalid("SWITCH_NAME", names.join(",")));
    }

    let sensor = env.or("SENSOR_PIN", "D5");

    Ok(ids
        .into_iter()
        .enumerate()
        .map(|(index, id)| DeviceSpec {
            name: names
                .get(index)
                .filter(|name| !name.is_empty())
                .map(|name| name.to_string())
                .unwrap_or_else(|| id.to_string()),
            kind: if id.as_str() == sensor {
                DeviceKind::Sensor
            } else {
                DeviceKind::Switch
            },
            id,
        })
        .collect())
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, var: &'static str) -> Option<String> {
        (self.0)(var).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, var: &'static str) -> Result<String, ConfigError> {
        self.optional(var).ok_or(ConfigError::Missing(var))
    }

    fn or(&self, var: &'static str, default: &str) -> String {
        self.optional(var).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T: FromStr>(&self, var: &'static str, default: T) -> Result<T, ConfigError> {
        match self.optional(var) {
            Some(value) => {
                let parsed = value.trim().parse();
                parsed.map_err(|_| ConfigError::Invalid(var, value))
            }
            None => Ok(default),
        }
    }

    /// Timers and intervals can't run with a zero period.
    fn non_zero(&self, var: &'static str, default: u64) -> Result<u64, ConfigError> {
        match self.parsed(var, default)? {
            0 => Err(ConfigError::Invalid(var, "0".to_string())),
            value => Ok(value),
        }
    }

    fn flag(&self, var: &'static str, default: bool) -> Result<bool, ConfigError> {
        match self.optional(var) {
            Some(value) => {
                let normalized = value.trim().to_ascii_lowercase();
                match normalized.as_str() {
                    "true" | "1" => Ok(true),
                    "false" | "0" => Ok(false),
                    _ => Err(ConfigError::Invalid(var, value)),
                }
            }
            None => Ok(default),
        }
    }
}
