use log::{error, info};
use tokio::time::{interval, MissedTickBehavior};
use weather::{Client, Location, Weather};

use crate::config::WeatherConfig;
use crate::Result;

/// Logs the weather for the configured location, once right away and then
/// every `config.interval`. Failed lookups are logged and retried on the
/// next tick.
pub async fn watch_weather(config: WeatherConfig) -> Result<()> {
    let client = Client::new(&config.url)?;

    let mut timer = interval(config.interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        timer.tick().await;

        match client.fetch(&config.location).await {
            Ok(weather) => info!("{}", describe(&config.location, &weather)),
            Err(err) => error!("Error fetching weather: {}", err),
        }
    }
}

fn describe(location: &Location, weather: &Weather) -> String {
    let place = if location.city.is_empty() {
        "here"
    } else {
        location.city.as_str()
    };

    format!(
        "weather in {place}: {}°C, wind {}, {}",
        weather.temperature, weather.wind_speed, weather.description
    )
}
