use chipp_http::{HttpClient, HttpMethod, NoInterceptor};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Placeholder the backend puts into every field when it couldn't scrape
/// the forecast.
const MISSING: &str = "NIL";

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct Location {
    pub city: String,
    pub state: String,
    pub pincode: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Weather {
    pub temperature: String,
    pub wind_speed: String,
    pub description: String,
    pub icon_url: Option<String>,
}

#[derive(Deserialize)]
struct ResponseBody {
    weather_data: WeatherData,
}

#[derive(Deserialize)]
struct WeatherData {
    #[serde(default)]
    tmp: String,
    #[serde(default)]
    ws: String,
    #[serde(default)]
    dc: String,
    #[serde(default)]
    img_src: Option<String>,
}

impl TryFrom<WeatherData> for Weather {
    type Error = Error;

    fn try_from(data: WeatherData) -> Result<Weather> {
        if data.dc == MISSING {
            return Err(Error::Unavailable(data.tmp));
        }

        Ok(Weather {
            temperature: data.tmp,
            wind_speed: data.ws,
            description: data.dc,
            icon_url: data.img_src.filter(|src| !src.is_empty()),
        })
    }
}

pub struct Client {
    http_client: HttpClient<NoInterceptor>,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Client> {
        let http_client = HttpClient::new(base_url)?;
        Ok(Client { http_client })
    }

    /// One-shot lookup. Callers decide when to ask again.
    pub async fn fetch(&self, location: &Location) -> Result<Weather> {
        debug!(
            "requesting weather for {}, {}, {}",
            location.city, location.state, location.pincode
        );

        let mut request = self.http_client.new_request(["get_weather"]);
        request.set_json_body(location);
        request.set_method(HttpMethod::Post);

        let body: ResponseBody = self
            .http_client
            .perform_request(request, chipp_http::json::parse_json)
            .await?;

        trace!("weather response: {}", body.weather_data.dc);

        Weather::try_from(body.weather_data)
    }
}
