#[derive(Debug)]
pub enum Error {
    UrlParse(chipp_http::UrlParseError),
    Http(chipp_http::Error),
    Unavailable(String),
}

impl From<chipp_http::UrlParseError> for Error {
    fn from(err: chipp_http::UrlParseError) -> Self {
        Self::UrlParse(err)
    }
}

impl From<chipp_http::Error> for Error {
    fn from(err: chipp_http::Error) -> Self {
        Self::Http(err)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::UrlParse(err) => write!(f, "URL parse error: {err}"),
            Self::Http(err) => write!(f, "HTTP error: {err}"),
            Self::Unavailable(reason) => write!(f, "weather unavailable: {reason}"),
        }
    }
}

impl std::error::Error for Error {}
