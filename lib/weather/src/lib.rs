mod client;
mod error;

pub use client::{Client, Location, Weather};
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
