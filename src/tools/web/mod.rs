//! Web collaborators: weather, encyclopedia and site lookup

mod encyclopedia;
pub mod sites;
mod weather;

pub use encyclopedia::{Encyclopedia, Wikipedia, first_sentences};
pub use weather::{OpenWeatherMap, WeatherProvider, WeatherReport};
