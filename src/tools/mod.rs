//! Collaborators and local tools used by actions

pub mod calc;
mod desktop;
mod files;
mod notes;
pub mod password;
pub mod units;
pub mod web;

pub use desktop::{CommandDesktop, Desktop, NoDesktop, SystemInfo};
pub use files::{FileManager, MAX_SEARCH_RESULTS};
pub use notes::{NotesFile, TodoList};
pub use web::{Encyclopedia, OpenWeatherMap, WeatherProvider, WeatherReport, Wikipedia};
