//! Core library for the `cityweather` browser.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Clients for the two remote data sources (city catalog, weather)
//! - The city list controller (accumulation, filtering, pagination)
//! - The per-city weather detail presenter and the route table
//!
//! It is used by `cityweather-cli`, but can also be reused by other binaries or services.

pub mod catalog;
pub mod config;
pub mod detail;
pub mod error;
pub mod list;
pub mod model;
pub mod route;
pub mod weather;

pub use catalog::{CityCatalog, OpendatasoftCatalog, PAGE_SIZE};
pub use config::Config;
pub use detail::{ConditionClass, DetailState, WeatherDetail};
pub use error::FetchError;
pub use list::{COUNTRY_FILTER_CHOICES, CityListController, CityListSession, PageFetch};
pub use model::{CityRecord, Coordinates, UnitSystem, WeatherSnapshot};
pub use route::Route;
pub use weather::{OpenWeatherSource, WeatherSource};
