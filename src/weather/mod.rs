//! Weather lookup module.
//!
//! Thin wrapper around the OpenWeatherMap current-weather endpoint.
//! Every call is a fresh network round trip; there is no retry or
//! caching.

mod client;

pub use client::{OpenWeatherClient, WeatherError, WeatherProvider, WeatherReport};
