//! Business logic services

pub mod activity;
pub mod crop;
pub mod forecast;

pub use forecast::ForecastService;
