//! Shared types, models and the yield forecasting engine for the Farm Records platform
//!
//! This crate contains types shared between the backend, the browser (via WASM),
//! and other components of the system. Nothing in it performs I/O.

pub mod forecast;
pub mod models;
pub mod types;
pub mod validation;

pub use forecast::*;
pub use models::*;
pub use types::*;
pub use validation::*;
