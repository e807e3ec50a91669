//! HTTP request handlers

pub mod activity;
pub mod crop;
pub mod forecast;
pub mod health;

pub use activity::*;
pub use crop::*;
pub use forecast::*;
pub use health::*;
