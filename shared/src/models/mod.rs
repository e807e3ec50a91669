//! Domain models for the Farm Records platform

mod crop;
mod forecast;
mod planting;
mod user;

pub use crop::*;
pub use forecast::*;
pub use planting::*;
pub use user::*;
