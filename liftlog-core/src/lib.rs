pub mod catalog;
pub mod clock;
pub mod db;
pub mod error;
pub mod identity;
pub mod logging;
pub mod seed;
#[cfg(test)]
mod testing;
pub mod workout;

pub use error::{LiftlogError, Result};
