//! Utility modules

pub mod memory_source;
pub mod rounding;
pub mod validation;

pub use memory_source::*;
pub use rounding::*;
pub use validation::*;
