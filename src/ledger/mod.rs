//! Ledger module containing the category registry, posting engine and section rollups

pub mod core;
pub mod posting;
pub mod registry;
pub mod sections;

pub use self::core::*;
pub use posting::*;
pub use registry::*;
pub use sections::*;
