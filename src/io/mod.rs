//! Input and output collaborators: schema files, CSV charts, records and results

pub mod csv_files;
pub mod files;
pub mod schema;
pub mod workspace;

pub use csv_files::*;
pub use files::*;
pub use schema::*;
pub use workspace::*;
