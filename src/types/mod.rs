//! Data types for tables: schema, rows and presentation flags.

mod column;
mod table;

pub use column::*;
pub use table::*;
