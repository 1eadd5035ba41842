//! Database models

mod table;
mod trade;

pub use table::Table;
pub use trade::{DateOrTime, Trade};
