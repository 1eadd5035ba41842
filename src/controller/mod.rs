//! API Controller modules

pub mod health;
pub mod trades;
pub mod version;
