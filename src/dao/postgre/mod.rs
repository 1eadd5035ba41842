pub use self::types::{ConnectOption, PoolOption, PoolType, SslMode};

mod trade;
mod types;
