mod postgre;

pub use postgre::{ConnectOption, PoolOption, PoolType, SslMode};
