use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
    PgPool,
};

pub type PoolType = PgPool;
pub type PoolOption = PgPoolOptions;
pub type ConnectOption = PgConnectOptions;
pub type SslMode = PgSslMode;
