pub use self::database::DatabasePool;

mod database;
