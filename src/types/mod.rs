pub use self::trade::Trade;

mod trade;
