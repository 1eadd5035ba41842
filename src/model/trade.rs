use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    types::BigDecimal as SqlxBigDecimal,
    Decode, FromRow, Postgres, Type, ValueRef,
};

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Trade {
    pub id: i32,
    pub data: Option<DateOrTime>,
    pub ativo: Option<String>,
    pub direcao: Option<String>,
    pub percentual: Option<SqlxBigDecimal>,
    pub alvo: Option<SqlxBigDecimal>,
    pub createdat: Option<DateOrTime>,
    pub updatedat: Option<DateOrTime>,
}

/// A `DATE`, `TIMESTAMP` or `TIMESTAMPTZ` column, whichever the table
/// declares. Serializes the way chrono serializes the inner value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DateOrTime {
    Date(NaiveDate),
    Naive(NaiveDateTime),
    Utc(DateTime<Utc>),
}

impl Type<Postgres> for DateOrTime {
    fn type_info() -> PgTypeInfo {
        <DateTime<Utc> as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <NaiveDate as Type<Postgres>>::compatible(ty)
            || <NaiveDateTime as Type<Postgres>>::compatible(ty)
            || <DateTime<Utc> as Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for DateOrTime {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let ty = value.type_info().into_owned();

        if <NaiveDate as Type<Postgres>>::compatible(&ty) {
            return Ok(DateOrTime::Date(<NaiveDate as Decode<Postgres>>::decode(value)?));
        }

        if <NaiveDateTime as Type<Postgres>>::compatible(&ty) {
            return Ok(DateOrTime::Naive(<NaiveDateTime as Decode<Postgres>>::decode(value)?));
        }

        Ok(DateOrTime::Utc(<DateTime<Utc> as Decode<Postgres>>::decode(value)?))
    }
}
