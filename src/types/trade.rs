use actix_web::{dev::Payload, web::Bytes, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Body of `POST /trades` and `PUT /trades/{id}`.
///
/// Fields stay raw JSON and are handed to the datastore as one record, which
/// coerces each value to its column type. An absent field or an empty body
/// binds SQL `NULL`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Trade {
    pub data: Option<Value>,
    pub ativo: Option<Value>,
    pub direcao: Option<Value>,
    pub percentual: Option<Value>,
    pub alvo: Option<Value>,
}

impl Trade {
    pub fn from_slice(body: &[u8]) -> Result<Trade, Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Trade::default());
        }

        serde_json::from_slice(body)
            .map_err(|e| Error::InvalidInput(e.to_string()))
    }
}

impl FromRequest for Trade {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let bytes = Bytes::from_request(req, payload);

        Box::pin(async move {
            let body =
                bytes.await.map_err(|e| Error::InvalidInput(e.to_string()))?;
            Trade::from_slice(&body)
        })
    }
}
