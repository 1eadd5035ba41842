use actix_web::{get, web, Responder};
use serde::{Deserialize, Serialize};

use crate::error::Error;

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[get("/version")]
async fn index() -> Result<impl Responder, Error> {
    Ok(web::Json(Response {
        name: NAME,
        version: VERSION,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response<'a> {
    pub name: &'a str,
    pub version: &'a str,
}
