use actix_web::{get, web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{
    configuration::{AppState, State},
    error::Error,
    helpers::Status,
};

#[get("/health")]
async fn index(
    state: web::Data<AppState<State>>,
) -> Result<HttpResponse, Error> {
    match state.database.ping().await {
        Ok(()) => Ok(HttpResponse::Ok().json(Response {
            status: String::from(Status::Ok),
            message: String::from("Database connection is healthy"),
        })),
        Err(e) => {
            error!("Health check failed: {}", e);
            Ok(HttpResponse::InternalServerError().json(Response {
                status: String::from(Status::Error),
                message: e.to_string(),
            }))
        },
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub status: String,
    pub message: String,
}
