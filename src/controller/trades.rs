use actix_web::{delete, get, post, put, web, HttpResponse, Responder, Result};
use serde::{Deserialize, Serialize};

use crate::{
    configuration::{AppState, State},
    error::Error,
    types,
};

pub const NOT_FOUND: &str = "Trade not found";
pub const DELETED: &str = "Trade deleted successfully";

#[get("/trades")]
async fn index(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    let data = state.database.trade.get_all().await?;
    Ok(web::Json(data))
}

#[get("/trades/{id}")]
async fn show(
    state: web::Data<AppState<State>>,
    path: web::Path<i32>,
) -> Result<impl Responder, Error> {
    let id = path.into_inner();
    let item = state
        .database
        .trade
        .get_one(id)
        .await?
        .ok_or_else(not_found)?;

    Ok(web::Json(item))
}

#[post("/trades")]
async fn create(
    state: web::Data<AppState<State>>,
    body: types::Trade,
) -> Result<HttpResponse, Error> {
    let item = state.database.trade.insert(&body).await?;
    Ok(HttpResponse::Created().json(item))
}

#[put("/trades/{id}")]
async fn update(
    state: web::Data<AppState<State>>,
    path: web::Path<i32>,
    body: types::Trade,
) -> Result<impl Responder, Error> {
    let id = path.into_inner();
    let item = state
        .database
        .trade
        .update(id, &body)
        .await?
        .ok_or_else(not_found)?;

    Ok(web::Json(item))
}

#[delete("/trades/{id}")]
async fn remove(
    state: web::Data<AppState<State>>,
    path: web::Path<i32>,
) -> Result<impl Responder, Error> {
    let id = path.into_inner();
    state
        .database
        .trade
        .delete(id)
        .await?
        .ok_or_else(not_found)?;

    Ok(web::Json(Response {
        message: String::from(DELETED),
    }))
}

fn not_found() -> Error {
    Error::NotFound(String::from(NOT_FOUND))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub message: String,
}
