use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use anyhow::Error as ANYHOW_ERROR;
use serde::{Deserialize, Serialize};
use sqlx::error::Error as SQL_ERROR;
use std::{env::VarError, io::Error as IO_ERROR, num::ParseIntError};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::error;
use tracing::subscriber::SetGlobalDefaultError as TRACING_GLOBAL_DEFAULT_ERROR;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IO_ERROR),

    #[error("{0}")]
    INT(#[from] ParseIntError),

    #[error("{0}")]
    SQL(#[from] SQL_ERROR),

    #[error("{0}")]
    VAR(#[from] VarError),

    #[error("{0}")]
    TokioJoinError(#[from] JoinError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Tracing error: {0}")]
    SetGlobalDefaultError(#[from] TRACING_GLOBAL_DEFAULT_ERROR),

    #[error("{0}")]
    AnyHowError(#[from] ANYHOW_ERROR),
}

/// Body of every failed response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,

            // Undecodable input is reported the same way as a datastore
            // rejection; clients never see a 400.
            Error::SQL(_)
            | Error::InvalidInput(_)
            | Error::Io(_)
            | Error::INT(_)
            | Error::VAR(_)
            | Error::TokioJoinError(_)
            | Error::ConfigurationError(_)
            | Error::SetGlobalDefaultError(_)
            | Error::AnyHowError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        }
        HttpResponse::build(status).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
