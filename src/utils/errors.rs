//! Error taxonomy (§7).
//!
//! `AppError` covers only the *unexpected* failure modes — a dropped
//! store connection, a malformed checkpoint file, a config variable
//! that's missing. The *expected* failure modes (unparseable address,
//! no street match, ...) never raise; they are reported as a
//! [`crate::models::GeocodingResult`] variant instead (§9: "errors as
//! tagged values, not exceptions"). Unlike the host application this
//! crate was pulled out of, there's no HTTP façade in scope, so this
//! type carries no `IntoResponse` impl — callers just match on it.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("ingest error: {0}")]
    Ingest(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

pub type AppResult<T> = Result<T, AppError>;
