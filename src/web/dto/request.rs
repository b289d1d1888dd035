//! Request DTOs for the Web API.

use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters of `DELETE /api/delete`.
///
/// `file` is optional here so that a missing parameter gets the JSON error
/// body instead of the extractor's plain-text rejection.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteQuery {
    /// Name of the file to delete.
    pub file: Option<String>,
}

/// Query parameters of `POST /api/write`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WriteQuery {
    /// Message to store; a default text is used when missing or empty.
    pub msg: Option<String>,
}
