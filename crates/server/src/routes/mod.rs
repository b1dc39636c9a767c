use axum::extract::{FromRequestParts, Path, Query};
use serde::Deserialize;

use crate::error::ApiError;

pub mod health;
pub mod tasks;
pub mod todos;

/// `Path` whose rejection is reported through [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// `Query` whose rejection is reported through [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// `?sortBy=&direction=` shared by both list endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortParams {
    pub sort_by: Option<String>,
    pub direction: Option<String>,
}
