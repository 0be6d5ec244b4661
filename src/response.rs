//! Standard response envelope helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Success body: `{"data": ...}`.
#[derive(Serialize)]
pub struct Success<T> {
    pub data: T,
}

pub fn success_one<T: Serialize>(data: T) -> (StatusCode, Json<Success<T>>) {
    (StatusCode::CREATED, Json(Success { data }))
}

pub fn success_one_ok<T: Serialize>(data: T) -> (StatusCode, Json<Success<T>>) {
    (StatusCode::OK, Json(Success { data }))
}

pub fn success_many<T: Serialize>(data: Vec<T>) -> (StatusCode, Json<Success<Vec<T>>>) {
    (StatusCode::OK, Json(Success { data }))
}
