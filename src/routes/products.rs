//! Product routes. Every `(method, path)` pair gets its own rule table, run by
//! the validation middleware before the handler.

use crate::handlers::products::{
    create_product, delete_product, get_product, list_products, update_availability, update_product,
};
use crate::state::AppState;
use crate::validation::{check_request, Check, Rule};
use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post, put},
    Router,
};

const INVALID_ID: &str = "ID no valido";
const EMPTY_NAME: &str = "El nombre del producto no puede ir vacio";
const INVALID_VALUE: &str = "Valor no valido";
const INVALID_PRICE: &str = "Precio no valido";
const INVALID_AVAILABILITY: &str = "Valor para disponibilidad no valido";

pub const ID_RULES: &[Rule] = &[Rule::param("id", Check::IsInt, INVALID_ID)];

// The not-empty check on "price" reports EMPTY_NAME.
pub const CREATE_RULES: &[Rule] = &[
    Rule::body("name", Check::NotEmpty, EMPTY_NAME),
    Rule::body("price", Check::IsNumeric, INVALID_VALUE),
    Rule::body("price", Check::NotEmpty, EMPTY_NAME),
    Rule::body("price", Check::Positive, INVALID_PRICE),
];

pub const UPDATE_RULES: &[Rule] = &[
    Rule::param("id", Check::IsInt, INVALID_ID),
    Rule::body("name", Check::NotEmpty, EMPTY_NAME),
    Rule::body("price", Check::IsNumeric, INVALID_VALUE),
    Rule::body("price", Check::NotEmpty, EMPTY_NAME),
    Rule::body("price", Check::Positive, INVALID_PRICE),
    Rule::body("availability", Check::IsBoolean, INVALID_AVAILABILITY),
];

/// Routes mounted under `/api/productos`.
pub fn product_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_products))
        .route(
            "/",
            post(create_product).route_layer(from_fn_with_state(CREATE_RULES, check_request)),
        )
        .route(
            "/:id",
            get(get_product).route_layer(from_fn_with_state(ID_RULES, check_request)),
        )
        .route(
            "/:id",
            put(update_product).route_layer(from_fn_with_state(UPDATE_RULES, check_request)),
        )
        .route(
            "/:id",
            patch(update_availability).route_layer(from_fn_with_state(ID_RULES, check_request)),
        )
        .route(
            "/:id",
            delete(delete_product).route_layer(from_fn_with_state(ID_RULES, check_request)),
        )
        .with_state(state)
}
