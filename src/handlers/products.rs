//! Product handlers. Each runs after its route's validation middleware, so path
//! ids are well-formed and bodies carry every field the route requires.

use crate::docs::{DeletedBody, NotFoundBody, ProductBody, ProductListBody, ValidationErrorsBody};
use crate::error::AppError;
use crate::models::{NewProduct, Product, ProductChanges};
use crate::response::{success_many, success_one, success_one_ok};
use crate::state::AppState;
use crate::validation::ValidatedBody;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension,
};

pub const DELETED_MESSAGE: &str = "Producto eliminado";

/// Get a list of products
#[utoipa::path(
    get,
    path = "/api/productos",
    tag = "Products",
    responses(
        (status = 200, description = "Successful response", body = ProductListBody)
    )
)]
pub async fn list_products(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let products = state.store.list().await?;
    Ok(success_many(products))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/api/productos/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "The ID of the product to retrieve")),
    responses(
        (status = 200, description = "Successful Response", body = ProductBody),
        (status = 400, description = "Bad Request - Invalid ID", body = ValidationErrorsBody),
        (status = 404, description = "Not found", body = NotFoundBody)
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let product = find(&state, id).await?;
    Ok(success_one_ok(product))
}

/// Creates a new product
#[utoipa::path(
    post,
    path = "/api/productos",
    tag = "Products",
    request_body = NewProduct,
    responses(
        (status = 201, description = "Successful response", body = ProductBody),
        (status = 400, description = "Bad Request - invalid input data", body = ValidationErrorsBody)
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(ValidatedBody(body)): Extension<ValidatedBody>,
) -> Result<impl IntoResponse, AppError> {
    let input = NewProduct::from_body(&body)
        .ok_or_else(|| AppError::MalformedBody("create body did not convert".into()))?;
    let product = state.store.create(input).await?;
    Ok(success_one(product))
}

/// Updates a product with user input
#[utoipa::path(
    put,
    path = "/api/productos/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "The ID of the product to update")),
    request_body = ProductChanges,
    responses(
        (status = 200, description = "Successful response", body = ProductBody),
        (status = 400, description = "Bad Request - Invalid ID or Invalid input data", body = ValidationErrorsBody),
        (status = 404, description = "Product Not Found", body = NotFoundBody)
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Extension(ValidatedBody(body)): Extension<ValidatedBody>,
) -> Result<impl IntoResponse, AppError> {
    let changes = ProductChanges::from_body(&body)
        .ok_or_else(|| AppError::MalformedBody("update body did not convert".into()))?;
    let mut product = find(&state, id).await?;
    product.apply(changes);
    let saved = save(&state, &product).await?;
    Ok(success_one_ok(saved))
}

/// Update Product availability
#[utoipa::path(
    patch,
    path = "/api/productos/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "The ID of the product to update")),
    responses(
        (status = 200, description = "Successful response", body = ProductBody),
        (status = 400, description = "Bad Request - Invalid ID", body = ValidationErrorsBody),
        (status = 404, description = "Product Not Found", body = NotFoundBody)
    )
)]
pub async fn update_availability(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let mut product = find(&state, id).await?;
    product.toggle_availability();
    let saved = save(&state, &product).await?;
    Ok(success_one_ok(saved))
}

/// Deletes a product by a given ID
#[utoipa::path(
    delete,
    path = "/api/productos/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "The ID of the product to delete")),
    responses(
        (status = 200, description = "Successful response", body = DeletedBody),
        (status = 400, description = "Bad Request - Invalid ID", body = ValidationErrorsBody),
        (status = 404, description = "Product Not Found", body = NotFoundBody)
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    find(&state, id).await?;
    if !state.store.destroy(id).await? {
        return Err(AppError::NotFound(id));
    }
    Ok(success_one_ok(DELETED_MESSAGE))
}

async fn find(state: &AppState, id: i32) -> Result<Product, AppError> {
    match state.store.find(id).await? {
        Some(product) => Ok(product),
        None => Err(AppError::NotFound(id)),
    }
}

// The record can vanish between find and save.
async fn save(state: &AppState, product: &Product) -> Result<Product, AppError> {
    match state.store.save(product).await? {
        Some(saved) => Ok(saved),
        None => Err(AppError::NotFound(product.id)),
    }
}
