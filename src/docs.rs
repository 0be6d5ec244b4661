//! OpenAPI document for the product routes, served through Swagger UI at `/docs`.

use crate::models::{NewProduct, Product, ProductChanges};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(Serialize, ToSchema)]
pub struct ProductBody {
    pub data: Product,
}

#[derive(Serialize, ToSchema)]
pub struct ProductListBody {
    pub data: Vec<Product>,
}

#[derive(Serialize, ToSchema)]
pub struct DeletedBody {
    #[schema(example = "Producto eliminado")]
    pub data: String,
}

#[derive(Serialize, ToSchema)]
pub struct FieldErrorDoc {
    #[serde(rename = "type")]
    #[schema(example = "field")]
    pub kind: String,
    #[schema(value_type = Object)]
    pub value: Option<serde_json::Value>,
    #[schema(example = "ID no valido")]
    pub msg: String,
    #[schema(example = "id")]
    pub path: String,
    #[schema(example = "params")]
    pub location: String,
}

#[derive(Serialize, ToSchema)]
pub struct ValidationErrorsBody {
    pub errors: Vec<FieldErrorDoc>,
}

#[derive(Serialize, ToSchema)]
pub struct NotFoundBody {
    #[schema(example = "Producto no encontrado")]
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Productos API", description = "API Docs for Products"),
    paths(
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::create_product,
        crate::handlers::products::update_product,
        crate::handlers::products::update_availability,
        crate::handlers::products::delete_product,
    ),
    components(schemas(
        Product,
        NewProduct,
        ProductChanges,
        ProductBody,
        ProductListBody,
        DeletedBody,
        FieldErrorDoc,
        ValidationErrorsBody,
        NotFoundBody,
    )),
    tags((name = "Products", description = "API operations related to products"))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_product_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths["/api/productos"].get("get").is_some());
        assert!(paths["/api/productos"].get("post").is_some());
        for method in ["get", "put", "patch", "delete"] {
            assert!(paths["/api/productos/{id}"].get(method).is_some(), "{}", method);
        }
        assert!(doc["components"]["schemas"].get("Product").is_some());
    }
}
