//! Product record and the inputs the handlers derive from validated bodies.

use crate::validation::{coerce_number, flag, text};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Product {
    /// The product ID
    #[schema(example = 1)]
    pub id: i32,
    /// The product name
    #[schema(example = "Monitor curvo 27 pulgadas")]
    pub name: String,
    /// The product price
    #[schema(example = 250)]
    pub price: f64,
    /// The product availability
    #[schema(example = true)]
    pub availability: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Overwrite every mutable field.
    pub fn apply(&mut self, changes: ProductChanges) {
        self.name = changes.name;
        self.price = changes.price;
        self.availability = changes.availability;
    }

    pub fn toggle_availability(&mut self) {
        self.availability = !self.availability;
    }
}

/// Body of a create request. `availability` always starts out `true`.
#[derive(Clone, Debug, PartialEq, Deserialize, ToSchema)]
pub struct NewProduct {
    #[schema(example = "Monitor Curvo 49 Pulgadas")]
    pub name: String,
    #[schema(example = 399)]
    pub price: f64,
}

impl NewProduct {
    pub fn from_body(body: &Map<String, Value>) -> Option<Self> {
        Some(NewProduct {
            name: text(body.get("name")),
            price: price(body)?,
        })
    }
}

/// Body of a full update request.
#[derive(Clone, Debug, PartialEq, Deserialize, ToSchema)]
pub struct ProductChanges {
    #[schema(example = "Monitor Curvo 49 Pulgadas")]
    pub name: String,
    #[schema(example = 399)]
    pub price: f64,
    #[schema(example = true)]
    pub availability: bool,
}

impl ProductChanges {
    pub fn from_body(body: &Map<String, Value>) -> Option<Self> {
        Some(ProductChanges {
            name: text(body.get("name")),
            price: price(body)?,
            availability: flag(body.get("availability"))?,
        })
    }
}

fn price(body: &Map<String, Value>) -> Option<f64> {
    let n = coerce_number(body.get("price"));
    (n.is_finite() && n > 0.0).then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn new_product_from_numeric_string() {
        let p = NewProduct::from_body(&body(json!({ "name": "Teclado", "price": "45.5" }))).unwrap();
        assert_eq!(p, NewProduct { name: "Teclado".into(), price: 45.5 });
    }

    #[test]
    fn changes_need_a_boolean_like_availability() {
        let ok = ProductChanges::from_body(&body(json!({ "name": "Mouse", "price": 10, "availability": "false" })));
        assert_eq!(ok.map(|c| c.availability), Some(false));
        let missing = ProductChanges::from_body(&body(json!({ "name": "Mouse", "price": 10 })));
        assert!(missing.is_none());
    }

    #[test]
    fn apply_and_toggle() {
        let now = Utc::now();
        let mut p = Product {
            id: 7,
            name: "Old".into(),
            price: 1.0,
            availability: true,
            created_at: now,
            updated_at: now,
        };
        p.apply(ProductChanges { name: "New".into(), price: 9.5, availability: false });
        assert_eq!((p.id, p.name.as_str(), p.price, p.availability), (7, "New", 9.5, false));
        p.toggle_availability();
        assert!(p.availability);
    }

    #[test]
    fn serialises_timestamps_in_camel_case() {
        let now = Utc::now();
        let p = Product { id: 1, name: "A".into(), price: 2.0, availability: true, created_at: now, updated_at: now };
        let v = serde_json::to_value(&p).unwrap();
        assert!(v.get("createdAt").is_some());
        assert!(v.get("updatedAt").is_some());
        assert!(v.get("created_at").is_none());
    }
}
