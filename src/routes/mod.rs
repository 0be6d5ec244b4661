mod common;
mod products;

pub use common::common_routes_with_ready;
pub use products::{product_routes, CREATE_RULES, ID_RULES, UPDATE_RULES};
