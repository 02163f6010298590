use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{catalog::pagination::PageMeta, models::Product};

/// Body accepted by both create and update. Every field stays raw JSON so a
/// wrong type is reported per field instead of rejecting the whole body.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct ProductFields {
    #[schema(value_type = Option<String>)]
    pub code: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub title: Option<Value>,
    #[schema(value_type = Option<f64>)]
    pub price: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub category: Option<Value>,
    #[schema(value_type = Option<i32>)]
    pub stock: Option<Value>,
    #[schema(value_type = Option<bool>)]
    pub status: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub description: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub thumbnail: Option<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductPage {
    pub products: Vec<Product>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}
