use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: String,
    pub stock: i32,
    pub status: bool,
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A product that passed create validation and has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: String,
    pub stock: i32,
    pub status: bool,
    pub thumbnail: Option<String>,
}

/// Validated partial update. `None` means "keep the stored value".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub code: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub stock: Option<i32>,
    pub status: Option<bool>,
    pub thumbnail: Option<String>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrites the supplied fields on `product`. `id` and `created_at` are never touched.
    pub fn apply_to(self, product: &mut Product) {
        if let Some(code) = self.code {
            product.code = code;
        }
        if let Some(title) = self.title {
            product.title = title;
        }
        if let Some(description) = self.description {
            product.description = Some(description);
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(status) = self.status {
            product.status = status;
        }
        if let Some(thumbnail) = self.thumbnail {
            product.thumbnail = Some(thumbnail);
        }
    }
}
