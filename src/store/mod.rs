//! Persistence seam for products.
//!
//! [`ProductStore`] is what the services talk to. Uniqueness of `code` is the
//! store's job; a violation comes back as [`StoreError::DuplicateCode`] so the
//! service can tell it apart from infrastructure failures.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    catalog::{filter::ProductFilter, pagination::PriceSort},
    models::{NewProduct, Product},
};

pub mod memory;
pub mod sea_orm_store;

pub use memory::InMemoryProductStore;
pub use sea_orm_store::SeaOrmProductStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("product code {code} already exists")]
    DuplicateCode { code: String },

    #[error("database error")]
    Database(#[from] sea_orm::DbErr),
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn count(&self, filter: &ProductFilter) -> Result<u64, StoreError>;

    /// Products matching `filter`, ordered by price when `sort` is set and by
    /// insertion order otherwise.
    async fn find_page(
        &self,
        filter: &ProductFilter,
        sort: Option<PriceSort>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Product>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError>;

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError>;

    /// Overwrites the stored row with the same id. `None` when no such row exists.
    async fn replace(&self, product: Product) -> Result<Option<Product>, StoreError>;

    /// `true` when a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}
