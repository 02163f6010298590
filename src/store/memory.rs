use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    catalog::{filter::ProductFilter, pagination::PriceSort},
    models::{NewProduct, Product},
    store::{ProductStore, StoreError},
};

/// Process-local store keeping products in insertion order.
///
/// The code uniqueness check and the write happen under one write lock, so
/// concurrent inserts of the same code let exactly one through.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn count(&self, filter: &ProductFilter) -> Result<u64, StoreError> {
        let products = self.products.read().await;
        Ok(products.iter().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn find_page(
        &self,
        filter: &ProductFilter,
        sort: Option<PriceSort>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().await;
        let mut matched: Vec<Product> = products
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();

        // stable sort keeps insertion order among equal prices
        match sort {
            Some(PriceSort::Ascending) => matched.sort_by(|a, b| a.price.cmp(&b.price)),
            Some(PriceSort::Descending) => matched.sort_by(|a, b| b.price.cmp(&a.price)),
            None => {}
        }

        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(matched.into_iter().skip(offset).take(limit).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let mut products = self.products.write().await;
        if products.iter().any(|p| p.code == product.code) {
            return Err(StoreError::DuplicateCode { code: product.code });
        }

        let stored = Product {
            id: Uuid::new_v4(),
            code: product.code,
            title: product.title,
            description: product.description,
            price: product.price,
            category: product.category,
            stock: product.stock,
            status: product.status,
            thumbnail: product.thumbnail,
            created_at: Utc::now(),
        };
        products.push(stored.clone());
        Ok(stored)
    }

    async fn replace(&self, product: Product) -> Result<Option<Product>, StoreError> {
        let mut products = self.products.write().await;
        if products
            .iter()
            .any(|p| p.id != product.id && p.code == product.code)
        {
            return Err(StoreError::DuplicateCode { code: product.code });
        }

        let Some(slot) = products.iter_mut().find(|p| p.id == product.id) else {
            return Ok(None);
        };
        // created_at belongs to the store
        let created_at = slot.created_at;
        *slot = Product {
            created_at,
            ..product
        };
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }
}
