use std::sync::Arc;

use crate::{
    catalog::{
        filter::ProductFilter,
        pagination::{PageRequest, paginate},
        validation::{validate_create, validate_id, validate_update},
    },
    dto::products::{ProductFields, ProductPage},
    error::{AppError, AppResult},
    models::Product,
    store::ProductStore,
};

/// Reads and writes products through an injected [`ProductStore`].
///
/// Validation and id checks run before the store is called, so malformed
/// requests never cost a round trip.
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub async fn list_products(
        &self,
        filter: &ProductFilter,
        request: &PageRequest,
    ) -> AppResult<ProductPage> {
        let matched = self.store.count(filter).await?;
        let meta = paginate(matched, request);

        let offset = request.offset();
        let products = if offset < matched {
            self.store
                .find_page(filter, request.sort, offset, request.limit)
                .await?
        } else {
            Vec::new()
        };

        Ok(ProductPage { products, meta })
    }

    pub async fn count_products(&self, filter: &ProductFilter) -> AppResult<u64> {
        Ok(self.store.count(filter).await?)
    }

    pub async fn get_product(&self, raw_id: &str) -> AppResult<Product> {
        let id = validate_id(raw_id)?;
        self.store.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn create_product(&self, fields: ProductFields) -> AppResult<Product> {
        let new_product = validate_create(fields)?;

        match self.store.insert(new_product).await {
            Ok(product) => {
                tracing::info!(product_id = %product.id, code = %product.code, "product created");
                Ok(product)
            }
            Err(err) => {
                let err = AppError::from(err);
                if let AppError::Conflict { code } = &err {
                    tracing::warn!(code = %code, "product code already taken");
                }
                Err(err)
            }
        }
    }

    /// Overwrites only the supplied fields; everything else keeps its stored value.
    pub async fn update_product(&self, raw_id: &str, fields: ProductFields) -> AppResult<Product> {
        let id = validate_id(raw_id)?;
        let changes = validate_update(fields)?;

        let mut product = self.store.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        if changes.is_empty() {
            return Ok(product);
        }
        changes.apply_to(&mut product);

        // the row may have been deleted between the read and the write
        let updated = self
            .store
            .replace(product)
            .await?
            .ok_or(AppError::NotFound)?;
        tracing::info!(product_id = %updated.id, "product updated");
        Ok(updated)
    }

    /// Absence is reported as [`AppError::NotFound`].
    pub async fn delete_product(&self, raw_id: &str) -> AppResult<()> {
        let id = validate_id(raw_id)?;
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }
}
