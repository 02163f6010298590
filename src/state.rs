use std::sync::Arc;

use crate::{
    config::MockSettings,
    services::{mock_service::MockGenerator, product_service::ProductService},
    store::ProductStore,
};

#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
    pub mocks: Arc<MockGenerator>,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProductStore>, mocks: &MockSettings, jwt_secret: &str) -> Self {
        let products = ProductService::new(store);
        let generator = match mocks.seed {
            Some(seed) => MockGenerator::new(products.clone(), seed, mocks.max_quantity),
            None => MockGenerator::unseeded(products.clone(), mocks.max_quantity),
        };

        Self {
            products,
            mocks: Arc::new(generator),
            jwt_secret: Arc::from(jwt_secret),
        }
    }
}
