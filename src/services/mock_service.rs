//! Synthetic product seeding.
//!
//! Draft content comes from a seeded ChaCha8 RNG, so a given seed always
//! produces the same sequence of titles, prices and stock. Codes come from a
//! fresh v4 UUID instead, so reseeding never replays a code already stored.
//! Every draft goes through the regular create path and therefore through the
//! same validation as a real request.

use std::sync::{Mutex, PoisonError};

use fake::Fake;
use fake::faker::lorem::raw::{Sentence, Words};
use fake::locales::EN;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::json;
use uuid::Uuid;

use crate::{
    catalog::validation::parse_quantity,
    dto::products::ProductFields,
    error::AppResult,
    models::Product,
    services::product_service::ProductService,
};

pub const DEFAULT_MAX_QUANTITY: u32 = 1000;

const CATEGORIES: [&str; 8] = [
    "shoes",
    "apparel",
    "electronics",
    "home",
    "kitchen",
    "toys",
    "books",
    "outdoors",
];

/// Cents, so prices land between 0.99 and 999.99.
const MIN_PRICE_CENTS: u32 = 99;
const MAX_PRICE_CENTS: u32 = 99_999;

const MAX_STOCK: u32 = 500;

pub struct MockGenerator {
    products: ProductService,
    rng: Mutex<ChaCha8Rng>,
    max_quantity: u32,
}

impl MockGenerator {
    pub fn new(products: ProductService, seed: u64, max_quantity: u32) -> Self {
        Self {
            products,
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
            max_quantity,
        }
    }

    /// Seeds the RNG from the thread-local generator.
    pub fn unseeded(products: ProductService, max_quantity: u32) -> Self {
        Self::new(products, rand::random(), max_quantity)
    }

    pub async fn create_one(&self) -> AppResult<Product> {
        let fields = self.next_draft();
        self.products.create_product(fields).await
    }

    /// Parses `quantity_raw` and persists that many independent products.
    /// Products created before a failure stay persisted.
    pub async fn create_many(&self, quantity_raw: &str) -> AppResult<Vec<Product>> {
        let quantity = parse_quantity(quantity_raw, self.max_quantity)?;

        let mut created = Vec::with_capacity(quantity as usize);
        for _ in 0..quantity {
            created.push(self.create_one().await?);
        }
        tracing::info!(count = created.len(), "mock products created");
        Ok(created)
    }

    fn next_draft(&self) -> ProductFields {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        draft_product(&mut *rng, mock_code())
    }
}

pub fn mock_code() -> String {
    format!("MOCK-{:032X}", Uuid::new_v4().as_u128())
}

/// Draws one schema-valid product body for `code` from `rng`.
pub fn draft_product<R: Rng>(rng: &mut R, code: String) -> ProductFields {

    let words: Vec<String> = Words(EN, 2..4).fake_with_rng(rng);
    let title = capitalize(&words.join(" "));
    let description: String = Sentence(EN, 6..12).fake_with_rng(rng);

    let category = CATEGORIES[rng.random_range(0..CATEGORIES.len())];
    let cents = rng.random_range(MIN_PRICE_CENTS..=MAX_PRICE_CENTS);
    let price = f64::from(cents) / 100.0;
    let stock = rng.random_range(0..=MAX_STOCK);
    let status = rng.random_ratio(9, 10);

    ProductFields {
        thumbnail: Some(json!(format!("https://picsum.photos/seed/{code}/400/400"))),
        code: Some(json!(code)),
        title: Some(json!(title)),
        price: Some(json!(price)),
        category: Some(json!(category)),
        stock: Some(json!(stock)),
        status: Some(json!(status)),
        description: Some(json!(description)),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
