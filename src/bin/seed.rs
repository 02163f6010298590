use std::sync::Arc;

use product_catalog_api::{
    catalog::filter::ProductFilter,
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    state::AppState,
    store::SeaOrmProductStore,
};

const DEFAULT_COUNT: &str = "25";

/// Seeds mock products: `seed [count]`. Honors `MOCK_SEED` for reproducible data.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let count = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_COUNT.to_string());

    let orm = create_orm_conn(&config.database_url, &config.db).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let state = AppState::new(
        Arc::new(SeaOrmProductStore::new(orm)),
        &config.mocks,
        &config.jwt_secret,
    );

    let created = state
        .mocks
        .create_many(&count)
        .await?;
    for product in &created {
        println!("Seeded {} ({}) at {}", product.code, product.category, product.price);
    }

    let total = state
        .products
        .count_products(&ProductFilter::default())
        .await?;
    println!("Seed completed. {} new products, {} in catalog", created.len(), total);
    Ok(())
}
