use std::sync::Arc;

use product_catalog_api::{
    catalog::{
        filter::build_filter,
        pagination::{PageRequest, PriceSort},
    },
    config::DbSettings,
    db::{create_orm_conn, run_migrations},
    dto::products::ProductFields,
    error::AppError,
    services::product_service::ProductService,
    store::SeaOrmProductStore,
};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, Statement};
use serde_json::json;

// Full lifecycle against Postgres: create, conflict, filtered listing, update, delete.
#[tokio::test]
async fn product_lifecycle_against_postgres() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run Postgres flow tests."
            );
            return Ok(());
        }
    };

    let service = setup_service(&database_url).await?;

    let shoe = service
        .create_product(fields("PG-1", "Trail 50% Shoe", "Shoes", 49.99))
        .await?;
    service
        .create_product(fields("PG-2", "Ferris Mug", "kitchen", 12.5))
        .await?;
    assert_eq!(shoe.price, Decimal::new(4999, 2));

    // Unique index rejects the second insert
    let err = service
        .create_product(fields("PG-1", "Copy", "misc", 1.0))
        .await
        .expect_err("duplicate code");
    assert!(matches!(err, AppError::Conflict { ref code } if code == "PG-1"));

    // ILIKE on category, and wildcard characters in the text match literally
    let request = PageRequest {
        limit: 10,
        page: 1,
        sort: Some(PriceSort::Ascending),
    };
    let shoes = service
        .list_products(&build_filter(Some("shoe"), Some("50%")), &request)
        .await?;
    assert_eq!(shoes.meta.total, 1);
    assert_eq!(shoes.products[0].id, shoe.id);

    let everything = service
        .list_products(&build_filter(None, None), &request)
        .await?;
    let prices: Vec<_> = everything.products.iter().map(|p| p.price).collect();
    assert_eq!(prices, [Decimal::new(1250, 2), Decimal::new(4999, 2)]);

    let updated = service
        .update_product(
            &shoe.id.to_string(),
            ProductFields {
                stock: Some(json!(2)),
                status: Some(json!(false)),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.stock, 2);
    assert!(!updated.status);
    assert_eq!(updated.title, shoe.title);
    assert_eq!(updated.created_at, shoe.created_at);

    service.delete_product(&shoe.id.to_string()).await?;
    assert!(matches!(
        service.delete_product(&shoe.id.to_string()).await,
        Err(AppError::NotFound)
    ));
    assert_eq!(service.count_products(&build_filter(None, None)).await?, 1);

    Ok(())
}

async fn setup_service(database_url: &str) -> anyhow::Result<ProductService> {
    let settings = DbSettings {
        max_connections: 2,
        connect_timeout: std::time::Duration::from_secs(5),
        acquire_timeout: std::time::Duration::from_secs(5),
    };
    let orm = create_orm_conn(database_url, &settings).await?;
    run_migrations(&orm).await?;

    // Clean table between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(backend, "TRUNCATE TABLE products"))
        .await?;

    Ok(ProductService::new(Arc::new(SeaOrmProductStore::new(orm))))
}

fn fields(code: &str, title: &str, category: &str, price: f64) -> ProductFields {
    ProductFields {
        code: Some(code.into()),
        title: Some(title.into()),
        price: Some(json!(price)),
        category: Some(category.into()),
        stock: Some(json!(5)),
        ..Default::default()
    }
}
