use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, Condition, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, SqlErr,
};
use uuid::Uuid;

use crate::{
    catalog::{
        filter::{ProductFilter, like_pattern},
        pagination::PriceSort,
    },
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    models::{NewProduct, Product},
    store::{ProductStore, StoreError},
};

/// Postgres-backed store. Code uniqueness comes from the `products_code_key` index.
#[derive(Clone)]
pub struct SeaOrmProductStore {
    conn: DatabaseConnection,
}

impl SeaOrmProductStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl ProductStore for SeaOrmProductStore {
    async fn count(&self, filter: &ProductFilter) -> Result<u64, StoreError> {
        let total = Products::find()
            .filter(condition(filter))
            .count(&self.conn)
            .await?;
        Ok(total)
    }

    async fn find_page(
        &self,
        filter: &ProductFilter,
        sort: Option<PriceSort>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Product>, StoreError> {
        let mut finder = Products::find().filter(condition(filter));
        finder = match sort {
            Some(PriceSort::Ascending) => finder.order_by_asc(Column::Price),
            Some(PriceSort::Descending) => finder.order_by_desc(Column::Price),
            None => finder,
        };
        // insertion order, also the tie-breaker for equal prices
        finder = finder
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id);

        let items = finder
            .limit(limit)
            .offset(offset)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect();
        Ok(items)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let product = Products::find_by_id(id)
            .one(&self.conn)
            .await?
            .map(product_from_entity);
        Ok(product)
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let code = product.code.clone();
        let active = ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(product.code),
            title: Set(product.title),
            description: Set(product.description),
            price: Set(product.price),
            category: Set(product.category),
            stock: Set(product.stock),
            status: Set(product.status),
            thumbnail: Set(product.thumbnail),
            created_at: NotSet,
        };

        active
            .insert(&self.conn)
            .await
            .map(product_from_entity)
            .map_err(|err| write_error(err, code))
    }

    async fn replace(&self, product: Product) -> Result<Option<Product>, StoreError> {
        let code = product.code.clone();
        let active = ActiveModel {
            id: Set(product.id),
            code: Set(product.code),
            title: Set(product.title),
            description: Set(product.description),
            price: Set(product.price),
            category: Set(product.category),
            stock: Set(product.stock),
            status: Set(product.status),
            thumbnail: Set(product.thumbnail),
            created_at: NotSet,
        };

        match active.update(&self.conn).await {
            Ok(model) => Ok(Some(product_from_entity(model))),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(err) => Err(write_error(err, code)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = Products::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}

fn condition(filter: &ProductFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(category) = filter.category.as_deref() {
        condition = condition.add(
            Expr::col(Column::Category).ilike(LikeExpr::new(like_pattern(category)).escape('\\')),
        );
    }

    if let Some(text) = filter.text.as_deref() {
        condition = condition.add(
            Expr::col(Column::Title).ilike(LikeExpr::new(like_pattern(text)).escape('\\')),
        );
    }

    condition
}

fn write_error(err: DbErr, code: String) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::DuplicateCode { code },
        _ => StoreError::Database(err),
    }
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        code: model.code,
        title: model.title,
        description: model.description,
        price: model.price,
        category: model.category,
        stock: model.stock,
        status: model.status,
        thumbnail: model.thumbnail,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
