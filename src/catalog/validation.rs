//! Input validation for product mutations, listing parameters and mock seeding.
//!
//! Every check here runs before the store is touched. Field validation
//! collects one [`ValidationError`] per offending field so callers can report
//! all problems in a single response.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Number, Value};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    catalog::pagination::{PageRequest, PriceSort},
    dto::products::ProductFields,
    models::{NewProduct, ProductChanges},
};

pub const DEFAULT_PAGE_LIMIT: u64 = 10;
pub const DEFAULT_PAGE: u64 = 1;

const HYPHENATED_UUID_LEN: usize = 36;

/// `NUMERIC(12, 2)` holds ten integer digits and two fractional ones.
const PRICE_LIMIT: i64 = 10_000_000_000;
const PRICE_SCALE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: &'static str) -> Self {
        Self { field, reason }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{raw}' is not a valid product id")]
pub struct InvalidIdError {
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("quantity '{raw}' is not a whole number")]
    NotANumber { raw: String },
    #[error("quantity must be greater than zero")]
    NotPositive,
    #[error("quantity must not exceed {max}")]
    TooLarge { max: u32 },
}

/// Accepts only the canonical hyphenated UUID form used by the store.
pub fn validate_id(raw: &str) -> Result<Uuid, InvalidIdError> {
    let invalid = || InvalidIdError {
        raw: raw.to_string(),
    };
    if raw.len() != HYPHENATED_UUID_LEN {
        return Err(invalid());
    }
    Uuid::try_parse(raw).map_err(|_| invalid())
}

pub fn validate_create(fields: ProductFields) -> Result<NewProduct, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let code = required(check_text("code", fields.code), "code", &mut errors);
    let title = required(check_text("title", fields.title), "title", &mut errors);
    let category = required(check_text("category", fields.category), "category", &mut errors);
    let price = required(
        fields.price.map(|v| parse_price(&v).map_err(|r| ValidationError::new("price", r))),
        "price",
        &mut errors,
    );
    let stock = required(
        fields.stock.map(|v| parse_stock(&v).map_err(|r| ValidationError::new("stock", r))),
        "stock",
        &mut errors,
    );
    let status = optional(check_flag("status", fields.status), &mut errors);
    let description = optional(check_string("description", fields.description), &mut errors);
    let thumbnail = optional(check_string("thumbnail", fields.thumbnail), &mut errors);

    match (code, title, category, price, stock) {
        (Some(code), Some(title), Some(category), Some(price), Some(stock))
            if errors.is_empty() =>
        {
            Ok(NewProduct {
                code,
                title,
                description,
                price,
                category,
                stock,
                status: status.unwrap_or(true),
                thumbnail,
            })
        }
        _ => Err(errors),
    }
}

pub fn validate_update(fields: ProductFields) -> Result<ProductChanges, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let code = optional(check_text("code", fields.code), &mut errors);
    let title = optional(check_text("title", fields.title), &mut errors);
    let category = optional(check_text("category", fields.category), &mut errors);
    let price = optional(
        fields.price.map(|v| parse_price(&v).map_err(|r| ValidationError::new("price", r))),
        &mut errors,
    );
    let stock = optional(
        fields.stock.map(|v| parse_stock(&v).map_err(|r| ValidationError::new("stock", r))),
        &mut errors,
    );
    let status = optional(check_flag("status", fields.status), &mut errors);
    let description = optional(check_string("description", fields.description), &mut errors);
    let thumbnail = optional(check_string("thumbnail", fields.thumbnail), &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ProductChanges {
        code,
        title,
        description,
        price,
        category,
        stock,
        status,
        thumbnail,
    })
}

/// Parses listing parameters. Absent `limit`/`page` fall back to defaults;
/// present ones must be integers greater than zero.
pub fn validate_page_request(
    limit: Option<&str>,
    page: Option<&str>,
    sort: Option<&str>,
) -> Result<PageRequest, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let limit = parse_positive("limit", limit, DEFAULT_PAGE_LIMIT, &mut errors);
    let page = parse_positive("page", page, DEFAULT_PAGE, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(PageRequest {
        limit,
        page,
        sort: sort.and_then(PriceSort::from_token),
    })
}

pub fn parse_quantity(raw: &str, max: u32) -> Result<u32, QuantityError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| QuantityError::NotANumber {
            raw: raw.to_string(),
        })?;
    if value <= 0 {
        return Err(QuantityError::NotPositive);
    }
    match u32::try_from(value) {
        Ok(quantity) if quantity <= max => Ok(quantity),
        _ => Err(QuantityError::TooLarge { max }),
    }
}

fn check_text(
    field: &'static str,
    value: Option<Value>,
) -> Option<Result<String, ValidationError>> {
    check_string(field, value).map(|text| {
        let text = text?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Err(ValidationError::new(field, "must not be blank"))
        } else {
            Ok(trimmed.to_string())
        }
    })
}

fn check_string(
    field: &'static str,
    value: Option<Value>,
) -> Option<Result<String, ValidationError>> {
    value.map(|value| match value {
        Value::String(text) => Ok(text),
        _ => Err(ValidationError::new(field, "must be a string")),
    })
}

fn check_flag(
    field: &'static str,
    value: Option<Value>,
) -> Option<Result<bool, ValidationError>> {
    value.map(|value| match value {
        Value::Bool(flag) => Ok(flag),
        _ => Err(ValidationError::new(field, "must be a boolean")),
    })
}

fn required<T>(
    value: Option<Result<T, ValidationError>>,
    field: &'static str,
    errors: &mut Vec<ValidationError>,
) -> Option<T> {
    match value {
        None => {
            errors.push(ValidationError::new(field, "is required"));
            None
        }
        Some(result) => optional(Some(result), errors),
    }
}

fn optional<T>(
    value: Option<Result<T, ValidationError>>,
    errors: &mut Vec<ValidationError>,
) -> Option<T> {
    match value? {
        Ok(v) => Some(v),
        Err(err) => {
            errors.push(err);
            None
        }
    }
}

fn parse_price(value: &Value) -> Result<Decimal, &'static str> {
    let Value::Number(number) = value else {
        return Err("must be a number");
    };
    let price = number_to_decimal(number).ok_or("must be a number")?;
    if price <= Decimal::ZERO {
        return Err("must be greater than zero");
    }
    if price >= Decimal::from(PRICE_LIMIT) {
        return Err("is too large");
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err("must have at most two decimal places");
    }
    Ok(price)
}

fn number_to_decimal(number: &Number) -> Option<Decimal> {
    let text = number.to_string();
    text.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn parse_stock(value: &Value) -> Result<i32, &'static str> {
    let Value::Number(number) = value else {
        return Err("must be a whole number");
    };
    if let Some(whole) = number.as_i64() {
        return whole_stock(whole);
    }
    if number.is_u64() {
        // above i64::MAX
        return Err("is too large");
    }
    match number.as_f64() {
        // 5.0 is still a whole number
        Some(f) if f.is_finite() && f.fract() == 0.0 => {
            if f < 0.0 {
                Err("must not be negative")
            } else if f > f64::from(i32::MAX) {
                Err("is too large")
            } else {
                Ok(f as i32)
            }
        }
        _ => Err("must be a whole number"),
    }
}

fn whole_stock(whole: i64) -> Result<i32, &'static str> {
    if whole < 0 {
        return Err("must not be negative");
    }
    i32::try_from(whole).map_err(|_| "is too large")
}

fn parse_positive(
    field: &'static str,
    raw: Option<&str>,
    default: u64,
    errors: &mut Vec<ValidationError>,
) -> u64 {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<i64>() {
        Ok(value) if value > 0 => value as u64,
        _ => {
            errors.push(ValidationError::new(
                field,
                "must be an integer greater than zero",
            ));
            default
        }
    }
}
