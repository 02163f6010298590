use serde::Deserialize;
use utoipa::ToSchema;

use crate::catalog::{
    filter::{ProductFilter, build_filter},
    pagination::PageRequest,
    validation::{ValidationError, validate_page_request},
};

/// Raw listing parameters. Kept as strings so non-numeric input is reported
/// as a validation error rather than an extractor rejection.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProductQuery {
    pub limit: Option<String>,
    pub page: Option<String>,
    pub sort: Option<String>,
    pub category: Option<String>,
    pub query: Option<String>,
}

impl ProductQuery {
    pub fn page_request(&self) -> Result<PageRequest, Vec<ValidationError>> {
        validate_page_request(
            self.limit.as_deref(),
            self.page.as_deref(),
            self.sort.as_deref(),
        )
    }

    pub fn filter(&self) -> ProductFilter {
        build_filter(self.category.as_deref(), self.query.as_deref())
    }
}
