use crate::models::Product;

/// Narrowing predicate for product listings. Both parts are optional and
/// AND-combined; an empty filter matches every product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub text: Option<String>,
}

pub fn build_filter(category: Option<&str>, text: Option<&str>) -> ProductFilter {
    ProductFilter {
        category: normalize(category),
        text: normalize(text),
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl ProductFilter {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.text.is_none()
    }

    /// Case-insensitive substring match on category and title.
    pub fn matches(&self, product: &Product) -> bool {
        contains_ignore_case(&product.category, self.category.as_deref())
            && contains_ignore_case(&product.title, self.text.as_deref())
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

/// Escapes LIKE wildcards so user input matches literally inside `%…%`.
pub fn like_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('%');
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
