use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSort {
    Ascending,
    Descending,
}

impl PriceSort {
    /// `"asc"` sorts ascending, any other non-blank token descending. Blank means no sort.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "" => None,
            "asc" => Some(Self::Ascending),
            _ => Some(Self::Descending),
        }
    }
}

/// A validated listing request; `limit` and `page` are always at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u64,
    pub page: u64,
    pub sort: Option<PriceSort>,
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageMeta {
    /// Number of products matching the filter across all pages.
    pub total: u64,
    pub total_pages: u64,
    pub page: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<u64>,
    pub next_page: Option<u64>,
    pub limit: u64,
}

pub fn paginate(matched_count: u64, request: &PageRequest) -> PageMeta {
    let total_pages = matched_count.div_ceil(request.limit);
    let page = request.page;
    let has_prev_page = page > 1;
    let has_next_page = page < total_pages;

    PageMeta {
        total: matched_count,
        total_pages,
        page,
        has_prev_page,
        has_next_page,
        prev_page: has_prev_page.then(|| page - 1),
        next_page: has_next_page.then(|| page + 1),
        limit: request.limit,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn request(limit: u64, page: u64) -> PageRequest {
        PageRequest {
            limit,
            page,
            sort: None,
        }
    }

    #[rstest]
    #[case(0, 10, 0)]
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(25, 5, 5)]
    #[case(26, 5, 6)]
    fn total_pages_rounds_up(#[case] count: u64, #[case] limit: u64, #[case] expected: u64) {
        assert_eq!(paginate(count, &request(limit, 1)).total_pages, expected);
    }

    #[test]
    fn flags_follow_current_page_for_all_small_inputs() {
        for count in 0..40_u64 {
            for limit in 1..8_u64 {
                for page in 1..10_u64 {
                    let meta = paginate(count, &request(limit, page));
                    let expected_total = (count + limit - 1) / limit;

                    assert_eq!(meta.total_pages, expected_total);
                    assert_eq!(meta.has_prev_page, page > 1);
                    assert_eq!(meta.has_next_page, page < expected_total);
                    assert_eq!(meta.prev_page.is_some(), meta.has_prev_page);
                    assert_eq!(meta.next_page.is_some(), meta.has_next_page);
                }
            }
        }
    }

    #[test]
    fn middle_page_links_both_neighbours() {
        let meta = paginate(30, &request(10, 2));

        assert_eq!(meta.prev_page, Some(1));
        assert_eq!(meta.next_page, Some(3));
        assert_eq!(meta.limit, 10);
    }

    #[test]
    fn empty_result_has_no_neighbours() {
        let meta = paginate(0, &request(10, 1));

        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_prev_page);
        assert!(!meta.has_next_page);
        assert_eq!(meta.prev_page, None);
        assert_eq!(meta.next_page, None);
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(request(20, 1).offset(), 0);
        assert_eq!(request(20, 3).offset(), 40);
    }

    #[rstest]
    #[case("asc", Some(PriceSort::Ascending))]
    #[case("desc", Some(PriceSort::Descending))]
    #[case("ASC", Some(PriceSort::Descending))]
    #[case("price", Some(PriceSort::Descending))]
    #[case("", None)]
    fn sort_token_is_literal(#[case] token: &str, #[case] expected: Option<PriceSort>) {
        assert_eq!(PriceSort::from_token(token), expected);
    }
}
