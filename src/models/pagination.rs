use serde::{Deserialize, Serialize};

/// One page of a listing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl<T> Pagination<T> {
    /// Whether another page follows this one (pages are zero-based)
    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pagination_deserializes() {
        let page: Pagination<String> = serde_json::from_value(json!({
            "items": ["a", "b"],
            "page": 0,
            "size": 2,
            "totalItems": 5,
            "totalPages": 3
        }))
        .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_items, 5);
        assert!(page.has_next());
    }

    #[test]
    fn test_last_page_has_no_next() {
        let page = Pagination::<u8> {
            items: vec![],
            page: 2,
            size: 2,
            total_items: 5,
            total_pages: 3,
        };
        assert!(!page.has_next());
    }
}
