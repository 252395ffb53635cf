use serde::{Deserialize, Serialize};

/// One page of a server-paginated collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    /// Zero-based page index.
    pub number: u32,
    pub size: u32,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_prev(&self) -> bool {
        self.number > 0
    }

    pub fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }

    /// `Page 1 of 3`. An empty result reads as `Page 1 of 1`.
    pub fn position_label(&self) -> String {
        format!("Page {} of {}", self.number + 1, self.total_pages.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: u32, total_pages: u32) -> Page<u8> {
        Page {
            items: vec![],
            total_elements: 0,
            total_pages,
            number,
            size: 10,
        }
    }

    #[test]
    fn navigation_bounds() {
        assert!(!page(0, 3).has_prev());
        assert!(page(0, 3).has_next());
        assert!(page(2, 3).has_prev());
        assert!(!page(2, 3).has_next());
        assert!(!page(0, 0).has_next());
        assert_eq!(page(0, 0).position_label(), "Page 1 of 1");
    }
}
