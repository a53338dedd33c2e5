//! Offset pagination over a fully materialized list.
//!
//! SCIM list requests use a 1-based `startIndex` and a `count`. The store
//! returns everything, so the window is cut here and the page still reports
//! the size of the whole list.

use serde::{Deserialize, Serialize};

/// Default page size when a client does not send `count`.
pub const DEFAULT_COUNT: usize = 100;

/// List request parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequestParams {
    /// 1-based index of the first result. Zero is treated as 1.
    #[serde(default = "default_start_index")]
    pub start_index: usize,
    /// Maximum number of results on the page.
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_start_index() -> usize {
    1
}

fn default_count() -> usize {
    DEFAULT_COUNT
}

impl Default for ListRequestParams {
    fn default() -> Self {
        Self {
            start_index: default_start_index(),
            count: default_count(),
        }
    }
}

impl ListRequestParams {
    pub fn new(start_index: usize, count: usize) -> Self {
        Self { start_index, count }
    }
}

/// A bounded window over a list plus the true size of the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_results: usize,
    pub resources: Vec<T>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            total_results: 0,
            resources: Vec::new(),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            total_results: self.total_results,
            resources: self.resources.into_iter().map(f).collect(),
        }
    }
}

/// Cut the page described by `params` out of `items`.
///
/// `from = max(start_index - 1, 0)` and `count` is clamped to what is left
/// after `from`. A start beyond the end yields an empty page.
pub fn paginate<T>(items: Vec<T>, params: &ListRequestParams) -> Page<T> {
    let total_results = items.len();
    let from = params.start_index.saturating_sub(1);
    if from >= total_results {
        return Page {
            total_results,
            resources: Vec::new(),
        };
    }

    let count = params.count.min(total_results - from);
    let to = from + count;

    Page {
        total_results,
        resources: items.into_iter().skip(from).take(to - from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn twenty() -> Vec<usize> {
        (1..=20).collect()
    }

    #[test]
    fn test_first_page() {
        let page = paginate(twenty(), &ListRequestParams::new(1, 10));
        assert_eq!(page.total_results, 20);
        assert_eq!(page.resources, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_tail_is_clamped() {
        let page = paginate(twenty(), &ListRequestParams::new(15, 10));
        assert_eq!(page.total_results, 20);
        assert_eq!(page.resources, (15..=20).collect::<Vec<_>>());
    }

    #[test]
    fn test_start_beyond_end() {
        let page = paginate(twenty(), &ListRequestParams::new(25, 5));
        assert_eq!(page.total_results, 20);
        assert!(page.resources.is_empty());

        let page = paginate(twenty(), &ListRequestParams::new(21, 5));
        assert!(page.resources.is_empty());
    }

    #[test]
    fn test_zero_start_index_behaves_like_one() {
        let page = paginate(twenty(), &ListRequestParams::new(0, 3));
        assert_eq!(page.resources, vec![1, 2, 3]);
    }

    #[test]
    fn test_zero_count() {
        let page = paginate(twenty(), &ListRequestParams::new(1, 0));
        assert_eq!(page.total_results, 20);
        assert!(page.resources.is_empty());
    }

    #[test]
    fn test_exact_fit() {
        let page = paginate(twenty(), &ListRequestParams::new(11, 10));
        assert_eq!(page.resources, (11..=20).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_list() {
        let page = paginate(Vec::<usize>::new(), &ListRequestParams::default());
        assert_eq!(page, Page::empty());
    }

    #[test]
    fn test_params_defaults_from_json() {
        let params: ListRequestParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, ListRequestParams::new(1, DEFAULT_COUNT));

        let params: ListRequestParams =
            serde_json::from_str(r#"{"startIndex": 5, "count": 2}"#).unwrap();
        assert_eq!(params, ListRequestParams::new(5, 2));
    }

    #[test]
    fn test_page_map() {
        let page = paginate(twenty(), &ListRequestParams::new(1, 2)).map(|n| n * 10);
        assert_eq!(page.resources, vec![10, 20]);
        assert_eq!(page.total_results, 20);
    }
}
