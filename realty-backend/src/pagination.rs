//! Pagination helpers for the external listings API.
//!
//! The API reports navigation as absolute `next_page_url` /
//! `previous_page_url` links; we only care about their `page` query value.

use serde::Serialize;
use url::Url;

/// Window size for the numbered page strip.
const MAX_DISPLAY: u32 = 5;

/// One entry in a rendered page strip: either a page number or the gap
/// marker before the final page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageItem {
    Number(u32),
    Gap(&'static str),
}

impl PageItem {
    fn gap() -> Self {
        PageItem::Gap("...")
    }
}

/// Pull the `page` query parameter out of a pagination link.
pub fn extract_page_param(link: &str) -> Option<u32> {
    let parsed = Url::parse(link)
        .or_else(|_| Url::parse("http://relative.invalid").unwrap().join(link))
        .ok()?;

    parsed
        .query_pairs()
        .find(|(k, _)| k == "page")
        .and_then(|(_, v)| v.parse().ok())
}

/// Build the numbered page strip shown under listing grids: a window of up
/// to `MAX_DISPLAY` pages around the current one, with the last page kept
/// reachable behind a gap marker.
pub fn page_range(current: u32, last: u32) -> Vec<PageItem> {
    if last == 0 {
        return Vec::new();
    }

    if last <= MAX_DISPLAY + 1 {
        return (1..=last).map(PageItem::Number).collect();
    }

    let start = current.saturating_sub(2).max(1);
    let end = (start + MAX_DISPLAY - 1).min(last - 1);

    let mut items: Vec<PageItem> = (start..=end).map(PageItem::Number).collect();
    if !items.contains(&PageItem::Number(last)) {
        items.push(PageItem::gap());
        items.push(PageItem::Number(last));
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(range: &[PageItem]) -> Vec<u32> {
        range
            .iter()
            .filter_map(|item| match item {
                PageItem::Number(n) => Some(*n),
                PageItem::Gap(_) => None,
            })
            .collect()
    }

    #[test]
    fn short_ranges_list_every_page() {
        assert_eq!(numbers(&page_range(1, 4)), vec![1, 2, 3, 4]);
        assert_eq!(numbers(&page_range(3, 6)), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn long_ranges_window_around_current() {
        let range = page_range(10, 40);
        assert_eq!(
            range,
            vec![
                PageItem::Number(8),
                PageItem::Number(9),
                PageItem::Number(10),
                PageItem::Number(11),
                PageItem::Number(12),
                PageItem::Gap("..."),
                PageItem::Number(40),
            ]
        );
    }

    #[test]
    fn first_page_window_starts_at_one() {
        let range = page_range(1, 40);
        assert_eq!(numbers(&range), vec![1, 2, 3, 4, 5, 40]);
        assert!(range.contains(&PageItem::Gap("...")));
    }

    #[test]
    fn empty_result_set_has_no_pages() {
        assert!(page_range(1, 0).is_empty());
    }

    #[test]
    fn extracts_page_from_absolute_links() {
        assert_eq!(
            extract_page_param("https://api.example.com/properties?page=7&size=50"),
            Some(7)
        );
        assert_eq!(
            extract_page_param("https://api.example.com/properties"),
            None
        );
    }

    #[test]
    fn extracts_page_from_relative_links() {
        assert_eq!(extract_page_param("/api/properties?page=3"), Some(3));
        assert_eq!(extract_page_param("?page=12"), Some(12));
    }
}
