//! Paging state kept in sync with the URL query string.
//!
//! The query string is the source of truth for `page` and `count`. A
//! [`Pager`] reads them through a [`Navigator`], corrects invalid or out of
//! range values and writes corrections back with
//! [`replace`](Navigator::replace), so no history entry is created.
//!
//! ```ignore
//! let mut pager = Pager::default();
//! pager.sync(&mut navigator, pages_count);
//! store.send(CollectionsAction::Load(pager.request())).await?;
//! ```

use crate::api::PageRequest;
use url::form_urlencoded;

/// Page used when the query has none
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the query has none
pub const DEFAULT_COUNT: u32 = 10;

/// Access to the current location's query string
pub trait Navigator {
    /// False until the location is known; nothing is reconciled before
    fn is_ready(&self) -> bool;

    /// Current query string, without the leading `?`
    fn query(&self) -> String;

    /// Navigate to the current path with a new query, adding a history entry
    fn push(&mut self, query: String);

    /// Swap the current query without adding a history entry
    fn replace(&mut self, query: String);
}

/// In-memory navigator with a history stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryNavigator {
    ready: bool,
    history: Vec<String>,
}

impl MemoryNavigator {
    /// A ready navigator positioned at `query`
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            ready: true,
            history: vec![query.into()],
        }
    }

    /// A navigator whose location is not known yet
    #[must_use]
    pub fn not_ready() -> Self {
        Self {
            ready: false,
            history: vec![String::new()],
        }
    }

    /// Mark the location as known
    pub fn set_ready(&mut self) {
        self.ready = true;
    }

    /// Every query visited, oldest first
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Navigator for MemoryNavigator {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn query(&self) -> String {
        self.history.last().cloned().unwrap_or_default()
    }

    fn push(&mut self, query: String) {
        self.history.push(query);
    }

    fn replace(&mut self, query: String) {
        match self.history.last_mut() {
            Some(current) => *current = query,
            None => self.history.push(query),
        }
    }
}

/// Integer at the start of `raw`, ignoring leading whitespace
///
/// `"12abc"` reads as 12, `"-3"` as -3, `"abc"` and `""` as nothing.
/// Values past the `i64` range saturate.
#[must_use]
pub fn leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value = rest[..digits]
        .bytes()
        .fold(0_i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d - b'0')));
    Some(if negative { -value } else { value })
}

fn param(query: &str, name: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// `query` with `updates` applied, keeping every other parameter in place
fn with_params(query: &str, updates: &[(&str, String)]) -> String {
    let mut pending: Vec<(&str, &String)> = updates.iter().map(|(k, v)| (*k, v)).collect();
    let mut out = form_urlencoded::Serializer::new(String::new());
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if let Some(pos) = pending.iter().position(|(name, _)| *name == key) {
            let (name, new_value) = pending.remove(pos);
            out.append_pair(name, new_value);
        } else if !updates.iter().any(|(name, _)| *name == key) {
            out.append_pair(&key, &value);
        }
    }
    for (name, value) in pending {
        out.append_pair(name, value);
    }
    out.finish()
}

fn to_u32(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Current page and page size, as last read from the query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pager {
    page: Option<u32>,
    count: Option<u32>,
}

impl Pager {
    /// Current page, [`DEFAULT_PAGE`] before the first sync
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    /// Current page size, [`DEFAULT_COUNT`] before the first sync
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count.unwrap_or(DEFAULT_COUNT)
    }

    /// True once a query has been read
    #[must_use]
    pub const fn is_synced(&self) -> bool {
        self.page.is_some() && self.count.is_some()
    }

    /// Page and size as sent to list endpoints
    #[must_use]
    pub fn request(&self) -> PageRequest {
        PageRequest {
            page: self.page(),
            count: self.count(),
        }
    }

    /// Read `page` and `count` from the query and correct them
    ///
    /// Call whenever the query or `pages_count` changes. Missing, invalid
    /// or out of range values are replaced: page below 1 or unreadable
    /// becomes 1, page above a known `pages_count` becomes `pages_count`,
    /// count below 1 or unreadable becomes [`DEFAULT_COUNT`]. Returns true
    /// when a corrected query was written back.
    pub fn sync(&mut self, nav: &mut impl Navigator, pages_count: u32) -> bool {
        if !nav.is_ready() {
            return false;
        }
        let query = nav.query();
        let raw_page = param(&query, "page");
        let raw_count = param(&query, "count");

        let mut page = match raw_page.as_deref().and_then(leading_int) {
            Some(p) if p >= 1 => to_u32(p),
            _ => DEFAULT_PAGE,
        };
        if pages_count > 0 && page > pages_count {
            page = pages_count;
        }
        let count = match raw_count.as_deref().and_then(leading_int) {
            Some(c) if c >= 1 => to_u32(c),
            _ => DEFAULT_COUNT,
        };

        self.page = Some(page);
        self.count = Some(count);

        let page_text = page.to_string();
        let count_text = count.to_string();
        if raw_page.as_deref() == Some(page_text.as_str())
            && raw_count.as_deref() == Some(count_text.as_str())
        {
            return false;
        }

        tracing::debug!(page, count, "Correcting paging query");
        nav.replace(with_params(
            &query,
            &[("page", page_text), ("count", count_text)],
        ));
        true
    }

    /// Navigate to page `to`, keeping the other parameters
    pub fn change_page(&mut self, nav: &mut impl Navigator, to: u32) {
        self.page = Some(to);
        let query = nav.query();
        nav.push(with_params(&query, &[("page", to.to_string())]));
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn leading_int_reads_like_parse_int() {
        assert_eq!(leading_int("12"), Some(12));
        assert_eq!(leading_int("  7px"), Some(7));
        assert_eq!(leading_int("-3"), Some(-3));
        assert_eq!(leading_int("abc"), None);
        assert_eq!(leading_int(""), None);
        assert_eq!(leading_int("-"), None);
        assert_eq!(leading_int("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn valid_query_is_left_alone() {
        let mut nav = MemoryNavigator::new("page=2&count=20");
        let mut pager = Pager::default();

        assert!(!pager.sync(&mut nav, 5));
        assert_eq!(pager.request(), PageRequest { page: 2, count: 20 });
        assert_eq!(nav.history(), ["page=2&count=20"]);
    }

    #[test]
    fn corrections_keep_other_params_and_history() {
        let mut nav = MemoryNavigator::new("searchString=lamp&page=0");
        let mut pager = Pager::default();

        assert!(pager.sync(&mut nav, 3));
        assert_eq!(nav.history(), ["searchString=lamp&page=1&count=10"]);
    }

    #[test]
    fn unknown_page_count_does_not_clamp() {
        let mut nav = MemoryNavigator::new("page=40&count=10");
        let mut pager = Pager::default();

        assert!(!pager.sync(&mut nav, 0));
        assert_eq!(pager.page(), 40);

        assert!(pager.sync(&mut nav, 4));
        assert_eq!(pager.page(), 4);
    }

    #[test]
    fn not_ready_navigator_is_ignored() {
        let mut nav = MemoryNavigator::not_ready();
        let mut pager = Pager::default();

        assert!(!pager.sync(&mut nav, 5));
        assert!(!pager.is_synced());

        nav.set_ready();
        assert!(pager.sync(&mut nav, 5));
        assert!(pager.is_synced());
    }

    #[test]
    fn change_page_pushes() {
        let mut nav = MemoryNavigator::new("page=1&count=10");
        let mut pager = Pager::default();
        pager.sync(&mut nav, 5);

        pager.change_page(&mut nav, 3);

        assert_eq!(nav.history(), ["page=1&count=10", "page=3&count=10"]);
        assert_eq!(pager.page(), 3);
    }
}
