//! Properties of the query-synced pager.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use catalog_client::pager::{DEFAULT_COUNT, MemoryNavigator, Navigator, Pager, leading_int};
use proptest::prelude::*;
use url::form_urlencoded;

fn param(query: &str, name: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

fn synced(query: &str, pages_count: u32) -> (Pager, MemoryNavigator) {
    let mut nav = MemoryNavigator::new(query);
    let mut pager = Pager::default();
    pager.sync(&mut nav, pages_count);
    (pager, nav)
}

#[test]
fn page_past_the_end_is_clamped() {
    let (pager, nav) = synced("page=9", 5);

    assert_eq!(pager.page(), 5);
    assert_eq!(param(&nav.query(), "page").as_deref(), Some("5"));
    assert_eq!(nav.history().len(), 1);
}

proptest! {
    #[test]
    fn missing_or_non_numeric_page_becomes_one(
        page in prop::option::of("[a-zA-Z]{0,6}"),
        pages_count in 0u32..50,
    ) {
        let query = page.map(|p| format!("page={p}")).unwrap_or_default();
        let (pager, nav) = synced(&query, pages_count);

        prop_assert_eq!(pager.page(), 1);
        let written = param(&nav.query(), "page");
        prop_assert_eq!(written.as_deref(), Some("1"));
    }

    #[test]
    fn page_never_exceeds_known_page_count(page in 1u32..10_000, pages_count in 1u32..100) {
        let (pager, _) = synced(&format!("page={page}&count=10"), pages_count);

        prop_assert_eq!(pager.page(), page.min(pages_count));
    }

    #[test]
    fn count_below_one_resets_to_default(count in -100i64..1) {
        let (pager, nav) = synced(&format!("page=1&count={count}"), 3);

        prop_assert_eq!(pager.count(), DEFAULT_COUNT);
        let expected = DEFAULT_COUNT.to_string();
        let count = param(&nav.query(), "count");
        prop_assert_eq!(count.as_deref(), Some(expected.as_str()));
    }

    #[test]
    fn corrections_keep_other_params(text in "[a-z ]{1,12}", page in -5i64..0) {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("searchString", &text)
            .append_pair("page", &page.to_string())
            .finish();
        let (_, nav) = synced(&query, 3);

        prop_assert_eq!(param(&nav.query(), "searchString"), Some(text));
        prop_assert_eq!(nav.history().len(), 1);
    }

    #[test]
    fn valid_queries_are_stable(page in 1u32..20, count in 1u32..100) {
        let query = format!("page={page}&count={count}");
        let mut nav = MemoryNavigator::new(query.clone());
        let mut pager = Pager::default();

        prop_assert!(!pager.sync(&mut nav, 20));
        prop_assert_eq!(nav.query(), query);
    }

    #[test]
    fn leading_int_ignores_trailing_garbage(n in 0i64..1_000_000, tail in "[a-z]{0,4}") {
        prop_assert_eq!(leading_int(&format!("{n}{tail}")), Some(n));
    }
}
