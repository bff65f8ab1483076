//! Problem id harvesting from listing pages.
//!
//! Search results, generated tests and category listings all mark each
//! problem with a `span.prob_nums` header whose last word is the id.

use scraper::Selector;
use std::sync::LazyLock;

use super::{decode, selector, text_of};

static PROB_NUMS: LazyLock<Selector> = LazyLock::new(|| selector("span.prob_nums"));

/// Extract problem ids from a listing page, in page order.
///
/// Headers without any text are skipped.
pub fn extract_problem_ids(html: &[u8]) -> Vec<String> {
    let document = decode(html);

    document
        .select(&PROB_NUMS)
        .filter_map(|span| text_of(span).split_whitespace().last().map(str::to_string))
        .collect()
}
