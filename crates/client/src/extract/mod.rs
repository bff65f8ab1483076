//! Field extraction from problem-bank pages.
//!
//! Every function here is pure: bytes in, records out. Pages are decoded with
//! `scraper` and the parsed document never outlives the call, so extraction
//! can sit between awaits in `Send` futures.
//!
//! ### Extractors
//! - [`problem::parse_problem_page`]: `div.prob_maindiv` → [`Problem`](sdamgia_core::Problem)
//! - [`catalog::parse_catalog`]: `/prob_catalog` → [`Catalog`](sdamgia_core::Catalog)
//! - [`ids::extract_problem_ids`]: search, test and category listings → ids
//!
//! Missing substructure that a page of that kind must have is reported as
//! [`Error::Structure`](sdamgia_core::Error::Structure).

pub mod catalog;
pub mod ids;
pub mod images;
pub mod problem;

pub use catalog::parse_catalog;
pub use ids::extract_problem_ids;
pub use images::{normalize_image_src, rewrite_image_sources};
pub use problem::{ProblemPage, parse_problem_page};

use scraper::{ElementRef, Html, Selector};

/// Decode fetched bytes into a document tree.
pub fn decode(bytes: &[u8]) -> Html {
    Html::parse_document(&String::from_utf8_lossy(bytes))
}

/// Compile a static CSS selector.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("invalid selector")
}

/// Concatenated text of an element and its descendants.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}
