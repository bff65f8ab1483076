//! Async client for the sdamgia.ru problem bank.
//!
//! This crate provides the HTTP fetch pipeline, page extraction, random
//! problem selection, search by image, test generation and problem
//! rendering. [`SdamClient`] ties them together.

pub mod client;
pub mod extract;
pub mod fetch;
pub mod generate;
pub mod ocr;
pub mod random;
pub mod render;
pub mod source;

pub use client::SdamClient;
pub use extract::{ProblemPage, extract_problem_ids, parse_catalog, parse_problem_page};
pub use fetch::{FetchClient, FetchConfig, FetchResponse, RetryPolicy};
pub use generate::{PdfFlag, PdfOptions, TestPlan};
pub use ocr::{OCR_SEARCH_CONCURRENCY, TesseractRecognizer, TextRecognizer};
pub use random::{COLLECT_CONCURRENCY, collect_candidates, pages_for_period, random_problem};
pub use render::{ProblemRenderer, RenderBackend, RenderError, RenderRequest, RenderSettings};
pub use source::ProblemSource;
