//! The page-level operations the orchestration layers are built on.
//!
//! The random selector, the candidate collector and OCR search only talk to
//! the site through this trait, so they can be driven by an in-memory source.

use sdamgia_core::{Catalog, Error, Problem, SubjectRegistry};

/// Read-only access to a problem bank.
#[async_trait::async_trait]
pub trait ProblemSource: Send + Sync {
    /// Subject registry used to validate subject codes.
    fn subjects(&self) -> &SubjectRegistry;

    /// Freshly fetched catalog of a subject.
    async fn catalog(&self, subject: &str) -> Result<Catalog, Error>;

    /// Problem ids listed on one page of a category.
    async fn category_page(&self, subject: &str, category_id: &str, page: u32) -> Result<Vec<String>, Error>;

    /// Full problem, or `None` when the page has no problem block.
    async fn problem(&self, subject: &str, id: &str) -> Result<Option<Problem>, Error>;

    /// Problem ids on one page of text search results.
    async fn search_page(&self, subject: &str, phrase: &str, page: u32) -> Result<Vec<String>, Error>;
}
