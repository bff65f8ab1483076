//! High-level problem-bank client.

use sdamgia_core::{AppConfig, Catalog, Error, Problem, SubjectRegistry};
use std::path::Path;
use std::sync::Arc;
use url::Url;

use crate::extract::{extract_problem_ids, parse_catalog, parse_problem_page};
use crate::fetch::{FetchClient, FetchConfig, location, resolve_location, test_id_from_location};
use crate::generate::{PdfOptions, TestPlan};
use crate::ocr::{TesseractRecognizer, TextRecognizer, recognize_words, search_by_words};
use crate::random::random_problem;
use crate::render::{RenderRequest, RenderSettings, renderer_for};
use crate::source::ProblemSource;

/// Async client for the sdamgia problem bank.
///
/// Every operation takes a subject code and resolves it against the
/// client's [`SubjectRegistry`] before doing any I/O.
pub struct SdamClient {
    fetch: FetchClient,
    subjects: SubjectRegistry,
    recognizer: Arc<dyn TextRecognizer>,
    render: RenderSettings,
}

impl SdamClient {
    /// Client for the public site configured from `config`.
    pub fn new(config: &AppConfig) -> Result<Self, Error> {
        Ok(Self {
            fetch: FetchClient::new(FetchConfig::from(config))?,
            subjects: SubjectRegistry::default(),
            recognizer: Arc::new(TesseractRecognizer::new(config.tesseract_path.clone())),
            render: RenderSettings::from(config),
        })
    }

    /// Replace the subject registry.
    pub fn with_subjects(mut self, subjects: SubjectRegistry) -> Self {
        self.subjects = subjects;
        self
    }

    /// Replace the OCR engine used by [`search_by_image`](Self::search_by_image).
    pub fn with_recognizer(mut self, recognizer: Arc<dyn TextRecognizer>) -> Self {
        self.recognizer = recognizer;
        self
    }

    pub fn with_render_settings(mut self, render: RenderSettings) -> Self {
        self.render = render;
        self
    }

    pub fn subjects(&self) -> &SubjectRegistry {
        &self.subjects
    }

    fn endpoint(&self, subject: &str, path: &str) -> Result<(&Url, Url), Error> {
        let origin = self.subjects.resolve(subject)?;
        let url = origin
            .join(path)
            .map_err(|e| Error::Internal(format!("bad endpoint {path} for {origin}: {e}")))?;
        Ok((origin, url))
    }

    /// Fetch a problem.
    ///
    /// Returns `Ok(None)` when the page has no problem block. With `render`,
    /// the problem is also rendered to `render.path` by the chosen backend.
    pub async fn get_problem_by_id(
        &self, subject: &str, id: &str, render: Option<&RenderRequest>,
    ) -> Result<Option<Problem>, Error> {
        let (origin, url) = self.endpoint(subject, "/problem")?;
        let response = self.fetch.get(&url, &[("id", id.to_string())]).await?;

        let Some(page) = parse_problem_page(&response.bytes, id, origin, render.is_some())? else {
            tracing::debug!(subject, id, "no problem block");
            return Ok(None);
        };

        if let (Some(request), Some(fragment)) = (render, page.fragment.as_deref()) {
            let renderer = renderer_for(request.backend, &self.render, self.fetch.http())?;
            renderer.render(id, fragment, &request.path).await?;
            tracing::info!(subject, id, backend = %request.backend, path = %request.path.display(), "rendered problem");
        }

        Ok(Some(page.problem))
    }

    /// Problem ids on one page of text search results.
    pub async fn search(&self, subject: &str, phrase: &str, page: u32) -> Result<Vec<String>, Error> {
        let (_, url) = self.endpoint(subject, "/search")?;
        let response = self
            .fetch
            .get(&url, &[("search", phrase.to_string()), ("page", page.to_string())])
            .await?;
        Ok(extract_problem_ids(&response.bytes))
    }

    /// Problem ids of a generated test.
    pub async fn get_test_by_id(&self, subject: &str, testid: &str) -> Result<Vec<String>, Error> {
        let (_, url) = self.endpoint(subject, "/test")?;
        let response = self.fetch.get(&url, &[("id", testid.to_string())]).await?;
        Ok(extract_problem_ids(&response.bytes))
    }

    /// Problem ids on one page of a category listing, newest first.
    pub async fn get_category_by_id(&self, subject: &str, categoryid: &str, page: u32) -> Result<Vec<String>, Error> {
        let (_, url) = self.endpoint(subject, "/test")?;
        let query = [
            ("filter", "all".to_string()),
            ("theme", categoryid.to_string()),
            ("page", page.to_string()),
        ];
        let response = self.fetch.get(&url, &query).await?;
        Ok(extract_problem_ids(&response.bytes))
    }

    /// Topics and categories of a subject.
    pub async fn get_catalog(&self, subject: &str) -> Result<Catalog, Error> {
        let (_, url) = self.endpoint(subject, "/prob_catalog")?;
        let response = self.fetch.get(&url, &[]).await?;
        parse_catalog(&response.bytes)
    }

    /// Generate a test and return its numeric id.
    pub async fn generate_test(&self, subject: &str, plan: &TestPlan) -> Result<String, Error> {
        let (origin, url) = self.endpoint(subject, "/test")?;

        let topic_count = if plan.needs_catalog() { self.get_catalog(subject).await?.len() } else { 0 };
        let query = plan.to_query(topic_count);
        let query: Vec<(&str, String)> = query.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();

        let response = self.fetch.get_redirect(&url, &query).await?;
        let testid = test_id_from_location(origin, location(&response)?)?;
        tracing::info!(subject, testid = %testid, "generated test");
        Ok(testid)
    }

    /// Absolute URL of the printable PDF of a test.
    pub async fn generate_pdf(&self, subject: &str, testid: &str, options: &PdfOptions) -> Result<String, Error> {
        let (origin, url) = self.endpoint(subject, "/test")?;
        let response = self.fetch.get_redirect(&url, &options.to_query(testid)).await?;
        let pdf = resolve_location(origin, location(&response)?)?;
        Ok(pdf.to_string())
    }

    /// Find problems whose text matches the text recognized in an image.
    pub async fn search_by_image(&self, subject: &str, image: &Path) -> Result<Vec<String>, Error> {
        self.subjects.resolve(subject)?;
        let words = recognize_words(Arc::clone(&self.recognizer), image.to_path_buf()).await?;
        tracing::debug!(subject, words = words.len(), "recognized image text");
        search_by_words(self, subject, &words).await
    }

    /// Random problem of a topic. See [`random_problem`].
    pub async fn get_random_problem(
        &self, subject: &str, topic_id: &str, period_days: i64, seed: Option<u64>,
    ) -> Result<Option<Problem>, Error> {
        random_problem(self, subject, topic_id, period_days, seed).await
    }
}

#[async_trait::async_trait]
impl ProblemSource for SdamClient {
    fn subjects(&self) -> &SubjectRegistry {
        &self.subjects
    }

    async fn catalog(&self, subject: &str) -> Result<Catalog, Error> {
        self.get_catalog(subject).await
    }

    async fn category_page(&self, subject: &str, category_id: &str, page: u32) -> Result<Vec<String>, Error> {
        self.get_category_by_id(subject, category_id, page).await
    }

    async fn problem(&self, subject: &str, id: &str) -> Result<Option<Problem>, Error> {
        self.get_problem_by_id(subject, id, None).await
    }

    async fn search_page(&self, subject: &str, phrase: &str, page: u32) -> Result<Vec<String>, Error> {
        self.search(subject, phrase, page).await
    }
}
