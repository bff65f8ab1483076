//! Search by image: OCR the picture of a problem, then look up phrases.
//!
//! Recognized text is cut into sliding windows of [`PHRASE_WINDOW`] words.
//! Every full window is searched on the site concurrently and the matching
//! problem ids are merged.

use futures_util::future::join_all;
use sdamgia_core::Error;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};

use crate::random::CandidatePool;
use crate::source::ProblemSource;

/// Maximum phrase searches in flight.
pub const OCR_SEARCH_CONCURRENCY: usize = 20;

/// Words per searched phrase.
pub const PHRASE_WINDOW: usize = 10;

const TESSERACT_LANGUAGES: &str = "rus+eng";

/// Blocking image-to-text recognizer.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &Path) -> Result<String, Error>;
}

/// Runs the `tesseract` command line tool.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    binary: PathBuf,
    languages: String,
}

impl TesseractRecognizer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into(), languages: TESSERACT_LANGUAGES.to_string() }
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &Path) -> Result<String, Error> {
        let output = Command::new(&self.binary)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.languages)
            .output()
            .map_err(|e| Error::Ocr(format!("failed to run {}: {e}", self.binary.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Ocr(format!("tesseract exited with {}: {}", output.status, stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Recognize `image` off the async runtime and split the text into words.
pub async fn recognize_words(recognizer: Arc<dyn TextRecognizer>, image: PathBuf) -> Result<Vec<String>, Error> {
    let text = tokio::task::spawn_blocking(move || recognizer.recognize(&image))
        .await
        .map_err(|e| Error::Internal(format!("OCR task failed: {e}")))??;

    Ok(text.split_whitespace().map(str::to_string).collect())
}

/// Every full window of [`PHRASE_WINDOW`] consecutive words, joined by spaces.
///
/// Text shorter than one window produces no phrases.
pub fn phrase_windows(words: &[String]) -> Vec<String> {
    words.windows(PHRASE_WINDOW).map(|window| window.join(" ")).collect()
}

/// Search every phrase window of `words` and merge the found problem ids.
///
/// A window whose search fails at the HTTP layer is skipped; any other error
/// fails the whole search. Ids are unique and kept in completion order.
pub async fn search_by_words<S>(source: &S, subject: &str, words: &[String]) -> Result<Vec<String>, Error>
where
    S: ProblemSource + ?Sized,
{
    source.subjects().resolve(subject)?;

    let phrases = phrase_windows(words);
    if phrases.is_empty() {
        tracing::debug!(subject, words = words.len(), "too few words for a phrase search");
        return Ok(Vec::new());
    }

    let semaphore = Semaphore::new(OCR_SEARCH_CONCURRENCY);
    let found = Mutex::new(CandidatePool::default());

    let searches = phrases.iter().map(|phrase| {
        let semaphore = &semaphore;
        let found = &found;
        async move {
            let result = {
                let _permit = semaphore.acquire().await.map_err(|e| Error::Internal(e.to_string()))?;
                source.search_page(subject, phrase, 1).await
            };

            match result {
                Ok(ids) => {
                    found.lock().await.extend(ids);
                    Ok(())
                }
                Err(e) if e.is_http() => {
                    tracing::debug!(subject, phrase = %phrase, error = %e, "phrase search failed, skipping");
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
    });

    join_all(searches).await.into_iter().collect::<Result<(), Error>>()?;

    let ids = found.into_inner().into_vec();
    tracing::debug!(subject, phrases = phrases.len(), found = ids.len(), "image search finished");
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::fake::FakeSource;
    use std::collections::HashSet;

    struct FixedText(&'static str);

    impl TextRecognizer for FixedText {
        fn recognize(&self, _image: &Path) -> Result<String, Error> {
            Ok(self.0.to_string())
        }
    }

    fn words(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("w{i}")).collect()
    }

    fn window(start: usize) -> String {
        (start..start + PHRASE_WINDOW).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_phrase_windows_of_fifteen_words() {
        let phrases = phrase_windows(&words(15));
        assert_eq!(phrases.len(), 6);
        assert_eq!(phrases[0], window(1));
        assert_eq!(phrases[5], window(6));
    }

    #[test]
    fn test_phrase_windows_short_text() {
        assert!(phrase_windows(&words(9)).is_empty());
        assert_eq!(phrase_windows(&words(10)), vec![window(1)]);
        assert!(phrase_windows(&[]).is_empty());
    }

    #[tokio::test]
    async fn test_recognize_words_splits_on_whitespace() {
        let recognizer: Arc<dyn TextRecognizer> = Arc::new(FixedText("Найдите  значение\nвыражения\t2 + 2\n"));
        let words = recognize_words(recognizer, PathBuf::from("task.png")).await.unwrap();
        assert_eq!(words, vec!["Найдите", "значение", "выражения", "2", "+", "2"]);
    }

    #[tokio::test]
    async fn test_missing_tesseract_binary_is_ocr_error() {
        let recognizer: Arc<dyn TextRecognizer> =
            Arc::new(TesseractRecognizer::new("/nonexistent/bin/tesseract-for-tests"));
        let result = recognize_words(recognizer, PathBuf::from("task.png")).await;
        assert!(matches!(result, Err(Error::Ocr(_))));
    }

    #[tokio::test]
    async fn test_searches_every_full_window() {
        let mut source = FakeSource::default();
        source.search_results.insert(window(1), vec!["11".into(), "12".into()]);
        source.search_results.insert(window(4), vec!["12".into(), "40".into()]);
        source.search_results.insert(window(6), vec!["60".into()]);

        let mut ids = search_by_words(&source, "math", &words(15)).await.unwrap();
        ids.sort();
        assert_eq!(ids, vec!["11", "12", "40", "60"]);

        let searched: HashSet<String> = source.calls().searches.into_iter().collect();
        let expected: HashSet<String> = (1..=6).map(window).collect();
        assert_eq!(searched, expected);
    }

    #[tokio::test]
    async fn test_failed_windows_are_dropped() {
        let mut source = FakeSource::default();
        source.search_results.insert(window(1), vec!["11".into()]);
        source.search_results.insert(window(3), vec!["33".into()]);
        source.failing_phrases.insert(window(2));
        source.failing_phrases.insert(window(5));
        source.max_delay_ms = 2;

        let mut ids = search_by_words(&source, "math", &words(15)).await.unwrap();
        ids.sort();
        assert_eq!(ids, vec!["11", "33"]);
        assert_eq!(source.calls().searches.len(), 6);
    }

    #[tokio::test]
    async fn test_non_http_window_error_fails_search() {
        let mut source = FakeSource::default();
        source.search_results.insert(window(1), vec!["11".into()]);
        source.malformed_phrases.insert(window(2));

        let result = search_by_words(&source, "math", &words(12)).await;
        assert!(matches!(result, Err(Error::Structure(_))));
    }

    #[tokio::test]
    async fn test_search_stays_within_concurrency_limit() {
        let mut source = FakeSource::default();
        source.max_delay_ms = 3;

        let ids = search_by_words(&source, "math", &words(60)).await.unwrap();
        assert!(ids.is_empty());
        assert_eq!(source.calls().searches.len(), 51);
        assert!(source.max_in_flight() <= OCR_SEARCH_CONCURRENCY);
        assert!(source.max_in_flight() > 1);
    }

    #[tokio::test]
    async fn test_short_text_searches_nothing() {
        let source = FakeSource::default();
        let ids = search_by_words(&source, "math", &words(4)).await.unwrap();
        assert!(ids.is_empty());
        assert!(source.calls().searches.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_subject() {
        let source = FakeSource::default();
        let result = search_by_words(&source, "astro", &words(15)).await;
        assert!(matches!(result, Err(Error::UnknownSubject(_))));
        assert!(source.calls().searches.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_merge_has_no_duplicates_under_jitter() {
        let mut source = FakeSource::default();
        for start in 1..=21 {
            let ids = (0..4).map(|k| format!("{}", (start + k) % 7)).collect();
            source.search_results.insert(window(start), ids);
        }
        source.max_delay_ms = 3;

        for _ in 0..20 {
            let ids = search_by_words(&source, "math", &words(30)).await.unwrap();
            let unique: HashSet<&String> = ids.iter().collect();
            assert_eq!(unique.len(), ids.len());
            assert_eq!(ids.len(), 7);
        }
    }
}
