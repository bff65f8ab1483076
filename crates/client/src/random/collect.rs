//! Concurrent candidate collection across category listings.

use futures_util::future::join_all;
use sdamgia_core::{Error, find_topic};
use std::collections::HashSet;
use tokio::sync::{Mutex, Semaphore};

use crate::source::ProblemSource;

/// Maximum category pages fetched at once.
pub const COLLECT_CONCURRENCY: usize = 10;

/// Deduplicating, insertion-ordered set of problem ids.
#[derive(Debug, Default, Clone)]
pub struct CandidatePool {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl CandidatePool {
    /// Add an id; returns `false` if it was already present.
    pub fn insert(&mut self, id: String) -> bool {
        if self.seen.contains(&id) {
            return false;
        }
        self.seen.insert(id.clone());
        self.order.push(id);
        true
    }

    /// Add ids in order, skipping ones already present.
    pub fn extend<I: IntoIterator<Item = String>>(&mut self, ids: I) {
        for id in ids {
            self.insert(id);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in insertion order.
    pub fn into_vec(self) -> Vec<String> {
        self.order
    }
}

/// Collect the unique problem ids of a topic.
///
/// Fetches the catalog, then every page `1..=pages_per_category` of every
/// category of `topic_id`. An unknown topic or a topic without categories
/// yields an empty list.
pub async fn collect_candidates<S>(
    source: &S, subject: &str, topic_id: &str, pages_per_category: u32,
) -> Result<Vec<String>, Error>
where
    S: ProblemSource + ?Sized,
{
    let catalog = source.catalog(subject).await?;

    let Some(topic) = find_topic(&catalog, topic_id) else {
        tracing::debug!(subject, topic_id, "topic not in catalog");
        return Ok(Vec::new());
    };

    let category_ids: Vec<&str> = topic.categories.iter().map(|c| c.category_id.as_str()).collect();
    collect_from_categories(source, subject, &category_ids, pages_per_category).await
}

/// Collect unique problem ids from the given categories.
///
/// Pages are fetched concurrently, at most [`COLLECT_CONCURRENCY`] at a time.
/// Ids are kept in completion order. A failed page fails the collection once
/// every in-flight page has finished; an empty page is not a failure.
pub async fn collect_from_categories<S>(
    source: &S, subject: &str, category_ids: &[&str], pages_per_category: u32,
) -> Result<Vec<String>, Error>
where
    S: ProblemSource + ?Sized,
{
    if category_ids.is_empty() {
        return Ok(Vec::new());
    }

    let semaphore = Semaphore::new(COLLECT_CONCURRENCY);
    let pool = Mutex::new(CandidatePool::default());

    let fetches = category_ids
        .iter()
        .flat_map(|category_id| (1..=pages_per_category).map(move |page| (*category_id, page)))
        .map(|(category_id, page)| {
            let semaphore = &semaphore;
            let pool = &pool;
            async move {
                let ids = {
                    let _permit = semaphore.acquire().await.map_err(|e| Error::Internal(e.to_string()))?;
                    source.category_page(subject, category_id, page).await?
                };
                pool.lock().await.extend(ids);
                Ok::<(), Error>(())
            }
        });

    join_all(fetches).await.into_iter().collect::<Result<(), Error>>()?;

    let candidates = pool.into_inner().into_vec();
    tracing::debug!(
        subject,
        categories = category_ids.len(),
        pages_per_category,
        candidates = candidates.len(),
        "collected candidates"
    );

    Ok(candidates)
}
