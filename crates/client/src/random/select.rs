//! Seeded random selection over collected candidates.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sdamgia_core::{Error, Problem, find_topic};

use super::collect::collect_from_categories;
use crate::source::ProblemSource;

/// Window the selector widens to when the requested one has no candidates.
pub const FALLBACK_WINDOW_DAYS: i64 = 365;

/// Category pages to scan for a recency window of `period_days`.
///
/// | days    | pages |
/// |---------|-------|
/// | 1–10    | 1     |
/// | 11–30   | 3     |
/// | 31–90   | 6     |
/// | > 90    | 10    |
pub fn pages_for_period(period_days: i64) -> Result<u32, Error> {
    match period_days {
        ..=0 => Err(Error::InvalidArgument(format!("period_days must be at least 1, got {period_days}"))),
        1..=10 => Ok(1),
        11..=30 => Ok(3),
        31..=90 => Ok(6),
        _ => Ok(10),
    }
}

/// Order in which candidates are probed.
///
/// The first element is picked uniformly from `candidates`; the remaining
/// candidates keep their relative order and are then shuffled with the same
/// generator.
pub fn probe_order<R: Rng + ?Sized>(candidates: &[String], rng: &mut R) -> Vec<String> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let first = rng.gen_range(0..candidates.len());
    let mut rest: Vec<String> = candidates
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != first)
        .map(|(_, id)| id.clone())
        .collect();
    rest.shuffle(rng);

    let mut order = Vec::with_capacity(candidates.len());
    order.push(candidates[first].clone());
    order.extend(rest);
    order
}

/// Pick a random problem of a topic, preferring recently added ones.
///
/// `period_days` bounds how many listing pages per category are scanned
/// (see [`pages_for_period`]). If that window yields no candidates, the
/// 365-day window is tried once. Candidates are probed in [`probe_order`]
/// until one resolves to a problem.
///
/// The catalog is fetched once per call and shared by both windows, so the
/// fallback scans the same categories the primary window did. Callers that
/// only need a candidate list for a fresh catalog use [`collect_candidates`](super::collect::collect_candidates).
///
/// With a `seed` the result is reproducible for a given candidate list. The
/// pick depends on the order in which candidates were collected, so the same
/// set of ids arriving in a different order can select a different problem.
///
/// Returns `Ok(None)` for an unknown topic, when no candidates exist, or when
/// every candidate page is empty.
pub async fn random_problem<S>(
    source: &S, subject: &str, topic_id: &str, period_days: i64, seed: Option<u64>,
) -> Result<Option<Problem>, Error>
where
    S: ProblemSource + ?Sized,
{
    let pages = pages_for_period(period_days)?;
    source.subjects().resolve(subject)?;

    let catalog = source.catalog(subject).await?;
    let Some(topic) = find_topic(&catalog, topic_id) else {
        tracing::debug!(subject, topic_id, "topic not in catalog");
        return Ok(None);
    };
    let category_ids: Vec<&str> = topic.categories.iter().map(|c| c.category_id.as_str()).collect();

    let mut candidates = collect_from_categories(source, subject, &category_ids, pages).await?;
    if candidates.is_empty() {
        let fallback_pages = pages_for_period(FALLBACK_WINDOW_DAYS)?;
        tracing::debug!(subject, topic_id, period_days, fallback_pages, "no candidates in window, widening");
        candidates = collect_from_categories(source, subject, &category_ids, fallback_pages).await?;
    }

    if candidates.is_empty() {
        tracing::info!(subject, topic_id, "no candidates for topic");
        return Ok(None);
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let order = probe_order(&candidates, &mut rng);

    for (attempt, id) in order.iter().enumerate() {
        if let Some(problem) = source.problem(subject, id).await? {
            tracing::debug!(subject, topic_id, id = %id, attempt, "selected problem");
            return Ok(Some(problem));
        }
        tracing::debug!(subject, id = %id, "candidate has no problem block");
    }

    tracing::info!(subject, topic_id, probed = order.len(), "every candidate was empty");
    Ok(None)
}
