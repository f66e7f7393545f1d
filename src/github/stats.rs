//! Aggregations over repository listings.

use std::collections::HashMap;

use super::types::{LanguageCounts, LanguageStats, StarredRepo, StarredSummary, TopLanguage};

/// Number of entries kept in the top-languages rankings
pub const TOP_LANGUAGES: usize = 5;

/// Number of starred repositories projected into the summary
pub const RECENT_STARS: usize = 10;

/// Count languages as `(language, count)` in the order they were first seen
fn count_languages<'a, I>(languages: I) -> Vec<(String, u32)>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts: Vec<(String, u32)> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for language in languages.into_iter().flatten() {
        if let Some(&slot) = index.get(language) {
            counts[slot].1 += 1;
        } else {
            index.insert(language, counts.len());
            counts.push((language.to_string(), 1));
        }
    }
    counts
}

/// Sort first-seen counts by count descending; sort_by is stable, so ties
/// keep first-seen order
fn by_count(mut counts: Vec<(String, u32)>) -> Vec<(String, u32)> {
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Count languages, returning `(language, count)` sorted by count descending.
/// Ties keep the order in which the languages were first seen.
pub fn rank_languages<'a, I>(languages: I) -> Vec<(String, u32)>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    by_count(count_languages(languages))
}

/// Whole-number percentage, rounding halves up
fn percentage(count: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let exact = f64::from(count) / f64::from(total) * 100.0;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
    let rounded = exact.round() as u32;
    rounded
}

/// Build language statistics from the `language` field of each repository.
///
/// Only repositories that report a language count towards `total_repos`.
pub fn language_stats<'a, I>(languages: I) -> LanguageStats
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let counts = count_languages(languages);
    let ranked = by_count(counts.clone());
    let total_repos: u32 = ranked.iter().map(|(_, count)| count).sum();

    let top_languages = ranked
        .iter()
        .take(TOP_LANGUAGES)
        .map(|(name, count)| TopLanguage {
            name: name.clone(),
            count: *count,
            percentage: percentage(*count, total_repos),
        })
        .collect();

    let languages: LanguageCounts = counts.into_iter().collect();

    LanguageStats {
        languages,
        total_repos,
        top_languages,
    }
}

/// Summarize a page of starred repositories.
///
/// `total_starred` is the size of the page; language counts only look at the
/// most recent [`RECENT_STARS`] entries.
pub fn starred_summary(starred: Vec<StarredRepo>) -> StarredSummary {
    let total_starred = u32::try_from(starred.len()).unwrap_or(u32::MAX);
    let recent_stars: Vec<StarredRepo> = starred.into_iter().take(RECENT_STARS).collect();

    let top_starred_languages = rank_languages(recent_stars.iter().map(|r| r.language.as_deref()))
        .into_iter()
        .take(TOP_LANGUAGES)
        .map(|(name, _)| name)
        .collect();

    StarredSummary {
        total_starred,
        top_starred_languages,
        recent_stars,
    }
}
