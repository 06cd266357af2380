//! Filter engine: a conjunction of optional predicates over the normalized
//! article list. Absent criteria are identity filters; present criteria AND
//! together. Output preserves input order and is always a subset.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::article::{Article, ContentType};

/// Transient filter state, rebuilt per request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub author: Option<String>,
    pub content_type: Option<ContentType>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub search_term: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.author.is_none()
            && self.content_type.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.search_term.is_none()
    }
}

/// Parse a timestamp as RFC 3339, falling back to a bare `YYYY-MM-DD` date
/// taken as start of day UTC.
fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let d = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()?;
    Some(DateTime::from_naive_utc_and_offset(
        d.and_hms_opt(0, 0, 0)?,
        Utc,
    ))
}

/// End bounds are inclusive: a date-only bound covers the whole end day.
fn parse_end_bound(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let d = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()?;
    Some(DateTime::from_naive_utc_and_offset(
        d.and_hms_opt(23, 59, 59)?,
        Utc,
    ))
}

/// Date policy: an article whose `published_at` does not parse is excluded
/// whenever a date bound is active (it cannot be placed inside an inclusive
/// range). With no date bounds it passes untouched.
fn matches_dates(article: &Article, criteria: &FilterCriteria) -> bool {
    if criteria.start_date.is_none() && criteria.end_date.is_none() {
        return true;
    }
    let Some(published) = parse_instant(&article.published_at) else {
        return false;
    };
    if let Some(start) = criteria.start_date.as_deref().and_then(parse_instant) {
        if published < start {
            return false;
        }
    }
    if let Some(end) = criteria.end_date.as_deref().and_then(parse_end_bound) {
        if published > end {
            return false;
        }
    }
    true
}

fn matches(article: &Article, criteria: &FilterCriteria) -> bool {
    if let Some(author) = &criteria.author {
        if &article.author != author {
            return false;
        }
    }
    if let Some(ct) = criteria.content_type {
        if article.content_type != ct {
            return false;
        }
    }
    if let Some(term) = &criteria.search_term {
        if !article
            .title
            .to_lowercase()
            .contains(&term.to_lowercase())
        {
            return false;
        }
    }
    matches_dates(article, criteria)
}

/// Apply the criteria, keeping relative order. Never fails; an unmatched
/// filter yields an empty vec.
pub fn apply(articles: &[Article], criteria: &FilterCriteria) -> Vec<Article> {
    articles
        .iter()
        .filter(|a| matches(a, criteria))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, author: &str, published_at: &str, ct: ContentType) -> Article {
        Article {
            title: title.into(),
            author: author.into(),
            published_at: published_at.into(),
            url: format!("https://example.test/{title}"),
            content_type: ct,
        }
    }

    fn fixture() -> Vec<Article> {
        vec![
            article("Election Day", "Jane Doe", "2024-11-05T08:00:00Z", ContentType::News),
            article("Sports Update", "John Roe", "2024-11-06T09:00:00Z", ContentType::Blog),
            article("Market Wrap", "Jane Doe", "not-a-date", ContentType::News),
        ]
    }

    #[test]
    fn empty_criteria_is_identity() {
        let input = fixture();
        let out = apply(&input, &FilterCriteria::default());
        assert_eq!(out, input);
    }

    #[test]
    fn search_term_is_case_insensitive_substring() {
        let out = apply(
            &fixture(),
            &FilterCriteria {
                search_term: Some("Elect".into()),
                ..Default::default()
            },
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "Election Day");

        let lower = apply(
            &fixture(),
            &FilterCriteria {
                search_term: Some("elect".into()),
                ..Default::default()
            },
        );
        assert_eq!(lower, out);
    }

    #[test]
    fn author_and_type_are_exact_matches() {
        let out = apply(
            &fixture(),
            &FilterCriteria {
                author: Some("Jane Doe".into()),
                content_type: Some(ContentType::News),
                ..Default::default()
            },
        );
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|a| a.author == "Jane Doe"));
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let criteria = FilterCriteria {
            start_date: Some("2024-11-05".into()),
            end_date: Some("2024-11-05".into()),
            ..Default::default()
        };
        let out = apply(&fixture(), &criteria);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "Election Day");
    }

    #[test]
    fn unparseable_timestamp_is_excluded_under_date_bounds() {
        let criteria = FilterCriteria {
            start_date: Some("2000-01-01".into()),
            ..Default::default()
        };
        let out = apply(&fixture(), &criteria);
        assert!(out.iter().all(|a| a.title != "Market Wrap"));
        // Without bounds the same article passes.
        let all = apply(&fixture(), &FilterCriteria::default());
        assert!(all.iter().any(|a| a.title == "Market Wrap"));
    }

    #[test]
    fn filtering_is_idempotent_and_order_preserving() {
        let criteria = FilterCriteria {
            author: Some("Jane Doe".into()),
            ..Default::default()
        };
        let once = apply(&fixture(), &criteria);
        let twice = apply(&once, &criteria);
        assert_eq!(once, twice);
        assert_eq!(once[0].title, "Election Day");
        assert_eq!(once[1].title, "Market Wrap");
    }

    #[test]
    fn unmatched_filter_yields_empty_not_error() {
        let out = apply(
            &fixture(),
            &FilterCriteria {
                author: Some("Nobody".into()),
                ..Default::default()
            },
        );
        assert!(out.is_empty());
    }
}
