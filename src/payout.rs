//! Payout aggregation: group the filtered subset by author, count, multiply
//! by the per-article rate. Recomputed wholesale on every filter or rate
//! change; nothing is cached across calls.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::article::Article;

/// One line of the aggregate table. `author` is unique per table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutRow {
    pub author: String,
    pub count: u64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeCount {
    pub content_type: String,
    pub count: u64,
}

/// Group by author in first-occurrence order. A zero or negative rate
/// passes through verbatim; totals follow the sign.
pub fn aggregate(articles: &[Article], rate: f64) -> Vec<PayoutRow> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<PayoutRow> = Vec::new();
    for a in articles {
        match index.get(a.author.as_str()) {
            Some(&i) => rows[i].count += 1,
            None => {
                index.insert(a.author.as_str(), rows.len());
                rows.push(PayoutRow {
                    author: a.author.clone(),
                    count: 1,
                    total: 0.0,
                });
            }
        }
    }
    for row in &mut rows {
        row.total = row.count as f64 * rate;
    }
    rows
}

/// Per-type counts, same first-occurrence ordering rule.
pub fn count_by_type(articles: &[Article]) -> Vec<TypeCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<TypeCount> = Vec::new();
    for a in articles {
        let key = a.content_type.as_str();
        match index.get(key) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(key, counts.len());
                counts.push(TypeCount {
                    content_type: key.to_string(),
                    count: 1,
                });
            }
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::ContentType;

    fn by(author: &str) -> Article {
        Article {
            title: "t".into(),
            author: author.into(),
            published_at: "2024-01-01T00:00:00Z".into(),
            url: String::new(),
            content_type: ContentType::News,
        }
    }

    #[test]
    fn rate_scenario_two_a_one_b() {
        let rows = aggregate(&[by("A"), by("A"), by("B")], 2.5);
        assert_eq!(
            rows,
            vec![
                PayoutRow { author: "A".into(), count: 2, total: 5.0 },
                PayoutRow { author: "B".into(), count: 1, total: 2.5 },
            ]
        );
    }

    #[test]
    fn counts_sum_to_subset_length_and_authors_are_distinct() {
        let input = vec![by("A"), by("B"), by("A"), by("C"), by("B"), by("A")];
        let rows = aggregate(&input, 1.0);
        let total: u64 = rows.iter().map(|r| r.count).sum();
        assert_eq!(total as usize, input.len());
        let mut authors: Vec<&str> = rows.iter().map(|r| r.author.as_str()).collect();
        authors.sort_unstable();
        authors.dedup();
        assert_eq!(authors.len(), rows.len());
    }

    #[test]
    fn emission_follows_first_occurrence_order() {
        let rows = aggregate(&[by("Z"), by("A"), by("Z"), by("M")], 1.0);
        let order: Vec<&str> = rows.iter().map(|r| r.author.as_str()).collect();
        assert_eq!(order, vec!["Z", "A", "M"]);
    }

    #[test]
    fn zero_and_negative_rates_pass_through() {
        let zero = aggregate(&[by("A")], 0.0);
        assert_eq!(zero[0].total, 0.0);
        let neg = aggregate(&[by("A"), by("A")], -1.5);
        assert_eq!(neg[0].total, -3.0);
    }

    #[test]
    fn empty_subset_yields_empty_table() {
        assert!(aggregate(&[], 2.0).is_empty());
        assert!(count_by_type(&[]).is_empty());
    }

    #[test]
    fn type_counts_first_occurrence_order() {
        let mut blog = by("A");
        blog.content_type = ContentType::Blog;
        let counts = count_by_type(&[blog.clone(), by("B"), by("C"), blog]);
        assert_eq!(
            counts,
            vec![
                TypeCount { content_type: "blog".into(), count: 2 },
                TypeCount { content_type: "news".into(), count: 2 },
            ]
        );
    }
}
