use std::collections::BTreeMap;

use super::model::{Column, JobPosting};

/// Occurrence counts per category, in a meaningful order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    pub entries: Vec<(String, usize)>,
}

impl Aggregation {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, n)| *n)
    }

    /// The `n` largest entries by count, largest first. The sort is stable,
    /// so equal counts keep their order from `self`.
    pub fn top_n(&self, n: usize) -> Aggregation {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(n);
        Aggregation { entries }
    }

    /// Each entry's share of the total, in percent.
    pub fn percentages(&self) -> Vec<(String, f64)> {
        let total = self.total();
        self.entries
            .iter()
            .map(|(k, n)| {
                let pct = if total == 0 {
                    0.0
                } else {
                    *n as f64 * 100.0 / total as f64
                };
                (k.clone(), pct)
            })
            .collect()
    }
}

/// Count each distinct non-null value of `column` among `rows`.
/// Entries come out ordered by key.
pub fn value_counts<'a, I>(rows: I, column: Column) -> Aggregation
where
    I: IntoIterator<Item = &'a JobPosting>,
{
    let mut counts: BTreeMap<&'a str, usize> = BTreeMap::new();
    for p in rows {
        if let Some(v) = p.text(column) {
            *counts.entry(v).or_default() += 1;
        }
    }
    Aggregation {
        entries: counts.into_iter().map(|(k, n)| (k.to_string(), n)).collect(),
    }
}

/// Largest numeric salary among `rows`.
pub fn max_salary<'a, I>(rows: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a JobPosting>,
{
    rows.into_iter()
        .filter_map(JobPosting::salary)
        .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |m| m.max(s))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn posting(location: Option<&str>, salary: Option<i64>) -> JobPosting {
        let mut cells = vec![(
            "Location".to_string(),
            location.map_or(CellValue::Null, |l| CellValue::String(l.into())),
        )];
        if let Some(s) = salary {
            cells.push(("Salary".to_string(), CellValue::Integer(s)));
        }
        JobPosting::from_cells(cells)
    }

    fn agg(pairs: &[(&str, usize)]) -> Aggregation {
        Aggregation {
            entries: pairs.iter().map(|(k, n)| (k.to_string(), *n)).collect(),
        }
    }

    #[test]
    fn value_counts_sum_to_non_null_entries() {
        let rows = vec![
            posting(Some("Giza"), None),
            posting(Some("Cairo"), None),
            posting(None, None),
            posting(Some("Cairo"), None),
        ];
        let counts = value_counts(&rows, Column::Location);
        assert_eq!(counts, agg(&[("Cairo", 2), ("Giza", 1)]));
        assert_eq!(counts.total(), 3);
        assert_eq!(value_counts(&rows, Column::Company), Aggregation::default());
    }

    #[test]
    fn top_n_keeps_largest_and_breaks_ties_by_source_order() {
        let source = agg(&[("Alex", 2), ("Cairo", 5), ("Giza", 2), ("Tanta", 1)]);
        let top = source.top_n(3);
        assert_eq!(top, agg(&[("Cairo", 5), ("Alex", 2), ("Giza", 2)]));

        let min_kept = top.entries.iter().map(|(_, n)| *n).min().unwrap();
        let excluded: Vec<_> = source
            .entries
            .iter()
            .filter(|(k, _)| top.get(k).is_none())
            .collect();
        assert!(excluded.iter().all(|(_, n)| *n <= min_kept));
    }

    #[test]
    fn top_n_is_bounded() {
        let many = Aggregation {
            entries: (0..25).map(|i| (format!("city{i:02}"), i)).collect(),
        };
        let top = many.top_n(10);
        assert_eq!(top.len(), 10);
        assert_eq!(top.entries[0], ("city24".to_string(), 24));
        assert_eq!(agg(&[("a", 1)]).top_n(10).len(), 1);
    }

    #[test]
    fn percentages_share_the_total() {
        let pct = agg(&[("Cairo", 3), ("Giza", 1)]).percentages();
        assert_eq!(pct[0].0, "Cairo");
        assert!((pct[0].1 - 75.0).abs() < 1e-9);
        assert!((pct[1].1 - 25.0).abs() < 1e-9);
        assert!(Aggregation::default().percentages().is_empty());
    }

    #[test]
    fn max_salary_skips_missing_values() {
        let rows = vec![
            posting(Some("Cairo"), Some(8000)),
            posting(Some("Cairo"), None),
            posting(Some("Giza"), Some(15000)),
        ];
        assert_eq!(max_salary(&rows), Some(15000.0));
        assert_eq!(max_salary(&rows[1..2]), None);
    }
}
