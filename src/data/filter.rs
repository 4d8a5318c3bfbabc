use std::collections::BTreeSet;

use super::model::{Column, JobDataset, JobPosting};
use crate::error::FilterWarning;

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// A categorical selection. `All` is the "match everything" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    fn accepts(&self, value: Option<&str>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => value == Some(wanted.as_str()),
        }
    }
}

/// The active filter selections for one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub city: Selection,
    pub company: Selection,
    /// Case-insensitive substring of the job title, matched as typed.
    /// Blank means no filter.
    pub title_query: String,
}

impl FilterCriteria {
    /// Whether these criteria restrict nothing.
    pub fn is_match_all(&self) -> bool {
        self.city.is_all() && self.company.is_all() && self.title_query.trim().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Filter result
// ---------------------------------------------------------------------------

/// Postings passing a [`FilterCriteria`], as indices into the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterResult {
    /// Matching row indices in dataset order.
    pub indices: Vec<usize>,
    pub total_count: usize,
    pub filtered_count: usize,
    /// Distinct non-null companies among the matching rows.
    pub distinct_company_count: usize,
}

impl FilterResult {
    /// Iterate the matching postings of `dataset`.
    pub fn rows<'a>(&'a self, dataset: &'a JobDataset) -> impl Iterator<Item = &'a JobPosting> + 'a {
        self.indices.iter().filter_map(move |&i| dataset.postings.get(i))
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn warning(&self) -> Option<FilterWarning> {
        self.is_empty().then_some(FilterWarning::EmptyResult)
    }
}

/// Return the postings of `dataset` that pass every active criterion.
///
/// * City / company compare for equality with the trimmed cell text.
/// * The title query matches case-insensitively anywhere in the title.
/// * A criterion on a column the dataset lacks is ignored.
/// * A null cell never satisfies an active criterion on its column.
pub fn apply_filters(dataset: &JobDataset, criteria: &FilterCriteria) -> FilterResult {
    let city = if dataset.has_column(Column::Location) {
        &criteria.city
    } else {
        &Selection::All
    };
    let company = if dataset.has_column(Column::Company) {
        &criteria.company
    } else {
        &Selection::All
    };
    let query = (!criteria.title_query.trim().is_empty() && dataset.has_column(Column::JobTitle))
        .then(|| criteria.title_query.to_lowercase());

    let indices: Vec<usize> = dataset
        .postings
        .iter()
        .enumerate()
        .filter(|(_, p)| {
            if !city.accepts(p.text(Column::Location)) {
                return false;
            }
            if !company.accepts(p.text(Column::Company)) {
                return false;
            }
            match &query {
                None => true,
                Some(q) => p
                    .text(Column::JobTitle)
                    .is_some_and(|title| title.to_lowercase().contains(q.as_str())),
            }
        })
        .map(|(i, _)| i)
        .collect();

    let distinct_company_count = indices
        .iter()
        .filter_map(|&i| dataset.postings[i].text(Column::Company))
        .collect::<BTreeSet<_>>()
        .len();

    FilterResult {
        filtered_count: indices.len(),
        total_count: dataset.len(),
        indices,
        distinct_company_count,
    }
}

/// Options for a selection widget: the `All` sentinel followed by the
/// sorted unique non-null values of `column`.
pub fn distinct_values(dataset: &JobDataset, column: Column) -> Vec<Selection> {
    let unique: BTreeSet<&str> = dataset.postings.iter().filter_map(|p| p.text(column)).collect();
    std::iter::once(Selection::All)
        .chain(unique.into_iter().map(|v| Selection::Only(v.to_string())))
        .collect()
}
