use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the source sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common spreadsheet dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{v:.0}"),
            CellValue::Float(v) => write!(f, "{v:.2}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Guess the type of a raw text cell (CSV, or stringly-typed sources).
    pub fn guess(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(raw.to_string())
    }

    /// A text cell taken as-is; blank text is `Null`.
    pub fn text(raw: &str) -> Self {
        if raw.trim().is_empty() {
            CellValue::Null
        } else {
            CellValue::String(raw.to_string())
        }
    }

    /// Numeric view of the cell. Text such as `"12,000"` is accepted.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if v.is_finite() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Coerce to trimmed text. Empty text becomes `Null`.
    fn into_trimmed_text(self) -> Self {
        let text = match self {
            CellValue::Null => return CellValue::Null,
            CellValue::String(s) => s,
            other => other.to_string(),
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            CellValue::Null
        } else {
            CellValue::String(trimmed.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Column – the columns the dashboard knows about
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Location,
    Company,
    JobTitle,
    Experience,
    Salary,
}

impl Column {
    /// Canonical header as it appears in the source sheet.
    pub fn header(self) -> &'static str {
        match self {
            Column::Location => "Location",
            Column::Company => "Company",
            Column::JobTitle => "Job Title",
            Column::Experience => "Experience Required",
            Column::Salary => "Salary",
        }
    }

    /// Whether the column holds free text that gets trimmed on load.
    pub fn is_text(self) -> bool {
        !matches!(self, Column::Salary)
    }

    /// Resolve a raw header (case-insensitive, with a few aliases).
    pub fn from_header(raw: &str) -> Option<Column> {
        match raw.trim().to_lowercase().as_str() {
            "location" | "city" => Some(Column::Location),
            "company" => Some(Column::Company),
            "job title" | "title" => Some(Column::JobTitle),
            "experience required" | "experience" => Some(Column::Experience),
            "salary" => Some(Column::Salary),
            _ => None,
        }
    }
}

/// Map a raw source header onto the name stored in the dataset.
pub fn canonical_header(raw: &str) -> String {
    match Column::from_header(raw) {
        Some(col) => col.header().to_string(),
        None => raw.trim().to_string(),
    }
}

// ---------------------------------------------------------------------------
// JobPosting – one row of the sheet
// ---------------------------------------------------------------------------

/// A single job posting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPosting {
    /// Cells keyed by canonical column name.
    pub cells: BTreeMap<String, CellValue>,
}

impl JobPosting {
    /// Build a posting from `(header, value)` pairs, canonicalising headers
    /// and trimming the known text columns.
    pub fn from_cells<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = (String, CellValue)>,
    {
        let cells = cells
            .into_iter()
            .map(|(header, value)| {
                let header = canonical_header(&header);
                let value = match Column::from_header(&header) {
                    Some(col) if col.is_text() => value.into_trimmed_text(),
                    _ => value,
                };
                (header, value)
            })
            .collect();
        JobPosting { cells }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// Text value of a known column; `None` when absent or null.
    pub fn text(&self, column: Column) -> Option<&str> {
        match self.cells.get(column.header()) {
            Some(CellValue::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn salary(&self) -> Option<f64> {
        self.cells.get(Column::Salary.header()).and_then(CellValue::as_f64)
    }
}

// ---------------------------------------------------------------------------
// JobDataset – the complete loaded sheet
// ---------------------------------------------------------------------------

/// The full parsed dataset. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct JobDataset {
    /// All postings, in source order.
    pub postings: Vec<JobPosting>,
    /// Canonical column names in source order.
    pub column_names: Vec<String>,
}

impl JobDataset {
    pub fn new(postings: Vec<JobPosting>, headers: &[String]) -> Self {
        let mut column_names: Vec<String> = Vec::with_capacity(headers.len());
        for h in headers {
            let name = canonical_header(h);
            if !column_names.contains(&name) {
                column_names.push(name);
            }
        }
        JobDataset {
            postings,
            column_names,
        }
    }

    /// Build from postings alone; columns are collected in first-seen order.
    pub fn from_postings(postings: Vec<JobPosting>) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for p in &postings {
            for key in p.cells.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }
        JobDataset::new(postings, &headers)
    }

    /// Number of postings.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.column_names.iter().any(|c| c == column.header())
    }

    /// A new dataset holding only the given rows.
    pub fn subset(&self, indices: &[usize]) -> JobDataset {
        JobDataset {
            postings: indices
                .iter()
                .filter_map(|&i| self.postings.get(i).cloned())
                .collect(),
            column_names: self.column_names.clone(),
        }
    }
}
