use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::DatasetCache;
use crate::data::aggregate::{max_salary, value_counts, Aggregation};
use crate::data::filter::{apply_filters, distinct_values, FilterCriteria, FilterResult, Selection};
use crate::data::loader::is_not_found;
use crate::data::model::{Column, JobDataset};
use crate::settings::DashboardConfig;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Load-once cache for the current source file.
    cache: DatasetCache,

    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Arc<JobDataset>>,

    /// Current filter selections.
    pub criteria: FilterCriteria,

    /// Postings passing the current filters (cached).
    pub result: Option<FilterResult>,

    /// Options for the city and company selectors, `All` first.
    pub city_options: Vec<Selection>,
    pub company_options: Vec<Selection>,

    /// Experience level → count over the filtered postings.
    /// `None` when the dataset has no experience column.
    pub experience_counts: Option<Aggregation>,

    /// Top cities over the filtered postings. `None` without a location column.
    pub top_cities: Option<Aggregation>,

    /// Highest salary among the filtered postings, for highlighting.
    pub max_salary: Option<f64>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let cache = DatasetCache::new(config.data_path.clone());
        Self {
            config,
            cache,
            dataset: None,
            criteria: FilterCriteria::default(),
            result: None,
            city_options: vec![Selection::All],
            company_options: vec![Selection::All],
            experience_counts: None,
            top_cities: None,
            max_salary: None,
            status_message: None,
        }
    }

    pub fn source_path(&self) -> &std::path::Path {
        self.cache.path()
    }

    /// Load (or fetch from cache) the current source.
    pub fn load(&mut self) {
        match self.cache.get_or_load() {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => self.fail(e),
        }
    }

    /// Switch to another source file and load it.
    pub fn open_path(&mut self, path: PathBuf) {
        self.cache.set_path(path);
        self.load();
    }

    /// Drop the cached dataset and read the source again.
    pub fn reload(&mut self) {
        self.cache.invalidate();
        self.load();
    }

    /// Reload when the source file changed on disk.
    pub fn reload_if_changed(&mut self) {
        match self.cache.reload_if_stale() {
            Ok(true) => self.load(),
            Ok(false) => {}
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, err: anyhow::Error) {
        if is_not_found(&err) {
            log::error!("{err:#}");
            self.status_message = Some(format!(
                "Error: could not find '{}'. Make sure the file is next to the app or set {}.",
                self.cache.path().display(),
                crate::settings::DATA_PATH_VAR
            ));
        } else {
            log::error!("Failed to load file: {err:#}");
            self.status_message = Some(format!("Error: {err:#}"));
        }
        self.dataset = None;
        self.result = None;
        self.experience_counts = None;
        self.top_cities = None;
        self.max_salary = None;
    }

    /// Ingest a newly loaded dataset, reset filters and recompute.
    pub fn set_dataset(&mut self, dataset: Arc<JobDataset>) {
        let same = self
            .dataset
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &dataset));
        if !same {
            self.criteria = FilterCriteria::default();
        }
        self.city_options = distinct_values(&dataset, Column::Location);
        self.company_options = distinct_values(&dataset, Column::Company);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the filter result and both aggregations after a change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let result = apply_filters(ds, &self.criteria);

        self.experience_counts = ds
            .has_column(Column::Experience)
            .then(|| value_counts(result.rows(ds), Column::Experience));
        self.top_cities = ds
            .has_column(Column::Location)
            .then(|| value_counts(result.rows(ds), Column::Location).top_n(self.config.top_cities));
        self.max_salary = max_salary(result.rows(ds));

        log::debug!(
            "Filters {:?} matched {}/{} postings",
            self.criteria,
            result.filtered_count,
            result.total_count
        );
        self.result = Some(result);
    }

    pub fn set_city(&mut self, city: Selection) {
        self.criteria.city = city;
        self.refilter();
    }

    pub fn set_company(&mut self, company: Selection) {
        self.criteria.company = company;
        self.refilter();
    }

    pub fn set_title_query(&mut self, query: String) {
        self.criteria.title_query = query;
        self.refilter();
    }

    pub fn reset_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.refilter();
    }
}
