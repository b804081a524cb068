use std::path::Path;

use crate::color::CategoryColors;
use crate::data::aggregate::size_ranges;
use crate::data::filter::{compute_view, FieldFilter, SortKey, ViewCriteria};
use crate::data::loader::{load_file, LoadError};
use crate::data::model::{
    CategoryAggregate, CleanedRecord, CorrelationPoint, LayoutDataset, SizeRange,
};

/// Message shown when a sheet cannot be loaded. Details go to the log only.
pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load property data";

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing loaded yet.
    #[default]
    Idle,
    Ready,
    /// The last load attempt failed; no data is shown.
    Failed(String),
}

/// The full UI state, independent of rendering.
///
/// Owns the cleaned collection and the view criteria. Criteria change only
/// through the `set_*` / `request_sort` methods, each of which rebuilds the
/// visible rows from scratch.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a sheet loads successfully).
    pub dataset: Option<LayoutDataset>,

    /// Series colours, one per `Type`.
    pub colors: CategoryColors,

    pub status: LoadStatus,

    criteria: ViewCriteria,

    /// Indices of records passing the current criteria, display order.
    visible_indices: Vec<usize>,
}

impl AppState {
    /// Decode, clean and aggregate the sheet at `path`.
    ///
    /// Either the whole sheet becomes the new dataset or the state moves to
    /// [`LoadStatus::Failed`] with nothing shown.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(rows) => {
                let dataset = LayoutDataset::from_raw(rows);
                log::info!(
                    "Loaded {} layouts across {} types from {}",
                    dataset.len(),
                    dataset.type_options.len(),
                    path.display()
                );
                self.set_dataset(dataset);
            }
            Err(e) => self.load_failed(&e),
        }
    }

    /// Ingest a newly built dataset and reset the view to its defaults.
    pub fn set_dataset(&mut self, dataset: LayoutDataset) {
        self.colors = CategoryColors::new(&dataset.type_options);
        self.criteria = ViewCriteria::default();
        self.dataset = Some(dataset);
        self.status = LoadStatus::Ready;
        self.refilter();
    }

    /// Terminal failure for this load attempt: drop any data, keep a generic message.
    pub fn load_failed(&mut self, err: &LoadError) {
        log::error!("Failed to load layout sheet: {err}");
        self.dataset = None;
        self.visible_indices.clear();
        self.colors = CategoryColors::default();
        self.status = LoadStatus::Failed(LOAD_FAILURE_MESSAGE.to_string());
    }

    pub fn criteria(&self) -> &ViewCriteria {
        &self.criteria
    }

    pub fn set_type_filter(&mut self, filter: FieldFilter) {
        log::debug!("Type filter: {filter}");
        self.criteria.set_type_filter(filter);
        self.refilter();
    }

    pub fn set_config_filter(&mut self, filter: FieldFilter) {
        log::debug!("Config filter: {filter}");
        self.criteria.set_config_filter(filter);
        self.refilter();
    }

    /// Clear both filters, keeping the sort order.
    pub fn reset_filters(&mut self) {
        self.set_type_filter(FieldFilter::All);
        self.set_config_filter(FieldFilter::All);
    }

    /// Sort by `key`; asking again for the active ascending key flips it.
    pub fn request_sort(&mut self, key: SortKey) {
        let sort = self.criteria.sort().toggled(key);
        log::debug!("Sort: {sort:?}");
        self.criteria.set_sort(sort);
        self.refilter();
    }

    /// Recompute `visible_indices` after a data or criteria change.
    fn refilter(&mut self) {
        self.visible_indices = match &self.dataset {
            Some(ds) => compute_view(&ds.records, &self.criteria),
            None => Vec::new(),
        };
    }

    /// Rows to show in the table, in display order.
    pub fn visible(&self) -> impl Iterator<Item = &CleanedRecord> + '_ {
        let records = self.dataset.as_ref().map(|ds| ds.records.as_slice()).unwrap_or_default();
        self.visible_indices.iter().map(move |&i| &records[i])
    }

    pub fn visible_len(&self) -> usize {
        self.visible_indices.len()
    }

    /// Per-type averages over the full dataset (filters do not apply).
    pub fn aggregates(&self) -> &[CategoryAggregate] {
        self.dataset
            .as_ref()
            .map(|ds| ds.aggregation.categories.as_slice())
            .unwrap_or_default()
    }

    /// BUA and plot per visible row, smallest BUA first (filters apply).
    pub fn size_ranges(&self) -> Vec<SizeRange> {
        size_ranges(self.visible())
    }

    /// BUA vs price points over the full dataset (filters do not apply).
    pub fn correlation_points(&self) -> &[CorrelationPoint] {
        self.dataset
            .as_ref()
            .map(|ds| ds.aggregation.correlation.as_slice())
            .unwrap_or_default()
    }
}
