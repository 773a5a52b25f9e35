use crate::data::filter::{apply, FilterSpec};
use crate::data::geometry::{extract_all, MapMarker};
use crate::data::model::DamDataset;
use crate::data::page::{paginate, Page, PAGE_SIZE};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Everything one user session owns: the loaded dataset, the active filters,
/// the requested page, and the derived views cached after the last filter
/// change. Nothing here is shared across sessions.
pub struct SessionState {
    /// Loaded dataset (None until the user opens a file).
    pub dataset: Option<DamDataset>,

    /// Active filter predicates.
    pub filters: FilterSpec,

    /// Page the user asked for; clamped on every resolve and reset to 1 when
    /// the filters change.
    pub requested_page: usize,

    /// Indices of rows passing the current filters (cached).
    pub visible_rows: Vec<usize>,

    /// Map markers extracted from the filtered rows (cached).
    pub markers: Vec<MapMarker>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            dataset: None,
            filters: FilterSpec::default(),
            requested_page: 1,
            visible_rows: Vec::new(),
            markers: Vec::new(),
            status_message: None,
            loading: false,
        }
    }
}

impl SessionState {
    /// Ingest a newly loaded dataset and reset filters to match-all.
    pub fn set_dataset(&mut self, dataset: DamDataset) {
        self.filters = FilterSpec {
            // Pickers start at the full observed span, which the filter
            // engine treats as inactive
            date_range: dataset.date_bounds,
            ..FilterSpec::default()
        };
        self.visible_rows = (0..dataset.len()).collect();
        self.markers = extract_all(&dataset, &self.visible_rows);
        self.requested_page = 1;
        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
    }

    /// Recompute the derived views after a filter change. The current page
    /// goes back to 1 so the table never points past the new last page.
    pub fn refilter(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        match apply(dataset, &self.filters) {
            Ok(indices) => {
                self.markers = extract_all(dataset, &indices);
                self.visible_rows = indices;
                self.requested_page = 1;
            }
            Err(e) => {
                log::error!("filter configuration error: {e}");
                self.status_message = Some(format!("Erro: {e}"));
            }
        }
    }

    /// Resolve the page the table should show, persisting the clamped page
    /// number back as the next request.
    pub fn current_page(&mut self) -> Page {
        let page = paginate(self.visible_rows.len(), PAGE_SIZE, self.requested_page)
            .unwrap_or(Page {
                number: 1,
                size: PAGE_SIZE,
                total_pages: 1,
                total_rows: self.visible_rows.len(),
            });
        self.requested_page = page.number;
        page
    }

    /// Reset every filter to match-all (and the page along with it).
    pub fn clear_filters(&mut self) {
        let date_range = self.dataset.as_ref().and_then(|ds| ds.date_bounds);
        self.filters = FilterSpec {
            date_range,
            ..FilterSpec::default()
        };
        self.refilter();
    }

    /// Whether any predicate currently constrains the dataset (drives the
    /// table title and export file names).
    pub fn has_active_filters(&self) -> bool {
        self.dataset
            .as_ref()
            .map(|ds| self.filters.is_active(ds))
            .unwrap_or(false)
    }
}
