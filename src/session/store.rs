// src/session/store.rs
use crate::filters::FilterState;
use crate::view::{Column, ColumnVisibility, SortState};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Table,
    Map,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Map => "map",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "table" => Some(Self::Table),
            "map" => Some(Self::Map),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_index: usize,
    page_size: usize,
}

impl Pagination {
    /// A zero page size is bumped to one.
    pub fn new(page_index: usize, page_size: usize) -> Self {
        Self {
            page_index,
            page_size: page_size.max(1),
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn first_page(&mut self) {
        self.page_index = 0;
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

/// Everything the dashboard remembers between renders. Every mutator that
/// can change which records are visible sends pagination back to page 0.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    filter: FilterState,
    pagination: Pagination,
    sort: Option<SortState>,
    columns: ColumnVisibility,
    view_mode: ViewMode,
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            pagination: Pagination::new(0, page_size),
            ..Self::default()
        }
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    pub fn columns(&self) -> &ColumnVisibility {
        &self.columns
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.filter.set_search_query(query);
        self.pagination.first_page();
    }

    pub fn toggle_quick_filter(&mut self, id: &str) {
        self.filter.toggle_quick_filter(id);
        self.pagination.first_page();
    }

    pub fn set_multi_select_enabled(&mut self, enabled: bool) {
        let before = self.filter.active_quick_filters().len();
        self.filter.set_multi_select_enabled(enabled);
        if self.filter.active_quick_filters().len() != before {
            self.pagination.first_page();
        }
    }

    /// Replaces the whole filter, e.g. when seeding from a URL.
    pub fn replace_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.pagination.first_page();
    }

    /// Clears search and quick filters. Multi-select, columns and view mode
    /// are left alone.
    pub fn reset_all(&mut self) {
        self.filter.clear();
        self.pagination.first_page();
    }

    pub fn set_column_visibility(&mut self, column: Column, visible: bool) {
        self.columns.set(column, visible);
    }

    pub fn set_columns(&mut self, columns: ColumnVisibility) {
        self.columns = columns;
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn set_sort(&mut self, sort: Option<SortState>) {
        self.sort = sort;
        self.pagination.first_page();
    }

    pub fn set_page_index(&mut self, page_index: usize) {
        self.pagination.page_index = page_index;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.pagination = Pagination::new(0, page_size);
    }
}
