// src/filters/compose.rs
use crate::filters::quick::{QuickFilter, QuickFilterRegistry};
use crate::filters::search::{self, SearchQuery};
use crate::models::server::ServerRecord;
use log::debug;

/// Search text plus the active category filters.
///
/// Construction enforces the single-select rule: with multi-select off at
/// most one filter is active, and it is the most recently activated one.
/// Duplicate ids are collapsed, keeping the last activation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    search_query: String,
    active: Vec<String>,
    multi_select: bool,
}

impl FilterState {
    pub fn new(search_query: impl Into<String>, active: Vec<String>, multi_select: bool) -> Self {
        let mut state = Self {
            search_query: search_query.into(),
            active: Vec::with_capacity(active.len()),
            multi_select,
        };
        for id in active {
            state.activate(id);
        }
        state.enforce_single_select();
        state
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn active_quick_filters(&self) -> &[String] {
        &self.active
    }

    pub fn multi_select_enabled(&self) -> bool {
        self.multi_select
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.iter().any(|active| active == id)
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn toggle_quick_filter(&mut self, id: &str) {
        if self.multi_select {
            if self.is_active(id) {
                self.active.retain(|active| active != id);
            } else {
                self.active.push(id.to_string());
            }
        } else if self.is_active(id) {
            self.active.clear();
        } else {
            self.active = vec![id.to_string()];
        }
    }

    pub fn set_multi_select_enabled(&mut self, enabled: bool) {
        self.multi_select = enabled;
        self.enforce_single_select();
    }

    pub fn clear(&mut self) {
        self.search_query.clear();
        self.active.clear();
    }

    fn activate(&mut self, id: String) {
        self.active.retain(|active| *active != id);
        self.active.push(id);
    }

    fn enforce_single_select(&mut self) {
        if !self.multi_select && self.active.len() > 1 {
            let last = self.active.len() - 1;
            self.active.drain(..last);
        }
    }
}

/// The value a table's global filter carries: either bare search text or the
/// full composite of search and category filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalFilter {
    Text(String),
    Composite {
        search_query: String,
        quick_filters: Vec<String>,
    },
}

impl From<&FilterState> for GlobalFilter {
    fn from(state: &FilterState) -> Self {
        Self::Composite {
            search_query: state.search_query.clone(),
            quick_filters: state.active.clone(),
        }
    }
}

pub struct FilterComposer<'a> {
    registry: &'a QuickFilterRegistry,
}

impl<'a> FilterComposer<'a> {
    pub fn new(registry: &'a QuickFilterRegistry) -> Self {
        Self { registry }
    }

    /// Records passing the filter, in their original order.
    pub fn compose<'r>(&self, records: &'r [ServerRecord], filter: &GlobalFilter) -> Vec<&'r ServerRecord> {
        let (query, quick) = self.resolve(filter);
        records
            .iter()
            .filter(|record| Self::keep(record, &query, quick.as_deref()))
            .collect()
    }

    pub fn accepts(&self, record: &ServerRecord, filter: &GlobalFilter) -> bool {
        let (query, quick) = self.resolve(filter);
        Self::keep(record, &query, quick.as_deref())
    }

    // `None` means no category restriction at all.
    fn resolve(&self, filter: &GlobalFilter) -> (SearchQuery, Option<Vec<&'a QuickFilter>>) {
        match filter {
            GlobalFilter::Text(text) => (SearchQuery::new(text), None),
            GlobalFilter::Composite {
                search_query,
                quick_filters,
            } => {
                let quick = if quick_filters.is_empty() {
                    None
                } else {
                    let registry = self.registry;
                    let resolved = quick_filters
                        .iter()
                        .filter_map(|id| {
                            let filter = registry.get(id);
                            if filter.is_none() {
                                debug!("Ignoring unknown quick filter {:?}", id);
                            }
                            filter
                        })
                        .collect();
                    Some(resolved)
                };
                (SearchQuery::new(search_query), quick)
            }
        }
    }

    fn keep(record: &ServerRecord, query: &SearchQuery, quick: Option<&[&QuickFilter]>) -> bool {
        let passes_search = search::matches(record, query);
        let passes_quick = match quick {
            None => true,
            Some(filters) => filters.iter().any(|filter| filter.matches(record)),
        };
        passes_search && passes_quick
    }
}
