// src/session/sync.rs
use crate::filters::{FilterState, QuickFilterRegistry};
use crate::session::store::{ViewMode, ViewState};
use crate::view::{Column, SortState};
use log::debug;
use std::sync::Arc;
use url::{form_urlencoded, Url};

pub const SEARCH_PARAM: &str = "search";
pub const QUICK_FILTERS_PARAM: &str = "quickFilters";
pub const VIEW_MODE_PARAM: &str = "viewMode";

/// The part of the dashboard state that lives in the query string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UrlState {
    pub search: String,
    pub quick_filters: Vec<String>,
    pub view_mode: ViewMode,
}

impl UrlState {
    /// More than one filter in a link only makes sense with multi-select on,
    /// so it is switched on rather than dropping the extra ids.
    pub fn filter_state(&self, multi_select: bool) -> FilterState {
        let multi_select = multi_select || self.quick_filters.len() > 1;
        FilterState::new(self.search.clone(), self.quick_filters.clone(), multi_select)
    }
}

/// Reads the synchronized parameters out of a raw query string. Unknown or
/// malformed values are dropped, never reported.
pub fn decode_query(query: &str, registry: &QuickFilterRegistry) -> UrlState {
    let mut state = UrlState::default();
    let mut seen_search = false;
    let mut seen_filters = false;
    let mut seen_mode = false;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match &*key {
            SEARCH_PARAM if !seen_search => {
                seen_search = true;
                state.search = value.into_owned();
            }
            QUICK_FILTERS_PARAM if !seen_filters => {
                seen_filters = true;
                for id in value.split(',').map(str::trim).filter(|id| !id.is_empty()) {
                    if !registry.contains(id) {
                        debug!("Dropping unknown quick filter {:?} from URL", id);
                    } else if !state.quick_filters.iter().any(|known| known == id) {
                        state.quick_filters.push(id.to_string());
                    }
                }
            }
            VIEW_MODE_PARAM if !seen_mode => {
                seen_mode = true;
                match ViewMode::parse(&value) {
                    Some(mode) => state.view_mode = mode,
                    None => debug!("Ignoring unknown view mode {:?} in URL", value),
                }
            }
            _ => {}
        }
    }
    state
}

pub fn decode(url: &Url, registry: &QuickFilterRegistry) -> UrlState {
    decode_query(url.query().unwrap_or_default(), registry)
}

/// Rewrites the synchronized parameters on `base`, leaving its path and any
/// other parameters untouched. Empty values are left out entirely.
pub fn encode(base: &Url, filter: &FilterState, view_mode: ViewMode) -> Url {
    let mut url = base.clone();
    let others: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| !matches!(&**key, SEARCH_PARAM | QUICK_FILTERS_PARAM | VIEW_MODE_PARAM))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut pairs = others;
    if !filter.search_query().is_empty() {
        pairs.push((SEARCH_PARAM.to_string(), filter.search_query().to_string()));
    }
    if !filter.active_quick_filters().is_empty() {
        pairs.push((QUICK_FILTERS_PARAM.to_string(), filter.active_quick_filters().join(",")));
    }
    if view_mode != ViewMode::Table {
        pairs.push((VIEW_MODE_PARAM.to_string(), view_mode.as_str().to_string()));
    }

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    url
}

/// Non-reloading navigation history.
pub trait History {
    fn current(&self) -> &Url;
    fn push(&mut self, url: Url);
    fn back(&mut self) -> bool;
    fn forward(&mut self) -> bool;
}

#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<Url>,
    cursor: usize,
}

impl MemoryHistory {
    pub fn new(initial: Url) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl History for MemoryHistory {
    fn current(&self) -> &Url {
        &self.entries[self.cursor]
    }

    fn push(&mut self, url: Url) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(url);
        self.cursor = self.entries.len() - 1;
    }

    fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }
}

/// Owns the view state and keeps `history` in step with it. Only search,
/// quick filters and view mode are written to the URL.
pub struct UrlSync<H: History> {
    state: ViewState,
    history: H,
    registry: Arc<QuickFilterRegistry>,
}

impl<H: History> UrlSync<H> {
    pub fn load(history: H, registry: Arc<QuickFilterRegistry>, page_size: usize) -> Self {
        let mut sync = Self {
            state: ViewState::new(page_size),
            history,
            registry,
        };
        sync.seed_from_history();
        sync
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.state.set_search_query(query);
        self.publish();
    }

    pub fn toggle_quick_filter(&mut self, id: &str) {
        self.state.toggle_quick_filter(id);
        self.publish();
    }

    pub fn set_multi_select_enabled(&mut self, enabled: bool) {
        self.state.set_multi_select_enabled(enabled);
        self.publish();
    }

    pub fn reset_all(&mut self) {
        self.state.reset_all();
        self.publish();
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.state.set_view_mode(mode);
        self.publish();
    }

    pub fn set_column_visibility(&mut self, column: Column, visible: bool) {
        self.state.set_column_visibility(column, visible);
    }

    pub fn set_sort(&mut self, sort: Option<SortState>) {
        self.state.set_sort(sort);
    }

    pub fn set_page_index(&mut self, page_index: usize) {
        self.state.set_page_index(page_index);
    }

    pub fn back(&mut self) -> bool {
        let moved = self.history.back();
        if moved {
            self.seed_from_history();
        }
        moved
    }

    pub fn forward(&mut self) -> bool {
        let moved = self.history.forward();
        if moved {
            self.seed_from_history();
        }
        moved
    }

    fn publish(&mut self) {
        let next = encode(self.history.current(), self.state.filter(), self.state.view_mode());
        if &next != self.history.current() {
            debug!("History push {}", next);
            self.history.push(next);
        }
    }

    fn seed_from_history(&mut self) {
        let decoded = decode(self.history.current(), &self.registry);
        let multi_select = self.state.filter().multi_select_enabled();
        self.state.replace_filter(decoded.filter_state(multi_select));
        self.state.set_view_mode(decoded.view_mode);
    }
}
