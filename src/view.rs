// src/view.rs
use crate::filters::highlight::{highlight, Segment};
use crate::filters::{FilterComposer, GlobalFilter, QuickFilterRegistry};
use crate::grouping::group_by_map;
use crate::models::catalog::MapCatalog;
use crate::models::server::ServerRecord;
use crate::session::store::{Pagination, ViewMode, ViewState};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;

const STEAM_APP_ID: u32 = 270150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Name,
    IpAddress,
    Port,
    MapName,
    Bots,
    Country,
    CurrentPlayers,
    Dedicated,
    Mod,
    Mode,
    PlayerList,
    Comment,
    Url,
    Realm,
    Version,
    Action,
}

impl Column {
    pub const ALL: [Column; 16] = [
        Column::Name,
        Column::IpAddress,
        Column::Port,
        Column::MapName,
        Column::Bots,
        Column::Country,
        Column::CurrentPlayers,
        Column::Dedicated,
        Column::Mod,
        Column::Mode,
        Column::PlayerList,
        Column::Comment,
        Column::Url,
        Column::Realm,
        Column::Version,
        Column::Action,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::IpAddress => "ip_address",
            Self::Port => "port",
            Self::MapName => "map_name",
            Self::Bots => "bots",
            Self::Country => "country",
            Self::CurrentPlayers => "current_players",
            Self::Dedicated => "dedicated",
            Self::Mod => "mod",
            Self::Mode => "mode",
            Self::PlayerList => "player_list",
            Self::Comment => "comment",
            Self::Url => "url",
            Self::Realm => "realm",
            Self::Version => "version",
            Self::Action => "action",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.id() == id)
    }

    pub fn visible_by_default(self) -> bool {
        !matches!(
            self,
            Self::Dedicated | Self::Mod | Self::Comment | Self::Url | Self::Realm | Self::Version
        )
    }

    pub fn sortable(self) -> bool {
        !matches!(
            self,
            Self::Dedicated | Self::Mod | Self::PlayerList | Self::Comment | Self::Url | Self::Action
        )
    }

    /// Display value of this column for one server.
    pub fn cell(self, record: &ServerRecord) -> Value {
        match self {
            Self::Name => json!(record.name),
            Self::IpAddress => json!(record.ip_address),
            Self::Port => json!(record.port),
            Self::MapName => json!(record.map_key()),
            Self::Bots => json!(record.bots),
            Self::Country => json!(record.country),
            Self::CurrentPlayers => {
                json!(format!("{}/{}", record.current_players, record.max_players))
            }
            Self::Dedicated => json!(yes_no(record.dedicated)),
            Self::Mod => json!(yes_no(record.mod_active())),
            Self::Mode => json!(record.mode),
            Self::PlayerList => json!(record.display_players()),
            Self::Comment => json!(record.comment),
            Self::Url => json!(record.url),
            Self::Realm => json!(record.realm),
            Self::Version => json!(record.version),
            Self::Action => json!(join_link(record)),
        }
    }

    fn compare(self, a: &ServerRecord, b: &ServerRecord) -> Ordering {
        match self {
            Self::Name => text_order(&a.name, &b.name),
            Self::IpAddress => a.ip_address.cmp(&b.ip_address),
            Self::Port => a.port.cmp(&b.port),
            Self::MapName => text_order(a.map_key(), b.map_key()),
            Self::Bots => a.bots.cmp(&b.bots),
            Self::Country => text_order(&a.country, &b.country),
            Self::CurrentPlayers => a.current_players.cmp(&b.current_players),
            Self::Mode => text_order(&a.mode, &b.mode),
            Self::Realm => text_order(&a.realm, &b.realm),
            Self::Version => text_order(&a.version, &b.version),
            _ => Ordering::Equal,
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn text_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

pub fn join_link(record: &ServerRecord) -> String {
    format!(
        "steam://rungameid/{}//server_address={} server_port={}",
        STEAM_APP_ID, record.ip_address, record.port
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnVisibility {
    columns: BTreeMap<Column, bool>,
}

impl Default for ColumnVisibility {
    fn default() -> Self {
        Self {
            columns: Column::ALL
                .into_iter()
                .map(|column| (column, column.visible_by_default()))
                .collect(),
        }
    }
}

impl ColumnVisibility {
    /// Exactly the given columns visible, everything else hidden.
    pub fn only(visible: &[Column]) -> Self {
        Self {
            columns: Column::ALL
                .into_iter()
                .map(|column| (column, visible.contains(&column)))
                .collect(),
        }
    }

    pub fn is_visible(&self, column: Column) -> bool {
        self.columns.get(&column).copied().unwrap_or(false)
    }

    pub fn set(&mut self, column: Column, visible: bool) {
        self.columns.insert(column, visible);
    }

    /// Visible columns in table order.
    pub fn visible(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|column| self.is_visible(*column))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: Column,
    pub descending: bool,
}

impl SortState {
    /// `None` for columns that cannot be sorted.
    pub fn new(column: Column, descending: bool) -> Option<Self> {
        column.sortable().then_some(Self { column, descending })
    }
}

/// Stable sort; ties keep their filtered order.
pub fn sort_records(records: &mut [&ServerRecord], sort: SortState) {
    records.sort_by(|a, b| {
        let order = sort.column.compare(a, b);
        if sort.descending {
            order.reverse()
        } else {
            order
        }
    });
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

pub fn page<'a, T>(items: &'a [T], pagination: &Pagination) -> &'a [T] {
    let start = pagination.page_index().saturating_mul(pagination.page_size());
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(pagination.page_size()).min(items.len());
    &items[start..end]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStats {
    pub total_servers: usize,
    pub filtered_servers: usize,
    pub total_players: u64,
    pub filtered_players: u64,
}

impl TableStats {
    pub fn compute(all: &[ServerRecord], filtered: &[&ServerRecord]) -> Self {
        Self {
            total_servers: all.len(),
            filtered_servers: filtered.len(),
            total_players: all.iter().map(|r| u64::from(r.current_players)).sum(),
            filtered_players: filtered.iter().map(|r| u64::from(r.current_players)).sum(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub key: String,
    pub cells: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_segments: Option<Vec<Segment>>,
}

impl TableRow {
    pub fn project(record: &ServerRecord, columns: &[Column], search_query: &str) -> Self {
        let cells = columns
            .iter()
            .map(|column| (column.id().to_string(), column.cell(record)))
            .collect();
        let name_segments = (!search_query.is_empty() && columns.contains(&Column::Name))
            .then(|| highlight(&record.name, search_query));
        Self {
            key: record.key(),
            cells,
            name_segments,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub stats: TableStats,
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub columns: Vec<Column>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapServerSummary {
    pub key: String,
    pub name: String,
    pub ip_address: String,
    pub port: u16,
    pub country: String,
    pub mode: String,
    pub bots: u32,
    pub current_players: u32,
    pub max_players: u32,
    pub map_name: Option<String>,
}

impl From<&ServerRecord> for MapServerSummary {
    fn from(record: &ServerRecord) -> Self {
        Self {
            key: record.key(),
            name: record.name.clone(),
            ip_address: record.ip_address.clone(),
            port: record.port,
            country: record.country.clone(),
            mode: record.mode.clone(),
            bots: record.bots,
            current_players: record.current_players,
            max_players: record.max_players,
            map_name: record.map_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapGroupView {
    pub id: String,
    pub name: String,
    pub count: usize,
    pub servers: Vec<MapServerSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub stats: TableStats,
    pub maps: Vec<MapGroupView>,
    pub omitted: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "viewMode", rename_all = "lowercase")]
pub enum DashboardView {
    Table(TableView),
    Map(MapView),
}

/// Runs one full pass over the snapshot: filter, then either sort and page
/// the table or group by map.
pub fn render(
    records: &[ServerRecord],
    state: &ViewState,
    registry: &QuickFilterRegistry,
    catalog: &MapCatalog,
) -> DashboardView {
    let filter_state = state.filter();
    let composer = FilterComposer::new(registry);
    let mut filtered = composer.compose(records, &GlobalFilter::from(filter_state));
    let stats = TableStats::compute(records, &filtered);

    match state.view_mode() {
        ViewMode::Table => {
            if let Some(sort) = state.sort() {
                sort_records(&mut filtered, sort);
            }
            let pagination = state.pagination();
            let columns = state.columns().visible();
            let rows = page(&filtered, pagination)
                .iter()
                .map(|record| TableRow::project(record, &columns, filter_state.search_query()))
                .collect();

            DashboardView::Table(TableView {
                stats,
                page_index: pagination.page_index(),
                page_size: pagination.page_size(),
                page_count: page_count(filtered.len(), pagination.page_size()),
                columns,
                rows,
            })
        }
        ViewMode::Map => {
            let groups = group_by_map(&filtered, filter_state.active_quick_filters(), catalog);
            let maps = groups
                .iter()
                .map(|(entry, servers)| MapGroupView {
                    id: entry.id.clone(),
                    name: entry.name.clone(),
                    count: servers.len(),
                    servers: servers.iter().map(|record| MapServerSummary::from(*record)).collect(),
                })
                .collect();

            DashboardView::Map(MapView {
                stats,
                maps,
                omitted: groups.omitted,
            })
        }
    }
}
