// src/filters/quick.rs
use crate::models::server::ServerRecord;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref CASTLING_TAG: Regex = Regex::new(
        r"^\[Castling\](\[Global\])?\[[A-Za-z0-9_!\\?]+(-[0-9])?\s(LV[0-9]|FOV)\]"
    )
    .expect("castling tag pattern");
    static ref HELLDIVERS_TAG: Regex = Regex::new(r"^\[地狱潜兵\]").expect("helldivers tag pattern");
}

pub type Predicate = fn(&ServerRecord) -> bool;

#[derive(Clone, Copy, Serialize)]
pub struct QuickFilter {
    pub id: &'static str,
    pub label: &'static str,
    #[serde(skip)]
    predicate: Predicate,
}

impl QuickFilter {
    pub const fn new(id: &'static str, label: &'static str, predicate: Predicate) -> Self {
        Self {
            id,
            label,
            predicate,
        }
    }

    pub fn matches(&self, record: &ServerRecord) -> bool {
        (self.predicate)(record)
    }
}

impl std::fmt::Debug for QuickFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuickFilter")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish()
    }
}

fn official_invasion(record: &ServerRecord) -> bool {
    record.realm == "official_invasion"
}

fn official_pacific(record: &ServerRecord) -> bool {
    record.realm == "official_pacific"
}

fn official_dominance(record: &ServerRecord) -> bool {
    record.realm == "official_dominance"
}

fn castling(record: &ServerRecord) -> bool {
    record.mode.to_lowercase().contains("castling") && CASTLING_TAG.is_match(&record.name)
}

fn helldivers(record: &ServerRecord) -> bool {
    record.mode.to_lowercase().contains("hd") && HELLDIVERS_TAG.is_match(&record.name)
}

/// The fixed set of category filters, in button order.
#[derive(Debug, Clone)]
pub struct QuickFilterRegistry {
    filters: Vec<QuickFilter>,
}

impl QuickFilterRegistry {
    pub fn new(filters: Vec<QuickFilter>) -> Self {
        Self { filters }
    }

    pub fn builtin() -> Self {
        Self::new(vec![
            QuickFilter::new("invasion", "Official Invasion", official_invasion),
            QuickFilter::new("ww2_invasion", "Official WW2 Invasion", official_pacific),
            QuickFilter::new("dominance", "Official Dominance", official_dominance),
            QuickFilter::new("castling", "Official Mod Castling", castling),
            QuickFilter::new("helldivers", "Official Mod HellDivers", helldivers),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&QuickFilter> {
        self.filters.iter().find(|filter| filter.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuickFilter> {
        self.filters.iter()
    }
}

impl Default for QuickFilterRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
