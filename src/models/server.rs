// src/models/server.rs
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry as the upstream list hands it over. Every field is optional and
/// loosely typed; `ServerRecord::from_raw` decides what each one means.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawServer {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub ip_address: Option<Value>,
    #[serde(default)]
    pub port: Option<Value>,
    #[serde(default)]
    pub map_id: Option<Value>,
    #[serde(default)]
    pub map_name: Option<Value>,
    #[serde(default)]
    pub bots: Option<Value>,
    #[serde(default)]
    pub country: Option<Value>,
    #[serde(default)]
    pub current_players: Option<Value>,
    #[serde(default)]
    pub max_players: Option<Value>,
    #[serde(default)]
    pub version: Option<Value>,
    #[serde(default)]
    pub dedicated: Option<Value>,
    #[serde(default, rename = "mod")]
    pub mod_code: Option<Value>,
    #[serde(default)]
    pub player_list: Option<Value>,
    #[serde(default)]
    pub comment: Option<Value>,
    #[serde(default)]
    pub url: Option<Value>,
    #[serde(default)]
    pub mode: Option<Value>,
    #[serde(default)]
    pub realm: Option<Value>,
}

/// A player list slot. Upstream occasionally puts numbers or nulls in the
/// list; those are kept so nothing is lost, and skipped at display time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlayerEntry {
    Name(String),
    Other(Value),
}

impl PlayerEntry {
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRecord {
    pub name: String,
    pub ip_address: String,
    pub port: u16,
    pub map_id: String,
    pub map_name: Option<String>,
    pub bots: u32,
    pub country: String,
    pub current_players: u32,
    pub max_players: u32,
    pub version: String,
    pub dedicated: bool,
    #[serde(rename = "mod")]
    pub mod_code: i64,
    pub player_list: Vec<PlayerEntry>,
    pub comment: Option<String>,
    pub url: Option<String>,
    pub mode: String,
    pub realm: String,
}

impl ServerRecord {
    pub fn from_raw(raw: RawServer) -> Self {
        Self {
            name: text(raw.name.as_ref()),
            ip_address: text(raw.ip_address.as_ref()),
            port: integer(raw.port.as_ref())
                .and_then(|p| u16::try_from(p).ok())
                .unwrap_or(0),
            map_id: text(raw.map_id.as_ref()),
            map_name: optional_text(raw.map_name.as_ref()),
            bots: count(raw.bots.as_ref()),
            country: text(raw.country.as_ref()),
            current_players: count(raw.current_players.as_ref()),
            max_players: count(raw.max_players.as_ref()),
            version: text(raw.version.as_ref()),
            dedicated: flag(raw.dedicated.as_ref()),
            mod_code: integer(raw.mod_code.as_ref()).unwrap_or(0),
            player_list: players(raw.player_list),
            comment: optional_text(raw.comment.as_ref()),
            url: optional_text(raw.url.as_ref()),
            mode: text(raw.mode.as_ref()),
            realm: text(raw.realm.as_ref()),
        }
    }

    /// `ip:port`, unique within one fetch.
    pub fn key(&self) -> String {
        format!("{}:{}", self.ip_address, self.port)
    }

    /// Last path segment of `map_id`, e.g. `islands01` for `maps/islands01`.
    pub fn map_key(&self) -> &str {
        self.map_id.rsplit('/').next().unwrap_or_default()
    }

    pub fn mod_active(&self) -> bool {
        self.mod_code == 1
    }

    /// Every string entry of the player list, empty ones included.
    pub fn player_names(&self) -> impl Iterator<Item = &str> {
        self.player_list.iter().filter_map(PlayerEntry::as_name)
    }

    /// Player names fit for display: strings only, never empty.
    pub fn display_players(&self) -> Vec<&str> {
        self.player_names().filter(|name| !name.is_empty()).collect()
    }
}

/// Normalizes a whole upstream batch. Entries that are not objects at all
/// cannot describe a server and are skipped; anything else degrades field by
/// field instead of failing.
pub fn normalize_batch(entries: Vec<Value>) -> Vec<ServerRecord> {
    let total = entries.len();
    let records: Vec<ServerRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<RawServer>(entry) {
            Ok(raw) => Some(ServerRecord::from_raw(raw)),
            Err(e) => {
                debug!("Skipping server entry {}: {}", index, e);
                None
            }
        })
        .collect();

    if records.len() != total {
        debug!("Normalized {} of {} server entries", records.len(), total);
    }
    records
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn optional_text(value: Option<&Value>) -> Option<String> {
    Some(text(value)).filter(|s| !s.is_empty())
}

fn integer(value: Option<&Value>) -> Option<i64> {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

fn count(value: Option<&Value>) -> u32 {
    integer(value)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}

fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        Some(Value::String(s)) => matches!(s.trim(), "1" | "true"),
        _ => false,
    }
}

fn players(value: Option<Value>) -> Vec<PlayerEntry> {
    match value {
        Some(Value::String(name)) => vec![PlayerEntry::Name(name)],
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(name) => PlayerEntry::Name(name),
                other => PlayerEntry::Other(other),
            })
            .collect(),
        _ => Vec::new(),
    }
}
