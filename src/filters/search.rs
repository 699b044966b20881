// src/filters/search.rs
use crate::models::server::ServerRecord;

/// A free-text query, lower-cased once at construction so matching never
/// has to redo it per record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(raw: &str) -> Self {
        Self(raw.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// True when any searchable field of `record` contains the query. The empty
/// query matches everything.
pub fn matches(record: &ServerRecord, query: &SearchQuery) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.as_str();
    let contains = |field: &str| field.to_lowercase().contains(needle);

    contains(record.name.as_str())
        || record.ip_address.contains(needle)
        || record.port.to_string().contains(needle)
        || contains(record.country.as_str())
        || contains(record.mode.as_str())
        // Map key and version are folded too, so "island" finds "Islands01".
        || contains(record.map_key())
        || record.comment.as_deref().is_some_and(contains)
        || record.url.as_deref().is_some_and(contains)
        || contains(record.version.as_str())
        || record.current_players.to_string().contains(needle)
        || record.player_names().any(contains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::server::RawServer;
    use serde_json::json;

    fn server() -> ServerRecord {
        let raw: RawServer = serde_json::from_value(json!({
            "name": "Test Server",
            "ip_address": "192.168.1.20",
            "port": 1240,
            "map_id": "maps/Islands01",
            "country": "Finland",
            "mode": "COOP",
            "comment": "Friendly admins",
            "version": "1.96",
            "current_players": 17,
            "player_list": ["Alice", 42, "Bob"]
        }))
        .unwrap();
        ServerRecord::from_raw(raw)
    }

    fn hit(query: &str) -> bool {
        matches(&server(), &SearchQuery::new(query))
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(hit(""));
        assert!(matches(&ServerRecord::from_raw(RawServer::default()), &SearchQuery::default()));
    }

    #[test]
    fn matches_each_field() {
        assert!(hit("test"));
        assert!(hit("168.1"));
        assert!(hit("124"));
        assert!(hit("finl"));
        assert!(hit("coop"));
        assert!(hit("island"));
        assert!(hit("admins"));
        assert!(hit("1.9"));
        assert!(hit("17"));
        assert!(hit("bob"));
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(hit("ALICE"), hit("alice"));
        assert!(hit("FRIENDLY"));
    }

    #[test]
    fn mixed_case_map_and_version_fold() {
        let raw: RawServer = serde_json::from_value(json!({
            "map_id": "media/maps/Islands01",
            "version": "1.96-BETA"
        }))
        .unwrap();
        let record = ServerRecord::from_raw(raw);
        assert!(matches(&record, &SearchQuery::new("island")));
        assert!(matches(&record, &SearchQuery::new("ISLANDS01")));
        assert!(matches(&record, &SearchQuery::new("beta")));
    }

    #[test]
    fn map_prefix_is_not_searched() {
        assert!(!hit("maps/"));
    }

    #[test]
    fn non_string_players_are_skipped() {
        assert!(!hit("42"));
    }

    #[test]
    fn absent_optional_fields_never_match() {
        assert!(!hit("http"));
    }
}
