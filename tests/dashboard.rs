//! End-to-end checks of the filtering, grouping and state engine over
//! normalized upstream entries.

use rwrs_browser::filters::search::{matches, SearchQuery};
use rwrs_browser::filters::{FilterComposer, FilterState, GlobalFilter, QuickFilterRegistry};
use rwrs_browser::grouping::group_by_map;
use rwrs_browser::models::catalog::{MapCatalog, MapCatalogEntry};
use rwrs_browser::models::server::{normalize_batch, ServerRecord};
use rwrs_browser::session::store::{ViewMode, ViewState};
use rwrs_browser::session::sync::{decode, encode};
use rwrs_browser::view::{render, DashboardView};
use serde_json::{json, Value};
use url::Url;

fn records(entries: Vec<Value>) -> Vec<ServerRecord> {
    normalize_batch(entries)
}

fn names<'r>(kept: &[&'r ServerRecord]) -> Vec<&'r str> {
    kept.iter().map(|r| r.name.as_str()).collect()
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// PROPERTY CHECKS
mod properties {
    use super::*;

    #[test]
    fn empty_search_matches_every_record() {
        let all = records(vec![
            json!({ "name": "a" }),
            json!({}),
            json!({ "player_list": [1, 2] }),
        ]);
        assert!(all.iter().all(|r| matches(r, &SearchQuery::new(""))));
    }

    #[test]
    fn search_ignores_case() {
        let all = records(vec![json!({ "name": "Dust ABC Arena", "country": "Abcland" })]);
        assert_eq!(
            matches(&all[0], &SearchQuery::new("ABC")),
            matches(&all[0], &SearchQuery::new("abc"))
        );
        assert!(matches(&all[0], &SearchQuery::new("AbC")));
    }

    #[test]
    fn disjoint_quick_filters_union() {
        let all = records(vec![
            json!({ "name": "x", "realm": "official_invasion" }),
            json!({ "name": "y", "realm": "official_pacific" }),
        ]);
        let registry = QuickFilterRegistry::builtin();
        let composer = FilterComposer::new(&registry);

        let both = FilterState::new("", ids(&["invasion", "ww2_invasion"]), true);
        assert_eq!(names(&composer.compose(&all, &GlobalFilter::from(&both))), vec!["x", "y"]);
    }

    #[test]
    fn no_quick_filters_is_search_only() {
        let all = records(vec![
            json!({ "name": "alpha", "realm": "community" }),
            json!({ "name": "beta", "realm": "official_invasion" }),
            json!({ "name": "alphabet", "realm": "official_dominance" }),
        ]);
        let registry = QuickFilterRegistry::builtin();
        let composer = FilterComposer::new(&registry);

        let kept = composer.compose(&all, &GlobalFilter::from(&FilterState::new("alpha", Vec::new(), false)));
        let expected: Vec<_> = all
            .iter()
            .filter(|r| matches(r, &SearchQuery::new("alpha")))
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names(&kept), expected);
    }

    #[test]
    fn filter_changes_return_to_first_page() {
        let mut state = ViewState::new(10);
        state.set_page_index(5);
        state.set_search_query("a");
        assert_eq!(state.pagination().page_index(), 0);

        state.set_page_index(5);
        state.toggle_quick_filter("invasion");
        assert_eq!(state.pagination().page_index(), 0);
    }

    #[test]
    fn grouping_lists_empty_maps_in_catalog_order() {
        let catalog = MapCatalog::new(vec![(
            "invasion".to_string(),
            vec![
                MapCatalogEntry::new("map3", "Three"),
                MapCatalogEntry::new("map1", "One"),
                MapCatalogEntry::new("map2", "Two"),
            ],
        )]);
        let all = records(vec![
            json!({ "name": "a", "map_id": "maps/map2" }),
            json!({ "name": "b", "map_id": "maps/map2" }),
        ]);
        let refs: Vec<&ServerRecord> = all.iter().collect();

        let groups = group_by_map(&refs, &["invasion"], &catalog);
        let order: Vec<_> = groups.iter().map(|(m, s)| (m.id.as_str(), s.len())).collect();
        assert_eq!(order, vec![("map3", 0), ("map1", 0), ("map2", 2)]);
    }

    #[test]
    fn url_round_trip() {
        let registry = QuickFilterRegistry::builtin();
        let base = Url::parse("https://rwrs.example/").unwrap();
        let filter = FilterState::new("50% [EU] ünïcode", ids(&["dominance", "helldivers"]), true);

        let decoded = decode(&encode(&base, &filter, ViewMode::Map), &registry);
        assert_eq!(decoded.search, filter.search_query());
        assert_eq!(decoded.quick_filters, filter.active_quick_filters());
        assert_eq!(decoded.view_mode, ViewMode::Map);
    }

    #[test]
    fn leaving_multi_select_keeps_last_activated() {
        let mut state = FilterState::new("", ids(&["a", "b"]), true);
        state.set_multi_select_enabled(false);
        assert_eq!(state.active_quick_filters(), ids(&["b"]).as_slice());
    }
}

/// SCENARIOS
mod scenarios {
    use super::*;

    #[test]
    fn invasion_filter_keeps_order() {
        let all = records(vec![
            json!({ "name": "first", "realm": "official_invasion" }),
            json!({ "name": "second", "realm": "official_dominance" }),
            json!({ "name": "third", "realm": "official_invasion" }),
        ]);
        let registry = QuickFilterRegistry::builtin();
        let composer = FilterComposer::new(&registry);
        let state = FilterState::new("", ids(&["invasion"]), false);

        assert_eq!(
            names(&composer.compose(&all, &GlobalFilter::from(&state))),
            vec!["first", "third"]
        );
    }

    #[test]
    fn search_hits_last_map_segment() {
        let all = records(vec![json!({ "name": "Test Server", "map_id": "maps/islands01" })]);
        assert!(matches(&all[0], &SearchQuery::new("island")));
    }

    #[test]
    fn malformed_player_entries_are_skipped() {
        let all = records(vec![json!({ "player_list": ["Alice", 42, "Bob"] })]);
        assert!(matches(&all[0], &SearchQuery::new("Bob")));
        assert_eq!(all[0].player_list.len(), 3);
    }

    #[test]
    fn union_without_filters_deduplicates() {
        let catalog = MapCatalog::new(vec![
            (
                "invasion".to_string(),
                vec![MapCatalogEntry::new("m1", "M1"), MapCatalogEntry::new("m2", "M2")],
            ),
            (
                "dominance".to_string(),
                vec![MapCatalogEntry::new("m2", "M2"), MapCatalogEntry::new("m3", "M3")],
            ),
        ]);
        let groups = group_by_map::<&str>(&[], &[], &catalog);
        let order: Vec<_> = groups.sorted_maps.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(order, vec!["m1", "m2", "m3"]);
    }

    #[test]
    fn table_and_map_views_render_same_filter() {
        let all = records(vec![
            json!({ "name": "a", "realm": "official_invasion", "map_id": "maps/map1", "current_players": 3 }),
            json!({ "name": "b", "realm": "official_invasion", "map_id": "maps/custom", "current_players": 4 }),
            json!({ "name": "c", "realm": "community", "map_id": "maps/map1", "current_players": 5 }),
        ]);
        let registry = QuickFilterRegistry::builtin();
        let catalog = MapCatalog::builtin().unwrap();

        let mut state = ViewState::new(20);
        state.toggle_quick_filter("invasion");

        match render(&all, &state, &registry, &catalog) {
            DashboardView::Table(table) => {
                assert_eq!(table.rows.len(), 2);
                assert_eq!(table.stats.filtered_players, 7);
                assert_eq!(table.stats.total_players, 12);
            }
            DashboardView::Map(_) => panic!("expected table view"),
        }

        state.set_view_mode(ViewMode::Map);
        match render(&all, &state, &registry, &catalog) {
            DashboardView::Map(map) => {
                let map1 = map.maps.iter().find(|m| m.id == "map1").unwrap();
                assert_eq!(map1.count, 1);
                assert_eq!(map.omitted, 1);
                assert_eq!(map.stats.filtered_servers, 2);
            }
            DashboardView::Table(_) => panic!("expected map view"),
        }
    }
}
