// src/grouping.rs
use crate::models::catalog::{MapCatalog, MapCatalogEntry};
use crate::models::server::ServerRecord;
use log::debug;
use std::collections::HashMap;

/// Filtered servers bucketed by map, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct MapGroups<'r> {
    pub sorted_maps: Vec<MapCatalogEntry>,
    pub servers_by_map: HashMap<String, Vec<&'r ServerRecord>>,
    /// Servers whose map is not in the selected catalogs. They are left out
    /// of every bucket and only counted here.
    pub omitted: usize,
}

impl<'r> MapGroups<'r> {
    pub fn servers(&self, map_id: &str) -> &[&'r ServerRecord] {
        self.servers_by_map
            .get(map_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn count(&self, map_id: &str) -> usize {
        self.servers(map_id).len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MapCatalogEntry, &[&'r ServerRecord])> {
        self.sorted_maps
            .iter()
            .map(|entry| (entry, self.servers(&entry.id)))
    }
}

/// Groups `records` under the maps of the active categories (all categories
/// when none is active). Every catalog map gets a bucket, empty or not.
pub fn group_by_map<'r, S: AsRef<str>>(
    records: &[&'r ServerRecord],
    active_quick_filters: &[S],
    catalog: &MapCatalog,
) -> MapGroups<'r> {
    let sorted_maps = catalog.union(active_quick_filters);
    let mut servers_by_map: HashMap<String, Vec<&'r ServerRecord>> = sorted_maps
        .iter()
        .map(|entry| (entry.id.clone(), Vec::new()))
        .collect();

    let mut omitted = 0;
    for record in records {
        match servers_by_map.get_mut(record.map_key()) {
            Some(bucket) => bucket.push(*record),
            None => omitted += 1,
        }
    }

    if omitted > 0 {
        debug!("{} servers have no map bucket in the grouped view", omitted);
    }

    MapGroups {
        sorted_maps,
        servers_by_map,
        omitted,
    }
}
