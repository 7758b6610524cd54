use locmap_protocol::LocationRecord;
use tracing::debug;

use crate::catalog::{Catalog, TypeRegistry};

/// Select the custom point-of-interest instances eligible for sync.
///
/// Filters the catalog to prefabs registered as custom types and orders them
/// by descending north coordinate (z), then ascending east coordinate (x).
/// The ordering is total and stable, so repeated calls over unchanged state
/// encode to byte-identical packages.
pub fn select_records(catalog: &dyn Catalog, registry: &dyn TypeRegistry) -> Vec<LocationRecord> {
    let mut instances: Vec<_> = catalog
        .list_points_of_interest()
        .into_iter()
        .filter(|poi| registry.is_custom_type(&poi.prefab_name))
        .collect();
    instances.sort_by(|a, b| {
        b.position
            .z
            .total_cmp(&a.position.z)
            .then(a.position.x.total_cmp(&b.position.x))
    });
    debug!(count = instances.len(), "selected custom location instances");
    instances
        .into_iter()
        .map(|poi| LocationRecord {
            type_hash: poi.type_hash,
            position: poi.position,
        })
        .collect()
}
