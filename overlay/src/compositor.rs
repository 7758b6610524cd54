//! The overlay compositing pass.
//!
//! For each decoded record, in package order: resolve its hash against the
//! catalog, resolve the prefab to a custom-type descriptor, lazily create the
//! destination layer for its source group, obtain the icon through the
//! pass-scoped [`IconCache`], map the world position to overlay pixels, blit
//! with alpha testing, and stamp the 2x2 marker. Per-record failures become
//! [`RecordOutcome::Skipped`] values; they never abort the rest of the batch.

use std::collections::BTreeSet;
use std::fmt;

use locmap_protocol::{LocationRecord, TypeHash};
use tracing::warn;

use crate::catalog::{Catalog, TypeRegistry};
use crate::config::OverlayConfig;
use crate::drawing;
use crate::host::OverlayHost;
use crate::icon_cache::IconCache;
use crate::map_data::{CoordMapper, OverlayPos};
use crate::render::IconRenderer;

/// Why a record was skipped. Skips are per-record and non-fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The type hash resolved to no catalog entry.
    UnknownHash,
    /// The catalog entry exists but is not a registered custom type.
    NotCustom,
    /// The icon render collaborator failed.
    RenderFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownHash => write!(f, "type hash not found in catalog"),
            Self::NotCustom => write!(f, "prefab is not a registered custom type"),
            Self::RenderFailed(msg) => write!(f, "icon render failed: {msg}"),
        }
    }
}

/// Outcome of compositing one record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Placed {
        group: String,
    },
    Skipped {
        hash: TypeHash,
        reason: SkipReason,
    },
}

/// Result of one compositing pass.
#[derive(Debug, Default)]
pub struct PassSummary {
    pub placed: usize,
    pub skipped: usize,
    /// Per-record outcomes, in package order.
    pub outcomes: Vec<RecordOutcome>,
}

/// Composites location records onto overlay layers.
///
/// Holds only borrowed collaborators; the icon cache is created fresh for
/// every pass so cached bitmaps never outlive it.
pub struct OverlayCompositor<'a> {
    catalog: &'a dyn Catalog,
    registry: &'a dyn TypeRegistry,
    renderer: &'a dyn IconRenderer,
    mapper: &'a dyn CoordMapper,
    config: OverlayConfig,
}

impl<'a> OverlayCompositor<'a> {
    pub fn new(
        catalog: &'a dyn Catalog,
        registry: &'a dyn TypeRegistry,
        renderer: &'a dyn IconRenderer,
        mapper: &'a dyn CoordMapper,
        config: OverlayConfig,
    ) -> Self {
        OverlayCompositor {
            catalog,
            registry,
            renderer,
            mapper,
            config,
        }
    }

    /// Run one compositing pass over `records`.
    ///
    /// An empty record set performs zero host calls and zero pixel writes.
    /// Every layer touched during the pass is committed exactly once after
    /// the last record, regardless of how many records landed on it.
    pub fn composite(
        &self,
        records: &[LocationRecord],
        host: &mut dyn OverlayHost,
    ) -> PassSummary {
        let mut summary = PassSummary::default();
        if records.is_empty() {
            return summary;
        }

        let mut icons = IconCache::new(self.renderer);
        let mut touched: BTreeSet<String> = BTreeSet::new();
        for record in records {
            let outcome = self.place_record(record, host, &mut icons, &mut touched);
            match &outcome {
                RecordOutcome::Placed { .. } => summary.placed += 1,
                RecordOutcome::Skipped { hash, reason } => {
                    warn!(%hash, %reason, "skipping location record");
                    summary.skipped += 1;
                }
            }
            summary.outcomes.push(outcome);
        }

        for group in &touched {
            if let Some(layer) = host.layer_mut(group) {
                layer.commit();
            }
        }
        summary
    }

    fn place_record(
        &self,
        record: &LocationRecord,
        host: &mut dyn OverlayHost,
        icons: &mut IconCache<'_>,
        touched: &mut BTreeSet<String>,
    ) -> RecordOutcome {
        let hash = record.type_hash;
        let Some(prefab) = self.catalog.lookup_by_hash(hash) else {
            return RecordOutcome::Skipped {
                hash,
                reason: SkipReason::UnknownHash,
            };
        };
        let Some(custom) = self.registry.resolve_custom_type(&prefab.prefab_name) else {
            return RecordOutcome::Skipped {
                hash,
                reason: SkipReason::NotCustom,
            };
        };

        let layer = host.get_or_create(&custom.source_label, self.config.ignore_fog);
        touched.insert(custom.source_label.clone());

        let icon = match icons.get_or_render(hash, &prefab) {
            Ok(icon) => icon,
            Err(err) => {
                return RecordOutcome::Skipped {
                    hash,
                    reason: SkipReason::RenderFailed(err.to_string()),
                };
            }
        };

        let (mx, my) = self
            .mapper
            .world_to_overlay(record.position, layer.texture_size());
        let anchor = OverlayPos {
            x: mx as i32,
            y: my as i32,
        };
        drawing::blit_icon(layer, icon, anchor);
        drawing::stamp_marker(layer, anchor);

        RecordOutcome::Placed {
            group: custom.source_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PoiInstance, PrefabDescriptor};
    use crate::drawing::MARKER_COLOR;
    use crate::host::OverlayManager;
    use crate::map_data::MapInfo;
    use crate::memory::{FlatIconRenderer, StaticCatalog, StaticRegistry};
    use crate::render::RenderRequest;
    use image::{Rgba, RgbaImage};
    use locmap_protocol::Vec3;

    const ALTAR_HASH: TypeHash = TypeHash(101);
    const UNKNOWN_HASH: TypeHash = TypeHash(666);

    fn world() -> (StaticCatalog, StaticRegistry) {
        let catalog = StaticCatalog::new(vec![PoiInstance {
            prefab_name: "ancient_altar".to_string(),
            position: Vec3::new(0.0, 0.0, 0.0),
            type_hash: ALTAR_HASH,
        }]);
        let mut registry = StaticRegistry::new();
        registry.register("ancient_altar", "ruins");
        (catalog, registry)
    }

    fn record(hash: TypeHash, x: f32, z: f32) -> LocationRecord {
        LocationRecord {
            type_hash: hash,
            position: Vec3::new(x, 0.0, z),
        }
    }

    const MAP: MapInfo = MapInfo {
        world_diameter: 128.0,
    };

    #[test]
    fn empty_batch_touches_nothing() {
        let (catalog, registry) = world();
        let renderer = FlatIconRenderer::new(Rgba([255, 255, 255, 255]), 8);
        let compositor = OverlayCompositor::new(
            &catalog,
            &registry,
            &renderer,
            &MAP,
            OverlayConfig::default(),
        );
        let mut host = OverlayManager::new(64);
        let summary = compositor.composite(&[], &mut host);
        assert_eq!(summary.placed, 0);
        assert_eq!(summary.skipped, 0);
        assert!(host.is_empty());
        assert_eq!(renderer.render_count(), 0);
    }

    #[test]
    fn unresolvable_record_skipped_rest_placed() {
        let (catalog, registry) = world();
        let renderer = FlatIconRenderer::new(Rgba([255, 255, 255, 255]), 8);
        let compositor = OverlayCompositor::new(
            &catalog,
            &registry,
            &renderer,
            &MAP,
            OverlayConfig::default(),
        );
        let mut host = OverlayManager::new(64);
        let records = vec![
            record(ALTAR_HASH, -20.0, 20.0),
            record(ALTAR_HASH, -10.0, 20.0),
            record(UNKNOWN_HASH, 0.0, 0.0),
            record(ALTAR_HASH, 10.0, -20.0),
            record(ALTAR_HASH, 20.0, -20.0),
        ];
        let summary = compositor.composite(&records, &mut host);
        assert_eq!(summary.placed, 4);
        assert_eq!(summary.skipped, 1);
        assert_eq!(
            summary.outcomes[2],
            RecordOutcome::Skipped {
                hash: UNKNOWN_HASH,
                reason: SkipReason::UnknownHash,
            }
        );
        // One shared prefab, one render.
        assert_eq!(renderer.render_count(), 1);
    }

    #[test]
    fn non_custom_prefab_skipped() {
        let catalog = StaticCatalog::new(vec![PoiInstance {
            prefab_name: "stone_circle".to_string(),
            position: Vec3::new(0.0, 0.0, 0.0),
            type_hash: TypeHash(5),
        }]);
        let registry = StaticRegistry::new();
        let renderer = FlatIconRenderer::new(Rgba([255, 255, 255, 255]), 8);
        let compositor = OverlayCompositor::new(
            &catalog,
            &registry,
            &renderer,
            &MAP,
            OverlayConfig::default(),
        );
        let mut host = OverlayManager::new(64);
        let summary = compositor.composite(&[record(TypeHash(5), 0.0, 0.0)], &mut host);
        assert_eq!(
            summary.outcomes[0],
            RecordOutcome::Skipped {
                hash: TypeHash(5),
                reason: SkipReason::NotCustom,
            }
        );
        assert!(host.is_empty());
    }

    struct FailingRenderer;

    impl crate::render::IconRenderer for FailingRenderer {
        fn render(
            &self,
            _prefab: &PrefabDescriptor,
            _request: &RenderRequest,
        ) -> Result<RgbaImage, crate::OverlayError> {
            Err(crate::OverlayError::Render("prefab has no visual".into()))
        }
    }

    #[test]
    fn render_failure_skips_record_but_commits_layer() {
        let (catalog, registry) = world();
        let renderer = FailingRenderer;
        let compositor = OverlayCompositor::new(
            &catalog,
            &registry,
            &renderer,
            &MAP,
            OverlayConfig::default(),
        );
        let mut host = OverlayManager::new(64);
        let summary = compositor.composite(&[record(ALTAR_HASH, 0.0, 0.0)], &mut host);
        assert_eq!(summary.placed, 0);
        assert_eq!(summary.skipped, 1);
        // The layer was created before the render attempt and still gets its
        // commit, matching the touched-layer contract.
        let layer = host.layer("ruins").unwrap();
        assert_eq!(layer.commit_count(), 1);
    }

    #[test]
    fn marker_stamped_at_mapped_anchor() {
        let (catalog, registry) = world();
        let renderer = FlatIconRenderer::new(Rgba([0, 255, 0, 255]), 0);
        let compositor = OverlayCompositor::new(
            &catalog,
            &registry,
            &renderer,
            &MAP,
            OverlayConfig::default(),
        );
        let mut host = OverlayManager::new(64);
        let summary = compositor.composite(&[record(ALTAR_HASH, 16.0, 16.0)], &mut host);
        assert_eq!(summary.placed, 1);
        let layer = host.layer("ruins").unwrap();
        // world (16, 16) on a 128-unit map -> pixel (40, 40)
        for (x, y) in [(39, 39), (40, 39), (39, 40), (40, 40)] {
            assert_eq!(layer.pixel(x, y), Some(MARKER_COLOR));
        }
        // New layers stay disabled until the embedding UI enables them.
        assert!(!layer.enabled);
        assert!(layer.ignore_fog);
    }

    #[test]
    fn shared_layer_committed_once() {
        let (catalog, registry) = world();
        let renderer = FlatIconRenderer::new(Rgba([255, 255, 255, 255]), 8);
        let compositor = OverlayCompositor::new(
            &catalog,
            &registry,
            &renderer,
            &MAP,
            OverlayConfig::default(),
        );
        let mut host = OverlayManager::new(64);
        let records = vec![
            record(ALTAR_HASH, -20.0, 0.0),
            record(ALTAR_HASH, 0.0, 0.0),
            record(ALTAR_HASH, 20.0, 0.0),
        ];
        compositor.composite(&records, &mut host);
        assert_eq!(host.layer("ruins").unwrap().commit_count(), 1);
    }
}
