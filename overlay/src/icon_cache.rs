use std::collections::HashMap;
use std::collections::hash_map::Entry;

use image::RgbaImage;
use locmap_protocol::TypeHash;
use tracing::debug;

use crate::catalog::PrefabDescriptor;
use crate::error::OverlayError;
use crate::render::{IconRenderer, RenderRequest};

/// Pass-scoped cache of rendered icon bitmaps, keyed by type hash.
///
/// Guarantees at most one render call per distinct hash. No eviction: the
/// cache lives for exactly one compositing pass and is rebuilt on the next.
pub struct IconCache<'a> {
    renderer: &'a dyn IconRenderer,
    icons: HashMap<TypeHash, RgbaImage>,
}

impl<'a> IconCache<'a> {
    pub fn new(renderer: &'a dyn IconRenderer) -> Self {
        IconCache {
            renderer,
            icons: HashMap::new(),
        }
    }

    pub fn get_or_render(
        &mut self,
        hash: TypeHash,
        prefab: &PrefabDescriptor,
    ) -> Result<&RgbaImage, OverlayError> {
        match self.icons.entry(hash) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                debug!(%hash, prefab = %prefab.prefab_name, "rendering icon");
                let icon = self.renderer.render(prefab, &RenderRequest::icon())?;
                Ok(entry.insert(icon))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}
