use std::collections::HashMap;

use crate::layer::OverlayLayer;

/// Owner of the overlay layers. The compositor borrows layers mutably for
/// one pass but never controls their lifetime.
pub trait OverlayHost {
    /// Get the layer for a source group, creating it lazily.
    /// Creation leaves the layer disabled; `ignore_fog` only applies on
    /// creation and is not updated for existing layers.
    fn get_or_create(&mut self, group: &str, ignore_fog: bool) -> &mut OverlayLayer;

    /// Look up an existing layer without creating one.
    fn layer_mut(&mut self, group: &str) -> Option<&mut OverlayLayer>;
}

/// In-memory overlay host keeping one layer per source group.
#[derive(Debug)]
pub struct OverlayManager {
    texture_size: u32,
    layers: HashMap<String, OverlayLayer>,
}

impl OverlayManager {
    pub fn new(texture_size: u32) -> Self {
        OverlayManager {
            texture_size,
            layers: HashMap::new(),
        }
    }

    pub fn texture_size(&self) -> u32 {
        self.texture_size
    }

    pub fn layer(&self, group: &str) -> Option<&OverlayLayer> {
        self.layers.get(group)
    }

    pub fn layers(&self) -> impl Iterator<Item = (&str, &OverlayLayer)> {
        self.layers.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl OverlayHost for OverlayManager {
    fn get_or_create(&mut self, group: &str, ignore_fog: bool) -> &mut OverlayLayer {
        self.layers
            .entry(group.to_string())
            .or_insert_with(|| OverlayLayer::new(self.texture_size, ignore_fog))
    }

    fn layer_mut(&mut self, group: &str) -> Option<&mut OverlayLayer> {
        self.layers.get_mut(group)
    }
}
