//! In-memory collaborator implementations.
//!
//! These back the demo binary and the test suite: a static catalog and type
//! registry, a flat-color icon renderer, and a queue-backed loopback
//! transport that lets one process drive both sync roles.

use std::cell::Cell;
use std::collections::{HashMap, VecDeque};

use image::{Rgba, RgbaImage};
use locmap_protocol::TypeHash;

use crate::catalog::{Catalog, CustomTypeInfo, PoiInstance, PrefabDescriptor, TypeRegistry};
use crate::error::OverlayError;
use crate::render::{IconRenderer, RenderRequest};
use crate::sync::{PeerId, Transport};

/// Fixed catalog of placed point-of-interest instances.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    instances: Vec<PoiInstance>,
    by_hash: HashMap<TypeHash, PrefabDescriptor>,
}

impl StaticCatalog {
    pub fn new(instances: Vec<PoiInstance>) -> Self {
        let by_hash = instances
            .iter()
            .map(|poi| {
                (
                    poi.type_hash,
                    PrefabDescriptor {
                        prefab_name: poi.prefab_name.clone(),
                    },
                )
            })
            .collect();
        StaticCatalog { instances, by_hash }
    }
}

impl Catalog for StaticCatalog {
    fn list_points_of_interest(&self) -> Vec<PoiInstance> {
        self.instances.clone()
    }

    fn lookup_by_hash(&self, hash: TypeHash) -> Option<PrefabDescriptor> {
        self.by_hash.get(&hash).cloned()
    }
}

/// Registry mapping custom prefab names to their source labels.
#[derive(Debug, Default)]
pub struct StaticRegistry {
    custom: HashMap<String, String>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, prefab_name: &str, source_label: &str) {
        self.custom
            .insert(prefab_name.to_string(), source_label.to_string());
    }
}

impl TypeRegistry for StaticRegistry {
    fn is_custom_type(&self, prefab_name: &str) -> bool {
        self.custom.contains_key(prefab_name)
    }

    fn resolve_custom_type(&self, prefab_name: &str) -> Option<CustomTypeInfo> {
        self.custom.get(prefab_name).map(|label| CustomTypeInfo {
            source_label: label.clone(),
        })
    }
}

/// Renders every prefab as a flat-color square with a transparent margin.
/// Counts render calls so tests can assert the cache's single-render
/// guarantee.
#[derive(Debug)]
pub struct FlatIconRenderer {
    color: Rgba<u8>,
    margin: u32,
    calls: Cell<usize>,
}

impl FlatIconRenderer {
    pub fn new(color: Rgba<u8>, margin: u32) -> Self {
        FlatIconRenderer {
            color,
            margin,
            calls: Cell::new(0),
        }
    }

    pub fn render_count(&self) -> usize {
        self.calls.get()
    }
}

impl IconRenderer for FlatIconRenderer {
    fn render(
        &self,
        _prefab: &PrefabDescriptor,
        request: &RenderRequest,
    ) -> Result<RgbaImage, OverlayError> {
        self.calls.set(self.calls.get() + 1);
        let mut icon = RgbaImage::new(request.width, request.height);
        for y in self.margin..request.height.saturating_sub(self.margin) {
            for x in self.margin..request.width.saturating_sub(self.margin) {
                icon.put_pixel(x, y, self.color);
            }
        }
        Ok(icon)
    }
}

/// Direction of a queued loopback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Request,
    Response,
}

/// A message queued for delivery to `peer`.
#[derive(Debug, Clone)]
pub struct Outgoing {
    pub peer: PeerId,
    pub kind: MessageKind,
    pub payload: Vec<u8>,
}

/// Queue-backed transport: sends append to an outbox the caller pumps
/// manually. Delivery is in order and never drops, matching the reliable
/// transport the sync protocol assumes.
#[derive(Debug, Default)]
pub struct LoopbackTransport {
    queue: VecDeque<Outgoing>,
    registrations: Vec<String>,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the oldest queued message.
    pub fn take(&mut self) -> Option<Outgoing> {
        self.queue.pop_front()
    }

    /// Channel names registered so far, in registration order.
    pub fn registrations(&self) -> &[String] {
        &self.registrations
    }
}

impl Transport for LoopbackTransport {
    fn register_channel(&mut self, name: &str) -> Result<(), OverlayError> {
        self.registrations.push(name.to_string());
        Ok(())
    }

    fn send_request(&mut self, peer: PeerId, payload: &[u8]) -> Result<(), OverlayError> {
        self.queue.push_back(Outgoing {
            peer,
            kind: MessageKind::Request,
            payload: payload.to_vec(),
        });
        Ok(())
    }

    fn send_response(&mut self, peer: PeerId, payload: &[u8]) -> Result<(), OverlayError> {
        self.queue.push_back(Outgoing {
            peer,
            kind: MessageKind::Response,
            payload: payload.to_vec(),
        });
        Ok(())
    }
}
