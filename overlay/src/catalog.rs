//! Interfaces to the host world catalog and the custom-type registry.
//!
//! Both are consumed, never owned: the authority reads the catalog to build
//! packages, and both roles resolve decoded hashes against it while
//! compositing. Passing them as trait objects keeps every collaborator
//! substitutable with the in-memory implementations in [`crate::memory`].

use locmap_protocol::{TypeHash, Vec3};

/// A placed point-of-interest instance as reported by the world catalog.
#[derive(Debug, Clone)]
pub struct PoiInstance {
    pub prefab_name: String,
    pub position: Vec3,
    pub type_hash: TypeHash,
}

/// Catalog entry resolved from a type hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefabDescriptor {
    pub prefab_name: String,
}

/// Read access to the host's point-of-interest catalog.
pub trait Catalog {
    fn list_points_of_interest(&self) -> Vec<PoiInstance>;
    fn lookup_by_hash(&self, hash: TypeHash) -> Option<PrefabDescriptor>;
}

/// Descriptor for a prefab registered by third-party content.
///
/// `source_label` names the content pack that registered the type and keys
/// the overlay layer its icons are drawn onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomTypeInfo {
    pub source_label: String,
}

/// Distinguishes third-party point-of-interest types from the base game's
/// built-in set.
pub trait TypeRegistry {
    fn is_custom_type(&self, prefab_name: &str) -> bool;
    fn resolve_custom_type(&self, prefab_name: &str) -> Option<CustomTypeInfo>;
}
