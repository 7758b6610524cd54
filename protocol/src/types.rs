use serde::{Deserialize, Serialize};
use std::fmt;

/// Hash identifying a point-of-interest type. The wire format is i32,
/// matching the host's string-hash of the prefab name.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeHash(pub i32);

impl TypeHash {
    pub fn raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for TypeHash {
    fn from(v: i32) -> Self {
        TypeHash(v)
    }
}

/// World position in host engine units.
/// X = east/west, Y = up/down, Z = north/south.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3 { x, y, z }
    }
}

/// One synchronized point-of-interest entry. Ephemeral: rebuilt from the
/// authoritative catalog on every sync, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub type_hash: TypeHash,
    pub position: Vec3,
}
