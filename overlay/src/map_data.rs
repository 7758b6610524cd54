use locmap_protocol::Vec3;

/// Pixel position on an overlay layer.
/// (0,0) is the south-west corner, positive X = east, positive Y = north.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayPos {
    pub x: i32,
    pub y: i32,
}

/// Maps world-space positions onto overlay pixel space. Owned by the host's
/// minimap subsystem; the compositor only consumes it.
pub trait CoordMapper {
    fn world_to_overlay(&self, pos: Vec3, texture_size: u32) -> (f32, f32);
}

/// Map metadata for coordinate conversion.
/// World origin is at the map center; X = east/west, Z = north/south.
#[derive(Debug, Clone, Copy)]
pub struct MapInfo {
    /// Edge-to-edge world size covered by the overlay, in world units.
    pub world_diameter: f32,
}

impl CoordMapper for MapInfo {
    fn world_to_overlay(&self, pos: Vec3, texture_size: u32) -> (f32, f32) {
        let scale = texture_size as f64 / self.world_diameter as f64;
        let half = texture_size as f64 / 2.0;
        (
            (pos.x as f64 * scale + half) as f32,
            (pos.z as f64 * scale + half) as f32,
        )
    }
}
