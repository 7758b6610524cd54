use image::RgbaImage;

use crate::catalog::PrefabDescriptor;
use crate::error::OverlayError;

/// Icon bitmap size in pixels (square).
pub const ICON_SIZE: u32 = 32;

/// Fixed render rotation in Euler degrees, chosen so 3-D prefabs read well
/// as top-down map icons.
pub const ISOMETRIC_ROTATION: [f32; 3] = [23.0, 51.0, 25.8];

/// Parameters for rendering a prefab to a 2-D icon bitmap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRequest {
    pub width: u32,
    pub height: u32,
    /// Euler rotation in degrees applied to the prefab before projection.
    pub rotation: [f32; 3],
}

impl RenderRequest {
    /// The fixed request used for every overlay icon.
    pub fn icon() -> Self {
        RenderRequest {
            width: ICON_SIZE,
            height: ICON_SIZE,
            rotation: ISOMETRIC_ROTATION,
        }
    }
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self::icon()
    }
}

/// Turns a 3-D prefab into a 2-D icon bitmap. Owned by the host's sprite
/// rendering subsystem.
pub trait IconRenderer {
    fn render(
        &self,
        prefab: &PrefabDescriptor,
        request: &RenderRequest,
    ) -> Result<RgbaImage, OverlayError>;
}
