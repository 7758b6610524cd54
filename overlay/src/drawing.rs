//! Pixel-level helpers for the overlay compositor.

use image::{Rgba, RgbaImage};

use crate::layer::OverlayLayer;
use crate::map_data::OverlayPos;

/// Marker color stamped at every record's anchor point.
pub const MARKER_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);
/// Marker block edge length in pixels.
pub const MARKER_SIZE: i32 = 2;

/// Alpha-tested blit of an icon bitmap onto a layer.
///
/// The icon is anchored horizontally centered and vertically bottom-edge at
/// `anchor`: dest = (anchor.x + lx - width/2, anchor.y + ly). Only icon
/// pixels with alpha strictly greater than zero are copied, and they
/// overwrite the destination rather than blending with it.
pub fn blit_icon(layer: &mut OverlayLayer, icon: &RgbaImage, anchor: OverlayPos) {
    let width = icon.width() as i32;
    for ly in 0..icon.height() as i32 {
        for lx in 0..width {
            let pixel = *icon.get_pixel(lx as u32, ly as u32);
            if pixel[3] == 0 {
                continue;
            }
            layer.put_pixel(anchor.x + lx - width / 2, anchor.y + ly, pixel);
        }
    }
}

/// Stamp a fully-opaque 2x2 marker block at (anchor.x - 1, anchor.y - 1),
/// overwriting whatever the icon blit produced. Guarantees a minimum visible
/// marker even for icons with large transparent margins.
pub fn stamp_marker(layer: &mut OverlayLayer, anchor: OverlayPos) {
    for dy in 0..MARKER_SIZE {
        for dx in 0..MARKER_SIZE {
            layer.put_pixel(anchor.x - 1 + dx, anchor.y - 1 + dy, MARKER_COLOR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn icon_with_pixels(size: u32, pixels: &[(u32, u32, Rgba<u8>)]) -> RgbaImage {
        let mut icon = RgbaImage::new(size, size);
        for &(x, y, px) in pixels {
            icon.put_pixel(x, y, px);
        }
        icon
    }

    #[test]
    fn alpha_zero_leaves_destination_untouched() {
        let mut layer = OverlayLayer::new(32, true);
        // (0,0) transparent, (1,0) barely visible
        let faint = Rgba([10, 20, 30, 1]);
        let icon = icon_with_pixels(4, &[(1, 0, faint)]);
        let anchor = OverlayPos { x: 10, y: 10 };
        blit_icon(&mut layer, &icon, anchor);
        layer.commit();
        // dest of icon (0,0) is (10 + 0 - 2, 10 + 0)
        assert_eq!(layer.pixel(8, 10), Some(CLEAR));
        // alpha 1 overwrites exactly, no blending
        assert_eq!(layer.pixel(9, 10), Some(faint));
    }

    #[test]
    fn blit_anchors_bottom_center() {
        let mut layer = OverlayLayer::new(32, true);
        let white = Rgba([255, 255, 255, 255]);
        let icon = icon_with_pixels(4, &[(0, 0, white), (3, 3, white)]);
        let anchor = OverlayPos { x: 16, y: 8 };
        blit_icon(&mut layer, &icon, anchor);
        layer.commit();
        assert_eq!(layer.pixel(14, 8), Some(white)); // (16 + 0 - 2, 8 + 0)
        assert_eq!(layer.pixel(17, 11), Some(white)); // (16 + 3 - 2, 8 + 3)
    }

    #[test]
    fn blit_clips_at_layer_edges() {
        let mut layer = OverlayLayer::new(8, true);
        let mut icon = RgbaImage::new(4, 4);
        for px in icon.pixels_mut() {
            *px = Rgba([255, 255, 255, 255]);
        }
        blit_icon(&mut layer, &icon, OverlayPos { x: 0, y: 6 });
        layer.commit();
        // Columns left of x=0 and rows past y=7 are dropped silently.
        assert_eq!(layer.pixel(0, 6), Some(Rgba([255, 255, 255, 255])));
        assert_eq!(layer.pixel(0, 7), Some(Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn marker_overwrites_icon_pixels() {
        let mut layer = OverlayLayer::new(32, true);
        let mut icon = RgbaImage::new(4, 4);
        for px in icon.pixels_mut() {
            *px = Rgba([0, 255, 0, 255]);
        }
        let anchor = OverlayPos { x: 10, y: 10 };
        blit_icon(&mut layer, &icon, anchor);
        stamp_marker(&mut layer, anchor);
        layer.commit();
        for (x, y) in [(9, 9), (10, 9), (9, 10), (10, 10)] {
            assert_eq!(layer.pixel(x, y), Some(MARKER_COLOR));
        }
        // Outside the 2x2 block the icon pixel survives.
        assert_eq!(layer.pixel(11, 10), Some(Rgba([0, 255, 0, 255])));
    }
}
