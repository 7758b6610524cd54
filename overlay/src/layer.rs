use image::{Rgba, RgbaImage};

/// One overlay image layer, keyed by the source label of the content pack
/// that owns its icons.
///
/// Pixel writes land in a back buffer and are not visible on the committed
/// image until [`OverlayLayer::commit`] runs, mirroring texture upload
/// semantics: the compositor batches all writes for a pass and commits each
/// touched layer exactly once.
#[derive(Debug, Clone)]
pub struct OverlayLayer {
    front: RgbaImage,
    back: RgbaImage,
    /// Whether the layer is shown. New layers start disabled; the embedding
    /// UI enables them once populated.
    pub enabled: bool,
    /// If true the layer ignores fog-of-war and is always fully visible.
    pub ignore_fog: bool,
    dirty: bool,
    commits: u32,
}

impl OverlayLayer {
    pub fn new(texture_size: u32, ignore_fog: bool) -> Self {
        OverlayLayer {
            front: RgbaImage::new(texture_size, texture_size),
            back: RgbaImage::new(texture_size, texture_size),
            enabled: false,
            ignore_fog,
            dirty: false,
            commits: 0,
        }
    }

    pub fn texture_size(&self) -> u32 {
        self.front.width()
    }

    /// Stage a pixel write. Out-of-bounds coordinates are ignored.
    pub fn put_pixel(&mut self, x: i32, y: i32, pixel: Rgba<u8>) {
        let size = self.texture_size() as i32;
        if x < 0 || x >= size || y < 0 || y >= size {
            return;
        }
        self.back.put_pixel(x as u32, y as u32, pixel);
        self.dirty = true;
    }

    /// Read a committed pixel. Returns `None` out of bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba<u8>> {
        let size = self.texture_size() as i32;
        if x < 0 || x >= size || y < 0 || y >= size {
            return None;
        }
        Some(*self.front.get_pixel(x as u32, y as u32))
    }

    /// Read a staged (not yet committed) pixel. Returns `None` out of bounds.
    pub fn staged_pixel(&self, x: i32, y: i32) -> Option<Rgba<u8>> {
        let size = self.texture_size() as i32;
        if x < 0 || x >= size || y < 0 || y >= size {
            return None;
        }
        Some(*self.back.get_pixel(x as u32, y as u32))
    }

    /// True if there are staged writes that have not been committed.
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Publish all staged writes to the committed image.
    pub fn commit(&mut self) {
        self.front.clone_from(&self.back);
        self.dirty = false;
        self.commits += 1;
    }

    /// Number of commits performed on this layer.
    pub fn commit_count(&self) -> u32 {
        self.commits
    }

    /// The committed image.
    pub fn image(&self) -> &RgbaImage {
        &self.front
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_layer_is_disabled_and_clean() {
        let layer = OverlayLayer::new(16, true);
        assert!(!layer.enabled);
        assert!(layer.ignore_fog);
        assert!(!layer.dirty());
        assert_eq!(layer.commit_count(), 0);
    }

    #[test]
    fn writes_invisible_until_commit() {
        let mut layer = OverlayLayer::new(16, true);
        let red = Rgba([255, 0, 0, 255]);
        layer.put_pixel(3, 4, red);
        assert!(layer.dirty());
        assert_eq!(layer.pixel(3, 4), Some(Rgba([0, 0, 0, 0])));
        assert_eq!(layer.staged_pixel(3, 4), Some(red));
        layer.commit();
        assert!(!layer.dirty());
        assert_eq!(layer.pixel(3, 4), Some(red));
        assert_eq!(layer.commit_count(), 1);
    }

    #[test]
    fn out_of_bounds_writes_ignored() {
        let mut layer = OverlayLayer::new(8, false);
        layer.put_pixel(-1, 0, Rgba([255, 255, 255, 255]));
        layer.put_pixel(0, 8, Rgba([255, 255, 255, 255]));
        assert!(!layer.dirty());
        assert_eq!(layer.pixel(-1, 0), None);
    }
}
