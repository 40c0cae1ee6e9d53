//! Raster, scalar-map and mask representations shared by every stage.

use crate::error::{CoreError, CoreResult};

/// An 8-bit RGBA image, row-major with the origin at the top left.
///
/// The buffer length always equals `width * height * 4`; the only way to
/// build one from foreign data is [`RasterBuffer::from_raw`], which checks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Wrap raw RGBA bytes, failing fast when the length is inconsistent.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> CoreResult<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(CoreError::InvalidDimensions {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    /// Build an opaque image from one RGB triple per pixel.
    ///
    /// Returns `InvalidDimensions` when `pixels.len()` is not `width * height`.
    pub fn from_rgb(width: u32, height: u32, pixels: &[[u8; 3]]) -> CoreResult<Self> {
        let mut data = Vec::with_capacity(pixels.len() * 4);
        for px in pixels {
            data.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        Self::from_raw(width, height, data)
    }

    /// An opaque black image.
    pub fn new_opaque(width: u32, height: u32) -> Self {
        let mut data = vec![0u8; width as usize * height as usize * 4];
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Self { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Pixels viewed as `[R, G, B, A]` quadruples.
    pub fn pixels(&self) -> &[[u8; 4]] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn pixels_mut(&mut self) -> &mut [[u8; 4]] {
        bytemuck::cast_slice_mut(&mut self.data)
    }

    /// RGB of the pixel at `(x, y)`.
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let px = self.pixels()[self.index(x, y)];
        [px[0], px[1], px[2]]
    }

    /// Linear pixel index of `(x, y)`.
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Produce a new opaque image of the same size by mapping every pixel's RGB.
    pub fn map_rgb(&self, mut f: impl FnMut([u8; 3]) -> [u8; 3]) -> Self {
        let mut out = Self::new_opaque(self.width, self.height);
        for (dst, src) in out.pixels_mut().iter_mut().zip(self.pixels()) {
            let [r, g, b] = f([src[0], src[1], src[2]]);
            *dst = [r, g, b, 255];
        }
        out
    }

    /// Produce an opaque image from one RGB triple per pixel in row-major order.
    pub(crate) fn from_rgb_iter(
        width: u32,
        height: u32,
        pixels: impl IntoIterator<Item = [u8; 3]>,
    ) -> Self {
        let mut out = Self::new_opaque(width, height);
        for (dst, [r, g, b]) in out.pixels_mut().iter_mut().zip(pixels) {
            *dst = [r, g, b, 255];
        }
        out
    }

    /// Opaque grayscale image from one byte per pixel.
    pub(crate) fn from_gray(width: u32, height: u32, values: &[u8]) -> Self {
        Self::from_rgb_iter(width, height, values.iter().map(|&v| [v, v, v]))
    }
}

/// One floating-point value per pixel, aligned 1:1 with a [`RasterBuffer`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarMap {
    pub width: u32,
    pub height: u32,
    pub values: Vec<f64>,
}

impl ScalarMap {
    /// Evaluate `f` on every pixel of `image`.
    pub fn from_raster(image: &RasterBuffer, mut f: impl FnMut([u8; 3]) -> f64) -> Self {
        let values = image
            .pixels()
            .iter()
            .map(|px| f([px[0], px[1], px[2]]))
            .collect();
        Self {
            width: image.width(),
            height: image.height(),
            values,
        }
    }

    /// Value at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> f64 {
        self.values[y as usize * self.width as usize + x as usize]
    }
}

/// Pixels flagged as occluded (hair or other artifacts).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    pub width: u32,
    pub height: u32,
    pub flags: Vec<bool>,
}

impl BinaryMask {
    /// A mask with nothing flagged.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            flags: vec![false; width as usize * height as usize],
        }
    }

    /// Fail unless the mask covers exactly a `width × height` image.
    pub fn ensure_matches(&self, width: u32, height: u32) -> CoreResult<()> {
        let expected = width as usize * height as usize;
        if self.width != width || self.height != height || self.flags.len() != expected {
            return Err(CoreError::MaskMismatch {
                mask_width: self.width,
                mask_height: self.height,
                flags: self.flags.len(),
                width,
                height,
            });
        }
        Ok(())
    }

    /// Whether pixel `index` is flagged.
    pub fn is_set(&self, index: usize) -> bool {
        self.flags[index]
    }

    /// Number of flagged pixels.
    pub fn count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    pub fn is_clear(&self) -> bool {
        !self.flags.iter().any(|&f| f)
    }

    /// Element-wise logical OR. Fails when the masks differ in size.
    pub fn union(&self, other: &BinaryMask) -> CoreResult<BinaryMask> {
        self.ensure_matches(self.width, self.height)?;
        other.ensure_matches(self.width, self.height)?;
        let flags = self
            .flags
            .iter()
            .zip(&other.flags)
            .map(|(&a, &b)| a || b)
            .collect();
        Ok(BinaryMask {
            width: self.width,
            height: self.height,
            flags,
        })
    }

    /// White for flagged pixels, black elsewhere.
    pub fn to_raster(&self) -> RasterBuffer {
        RasterBuffer::from_rgb_iter(
            self.width,
            self.height,
            self.flags
                .iter()
                .map(|&f| if f { [255; 3] } else { [0; 3] }),
        )
    }
}

/// Check an optional mask against the image it will be applied to.
pub(crate) fn check_mask(mask: Option<&BinaryMask>, image: &RasterBuffer) -> CoreResult<()> {
    mask.map_or(Ok(()), |m| m.ensure_matches(image.width(), image.height()))
}

/// `true` when `mask` is present and flags pixel `index`.
///
/// Callers validate the mask with [`check_mask`] first.
pub(crate) fn is_masked(mask: Option<&BinaryMask>, index: usize) -> bool {
    mask.is_some_and(|m| m.is_set(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_rejects_wrong_length() {
        let err = RasterBuffer::from_raw(2, 2, vec![0; 15]).unwrap_err();
        match err {
            CoreError::InvalidDimensions { expected, actual, .. } => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 15);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_raw_accepts_zero_sized_image() {
        let image = RasterBuffer::from_raw(0, 5, Vec::new()).unwrap();
        assert!(image.is_empty());
    }

    #[test]
    fn test_map_rgb_forces_opaque_alpha() {
        let image = RasterBuffer::from_raw(1, 1, vec![10, 20, 30, 7]).unwrap();
        let out = image.map_rgb(|[r, g, b]| [b, g, r]);
        assert_eq!(out.pixels()[0], [30, 20, 10, 255]);
    }

    #[test]
    fn test_mask_raster_is_black_and_white() {
        let mut mask = BinaryMask::empty(2, 1);
        mask.flags[1] = true;
        let raster = mask.to_raster();
        assert_eq!(raster.pixels(), &[[0, 0, 0, 255], [255, 255, 255, 255]]);
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn test_union_rejects_mismatched_masks() {
        let a = BinaryMask::empty(2, 2);
        let b = BinaryMask::empty(1, 1);
        assert!(matches!(a.union(&b), Err(CoreError::MaskMismatch { .. })));
        assert!(a.union(&BinaryMask::empty(2, 2)).unwrap().is_clear());
    }

    #[test]
    fn test_mask_with_short_flags_is_rejected() {
        let mask = BinaryMask {
            width: 2,
            height: 2,
            flags: vec![false; 3],
        };
        let err = mask.ensure_matches(2, 2).unwrap_err();
        assert!(matches!(err, CoreError::MaskMismatch { flags: 3, .. }));
    }
}
