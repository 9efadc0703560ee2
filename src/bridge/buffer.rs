//! GPU-backed pixel storage for one browser surface

use crate::bridge::ViewRect;
use crate::{Error, Result};

/// Fixed pixel format: 8-bit RGBA
pub const BYTES_PER_PIXEL: usize = 4;

/// Row ordering of a raw pixel transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrigin {
    /// First row in the byte stream is the bottom row (the buffer's own
    /// convention)
    BottomLeft,
    /// First row in the byte stream is the top row; rows are flipped on
    /// the way in
    TopLeft,
}

/// Fixed-format RGBA pixel buffer, rows ordered bottom-left.
///
/// Dimensions always match the last view rect reported to the engine; a
/// paint that disagrees is a stale-dimension race and is rejected rather
/// than truncated or padded.
#[derive(Debug)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a zero-filled buffer. Both dimensions must be nonzero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Exact byte count a full-view paint must carry
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * BYTES_PER_PIXEL
    }

    pub fn view_rect(&self) -> ViewRect {
        ViewRect::new(self.width, self.height)
    }

    pub fn set_width(&mut self, width: u32) -> Result<()> {
        self.resize(width, self.height)
    }

    pub fn set_height(&mut self, height: u32) -> Result<()> {
        self.resize(self.width, height)
    }

    /// Reallocate the backing store at new dimensions. Stale contents are
    /// dropped; the next paint repopulates the buffer at the new size.
    /// Resizing to the current size is a no-op and keeps the allocation.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        check_dimensions(width, height)?;
        if width == self.width && height == self.height {
            return Ok(());
        }
        self.width = width;
        self.height = height;
        self.data = vec![0; self.byte_len()];
        Ok(())
    }

    /// Copy exactly `width * height * 4` bytes into the backing store,
    /// reordering rows when the source origin differs from the buffer's.
    ///
    /// A byte-count mismatch leaves the prior contents untouched.
    pub fn write_paint(&mut self, bytes: &[u8], origin: RowOrigin) -> Result<()> {
        let expected = self.byte_len();
        if bytes.len() != expected {
            return Err(Error::PaintShapeMismatch {
                expected,
                actual: bytes.len(),
                width: self.width,
                height: self.height,
            });
        }
        match origin {
            RowOrigin::BottomLeft => self.data.copy_from_slice(bytes),
            RowOrigin::TopLeft => {
                let stride = self.width as usize * BYTES_PER_PIXEL;
                for (row, src) in bytes.chunks_exact(stride).enumerate() {
                    let flipped = self.height as usize - 1 - row;
                    self.data[flipped * stride..(flipped + 1) * stride].copy_from_slice(src);
                }
            }
        }
        Ok(())
    }

    /// The current pixels, rows ordered bottom-left
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::Config(format!(
            "surface dimensions must be nonzero, got {}x{}",
            width, height
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_zero_filled_at_exact_size() {
        let b = PixelBuffer::new(16, 8).unwrap();
        assert_eq!(b.byte_len(), 16 * 8 * 4);
        assert!(b.bytes().iter().all(|&p| p == 0));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(PixelBuffer::new(0, 8), Err(Error::Config(_))));
        assert!(matches!(PixelBuffer::new(8, 0), Err(Error::Config(_))));
        let mut b = PixelBuffer::new(8, 8).unwrap();
        assert!(matches!(b.set_width(0), Err(Error::Config(_))));
        assert_eq!(b.width(), 8);
    }

    #[test]
    fn resize_to_same_size_keeps_allocation() {
        let mut b = PixelBuffer::new(64, 64).unwrap();
        let before = b.bytes().as_ptr();
        b.set_width(64).unwrap();
        b.set_width(64).unwrap();
        assert_eq!(b.bytes().as_ptr(), before);
        assert_eq!(b.view_rect(), ViewRect::new(64, 64));
    }

    #[test]
    fn write_paint_round_trips_bottom_left() {
        let mut b = PixelBuffer::new(4, 2).unwrap();
        let frame: Vec<u8> = (0..(4 * 2 * 4) as u8).collect();
        b.write_paint(&frame, RowOrigin::BottomLeft).unwrap();
        assert_eq!(b.bytes(), frame.as_slice());
    }

    #[test]
    fn write_paint_flips_top_left_rows() {
        let mut b = PixelBuffer::new(2, 2).unwrap();
        // two rows of 8 bytes: top row 1s, bottom row 2s
        let mut frame = vec![1u8; 8];
        frame.extend(vec![2u8; 8]);
        b.write_paint(&frame, RowOrigin::TopLeft).unwrap();
        // bottom-left store: first row is the bottom row (2s)
        assert_eq!(&b.bytes()[..8], &[2u8; 8]);
        assert_eq!(&b.bytes()[8..], &[1u8; 8]);
    }

    #[test]
    fn shape_mismatch_leaves_contents_unchanged() {
        let mut b = PixelBuffer::new(4, 4).unwrap();
        let good = vec![7u8; 4 * 4 * 4];
        b.write_paint(&good, RowOrigin::BottomLeft).unwrap();

        for delta in [-1i64, 1] {
            let len = (b.byte_len() as i64 + delta) as usize;
            let err = b.write_paint(&vec![9u8; len], RowOrigin::BottomLeft).unwrap_err();
            match err {
                Error::PaintShapeMismatch {
                    expected, actual, width, height,
                } => {
                    assert_eq!(expected, 4 * 4 * 4);
                    assert_eq!(actual, len);
                    assert_eq!((width, height), (4, 4));
                }
                other => panic!("unexpected error: {other}"),
            }
            assert_eq!(b.bytes(), good.as_slice());
        }
    }
}
