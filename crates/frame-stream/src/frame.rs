//! Raster frame types and region arithmetic

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Horizontal center of the rectangle
    pub fn center_x(&self) -> u32 {
        self.x + self.w / 2
    }

    /// Vertical center of the rectangle
    pub fn center_y(&self) -> u32 {
        self.y + self.h / 2
    }

    /// One past the right edge
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// One past the bottom edge
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    /// Whether the rectangle covers zero pixels
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

/// Decoded RGB video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u32,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_ns: u64, sequence: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp_ns,
            sequence,
        }
    }

    /// Get pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Convert to a single-channel intensity frame
    pub fn to_gray(&self) -> GrayFrame {
        let mut gray = Vec::with_capacity((self.width * self.height) as usize);
        for pixel in self.data.chunks(3) {
            // Luminance formula: 0.299*R + 0.587*G + 0.114*B
            let y = (pixel[0] as f32 * 0.299
                + pixel[1] as f32 * 0.587
                + pixel[2] as f32 * 0.114) as u8;
            gray.push(y);
        }
        GrayFrame {
            data: gray,
            width: self.width,
            height: self.height,
        }
    }
}

/// Single-channel intensity frame (or sub-patch of one)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayFrame {
    /// Intensity data (width * height)
    pub data: Vec<u8>,
    /// Patch width
    pub width: u32,
    /// Patch height
    pub height: u32,
}

impl GrayFrame {
    /// Create an intensity frame from raw data; fails if sizes disagree
    pub fn from_raw(data: Vec<u8>, width: u32, height: u32) -> Option<Self> {
        if data.len() != (width * height) as usize {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
        })
    }

    /// Create a uniformly filled frame
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            data: vec![value; (width * height) as usize],
            width,
            height,
        }
    }

    /// Get intensity at (x, y)
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[(y * self.width + x) as usize])
    }

    /// Set intensity at (x, y); out-of-bounds writes are ignored
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        if x < self.width && y < self.height {
            self.data[(y * self.width + x) as usize] = value;
        }
    }

    /// Crop a region; returns None if the region is empty or out of bounds
    pub fn crop(&self, region: Rect) -> Option<GrayFrame> {
        if region.is_empty() || region.right() > self.width || region.bottom() > self.height {
            return None;
        }

        let mut cropped = Vec::with_capacity((region.w * region.h) as usize);
        for row in region.y..region.bottom() {
            let start = (row * self.width + region.x) as usize;
            let end = start + region.w as usize;
            cropped.extend_from_slice(&self.data[start..end]);
        }

        Some(GrayFrame {
            data: cropped,
            width: region.w,
            height: region.h,
        })
    }

    /// Crop a region after clipping it to the frame bounds
    pub fn crop_clipped(&self, region: Rect) -> Option<GrayFrame> {
        let x = region.x.min(self.width);
        let y = region.y.min(self.height);
        let clipped = Rect::new(
            x,
            y,
            region.w.min(self.width - x),
            region.h.min(self.height - y),
        );
        self.crop(clipped)
    }

    /// Mean absolute pixel difference against another patch.
    ///
    /// Returns None when the dimensions differ; differencing patches from
    /// different face geometry is meaningless.
    pub fn mean_abs_diff(&self, other: &GrayFrame) -> Option<f32> {
        if self.width != other.width || self.height != other.height || self.data.is_empty() {
            return None;
        }
        let total: u64 = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| a.abs_diff(b) as u64)
            .sum();
        Some(total as f32 / self.data.len() as f32)
    }
}

/// Decode a JPEG frame to RGB
#[cfg(feature = "jpeg-decode")]
pub fn decode_jpeg(jpeg_data: &[u8]) -> Result<VideoFrame, crate::FrameError> {
    use image::ImageFormat;

    let img = image::load_from_memory_with_format(jpeg_data, ImageFormat::Jpeg)
        .map_err(|e| crate::FrameError::Decode(e.to_string()))?;
    let rgb = img.to_rgb8();

    Ok(VideoFrame {
        width: rgb.width(),
        height: rgb.height(),
        data: rgb.into_raw(),
        timestamp_ns: 0,
        sequence: 0,
    })
}
