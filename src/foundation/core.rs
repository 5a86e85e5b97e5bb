use crate::foundation::error::{SkylineError, SkylineResult};

pub use kurbo::{Point, Rect};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    pub start: FrameIndex,
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    pub fn new(start: FrameIndex, end: FrameIndex) -> SkylineResult<Self> {
        if start.0 > end.0 {
            return Err(SkylineError::config("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// The full animation `[0, num_frames)`.
    pub fn first(num_frames: u64) -> Self {
        Self {
            start: FrameIndex(0),
            end: FrameIndex(num_frames),
        }
    }

    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }

    pub fn iter(self) -> impl Iterator<Item = FrameIndex> {
        (self.start.0..self.end.0).map(FrameIndex)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn validate(self) -> SkylineResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SkylineError::config("canvas width/height must be non-zero"));
        }
        // vello_cpu surfaces are addressed with u16 coordinates.
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(SkylineError::config(format!(
                "canvas {}x{} exceeds the {} px raster limit",
                self.width,
                self.height,
                u16::MAX
            )));
        }
        Ok(())
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Opaque RGB8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel-wise `self + (to - self) * t`, truncated toward zero.
    ///
    /// `t` is clamped to `[0, 1]`, so the result always lies between the two endpoints.
    pub fn lerp_trunc(self, to: Self, t: f64) -> Self {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let ch = |a: u8, b: u8| -> u8 {
            let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            v.clamp(0.0, 255.0) as u8
        };
        Self {
            r: ch(self.r, to.r),
            g: ch(self.g, to.g),
            b: ch(self.b, to.b),
        }
    }

    /// Opaque RGBA8 bytes.
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
