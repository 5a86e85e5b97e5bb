use crate::{
    foundation::core::{FrameIndex, Rgb8},
    foundation::error::{SkylineError, SkylineResult},
    scene::prepared::PreparedScene,
};

/// A rendered frame as RGBA8 pixels.
///
/// Frames come out of the raster backend **premultiplied**. Skyline frames are fully opaque, so
/// the flag only matters for sinks that accept foreign frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGB of the pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel_rgb(&self, x: u32, y: u32) -> Option<Rgb8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some(Rgb8::new(px[0], px[1], px[2]))
    }

    /// Straight-alpha copy of the pixel data.
    pub fn to_straight_rgba8(&self) -> SkylineResult<Vec<u8>> {
        if self.data.len() != self.width as usize * self.height as usize * 4 {
            return Err(SkylineError::encode(
                "frame.data size mismatch with width*height*4",
            ));
        }
        if !self.premultiplied {
            return Ok(self.data.clone());
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        Ok(out)
    }
}

/// A renderer that turns a prepared scene plus a frame index into pixels.
///
/// Implementations may keep scratch state between calls, but the output must depend only on
/// `(scene, frame)`.
pub trait RenderBackend {
    fn render_frame(&mut self, scene: &PreparedScene, frame: FrameIndex)
    -> SkylineResult<FrameRGBA>;
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
