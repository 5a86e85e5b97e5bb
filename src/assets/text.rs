use std::{
    path::PathBuf,
    sync::Arc,
};

use crate::{
    foundation::core::{Canvas, Point, Rect, Rgb8},
    foundation::error::{SkylineError, SkylineResult},
    render::cpu::fill_text_layout,
    scene::config::BannerConfig,
};

/// Supplies raw font bytes for the banner.
pub trait FontProvider {
    /// Load the font file contents (TTF/OTF/TTC).
    fn font_bytes(&self) -> SkylineResult<Vec<u8>>;

    /// Human-readable origin of the font, used in logs.
    fn describe(&self) -> String;
}

/// Reads a font file from disk.
#[derive(Clone, Debug)]
pub struct FileFontProvider {
    path: PathBuf,
}

impl FileFontProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FontProvider for FileFontProvider {
    fn font_bytes(&self) -> SkylineResult<Vec<u8>> {
        std::fs::read(&self.path).map_err(|e| {
            SkylineError::font_load(format!(
                "failed to read font '{}': {e}",
                self.path.display()
            ))
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Font bytes already in memory.
#[derive(Clone, Debug)]
pub struct BytesFontProvider {
    bytes: Arc<Vec<u8>>,
}

impl BytesFontProvider {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::new(bytes),
        }
    }
}

impl FontProvider for BytesFontProvider {
    fn font_bytes(&self) -> SkylineResult<Vec<u8>> {
        Ok(self.bytes.as_ref().clone())
    }

    fn describe(&self) -> String {
        format!("<{} in-memory bytes>", self.bytes.len())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgb8> for TextBrushRgba8 {
    fn from(c: Rgb8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: 255,
        }
    }
}

/// Banner text shaped once and placed on the canvas; shared read-only by every frame.
#[derive(Clone)]
pub struct PreparedBanner {
    /// Shaped layout; glyph positions are relative to `origin`.
    pub layout: Arc<parley::Layout<TextBrushRgba8>>,
    /// Font handle used to fill glyph outlines.
    pub font: vello_cpu::peniko::FontData,
    /// Canvas position of the layout origin.
    pub origin: Point,
    /// Rendered ink box in canvas space.
    pub bounds: Rect,
    /// Family name resolved from the font data.
    pub font_family: String,
}

impl std::fmt::Debug for PreparedBanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedBanner")
            .field("layout_ptr", &Arc::as_ptr(&self.layout))
            .field("origin", &self.origin)
            .field("bounds", &self.bounds)
            .field("font_family", &self.font_family)
            .finish()
    }
}

impl PreparedBanner {
    /// Shape `banner.text`, measure its ink box and center that box on `canvas`.
    ///
    /// Horizontal: centered plus `offset_x`. Vertical: box center at `vertical_ratio * height`.
    pub fn prepare(
        banner: &BannerConfig,
        canvas: Canvas,
        fonts: &dyn FontProvider,
    ) -> SkylineResult<Self> {
        banner.validate()?;
        let font_bytes = fonts.font_bytes()?;

        let mut engine = TextLayoutEngine::new();
        let layout = engine.layout_plain(
            &banner.text,
            &font_bytes,
            banner.size_px,
            banner.color.into(),
        )?;
        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);

        let ink = ink_bounds(&layout, &font, banner.size_px)?.ok_or_else(|| {
            SkylineError::config(format!(
                "banner text '{}' has an empty bounding box",
                banner.text
            ))
        })?;

        let left = (f64::from(canvas.width) - ink.width()) / 2.0 + banner.offset_x;
        let top = f64::from(canvas.height) * banner.vertical_ratio - ink.height() / 2.0;
        let bounds = Rect::new(left, top, left + ink.width(), top + ink.height());
        let origin = Point::new(left - ink.x0, top - ink.y0);
        let font_family = engine
            .last_family_name()
            .unwrap_or_else(|| "unknown".to_string());

        tracing::debug!(
            font = %fonts.describe(),
            family = %font_family,
            width = bounds.width(),
            height = bounds.height(),
            x = bounds.x0,
            y = bounds.y0,
            "prepared banner"
        );

        Ok(Self {
            layout: Arc::new(layout),
            font,
            origin,
            bounds,
            font_family,
        })
    }
}

/// Pixel-aligned ink box of `layout` relative to its origin, or `None` if nothing is drawn.
///
/// The layout is rasterized once onto a transparent scratch surface padded by `size_px` on every
/// side, and the box spans every pixel with non-zero coverage.
fn ink_bounds(
    layout: &parley::Layout<TextBrushRgba8>,
    font: &vello_cpu::peniko::FontData,
    size_px: f32,
) -> SkylineResult<Option<Rect>> {
    let pad = f64::from(size_px).ceil();
    let surface = |extent: f32| -> SkylineResult<u16> {
        let px = (f64::from(extent).ceil() + 2.0 * pad).max(1.0);
        if px > f64::from(u16::MAX) {
            return Err(SkylineError::config(format!(
                "banner text extent {px} px exceeds the {} px raster limit",
                u16::MAX
            )));
        }
        Ok(px as u16)
    };
    let (w, h) = (surface(layout.width())?, surface(layout.height())?);

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((pad, pad)));
    fill_text_layout(&mut ctx, layout, font);
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);

    let mut ink: Option<(usize, usize, usize, usize)> = None;
    for (i, px) in pixmap.data_as_u8_slice().chunks_exact(4).enumerate() {
        if px[3] == 0 {
            continue;
        }
        let (x, y) = (i % usize::from(w), i / usize::from(w));
        ink = Some(match ink {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    Ok(ink.map(|(x0, y0, x1, y1)| {
        Rect::new(
            x0 as f64 - pad,
            y0 as f64 - pad,
            (x1 + 1) as f64 - pad,
            (y1 + 1) as f64 - pad,
        )
    }))
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    last_family_name: Option<String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            last_family_name: None,
        }
    }

    /// Return last successfully resolved family name, if any.
    pub fn last_family_name(&self) -> Option<String> {
        self.last_family_name.clone()
    }

    /// Shape and lay out a single unwrapped paragraph.
    pub fn layout_plain(
        &mut self,
        text: &str,
        font_bytes: &[u8],
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> SkylineResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(SkylineError::config("text size_px must be finite and > 0"));
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            SkylineError::font_load("no font families registered from font bytes")
        })?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SkylineError::font_load("registered font family has no name"))?
            .to_string();
        self.last_family_name = Some(family_name.clone());

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
