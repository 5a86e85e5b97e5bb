use crate::{
    assets::text::{PreparedBanner, TextBrushRgba8},
    foundation::core::{Canvas, FrameIndex, Rgb8},
    foundation::error::{SkylineError, SkylineResult},
    render::backend::{FrameRGBA, RenderBackend},
    scene::config::SceneConfig,
    scene::layout::{Layer, SceneLayout, Star, WINDOW_HEIGHT, WINDOW_WIDTH},
    scene::prepared::PreparedScene,
};

/// CPU raster backend powered by `vello_cpu`.
///
/// Keeps one render context alive between frames; each frame starts from an empty pixmap, so the
/// result never depends on what was drawn before.
#[derive(Default)]
pub struct CpuBackend {
    ctx: Option<vello_cpu::RenderContext>,
}

impl CpuBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> SkylineResult<R>,
    ) -> SkylineResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }
}

impl RenderBackend for CpuBackend {
    fn render_frame(
        &mut self,
        scene: &PreparedScene,
        frame: FrameIndex,
    ) -> SkylineResult<FrameRGBA> {
        let canvas = scene.layout().canvas();
        let (width, height) = surface_size(canvas)?;
        let mut pixmap = vello_cpu::Pixmap::new(width, height);

        self.with_ctx_mut(width, height, |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

            draw_sky(ctx, scene.config(), canvas);
            draw_stars(ctx, scene.config(), scene.layout().stars(), frame);
            draw_buildings(ctx, scene.config(), scene.layout());
            if let Some(banner) = scene.banner() {
                draw_banner(ctx, banner);
            }

            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;

        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn surface_size(canvas: Canvas) -> SkylineResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| SkylineError::config("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| SkylineError::config("canvas height exceeds u16"))?;
    Ok((w, h))
}

/// Scanline color of the sky gradient; `ratio = y / height`, channels truncated.
pub fn sky_color(cfg: &SceneConfig, y: u32) -> Rgb8 {
    let ratio = f64::from(y) / f64::from(cfg.canvas.height);
    cfg.sky.top.lerp_trunc(cfg.sky.bottom, ratio)
}

/// Star color and radius at a given brightness in `[0, 1]`.
pub fn star_appearance(cfg: &SceneConfig, brightness: f64) -> (Rgb8, u32) {
    let b = brightness.clamp(0.0, 1.0);
    let color = cfg.star.dim.lerp_trunc(cfg.star.bright, b);
    let radius = (2.0 * b).floor() as u32;
    (color, radius)
}

fn set_color(ctx: &mut vello_cpu::RenderContext, c: Rgb8) {
    let [r, g, b, a] = c.to_rgba8();
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
}

/// Fill the inclusive pixel span `[x0, x1] × [y0, y1]`.
fn fill_span(ctx: &mut vello_cpu::RenderContext, x0: u32, y0: u32, x1: u32, y1: u32) {
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        f64::from(x0),
        f64::from(y0),
        f64::from(x1) + 1.0,
        f64::from(y1) + 1.0,
    ));
}

/// 1px outline along the border pixels of the inclusive span `[x0, x1] × [y0, y1]`.
fn outline_span(ctx: &mut vello_cpu::RenderContext, x0: u32, y0: u32, x1: u32, y1: u32) {
    fill_span(ctx, x0, y0, x1, y0);
    fill_span(ctx, x0, y1, x1, y1);
    if y1 > y0 + 1 {
        fill_span(ctx, x0, y0 + 1, x0, y1 - 1);
        fill_span(ctx, x1, y0 + 1, x1, y1 - 1);
    }
}

fn draw_sky(ctx: &mut vello_cpu::RenderContext, cfg: &SceneConfig, canvas: Canvas) {
    for y in 0..canvas.height {
        set_color(ctx, sky_color(cfg, y));
        fill_span(ctx, 0, y, canvas.width - 1, y);
    }
}

fn draw_stars(
    ctx: &mut vello_cpu::RenderContext,
    cfg: &SceneConfig,
    stars: &[Star],
    frame: FrameIndex,
) {
    for star in stars {
        let (color, radius) = star_appearance(cfg, star.brightness_at(frame));
        set_color(ctx, color);
        if radius == 0 {
            fill_span(ctx, star.x, star.y, star.x, star.y);
            continue;
        }
        // A radius-r star spans 2r + 1 pixels, centered on the star's pixel.
        let disc = kurbo::Circle::new(
            (f64::from(star.x) + 0.5, f64::from(star.y) + 0.5),
            f64::from(radius) + 0.5,
        );
        ctx.fill_path(&shape_to_cpu(&disc));
    }
}

fn draw_buildings(ctx: &mut vello_cpu::RenderContext, cfg: &SceneConfig, layout: &SceneLayout) {
    let floor = layout.canvas().height;
    for &idx in &cfg.paint_order {
        let Some(layer) = layout.layers().get(idx) else {
            continue;
        };
        draw_layer(ctx, cfg, layer, floor);
    }
}

fn draw_layer(ctx: &mut vello_cpu::RenderContext, cfg: &SceneConfig, layer: &Layer, floor: u32) {
    for b in &layer.buildings {
        set_color(ctx, layer.color);
        fill_span(ctx, b.x, b.base_y, b.right(), floor);
        set_color(ctx, cfg.outline_color);
        outline_span(ctx, b.x, b.base_y, b.right(), floor);
    }

    for w in &layer.windows {
        let (x1, y1) = (w.x + WINDOW_WIDTH, w.y + WINDOW_HEIGHT);
        set_color(ctx, cfg.window_color);
        fill_span(ctx, w.x, w.y, x1, y1);
        set_color(ctx, cfg.outline_color);
        outline_span(ctx, w.x, w.y, x1, y1);
    }
}

fn draw_banner(ctx: &mut vello_cpu::RenderContext, banner: &PreparedBanner) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((
        banner.origin.x,
        banner.origin.y,
    )));
    fill_text_layout(ctx, &banner.layout, &banner.font);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

/// Fill every glyph run of `layout` with its brush color under the current transform.
pub(crate) fn fill_text_layout(
    ctx: &mut vello_cpu::RenderContext,
    layout: &parley::Layout<TextBrushRgba8>,
    font: &vello_cpu::peniko::FontData,
) {
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn shape_to_cpu(shape: &impl kurbo::Shape) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in shape.path_elements(0.1) {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
