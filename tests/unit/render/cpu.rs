use super::*;
use crate::scene::config::LayerConfig;
use crate::scene::layout::Window;

fn small_config() -> SceneConfig {
    SceneConfig {
        canvas: Canvas {
            width: 320,
            height: 180,
        },
        num_frames: 8,
        num_stars: 40,
        seed: Some(5),
        layers: vec![
            LayerConfig {
                min_height: 30,
                max_height: 60,
                color: Rgb8::new(0, 0, 0),
            },
            LayerConfig {
                min_height: 50,
                max_height: 80,
                color: Rgb8::new(15, 15, 15),
            },
            LayerConfig {
                min_height: 70,
                max_height: 100,
                color: Rgb8::new(30, 30, 30),
            },
        ],
        ..SceneConfig::default()
    }
}

fn scene(cfg: SceneConfig) -> PreparedScene {
    let layout = SceneLayout::generate(&cfg, cfg.seed.unwrap_or(0)).unwrap();
    PreparedScene::from_parts(cfg, layout, None).unwrap()
}

#[test]
fn sky_color_matches_reference_endpoints() {
    let cfg = SceneConfig::default();
    assert_eq!(sky_color(&cfg, 0), Rgb8::new(20, 10, 40));
    assert_eq!(sky_color(&cfg, 899), Rgb8::new(79, 49, 119));
    assert_eq!(sky_color(&cfg, 450), Rgb8::new(50, 30, 80));
}

#[test]
fn star_appearance_stays_in_range() {
    let cfg = SceneConfig::default();
    for i in 0..=100 {
        let b = f64::from(i) / 100.0;
        let (c, r) = star_appearance(&cfg, b);
        assert!((200..=255).contains(&c.r));
        assert!((200..=255).contains(&c.g));
        assert!((150..=255).contains(&c.b));
        assert!(r <= 2);
    }
    assert_eq!(star_appearance(&cfg, 0.0), (Rgb8::new(200, 200, 150), 0));
    assert_eq!(star_appearance(&cfg, 1.0), (Rgb8::new(255, 255, 255), 2));
    assert_eq!(star_appearance(&cfg, 0.5).1, 1);
}

#[test]
fn frame_has_canvas_dimensions() {
    let s = scene(small_config());
    let f = CpuBackend::new().render_frame(&s, FrameIndex(0)).unwrap();
    assert_eq!((f.width, f.height), (320, 180));
    assert_eq!(f.data.len(), 320 * 180 * 4);
    assert!(f.data.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn rendering_twice_is_byte_identical() {
    let s = scene(small_config());
    let mut backend = CpuBackend::new();
    let a = backend.render_frame(&s, FrameIndex(3)).unwrap();
    let b = backend.render_frame(&s, FrameIndex(3)).unwrap();
    let c = CpuBackend::new().render_frame(&s, FrameIndex(3)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
}

#[test]
fn reference_sky_top_row_without_stars() {
    let cfg = SceneConfig {
        num_stars: 0,
        seed: Some(1),
        ..SceneConfig::default()
    };
    let s = scene(cfg);
    let f = CpuBackend::new().render_frame(&s, FrameIndex(0)).unwrap();
    for x in [0, 800, 1599] {
        assert_eq!(f.pixel_rgb(x, 0), Some(Rgb8::new(20, 10, 40)));
    }
}

#[test]
fn foreground_building_and_window_colors() {
    let mut checked = 0;
    for seed in 5..11 {
        let cfg = SceneConfig {
            seed: Some(seed),
            ..small_config()
        };
        let s = scene(cfg.clone());
        let f = CpuBackend::new().render_frame(&s, FrameIndex(0)).unwrap();
        let layer = &s.layout().layers()[0];
        let Canvas { width, height } = cfg.canvas;

        let last = layer.buildings.last().unwrap();
        assert!(last.x < width);
        assert_eq!(f.pixel_rgb(last.x, height - 1), Some(cfg.outline_color));
        if last.x + 1 < width {
            assert_eq!(f.pixel_rgb(last.x + 1, height - 1), Some(layer.color));
        }

        // The last building may run past the right edge, and so may its windows.
        let on_canvas = |w: &Window| w.x + WINDOW_WIDTH < width && w.y + WINDOW_HEIGHT < height;
        let unobscured = |i: usize, w: &Window| {
            layer.windows[i + 1..].iter().all(|o| {
                o.x > w.x + WINDOW_WIDTH
                    || o.x + WINDOW_WIDTH < w.x
                    || o.y > w.y + WINDOW_HEIGHT
                    || o.y + WINDOW_HEIGHT < w.y
            })
        };
        for (i, w) in layer.windows.iter().enumerate() {
            if !on_canvas(w) || !unobscured(i, w) {
                continue;
            }
            assert_eq!(f.pixel_rgb(w.x + 1, w.y + 1), Some(cfg.window_color), "{w:?}");
            assert_eq!(f.pixel_rgb(w.x, w.y), Some(cfg.outline_color), "{w:?}");
            checked += 1;
        }
    }
    assert!(checked > 0);
}

fn fixture_banner(cfg: &SceneConfig) -> PreparedBanner {
    let bytes = std::fs::read(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/fonts/DejaVuSansMono-Bold.ttf"
    ))
    .unwrap();
    PreparedBanner::prepare(
        &cfg.banner,
        cfg.canvas,
        &crate::assets::text::BytesFontProvider::new(bytes),
    )
    .unwrap()
}

fn banner_scene() -> PreparedScene {
    let mut cfg = SceneConfig {
        seed: Some(3),
        ..SceneConfig::default()
    };
    // A color no sky, star or building pixel can take.
    cfg.banner.color = Rgb8::new(250, 40, 200);
    cfg.banner.size_px = 120.0;
    let layout = SceneLayout::generate(&cfg, 3).unwrap();
    let banner = fixture_banner(&cfg);
    PreparedScene::from_parts(cfg, layout, Some(banner)).unwrap()
}

#[test]
fn banner_ink_stays_inside_its_box() {
    let s = banner_scene();
    let color = s.config().banner.color;
    let bounds = s.banner().unwrap().bounds;
    let f = CpuBackend::new().render_frame(&s, FrameIndex(0)).unwrap();

    let mut inside = 0usize;
    for y in 0..f.height {
        for x in 0..f.width {
            if f.pixel_rgb(x, y) != Some(color) {
                continue;
            }
            let (px, py) = (f64::from(x), f64::from(y));
            assert!(
                px + 1.0 > bounds.x0 - 1.0
                    && px < bounds.x1 + 1.0
                    && py + 1.0 > bounds.y0 - 1.0
                    && py < bounds.y1 + 1.0,
                "banner pixel ({x}, {y}) outside {bounds:?}"
            );
            inside += 1;
        }
    }
    assert!(inside > 1000, "only {inside} banner pixels drawn");
}

#[test]
fn banner_pixels_do_not_animate() {
    let s = banner_scene();
    let color = s.config().banner.color;
    let mut backend = CpuBackend::new();
    let a = backend.render_frame(&s, FrameIndex(0)).unwrap();
    let b = backend.render_frame(&s, FrameIndex(37)).unwrap();
    assert_ne!(a.data, b.data);

    let bounds = s.banner().unwrap().bounds;
    let (x0, y0) = (bounds.x0.floor().max(0.0) as u32, bounds.y0.floor().max(0.0) as u32);
    let x1 = (bounds.x1.ceil() as u32).min(a.width);
    let y1 = (bounds.y1.ceil() as u32).min(a.height);
    let mut text_pixels = 0usize;
    for y in y0..y1 {
        for x in x0..x1 {
            if a.pixel_rgb(x, y) == Some(color) {
                assert_eq!(b.pixel_rgb(x, y), Some(color), "({x}, {y})");
                text_pixels += 1;
            }
        }
    }
    assert!(text_pixels > 0);
}

#[test]
fn banner_is_drawn_over_the_sky() {
    let s = banner_scene();
    let without = PreparedScene::from_parts(s.config().clone(), s.layout().clone(), None).unwrap();
    let with_text = CpuBackend::new().render_frame(&s, FrameIndex(0)).unwrap();
    let bare = CpuBackend::new().render_frame(&without, FrameIndex(0)).unwrap();
    assert_ne!(with_text.data, bare.data);

    // Outside the box the banner changes nothing.
    let bounds = s.banner().unwrap().bounds.inflate(1.0, 1.0);
    for y in 0..bare.height {
        for x in 0..bare.width {
            let inside = f64::from(x) + 1.0 > bounds.x0
                && f64::from(x) < bounds.x1
                && f64::from(y) + 1.0 > bounds.y0
                && f64::from(y) < bounds.y1;
            if !inside {
                assert_eq!(with_text.pixel_rgb(x, y), bare.pixel_rgb(x, y), "({x}, {y})");
            }
        }
    }
}

#[test]
fn only_the_sky_band_animates() {
    let cfg = small_config();
    let s = scene(cfg.clone());
    let mut backend = CpuBackend::new();
    let a = backend.render_frame(&s, FrameIndex(0)).unwrap();
    let b = backend.render_frame(&s, FrameIndex(5)).unwrap();
    assert_ne!(a.data, b.data, "stars should twinkle between frames");

    let row_bytes = cfg.canvas.width as usize * 4;
    let start = (cfg.canvas.height as usize / 2 + 3) * row_bytes;
    assert_eq!(a.data[start..], b.data[start..]);
}

#[test]
fn paint_order_changes_occlusion() {
    let cfg = small_config();
    let reversed = SceneConfig {
        paint_order: vec![0, 1, 2],
        ..cfg.clone()
    };
    let a = CpuBackend::new()
        .render_frame(&scene(cfg), FrameIndex(0))
        .unwrap();
    let b = CpuBackend::new()
        .render_frame(&scene(reversed), FrameIndex(0))
        .unwrap();
    assert_ne!(a.data, b.data);
}
