use super::*;
use crate::assets::text::{BytesFontProvider, FileFontProvider};
use crate::foundation::core::Canvas;

#[test]
fn from_parts_rejects_mismatched_canvas() {
    let cfg = SceneConfig::default();
    let layout = SceneLayout::generate(&cfg, 1).unwrap();
    let mut other = cfg.clone();
    other.canvas = Canvas {
        width: 1200,
        height: 900,
    };
    let err = PreparedScene::from_parts(other, layout, None).unwrap_err();
    assert!(matches!(err, SkylineError::Config(_)));
}

#[test]
fn from_parts_rejects_layer_count_mismatch() {
    let cfg = SceneConfig::default();
    let layout = SceneLayout::generate(&cfg, 1).unwrap();
    let mut other = cfg.clone();
    other.layers.pop();
    other.paint_order = vec![1, 0];
    assert!(PreparedScene::from_parts(other, layout, None).is_err());
}

#[test]
fn from_parts_keeps_layout_and_skips_banner() {
    let cfg = SceneConfig::default();
    let layout = SceneLayout::generate(&cfg, 8).unwrap();
    let scene = PreparedScene::from_parts(cfg.clone(), layout.clone(), None).unwrap();
    assert_eq!(scene.layout(), &layout);
    assert_eq!(scene.config(), &cfg);
    assert!(scene.banner().is_none());
}

#[test]
fn prepare_validates_before_touching_fonts() {
    let mut cfg = SceneConfig::default();
    cfg.num_frames = 0;
    let fonts = FileFontProvider::new("no/such/font.ttf");
    let err = PreparedScene::prepare(cfg, &fonts).unwrap_err();
    assert!(matches!(err, SkylineError::Config(_)));
}

#[test]
fn prepare_surfaces_font_errors() {
    let fonts = BytesFontProvider::new(Vec::new());
    let err = PreparedScene::prepare(SceneConfig::default(), &fonts).unwrap_err();
    assert!(matches!(err, SkylineError::FontLoad(_)));
}

#[test]
fn prepare_with_font_uses_the_configured_seed() {
    let path = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/fonts/DejaVuSansMono-Bold.ttf"
    );
    let cfg = SceneConfig {
        seed: Some(77),
        ..SceneConfig::default()
    };
    let scene = PreparedScene::prepare(cfg, &FileFontProvider::new(path)).unwrap();
    assert_eq!(scene.layout().seed(), 77);
    let banner = scene.banner().unwrap();
    assert!(banner.bounds.width() > 0.0 && banner.bounds.height() > 0.0);
}
