//! Compositing renderer
//!
//! Turns the scene and the cached mask geometry into pixels. Every image is
//! drawn into its own group pixmap, cut down to the glyph silhouette with a
//! mask (source-in), and only then composited onto the canvas, so one
//! image's blending never leaks into another.

use kurbo::Affine;
use tiny_skia::{
    FillRule, FilterQuality, LineJoin, Mask, Paint, Path, Pixmap, PixmapPaint, Stroke, Transform,
};
use tracing::debug;

use super::layers::{build_layers, Layer, LayerOptions};
use super::path_conversion::{to_skia_path, to_skia_transform};
use super::selection::draw_selection_chrome;
use crate::core::config::CardSettings;
use crate::core::errors::{CardError, CardResult};
use crate::core::state::{CardColor, ImageEntity, Scene};
use crate::editing::selection::NodeArena;
use crate::geometry::MaskGeometry;

/// Everything a render reads
#[derive(Clone, Copy)]
pub struct CompositeInputs<'a> {
    pub scene: &'a Scene,
    pub glyph: Option<&'a MaskGeometry>,
    pub message: Option<&'a MaskGeometry>,
    /// Live nodes to display instead of committed geometry; `None` renders
    /// the committed scene only
    pub nodes: Option<&'a NodeArena>,
    pub settings: &'a CardSettings,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Pixels per canvas unit
    pub scale: f32,
    /// Draw selection chrome
    pub interactive: bool,
}

impl RenderOptions {
    pub fn interactive() -> Self {
        Self {
            scale: 1.0,
            interactive: true,
        }
    }

    /// Supersampled render of the committed card
    pub fn export(settings: &CardSettings) -> Self {
        Self {
            scale: settings.export.scale,
            interactive: false,
        }
    }
}

fn solid_paint(color: CardColor) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    paint
}

/// Glyph path and its canvas transform, prepared once per render
struct PreparedGlyph {
    path: Path,
    transform: Transform,
}

fn prepare(geometry: Option<&MaskGeometry>, transform: impl Fn(&MaskGeometry) -> Affine) -> Option<PreparedGlyph> {
    let geometry = geometry?;
    Some(PreparedGlyph {
        path: to_skia_path(geometry.path())?,
        transform: to_skia_transform(transform(geometry)),
    })
}

/// Render the card into a new pixmap
pub fn render(inputs: &CompositeInputs<'_>, options: RenderOptions) -> CardResult<Pixmap> {
    let settings = inputs.settings;
    let scene = inputs.scene;
    let canvas = settings.canvas_size();
    let side = (canvas * options.scale as f64).round() as u32;
    let mut pixmap = Pixmap::new(side, side)
        .ok_or_else(|| CardError::Render(format!("cannot allocate {side}x{side} canvas")))?;

    let base = Affine::scale(options.scale as f64);
    let glyph = prepare(inputs.glyph, |g| {
        base * g.glyph_transform(canvas, scene.glyph.rotation_deg)
    });
    let message = scene.message.as_ref().and_then(|text| {
        prepare(inputs.message, |m| base * m.overlay_transform(canvas, text.rotation_deg))
    });

    let layers = build_layers(
        scene,
        LayerOptions {
            glyph_ready: glyph.is_some(),
            message_ready: message.is_some(),
            ghost_opacity: settings.render.ghost_opacity,
            interactive: options.interactive,
        },
    );

    for layer in &layers {
        match *layer {
            Layer::Background => pixmap.fill(settings.render.background.to_skia()),
            Layer::Silhouette => {
                if let Some(glyph) = &glyph {
                    let mut color = scene.glyph.color.to_skia();
                    color.apply_opacity(settings.render.ghost_opacity);
                    let mut paint = Paint::default();
                    paint.set_color(color);
                    paint.anti_alias = true;
                    pixmap.fill_path(&glyph.path, &paint, FillRule::Winding, glyph.transform, None);
                }
            }
            Layer::ImageGroup(id) => {
                if let (Some(glyph), Some(entity)) = (&glyph, scene.image(id)) {
                    draw_image_group(&mut pixmap, glyph, entity, inputs.nodes, base)?;
                }
            }
            Layer::Message => {
                if let (Some(run), Some(text)) = (&message, scene.message.as_ref()) {
                    let paint = solid_paint(text.color);
                    pixmap.fill_path(&run.path, &paint, FillRule::Winding, run.transform, None);
                }
            }
            Layer::Outline => {
                if let Some(glyph) = &glyph {
                    let stroke = Stroke {
                        width: scene.glyph.stroke_width as f32,
                        line_join: LineJoin::Round,
                        ..Stroke::default()
                    };
                    let paint = solid_paint(scene.glyph.color);
                    pixmap.stroke_path(&glyph.path, &paint, &stroke, glyph.transform, None);
                }
            }
            Layer::SelectionChrome(id) => {
                if let Some(entity) = scene.image(id) {
                    let geometry = display_geometry(entity, inputs.nodes);
                    draw_selection_chrome(&mut pixmap, &geometry, base, settings);
                }
            }
        }
    }

    debug!(
        "Rendered {} layers at {}x{} (scale {})",
        layers.len(),
        side,
        side,
        options.scale
    );
    Ok(pixmap)
}

fn display_geometry(
    entity: &ImageEntity,
    nodes: Option<&NodeArena>,
) -> crate::core::state::ImageGeometry {
    nodes
        .map(|nodes| nodes.display_geometry(entity))
        .unwrap_or(entity.geometry)
}

/// One isolated group: mask from the glyph, image kept only inside it
fn draw_image_group(
    canvas: &mut Pixmap,
    glyph: &PreparedGlyph,
    entity: &ImageEntity,
    nodes: Option<&NodeArena>,
    base: Affine,
) -> CardResult<()> {
    let (width, height) = (canvas.width(), canvas.height());
    let mut mask = Mask::new(width, height)
        .ok_or_else(|| CardError::Render("cannot allocate glyph mask".into()))?;
    mask.fill_path(&glyph.path, FillRule::Winding, true, glyph.transform);

    let mut group = Pixmap::new(width, height)
        .ok_or_else(|| CardError::Render("cannot allocate image group".into()))?;
    let geometry = display_geometry(entity, nodes);
    let bitmap = &entity.source;
    let placement = base
        * geometry.bitmap_transform(
            bitmap.natural_width() as f64,
            bitmap.natural_height() as f64,
        );
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    group.draw_pixmap(
        0,
        0,
        bitmap.pixmap().as_ref(),
        &paint,
        to_skia_transform(placement),
        None,
    );
    group.apply_mask(&mask);

    canvas.draw_pixmap(
        0,
        0,
        group.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::CardColor;
    use crate::font_source::FontCache;
    use crate::geometry::MaskGeometryCache;
    use crate::io::image_loader::Bitmap;
    use std::sync::Arc;

    struct Fixture {
        settings: CardSettings,
        scene: Scene,
        glyph: MaskGeometryCache,
    }

    fn fixture() -> Fixture {
        let mut settings = CardSettings::default();
        settings.render.ghost_opacity = 0.0;
        let mut scene = Scene::with_defaults(&settings);
        scene.message = None;
        scene.glyph.stroke_width = 0.0;
        let mut glyph = MaskGeometryCache::default();
        glyph.refresh(&scene.glyph.glyph_spec(), &mut FontCache::default());
        Fixture {
            settings,
            scene,
            glyph,
        }
    }

    fn render_fixture(fixture: &Fixture, options: RenderOptions) -> Pixmap {
        let inputs = CompositeInputs {
            scene: &fixture.scene,
            glyph: fixture.glyph.geometry(),
            message: None,
            nodes: None,
            settings: &fixture.settings,
        };
        render(&inputs, options).unwrap()
    }

    fn is_white(pixmap: &Pixmap, x: u32, y: u32) -> bool {
        let px = pixmap.pixel(x, y).unwrap();
        px.red() == 255 && px.green() == 255 && px.blue() == 255
    }

    #[test]
    fn test_image_only_visible_inside_glyph() {
        let mut fixture = fixture();
        let red = Arc::new(Bitmap::solid(800, 800, CardColor::rgb(255, 0, 0)).unwrap());
        let id = fixture.scene.add_image(red, &fixture.settings);
        // Cover the whole canvas
        let image = fixture.scene.image_mut(id).unwrap();
        let mut geometry = image.geometry;
        geometry.x = 0.0;
        geometry.y = 0.0;
        geometry.width = 800.0;
        geometry.height = 800.0;
        image.set_geometry(geometry);

        let pixmap = render_fixture(&fixture, RenderOptions::interactive());
        // Corners are outside any digit
        assert!(is_white(&pixmap, 2, 2));
        assert!(is_white(&pixmap, 797, 797));

        // Some pixel inside the glyph picked up the photo
        let inside = (0..800u32)
            .step_by(4)
            .flat_map(|y| (0..800u32).step_by(4).map(move |x| (x, y)))
            .any(|(x, y)| {
                let px = pixmap.pixel(x, y).unwrap();
                px.red() == 255 && px.green() == 0
            });
        assert!(inside);
    }

    #[test]
    fn test_export_scale_and_no_chrome() {
        let mut fixture = fixture();
        let bitmap = Arc::new(Bitmap::solid(400, 200, CardColor::rgb(0, 0, 255)).unwrap());
        let id = fixture.scene.add_image(bitmap, &fixture.settings);

        let unselected_export = render_fixture(&fixture, RenderOptions::export(&fixture.settings));
        let unselected_view = render_fixture(&fixture, RenderOptions::interactive());
        fixture.scene.select(id);
        let selected_export = render_fixture(&fixture, RenderOptions::export(&fixture.settings));
        let selected_view = render_fixture(&fixture, RenderOptions::interactive());

        assert_eq!((selected_export.width(), selected_export.height()), (1600, 1600));
        assert_eq!(selected_view.width(), 800);
        assert_eq!(selected_export.data(), unselected_export.data());
        assert_ne!(selected_view.data(), unselected_view.data());

        // Top edge of the 200x100 box at (300, 350), between two handles
        let edge = selected_view.pixel(350, 350).unwrap();
        assert!(edge.blue() > edge.red());
    }

    #[test]
    fn test_pending_mask_renders_background_only() {
        let settings = CardSettings::default();
        let mut scene = Scene::with_defaults(&settings);
        let bitmap = Arc::new(Bitmap::solid(10, 10, CardColor::BLACK).unwrap());
        scene.add_image(bitmap, &settings);
        scene.message = None;
        let inputs = CompositeInputs {
            scene: &scene,
            glyph: None,
            message: None,
            nodes: None,
            settings: &settings,
        };
        let pixmap = render(&inputs, RenderOptions::interactive()).unwrap();
        assert!(is_white(&pixmap, 400, 400));
    }

    #[test]
    fn test_outline_drawn_when_stroked() {
        let mut fixture = fixture();
        let plain = render_fixture(&fixture, RenderOptions::interactive());
        fixture.scene.glyph.stroke_width = 4.0;
        let stroked = render_fixture(&fixture, RenderOptions::interactive());
        let dark = |p: &Pixmap| p.pixels().iter().filter(|px| px.red() < 128).count();
        assert_eq!(dark(&plain), 0);
        assert!(dark(&stroked) > 0);
    }
}
