//! Seeded low-poly backgrounds.
//!
//! A jittered lattice covering the canvas plus a bleed margin is split into two triangles per
//! cell. Each triangle is filled with the palette color sampled at its centroid, mixing the
//! horizontal and vertical gradients evenly.

use resvg::tiny_skia;

use crate::{
    compose::paint,
    foundation::{
        core::{Raster, Rgba8},
        error::{ForgeError, ForgeResult},
        math::hash_unit,
    },
    pipeline::export::{ExportJob, Packaging, RunContext},
    presets::background::BackgroundPresets,
};

/// Largest accepted edge.
pub const MAX_EDGE: u32 = 8192;

const SALT_X: u64 = 0x5851_f42d;
const SALT_Y: u64 = 0x4c95_7f2d;
const SALT_DIAG: u64 = 0x1405_7b7e;

/// Generator parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonSpec {
    /// Output width.
    pub width: u32,
    /// Output height.
    pub height: u32,
    /// Lattice spacing in pixels.
    pub cell_size: f64,
    /// Jitter in `[0, 1]` as a fraction of the cell size.
    pub variance: f64,
    /// Palette, interpolated left to right and top to bottom.
    pub x_colors: Vec<Rgba8>,
    /// Width of the seam stroke drawn in each triangle's own color.
    pub stroke_width: f32,
    /// Randomness seed.
    pub seed: u64,
}

impl PolygonSpec {
    /// Spec with the default cell size (60), variance (0.75) and seam stroke (0.5).
    pub fn new(width: u32, height: u32, x_colors: Vec<Rgba8>, seed: u64) -> Self {
        Self {
            width,
            height,
            cell_size: 60.0,
            variance: 0.75,
            x_colors,
            stroke_width: 0.5,
            seed,
        }
    }

    /// Spec from named size and theme presets.
    pub fn from_presets(
        presets: &BackgroundPresets,
        size: &str,
        theme: &str,
        seed: u64,
    ) -> ForgeResult<Self> {
        let size = presets.size(size)?;
        let theme = presets.theme(theme)?;
        Ok(Self::new(size.width, size.height, theme.colors.clone(), seed))
    }

    /// Output file name.
    pub fn file_name(&self) -> String {
        format!("background-{}x{}.png", self.width, self.height)
    }

    /// Reject empty or oversized canvases, non-positive cells and empty palettes.
    pub fn validate(&self) -> ForgeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ForgeError::validation("background size must be non-empty"));
        }
        if self.width > MAX_EDGE || self.height > MAX_EDGE {
            return Err(ForgeError::validation(format!(
                "background {}x{} exceeds {MAX_EDGE} px",
                self.width, self.height
            )));
        }
        if !self.cell_size.is_finite() || self.cell_size < 2.0 {
            return Err(ForgeError::validation("cell size must be at least 2 px"));
        }
        if !(0.0..=1.0).contains(&self.variance) {
            return Err(ForgeError::validation("variance must be within [0, 1]"));
        }
        if self.x_colors.is_empty() {
            return Err(ForgeError::validation("background palette has no colors"));
        }
        Ok(())
    }
}

/// Render `spec` into a fully opaque raster.
#[tracing::instrument(skip(spec), fields(width = spec.width, height = spec.height, seed = spec.seed))]
pub fn render_polygons(spec: &PolygonSpec) -> ForgeResult<Raster> {
    spec.validate()?;
    let (w, h) = (f64::from(spec.width), f64::from(spec.height));
    let mut pixmap = paint::new_pixmap(spec.width, spec.height)?;
    pixmap.fill(paint::color(opaque(sample(&spec.x_colors, 0.5))));

    let cell = spec.cell_size;
    let bleed = cell;
    let cols = ((w + 2.0 * bleed) / cell).ceil() as i64 + 1;
    let rows = ((h + 2.0 * bleed) / cell).ceil() as i64 + 1;
    let jitter = spec.variance * cell;

    let point = |i: i64, j: i64| -> (f64, f64) {
        let dx = (hash_unit(spec.seed, i, j, SALT_X) - 0.5) * jitter;
        let dy = (hash_unit(spec.seed, i, j, SALT_Y) - 0.5) * jitter;
        (-bleed + i as f64 * cell + dx, -bleed + j as f64 * cell + dy)
    };

    let mut triangles = 0usize;
    for j in 0..rows - 1 {
        for i in 0..cols - 1 {
            let (a, b, c, d) = (point(i, j), point(i + 1, j), point(i + 1, j + 1), point(i, j + 1));
            let pair = if hash_unit(spec.seed, i, j, SALT_DIAG) < 0.5 {
                [[a, b, c], [a, c, d]]
            } else {
                [[a, b, d], [b, c, d]]
            };
            for tri in pair {
                let cx = (tri[0].0 + tri[1].0 + tri[2].0) / 3.0;
                let cy = (tri[0].1 + tri[1].1 + tri[2].1) / 3.0;
                let fill = opaque(mix(
                    sample(&spec.x_colors, cx / w),
                    sample(&spec.x_colors, cy / h),
                    0.5,
                ));
                draw_triangle(&mut pixmap, tri, fill, spec.stroke_width);
                triangles += 1;
            }
        }
    }
    tracing::debug!(triangles, "polygon background rendered");
    paint::pixmap_to_raster(pixmap)
}

fn draw_triangle(pixmap: &mut tiny_skia::Pixmap, tri: [(f64, f64); 3], fill: Rgba8, stroke: f32) {
    let mut pb = tiny_skia::PathBuilder::new();
    pb.move_to(tri[0].0 as f32, tri[0].1 as f32);
    pb.line_to(tri[1].0 as f32, tri[1].1 as f32);
    pb.line_to(tri[2].0 as f32, tri[2].1 as f32);
    pb.close();
    // Degenerate triangles (heavy jitter) produce no path.
    let Some(path) = pb.finish() else {
        return;
    };
    // Aliased: each pixel takes exactly one opaque triangle color.
    let mut paint = paint::solid_paint(fill);
    paint.anti_alias = false;
    pixmap.fill_path(
        &path,
        &paint,
        tiny_skia::FillRule::Winding,
        tiny_skia::Transform::identity(),
        None,
    );
    if stroke > 0.0 {
        let stroke = tiny_skia::Stroke {
            width: stroke,
            line_join: tiny_skia::LineJoin::Round,
            ..tiny_skia::Stroke::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, tiny_skia::Transform::identity(), None);
    }
}

/// Palette color at `t` in `[0, 1]`, linearly interpolated between neighbouring entries.
fn sample(colors: &[Rgba8], t: f64) -> Rgba8 {
    match colors {
        [] => Rgba8::BLACK,
        [only] => *only,
        _ => {
            let pos = t.clamp(0.0, 1.0) * (colors.len() - 1) as f64;
            let idx = (pos.floor() as usize).min(colors.len() - 2);
            mix(colors[idx], colors[idx + 1], pos - idx as f64)
        }
    }
}

fn mix(a: Rgba8, b: Rgba8, t: f64) -> Rgba8 {
    let lerp = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * t).round() as u8;
    Rgba8::new(lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b), lerp(a.a, b.a))
}

fn opaque(c: Rgba8) -> Rgba8 {
    Rgba8 { a: 255, ..c }
}

/// Export job producing a single `background-<w>x<h>.png`.
#[derive(Clone, Debug)]
pub struct BackgroundJob {
    spec: PolygonSpec,
}

impl BackgroundJob {
    /// Job rendering `spec`.
    pub fn new(spec: PolygonSpec) -> Self {
        Self { spec }
    }

    /// Generator parameters.
    pub fn spec(&self) -> &PolygonSpec {
        &self.spec
    }
}

impl ExportJob for BackgroundJob {
    fn name(&self) -> &str {
        "background"
    }

    fn packaging(&self) -> Packaging {
        Packaging::SingleWhenAlone
    }

    fn validate(&self) -> ForgeResult<()> {
        self.spec.validate()
    }

    fn process(&self, ctx: &mut RunContext) -> ForgeResult<()> {
        if ctx.check().is_break() {
            return Ok(());
        }
        let raster = render_polygons(&self.spec);
        if ctx.record(self.spec.file_name(), raster).is_break() {
            tracing::debug!("background export invalidated");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tools/background.rs"]
mod tests;
