use std::{
    fmt,
    path::{Path, PathBuf},
    sync::{Arc, OnceLock},
};

use anyhow::Context;
use resvg::tiny_skia;

use crate::foundation::{core::Rgba8, error::ForgeResult};

/// One line of centered text.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TextRun {
    pub(crate) text: String,
    pub(crate) center_x: f64,
    pub(crate) baseline: f64,
    pub(crate) font_size: f64,
    pub(crate) bold: bool,
    pub(crate) color: Rgba8,
    pub(crate) family: String,
}

/// Rasterizes text through usvg, resolving faces from the system font database plus any
/// configured font directories.
///
/// The database is built on first use and then shared by every composition of this renderer.
#[derive(Clone, Default)]
pub struct TextRenderer {
    font_dirs: Vec<PathBuf>,
    fontdb: OnceLock<Arc<usvg::fontdb::Database>>,
}

impl fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextRenderer")
            .field("font_dirs", &self.font_dirs)
            .field("loaded", &self.fontdb.get().is_some())
            .finish()
    }
}

impl TextRenderer {
    /// Renderer using system fonts only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also load `.ttf`/`.otf`/`.ttc` files found directly in `dir`.
    pub fn with_font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.font_dirs.push(dir.into());
        self
    }

    /// Number of font faces available (loads the database if needed).
    pub fn face_count(&self) -> usize {
        self.fontdb().faces().count()
    }

    fn fontdb(&self) -> Arc<usvg::fontdb::Database> {
        self.fontdb
            .get_or_init(|| {
                let mut db = usvg::fontdb::Database::new();
                db.load_system_fonts();
                for dir in &self.font_dirs {
                    load_fonts_from_dir(&mut db, dir);
                }
                tracing::debug!(faces = db.faces().count(), "font database loaded");
                Arc::new(db)
            })
            .clone()
    }

    pub(crate) fn draw(&self, pixmap: &mut tiny_skia::Pixmap, runs: &[TextRun]) -> ForgeResult<()> {
        let runs: Vec<&TextRun> = runs.iter().filter(|r| !r.text.trim().is_empty()).collect();
        if runs.is_empty() {
            return Ok(());
        }

        let svg = build_svg(pixmap.width(), pixmap.height(), &runs);
        let opts = usvg::Options {
            fontdb: self.fontdb(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts).context("parse text layer svg")?;
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
        Ok(())
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(err) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), %err, "skipping font file");
        }
    }
}

fn build_svg(width: u32, height: u32, runs: &[&TextRun]) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    for run in runs {
        let c = run.color;
        svg.push_str(&format!(
            r##"<text x="{x}" y="{y}" font-family="{family}" font-size="{size}" font-weight="{weight}" fill="#{r:02x}{g:02x}{b:02x}" fill-opacity="{alpha}" text-anchor="middle">{text}</text>"##,
            x = run.center_x,
            y = run.baseline,
            family = escape_xml(&run.family),
            size = run.font_size,
            weight = if run.bold { "bold" } else { "normal" },
            r = c.r,
            g = c.g,
            b = c.b,
            alpha = f32::from(c.a) / 255.0,
            text = escape_xml(&run.text),
        ));
    }
    svg.push_str("</svg>");
    svg
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/compose/text.rs"]
mod tests;
