use image::imageops::FilterType;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    assets::source::SourceImage,
    foundation::{
        core::Raster,
        error::{ForgeError, ForgeResult},
        math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
    },
    resize::spec::SizeSpec,
};

/// Resampling filter for [`BatchResizer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    /// Nearest neighbour.
    Nearest,
    /// Bilinear.
    Triangle,
    /// Bicubic Catmull-Rom.
    CatmullRom,
    /// Gaussian.
    Gaussian,
    /// Lanczos with window 3.
    #[default]
    Lanczos3,
}

impl ResizeFilter {
    fn filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Parallelism settings for a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeThreading {
    /// Resize specs concurrently.
    pub parallel: bool,
    /// Dedicated worker count. `None` uses the global rayon pool.
    pub threads: Option<usize>,
}

impl Default for ResizeThreading {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
        }
    }
}

/// One resized output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResizedAsset {
    /// Size it was produced for.
    pub spec: SizeSpec,
    /// Exactly `spec.width × spec.height`.
    pub raster: Raster,
}

/// Stretches one source to many exact sizes.
///
/// No cropping and no aspect preservation: each output is exactly the requested size. Output
/// order always follows spec order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResizer {
    /// Resampling filter.
    #[serde(default)]
    pub filter: ResizeFilter,
    /// Parallelism.
    #[serde(default)]
    pub threading: ResizeThreading,
}

impl BatchResizer {
    /// Resizer with the given filter and default threading.
    pub fn with_filter(filter: ResizeFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Decode `source` once and resize it to every spec.
    ///
    /// A source that fails to decode yields a single [`ForgeError::SourceDecode`] and no outputs.
    #[tracing::instrument(skip_all, fields(source = %source.name(), specs = specs.len()))]
    pub fn resize_all(
        &self,
        source: &SourceImage,
        specs: &[SizeSpec],
    ) -> ForgeResult<Vec<ResizedAsset>> {
        let raster = source.decode()?;
        self.resize_raster_all(&raster, specs)
    }

    /// Resize an already decoded raster to every spec.
    pub fn resize_raster_all(
        &self,
        raster: &Raster,
        specs: &[SizeSpec],
    ) -> ForgeResult<Vec<ResizedAsset>> {
        let premul = premultiplied_image(raster)?;
        let filter = self.filter.filter_type();
        let one = |spec: &SizeSpec| -> ForgeResult<ResizedAsset> {
            Ok(ResizedAsset {
                spec: spec.clone(),
                raster: resize_premultiplied(&premul, spec.width, spec.height, filter)?,
            })
        };

        let out = if !self.threading.parallel || specs.len() < 2 {
            specs.iter().map(one).collect::<ForgeResult<Vec<_>>>()?
        } else if let Some(threads) = self.threading.threads {
            let pool = build_thread_pool(threads)?;
            pool.install(|| specs.par_iter().map(one).collect::<ForgeResult<Vec<_>>>())?
        } else {
            specs.par_iter().map(one).collect::<ForgeResult<Vec<_>>>()?
        };

        tracing::debug!(outputs = out.len(), filter = ?self.filter, "batch resized");
        Ok(out)
    }

    /// Resize a single raster to `width × height`.
    pub fn resize(&self, raster: &Raster, width: u32, height: u32) -> ForgeResult<Raster> {
        let premul = premultiplied_image(raster)?;
        resize_premultiplied(&premul, width, height, self.filter.filter_type())
    }
}

// Filtering straight alpha bleeds the color of invisible pixels into edges, so resampling runs
// on premultiplied data.
fn premultiplied_image(raster: &Raster) -> ForgeResult<image::RgbaImage> {
    let mut data = raster.data().to_vec();
    premultiply_rgba8_in_place(&mut data);
    image::RgbaImage::from_raw(raster.width(), raster.height(), data)
        .ok_or_else(|| ForgeError::pixel_read("raster buffer does not match its size"))
}

fn resize_premultiplied(
    src: &image::RgbaImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> ForgeResult<Raster> {
    if width == 0 || height == 0 {
        return Err(ForgeError::validation(format!(
            "resize target must be non-empty, got {width}x{height}"
        )));
    }
    let out = if src.dimensions() == (width, height) {
        src.clone()
    } else {
        image::imageops::resize(src, width, height, filter)
    };
    let mut data = out.into_raw();
    unpremultiply_rgba8_in_place(&mut data);
    Raster::from_rgba8(width, height, data)
}

fn build_thread_pool(threads: usize) -> ForgeResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(ForgeError::validation(
            "resize threading 'threads' must be >= 1 when set",
        ));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| ForgeError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/resize/batch.rs"]
mod tests;
