//! Progressive image reveal.
//!
//! Images are loaded through an [`ImageLoader`] and painted onto a canvas in
//! equal horizontal bands, with random stalls to mimic a slow connection.

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::Reveal;
use crate::document::{Bitmap, Canvas, NodeId, Pixel, Rgb, Surface, Tag};

/// Errors that can occur while loading an image.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Failed to read image {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {src}: {reason}")]
    Decode { src: String, reason: String },
}

/// Source of image data.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    /// Load and decode the image behind `src`.
    async fn load(&self, src: &str) -> Result<Bitmap, ImageError>;
}

/// Loads images from disk, relative to a base directory.
#[derive(Debug, Clone, Default)]
pub struct FsImageLoader {
    base_dir: Option<PathBuf>,
}

impl FsImageLoader {
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    fn resolve(&self, src: &str) -> PathBuf {
        let path = Path::new(src);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[async_trait]
impl ImageLoader for FsImageLoader {
    async fn load(&self, src: &str) -> Result<Bitmap, ImageError> {
        let path = self.resolve(src);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| ImageError::Read { path, source })?;
        decode_image(&bytes).map_err(|reason| ImageError::Decode {
            src: src.to_string(),
            reason,
        })
    }
}

/// Decode binary PPM (`P6`) or plain-text art.
///
/// Text art uses one row per line; each character becomes one cell.
pub fn decode_image(bytes: &[u8]) -> Result<Bitmap, String> {
    if bytes.starts_with(b"P6") {
        return decode_ppm(bytes);
    }
    let text = std::str::from_utf8(bytes).map_err(|_| "not a PPM image or UTF-8 text".to_string())?;
    let rows = text
        .lines()
        .map(|line| line.trim_end_matches('\r').chars().map(Pixel::glyph).collect())
        .collect();
    Ok(Bitmap::from_rows(rows))
}

fn decode_ppm(bytes: &[u8]) -> Result<Bitmap, String> {
    let mut pos = 2;
    let mut header = [0usize; 3];
    for value in header.iter_mut() {
        // Skip whitespace and comments
        loop {
            match bytes.get(pos) {
                Some(b) if b.is_ascii_whitespace() => pos += 1,
                Some(b'#') => {
                    while bytes.get(pos).is_some_and(|&b| b != b'\n') {
                        pos += 1;
                    }
                }
                _ => break,
            }
        }
        let start = pos;
        while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
            pos += 1;
        }
        *value = std::str::from_utf8(&bytes[start..pos])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| "invalid PPM header".to_string())?;
    }
    let [width, height, maxval] = header;
    if maxval == 0 || maxval > 255 {
        return Err(format!("unsupported PPM max value {}", maxval));
    }
    // Single whitespace byte before the raster
    pos += 1;

    let pixels = width
        .checked_mul(height)
        .filter(|n| n.checked_mul(3).is_some())
        .ok_or_else(|| "PPM dimensions too large".to_string())?;
    let raster = bytes.get(pos..).unwrap_or_default();
    if raster.len() < pixels * 3 {
        return Err("truncated PPM raster".to_string());
    }

    let scale = |v: u8| ((v as usize * 255) / maxval) as u8;
    let rows = raster
        .chunks_exact(3)
        .take(pixels)
        .map(|px| Pixel::colored(Rgb(scale(px[0]), scale(px[1]), scale(px[2]))))
        .collect::<Vec<_>>()
        .chunks(width.max(1))
        .map(<[Pixel]>::to_vec)
        .collect();
    Ok(Bitmap::from_rows(rows))
}

/// Pacing of an image reveal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealTiming {
    /// Number of horizontal bands
    pub bands: usize,
    /// Delay after each painted band
    pub band_delay: Duration,
    /// Chance per step of stalling instead of painting
    pub stall_probability: f64,
    /// Length of a stall
    pub stall_delay: Duration,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            bands: 50,
            band_delay: Duration::from_millis(10),
            stall_probability: 0.1,
            stall_delay: Duration::from_millis(100),
        }
    }
}

/// Rows covered by band `band` of `bands` over an image `height` rows tall.
pub fn band_rows(band: usize, bands: usize, height: usize) -> Range<usize> {
    let bands = bands.max(1);
    (band * height / bands)..((band + 1) * height / bands)
}

/// Paints images into the document band by band.
pub struct ImageRevealer {
    loader: Arc<dyn ImageLoader>,
    timing: RevealTiming,
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for ImageRevealer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageRevealer")
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

impl ImageRevealer {
    /// Create a revealer. A `seed` makes the stall pattern reproducible.
    pub fn new(loader: Arc<dyn ImageLoader>, timing: RevealTiming, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let timing = RevealTiming {
            bands: timing.bands.max(1),
            stall_probability: timing.stall_probability.clamp(0.0, 0.99),
            ..timing
        };
        Self {
            loader,
            timing,
            rng: Mutex::new(rng),
        }
    }

    pub fn timing(&self) -> RevealTiming {
        self.timing
    }

    /// Independent uniform draw for each band.
    fn should_stall(&self) -> bool {
        self.timing.stall_probability > 0.0
            && self.rng.lock().random_bool(self.timing.stall_probability)
    }

    /// Load `src` and paint it into `container`.
    pub async fn reveal(
        &self,
        surface: &Surface,
        container: NodeId,
        src: &str,
        cancel: &CancellationToken,
    ) -> Reveal {
        if cancel.is_cancelled()
            || surface
                .replace_with_notice(container, "loading-text", "Loading image...")
                .is_none()
        {
            return Reveal::Skipped;
        }

        let bitmap = match self.loader.load(src).await {
            Ok(bitmap) => bitmap,
            Err(e) => {
                warn!(src, error = %e, "image load failed");
                surface.replace_with_notice(
                    container,
                    "error-text",
                    &format!("Error loading image: {}", src),
                );
                return Reveal::Failed;
            }
        };

        let canvas = surface.write(|doc| {
            if cancel.is_cancelled() || !doc.is_attached(container) {
                return None;
            }
            doc.clear_children(container);
            let canvas = doc.create(Tag::Canvas);
            doc.add_class(canvas, "terminal-image");
            doc.set_canvas(canvas, Canvas::new(bitmap.width(), bitmap.height()));
            doc.append(container, canvas);
            Some(canvas)
        });
        let Some(canvas) = canvas else {
            return Reveal::Interrupted;
        };

        let bands = self.timing.bands;
        let mut band = 0;
        loop {
            if cancel.is_cancelled() || !surface.is_attached(canvas) {
                debug!(src, band, bands, "image reveal interrupted");
                return Reveal::Interrupted;
            }
            if band >= bands {
                return Reveal::Complete;
            }
            if self.should_stall() {
                tokio::time::sleep(self.timing.stall_delay).await;
                continue;
            }
            let rows = band_rows(band, bands, bitmap.height());
            surface.write(|doc| doc.paint_canvas(canvas, &bitmap, rows));
            band += 1;
            tokio::time::sleep(self.timing.band_delay).await;
        }
    }
}
