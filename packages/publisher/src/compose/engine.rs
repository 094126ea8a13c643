//! The text-fit engine: compose text over a background image.

use std::path::{Path, PathBuf};

use ab_glyph::{FontArc, PxScale};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use tracing::debug;

use crate::compose::layout::{fit_text, FitConfig, FittedText, MeasureText, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::error::ComposeError;
use crate::slug::slugify;
use crate::types::content::ComposedImage;

const JPEG_QUALITY: u8 = 92;
const OUTLINE_OFFSET: i32 = 2;
const FILL: Rgb<u8> = Rgb([0, 0, 0]);
const OUTLINE: Rgb<u8> = Rgb([255, 255, 255]);

/// Composes fixed-size images with text guaranteed to fit the bounding
/// box, or a best-effort overflow render at the floor size.
///
/// Construction fails loudly when the font asset is missing or not a
/// usable font; there is no silent default-font fallback, since that
/// would corrupt visible output without signaling anything.
#[derive(Debug)]
pub struct TextFitEngine {
    client: reqwest::Client,
    font: FontArc,
    out_dir: PathBuf,
    config: FitConfig,
}

impl TextFitEngine {
    /// Create an engine from raw font bytes.
    pub fn new(font_bytes: Vec<u8>, out_dir: impl Into<PathBuf>) -> Result<Self, ComposeError> {
        let font = FontArc::try_from_vec(font_bytes).map_err(|e| ComposeError::Font {
            reason: e.to_string(),
        })?;
        Ok(Self {
            client: reqwest::Client::new(),
            font,
            out_dir: out_dir.into(),
            config: FitConfig::default(),
        })
    }

    /// Create an engine from a font file on disk.
    pub fn from_font_path(
        font_path: impl AsRef<Path>,
        out_dir: impl Into<PathBuf>,
    ) -> Result<Self, ComposeError> {
        let font_path = font_path.as_ref();
        let bytes = std::fs::read(font_path).map_err(|e| ComposeError::Font {
            reason: format!("{}: {e}", font_path.display()),
        })?;
        Self::new(bytes, out_dir)
    }

    /// Override the fit configuration.
    pub fn with_config(mut self, config: FitConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom HTTP client for background fetches.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Compose `text` over the background and persist a JPEG in the
    /// scratch area. The output canvas is always exactly 800x450.
    pub async fn compose(
        &self,
        background_ref: &str,
        text: &str,
    ) -> Result<ComposedImage, ComposeError> {
        let bytes = self.fetch_background(background_ref).await?;
        let mut canvas: RgbImage = image::load_from_memory(&bytes)?
            .resize_exact(CANVAS_WIDTH, CANVAS_HEIGHT, FilterType::Lanczos3)
            .to_rgb8();

        let fitted = fit_text(&self.font, text, &self.config);
        debug!(
            size = fitted.size,
            lines = fitted.lines.len(),
            overflow = fitted.overflow,
            "text layout chosen"
        );
        self.draw_block(&mut canvas, &fitted);

        std::fs::create_dir_all(&self.out_dir).map_err(|e| ComposeError::Io {
            path: self.out_dir.clone(),
            source: e,
        })?;
        let path = self.out_dir.join(format!("{}.jpg", slugify(text)));
        let file = std::fs::File::create(&path).map_err(|e| ComposeError::Io {
            path: path.clone(),
            source: e,
        })?;
        let mut writer = std::io::BufWriter::new(file);
        canvas.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY))?;

        Ok(ComposedImage {
            path,
            text: text.to_string(),
            font_size: fitted.size,
        })
    }

    /// Render the block centered on the canvas, each line individually
    /// centered, with offset duplicate draws as an outline so the text
    /// stays legible over any background brightness.
    fn draw_block(&self, canvas: &mut RgbImage, fitted: &FittedText) {
        let scale = PxScale::from(fitted.size);
        let mut y = ((CANVAS_HEIGHT as f32 - fitted.block_height()) / 2.0).max(0.0);

        for line in &fitted.lines {
            let width = self.font.line_width(fitted.size, line);
            let x = ((CANVAS_WIDTH as f32 - width) / 2.0).max(0.0) as i32;
            let y_px = y as i32;

            for dx in [-OUTLINE_OFFSET, 0, OUTLINE_OFFSET] {
                for dy in [-OUTLINE_OFFSET, 0, OUTLINE_OFFSET] {
                    if dx != 0 || dy != 0 {
                        draw_text_mut(canvas, OUTLINE, x + dx, y_px + dy, scale, &self.font, line);
                    }
                }
            }
            draw_text_mut(canvas, FILL, x, y_px, scale, &self.font, line);

            y += fitted.line_height;
        }
    }

    /// Fetch the background by URL, or read it from disk for local refs.
    async fn fetch_background(&self, reference: &str) -> Result<Vec<u8>, ComposeError> {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            let response = self
                .client
                .get(reference)
                .send()
                .await
                .map_err(|e| ComposeError::Fetch {
                    reference: reference.to_string(),
                    source: Box::new(e),
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(ComposeError::Fetch {
                    reference: reference.to_string(),
                    source: Box::new(std::io::Error::other(format!("HTTP {status}"))),
                });
            }

            let bytes = response.bytes().await.map_err(|e| ComposeError::Fetch {
                reference: reference.to_string(),
                source: Box::new(e),
            })?;
            Ok(bytes.to_vec())
        } else {
            std::fs::read(reference).map_err(|e| ComposeError::Fetch {
                reference: reference.to_string(),
                source: Box::new(e),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Load a bold system font for rendering tests; skip when the
    /// environment has none installed.
    fn test_font_bytes() -> Option<Vec<u8>> {
        const CANDIDATES: &[&str] = &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/Library/Fonts/Arial Bold.ttf",
            "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
        ];
        CANDIDATES.iter().find_map(|p| std::fs::read(p).ok())
    }

    fn write_test_background(dir: &Path) -> PathBuf {
        let bg = RgbImage::from_pixel(320, 180, Rgb([40, 90, 160]));
        let path = dir.join("background.png");
        bg.save(&path).unwrap();
        path
    }

    #[test]
    fn test_font_bytes_must_parse() {
        let err = TextFitEngine::new(vec![0, 1, 2, 3], "/tmp").unwrap_err();
        assert!(matches!(err, ComposeError::Font { .. }));
    }

    #[test]
    fn test_missing_font_file_fails_loudly() {
        let err = TextFitEngine::from_font_path("/nonexistent/font.ttf", "/tmp").unwrap_err();
        assert!(matches!(err, ComposeError::Font { .. }));
    }

    #[tokio::test]
    async fn test_compose_is_exact_canvas_size() {
        let Some(font) = test_font_bytes() else {
            eprintln!("skipping: no system font available");
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let bg_path = write_test_background(dir.path());
        let engine = TextFitEngine::new(font, dir.path().join("out")).unwrap();

        let composed = engine
            .compose(bg_path.to_str().unwrap(), "## Arsenal vs Chelsea Preview")
            .await
            .unwrap();

        let img = image::open(&composed.path).unwrap();
        assert_eq!(img.width(), CANVAS_WIDTH);
        assert_eq!(img.height(), CANVAS_HEIGHT);
        // Leading markdown glyphs do not leak into the file name
        assert!(composed
            .path
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("arsenal"));
    }

    #[tokio::test]
    async fn test_very_long_text_settles_at_floor() {
        let Some(font) = test_font_bytes() else {
            eprintln!("skipping: no system font available");
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let bg_path = write_test_background(dir.path());
        let engine = TextFitEngine::new(font, dir.path().join("out")).unwrap();

        let text = "a thoroughly overlong heading ".repeat(40);
        let composed = engine
            .compose(bg_path.to_str().unwrap(), &text)
            .await
            .unwrap();

        assert_eq!(composed.font_size, FitConfig::default().floor_size);
        let img = image::open(&composed.path).unwrap();
        assert_eq!((img.width(), img.height()), (CANVAS_WIDTH, CANVAS_HEIGHT));

        // Overlong text must still yield a writable file name
        let name = composed.path.file_name().unwrap().to_str().unwrap();
        assert!(name.len() <= 100);
    }

    #[tokio::test]
    async fn test_unfetchable_background_is_an_error() {
        let Some(font) = test_font_bytes() else {
            eprintln!("skipping: no system font available");
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let engine = TextFitEngine::new(font, dir.path().join("out")).unwrap();

        let err = engine
            .compose(dir.path().join("missing.png").to_str().unwrap(), "text")
            .await
            .unwrap_err();
        assert!(matches!(err, ComposeError::Fetch { .. }));
    }
}
