//! Font-size search and line wrapping for the fixed canvas.
//!
//! The search walks the size downward in fixed decrements, re-wrapping
//! at each size with a character-count heuristic and accepting the
//! first layout whose measured block fits the width/height ratios. The
//! floor size is accepted as a best-effort overflow layout, never an
//! error.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};

/// Canvas width in pixels. Every composed image is exactly this size.
pub const CANVAS_WIDTH: u32 = 800;

/// Canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 450;

/// Average glyph advance as a fraction of the font size, used only for
/// the wrap-width heuristic (the accept test measures real advances).
const APPROX_GLYPH_WIDTH: f32 = 0.55;

/// Tuning for the downward font-size search.
#[derive(Debug, Clone)]
pub struct FitConfig {
    /// Text block may use at most this fraction of the canvas width
    pub max_width_ratio: f32,

    /// Text block may use at most this fraction of the canvas height
    pub max_height_ratio: f32,

    /// Size the search starts from
    pub start_size: f32,

    /// Size the search never goes below
    pub floor_size: f32,

    /// Fixed decrement per search step
    pub step: f32,

    /// Line height as a multiple of the font size
    pub line_spacing: f32,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            max_width_ratio: 0.8,
            max_height_ratio: 0.55,
            start_size: 64.0,
            floor_size: 20.0,
            step: 2.0,
            line_spacing: 1.2,
        }
    }
}

impl FitConfig {
    /// Set the floor size.
    pub fn with_floor_size(mut self, floor: f32) -> Self {
        self.floor_size = floor;
        self
    }

    /// Set the starting size.
    pub fn with_start_size(mut self, start: f32) -> Self {
        self.start_size = start;
        self
    }
}

/// Width measurement seam so fitting logic is testable without a font
/// asset on disk.
pub trait MeasureText {
    /// Rendered width of `line` at `size` pixels.
    fn line_width(&self, size: f32, line: &str) -> f32;
}

impl MeasureText for FontArc {
    fn line_width(&self, size: f32, line: &str) -> f32 {
        let scaled = self.as_scaled(PxScale::from(size));
        line.chars()
            .map(|c| scaled.h_advance(self.glyph_id(c)))
            .sum()
    }
}

/// A wrapped, sized text block ready to render.
#[derive(Debug, Clone)]
pub struct FittedText {
    /// Wrapped lines, top to bottom
    pub lines: Vec<String>,

    /// Chosen font size in pixels
    pub size: f32,

    /// Vertical advance per line
    pub line_height: f32,

    /// Measured width of the widest line
    pub block_width: f32,

    /// True when the floor was reached without satisfying the bounds
    pub overflow: bool,
}

impl FittedText {
    /// Total height of the block.
    pub fn block_height(&self) -> f32 {
        self.line_height * self.lines.len() as f32
    }
}

/// Strip leading markdown glyphs (`#`, `*`, whitespace) and trim.
pub fn strip_markdown_glyphs(text: &str) -> &str {
    text.trim_start_matches(|c: char| c == '#' || c == '*' || c.is_whitespace())
        .trim_end()
}

/// Greedy word wrap by character count. Words longer than `max_chars`
/// stay on their own line rather than being split.
pub fn wrap_by_chars(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Search a font size downward until the wrapped block fits the
/// configured ratios of the canvas, or accept the floor-size layout as
/// best effort.
pub fn fit_text<M: MeasureText>(measure: &M, text: &str, config: &FitConfig) -> FittedText {
    let text = strip_markdown_glyphs(text);
    let max_width = config.max_width_ratio * CANVAS_WIDTH as f32;
    let max_height = config.max_height_ratio * CANVAS_HEIGHT as f32;

    let mut size = config.start_size;
    loop {
        let chars_per_line = (max_width / (size * APPROX_GLYPH_WIDTH)).max(1.0) as usize;
        let lines = wrap_by_chars(text, chars_per_line);

        let line_height = size * config.line_spacing;
        let block_width = lines
            .iter()
            .map(|l| measure.line_width(size, l))
            .fold(0.0_f32, f32::max);
        let block_height = line_height * lines.len() as f32;

        let fits = block_width <= max_width && block_height <= max_height;
        let at_floor = size <= config.floor_size;

        if fits || at_floor {
            return FittedText {
                lines,
                size,
                line_height,
                block_width,
                overflow: !fits,
            };
        }

        size = (size - config.step).max(config.floor_size);
    }
}
