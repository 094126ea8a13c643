//! Adaptive image text layout: size search, wrapping, and rendering.

mod engine;
mod layout;

pub use engine::TextFitEngine;
pub use layout::{
    fit_text, strip_markdown_glyphs, wrap_by_chars, FitConfig, FittedText, MeasureText,
    CANVAS_HEIGHT, CANVAS_WIDTH,
};
