//! Post-processing of model-written markdown into an [`Article`].
//!
//! The model is asked for strict markdown (H1 title, H2 sections, one
//! internal link) but drifts: stray `#`/`*` lines, the link dropped or
//! left unformatted. These helpers normalize the output the same way
//! every time so the rest of the pipeline can rely on the shape.

use pulldown_cmark::{html, Options, Parser};
use regex::Regex;

use crate::types::content::{Anchor, Article};

/// Drop lines that consist only of stray markdown glyphs.
pub fn clean_markdown(md: &str) -> String {
    let junk = Regex::new(r"^[#*\s]+$").unwrap();
    md.lines()
        .filter(|line| {
            let trimmed = line.trim();
            trimmed.is_empty() || !junk.is_match(trimmed)
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Pull the first `# ` H1 out of the markdown, returning the title and
/// the remaining document.
pub fn extract_title(md: &str) -> (String, String) {
    let mut title = String::new();
    let mut rest: Vec<&str> = Vec::new();

    for line in md.lines() {
        let trimmed = line.trim_start();
        if title.is_empty() && trimmed.starts_with("# ") {
            title = trimmed[2..].trim().to_string();
        } else {
            rest.push(line);
        }
    }

    (title, rest.join("\n").trim().to_string())
}

/// Collect H2 texts in document order.
pub fn heading_list(md: &str) -> Vec<String> {
    let h2 = Regex::new(r"(?m)^\s*##\s+(.+)$").unwrap();
    h2.captures_iter(md)
        .map(|cap| cap[1].trim().to_string())
        .collect()
}

/// Render markdown to HTML with tables and strikethrough enabled.
pub fn to_html(md: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut out = String::new();
    html::push_html(&mut out, Parser::new_ext(md, options));
    out
}

/// Make sure the body carries the internal link exactly once, bolded.
///
/// If the link target is already present the body is left alone.
/// Otherwise the first plain occurrence of the anchor text is replaced
/// with the bolded link; when the text never appears, the body is
/// returned unchanged (the caller's prompt is the real fix).
pub fn ensure_internal_link(html_body: &str, anchor: &Anchor) -> String {
    let href = format!(r#"href="{}""#, anchor.url);
    if html_body.contains(&href) {
        return html_body.to_string();
    }

    let link = format!(
        r#"<a href="{}"><strong>{}</strong></a>"#,
        anchor.url, anchor.text
    );
    html_body.replacen(&anchor.text, &link, 1)
}

/// Full pipeline from raw model markdown to an [`Article`].
///
/// An absent H1 yields an empty title; the caller decides whether that
/// is terminal (the row pipeline treats it as a generation failure).
pub fn article_from_markdown(raw_md: &str, anchor: &Anchor) -> Article {
    let cleaned = clean_markdown(raw_md);
    let (title, body_md) = extract_title(&cleaned);
    let headings = heading_list(&body_md);
    let body_html = ensure_internal_link(&to_html(&body_md), anchor);

    Article {
        title,
        headings,
        body_html,
    }
}
