//! HTML post-processing: entity stripping and structural figure insertion.

use regex::Regex;

use crate::error::InsertError;

/// Remove every HTML/XML character-entity reference from `html`.
///
/// Entities are stripped wholesale, never decoded, so a malformed
/// entity can't break later parsing. Idempotent: the output contains no
/// `&name;` sequences for a second pass to match.
pub fn strip_entities(html: &str) -> String {
    let entity = Regex::new(r"&[a-zA-Z0-9#]+;").unwrap();
    entity.replace_all(html, "").into_owned()
}

/// Build a self-contained figure fragment for one uploaded image.
///
/// Matches the markup the remote theme styles: wp-caption classes, lazy
/// loading, and attachment-id hooks when the site reported an id.
pub fn figure_fragment(
    img_url: &str,
    alt: &str,
    caption: &str,
    width: u32,
    height: u32,
    attachment_id: Option<u64>,
) -> String {
    let (figure_id, caption_id, img_class) = match attachment_id {
        Some(id) => (
            format!("attachment_{id}"),
            format!("caption-attachment-{id}"),
            format!("size-full wp-image-{id}"),
        ),
        None => (String::new(), String::new(), "size-full".to_string()),
    };

    let figcaption = if caption.is_empty() {
        String::new()
    } else {
        format!(r#"<figcaption id="{caption_id}" class="wp-caption-text">{caption}</figcaption>"#)
    };

    format!(
        r#"<figure id="{figure_id}" aria-describedby="{caption_id}" style="width: {width}px" class="wp-caption aligncenter"><img loading="lazy" decoding="async" class="{img_class}" src="{img_url}" alt="{alt}" width="{width}" height="{height}">{figcaption}</figure>"#
    )
}

/// Insert figure fragments after the first and last `<h2>` of `body_html`.
///
/// The body is entity-stripped first, then headings are located in
/// document order. `figure2` goes immediately after the first heading,
/// `figure3` immediately after the last. With a single heading both
/// attach to it, `figure2` first. With no headings the stripped body is
/// returned unchanged and no figure is inserted. The first-heading
/// placement for `figure2` is intentional.
///
/// Fails closed: when `<h2` opens and `</h2>` closes do not pair up the
/// transform returns an error and the caller keeps its original body.
pub fn insert_figures(
    body_html: &str,
    figure2: &str,
    figure3: &str,
) -> Result<String, InsertError> {
    let body = strip_entities(body_html);

    let open = Regex::new(r"(?i)<h2[\s>]").unwrap();
    let close = Regex::new(r"(?i)</h2\s*>").unwrap();

    let opens = open.find_iter(&body).count();
    let close_ends: Vec<usize> = close.find_iter(&body).map(|m| m.end()).collect();

    if opens != close_ends.len() {
        return Err(InsertError::Malformed {
            opens,
            closes: close_ends.len(),
        });
    }

    let (first, last) = match (close_ends.first(), close_ends.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Ok(body),
    };

    let mut out = String::with_capacity(body.len() + figure2.len() + figure3.len());
    if first == last {
        out.push_str(&body[..first]);
        out.push_str(figure2);
        out.push_str(figure3);
        out.push_str(&body[first..]);
    } else {
        out.push_str(&body[..first]);
        out.push_str(figure2);
        out.push_str(&body[first..last]);
        out.push_str(figure3);
        out.push_str(&body[last..]);
    }

    Ok(out)
}
