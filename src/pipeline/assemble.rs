//! Result assembly: OCR pages → plain text, self-contained markdown, images.
//!
//! The service returns markdown that references images by opaque id, e.g.
//! `![img-0.jpeg](img-0.jpeg)`, and lists the payloads separately. This stage
//! joins the pages and rewrites every such reference into an inline PNG data
//! URL so the markdown renders with no further lookups.
//!
//! ## Token matching
//!
//! Only structurally matched image references are rewritten: an `![alt](target)`
//! token whose alt text and link target are both exactly the image id. Plain
//! text that happens to contain the id, a regular link `[id](id)`, or an
//! image whose alt differs from its target are left alone. The matcher is
//! built from the exact tokens of the ids that have a payload, so stray
//! brackets around a token, or ids containing spaces or parentheses, cannot
//! hide it. All tokens are located in a single left-to-right regex pass, so
//! a substituted data URL is never re-scanned.

use crate::error::ImageIssue;
use crate::output::{AssemblyResult, ExtractedImage};
use crate::pipeline::encode::{decode_base64_image, png_data_url};
use crate::service::OcrPage;
use regex::{Captures, Regex};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Separator placed between consecutive pages.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Assemble the OCR pages into the final result.
///
/// 1. `plain_text` is every page's markdown joined with a blank line, trimmed.
/// 2. Each image payload is decoded and re-encoded as PNG; images are
///    collected in page order, then in-page order.
/// 3. `rendered_markdown` is `plain_text` with every `![id](id)` token of a
///    decoded image replaced by `![id](data:image/png;base64,…)`. When an id
///    carries a payload more than once, the first one wins.
/// 4. An image without a usable payload appends a warning line to
///    `rendered_markdown` instead; `plain_text` never changes.
pub fn assemble(pages: &[OcrPage]) -> AssemblyResult {
    let plain_text = pages
        .iter()
        .map(|p| p.markdown.as_str())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
        .trim()
        .to_string();

    let mut images = Vec::new();
    let mut warnings = Vec::new();
    let mut data_urls: HashMap<&str, String> = HashMap::new();

    for (page_idx, page) in pages.iter().enumerate() {
        for ocr_image in &page.images {
            let id = ocr_image.id.as_str();

            let Some(payload) = ocr_image.image_base64.as_deref() else {
                warn!("Page {}: no base64 data for image {}", page_idx + 1, id);
                warnings.push(ImageIssue::MissingPayload { id: id.to_string() });
                continue;
            };

            let decoded = decode_base64_image(payload).map_err(|e| e.to_string());
            let encoded = decoded.and_then(|img| {
                png_data_url(&img)
                    .map(|url| (img, url))
                    .map_err(|e| format!("PNG re-encoding failed: {e}"))
            });

            match encoded {
                Ok((img, url)) => {
                    debug!(page = page_idx + 1, id, "Decoded image");
                    data_urls.entry(id).or_insert(url);
                    images.push(ExtractedImage {
                        id: id.to_string(),
                        page: page_idx,
                        image: img,
                    });
                }
                Err(detail) => {
                    warn!("Page {}: image {} not decodable: {}", page_idx + 1, id, detail);
                    warnings.push(ImageIssue::DecodeFailed {
                        id: id.to_string(),
                        detail,
                    });
                }
            }
        }
    }

    let mut rendered = inline_placeholders(&plain_text, &data_urls);
    for issue in &warnings {
        rendered.push_str(PAGE_SEPARATOR);
        rendered.push_str(&issue.warning_line());
    }

    AssemblyResult {
        plain_text,
        rendered_markdown: rendered.trim().to_string(),
        images,
        warnings,
    }
}

/// Replace every `![id](id)` token whose id has a data URL.
///
/// Tokens with a differing alt and target, or an id without a data URL,
/// are copied through verbatim.
pub fn inline_placeholders(markdown: &str, data_urls: &HashMap<&str, String>) -> String {
    if data_urls.is_empty() {
        return markdown.to_string();
    }

    let replacements: HashMap<String, String> = data_urls
        .iter()
        .map(|(id, url)| (placeholder_token(id), format!("![{id}]({url})")))
        .collect();

    // Longest first, so a token that contains another still wins the match.
    let mut tokens: Vec<&str> = replacements.keys().map(String::as_str).collect();
    tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let pattern = tokens
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");

    match Regex::new(&pattern) {
        Ok(re) => re
            .replace_all(markdown, |caps: &Captures| {
                replacements
                    .get(&caps[0])
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned(),
        Err(e) => {
            // Too many ids for one automaton. Data URLs never contain `![`,
            // so replacing token by token cannot touch an earlier substitution.
            warn!("Placeholder matcher unavailable ({e}), replacing tokens one by one");
            tokens.iter().fold(markdown.to_string(), |md, token| {
                md.replace(token, &replacements[*token])
            })
        }
    }
}

/// The `![id](id)` reference the service emits for an image.
fn placeholder_token(id: &str) -> String {
    format!("![{id}]({id})")
}
