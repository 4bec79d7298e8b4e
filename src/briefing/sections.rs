//! Section normalization of generated briefing markup
//!
//! The generator is asked for three `<section>` elements but does not always deliver them.
//! Recovery is heuristic: sections that already carry their marker are kept as they are;
//! otherwise find the Summary and Recommendations headings, cut each block up to the next
//! heading of the same or higher level, and keep whatever is left as per-airport content.
//! Sections that cannot be found are omitted, never emitted empty.

use tracing::debug;

use crate::models::{BriefingDocument, SectionId};

/// Level assumed when the cut starts on something other than `<h1>`..`<h6>`
const DEFAULT_HEADING_LEVEL: u8 = 2;

const SECTION_CLOSE: &str = "</section>";

pub struct SectionNormalizer;

impl SectionNormalizer {
    /// Force raw generated markup into the summary / recommendations / per-airport layout
    ///
    /// Markup that already carries all three section markers is returned unchanged, which also
    /// makes normalizing a normalized document a no-op.
    #[must_use]
    pub fn normalize(raw: &str) -> BriefingDocument {
        if SectionId::ALL
            .iter()
            .all(|section| raw.contains(&section.marker()))
        {
            return BriefingDocument::from_html(raw.to_string());
        }

        let mut remaining = raw.to_string();
        let mut parts: Vec<String> = Vec::with_capacity(3);

        for section in [SectionId::Summary, SectionId::Recommendations] {
            if let Some((element, rest)) = take_marked_section(&remaining, section) {
                parts.push(element);
                remaining = rest;
            } else if let Some((block, rest)) = extract_block(&remaining, section.heading()) {
                parts.push(section.wrap(&block));
                remaining = rest;
            } else {
                debug!(section = section.as_str(), "No heading found in generated markup");
            }
        }

        let remainder = remaining.trim();
        match take_marked_section(remainder, SectionId::PerAirport) {
            Some((element, rest)) => parts.push(absorb(&element, rest.trim())),
            None if !remainder.is_empty() => parts.push(SectionId::PerAirport.wrap(remainder)),
            None => {}
        }

        BriefingDocument::from_html(parts.join("\n"))
    }
}

/// Cut an existing `<section id="..">..</section>` element for `section` out of `src`
///
/// Nested sections are not tracked: the element ends at the first closing tag.
fn take_marked_section(src: &str, section: SectionId) -> Option<(String, String)> {
    let marker_at = src.find(&section.marker())?;
    let start = src[..marker_at].rfind("<section")?;
    if src[start..marker_at].contains('>') {
        return None;
    }
    let end = marker_at + src[marker_at..].find(SECTION_CLOSE)? + SECTION_CLOSE.len();

    let element = src[start..end].to_string();
    let rest = format!("{}{}", &src[..start], &src[end..]);
    Some((element, rest))
}

/// Append `stray` inside a marked section element, before its closing tag
fn absorb(element: &str, stray: &str) -> String {
    if stray.is_empty() {
        return element.to_string();
    }
    let body = element.strip_suffix(SECTION_CLOSE).unwrap_or(element);
    format!("{body}{stray}{SECTION_CLOSE}")
}

/// Cut the block introduced by `heading` out of `src`, returning `(block, rest)`
fn extract_block(src: &str, heading: &str) -> Option<(String, String)> {
    // ASCII lowering keeps byte offsets aligned with `src`
    let lower = src.to_ascii_lowercase();
    let needle = heading.to_ascii_lowercase();

    let found = lower
        .find(&format!(">{needle}<"))
        .or_else(|| lower.find(&needle))?;
    let start = lower[..found].rfind('<')?;

    let level = heading_level(&lower[start..]).unwrap_or(DEFAULT_HEADING_LEVEL);
    let search_from = start + 1;
    let end = (1..=level)
        .filter_map(|higher| {
            lower[search_from..]
                .find(&format!("<h{higher}"))
                .map(|offset| search_from + offset)
        })
        .min()
        .unwrap_or(src.len());

    let block = src[start..end].to_string();
    let rest = format!("{}{}", &src[..start], &src[end..]);
    Some((block, rest))
}

/// Level of an opening `<hN` tag at the start of `tag`
fn heading_level(tag: &str) -> Option<u8> {
    let bytes = tag.as_bytes();
    match bytes {
        [b'<', b'h', digit @ b'1'..=b'6', ..] => Some(*digit - b'0'),
        _ => None,
    }
}
