//! Image links from an HTML directory listing

use crate::config::has_image_extension;

/// `href` values of every anchor whose target is a recognized image.
///
/// Document order is kept and repeats are dropped. Query strings and
/// fragments are ignored when checking the extension.
pub fn extract_image_links(html: &str) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();

    for href in anchor_hrefs(html) {
        let target = href.split(['?', '#']).next().unwrap_or_default();
        if has_image_extension(target) && !links.contains(&href) {
            links.push(href);
        }
    }

    links
}

/// Every `href` on an `<a>` start tag
fn anchor_hrefs(html: &str) -> Vec<String> {
    let bytes = html.as_bytes();
    let mut hrefs = Vec::new();
    let mut pos = 0;

    while let Some(offset) = find_anchor_start(&bytes[pos..]) {
        let (attrs, next) = parse_attributes(bytes, pos + offset + 2);
        if let Some((_, value)) = attrs.into_iter().find(|(name, _)| name == "href") {
            if !value.is_empty() {
                hrefs.push(value);
            }
        }
        pos = next;
    }

    hrefs
}

/// Offset of the next `<a` that begins an anchor tag (not `<abbr` etc.)
fn find_anchor_start(bytes: &[u8]) -> Option<usize> {
    let mut from = 0;
    while from + 1 < bytes.len() {
        let at = from + bytes[from..].iter().position(|&b| b == b'<')?;
        let is_anchor = bytes
            .get(at + 1)
            .is_some_and(|b| b.eq_ignore_ascii_case(&b'a'))
            && bytes
                .get(at + 2)
                .map_or(true, |b| b.is_ascii_whitespace() || *b == b'>' || *b == b'/');
        if is_anchor {
            return Some(at);
        }
        from = at + 1;
    }
    None
}

/// Parse attributes from `start` up to the closing `>`; returns them and the
/// position after the tag
fn parse_attributes(bytes: &[u8], start: usize) -> (Vec<(String, String)>, usize) {
    let mut attrs = Vec::new();
    let mut i = start;

    loop {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        if i >= bytes.len() {
            return (attrs, i);
        }
        if bytes[i] == b'>' {
            return (attrs, i + 1);
        }

        let name_start = i;
        while i < bytes.len() && !matches!(bytes[i], b'=' | b'>' | b'/') && !bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let name = String::from_utf8_lossy(&bytes[name_start..i]).to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b'=' {
            attrs.push((name, String::new()));
            continue;
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let value = match bytes.get(i) {
            Some(&quote) if quote == b'"' || quote == b'\'' => {
                let value_start = i + 1;
                let len = bytes[value_start..]
                    .iter()
                    .position(|&b| b == quote)
                    .unwrap_or(bytes.len() - value_start);
                i = (value_start + len + 1).min(bytes.len());
                &bytes[value_start..value_start + len]
            }
            _ => {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    i += 1;
                }
                &bytes[value_start..i]
            }
        };

        attrs.push((name, unescape(&String::from_utf8_lossy(value))));
    }
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
