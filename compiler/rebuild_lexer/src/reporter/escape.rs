//! Escaped-source rendering for diagnostics.
//!
//! Excerpts quoted in diagnostics may contain tabs, control codes,
//! combining marks, noncharacters, or raw undecodable bytes. These are
//! replaced with visible escapes while marker offsets are translated to
//! the escaped text in the same pass. When nothing needed escaping the
//! raw excerpt and raw offsets are used directly.
//!
//! Escapes: `\n` (kept on its own line to preserve layout), `\r`, `\t`,
//! `\0`, and `\[hh…]` with two hex digits per byte for everything else.
//! A literal backslash doubles so escapes stay unambiguous.

use rebuild_diagnostic::TextSpan;
use rebuild_lexer_core::{chars, Decoded, Span, Utf8Decoder};

pub(crate) struct EscapedExcerpt {
    pub text: String,
    pub markers: Vec<TextSpan>,
}

/// Escape `bytes` (the excerpt starting at absolute offset `base`) and
/// translate `marker_spans` (absolute) to offsets into the result.
pub(crate) fn escape_excerpt(bytes: &[u8], base: u32, marker_spans: &[Span]) -> EscapedExcerpt {
    let mut out = String::new();
    let mut raw_from = 0usize;
    let mut requires_escapes = false;
    let mut starts: Vec<Option<u32>> = vec![None; marker_spans.len()];
    let mut lengths: Vec<Option<u32>> = vec![None; marker_spans.len()];

    // Escaped-text offset of the boundary before the item at `rel`.
    let offset_at =
        |out: &String, raw_from: usize, rel: usize| (out.len() + (rel - raw_from)) as u32;

    let mut update_markers = |out: &String, raw_from: usize, rel: usize| {
        let abs = base + rel as u32;
        let offset = offset_at(out, raw_from, rel);
        for (index, span) in marker_spans.iter().enumerate() {
            if span.start <= abs && starts[index].is_none() {
                starts[index] = Some(offset);
            }
            if span.end <= abs && lengths[index].is_none() {
                if let Some(start) = starts[index] {
                    lengths[index] = Some(offset - start);
                }
            }
        }
    };

    for item in Utf8Decoder::new(bytes, 0) {
        let rel = item.span().start as usize;
        update_markers(&out, raw_from, rel);
        let escaped: Option<String> = match item {
            Decoded::CodePoint(d) => match d.ch {
                '\n' => Some("\\n\n".to_string()),
                '\r' => {
                    requires_escapes = true;
                    Some("\\r".to_string())
                }
                '\t' => {
                    requires_escapes = true;
                    Some("\\t".to_string())
                }
                '\0' => {
                    requires_escapes = true;
                    Some("\\0".to_string())
                }
                '\\' => Some("\\\\".to_string()),
                c if chars::is_combining_mark(c)
                    || chars::is_control(c)
                    || chars::is_non_character(c) =>
                {
                    requires_escapes = true;
                    Some(hex_escape(&bytes[item.span().to_range()]))
                }
                _ => None,
            },
            Decoded::Error(e) => {
                requires_escapes = true;
                Some(hex_escape(&bytes[e.span.to_range()]))
            }
        };
        if let Some(escaped) = escaped {
            out.push_str(&String::from_utf8_lossy(&bytes[raw_from..rel]));
            out.push_str(&escaped);
            raw_from = item.span().end as usize;
        }
    }
    out.push_str(&String::from_utf8_lossy(&bytes[raw_from..]));
    update_markers(&out, bytes.len(), bytes.len());

    if !requires_escapes {
        // Raw excerpt and raw offsets; the transforms above (if any,
        // for `\n` and `\\`) are cosmetic only and are discarded.
        let markers = marker_spans
            .iter()
            .map(|span| TextSpan::new(span.start - base, span.len()))
            .collect();
        return EscapedExcerpt {
            text: String::from_utf8_lossy(bytes).into_owned(),
            markers,
        };
    }

    let markers = starts
        .into_iter()
        .zip(lengths)
        .map(|(start, length)| {
            let start = start.unwrap_or(out.len() as u32);
            TextSpan::new(start, length.unwrap_or(0))
        })
        .collect();
    EscapedExcerpt { text: out, markers }
}

fn hex_escape(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 3);
    out.push_str("\\[");
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out.push(']');
    out
}
