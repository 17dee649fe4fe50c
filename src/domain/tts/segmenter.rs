//! Splitting of oversized text into bounded chunks at the best natural
//! breakpoint available.
//!
//! Lengths are measured in bytes. The catalog text this service feeds the
//! speech engine is overwhelmingly ASCII, where bytes and characters
//! coincide; for multi-byte text the byte limit is the conservative bound.

/// A breakpoint rule: candidate separator patterns plus the minimum
/// fraction of `max_chars` a break must reach to be accepted.
struct BreakRule {
    patterns: &'static [&'static str],
    min_fraction: f64,
}

/// Rules in descending quality order, evaluated top-to-bottom. Within one
/// rule the latest-positioned match wins (the longest valid chunk beats the
/// earliest separator).
const BREAK_RULES: &[BreakRule] = &[
    // Paragraph break
    BreakRule {
        patterns: &["\n\n"],
        min_fraction: 0.5,
    },
    // Single newline
    BreakRule {
        patterns: &["\n"],
        min_fraction: 0.5,
    },
    // Sentence terminators, quoted variants included
    BreakRule {
        patterns: &[". ", "! ", "? ", ".\" ", "!\" ", "?\" "],
        min_fraction: 0.3,
    },
    // Plain space
    BreakRule {
        patterns: &[" "],
        min_fraction: 0.3,
    },
];

/// Split `text` into an ordered sequence of chunks, none longer than
/// `max_chars`.
///
/// Text at or under the limit comes back as a single trimmed chunk,
/// untouched. Longer text is cut at the highest-quality breakpoint found
/// searching backward from the limit, falling back to a hard cut when no
/// acceptable separator exists. Chunks are trimmed; chunks that trim to
/// nothing are dropped.
pub fn segment(text: &str, max_chars: usize) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if trimmed.len() <= max_chars {
        return vec![trimmed.to_string()];
    }

    let mut chunks = Vec::new();
    let mut remaining = trimmed;

    while !remaining.is_empty() {
        if remaining.len() <= max_chars {
            push_trimmed(&mut chunks, remaining);
            break;
        }

        // Break point is always > 0 and <= max_chars, so the remainder
        // strictly shrinks and the loop terminates.
        let break_point = find_break_point(remaining, max_chars);
        let (chunk, rest) = remaining.split_at(break_point);
        push_trimmed(&mut chunks, chunk);
        remaining = rest.trim_start();
    }

    chunks
}

/// Locate the byte offset to cut `remaining` at, searching the rule list
/// top-to-bottom within the first `max_chars` bytes.
fn find_break_point(remaining: &str, max_chars: usize) -> usize {
    let window_end = floor_char_boundary(remaining, max_chars);
    let window = &remaining[..window_end];

    for rule in BREAK_RULES {
        let min_pos = (max_chars as f64 * rule.min_fraction).ceil() as usize;

        let mut best_end: Option<usize> = None;
        for pattern in rule.patterns {
            if let Some(start) = window.rfind(pattern) {
                let end = start + pattern.len();
                if best_end.map_or(true, |b| end > b) {
                    best_end = Some(end);
                }
            }
        }

        match best_end {
            Some(end) if end >= min_pos => return end,
            _ => {}
        }
    }

    // No acceptable separator: hard cut at the limit. A zero boundary can
    // only happen when max_chars is narrower than the first character;
    // take that character whole so the loop still advances.
    if window_end == 0 {
        remaining
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(remaining.len())
    } else {
        window_end
    }
}

fn push_trimmed(chunks: &mut Vec<String>, chunk: &str) {
    let trimmed = chunk.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

/// Largest byte index <= `index` that lands on a character boundary.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
