//! `Range` header parsing and resolution.
//!
//! Only the single-range `bytes=start-end` form is understood, either
//! bound optional. Anything else (other units, range lists, garbage) is
//! treated as if no header were sent - a malformed range never fails a
//! request.

/// A parsed `Range` header, bounds as requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestedRange {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

/// A range resolved against a concrete object size; both bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    pub start: u64,
    pub end: u64,
}

impl ResolvedRange {
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Parse a `Range` header value. `None` means malformed.
pub fn parse_range_header(header: &str) -> Option<RequestedRange> {
    let pattern = regex::Regex::new(r"^bytes=(\d*)-(\d*)$").unwrap();
    let captures = pattern.captures(header.trim())?;

    let start = match captures.get(1).map(|m| m.as_str()) {
        Some("") | None => None,
        Some(digits) => Some(digits.parse::<u64>().ok()?),
    };
    let end = match captures.get(2).map(|m| m.as_str()) {
        Some("") | None => None,
        Some(digits) => Some(digits.parse::<u64>().ok()?),
    };

    Some(RequestedRange { start, end })
}

/// Resolve a requested range against an object's total size: `start`
/// defaults to 0, `end` defaults to the last byte and is clamped to it.
///
/// `None` means the range cannot be served as a partial response (empty
/// object, or `start` beyond the last byte) - callers degrade to a full
/// response.
pub fn resolve(range: RequestedRange, total_size: u64) -> Option<ResolvedRange> {
    if total_size == 0 {
        return None;
    }

    let start = range.start.unwrap_or(0);
    let end = range.end.unwrap_or(total_size - 1).min(total_size - 1);

    if start > end {
        return None;
    }

    Some(ResolvedRange { start, end })
}
