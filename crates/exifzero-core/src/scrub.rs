// crates/exifzero-core/src/scrub.rs

//! Overwrites a located payload with zeros.

use std::ops::Range;

use crate::ScrubError;

/// Returns the span of the first occurrence of `needle` in `haystack`.
///
/// An empty needle never matches.
pub fn find_first(haystack: &[u8], needle: &[u8]) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }

    haystack
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|start| start..start + needle.len())
}

/// Zeros the first occurrence of `needle` in `buffer` and returns its span.
///
/// Later occurrences are left alone. A needle that cannot be found is
/// reported as [`ScrubError::SegmentNotFound`], never silently skipped.
pub fn zero_first(buffer: &mut [u8], needle: &[u8]) -> Result<Range<usize>, ScrubError> {
    let span = find_first(buffer, needle).ok_or(ScrubError::SegmentNotFound {
        len: needle.len(),
    })?;

    buffer[span.clone()].fill(0);

    Ok(span)
}
