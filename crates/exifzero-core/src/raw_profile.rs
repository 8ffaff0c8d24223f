// crates/exifzero-core/src/raw_profile.rs

//! Legacy EXIF storage in PNG text chunks.
//!
//! Before `eXIf` existed, ImageMagick and exiftool wrote EXIF into a `tEXt` or
//! `zTXt` chunk with the keyword `Raw profile type exif`. The text looks like
//!
//! ```text
//! \nexif\n      60\n457869660000...\n
//! ```
//!
//! i.e. the profile name, the decoded length and the payload as hex.

use gufo_png::{Chunk, ChunkType, LEGACY_EXIF_KEYWORD};

use crate::{MetadataSegment, MetadataSource};

/// Returns the literal text field of a legacy EXIF chunk.
///
/// For `tEXt` this is everything after the keyword separator. For `zTXt` it
/// is the compressed stream after the compression method byte. The keyword
/// itself is never part of the segment so the chunk stays well-formed once
/// the segment is zeroed.
pub(crate) fn locate(chunk: &Chunk<'_>, inflate_limit: usize) -> Option<MetadataSegment> {
    let chunk_type = chunk.chunk_type();
    if !matches!(chunk_type, ChunkType::tEXt | ChunkType::zTXt) {
        return None;
    }

    let (keyword, text) = chunk.text().ok()?;
    if keyword != LEGACY_EXIF_KEYWORD {
        return None;
    }

    let segment = if chunk_type == ChunkType::zTXt {
        // Compression method 0 (zlib) is the only one defined
        let (&0, compressed) = text.split_first()? else {
            return None;
        };
        let (_, inflated) = chunk.ztxt(inflate_limit).ok()?;
        decode_profile(&inflated)?;
        compressed
    } else {
        decode_profile(text)?;
        text
    };

    Some(MetadataSegment::new(
        segment.to_vec(),
        MetadataSource::PngRawProfile {
            chunk_type: chunk_type.bytes(),
        },
    ))
}

/// Decodes the hex payload of a raw profile.
///
/// Returns `None` for anything that is not an EXIF profile, including text
/// that has already been zeroed.
pub(crate) fn decode_profile(text: &[u8]) -> Option<Vec<u8>> {
    let text = text.trim_ascii_start().strip_prefix(b"exif")?;
    let text = text.trim_ascii_start();

    // Decoded length
    let digits = text.iter().take_while(|x| x.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }

    let hex_digits: Vec<u8> = text[digits..]
        .iter()
        .filter(|c| !c.is_ascii_whitespace())
        .copied()
        .collect();

    let exif = hex::decode(hex_digits).ok()?;
    (!exif.is_empty()).then_some(exif)
}
