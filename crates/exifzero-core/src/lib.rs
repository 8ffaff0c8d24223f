// crates/exifzero-core/src/lib.rs

//! Zero out EXIF metadata in JPEG and PNG images without re-encoding them.
//!
//! The payload is blanked in place, so the output always has the same length
//! as the input. PNG chunk checksums are repaired afterwards and the result is
//! decoded once to make sure it is still a valid image.
//!
//! ```no_run
//! let original = std::fs::read("photo.jpg").unwrap();
//! match exifzero_core::remove_metadata(&original) {
//!     Ok(cleaned) => assert_eq!(cleaned.len(), original.len()),
//!     Err(exifzero_core::ScrubError::NoMetadata) => println!("nothing to remove"),
//!     Err(err) => eprintln!("{err}"),
//! }
//! ```

pub mod chunk;
pub mod jpeg;
pub mod png;
mod raw_profile;
pub mod scrub;
#[cfg(test)]
mod test_util;

use std::fmt;

use crate::jpeg::JpegScrubber;
use crate::png::PngScrubber;
use thiserror::Error;

/// Default cap for inflating compressed `zTXt` profiles.
pub const DEFAULT_INFLATE_LIMIT: usize = 8 * 1024 * 1024;

/// A universal error type for all scrubbing operations.
#[derive(Error, Debug)]
pub enum ScrubError {
    /// The image is valid but carries no EXIF payload.
    #[error("No EXIF metadata found")]
    NoMetadata,

    #[error("Unsupported file type: expected JPEG or PNG")]
    UnsupportedFormat,

    #[error("Failed to parse {format} container: {reason}")]
    ContainerParse { format: Format, reason: String },

    /// The located payload is not present verbatim in the buffer it was
    /// parsed from.
    #[error("Located {len} bytes of metadata could not be found in the image")]
    SegmentNotFound { len: usize },

    #[error("PNG chunk {chunk_type} at offset {offset} still has an invalid CRC after repair")]
    CrcRepairFailed { chunk_type: String, offset: usize },

    #[error("Metadata removal corrupted the {format} image: {reason}")]
    Corrupted { format: Format, reason: String },
}

impl ScrubError {
    /// Returns true for errors that point at a broken parser contract rather
    /// than at bad input.
    pub fn is_bug(&self) -> bool {
        matches!(self, Self::SegmentNotFound { .. })
    }
}

/// Image container format, decided by content sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Jpeg,
    Png,
    Unsupported,
}

impl Format {
    /// Classifies `bytes` by their magic bytes.
    ///
    /// Only the content is looked at, never a file name or declared type.
    pub fn detect(bytes: &[u8]) -> Self {
        match infer::get(bytes).map(|kind| kind.mime_type()) {
            Some("image/jpeg") => Self::Jpeg,
            Some("image/png" | "image/apng") => Self::Png,
            _ => Self::Unsupported,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Unsupported => "unsupported",
        })
    }
}

/// Where a located payload lives inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataSource {
    /// `APP1` segment starting with `Exif\0\0`.
    JpegApp1,
    /// PNG `eXIf` chunk.
    PngExif,
    /// Hex-encoded `Raw profile type exif` in a `tEXt` or `zTXt` chunk.
    PngRawProfile { chunk_type: [u8; 4] },
}

impl fmt::Display for MetadataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JpegApp1 => f.write_str("APP1 Exif segment"),
            Self::PngExif => f.write_str("eXIf chunk"),
            Self::PngRawProfile { chunk_type } => write!(
                f,
                "{} raw profile",
                String::from_utf8_lossy(chunk_type)
            ),
        }
    }
}

/// The literal EXIF bytes found inside an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataSegment {
    bytes: Vec<u8>,
    source: MetadataSource,
}

impl MetadataSegment {
    pub fn new(bytes: Vec<u8>, source: MetadataSource) -> Self {
        Self { bytes, source }
    }

    /// The payload exactly as it appears in the file.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn source(&self) -> MetadataSource {
        self.source
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Knobs for locating metadata.
#[derive(Debug, Clone)]
pub struct ScrubOptions {
    /// Fall back to `Raw profile type exif` text chunks when a PNG has no
    /// `eXIf` chunk (default: true)
    pub legacy_png_profiles: bool,
    /// Maximum inflated size of a compressed `zTXt` profile (default: 8 MiB)
    pub inflate_limit: usize,
}

impl Default for ScrubOptions {
    fn default() -> Self {
        Self {
            legacy_png_profiles: true,
            inflate_limit: DEFAULT_INFLATE_LIMIT,
        }
    }
}

impl ScrubOptions {
    pub fn with_legacy_png_profiles(mut self, enabled: bool) -> Self {
        self.legacy_png_profiles = enabled;
        self
    }

    pub fn with_inflate_limit(mut self, limit: usize) -> Self {
        self.inflate_limit = limit;
        self
    }
}

/// The contract every supported format implements.
/// Selected once per call by [`scrubber_for`].
pub trait Scrubber {
    /// The format this scrubber handles.
    fn format(&self) -> Format;

    /// Finds the literal EXIF bytes in `data`.
    ///
    /// Returns `Ok(None)` when the container is valid but carries no EXIF.
    fn locate(&self, data: &[u8]) -> Result<Option<MetadataSegment>, ScrubError>;

    /// Restores format checksums broken by scrubbing and confirms that `data`
    /// still decodes.
    fn repair_and_validate(&self, data: &mut [u8]) -> Result<(), ScrubError>;
}

/// Returns the scrubber for a detected format.
pub fn scrubber_for(
    format: Format,
    options: &ScrubOptions,
) -> Result<Box<dyn Scrubber>, ScrubError> {
    match format {
        Format::Jpeg => Ok(Box::new(JpegScrubber)),
        Format::Png => Ok(Box::new(PngScrubber::new(options.clone()))),
        Format::Unsupported => Err(ScrubError::UnsupportedFormat),
    }
}

/// Finds the EXIF payload without modifying anything.
pub fn locate_metadata(
    input: &[u8],
    options: &ScrubOptions,
) -> Result<MetadataSegment, ScrubError> {
    let scrubber = scrubber_for(Format::detect(input), options)?;
    scrubber.locate(input)?.ok_or(ScrubError::NoMetadata)
}

/// Removes EXIF metadata with the default [`ScrubOptions`].
pub fn remove_metadata(input: &[u8]) -> Result<Vec<u8>, ScrubError> {
    remove_metadata_with(input, &ScrubOptions::default())
}

/// Removes EXIF metadata from `input` and returns a cleaned copy.
///
/// The returned buffer has the same length and format as `input`. An image
/// without EXIF yields [`ScrubError::NoMetadata`] instead of an unmodified
/// copy.
pub fn remove_metadata_with(
    input: &[u8],
    options: &ScrubOptions,
) -> Result<Vec<u8>, ScrubError> {
    let format = Format::detect(input);
    let scrubber = scrubber_for(format, options)?;

    let segment = scrubber.locate(input)?.ok_or(ScrubError::NoMetadata)?;
    tracing::debug!(%format, source = %segment.source(), len = segment.len(), "located EXIF payload");

    let mut buffer = input.to_vec();
    let span = scrub::zero_first(&mut buffer, segment.bytes())?;
    tracing::debug!(start = span.start, end = span.end, "zeroed EXIF payload");

    scrubber.repair_and_validate(&mut buffer)?;

    debug_assert_eq!(buffer.len(), input.len());
    Ok(buffer)
}
