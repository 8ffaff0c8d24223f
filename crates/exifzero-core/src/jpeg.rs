// crates/exifzero-core/src/jpeg.rs

use crate::{Format, MetadataSegment, MetadataSource, ScrubError, Scrubber};
use image::ImageFormat;
use img_parts::Bytes;
use img_parts::jpeg::Jpeg;

/// Marker of the application segment used for Exif and XMP.
pub const APP1: u8 = 0xE1;

/// Exif identifier code at the start of an `APP1` segment.
pub const EXIF_IDENTIFIER: &[u8] = b"Exif\0\0";

/// A Scrubber implementation for JPEG files.
///
/// JPEG has no checksums, so repairing is a no-op and validation is a single
/// decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegScrubber;

impl Scrubber for JpegScrubber {
    fn format(&self) -> Format {
        Format::Jpeg
    }

    /// Returns the contents of the first Exif `APP1` segment, identifier
    /// included.
    ///
    /// Zeroing the identifier as well means a scrubbed file no longer looks
    /// like it carries Exif at all.
    fn locate(&self, data: &[u8]) -> Result<Option<MetadataSegment>, ScrubError> {
        let jpeg = Jpeg::from_bytes(Bytes::copy_from_slice(data)).map_err(|e| {
            ScrubError::ContainerParse {
                format: Format::Jpeg,
                reason: e.to_string(),
            }
        })?;

        let exif = jpeg
            .segments()
            .iter()
            .find(|segment| {
                segment.marker() == APP1 && segment.contents().starts_with(EXIF_IDENTIFIER)
            })
            .map(|segment| {
                MetadataSegment::new(segment.contents().to_vec(), MetadataSource::JpegApp1)
            });

        Ok(exif)
    }

    fn repair_and_validate(&self, data: &mut [u8]) -> Result<(), ScrubError> {
        image::load_from_memory_with_format(data, ImageFormat::Jpeg)
            .map(drop)
            .map_err(|e| ScrubError::Corrupted {
                format: Format::Jpeg,
                reason: e.to_string(),
            })
    }
}
