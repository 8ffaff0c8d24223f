// File: crates/exifzero-core/src/png.rs

use crate::chunk::{self, ChunkDescriptor};
use crate::{
    Format, MetadataSegment, MetadataSource, ScrubError, ScrubOptions, Scrubber, raw_profile,
};
use gufo_png::{ChunkType, Png};
use std::io::Cursor;

/// Chunk type of the standard Exif chunk.
pub const EXIF_CHUNK_TYPE: [u8; 4] = *b"eXIf";

/// A Scrubber implementation for PNG files.
///
/// Zeroing a payload invalidates the CRC of the chunk holding it, so
/// validation first rewrites stale CRCs and then checks all of them again.
///
/// Locating does not check CRCs, so a chunk that already carried a stale CRC
/// in the input is repaired along with the scrubbed one.
///
/// The repair assumes that only chunk data changed. If a located payload
/// happened to first occur across a length or type field, the chunk layout
/// itself is altered and the result is rejected by the checks, not fixed.
#[derive(Debug, Clone, Default)]
pub struct PngScrubber {
    options: ScrubOptions,
}

impl PngScrubber {
    pub fn new(options: ScrubOptions) -> Self {
        Self { options }
    }

    /// Rewrites the CRC of every chunk whose stored value no longer matches.
    ///
    /// Returns the number of chunks that were fixed.
    pub fn repair_crcs(data: &mut [u8]) -> Result<usize, ScrubError> {
        let stale: Vec<ChunkDescriptor> = walk(data)?
            .into_iter()
            .filter(|chunk| !chunk.crc_is_valid())
            .collect();

        for chunk in &stale {
            let offset = chunk.crc_offset();
            tracing::trace!(
                chunk_type = %chunk.type_name(),
                offset,
                crc = chunk.computed_crc,
                "rewriting chunk CRC"
            );
            data[offset..offset + 4].copy_from_slice(&chunk.computed_crc.to_be_bytes());
        }

        Ok(stale.len())
    }

    /// Fails on the first chunk whose CRC does not validate.
    pub fn verify_crcs(data: &[u8]) -> Result<(), ScrubError> {
        match walk(data)?.into_iter().find(|chunk| !chunk.crc_is_valid()) {
            Some(chunk) => Err(ScrubError::CrcRepairFailed {
                chunk_type: chunk.type_name(),
                offset: chunk.offset,
            }),
            None => Ok(()),
        }
    }

    /// Decodes the full image once, discarding the pixels.
    fn decode(data: &[u8]) -> Result<(), ScrubError> {
        let corrupted = |e: ::png::DecodingError| ScrubError::Corrupted {
            format: Format::Png,
            reason: e.to_string(),
        };

        let decoder = ::png::Decoder::new(Cursor::new(data));
        let mut reader = decoder.read_info().map_err(corrupted)?;
        let mut img_data = vec![0; reader.output_buffer_size()];
        reader.next_frame(&mut img_data).map_err(corrupted)?;

        Ok(())
    }
}

/// Chunk walk over a buffer that has already been parsed once, so structural
/// failures here mean the scrub damaged it.
fn walk(data: &[u8]) -> Result<Vec<ChunkDescriptor>, ScrubError> {
    chunk::iterate(data).map_err(|e| ScrubError::Corrupted {
        format: Format::Png,
        reason: e.to_string(),
    })
}

impl Scrubber for PngScrubber {
    fn format(&self) -> Format {
        Format::Png
    }

    /// Returns the data of the `eXIf` chunk, or the text of a legacy raw
    /// profile chunk if there is no `eXIf` and legacy profiles are enabled.
    ///
    /// An `eXIf` chunk that is empty or all zeros has already been scrubbed
    /// and does not count.
    fn locate(&self, data: &[u8]) -> Result<Option<MetadataSegment>, ScrubError> {
        let container_parse = |reason: String| ScrubError::ContainerParse {
            format: Format::Png,
            reason,
        };

        let png = Png::new(data.to_vec()).map_err(|e| container_parse(e.to_string()))?;
        let chunks = png.chunks();

        if chunks.first().map(|chunk| chunk.chunk_type()) != Some(ChunkType::IHDR) {
            return Err(container_parse("first chunk is not IHDR".to_string()));
        }

        let exif = chunks
            .iter()
            .filter(|chunk| chunk.chunk_type() == ChunkType::eXIf)
            .map(|chunk| chunk.chunk_data())
            .find(|contents| contents.iter().any(|b| *b != 0));

        if let Some(contents) = exif {
            return Ok(Some(MetadataSegment::new(
                contents.to_vec(),
                MetadataSource::PngExif,
            )));
        }

        if !self.options.legacy_png_profiles {
            return Ok(None);
        }

        let profile = chunks
            .iter()
            .find_map(|chunk| raw_profile::locate(chunk, self.options.inflate_limit));
        Ok(profile)
    }

    fn repair_and_validate(&self, data: &mut [u8]) -> Result<(), ScrubError> {
        let repaired = Self::repair_crcs(data)?;
        tracing::debug!(repaired, "repaired PNG chunk CRCs");

        Self::verify_crcs(data)?;
        Self::decode(data)
    }
}
