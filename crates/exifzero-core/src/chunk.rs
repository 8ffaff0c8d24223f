// crates/exifzero-core/src/chunk.rs

//! Chunk offsets and CRC state of a PNG buffer.
//!
//! The walk itself is done by [`gufo_png::Png`]. Chunks are contiguous after
//! the signature, so the offset of each one follows from the lengths before
//! it, which is what the checksum repair needs to write a fixed CRC back in
//! place.

use std::ops::Range;

use gufo_common::error::ErrorWithData;
use gufo_png::Png;

pub use gufo_png::MAGIC_BYTES;

/// Walk failure, carrying the copy of the buffer handed to the parser.
pub type ChunkError = ErrorWithData<gufo_png::Error>;

/// Length, type and CRC fields around the chunk data
const FRAMING_LEN: usize = 12;

/// One chunk as found in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkDescriptor {
    /// Offset of the length field
    pub offset: usize,
    /// Declared data length
    pub length: usize,
    pub chunk_type: [u8; 4],
    /// CRC stored after the data
    pub stored_crc: u32,
    /// CRC of the current type and data bytes
    pub computed_crc: u32,
}

impl ChunkDescriptor {
    pub fn crc_is_valid(&self) -> bool {
        self.stored_crc == self.computed_crc
    }

    pub fn data_range(&self) -> Range<usize> {
        let start = self.offset + 8;
        start..start + self.length
    }

    /// Offset of the 4 CRC bytes, `offset + 8 + length`
    pub fn crc_offset(&self) -> usize {
        self.data_range().end
    }

    pub fn type_name(&self) -> String {
        String::from_utf8_lossy(&self.chunk_type).into_owned()
    }
}

/// CRC-32 over chunk type and data, as stored in a PNG chunk trailer.
pub fn compute_crc(chunk_type: &[u8; 4], data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    hasher.finalize()
}

/// Lists all chunks up to and including `IEND`.
///
/// Data after `IEND` is ignored. A buffer that ends before `IEND` is an
/// error.
pub fn iterate(data: &[u8]) -> Result<Vec<ChunkDescriptor>, ChunkError> {
    let png = Png::new(data.to_vec())?;

    let mut offset = MAGIC_BYTES.len();
    let mut chunks = Vec::new();

    for chunk in png.chunks() {
        let chunk_type = chunk.chunk_type().bytes();
        let chunk_data = chunk.chunk_data();
        let stored_crc = chunk
            .crc()
            .iter()
            .fold(0, |crc, byte| crc << 8 | u32::from(*byte));

        chunks.push(ChunkDescriptor {
            offset,
            length: chunk_data.len(),
            chunk_type,
            stored_crc,
            computed_crc: compute_crc(&chunk_type, chunk_data),
        });

        offset += FRAMING_LEN + chunk_data.len();
    }

    Ok(chunks)
}
