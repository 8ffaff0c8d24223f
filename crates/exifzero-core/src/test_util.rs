// crates/exifzero-core/src/test_util.rs

//! Image fixtures for unit tests.
//!
//! Base images come from real encoders so the post-scrub decode checks run
//! against data a decoder actually accepts. Metadata is spliced in afterwards.

use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;

pub(crate) const WIDTH: u32 = 4;
pub(crate) const HEIGHT: u32 = 4;

fn pixels() -> Vec<u8> {
    (0..WIDTH * HEIGHT * 3).map(|i| (i * 17 % 251) as u8).collect()
}

/// Big-endian TIFF structure with `Make` and `Model` entries.
pub(crate) fn tiff_payload() -> Vec<u8> {
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\x00\x2a");
    tiff.extend_from_slice(&8u32.to_be_bytes());
    // IFD0 with two entries
    tiff.extend_from_slice(&2u16.to_be_bytes());
    // Make, ASCII, 10 bytes at offset 38
    tiff.extend_from_slice(&[0x01, 0x0f, 0x00, 0x02]);
    tiff.extend_from_slice(&10u32.to_be_bytes());
    tiff.extend_from_slice(&38u32.to_be_bytes());
    // Model, ASCII, 12 bytes at offset 48
    tiff.extend_from_slice(&[0x01, 0x10, 0x00, 0x02]);
    tiff.extend_from_slice(&12u32.to_be_bytes());
    tiff.extend_from_slice(&48u32.to_be_bytes());
    // No next IFD
    tiff.extend_from_slice(&0u32.to_be_bytes());
    tiff.extend_from_slice(b"Test Make\0");
    tiff.extend_from_slice(b"Test Camera\0");
    tiff
}

/// Contents of an `APP1` Exif segment: identifier followed by TIFF data.
pub(crate) fn app1_payload() -> Vec<u8> {
    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff_payload());
    payload
}

pub(crate) fn plain_jpeg() -> Vec<u8> {
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, 90)
        .encode(&pixels(), WIDTH, HEIGHT, ExtendedColorType::Rgb8)
        .unwrap();
    jpeg
}

/// Inserts an `APP1` segment right after SOI.
pub(crate) fn jpeg_with_app1(contents: &[u8]) -> Vec<u8> {
    let plain = plain_jpeg();
    let len = u16::try_from(contents.len() + 2).unwrap();

    let mut jpeg = plain[..2].to_vec();
    jpeg.extend_from_slice(&[0xff, 0xe1]);
    jpeg.extend_from_slice(&len.to_be_bytes());
    jpeg.extend_from_slice(contents);
    jpeg.extend_from_slice(&plain[2..]);
    jpeg
}

pub(crate) fn jpeg_with_exif() -> Vec<u8> {
    jpeg_with_app1(&app1_payload())
}

pub(crate) fn plain_png() -> Vec<u8> {
    let mut data = Vec::new();
    let mut encoder = ::png::Encoder::new(&mut data, WIDTH, HEIGHT);
    encoder.set_color(::png::ColorType::Rgb);
    encoder.set_depth(::png::BitDepth::Eight);
    let mut writer = encoder.write_header().unwrap();
    writer.write_image_data(&pixels()).unwrap();
    writer.finish().unwrap();
    data
}

/// A complete chunk with a correct CRC.
pub(crate) fn png_chunk(chunk_type: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut chunk = u32::try_from(data.len()).unwrap().to_be_bytes().to_vec();
    chunk.extend_from_slice(chunk_type);
    chunk.extend_from_slice(data);
    chunk.extend_from_slice(&crate::chunk::compute_crc(chunk_type, data).to_be_bytes());
    chunk
}

/// Inserts `chunk` between `IHDR` and the first `IDAT`.
pub(crate) fn png_with_chunk(chunk: &[u8]) -> Vec<u8> {
    // Signature (8) + IHDR (4 + 4 + 13 + 4)
    const IHDR_END: usize = 33;

    let plain = plain_png();
    let mut png = plain[..IHDR_END].to_vec();
    png.extend_from_slice(chunk);
    png.extend_from_slice(&plain[IHDR_END..]);
    png
}

pub(crate) fn png_with_exif() -> Vec<u8> {
    png_with_chunk(&png_chunk(b"eXIf", &tiff_payload()))
}

/// ImageMagick style `Raw profile type exif` text.
pub(crate) fn raw_profile_text(exif: &[u8]) -> Vec<u8> {
    let encoded = hex::encode(exif);
    let mut text = format!("\nexif\n{:8}\n", exif.len());
    for line in encoded.as_bytes().chunks(72) {
        text.push_str(std::str::from_utf8(line).unwrap());
        text.push('\n');
    }
    text.into_bytes()
}

pub(crate) fn text_profile_chunk_data() -> Vec<u8> {
    let mut data = b"Raw profile type exif\0".to_vec();
    data.extend_from_slice(&raw_profile_text(&app1_payload()));
    data
}

pub(crate) fn png_with_text_profile() -> Vec<u8> {
    png_with_chunk(&png_chunk(b"tEXt", &text_profile_chunk_data()))
}

pub(crate) fn ztxt_profile_chunk_data() -> Vec<u8> {
    let mut data = b"Raw profile type exif\0\0".to_vec();
    data.extend_from_slice(&miniz_oxide::deflate::compress_to_vec_zlib(
        &raw_profile_text(&app1_payload()),
        6,
    ));
    data
}
