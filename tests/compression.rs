// SPDX-FileCopyrightText: 2024-2025 Andrew Gunnerson
// SPDX-License-Identifier: GPL-3.0-only

use std::io::{Cursor, Read, Write};

use magiskboot::format::{
    compression::{self, CompressedReader, CompressedWriter},
    magic::Format,
};

fn compress(data: &[u8], format: Format) -> Vec<u8> {
    let raw_writer = Cursor::new(Vec::new());
    let mut writer = CompressedWriter::new(raw_writer, format).unwrap();
    writer.write_all(data).unwrap();

    writer.finish().unwrap().into_inner()
}

fn round_trip(data: &[u8], format: Format) {
    let compressed = compress(data, format);

    let mut reader = CompressedReader::with_format(Cursor::new(&compressed), format).unwrap();
    let mut new_data = vec![];
    reader.read_to_end(&mut new_data).unwrap();

    assert_eq!(data, new_data);
}

#[test]
fn round_trip_gzip() {
    round_trip(b"gzip-compressed data", Format::Gzip);
}

#[test]
fn round_trip_xz() {
    round_trip(b"xz-compressed data", Format::Xz);
}

#[test]
fn round_trip_lzma() {
    round_trip(b"lzma-alone-compressed data", Format::Lzma);
}

#[test]
fn round_trip_bzip2() {
    round_trip(b"bzip2-compressed data", Format::Bzip2);
}

#[test]
fn round_trip_lz4() {
    round_trip(b"lz4-frame-compressed data", Format::Lz4);
}

#[test]
fn round_trip_lz4_legacy() {
    // Make sure we exceed the 8MiB block boundary.
    let data = b"Lz4Legacy".repeat(1024 * 1024);
    round_trip(&data, Format::Lz4Legacy);
}

#[test]
fn round_trip_lz4_lg() {
    let data = b"Lz4Lg".repeat(1024 * 1024);
    round_trip(&data, Format::Lz4Lg);
}

#[test]
fn compressed_output_detects_as_input_format() {
    let data = b"format detection probe";

    for format in [
        Format::Gzip,
        Format::Xz,
        Format::Lzma,
        Format::Bzip2,
        Format::Lz4,
        Format::Lz4Legacy,
    ] {
        let compressed = compress(data, format);
        assert_eq!(Format::from_magic(&compressed), format, "{format:?}");
    }

    // The LG variant shares the legacy magic; only the block walk can
    // tell them apart.
    let compressed = compress(data, Format::Lz4Lg);
    assert_eq!(Format::from_magic(&compressed), Format::Lz4Legacy);
    assert_eq!(compression::check_fmt_lg(&compressed), Format::Lz4Lg);
}

#[test]
fn xz_buffer_helpers() {
    let data = b"standalone xz stream".repeat(100);

    let compressed = compression::xz_compress(&data).unwrap();
    assert_eq!(Format::from_magic(&compressed), Format::Xz);

    let decompressed = compression::xz_decompress(&compressed).unwrap();
    assert_eq!(decompressed, data);

    // Non-xz input is rejected outright.
    assert!(compression::xz_decompress(b"not xz data").is_err());
}

#[test]
fn decompress_to_writer_sniffs_format() {
    let data = b"writer-targeted payload";

    for format in [Format::Gzip, Format::Xz, Format::Bzip2] {
        let compressed = compress(data, format);

        let mut writer = Cursor::new(Vec::new());
        compression::decompress_to_writer(&compressed, &mut writer).unwrap();
        assert_eq!(writer.into_inner(), data, "{format:?}");
    }

    let mut writer = Cursor::new(Vec::new());
    assert!(compression::decompress_to_writer(b"raw data", &mut writer).is_err());
}
