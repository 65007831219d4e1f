// SPDX-FileCopyrightText: 2024-2025 Andrew Gunnerson
// SPDX-License-Identifier: GPL-3.0-only

//! Registry of every file format this tool can encounter inside a boot
//! image, keyed by magic bytes. The variant order is meaningful: the
//! compression predicates below are defined as ranges over it.

use std::fmt;

pub const BOOT_MAGIC: &[u8; 8] = b"ANDROID!";
pub const VENDOR_BOOT_MAGIC: &[u8; 8] = b"VNDRBOOT";
pub const CHROMEOS_MAGIC: &[u8; 8] = b"CHROMEOS";
pub const GZIP1_MAGIC: &[u8; 2] = b"\x1f\x8b";
pub const GZIP2_MAGIC: &[u8; 2] = b"\x1f\x9e";
pub const LZOP_MAGIC: &[u8; 4] = b"\x89LZO";
pub const XZ_MAGIC: &[u8; 5] = b"\xfd7zXZ";
pub const BZIP_MAGIC: &[u8; 3] = b"BZh";
pub const LZ4_LEG_MAGIC: &[u8; 4] = b"\x02\x21\x4c\x18";
pub const LZ41_MAGIC: &[u8; 4] = b"\x03\x21\x4c\x18";
pub const LZ42_MAGIC: &[u8; 4] = b"\x04\x22\x4d\x18";
pub const MTK_MAGIC: &[u8; 4] = b"\x88\x16\x88\x58";
pub const DTB_MAGIC: &[u8; 4] = b"\xd0\x0d\xfe\xed";
pub const DHTB_MAGIC: &[u8; 8] = b"DHTB\x01\x00\x00\x00";
pub const TEGRABLOB_MAGIC: &[u8; 20] = b"-SIGNED-BY-SIGNBLOB-";
pub const ZIMAGE_MAGIC: &[u8; 4] = b"\x18\x28\x6f\x01";

/// Offset of the zImage magic within an ARM zImage header.
const ZIMAGE_MAGIC_OFFSET: usize = 0x24;

/// The longest prefix [`Format::from_magic`] ever inspects.
pub const MAGIC_BUF_SIZE: usize = ZIMAGE_MAGIC_OFFSET + ZIMAGE_MAGIC.len();

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Format {
    Unknown,
    // Boot image formats.
    ChromeOs,
    Aosp,
    AospVendor,
    Dhtb,
    Blob,
    // Compression formats.
    Gzip,
    Zopfli,
    Xz,
    Lzma,
    Bzip2,
    Lz4,
    Lz4Legacy,
    Lz4Lg,
    // Recognized, but unsupported compression.
    Lzop,
    // Misc.
    Mtk,
    Dtb,
    ZImage,
}

/// Prefix comparison that never reads past the end of the buffer.
fn matches_magic(buf: &[u8], magic: &[u8]) -> bool {
    buf.len() >= magic.len() && &buf[..magic.len()] == magic
}

impl Format {
    /// Detect the format from a file prefix. The buffer should contain the
    /// first [`MAGIC_BUF_SIZE`] bytes of the file, but shorter prefixes are
    /// allowed; checks that would read out of bounds simply don't match.
    /// Detection order is fixed and the first match wins.
    pub fn from_magic(buf: &[u8]) -> Self {
        if matches_magic(buf, CHROMEOS_MAGIC) {
            Self::ChromeOs
        } else if matches_magic(buf, BOOT_MAGIC) {
            Self::Aosp
        } else if matches_magic(buf, VENDOR_BOOT_MAGIC) {
            Self::AospVendor
        } else if matches_magic(buf, GZIP1_MAGIC) || matches_magic(buf, GZIP2_MAGIC) {
            Self::Gzip
        } else if matches_magic(buf, LZOP_MAGIC) {
            Self::Lzop
        } else if matches_magic(buf, XZ_MAGIC) {
            Self::Xz
        } else if matches_magic(buf, b"\x5d\x00\x00")
            && buf.len() >= 13
            && (buf[12] == 0xff || buf[12] == 0x00)
        {
            Self::Lzma
        } else if matches_magic(buf, BZIP_MAGIC) {
            Self::Bzip2
        } else if matches_magic(buf, LZ41_MAGIC) || matches_magic(buf, LZ42_MAGIC) {
            Self::Lz4
        } else if matches_magic(buf, LZ4_LEG_MAGIC) {
            Self::Lz4Legacy
        } else if matches_magic(buf, MTK_MAGIC) {
            Self::Mtk
        } else if matches_magic(buf, DTB_MAGIC) {
            Self::Dtb
        } else if matches_magic(buf, DHTB_MAGIC) {
            Self::Dhtb
        } else if matches_magic(buf, TEGRABLOB_MAGIC) {
            Self::Blob
        } else if buf.len() >= MAGIC_BUF_SIZE
            && matches_magic(&buf[ZIMAGE_MAGIC_OFFSET..], ZIMAGE_MAGIC)
        {
            Self::ZImage
        } else {
            Self::Unknown
        }
    }

    /// Look up a compression format by the name used on the command line.
    pub fn from_name(name: &str) -> Self {
        match name {
            "gzip" => Self::Gzip,
            "zopfli" => Self::Zopfli,
            "xz" => Self::Xz,
            "lzma" => Self::Lzma,
            "bzip2" => Self::Bzip2,
            "lz4" => Self::Lz4,
            "lz4_legacy" => Self::Lz4Legacy,
            "lz4_lg" => Self::Lz4Lg,
            _ => Self::Unknown,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Zopfli => "zopfli",
            Self::Lzop => "lzop",
            Self::Xz => "xz",
            Self::Lzma => "lzma",
            Self::Bzip2 => "bzip2",
            Self::Lz4 => "lz4",
            Self::Lz4Legacy => "lz4_legacy",
            Self::Lz4Lg => "lz4_lg",
            Self::Dtb => "dtb",
            Self::ZImage => "zimage",
            _ => "raw",
        }
    }

    /// The file extension appended (or stripped) when a file is compressed
    /// (or decompressed) with this format. Empty for non-compression
    /// formats.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Gzip | Self::Zopfli => ".gz",
            Self::Lzop => ".lzo",
            Self::Xz => ".xz",
            Self::Lzma => ".lzma",
            Self::Bzip2 => ".bz2",
            Self::Lz4 | Self::Lz4Legacy | Self::Lz4Lg => ".lz4",
            _ => "",
        }
    }

    /// Whether this is a compression format with a usable codec.
    pub fn is_compressed(self) -> bool {
        self >= Self::Gzip && self < Self::Lzop
    }

    /// Whether this is any compression format, including ones that can only
    /// be recognized.
    pub fn is_compressed_any(self) -> bool {
        self >= Self::Gzip && self <= Self::Lzop
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::Format;

    #[test]
    fn detect_compression_magic() {
        assert_eq!(
            Format::from_magic(b"\x1f\x8b\x00\x00\xff\xff\xff\xff"),
            Format::Gzip,
        );
        assert_eq!(Format::from_magic(b"\x1f\x9e\x08\x00"), Format::Gzip);
        assert_eq!(Format::from_magic(b"\xfd7zXZ\x00\x00"), Format::Xz);
        assert_eq!(Format::from_magic(b"BZh91AY&SY"), Format::Bzip2);
        assert_eq!(Format::from_magic(b"\x04\x22\x4d\x18\x40"), Format::Lz4);
        assert_eq!(Format::from_magic(b"\x03\x21\x4c\x18\x40"), Format::Lz4);
        assert_eq!(
            Format::from_magic(b"\x02\x21\x4c\x18\x00\x00\x10\x00"),
            Format::Lz4Legacy,
        );
        assert_eq!(Format::from_magic(b"\x89LZO\x00\x0d"), Format::Lzop);

        let mut lzma = vec![0x5d, 0x00, 0x00];
        lzma.resize(13, 0x11);
        assert_eq!(Format::from_magic(&lzma), Format::Unknown);
        lzma[12] = 0x00;
        assert_eq!(Format::from_magic(&lzma), Format::Lzma);
        lzma[12] = 0xff;
        assert_eq!(Format::from_magic(&lzma), Format::Lzma);
        // Too short to check the properties byte.
        assert_eq!(Format::from_magic(&lzma[..12]), Format::Unknown);
    }

    #[test]
    fn detect_boot_magic() {
        assert_eq!(Format::from_magic(b"ANDROID!\x00\x10"), Format::Aosp);
        assert_eq!(Format::from_magic(b"VNDRBOOT\x04"), Format::AospVendor);
        assert_eq!(Format::from_magic(b"CHROMEOS\x00"), Format::ChromeOs);
        assert_eq!(
            Format::from_magic(b"DHTB\x01\x00\x00\x00\xaa"),
            Format::Dhtb,
        );
        assert_eq!(
            Format::from_magic(b"-SIGNED-BY-SIGNBLOB-\x00"),
            Format::Blob,
        );
        assert_eq!(Format::from_magic(b"\x88\x16\x88\x58\x00"), Format::Mtk);
        assert_eq!(Format::from_magic(b"\xd0\x0d\xfe\xed\x00"), Format::Dtb);

        let mut zimage = vec![0u8; 0x28];
        zimage[0x24..].copy_from_slice(b"\x18\x28\x6f\x01");
        assert_eq!(Format::from_magic(&zimage), Format::ZImage);
        assert_eq!(Format::from_magic(&zimage[..0x27]), Format::Unknown);

        assert_eq!(Format::from_magic(b"junk data"), Format::Unknown);
        assert_eq!(Format::from_magic(b""), Format::Unknown);
    }

    #[test]
    fn names_and_extensions() {
        assert_eq!(Format::Lz4.name(), "lz4");
        assert_eq!(Format::from_name("lz4"), Format::Lz4);
        assert_eq!(Format::from_name("lz4_legacy"), Format::Lz4Legacy);
        assert_eq!(Format::from_name("nonsense"), Format::Unknown);

        assert_eq!(Format::Gzip.extension(), ".gz");
        assert_eq!(Format::Zopfli.extension(), ".gz");
        assert_eq!(Format::Lz4Lg.extension(), ".lz4");
        assert_eq!(Format::Aosp.extension(), "");
    }

    #[test]
    fn compression_predicates() {
        for format in [
            Format::Gzip,
            Format::Zopfli,
            Format::Xz,
            Format::Lzma,
            Format::Bzip2,
            Format::Lz4,
            Format::Lz4Legacy,
            Format::Lz4Lg,
        ] {
            assert!(format.is_compressed(), "{format:?}");
            assert!(format.is_compressed_any(), "{format:?}");
        }

        assert!(!Format::Lzop.is_compressed());
        assert!(Format::Lzop.is_compressed_any());

        for format in [Format::Unknown, Format::Aosp, Format::Mtk, Format::Dtb] {
            assert!(!format.is_compressed(), "{format:?}");
            assert!(!format.is_compressed_any(), "{format:?}");
        }
    }
}
