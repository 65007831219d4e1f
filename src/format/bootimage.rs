// SPDX-FileCopyrightText: 2024-2025 Andrew Gunnerson
// SPDX-License-Identifier: GPL-3.0-only

//! Data model for Android boot image headers. Every on-disk layout is a
//! fixed-size zerocopy struct; [`BootHeader`] wraps them in a tagged
//! variant exposing the capability set shared by all versions. Wrapper
//! images (MTK, DHTB, Tegra blob, zImage) and tail signatures are covered
//! by their own structs and by [`BootFlags`].

use std::{fmt, io, mem};

use bitflags::bitflags;
use thiserror::Error;
use zerocopy::{big_endian, little_endian, FromBytes};
use zerocopy_derive::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::format::magic::{BOOT_MAGIC, VENDOR_BOOT_MAGIC};

pub const BOOT_NAME_SIZE: usize = 16;
pub const BOOT_ID_SIZE: usize = 32;
pub const BOOT_ARGS_SIZE: usize = 512;
pub const BOOT_EXTRA_ARGS_SIZE: usize = 1024;

pub const VENDOR_BOOT_ARGS_SIZE: usize = 2048;
pub const VENDOR_RAMDISK_NAME_SIZE: usize = 32;
pub const VENDOR_RAMDISK_TABLE_ENTRY_BOARD_ID_SIZE: usize = 16;

pub const VENDOR_RAMDISK_TYPE_NONE: u32 = 0;
pub const VENDOR_RAMDISK_TYPE_PLATFORM: u32 = 1;
pub const VENDOR_RAMDISK_TYPE_RECOVERY: u32 = 2;
pub const VENDOR_RAMDISK_TYPE_DLKM: u32 = 3;

/// v3+ images have a fixed page size.
pub const PAGE_SIZE: u32 = 4096;

pub const SEANDROID_MAGIC: &[u8; 16] = b"SEANDROIDENFORCE";
pub const LG_BUMP_MAGIC: &[u8; 16] =
    b"\x41\xa9\xe4\x67\x74\x4d\x1d\x1b\xa4\x29\xf2\xec\xea\x65\x52\x79";
pub const NOOKHD_RL_MAGIC: &[u8] = b"Red Loader";
pub const NOOKHD_GL_MAGIC: &[u8] = b"Green Loader";
pub const NOOKHD_GR_MAGIC: &[u8] = b"Green Recovery";
pub const NOOKHD_EB_MAGIC: &[u8] = b"eMMC boot.img+secondloader";
pub const NOOKHD_ER_MAGIC: &[u8] = b"eMMC recovery.img+secondloader";
pub const NOOKHD_PRE_HEADER_SZ: usize = 1048576;
pub const ACCLAIM_MAGIC: &[u8] = b"BauwksBoot";
pub const ACCLAIM_PRE_HEADER_SZ: usize = 262144;
pub const AMONET_MICROLOADER_MAGIC: &[u8] = b"microloader";
pub const AMONET_MICROLOADER_SZ: usize = 1024;
pub const AVB_FOOTER_MAGIC: &[u8; 4] = b"AVBf";
pub const AVB_MAGIC: &[u8; 4] = b"AVB0";
pub const AVB_RELEASE_STRING_SIZE: usize = 48;

/// In the PXA layout, the word at the AOSP `page_size` offset is an
/// unrelated field with values far above any real page size.
const PXA_PAGE_SIZE_THRESHOLD: u32 = 0x0200_0000;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown magic: {0:?}")]
    UnknownMagic([u8; 8]),
    #[error("Unknown header version: {0}")]
    UnknownHeaderVersion(u32),
    #[error("Invalid header: {0}")]
    InvalidHeader(&'static str),
    #[error("I/O error")]
    Io(#[from] io::Error),
}

type Result<T> = std::result::Result<T, Error>;

bitflags! {
    /// Wrappers and signatures detected around a boot image.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct BootFlags: u32 {
        const MTK_KERNEL = 1 << 0;
        const MTK_RAMDISK = 1 << 1;
        const CHROMEOS = 1 << 2;
        const DHTB = 1 << 3;
        const SEANDROID = 1 << 4;
        const LG_BUMP = 1 << 5;
        const SHA256 = 1 << 6;
        const BLOB = 1 << 7;
        const NOOKHD = 1 << 8;
        const ACCLAIM = 1 << 9;
        const AMONET = 1 << 10;
        const AVB1_SIGNED = 1 << 11;
        const AVB = 1 << 12;
        const ZIMAGE_KERNEL = 1 << 13;
    }
}

impl BootFlags {
    /// Detect the signature blob appended after the image payload.
    pub fn detect_tail(tail: &[u8]) -> Self {
        if tail.starts_with(SEANDROID_MAGIC) {
            Self::SEANDROID
        } else if tail.starts_with(LG_BUMP_MAGIC) {
            Self::LG_BUMP
        } else {
            Self::empty()
        }
    }

    /// Detect a vendor pre-header in front of the real boot image. Returns
    /// the flag and the number of bytes to skip before parsing.
    pub fn detect_pre_header(prefix: &[u8]) -> Option<(Self, usize)> {
        let nookhd = [
            NOOKHD_RL_MAGIC,
            NOOKHD_GL_MAGIC,
            NOOKHD_GR_MAGIC,
            NOOKHD_EB_MAGIC,
            NOOKHD_ER_MAGIC,
        ];

        if nookhd.iter().any(|magic| prefix.starts_with(magic)) {
            Some((Self::NOOKHD, NOOKHD_PRE_HEADER_SZ))
        } else if prefix.starts_with(ACCLAIM_MAGIC) {
            Some((Self::ACCLAIM, ACCLAIM_PRE_HEADER_SZ))
        } else {
            None
        }
    }

    /// Whether the kernel starts with the amonet microloader stub.
    pub fn is_amonet_microloader(kernel: &[u8]) -> bool {
        kernel.len() >= AMONET_MICROLOADER_SZ && kernel.starts_with(AMONET_MICROLOADER_MAGIC)
    }
}

/// Fields shared by all legacy (v0-v2 and PXA) headers.
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(packed)]
pub struct RawV0Common {
    pub magic: [u8; 8],
    pub kernel_size: little_endian::U32,
    pub kernel_addr: little_endian::U32,
    pub ramdisk_size: little_endian::U32,
    pub ramdisk_addr: little_endian::U32,
    pub second_size: little_endian::U32,
    pub second_addr: little_endian::U32,
}

/// Raw on-disk layout for the v0 image header.
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(packed)]
pub struct RawV0 {
    pub common: RawV0Common,
    pub tags_addr: little_endian::U32,
    /// Unused on Samsung images.
    pub page_size: little_endian::U32,
    /// Extra blob size on Samsung images.
    pub header_version: little_endian::U32,
    pub os_version: little_endian::U32,
    pub name: [u8; BOOT_NAME_SIZE],
    pub cmdline: [u8; BOOT_ARGS_SIZE],
    pub id: [u8; BOOT_ID_SIZE],
    pub extra_cmdline: [u8; BOOT_EXTRA_ARGS_SIZE],
}

/// Raw on-disk layout for the v1 image header.
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(packed)]
pub struct RawV1 {
    pub v0: RawV0,
    pub recovery_dtbo_size: little_endian::U32,
    pub recovery_dtbo_offset: little_endian::U64,
    pub header_size: little_endian::U32,
}

/// Raw on-disk layout for the v2 image header.
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(packed)]
pub struct RawV2 {
    pub v1: RawV1,
    pub dtb_size: little_endian::U32,
    pub dtb_addr: little_endian::U64,
}

/// Raw on-disk layout for the Samsung PXA header.
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(packed)]
pub struct RawPxa {
    pub common: RawV0Common,
    pub extra_size: little_endian::U32,
    pub unknown: little_endian::U32,
    pub tags_addr: little_endian::U32,
    pub page_size: little_endian::U32,
    pub name: [u8; 24],
    pub cmdline: [u8; BOOT_ARGS_SIZE],
    pub id: [u8; BOOT_ID_SIZE],
    pub extra_cmdline: [u8; BOOT_EXTRA_ARGS_SIZE],
}

/// Raw on-disk layout for the v3 image header.
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(packed)]
pub struct RawV3 {
    pub magic: [u8; 8],
    pub kernel_size: little_endian::U32,
    pub ramdisk_size: little_endian::U32,
    pub os_version: little_endian::U32,
    pub header_size: little_endian::U32,
    pub reserved: [little_endian::U32; 4],
    pub header_version: little_endian::U32,
    pub cmdline: [u8; BOOT_ARGS_SIZE + BOOT_EXTRA_ARGS_SIZE],
}

/// Raw on-disk layout for the v4 image header.
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(packed)]
pub struct RawV4 {
    pub v3: RawV3,
    pub signature_size: little_endian::U32,
}

/// Raw on-disk layout for the vendor v3 image header.
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(packed)]
pub struct RawVendorV3 {
    pub magic: [u8; 8],
    pub header_version: little_endian::U32,
    pub page_size: little_endian::U32,
    pub kernel_addr: little_endian::U32,
    pub ramdisk_addr: little_endian::U32,
    pub ramdisk_size: little_endian::U32,
    pub cmdline: [u8; VENDOR_BOOT_ARGS_SIZE],
    pub tags_addr: little_endian::U32,
    pub name: [u8; BOOT_NAME_SIZE],
    pub header_size: little_endian::U32,
    pub dtb_size: little_endian::U32,
    pub dtb_addr: little_endian::U64,
}

/// Raw on-disk layout for the vendor v4 image header.
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(packed)]
pub struct RawVendorV4 {
    pub v3: RawVendorV3,
    pub vendor_ramdisk_table_size: little_endian::U32,
    pub vendor_ramdisk_table_entry_num: little_endian::U32,
    pub vendor_ramdisk_table_entry_size: little_endian::U32,
    pub bootconfig_size: little_endian::U32,
}

/// Raw on-disk layout for a vendor v4 ramdisk table entry.
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(packed)]
pub struct RawVendorRamdiskTableEntry {
    pub ramdisk_size: little_endian::U32,
    pub ramdisk_offset: little_endian::U32,
    pub ramdisk_type: little_endian::U32,
    pub ramdisk_name: [u8; VENDOR_RAMDISK_NAME_SIZE],
    pub board_id: [little_endian::U32; VENDOR_RAMDISK_TABLE_ENTRY_BOARD_ID_SIZE],
}

/// MediaTek wrapper placed in front of the kernel and/or ramdisk.
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(packed)]
pub struct MtkHdr {
    pub magic: [u8; 4],
    pub size: little_endian::U32,
    pub name: [u8; 32],
    pub padding: [u8; 472],
}

/// DHTB checksum wrapper placed in front of the whole image.
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(packed)]
pub struct DhtbHdr {
    pub magic: [u8; 8],
    pub checksum: [u8; 40],
    pub size: little_endian::U32,
    pub padding: [u8; 460],
}

/// Tegra signed blob wrapper.
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(packed)]
pub struct BlobHdr {
    pub secure_magic: [u8; 20],
    pub datalen: little_endian::U32,
    pub signature: little_endian::U32,
    pub magic: [u8; 16],
    pub hdr_version: little_endian::U32,
    pub hdr_size: little_endian::U32,
    pub part_offset: little_endian::U32,
    pub num_parts: little_endian::U32,
    pub unknown: [little_endian::U32; 7],
    pub name: [u8; 4],
    pub offset: little_endian::U32,
    pub size: little_endian::U32,
    pub version: little_endian::U32,
}

/// ARM zImage header.
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(packed)]
pub struct ZimageHdr {
    pub code: [little_endian::U32; 9],
    pub magic: little_endian::U32,
    pub start: little_endian::U32,
    pub end: little_endian::U32,
    pub endian: little_endian::U32,
}

/// AVB footer at the end of a partition image. All fields are big-endian.
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(packed)]
pub struct AvbFooter {
    pub magic: [u8; 4],
    pub version_major: big_endian::U32,
    pub version_minor: big_endian::U32,
    pub original_image_size: big_endian::U64,
    pub vbmeta_offset: big_endian::U64,
    pub vbmeta_size: big_endian::U64,
    pub reserved: [u8; 28],
}

/// AVB vbmeta image header. All fields are big-endian.
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(packed)]
pub struct AvbVBMetaImageHeader {
    pub magic: [u8; 4],
    pub required_libavb_version_major: big_endian::U32,
    pub required_libavb_version_minor: big_endian::U32,
    pub authentication_data_block_size: big_endian::U64,
    pub auxiliary_data_block_size: big_endian::U64,
    pub algorithm_type: big_endian::U32,
    pub hash_offset: big_endian::U64,
    pub hash_size: big_endian::U64,
    pub signature_offset: big_endian::U64,
    pub signature_size: big_endian::U64,
    pub public_key_offset: big_endian::U64,
    pub public_key_size: big_endian::U64,
    pub public_key_metadata_offset: big_endian::U64,
    pub public_key_metadata_size: big_endian::U64,
    pub descriptors_offset: big_endian::U64,
    pub descriptors_size: big_endian::U64,
    pub rollback_index: big_endian::U64,
    pub flags: big_endian::U32,
    pub rollback_index_location: big_endian::U32,
    pub release_string: [u8; AVB_RELEASE_STRING_SIZE],
    pub reserved: [u8; 80],
}

/// A parsed boot image header of any supported variant. Each variant owns
/// its raw fixed-width header bytes; component payloads stay with the
/// caller.
#[derive(Clone)]
pub enum BootHeader {
    V0(Box<RawV0>),
    V1(Box<RawV1>),
    V2(Box<RawV2>),
    Pxa(Box<RawPxa>),
    V3(Box<RawV3>),
    V4(Box<RawV4>),
    VendorV3(Box<RawVendorV3>),
    VendorV4(Box<RawVendorV4>),
}

fn read_raw<T: FromBytes>(data: &[u8]) -> Result<Box<T>> {
    T::read_from_prefix(data)
        .map(|(raw, _)| Box::new(raw))
        .map_err(|_| Error::InvalidHeader("data smaller than header"))
}

impl BootHeader {
    /// Select and read the header variant from the start of an image. Only
    /// the fixed-width header is consumed.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < 8 {
            return Err(Error::InvalidHeader("data smaller than magic"));
        }

        let magic = &data[..8];

        if magic == BOOT_MAGIC {
            if data.len() >= 44 {
                let page_size = u32::from_le_bytes(data[36..40].try_into().unwrap());
                if page_size >= PXA_PAGE_SIZE_THRESHOLD {
                    return Ok(Self::Pxa(read_raw(data)?));
                }
            }

            let header_version = data
                .get(40..44)
                .map(|b| u32::from_le_bytes(b.try_into().unwrap()))
                .ok_or(Error::InvalidHeader("data smaller than header"))?;

            match header_version {
                0 => Ok(Self::V0(read_raw(data)?)),
                1 => Ok(Self::V1(read_raw(data)?)),
                2 => Ok(Self::V2(read_raw(data)?)),
                3 => Ok(Self::V3(read_raw(data)?)),
                4 => Ok(Self::V4(read_raw(data)?)),
                v => Err(Error::UnknownHeaderVersion(v)),
            }
        } else if magic == VENDOR_BOOT_MAGIC {
            let header_version = data
                .get(8..12)
                .map(|b| u32::from_le_bytes(b.try_into().unwrap()))
                .ok_or(Error::InvalidHeader("data smaller than header"))?;

            match header_version {
                3 => Ok(Self::VendorV3(read_raw(data)?)),
                4 => Ok(Self::VendorV4(read_raw(data)?)),
                v => Err(Error::UnknownHeaderVersion(v)),
            }
        } else {
            Err(Error::UnknownMagic(magic.try_into().unwrap()))
        }
    }

    pub fn header_version(&self) -> u32 {
        match self {
            Self::V0(_) | Self::Pxa(_) => 0,
            Self::V1(_) => 1,
            Self::V2(_) => 2,
            Self::V3(_) | Self::VendorV3(_) => 3,
            Self::V4(_) | Self::VendorV4(_) => 4,
        }
    }

    pub fn is_vendor(&self) -> bool {
        matches!(self, Self::VendorV3(_) | Self::VendorV4(_))
    }

    pub fn page_size(&self) -> u32 {
        match self {
            Self::V0(h) => h.page_size.get(),
            Self::V1(h) => h.v0.page_size.get(),
            Self::V2(h) => h.v1.v0.page_size.get(),
            Self::Pxa(h) => h.page_size.get(),
            Self::V3(_) | Self::V4(_) => PAGE_SIZE,
            Self::VendorV3(h) => h.page_size.get(),
            Self::VendorV4(h) => h.v3.page_size.get(),
        }
    }

    /// Size of the boot signature section. Only v4 images carry one.
    pub fn signature_size(&self) -> u32 {
        match self {
            Self::V4(h) => h.signature_size.get(),
            _ => 0,
        }
    }

    pub fn vendor_ramdisk_table_size(&self) -> u32 {
        match self {
            Self::VendorV4(h) => h.vendor_ramdisk_table_size.get(),
            _ => 0,
        }
    }

    pub fn vendor_ramdisk_table_entry_num(&self) -> u32 {
        match self {
            Self::VendorV4(h) => h.vendor_ramdisk_table_entry_num.get(),
            _ => 0,
        }
    }

    pub fn vendor_ramdisk_table_entry_size(&self) -> u32 {
        match self {
            Self::VendorV4(h) => h.vendor_ramdisk_table_entry_size.get(),
            _ => 0,
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::V0(_) => "v0",
            Self::V1(_) => "v1",
            Self::V2(_) => "v2",
            Self::Pxa(_) => "pxa",
            Self::V3(_) => "v3",
            Self::V4(_) => "v4",
            Self::VendorV3(_) => "vendor v3",
            Self::VendorV4(_) => "vendor v4",
        }
    }

    /// On-disk size of this header variant.
    pub fn header_size(&self) -> usize {
        match self {
            Self::V0(_) => mem::size_of::<RawV0>(),
            Self::V1(_) => mem::size_of::<RawV1>(),
            Self::V2(_) => mem::size_of::<RawV2>(),
            Self::Pxa(_) => mem::size_of::<RawPxa>(),
            Self::V3(_) => mem::size_of::<RawV3>(),
            Self::V4(_) => mem::size_of::<RawV4>(),
            Self::VendorV3(_) => mem::size_of::<RawVendorV3>(),
            Self::VendorV4(_) => mem::size_of::<RawVendorV4>(),
        }
    }
}

impl fmt::Debug for BootHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootHeader")
            .field("variant", &self.variant_name())
            .field("page_size", &self.page_size())
            .field("header_size", &self.header_size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::mem;

    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn raw_header_sizes() {
        assert_eq!(mem::size_of::<RawV0>(), 1632);
        assert_eq!(mem::size_of::<RawV1>(), 1648);
        assert_eq!(mem::size_of::<RawV2>(), 1660);
        assert_eq!(mem::size_of::<RawPxa>(), 1640);
        assert_eq!(mem::size_of::<RawV3>(), 1580);
        assert_eq!(mem::size_of::<RawV4>(), 1584);
        assert_eq!(mem::size_of::<RawVendorV3>(), 2112);
        assert_eq!(mem::size_of::<RawVendorV4>(), 2128);
    }

    #[test]
    fn raw_wrapper_sizes() {
        assert_eq!(mem::size_of::<MtkHdr>(), 512);
        assert_eq!(mem::size_of::<DhtbHdr>(), 512);
        assert_eq!(mem::size_of::<BlobHdr>(), 104);
        assert_eq!(mem::size_of::<ZimageHdr>(), 52);
        assert_eq!(mem::size_of::<AvbFooter>(), 64);
        assert_eq!(mem::size_of::<AvbVBMetaImageHeader>(), 256);
        assert_eq!(mem::size_of::<RawVendorRamdiskTableEntry>(), 108);
    }

    #[test]
    fn parse_v2_header() {
        let mut data = vec![0u8; 8192];
        data[..8].copy_from_slice(b"ANDROID!");
        data[36..40].copy_from_slice(&2048u32.to_le_bytes()); // page_size
        data[40..44].copy_from_slice(&2u32.to_le_bytes()); // header_version

        let header = BootHeader::parse(&data).unwrap();
        assert_matches!(header, BootHeader::V2(_));
        assert_eq!(header.header_version(), 2);
        assert_eq!(header.page_size(), 2048);
        assert_eq!(header.header_size(), 1660);
        assert!(!header.is_vendor());
        assert_eq!(header.signature_size(), 0);
    }

    #[test]
    fn parse_v4_header() {
        let mut data = vec![0u8; 8192];
        data[..8].copy_from_slice(b"ANDROID!");
        data[40..44].copy_from_slice(&4u32.to_le_bytes());
        data[1580..1584].copy_from_slice(&4096u32.to_le_bytes()); // signature_size

        let header = BootHeader::parse(&data).unwrap();
        assert_matches!(header, BootHeader::V4(_));
        assert_eq!(header.page_size(), PAGE_SIZE);
        assert_eq!(header.signature_size(), 4096);
    }

    #[test]
    fn parse_pxa_header() {
        let mut data = vec![0u8; 8192];
        data[..8].copy_from_slice(b"ANDROID!");
        // A large value in the page_size slot marks the Samsung layout.
        data[36..40].copy_from_slice(&0x02400000u32.to_le_bytes());
        data[44..48].copy_from_slice(&2048u32.to_le_bytes()); // real page_size

        let header = BootHeader::parse(&data).unwrap();
        assert_matches!(header, BootHeader::Pxa(_));
        assert_eq!(header.header_version(), 0);
        assert_eq!(header.page_size(), 2048);
        assert_eq!(header.header_size(), 1640);
    }

    #[test]
    fn parse_vendor_v4_header() {
        let mut data = vec![0u8; 8192];
        data[..8].copy_from_slice(b"VNDRBOOT");
        data[8..12].copy_from_slice(&4u32.to_le_bytes());
        data[12..16].copy_from_slice(&4096u32.to_le_bytes()); // page_size
        data[2112..2116].copy_from_slice(&216u32.to_le_bytes()); // table_size
        data[2116..2120].copy_from_slice(&2u32.to_le_bytes()); // entry_num
        data[2120..2124].copy_from_slice(&108u32.to_le_bytes()); // entry_size

        let header = BootHeader::parse(&data).unwrap();
        assert_matches!(header, BootHeader::VendorV4(_));
        assert!(header.is_vendor());
        assert_eq!(header.header_version(), 4);
        assert_eq!(header.vendor_ramdisk_table_size(), 216);
        assert_eq!(header.vendor_ramdisk_table_entry_num(), 2);
        assert_eq!(header.vendor_ramdisk_table_entry_size(), 108);
        assert_eq!(header.header_size(), 2128);
    }

    #[test]
    fn parse_errors() {
        assert_matches!(
            BootHeader::parse(b"NOTBOOT!........"),
            Err(Error::UnknownMagic(_))
        );

        let mut data = vec![0u8; 8192];
        data[..8].copy_from_slice(b"ANDROID!");
        data[40..44].copy_from_slice(&9u32.to_le_bytes());
        assert_matches!(
            BootHeader::parse(&data),
            Err(Error::UnknownHeaderVersion(9))
        );

        let mut short = vec![0u8; 100];
        short[..8].copy_from_slice(b"ANDROID!");
        assert_matches!(BootHeader::parse(&short), Err(Error::InvalidHeader(_)));
    }

    #[test]
    fn wrapper_detection() {
        assert_eq!(
            BootFlags::detect_tail(b"SEANDROIDENFORCE\x00"),
            BootFlags::SEANDROID,
        );
        assert_eq!(
            BootFlags::detect_tail(LG_BUMP_MAGIC),
            BootFlags::LG_BUMP,
        );
        assert_eq!(BootFlags::detect_tail(b"nothing"), BootFlags::empty());

        assert_eq!(
            BootFlags::detect_pre_header(b"Green Loader\x00junk"),
            Some((BootFlags::NOOKHD, NOOKHD_PRE_HEADER_SZ)),
        );
        assert_eq!(
            BootFlags::detect_pre_header(b"BauwksBoot\x00"),
            Some((BootFlags::ACCLAIM, ACCLAIM_PRE_HEADER_SZ)),
        );
        assert_eq!(BootFlags::detect_pre_header(b"ANDROID!"), None);
    }
}
