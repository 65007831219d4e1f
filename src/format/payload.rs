// SPDX-FileCopyrightText: 2024-2025 Andrew Gunnerson
// SPDX-License-Identifier: GPL-3.0-only

use std::io::{self, Read, Seek, SeekFrom, Write};

use byteorder::{BigEndian, ReadBytesExt};
use prost::Message;
use thiserror::Error;

use crate::{
    format::compression,
    protobuf::chromeos_update_engine::{
        install_operation::Type, DeltaArchiveManifest, PartitionUpdate,
    },
    util,
};

const PAYLOAD_MAGIC: &[u8; 4] = b"CrAU";

/// Manifest block size when the field is absent, per the schema default.
const DEFAULT_BLOCK_SIZE: u32 = 4096;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown magic: {0:?}")]
    UnknownMagic([u8; 4]),
    #[error("Unsupported payload version: {0}")]
    UnsupportedVersion(u64),
    #[error("Delta payloads are not supported, please use a full payload file")]
    DeltaPayloadUnsupported,
    #[error("Partition not found in payload: {0}")]
    MissingPartition(String),
    #[error("Unsupported partition operation: {0}")]
    UnsupportedOperation(i32),
    #[error("Invalid payload: {0}")]
    InvalidPayload(&'static str),
    #[error("Protobuf error")]
    Protobuf(#[from] prost::DecodeError),
    #[error("Compression error")]
    Compression(#[from] compression::Error),
    #[error("I/O error")]
    Io(#[from] io::Error),
}

type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug)]
pub struct PayloadHeader {
    pub version: u64,
    pub manifest: DeltaArchiveManifest,
    pub metadata_signature_size: u32,
}

impl PayloadHeader {
    pub fn block_size(&self) -> u32 {
        self.manifest.block_size.unwrap_or(DEFAULT_BLOCK_SIZE)
    }

    /// Parse the header from an OTA payload stream. After this function
    /// returns, the stream is positioned at the start of the manifest
    /// signature. Only full (non-delta) payloads are accepted.
    pub fn parse(mut reader: impl Read) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != *PAYLOAD_MAGIC {
            return Err(Error::UnknownMagic(magic));
        }

        let version = reader.read_u64::<BigEndian>()?;
        if version != 2 {
            return Err(Error::UnsupportedVersion(version));
        }

        let manifest_size = reader.read_u64::<BigEndian>()?;
        if manifest_size == 0 {
            return Err(Error::InvalidPayload("manifest length is zero"));
        }

        let metadata_signature_size = reader.read_u32::<BigEndian>()?;
        if metadata_signature_size == 0 {
            return Err(Error::InvalidPayload("manifest signature length is zero"));
        }

        let mut manifest_raw = vec![0u8; manifest_size as usize];
        reader.read_exact(&mut manifest_raw)?;
        let manifest = DeltaArchiveManifest::decode(manifest_raw.as_slice())?;

        if manifest.minor_version.unwrap_or(0) != 0 {
            return Err(Error::DeltaPayloadUnsupported);
        }

        Ok(Self {
            version,
            manifest,
            metadata_signature_size,
        })
    }
}

/// Find the partition to extract. When no name is given, `init_boot` is
/// preferred over `boot`, so devices with a separate generic ramdisk image
/// get the partition that actually contains the ramdisk.
pub fn find_partition<'a>(
    manifest: &'a DeltaArchiveManifest,
    name: Option<&str>,
) -> Result<&'a PartitionUpdate> {
    match name {
        Some(name) => manifest
            .partitions
            .iter()
            .find(|p| p.partition_name == name)
            .ok_or_else(|| Error::MissingPartition(name.to_owned())),
        None => manifest
            .partitions
            .iter()
            .find(|p| p.partition_name == "init_boot")
            .or_else(|| {
                manifest
                    .partitions
                    .iter()
                    .find(|p| p.partition_name == "boot")
            })
            .ok_or_else(|| Error::MissingPartition("boot".to_owned())),
    }
}

/// Apply the partition's install operations to `writer`. The reader must be
/// positioned at the start of the manifest signature (where
/// [`PayloadHeader::parse`] leaves it) and only ever moves forward, so
/// unseekable inputs like stdin work.
///
/// Supported operations are REPLACE (raw copy), REPLACE_BZ / REPLACE_XZ
/// (decompressed copy), and ZERO. ZERO zero-fills `num_blocks` *bytes* per
/// destination extent; any other operation type is an error.
pub fn extract_partition(
    mut reader: impl Read,
    mut writer: impl Write + Seek,
    header: &PayloadHeader,
    partition: &PartitionUpdate,
) -> Result<()> {
    // Skip the manifest signature to reach the data blob.
    util::skip_exact(&mut reader, header.metadata_signature_size.into())?;

    let block_size = u64::from(header.block_size());

    let mut operations = partition.operations.iter().collect::<Vec<_>>();
    operations.sort_by_key(|op| op.data_offset.unwrap_or(0));

    let mut curr_data_offset = 0u64;

    for operation in operations {
        let data_length = operation
            .data_length
            .ok_or(Error::InvalidPayload("data length not found"))?;
        let data_offset = operation
            .data_offset
            .ok_or(Error::InvalidPayload("data offset not found"))?;
        let op_type = Type::try_from(operation.r#type)
            .map_err(|_| Error::UnsupportedOperation(operation.r#type))?;

        let skip = data_offset
            .checked_sub(curr_data_offset)
            .ok_or(Error::InvalidPayload("overlapping data blobs"))?;
        util::skip_exact(&mut reader, skip)?;

        let mut buf = vec![0u8; data_length as usize];
        reader.read_exact(&mut buf)?;
        curr_data_offset = data_offset + data_length;

        let out_offset = |index: usize| -> Result<u64> {
            let extent = operation
                .dst_extents
                .get(index)
                .ok_or(Error::InvalidPayload("dst extents missing"))?;
            let start_block = extent
                .start_block
                .ok_or(Error::InvalidPayload("start block missing"))?;

            start_block
                .checked_mul(block_size)
                .ok_or(Error::InvalidPayload("output offset overflow"))
        };

        match op_type {
            Type::Replace => {
                writer.seek(SeekFrom::Start(out_offset(0)?))?;
                writer.write_all(&buf)?;
            }
            Type::Zero => {
                for (index, extent) in operation.dst_extents.iter().enumerate() {
                    let num_blocks = extent
                        .num_blocks
                        .ok_or(Error::InvalidPayload("num blocks missing"))?;

                    writer.seek(SeekFrom::Start(out_offset(index)?))?;
                    util::write_zeros(&mut writer, num_blocks)?;
                }
            }
            Type::ReplaceBz | Type::ReplaceXz => {
                writer.seek(SeekFrom::Start(out_offset(0)?))?;
                compression::decompress_to_writer(&buf, &mut writer)?;
            }
            _ => return Err(Error::UnsupportedOperation(operation.r#type)),
        }
    }

    Ok(())
}
