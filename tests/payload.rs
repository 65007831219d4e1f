// SPDX-FileCopyrightText: 2024-2025 Andrew Gunnerson
// SPDX-License-Identifier: GPL-3.0-only

use std::io::Cursor;

use assert_matches::assert_matches;
use prost::Message;

use magiskboot::{
    format::{
        compression,
        payload::{self, Error, PayloadHeader},
    },
    protobuf::chromeos_update_engine::{
        install_operation::Type, DeltaArchiveManifest, Extent, InstallOperation, PartitionUpdate,
    },
};

const BLOCK_SIZE: u32 = 4;

fn operation(
    op_type: Type,
    data_offset: u64,
    data_length: u64,
    start_block: u64,
    num_blocks: u64,
) -> InstallOperation {
    InstallOperation {
        r#type: op_type as i32,
        data_offset: Some(data_offset),
        data_length: Some(data_length),
        src_extents: vec![],
        dst_extents: vec![Extent {
            start_block: Some(start_block),
            num_blocks: Some(num_blocks),
        }],
        data_sha256_hash: None,
    }
}

fn manifest(partitions: Vec<PartitionUpdate>) -> DeltaArchiveManifest {
    DeltaArchiveManifest {
        block_size: Some(BLOCK_SIZE),
        signatures_offset: None,
        signatures_size: None,
        minor_version: Some(0),
        partitions,
    }
}

fn partition(name: &str, operations: Vec<InstallOperation>) -> PartitionUpdate {
    PartitionUpdate {
        partition_name: name.to_owned(),
        old_partition_info: None,
        new_partition_info: None,
        operations,
    }
}

/// Assemble a payload: the CrAU header, the manifest, a dummy manifest
/// signature, and the data blob.
fn generate_payload(manifest: &DeltaArchiveManifest, blob: &[u8]) -> Vec<u8> {
    let manifest_raw = manifest.encode_to_vec();
    let signature = b"sig!";

    let mut data = vec![];
    data.extend(b"CrAU");
    data.extend(2u64.to_be_bytes());
    data.extend((manifest_raw.len() as u64).to_be_bytes());
    data.extend((signature.len() as u32).to_be_bytes());
    data.extend(&manifest_raw);
    data.extend(signature);
    data.extend(blob);

    data
}

fn extract(data: &[u8], partition_name: Option<&str>) -> Result<Vec<u8>, Error> {
    let mut reader = Cursor::new(data);
    let header = PayloadHeader::parse(&mut reader)?;

    let partition = payload::find_partition(&header.manifest, partition_name)?;

    let mut writer = Cursor::new(Vec::new());
    payload::extract_partition(&mut reader, &mut writer, &header, partition)?;

    Ok(writer.into_inner())
}

#[test]
fn replace_and_zero_operations() {
    let blob = b"KERNEL!!";
    let manifest = manifest(vec![partition(
        "boot",
        vec![
            operation(Type::Replace, 0, blob.len() as u64, 0, 2),
            // The zero span covers 6 blocks starting at block 4.
            operation(Type::Zero, blob.len() as u64, 0, 4, 6),
        ],
    )]);

    let data = generate_payload(&manifest, blob);
    let image = extract(&data, None).unwrap();

    assert_eq!(&image[..blob.len()], blob);

    // The zero operation writes num_blocks bytes, not num_blocks blocks.
    assert_eq!(image.len(), 4 * BLOCK_SIZE as usize + 6);
    assert!(image[4 * BLOCK_SIZE as usize..].iter().all(|b| *b == 0));
}

#[test]
fn replace_xz_and_bz_operations() {
    let payload_data = b"compressed partition contents";
    let xz_blob = compression::xz_compress(payload_data).unwrap();

    let manifest = manifest(vec![partition(
        "boot",
        vec![operation(Type::ReplaceXz, 0, xz_blob.len() as u64, 0, 8)],
    )]);

    let data = generate_payload(&manifest, &xz_blob);
    let image = extract(&data, None).unwrap();

    assert_eq!(image, payload_data);
}

#[test]
fn operations_applied_in_data_offset_order() {
    // Operations listed out of order must still consume the blob
    // sequentially.
    let blob = b"AAAABBBB";
    let manifest = manifest(vec![partition(
        "boot",
        vec![
            operation(Type::Replace, 4, 4, 1, 1),
            operation(Type::Replace, 0, 4, 0, 1),
        ],
    )]);

    let data = generate_payload(&manifest, blob);
    let image = extract(&data, None).unwrap();

    assert_eq!(image, b"AAAABBBB");
}

#[test]
fn partition_selection() {
    let blob = b"XXXX";
    let make = |names: &[&str]| {
        manifest(
            names
                .iter()
                .map(|n| partition(n, vec![operation(Type::Replace, 0, 4, 0, 1)]))
                .collect(),
        )
    };

    // init_boot is preferred over boot.
    let data = generate_payload(&make(&["vendor", "boot", "init_boot"]), blob);
    let header = PayloadHeader::parse(Cursor::new(&data)).unwrap();
    let selected = payload::find_partition(&header.manifest, None).unwrap();
    assert_eq!(selected.partition_name, "init_boot");

    let data = generate_payload(&make(&["vendor", "boot"]), blob);
    let header = PayloadHeader::parse(Cursor::new(&data)).unwrap();
    let selected = payload::find_partition(&header.manifest, None).unwrap();
    assert_eq!(selected.partition_name, "boot");

    let selected = payload::find_partition(&header.manifest, Some("vendor")).unwrap();
    assert_eq!(selected.partition_name, "vendor");

    assert_matches!(
        payload::find_partition(&header.manifest, Some("system")),
        Err(Error::MissingPartition(name)) if name == "system"
    );

    let data = generate_payload(&make(&["vendor"]), blob);
    let header = PayloadHeader::parse(Cursor::new(&data)).unwrap();
    assert_matches!(
        payload::find_partition(&header.manifest, None),
        Err(Error::MissingPartition(_))
    );
}

#[test]
fn header_validation() {
    let manifest = manifest(vec![]);

    let mut bad_magic = generate_payload(&manifest, b"");
    bad_magic[..4].copy_from_slice(b"JUNK");
    assert_matches!(
        PayloadHeader::parse(Cursor::new(&bad_magic)),
        Err(Error::UnknownMagic(_))
    );

    let mut bad_version = generate_payload(&manifest, b"");
    bad_version[4..12].copy_from_slice(&1u64.to_be_bytes());
    assert_matches!(
        PayloadHeader::parse(Cursor::new(&bad_version)),
        Err(Error::UnsupportedVersion(1))
    );

    let mut zero_manifest = generate_payload(&manifest, b"");
    zero_manifest[12..20].copy_from_slice(&0u64.to_be_bytes());
    assert_matches!(
        PayloadHeader::parse(Cursor::new(&zero_manifest)),
        Err(Error::InvalidPayload(_))
    );
}

#[test]
fn delta_payloads_rejected() {
    let mut delta = manifest(vec![]);
    delta.minor_version = Some(2);

    let data = generate_payload(&delta, b"");
    assert_matches!(
        PayloadHeader::parse(Cursor::new(&data)),
        Err(Error::DeltaPayloadUnsupported)
    );
}

#[test]
fn unsupported_operations_rejected() {
    let blob = b"XXXX";
    let manifest = manifest(vec![partition(
        "boot",
        vec![operation(Type::Bsdiff, 0, 4, 0, 1)],
    )]);

    let data = generate_payload(&manifest, blob);
    assert_matches!(
        extract(&data, None),
        Err(Error::UnsupportedOperation(t)) if t == Type::Bsdiff as i32
    );
}

#[test]
fn missing_operation_fields_rejected() {
    let blob = b"XXXX";

    let mut op = operation(Type::Replace, 0, 4, 0, 1);
    op.data_length = None;

    let manifest = manifest(vec![partition("boot", vec![op])]);
    let data = generate_payload(&manifest, blob);

    assert_matches!(extract(&data, None), Err(Error::InvalidPayload(_)));
}
