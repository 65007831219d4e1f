// SPDX-FileCopyrightText: 2024-2025 Andrew Gunnerson
// SPDX-License-Identifier: GPL-3.0-only

use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Cursor, Read},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use memmap2::Mmap;
use tracing::info;

use crate::format::{
    compression::{self, CompressedReader},
    magic::DTB_MAGIC,
};

pub const HEADER_FILE: &str = "header";
pub const KERNEL_FILE: &str = "kernel";
pub const RAMDISK_FILE: &str = "ramdisk.cpio";
pub const VND_RAMDISK_DIR: &str = "vendor_ramdisk";
pub const SECOND_FILE: &str = "second";
pub const EXTRA_FILE: &str = "extra";
pub const KER_DTB_FILE: &str = "kernel_dtb";
pub const RECV_DTBO_FILE: &str = "recovery_dtbo";
pub const DTB_FILE: &str = "dtb";
pub const BOOTCONFIG_FILE: &str = "bootconfig";
pub const NEW_BOOT: &str = "new-boot.img";

/// Delete the unpacked component files from the current directory.
pub fn cleanup_main() -> Result<()> {
    info!("Cleaning up...");

    for file in [
        HEADER_FILE,
        KERNEL_FILE,
        RAMDISK_FILE,
        SECOND_FILE,
        KER_DTB_FILE,
        EXTRA_FILE,
        RECV_DTBO_FILE,
        DTB_FILE,
        BOOTCONFIG_FILE,
    ] {
        let _ = fs::remove_file(file);
    }
    let _ = fs::remove_dir_all(VND_RAMDISK_DIR);

    Ok(())
}

pub fn sha1_main(cli: &Sha1Cli) -> Result<()> {
    let mut reader = File::open(&cli.file)
        .map(BufReader::new)
        .with_context(|| format!("Failed to open for reading: {:?}", cli.file))?;

    let mut context = ring::digest::Context::new(&ring::digest::SHA1_FOR_LEGACY_USE_ONLY);
    let mut buf = [0u8; 16384];

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        context.update(&buf[..n]);
    }

    println!("{}", hex::encode(context.finish()));

    Ok(())
}

/// Locate a flattened device tree inside the image by scanning for its
/// magic and validating the fdt header.
fn find_dtb_offset(data: &[u8]) -> Option<usize> {
    for pos in memchr::memmem::find_iter(data, DTB_MAGIC) {
        let header = data.get(pos..pos + 40)?;
        let remaining = data.len() - pos;

        let totalsize = u32::from_be_bytes(header[4..8].try_into().unwrap()) as usize;
        if totalsize > remaining {
            continue;
        }

        let off_dt_struct = u32::from_be_bytes(header[8..12].try_into().unwrap()) as usize;
        if off_dt_struct > remaining {
            continue;
        }

        // The first structure token must be FDT_BEGIN_NODE.
        let Some(tag) = data.get(pos + off_dt_struct..pos + off_dt_struct + 4) else {
            continue;
        };
        if u32::from_be_bytes(tag.try_into().unwrap()) != 0x1 {
            continue;
        }

        return Some(pos);
    }

    None
}

pub fn split_main(cli: &SplitCli) -> Result<()> {
    let file = File::open(&cli.file)
        .with_context(|| format!("Failed to open for reading: {:?}", cli.file))?;
    let map = unsafe { Mmap::map(&file)? };

    let offset = match find_dtb_offset(&map) {
        Some(offset) if offset > 0 => offset,
        _ => bail!("Cannot find DTB in {:?}", cli.file),
    };

    let format = compression::check_fmt_lg(&map);

    if !cli.no_decompress && format.is_compressed() {
        let mut writer = BufWriter::new(File::create(KERNEL_FILE)?);
        let mut reader = CompressedReader::with_format(Cursor::new(&map[..offset]), format)?;
        io::copy(&mut reader, &mut writer)?;
        writer.into_inner().context("Failed to flush kernel")?;
    } else {
        fs::write(KERNEL_FILE, &map[..offset])?;
    }

    fs::write(KER_DTB_FILE, &map[offset..])?;

    Ok(())
}

/// Print the SHA1 checksum of a file.
#[derive(Debug, Parser)]
pub struct Sha1Cli {
    /// Path to input file.
    pub file: PathBuf,
}

/// Split an image.*-dtb file into kernel + kernel_dtb.
#[derive(Debug, Parser)]
pub struct SplitCli {
    /// Skip decompression; leave the kernel in its original format.
    #[arg(short = 'n')]
    pub no_decompress: bool,

    /// Path to input kernel image.
    pub file: PathBuf,
}

/// Placeholder for actions that are recognized but not implemented.
#[derive(Debug, Parser)]
pub struct StubCli {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
