// SPDX-FileCopyrightText: 2024-2025 Andrew Gunnerson
// SPDX-License-Identifier: GPL-3.0-only

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read},
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::format::payload::{self, PayloadHeader};

pub fn extract_main(cli: &ExtractCli) -> Result<()> {
    let mut reader: Box<dyn Read> = if cli.payload == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(&cli.payload)
            .with_context(|| format!("Failed to open payload: {:?}", cli.payload))?;
        Box::new(BufReader::new(file))
    };

    let header = PayloadHeader::parse(&mut reader)
        .with_context(|| format!("Failed to read payload header: {:?}", cli.payload))?;

    let partition = payload::find_partition(&header.manifest, cli.partition.as_deref())?;

    let output = match &cli.output {
        Some(output) => output.clone(),
        None => format!("{}.img", partition.partition_name),
    };

    info!(
        "Extracting partition [{}] to [{output}]",
        partition.partition_name,
    );

    let mut writer = File::create(&output)
        .map(BufWriter::new)
        .with_context(|| format!("Failed to open for writing: {output:?}"))?;

    payload::extract_partition(&mut reader, &mut writer, &header, partition)
        .with_context(|| format!("Failed to extract partition: {}", partition.partition_name))?;

    writer
        .into_inner()
        .with_context(|| format!("Failed to flush output: {output:?}"))?;

    Ok(())
}

/// Extract a partition image from an OTA payload.bin. With no partition
/// specified, init_boot is extracted when present, boot otherwise. The
/// payload can be '-' for stdin.
#[derive(Debug, Parser)]
pub struct ExtractCli {
    /// Path to payload.bin.
    pub payload: String,

    /// Name of the partition to extract.
    pub partition: Option<String>,

    /// Path to output file. Defaults to <partition>.img.
    pub output: Option<String>,
}
