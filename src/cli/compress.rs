// SPDX-FileCopyrightText: 2024-2025 Andrew Gunnerson
// SPDX-License-Identifier: GPL-3.0-only

use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Cursor, Read, Write},
    path::Path,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use crate::format::{
    compression::{CompressedReader, CompressedWriter},
    magic::Format,
};

fn open_input(path: &str) -> Result<Box<dyn Read>> {
    if path == "-" {
        Ok(Box::new(io::stdin().lock()))
    } else {
        let file =
            File::open(path).with_context(|| format!("Failed to open for reading: {path:?}"))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

fn open_output(path: &str) -> Result<Box<dyn Write>> {
    if path == "-" {
        Ok(Box::new(io::stdout().lock()))
    } else {
        let file =
            File::create(path).with_context(|| format!("Failed to open for writing: {path:?}"))?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

/// The trailing extension of a path, dot included, as the command line
/// sees it.
fn path_extension(path: &str) -> Option<&str> {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| &path[path.len() - e.len() - 1..])
}

pub fn compress_main(cli: &CompressCli) -> Result<()> {
    let format = Format::from_name(&cli.format);
    if format == Format::Unknown {
        bail!("Unsupported compression format: {:?}", cli.format);
    }

    let mut reader = open_input(&cli.input)?;

    // With no explicit output, the input is replaced by a file with the
    // format's extension appended.
    let mut remove_input = false;
    let output = match &cli.output {
        Some(output) => output.clone(),
        None if cli.input == "-" => "-".to_owned(),
        None => {
            remove_input = true;
            format!("{}{}", cli.input, format.extension())
        }
    };

    let writer = open_output(&output)?;
    let mut writer = CompressedWriter::new(writer, format)
        .with_context(|| format!("Failed to initialize {format} encoder"))?;

    io::copy(&mut reader, &mut writer).context("Failed to compress data")?;
    writer.finish().context("Failed to finalize stream")?.flush()?;

    if remove_input {
        fs::remove_file(&cli.input)
            .with_context(|| format!("Failed to remove: {:?}", cli.input))?;
    }

    Ok(())
}

pub fn decompress_main(cli: &DecompressCli) -> Result<()> {
    let mut reader = open_input(&cli.input)?;

    // Sniff the format from the head of the stream, then stitch the
    // consumed bytes back in front so the input never needs to be seekable.
    let mut head = vec![0u8; 4096];
    let mut n_read = 0;
    while n_read < head.len() {
        let n = reader.read(&mut head[n_read..])?;
        if n == 0 {
            break;
        }
        n_read += n;
    }
    head.truncate(n_read);

    let format = Format::from_magic(&head);
    if !format.is_compressed() {
        bail!("Input file is not a supported compressed type!");
    }

    let mut remove_input = false;
    let output = match &cli.output {
        Some(output) => output.clone(),
        None if cli.input == "-" => "-".to_owned(),
        None => {
            let Some(ext) = path_extension(&cli.input) else {
                bail!("Input file is not a supported type!");
            };
            if ext != format.extension() {
                bail!("Input file is not a supported type!");
            }

            // Trims by character set, not by literal suffix.
            let output = cli.input.trim_end_matches(|c| ext.contains(c)).to_owned();
            remove_input = true;
            info!("Decompressing to [{output}]");

            output
        }
    };

    let mut writer = open_output(&output)?;

    let chained = Cursor::new(head).chain(reader);
    let mut decoder = CompressedReader::with_format(chained, format)
        .with_context(|| format!("Failed to initialize {format} decoder"))?;

    io::copy(&mut decoder, &mut writer).context("Failed to decompress data")?;
    writer.flush()?;

    if remove_input {
        fs::remove_file(&cli.input)
            .with_context(|| format!("Failed to remove: {:?}", cli.input))?;
    }

    Ok(())
}

/// Compress a file. The input and output can be '-' for stdin/stdout. With
/// no output specified, the input file is replaced by one suffixed with the
/// format's file extension.
#[derive(Debug, Parser)]
pub struct CompressCli {
    /// Compression format.
    #[arg(long, default_value = "gzip")]
    pub format: String,

    /// Path to input file.
    pub input: String,

    /// Path to output file.
    pub output: Option<String>,
}

/// Detect the format of a compressed file and decompress it. The input and
/// output can be '-' for stdin/stdout. With no output specified, the input
/// file is replaced by one with its archive extension removed.
#[derive(Debug, Parser)]
pub struct DecompressCli {
    /// Path to input file.
    pub input: String,

    /// Path to output file.
    pub output: Option<String>,
}
