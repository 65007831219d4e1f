// SPDX-FileCopyrightText: 2024-2025 Andrew Gunnerson
// SPDX-License-Identifier: GPL-3.0-only

use std::{path::PathBuf, process};

use anyhow::{Context, Result};
use clap::Parser;

use crate::patch::hexpatch::hex_patch;

pub fn hexpatch_main(cli: &HexpatchCli) -> Result<()> {
    let patched = hex_patch(&cli.file, &cli.from, &cli.to)
        .with_context(|| format!("Failed to patch: {:?}", cli.file))?;

    // The exit code reports whether anything matched.
    if !patched {
        process::exit(1);
    }

    Ok(())
}

/// Search for a hex pattern in a file and replace it in place. The
/// replacement must have the same length as the pattern.
#[derive(Debug, Parser)]
pub struct HexpatchCli {
    /// Path to file to patch.
    pub file: PathBuf,

    /// Hex pattern to search for.
    pub from: String,

    /// Hex pattern to replace with.
    pub to: String,
}
