// SPDX-FileCopyrightText: 2024-2025 Andrew Gunnerson
// SPDX-License-Identifier: GPL-3.0-only

use std::{
    env,
    ffi::OsString,
    io,
    sync::atomic::{AtomicBool, Ordering},
};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cli::{boot, compress, cpio, hexpatch, payload};

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Subcommand)]
pub enum Command {
    Cleanup,
    Sha1(boot::Sha1Cli),
    Split(boot::SplitCli),
    Hexpatch(hexpatch::HexpatchCli),
    Compress(compress::CompressCli),
    Decompress(compress::DecompressCli),
    Cpio(cpio::CpioCli),
    Extract(payload::ExtractCli),
    // Recognized, but not implemented.
    Unpack(boot::StubCli),
    Repack(boot::StubCli),
    Verify(boot::StubCli),
    Sign(boot::StubCli),
    Dtb(boot::StubCli),
}

/// Boot image modification tool.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

fn init_logging(logging_initialized: &AtomicBool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    logging_initialized.store(true, Ordering::SeqCst);
}

/// Rewrite legacy argv forms into something clap can parse: leading dashes
/// on the action are stripped and `compress=<format>` becomes
/// `compress --format <format>`.
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    let mut args = args.into_iter().collect::<Vec<_>>();

    if let Some(action) = args.get(1).and_then(|a| a.to_str()) {
        let action = action.trim_start_matches('-').to_owned();

        if let Some(format) = action.strip_prefix("compress=") {
            let format = format.to_owned();
            args[1] = OsString::from("compress");
            args.insert(2, OsString::from("--format"));
            args.insert(3, OsString::from(format));
        } else {
            args[1] = OsString::from(action);
        }
    }

    args
}

pub fn main(logging_initialized: &AtomicBool) -> Result<()> {
    let cli = Cli::parse_from(normalize_args(env::args_os()));

    init_logging(logging_initialized);

    match cli.command {
        Command::Cleanup => boot::cleanup_main(),
        Command::Sha1(c) => boot::sha1_main(&c),
        Command::Split(c) => boot::split_main(&c),
        Command::Hexpatch(c) => hexpatch::hexpatch_main(&c),
        Command::Compress(c) => compress::compress_main(&c),
        Command::Decompress(c) => compress::decompress_main(&c),
        Command::Cpio(c) => cpio::cpio_main(&c),
        Command::Extract(c) => payload::extract_main(&c),
        Command::Unpack(_)
        | Command::Repack(_)
        | Command::Verify(_)
        | Command::Sign(_)
        | Command::Dtb(_) => bail!("not implemented yet"),
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use super::normalize_args;

    fn normalize(args: &[&str]) -> Vec<OsString> {
        normalize_args(args.iter().map(|a| OsString::from(*a)))
    }

    #[test]
    fn legacy_action_forms() {
        assert_eq!(
            normalize(&["magiskboot", "--cleanup"]),
            ["magiskboot", "cleanup"],
        );
        assert_eq!(
            normalize(&["magiskboot", "compress=xz", "ramdisk.cpio"]),
            ["magiskboot", "compress", "--format", "xz", "ramdisk.cpio"],
        );
        assert_eq!(
            normalize(&["magiskboot", "sha1", "boot.img"]),
            ["magiskboot", "sha1", "boot.img"],
        );
    }
}
