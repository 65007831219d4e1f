// SPDX-FileCopyrightText: 2024-2025 Andrew Gunnerson
// SPDX-License-Identifier: GPL-3.0-only

use std::{path::Path, process};

use anyhow::{bail, Context, Result};
use clap::Parser;

use crate::format::cpio::Cpio;

fn parse_mode(mode: &str) -> Result<u32> {
    u32::from_str_radix(mode, 8).with_context(|| format!("Invalid mode: {mode:?}"))
}

/// Run the commands against the archive in order. `ls`, `test`, and
/// `exists` terminate the process with their respective exit codes; every
/// other command falls through to a final re-dump of the archive to the
/// input path.
pub fn cpio_main(cli: &CpioCli) -> Result<()> {
    let path = Path::new(&cli.file);

    let mut cpio = if path.exists() {
        Cpio::load_from_file(path).with_context(|| format!("Failed to load cpio: {path:?}"))?
    } else {
        Cpio::new()
    };

    for command in &cli.commands {
        if command.starts_with('#') {
            continue;
        }

        let cmd = command.split(' ').collect::<Vec<_>>();

        match cmd[0] {
            "test" => process::exit(cpio.test()),
            "restore" => cpio.restore().context("Failed to restore ramdisk")?,
            "patch" => cpio.patch(),
            "exists" => match cmd.get(1) {
                Some(entry) => {
                    if cpio.exists(entry) {
                        process::exit(0);
                    } else {
                        process::exit(1);
                    }
                }
                None => bail!("exists: missing entry name"),
            },
            "backup" => match cmd.get(1) {
                Some(origin) => {
                    let skip_compress = cmd.get(2) == Some(&"-n");
                    cpio.backup(Path::new(origin), skip_compress)
                        .with_context(|| format!("Failed to back up from: {origin:?}"))?;
                }
                None => bail!("backup: missing origin path"),
            },
            "rm" => {
                let (path, recursive) = match (cmd.get(1), cmd.get(2)) {
                    (Some(&"-r"), Some(path)) => (*path, true),
                    (Some(path), _) => (*path, false),
                    _ => bail!("rm: missing entry name"),
                };
                cpio.rm(path, recursive);
            }
            "mv" => match (cmd.get(1), cmd.get(2)) {
                (Some(from), Some(to)) => {
                    cpio.mv(from, to).context("Failed to move entry")?;
                }
                _ => bail!("mv: missing source or destination"),
            },
            "ln" => match (cmd.get(1), cmd.get(2)) {
                (Some(target), Some(name)) => cpio.ln(target, name),
                _ => bail!("ln: missing target or link name"),
            },
            "mkdir" => match (cmd.get(1), cmd.get(2)) {
                (Some(mode), Some(dir)) => cpio.mkdir(parse_mode(mode)?, dir),
                _ => bail!("mkdir: missing mode or directory"),
            },
            "add" => match (cmd.get(1), cmd.get(2), cmd.get(3)) {
                (Some(mode), Some(entry), Some(file)) => {
                    cpio.add(parse_mode(mode)?, entry, Path::new(file))
                        .with_context(|| format!("Failed to add: {file:?}"))?;
                }
                _ => bail!("add: missing mode, entry, or input file"),
            },
            "extract" => {
                let (entry, out) = match (cmd.get(1), cmd.get(2)) {
                    (Some(entry), Some(out)) => (Some(*entry), Some(Path::new(*out))),
                    _ => (None, None),
                };
                cpio.extract(entry, out).context("Failed to extract")?;
            }
            "ls" => {
                match (cmd.get(1), cmd.get(2)) {
                    (None, _) => cpio.ls("/", true),
                    (Some(path), None) => cpio.ls(path, false),
                    (Some(flag), Some(path)) => cpio.ls(path, *flag == "-r"),
                }
                process::exit(0);
            }
            _ => {}
        }
    }

    cpio.dump(path)
        .with_context(|| format!("Failed to dump cpio: {path:?}"))?;

    Ok(())
}

/// Perform cpio commands against an archive, in place.
///
/// Each command is a single argument; quote commands that take their own
/// arguments. Supported commands:
///
///   exists ENTRY, ls [-r] [PATH], rm [-r] ENTRY, mkdir MODE ENTRY,
///   ln TARGET ENTRY, mv SOURCE DEST, add MODE ENTRY INFILE,
///   extract [ENTRY OUT], test, patch, backup ORIG [-n], restore
#[derive(Debug, Parser)]
pub struct CpioCli {
    /// Path to cpio archive.
    pub file: String,

    /// Commands to perform.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub commands: Vec<String>,
}
