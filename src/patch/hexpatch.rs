// SPDX-FileCopyrightText: 2024-2025 Andrew Gunnerson
// SPDX-License-Identifier: GPL-3.0-only

use std::{fs::OpenOptions, io, path::Path};

use memmap2::MmapMut;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid hex pattern")]
    BadHex(#[from] hex::FromHexError),
    #[error("Patterns have mismatched lengths: {from} != {to}")]
    MismatchedLengths { from: usize, to: usize },
    #[error("I/O error")]
    Io(#[from] io::Error),
}

type Result<T> = std::result::Result<T, Error>;

/// Replace every occurrence of the hex pattern `from_hex` in the file with
/// `to_hex`, in place through a writable memory map. Both patterns must
/// decode to the same length, so the file size never changes. The scan
/// advances one byte per step, so overlapping occurrences are all patched,
/// and later occurrences are matched against already-patched bytes. Returns
/// true if at least one patch was applied.
pub fn hex_patch(path: &Path, from_hex: &str, to_hex: &str) -> Result<bool> {
    let from = hex::decode(from_hex)?;
    let to = hex::decode(to_hex)?;

    if from.len() != to.len() {
        return Err(Error::MismatchedLengths {
            from: from.len(),
            to: to.len(),
        });
    } else if from.is_empty() {
        return Ok(false);
    }

    let file = OpenOptions::new().read(true).write(true).open(path)?;
    let mut map = unsafe { MmapMut::map_mut(&file)? };

    let mut patched = false;
    let mut offset = 0;

    while offset + from.len() <= map.len() {
        if map[offset] == from[0] && map[offset..offset + from.len()] == from[..] {
            map[offset..offset + to.len()].copy_from_slice(&to);
            info!("Patch @ 0x{offset:08X} [{from_hex}] -> [{to_hex}]");
            patched = true;
        }

        offset += 1;
    }

    map.flush()?;

    Ok(patched)
}

#[cfg(test)]
mod tests {
    use std::{fs, io::Write};

    use assert_matches::assert_matches;

    use super::{hex_patch, Error};

    #[test]
    fn patch_all_occurrences() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"12345678901234567890").unwrap();

        let patched = hex_patch(file.path(), "31323334", "35363738").unwrap();
        assert!(patched);

        let data = fs::read(file.path()).unwrap();
        assert_eq!(data, b"56785678905678567890");
    }

    #[test]
    fn no_match_leaves_file_alone() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello world").unwrap();

        let patched = hex_patch(file.path(), "ff00ff", "010101").unwrap();
        assert!(!patched);

        let data = fs::read(file.path()).unwrap();
        assert_eq!(data, b"hello world");
    }

    #[test]
    fn bad_patterns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"data").unwrap();

        assert_matches!(
            hex_patch(file.path(), "0102", "010203"),
            Err(Error::MismatchedLengths { from: 2, to: 3 })
        );
        assert_matches!(hex_patch(file.path(), "zz", "zz"), Err(Error::BadHex(_)));
    }
}
