// SPDX-FileCopyrightText: 2024-2025 Andrew Gunnerson
// SPDX-License-Identifier: GPL-3.0-only

use std::{
    env,
    io::{self, Read, Write},
};

/// Check a boolean environment flag. The flag is enabled only when the
/// variable is set to exactly `true`.
pub fn check_env(key: &str) -> bool {
    env::var(key).is_ok_and(|v| v == "true")
}

/// Read and discard exactly `size` bytes. Reaching EOF earlier is an
/// error, so skips over required stream sections can't silently come up
/// short.
pub fn skip_exact(mut reader: impl Read, mut size: u64) -> io::Result<()> {
    let mut scratch = [0u8; 8192];

    while size > 0 {
        let to_read = size.min(scratch.len() as u64) as usize;
        reader.read_exact(&mut scratch[..to_read])?;

        size -= to_read as u64;
    }

    Ok(())
}

/// Write exactly `size` zero bytes.
pub fn write_zeros(mut writer: impl Write, mut size: u64) -> io::Result<()> {
    let zeros = [0u8; 4096];

    while size > 0 {
        let to_write = size.min(zeros.len() as u64) as usize;
        writer.write_all(&zeros[..to_write])?;

        size -= to_write as u64;
    }

    Ok(())
}
