// SPDX-FileCopyrightText: 2024-2025 Andrew Gunnerson
// SPDX-License-Identifier: GPL-3.0-only

//! Android fstab patching: dropping dm-verity and forced-encryption flags
//! from the fs_mgr_flags column so the kernel boots images whose verity
//! metadata has been invalidated.

use std::borrow::Cow;

use bstr::ByteSlice;
use tracing::info;

/// Flags disabled when verity is not kept. Matching is by prefix on the
/// whole flag token.
static VERITY_PATTERNS: &[&[u8]] = &[
    b"verifyatboot",
    b"verify",
    b"avb_keys",
    b"avb",
    b"support_scfs",
    b"fsverity",
];

/// Flags disabled when forced encryption is not kept.
static ENCRYPTION_PATTERNS: &[&[u8]] = &[b"forceencrypt", b"forcefdeorfbe", b"fileencryption"];

/// Remove verity-related flags from fstab contents.
pub fn patch_verity(data: &[u8]) -> Vec<u8> {
    patch_fstab(data, VERITY_PATTERNS)
}

/// Remove forced-encryption flags from fstab contents.
pub fn patch_encryption(data: &[u8]) -> Vec<u8> {
    patch_fstab(data, ENCRYPTION_PATTERNS)
}

fn patch_fstab(data: &[u8], patterns: &[&[u8]]) -> Vec<u8> {
    let mut result: Vec<Cow<'_, [u8]>> = vec![];

    for line in data.split(|&b| b == b'\n') {
        if line.is_empty() || line[0] == b'#' {
            result.push(Cow::Borrowed(line));
            continue;
        }

        let fields = line.fields().collect::<Vec<_>>();
        if fields.len() < 5 {
            result.push(Cow::Borrowed(line));
            continue;
        }

        // The 5th column is fs_mgr_flags.
        let surviving = fields[4]
            .split(|&b| b == b',')
            .filter(|flag| {
                let drop = patterns.iter().any(|p| flag.starts_with(p));
                if drop {
                    info!("Remove pattern [{}]", flag.as_bstr());
                }
                !drop
            })
            .collect::<Vec<_>>();

        let mut new_line = fields[..4].join(&b' ');
        new_line.push(b' ');
        new_line.extend_from_slice(&surviving.join(&b','));

        if fields.len() > 5 {
            new_line.push(b' ');
            new_line.extend_from_slice(&fields[5..].join(&b' '));
        }

        result.push(Cow::Owned(new_line));
    }

    result.join(&b'\n')
}

#[cfg(test)]
mod tests {
    use super::{patch_encryption, patch_verity};

    #[test]
    fn drop_encryption_flag() {
        let fstab = b"# Android fstab file.\n\
            /dev/block/by-name/system / ext4 ro wait,avb\n\
            /dev/block/by-name/userdata /data ext4 noatime misc,forceencrypt=footer,whatever,blabla\n";

        let patched = patch_encryption(fstab);
        let expected: &[u8] = b"# Android fstab file.\n\
            /dev/block/by-name/system / ext4 ro wait,avb\n\
            /dev/block/by-name/userdata /data ext4 noatime misc,whatever,blabla\n";

        assert_eq!(patched, expected);
    }

    #[test]
    fn drop_verity_flags() {
        let fstab =
            b"/dev/block/by-name/vendor /vendor ext4 ro wait,verify,slotselect extra trailing";

        let patched = patch_verity(fstab);
        assert_eq!(
            patched,
            b"/dev/block/by-name/vendor /vendor ext4 ro wait,slotselect extra trailing",
        );
    }

    #[test]
    fn prefix_matching_covers_arguments() {
        let fstab = b"src mnt ext4 defaults avb_keys=/avb/q.avbpubkey,fileencryption=ice";

        let patched = patch_verity(&patch_encryption(fstab));
        assert_eq!(patched, b"src mnt ext4 defaults ");
    }

    #[test]
    fn short_and_comment_lines_untouched() {
        let fstab = b"# comment verify\n\none two three four\n";

        assert_eq!(patch_verity(fstab), fstab);
    }

    #[test]
    fn final_newline_preserved() {
        let with_newline = b"src mnt ext4 defaults verify\n";
        let without_newline = b"src mnt ext4 defaults verify";

        assert_eq!(patch_verity(with_newline), b"src mnt ext4 defaults \n");
        assert_eq!(patch_verity(without_newline), b"src mnt ext4 defaults ");
    }
}
