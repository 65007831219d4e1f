// SPDX-FileCopyrightText: 2024-2025 Andrew Gunnerson
// SPDX-License-Identifier: GPL-3.0-only

use std::{
    collections::BTreeMap,
    fmt,
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
    str,
};

use bstr::ByteSlice;
use memmap2::Mmap;
use thiserror::Error;
use tracing::{info, warn};

use crate::{format::compression, patch::fstab, util};

const MAGIC_NEW: &[u8; 6] = b"070701";
const CPIO_TRAILER: &str = "TRAILER!!!";

const HEADER_SIZE: usize = 110;

/// First inode number assigned when serializing.
const INODE_BASE: u64 = 300000;

pub const S_IFMT: u32 = 0o170000;
pub const S_IFDIR: u32 = 0o040000;
pub const S_IFREG: u32 = 0o100000;
pub const S_IFLNK: u32 = 0o120000;
pub const S_IFBLK: u32 = 0o060000;
pub const S_IFCHR: u32 = 0o020000;

/// Ramdisk status flag: the ramdisk has already been patched.
pub const MAGISK_PATCHED: i32 = 1 << 0;
/// Ramdisk status flag: the ramdisk was modified by an unsupported root
/// solution and cannot be patched.
pub const UNSUPPORTED_CPIO: i32 = 1 << 1;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid cpio magic")]
    InvalidMagic,
    #[error("Bad cpio header: {0}")]
    BadHeader(&'static str),
    #[error("Unknown entry type: {0:o}")]
    UnknownEntryType(u32),
    #[error("No such entry: {0:?}")]
    NoSuchEntry(String),
    #[error("Path cannot end with / for add")]
    PathEndsInSlash,
    #[error("Unsupported file type: {0:?}")]
    UnsupportedFileType(std::path::PathBuf),
    #[error("Compression error")]
    Compression(#[from] compression::Error),
    #[error("I/O error")]
    Io(#[from] io::Error),
}

type Result<T> = std::result::Result<T, Error>;

/// Parse a u32 formatted as an ASCII 8-char wide hex string.
fn x8u(buf: &[u8]) -> Result<u32> {
    let s = str::from_utf8(buf).map_err(|_| Error::BadHeader("non-ASCII field"))?;

    u32::from_str_radix(s, 16).map_err(|_| Error::BadHeader("invalid hex field"))
}

/// Record headers, names, and data are all aligned to 4 bytes.
fn align_4(pos: usize) -> usize {
    (pos + 3) & !3
}

/// Normalize an archive path: resolve `.`/`..` components textually and
/// strip all leading slashes. Traversal above the root is silently clamped.
pub fn norm_path(path: &str) -> String {
    let mut components = vec![];

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                components.pop();
            }
            p => components.push(p),
        }
    }

    components.join("/")
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct CpioEntry {
    /// File type and permission bits in `st_mode` form.
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub rdev_major: u32,
    pub rdev_minor: u32,
    /// File contents. Symlinks store their target here.
    pub data: Vec<u8>,
}

impl fmt::Debug for CpioEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CpioEntry")
            .field("mode", &format_args!("{:o}", self.mode))
            .field("uid", &self.uid)
            .field("gid", &self.gid)
            .field("rdev_major", &self.rdev_major)
            .field("rdev_minor", &self.rdev_minor)
            .field("data", &format_args!("<{} bytes>", self.data.len()))
            .finish()
    }
}

impl fmt::Display for CpioEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:>8}{:>8}{:>8}{:>4}:{:<8}",
            self.mode_string(),
            self.uid,
            self.gid,
            self.data.len(),
            self.rdev_major,
            self.rdev_minor,
        )
    }
}

impl CpioEntry {
    pub fn file_type(&self) -> u32 {
        self.mode & S_IFMT
    }

    /// `ls -l`-style type and permission column.
    fn mode_string(&self) -> String {
        let mut buf = String::with_capacity(10);

        buf.push(match self.file_type() {
            S_IFDIR => 'd',
            S_IFREG => '-',
            S_IFLNK => 'l',
            S_IFBLK => 'b',
            S_IFCHR => 'c',
            _ => '?',
        });

        for shift in [6u32, 3, 0] {
            let bits = self.mode >> shift;
            buf.push(if bits & 0o4 != 0 { 'r' } else { '-' });
            buf.push(if bits & 0o2 != 0 { 'w' } else { '-' });
            buf.push(if bits & 0o1 != 0 { 'x' } else { '-' });
        }

        buf
    }

    /// Compress the entry data as a standalone xz stream. Only regular
    /// files are compressed.
    fn compress(&mut self) -> bool {
        if self.file_type() != S_IFREG {
            return false;
        }

        match compression::xz_compress(&self.data) {
            Ok(compressed) => {
                self.data = compressed;
                true
            }
            Err(e) => {
                warn!("xz compression failed: {e}");
                false
            }
        }
    }

    /// Inverse of [`Self::compress`].
    fn decompress(&mut self) -> bool {
        if self.file_type() != S_IFREG {
            return false;
        }

        match compression::xz_decompress(&self.data) {
            Ok(decompressed) => {
                self.data = decompressed;
                true
            }
            Err(e) => {
                warn!("xz decompression failed: {e}");
                false
            }
        }
    }
}

/// An in-memory newc cpio archive. Names are stored normalized (see
/// [`norm_path`]) and the key sequence is always sorted and unique. The
/// `.`, `..`, and `TRAILER!!!` pseudo-entries never appear in the map.
#[derive(Clone, Default)]
pub struct Cpio {
    entries: BTreeMap<String, CpioEntry>,
}

impl Cpio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn get(&self, path: &str) -> Option<&CpioEntry> {
        self.entries.get(path)
    }

    /// Insert an entry at a normalized path, replacing any existing entry.
    pub fn insert(&mut self, path: &str, entry: CpioEntry) {
        self.entries.insert(norm_path(path), entry);
    }

    pub fn exists(&self, path: &str) -> bool {
        self.entries.contains_key(&norm_path(path))
    }

    /// Parse archive records from a buffer. Concatenated archives are
    /// supported: when a trailer record is followed by another magic, the
    /// parse resumes there.
    pub fn load_from_data(&mut self, data: &[u8]) -> Result<()> {
        let mut pos = 0;

        while pos + HEADER_SIZE <= data.len() {
            let header = &data[pos..pos + HEADER_SIZE];
            if &header[..6] != MAGIC_NEW {
                return Err(Error::InvalidMagic);
            }
            pos += HEADER_SIZE;

            let name_size = x8u(&header[94..102])? as usize;
            if name_size == 0 || pos + name_size > data.len() {
                return Err(Error::BadHeader("name out of bounds"));
            }

            let name = data[pos..pos + name_size].trim_end_with(|c| c == '\0');
            let name = str::from_utf8(name)
                .map_err(|_| Error::BadHeader("name is not UTF-8"))?
                .to_owned();
            pos = align_4(pos + name_size);

            if name == "." || name == ".." {
                continue;
            }
            if name == CPIO_TRAILER {
                if pos >= data.len() {
                    break;
                }

                // Another archive may be concatenated after the trailer.
                match memchr::memmem::find(&data[pos..], MAGIC_NEW) {
                    Some(offset) => {
                        pos += offset;
                        continue;
                    }
                    None => break,
                }
            }

            let file_size = x8u(&header[54..62])? as usize;
            if pos + file_size > data.len() {
                return Err(Error::BadHeader("data out of bounds"));
            }

            self.entries.insert(
                name,
                CpioEntry {
                    mode: x8u(&header[14..22])?,
                    uid: x8u(&header[22..30])?,
                    gid: x8u(&header[30..38])?,
                    rdev_major: x8u(&header[78..86])?,
                    rdev_minor: x8u(&header[86..94])?,
                    data: data[pos..pos + file_size].to_vec(),
                },
            );
            pos = align_4(pos + file_size);
        }

        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading cpio: [{}]", path.display());

        let file = File::open(path)?;
        let map = unsafe { Mmap::map(&file)? };

        let mut cpio = Self::new();
        cpio.load_from_data(&map)?;

        Ok(cpio)
    }

    pub fn dump(&self, path: &Path) -> Result<()> {
        info!("Dumping cpio [{}]", path.display());

        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;

        Ok(())
    }

    /// Serialize in newc format: records in ascending name order, inode
    /// numbers counting up from 300000, and a final trailer record. Padding
    /// bytes are always zero.
    pub fn write_to(&self, mut writer: impl Write) -> Result<()> {
        // Each record is built as header, name, data, with zero padding to
        // the next 4-byte boundary after the name and after the data. The
        // running offset drives the padding.
        fn pad(writer: &mut dyn Write, pos: &mut usize) -> Result<()> {
            let n = align_4(*pos) - *pos;
            writer.write_all(&[0u8; 3][..n])?;
            *pos += n;

            Ok(())
        }

        let mut pos = 0usize;
        let mut inode = INODE_BASE;

        for (name, entry) in &self.entries {
            let header = format!(
                "070701{inode:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}",
                entry.mode,
                entry.uid,
                entry.gid,
                1, // nlink
                0, // mtime
                entry.data.len(),
                0, // devmajor
                0, // devminor
                entry.rdev_major,
                entry.rdev_minor,
                name.len() + 1, // namesize, including the NUL
                0,              // chksum
            );

            writer.write_all(header.as_bytes())?;
            writer.write_all(name.as_bytes())?;
            writer.write_all(b"\0")?;
            pos += header.len() + name.len() + 1;
            pad(&mut writer, &mut pos)?;

            writer.write_all(&entry.data)?;
            pos += entry.data.len();
            pad(&mut writer, &mut pos)?;

            inode += 1;
        }

        let trailer = format!(
            "070701{inode:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}",
            0o755, 0, 0, 1, 0, 0, 0, 0, 0, 0, 11, 0,
        );
        writer.write_all(trailer.as_bytes())?;
        writer.write_all(CPIO_TRAILER.as_bytes())?;
        writer.write_all(b"\0")?;
        pos += trailer.len() + CPIO_TRAILER.len() + 1;
        pad(&mut writer, &mut pos)?;

        Ok(())
    }

    pub fn rm(&mut self, path: &str, recursive: bool) {
        let path = norm_path(path);

        if self.entries.remove(&path).is_some() {
            info!("Removed entry [{path}]");
        }

        if recursive {
            let prefix = format!("{path}/");
            let targets = self
                .entries
                .keys()
                .filter(|name| name.starts_with(&prefix))
                .cloned()
                .collect::<Vec<_>>();

            for name in targets {
                self.entries.remove(&name);
                info!("Removed entry [{name}]");
            }
        }
    }

    pub fn mkdir(&mut self, mode: u32, dir: &str) {
        self.entries.insert(
            norm_path(dir),
            CpioEntry {
                mode: mode | S_IFDIR,
                ..Default::default()
            },
        );
        info!("Create directory [{dir}] ({mode:04o})");
    }

    pub fn ln(&mut self, target: &str, link_name: &str) {
        let mut link_target = norm_path(target);
        if target.starts_with('/') {
            link_target.insert(0, '/');
        }

        self.entries.insert(
            norm_path(link_name),
            CpioEntry {
                mode: S_IFLNK,
                data: link_target.into_bytes(),
                ..Default::default()
            },
        );
        info!("Create symlink [{link_name}] -> [{target}]");
    }

    pub fn mv(&mut self, from: &str, to: &str) -> Result<()> {
        let from = norm_path(from);
        let to = norm_path(to);

        let entry = self
            .entries
            .remove(&from)
            .ok_or_else(|| Error::NoSuchEntry(from.clone()))?;
        self.entries.insert(to.clone(), entry);
        info!("Move [{from}] -> [{to}]");

        Ok(())
    }

    pub fn add(&mut self, mode: u32, path: &str, file: &Path) -> Result<()> {
        if path.ends_with('/') {
            return Err(Error::PathEndsInSlash);
        }

        let metadata = fs::metadata(file)?;
        let file_type = metadata.file_type();

        let mut mode = mode;
        let mut rdev_major = 0;
        let mut rdev_minor = 0;
        let mut content = vec![];

        if file_type.is_file() {
            content = fs::read(file)?;
            mode |= S_IFREG;
        } else {
            #[cfg(unix)]
            {
                use std::os::unix::fs::{FileTypeExt, MetadataExt};

                if file_type.is_block_device() {
                    mode |= S_IFBLK;
                } else if file_type.is_char_device() {
                    mode |= S_IFCHR;
                } else {
                    return Err(Error::UnsupportedFileType(file.to_owned()));
                }

                rdev_major = rustix::fs::major(metadata.rdev());
                rdev_minor = rustix::fs::minor(metadata.rdev());
            }

            #[cfg(not(unix))]
            return Err(Error::UnsupportedFileType(file.to_owned()));
        }

        self.entries.insert(
            norm_path(path),
            CpioEntry {
                mode,
                uid: 0,
                gid: 0,
                rdev_major,
                rdev_minor,
                data: content,
            },
        );
        info!("Add file [{path}] ({mode:04o})");

        Ok(())
    }

    fn extract_entry(&self, path: &str, out: &Path) -> Result<()> {
        let entry = self
            .entries
            .get(path)
            .ok_or_else(|| Error::NoSuchEntry(path.to_owned()))?;

        info!("Extracting entry [{path}] to [{}]", out.display());

        if let Some(parent) = out.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let perms = entry.mode & 0o777;

        match entry.file_type() {
            S_IFDIR => {
                #[cfg(unix)]
                {
                    use std::os::unix::fs::DirBuilderExt;
                    fs::DirBuilder::new().mode(perms).create(out)?;
                }
                #[cfg(not(unix))]
                fs::create_dir(out)?;

                Ok(())
            }
            S_IFREG => {
                #[cfg(unix)]
                let mut file = {
                    use std::os::unix::fs::OpenOptionsExt;
                    fs::OpenOptions::new()
                        .write(true)
                        .create(true)
                        .truncate(true)
                        .mode(perms)
                        .open(out)?
                };
                #[cfg(not(unix))]
                let mut file = File::create(out)?;

                file.write_all(&entry.data)?;

                Ok(())
            }
            S_IFLNK => {
                let target = entry.data.replace(b"\0", b"");

                #[cfg(unix)]
                std::os::unix::fs::symlink(target.to_os_str_lossy(), out)?;
                #[cfg(not(unix))]
                let _ = target;

                Ok(())
            }
            S_IFBLK | S_IFCHR => {
                // Device nodes can only be created on Unix-like systems.
                #[cfg(unix)]
                {
                    use rustix::fs::{makedev, mknodat, FileType, Mode, CWD};

                    let file_type = if entry.file_type() == S_IFBLK {
                        FileType::BlockDevice
                    } else {
                        FileType::CharacterDevice
                    };
                    let dev = makedev(entry.rdev_major, entry.rdev_minor);

                    mknodat(CWD, out, file_type, Mode::from_bits_truncate(perms), dev)
                        .map_err(io::Error::from)?;
                }

                Ok(())
            }
            t => Err(Error::UnknownEntryType(t)),
        }
    }

    /// Extract a single entry to the given path, or, when no entry is
    /// specified, every entry to its own path under the current directory.
    pub fn extract(&self, path: Option<&str>, out: Option<&Path>) -> Result<()> {
        if let (Some(path), Some(out)) = (path, out) {
            return self.extract_entry(&norm_path(path), out);
        }

        for name in self.entries.keys() {
            self.extract_entry(name, Path::new(name))?;
        }

        Ok(())
    }

    /// Print the entries beneath `path`, one per line. When not recursive,
    /// entries nested more than one level below `path` are hidden.
    pub fn ls(&self, path: &str, recursive: bool) {
        let path = {
            let normalized = norm_path(path);
            if normalized.is_empty() {
                normalized
            } else {
                format!("/{normalized}")
            }
        };

        for (name, entry) in &self.entries {
            let full = format!("/{name}");
            let Some(rem) = full.strip_prefix(&path) else {
                continue;
            };
            if !rem.is_empty() && !rem.starts_with('/') {
                continue;
            }
            if !recursive && !rem.is_empty() && rem.matches('/').count() > 1 {
                continue;
            }

            println!("{entry}\t{name}");
        }
    }

    /// Inspect the ramdisk's modification status.
    pub fn test(&self) -> i32 {
        for file in [
            "sbin/launch_daemonsu.sh",
            "sbin/su",
            "init.xposed.rc",
            "boot/sbin/launch_daemonsu.sh",
        ] {
            if self.exists(file) {
                return UNSUPPORTED_CPIO;
            }
        }

        for file in [".backup/.magisk", "init.magisk.rc", "overlay/init.magisk.rc"] {
            if self.exists(file) {
                return MAGISK_PATCHED;
            }
        }

        0
    }

    /// Apply the ramdisk patches controlled by the `KEEPVERITY` and
    /// `KEEPFORCEENCRYPT` environment flags: strip dm-verity and forced
    /// encryption from fstab files and drop the verity key.
    pub fn patch(&mut self) {
        let keep_verity = util::check_env("KEEPVERITY");
        let keep_force_encrypt = util::check_env("KEEPFORCEENCRYPT");

        info!("Patch with flag KEEPVERITY=[{keep_verity}] KEEPFORCEENCRYPT=[{keep_force_encrypt}]");

        let names = self.entries.keys().cloned().collect::<Vec<_>>();

        for name in names {
            let entry = &self.entries[&name];
            let is_fstab = (!keep_verity || !keep_force_encrypt)
                && entry.file_type() == S_IFREG
                && !name.starts_with(".backup")
                && !name.starts_with("twrp")
                && !name.starts_with("recovery")
                && name.starts_with("fstab");

            if !keep_verity {
                if is_fstab {
                    info!("Found fstab file [{name}]");

                    let entry = self.entries.get_mut(&name).unwrap();
                    entry.data = fstab::patch_verity(&entry.data);
                } else if name == "verity_key" {
                    self.rm(&name, false);
                    continue;
                }
            }

            if !keep_force_encrypt && is_fstab {
                let entry = self.entries.get_mut(&name).unwrap();
                entry.data = fstab::patch_encryption(&entry.data);
            }
        }
    }

    /// Record the differences from the original ramdisk at `origin` under
    /// `.backup/`, so [`Self::restore`] can undo the modifications later.
    /// Entries that only exist here are recorded in `.backup/.rmlist` as a
    /// NUL-delimited name list.
    pub fn backup(&mut self, origin: &Path, skip_compress: bool) -> Result<()> {
        let mut backups = BTreeMap::<String, CpioEntry>::new();
        let mut rm_list = Vec::<u8>::new();

        backups.insert(
            ".backup".to_owned(),
            CpioEntry {
                mode: S_IFDIR,
                ..Default::default()
            },
        );

        let mut origin_cpio = Cpio::load_from_file(origin)?;
        origin_cpio.rm(".backup", true);
        self.rm(".backup", true);

        let mut backup_entry = |name: &str, mut entry: CpioEntry| {
            let mut backup_path = format!(".backup/{name}");
            if !skip_compress && entry.compress() {
                backup_path.push_str(".xz");
            }

            info!("Backup [{name}] -> [{backup_path}]");
            backups.insert(backup_path, entry);
        };

        let mut record_entry = |name: &str, rm_list: &mut Vec<u8>| {
            info!("Record new entry [{name}] -> [.backup/.rmlist]");
            rm_list.extend(name.as_bytes());
            rm_list.push(b'\0');
        };

        // Both name sequences are sorted, so the diff is a 3-way merge walk.
        let mut lhs = origin_cpio.entries.into_iter().peekable();
        let self_names = self.entries.keys().cloned().collect::<Vec<_>>();
        let mut rhs = self_names.into_iter().peekable();

        loop {
            match (lhs.peek(), rhs.peek()) {
                (Some((lname, _)), Some(rname)) => match lname.cmp(rname) {
                    std::cmp::Ordering::Less => {
                        // Entry was removed; back up the original.
                        let (name, entry) = lhs.next().unwrap();
                        backup_entry(&name, entry);
                    }
                    std::cmp::Ordering::Equal => {
                        let (name, entry) = lhs.next().unwrap();
                        let rname = rhs.next().unwrap();

                        if self.entries[&rname].data != entry.data {
                            backup_entry(&name, entry);
                        }
                    }
                    std::cmp::Ordering::Greater => {
                        let rname = rhs.next().unwrap();
                        record_entry(&rname, &mut rm_list);
                    }
                },
                (Some(_), None) => {
                    let (name, entry) = lhs.next().unwrap();
                    backup_entry(&name, entry);
                }
                (None, Some(_)) => {
                    let rname = rhs.next().unwrap();
                    record_entry(&rname, &mut rm_list);
                }
                (None, None) => break,
            }
        }

        if !rm_list.is_empty() {
            backups.insert(
                ".backup/.rmlist".to_owned(),
                CpioEntry {
                    mode: S_IFREG,
                    data: rm_list,
                    ..Default::default()
                },
            );
        }

        self.entries.extend(backups);

        Ok(())
    }

    /// Undo modifications using the `.backup/` entries created by
    /// [`Self::backup`]. If no backup data exists at all, the whole archive
    /// is emptied, matching the semantics of a ramdisk that was created
    /// from scratch.
    pub fn restore(&mut self) -> Result<()> {
        let mut backups = BTreeMap::<String, CpioEntry>::new();
        let mut rm_list = Vec::<u8>::new();

        let backup_names = self
            .entries
            .keys()
            .filter(|name| name.starts_with(".backup/"))
            .cloned()
            .collect::<Vec<_>>();

        for name in backup_names {
            let mut entry = self.entries.remove(&name).unwrap();

            if name == ".backup/.rmlist" {
                rm_list.extend(&entry.data);
            } else if name != ".backup/.magisk" {
                let stripped = &name[".backup/".len()..];
                let new_name = if name.ends_with(".xz") && entry.decompress() {
                    stripped[..stripped.len() - ".xz".len()].to_owned()
                } else {
                    stripped.to_owned()
                };

                backups.insert(new_name, entry);
            }
        }

        self.rm(".backup", false);

        if rm_list.is_empty() && backups.is_empty() {
            self.entries.clear();
            return Ok(());
        }

        for name in rm_list.split(|&b| b == b'\0') {
            if let Ok(name) = str::from_utf8(name) {
                if !name.is_empty() {
                    self.rm(name, false);
                }
            }
        }

        self.entries.extend(backups);

        Ok(())
    }
}

impl fmt::Debug for Cpio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{align_4, norm_path};

    #[test]
    fn normalize_paths() {
        assert_eq!(norm_path("/init"), "init");
        assert_eq!(norm_path("//system//bin//sh"), "system/bin/sh");
        assert_eq!(norm_path("a/./b/../c"), "a/c");
        assert_eq!(norm_path("../../../etc"), "etc");
        assert_eq!(norm_path("."), "");
        assert_eq!(norm_path(""), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for path in ["/a/b/../c", "foo//bar/.", "../x", "a/b/c"] {
            let once = norm_path(path);
            assert_eq!(norm_path(&once), once);
        }
    }

    #[test]
    fn hex_fields() {
        assert_eq!(super::x8u(b"000493e0").unwrap(), 300000);
        assert_eq!(super::x8u(b"00000000").unwrap(), 0);
        assert!(super::x8u(b"zzzzzzzz").is_err());
    }

    #[test]
    fn record_alignment() {
        assert_eq!(align_4(0), 0);
        assert_eq!(align_4(1), 4);
        assert_eq!(align_4(4), 4);
        assert_eq!(align_4(110), 112);
    }
}
