// SPDX-FileCopyrightText: 2024-2025 Andrew Gunnerson
// SPDX-License-Identifier: GPL-3.0-only

use std::io::{self, Cursor, Read, Write};

use flate2::{
    Compression,
    read::GzDecoder,
    write::GzEncoder,
};
use lz4_flex::frame::{FrameDecoder, FrameEncoder};
use thiserror::Error;
use xz2::{
    read::XzDecoder,
    stream::{Check, LzmaOptions, Stream},
    write::XzEncoder,
};

use crate::format::magic::{Format, LZ4_LEG_MAGIC};

/// Uncompressed block size of the legacy lz4 frame format.
const LZ4_LEGACY_BLOCK_SIZE: usize = 0x800000;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown compression format")]
    UnknownFormat,
    #[error("No codec available for format: {0:?}")]
    UnsupportedCodec(Format),
    #[error("XZ stream error")]
    XzStream(#[from] xz2::stream::Error),
    #[error("I/O error")]
    Io(#[from] io::Error),
}

type Result<T> = std::result::Result<T, Error>;

/// Encoder for the legacy lz4 frame format used by Android kernels: the
/// magic, followed by {u32 LE compressed size, compressed block} pairs with
/// a fixed 8 MiB uncompressed block size. The LG variant appends the total
/// uncompressed input size as a trailing u32 when the stream is finished.
pub struct Lz4LegacyEncoder<W: Write> {
    writer: Option<W>,
    buf: Vec<u8>,
    n_filled: usize,
    total_in: u32,
    lg: bool,
}

impl<W: Write> Lz4LegacyEncoder<W> {
    pub fn new(mut writer: W, lg: bool) -> io::Result<Self> {
        writer.write_all(LZ4_LEG_MAGIC)?;

        Ok(Self {
            writer: Some(writer),
            // We always use the max block size.
            buf: vec![0u8; LZ4_LEGACY_BLOCK_SIZE],
            n_filled: 0,
            total_in: 0,
            lg,
        })
    }

    fn write_block(&mut self, force: bool) -> io::Result<()> {
        if self.n_filled == 0 || (!force && self.n_filled < self.buf.len()) {
            // Block not fully filled yet.
            return Ok(());
        }

        // HC is currently not supported:
        // https://github.com/PSeitz/lz4_flex/issues/21
        let compressed = lz4_flex::block::compress(&self.buf[..self.n_filled]);

        if compressed.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Zero-length block in lz4 stream",
            ));
        }

        let writer = self.writer.as_mut().unwrap();
        writer.write_all(&(compressed.len() as u32).to_le_bytes())?;
        writer.write_all(&compressed)?;

        self.n_filled = 0;

        Ok(())
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.write_block(true)?;

        let mut writer = self.writer.take().unwrap();
        if self.lg {
            writer.write_all(&self.total_in.to_le_bytes())?;
        }

        Ok(writer)
    }
}

impl<W: Write> Drop for Lz4LegacyEncoder<W> {
    fn drop(&mut self) {
        if self.writer.is_some() {
            let _ = self.write_block(true);
        }
    }
}

impl<W: Write> Write for Lz4LegacyEncoder<W> {
    fn write(&mut self, mut buf: &[u8]) -> io::Result<usize> {
        let total = buf.len();

        while !buf.is_empty() {
            let to_write = buf.len().min(self.buf.len() - self.n_filled);
            self.buf[self.n_filled..self.n_filled + to_write].copy_from_slice(&buf[..to_write]);

            self.n_filled += to_write;
            self.total_in = self.total_in.wrapping_add(to_write as u32);
            self.write_block(false)?;

            buf = &buf[to_write..];
        }

        Ok(total)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.write_block(false)
    }
}

/// Decoder for the legacy lz4 frame format. The magic is expected to still
/// be present in the stream. A trailing u32 that isn't followed by block
/// data (the LG uncompressed-size trailer) is ignored, so both variants
/// decode with this type. Concatenated legacy frames are handled.
pub struct Lz4LegacyDecoder<R: Read> {
    reader: R,
    magic_read: bool,
    block: Vec<u8>,
    pos: usize,
    done: bool,
}

impl<R: Read> Lz4LegacyDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            magic_read: false,
            block: vec![],
            pos: 0,
            done: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Fill `buf` as far as the stream allows. Returns the number of bytes
    /// actually read, stopping early only at EOF.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut n_read = 0;

        while n_read < buf.len() {
            let n = self.reader.read(&mut buf[n_read..])?;
            if n == 0 {
                break;
            }
            n_read += n;
        }

        Ok(n_read)
    }

    fn next_block(&mut self) -> io::Result<bool> {
        loop {
            if !self.magic_read {
                let mut magic = [0u8; 4];
                let n = self.fill(&mut magic)?;
                if n != 4 || magic != *LZ4_LEG_MAGIC {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "Invalid legacy lz4 magic",
                    ));
                }
                self.magic_read = true;
            }

            let mut size_buf = [0u8; 4];
            let n = self.fill(&mut size_buf)?;
            if n == 0 {
                // Clean end of stream.
                return Ok(false);
            } else if n != 4 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "Truncated lz4 block size",
                ));
            }

            let block_size = u32::from_le_bytes(size_buf);

            // Another frame may follow directly (concatenated streams).
            if size_buf == *LZ4_LEG_MAGIC {
                continue;
            }

            if block_size == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "Zero-length block in lz4 stream",
                ));
            }

            let mut compressed = vec![0u8; block_size as usize];
            let n = self.fill(&mut compressed)?;
            if n == 0 {
                // The 4 bytes were the LG uncompressed-size trailer.
                return Ok(false);
            } else if n != compressed.len() {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "Truncated lz4 block",
                ));
            }

            self.block = lz4_flex::block::decompress(&compressed, LZ4_LEGACY_BLOCK_SIZE)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            self.pos = 0;

            return Ok(true);
        }
    }
}

impl<R: Read> Read for Lz4LegacyDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos == self.block.len() {
            if self.done || !self.next_block()? {
                self.done = true;
                return Ok(0);
            }
        }

        let to_read = buf.len().min(self.block.len() - self.pos);
        buf[..to_read].copy_from_slice(&self.block[self.pos..self.pos + to_read]);
        self.pos += to_read;

        Ok(to_read)
    }
}

pub enum CompressedReader<R: Read> {
    Gzip(GzDecoder<R>),
    /// Boxed because the xz2 stream state is large.
    Xz(Box<XzDecoder<R>>),
    Lzma(Box<XzDecoder<R>>),
    Bzip2(bzip2::read::BzDecoder<R>),
    Lz4(FrameDecoder<R>),
    Lz4Legacy(Lz4LegacyDecoder<R>),
}

impl<R: Read> CompressedReader<R> {
    /// Create a decoder for the given format. The reader must be positioned
    /// at the start of the compressed stream, magic included.
    pub fn with_format(reader: R, format: Format) -> Result<Self> {
        match format {
            Format::Gzip | Format::Zopfli => Ok(Self::Gzip(GzDecoder::new(reader))),
            Format::Xz => Ok(Self::Xz(Box::new(XzDecoder::new(reader)))),
            Format::Lzma => {
                let stream = Stream::new_lzma_decoder(u64::MAX)?;
                Ok(Self::Lzma(Box::new(XzDecoder::new_stream(reader, stream))))
            }
            Format::Bzip2 => Ok(Self::Bzip2(bzip2::read::BzDecoder::new(reader))),
            Format::Lz4 => Ok(Self::Lz4(FrameDecoder::new(reader))),
            Format::Lz4Legacy | Format::Lz4Lg => {
                Ok(Self::Lz4Legacy(Lz4LegacyDecoder::new(reader)))
            }
            f if f.is_compressed_any() => Err(Error::UnsupportedCodec(f)),
            _ => Err(Error::UnknownFormat),
        }
    }
}

impl<R: Read> Read for CompressedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Gzip(r) => r.read(buf),
            Self::Xz(r) => r.read(buf),
            Self::Lzma(r) => r.read(buf),
            Self::Bzip2(r) => r.read(buf),
            Self::Lz4(r) => r.read(buf),
            Self::Lz4Legacy(r) => r.read(buf),
        }
    }
}

#[allow(clippy::large_enum_variant)]
pub enum CompressedWriter<W: Write> {
    Gzip(GzEncoder<W>),
    Xz(XzEncoder<W>),
    Lzma(XzEncoder<W>),
    Bzip2(bzip2::write::BzEncoder<W>),
    Lz4(FrameEncoder<W>),
    Lz4Legacy(Lz4LegacyEncoder<W>),
}

impl<W: Write> CompressedWriter<W> {
    pub fn new(writer: W, format: Format) -> Result<Self> {
        match format {
            Format::Gzip => Ok(Self::Gzip(GzEncoder::new(writer, Compression::default()))),
            Format::Xz => {
                // Some kernels are compiled without support for the default
                // CRC64 check.
                let stream = Stream::new_easy_encoder(6, Check::Crc32)?;
                Ok(Self::Xz(XzEncoder::new_stream(writer, stream)))
            }
            Format::Lzma => {
                let options = LzmaOptions::new_preset(6)?;
                let stream = Stream::new_lzma_encoder(&options)?;
                Ok(Self::Lzma(XzEncoder::new_stream(writer, stream)))
            }
            Format::Bzip2 => Ok(Self::Bzip2(bzip2::write::BzEncoder::new(
                writer,
                bzip2::Compression::default(),
            ))),
            Format::Lz4 => Ok(Self::Lz4(FrameEncoder::new(writer))),
            Format::Lz4Legacy => Ok(Self::Lz4Legacy(Lz4LegacyEncoder::new(writer, false)?)),
            Format::Lz4Lg => Ok(Self::Lz4Legacy(Lz4LegacyEncoder::new(writer, true)?)),
            f if f.is_compressed_any() => Err(Error::UnsupportedCodec(f)),
            _ => Err(Error::UnknownFormat),
        }
    }

    pub fn finish(self) -> Result<W> {
        match self {
            Self::Gzip(w) => Ok(w.finish()?),
            Self::Xz(w) => Ok(w.finish()?),
            Self::Lzma(w) => Ok(w.finish()?),
            Self::Bzip2(w) => Ok(w.finish()?),
            Self::Lz4(w) => w.finish().map_err(|e| Error::Io(io::Error::other(e))),
            Self::Lz4Legacy(w) => Ok(w.finish()?),
        }
    }
}

impl<W: Write> Write for CompressedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Gzip(w) => w.write(buf),
            Self::Xz(w) => w.write(buf),
            Self::Lzma(w) => w.write(buf),
            Self::Bzip2(w) => w.write(buf),
            Self::Lz4(w) => w.write(buf),
            Self::Lz4Legacy(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Gzip(w) => w.flush(),
            Self::Xz(w) => w.flush(),
            Self::Lzma(w) => w.flush(),
            Self::Bzip2(w) => w.flush(),
            Self::Lz4(w) => w.flush(),
            Self::Lz4Legacy(w) => w.flush(),
        }
    }
}

/// Refine a [`Format::Lz4Legacy`] detection by walking the block sizes. If
/// the accumulated sizes over-run the buffer, the last u32 must be the LG
/// uncompressed-size trailer, so the stream is [`Format::Lz4Lg`]. The two
/// variants cannot be told apart from the magic alone.
pub fn check_fmt_lg(data: &[u8]) -> Format {
    let format = Format::from_magic(data);
    if format != Format::Lz4Legacy {
        return format;
    }

    let mut off = 4usize;

    while off + 4 <= data.len() {
        let block_size = u32::from_le_bytes(data[off..off + 4].try_into().unwrap()) as usize;
        off += 4;

        match off.checked_add(block_size) {
            Some(end) if end <= data.len() => off = end,
            _ => return Format::Lz4Lg,
        }
    }

    Format::Lz4Legacy
}

/// Compress a buffer as a standalone xz stream.
pub fn xz_compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut writer = CompressedWriter::new(Cursor::new(Vec::new()), Format::Xz)?;
    writer.write_all(data)?;

    Ok(writer.finish()?.into_inner())
}

/// Decompress a standalone xz stream.
pub fn xz_decompress(data: &[u8]) -> Result<Vec<u8>> {
    if Format::from_magic(data) != Format::Xz {
        return Err(Error::UnknownFormat);
    }

    let mut reader = CompressedReader::with_format(Cursor::new(data), Format::Xz)?;
    let mut decompressed = vec![];
    reader.read_to_end(&mut decompressed)?;

    Ok(decompressed)
}

/// Sniff the format of a compressed buffer and decode all of it into the
/// writer. Fails if the buffer isn't in a supported compression format.
pub fn decompress_to_writer(data: &[u8], mut writer: impl Write) -> Result<u64> {
    let format = Format::from_magic(data);
    if !format.is_compressed() {
        return Err(Error::UnknownFormat);
    }

    let mut reader = CompressedReader::with_format(Cursor::new(data), format)?;
    let n = io::copy(&mut reader, &mut writer)?;

    Ok(n)
}
