use std::path::Path;
use std::sync::Arc;

use flate2::{Crc, Decompress, FlushDecompress, Status};
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::trace;

use crate::error::{Error, Result};
use crate::io::ReadAt;

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

/// Size of the compressed input and decompressed output buffers.
const CHUNK_SIZE: usize = 64 * 1024;

/// ZIP file extractor
pub struct ZipExtractor<R: ReadAt> {
    parser: ZipParser<R>,
}

impl<R: ReadAt> ZipExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: ZipParser::new(reader),
        }
    }

    /// List all files in the archive
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        self.parser.list_files().await
    }

    /// Stream an entry's decompressed bytes into `sink`.
    ///
    /// Data is decoded in fixed-size chunks; the CRC-32 and length are
    /// checked against the central directory once the entry ends. Returns
    /// the number of bytes written.
    pub async fn extract_to_writer<W>(&self, entry: &ZipFileEntry, sink: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        self.write_entry(entry, sink, Path::new(&entry.file_name))
            .await
    }

    /// Extract an entry into a newly created file.
    ///
    /// The file must not exist yet; an existing file is never overwritten.
    pub async fn extract_to_file(&self, entry: &ZipFileEntry, output_path: &Path) -> Result<u64> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(output_path)
            .await
            .map_err(|e| Error::io(output_path, e))?;

        self.write_entry(entry, &mut file, output_path).await
    }

    /// Extract file data to memory
    pub async fn extract_to_memory(&self, entry: &ZipFileEntry) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(entry.uncompressed_size.min(CHUNK_SIZE as u64) as usize);
        self.extract_to_writer(entry, &mut buf).await?;
        Ok(buf)
    }

    /// Decode `entry` into `sink`; write failures are reported against `target`.
    async fn write_entry<W>(&self, entry: &ZipFileEntry, sink: &mut W, target: &Path) -> Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        if entry.is_encrypted() {
            return Err(Error::Encrypted {
                entry: entry.file_name.clone(),
            });
        }

        let data_offset = self.parser.get_data_offset(entry).await?;
        let mut crc = Crc::new();

        let written = match entry.compression_method {
            CompressionMethod::Stored => {
                if entry.compressed_size != entry.uncompressed_size {
                    return Err(Error::archive(format!(
                        "stored entry '{}' has mismatched sizes",
                        entry.file_name
                    )));
                }
                self.copy_stored(entry, data_offset, sink, target, &mut crc)
                    .await?
            }
            CompressionMethod::Deflate => {
                self.copy_deflated(entry, data_offset, sink, target, &mut crc)
                    .await?
            }
            CompressionMethod::Unknown(method) => {
                return Err(Error::UnsupportedCompression {
                    entry: entry.file_name.clone(),
                    method,
                });
            }
        };

        if written != entry.uncompressed_size {
            return Err(Error::archive(format!(
                "entry '{}' decoded to {} bytes, expected {}",
                entry.file_name, written, entry.uncompressed_size
            )));
        }
        if crc.sum() != entry.crc32 {
            return Err(Error::archive(format!(
                "CRC-32 mismatch for '{}': expected {:08x}, got {:08x}",
                entry.file_name,
                entry.crc32,
                crc.sum()
            )));
        }

        sink.flush().await.map_err(|e| Error::io(target, e))?;
        Ok(written)
    }

    async fn copy_stored<W>(
        &self,
        entry: &ZipFileEntry,
        mut offset: u64,
        sink: &mut W,
        target: &Path,
        crc: &mut Crc,
    ) -> Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let reader = self.parser.reader();
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut remaining = entry.compressed_size;

        while remaining > 0 {
            let n = remaining.min(CHUNK_SIZE as u64) as usize;
            reader.read_exact_at(offset, &mut buf[..n]).await?;
            crc.update(&buf[..n]);
            sink.write_all(&buf[..n])
                .await
                .map_err(|e| Error::io(target, e))?;
            offset += n as u64;
            remaining -= n as u64;
        }

        Ok(entry.compressed_size)
    }

    async fn copy_deflated<W>(
        &self,
        entry: &ZipFileEntry,
        mut offset: u64,
        sink: &mut W,
        target: &Path,
        crc: &mut Crc,
    ) -> Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let reader = self.parser.reader();
        let mut input = vec![0u8; CHUNK_SIZE];
        let mut output = vec![0u8; CHUNK_SIZE];
        let mut inflater = Decompress::new(false);
        let mut remaining = entry.compressed_size;

        loop {
            let n = remaining.min(CHUNK_SIZE as u64) as usize;
            reader.read_exact_at(offset, &mut input[..n]).await?;
            offset += n as u64;
            remaining -= n as u64;
            let last_chunk = remaining == 0;
            let flush = if last_chunk {
                FlushDecompress::Finish
            } else {
                FlushDecompress::None
            };

            let mut consumed = 0;
            loop {
                let (in_before, out_before) = (inflater.total_in(), inflater.total_out());
                let status = inflater
                    .decompress(&input[consumed..n], &mut output, flush)
                    .map_err(|e| {
                        Error::archive(format!("corrupt deflate data in '{}': {}", entry.file_name, e))
                    })?;
                let read = (inflater.total_in() - in_before) as usize;
                let produced = (inflater.total_out() - out_before) as usize;
                consumed += read;

                if inflater.total_out() > entry.uncompressed_size {
                    return Err(Error::archive(format!(
                        "entry '{}' inflates past its declared size of {} bytes",
                        entry.file_name, entry.uncompressed_size
                    )));
                }
                if produced > 0 {
                    crc.update(&output[..produced]);
                    sink.write_all(&output[..produced])
                        .await
                        .map_err(|e| Error::io(target, e))?;
                }

                if status == Status::StreamEnd {
                    trace!(
                        entry = %entry.file_name,
                        compressed = inflater.total_in(),
                        inflated = inflater.total_out(),
                        "deflate stream finished"
                    );
                    return Ok(inflater.total_out());
                }
                if read == 0 && produced == 0 {
                    if consumed < n {
                        return Err(Error::archive(format!(
                            "deflate stream in '{}' stalled",
                            entry.file_name
                        )));
                    }
                    break;
                }
            }

            if last_chunk {
                return Err(Error::archive(format!(
                    "deflate stream in '{}' ended before its final block",
                    entry.file_name
                )));
            }
        }
    }
}
