//! Low-level ZIP archive parser.
//!
//! This module handles the binary parsing of ZIP file structures,
//! reading from any source that implements the [`ReadAt`] trait.
//!
//! ## Parsing Strategy
//!
//! ZIP files are designed to be read from the end:
//! 1. Find the End of Central Directory (EOCD) at the file's end
//! 2. If ZIP64, read the ZIP64 EOCD for large file support
//! 3. Read the Central Directory to get metadata for all files
//! 4. For extraction, read each file's Local File Header and data
//!
//! Spreadsheet documents are ordinary archives, so the document is read
//! in place without copying it anywhere first.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::io::ReadAt;

use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// This limits the search area when looking for EOCD with a comment.
const MAX_COMMENT_SIZE: u64 = 65535;

/// Low-level ZIP file parser.
///
/// Typically used through [`ZipExtractor`](super::ZipExtractor)
/// rather than directly.
pub struct ZipParser<R: ReadAt> {
    /// The underlying data source
    reader: Arc<R>,
    /// Total size of the archive in bytes
    size: u64,
}

impl<R: ReadAt> ZipParser<R> {
    pub fn new(reader: Arc<R>) -> Self {
        let size = reader.size();
        Self { reader, size }
    }

    /// Find and parse the End of Central Directory record.
    ///
    /// Returns the record together with its offset in the file. Fails with
    /// [`Error::ArchiveFormat`] when no record exists, which is how a
    /// non-zip input is detected.
    pub async fn find_eocd(&self) -> Result<(EndOfCentralDirectory, u64)> {
        let eocd_size = EndOfCentralDirectory::SIZE as u64;
        if self.size < eocd_size {
            return Err(Error::archive("file is too small to be a zip archive"));
        }

        // Common case: no archive comment, the record sits at the very end.
        let offset = self.size - eocd_size;
        let mut buf = vec![0u8; EndOfCentralDirectory::SIZE];
        self.reader.read_exact_at(offset, &mut buf).await?;
        if &buf[0..4] == EndOfCentralDirectory::SIGNATURE && &buf[20..22] == b"\x00\x00" {
            let eocd = EndOfCentralDirectory::from_bytes(&buf)?;
            return Ok((eocd, offset));
        }

        // A trailing comment pushes the record back by up to 64 KiB.
        let search_size = (MAX_COMMENT_SIZE + eocd_size).min(self.size);
        let search_start = self.size - search_size;

        let mut buf = vec![0u8; search_size as usize];
        self.reader.read_exact_at(search_start, &mut buf).await?;

        for i in (0..=buf.len() - EndOfCentralDirectory::SIZE).rev() {
            if &buf[i..i + 4] == EndOfCentralDirectory::SIGNATURE {
                let comment_len = u16::from_le_bytes([buf[i + 20], buf[i + 21]]) as usize;
                if comment_len == buf.len() - i - EndOfCentralDirectory::SIZE {
                    let eocd = EndOfCentralDirectory::from_bytes(
                        &buf[i..i + EndOfCentralDirectory::SIZE],
                    )?;
                    return Ok((eocd, search_start + i as u64));
                }
            }
        }

        Err(Error::archive("end of central directory record not found"))
    }

    /// Read the ZIP64 End of Central Directory record.
    ///
    /// Called when the regular EOCD has fields saturated to 0xFFFF or
    /// 0xFFFFFFFF.
    pub async fn read_zip64_eocd(&self, eocd_offset: u64) -> Result<Zip64EOCD> {
        // The locator sits immediately before the regular EOCD
        let locator_offset = eocd_offset
            .checked_sub(Zip64EOCDLocator::SIZE as u64)
            .ok_or_else(|| Error::archive("missing ZIP64 end of central directory locator"))?;
        let mut locator_buf = vec![0u8; Zip64EOCDLocator::SIZE];
        self.reader
            .read_exact_at(locator_offset, &mut locator_buf)
            .await?;

        let locator = Zip64EOCDLocator::from_bytes(&locator_buf)?;
        let in_bounds = locator
            .eocd64_offset
            .checked_add(Zip64EOCD::MIN_SIZE as u64)
            .is_some_and(|end| end <= locator_offset);
        if !in_bounds {
            return Err(Error::archive("ZIP64 end of central directory out of bounds"));
        }

        let mut eocd64_buf = vec![0u8; Zip64EOCD::MIN_SIZE];
        self.reader
            .read_exact_at(locator.eocd64_offset, &mut eocd64_buf)
            .await?;

        Zip64EOCD::from_bytes(&eocd64_buf)
    }

    /// List all entries in the archive by reading the Central Directory.
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        let (eocd, eocd_offset) = self.find_eocd().await?;
        if eocd.is_multi_disk() {
            return Err(Error::archive("multi-disk archives are not supported"));
        }

        let (cd_offset, cd_size, total_entries) = if eocd.is_zip64() {
            let eocd64 = self.read_zip64_eocd(eocd_offset).await?;
            (eocd64.cd_offset, eocd64.cd_size, eocd64.total_entries)
        } else {
            (
                eocd.cd_offset as u64,
                eocd.cd_size as u64,
                eocd.total_entries as u64,
            )
        };

        // Reject before allocating: the directory has to fit in front of the EOCD.
        let cd_end = cd_offset
            .checked_add(cd_size)
            .ok_or_else(|| Error::archive("central directory size overflows"))?;
        if cd_end > eocd_offset {
            return Err(Error::archive("central directory extends past end of archive"));
        }
        if total_entries > cd_size / CDFH_MIN_SIZE as u64 {
            return Err(Error::archive(format!(
                "central directory too small for {} entries",
                total_entries
            )));
        }

        let mut cd_data = vec![0u8; cd_size as usize];
        self.reader.read_exact_at(cd_offset, &mut cd_data).await?;

        let mut entries = Vec::with_capacity(total_entries as usize);
        let mut cursor = Cursor::new(cd_data.as_slice());

        for _ in 0..total_entries {
            let entry = self.parse_cdfh(&mut cursor)?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Parse a Central Directory File Header from a cursor.
    fn parse_cdfh(&self, cursor: &mut Cursor<&[u8]>) -> Result<ZipFileEntry> {
        let mut sig = [0u8; 4];
        cursor.read_exact(&mut sig).map_err(truncated)?;
        if sig != CDFH_SIGNATURE {
            return Err(Error::archive("invalid central directory file header"));
        }

        let _version_made_by = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
        let _version_needed = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
        let flags = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
        let compression_method = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
        let last_mod_time = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
        let last_mod_date = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
        let crc32 = cursor.read_u32::<LittleEndian>().map_err(truncated)?;
        let mut compressed_size = cursor.read_u32::<LittleEndian>().map_err(truncated)? as u64;
        let mut uncompressed_size = cursor.read_u32::<LittleEndian>().map_err(truncated)? as u64;
        let file_name_length = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
        let extra_field_length = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
        let file_comment_length = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
        let _disk_number_start = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
        let _internal_attrs = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
        let _external_attrs = cursor.read_u32::<LittleEndian>().map_err(truncated)?;
        let mut lfh_offset = cursor.read_u32::<LittleEndian>().map_err(truncated)? as u64;

        let mut file_name_bytes = vec![0u8; file_name_length as usize];
        cursor.read_exact(&mut file_name_bytes).map_err(truncated)?;
        let file_name = String::from_utf8_lossy(&file_name_bytes).to_string();

        let is_directory = file_name.ends_with('/');

        let extra_field_end = cursor.position() + extra_field_length as u64;
        if extra_field_end + file_comment_length as u64 > cursor.get_ref().len() as u64 {
            return Err(Error::archive(format!(
                "central directory header for '{}' is truncated",
                file_name
            )));
        }

        while cursor.position() + 4 <= extra_field_end {
            let header_id = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
            let field_size = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
            let field_end = (cursor.position() + field_size as u64).min(extra_field_end);

            if header_id == ZIP64_EXTRA_ID {
                // Present only for the header fields saturated to 0xFFFFFFFF, in this order
                if uncompressed_size == 0xFFFFFFFF && cursor.position() + 8 <= field_end {
                    uncompressed_size = cursor.read_u64::<LittleEndian>().map_err(truncated)?;
                }
                if compressed_size == 0xFFFFFFFF && cursor.position() + 8 <= field_end {
                    compressed_size = cursor.read_u64::<LittleEndian>().map_err(truncated)?;
                }
                if lfh_offset == 0xFFFFFFFF && cursor.position() + 8 <= field_end {
                    lfh_offset = cursor.read_u64::<LittleEndian>().map_err(truncated)?;
                }
            }
            cursor.set_position(field_end);
        }

        cursor.set_position(extra_field_end + file_comment_length as u64);

        Ok(ZipFileEntry {
            file_name,
            flags,
            compression_method: CompressionMethod::from_u16(compression_method),
            compressed_size,
            uncompressed_size,
            crc32,
            lfh_offset,
            last_mod_time,
            last_mod_date,
            is_directory,
        })
    }

    /// Get the offset where an entry's compressed data begins.
    ///
    /// The Local File Header repeats the name and carries its own extra
    /// field, so its lengths are read rather than taken from the Central
    /// Directory.
    pub async fn get_data_offset(&self, entry: &ZipFileEntry) -> Result<u64> {
        let mut lfh_buf = vec![0u8; LFH_SIZE];
        self.reader
            .read_exact_at(entry.lfh_offset, &mut lfh_buf)
            .await?;

        if &lfh_buf[0..4] != LFH_SIGNATURE {
            return Err(Error::archive(format!(
                "invalid local file header for '{}'",
                entry.file_name
            )));
        }

        let mut cursor = Cursor::new(&lfh_buf);
        cursor.set_position(26); // Offset to filename length field

        let file_name_length = cursor.read_u16::<LittleEndian>().map_err(truncated)? as u64;
        let extra_field_length = cursor.read_u16::<LittleEndian>().map_err(truncated)? as u64;

        let out_of_bounds = || {
            Error::archive(format!(
                "data for '{}' extends past end of archive",
                entry.file_name
            ))
        };

        // Offsets and sizes come straight from the archive and may be hostile
        let data_offset = entry
            .lfh_offset
            .checked_add(LFH_SIZE as u64 + file_name_length + extra_field_length)
            .ok_or_else(out_of_bounds)?;
        let data_end = data_offset
            .checked_add(entry.compressed_size)
            .ok_or_else(out_of_bounds)?;
        if data_end > self.size {
            return Err(out_of_bounds());
        }

        Ok(data_offset)
    }

    pub fn reader(&self) -> &Arc<R> {
        &self.reader
    }
}
