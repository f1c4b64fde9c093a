#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// Minimal workbook parts that surround the media folder.
const WORKBOOK_PARTS: &[(&str, &[u8])] = &[
    ("[Content_Types].xml", b"<?xml version=\"1.0\"?><Types/>"),
    ("_rels/.rels", b"<?xml version=\"1.0\"?><Relationships/>"),
    ("xl/workbook.xml", b"<?xml version=\"1.0\"?><workbook/>"),
    ("xl/worksheets/sheet1.xml", b"<?xml version=\"1.0\"?><worksheet/>"),
];

/// Write an `.xlsx`-shaped archive holding the workbook parts plus `media`.
///
/// Names in `media` are full archive paths; a trailing `/` makes a directory.
pub fn write_workbook(dir: &Path, name: &str, media: &[(&str, &[u8])]) -> PathBuf {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (part, data) in WORKBOOK_PARTS {
        writer.start_file(*part, deflated).unwrap();
        writer.write_all(data).unwrap();
    }
    for (entry, data) in media {
        if entry.ends_with('/') {
            writer.add_directory(*entry, deflated).unwrap();
        } else {
            writer.start_file(*entry, deflated).unwrap();
            writer.write_all(data).unwrap();
        }
    }

    let path = dir.join(name);
    std::fs::write(&path, writer.finish().unwrap().into_inner()).unwrap();
    path
}

/// Flip the central-directory CRC-32 of `entry` in the archive at `path`.
pub fn corrupt_crc(path: &Path, entry: &str) {
    let mut data = std::fs::read(path).unwrap();
    let header = (0..data.len() - 46)
        .find(|&i| {
            let name_len = u16::from_le_bytes([data[i + 28], data[i + 29]]) as usize;
            &data[i..i + 4] == b"PK\x01\x02"
                && data.get(i + 46..i + 46 + name_len) == Some(entry.as_bytes())
        })
        .unwrap();
    data[header + 16] ^= 0xFF;
    std::fs::write(path, data).unwrap();
}

pub fn png_bytes() -> Vec<u8> {
    let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
    data.extend((0..20_000u32).map(|i| (i % 7 + i / 300) as u8));
    data
}

pub fn jpeg_bytes() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
    data.extend((0..5_000u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 24) as u8));
    data.extend([0xFF, 0xD9]);
    data
}

/// Sorted names of the files below `dir`, relative to it, using `/`.
pub fn list_tree(dir: &Path) -> Vec<String> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let relative = path.strip_prefix(root).unwrap();
                let parts: Vec<_> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                out.push(parts.join("/"));
            }
        }
    }

    let mut out = Vec::new();
    walk(dir, dir, &mut out);
    out.sort();
    out
}
