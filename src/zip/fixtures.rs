//! In-memory archives for unit tests.

use std::io::{Cursor, Write};

use ::zip::CompressionMethod;
use ::zip::write::SimpleFileOptions;

enum Item {
    File {
        name: String,
        data: Vec<u8>,
        method: CompressionMethod,
        large: bool,
    },
    Directory(String),
}

#[derive(Default)]
pub(crate) struct ArchiveBuilder {
    items: Vec<Item>,
    comment: Option<String>,
}

impl ArchiveBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn stored(self, name: &str, data: &[u8]) -> Self {
        self.file(name, data, CompressionMethod::Stored)
    }

    pub(crate) fn deflated(self, name: &str, data: &[u8]) -> Self {
        self.file(name, data, CompressionMethod::Deflated)
    }

    /// Deflated entry written with ZIP64 size fields.
    pub(crate) fn large(mut self, name: &str, data: &[u8]) -> Self {
        self.items.push(Item::File {
            name: name.to_string(),
            data: data.to_vec(),
            method: CompressionMethod::Deflated,
            large: true,
        });
        self
    }

    pub(crate) fn directory(mut self, name: &str) -> Self {
        self.items.push(Item::Directory(name.to_string()));
        self
    }

    pub(crate) fn comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    fn file(mut self, name: &str, data: &[u8], method: CompressionMethod) -> Self {
        self.items.push(Item::File {
            name: name.to_string(),
            data: data.to_vec(),
            method,
            large: false,
        });
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let mut writer = ::zip::ZipWriter::new(Cursor::new(Vec::new()));
        for item in self.items {
            match item {
                Item::File {
                    name,
                    data,
                    method,
                    large,
                } => {
                    let options = SimpleFileOptions::default()
                        .compression_method(method)
                        .large_file(large);
                    writer.start_file(name, options).unwrap();
                    writer.write_all(&data).unwrap();
                }
                Item::Directory(name) => {
                    writer
                        .add_directory(name, SimpleFileOptions::default())
                        .unwrap();
                }
            }
        }
        if let Some(comment) = self.comment {
            writer.set_comment(comment);
        }
        writer.finish().unwrap().into_inner()
    }
}

/// Locate the central directory header of the `index`th entry.
pub(crate) fn central_header_offset(archive: &[u8], index: usize) -> usize {
    archive
        .windows(4)
        .enumerate()
        .filter(|(_, w)| *w == b"PK\x01\x02")
        .map(|(i, _)| i)
        .nth(index)
        .unwrap()
}
