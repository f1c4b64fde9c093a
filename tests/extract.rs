mod common;

use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;
use xlmedia::{Error, ExtractConfig, MediaExtractor};

use common::{corrupt_crc, jpeg_bytes, list_tree, png_bytes, write_workbook};

fn extractor_into(base: &Path) -> MediaExtractor {
    MediaExtractor::new(ExtractConfig::new(base))
}

#[tokio::test]
async fn extracts_every_media_entry_byte_for_byte() {
    let temp_dir = TempDir::new().unwrap();
    let png = png_bytes();
    let jpeg = jpeg_bytes();
    let book = write_workbook(
        temp_dir.path(),
        "book.xlsx",
        &[("xl/media/image1.png", &png), ("xl/media/image2.jpeg", &jpeg)],
    );

    let base = temp_dir.path().join("Desktop");
    let report = extractor_into(&base).extract(&book).await.unwrap();

    assert!(report.output_dir.starts_with(&base));
    let folder = report.output_dir.file_name().unwrap().to_string_lossy();
    let millis = folder.strip_prefix("ExcelImages_").unwrap();
    assert!(millis.parse::<i64>().is_ok(), "unexpected folder name {folder}");

    assert_eq!(list_tree(&report.output_dir), ["image1.png", "image2.jpeg"]);
    assert_eq!(std::fs::read(report.output_dir.join("image1.png")).unwrap(), png);
    assert_eq!(std::fs::read(report.output_dir.join("image2.jpeg")).unwrap(), jpeg);

    assert_eq!(report.files.len(), 2);
    assert_eq!(report.total_bytes, (png.len() + jpeg.len()) as u64);
}

#[tokio::test]
async fn preserves_sub_folders() {
    let temp_dir = TempDir::new().unwrap();
    let book = write_workbook(
        temp_dir.path(),
        "nested.xlsx",
        &[
            ("xl/media/", b""),
            ("xl/media/image1.png", b"top"),
            ("xl/media/charts/", b""),
            ("xl/media/charts/image2.emf", b"nested"),
            ("xl/media/empty/", b""),
        ],
    );

    let report = extractor_into(temp_dir.path()).extract(&book).await.unwrap();

    assert_eq!(list_tree(&report.output_dir), ["charts/image2.emf", "image1.png"]);
    assert!(report.output_dir.join("empty").is_dir());
    assert_eq!(
        std::fs::read(report.output_dir.join("charts").join("image2.emf")).unwrap(),
        b"nested"
    );
}

#[tokio::test]
async fn junk_paths_flattens_output() {
    let temp_dir = TempDir::new().unwrap();
    let book = write_workbook(
        temp_dir.path(),
        "nested.xlsx",
        &[
            ("xl/media/image1.png", b"top"),
            ("xl/media/charts/", b""),
            ("xl/media/charts/image2.emf", b"nested"),
        ],
    );

    let config = ExtractConfig::new(temp_dir.path()).with_junk_paths(true);
    let report = MediaExtractor::new(config).extract(&book).await.unwrap();

    assert_eq!(list_tree(&report.output_dir), ["image1.png", "image2.emf"]);
    assert!(!report.output_dir.join("charts").exists());
}

#[tokio::test]
async fn junk_paths_refuses_to_overwrite_duplicates() {
    let temp_dir = TempDir::new().unwrap();
    let book = write_workbook(
        temp_dir.path(),
        "dupes.xlsx",
        &[("xl/media/a/image.png", b"first"), ("xl/media/b/image.png", b"second")],
    );

    let config = ExtractConfig::new(temp_dir.path()).with_junk_paths(true);
    let err = MediaExtractor::new(config).extract(&book).await.unwrap_err();
    assert!(matches!(err.root_cause(), Error::Io { .. }), "{err}");

    let Error::Partial { output_dir, .. } = &err else {
        panic!("expected partial output, got {err}");
    };
    assert_eq!(std::fs::read(output_dir.join("image.png")).unwrap(), b"first");
}

#[tokio::test]
async fn failure_after_first_file_names_the_output_folder() {
    let temp_dir = TempDir::new().unwrap();
    let book = write_workbook(
        temp_dir.path(),
        "book.xlsx",
        &[("xl/media/image1.png", b"first"), ("xl/media/image2.png", b"second")],
    );
    corrupt_crc(&book, "xl/media/image2.png");
    let base = temp_dir.path().join("Desktop");

    let err = extractor_into(&base).extract(&book).await.unwrap_err();

    let Error::Partial { output_dir, source } = &err else {
        panic!("expected partial output, got {err}");
    };
    assert!(matches!(**source, Error::ArchiveFormat { .. }), "{source}");
    assert!(output_dir.starts_with(&base));
    assert!(err.to_string().contains(&output_dir.display().to_string()));
    assert!(list_tree(output_dir).contains(&"image1.png".to_string()));
}

#[tokio::test]
async fn document_without_media_yields_empty_folder() {
    let temp_dir = TempDir::new().unwrap();
    let book = write_workbook(temp_dir.path(), "plain.xlsx", &[]);

    let report = extractor_into(temp_dir.path()).extract(&book).await.unwrap();

    assert!(report.output_dir.is_dir());
    assert!(report.files.is_empty());
    assert_eq!(std::fs::read_dir(&report.output_dir).unwrap().count(), 0);
}

#[tokio::test]
async fn missing_source_creates_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path().join("Desktop");

    let err = extractor_into(&base)
        .extract(&temp_dir.path().join("missing.xlsx"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotFound { .. }), "{err}");
    assert!(!base.exists());
}

#[tokio::test]
async fn non_archive_is_a_format_error() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("report.xlsx");
    std::fs::write(&source, "id,name\n1,alpha\n2,beta\n").unwrap();
    let base = temp_dir.path().join("Desktop");

    let err = extractor_into(&base).extract(&source).await.unwrap_err();

    assert!(matches!(err, Error::ArchiveFormat { .. }), "{err}");
    assert!(!base.exists());
}

#[tokio::test]
async fn each_run_gets_its_own_folder() {
    let temp_dir = TempDir::new().unwrap();
    let book = write_workbook(temp_dir.path(), "book.xlsx", &[("xl/media/image1.png", b"png")]);
    let extractor = extractor_into(temp_dir.path());

    let first = extractor.extract(&book).await.unwrap();
    std::thread::sleep(Duration::from_millis(5));
    let second = extractor.extract(&book).await.unwrap();

    assert_ne!(first.output_dir, second.output_dir);
    assert_eq!(list_tree(&first.output_dir), ["image1.png"]);
    assert_eq!(list_tree(&second.output_dir), ["image1.png"]);
}

#[tokio::test]
async fn list_reports_media_without_writing() {
    let temp_dir = TempDir::new().unwrap();
    let book = write_workbook(
        temp_dir.path(),
        "book.xlsx",
        &[("xl/media/image1.png", b"12345"), ("xl/media/image2.jpeg", b"123")],
    );
    let base = temp_dir.path().join("Desktop");

    let media = extractor_into(&base).list(&book).await.unwrap();

    let listed: Vec<_> = media.iter().map(|m| (m.name.as_str(), m.size())).collect();
    assert_eq!(listed, [("image1.png", 5), ("image2.jpeg", 3)]);
    assert!(!base.exists());
}
