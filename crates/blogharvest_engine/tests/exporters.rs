mod common;

use std::fs;
use std::io::Read;
use std::path::Path;

use blogharvest_core::ExportMode;
use blogharvest_engine::{build_exporter, EpubExporter, ExportError, Exporter, TextExporter};
use pretty_assertions::assert_eq;

const CONTENT: &str = r#"<div class="post-body"><p>Fish &amp; chips</p><img src="https://cdn.example/pics/cat.png"><img src="/dog.png"></div>"#;

fn leftovers(dir: &Path, extension: &str) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == extension))
        .count()
}

#[tokio::test]
async fn text_modes_write_markup_verbatim() {
    common::init_logging();
    let dir = tempfile::tempdir().unwrap();

    for mode in [ExportMode::Txt, ExportMode::Md] {
        let exporter = TextExporter::new(mode);
        let output = dir.path().join(format!("post.{}", exporter.extension()));
        exporter.export(CONTENT, "Post", &output, None).await.unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), CONTENT);
    }
    assert!(dir.path().join("post.txt").exists());
    assert!(dir.path().join("post.md").exists());
}

#[tokio::test]
async fn exporting_twice_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = TextExporter::new(ExportMode::Txt);
    let output = dir.path().join("post.txt");
    exporter.export("old", "Post", &output, None).await.unwrap();
    exporter.export("new", "Post", &output, None).await.unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "new");
}

fn read_entry(archive: &mut zip::ZipArchive<fs::File>, name: &str) -> String {
    let mut text = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut text)
        .unwrap();
    text
}

#[tokio::test]
async fn epub_packages_single_chapter_with_local_images() {
    let dir = tempfile::tempdir().unwrap();
    let images = dir.path().join("images");
    fs::create_dir(&images).unwrap();
    fs::write(images.join("cat.png"), b"cat").unwrap();

    let output = dir.path().join("Post.epub");
    EpubExporter
        .export(CONTENT, "Fish & Chips", &output, Some(&images))
        .await
        .unwrap();

    let mut archive = zip::ZipArchive::new(fs::File::open(&output).unwrap()).unwrap();
    {
        let first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), zip::CompressionMethod::Stored);
    }
    assert_eq!(read_entry(&mut archive, "mimetype"), "application/epub+zip");

    let chapter = read_entry(&mut archive, "EPUB/chap.xhtml");
    assert!(chapter.contains("<h1>Fish &amp; Chips</h1><div><div class=\"post-body\">"));
    assert!(chapter.contains("<img src=\"images/cat.png\"/>"));
    assert!(chapter.contains("<img src=\"/dog.png\"/>"));

    let opf = read_entry(&mut archive, "EPUB/content.opf");
    assert!(opf.contains("href=\"images/cat.png\" media-type=\"image/png\""));
    assert!(!opf.contains("dog.png"));
    assert!(opf.contains("<itemref idref=\"nav\"/>\n    <itemref idref=\"chapter_0\"/>"));

    let ncx = read_entry(&mut archive, "EPUB/toc.ncx");
    assert_eq!(ncx.matches("<navPoint").count(), 1);
    assert!(archive.by_name("EPUB/images/cat.png").is_ok());
    assert!(archive.by_name("EPUB/nav.xhtml").is_ok());
    assert!(archive.by_name("META-INF/container.xml").is_ok());
}

#[tokio::test]
async fn epub_without_images_folder_keeps_sources() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("Post.epub");
    EpubExporter.export(CONTENT, "Post", &output, None).await.unwrap();

    let mut archive = zip::ZipArchive::new(fs::File::open(&output).unwrap()).unwrap();
    let chapter = read_entry(&mut archive, "EPUB/chap.xhtml");
    assert!(chapter.contains("src=\"https://cdn.example/pics/cat.png\""));
    assert!((0..archive.len()).all(|i| !archive.by_index(i).unwrap().name().contains("images/")));
}

#[test]
fn missing_renderer_is_reported_at_build_time() {
    let missing = Path::new("/definitely/not/here/wkhtmltopdf");
    let err = build_exporter(ExportMode::Pdf, Some(missing)).err().unwrap();
    assert!(matches!(err, ExportError::RendererMissing(_)));
}

#[test]
fn text_and_epub_need_no_renderer() {
    for (mode, ext) in [
        (ExportMode::Txt, "txt"),
        (ExportMode::Md, "md"),
        (ExportMode::Epub, "epub"),
    ] {
        assert_eq!(build_exporter(mode, None).unwrap().extension(), ext);
    }
}

#[cfg(unix)]
mod pdf {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    use blogharvest_engine::{ExportError, Exporter, PdfExporter};

    use super::{leftovers, CONTENT};

    fn fake_renderer(dir: &Path, script: &str) -> PathBuf {
        let path = dir.join("fake-wkhtmltopdf");
        fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn renderer_receives_page_and_temp_file_is_removed() {
        let tools = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        // Arguments: --encoding UTF-8 --enable-local-file-access <in> <out>
        let renderer = fake_renderer(tools.path(), r#"[ "$1" = "--encoding" ] && cp "$4" "$5""#);

        let output = out_dir.path().join("Post.pdf");
        PdfExporter::new(renderer)
            .export(CONTENT, "Fish & Chips", &output, None)
            .await
            .unwrap();

        let rendered = fs::read_to_string(&output).unwrap();
        assert!(rendered.contains("<meta charset=\"UTF-8\">"));
        assert!(rendered.contains("<h1>Fish &amp; Chips</h1>"));
        assert!(rendered.contains("Fish &amp; chips"));
        assert_eq!(leftovers(out_dir.path(), "html"), 0);
    }

    #[tokio::test]
    async fn renderer_failure_still_removes_temp_file() {
        let tools = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let renderer = fake_renderer(tools.path(), "echo 'boom' >&2; exit 3");

        let err = PdfExporter::new(renderer)
            .export(CONTENT, "Post", &out_dir.path().join("Post.pdf"), None)
            .await
            .unwrap_err();

        match err {
            ExportError::Renderer { stderr, .. } => assert_eq!(stderr, "boom"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(leftovers(out_dir.path(), "html"), 0);
    }

    #[tokio::test]
    async fn spawn_failure_still_removes_temp_file() {
        let out_dir = tempfile::tempdir().unwrap();
        let err = PdfExporter::new(out_dir.path().join("no-such-renderer"))
            .export(CONTENT, "Post", &out_dir.path().join("Post.pdf"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::Spawn { .. }));
        assert_eq!(leftovers(out_dir.path(), "html"), 0);
    }
}
