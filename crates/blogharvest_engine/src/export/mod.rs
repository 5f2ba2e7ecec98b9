//! Document exporters: one output file per post.
mod epub;
mod pdf;
mod text;

use std::io;
use std::path::{Path, PathBuf};

use blogharvest_core::ExportMode;
use thiserror::Error;

use crate::persist::{AtomicFileWriter, PersistError};

pub use epub::EpubExporter;
pub use pdf::PdfExporter;
pub use text::TextExporter;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("PDF renderer not found: {0}")]
    RendererMissing(String),
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("PDF renderer exited with {status}: {stderr}")]
    Renderer { status: String, stderr: String },
    #[error("EPUB packaging failed: {0}")]
    Package(#[from] zip::result::ZipError),
    #[error("output path has no file name: {0}")]
    InvalidOutput(PathBuf),
}

/// Writes one post to one document at `output`, replacing any existing file.
///
/// `images_folder` holds the images downloaded for this post, if any; an
/// exporter may embed or reference the ones that exist there.
#[async_trait::async_trait]
pub trait Exporter: Send + Sync {
    fn extension(&self) -> &'static str;

    async fn export(
        &self,
        content: &str,
        title: &str,
        output: &Path,
        images_folder: Option<&Path>,
    ) -> Result<(), ExportError>;
}

/// Exporter for `mode`. PDF needs the renderer: an explicit path, or a
/// `wkhtmltopdf` found on `PATH`.
pub fn build_exporter(
    mode: ExportMode,
    wkhtmltopdf: Option<&Path>,
) -> Result<Box<dyn Exporter>, ExportError> {
    Ok(match mode {
        ExportMode::Txt | ExportMode::Md => Box::new(TextExporter::new(mode)),
        ExportMode::Pdf => Box::new(PdfExporter::locate(wkhtmltopdf)?),
        ExportMode::Epub => Box::new(EpubExporter),
    })
}

fn write_output(output: &Path, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    let file_name = output
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ExportError::InvalidOutput(output.to_path_buf()))?;
    let dir = output
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(AtomicFileWriter::new(dir).write_bytes(file_name, bytes)?)
}
