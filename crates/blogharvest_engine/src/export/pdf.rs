use std::io::Write;
use std::path::{Path, PathBuf};

use blogharvest_core::image_file_name;
use engine_logging::engine_debug;
use html_escape::encode_text;
use url::Url;

use super::{ExportError, Exporter};
use crate::xhtml::XhtmlSerializer;

const RENDERER: &str = "wkhtmltopdf";

const PRINT_CSS: &str = r#"
body { font-family: Arial, sans-serif; font-size: 14pt; line-height: 1.5; margin: 20px; }
h1 { font-size: 24pt; font-weight: bold; margin-bottom: 20px; text-align: center; }
h2 { font-size: 18pt; font-weight: bold; margin-bottom: 15px; }
h3 { font-size: 16pt; font-weight: bold; margin-bottom: 10px; }
p { font-size: 14pt; margin-bottom: 10px; text-align: justify; }
ul, ol { font-size: 14pt; margin-bottom: 10px; }
table { width: 100%; border-collapse: collapse; margin-bottom: 20px; }
table, th, td { border: 1px solid black; }
th, td { padding: 8px; text-align: left; font-size: 14pt; }
a { color: blue; text-decoration: none; font-size: 14pt; }
blockquote { font-size: 14pt; margin: 10px 0; padding-left: 15px; border-left: 4px solid #ccc; color: #555; }
img { max-width: 100%; height: auto; display: block; margin: 20px auto; border-radius: 5px; }
"#;

/// Renders posts through an external `wkhtmltopdf`.
#[derive(Debug, Clone)]
pub struct PdfExporter {
    program: PathBuf,
}

impl PdfExporter {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }

    /// Resolve the renderer: `explicit` when given, else `wkhtmltopdf` on `PATH`.
    pub fn locate(explicit: Option<&Path>) -> Result<Self, ExportError> {
        let lookup = match explicit {
            Some(path) => which::which(path),
            None => which::which(RENDERER),
        };
        lookup.map(Self::new).map_err(|err| {
            let wanted = explicit
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| RENDERER.to_string());
            ExportError::RendererMissing(format!("{wanted}: {err}"))
        })
    }
}

/// Full HTML page handed to the renderer.
pub(crate) fn render_page(content: &str, title: &str, images_folder: Option<&Path>) -> String {
    let body = XhtmlSerializer::new(|src: &str| {
        images_folder.and_then(|dir| local_file_url(dir, src))
    })
    .serialize(content);
    let title = encode_text(title);
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{title}</title>\n<style>{PRINT_CSS}</style>\n</head>\n<body>\n\
         <h1>{title}</h1>\n<div>{body}</div>\n</body>\n</html>\n"
    )
}

/// `file://` URL of the downloaded copy of `src`, when that copy exists.
fn local_file_url(images_folder: &Path, src: &str) -> Option<String> {
    let local = images_folder.join(image_file_name(src)?);
    if !local.is_file() {
        return None;
    }
    let absolute = local.canonicalize().ok()?;
    Url::from_file_path(absolute).ok().map(String::from)
}

#[async_trait::async_trait]
impl Exporter for PdfExporter {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    async fn export(
        &self,
        content: &str,
        title: &str,
        output: &Path,
        images_folder: Option<&Path>,
    ) -> Result<(), ExportError> {
        let page = render_page(content, title, images_folder);
        let dir = output.parent().unwrap_or_else(|| Path::new("."));

        // Removed on drop, whatever happens below.
        let mut html = tempfile::Builder::new()
            .prefix(".blogharvest-")
            .suffix(".html")
            .tempfile_in(dir)?;
        html.write_all(page.as_bytes())?;
        html.flush()?;

        engine_debug!("Rendering {} with {}", output.display(), self.program.display());
        let result = tokio::process::Command::new(&self.program)
            .args(["--encoding", "UTF-8", "--enable-local-file-access"])
            .arg(html.path())
            .arg(output)
            .output()
            .await
            .map_err(|source| ExportError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(ExportError::Renderer {
                status: result.status.to_string(),
                stderr: stderr.lines().last().unwrap_or_default().trim().to_string(),
            });
        }
        html.close()?;
        Ok(())
    }
}
