use std::path::Path;

use blogharvest_core::ExportMode;

use super::{write_output, ExportError, Exporter};

/// TXT and MD: the exported markup as-is; only the extension differs.
#[derive(Debug, Clone, Copy)]
pub struct TextExporter {
    mode: ExportMode,
}

impl TextExporter {
    pub fn new(mode: ExportMode) -> Self {
        Self { mode }
    }
}

#[async_trait::async_trait]
impl Exporter for TextExporter {
    fn extension(&self) -> &'static str {
        self.mode.extension()
    }

    async fn export(
        &self,
        content: &str,
        _title: &str,
        output: &Path,
        _images_folder: Option<&Path>,
    ) -> Result<(), ExportError> {
        write_output(output, content.as_bytes())?;
        Ok(())
    }
}
