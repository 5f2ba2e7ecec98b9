use std::fmt;
use std::str::FromStr;

/// Output document format of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportMode {
    Pdf,
    Txt,
    Md,
    Epub,
}

impl ExportMode {
    pub const ALL: [ExportMode; 4] = [
        ExportMode::Pdf,
        ExportMode::Txt,
        ExportMode::Md,
        ExportMode::Epub,
    ];

    /// File extension of the rendered document, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportMode::Pdf => "pdf",
            ExportMode::Txt => "txt",
            ExportMode::Md => "md",
            ExportMode::Epub => "epub",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExportMode::Pdf => "PDF",
            ExportMode::Txt => "TXT",
            ExportMode::Md => "MD",
            ExportMode::Epub => "EPUB",
        }
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown export mode {:?} (expected PDF, TXT, MD or EPUB)", self.0)
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for ExportMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}
