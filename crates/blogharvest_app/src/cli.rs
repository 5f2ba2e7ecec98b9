use std::path::PathBuf;

use blogharvest_core::{ExportMode, DEFAULT_PAGE_SIZE};
use blogharvest_engine::{RunOptions, DEFAULT_CONCURRENCY, DEFAULT_OUTPUT_DIR};
use clap::Parser;

/// Export every post of a blog (Blogspot, WordPress, Joomla, Drupal or any
/// RSS/Atom feed) as PDF, TXT, Markdown or EPUB, optionally with images.
#[derive(Debug, Parser)]
#[command(name = "blogharvest", version)]
pub struct Cli {
    /// Blog home page or feed URL.
    pub rss_url: Option<String>,

    /// Directory where posts are saved.
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Output format: PDF, TXT, MD or EPUB.
    #[arg(long)]
    pub mode: Option<ExportMode>,

    /// Download images into an `images` folder next to each post.
    #[arg(long)]
    pub download_images: bool,

    /// Debug logging, and rewrite metadata.csv after every feed page.
    #[arg(long)]
    pub debug: bool,

    /// Posts processed at the same time.
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Entries requested per feed page (Blogger feeds only).
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Stop after this many feed pages.
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Path to the wkhtmltopdf executable (PDF mode). Looked up on PATH when absent.
    #[arg(long)]
    pub wkhtmltopdf: Option<PathBuf>,

    /// Debug-level logging without the debug metadata files.
    #[arg(short, long)]
    pub verbose: bool,

    /// Also write the log to ./blogharvest.log.
    #[arg(long)]
    pub log_file: bool,

    /// File receiving one line per skipped post, image or page.
    #[arg(long, default_value = "error_log.txt")]
    pub error_log: PathBuf,
}

impl Cli {
    pub fn run_options(&self, mode: ExportMode) -> RunOptions {
        RunOptions {
            output_dir: self.output_dir.clone(),
            mode,
            download_images: self.download_images,
            debug: self.debug,
            concurrency: self.concurrency,
            page_size: self.page_size,
            max_pages: self.max_pages,
        }
    }
}

pub const MODE_HINT: &str = "
[ERROR] Tolong masukan --mode / Please provide --mode

Penjelasan Mode / Modes:
  --mode menentukan format output untuk menyimpan hasil scrape.
  --mode selects the output format of the saved posts.
  Mode yang tersedia / Available modes:
    PDF   - Menyimpan posting sebagai file PDF. / Save posts as PDF files.
    TXT   - Menyimpan posting sebagai file teks biasa. / Save posts as plain text.
    MD    - Menyimpan posting sebagai file Markdown. / Save posts as Markdown.
    EPUB  - Menyimpan posting sebagai file EPUB (e-book). / Save posts as EPUB e-books.

Contoh penggunaan / Example:
  blogharvest https://example.com/rss --mode PDF
";
