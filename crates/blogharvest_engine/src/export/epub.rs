use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use std::path::Path;

use blogharvest_core::{image_file_name, image_media_type};
use html_escape::{encode_double_quoted_attribute, encode_text};
use sha2::{Digest, Sha256};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{write_output, ExportError, Exporter};
use crate::xhtml::XhtmlSerializer;

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="EPUB/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

/// Single-chapter EPUB 3 book with an EPUB 2 NCX for older readers.
#[derive(Debug, Clone, Copy, Default)]
pub struct EpubExporter;

/// Parts of one book, before packaging.
pub(crate) struct EpubBook {
    pub(crate) identifier: String,
    pub(crate) title: String,
    pub(crate) chapter: String,
    /// `images/<name>` -> bytes, only for images with a local copy.
    pub(crate) images: BTreeMap<String, Vec<u8>>,
}

impl EpubBook {
    pub(crate) fn assemble(content: &str, title: &str, images_folder: Option<&Path>) -> Self {
        let mut images = BTreeMap::new();
        let body = XhtmlSerializer::new(|src: &str| {
            let folder = images_folder?;
            let name = image_file_name(src)?;
            let bytes = std::fs::read(folder.join(&name)).ok()?;
            let href = format!("images/{name}");
            images.insert(href.clone(), bytes);
            Some(href)
        })
        .serialize(content);

        let escaped_title = encode_text(title);
        let chapter = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE html>\n\
             <html xmlns=\"http://www.w3.org/1999/xhtml\" xmlns:epub=\"http://www.idpf.org/2007/ops\" lang=\"en\" xml:lang=\"en\">\n\
             <head><title>{escaped_title}</title></head>\n\
             <body><h1>{escaped_title}</h1><div>{body}</div></body>\n</html>\n"
        );

        Self {
            identifier: format!("urn:blogharvest:{}", short_hash(title)),
            title: title.to_string(),
            chapter,
            images,
        }
    }

    pub(crate) fn package(&self) -> Result<Vec<u8>, ExportError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let stored = FileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = FileOptions::default().compression_method(CompressionMethod::Deflated);

        // The mimetype entry must come first, uncompressed.
        zip.start_file("mimetype", stored)?;
        zip.write_all(b"application/epub+zip")?;

        zip.start_file("META-INF/container.xml", deflated)?;
        zip.write_all(CONTAINER_XML.as_bytes())?;
        zip.start_file("EPUB/content.opf", deflated)?;
        zip.write_all(self.content_opf().as_bytes())?;
        zip.start_file("EPUB/toc.ncx", deflated)?;
        zip.write_all(self.toc_ncx().as_bytes())?;
        zip.start_file("EPUB/nav.xhtml", deflated)?;
        zip.write_all(self.nav_xhtml().as_bytes())?;
        zip.start_file("EPUB/chap.xhtml", deflated)?;
        zip.write_all(self.chapter.as_bytes())?;
        for (href, bytes) in &self.images {
            zip.start_file(format!("EPUB/{href}"), stored)?;
            zip.write_all(bytes)?;
        }

        Ok(zip.finish()?.into_inner())
    }

    fn content_opf(&self) -> String {
        let title = encode_text(&self.title);
        let identifier = encode_text(&self.identifier);
        let modified = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        let image_items: String = self
            .images
            .keys()
            .enumerate()
            .map(|(i, href)| {
                format!(
                    "    <item id=\"image_{}\" href=\"{}\" media-type=\"{}\"/>\n",
                    i + 1,
                    encode_double_quoted_attribute(href),
                    image_media_type(href)
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="id" xml:lang="en">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="id">{identifier}</dc:identifier>
    <dc:title>{title}</dc:title>
    <dc:language>en</dc:language>
    <meta property="dcterms:modified">{modified}</meta>
  </metadata>
  <manifest>
    <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
    <item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
    <item id="chapter_0" href="chap.xhtml" media-type="application/xhtml+xml"/>
{image_items}  </manifest>
  <spine toc="ncx">
    <itemref idref="nav"/>
    <itemref idref="chapter_0"/>
  </spine>
</package>
"#
        )
    }

    fn toc_ncx(&self) -> String {
        let title = encode_text(&self.title);
        let identifier = encode_text(&self.identifier);
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
    <meta name="dtb:uid" content="{identifier}"/>
    <meta name="dtb:depth" content="1"/>
  </head>
  <docTitle><text>{title}</text></docTitle>
  <navMap>
    <navPoint id="chap_1" playOrder="1">
      <navLabel><text>{title}</text></navLabel>
      <content src="chap.xhtml"/>
    </navPoint>
  </navMap>
</ncx>
"#
        )
    }

    fn nav_xhtml(&self) -> String {
        let title = encode_text(&self.title);
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" lang="en" xml:lang="en">
<head><title>{title}</title></head>
<body>
  <nav epub:type="toc" id="toc">
    <h2>{title}</h2>
    <ol>
      <li><a href="chap.xhtml">{title}</a></li>
    </ol>
  </nav>
</body>
</html>
"#
        )
    }
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().take(8).map(|b| format!("{b:02x}")).collect()
}

#[async_trait::async_trait]
impl Exporter for EpubExporter {
    fn extension(&self) -> &'static str {
        "epub"
    }

    async fn export(
        &self,
        content: &str,
        title: &str,
        output: &Path,
        images_folder: Option<&Path>,
    ) -> Result<(), ExportError> {
        let bytes = EpubBook::assemble(content, title, images_folder).package()?;
        write_output(output, &bytes)?;
        Ok(())
    }
}
