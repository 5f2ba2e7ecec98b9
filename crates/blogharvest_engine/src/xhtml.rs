use ego_tree::NodeRef;
use html_escape::{encode_double_quoted_attribute, encode_text};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];
const SKIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "iframe", "template", "head", "title",
];

/// Re-serializes exported markup as well-formed XHTML body content.
///
/// The markup may be a whole page or a single container; either way the
/// children of `<body>` are emitted. `<img src>` values are passed through
/// `rewrite_img_src`, which may substitute a local path.
pub struct XhtmlSerializer<F> {
    rewrite_img_src: F,
    out: String,
}

impl<F> XhtmlSerializer<F>
where
    F: FnMut(&str) -> Option<String>,
{
    pub fn new(rewrite_img_src: F) -> Self {
        Self {
            rewrite_img_src,
            out: String::new(),
        }
    }

    pub fn serialize(mut self, markup: &str) -> String {
        let document = Html::parse_document(markup);
        let body = Selector::parse("body")
            .ok()
            .and_then(|sel| document.select(&sel).next())
            .unwrap_or_else(|| document.root_element());
        self.visit_children(body);
        self.out
    }

    fn visit_node(&mut self, node: NodeRef<'_, Node>) {
        match node.value() {
            Node::Text(text) => self.out.push_str(&encode_text(&**text)),
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(node) {
                    self.visit_element(element);
                }
            }
            Node::Comment(_) | Node::Doctype(_) | Node::ProcessingInstruction(_) => {}
            _ => {
                for child in node.children() {
                    self.visit_node(child);
                }
            }
        }
    }

    fn visit_element(&mut self, element: ElementRef<'_>) {
        let tag = element.value().name().to_ascii_lowercase();
        if SKIPPED_ELEMENTS.contains(&tag.as_str()) {
            return;
        }
        if !is_xml_name(&tag) {
            self.visit_children(element);
            return;
        }

        self.out.push('<');
        self.out.push_str(&tag);
        for (name, value) in element.value().attrs() {
            if !is_xml_name(name) || name.contains(':') {
                continue;
            }
            let value = if tag == "img" && name == "src" {
                (self.rewrite_img_src)(value).unwrap_or_else(|| value.to_string())
            } else {
                value.to_string()
            };
            self.out.push(' ');
            self.out.push_str(name);
            self.out.push_str("=\"");
            self.out.push_str(&encode_double_quoted_attribute(&value));
            self.out.push('"');
        }

        if VOID_ELEMENTS.contains(&tag.as_str()) {
            self.out.push_str("/>");
            return;
        }
        self.out.push('>');
        self.visit_children(element);
        self.out.push_str("</");
        self.out.push_str(&tag);
        self.out.push('>');
    }

    fn visit_children(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            self.visit_node(child);
        }
    }
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

/// Serialize `markup` as XHTML without touching image sources.
pub fn to_xhtml(markup: &str) -> String {
    XhtmlSerializer::new(|_| None).serialize(markup)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn void_elements_self_close_and_text_is_escaped() {
        let out = to_xhtml("<p>a &amp; b<br>c<img alt='\"q\"'></p>");
        assert_eq!(out, "<p>a &amp; b<br/>c<img alt=\"&quot;q&quot;\"/></p>");
    }

    #[test]
    fn scripts_and_comments_are_dropped() {
        let out = to_xhtml("<div><script>x()</script><!-- c --><b>keep</b></div>");
        assert_eq!(out, "<div><b>keep</b></div>");
    }

    #[test]
    fn image_sources_can_be_rewritten() {
        let out = XhtmlSerializer::new(|src: &str| Some(format!("images/{src}")))
            .serialize("<img src=\"a.png\">");
        assert_eq!(out, "<img src=\"images/a.png\"/>");
    }
}
