use ego_tree::NodeId;
use engine_logging::engine_debug;
use html5ever::tendril::StrTendril as AttrValue;
use html5ever::{ns, Attribute, LocalName, QualName};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use scraper::node::{Element, Text};
use scraper::{ElementRef, Html, Node, StrTendril};

/// How a post body is parsed, decided from the response content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupKind {
    Html,
    Xml,
}

/// Parsed markup of one post.
///
/// HTML goes through the HTML5 parser. XML is read with an XML reader and its
/// elements are placed under a synthetic root, so self-closing elements stay
/// empty and no `head`/`body` scaffolding is invented. The tree is not
/// `Send`; build it, query it and drop it between two await points.
pub struct ContentTree {
    document: Html,
    kind: MarkupKind,
}

impl ContentTree {
    pub fn parse(markup: &str, kind: MarkupKind) -> Self {
        let document = match kind {
            MarkupKind::Html => Html::parse_document(markup),
            MarkupKind::Xml => parse_xml(markup),
        };
        Self { document, kind }
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.document.root_element()
    }

    /// Serialized markup of the whole tree.
    pub fn markup(&self) -> String {
        match self.kind {
            MarkupKind::Html => self.document.root_element().html(),
            MarkupKind::Xml => self.document.root_element().inner_html(),
        }
    }
}

/// Build a scraper tree from XML events. Parsing stops at the first syntax
/// error; everything read up to that point is kept.
fn parse_xml(markup: &str) -> Html {
    let mut document = Html::new_fragment();
    let root = document
        .tree
        .root_mut()
        .append(Node::Element(Element::new(element_name(b"html"), Vec::new())))
        .id();

    let mut open = vec![root];
    let mut reader = Reader::from_str(markup);
    loop {
        let parent = open.last().copied().unwrap_or(root);
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                if let Some(id) = append(&mut document, parent, xml_element(&start)) {
                    open.push(id);
                }
            }
            Ok(Event::Empty(start)) => {
                append(&mut document, parent, xml_element(&start));
            }
            Ok(Event::End(_)) => {
                if open.len() > 1 {
                    open.pop();
                }
            }
            Ok(Event::Text(text)) => {
                let value = match text.unescape() {
                    Ok(value) => value.into_owned(),
                    Err(_) => String::from_utf8_lossy(&text).into_owned(),
                };
                append(&mut document, parent, text_node(&value));
            }
            Ok(Event::CData(data)) => {
                append(&mut document, parent, text_node(&String::from_utf8_lossy(&data)));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                engine_debug!(
                    "XML parsing stopped at byte {}: {}",
                    reader.buffer_position(),
                    err
                );
                break;
            }
        }
    }
    document
}

fn append(document: &mut Html, parent: NodeId, node: Node) -> Option<NodeId> {
    document
        .tree
        .get_mut(parent)
        .map(|mut parent| parent.append(node).id())
}

fn xml_element(start: &BytesStart<'_>) -> Node {
    let attrs = start
        .attributes()
        .flatten()
        .filter(|attr| attr.key.as_namespace_binding().is_none())
        .map(|attr| {
            let value = match attr.unescape_value() {
                Ok(value) => value.into_owned(),
                Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
            };
            Attribute {
                name: attribute_name(attr.key.local_name().as_ref()),
                value: AttrValue::from_slice(&value),
            }
        })
        .collect();
    Node::Element(Element::new(element_name(start.local_name().as_ref()), attrs))
}

fn text_node(value: &str) -> Node {
    Node::Text(Text {
        text: StrTendril::from_slice(value),
    })
}

fn element_name(local: &[u8]) -> QualName {
    QualName::new(None, ns!(html), local_name(local))
}

fn attribute_name(local: &[u8]) -> QualName {
    QualName::new(None, ns!(), local_name(local))
}

fn local_name(raw: &[u8]) -> LocalName {
    LocalName::from(String::from_utf8_lossy(raw).as_ref())
}
