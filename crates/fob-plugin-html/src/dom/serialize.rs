//! Serialize an [`HtmlDom`] back to markup.

use super::arena::{Attribute, HtmlDom, NodeData, NodeId};

/// Elements that never have an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text is written without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script",
    "style",
    "xmp",
    "iframe",
    "noembed",
    "noframes",
    "noscript",
    "plaintext",
];

/// Serialize the whole document.
///
/// The output always starts with `<!doctype html>` followed by a newline.
/// Doctype nodes kept from the template are not written a second time.
pub fn serialize_document(dom: &HtmlDom) -> String {
    let mut out = String::from("<!doctype html>\n");
    for &child in dom.children(dom.document()) {
        if matches!(dom.node(child).data, NodeData::Doctype { .. }) {
            continue;
        }
        write_node(dom, child, false, &mut out);
    }
    out
}

/// Serialize a single node and its subtree.
pub fn serialize_node(dom: &HtmlDom, id: NodeId) -> String {
    let mut out = String::new();
    write_node(dom, id, false, &mut out);
    out
}

fn write_node(dom: &HtmlDom, id: NodeId, raw_text: bool, out: &mut String) {
    match &dom.node(id).data {
        NodeData::Document => {
            for &child in dom.children(id) {
                write_node(dom, child, false, out);
            }
        }
        NodeData::Doctype { name, .. } => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        NodeData::Element { name, attrs } => {
            let tag: &str = name.local.as_ref();
            out.push('<');
            out.push_str(tag);
            for attr in attrs {
                write_attr(attr, out);
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&tag) {
                return;
            }

            let raw = RAW_TEXT_ELEMENTS.contains(&tag);
            for &child in dom.children(id) {
                write_node(dom, child, raw, out);
            }

            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        NodeData::Text(text) => {
            if raw_text {
                out.push_str(text);
            } else {
                escape_text(text, out);
            }
        }
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeData::Raw(markup) => out.push_str(markup),
    }
}

fn write_attr(attr: &Attribute, out: &mut String) {
    out.push(' ');
    if let Some(prefix) = &attr.name.prefix {
        out.push_str(prefix.as_ref());
        out.push(':');
    }
    out.push_str(attr.local_name());

    if let Some(value) = &attr.value {
        out.push_str("=\"");
        escape_attr(value, out);
        out.push('"');
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    #[test]
    fn test_doctype_prefix_written_once() {
        let dom = parse_html("<!DOCTYPE html><html><head></head><body></body></html>");
        let html = serialize_document(&dom);

        assert!(html.starts_with("<!doctype html>\n<html>"));
        assert_eq!(html.to_lowercase().matches("<!doctype").count(), 1);
    }

    #[test]
    fn test_void_and_boolean_attributes() {
        let mut dom = HtmlDom::new();
        let link = dom.create_html_element(
            "link",
            vec![Attribute::new("rel", "stylesheet"), Attribute::new("href", "a.css")],
        );
        let script = dom.create_html_element(
            "script",
            vec![Attribute::boolean("nomodule"), Attribute::new("src", "a.js")],
        );

        assert_eq!(serialize_node(&dom, link), r#"<link rel="stylesheet" href="a.css">"#);
        assert_eq!(
            serialize_node(&dom, script),
            r#"<script nomodule src="a.js"></script>"#
        );
    }

    #[test]
    fn test_escaping() {
        let mut dom = HtmlDom::new();
        let p = dom.create_html_element("p", vec![Attribute::new("title", "a \"b\" & c")]);
        dom.append_text(p, "1 < 2 & 3");

        assert_eq!(
            serialize_node(&dom, p),
            r#"<p title="a &quot;b&quot; &amp; c">1 &lt; 2 &amp; 3</p>"#
        );
    }

    #[test]
    fn test_script_text_is_raw() {
        let dom = parse_html("<html><head><script>if (a < b && c) {}</script></head></html>");
        let html = serialize_document(&dom);

        assert!(html.contains("<script>if (a < b && c) {}</script>"));
    }

    #[test]
    fn test_noscript_content_round_trips() {
        let source = concat!(
            "<html><head><noscript><link rel=\"stylesheet\" href=\"nojs.css\"></noscript></head>",
            "<body><noscript><img src=\"https://px.test/p.gif\"></noscript></body></html>"
        );
        let html = serialize_document(&parse_html(source));

        assert_eq!(html, format!("<!doctype html>\n{}", source));
        assert!(!html.contains("&lt;"));
    }

    #[test]
    fn test_raw_node_verbatim() {
        let mut dom = HtmlDom::new();
        let body = dom.create_html_element("body", vec![]);
        let raw = dom.create_raw("<!-- keep & raw -->");
        dom.append(body, raw);

        assert_eq!(serialize_node(&dom, body), "<body><!-- keep & raw --></body>");
    }
}
