//! Static decorators
//!
//! Merge the configured meta entries, generated markers, title and favicon
//! into the document. Meta and favicon links are keyed by an attribute and
//! replaced in place, so running a decorator twice does not duplicate tags.

use indexmap::IndexMap;

use crate::document::Document;
use crate::dom::{Attribute, HtmlDom, NodeId};

const FAVICON_REL: &str = "shortcut icon";

/// Replace or append one `<meta name content>` per entry
pub fn apply_meta(document: &mut Document, meta: &IndexMap<String, String>) {
    let head = document.head();
    for (name, content) in meta {
        document.replace_or_append(
            head,
            "meta",
            |dom: &HtmlDom, node: NodeId| dom.get_attr(node, "name") == Some(name.as_str()),
            |dom: &mut HtmlDom| {
                dom.create_html_element(
                    "meta",
                    vec![
                        Attribute::new("name", name.as_str()),
                        Attribute::new("content", content.as_str()),
                    ],
                )
            },
        );
    }
}

/// Append raw markup snippets to `head`, each followed by a newline
pub fn apply_markers(document: &mut Document, markers: &[String]) {
    let head = document.head();
    let dom = document.dom_mut();
    for marker in markers {
        let raw = dom.create_raw(marker.as_str());
        dom.append(head, raw);
        let newline = dom.create_text("\n");
        dom.append(head, newline);
    }
}

/// Set the text of `<title>`, creating the element when missing
pub fn apply_title(document: &mut Document, title: &str) {
    let head = document.head();
    let existing = document.dom().child_elements(head, "title").next();
    let node = match existing {
        Some(node) => {
            document.dom_mut().clear_children(node);
            node
        }
        None => document.insert_element(head, "title", Vec::new()),
    };
    document.dom_mut().append_text(node, title);
}

/// Point the `<link rel="shortcut icon">` at `href`
pub fn apply_favicon(document: &mut Document, href: &str) {
    let head = document.head();
    document.replace_or_append(
        head,
        "link",
        |dom: &HtmlDom, node: NodeId| dom.get_attr(node, "rel") == Some(FAVICON_REL),
        |dom: &mut HtmlDom| {
            dom.create_html_element(
                "link",
                vec![Attribute::new("rel", FAVICON_REL), Attribute::new("href", href)],
            )
        },
    );
}
