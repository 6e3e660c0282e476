//! Document accessor
//!
//! Wraps a parsed [`HtmlDom`] with the `html`, `head` and `body` elements
//! located (or created) once, and the insertion primitives shared by the
//! injector and the decorators.

use crate::dom::{parse_html, serialize_document, Attribute, HtmlDom, NodeId};
use crate::normalize::InsertPoint;

/// Text node written before every inserted element
pub const SEPARATOR: &str = "\n  ";

/// HTML document under construction
#[derive(Debug)]
pub struct Document {
    dom: HtmlDom,
    html: NodeId,
    head: NodeId,
    body: NodeId,
}

impl Document {
    /// Parse markup and locate the `html`, `head` and `body` elements
    pub fn parse(source: &str) -> Self {
        Self::from_dom(parse_html(source))
    }

    pub fn from_dom(mut dom: HtmlDom) -> Self {
        let root = dom.document();
        let html = get_or_create(&mut dom, root, "html", true);
        let head = get_or_create(&mut dom, html, "head", false);
        let body = get_or_create(&mut dom, html, "body", true);
        Self {
            dom,
            html,
            head,
            body,
        }
    }

    pub fn dom(&self) -> &HtmlDom {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut HtmlDom {
        &mut self.dom
    }

    pub fn html(&self) -> NodeId {
        self.html
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn target(&self, point: InsertPoint) -> NodeId {
        match point {
            InsertPoint::Head => self.head,
            InsertPoint::Body => self.body,
        }
    }

    /// Append a separator text node followed by `node`
    pub fn insert_with_separator(&mut self, parent: NodeId, node: NodeId) {
        let separator = self.dom.create_text(SEPARATOR);
        self.dom.append(parent, separator);
        self.dom.append(parent, node);
    }

    /// Create an element and insert it into `parent` with a separator
    pub fn insert_element(&mut self, parent: NodeId, tag: &str, attrs: Vec<Attribute>) -> NodeId {
        let node = self.dom.create_html_element(tag, attrs);
        self.insert_with_separator(parent, node);
        node
    }

    /// Replace the first `tag` child of `parent` matching `predicate` in
    /// place, or append a new node when none matches
    pub fn replace_or_append<P, F>(
        &mut self,
        parent: NodeId,
        tag: &str,
        predicate: P,
        factory: F,
    ) -> NodeId
    where
        P: Fn(&HtmlDom, NodeId) -> bool,
        F: FnOnce(&mut HtmlDom) -> NodeId,
    {
        let existing = self
            .dom
            .child_elements(parent, tag)
            .find(|&child| predicate(&self.dom, child));

        let node = factory(&mut self.dom);
        match existing {
            Some(old) => self.dom.replace(old, node),
            None => self.insert_with_separator(parent, node),
        }
        node
    }

    pub fn serialize(&self) -> String {
        serialize_document(&self.dom)
    }
}

/// First child element of `parent` named `tag`, created when missing
fn get_or_create(dom: &mut HtmlDom, parent: NodeId, tag: &str, append_if_missing: bool) -> NodeId {
    if let Some(existing) = dom.child_elements(parent, tag).next() {
        return existing;
    }

    let node = dom.create_html_element(tag, Vec::new());
    if append_if_missing {
        dom.append(parent, node);
    } else {
        dom.prepend(parent, node);
    }
    node
}
