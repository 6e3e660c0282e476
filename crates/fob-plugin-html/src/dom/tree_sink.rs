//! html5ever TreeSink building an [`HtmlDom`].

use std::borrow::Cow;
use std::cell::RefCell;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute as Html5Attribute, QualName};
use tracing::trace;

use super::arena::{Attribute, HtmlDom, NodeId};

/// Parse a full HTML document.
///
/// html5ever creates the `html`, `head` and `body` elements when the source
/// omits them.
pub fn parse_html(source: &str) -> HtmlDom {
    parse_document(DomSink::default(), ParseOpts::default())
        .from_utf8()
        .one(source.as_bytes())
        .into_dom()
}

/// TreeSink writing into an [`HtmlDom`].
///
/// html5ever hands out `&self` only, so the tree sits in a `RefCell`.
#[derive(Default)]
pub struct DomSink {
    dom: RefCell<HtmlDom>,
}

impl DomSink {
    pub fn into_dom(self) -> HtmlDom {
        self.dom.into_inner()
    }

    fn insert(&self, parent: NodeId, child: NodeOrText<NodeId>) {
        let mut dom = self.dom.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => dom.append(parent, node),
            NodeOrText::AppendText(text) => dom.append_text(parent, &text),
        }
    }
}

impl TreeSink for DomSink {
    type Handle = NodeId;
    type Output = Self;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        trace!("[fob-html] template parse error: {}", msg);
    }

    fn get_document(&self) -> Self::Handle {
        self.dom.borrow().document()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        static EMPTY: QualName = QualName {
            prefix: None,
            ns: html5ever::ns!(),
            local: html5ever::local_name!(""),
        };

        let dom = self.dom.borrow();
        match dom.qual_name(*target) {
            // SAFETY: element names are boxed, never mutated and never freed
            // while the sink is alive, so the pointee outlives the borrow.
            Some(name) => unsafe { &*(name as *const QualName) },
            None => &EMPTY,
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Html5Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let attrs = attrs
            .into_iter()
            .map(|attr| Attribute {
                name: attr.name,
                value: Some(attr.value.to_string()),
            })
            .collect();
        self.dom.borrow_mut().create_element(name, attrs)
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.dom.borrow_mut().create_comment(text.to_string())
    }

    fn create_pi(&self, _target: StrTendril, data: StrTendril) -> Self::Handle {
        self.dom.borrow_mut().create_comment(data.to_string())
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        self.insert(*parent, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let parent = self.dom.borrow().parent(*element);
        match parent {
            Some(_) => self.append_before_sibling(element, child),
            None => self.insert(*prev_element, child),
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        let mut dom = self.dom.borrow_mut();
        let document = dom.document();
        let doctype = dom.create_doctype(
            name.to_string(),
            public_id.to_string(),
            system_id.to_string(),
        );
        dom.append(document, doctype);
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut dom = self.dom.borrow_mut();
        let node = match new_node {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(text) => dom.create_text(text.to_string()),
        };
        dom.insert_before(*sibling, node);
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Html5Attribute>) {
        let mut dom = self.dom.borrow_mut();
        if let Some(existing) = dom.attrs_mut(*target) {
            for attr in attrs {
                if !existing.iter().any(|a| a.name == attr.name) {
                    existing.push(Attribute {
                        name: attr.name,
                        value: Some(attr.value.to_string()),
                    });
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.dom.borrow_mut().detach(*target);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        self.dom.borrow_mut().reparent_children(*node, *new_parent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_creates_head_and_body() {
        let dom = parse_html("<html></html>");
        let html = dom.find_by_tag("html").expect("html element");
        let children: Vec<_> = dom
            .children(html)
            .iter()
            .filter_map(|&c| dom.element_name(c))
            .collect();

        assert_eq!(children, vec!["head", "body"]);
    }

    #[test]
    fn test_parse_attributes_and_text() {
        let dom = parse_html(r#"<html><head><meta name="viewport" content="x"><title>Hi</title></head></html>"#);

        let meta = dom.find_by_tag("meta").unwrap();
        assert_eq!(dom.get_attr(meta, "name"), Some("viewport"));
        assert_eq!(dom.get_attr(meta, "content"), Some("x"));

        let title = dom.find_by_tag("title").unwrap();
        assert_eq!(dom.text_content(title), "Hi");
    }

    #[test]
    fn test_parse_keeps_doctype() {
        let dom = parse_html("<!DOCTYPE html><html></html>");
        let first = dom.children(dom.document())[0];
        assert!(matches!(
            dom.node(first).data,
            crate::dom::NodeData::Doctype { .. }
        ));
    }
}
