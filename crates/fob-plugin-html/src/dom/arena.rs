//! Arena-based HTML tree.
//!
//! Every node lives in one vector owned by [`HtmlDom`]; parent and child links
//! are indices into it. Nodes are never freed, a detached node simply has no
//! parent.

use html5ever::{ns, LocalName, QualName};

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

/// Attribute of an element.
///
/// `value: None` is a boolean attribute written without a value (`nomodule`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QualName,
    pub value: Option<String>,
}

impl Attribute {
    /// HTML-namespace-less attribute with a value.
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: attr_name(name),
            value: Some(value.into()),
        }
    }

    /// Attribute written without a value.
    pub fn boolean(name: &str) -> Self {
        Self {
            name: attr_name(name),
            value: None,
        }
    }

    pub fn local_name(&self) -> &str {
        self.name.local.as_ref()
    }
}

fn attr_name(name: &str) -> QualName {
    QualName::new(None, ns!(), LocalName::from(name))
}

/// Payload of a node.
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    Element {
        // Boxed so the name keeps its address while the arena grows.
        name: Box<QualName>,
        attrs: Vec<Attribute>,
    },
    Text(String),
    Comment(String),
    /// Markup written to the output verbatim.
    Raw(String),
}

#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Owned HTML tree.
#[derive(Debug)]
pub struct HtmlDom {
    nodes: Vec<Node>,
}

impl Default for HtmlDom {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlDom {
    /// Create a tree holding only the document root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
        }
    }

    /// The document root.
    pub fn document(&self) -> NodeId {
        NodeId(0)
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        self.alloc(NodeData::Element {
            name: Box::new(name),
            attrs,
        })
    }

    /// Create an HTML element from its local name.
    pub fn create_html_element(&mut self, tag: &str, attrs: Vec<Attribute>) -> NodeId {
        self.create_element(QualName::new(None, ns!(html), LocalName::from(tag)), attrs)
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Comment(text.into()))
    }

    pub fn create_raw(&mut self, markup: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Raw(markup.into()))
    }

    pub fn create_doctype(
        &mut self,
        name: impl Into<String>,
        public_id: impl Into<String>,
        system_id: impl Into<String>,
    ) -> NodeId {
        self.alloc(NodeData::Doctype {
            name: name.into(),
            public_id: public_id.into(),
            system_id: system_id.into(),
        })
    }

    /// Remove a node from its parent, if any.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|&child| child != id);
        }
    }

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Insert `child` as the first child of `parent`.
    pub fn prepend(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.insert(0, child);
    }

    /// Insert `new_node` right before `sibling`.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let Some(parent) = self.node(sibling).parent else {
            return;
        };
        self.detach(new_node);
        let index = self.child_index(parent, sibling).unwrap_or(0);
        self.node_mut(new_node).parent = Some(parent);
        self.node_mut(parent).children.insert(index, new_node);
    }

    /// Put `new_node` at the position of `old`, detaching `old`.
    pub fn replace(&mut self, old: NodeId, new_node: NodeId) {
        let Some(parent) = self.node(old).parent else {
            return;
        };
        self.detach(new_node);
        if let Some(index) = self.child_index(parent, old) {
            self.node_mut(parent).children[index] = new_node;
            self.node_mut(new_node).parent = Some(parent);
            self.node_mut(old).parent = None;
        }
    }

    /// Append text, merging into a trailing text node.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(&last) = self.node(parent).children.last() {
            if let NodeData::Text(existing) = &mut self.node_mut(last).data {
                existing.push_str(text);
                return;
            }
        }
        let text_node = self.create_text(text);
        self.append(parent, text_node);
    }

    /// Detach every child of `parent`.
    pub fn clear_children(&mut self, parent: NodeId) {
        let children = std::mem::take(&mut self.node_mut(parent).children);
        for child in children {
            self.node_mut(child).parent = None;
        }
    }

    /// Move every child of `from` to the end of `to`.
    pub fn reparent_children(&mut self, from: NodeId, to: NodeId) {
        let children = std::mem::take(&mut self.node_mut(from).children);
        for child in children {
            self.node_mut(child).parent = Some(to);
            self.node_mut(to).children.push(child);
        }
    }

    fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.node(parent).children.iter().position(|&c| c == child)
    }

    pub fn children(&self, parent: NodeId) -> &[NodeId] {
        &self.node(parent).children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Element children of `parent` whose local name is `tag`.
    pub fn child_elements<'a>(
        &'a self,
        parent: NodeId,
        tag: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(parent)
            .iter()
            .copied()
            .filter(move |&child| self.is_element_named(child, tag))
    }

    pub fn qual_name(&self, id: NodeId) -> Option<&QualName> {
        match &self.node(id).data {
            NodeData::Element { name, .. } => Some(&**name),
            _ => None,
        }
    }

    pub fn element_name(&self, id: NodeId) -> Option<&str> {
        self.qual_name(id).map(|name| name.local.as_ref())
    }

    pub fn is_element_named(&self, id: NodeId, tag: &str) -> bool {
        self.element_name(id) == Some(tag)
    }

    pub fn attrs(&self, id: NodeId) -> &[Attribute] {
        match &self.node(id).data {
            NodeData::Element { attrs, .. } => attrs,
            _ => &[],
        }
    }

    pub(crate) fn attrs_mut(&mut self, id: NodeId) -> Option<&mut Vec<Attribute>> {
        match &mut self.node_mut(id).data {
            NodeData::Element { attrs, .. } => Some(attrs),
            _ => None,
        }
    }

    /// Attribute value by local name; boolean attributes read as `""`.
    pub fn get_attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|attr| attr.local_name() == name)
            .map(|attr| attr.value.as_deref().unwrap_or(""))
    }

    /// Concatenated text of all descendant text nodes.
    #[cfg(test)]
    pub(crate) fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    #[cfg(test)]
    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.node(id).data {
            NodeData::Text(text) => out.push_str(text),
            _ => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// First element named `tag` in document order.
    #[cfg(test)]
    pub(crate) fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        let mut stack = vec![self.document()];
        while let Some(id) = stack.pop() {
            if self.is_element_named(id, tag) {
                return Some(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        None
    }
}
