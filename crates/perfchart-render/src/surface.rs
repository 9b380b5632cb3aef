use crate::format::escape_xml;
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Handle to an element of a [`Surface`]. Only meaningful for the surface that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A shape or group to attach to a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub text: Option<String>,
    /// Emit the text as a CDATA section instead of escaping it (used for scripts).
    pub cdata: bool,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            text: None,
            cdata: false,
        }
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn cdata(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self.cdata = true;
        self
    }
}

/// The scene-graph capability the chart draws into: create, attach and style elements in a
/// tree.
pub trait Surface {
    fn root(&self) -> NodeId;

    fn append(&mut self, parent: NodeId, element: Element) -> Result<NodeId>;

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> Result<()>;

    fn set_text(&mut self, node: NodeId, text: &str) -> Result<()>;

    fn attr(&self, node: NodeId, name: &str) -> Option<&str>;

    fn text(&self, node: NodeId) -> Option<&str>;

    fn children(&self, node: NodeId) -> &[NodeId];
}

#[derive(Debug, Clone)]
struct Node {
    element: Element,
    children: Vec<NodeId>,
}

/// In-memory surface that serializes to SVG markup.
///
/// The root is a bare fragment: only its descendants are written out, so the root plays the
/// role of the page container the chart is attached to.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    arena: Vec<Node>,
}

impl Default for SvgSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgSurface {
    pub fn new() -> Self {
        Self {
            arena: vec![Node {
                element: Element::new("#fragment"),
                children: Vec::new(),
            }],
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 1
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.arena.get(node.0).map(|n| n.element.tag.as_str())
    }

    /// Descendants of `node` (depth first, `node` excluded) whose `class` contains `class`.
    pub fn find_by_class(&self, node: NodeId, class: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let has_class = self
                .attr(id, "class")
                .is_some_and(|c| c.split_whitespace().any(|c| c == class));
            if has_class {
                out.push(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    fn node_mut(&mut self, node: NodeId) -> Result<&mut Node> {
        self.arena.get_mut(node.0).ok_or(Error::UnknownNode(node))
    }

    fn render_node(&self, out: &mut String, id: NodeId) {
        let n = &self.arena[id.0];
        out.push('<');
        out.push_str(&n.element.tag);
        for (k, v) in &n.element.attrs {
            let _ = write!(out, r#" {k}="{}""#, escape_xml(v));
        }
        let text = n.element.text.as_deref().unwrap_or("");
        if n.children.is_empty() && text.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if n.element.cdata {
            let _ = write!(out, "<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"));
        } else {
            out.push_str(&escape_xml(text));
        }
        for c in &n.children {
            self.render_node(out, *c);
        }
        let _ = write!(out, "</{}>", n.element.tag);
    }

    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        for c in &self.arena[0].children {
            self.render_node(&mut out, *c);
        }
        out
    }
}

impl Surface for SvgSurface {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn append(&mut self, parent: NodeId, element: Element) -> Result<NodeId> {
        if parent.0 >= self.arena.len() {
            return Err(Error::UnknownNode(parent));
        }
        let id = NodeId(self.arena.len());
        self.arena.push(Node {
            element,
            children: Vec::new(),
        });
        self.arena[parent.0].children.push(id);
        Ok(id)
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        self.node_mut(node)?
            .element
            .attrs
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> Result<()> {
        self.node_mut(node)?.element.text = Some(text.to_string());
        Ok(())
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.arena
            .get(node.0)
            .and_then(|n| n.element.attrs.get(name))
            .map(String::as_str)
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        self.arena
            .get(node.0)
            .and_then(|n| n.element.text.as_deref())
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.arena
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }
}
