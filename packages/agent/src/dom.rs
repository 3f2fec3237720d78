//! A lightweight DOM for the previewed document.
//!
//! The real previewed page is a browser document; this is the minimal tree
//! the agent needs to operate: elements with attributes, children, and an
//! on-screen rect, plus text nodes. Hosts build it to mirror the rendered
//! page and keep rects current.

use crate::BLOCK_ID_ATTR;
use sitecanvas_protocol::Rect;
use std::collections::HashMap;

/// One node in the preview tree.
#[derive(Debug, Clone, PartialEq)]
pub enum DomNode {
    Element {
        tag: String,
        attributes: HashMap<String, String>,
        children: Vec<DomNode>,
        /// Bounding box in the document's own coordinate space.
        rect: Rect,
    },
    Text {
        content: String,
    },
}

impl DomNode {
    pub fn element(tag: impl Into<String>) -> Self {
        DomNode::Element {
            tag: tag.into(),
            attributes: HashMap::new(),
            children: Vec::new(),
            rect: Rect::default(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        DomNode::Text {
            content: content.into(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let DomNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_child(mut self, child: DomNode) -> Self {
        if let DomNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_rect(mut self, r: Rect) -> Self {
        if let DomNode::Element { ref mut rect, .. } = self {
            *rect = r;
        }
        self
    }

    /// Mark this element as a content block.
    pub fn with_block_id(self, element_id: impl Into<String>) -> Self {
        self.with_attr(BLOCK_ID_ATTR, element_id)
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            DomNode::Element { tag, .. } => Some(tag),
            DomNode::Text { .. } => None,
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            DomNode::Element { attributes, .. } => attributes.get(key).map(String::as_str),
            DomNode::Text { .. } => None,
        }
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        if let DomNode::Element { attributes, .. } = self {
            attributes.insert(key.into(), value.into());
        }
    }

    pub fn remove_attr(&mut self, key: &str) {
        if let DomNode::Element { attributes, .. } = self {
            attributes.remove(key);
        }
    }

    pub fn attributes(&self) -> Option<&HashMap<String, String>> {
        match self {
            DomNode::Element { attributes, .. } => Some(attributes),
            DomNode::Text { .. } => None,
        }
    }

    pub fn rect(&self) -> Rect {
        match self {
            DomNode::Element { rect, .. } => *rect,
            DomNode::Text { .. } => Rect::default(),
        }
    }

    pub fn block_id(&self) -> Option<&str> {
        self.attr(BLOCK_ID_ATTR)
    }

    /// Concatenated descendant text.
    pub fn text_content(&self) -> String {
        match self {
            DomNode::Text { content } => content.clone(),
            DomNode::Element { children, .. } => {
                children.iter().map(|c| c.text_content()).collect()
            }
        }
    }

    /// Replace all children with a single text node.
    pub fn set_text_content(&mut self, text: impl Into<String>) {
        if let DomNode::Element { children, .. } = self {
            children.clear();
            children.push(DomNode::text(text));
        }
    }

    fn find_map<'a, T>(&'a self, f: &mut impl FnMut(&'a DomNode) -> Option<T>) -> Option<T> {
        if let Some(found) = f(self) {
            return Some(found);
        }
        if let DomNode::Element { children, .. } = self {
            for child in children {
                if let Some(found) = child.find_map(f) {
                    return Some(found);
                }
            }
        }
        None
    }

    fn find_mut_by(
        &mut self,
        pred: &impl Fn(&DomNode) -> bool,
    ) -> Option<&mut DomNode> {
        if pred(self) {
            return Some(self);
        }
        if let DomNode::Element { children, .. } = self {
            for child in children {
                if let Some(found) = child.find_mut_by(pred) {
                    return Some(found);
                }
            }
        }
        None
    }

    fn for_each_mut(&mut self, f: &mut impl FnMut(&mut DomNode)) {
        f(self);
        if let DomNode::Element { children, .. } = self {
            for child in children {
                child.for_each_mut(f);
            }
        }
    }
}

/// The previewed document as the agent sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewDocument {
    pub root: DomNode,
    /// Whether this document is hosted inside another document's frame.
    pub embedded: bool,
}

impl PreviewDocument {
    pub fn new(root: DomNode, embedded: bool) -> Self {
        Self { root, embedded }
    }

    /// Find a content block by element id.
    pub fn find_block(&self, element_id: &str) -> Option<&DomNode> {
        self.root
            .find_map(&mut |node| (node.block_id() == Some(element_id)).then_some(node))
    }

    pub fn find_block_mut(&mut self, element_id: &str) -> Option<&mut DomNode> {
        self.root
            .find_mut_by(&|node| node.block_id() == Some(element_id))
    }

    /// Resolve a selector to the element id of the first matching block.
    ///
    /// Supports the small subset the editor sends: `#id`, `[attr="value"]`,
    /// and bare tag names. Matches that are not content blocks are skipped.
    pub fn resolve_selector(&self, selector: &str) -> Option<String> {
        let matcher: Box<dyn Fn(&DomNode) -> bool> = if let Some(id) = selector.strip_prefix('#') {
            let id = id.to_string();
            Box::new(move |node: &DomNode| node.attr("id") == Some(id.as_str()))
        } else if let Some(body) = selector
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
        {
            let (key, value) = body.split_once('=')?;
            let key = key.to_string();
            let value = value.trim_matches('"').to_string();
            Box::new(move |node: &DomNode| node.attr(&key) == Some(value.as_str()))
        } else {
            let tag = selector.to_string();
            Box::new(move |node: &DomNode| node.tag() == Some(tag.as_str()))
        };

        self.root.find_map(&mut |node| {
            (matcher(node)).then(|| node.block_id().map(str::to_string))?
        })
    }

    /// Apply `f` to every element carrying a block id.
    pub fn for_each_block_mut(&mut self, mut f: impl FnMut(&mut DomNode)) {
        self.root.for_each_mut(&mut |node| {
            if node.block_id().is_some() {
                f(node);
            }
        });
    }

    /// All element ids currently carrying `attr`.
    pub fn blocks_with_attr(&self, attr: &str) -> Vec<String> {
        let mut out = Vec::new();
        let _ = self.root.find_map(&mut |node| -> Option<()> {
            if node.block_id().is_some() && node.attr(attr).is_some() {
                out.push(node.block_id().unwrap_or_default().to_string());
            }
            None
        });
        out
    }
}
