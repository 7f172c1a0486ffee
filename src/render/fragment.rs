//! The injected fragment: parsed markup plus its current layout.
//!
//! Every injection gets a fresh generation. [`NodeRef`] handles carry the
//! generation they were issued for, so a handle held across a content
//! replacement stops resolving instead of pointing at an unrelated node.

use crate::dom::parser::parse_fragment;
use crate::dom::DomNode;
use crate::render::layout::{compute_layout, LayoutBox, LayoutNode, LayoutTree, NodeId};

/// Weak, lookup-only handle to a node of one fragment generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub generation: u64,
    pub id: NodeId,
}

/// How the overlay target is located inside the fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelector {
    /// First element carrying this class, in document order
    Class(String),
    /// A handle resolved earlier by the host
    Handle(NodeRef),
}

impl TargetSelector {
    pub fn class(name: impl Into<String>) -> Self {
        Self::Class(name.into())
    }
}

pub struct Fragment {
    generation: u64,
    dom: DomNode,
    layout: LayoutTree,
    width: f32,
    text_scale: f32,
}

impl Fragment {
    /// Parse `markup` and lay it out at `width`.
    pub fn inject(markup: &str, generation: u64, width: f32, text_scale: f32) -> Self {
        let dom = parse_fragment(markup);
        let layout = compute_layout(&dom, width, text_scale);
        log::debug!(
            "fragment #{}: {} nodes, {:.0}px tall at {:.0}px",
            generation,
            layout.len(),
            layout.content_height(),
            width
        );
        Self {
            generation,
            dom,
            layout,
            width,
            text_scale,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn layout(&self) -> &LayoutTree {
        &self.layout
    }

    pub fn dom(&self) -> &DomNode {
        &self.dom
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn content_height(&self) -> f32 {
        self.layout.content_height()
    }

    /// Re-run layout. Node ids are stable across reflows because the tree is
    /// unchanged, so outstanding handles stay valid.
    pub fn reflow(&mut self, width: f32, text_scale: f32) {
        self.layout = compute_layout(&self.dom, width, text_scale);
        self.width = width;
        self.text_scale = text_scale;
    }

    pub fn text_scale(&self) -> f32 {
        self.text_scale
    }

    pub fn root(&self) -> NodeRef {
        self.handle(LayoutTree::ROOT)
    }

    fn handle(&self, id: NodeId) -> NodeRef {
        NodeRef {
            generation: self.generation,
            id,
        }
    }

    /// Whether `node` is this fragment's root or one of its descendants.
    pub fn contains(&self, node: NodeRef) -> bool {
        node.generation == self.generation && node.id < self.layout.len()
    }

    pub fn resolve(&self, node: NodeRef) -> Option<&LayoutNode> {
        if self.contains(node) {
            self.layout.get(node.id)
        } else {
            None
        }
    }

    /// Element under a point given in fragment coordinates.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<NodeRef> {
        self.layout.hit_test(x, y).map(|id| self.handle(id))
    }

    /// Resolve a selector to a single handle.
    pub fn select(&self, selector: &TargetSelector) -> Option<NodeRef> {
        match selector {
            TargetSelector::Handle(node) => self.contains(*node).then_some(*node),
            TargetSelector::Class(class) => {
                let matches = self.layout.find_by_class(class);
                if matches.len() > 1 {
                    log::warn!(
                        "{} elements carry `{}`; anchoring overlays to the first",
                        matches.len(),
                        class
                    );
                }
                matches.first().map(|&id| self.handle(id))
            }
        }
    }

    pub fn bounds(&self, node: NodeRef) -> Option<LayoutBox> {
        self.resolve(node).map(|n| n.bounds)
    }

    pub fn offset_box(&self, node: NodeRef) -> Option<LayoutBox> {
        if !self.contains(node) {
            return None;
        }
        self.layout.offset_box(node.id)
    }

    /// Origin of the element `offset_box` is measured from.
    pub fn offset_origin(&self, node: NodeRef) -> Option<LayoutBox> {
        if !self.contains(node) {
            return None;
        }
        let parent = self.layout.offset_parent(node.id)?;
        self.layout.get(parent).map(|p| p.bounds)
    }
}
