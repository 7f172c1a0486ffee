use crate::dom::css::{resolve_style, StyleProps};
use crate::dom::{DomNode, NodeType};

/// Index of a node inside a [`LayoutTree`].
pub type NodeId = usize;

/// Bounding box for a laid-out node, relative to the fragment root origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutBox {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// A markup node with computed layout
#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub tag: String,
    pub classes: Vec<String>,
    pub text: String,
    pub node_type: NodeType,
    pub bounds: LayoutBox,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub is_block: bool,
    pub font_size: f32,
    /// Inherited text colour
    pub color: [f32; 4],
    pub background: Option<[f32; 4]>,
    pub border_radius: f32,
    /// Establishes an offset parent for its descendants
    pub positioned: bool,
}

impl LayoutNode {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn is_element(&self) -> bool {
        self.node_type != NodeType::Text
    }
}

/// Flat arena of laid-out nodes in document order. Index 0 is the fragment
/// root.
#[derive(Debug, Clone, Default)]
pub struct LayoutTree {
    nodes: Vec<LayoutNode>,
}

impl LayoutTree {
    pub const ROOT: NodeId = 0;

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(id)
    }

    pub fn root(&self) -> Option<&LayoutNode> {
        self.nodes.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &LayoutNode)> {
        self.nodes.iter().enumerate()
    }

    /// Total height of the laid-out content.
    pub fn content_height(&self) -> f32 {
        self.root().map(|r| r.bounds.height).unwrap_or(0.0)
    }

    /// Elements carrying `class`, in document order.
    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_element() && n.has_class(class))
            .map(|(id, _)| id)
            .collect()
    }

    /// Deepest element whose box contains the point (fragment coordinates).
    /// Later siblings paint over earlier ones, so they are tested first.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<NodeId> {
        let root = self.root()?;
        if !root.bounds.contains(x, y) {
            return None;
        }
        let mut current = Self::ROOT;
        'descend: loop {
            for &child in self.nodes[current].children.iter().rev() {
                let node = &self.nodes[child];
                if node.is_element() && node.bounds.contains(x, y) {
                    current = child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }

    /// Nearest positioned ancestor, falling back to the fragment root.
    pub fn offset_parent(&self, id: NodeId) -> Option<NodeId> {
        let mut parent = self.nodes.get(id)?.parent;
        while let Some(p) = parent {
            if p == Self::ROOT || self.nodes[p].positioned {
                return Some(p);
            }
            parent = self.nodes[p].parent;
        }
        None
    }

    /// Box relative to the offset parent, the way `offsetTop/Left/Width/Height`
    /// report it.
    pub fn offset_box(&self, id: NodeId) -> Option<LayoutBox> {
        let node = self.nodes.get(id)?;
        let origin = self
            .offset_parent(id)
            .map(|p| self.nodes[p].bounds)
            .unwrap_or_default();
        Some(LayoutBox {
            x: node.bounds.x - origin.x,
            y: node.bounds.y - origin.y,
            width: node.bounds.width,
            height: node.bounds.height,
        })
    }
}

const BLOCK_TAGS: &[&str] = &[
    "html",
    "body",
    "div",
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "table",
    "tr",
    "td",
    "th",
    "form",
    "section",
    "article",
    "aside",
    "main",
    "header",
    "footer",
    "nav",
    "blockquote",
    "pre",
    "figure",
    "figcaption",
    "details",
    "summary",
    "hr",
];

/// Per-tag vertical margins (top, bottom) in pixels.
fn tag_margins(tag: &str) -> (f32, f32) {
    match tag {
        "h1" => (24.0, 16.0),
        "h2" => (20.0, 12.0),
        "h3" | "h4" => (16.0, 10.0),
        "h5" | "h6" => (12.0, 8.0),
        "p" => (4.0, 10.0),
        "ul" | "ol" => (8.0, 8.0),
        "li" => (2.0, 2.0),
        "blockquote" => (12.0, 12.0),
        "pre" => (8.0, 8.0),
        "hr" => (8.0, 8.0),
        _ => (0.0, 0.0),
    }
}

/// Per-tag default font size, if the tag changes it.
fn tag_font_size(tag: &str) -> Option<f32> {
    match tag {
        "h1" => Some(32.0),
        "h2" => Some(24.0),
        "h3" => Some(20.0),
        "h4" => Some(18.0),
        "h5" | "h6" => Some(16.0),
        "small" => Some(12.0),
        _ => None,
    }
}

pub const DEFAULT_FONT_SIZE: f32 = 16.0;
pub const LINE_HEIGHT: f32 = 1.4;
/// Average glyph advance as a fraction of the font size.
const GLYPH_ADVANCE: f32 = 0.6;
const DEFAULT_COLOR: [f32; 4] = [0.1, 0.1, 0.12, 1.0];

/// Inherited properties passed down the tree.
#[derive(Clone, Copy)]
struct Inherited {
    font_size: f32,
    color: [f32; 4],
}

/// Estimated height of a run of text laid out in `width` pixels.
pub fn text_height(text: &str, font_size: f32, width: f32) -> f32 {
    if text.is_empty() {
        return 0.0;
    }
    let line_height = font_size * LINE_HEIGHT;
    let chars_per_line = (width / (font_size * GLYPH_ADVANCE)).max(1.0).floor();
    let lines = (text.chars().count() as f32 / chars_per_line).ceil().max(1.0);
    lines * line_height
}

/// Compute layout for a fragment (simple top-to-bottom block model).
///
/// `text_scale` multiplies every font size, so content can change height
/// without the viewport changing width.
pub fn compute_layout(root: &DomNode, viewport_width: f32, text_scale: f32) -> LayoutTree {
    let mut tree = LayoutTree {
        nodes: Vec::with_capacity(root.node_count()),
    };
    let mut cursor_y = 0.0;
    let inherited = Inherited {
        font_size: DEFAULT_FONT_SIZE * text_scale,
        color: DEFAULT_COLOR,
    };
    layout_node(
        &mut tree,
        root,
        None,
        0.0,
        &mut cursor_y,
        viewport_width.max(0.0),
        inherited,
        text_scale,
    );
    tree
}

#[allow(clippy::too_many_arguments)]
fn layout_node(
    tree: &mut LayoutTree,
    node: &DomNode,
    parent: Option<NodeId>,
    x: f32,
    cursor_y: &mut f32,
    available_width: f32,
    inherited: Inherited,
    text_scale: f32,
) -> NodeId {
    let id = tree.nodes.len();
    let is_fragment = node.node_type == NodeType::Fragment;
    let is_block = is_fragment
        || (node.node_type == NodeType::Element && BLOCK_TAGS.contains(&node.tag.as_str()));

    let style = if node.node_type == NodeType::Element {
        resolve_style(node)
    } else {
        StyleProps::default()
    };

    let font_size = style
        .font_size
        .or_else(|| tag_font_size(&node.tag))
        .map(|s| s * text_scale)
        .unwrap_or(inherited.font_size);
    let color = style.color.unwrap_or(inherited.color);

    let (tag_top, tag_bottom) = tag_margins(&node.tag);
    let margin_top = style.margin.top.unwrap_or(tag_top);
    let margin_bottom = style.margin.bottom.unwrap_or(tag_bottom);
    let margin_left = style.margin.left.unwrap_or(0.0);
    let margin_right = style.margin.right.unwrap_or(0.0);

    let pad_top = style.padding.top.unwrap_or(0.0);
    let pad_right = style.padding.right.unwrap_or(0.0);
    let pad_bottom = style.padding.bottom.unwrap_or(0.0);
    let pad_left = style.padding.left.unwrap_or(0.0);

    if is_block {
        *cursor_y += margin_top;
    }

    // Border-box width: explicit width, then max-width, then fill
    let fill = (available_width - margin_left - margin_right).max(0.0);
    let mut width = style.width.unwrap_or(fill);
    if let Some(max) = style.max_width {
        width = width.min(max);
    }
    let box_x = if style.center_x {
        x + ((available_width - width) * 0.5).max(0.0)
    } else {
        x + margin_left
    };

    let start_y = *cursor_y;

    tree.nodes.push(LayoutNode {
        tag: node.tag.clone(),
        classes: node.classes().map(str::to_string).collect(),
        text: node.text.clone(),
        node_type: node.node_type,
        bounds: LayoutBox {
            x: box_x,
            y: start_y,
            width,
            height: 0.0,
        },
        parent,
        children: Vec::new(),
        is_block,
        font_size,
        color,
        background: style.effective_background(),
        border_radius: style.border_radius.unwrap_or(0.0),
        positioned: is_fragment || style.is_positioned(),
    });

    *cursor_y += pad_top;

    // Layout children
    let child_x = box_x + pad_left;
    let child_width = (width - pad_left - pad_right).max(0.0);
    let child_inherited = Inherited { font_size, color };
    let mut children = Vec::with_capacity(node.children.len());
    for child in &node.children {
        children.push(layout_node(
            tree,
            child,
            Some(id),
            child_x,
            cursor_y,
            child_width,
            child_inherited,
            text_scale,
        ));
    }

    // Text content contributes to height
    *cursor_y += text_height(&node.text, font_size, child_width);

    *cursor_y += pad_bottom;

    let mut height = *cursor_y - start_y;
    if let Some(explicit) = style.height {
        // Explicit height is a floor for the box; overflowing children are
        // still laid out below it
        if explicit > height {
            height = explicit;
            *cursor_y = start_y + explicit;
        }
    }

    if is_block {
        *cursor_y += margin_bottom;
    }

    let laid_out = &mut tree.nodes[id];
    laid_out.children = children;
    laid_out.bounds.height = height;
    id
}
