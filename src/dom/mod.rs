pub mod parser;
pub mod css;

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Synthetic root holding injected markup
    Fragment,
    Element,
    Text,
}

/// Parsed markup node.
#[derive(Debug, Clone)]
pub struct DomNode {
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub text: String,
    pub children: Vec<DomNode>,
    pub node_type: NodeType,
}

impl DomNode {
    pub fn fragment(children: Vec<DomNode>) -> Self {
        Self {
            tag: "#fragment".into(),
            attributes: HashMap::new(),
            text: String::new(),
            children,
            node_type: NodeType::Fragment,
        }
    }

    pub fn element(
        tag: impl Into<String>,
        attrs: HashMap<String, String>,
        children: Vec<DomNode>,
    ) -> Self {
        Self {
            tag: tag.into(),
            attributes: attrs,
            text: String::new(),
            children,
            node_type: NodeType::Element,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            tag: String::new(),
            attributes: HashMap::new(),
            text: content.into(),
            children: Vec::new(),
            node_type: NodeType::Text,
        }
    }

    /// Recursively count all nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Whitespace-separated entries of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn is_element(&self) -> bool {
        self.node_type != NodeType::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_class(class: &str) -> DomNode {
        let mut attrs = HashMap::new();
        attrs.insert("class".to_string(), class.to_string());
        DomNode::element("div", attrs, Vec::new())
    }

    #[test]
    fn class_lookup_splits_on_whitespace() {
        let node = with_class("  relative bg-red-500 grid-area ");
        assert!(node.has_class("grid-area"));
        assert!(node.has_class("relative"));
        assert!(!node.has_class("grid"));
        assert_eq!(node.classes().count(), 3);
    }

    #[test]
    fn text_nodes_are_not_elements() {
        assert!(!DomNode::text("hi").is_element());
        assert!(DomNode::fragment(Vec::new()).is_element());
    }

    #[test]
    fn node_count_includes_text_nodes() {
        let root = DomNode::fragment(vec![
            DomNode::element("h2", HashMap::new(), vec![DomNode::text(" About Me ")]),
            DomNode::element("p", HashMap::new(), vec![DomNode::text("Hi")]),
        ]);
        assert_eq!(root.node_count(), 5);
    }
}
