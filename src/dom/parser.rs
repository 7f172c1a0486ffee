use crate::dom::DomNode;
use scraper::{ElementRef, Html, Node};
use std::collections::HashMap;

/// Tags whose children should be stripped (invisible/script content)
const SKIP_CHILDREN: &[&str] = &["script", "style", "noscript", "template"];

/// Parse a markup fragment into a `DomNode` tree rooted at a synthetic
/// fragment node. The markup is taken verbatim; malformed input is repaired
/// the way html5ever repairs it.
pub fn parse_fragment(markup: &str) -> DomNode {
    let fragment = Html::parse_fragment(markup);

    // html5ever wraps fragments in a synthetic <html> element
    let root = fragment.root_element();
    let children = convert_children(root);

    log::debug!("parsed fragment: {} top-level nodes", children.len());
    DomNode::fragment(children)
}

fn convert_element(el: ElementRef<'_>) -> DomNode {
    let tag = el.value().name.local.as_ref().to_string();
    let attributes: HashMap<String, String> = el
        .value()
        .attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    // Skip children of invisible elements
    if SKIP_CHILDREN.contains(&tag.as_str()) {
        return DomNode::element(tag, attributes, Vec::new());
    }

    DomNode::element(tag, attributes, convert_children(el))
}

fn convert_children(el: ElementRef<'_>) -> Vec<DomNode> {
    let mut children = Vec::new();

    for child_ref in el.children() {
        match child_ref.value() {
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child_ref) {
                    children.push(convert_element(child_el));
                }
            }
            Node::Text(t) => {
                let s = t.text.to_string();
                if !s.trim().is_empty() {
                    children.push(DomNode::text(s.split_whitespace().collect::<Vec<_>>().join(" ")));
                }
            }
            _ => {}
        }
    }

    children
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeType;

    #[test]
    fn parse_nested_fragment() {
        let markup = r#"
            <div class='relative bg-blue-900'>
              <div class='grid-area'>
                <h2 class="text-4xl">About Me</h2>
                <p>Content paragraph</p>
              </div>
            </div>
        "#;

        let root = parse_fragment(markup);
        assert_eq!(root.node_type, NodeType::Fragment);
        assert_eq!(root.children.len(), 1);

        let outer = &root.children[0];
        assert_eq!(outer.tag, "div");
        assert!(outer.has_class("relative"));

        let target = &outer.children[0];
        assert!(target.has_class("grid-area"));
        assert_eq!(target.children.len(), 2);
        assert_eq!(target.children[0].children[0].text, "About Me");
    }

    #[test]
    fn strips_script_children() {
        let markup = r#"<p>Visible</p><script>alert("hidden");</script>"#;

        let root = parse_fragment(markup);
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].tag, "p");
        assert_eq!(root.children[0].children[0].text, "Visible");
    }

    #[test]
    fn collapses_inner_whitespace() {
        let root = parse_fragment("<p>Hi,\n     I'm   Jonas</p>");
        assert_eq!(root.children[0].children[0].text, "Hi, I'm Jonas");
    }

    #[test]
    fn empty_markup_yields_empty_fragment() {
        let root = parse_fragment("");
        assert!(root.children.is_empty());
        assert_eq!(root.node_count(), 1);
    }
}
