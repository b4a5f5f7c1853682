//! Materializes a declarative [`Node`] tree into designer elements.

use flowbridge_core::protocol::OID_ATTRIBUTE;
use flowbridge_core::task::Node;

use crate::document::{Designer, DocumentError, ElementId};

/// Build `node` and its descendants, returning the detached root element.
///
/// Pre-order: the element is created, then attributes (with the OID
/// stored under [`OID_ATTRIBUTE`]), then inline styles as one batch, then
/// text, then each child in order. A child is appended only after its own
/// subtree is complete. On error the partial subtree stays detached.
pub fn build(designer: &mut Designer, node: &Node) -> Result<ElementId, DocumentError> {
    let id = designer.create_element(&node.tag);

    for (key, value) in &node.attributes {
        designer.set_attribute(id, key, value)?;
    }
    if let Some(oid) = &node.oid {
        designer.set_attribute(id, OID_ATTRIBUTE, oid)?;
    }

    if !node.styles.is_empty() {
        designer.set_inline_styles(id, &node.styles)?;
    }

    if let Some(text) = &node.text {
        designer.set_text(id, text)?;
    }

    for child in &node.children {
        let child_id = build(designer, child)?;
        designer.append_child(id, child_id)?;
    }

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(designer: &Designer, ids: &[ElementId]) -> Vec<String> {
        ids.iter()
            .map(|id| designer.element(*id).unwrap().kind.clone())
            .collect()
    }

    #[test]
    fn children_are_appended_in_order_and_fully_built() {
        let mut designer = Designer::with_home_page();
        let node = Node::new("section")
            .with_child(Node::new("h1").with_child(Node::new("span")))
            .with_child(Node::new("p").with_child(Node::new("em")).with_child(Node::new("strong")));

        let section = build(&mut designer, &node).unwrap();

        let children = designer.children(section).to_vec();
        assert_eq!(kinds(&designer, &children), vec!["h1", "p"]);
        assert_eq!(kinds(&designer, designer.children(children[0])), vec!["span"]);
        assert_eq!(
            kinds(&designer, designer.children(children[1])),
            vec!["em", "strong"]
        );
    }

    #[test]
    fn oid_is_stored_as_reserved_attribute_and_wins() {
        let mut designer = Designer::with_home_page();
        let node = Node::new("div")
            .with_attribute(OID_ATTRIBUTE, "from-attributes")
            .with_attribute("role", "banner")
            .with_oid("hero");

        let id = build(&mut designer, &node).unwrap();

        let el = designer.element(id).unwrap();
        assert_eq!(el.attributes[OID_ATTRIBUTE], "hero");
        assert_eq!(el.attributes["role"], "banner");
    }

    #[test]
    fn styles_and_text_are_applied() {
        let mut designer = Designer::with_home_page();
        let node = Node::new("h1")
            .with_style("color", "red")
            .with_style("font-size", "32px")
            .with_style("color", "blue")
            .with_text("Welcome");

        let id = build(&mut designer, &node).unwrap();

        let el = designer.element(id).unwrap();
        assert_eq!(el.inline_styles.len(), 2);
        assert_eq!(el.inline_styles["color"], "blue");
        assert_eq!(el.text.as_deref(), Some("Welcome"));
    }

    #[test]
    fn built_tree_is_detached_until_appended() {
        let mut designer = Designer::with_home_page();
        let root = designer.root().unwrap();

        let id = build(&mut designer, &Node::new("div")).unwrap();

        assert!(designer.element(id).unwrap().parent.is_none());
        assert_eq!(designer.traverse(), vec![root]);
    }

    #[test]
    fn children_under_image_fail_the_build() {
        let mut designer = Designer::with_home_page();
        let node = Node::new("img").with_child(Node::new("span"));

        let err = build(&mut designer, &node).unwrap_err();

        assert_eq!(err, DocumentError::ChildrenNotAllowed { kind: "img".into() });
    }

    #[test]
    fn text_on_void_element_fails_the_build() {
        let mut designer = Designer::with_home_page();

        let err = build(&mut designer, &Node::new("hr").with_text("nope")).unwrap_err();

        assert_eq!(err, DocumentError::TextNotAllowed { kind: "hr".into() });
    }

    #[test]
    fn text_on_structural_element_fails_the_build() {
        let mut designer = Designer::with_home_page();

        let err = build(&mut designer, &Node::new("div").with_text("loose")).unwrap_err();

        assert_eq!(err, DocumentError::TextNotAllowed { kind: "div".into() });
    }

    #[test]
    fn node_value_is_not_mutated() {
        let mut designer = Designer::with_home_page();
        let node = Node::new("ul").with_oid("list").with_child(Node::new("li").with_text("one"));
        let before = node.clone();

        build(&mut designer, &node).unwrap();

        assert_eq!(node, before);
    }
}
