//! OID-based element addressing.
//!
//! OIDs are caller-supplied and may repeat. Resolution walks the current
//! page in pre-order and the first match wins.

use flowbridge_core::protocol::{child_path_segments, OID_ATTRIBUTE};
use flowbridge_core::task::ElementRef;

use crate::document::{Designer, ElementId};

/// Resolve an OID, optionally narrowed by a child path like `"div > span"`.
///
/// Without a path the first tagged element is returned. With a path, each
/// segment replaces the candidate set with the immediate children of every
/// candidate whose kind matches the segment (case-insensitive; an empty
/// segment matches any child). The first remaining candidate wins. Any
/// empty layer yields `None`.
pub fn resolve(designer: &Designer, oid: &str, child_path: Option<&str>) -> Option<ElementId> {
    let matches: Vec<ElementId> = designer
        .traverse()
        .into_iter()
        .filter(|id| {
            designer
                .element(*id)
                .and_then(|el| el.attributes.get(OID_ATTRIBUTE))
                .is_some_and(|value| value == oid)
        })
        .collect();

    match child_path.filter(|path| !path.trim().is_empty()) {
        None => matches.first().copied(),
        Some(path) => narrow(designer, matches, path),
    }
}

pub fn resolve_ref(designer: &Designer, target: &ElementRef) -> Option<ElementId> {
    resolve(designer, &target.oid, target.child_path.as_deref())
}

fn narrow(designer: &Designer, roots: Vec<ElementId>, path: &str) -> Option<ElementId> {
    let mut candidates = roots;

    for segment in child_path_segments(path) {
        if candidates.is_empty() {
            return None;
        }
        candidates = candidates
            .iter()
            .flat_map(|id| designer.children(*id).iter().copied())
            .filter(|child| {
                segment.is_empty()
                    || designer
                        .element(*child)
                        .is_some_and(|el| el.kind.eq_ignore_ascii_case(segment))
            })
            .collect();
    }

    candidates.first().copied()
}

#[cfg(test)]
mod tests {
    use flowbridge_core::task::Node;

    use super::*;
    use crate::builder::build;

    fn designer_with(tree: Node) -> Designer {
        let mut designer = Designer::with_home_page();
        let root = designer.root().unwrap();
        let id = build(&mut designer, &tree).unwrap();
        designer.append_child(root, id).unwrap();
        designer
    }

    fn text_of(designer: &Designer, id: Option<ElementId>) -> Option<String> {
        id.and_then(|id| designer.element(id)?.text.clone())
    }

    #[test]
    fn duplicate_oids_resolve_to_first_in_traversal_order() {
        let designer = designer_with(
            Node::new("div")
                .with_child(
                    Node::new("section")
                        .with_child(Node::new("p").with_oid("dup").with_text("nested first")),
                )
                .with_child(Node::new("p").with_oid("dup").with_text("sibling second")),
        );

        for _ in 0..3 {
            assert_eq!(
                text_of(&designer, resolve(&designer, "dup", None)).as_deref(),
                Some("nested first")
            );
        }
    }

    #[test]
    fn child_path_walks_layer_by_layer() {
        let designer = designer_with(
            Node::new("section").with_oid("card").with_child(
                Node::new("div")
                    .with_child(Node::new("p").with_text("not a span"))
                    .with_child(Node::new("span").with_text("leaf")),
            ),
        );

        let found = resolve(&designer, "card", Some("div > span"));

        assert_eq!(text_of(&designer, found).as_deref(), Some("leaf"));
    }

    #[test]
    fn missing_intermediate_segment_yields_none() {
        let designer = designer_with(
            Node::new("section")
                .with_oid("card")
                .with_child(Node::new("span").with_text("direct child")),
        );

        assert_eq!(resolve(&designer, "card", Some("div > span")), None);
    }

    #[test]
    fn segment_match_is_case_insensitive() {
        let designer = designer_with(
            Node::new("section")
                .with_oid("card")
                .with_child(Node::new("H2").with_text("title")),
        );

        let found = resolve(&designer, "card", Some("h2"));

        assert_eq!(text_of(&designer, found).as_deref(), Some("title"));
    }

    #[test]
    fn empty_segment_matches_any_child() {
        let designer = designer_with(
            Node::new("ul")
                .with_oid("list")
                .with_child(Node::new("li").with_child(Node::new("a").with_text("link"))),
        );

        let found = resolve(&designer, "list", Some(" > a"));

        assert_eq!(text_of(&designer, found).as_deref(), Some("link"));
    }

    #[test]
    fn narrowing_starts_from_every_matched_root() {
        let designer = designer_with(
            Node::new("div")
                .with_child(Node::new("section").with_oid("dup"))
                .with_child(
                    Node::new("section")
                        .with_oid("dup")
                        .with_child(Node::new("span").with_text("only span")),
                ),
        );

        let found = resolve(&designer, "dup", Some("span"));

        assert_eq!(text_of(&designer, found).as_deref(), Some("only span"));
    }

    #[test]
    fn blank_child_path_behaves_like_none() {
        let designer = designer_with(Node::new("p").with_oid("box").with_text("box"));

        assert_eq!(
            resolve(&designer, "box", Some("  ")),
            resolve(&designer, "box", None)
        );
    }

    #[test]
    fn unknown_oid_yields_none() {
        let designer = designer_with(Node::new("div").with_oid("box"));

        assert_eq!(resolve(&designer, "nope", None), None);
    }

    #[test]
    fn detached_elements_are_not_addressable() {
        let mut designer = Designer::with_home_page();
        build(&mut designer, &Node::new("div").with_oid("floating")).unwrap();

        assert_eq!(resolve(&designer, "floating", None), None);
    }
}
