use std::cell::RefCell;
use std::fmt;

use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, QualName};

use crate::arena_dom::{create_element, create_text, to_html, Arena, NodeData, NodeKind, Ref};
use crate::error::Error;

/// A transform function. It is offered every element and text node before the whitelist is
/// applied to it.
pub type TransformFn = Box<dyn for<'arena> Fn(NodeView<'arena>) -> Transform<'arena> + Send + Sync>;

/// Called once for every element and text node the cleaner reaches, with `true` if the node
/// was removed from the tree.
pub type PostCleanFn = Box<dyn for<'arena> Fn(NodeView<'arena>, bool) + Send + Sync>;

/// What a transform wants done with the node it was offered.
pub enum Transform<'arena> {
    /// Keep the node, including any changes made to it through the view.
    Keep,
    /// Put this node (and its subtree) where the offered node was. The offered node is removed.
    Replace(NodeView<'arena>),
    /// Remove the offered node and everything under it.
    Delete,
}

impl<'arena> From<Option<NodeView<'arena>>> for Transform<'arena> {
    fn from(node: Option<NodeView<'arena>>) -> Transform<'arena> {
        match node {
            Some(node) => Transform::Replace(node),
            None => Transform::Delete,
        }
    }
}

impl<'arena> fmt::Debug for Transform<'arena> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Keep => write!(f, "Keep"),
            Transform::Replace(node) => write!(f, "Replace({})", node.node),
            Transform::Delete => write!(f, "Delete"),
        }
    }
}

/// The part of a node transform functions get to see and change.
///
/// New nodes can be created through the view; they belong to the same arena as the tree being
/// cleaned and are only attached once returned in `Transform::Replace`.
#[derive(Clone, Copy)]
pub struct NodeView<'arena> {
    node: Ref<'arena>,
    arena: Arena<'arena>,
}

impl<'arena> NodeView<'arena> {
    pub fn new(node: Ref<'arena>, arena: Arena<'arena>) -> NodeView<'arena> {
        NodeView { node, arena }
    }

    pub fn node(&self) -> Ref<'arena> {
        self.node
    }

    pub fn arena(&self) -> Arena<'arena> {
        self.arena
    }

    pub fn kind(&self) -> NodeKind {
        self.node.data.kind()
    }

    pub fn tag(&self) -> Option<LocalName> {
        self.node.local_name().cloned()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.node.local_name().map_or(false, |name| &**name == tag)
    }

    /// Contents of a text or comment node.
    pub fn text(&self) -> Option<String> {
        match self.node.data {
            NodeData::Text { ref contents } => Some(contents.borrow().to_string()),
            NodeData::Comment { ref contents } => Some(contents.to_string()),
            _ => None,
        }
    }

    /// Replaces the contents of a text node. Other nodes are left alone.
    pub fn set_text(&self, text: &str) {
        if let NodeData::Text { ref contents } = self.node.data {
            *contents.borrow_mut() = StrTendril::from_slice(text);
        }
    }

    /// A copy of the element's attributes as `(key, value)` pairs, in document order.
    pub fn attrs(&self) -> Vec<(String, String)> {
        match self.attr_cell() {
            Some(attrs) => attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect(),
            None => vec![],
        }
    }

    pub fn attr(&self, key: &str) -> Option<String> {
        self.attr_cell()?
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == key)
            .map(|attr| attr.value.to_string())
    }

    pub fn set_attrs<I, K, V>(&self, attrs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if let Some(cell) = self.attr_cell() {
            *cell.borrow_mut() = attrs
                .into_iter()
                .map(|(key, value)| new_attribute(key.as_ref(), value.as_ref()))
                .collect();
        }
    }

    /// Sets one attribute, overwriting an existing value for the same key.
    pub fn set_attr(&self, key: &str, value: &str) {
        if let Some(cell) = self.attr_cell() {
            let mut attrs = cell.borrow_mut();
            match attrs.iter().position(|attr| &*attr.name.local == key) {
                Some(index) => attrs[index].value = StrTendril::from_slice(value),
                None => attrs.push(new_attribute(key, value)),
            }
        }
    }

    pub fn first_child(&self) -> Option<NodeView<'arena>> {
        self.node
            .first_child
            .get()
            .map(|child| NodeView::new(child, self.arena))
    }

    pub fn last_child(&self) -> Option<NodeView<'arena>> {
        self.node
            .last_child
            .get()
            .map(|child| NodeView::new(child, self.arena))
    }

    pub fn create_element(&self, tag: &str) -> NodeView<'arena> {
        NodeView::new(create_element(self.arena, tag), self.arena)
    }

    pub fn create_text(&self, text: &str) -> NodeView<'arena> {
        NodeView::new(create_text(self.arena, text), self.arena)
    }

    /// A new element named `tag` that carries this node's attributes and takes over its
    /// children. Return it with `Transform::Replace` to rename the node.
    ///
    /// The children move as soon as this is called. Returning `Keep` afterwards leaves this
    /// node empty, and returning `Delete` drops the children along with it.
    pub fn renamed(&self, tag: &str) -> NodeView<'arena> {
        let element = self.create_element(tag);
        element.set_attrs(self.attrs());
        while let Some(child) = self.node.first_child.get() {
            element.node.append(child);
        }
        element
    }

    /// Serializes the node's children.
    pub fn inner_html(&self) -> Result<String, Error> {
        to_html(self.node)
    }

    fn attr_cell(&self) -> Option<&'arena RefCell<Vec<Attribute>>> {
        let node: Ref<'arena> = self.node;
        match node.data {
            NodeData::Element { ref attrs, .. } => Some(attrs),
            _ => None,
        }
    }
}

impl<'arena> fmt::Debug for NodeView<'arena> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeView").field(self.node).finish()
    }
}

fn new_attribute(key: &str, value: &str) -> Attribute {
    Attribute {
        name: QualName::new(None, ns!(), LocalName::from(key)),
        value: StrTendril::from_slice(value),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::arena_dom::{parse_fragment, NodeArena};

    fn find<'arena>(node: Ref<'arena>, tag: &str) -> Option<Ref<'arena>> {
        if node.local_name().map_or(false, |name| &**name == tag) {
            return Some(node);
        }
        node.children().find_map(|child| find(child, tag))
    }

    #[test]
    fn reads_element_details() {
        let arena = NodeArena::new();
        let root = parse_fragment(&arena, br#"<a href="/x" title="t">link</a>"#);
        let view = NodeView::new(find(root, "a").unwrap(), &arena);

        assert_eq!(view.kind(), NodeKind::Element);
        assert_eq!(view.tag(), Some(local_name!("a")));
        assert!(view.has_tag("a"));
        assert!(view.text().is_none());
        assert_eq!(
            view.attrs(),
            vec![
                ("href".to_owned(), "/x".to_owned()),
                ("title".to_owned(), "t".to_owned())
            ]
        );
        assert_eq!(view.attr("title").as_deref(), Some("t"));
        assert!(view.attr("rel").is_none());

        let text = view.first_child().unwrap();
        assert_eq!(text.kind(), NodeKind::Text);
        assert!(text.tag().is_none());
        assert_eq!(text.text().as_deref(), Some("link"));
    }

    #[test]
    fn attr_copies_are_detached_from_the_node() {
        let arena = NodeArena::new();
        let root = parse_fragment(&arena, br#"<i foo="bar">x</i>"#);
        let view = NodeView::new(find(root, "i").unwrap(), &arena);

        let mut attrs = view.attrs();
        attrs[0].1 = "changed".to_owned();

        assert_eq!(view.attr("foo").as_deref(), Some("bar"));
    }

    #[test]
    fn sets_attrs_and_text() {
        let arena = NodeArena::new();
        let root = parse_fragment(&arena, br#"<i foo="fighter" bar="brawl">hi</i>"#);
        let view = NodeView::new(find(root, "i").unwrap(), &arena);

        view.set_attrs(vec![("foo", "manchu")]);
        view.set_attr("baz", "qux");
        view.set_attr("foo", "dog");
        view.first_child().unwrap().set_text("bye");

        assert_eq!(
            to_html(root).unwrap(),
            r#"<html><i foo="dog" baz="qux">bye</i></html>"#
        );
    }

    #[test]
    fn setters_ignore_wrong_node_kinds() {
        let arena = NodeArena::new();
        let root = parse_fragment(&arena, b"<b>text</b>");
        let element = NodeView::new(find(root, "b").unwrap(), &arena);
        let text = element.first_child().unwrap();

        element.set_text("nope");
        text.set_attr("nope", "nope");

        assert!(text.attrs().is_empty());
        assert_eq!(to_html(root).unwrap(), "<html><b>text</b></html>");
    }

    #[test]
    fn empty_element_has_no_children() {
        let arena = NodeArena::new();
        let root = parse_fragment(&arena, b"<div></div>");
        let view = NodeView::new(find(root, "div").unwrap(), &arena);

        assert!(view.first_child().is_none());
        assert!(view.last_child().is_none());
    }

    #[test]
    fn renamed_adopts_attrs_and_children() {
        let arena = NodeArena::new();
        let root = parse_fragment(&arena, br#"<em class="x">a<strong>b</strong></em>"#);
        let em = NodeView::new(find(root, "em").unwrap(), &arena);

        let i = em.renamed("i");

        assert!(em.first_child().is_none());
        assert_eq!(i.attr("class").as_deref(), Some("x"));
        assert_eq!(i.inner_html().unwrap(), "a<strong>b</strong>");
        assert!(i.node().parent.get().is_none());
    }

    #[test]
    fn inner_html_of_paragraph() {
        let arena = NodeArena::new();
        let root = parse_fragment(&arena, b"<p>This is <em>SO MUCH</em> fun!</p>");
        let p = NodeView::new(find(root, "p").unwrap(), &arena);

        assert_eq!(p.inner_html().unwrap(), "This is <em>SO MUCH</em> fun!");
    }

    #[test]
    fn option_converts_to_replace_or_delete() {
        let arena = NodeArena::new();
        let root = parse_fragment(&arena, b"<b>x</b>");
        let b = NodeView::new(find(root, "b").unwrap(), &arena);

        assert!(matches!(Transform::from(b.first_child()), Transform::Replace(_)));
        assert!(matches!(
            Transform::from(b.first_child().unwrap().first_child()),
            Transform::Delete
        ));
    }
}
