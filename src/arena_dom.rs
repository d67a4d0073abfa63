// Majority of this file is from the html5ever project.
// https://github.com/servo/html5ever/blob/45b2fca5c6/html5ever/examples/arena.rs
//
// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::io;
use std::ptr;

use html5ever::interface::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::serialize::TraversalScope::{ChildrenOnly, IncludeNode};
use html5ever::serialize::{serialize, Serialize, SerializeOpts, Serializer, TraversalScope};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{
    parse_document as html5ever_parse_document, parse_fragment as html5ever_parse_fragment,
    Attribute, ExpandedName, LocalName, QualName,
};

use crate::error::Error;

/// Owner of every node in a tree. Nodes live until the arena is dropped, even after they are
/// unlinked from the tree.
pub type NodeArena<'arena> = typed_arena::Arena<Node<'arena>>;

pub type Arena<'arena> = &'arena NodeArena<'arena>;

pub type Ref<'arena> = &'arena Node<'arena>;

pub type Link<'arena> = Cell<Option<Ref<'arena>>>;

pub fn create_element<'arena>(arena: Arena<'arena>, name: &str) -> Ref<'arena> {
    arena.alloc(Node::new(NodeData::Element {
        name: QualName::new(None, ns!(html), LocalName::from(name)),
        attrs: RefCell::new(vec![]),
        template_contents: None,
        mathml_annotation_xml_integration_point: false,
    }))
}

pub fn create_text<'arena>(arena: Arena<'arena>, text: &str) -> Ref<'arena> {
    arena.alloc(Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from_slice(text)),
    }))
}

/// Parses a complete document. The returned root is a `Document` node.
pub fn parse_document<'arena>(arena: Arena<'arena>, bytes: &[u8]) -> Ref<'arena> {
    let sink = Sink::new(arena);
    html5ever_parse_document(sink, Default::default())
        .from_utf8()
        .one(bytes)
}

/// Parses markup as if it appeared inside `<body>`. The returned root is a `Document` node
/// whose only child is the `<html>` context element.
pub fn parse_fragment<'arena>(arena: Arena<'arena>, bytes: &[u8]) -> Ref<'arena> {
    let sink = Sink::new(arena);
    html5ever_parse_fragment(
        sink,
        Default::default(),
        QualName::new(None, ns!(html), local_name!("body")),
        vec![],
    )
    .from_utf8()
    .one(bytes)
}

/// Serializes the children of `node` (the node's own tag is not written).
pub fn to_html(node: Ref) -> Result<String, Error> {
    let mut output = vec![];
    serialize(
        &mut output,
        node,
        SerializeOpts {
            traversal_scope: ChildrenOnly(None),
            ..Default::default()
        },
    )
    .map_err(Error::Serialize)?;
    Ok(String::from_utf8(output)?)
}

pub struct Sink<'arena> {
    pub arena: Arena<'arena>,
    pub document: Ref<'arena>,
    pub quirks_mode: QuirksMode,
}

pub struct Node<'arena> {
    pub parent: Link<'arena>,
    pub next_sibling: Link<'arena>,
    pub previous_sibling: Link<'arena>,
    pub first_child: Link<'arena>,
    pub last_child: Link<'arena>,
    pub data: NodeData<'arena>,
}

pub enum NodeData<'arena> {
    Document,
    Doctype {
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    },
    Text {
        contents: RefCell<StrTendril>,
    },
    Comment {
        contents: StrTendril,
    },
    Element {
        name: QualName,
        attrs: RefCell<Vec<Attribute>>,
        template_contents: Option<Ref<'arena>>,
        mathml_annotation_xml_integration_point: bool,
    },
    ProcessingInstruction {
        target: StrTendril,
        contents: StrTendril,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Doctype,
    Text,
    Comment,
    Element,
    ProcessingInstruction,
}

impl<'arena> NodeData<'arena> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Document => NodeKind::Document,
            NodeData::Doctype { .. } => NodeKind::Doctype,
            NodeData::Text { .. } => NodeKind::Text,
            NodeData::Comment { .. } => NodeKind::Comment,
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::ProcessingInstruction { .. } => NodeKind::ProcessingInstruction,
        }
    }
}

impl<'arena> Node<'arena> {
    pub fn new(data: NodeData<'arena>) -> Self {
        Node {
            parent: Cell::new(None),
            previous_sibling: Cell::new(None),
            next_sibling: Cell::new(None),
            first_child: Cell::new(None),
            last_child: Cell::new(None),
            data,
        }
    }

    /// Local name of an element, `None` for every other kind of node.
    pub fn local_name(&self) -> Option<&LocalName> {
        match self.data {
            NodeData::Element { ref name, .. } => Some(&name.local),
            _ => None,
        }
    }

    pub fn children(&self) -> Children<'arena> {
        Children {
            next: self.first_child.get(),
        }
    }

    /// Returns true if `self` appears on the parent chain of `other`.
    pub fn is_ancestor_of(&self, other: &Node<'arena>) -> bool {
        let mut ancestor = other.parent.get();
        while let Some(node) = ancestor {
            if ptr::eq::<Node>(node, self) {
                return true;
            }
            ancestor = node.parent.get();
        }
        false
    }

    /// Unlinks the node (and its subtree) from its parent and siblings.
    pub fn detach(&self) {
        let parent = self.parent.take();
        let previous_sibling = self.previous_sibling.take();
        let next_sibling = self.next_sibling.take();

        if let Some(next_sibling) = next_sibling {
            next_sibling.previous_sibling.set(previous_sibling);
        } else if let Some(parent) = parent {
            parent.last_child.set(previous_sibling);
        }

        if let Some(previous_sibling) = previous_sibling {
            previous_sibling.next_sibling.set(next_sibling);
        } else if let Some(parent) = parent {
            parent.first_child.set(next_sibling);
        }
    }

    /// Splices the node's children, in order, into the position the node occupies and then
    /// unlinks the now childless node. Returns the first spliced child, if there was one.
    pub fn replace_with_children(&self) -> Option<Ref<'arena>> {
        let first_child = self.first_child.take();
        let last_child = self.last_child.take();
        let (first_child, last_child) = match (first_child, last_child) {
            (Some(first_child), Some(last_child)) => (first_child, last_child),
            _ => {
                self.detach();
                return None;
            }
        };

        let parent = self.parent.take();
        let previous_sibling = self.previous_sibling.take();
        let next_sibling = self.next_sibling.take();

        match previous_sibling {
            Some(previous_sibling) => {
                previous_sibling.next_sibling.set(Some(first_child));
                first_child.previous_sibling.set(Some(previous_sibling));
            }
            None => {
                if let Some(parent) = parent {
                    parent.first_child.set(Some(first_child));
                }
            }
        }

        match next_sibling {
            Some(next_sibling) => {
                next_sibling.previous_sibling.set(Some(last_child));
                last_child.next_sibling.set(Some(next_sibling));
            }
            None => {
                if let Some(parent) = parent {
                    parent.last_child.set(Some(last_child));
                }
            }
        }

        let mut child = Some(first_child);
        while let Some(next_child) = child {
            next_child.parent.set(parent);
            if ptr::eq::<Node>(next_child, last_child) {
                break;
            }
            child = next_child.next_sibling.get();
        }

        Some(first_child)
    }

    pub fn append(&'arena self, new_child: &'arena Self) {
        new_child.detach();
        new_child.parent.set(Some(self));
        if let Some(last_child) = self.last_child.take() {
            new_child.previous_sibling.set(Some(last_child));
            debug_assert!(last_child.next_sibling.get().is_none());
            last_child.next_sibling.set(Some(new_child));
        } else {
            debug_assert!(self.first_child.get().is_none());
            self.first_child.set(Some(new_child));
        }
        self.last_child.set(Some(new_child));
    }

    pub fn insert_before(&'arena self, new_sibling: &'arena Self) {
        new_sibling.detach();
        new_sibling.parent.set(self.parent.get());
        new_sibling.next_sibling.set(Some(self));
        if let Some(previous_sibling) = self.previous_sibling.take() {
            new_sibling.previous_sibling.set(Some(previous_sibling));
            debug_assert!(previous_sibling
                .next_sibling
                .get()
                .map_or(false, |next| ptr::eq::<Node>(next, self)));
            previous_sibling.next_sibling.set(Some(new_sibling));
        } else if let Some(parent) = self.parent.get() {
            debug_assert!(parent
                .first_child
                .get()
                .map_or(false, |first| ptr::eq::<Node>(first, self)));
            parent.first_child.set(Some(new_sibling));
        }
        self.previous_sibling.set(Some(new_sibling));
    }
}

pub struct Children<'arena> {
    next: Option<Ref<'arena>>,
}

impl<'arena> Iterator for Children<'arena> {
    type Item = Ref<'arena>;

    fn next(&mut self) -> Option<Ref<'arena>> {
        let node = self.next?;
        self.next = node.next_sibling.get();
        Some(node)
    }
}

impl<'arena> fmt::Display for Node<'arena> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.data)
    }
}

// Links are left out on purpose: following them from a derived impl would loop forever.
impl<'arena> fmt::Debug for Node<'arena> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("data", &format_args!("{}", self.data))
            .field("children", &self.children().count())
            .finish()
    }
}

impl<'arena> fmt::Display for NodeData<'arena> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeData::Document => write!(f, "Document"),
            NodeData::Doctype { name, .. } => write!(f, "Doctype: {}", name),
            NodeData::Text { contents } => write!(
                f,
                "Text: {}...",
                &contents.borrow().chars().take(10).collect::<String>()
            ),
            NodeData::ProcessingInstruction { .. } => write!(f, "ProcessingInstruction: ..."),
            NodeData::Comment { contents } => write!(
                f,
                "Comment: {}...",
                &contents.chars().take(10).collect::<String>()
            ),
            NodeData::Element { ref name, .. } => write!(f, "Element: {}", &name.local),
        }
    }
}

impl<'arena> Sink<'arena> {
    pub fn new(arena: Arena<'arena>) -> Sink<'arena> {
        Sink {
            arena,
            document: arena.alloc(Node::new(NodeData::Document)),
            quirks_mode: QuirksMode::NoQuirks,
        }
    }

    fn new_node(&self, data: NodeData<'arena>) -> Ref<'arena> {
        self.arena.alloc(Node::new(data))
    }

    fn append_common<P, A>(&self, child: NodeOrText<Ref<'arena>>, previous: P, append: A)
    where
        P: FnOnce() -> Option<Ref<'arena>>,
        A: FnOnce(Ref<'arena>),
    {
        let new_node = match child {
            NodeOrText::AppendText(text) => {
                // Append to an existing Text node if we have one.
                if let Some(&Node {
                    data: NodeData::Text { ref contents },
                    ..
                }) = previous()
                {
                    contents.borrow_mut().push_tendril(&text);
                    return;
                }
                self.new_node(NodeData::Text {
                    contents: RefCell::new(text),
                })
            }
            NodeOrText::AppendNode(node) => node,
        };

        append(new_node)
    }
}

impl<'arena> TreeSink for Sink<'arena> {
    type Handle = Ref<'arena>;
    type Output = Ref<'arena>;

    fn finish(self) -> Ref<'arena> {
        self.document
    }

    fn parse_error(&mut self, message: Cow<'static, str>) {
        trace!("parse error: {}", message);
    }

    fn get_document(&mut self) -> Ref<'arena> {
        self.document
    }

    fn set_quirks_mode(&mut self, mode: QuirksMode) {
        self.quirks_mode = mode;
    }

    fn same_node(&self, x: &Ref<'arena>, y: &Ref<'arena>) -> bool {
        ptr::eq::<Node>(*x, *y)
    }

    fn elem_name<'a>(&self, target: &'a Ref<'arena>) -> ExpandedName<'a> {
        match target.data {
            NodeData::Element { ref name, .. } => name.expanded(),
            _ => panic!("not an element!"),
        }
    }

    fn get_template_contents(&mut self, target: &Ref<'arena>) -> Ref<'arena> {
        if let NodeData::Element {
            template_contents: Some(contents),
            ..
        } = target.data
        {
            contents
        } else {
            panic!("not a template element!")
        }
    }

    fn is_mathml_annotation_xml_integration_point(&self, target: &Ref<'arena>) -> bool {
        if let NodeData::Element {
            mathml_annotation_xml_integration_point,
            ..
        } = target.data
        {
            mathml_annotation_xml_integration_point
        } else {
            panic!("not an element!")
        }
    }

    fn create_element(
        &mut self,
        name: QualName,
        attrs: Vec<Attribute>,
        flags: ElementFlags,
    ) -> Ref<'arena> {
        self.new_node(NodeData::Element {
            name,
            attrs: RefCell::new(attrs),
            template_contents: if flags.template {
                Some(self.new_node(NodeData::Document))
            } else {
                None
            },
            mathml_annotation_xml_integration_point: flags.mathml_annotation_xml_integration_point,
        })
    }

    fn create_comment(&mut self, text: StrTendril) -> Ref<'arena> {
        self.new_node(NodeData::Comment { contents: text })
    }

    fn create_pi(&mut self, target: StrTendril, data: StrTendril) -> Ref<'arena> {
        self.new_node(NodeData::ProcessingInstruction {
            target,
            contents: data,
        })
    }

    fn append(&mut self, parent: &Ref<'arena>, child: NodeOrText<Ref<'arena>>) {
        self.append_common(
            child,
            || parent.last_child.get(),
            |new_node| parent.append(new_node),
        )
    }

    fn append_before_sibling(&mut self, sibling: &Ref<'arena>, child: NodeOrText<Ref<'arena>>) {
        self.append_common(
            child,
            || sibling.previous_sibling.get(),
            |new_node| sibling.insert_before(new_node),
        )
    }

    fn append_based_on_parent_node(
        &mut self,
        element: &Ref<'arena>,
        prev_element: &Ref<'arena>,
        child: NodeOrText<Ref<'arena>>,
    ) {
        if element.parent.get().is_some() {
            self.append_before_sibling(element, child)
        } else {
            self.append(prev_element, child)
        }
    }

    fn append_doctype_to_document(
        &mut self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        self.document.append(self.new_node(NodeData::Doctype {
            name,
            public_id,
            system_id,
        }))
    }

    fn add_attrs_if_missing(&mut self, target: &Ref<'arena>, attrs: Vec<Attribute>) {
        let mut existing = if let NodeData::Element { ref attrs, .. } = target.data {
            attrs.borrow_mut()
        } else {
            panic!("not an element")
        };

        let existing_names = existing
            .iter()
            .map(|attr| attr.name.clone())
            .collect::<HashSet<_>>();
        existing.extend(
            attrs
                .into_iter()
                .filter(|attr| !existing_names.contains(&attr.name)),
        );
    }

    fn remove_from_parent(&mut self, target: &Ref<'arena>) {
        target.detach()
    }

    fn reparent_children(&mut self, node: &Ref<'arena>, new_parent: &Ref<'arena>) {
        let mut next_child = node.first_child.get();
        while let Some(child) = next_child {
            next_child = child.next_sibling.get();
            new_parent.append(child)
        }
    }
}

// Implementation adapted from implementation for RcDom:
// https://github.com/servo/html5ever/blob/45b2fca5c6/markup5ever/rcdom.rs#L410
impl<'arena> Serialize for Node<'arena> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        match (&traversal_scope, &self.data) {
            (
                _,
                &NodeData::Element {
                    ref name,
                    ref attrs,
                    ..
                },
            ) => {
                if traversal_scope == IncludeNode {
                    let attrs = attrs.borrow();
                    serializer.start_elem(
                        name.clone(),
                        attrs.iter().map(|attr| (&attr.name, &attr.value[..])),
                    )?;
                }

                for child in self.children() {
                    child.serialize(serializer, IncludeNode)?;
                }

                if traversal_scope == IncludeNode {
                    serializer.end_elem(name.clone())?;
                }
            }

            (_, &NodeData::Document) => {
                for child in self.children() {
                    child.serialize(serializer, IncludeNode)?;
                }
            }

            (&ChildrenOnly(_), _) => {}

            (&IncludeNode, &NodeData::Doctype { ref name, .. }) => {
                serializer.write_doctype(&name)?
            }
            (&IncludeNode, &NodeData::Text { ref contents }) => {
                serializer.write_text(&contents.borrow())?
            }
            (&IncludeNode, &NodeData::Comment { ref contents }) => {
                serializer.write_comment(&contents)?
            }
            (
                &IncludeNode,
                &NodeData::ProcessingInstruction {
                    ref target,
                    ref contents,
                },
            ) => serializer.write_processing_instruction(target, contents)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_linked<'a>(parent: Ref<'a>, expected: &[Ref<'a>]) {
        let children = parent.children().collect::<Vec<_>>();
        assert_eq!(children.len(), expected.len());
        for (child, expected) in children.iter().zip(expected) {
            assert!(ptr::eq::<Node>(*child, *expected));
            assert!(ptr::eq::<Node>(child.parent.get().unwrap(), parent));
        }
        for pair in children.windows(2) {
            assert!(ptr::eq::<Node>(pair[1].previous_sibling.get().unwrap(), pair[0]));
        }
        match (children.first(), children.last()) {
            (Some(first), Some(last)) => {
                assert!(ptr::eq::<Node>(parent.first_child.get().unwrap(), *first));
                assert!(ptr::eq::<Node>(parent.last_child.get().unwrap(), *last));
                assert!(first.previous_sibling.get().is_none());
                assert!(last.next_sibling.get().is_none());
            }
            _ => {
                assert!(parent.first_child.get().is_none());
                assert!(parent.last_child.get().is_none());
            }
        }
    }

    #[test]
    fn parses_fragment_into_html_context() {
        let arena = NodeArena::new();
        let root = parse_fragment(&arena, b"<div>hi</div>");
        assert_eq!(root.data.kind(), NodeKind::Document);
        let html = root.first_child.get().unwrap();
        assert_eq!(html.local_name(), Some(&local_name!("html")));
        assert_eq!(to_html(root).unwrap(), "<html><div>hi</div></html>");
    }

    #[test]
    fn parses_document_with_implied_elements() {
        let arena = NodeArena::new();
        let root = parse_document(&arena, b"<div></div>");
        assert_eq!(
            to_html(root).unwrap(),
            "<html><head></head><body><div></div></body></html>"
        );
    }

    #[test]
    fn detach_middle_child() {
        let arena = NodeArena::new();
        let parent = create_element(&arena, "div");
        let one = create_text(&arena, "1");
        let two = create_element(&arena, "b");
        let three = create_text(&arena, "3");
        parent.append(one);
        parent.append(two);
        parent.append(three);

        two.detach();

        assert_linked(parent, &[one, three]);
        assert!(two.parent.get().is_none());
    }

    #[test]
    fn replace_with_children_splices_in_order() {
        let arena = NodeArena::new();
        let parent = create_element(&arena, "div");
        let before = create_text(&arena, "before");
        let wrapper = create_element(&arena, "span");
        let after = create_text(&arena, "after");
        let first = create_element(&arena, "b");
        let second = create_element(&arena, "i");
        parent.append(before);
        parent.append(wrapper);
        parent.append(after);
        wrapper.append(first);
        wrapper.append(second);

        let result = wrapper.replace_with_children();

        assert!(ptr::eq::<Node>(result.unwrap(), first));
        assert_linked(parent, &[before, first, second, after]);
        assert!(wrapper.parent.get().is_none());
        assert!(wrapper.first_child.get().is_none());
    }

    #[test]
    fn replace_with_children_as_only_child() {
        let arena = NodeArena::new();
        let parent = create_element(&arena, "div");
        let wrapper = create_element(&arena, "span");
        let child = create_text(&arena, "child");
        parent.append(wrapper);
        wrapper.append(child);

        wrapper.replace_with_children();

        assert_linked(parent, &[child]);
    }

    #[test]
    fn replace_with_children_without_children_detaches() {
        let arena = NodeArena::new();
        let parent = create_element(&arena, "div");
        let one = create_text(&arena, "1");
        let empty = create_element(&arena, "span");
        parent.append(one);
        parent.append(empty);

        assert!(empty.replace_with_children().is_none());
        assert_linked(parent, &[one]);
    }

    #[test]
    fn insert_before_first_child() {
        let arena = NodeArena::new();
        let parent = create_element(&arena, "div");
        let existing = create_text(&arena, "existing");
        let new = create_element(&arena, "b");
        parent.append(existing);

        existing.insert_before(new);

        assert_linked(parent, &[new, existing]);
    }

    #[test]
    fn ancestor_check() {
        let arena = NodeArena::new();
        let outer = create_element(&arena, "div");
        let inner = create_element(&arena, "span");
        let leaf = create_text(&arena, "leaf");
        outer.append(inner);
        inner.append(leaf);

        assert!(outer.is_ancestor_of(leaf));
        assert!(inner.is_ancestor_of(leaf));
        assert!(!leaf.is_ancestor_of(outer));
        assert!(!leaf.is_ancestor_of(leaf));
    }

    #[test]
    fn serializes_only_children_of_element() {
        let arena = NodeArena::new();
        let parent = create_element(&arena, "div");
        let p = create_element(&arena, "p");
        let sibling = create_text(&arena, "sibling");
        parent.append(p);
        parent.append(sibling);
        p.append(create_text(&arena, "a < b"));

        assert_eq!(to_html(p).unwrap(), "a &lt; b");
        assert_eq!(to_html(parent).unwrap(), "<p>a &lt; b</p>sibling");
    }
}
