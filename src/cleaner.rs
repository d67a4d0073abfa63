use std::collections::HashSet;
use std::fmt;
use std::io::{Read, Write};
use std::ptr;

use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, QualName};

use crate::arena_dom::{parse_document, parse_fragment, to_html, Arena, Node, NodeArena, NodeData, Ref};
use crate::config::default::{ALWAYS_DELETE_CHILDREN, ALWAYS_PRESERVE_CHILDREN};
use crate::config::Preset;
use crate::error::Error;
use crate::protocol::enforce_protocol;
use crate::transformer::{NodeView, PostCleanFn, Transform, TransformFn};
use crate::whitelist::{Tagdef, Whitelist};

/// Removes every element, attribute and URL a whitelist does not allow from parsed markup.
///
/// A cleaner is configured once with its builder methods and can then clean any number of
/// trees. Cleaning happens in place, in a single depth-first pass.
pub struct Cleaner {
    whitelist: Whitelist,
    // Children of removed elements are hoisted into their place, unless the element is one of
    // `ALWAYS_DELETE_CHILDREN`.
    preserve_children: bool,
    transformers: Vec<TransformFn>,
    post_clean: Option<PostCleanFn>,
}

impl Cleaner {
    pub fn new(whitelist: Whitelist) -> Cleaner {
        Cleaner {
            whitelist,
            preserve_children: false,
            transformers: vec![],
            post_clean: None,
        }
    }

    /// A cleaner that removes every element.
    pub fn empty() -> Cleaner {
        Cleaner::from(Preset::Empty)
    }

    pub fn simple() -> Cleaner {
        Cleaner::from(Preset::Simple)
    }

    pub fn basic() -> Cleaner {
        Cleaner::from(Preset::Basic)
    }

    pub fn basic_with_images() -> Cleaner {
        Cleaner::from(Preset::BasicWithImages)
    }

    pub fn relaxed() -> Cleaner {
        Cleaner::from(Preset::Relaxed)
    }

    pub fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }

    /// Allows the given tags, replacing any rules already present for them.
    pub fn add_tags<I: IntoIterator<Item = Tagdef>>(mut self, tags: I) -> Cleaner {
        self.whitelist.extend(tags);
        self
    }

    pub fn remove_tags<I, T>(mut self, tags: I) -> Cleaner
    where
        I: IntoIterator<Item = T>,
        T: Into<LocalName>,
    {
        for tag in tags {
            self.whitelist.remove(&tag.into());
        }
        self
    }

    pub fn preserve_children(mut self) -> Cleaner {
        self.preserve_children = true;
        self
    }

    /// Appends a transformer. Transformers run in the order they were added.
    pub fn add_transformer<F>(mut self, transformer: F) -> Cleaner
    where
        F: for<'arena> Fn(NodeView<'arena>) -> Transform<'arena> + Send + Sync + 'static,
    {
        self.transformers.push(Box::new(transformer));
        self
    }

    /// Sets the callback told about every element and text node the cleaner visits.
    pub fn post_clean<F>(mut self, callback: F) -> Cleaner
    where
        F: for<'arena> Fn(NodeView<'arena>, bool) + Send + Sync + 'static,
    {
        self.post_clean = Some(Box::new(callback));
        self
    }

    /// Cleans an existing tree. A root that is not a document is first wrapped in a new
    /// document node, which is returned.
    pub fn clean_node<'arena>(
        &self,
        arena: Arena<'arena>,
        root: Ref<'arena>,
    ) -> Result<Ref<'arena>, Error> {
        if root.parent.get().is_some() {
            return Err(Error::InvalidArgument(
                "the node to clean must be the root of its tree",
            ));
        }

        let document = match root.data {
            NodeData::Document => root,
            _ => {
                let document: Ref<'arena> = arena.alloc(Node::new(NodeData::Document));
                document.append(root);
                document
            }
        };
        self.traverse(arena, document);
        Ok(document)
    }

    /// Parses a whole document and cleans it.
    pub fn clean_document<'arena>(
        &self,
        arena: Arena<'arena>,
        input: &mut impl Read,
    ) -> Result<Ref<'arena>, Error> {
        let root = parse_document(arena, &read_input(input)?);
        self.traverse(arena, root);
        Ok(root)
    }

    /// Parses markup as the contents of a `<body>` and cleans it.
    pub fn clean_fragment<'arena>(
        &self,
        arena: Arena<'arena>,
        input: &mut impl Read,
    ) -> Result<Ref<'arena>, Error> {
        let root = parse_fragment(arena, &read_input(input)?);
        self.traverse(arena, root);
        Ok(root)
    }

    pub fn clean_string(&self, input: &str) -> Result<String, Error> {
        let arena = NodeArena::new();
        let root = self.clean_document(&arena, &mut input.as_bytes())?;
        to_html(root)
    }

    pub fn sanitize_fragment(
        &self,
        input: &mut impl Read,
        output: &mut impl Write,
    ) -> Result<(), Error> {
        let arena = NodeArena::new();
        let root = self.clean_fragment(&arena, input)?;
        output
            .write_all(to_html(root)?.as_bytes())
            .map_err(Error::Serialize)
    }

    fn traverse<'arena>(&self, arena: Arena<'arena>, root: Ref<'arena>) {
        let mut visited = HashSet::new();
        let mut node = Some(root);
        while let Some(next) = node {
            node = self.clean_recursive(arena, next, &mut visited);
        }
    }

    /// Cleans `node` and its subtree. Returns the node the caller's sibling loop continues
    /// with. `visited` holds every node reached so far in this pass.
    fn clean_recursive<'arena>(
        &self,
        arena: Arena<'arena>,
        node: Ref<'arena>,
        visited: &mut HashSet<*const Node<'arena>>,
    ) -> Option<Ref<'arena>> {
        trace!("visiting {}", node);
        visited.insert(node as *const Node);
        let mut node = node;

        if let NodeData::Element { .. } | NodeData::Text { .. } = node.data {
            for transformer in self.transformers.iter() {
                match transformer(NodeView::new(node, arena)) {
                    Transform::Keep => {}
                    Transform::Replace(replacement) => {
                        let replacement = replacement.node();
                        if ptr::eq::<Node>(replacement, node) {
                            continue;
                        }
                        if replacement.is_ancestor_of(node) {
                            warn!("ignoring replacement of {} with its ancestor {}", node, replacement);
                            continue;
                        }
                        if visited.contains(&(replacement as *const Node)) {
                            warn!("ignoring replacement of {} with visited {}", node, replacement);
                            continue;
                        }
                        node.insert_before(replacement);
                        node.detach();
                        self.report(arena, node, true);
                        visited.insert(replacement as *const Node);
                        node = replacement;
                    }
                    Transform::Delete => {
                        debug!("transformer deleted {}", node);
                        let next_sibling = node.next_sibling.get();
                        node.detach();
                        self.report(arena, node, true);
                        return next_sibling;
                    }
                }
            }
        }

        match node.data {
            NodeData::Element { ref name, .. } => match self.whitelist.get(&name.local) {
                Some(tagdef) => strip_invalid_attributes(node, tagdef),
                None => {
                    let next = self.remove_element(node);
                    self.report(arena, node, true);
                    return next;
                }
            },
            NodeData::Comment { .. }
            | NodeData::Doctype { .. }
            | NodeData::ProcessingInstruction { .. } => return self.remove_element(node),
            NodeData::Document | NodeData::Text { .. } => {}
        }
        self.report(arena, node, false);

        let mut child = node.first_child.get();
        while let Some(next) = child {
            child = self.clean_recursive(arena, next, visited);
        }

        node.next_sibling.get()
    }

    /// Removes a disallowed node, hoisting its children into its place when they should be
    /// preserved. Returns the node traversal resumes with.
    fn remove_element<'arena>(&self, node: Ref<'arena>) -> Option<Ref<'arena>> {
        let next_sibling = node.next_sibling.get();

        if self.should_preserve_children(node) {
            debug!("unwrapping {}", node);
            if let Some(first_child) = node.replace_with_children() {
                return Some(first_child);
            }
        } else {
            debug!("removing {}", node);
            node.detach();
        }

        next_sibling
    }

    fn should_preserve_children(&self, node: Ref) -> bool {
        match node.data {
            NodeData::Element { ref name, .. } => {
                if ALWAYS_PRESERVE_CHILDREN.contains(&name.local) {
                    return true;
                }
                self.preserve_children && !ALWAYS_DELETE_CHILDREN.contains(&name.local)
            }
            NodeData::Document
            | NodeData::Doctype { .. }
            | NodeData::Text { .. }
            | NodeData::Comment { .. }
            | NodeData::ProcessingInstruction { .. } => false,
        }
    }

    fn report<'arena>(&self, arena: Arena<'arena>, node: Ref<'arena>, deleted: bool) {
        if let Some(ref post_clean) = self.post_clean {
            if let NodeData::Element { .. } | NodeData::Text { .. } = node.data {
                post_clean(NodeView::new(node, arena), deleted);
            }
        }
    }
}

impl From<Preset> for Cleaner {
    fn from(preset: Preset) -> Cleaner {
        Cleaner::new(preset.whitelist())
    }
}

impl fmt::Debug for Cleaner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cleaner")
            .field("whitelist", &self.whitelist)
            .field("preserve_children", &self.preserve_children)
            .field("transformers", &self.transformers.len())
            .field("post_clean", &self.post_clean.is_some())
            .finish()
    }
}

fn read_input(input: &mut impl Read) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes).map_err(Error::Parse)?;
    Ok(bytes)
}

/// Drops every attribute `tagdef` does not allow (or whose URL it rejects), then applies the
/// enforced attributes. Kept attributes are renamed to their normalized key.
fn strip_invalid_attributes(node: Ref, tagdef: &Tagdef) {
    let attrs = match node.data {
        NodeData::Element { ref attrs, .. } => attrs,
        _ => return,
    };
    let mut attrs = attrs.borrow_mut();

    let mut kept: Vec<Attribute> = Vec::with_capacity(attrs.len());
    for attr in attrs.drain(..) {
        let key = crate::normalize::normalize_key(&attr.name.local);
        if !tagdef.allows_attr(&key) {
            debug!("dropping attribute {:?} on <{}>", key, tagdef.tag());
            continue;
        }
        if kept.iter().any(|existing| *existing.name.local == *key) {
            debug!("dropping duplicate attribute {:?} on <{}>", key, tagdef.tag());
            continue;
        }
        match enforce_protocol(tagdef, &key, &attr.value) {
            Ok(value) => kept.push(Attribute {
                name: QualName::new(None, ns!(), LocalName::from(key)),
                value: StrTendril::from(value),
            }),
            Err(err) => debug!("dropping attribute {:?} on <{}>: {}", key, tagdef.tag(), err),
        }
    }

    for (key, value) in tagdef.enforced_attrs() {
        match kept.iter_mut().position(|attr| *attr.name.local == **key) {
            Some(index) => kept[index].value = StrTendril::from_slice(value),
            None => kept.push(Attribute {
                name: QualName::new(None, ns!(), LocalName::from(key.as_str())),
                value: StrTendril::from_slice(value),
            }),
        }
    }

    *attrs = kept;
}
