//! In-memory document tree, with event listeners and a host to talk to the user

use std::collections::BTreeSet;
use std::fmt;

use derive_more::Display;

/// Index of an element in its document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub struct ElementId(usize);

/// The only styling the page handlers touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DisplayStyle {
    #[display("none")]
    None,
    #[display("block")]
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub display: Option<DisplayStyle>,
    pub text: String,
    pub value: String,
    children: Vec<ElementId>,
    parent: Option<ElementId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            id: None,
            classes: Vec::new(),
            display: None,
            text: String::new(),
            value: String::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn is_hidden(&self) -> bool {
        self.display == Some(DisplayStyle::None)
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum EventKind {
    #[display("click")]
    Click,
    #[display("keydown")]
    KeyDown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub key: Option<String>,
}

impl Event {
    pub fn click() -> Self {
        Self {
            kind: EventKind::Click,
            key: None,
        }
    }

    pub fn key_down(key: &str) -> Self {
        Self {
            kind: EventKind::KeyDown,
            key: Some(key.to_owned()),
        }
    }
}

/// What the page needs from its environment
pub trait Host {
    /// Shows a message to the user
    fn alert(&mut self, message: &str);
}

/// A host that keeps every message it was asked to show
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingHost {
    pub messages: Vec<String>,
}

impl Host for RecordingHost {
    fn alert(&mut self, message: &str) {
        self.messages.push(message.to_owned());
    }
}

type Listener = Box<dyn FnMut(&Event, &mut dyn Host)>;

struct Registration {
    target: ElementId,
    kind: EventKind,
    callback: Listener,
}

pub struct Document {
    elements: Vec<Element>,
    listeners: Vec<Registration>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document holding only a `body` element
    pub fn new() -> Self {
        Self {
            elements: vec![Element::new("body")],
            listeners: Vec::new(),
        }
    }

    pub fn body(&self) -> ElementId {
        ElementId(0)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0)
    }

    /// Creates a detached element
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        self.elements.push(Element::new(tag));
        ElementId(self.elements.len() - 1)
    }

    /// Moves `child` under `parent`, as its last child.
    /// Returns false if either element is unknown or if it would create a cycle.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        if self.get(parent).is_none() || self.get(child).is_none() {
            return false;
        }
        if child == self.body() || self.ancestors(parent).contains(&child) {
            return false;
        }

        if let Some(old_parent) = self.elements[child.0].parent {
            self.elements[old_parent.0].children.retain(|&c| c != child);
        }
        self.elements[child.0].parent = Some(parent);
        self.elements[parent.0].children.push(child);
        true
    }

    /// The element itself, then each parent up to the root
    fn ancestors(&self, id: ElementId) -> Vec<ElementId> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current.filter(|n| self.get(*n).is_some()) {
            chain.push(node);
            current = self.elements[node.0].parent;
        }
        chain
    }

    fn is_connected(&self, id: ElementId) -> bool {
        self.ancestors(id).last() == Some(&self.body())
    }

    /// First element attached to the tree with the given `id` attribute
    pub fn get_element_by_id(&self, id: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .enumerate()
            .map(|(index, element)| (ElementId(index), element))
            .find(|(node, element)| element.id.as_deref() == Some(id) && self.is_connected(*node))
            .map(|(node, _)| node)
    }

    /// Every descendant of `root` in document order, `root` excluded
    pub fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut found = Vec::new();
        let mut stack: Vec<ElementId> = match self.get(root) {
            Some(element) => element.children.iter().rev().copied().collect(),
            None => return found,
        };

        while let Some(node) = stack.pop() {
            found.push(node);
            stack.extend(self.elements[node.0].children.iter().rev().copied());
        }
        found
    }

    pub fn find_descendants<P>(&self, root: ElementId, predicate: P) -> Vec<ElementId>
    where
        P: Fn(&Element) -> bool,
    {
        self.descendants(root)
            .into_iter()
            .filter(|&node| predicate(&self.elements[node.0]))
            .collect()
    }

    pub fn set_display(&mut self, id: ElementId, display: DisplayStyle) {
        if let Some(element) = self.get_mut(id) {
            element.display = Some(display);
        }
    }

    pub fn set_text(&mut self, id: ElementId, text: &str) {
        if let Some(element) = self.get_mut(id) {
            element.text = text.to_owned();
        }
    }

    pub fn set_value(&mut self, id: ElementId, value: &str) {
        if let Some(element) = self.get_mut(id) {
            element.value = value.to_owned();
        }
    }

    /// Current value of the attached element with the given `id` attribute
    pub fn value_of(&self, id: &str) -> Option<&str> {
        let node = self.get_element_by_id(id)?;
        Some(self.elements[node.0].value.as_str())
    }

    pub fn add_event_listener<F>(&mut self, target: ElementId, kind: EventKind, callback: F)
    where
        F: FnMut(&Event, &mut dyn Host) + 'static,
    {
        self.listeners.push(Registration {
            target,
            kind,
            callback: Box::new(callback),
        });
    }

    /// Delivers `event` to `target`, then to each of its ancestors.
    /// Returns the number of listeners invoked.
    pub fn dispatch(&mut self, target: ElementId, event: &Event, host: &mut dyn Host) -> usize {
        let mut invoked = 0;
        for node in self.ancestors(target) {
            for registration in self
                .listeners
                .iter_mut()
                .filter(|r| r.target == node && r.kind == event.kind)
            {
                (registration.callback)(event, &mut *host);
                invoked += 1;
            }
        }
        invoked
    }

    /// Elements that currently carry an explicit `display: none`
    pub fn hidden_elements(&self) -> BTreeSet<ElementId> {
        self.descendants(self.body())
            .into_iter()
            .filter(|node| self.elements[node.0].is_hidden())
            .collect()
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, node: ElementId, depth: usize) -> fmt::Result {
        let element = &self.elements[node.0];

        write!(f, "{:indent$}<{}", "", element.tag, indent = depth * 2)?;
        if let Some(id) = &element.id {
            write!(f, " id=\"{id}\"")?;
        }
        if !element.classes.is_empty() {
            write!(f, " class=\"{}\"", element.classes.join(" "))?;
        }
        if let Some(display) = element.display {
            write!(f, " style=\"display: {display}\"")?;
        }
        if !element.value.is_empty() {
            write!(f, " value=\"{}\"", element.value)?;
        }
        write!(f, ">")?;
        if !element.text.is_empty() {
            write!(f, " {}", element.text)?;
        }
        if element.is_hidden() {
            write!(f, " [hidden]")?;
        }
        writeln!(f)?;

        for &child in &element.children {
            self.render(f, child, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, self.body(), 0)
    }
}
