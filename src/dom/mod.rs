use std::{cell::Cell, fmt::Debug, rc::Rc};

use crate::Result;

mod memory;
mod web;

pub use memory::{MemoryDom, NodeId};
pub use web::WebDom;

pub const ACTIVE_CLASS: &str = "active";

pub type ClickHandler<E> = Rc<dyn Fn(&ClickEvent<E>)>;

/// A click which bubbled up to a listening element.
pub struct ClickEvent<E> {
    /// The element which was actually clicked. May be a descendant of the listening element.
    pub target: E,

    default_prevented: Cell<bool>,
}

impl<E> ClickEvent<E> {
    pub fn new(target: E) -> Self {
        Self {
            target,
            default_prevented: Cell::new(false),
        }
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// The minimal DOM surface the toolbar renders into.
///
/// Elements are cheap handles. Every method works on the live tree, so an element
/// handed out by `create_element` stays valid after it is appended somewhere.
pub trait Dom {
    type Element: Clone + PartialEq + Debug;

    fn create_element(&self, tag: &str) -> Result<Self::Element>;

    fn append_child(&self, parent: &Self::Element, child: &Self::Element) -> Result<()>;

    fn remove_children(&self, parent: &Self::Element) -> Result<()>;

    fn children(&self, parent: &Self::Element) -> Vec<Self::Element>;

    fn parent(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Lowercase tag name.
    fn tag_name(&self, element: &Self::Element) -> String;

    fn class_name(&self, element: &Self::Element) -> String;

    fn set_class_name(&self, element: &Self::Element, value: &str) -> Result<()>;

    fn has_class(&self, element: &Self::Element, class: &str) -> bool;

    fn toggle_class(&self, element: &Self::Element, class: &str, force: bool) -> Result<()>;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str) -> Result<()>;

    fn text(&self, element: &Self::Element) -> String;

    /// Replaces all children with a single run of text.
    fn set_text(&self, element: &Self::Element, value: &str) -> Result<()>;

    fn style(&self, element: &Self::Element, property: &str) -> Option<String>;

    fn set_style(&self, element: &Self::Element, property: &str, value: &str) -> Result<()>;

    /// Calls `handler` for clicks on `element` or anything inside it.
    fn on_click(&self, element: &Self::Element, handler: ClickHandler<Self::Element>)
        -> Result<()>;

    fn add_class(&self, element: &Self::Element, class: &str) -> Result<()> {
        self.toggle_class(element, class, true)
    }

    fn data(&self, element: &Self::Element, key: &str) -> Option<String> {
        self.attribute(element, &format!("data-{key}"))
    }

    fn set_data(&self, element: &Self::Element, key: &str, value: &str) -> Result<()> {
        self.set_attribute(element, &format!("data-{key}"), value)
    }

    /// Descendants of `root` matching `selector`, in document order.
    fn query_selector_all(&self, root: &Self::Element, selector: &str) -> Vec<Self::Element> {
        let selector = Selector::parse(selector);

        let mut found = Vec::new();
        let mut stack = self.children(root);
        stack.reverse();

        while let Some(element) = stack.pop() {
            if selector.matches(self, &element) {
                found.push(element.clone());
            }

            let mut children = self.children(&element);
            children.reverse();
            stack.extend(children);
        }

        found
    }
}

/// A descendant-combinator selector such as `.dropdown-fontname li a`.
///
/// Each compound is an optional tag followed by any number of `.class` parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Compound>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    pub fn parse(value: &str) -> Self {
        Self {
            compounds: value.split_whitespace().map(Compound::parse).collect(),
        }
    }

    pub fn matches<D: Dom + ?Sized>(&self, dom: &D, element: &D::Element) -> bool {
        let Some((last, rest)) = self.compounds.split_last() else {
            return false;
        };

        if !last.matches(dom, element) {
            return false;
        }

        // Descendant combinators only, so matching each compound against the
        // nearest qualifying ancestor is enough.
        let mut current = dom.parent(element);

        for compound in rest.iter().rev() {
            loop {
                let Some(ancestor) = current else {
                    return false;
                };

                current = dom.parent(&ancestor);

                if compound.matches(dom, &ancestor) {
                    break;
                }
            }
        }

        true
    }
}

impl Compound {
    fn parse(value: &str) -> Self {
        let mut parts = value.split('.');

        let tag = parts
            .next()
            .filter(|v| !v.is_empty())
            .map(|v| v.to_ascii_lowercase());

        Self {
            tag,
            classes: parts
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    fn matches<D: Dom + ?Sized>(&self, dom: &D, element: &D::Element) -> bool {
        if let Some(tag) = &self.tag {
            if &dom.tag_name(element) != tag {
                return false;
            }
        }

        self.classes.iter().all(|class| dom.has_class(element, class))
    }
}
