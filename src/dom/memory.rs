use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use super::{ClickEvent, ClickHandler, Dom};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Headless DOM kept in an arena. Clones share the same tree.
///
/// Nodes are never freed. Removing children only detaches them.
#[derive(Clone, Default)]
pub struct MemoryDom {
    arena: Rc<RefCell<Vec<MemoryNode>>>,
}

#[derive(Default)]
struct MemoryNode {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,

    parent: Option<NodeId>,
    children: Vec<NodeId>,

    listeners: Vec<ClickHandler<NodeId>>,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatches a click at `target`, bubbling through every ancestor.
    ///
    /// Returns true if a handler prevented the default action.
    pub fn click(&self, target: NodeId) -> bool {
        let mut handlers = Vec::new();

        {
            let arena = self.arena.borrow();
            let mut current = Some(target);

            while let Some(id) = current {
                let node = &arena[id.0];
                handlers.extend(node.listeners.iter().cloned());
                current = node.parent;
            }
        }

        let event = ClickEvent::new(target);

        for handler in handlers {
            handler(&event);
        }

        event.is_default_prevented()
    }

    fn with<R>(&self, id: &NodeId, func: impl FnOnce(&MemoryNode) -> R) -> R {
        func(&self.arena.borrow()[id.0])
    }

    fn with_mut<R>(&self, id: &NodeId, func: impl FnOnce(&mut MemoryNode) -> R) -> R {
        func(&mut self.arena.borrow_mut()[id.0])
    }

    fn detach(&self, child: NodeId) {
        let mut arena = self.arena.borrow_mut();

        if let Some(parent) = arena[child.0].parent.take() {
            arena[parent.0].children.retain(|&v| v != child);
        }
    }
}

impl Dom for MemoryDom {
    type Element = NodeId;

    fn create_element(&self, tag: &str) -> Result<NodeId> {
        let mut arena = self.arena.borrow_mut();

        arena.push(MemoryNode {
            tag: tag.to_ascii_lowercase(),
            ..MemoryNode::default()
        });

        Ok(NodeId(arena.len() - 1))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<()> {
        self.detach(*child);

        let mut arena = self.arena.borrow_mut();
        arena[child.0].parent = Some(*parent);
        arena[parent.0].children.push(*child);

        Ok(())
    }

    fn remove_children(&self, parent: &NodeId) -> Result<()> {
        let mut arena = self.arena.borrow_mut();

        for child in std::mem::take(&mut arena[parent.0].children) {
            arena[child.0].parent = None;
        }

        Ok(())
    }

    fn children(&self, parent: &NodeId) -> Vec<NodeId> {
        self.with(parent, |node| node.children.clone())
    }

    fn parent(&self, element: &NodeId) -> Option<NodeId> {
        self.with(element, |node| node.parent)
    }

    fn tag_name(&self, element: &NodeId) -> String {
        self.with(element, |node| node.tag.clone())
    }

    fn class_name(&self, element: &NodeId) -> String {
        self.with(element, |node| node.classes.join(" "))
    }

    fn set_class_name(&self, element: &NodeId, value: &str) -> Result<()> {
        self.with_mut(element, |node| {
            node.classes = value.split_whitespace().map(str::to_string).collect();
        });

        Ok(())
    }

    fn has_class(&self, element: &NodeId, class: &str) -> bool {
        self.with(element, |node| node.classes.iter().any(|v| v == class))
    }

    fn toggle_class(&self, element: &NodeId, class: &str, force: bool) -> Result<()> {
        self.with_mut(element, |node| {
            let position = node.classes.iter().position(|v| v == class);

            match (force, position) {
                (true, None) => node.classes.push(class.to_string()),
                (false, Some(index)) => {
                    node.classes.remove(index);
                }
                _ => (),
            }
        });

        Ok(())
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.with(element, |node| node.attributes.get(name).cloned())
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) -> Result<()> {
        self.with_mut(element, |node| {
            node.attributes.insert(name.to_string(), value.to_string());
        });

        Ok(())
    }

    fn text(&self, element: &NodeId) -> String {
        let (own, children) = self.with(element, |node| (node.text.clone(), node.children.clone()));

        children
            .iter()
            .fold(own, |text, child| text + &self.text(child))
    }

    fn set_text(&self, element: &NodeId, value: &str) -> Result<()> {
        self.remove_children(element)?;

        self.with_mut(element, |node| node.text = value.to_string());

        Ok(())
    }

    fn style(&self, element: &NodeId, property: &str) -> Option<String> {
        self.with(element, |node| node.styles.get(property).cloned())
    }

    fn set_style(&self, element: &NodeId, property: &str, value: &str) -> Result<()> {
        self.with_mut(element, |node| {
            node.styles.insert(property.to_string(), value.to_string());
        });

        Ok(())
    }

    fn on_click(&self, element: &NodeId, handler: ClickHandler<NodeId>) -> Result<()> {
        self.with_mut(element, |node| node.listeners.push(handler));

        Ok(())
    }
}
