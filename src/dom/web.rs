use std::cell::RefCell;

use wasm_bindgen::{prelude::Closure, JsCast};
use web_sys::{Document, Element, HtmlElement, MouseEvent};

use super::{ClickEvent, ClickHandler, Dom};
use crate::{helper::TargetCast, util::ElementEvent, Result};

/// Browser DOM. Holds the click closures alive until their elements are removed.
pub struct WebDom {
    document: Document,
    listeners: RefCell<Vec<ElementEvent>>,
}

impl WebDom {
    pub fn new() -> Self {
        Self::with_document(gloo_utils::document())
    }

    pub fn with_document(document: Document) -> Self {
        Self {
            document,
            listeners: RefCell::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Default for WebDom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom for WebDom {
    type Element = Element;

    fn create_element(&self, tag: &str) -> Result<Element> {
        Ok(self.document.create_element(tag)?)
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<()> {
        parent.append_child(child)?;
        Ok(())
    }

    fn remove_children(&self, parent: &Element) -> Result<()> {
        while let Some(child) = parent.last_child() {
            self.listeners
                .borrow_mut()
                .retain(|listener| !listener.is_within(&child));

            parent.remove_child(&child)?;
        }

        Ok(())
    }

    fn children(&self, parent: &Element) -> Vec<Element> {
        let collection = parent.children();

        (0..collection.length())
            .filter_map(|index| collection.item(index))
            .collect()
    }

    fn parent(&self, element: &Element) -> Option<Element> {
        element.parent_element()
    }

    fn tag_name(&self, element: &Element) -> String {
        element.tag_name().to_ascii_lowercase()
    }

    fn class_name(&self, element: &Element) -> String {
        element.class_name()
    }

    fn set_class_name(&self, element: &Element, value: &str) -> Result<()> {
        element.set_class_name(value);
        Ok(())
    }

    fn has_class(&self, element: &Element, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn toggle_class(&self, element: &Element, class: &str, force: bool) -> Result<()> {
        element.class_list().toggle_with_force(class, force)?;
        Ok(())
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn set_attribute(&self, element: &Element, name: &str, value: &str) -> Result<()> {
        element.set_attribute(name, value)?;
        Ok(())
    }

    fn text(&self, element: &Element) -> String {
        element.text_content().unwrap_or_default()
    }

    fn set_text(&self, element: &Element, value: &str) -> Result<()> {
        element.set_text_content(Some(value));
        Ok(())
    }

    fn style(&self, element: &Element, property: &str) -> Option<String> {
        element
            .dyn_ref::<HtmlElement>()
            .and_then(|v| v.style().get_property_value(property).ok())
            .filter(|v| !v.is_empty())
    }

    fn set_style(&self, element: &Element, property: &str, value: &str) -> Result<()> {
        if let Some(element) = element.dyn_ref::<HtmlElement>() {
            element.style().set_property(property, value)?;
        }

        Ok(())
    }

    fn on_click(&self, element: &Element, handler: ClickHandler<Element>) -> Result<()> {
        let function = Closure::wrap(Box::new(move |e: MouseEvent| {
            let Some(target) = e.target_dyn_into::<Element>() else {
                return;
            };

            let event = ClickEvent::new(target);

            handler(&event);

            if event.is_default_prevented() {
                e.prevent_default();
            }
        }) as Box<dyn Fn(MouseEvent)>);

        let listener = ElementEvent::link(
            element.clone().unchecked_into(),
            function,
            |t, f| t.add_event_listener_with_callback("click", f),
            Box::new(|t, f| t.remove_event_listener_with_callback("click", f)),
        )?;

        self.listeners.borrow_mut().push(listener);

        Ok(())
    }

    fn query_selector_all(&self, root: &Element, selector: &str) -> Vec<Element> {
        let Ok(list) = root.query_selector_all(selector) else {
            log::debug!("Invalid selector {selector:?}");
            return Vec::new();
        };

        (0..list.length())
            .filter_map(|index| list.get(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }
}
