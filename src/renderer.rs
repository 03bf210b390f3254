//! Builds the bootstrap style widgets a toolbar is made of.

use crate::{
    dom::{ClickHandler, Dom},
    Result,
};

pub struct Button<E> {
    class_name: Option<&'static str>,
    contents: Vec<E>,
    tooltip: Option<&'static str>,
    dropdown_toggle: bool,
    click: Option<ClickHandler<E>>,
}

impl<E> Button<E> {
    pub fn new(contents: Vec<E>) -> Self {
        Self {
            class_name: None,
            contents,
            tooltip: None,
            dropdown_toggle: false,
            click: None,
        }
    }

    pub fn class(mut self, value: &'static str) -> Self {
        self.class_name = Some(value);
        self
    }

    pub fn tooltip(mut self, value: &'static str) -> Self {
        self.tooltip = Some(value);
        self
    }

    pub fn dropdown_toggle(mut self) -> Self {
        self.dropdown_toggle = true;
        self
    }

    pub fn click(mut self, handler: ClickHandler<E>) -> Self {
        self.click = Some(handler);
        self
    }
}

pub enum DropdownItems<'a, E> {
    /// One `li > a[data-value]` entry per value.
    Values(&'a [String]),
    /// Prebuilt content appended as is.
    Elements(Vec<E>),
}

pub struct Dropdown<'a, E> {
    class_name: Option<&'static str>,
    items: DropdownItems<'a, E>,
    click: Option<ClickHandler<E>>,
}

impl<'a, E> Dropdown<'a, E> {
    pub fn new(items: DropdownItems<'a, E>) -> Self {
        Self {
            class_name: None,
            items,
            click: None,
        }
    }

    pub fn class(mut self, value: &'static str) -> Self {
        self.class_name = Some(value);
        self
    }

    pub fn click(mut self, handler: ClickHandler<E>) -> Self {
        self.click = Some(handler);
        self
    }
}

pub struct Renderer<'a, D: Dom> {
    dom: &'a D,
}

impl<'a, D: Dom> Renderer<'a, D> {
    pub fn new(dom: &'a D) -> Self {
        Self { dom }
    }

    pub fn element(&self, tag: &str, class_name: &str) -> Result<D::Element> {
        let element = self.dom.create_element(tag)?;

        if !class_name.is_empty() {
            self.dom.set_class_name(&element, class_name)?;
        }

        Ok(element)
    }

    /// A font awesome icon, e.g. `fa fa-bold`.
    pub fn icon(&self, class_name: &str) -> Result<D::Element> {
        self.element("i", class_name)
    }

    pub fn span(&self, class_name: &str) -> Result<D::Element> {
        self.element("span", class_name)
    }

    pub fn caret(&self) -> Result<D::Element> {
        self.span("caret")
    }

    pub fn div_with_text(&self, class_name: &str, text: &str) -> Result<D::Element> {
        let element = self.element("div", class_name)?;
        self.dom.set_text(&element, text)?;
        Ok(element)
    }

    pub fn button(&self, button: Button<D::Element>) -> Result<D::Element> {
        let class_name = match button.class_name {
            Some(class) => format!("note-btn btn btn-default btn-sm {class}"),
            None => String::from("note-btn btn btn-default btn-sm"),
        };

        let element = self.element("button", &class_name)?;
        self.dom.set_attribute(&element, "type", "button")?;
        self.dom.set_attribute(&element, "tabindex", "-1")?;

        if let Some(tooltip) = button.tooltip {
            self.dom.set_attribute(&element, "title", tooltip)?;
        }

        if button.dropdown_toggle {
            self.dom.set_data(&element, "toggle", "dropdown")?;
        }

        self.append_all(&element, button.contents)?;

        if let Some(click) = button.click {
            self.dom.on_click(&element, click)?;
        }

        Ok(element)
    }

    pub fn button_group(
        &self,
        class_name: Option<&str>,
        children: Vec<D::Element>,
    ) -> Result<D::Element> {
        let class_name = match class_name {
            Some(class) => format!("note-btn-group btn-group {class}"),
            None => String::from("note-btn-group btn-group"),
        };

        let element = self.element("div", &class_name)?;
        self.append_all(&element, children)?;

        Ok(element)
    }

    pub fn dropdown(&self, dropdown: Dropdown<'_, D::Element>) -> Result<D::Element> {
        self.build_dropdown(dropdown, false)
    }

    /// Like [`Self::dropdown`], with a check mark in front of each value.
    pub fn dropdown_check(&self, dropdown: Dropdown<'_, D::Element>) -> Result<D::Element> {
        self.build_dropdown(dropdown, true)
    }

    fn build_dropdown(
        &self,
        dropdown: Dropdown<'_, D::Element>,
        checkable: bool,
    ) -> Result<D::Element> {
        let mut class_name = String::from("dropdown-menu");

        if checkable {
            class_name += " note-check";
        }

        if let Some(class) = dropdown.class_name {
            class_name += " ";
            class_name += class;
        }

        let element = self.element("ul", &class_name)?;

        match dropdown.items {
            DropdownItems::Values(values) => {
                for value in values {
                    let item = self.dom.create_element("li")?;

                    let anchor = self.dom.create_element("a")?;
                    self.dom.set_attribute(&anchor, "href", "#")?;
                    self.dom.set_data(&anchor, "value", value)?;

                    if checkable {
                        let label = self.span("note-item-label")?;
                        self.dom.set_text(&label, value)?;

                        self.dom.append_child(&anchor, &self.icon("fa fa-check")?)?;
                        self.dom.append_child(&anchor, &label)?;
                    } else {
                        self.dom.set_text(&anchor, value)?;
                    }

                    self.dom.append_child(&item, &anchor)?;
                    self.dom.append_child(&element, &item)?;
                }
            }

            DropdownItems::Elements(children) => self.append_all(&element, children)?,
        }

        if let Some(click) = dropdown.click {
            self.dom.on_click(&element, click)?;
        }

        Ok(element)
    }

    /// Grid of color swatches. Each swatch carries `data-event` and `data-value`.
    pub fn palette(&self, colors: &[Vec<String>], event_name: &str) -> Result<D::Element> {
        let palette = self.element("div", "note-color-palette")?;

        for row in colors {
            let row_element = self.element("div", "note-color-row")?;

            for color in row {
                let swatch = self.element("button", "note-color-btn")?;
                self.dom.set_attribute(&swatch, "type", "button")?;
                self.dom.set_attribute(&swatch, "tabindex", "-1")?;
                self.dom.set_attribute(&swatch, "title", color)?;
                self.dom.set_style(&swatch, "background-color", color)?;
                self.dom.set_data(&swatch, "event", event_name)?;
                self.dom.set_data(&swatch, "value", color)?;

                self.dom.append_child(&row_element, &swatch)?;
            }

            self.dom.append_child(&palette, &row_element)?;
        }

        Ok(palette)
    }

    fn append_all(&self, parent: &D::Element, children: Vec<D::Element>) -> Result<()> {
        for child in &children {
            self.dom.append_child(parent, child)?;
        }

        Ok(())
    }
}
