use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    sync::atomic::{AtomicUsize, Ordering},
};

use lazy_static::lazy_static;
use serde_json::Value;

use crate::{
    color::{ColorTarget, RecentColor},
    dom::{ClickEvent, ClickHandler, Dom, ACTIVE_CLASS},
    editor::{Command, Editor, EditorEvent},
    font::FontCheck,
    options::ToolbarOptions,
    renderer::{Button, Dropdown, DropdownItems, Renderer},
    style::{font_family_candidates, TextStyle},
    Error, Result,
};

lazy_static! {
    static ref INCREMENT: AtomicUsize = AtomicUsize::default();
}

/// Class names other components and stylesheets select on.
pub mod class {
    pub const DROPDOWN_STYLE: &str = "dropdown-style";
    pub const DROPDOWN_FONTNAME: &str = "dropdown-fontname";
    pub const DROPDOWN_FONTSIZE: &str = "dropdown-fontsize";
    pub const DROPDOWN_LINE_HEIGHT: &str = "dropdown-line-height";
    pub const CURRENT_FONTNAME: &str = "note-current-fontname";
    pub const CURRENT_FONTSIZE: &str = "note-current-fontsize";
    pub const BTN_BOLD: &str = "note-btn-bold";
    pub const BTN_ITALIC: &str = "note-btn-italic";
    pub const BTN_UNDERLINE: &str = "note-btn-underline";
    pub const COLOR: &str = "note-color";
    pub const RECENT_COLOR: &str = "note-recent-color";
    pub const COLOR_RESET: &str = "note-color-reset";
    pub const PALETTE_TITLE: &str = "note-palette-title";
    pub const HOLDER: &str = "note-holder";
    pub const PARA: &str = "note-para";
    pub const ALIGN: &str = "note-align";
    pub const LIST: &str = "note-list";
    pub const CHECKED: &str = "checked";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToolbarId(usize);

impl ToolbarId {
    fn next() -> Self {
        Self(INCREMENT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn to_class_string(self) -> String {
        format!("note-toolbar-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarState {
    Uninitialized,
    Active,
    Destroyed,
}

/// Formatting toolbar for a rich text editor.
///
/// Renders its controls into `container` on [`Toolbar::initialize`], forwards clicks to
/// the [`Editor`] as commands and mirrors the selection style back onto the controls
/// whenever the editor reports a selection or content change.
pub struct Toolbar<D: Dom, E: Editor> {
    inner: Rc<Inner<D, E>>,
}

struct Inner<D: Dom, E: Editor> {
    id: ToolbarId,

    dom: D,
    editor: E,
    container: D::Element,

    options: ToolbarOptions,
    fonts: Box<dyn FontCheck>,

    state: Cell<ToolbarState>,

    recent_color: RefCell<RecentColor>,
    /// Icon previewing `recent_color`. Only a view of it.
    recent_indicator: RefCell<Option<D::Element>>,
}

impl<D: Dom + 'static, E: Editor + 'static> Toolbar<D, E> {
    pub fn new<F: FontCheck + 'static>(
        dom: D,
        editor: E,
        container: D::Element,
        options: ToolbarOptions,
        fonts: F,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                id: ToolbarId::next(),
                dom,
                editor,
                container,
                options,
                fonts: Box::new(fonts),
                state: Cell::new(ToolbarState::Uninitialized),
                recent_color: RefCell::default(),
                recent_indicator: RefCell::default(),
            }),
        }
    }

    pub fn id(&self) -> ToolbarId {
        self.inner.id
    }

    pub fn state(&self) -> ToolbarState {
        self.inner.state.get()
    }

    pub fn container(&self) -> &D::Element {
        &self.inner.container
    }

    pub fn options(&self) -> &ToolbarOptions {
        &self.inner.options
    }

    pub fn recent_color(&self) -> RecentColor {
        self.inner.recent_color.borrow().clone()
    }

    /// Subscribes to the editor and renders every control group.
    ///
    /// Fails if the toolbar was already initialized or has been destroyed.
    pub fn initialize(&self) -> Result<()> {
        self.inner.initialize()
    }

    /// Click handler which forwards the clicked element's `data-value` to `command`.
    pub fn create_invoke_handler(&self, command: Command) -> ClickHandler<D::Element> {
        self.inner.create_invoke_handler(command)
    }

    /// Re-reads the selection style and reflects it onto the controls.
    pub fn update_current_style(&self) -> Result<()> {
        self.inner.update_current_style()
    }

    /// Sets the `active` class on every element matching each selector to its predicate.
    pub fn update_btn_states<'a, I, P>(&self, infos: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, P)>,
        P: Fn() -> bool,
    {
        self.inner.update_btn_states(infos)
    }

    /// Removes every control from the container.
    pub fn destroy(&self) -> Result<()> {
        self.inner.destroy()
    }
}

impl<D: Dom + 'static, E: Editor + 'static> Inner<D, E> {
    fn ensure_active(&self) -> Result<()> {
        match self.state.get() {
            ToolbarState::Active => Ok(()),
            ToolbarState::Uninitialized => Err(Error::NotInitialized),
            ToolbarState::Destroyed => Err(Error::Destroyed),
        }
    }

    fn is_active(&self) -> bool {
        self.state.get() == ToolbarState::Active
    }

    fn initialize(self: &Rc<Self>) -> Result<()> {
        match self.state.get() {
            ToolbarState::Uninitialized => (),
            ToolbarState::Active => return Err(Error::AlreadyInitialized),
            ToolbarState::Destroyed => return Err(Error::Destroyed),
        }

        log::debug!("Initializing toolbar {:?}", self.id);

        // Subscribed last. A failed attempt must leave no handlers behind.
        if let Err(e) = self.render().and_then(|_| self.subscribe()) {
            self.dom.remove_children(&self.container)?;
            *self.recent_indicator.borrow_mut() = None;

            return Err(e);
        }

        self.dom
            .add_class(&self.container, &self.id.to_class_string())?;
        self.state.set(ToolbarState::Active);

        self.on_selection_changed();

        Ok(())
    }

    fn subscribe(self: &Rc<Self>) -> Result<()> {
        for event in EditorEvent::ALL {
            let this = Rc::downgrade(self);

            self.editor.subscribe(
                event,
                Rc::new(move || {
                    if let Some(this) = this.upgrade() {
                        this.on_selection_changed();
                    }
                }),
            )?;
        }

        Ok(())
    }

    fn render(self: &Rc<Self>) -> Result<()> {
        let r = Renderer::new(&self.dom);

        self.append(self.render_style_group(&r)?)?;
        self.append(self.render_font_style_group(&r)?)?;
        self.append(self.render_font_name_group(&r)?)?;
        self.append(self.render_font_size_group(&r)?)?;
        self.append(self.render_color_group(&r)?)?;
        self.append(self.render_para_group(&r)?)?;
        self.append(self.render_line_height_group(&r)?)?;

        Ok(())
    }

    fn append(&self, group: D::Element) -> Result<()> {
        self.dom.append_child(&self.container, &group)
    }

    fn render_style_group(self: &Rc<Self>, r: &Renderer<'_, D>) -> Result<D::Element> {
        r.button_group(
            None,
            vec![
                r.button(
                    Button::new(vec![r.icon("fa fa-magic")?, r.caret()?])
                        .class("dropdown-toggle")
                        .tooltip("Style")
                        .dropdown_toggle(),
                )?,
                r.dropdown(
                    Dropdown::new(DropdownItems::Values(&self.options.style_tags))
                        .class(class::DROPDOWN_STYLE)
                        .click(self.create_invoke_handler(Command::FormatBlock)),
                )?,
            ],
        )
    }

    fn render_font_style_group(self: &Rc<Self>, r: &Renderer<'_, D>) -> Result<D::Element> {
        r.button_group(
            None,
            vec![
                r.button(
                    Button::new(vec![r.icon("fa fa-bold")?])
                        .class(class::BTN_BOLD)
                        .tooltip("Bold (⌘+B)")
                        .click(self.create_invoke_handler(Command::Bold)),
                )?,
                r.button(
                    Button::new(vec![r.icon("fa fa-italic")?])
                        .class(class::BTN_ITALIC)
                        .tooltip("Italic (⌘+I)")
                        .click(self.create_invoke_handler(Command::Italic)),
                )?,
                r.button(
                    Button::new(vec![r.icon("fa fa-underline")?])
                        .class(class::BTN_UNDERLINE)
                        .tooltip("Underline (⌘+U)")
                        .click(self.create_invoke_handler(Command::Underline)),
                )?,
                r.button(
                    Button::new(vec![r.icon("fa fa-eraser")?])
                        .tooltip("Remove Font Style (⌘+\\)")
                        .click(self.create_invoke_handler(Command::RemoveFormat)),
                )?,
            ],
        )
    }

    fn render_font_name_group(self: &Rc<Self>, r: &Renderer<'_, D>) -> Result<D::Element> {
        let names: Vec<String> = self
            .options
            .font_names
            .iter()
            .filter(|name| self.is_font_available(name))
            .cloned()
            .collect();

        r.button_group(
            None,
            vec![
                r.button(
                    Button::new(vec![r.span(class::CURRENT_FONTNAME)?, r.caret()?])
                        .class("dropdown-toggle")
                        .tooltip("Font Family")
                        .dropdown_toggle(),
                )?,
                r.dropdown_check(
                    Dropdown::new(DropdownItems::Values(&names))
                        .class(class::DROPDOWN_FONTNAME)
                        .click(self.create_invoke_handler(Command::FontName)),
                )?,
            ],
        )
    }

    fn render_font_size_group(self: &Rc<Self>, r: &Renderer<'_, D>) -> Result<D::Element> {
        r.button_group(
            None,
            vec![
                r.button(
                    Button::new(vec![r.span(class::CURRENT_FONTSIZE)?, r.caret()?])
                        .class("dropdown-toggle")
                        .tooltip("Font Size")
                        .dropdown_toggle(),
                )?,
                r.dropdown_check(
                    Dropdown::new(DropdownItems::Values(&self.options.font_sizes))
                        .class(class::DROPDOWN_FONTSIZE)
                        .click(self.create_invoke_handler(Command::FontSize)),
                )?,
            ],
        )
    }

    fn render_color_group(self: &Rc<Self>, r: &Renderer<'_, D>) -> Result<D::Element> {
        let indicator = r.icon(&format!("fa fa-font {}", class::RECENT_COLOR))?;

        let recent = r.button(
            Button::new(vec![indicator.clone()])
                .tooltip("Recent Color")
                .click(self.create_recent_color_handler()),
        )?;

        let more = r.button(
            Button::new(vec![r.caret()?])
                .class("dropdown-toggle")
                .tooltip("More Color")
                .dropdown_toggle(),
        )?;

        let item = r.element("li", "")?;

        for (event_name, title, reset) in [
            ("backColor", "background color", "transparent"),
            ("foreColor", "fore color", "reset to default"),
        ] {
            let group = r.element("div", "btn-group")?;

            let reset = r.div_with_text(class::COLOR_RESET, reset)?;
            self.dom.set_data(&reset, "event", event_name)?;
            self.dom.set_data(&reset, "value", "inherit")?;

            let holder = r.element("div", class::HOLDER)?;
            self.dom.set_data(&holder, "event", event_name)?;
            self.dom
                .append_child(&holder, &r.palette(&self.options.colors, event_name)?)?;

            self.dom
                .append_child(&group, &r.div_with_text(class::PALETTE_TITLE, title)?)?;
            self.dom.append_child(&group, &reset)?;
            self.dom.append_child(&group, &holder)?;
            self.dom.append_child(&item, &group)?;
        }

        let menu = r.dropdown(
            Dropdown::new(DropdownItems::Elements(vec![item])).click(self.create_color_handler()),
        )?;

        let group = r.button_group(Some(class::COLOR), vec![recent, more, menu])?;

        // Palette exists now, so the fallback color can be shown.
        let initial = RecentColor::default();

        if let Some(back_color) = &initial.back_color {
            self.dom
                .set_style(&indicator, "background-color", back_color)?;
        }

        *self.recent_color.borrow_mut() = initial;
        *self.recent_indicator.borrow_mut() = Some(indicator);

        Ok(group)
    }

    fn render_para_group(self: &Rc<Self>, r: &Renderer<'_, D>) -> Result<D::Element> {
        let align = r.button_group(
            Some(class::ALIGN),
            vec![
                self.icon_button(r, "fa fa-align-left", Command::JustifyLeft)?,
                self.icon_button(r, "fa fa-align-center", Command::JustifyCenter)?,
                self.icon_button(r, "fa fa-align-right", Command::JustifyRight)?,
                self.icon_button(r, "fa fa-align-justify", Command::JustifyFull)?,
            ],
        )?;

        let list = r.button_group(
            Some(class::LIST),
            vec![
                self.icon_button(r, "fa fa-outdent", Command::Outdent)?,
                self.icon_button(r, "fa fa-indent", Command::Indent)?,
            ],
        )?;

        let more = r.button_group(
            None,
            vec![
                r.button(
                    Button::new(vec![r.icon("fa fa-align-left")?, r.caret()?])
                        .class("dropdown-toggle")
                        .tooltip("More paragraph style")
                        .dropdown_toggle(),
                )?,
                r.dropdown(Dropdown::new(DropdownItems::Elements(vec![align, list])))?,
            ],
        )?;

        r.button_group(
            Some(class::PARA),
            vec![
                r.button(
                    Button::new(vec![r.icon("fa fa-list-ul")?])
                        .tooltip("Unordered list (⌘+⇧+NUM7)")
                        .click(self.create_invoke_handler(Command::InsertUnorderedList)),
                )?,
                r.button(
                    Button::new(vec![r.icon("fa fa-list-ol")?])
                        .tooltip("Ordered list (⌘+⇧+NUM8)")
                        .click(self.create_invoke_handler(Command::InsertOrderedList)),
                )?,
                more,
            ],
        )
    }

    fn render_line_height_group(self: &Rc<Self>, r: &Renderer<'_, D>) -> Result<D::Element> {
        r.button_group(
            None,
            vec![
                r.button(
                    Button::new(vec![r.icon("fa fa-text-height")?, r.caret()?])
                        .class("dropdown-toggle")
                        .dropdown_toggle(),
                )?,
                r.dropdown_check(
                    Dropdown::new(DropdownItems::Values(&self.options.line_heights))
                        .class(class::DROPDOWN_LINE_HEIGHT)
                        .click(self.create_invoke_handler(Command::LineHeight)),
                )?,
            ],
        )
    }

    fn icon_button(
        self: &Rc<Self>,
        r: &Renderer<'_, D>,
        icon: &str,
        command: Command,
    ) -> Result<D::Element> {
        r.button(Button::new(vec![r.icon(icon)?]).click(self.create_invoke_handler(command)))
    }

    fn create_invoke_handler(self: &Rc<Self>, command: Command) -> ClickHandler<D::Element> {
        let this = Rc::downgrade(self);

        Rc::new(move |event: &ClickEvent<D::Element>| {
            event.prevent_default();

            let Some(this) = this.upgrade().filter(|v| v.is_active()) else {
                return;
            };

            let args: Vec<Value> = this
                .value_of(&event.target)
                .map(Value::String)
                .into_iter()
                .collect();

            log::debug!("Invoking {} {args:?}", command.namespace());

            if let Err(e) = this.editor.invoke(command.namespace(), args) {
                log::error!("Invoking {}: {e}", command.namespace());
            }
        })
    }

    fn create_recent_color_handler(self: &Rc<Self>) -> ClickHandler<D::Element> {
        let this = Rc::downgrade(self);

        Rc::new(move |event: &ClickEvent<D::Element>| {
            event.prevent_default();

            let Some(this) = this.upgrade().filter(|v| v.is_active()) else {
                return;
            };

            let recent = this.recent_color.borrow().clone();

            let result = serde_json::to_value(&recent)
                .map_err(Error::from)
                .and_then(|value| this.editor.invoke(Command::Color.namespace(), vec![value]));

            if let Err(e) = result {
                log::error!("Applying recent color: {e}");
            }
        })
    }

    fn create_color_handler(self: &Rc<Self>) -> ClickHandler<D::Element> {
        let this = Rc::downgrade(self);

        Rc::new(move |event: &ClickEvent<D::Element>| {
            let Some(this) = this.upgrade().filter(|v| v.is_active()) else {
                return;
            };

            if let Err(e) = this.pick_color(&event.target) {
                log::error!("Applying color: {e}");
            }
        })
    }

    fn pick_color(&self, target: &D::Element) -> Result<()> {
        let (Some(event_name), Some(value)) =
            (self.dom.data(target, "event"), self.dom.data(target, "value"))
        else {
            return Ok(());
        };

        let Some(color) = ColorTarget::from_event(&event_name, &value) else {
            return Ok(());
        };

        self.recent_color.borrow_mut().apply(&color);

        if let Some(indicator) = &*self.recent_indicator.borrow() {
            self.dom
                .set_style(indicator, color.css_property(), color.value())?;
        }

        log::debug!("Picked {color:?}");

        self.editor.invoke(
            color.command().namespace(),
            vec![Value::String(color.value().to_string())],
        )
    }

    /// `data-value` of `target` or its nearest ancestor inside the toolbar.
    fn value_of(&self, target: &D::Element) -> Option<String> {
        let mut current = Some(target.clone());

        while let Some(element) = current {
            if let Some(value) = self.dom.data(&element, "value") {
                return Some(value);
            }

            if element == self.container {
                break;
            }

            current = self.dom.parent(&element);
        }

        None
    }

    fn is_font_available(&self, name: &str) -> bool {
        self.fonts.is_font_installed(name) || self.options.is_font_ignore_check(name)
    }

    fn on_selection_changed(&self) {
        if !self.is_active() {
            log::trace!("Toolbar {:?} is inactive. Skipping style update", self.id);
            return;
        }

        if let Err(e) = self.update_current_style() {
            log::error!("Updating toolbar style: {e}");
        }
    }

    fn update_current_style(&self) -> Result<()> {
        self.ensure_active()?;

        let style = self.editor.current_style()?;
        let text_style = style.text_style();

        log::trace!("Current style {style:?}");

        self.update_btn_states(TextStyle::singles().into_iter().filter_map(|flag| {
            flag.button_selector()
                .map(|selector| (selector, move || text_style.contains(flag)))
        }))?;

        if let Some(font_family) = style.font_family() {
            let font_name =
                font_family_candidates(font_family).find(|name| self.is_font_available(name));

            self.check_items(class::DROPDOWN_FONTNAME, font_name.as_deref())?;

            match &font_name {
                Some(name) => self.set_label(class::CURRENT_FONTNAME, name)?,
                None => log::trace!("No available font in {font_family:?}"),
            }
        }

        if let Some(font_size) = style.font_size() {
            self.check_items(class::DROPDOWN_FONTSIZE, Some(font_size))?;
            self.set_label(class::CURRENT_FONTSIZE, font_size)?;
        }

        if let Some(line_height) = style.line_height() {
            self.check_items(class::DROPDOWN_LINE_HEIGHT, Some(line_height))?;
        }

        Ok(())
    }

    fn update_btn_states<'a, I, P>(&self, infos: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, P)>,
        P: Fn() -> bool,
    {
        self.ensure_active()?;

        for (selector, pred) in infos {
            let active = pred();

            for element in self.dom.query_selector_all(&self.container, selector) {
                self.dom.toggle_class(&element, ACTIVE_CLASS, active)?;
            }
        }

        Ok(())
    }

    /// Marks the dropdown entry whose value equals `value` as checked, clearing the rest.
    fn check_items(&self, dropdown_class: &str, value: Option<&str>) -> Result<()> {
        for anchor in self
            .dom
            .query_selector_all(&self.container, &format!(".{dropdown_class} li a"))
        {
            let is_checked = value.is_some() && self.dom.data(&anchor, "value").as_deref() == value;

            self.dom
                .set_class_name(&anchor, if is_checked { class::CHECKED } else { "" })?;
        }

        Ok(())
    }

    fn set_label(&self, label_class: &str, value: &str) -> Result<()> {
        for label in self
            .dom
            .query_selector_all(&self.container, &format!(".{label_class}"))
        {
            self.dom.set_text(&label, value)?;
        }

        Ok(())
    }

    fn destroy(&self) -> Result<()> {
        self.ensure_active()?;

        self.dom.remove_children(&self.container)?;
        self.dom
            .toggle_class(&self.container, &self.id.to_class_string(), false)?;

        *self.recent_indicator.borrow_mut() = None;
        self.state.set(ToolbarState::Destroyed);

        log::debug!("Destroyed toolbar {:?}", self.id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        dom::{MemoryDom, NodeId},
        editor::EventHandler,
        font::InstalledFonts,
        style::StyleInfo,
    };

    #[derive(Default)]
    struct RecordingEditor {
        style: RefCell<StyleInfo>,
        invoked: RefCell<Vec<(String, Vec<Value>)>>,
        handlers: RefCell<Vec<(EditorEvent, EventHandler)>>,
        style_reads: Cell<usize>,
    }

    impl RecordingEditor {
        fn set_style(&self, value: Value) {
            *self.style.borrow_mut() = serde_json::from_value(value).unwrap();
        }

        fn emit(&self, event: EditorEvent) {
            let handlers: Vec<_> = self
                .handlers
                .borrow()
                .iter()
                .filter(|(e, _)| *e == event)
                .map(|(_, h)| h.clone())
                .collect();

            for handler in handlers {
                handler();
            }
        }

        fn take_invoked(&self) -> Vec<(String, Vec<Value>)> {
            std::mem::take(&mut *self.invoked.borrow_mut())
        }
    }

    impl Editor for RecordingEditor {
        fn invoke(&self, namespace: &str, args: Vec<Value>) -> Result<()> {
            self.invoked
                .borrow_mut()
                .push((namespace.to_string(), args));
            Ok(())
        }

        fn current_style(&self) -> Result<StyleInfo> {
            self.style_reads.set(self.style_reads.get() + 1);
            Ok(self.style.borrow().clone())
        }

        fn subscribe(&self, event: EditorEvent, handler: EventHandler) -> Result<()> {
            self.handlers.borrow_mut().push((event, handler));
            Ok(())
        }
    }

    type TestToolbar = Toolbar<MemoryDom, Rc<RecordingEditor>>;

    fn call(namespace: &str, args: Vec<Value>) -> (String, Vec<Value>) {
        (namespace.to_string(), args)
    }

    fn create(installed: &[&str], options: ToolbarOptions) -> (MemoryDom, Rc<RecordingEditor>, TestToolbar) {
        let dom = MemoryDom::new();
        let container = dom.create_element("div").unwrap();
        let editor = Rc::new(RecordingEditor::default());

        let toolbar = Toolbar::new(
            dom.clone(),
            editor.clone(),
            container,
            options,
            InstalledFonts::new(installed.iter().copied()),
        );

        (dom, editor, toolbar)
    }

    fn setup(installed: &[&str], options: ToolbarOptions) -> (MemoryDom, Rc<RecordingEditor>, TestToolbar) {
        let (dom, editor, toolbar) = create(installed, options);
        toolbar.initialize().unwrap();
        (dom, editor, toolbar)
    }

    fn find(dom: &MemoryDom, toolbar: &TestToolbar, selector: &str) -> Vec<NodeId> {
        dom.query_selector_all(toolbar.container(), selector)
    }

    fn first(dom: &MemoryDom, toolbar: &TestToolbar, selector: &str) -> NodeId {
        find(dom, toolbar, selector)[0]
    }

    fn checked_values(dom: &MemoryDom, toolbar: &TestToolbar, dropdown_class: &str) -> Vec<String> {
        find(dom, toolbar, &format!(".{dropdown_class} li a"))
            .into_iter()
            .filter(|a| dom.class_name(a) == "checked")
            .filter_map(|a| dom.data(&a, "value"))
            .collect()
    }

    fn anchor(dom: &MemoryDom, toolbar: &TestToolbar, dropdown_class: &str, value: &str) -> NodeId {
        find(dom, toolbar, &format!(".{dropdown_class} li a"))
            .into_iter()
            .find(|a| dom.data(a, "value").as_deref() == Some(value))
            .unwrap()
    }

    fn swatch(dom: &MemoryDom, toolbar: &TestToolbar, event_name: &str, value: &str) -> NodeId {
        find(dom, toolbar, ".note-holder .note-color-btn")
            .into_iter()
            .find(|s| {
                dom.data(s, "event").as_deref() == Some(event_name)
                    && dom.data(s, "value").as_deref() == Some(value)
            })
            .unwrap()
    }

    #[test]
    fn initialize_renders_groups_in_order() {
        let (dom, editor, toolbar) = setup(&["Tahoma"], ToolbarOptions::default());
        let groups = dom.children(toolbar.container());

        assert_eq!(groups.len(), 7);
        assert_eq!(toolbar.state(), ToolbarState::Active);

        let contains = |group: NodeId, selector: &str| !dom.query_selector_all(&group, selector).is_empty();

        assert!(contains(groups[0], ".dropdown-style"));
        assert!(contains(groups[1], ".note-btn-bold"));
        assert!(contains(groups[1], ".note-btn-italic"));
        assert!(contains(groups[1], ".note-btn-underline"));
        assert!(contains(groups[2], ".dropdown-fontname"));
        assert!(contains(groups[2], ".note-current-fontname"));
        assert!(contains(groups[3], ".dropdown-fontsize"));
        assert!(contains(groups[3], ".note-current-fontsize"));
        assert!(dom.has_class(&groups[4], "note-color"));
        assert!(contains(groups[4], ".note-recent-color"));
        assert!(dom.has_class(&groups[5], "note-para"));
        assert!(contains(groups[5], ".note-align"));
        assert!(contains(groups[5], ".note-list"));
        assert!(contains(groups[6], ".dropdown-line-height"));

        let mut events: Vec<_> = editor.handlers.borrow().iter().map(|(e, _)| *e).collect();
        events.dedup();
        assert_eq!(events, EditorEvent::ALL.to_vec());

        // Initial refresh.
        assert_eq!(editor.style_reads.get(), 1);
    }

    #[test]
    fn font_dropdown_only_offers_available_fonts() {
        let options = ToolbarOptions {
            font_names_ignore_check: vec!["Impact".into()],
            ..ToolbarOptions::default()
        };
        let (dom, _, toolbar) = setup(&["Tahoma", "Verdana", "Not Listed"], options);

        let values: Vec<_> = find(&dom, &toolbar, ".dropdown-fontname li a")
            .into_iter()
            .filter_map(|a| dom.data(&a, "value"))
            .collect();

        assert_eq!(values, vec!["Impact", "Tahoma", "Verdana"]);
    }

    #[test]
    fn initialize_twice_fails_without_duplicating() {
        let (dom, editor, toolbar) = setup(&[], ToolbarOptions::default());

        assert!(matches!(toolbar.initialize(), Err(Error::AlreadyInitialized)));
        assert_eq!(dom.children(toolbar.container()).len(), 7);
        assert_eq!(editor.handlers.borrow().len(), 3);
    }

    #[test]
    fn class_names_are_usable_in_const_context() {
        const BUTTONS: [&str; 3] = [class::BTN_BOLD, class::BTN_ITALIC, class::BTN_UNDERLINE];

        let (dom, _editor, toolbar) = setup(&[], ToolbarOptions::default());

        for name in BUTTONS {
            assert_eq!(find(&dom, &toolbar, &format!(".{name}")).len(), 1);
        }
    }

    /// Fails the first `fail_creates` element creations, then behaves like `MemoryDom`.
    struct FlakyDom {
        inner: MemoryDom,
        fail_creates: Rc<Cell<usize>>,
    }

    impl Dom for FlakyDom {
        type Element = NodeId;

        fn create_element(&self, tag: &str) -> Result<NodeId> {
            if self.fail_creates.get() > 0 {
                self.fail_creates.set(self.fail_creates.get() - 1);
                return Err(Error::Js(format!("cannot create <{tag}>")));
            }

            self.inner.create_element(tag)
        }

        fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<()> {
            self.inner.append_child(parent, child)
        }

        fn remove_children(&self, parent: &NodeId) -> Result<()> {
            self.inner.remove_children(parent)
        }

        fn children(&self, parent: &NodeId) -> Vec<NodeId> {
            self.inner.children(parent)
        }

        fn parent(&self, element: &NodeId) -> Option<NodeId> {
            self.inner.parent(element)
        }

        fn tag_name(&self, element: &NodeId) -> String {
            self.inner.tag_name(element)
        }

        fn class_name(&self, element: &NodeId) -> String {
            self.inner.class_name(element)
        }

        fn set_class_name(&self, element: &NodeId, value: &str) -> Result<()> {
            self.inner.set_class_name(element, value)
        }

        fn has_class(&self, element: &NodeId, class: &str) -> bool {
            self.inner.has_class(element, class)
        }

        fn toggle_class(&self, element: &NodeId, class: &str, force: bool) -> Result<()> {
            self.inner.toggle_class(element, class, force)
        }

        fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
            self.inner.attribute(element, name)
        }

        fn set_attribute(&self, element: &NodeId, name: &str, value: &str) -> Result<()> {
            self.inner.set_attribute(element, name, value)
        }

        fn text(&self, element: &NodeId) -> String {
            self.inner.text(element)
        }

        fn set_text(&self, element: &NodeId, value: &str) -> Result<()> {
            self.inner.set_text(element, value)
        }

        fn style(&self, element: &NodeId, property: &str) -> Option<String> {
            self.inner.style(element, property)
        }

        fn set_style(&self, element: &NodeId, property: &str, value: &str) -> Result<()> {
            self.inner.set_style(element, property, value)
        }

        fn on_click(&self, element: &NodeId, handler: ClickHandler<NodeId>) -> Result<()> {
            self.inner.on_click(element, handler)
        }
    }

    #[test]
    fn failed_render_leaves_no_subscriptions() {
        let memory = MemoryDom::new();
        let container = memory.create_element("div").unwrap();
        let dom = FlakyDom {
            inner: memory.clone(),
            fail_creates: Rc::new(Cell::new(1)),
        };
        let editor = Rc::new(RecordingEditor::default());

        let toolbar = Toolbar::new(
            dom,
            editor.clone(),
            container,
            ToolbarOptions::default(),
            InstalledFonts::new(["Tahoma"]),
        );

        assert!(toolbar.initialize().is_err());
        assert_eq!(toolbar.state(), ToolbarState::Uninitialized);
        assert!(memory.children(&container).is_empty());
        assert!(editor.handlers.borrow().is_empty());
        assert_eq!(editor.style_reads.get(), 0);

        toolbar.initialize().unwrap();

        assert_eq!(toolbar.state(), ToolbarState::Active);
        assert_eq!(memory.children(&container).len(), 7);
        assert_eq!(editor.handlers.borrow().len(), 3);

        let reads = editor.style_reads.get();
        editor.emit(EditorEvent::KeyUp);
        assert_eq!(editor.style_reads.get(), reads + 1);
    }

    #[test]
    fn operations_before_initialize_fail() {
        let (dom, editor, toolbar) = create(&[], ToolbarOptions::default());

        assert!(matches!(toolbar.update_current_style(), Err(Error::NotInitialized)));
        assert!(matches!(
            toolbar.update_btn_states([(".note-btn-bold", || true)]),
            Err(Error::NotInitialized)
        ));
        assert!(matches!(toolbar.destroy(), Err(Error::NotInitialized)));
        assert!(dom.children(toolbar.container()).is_empty());
        assert_eq!(editor.style_reads.get(), 0);
    }

    #[test]
    fn destroy_removes_every_control() {
        let (dom, editor, toolbar) = setup(&["Tahoma"], ToolbarOptions::default());
        let bold = first(&dom, &toolbar, ".note-btn-bold");
        let class = toolbar.id().to_class_string();

        assert!(dom.has_class(toolbar.container(), &class));

        toolbar.destroy().unwrap();

        assert!(dom.children(toolbar.container()).is_empty());
        assert!(!dom.has_class(toolbar.container(), &class));
        assert_eq!(toolbar.state(), ToolbarState::Destroyed);

        assert!(matches!(toolbar.destroy(), Err(Error::Destroyed)));
        assert!(matches!(toolbar.initialize(), Err(Error::Destroyed)));

        // Stale subscriptions and detached buttons do nothing.
        let reads = editor.style_reads.get();
        editor.emit(EditorEvent::Change);
        dom.click(bold);

        assert_eq!(editor.style_reads.get(), reads);
        assert!(editor.take_invoked().is_empty());
    }

    #[test]
    fn dropped_toolbar_ignores_editor_events() {
        let (_, editor, toolbar) = setup(&[], ToolbarOptions::default());
        let reads = editor.style_reads.get();

        drop(toolbar);
        editor.emit(EditorEvent::KeyUp);

        assert_eq!(editor.style_reads.get(), reads);
    }

    #[test]
    fn every_event_refreshes_style() {
        let (_, editor, _toolbar) = setup(&[], ToolbarOptions::default());
        let reads = editor.style_reads.get();

        for event in EditorEvent::ALL {
            editor.emit(event);
        }

        assert_eq!(editor.style_reads.get(), reads + 3);
    }

    #[test]
    fn toggle_buttons_follow_style() {
        let (dom, editor, toolbar) = setup(&[], ToolbarOptions::default());
        let bold = first(&dom, &toolbar, ".note-btn-bold");
        let italic = first(&dom, &toolbar, ".note-btn-italic");
        let underline = first(&dom, &toolbar, ".note-btn-underline");

        editor.set_style(json!({ "font-bold": "bold", "font-underline": "underline" }));
        editor.emit(EditorEvent::MouseUp);

        assert!(dom.has_class(&bold, "active"));
        assert!(!dom.has_class(&italic, "active"));
        assert!(dom.has_class(&underline, "active"));

        let before = dom.class_name(&bold);
        editor.emit(EditorEvent::MouseUp);
        assert_eq!(dom.class_name(&bold), before);

        editor.set_style(json!({ "font-bold": "normal", "font-italic": "italic" }));
        editor.emit(EditorEvent::KeyUp);

        assert!(!dom.has_class(&bold, "active"));
        assert!(dom.has_class(&italic, "active"));
        assert!(!dom.has_class(&underline, "active"));
    }

    #[test]
    fn first_available_font_is_selected() {
        let (dom, editor, toolbar) = setup(&["Tahoma"], ToolbarOptions::default());

        editor.set_style(json!({ "font-family": "Arial, \"Courier New\" , Tahoma" }));
        editor.emit(EditorEvent::Change);

        assert_eq!(dom.text(&first(&dom, &toolbar, ".note-current-fontname")), "Tahoma");
        assert_eq!(checked_values(&dom, &toolbar, "dropdown-fontname"), vec!["Tahoma"]);
    }

    #[test]
    fn ignore_check_fonts_are_selectable() {
        let options = ToolbarOptions {
            font_names: vec!["Open Sans".into(), "Tahoma".into()],
            font_names_ignore_check: vec!["Open Sans".into()],
            ..ToolbarOptions::default()
        };
        let (dom, editor, toolbar) = setup(&["Tahoma"], options);

        editor.set_style(json!({ "font-family": "'Open Sans', Tahoma, sans-serif" }));
        toolbar.update_current_style().unwrap();

        assert_eq!(
            dom.text(&first(&dom, &toolbar, ".note-current-fontname")),
            "Open Sans"
        );
        assert_eq!(checked_values(&dom, &toolbar, "dropdown-fontname"), vec!["Open Sans"]);
    }

    #[test]
    fn unavailable_font_keeps_label() {
        let (dom, editor, toolbar) = setup(&["Tahoma"], ToolbarOptions::default());
        let label = first(&dom, &toolbar, ".note-current-fontname");

        editor.set_style(json!({ "font-family": "Tahoma" }));
        toolbar.update_current_style().unwrap();

        editor.set_style(json!({ "font-family": "Wingdings, Papyrus" }));
        toolbar.update_current_style().unwrap();

        assert_eq!(dom.text(&label), "Tahoma");
        assert!(checked_values(&dom, &toolbar, "dropdown-fontname").is_empty());
    }

    #[test]
    fn numeric_and_string_sizes_check_the_same_entry() {
        let (dom, editor, toolbar) = setup(&[], ToolbarOptions::default());
        let label = first(&dom, &toolbar, ".note-current-fontsize");

        editor.set_style(json!({ "font-size": 14 }));
        toolbar.update_current_style().unwrap();

        assert_eq!(checked_values(&dom, &toolbar, "dropdown-fontsize"), vec!["14"]);
        assert_eq!(dom.text(&label), "14");

        editor.set_style(json!({ "font-size": "18" }));
        toolbar.update_current_style().unwrap();
        editor.set_style(json!({ "font-size": "14" }));
        toolbar.update_current_style().unwrap();

        assert_eq!(checked_values(&dom, &toolbar, "dropdown-fontsize"), vec!["14"]);
    }

    #[test]
    fn line_height_is_checked() {
        let (dom, editor, toolbar) = setup(&[], ToolbarOptions::default());

        editor.set_style(json!({ "line-height": "1.5" }));
        toolbar.update_current_style().unwrap();

        assert_eq!(checked_values(&dom, &toolbar, "dropdown-line-height"), vec!["1.5"]);
        assert!(checked_values(&dom, &toolbar, "dropdown-fontsize").is_empty());
    }

    #[test]
    fn missing_fields_leave_controls_untouched() {
        let (dom, editor, toolbar) = setup(&["Tahoma"], ToolbarOptions::default());

        editor.set_style(json!({
            "font-family": "Tahoma",
            "font-size": "24",
            "line-height": "2.0",
        }));
        toolbar.update_current_style().unwrap();

        editor.set_style(json!({ "font-bold": "bold", "font-size": "" }));
        toolbar.update_current_style().unwrap();

        assert_eq!(dom.text(&first(&dom, &toolbar, ".note-current-fontname")), "Tahoma");
        assert_eq!(dom.text(&first(&dom, &toolbar, ".note-current-fontsize")), "24");
        assert_eq!(checked_values(&dom, &toolbar, "dropdown-fontname"), vec!["Tahoma"]);
        assert_eq!(checked_values(&dom, &toolbar, "dropdown-fontsize"), vec!["24"]);
        assert_eq!(checked_values(&dom, &toolbar, "dropdown-line-height"), vec!["2.0"]);
    }

    #[test]
    fn buttons_invoke_commands() {
        let (dom, editor, toolbar) = setup(&[], ToolbarOptions::default());

        assert!(dom.click(first(&dom, &toolbar, ".note-btn-bold")));
        // Clicking the icon inside a button bubbles to the button.
        dom.click(first(&dom, &toolbar, ".note-btn-italic i"));
        dom.click(first(&dom, &toolbar, ".note-align button"));
        dom.click(first(&dom, &toolbar, ".note-list .fa-indent"));

        assert_eq!(
            editor.take_invoked(),
            vec![
                call("editor.bold", vec![]),
                call("editor.italic", vec![]),
                call("editor.justifyLeft", vec![]),
                call("editor.indent", vec![]),
            ]
        );
    }

    #[test]
    fn dropdown_entries_invoke_with_their_value() {
        let (dom, editor, toolbar) = setup(&["Tahoma"], ToolbarOptions::default());

        assert!(dom.click(anchor(&dom, &toolbar, "dropdown-style", "h1")));

        // Label inside a checkable entry resolves to the entry's value.
        let size = anchor(&dom, &toolbar, "dropdown-fontsize", "18");
        dom.click(dom.children(&size)[1]);

        dom.click(anchor(&dom, &toolbar, "dropdown-line-height", "1.4"));
        dom.click(anchor(&dom, &toolbar, "dropdown-fontname", "Tahoma"));

        assert_eq!(
            editor.take_invoked(),
            vec![
                call("editor.formatBlock", vec![json!("h1")]),
                call("editor.fontSize", vec![json!("18")]),
                call("editor.lineHeight", vec![json!("1.4")]),
                call("editor.fontName", vec![json!("Tahoma")]),
            ]
        );
    }

    #[test]
    fn picking_a_swatch_updates_recent_color() {
        let options = ToolbarOptions {
            colors: vec![vec!["#ff0000".into(), "#00ff00".into()]],
            ..ToolbarOptions::default()
        };
        let (dom, editor, toolbar) = setup(&[], options);
        let indicator = first(&dom, &toolbar, ".note-recent-color");

        dom.click(swatch(&dom, &toolbar, "foreColor", "#00ff00"));
        assert_eq!(
            editor.take_invoked(),
            vec![call("editor.foreColor", vec![json!("#00ff00")])]
        );

        dom.click(swatch(&dom, &toolbar, "backColor", "#ff0000"));

        assert_eq!(
            toolbar.recent_color(),
            RecentColor {
                back_color: Some("#ff0000".into()),
                fore_color: Some("#00ff00".into()),
            }
        );
        assert_eq!(
            editor.take_invoked(),
            vec![call("editor.backColor", vec![json!("#ff0000")])]
        );
        assert_eq!(dom.style(&indicator, "background-color").as_deref(), Some("#ff0000"));
        assert_eq!(dom.style(&indicator, "color").as_deref(), Some("#00ff00"));
    }

    #[test]
    fn recent_color_button_replays_last_pick() {
        let (dom, editor, toolbar) = setup(&[], ToolbarOptions::default());
        let indicator = first(&dom, &toolbar, ".note-recent-color");

        assert_eq!(dom.style(&indicator, "background-color").as_deref(), Some("yellow"));

        assert!(dom.click(indicator));
        assert_eq!(
            editor.take_invoked(),
            vec![call("editor.color", vec![json!({ "backColor": "yellow" })])]
        );

        dom.click(swatch(&dom, &toolbar, "foreColor", "#0000FF"));
        editor.take_invoked();

        dom.click(indicator);
        assert_eq!(
            editor.take_invoked(),
            vec![(
                "editor.color".to_string(),
                vec![json!({ "backColor": "yellow", "foreColor": "#0000FF" })]
            )]
        );
    }

    #[test]
    fn reset_entries_apply_inherit() {
        let (dom, editor, toolbar) = setup(&[], ToolbarOptions::default());

        let reset = find(&dom, &toolbar, ".note-color-reset")
            .into_iter()
            .find(|r| dom.data(r, "event").as_deref() == Some("foreColor"))
            .unwrap();

        assert_eq!(dom.text(&reset), "reset to default");

        dom.click(reset);

        assert_eq!(
            editor.take_invoked(),
            vec![call("editor.foreColor", vec![json!("inherit")])]
        );
        assert_eq!(toolbar.recent_color().fore_color.as_deref(), Some("inherit"));
    }

    #[test]
    fn palette_titles_and_holders() {
        let (dom, editor, toolbar) = setup(&[], ToolbarOptions::default());

        let titles: Vec<_> = find(&dom, &toolbar, ".note-palette-title")
            .iter()
            .map(|t| dom.text(t))
            .collect();
        assert_eq!(titles, vec!["background color", "fore color"]);

        assert_eq!(find(&dom, &toolbar, ".note-holder .note-color-btn").len(), 128);

        // Clicks on the palette background carry no color.
        dom.click(first(&dom, &toolbar, ".note-holder"));
        dom.click(first(&dom, &toolbar, ".note-color-row"));

        assert!(editor.take_invoked().is_empty());
    }

    #[test]
    fn update_btn_states_accepts_custom_selectors() {
        let (dom, _, toolbar) = setup(&[], ToolbarOptions::default());

        toolbar
            .update_btn_states([(".note-para button", || true)])
            .unwrap();

        let buttons = find(&dom, &toolbar, ".note-para button");
        assert!(!buttons.is_empty());
        assert!(buttons.iter().all(|b| dom.has_class(b, "active")));
        assert!(!dom.has_class(&first(&dom, &toolbar, ".note-btn-bold"), "active"));
    }

    #[test]
    fn toolbar_ids_are_unique() {
        let (_, _, a) = create(&[], ToolbarOptions::default());
        let (_, _, b) = create(&[], ToolbarOptions::default());

        assert_ne!(a.id(), b.id());
        assert_ne!(a.id().to_class_string(), b.id().to_class_string());
    }
}
