use std::{cell::RefCell, rc::Rc};

use js_sys::{Array, JSON};
use serde_json::Value;
use wasm_bindgen::{prelude::*, JsCast};

use crate::{style::StyleInfo, Result};

pub type EventHandler = Rc<dyn Fn()>;

/// The editing surface the toolbar drives.
pub trait Editor {
    /// Runs a namespaced command such as `editor.bold`.
    fn invoke(&self, namespace: &str, args: Vec<Value>) -> Result<()>;

    /// Style at the current selection.
    fn current_style(&self) -> Result<StyleInfo>;

    fn subscribe(&self, event: EditorEvent, handler: EventHandler) -> Result<()>;
}

impl<E: Editor + ?Sized> Editor for Rc<E> {
    fn invoke(&self, namespace: &str, args: Vec<Value>) -> Result<()> {
        (**self).invoke(namespace, args)
    }

    fn current_style(&self) -> Result<StyleInfo> {
        (**self).current_style()
    }

    fn subscribe(&self, event: EditorEvent, handler: EventHandler) -> Result<()> {
        (**self).subscribe(event, handler)
    }
}

/// Notifications after which the selection style may differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorEvent {
    /// Selection moved with the keyboard.
    KeyUp,
    /// Selection moved with the pointer.
    MouseUp,
    /// Content changed.
    Change,
}

impl EditorEvent {
    pub const ALL: [Self; 3] = [Self::KeyUp, Self::MouseUp, Self::Change];

    pub fn name(self) -> &'static str {
        match self {
            Self::KeyUp => "summernote.keyup",
            Self::MouseUp => "summernote.mouseup",
            Self::Change => "summernote.change",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    FormatBlock,
    Bold,
    Italic,
    Underline,
    RemoveFormat,
    FontName,
    FontSize,
    Color,
    BackColor,
    ForeColor,
    InsertUnorderedList,
    InsertOrderedList,
    JustifyLeft,
    JustifyCenter,
    JustifyRight,
    JustifyFull,
    Outdent,
    Indent,
    LineHeight,
    CurrentStyle,
}

impl Command {
    pub fn namespace(self) -> &'static str {
        match self {
            Self::FormatBlock => "editor.formatBlock",
            Self::Bold => "editor.bold",
            Self::Italic => "editor.italic",
            Self::Underline => "editor.underline",
            Self::RemoveFormat => "editor.removeFormat",
            Self::FontName => "editor.fontName",
            Self::FontSize => "editor.fontSize",
            Self::Color => "editor.color",
            Self::BackColor => "editor.backColor",
            Self::ForeColor => "editor.foreColor",
            Self::InsertUnorderedList => "editor.insertUnorderedList",
            Self::InsertOrderedList => "editor.insertOrderedList",
            Self::JustifyLeft => "editor.justifyLeft",
            Self::JustifyCenter => "editor.justifyCenter",
            Self::JustifyRight => "editor.justifyRight",
            Self::JustifyFull => "editor.justifyFull",
            Self::Outdent => "editor.outdent",
            Self::Indent => "editor.indent",
            Self::LineHeight => "editor.lineHeight",
            Self::CurrentStyle => "editor.currentStyle",
        }
    }
}

#[wasm_bindgen]
extern "C" {
    /// Host editor context. Exposes `invoke(namespace, args)` and `on(events, handler)`.
    pub type NoteContext;

    #[wasm_bindgen(method, catch)]
    fn invoke(this: &NoteContext, namespace: &str, args: &Array) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn on(this: &NoteContext, events: &str, handler: &js_sys::Function) -> std::result::Result<JsValue, JsValue>;
}

/// [`Editor`] backed by a JavaScript editor context.
pub struct JsEditor {
    context: NoteContext,
    subscriptions: RefCell<Vec<Closure<dyn Fn()>>>,
}

impl JsEditor {
    pub fn new(context: NoteContext) -> Self {
        Self {
            context,
            subscriptions: RefCell::default(),
        }
    }
}

impl Editor for JsEditor {
    fn invoke(&self, namespace: &str, args: Vec<Value>) -> Result<()> {
        let array = Array::new();

        for arg in args {
            array.push(&JSON::parse(&serde_json::to_string(&arg)?)?);
        }

        self.context.invoke(namespace, &array)?;

        Ok(())
    }

    fn current_style(&self) -> Result<StyleInfo> {
        let value = self
            .context
            .invoke(Command::CurrentStyle.namespace(), &Array::new())?;

        if value.is_undefined() || value.is_null() {
            return Ok(StyleInfo::default());
        }

        let json: String = JSON::stringify(&value)?.into();

        Ok(serde_json::from_str(&json)?)
    }

    fn subscribe(&self, event: EditorEvent, handler: EventHandler) -> Result<()> {
        let function = Closure::wrap(Box::new(move || handler()) as Box<dyn Fn()>);

        self.context
            .on(event.name(), function.as_ref().unchecked_ref())?;

        self.subscriptions.borrow_mut().push(function);

        Ok(())
    }
}
