use web_sys::Element;

pub mod color;
pub mod dom;
pub mod editor;
mod error;
pub mod font;
mod helper;
pub mod options;
pub mod renderer;
pub mod style;
pub mod toolbar;
mod util;

pub type Result<V, E = Error> = std::result::Result<V, E>;

pub use color::{ColorTarget, RecentColor};
pub use dom::{ClickEvent, ClickHandler, Dom, MemoryDom, WebDom};
pub use editor::{Command, Editor, EditorEvent, JsEditor, NoteContext};
pub use error::Error;
pub use font::{CanvasFontCheck, FontCheck, InstalledFonts};
pub use options::ToolbarOptions;
pub use style::{StyleInfo, TextStyle};
pub use toolbar::{Toolbar, ToolbarId, ToolbarState};

/// Renders an initialized toolbar into `container` for a browser hosted editor.
///
/// Should be called once the editor context is ready to answer `editor.currentStyle`.
pub fn mount(
    container: Element,
    context: NoteContext,
    options: ToolbarOptions,
) -> Result<Toolbar<WebDom, JsEditor>> {
    let dom = WebDom::new();
    let fonts = CanvasFontCheck::new(dom.document())?;

    let toolbar = Toolbar::new(dom, JsEditor::new(context), container, options, fonts);
    toolbar.initialize()?;

    Ok(toolbar)
}
