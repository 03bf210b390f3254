use std::collections::HashSet;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::{Error, Result};

/// Answers whether a font family is available for rendering.
pub trait FontCheck {
    fn is_font_installed(&self, name: &str) -> bool;
}

impl<F: Fn(&str) -> bool> FontCheck for F {
    fn is_font_installed(&self, name: &str) -> bool {
        self(name)
    }
}

/// A fixed set of known fonts.
#[derive(Debug, Clone, Default)]
pub struct InstalledFonts(HashSet<String>);

impl InstalledFonts {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }
}

impl FontCheck for InstalledFonts {
    fn is_font_installed(&self, name: &str) -> bool {
        self.0.contains(name)
    }
}

/// Detects fonts by measuring text in the browser.
///
/// A family is installed if it renders a sample string at a different width than the
/// fallback family alone.
pub struct CanvasFontCheck {
    context: CanvasRenderingContext2d,
}

impl CanvasFontCheck {
    const SAMPLE: &'static str = "mmmmmmmmmmwwwww";

    pub fn new(document: &Document) -> Result<Self> {
        let canvas: HtmlCanvasElement = document.create_element("canvas")?.unchecked_into();

        let context = canvas
            .get_context("2d")?
            .ok_or(Error::MissingContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| Error::MissingContext)?;

        Ok(Self { context })
    }

    fn measure(&self, font: &str) -> Option<f64> {
        self.context.set_font(font);
        self.context.measure_text(Self::SAMPLE).ok().map(|v| v.width())
    }
}

impl FontCheck for CanvasFontCheck {
    fn is_font_installed(&self, name: &str) -> bool {
        let fallback = if name == "Comic Sans MS" {
            "Courier New"
        } else {
            "Comic Sans MS"
        };

        let original = self.measure(&format!("200px '{fallback}'"));
        let width = self.measure(&format!("200px '{name}', '{fallback}'"));

        match (original, width) {
            (Some(original), Some(width)) => original != width,
            _ => false,
        }
    }
}
