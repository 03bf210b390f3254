use bitflags::bitflags;
use serde::Deserialize;

use crate::options::canonical_value;

bitflags! {
    pub struct TextStyle: u8 {
        const BOLD = 0b0000_0001;
        const ITALIC = 0b0000_0010;
        const UNDERLINE = 0b0000_0100;
    }
}

impl TextStyle {
    /// Selector of the toolbar button reflecting this style. None unless exactly one flag is set.
    pub fn button_selector(self) -> Option<&'static str> {
        match self {
            Self::BOLD => Some(".note-btn-bold"),
            Self::ITALIC => Some(".note-btn-italic"),
            Self::UNDERLINE => Some(".note-btn-underline"),
            _ => None,
        }
    }

    pub fn singles() -> [Self; 3] {
        [Self::BOLD, Self::ITALIC, Self::UNDERLINE]
    }
}

/// The style at the current selection, as reported by the editor.
///
/// Every field is optional. Empty strings are treated the same as missing fields.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct StyleInfo {
    #[serde(rename = "font-bold", default)]
    pub font_bold: Option<String>,
    #[serde(rename = "font-italic", default)]
    pub font_italic: Option<String>,
    #[serde(rename = "font-underline", default)]
    pub font_underline: Option<String>,
    #[serde(rename = "font-family", default)]
    pub font_family: Option<String>,
    #[serde(rename = "font-size", default, deserialize_with = "canonical_value")]
    pub font_size: Option<String>,
    #[serde(rename = "line-height", default, deserialize_with = "canonical_value")]
    pub line_height: Option<String>,
}

impl StyleInfo {
    pub fn text_style(&self) -> TextStyle {
        let mut style = TextStyle::empty();

        style.set(TextStyle::BOLD, self.font_bold.as_deref() == Some("bold"));
        style.set(TextStyle::ITALIC, self.font_italic.as_deref() == Some("italic"));
        style.set(
            TextStyle::UNDERLINE,
            self.font_underline.as_deref() == Some("underline"),
        );

        style
    }

    pub fn font_family(&self) -> Option<&str> {
        non_empty(&self.font_family)
    }

    pub fn font_size(&self) -> Option<&str> {
        non_empty(&self.font_size)
    }

    pub fn line_height(&self) -> Option<&str> {
        non_empty(&self.line_height)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Splits a CSS `font-family` value into bare family names.
///
/// `Arial, "Courier New" , Tahoma` yields `Arial`, `Courier New`, `Tahoma`.
pub fn font_family_candidates(value: &str) -> impl Iterator<Item = String> + '_ {
    value.split(',').map(|name| {
        name.chars()
            .filter(|c| !matches!(c, '\'' | '"'))
            .collect::<String>()
            .trim()
            .to_string()
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_snapshot_fields() {
        let style: StyleInfo = serde_json::from_value(json!({
            "font-bold": "bold",
            "font-italic": "normal",
            "font-underline": "underline",
            "font-family": "Arial",
            "font-size": 14,
            "line-height": "1.5",
            "list-style": "none",
        }))
        .unwrap();

        assert_eq!(style.text_style(), TextStyle::BOLD | TextStyle::UNDERLINE);
        assert_eq!(style.font_family(), Some("Arial"));
        assert_eq!(style.font_size(), Some("14"));
        assert_eq!(style.line_height(), Some("1.5"));
    }

    #[test]
    fn missing_and_empty_fields_are_absent() {
        let style: StyleInfo = serde_json::from_value(json!({
            "font-family": "",
            "font-size": null,
        }))
        .unwrap();

        assert_eq!(style.text_style(), TextStyle::empty());
        assert_eq!(style.font_family(), None);
        assert_eq!(style.font_size(), None);
        assert_eq!(style.line_height(), None);
    }

    #[test]
    fn splits_family_candidates() {
        let names: Vec<_> =
            font_family_candidates("Arial, \"Courier New\" , 'Tahoma'").collect();

        assert_eq!(names, vec!["Arial", "Courier New", "Tahoma"]);
    }

    #[test]
    fn button_selectors() {
        let selectors: Vec<_> = TextStyle::singles()
            .into_iter()
            .filter_map(TextStyle::button_selector)
            .collect();

        assert_eq!(
            selectors,
            vec![".note-btn-bold", ".note-btn-italic", ".note-btn-underline"]
        );
    }

    #[test]
    fn combined_or_empty_styles_have_no_button() {
        assert_eq!((TextStyle::BOLD | TextStyle::ITALIC).button_selector(), None);
        assert_eq!(TextStyle::all().button_selector(), None);
        assert_eq!(TextStyle::empty().button_selector(), None);
    }

    #[test]
    fn whole_float_sizes_drop_the_fraction() {
        let style: StyleInfo = serde_json::from_value(json!({
            "font-size": 14.0,
            "line-height": 1.5,
        }))
        .unwrap();

        assert_eq!(style.font_size(), Some("14"));
        assert_eq!(style.line_height(), Some("1.5"));
    }
}
