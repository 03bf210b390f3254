use serde::{Deserialize, Deserializer, Serialize};

use crate::Result;

/// Toolbar configuration.
///
/// Deserializes from a partial camelCase JSON object. Any missing key keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolbarOptions {
    /// Block tags offered by the style dropdown.
    pub style_tags: Vec<String>,
    /// Font family candidates. Only installed (or ignore-check) names are offered.
    pub font_names: Vec<String>,
    /// Font names offered without asking whether they're installed.
    pub font_names_ignore_check: Vec<String>,
    #[serde(deserialize_with = "canonical_values")]
    pub font_sizes: Vec<String>,
    #[serde(deserialize_with = "canonical_values")]
    pub line_heights: Vec<String>,
    /// Palette rows.
    pub colors: Vec<Vec<String>>,
}

impl ToolbarOptions {
    pub fn from_json(value: &str) -> Result<Self> {
        Ok(serde_json::from_str(value)?)
    }

    pub fn is_font_ignore_check(&self, name: &str) -> bool {
        self.font_names_ignore_check.iter().any(|v| v == name)
    }
}

impl Default for ToolbarOptions {
    fn default() -> Self {
        fn owned(values: &[&str]) -> Vec<String> {
            values.iter().map(|v| v.to_string()).collect()
        }

        Self {
            style_tags: owned(&["p", "blockquote", "pre", "h1", "h2", "h3", "h4", "h5", "h6"]),
            font_names: owned(&[
                "Arial",
                "Arial Black",
                "Comic Sans MS",
                "Courier New",
                "Helvetica Neue",
                "Helvetica",
                "Impact",
                "Lucida Grande",
                "Tahoma",
                "Times New Roman",
                "Verdana",
            ]),
            font_names_ignore_check: Vec::new(),
            font_sizes: owned(&["8", "9", "10", "11", "12", "14", "18", "24", "36"]),
            line_heights: owned(&["1.0", "1.2", "1.4", "1.5", "1.6", "1.8", "2.0", "3.0"]),
            colors: DEFAULT_COLORS.iter().map(|row| owned(row)).collect(),
        }
    }
}

static DEFAULT_COLORS: [[&str; 8]; 8] = [
    ["#000000", "#424242", "#636363", "#9C9C94", "#CEC6CE", "#EFEFEF", "#F7F7F7", "#FFFFFF"],
    ["#FF0000", "#FF9C00", "#FFFF00", "#00FF00", "#00FFFF", "#0000FF", "#9C00FF", "#FF00FF"],
    ["#F7C6CE", "#FFE7CE", "#FFEFC6", "#D6EFD6", "#CEDEE7", "#CEE7F7", "#D6D6E7", "#E7D6DE"],
    ["#E79C9C", "#FFC69C", "#FFE79C", "#B5D6A5", "#A5C6CE", "#9CC6EF", "#B5A5D6", "#D6A5BD"],
    ["#E76363", "#F7AD6B", "#FFD663", "#94BD7B", "#73A5AD", "#6BADDE", "#8C7BC6", "#C67BA5"],
    ["#CE0000", "#E79439", "#EFC631", "#6BA54A", "#4A7B8C", "#3984C6", "#634AA5", "#A54A7B"],
    ["#9C0000", "#B56308", "#BD9400", "#397B21", "#104A5A", "#085294", "#311873", "#631842"],
    ["#630000", "#7B3900", "#846300", "#295218", "#083139", "#003163", "#21104A", "#4A1031"],
];

/// A value which may arrive as either a JSON string or number.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum CanonicalValue {
    Text(String),
    Number(serde_json::Number),
}

impl From<CanonicalValue> for String {
    fn from(value: CanonicalValue) -> Self {
        match value {
            CanonicalValue::Text(v) => v,
            // Whole floats print like integers, `14.0` becomes `14`.
            CanonicalValue::Number(v) => match v.as_f64() {
                Some(f) if v.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                    format!("{}", f as i64)
                }
                _ => v.to_string(),
            },
        }
    }
}

fn canonical_values<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let values = Vec::<CanonicalValue>::deserialize(deserializer)?;

    Ok(values.into_iter().map(String::from).collect())
}

pub(crate) fn canonical_value<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<CanonicalValue>::deserialize(deserializer)?.map(String::from))
}
