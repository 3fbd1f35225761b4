use crate::progress::Progress;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Icons offered by the add-habit popup, paired with the glyph shown in the menu.
pub const ICON_PALETTE: &[(&str, &str)] = &[
    ("sport", "🏋"),
    ("water", "💧"),
    ("food", "🥗"),
    ("book", "📚"),
    ("sleep", "😴"),
];

pub fn icon_glyph(icon: &str) -> Option<&'static str> {
    ICON_PALETTE
        .iter()
        .find(|(name, _)| *name == icon)
        .map(|(_, glyph)| *glyph)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub comment: String,
}

/// Habit goal, kept exactly as it was entered: form posts store text, JSON
/// clients may send a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Number(serde_json::Number),
    Text(String),
}

impl Target {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Target::Number(number) => number.as_f64(),
            Target::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Number(number) => write!(f, "{number}"),
            Target::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: u64,
    pub name: String,
    pub icon: String,
    pub target: Target,
    #[serde(default)]
    pub days: Vec<Day>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewHabitRequest {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub target: Option<Target>,
}

impl NewHabitRequest {
    pub fn to_form(&self) -> HashMap<String, String> {
        let mut form = HashMap::new();
        if let Some(name) = &self.name {
            form.insert("name".to_string(), name.clone());
        }
        if let Some(icon) = &self.icon {
            form.insert("icon".to_string(), icon.clone());
        }
        if let Some(target) = &self.target {
            form.insert("target".to_string(), target.to_string());
        }
        form
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NewDayRequest {
    pub comment: Option<String>,
}

impl NewDayRequest {
    pub fn to_form(&self) -> HashMap<String, String> {
        self.comment
            .iter()
            .map(|comment| ("comment".to_string(), comment.clone()))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct RestoreQuery {
    pub fragment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StateResponse {
    pub active_id: Option<u64>,
    pub habits: Vec<Habit>,
    pub progress: Option<Progress>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvalidFieldsResponse {
    pub invalid: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn habit_json_matches_stored_layout() {
        let raw = r#"[{"id":3,"name":"Run","icon":"sport","target":"10","days":[{"comment":"5k"}]},
                      {"id":4,"name":"Drink","icon":"water","target":8,"days":[]}]"#;
        let habits: Vec<Habit> = serde_json::from_str(raw).unwrap();

        assert_eq!(habits[0].target, Target::Text("10".into()));
        assert_eq!(habits[0].days, vec![Day { comment: "5k".into() }]);
        assert_eq!(habits[1].target.as_f64(), Some(8.0));

        let written = serde_json::to_value(&habits).unwrap();
        assert_eq!(written, serde_json::from_str::<serde_json::Value>(raw).unwrap());
    }

    #[test]
    fn target_text_parses_loosely() {
        assert_eq!(Target::Text(" 4 ".into()).as_f64(), Some(4.0));
        assert_eq!(Target::Text("lots".into()).as_f64(), None);
    }

    #[test]
    fn unknown_icon_has_no_glyph() {
        assert_eq!(icon_glyph("water"), Some("💧"));
        assert_eq!(icon_glyph("rocket"), None);
    }

    #[test]
    fn habit_request_form_skips_missing_fields() {
        let request = NewHabitRequest {
            name: Some("Read".into()),
            icon: None,
            target: Some(Target::Number(12.into())),
        };
        let form = request.to_form();
        assert_eq!(form.get("name").map(String::as_str), Some("Read"));
        assert_eq!(form.get("target").map(String::as_str), Some("12"));
        assert!(!form.contains_key("icon"));
    }
}
