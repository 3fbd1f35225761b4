use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const HABIT_FIELDS: &[&str] = &["name", "icon", "target"];
pub const DAY_FIELDS: &[&str] = &["comment"];

pub type FieldMap = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalid {
    pub fields: Vec<String>,
}

/// Every field is checked on each call; values are neither trimmed nor converted.
pub fn validate(form: &HashMap<String, String>, required: &[&str]) -> Result<FieldMap, Invalid> {
    let mut values = FieldMap::new();
    let mut invalid = Vec::new();

    for field in required {
        match form.get(*field) {
            Some(value) if !value.is_empty() => {
                values.insert(field.to_string(), value.clone());
            }
            _ => invalid.push(field.to_string()),
        }
    }

    if invalid.is_empty() {
        Ok(values)
    } else {
        Err(Invalid { fields: invalid })
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormView {
    values: HashMap<String, String>,
    invalid: BTreeSet<String>,
}

impl FormView {
    pub fn rejected(values: HashMap<String, String>, invalid: Invalid) -> Self {
        Self {
            values,
            invalid: invalid.fields.into_iter().collect(),
        }
    }

    pub fn is_invalid(&self, field: &str) -> bool {
        self.invalid.contains(field)
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }
}
