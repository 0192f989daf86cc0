//! Report template sets.
//!
//! A template set is a YAML file of named handlebars templates. The default
//! set is compiled into the crate; a file on disk can replace it.

use crate::ItineraryError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

const EMBEDDED_TEMPLATES: &str = include_str!("../templates/itinerary.yaml");

/// Top-level template file
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateSet {
    pub version: String,
    pub templates: BTreeMap<String, TemplateDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateDef {
    #[serde(default)]
    pub description: String,
    pub template: String,
}

impl TemplateSet {
    /// The set shipped with the crate
    pub fn embedded() -> Result<Self, ItineraryError> {
        Self::from_yaml(EMBEDDED_TEMPLATES)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ItineraryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ItineraryError::Template(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ItineraryError> {
        serde_yaml::from_str(yaml).map_err(|e| ItineraryError::Template(e.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&TemplateDef> {
        self.templates.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_set_parses() {
        let set = TemplateSet::embedded().unwrap();
        assert!(set.get("trip_report").is_some());
        assert!(set.get("day").is_some());
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
version: "1.0"
templates:
  greeting:
    template: "Hello {{region}}"
"#;
        let set = TemplateSet::from_yaml(yaml).unwrap();
        assert_eq!(set.names(), vec!["greeting"]);
        assert_eq!(set.get("greeting").unwrap().description, "");
    }

    #[test]
    fn test_bad_yaml() {
        assert!(matches!(
            TemplateSet::from_yaml("templates: [1, 2"),
            Err(ItineraryError::Template(_))
        ));
    }
}
