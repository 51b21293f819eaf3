//! Workout templates and the template catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key of a workout template, e.g. `upper1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateKey(String);

impl TemplateKey {
    /// Creates a key, trimming surrounding whitespace.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self(key.trim().to_string())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Folds a label for comparison: lowercase, with whitespace,
    /// underscores and dashes removed. `"Upper 1"`, `"UPPER1"` and
    /// `"upper_1"` all fold to `"upper1"`.
    pub fn fold_label(label: &str) -> String {
        label
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect()
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TemplateKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TemplateKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for TemplateKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A named, ordered list of exercises defining a workout's structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub key: TemplateKey,
    pub name: String,
    pub exercises: Vec<String>,
}

impl Template {
    pub fn new(
        key: impl Into<TemplateKey>,
        name: impl Into<String>,
        exercises: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            exercises: exercises.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if the template lists the exercise.
    pub fn contains(&self, exercise: &str) -> bool {
        self.exercises.iter().any(|e| e == exercise)
    }
}

/// The set of known templates, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    /// Creates a catalog. A later template with a duplicate key replaces
    /// the earlier one in place.
    pub fn new(templates: impl IntoIterator<Item = Template>) -> Self {
        let mut catalog = Self::default();
        for template in templates {
            catalog.insert(template);
        }
        catalog
    }

    /// The four-day upper/lower split shipped with the app.
    pub fn builtin() -> Self {
        Self::new([
            Template::new(
                "upper1",
                "Upper 1",
                [
                    "Pec dec fly",
                    "DB Incline bench press",
                    "DB lateral raises",
                    "Lat pulldown (Moderate load)",
                    "Flat bar cable curls",
                    "Tricep pushdowns",
                ],
            ),
            Template::new(
                "upper2",
                "Upper 2",
                [
                    "Hamstring curls lying",
                    "Hip Thrust machine",
                    "DB Deadlifts",
                    "Walking lunges bodyweight",
                    "Calf raises seated",
                    "Reverse Crunches",
                ],
            ),
            Template::new(
                "lower1",
                "Lower 1",
                [
                    "Flat bench press DB",
                    "DB Seated shoulder press",
                    "Pronated rows seated",
                    "Rope pullovers",
                    "Bicep hammer curls DB",
                    "Tricep pushdowns",
                ],
            ),
            Template::new(
                "lower2",
                "Lower 2",
                [
                    "Adductors Machine",
                    "Abductors Machine",
                    "Leg extensions",
                    "Lying leg curls",
                    "Walking lunges",
                    "Reverse crunches",
                ],
            ),
        ])
    }

    /// Adds or replaces a template.
    pub fn insert(&mut self, template: Template) {
        match self.templates.iter_mut().find(|t| t.key == template.key) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }

    /// Looks up a template by exact key.
    pub fn get(&self, key: &TemplateKey) -> Option<&Template> {
        self.templates.iter().find(|t| &t.key == key)
    }

    /// Resolves a free-form label (a key or a display name) to a template,
    /// ignoring case, spacing, underscores and dashes.
    pub fn resolve_label(&self, label: &str) -> Option<&Template> {
        let folded = TemplateKey::fold_label(label);
        if folded.is_empty() {
            return None;
        }
        self.templates.iter().find(|t| {
            TemplateKey::fold_label(t.key.as_str()) == folded
                || TemplateKey::fold_label(&t.name) == folded
        })
    }

    /// Returns all template keys in display order.
    pub fn keys(&self) -> impl Iterator<Item = &TemplateKey> {
        self.templates.iter().map(|t| &t.key)
    }

    /// Returns all templates in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
