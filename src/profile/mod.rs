//! Field selector profiles
//!
//! A profile maps each output field to CSS selectors compiled once at startup.
//! Profiles come either from a built-in preset or from `[source.profile.fields]`
//! tables in the config file, and are never mutated afterwards.

mod presets;

pub use presets::{preset, PRESET_NAMES};

use crate::article::ArticleField;
use crate::config::{FieldConfig, ProfileConfig};
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;

/// Compiled rule for one output field
#[derive(Debug, Clone)]
pub struct FieldRule {
    selectors: Vec<Selector>,
    sources: Vec<String>,
    required: bool,
    attribute: Option<String>,
}

impl FieldRule {
    /// Compiles a rule from selector strings
    ///
    /// # Arguments
    ///
    /// * `field` - The field this rule resolves (used in error messages)
    /// * `selectors` - CSS selectors, tried in order
    /// * `required` - Whether a missing match rejects the page
    /// * `attribute` - Attribute to read instead of the element text
    pub fn new<S: AsRef<str>>(
        field: ArticleField,
        selectors: &[S],
        required: bool,
        attribute: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut compiled = Vec::with_capacity(selectors.len());
        let mut sources = Vec::with_capacity(selectors.len());

        for raw in selectors {
            let raw = raw.as_ref();
            let selector = Selector::parse(raw).map_err(|e| ConfigError::InvalidSelector {
                field: field.to_string(),
                message: format!("'{}': {}", raw, e),
            })?;
            compiled.push(selector);
            sources.push(raw.to_string());
        }

        if required && compiled.is_empty() {
            return Err(ConfigError::Validation(format!(
                "required field '{}' has no selectors",
                field
            )));
        }

        Ok(Self {
            selectors: compiled,
            sources,
            required,
            attribute: attribute.map(str::to_string),
        })
    }

    /// Whether a missing match rejects the page
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The selector strings this rule was compiled from
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Returns the matches of the first selector that matches anything
    pub fn select_all<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        for selector in &self.selectors {
            let matches: Vec<_> = document.select(selector).collect();
            if !matches.is_empty() {
                return matches;
            }
        }
        Vec::new()
    }

    /// Returns the first matching element, if any
    pub fn select_first<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        self.selectors
            .iter()
            .find_map(|selector| document.select(selector).next())
    }

    /// Reads the trimmed value of an element: the configured attribute or its text
    ///
    /// Returns `None` when an attribute is configured and the element lacks it.
    pub fn value_of(&self, element: ElementRef<'_>) -> Option<String> {
        match &self.attribute {
            Some(name) => element.value().attr(name).map(|v| v.trim().to_string()),
            None => Some(element.text().collect::<String>().trim().to_string()),
        }
    }
}

/// Immutable per-site mapping from output fields to selector rules
#[derive(Debug, Clone)]
pub struct FieldSelectorProfile {
    pub name: String,
    pub title: FieldRule,
    pub time: FieldRule,
    pub author: FieldRule,
    pub content: FieldRule,
    pub tags: FieldRule,

    /// Drop the last matched content node (footer/disclaimer on some templates)
    pub drop_trailing_content: bool,

    /// Written when optional tags match nothing
    pub tags_placeholder: String,
}

impl FieldSelectorProfile {
    /// Returns the rule for the given field
    pub fn rule(&self, field: ArticleField) -> &FieldRule {
        match field {
            ArticleField::Title => &self.title,
            ArticleField::Time => &self.time,
            ArticleField::Author => &self.author,
            ArticleField::Content => &self.content,
            ArticleField::Tags => &self.tags,
        }
    }

    /// Builds a profile from its config declaration
    ///
    /// Exactly one of `preset` and `fields` must be given. The optional
    /// `drop-trailing-content` and `tags-placeholder` settings override the
    /// preset's (or the custom defaults of `true` and `""`).
    pub fn from_config(config: &ProfileConfig) -> Result<Self, ConfigError> {
        let mut profile = match (&config.preset, &config.fields) {
            (Some(name), None) => preset(name)?,
            (None, Some(fields)) => Self::from_fields(fields)?,
            (Some(_), Some(_)) => {
                return Err(ConfigError::Validation(
                    "profile cannot declare both a preset and custom fields".to_string(),
                ))
            }
            (None, None) => {
                return Err(ConfigError::Validation(
                    "profile must declare either a preset or custom fields".to_string(),
                ))
            }
        };

        if let Some(drop) = config.drop_trailing_content {
            profile.drop_trailing_content = drop;
        }
        if let Some(placeholder) = &config.tags_placeholder {
            profile.tags_placeholder = placeholder.clone();
        }

        Ok(profile)
    }

    fn from_fields(fields: &BTreeMap<String, FieldConfig>) -> Result<Self, ConfigError> {
        if let Some(unknown) = fields
            .keys()
            .find(|key| !ArticleField::ALL.iter().any(|f| f.as_str() == key.as_str()))
        {
            return Err(ConfigError::Validation(format!(
                "unknown profile field '{}'",
                unknown
            )));
        }

        let build = |field: ArticleField| -> Result<FieldRule, ConfigError> {
            match fields.get(field.as_str()) {
                Some(rule) => FieldRule::new(
                    field,
                    &rule.selectors,
                    rule.required,
                    rule.attribute.as_deref(),
                ),
                // Tags are commonly absent from a site template
                None if field == ArticleField::Tags => {
                    FieldRule::new::<&str>(field, &[], false, None)
                }
                None => Err(ConfigError::Validation(format!(
                    "profile is missing field '{}'",
                    field
                ))),
            }
        };

        Ok(Self {
            name: "custom".to_string(),
            title: build(ArticleField::Title)?,
            time: build(ArticleField::Time)?,
            author: build(ArticleField::Author)?,
            content: build(ArticleField::Content)?,
            tags: build(ArticleField::Tags)?,
            drop_trailing_content: true,
            tags_placeholder: String::new(),
        })
    }
}
