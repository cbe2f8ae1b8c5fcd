//! Structured extraction of article pages
//!
//! Maps a parsed page to an `ArticleRecord` through a `FieldSelectorProfile`.
//! Records are all-or-nothing over their required fields: a page that only
//! partially rendered is rejected, never partially recorded.

use crate::article::{ArticleField, ArticleRecord};
use crate::profile::{FieldRule, FieldSelectorProfile};
use crate::state::{PageOutcome, SkipReason};
use scraper::Html;

/// Separator between content nodes
const CONTENT_SEPARATOR: &str = " ";

/// Separator between tags
const TAG_SEPARATOR: &str = ", ";

/// Extracts an article record from raw HTML
///
/// # Arguments
///
/// * `html` - The page body
/// * `profile` - The site's selector profile
///
/// # Returns
///
/// `PageOutcome::Harvested` when every required field resolved to non-empty
/// text, otherwise `PageOutcome::Skipped` naming the first field that did not.
///
/// # Example
///
/// ```
/// use archive_harvest::crawler::extract;
/// use archive_harvest::profile::preset;
///
/// let profile = preset("cmoney").unwrap();
/// let outcome = extract("<html><body></body></html>", &profile);
/// assert!(!outcome.is_harvested());
/// ```
pub fn extract(html: &str, profile: &FieldSelectorProfile) -> PageOutcome {
    let document = Html::parse_document(html);
    match extract_document(&document, profile) {
        Ok(record) => PageOutcome::Harvested(record),
        Err(reason) => PageOutcome::Skipped(reason),
    }
}

/// Extracts an article record from an already parsed document
pub fn extract_document(
    document: &Html,
    profile: &FieldSelectorProfile,
) -> Result<ArticleRecord, SkipReason> {
    let title = single_value(document, ArticleField::Title, &profile.title)?;
    let time = single_value(document, ArticleField::Time, &profile.time)?;
    let author = single_value(document, ArticleField::Author, &profile.author)?;
    let content = content_value(document, profile)?;
    let tags = tags_value(document, profile)?;

    Ok(ArticleRecord {
        title,
        time,
        author,
        content,
        tags,
    })
}

/// Resolves a single-valued field from its first match
fn single_value(
    document: &Html,
    field: ArticleField,
    rule: &FieldRule,
) -> Result<String, SkipReason> {
    let value = rule
        .select_first(document)
        .and_then(|element| rule.value_of(element));

    match value {
        Some(value) => require_non_empty(field, rule, value),
        None if rule.is_required() => Err(SkipReason::MissingField(field)),
        None => Ok(String::new()),
    }
}

/// Joins all content nodes, optionally dropping the trailing one
fn content_value(document: &Html, profile: &FieldSelectorProfile) -> Result<String, SkipReason> {
    let rule = &profile.content;
    let mut parts: Vec<String> = rule
        .select_all(document)
        .into_iter()
        .filter_map(|element| rule.value_of(element))
        .collect();

    if parts.is_empty() {
        return if rule.is_required() {
            Err(SkipReason::MissingField(ArticleField::Content))
        } else {
            Ok(String::new())
        };
    }

    if profile.drop_trailing_content {
        parts.pop();
    }

    require_non_empty(ArticleField::Content, rule, parts.join(CONTENT_SEPARATOR))
}

/// Joins all tag values, falling back to the profile placeholder
fn tags_value(document: &Html, profile: &FieldSelectorProfile) -> Result<String, SkipReason> {
    let rule = &profile.tags;
    let tags: Vec<String> = rule
        .select_all(document)
        .into_iter()
        .filter_map(|element| rule.value_of(element))
        .filter(|tag| !tag.is_empty())
        .collect();

    if !tags.is_empty() {
        return Ok(tags.join(TAG_SEPARATOR));
    }

    if rule.is_required() {
        Err(SkipReason::MissingField(ArticleField::Tags))
    } else {
        Ok(profile.tags_placeholder.clone())
    }
}

fn require_non_empty(
    field: ArticleField,
    rule: &FieldRule,
    value: String,
) -> Result<String, SkipReason> {
    if value.is_empty() && rule.is_required() {
        Err(SkipReason::EmptyField(field))
    } else {
        Ok(value)
    }
}
