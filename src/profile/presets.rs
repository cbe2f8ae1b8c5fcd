//! Built-in selector profiles for known archive sites

use crate::article::ArticleField;
use crate::profile::{FieldRule, FieldSelectorProfile};
use crate::ConfigError;

/// Names accepted by [`preset`]
pub const PRESET_NAMES: [&str; 2] = ["cnyes", "cmoney"];

/// Returns the built-in profile with the given name
pub fn preset(name: &str) -> Result<FieldSelectorProfile, ConfigError> {
    match name {
        "cnyes" => cnyes(),
        "cmoney" => cmoney(),
        other => Err(ConfigError::UnknownPreset(other.to_string())),
    }
}

/// news.cnyes.com article pages (`/news/id/{id}`)
///
/// Content is a single block, so nothing is dropped. Pages without tags get
/// the literal `None`.
fn cnyes() -> Result<FieldSelectorProfile, ConfigError> {
    const MAIN: &str = "#content > div > div > div._2hZZ.theme-app.theme-newsdetail > main";

    let at = |tail: &str| format!("{} > {}", MAIN, tail);

    Ok(FieldSelectorProfile {
        name: "cnyes".to_string(),
        title: FieldRule::new(ArticleField::Title, &[at("div._uo1n._2l9x > h1")], true, None)?,
        time: FieldRule::new(
            ArticleField::Time,
            &[at("div._uo1n._2l9x > div._1R6L > time")],
            true,
            None,
        )?,
        author: FieldRule::new(
            ArticleField::Author,
            &[at("div._uo1n._2l9x > div._1R6L > span > span")],
            true,
            None,
        )?,
        content: FieldRule::new(
            ArticleField::Content,
            &[at("div._1S0A > article > section._82F6 > div._1UuP > div:nth-child(1)")],
            true,
            None,
        )?,
        tags: FieldRule::new(
            ArticleField::Tags,
            &[at("div._1S0A > article > section._82F6 > nav > a")],
            false,
            None,
        )?,
        drop_trailing_content: false,
        tags_placeholder: "None".to_string(),
    })
}

/// www.cmoney.tw note pages (`/notes/note-detail.aspx?nid={id}`)
///
/// The last paragraph of every note is a disclaimer and is dropped. Tags are
/// read from the `title` attribute of the tag links.
fn cmoney() -> Result<FieldSelectorProfile, ConfigError> {
    const ARTICLE: &str = "body > div.cm-blackbar > div.cm-blackbar__body > div.wrap \
         > div:nth-child(3) > div.p-out-left > div.p-article.p-article__ui";

    let at = |tail: &str| format!("{} > {}", ARTICLE, tail);

    Ok(FieldSelectorProfile {
        name: "cmoney".to_string(),
        title: FieldRule::new(
            ArticleField::Title,
            &[at("div.pt-bar.pt-bar__ui > div.pt-bar-title.pt-bar-title__ui > h1")],
            true,
            None,
        )?,
        time: FieldRule::new(
            ArticleField::Time,
            &[at("div.pt-bar.pt-bar__ui > div.pt__meta.pt__meta__ui > ul > li.pt__li.pt__li--publish")],
            true,
            None,
        )?,
        author: FieldRule::new(
            ArticleField::Author,
            &[at("div.rec-content.articleBody__font > div.status-msg-wrap > div > div > a > h1 > span")],
            true,
            None,
        )?,
        content: FieldRule::new(
            ArticleField::Content,
            &[at("div.rec-content.articleBody__font > p")],
            true,
            None,
        )?,
        tags: FieldRule::new(
            ArticleField::Tags,
            &[at("div.rec-content.articleBody__font li > a")],
            false,
            Some("title"),
        )?,
        drop_trailing_content: true,
        tags_placeholder: String::new(),
    })
}
