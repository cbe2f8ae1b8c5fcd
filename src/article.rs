//! Article identifiers and extracted records

use std::fmt;

/// Numeric article address assigned by the source site
pub type ArticleId = u64;

/// The five output fields of an article, in column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArticleField {
    Title,
    Time,
    Author,
    Content,
    Tags,
}

impl ArticleField {
    /// All fields in output column order
    pub const ALL: [ArticleField; 5] = [
        Self::Title,
        Self::Time,
        Self::Author,
        Self::Content,
        Self::Tags,
    ];

    /// Returns the field name used in config files and table headers
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Time => "time",
            Self::Author => "author",
            Self::Content => "content",
            Self::Tags => "tags",
        }
    }
}

impl fmt::Display for ArticleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One harvested article
///
/// Built by the extractor only when every required field resolved. Values are
/// whitespace-trimmed but otherwise kept as the parser produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub title: String,
    pub time: String,
    pub author: String,
    pub content: String,
    pub tags: String,
}

impl ArticleRecord {
    /// Returns the fields as a row in output column order
    pub fn as_row(&self) -> [&str; 5] {
        [
            &self.title,
            &self.time,
            &self.author,
            &self.content,
            &self.tags,
        ]
    }
}
