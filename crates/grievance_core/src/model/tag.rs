//! Keyword and Person records attached to Files.

use serde::Serialize;

/// Row of `tbl_keyword`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keyword {
    pub id: i64,
    pub keyword: String,
}

/// Which association table an attach/detach operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    Keyword,
    Person,
}

impl TagKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Person => "person",
        }
    }
}
