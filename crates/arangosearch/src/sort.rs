use serde::{Deserialize, Serialize};
use std::fmt;

/// Query sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a sort orders by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    /// A document attribute, resolved against the document alias.
    Field(String),
    /// Pre-rendered AQL used as-is, e.g. `BM25(i)` or a distance function.
    /// The text is trusted and spliced verbatim.
    Expression(String),
}

/// Query sort order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sort {
    pub field: SortField,
    #[serde(default)]
    pub direction: Direction,
}

impl Sort {
    pub fn field(name: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: SortField::Field(name.into()),
            direction,
        }
    }

    pub fn expression(aql: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: SortField::Expression(aql.into()),
            direction,
        }
    }

    pub fn asc(name: impl Into<String>) -> Self {
        Self::field(name, Direction::Asc)
    }

    pub fn desc(name: impl Into<String>) -> Self {
        Self::field(name, Direction::Desc)
    }

    fn render(&self, parent: &str) -> String {
        match &self.field {
            SortField::Field(name) => format!("{parent}.{name} {}", self.direction),
            SortField::Expression(aql) => format!("{aql} {}", self.direction),
        }
    }
}

impl From<(&str, Direction)> for Sort {
    fn from((name, direction): (&str, Direction)) -> Self {
        Sort::field(name, direction)
    }
}

/// Compile sorts into AQL sort expressions, primary key first.
///
/// `SORT` is not prepended.
pub fn parse_sort(sorts: &[Sort], parent: &str) -> Vec<String> {
    sorts.iter().map(|s| s.render(parent)).collect()
}
