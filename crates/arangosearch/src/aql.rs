//! Minimal AQL template builder.
//!
//! A query is assembled from three kinds of parts which are never merged:
//! - trusted literal text, spliced verbatim,
//! - values, bound as `@valueN` and escaped by the server,
//! - collection references, bound as `@@valueN`.
//!
//! Only literal parts can change the shape of a query. Anything coming from a
//! caller as data goes through [`Aql::value`].

use serde::Serialize;
use serde_json::{Map, Value as Json};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
enum Part {
    Literal(String),
    Value(Json),
    Collection(String),
}

/// An ordered AQL fragment. Fragments can be nested with [`Aql::append`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aql {
    parts: Vec<Part>,
}

impl Aql {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trusted query text. Empty or whitespace-only text is dropped.
    pub fn literal(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.trim().is_empty() {
            self.parts.push(Part::Literal(text.trim().to_string()));
        }
        self
    }

    /// A bind value. Never spliced into the query text.
    pub fn value(mut self, value: impl Into<Json>) -> Self {
        self.parts.push(Part::Value(value.into()));
        self
    }

    /// A collection reference, bound as a collection parameter.
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.parts.push(Part::Collection(name.into()));
        self
    }

    /// Splice another fragment, keeping its parts (and their kinds) intact.
    pub fn append(mut self, other: Aql) -> Self {
        self.parts.extend(other.parts);
        self
    }

    /// Splice an optional fragment; `None` adds nothing.
    pub fn append_opt(self, other: Option<&Aql>) -> Self {
        match other {
            Some(fragment) => self.append(fragment.clone()),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Render the fragment into query text plus bind variables.
    pub fn build(&self) -> AqlQuery {
        let mut words: Vec<String> = Vec::with_capacity(self.parts.len());
        let mut bind_vars = Map::new();

        for part in &self.parts {
            match part {
                Part::Literal(text) => words.push(text.clone()),
                Part::Value(v) => {
                    let name = format!("value{}", bind_vars.len());
                    words.push(format!("@{name}"));
                    bind_vars.insert(name, v.clone());
                }
                Part::Collection(c) => {
                    let name = format!("value{}", bind_vars.len());
                    words.push(format!("@@{name}"));
                    bind_vars.insert(format!("@{name}"), Json::String(c.clone()));
                }
            }
        }

        AqlQuery {
            query: words.join(" "),
            bind_vars,
        }
    }
}

/// A fully assembled query, in the shape the cursor API accepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AqlQuery {
    pub query: String,
    pub bind_vars: Map<String, Json>,
}

impl fmt::Display for AqlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query)
    }
}
