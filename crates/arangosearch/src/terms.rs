use crate::error::CompileError;
use crate::filter::{parse_filter, Filter, Operator};
use serde_json::Value as Json;

/// What to match on one field: a filter on the field itself, or a
/// group of terms on the fields of a nested object.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Filter(Filter),
    Group(Terms),
}

/// Search terms keyed by field name, in declaration order.
///
/// A field whose term is `None` is skipped entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Terms {
    fields: Vec<(String, Option<Term>)>,
}

impl Terms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: impl Into<String>, filter: Filter) -> Self {
        self.fields.push((field.into(), Some(Term::Filter(filter))));
        self
    }

    pub fn group(mut self, field: impl Into<String>, terms: Terms) -> Self {
        self.fields.push((field.into(), Some(Term::Group(terms))));
        self
    }

    /// Declare a field without a term. It produces no predicate.
    pub fn skip(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), None));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[(String, Option<Term>)] {
        &self.fields
    }

    /// Decode terms from a JSON object.
    ///
    /// Each field value is classified by its keys: if any key other than
    /// `mode` is not an operator name the value is a nested group, otherwise
    /// it is a filter. Falsy values (`null`, `false`, `0`, `""`) are skipped.
    pub fn from_json(value: &Json) -> Result<Self, CompileError> {
        let obj = value.as_object().ok_or_else(|| {
            CompileError::invalid_terms(format!("terms must be an object, got {value}"))
        })?;

        let mut terms = Terms::new();
        for (field, v) in obj {
            if is_falsy(v) {
                terms.fields.push((field.clone(), None));
                continue;
            }
            let nested = v.as_object().ok_or_else(|| {
                CompileError::invalid_terms(format!("field `{field}` must be an object, got {v}"))
            })?;
            let is_group = nested
                .keys()
                .any(|k| k != "mode" && !Operator::is_operator(k));
            let term = if is_group {
                Term::Group(Terms::from_json(v)?)
            } else {
                Term::Filter(Filter::from_json(v)?)
            };
            terms.fields.push((field.clone(), Some(term)));
        }
        Ok(terms)
    }
}

fn is_falsy(v: &Json) -> bool {
    match v {
        Json::Null => true,
        Json::Bool(b) => !b,
        Json::Number(n) => n.as_f64() == Some(0.0),
        Json::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Compile search terms into a flat list of AQL predicates.
///
/// `parent` names the current document and prefixes every parameter. Nested
/// groups are walked depth-first; their predicates appear where the group was
/// declared. Filters that compile to nothing are dropped. `FILTER` is not
/// prepended.
pub fn parse_terms(terms: &Terms, parent: &str) -> Vec<String> {
    let mut out = Vec::new();
    collect_terms(terms, parent, &mut out);
    out
}

fn collect_terms(terms: &Terms, parent: &str, out: &mut Vec<String>) {
    for (field, term) in &terms.fields {
        let param = format!("{parent}.{field}");
        match term {
            None => {}
            Some(Term::Group(nested)) => collect_terms(nested, &param, out),
            Some(Term::Filter(filter)) => {
                let expr = parse_filter(&param, filter);
                if !expr.is_empty() {
                    out.push(expr);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Mode;
    use serde_json::json;

    #[test]
    fn empty_terms_yield_nothing() {
        assert!(parse_terms(&Terms::new(), "i").is_empty());
        assert!(parse_terms(&Terms::new(), "doc.sub").is_empty());
    }

    #[test]
    fn single_filter() {
        let t = Terms::new().filter("age", Filter::new().gt(5));
        assert_eq!(parse_terms(&t, "i"), vec!["i.age > 5"]);
    }

    #[test]
    fn nested_groups_extend_the_parent() {
        let t = Terms::new().group("address", Terms::new().filter("city", Filter::new().eq("Rome")));
        assert_eq!(parse_terms(&t, "i"), vec!["i.address.city == \"Rome\""]);
    }

    #[test]
    fn order_is_depth_first_in_declaration_order() {
        let t = Terms::new()
            .filter("name", Filter::new().like("G%"))
            .group(
                "owner",
                Terms::new()
                    .filter("age", Filter::new().gte(18))
                    .group("home", Terms::new().filter("city", Filter::new().neq("Oslo"))),
            )
            .skip("species")
            .filter("age", Filter::new().lt(3).gt(10).mode(Mode::Or));

        assert_eq!(
            parse_terms(&t, "i"),
            vec![
                "i.name LIKE \"G%\"",
                "i.owner.age >= 18",
                "i.owner.home.city != \"Oslo\"",
                "i.age < 3 OR i.age > 10",
            ]
        );
    }

    #[test]
    fn empty_filters_emit_no_predicate() {
        let t = Terms::new()
            .filter("age", Filter::new())
            .filter("name", Filter::new().undefined(Operator::Eq));
        assert!(parse_terms(&t, "i").is_empty());
    }

    #[test]
    fn json_terms_are_classified_by_their_keys() {
        let t = Terms::from_json(&json!({
            "age": { "gt": 5 },
            "address": { "city": { "eq": "Rome" } },
            "tags": { "in": ["a"], "mode": "OR" }
        }))
        .unwrap();

        assert_eq!(
            parse_terms(&t, "i"),
            vec!["i.age > 5", "i.address.city == \"Rome\"", "i.tags IN [\"a\"]"]
        );
    }

    #[test]
    fn json_group_mixing_operators_and_fields_recurses() {
        // `eq` next to a non-operator key makes the whole object a group
        let t = Terms::from_json(&json!({ "meta": { "eq": { "gt": 1 }, "rank": { "lt": 4 } } })).unwrap();
        assert_eq!(parse_terms(&t, "i"), vec!["i.meta.eq > 1", "i.meta.rank < 4"]);
    }

    #[test]
    fn json_falsy_values_are_skipped() {
        let t = Terms::from_json(&json!({
            "a": null, "b": false, "c": 0, "d": "", "e": { "eq": 1 }
        }))
        .unwrap();
        assert_eq!(t.fields().len(), 5);
        assert_eq!(parse_terms(&t, "i"), vec!["i.e == 1"]);
    }

    #[test]
    fn json_non_object_terms_are_rejected() {
        assert!(matches!(
            Terms::from_json(&json!([1])),
            Err(CompileError::InvalidTerms(_))
        ));
        assert!(matches!(
            Terms::from_json(&json!({ "age": 5 })),
            Err(CompileError::InvalidTerms(_))
        ));
    }
}
