use crate::error::CompileError;
use serde_json::Value as Json;

/// A scalar that can appear on the right-hand side of a filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// Filter operand: one scalar, or a flat list of scalars for `in`/`nin`.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

/// Format scalar or scalar list data as an AQL literal.
///
/// Strings are wrapped in double quotes as-is. No escaping is performed, so a
/// value containing `"` yields malformed AQL; callers sanitize such input.
pub fn format_data(data: &Data) -> String {
    match data {
        Data::Scalar(s) => format_value(s),
        Data::List(items) => {
            let inner: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", inner.join(","))
        }
    }
}

/// Format a single scalar as an AQL literal.
pub fn format_value(value: &Scalar) -> String {
    match value {
        Scalar::String(s) => format!("\"{s}\""),
        Scalar::Null => "null".to_string(),
        Scalar::Bool(b) => b.to_string(),
        Scalar::Int(i) => i.to_string(),
        // f64's Display omits a trailing ".0", matching the AQL number literal
        Scalar::Float(f) => f.to_string(),
    }
}

impl Scalar {
    /// Convert a JSON scalar. Arrays and objects are rejected.
    pub fn from_json(value: &Json) -> Result<Self, CompileError> {
        match value {
            Json::Null => Ok(Scalar::Null),
            Json::Bool(b) => Ok(Scalar::Bool(*b)),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Ok(Scalar::Int(i)),
                None => n.as_f64().map(Scalar::Float).ok_or_else(|| {
                    CompileError::invalid_terms(format!("unrepresentable number {n}"))
                }),
            },
            Json::String(s) => Ok(Scalar::String(s.clone())),
            other => Err(CompileError::invalid_terms(format!(
                "expected a scalar value, got {other}"
            ))),
        }
    }
}

impl Data {
    /// Convert a JSON scalar or a flat JSON array of scalars.
    pub fn from_json(value: &Json) -> Result<Self, CompileError> {
        match value {
            Json::Array(items) => items
                .iter()
                .map(Scalar::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Data::List),
            other => Scalar::from_json(other).map(Data::Scalar),
        }
    }
}

// -------------------- conversions --------------------

macro_rules! impl_scalar_from {
    ($($ty:ty => |$v:ident| $body:expr),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from($v: $ty) -> Self {
                    $body
                }
            }

            impl From<Option<$ty>> for Scalar {
                fn from(v: Option<$ty>) -> Self {
                    v.map(Scalar::from).unwrap_or(Scalar::Null)
                }
            }

            impl From<$ty> for Data {
                fn from(v: $ty) -> Self {
                    Data::Scalar(v.into())
                }
            }

            impl From<Vec<$ty>> for Data {
                fn from(v: Vec<$ty>) -> Self {
                    Data::List(v.into_iter().map(Scalar::from).collect())
                }
            }
        )*
    };
}

impl_scalar_from! {
    &str => |v| Scalar::String(v.to_string()),
    String => |v| Scalar::String(v),
    bool => |v| Scalar::Bool(v),
    i32 => |v| Scalar::Int(v as i64),
    i64 => |v| Scalar::Int(v),
    u32 => |v| Scalar::Int(v as i64),
    f64 => |v| Scalar::Float(v),
}

impl From<Scalar> for Data {
    fn from(v: Scalar) -> Self {
        Data::Scalar(v)
    }
}

impl From<Vec<Scalar>> for Data {
    fn from(v: Vec<Scalar>) -> Self {
        Data::List(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_are_quoted_verbatim() {
        assert_eq!(format_value(&"Rome".into()), "\"Rome\"");
        // no escaping: embedded quotes pass straight through
        assert_eq!(format_value(&"a\"b".into()), "\"a\"b\"");
    }

    #[test]
    fn null_and_other_scalars_use_default_form() {
        assert_eq!(format_value(&Scalar::Null), "null");
        assert_eq!(format_value(&true.into()), "true");
        assert_eq!(format_value(&5.into()), "5");
        assert_eq!(format_value(&1.5.into()), "1.5");
        assert_eq!(format_value(&Scalar::Float(9.0)), "9");
        assert_eq!(format_value(&Scalar::from(None::<i64>)), "null");
    }

    #[test]
    fn lists_are_comma_joined_in_brackets() {
        let d: Data = vec!["cat", "dog"].into();
        assert_eq!(format_data(&d), "[\"cat\",\"dog\"]");

        let mixed = Data::List(vec![Scalar::Int(1), Scalar::Null, Scalar::Bool(false)]);
        assert_eq!(format_data(&mixed), "[1,null,false]");

        assert_eq!(format_data(&Data::List(vec![])), "[]");
    }

    #[test]
    fn json_scalars_and_flat_arrays_convert() {
        assert_eq!(Data::from_json(&json!(3)).unwrap(), Data::Scalar(Scalar::Int(3)));
        assert_eq!(
            Data::from_json(&json!(0.5)).unwrap(),
            Data::Scalar(Scalar::Float(0.5))
        );
        assert_eq!(
            Data::from_json(&json!(["a", null])).unwrap(),
            Data::List(vec!["a".into(), Scalar::Null])
        );
    }

    #[test]
    fn json_nested_structures_are_rejected() {
        assert!(matches!(
            Data::from_json(&json!([[1, 2]])),
            Err(CompileError::InvalidTerms(_))
        ));
        assert!(matches!(
            Data::from_json(&json!({ "a": 1 })),
            Err(CompileError::InvalidTerms(_))
        ));
    }
}
