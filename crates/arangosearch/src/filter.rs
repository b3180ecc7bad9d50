use crate::error::CompileError;
use crate::value::{format_data, Data};
use serde_json::Value as Json;
use std::fmt;
use std::str::FromStr;

/// Search operators and their AQL equivalents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Gt,
    Gte,
    In,
    Like,
    Lt,
    Lte,
    Neq,
    Nin,
    Nlike,
    Nreg,
    Reg,
}

impl Operator {
    /// Every operator, in operator-table order.
    pub const ALL: [Operator; 12] = [
        Operator::Eq,
        Operator::Gt,
        Operator::Gte,
        Operator::In,
        Operator::Like,
        Operator::Lt,
        Operator::Lte,
        Operator::Neq,
        Operator::Nin,
        Operator::Nlike,
        Operator::Nreg,
        Operator::Reg,
    ];

    /// The search key, e.g. `gte`.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::In => "in",
            Operator::Like => "like",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Neq => "neq",
            Operator::Nin => "nin",
            Operator::Nlike => "nlike",
            Operator::Nreg => "nreg",
            Operator::Reg => "reg",
        }
    }

    /// The AQL operator, e.g. `>=`.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::In => "IN",
            Operator::Like => "LIKE",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Neq => "!=",
            Operator::Nin => "NOT IN",
            Operator::Nlike => "NOT LIKE",
            Operator::Nreg => "!~",
            Operator::Reg => "=~",
        }
    }

    pub fn is_operator(name: &str) -> bool {
        Operator::ALL.iter().any(|op| op.name() == name)
    }
}

impl FromStr for Operator {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| CompileError::UnrecognizedOperator(s.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Search operator names.
pub fn operators() -> Vec<&'static str> {
    Operator::ALL.iter().map(Operator::name).collect()
}

/// Map of search operator names to AQL equivalents.
pub fn operator_map() -> Vec<(&'static str, &'static str)> {
    Operator::ALL
        .iter()
        .map(|op| (op.name(), op.symbol()))
        .collect()
}

/// How the conditions of one filter are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    And,
    Or,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::And => "AND",
            Mode::Or => "OR",
        }
    }
}

impl FromStr for Mode {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AND" => Ok(Mode::And),
            "OR" => Ok(Mode::Or),
            other => Err(CompileError::InvalidMode(other.to_string())),
        }
    }
}

/// Any number of conditions on a single parameter.
///
/// Conditions keep insertion order. A condition whose data is `None` is
/// ignored at compile time, so a filter holding nothing but `None`s compiles
/// to the empty string.
///
/// `LIKE`, `NOT LIKE` and the regex operators are only meaningful for string
/// fields; that is not checked here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(Operator, Option<Data>)>,
    mode: Mode,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition keyed by operator name.
    ///
    /// Fails with [`CompileError::UnrecognizedOperator`] if `key` is not a
    /// known operator.
    pub fn condition(mut self, key: &str, data: Option<Data>) -> Result<Self, CompileError> {
        let op: Operator = key.parse()?;
        self.conditions.push((op, data));
        Ok(self)
    }

    /// Add a condition with a typed operator.
    pub fn with(mut self, op: Operator, data: impl Into<Data>) -> Self {
        self.conditions.push((op, Some(data.into())));
        self
    }

    /// Add a condition that is present but undefined.
    pub fn undefined(mut self, op: Operator) -> Self {
        self.conditions.push((op, None));
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn eq(self, v: impl Into<Data>) -> Self {
        self.with(Operator::Eq, v)
    }

    pub fn neq(self, v: impl Into<Data>) -> Self {
        self.with(Operator::Neq, v)
    }

    pub fn gt(self, v: impl Into<Data>) -> Self {
        self.with(Operator::Gt, v)
    }

    pub fn gte(self, v: impl Into<Data>) -> Self {
        self.with(Operator::Gte, v)
    }

    pub fn lt(self, v: impl Into<Data>) -> Self {
        self.with(Operator::Lt, v)
    }

    pub fn lte(self, v: impl Into<Data>) -> Self {
        self.with(Operator::Lte, v)
    }

    pub fn in_(self, v: impl Into<Data>) -> Self {
        self.with(Operator::In, v)
    }

    pub fn nin(self, v: impl Into<Data>) -> Self {
        self.with(Operator::Nin, v)
    }

    pub fn like(self, v: impl Into<Data>) -> Self {
        self.with(Operator::Like, v)
    }

    pub fn nlike(self, v: impl Into<Data>) -> Self {
        self.with(Operator::Nlike, v)
    }

    pub fn reg(self, v: impl Into<Data>) -> Self {
        self.with(Operator::Reg, v)
    }

    pub fn nreg(self, v: impl Into<Data>) -> Self {
        self.with(Operator::Nreg, v)
    }

    pub fn get_mode(&self) -> Mode {
        self.mode
    }

    pub fn conditions(&self) -> &[(Operator, Option<Data>)] {
        &self.conditions
    }

    /// Decode an operator-keyed JSON object, e.g. `{ "gt": 5, "mode": "OR" }`.
    ///
    /// Every key except `mode` must be an operator name.
    pub fn from_json(value: &Json) -> Result<Self, CompileError> {
        let obj = value
            .as_object()
            .ok_or_else(|| CompileError::invalid_terms(format!("filter must be an object, got {value}")))?;

        let mut filter = Filter::new();
        for (key, v) in obj {
            if key == "mode" {
                let mode = v
                    .as_str()
                    .ok_or_else(|| CompileError::InvalidMode(v.to_string()))?;
                filter.mode = mode.parse()?;
                continue;
            }
            let op: Operator = key.parse()?;
            filter.conditions.push((op, Some(Data::from_json(v)?)));
        }
        Ok(filter)
    }
}

/// Compile a filter into one AQL boolean expression over `param`.
///
/// `FILTER` is not prepended. Conditions are joined with the filter's mode.
pub fn parse_filter(param: &str, filter: &Filter) -> String {
    filter
        .conditions
        .iter()
        .filter_map(|(op, data)| {
            data.as_ref()
                .map(|d| format!("{param} {} {}", op.symbol(), format_data(d)))
        })
        .collect::<Vec<_>>()
        .join(&format!(" {} ", filter.mode.as_str()))
}
