/// Query limit: a count plus an optional offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub count: u64,
    pub offset: Option<u64>,
}

impl Limit {
    pub fn new(count: u64) -> Self {
        Self {
            count,
            offset: None,
        }
    }

    pub fn with_offset(count: u64, offset: u64) -> Self {
        Self {
            count,
            offset: Some(offset),
        }
    }
}

impl From<u64> for Limit {
    fn from(count: u64) -> Self {
        Limit::new(count)
    }
}

impl From<(u64, u64)> for Limit {
    fn from((count, offset): (u64, u64)) -> Self {
        Limit::with_offset(count, offset)
    }
}

/// Compile a limit to its AQL payload: `count`, or `offset, count`.
///
/// `LIMIT` is not prepended.
pub fn parse_limit(limit: &Limit) -> String {
    match limit.offset {
        Some(offset) => format!("{offset}, {}", limit.count),
        None => limit.count.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_only() {
        assert_eq!(parse_limit(&Limit::new(10)), "10");
    }

    #[test]
    fn offset_comes_first() {
        assert_eq!(parse_limit(&(10, 5).into()), "5, 10");
        assert_eq!(parse_limit(&Limit::with_offset(3, 0)), "0, 3");
    }
}
