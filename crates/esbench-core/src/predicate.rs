//! Predicate trees: the logical form of a benchmark query.
//!
//! A [`Predicate`] is a pure boolean expression over document fields. It is
//! compiled to the engine's query document by [`crate::query::compile`] and
//! rendered for humans through [`std::fmt::Display`] (the *shape*) and
//! [`Predicate::outline`] (a compact label).

use std::fmt;

/// A literal compared against a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Integer(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Integer(v.into())
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Boolean(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Boolean(v) => write!(f, "{v}"),
            Scalar::Text(v) => write!(f, "{v:?}"),
        }
    }
}

/// One end of a range.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    pub value: Scalar,
    pub inclusive: bool,
}

impl Bound {
    pub fn inclusive(value: impl Into<Scalar>) -> Self {
        Self { value: value.into(), inclusive: true }
    }

    pub fn exclusive(value: impl Into<Scalar>) -> Self {
        Self { value: value.into(), inclusive: false }
    }
}

/// Boolean query condition. Adding a kind means adding a variant here and a
/// match arm in the compiler, parser and renderers.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    MatchAll,
    Equality { field: String, value: Scalar },
    Range { field: String, lower: Option<Bound>, upper: Option<Bound> },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn equals(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Predicate::Equality { field: field.into(), value: value.into() }
    }

    /// Closed range `[lower, upper]`.
    pub fn between(
        field: impl Into<String>,
        lower: impl Into<Scalar>,
        upper: impl Into<Scalar>,
    ) -> Self {
        Predicate::Range {
            field: field.into(),
            lower: Some(Bound::inclusive(lower)),
            upper: Some(Bound::inclusive(upper)),
        }
    }

    /// Half-open range `field >= lower`.
    pub fn at_least(field: impl Into<String>, lower: impl Into<Scalar>) -> Self {
        Predicate::Range { field: field.into(), lower: Some(Bound::inclusive(lower)), upper: None }
    }

    /// Half-open range `field <= upper`.
    pub fn at_most(field: impl Into<String>, upper: impl Into<Scalar>) -> Self {
        Predicate::Range { field: field.into(), lower: None, upper: Some(Bound::inclusive(upper)) }
    }

    pub fn and(clauses: impl IntoIterator<Item = Predicate>) -> Self {
        Predicate::And(clauses.into_iter().collect())
    }

    pub fn or(clauses: impl IntoIterator<Item = Predicate>) -> Self {
        Predicate::Or(clauses.into_iter().collect())
    }

    /// Compact label that spells out the AND/OR nesting.
    ///
    /// Leaves become `match_all`, `term`, `range` (both ends bounded) or
    /// `range_open`; a group becomes `and[N,...]` / `or[N,...]` where `N` is
    /// the number of leaf clauses, followed by the outlines of nested groups.
    ///
    /// ```
    /// use esbench_core::predicate::Predicate;
    ///
    /// let p = Predicate::and([
    ///     Predicate::equals("SEX", 2),
    ///     Predicate::or([Predicate::equals("OBESITY", 1), Predicate::equals("COPD", 1)]),
    /// ]);
    /// assert_eq!(p.outline(), "and[1,or[2]]");
    /// ```
    pub fn outline(&self) -> String {
        match self {
            Predicate::MatchAll => "match_all".to_string(),
            Predicate::Equality { .. } => "term".to_string(),
            Predicate::Range { lower: Some(_), upper: Some(_), .. } => "range".to_string(),
            Predicate::Range { .. } => "range_open".to_string(),
            Predicate::And(clauses) => group_outline("and", clauses),
            Predicate::Or(clauses) => group_outline("or", clauses),
        }
    }

    /// Number of leaf conditions in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Predicate::And(clauses) | Predicate::Or(clauses) => {
                clauses.iter().map(Predicate::leaf_count).sum()
            }
            _ => 1,
        }
    }

    fn is_group(&self) -> bool {
        matches!(self, Predicate::And(_) | Predicate::Or(_))
    }
}

fn group_outline(name: &str, clauses: &[Predicate]) -> String {
    let leaves = clauses.iter().filter(|c| !c.is_group()).count();
    let mut parts = vec![leaves.to_string()];
    parts.extend(clauses.iter().filter(|c| c.is_group()).map(Predicate::outline));
    format!("{name}[{}]", parts.join(","))
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::MatchAll => f.write_str("*"),
            Predicate::Equality { field, value } => write!(f, "{field}={value}"),
            Predicate::Range { field, lower, upper } => match (lower, upper) {
                (Some(lo), Some(hi)) => write!(
                    f,
                    "{field}∈{}{},{}{}",
                    if lo.inclusive { '[' } else { '(' },
                    lo.value,
                    hi.value,
                    if hi.inclusive { ']' } else { ')' },
                ),
                (Some(lo), None) => {
                    write!(f, "{field}{}{}", if lo.inclusive { "≥" } else { ">" }, lo.value)
                }
                (None, Some(hi)) => {
                    write!(f, "{field}{}{}", if hi.inclusive { "≤" } else { "<" }, hi.value)
                }
                (None, None) => write!(f, "{field}∈(-∞,+∞)"),
            },
            Predicate::And(clauses) => write_group(f, "AND", clauses),
            Predicate::Or(clauses) => write_group(f, "OR", clauses),
        }
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, name: &str, clauses: &[Predicate]) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, clause) in clauses.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{clause}")?;
    }
    f.write_str(")")
}
