//! Query suite: the ordered battery of queries a run executes.

use crate::predicate::Predicate;
use thiserror::Error;

/// Field names of the COVID-19 patient dataset the canonical suite targets.
pub mod fields {
    pub const SEX: &str = "SEX";
    pub const AGE: &str = "AGE";
    pub const CLASSIFICATION: &str = "CLASIFFICATION_FINAL";
    pub const DIABETES: &str = "DIABETES";
    pub const CARDIOVASCULAR: &str = "CARDIOVASCULAR";
    pub const OBESITY: &str = "OBESITY";
}

/// A named query.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub label: String,
    pub predicate: Predicate,
}

impl QuerySpec {
    pub fn new(label: impl Into<String>, predicate: Predicate) -> Self {
        Self { label: label.into(), predicate }
    }

    /// Spec labelled with the predicate's [outline](Predicate::outline).
    pub fn outlined(predicate: Predicate) -> Self {
        Self { label: predicate.outline(), predicate }
    }

    pub fn shape(&self) -> String {
        self.predicate.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuiteError {
    #[error("a query suite needs at least one query")]
    Empty,
    #[error("label `{0}` is used by more than one query")]
    DuplicateLabel(String),
}

/// Ordered, non-empty list of queries with unique labels.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySuite {
    specs: Vec<QuerySpec>,
}

impl QuerySuite {
    pub fn new(specs: Vec<QuerySpec>) -> Result<Self, SuiteError> {
        if specs.is_empty() {
            return Err(SuiteError::Empty);
        }
        let mut seen = std::collections::HashSet::new();
        for spec in &specs {
            if !seen.insert(spec.label.as_str()) {
                return Err(SuiteError::DuplicateLabel(spec.label.clone()));
            }
        }
        Ok(Self { specs })
    }

    /// The seven queries of increasing complexity, from match-all to an AND
    /// with a nested OR.
    pub fn canonical() -> Self {
        use fields::*;

        let male = || Predicate::equals(SEX, 2);
        let diagnosed = || Predicate::between(CLASSIFICATION, 1, 3);
        let senior = || Predicate::at_least(AGE, 60);
        let diabetic = || Predicate::equals(DIABETES, 1);

        let specs = vec![
            QuerySpec::outlined(Predicate::MatchAll),
            QuerySpec::outlined(male()),
            QuerySpec::outlined(diagnosed()),
            QuerySpec::outlined(senior()),
            QuerySpec::outlined(Predicate::and([male(), diagnosed(), senior()])),
            QuerySpec::outlined(Predicate::and([male(), diagnosed(), senior(), diabetic()])),
            QuerySpec::outlined(Predicate::and([
                male(),
                diagnosed(),
                senior(),
                diabetic(),
                Predicate::or([Predicate::equals(CARDIOVASCULAR, 1), Predicate::equals(OBESITY, 1)]),
            ])),
        ];

        Self { specs }
    }

    pub fn specs(&self) -> &[QuerySpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuerySpec> {
        self.specs.iter()
    }
}

impl<'a> IntoIterator for &'a QuerySuite {
    type Item = &'a QuerySpec;
    type IntoIter = std::slice::Iter<'a, QuerySpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.iter()
    }
}
