//! Constraint matching for header and query-string filters.

use std::collections::HashMap;

/// Value that matches any present header or query parameter.
pub const WILDCARD: &str = "*";

/// Expected value for a required header or query key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// The key must be present with exactly this value
    Exact(String),
    /// The key must be present; its value is ignored
    Present,
}

impl Constraint {
    #[inline]
    #[must_use]
    pub fn accepts(&self, actual: &str) -> bool {
        match self {
            Constraint::Exact(expected) => expected == actual,
            Constraint::Present => true,
        }
    }
}

impl From<String> for Constraint {
    fn from(value: String) -> Self {
        if value == WILDCARD {
            Constraint::Present
        } else {
            Constraint::Exact(value)
        }
    }
}

impl From<&str> for Constraint {
    fn from(value: &str) -> Self {
        Constraint::from(value.to_string())
    }
}

/// Required keys for one side (headers or query) of a route.
pub type Constraints = HashMap<String, Constraint>;

/// Check that every constraint is met by `actual`.
///
/// Each key must be present in `actual`, and its value must equal the expected
/// one unless the constraint is [`Constraint::Present`]. Empty constraints are
/// always satisfied.
#[must_use]
pub fn satisfies(constraints: &Constraints, actual: &HashMap<String, String>) -> bool {
    constraints.iter().all(|(key, expected)| {
        actual
            .get(key)
            .is_some_and(|value| expected.accepts(value))
    })
}

/// Build constraints from a flat `key, value, key, value, ...` list.
///
/// Pairs are consumed two at a time. With an odd number of items the trailing
/// key gets the wildcard. Repeated keys keep the last value.
pub fn parse_pairs<I, S>(pairs: I) -> Constraints
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out = Constraints::new();
    let mut items = pairs.into_iter().map(Into::into);

    while let Some(key) = items.next() {
        let value = items.next().unwrap_or_else(|| WILDCARD.to_string());
        out.insert(key, Constraint::from(value));
    }

    out
}
