//! Conditional compiler flags.
//!
//! A flag list element starting with `@` is conditional:
//!
//! ```text
//! @!WIN&64: -m64
//! ```
//!
//! enables `-m64` only when the `WIN` flag is false and the `64` flag is true.
//! Conditions are `&`-separated flag names, each optionally negated with `!`.

use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::types::FlagList;

/// Boolean flags that conditional elements are evaluated against.
///
/// Seeded from the host platform and extended by the build mode (`DEBUG`).
/// Names that were never set evaluate to `false`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlagTable {
    flags: BTreeMap<String, bool>,
}

impl FlagTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table holding the host platform flags.
    pub fn host() -> Self {
        let mut table = Self::new();
        for (name, value) in bake_common::host_flags() {
            table.set(name, value);
        }
        table
    }

    /// Sets a flag, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: bool) {
        self.flags.insert(name.into(), value);
    }

    /// Returns the flag's value; unknown names are `false`.
    pub fn is_set(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }
}

/// One conjunct of a conditional element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Condition {
    /// The flag name looked up in the [`FlagTable`].
    pub name: String,
    /// Whether the flag must be unset rather than set.
    pub negated: bool,
}

impl Condition {
    fn holds(&self, table: &FlagTable) -> bool {
        table.is_set(&self.name) != self.negated
    }
}

/// A parsed element of a flag list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlagElement {
    /// Always included.
    Plain(String),
    /// Included only when every condition holds.
    Conditional {
        /// The `&`-joined conditions.
        conditions: Vec<Condition>,
        /// The argument text after the `:`.
        text: String,
    },
}

impl FlagElement {
    /// Parses a single flag list element.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let Some(rest) = raw.strip_prefix('@') else {
            return Ok(FlagElement::Plain(raw.trim().to_string()));
        };

        let (expr, text) = rest.split_once(':').ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "conditional flag '{raw}' is missing the ':' separator"
            ))
        })?;

        let conditions = expr
            .split('&')
            .map(|term| {
                let term = term.trim();
                let (negated, name) = match term.strip_prefix('!') {
                    Some(name) => (true, name.trim()),
                    None => (false, term),
                };
                if name.is_empty() {
                    return Err(ConfigError::ValidationError(format!(
                        "conditional flag '{raw}' has an empty condition"
                    )));
                }
                Ok(Condition {
                    name: name.to_string(),
                    negated,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FlagElement::Conditional {
            conditions,
            text: text.trim().to_string(),
        })
    }

    /// Returns the text this element contributes, if any.
    pub fn evaluate(&self, table: &FlagTable) -> Option<&str> {
        match self {
            FlagElement::Plain(text) => Some(text),
            FlagElement::Conditional { conditions, text } => conditions
                .iter()
                .all(|c| c.holds(table))
                .then_some(text.as_str()),
        }
    }
}

/// Expands a flag setting into the effective argument string.
///
/// Plain strings are returned unchanged. Lists are evaluated element by
/// element; included texts are joined with single spaces in list order and
/// elements that contribute nothing leave no trace.
pub fn evaluate_flags(list: &FlagList, table: &FlagTable) -> Result<String, ConfigError> {
    match list {
        FlagList::Plain(s) => Ok(s.clone()),
        FlagList::Elements(elements) => {
            let mut parts = Vec::with_capacity(elements.len());
            for raw in elements {
                let element = FlagElement::parse(raw)?;
                if let Some(text) = element.evaluate(table) {
                    if !text.is_empty() {
                        parts.push(text.to_string());
                    }
                }
            }
            Ok(parts.join(" "))
        }
    }
}
