//! Access control types
//!
//! Core types shared by the parser, hierarchy, resolver and dispatcher.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Role of a caller that is not logged in
pub const PUBLIC_ROLE: &str = "public";

/// Parameter used when a directive line names none
pub const ACCESS_PARAM: &str = "access";

/// Parameter carrying a redirect target in the two-parameter model
pub const ACTION_PARAM: &str = "action";

/// Keyword granting access
pub const ALLOW: &str = "allow";

/// Keyword refusing access
pub const DENY: &str = "deny";

/// Role identifier
///
/// Keeps the declared spelling for display but compares, orders and hashes
/// ASCII case-insensitively, so `Admin` and `admin` are the same role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(String);

impl RoleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The implicit role of unauthenticated callers
    pub fn public() -> Self {
        Self(PUBLIC_ROLE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_public(&self) -> bool {
        self.matches(PUBLIC_ROLE)
    }

    /// Case-insensitive comparison against a raw name
    pub fn matches(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }

    fn folded(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.bytes().map(|b| b.to_ascii_lowercase())
    }
}

impl PartialEq for RoleName {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl Eq for RoleName {}

impl PartialEq<str> for RoleName {
    fn eq(&self, other: &str) -> bool {
        self.matches(other)
    }
}

impl PartialEq<&str> for RoleName {
    fn eq(&self, other: &&str) -> bool {
        self.matches(other)
    }
}

impl Ord for RoleName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded().cmp(other.folded())
    }
}

impl PartialOrd for RoleName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for RoleName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.folded() {
            state.write_u8(b);
        }
        state.write_u8(0xff);
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoleName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for RoleName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Parameter → value map declared for one role on one action
///
/// Values are opaque strings. Parameter names are matched exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Directive {
    params: BTreeMap<String, String>,
}

impl Directive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-parameter directive under the default `access` parameter
    pub fn access(value: impl Into<String>) -> Self {
        let mut directive = Self::new();
        directive.set(ACCESS_PARAM, value);
        directive
    }

    pub fn get(&self, param: &str) -> Option<&str> {
        self.params.get(param).map(String::as_str)
    }

    /// Set a parameter, returning the value it replaced
    pub fn set(&mut self, param: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.params.insert(param.into(), value.into())
    }

    /// Overlay `other` onto this directive; `other` wins per parameter and
    /// parameters it does not mention are kept.
    pub fn merge(&mut self, other: &Directive) {
        for (param, value) in &other.params {
            self.params.insert(param.clone(), value.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Directive {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Role → directive table for a single action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DirectiveTable {
    roles: BTreeMap<RoleName, Directive>,
}

impl DirectiveTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(&self, role: &RoleName) -> Option<&Directive> {
        self.roles.get(role)
    }

    /// Value of `param` declared directly for `role`
    pub fn value(&self, role: &RoleName, param: &str) -> Option<&str> {
        self.roles.get(role).and_then(|d| d.get(param))
    }

    /// Set one parameter; a later call for the same key overwrites
    pub fn set(&mut self, role: RoleName, param: impl Into<String>, value: impl Into<String>) {
        self.roles.entry(role).or_default().set(param, value);
    }

    /// Merge a directive into the entry for `role`, parameter-wise
    pub fn merge_role(&mut self, role: RoleName, directive: &Directive) {
        self.roles.entry(role).or_default().merge(directive);
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RoleName, &Directive)> {
        self.roles.iter()
    }
}

/// How a resolved value reads as an access verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict<'a> {
    Allow,
    Deny,
    /// Anything that is not a keyword names another action
    Redirect(&'a str),
}

impl<'a> Verdict<'a> {
    /// Keyword match is exact and case-sensitive
    pub fn classify(value: &'a str) -> Self {
        match value {
            ALLOW => Verdict::Allow,
            DENY => Verdict::Deny,
            other => Verdict::Redirect(other),
        }
    }
}

/// Decision handed to the integration layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "action", rename_all = "snake_case")]
pub enum Outcome {
    /// Explicitly allowed
    Allowed,
    /// Explicitly denied
    Denied,
    /// Run the named action instead
    SubstituteAction(String),
    /// Nothing applies; the caller's default policy decides
    NoDirective,
}

impl Outcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Outcome::Allowed)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Outcome::Denied)
    }

    pub fn substitute(&self) -> Option<&str> {
        match self {
            Outcome::SubstituteAction(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Allowed => f.write_str("allowed"),
            Outcome::Denied => f.write_str("denied"),
            Outcome::SubstituteAction(name) => write!(f, "substitute '{}'", name),
            Outcome::NoDirective => f.write_str("no directive"),
        }
    }
}
