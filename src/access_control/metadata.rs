//! Directive extraction from action documentation
//!
//! Actions declare their role directives inside their doc text, one per line:
//!
//! ```text
//! * @role.<role>[.<param>] <value> [free-form comment]
//! * @role.<role> access|action <value> [free-form comment]
//! ```
//!
//! The leading decoration (`*`, `//`, `///`, `//!` or `#`) is optional.
//! Without a parameter the directive sets `access`. A later line for the
//! same role and parameter replaces an earlier one. Lines that do not fit
//! the grammar are ignored.

use crate::access_control::types::{ACCESS_PARAM, ACTION_PARAM, Directive, DirectiveTable, RoleName};
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

static DIRECTIVE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    // Literal pattern, covered by the tests below.
    Regex::new(
        r"(?m)^[ \t]*(?:\*+|//[/!]?|#)?[ \t]*@(?i:role)\.(?P<role>[^.\s]+)(?:\.(?P<param>\S*))?[ \t]+(?P<value>\S+)(?:[ \t]+(?P<next>\S+))?",
    )
    .expect("directive pattern is valid")
});

/// One well-formed directive line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveLine<'a> {
    pub role: &'a str,
    pub param: &'a str,
    pub value: &'a str,
}

/// Iterate over the directive lines of `doc` in declaration order
pub fn directive_lines(doc: &str) -> impl Iterator<Item = DirectiveLine<'_>> {
    DIRECTIVE_LINE.captures_iter(doc).filter_map(|caps| {
        let role = caps.name("role")?.as_str();
        let first = caps.name("value")?.as_str();
        let next = caps.name("next").map(|m| m.as_str());
        let dotted = caps
            .name("param")
            .map(|m| m.as_str())
            .filter(|p| !p.is_empty());

        let (param, value) = match (dotted, next) {
            (Some(param), _) => (param, first),
            // `@role.user access deny` names the parameter with a space
            (None, Some(value)) if first == ACCESS_PARAM || first == ACTION_PARAM => {
                (first, value)
            }
            (None, _) => (ACCESS_PARAM, first),
        };
        Some(DirectiveLine { role, param, value })
    })
}

/// Parse every role's directives out of an action's doc text
pub fn parse_directives(doc: &str) -> DirectiveTable {
    let mut table = DirectiveTable::new();
    let mut lines = 0usize;
    for line in directive_lines(doc) {
        table.set(RoleName::from(line.role), line.param, line.value);
        lines += 1;
    }
    trace!(lines, roles = table.len(), "Parsed directive lines");
    table
}

/// Parse only the directives declared for `role` (matched case-insensitively)
pub fn parse_role_directives(doc: &str, role: &str) -> Directive {
    let mut directive = Directive::new();
    for line in directive_lines(doc).filter(|l| l.role.eq_ignore_ascii_case(role)) {
        directive.set(line.param, line.value);
    }
    directive
}
