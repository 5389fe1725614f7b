//! Role hierarchy
//!
//! Roles form an ordered forest. A child role inherits the directives of its
//! parent whenever it has none of its own. The forest is kept as a single
//! typed tree; flat parent maps from configuration are compiled into it.
//!
//! Lookup is a pre-order search in declaration order, comparing names
//! case-insensitively. At each node the alias is tried before the name, and
//! children are only searched when the node itself did not match. The first
//! match wins, so a role declared twice resolves to its first position.

use crate::access_control::types::RoleName;
use crate::config::{HierarchyConfig, RoleNodeConfig};
use crate::error::{AccessError, AccessResult, ConfigError};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Node of the role tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleNode {
    /// A role with no descendants
    Leaf(RoleName),
    /// Shorthand for a role with exactly one child role
    ///
    /// Looking up `alias` yields `alias` first and then `name`, so the alias
    /// inherits everything declared for `name`.
    Aliased { name: RoleName, alias: RoleName },
    /// A role with ordered child roles
    Tree {
        name: RoleName,
        children: Vec<RoleNode>,
    },
}

impl RoleNode {
    pub fn leaf(name: impl Into<RoleName>) -> Self {
        RoleNode::Leaf(name.into())
    }

    pub fn aliased(name: impl Into<RoleName>, alias: impl Into<RoleName>) -> Self {
        RoleNode::Aliased {
            name: name.into(),
            alias: alias.into(),
        }
    }

    pub fn tree(name: impl Into<RoleName>, children: Vec<RoleNode>) -> Self {
        RoleNode::Tree {
            name: name.into(),
            children,
        }
    }

    pub fn name(&self) -> &RoleName {
        match self {
            RoleNode::Leaf(name) => name,
            RoleNode::Aliased { name, .. } => name,
            RoleNode::Tree { name, .. } => name,
        }
    }
}

/// Declared role hierarchy
#[derive(Debug, Clone, Default)]
pub struct RoleHierarchy {
    roots: Vec<RoleNode>,
    strict: bool,
}

impl RoleHierarchy {
    /// Build a hierarchy from an ordered forest.
    ///
    /// Fails when a role is declared below itself.
    pub fn new(roots: Vec<RoleNode>) -> Result<Self, ConfigError> {
        let mut ancestors = Vec::new();
        for node in &roots {
            check_ancestry(node, &mut ancestors)?;
        }
        Ok(Self {
            roots,
            strict: false,
        })
    }

    /// A hierarchy with no declared roles
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile the configured hierarchy (nested or flat form)
    pub fn from_config(config: &HierarchyConfig, strict: bool) -> Result<Self, ConfigError> {
        let has_tree = !config.tree.is_empty();
        let has_flat = !config.parents.is_empty() || !config.roots.is_empty();
        if has_tree && has_flat {
            return Err(ConfigError::Invalid {
                message: "hierarchy.tree cannot be combined with hierarchy.parents/roots"
                    .to_string(),
            });
        }

        let roots = if has_flat {
            compile_flat(&config.parents, &config.roots)?
        } else {
            config
                .tree
                .iter()
                .map(compile_node)
                .collect::<Result<Vec<_>, _>>()?
        };

        let hierarchy = Self::new(roots)?.with_strict(strict);
        debug!(
            roots = hierarchy.roots.len(),
            strict, "Compiled role hierarchy"
        );
        Ok(hierarchy)
    }

    /// Whether undeclared roles are an error instead of self-only roots
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn roots(&self) -> &[RoleNode] {
        &self.roots
    }

    /// Whether the role is declared (`public` always counts as declared)
    pub fn contains(&self, role: &str) -> bool {
        RoleName::from(role).is_public() || find_path(&self.roots, role).is_some()
    }

    /// Ordered path for `role`: the role itself first, then its ancestors up
    /// to the root.
    pub fn resolve_path(&self, role: &str) -> AccessResult<Vec<RoleName>> {
        let name = RoleName::from(role);
        if name.is_public() {
            return Ok(vec![name]);
        }

        match find_path(&self.roots, role) {
            Some(mut path) => {
                path.reverse();
                trace!(role, depth = path.len(), "Resolved role path");
                Ok(path)
            }
            None if self.strict => Err(AccessError::role_not_found(role)),
            None => {
                trace!(role, "Role not declared, using self-only path");
                Ok(vec![name])
            }
        }
    }

    /// Immediate parent of `role`, `None` for roots and `public`
    pub fn parent_of(&self, role: &str) -> AccessResult<Option<RoleName>> {
        Ok(self.resolve_path(role)?.into_iter().nth(1))
    }
}

/// Pre-order search returning the root-first path to `role`
fn find_path(nodes: &[RoleNode], role: &str) -> Option<Vec<RoleName>> {
    for node in nodes {
        match node {
            RoleNode::Aliased { name, alias } => {
                if alias.matches(role) {
                    return Some(vec![name.clone(), alias.clone()]);
                }
                if name.matches(role) {
                    return Some(vec![name.clone()]);
                }
            }
            RoleNode::Leaf(name) => {
                if name.matches(role) {
                    return Some(vec![name.clone()]);
                }
            }
            RoleNode::Tree { name, children } => {
                if name.matches(role) {
                    return Some(vec![name.clone()]);
                }
                if let Some(sub) = find_path(children, role) {
                    let mut path = Vec::with_capacity(sub.len() + 1);
                    path.push(name.clone());
                    path.extend(sub);
                    return Some(path);
                }
            }
        }
    }
    None
}

/// Reject any role declared below itself
fn check_ancestry<'a>(
    node: &'a RoleNode,
    ancestors: &mut Vec<&'a RoleName>,
) -> Result<(), ConfigError> {
    let name = node.name();
    if ancestors.contains(&name) {
        return Err(ConfigError::CyclicHierarchy {
            role: name.to_string(),
        });
    }

    match node {
        RoleNode::Leaf(_) => {}
        RoleNode::Aliased { alias, .. } => {
            if alias == name || ancestors.contains(&alias) {
                return Err(ConfigError::CyclicHierarchy {
                    role: alias.to_string(),
                });
            }
        }
        RoleNode::Tree { children, .. } => {
            ancestors.push(name);
            for child in children {
                check_ancestry(child, ancestors)?;
            }
            ancestors.pop();
        }
    }
    Ok(())
}

fn compile_node(config: &RoleNodeConfig) -> Result<RoleNode, ConfigError> {
    match config {
        RoleNodeConfig::Name(name) => Ok(RoleNode::leaf(non_empty(name, "hierarchy.tree")?)),
        RoleNodeConfig::Node {
            name,
            alias,
            children,
        } => {
            let name = non_empty(name, "hierarchy.tree.name")?;
            match (alias, children.is_empty()) {
                (Some(_), false) => Err(ConfigError::Invalid {
                    message: format!("role '{}' cannot have both an alias and children", name),
                }),
                (Some(alias), true) => Ok(RoleNode::aliased(
                    name,
                    non_empty(alias, "hierarchy.tree.alias")?,
                )),
                (None, true) => Ok(RoleNode::leaf(name)),
                (None, false) => Ok(RoleNode::tree(
                    name,
                    children
                        .iter()
                        .map(compile_node)
                        .collect::<Result<Vec<_>, _>>()?,
                )),
            }
        }
    }
}

fn non_empty<'a>(name: &'a str, field: &str) -> Result<&'a str, ConfigError> {
    if name.trim().is_empty() {
        Err(ConfigError::Invalid {
            message: format!("{} contains an empty role name", field),
        })
    } else {
        Ok(name)
    }
}

/// Compile a flat `role -> parent` map plus bare root entries into a forest
fn compile_flat(
    parents: &HashMap<String, String>,
    bare: &[String],
) -> Result<Vec<RoleNode>, ConfigError> {
    let parent_of: HashMap<RoleName, Option<RoleName>> = parents
        .iter()
        .map(|(role, parent)| {
            non_empty(role, "hierarchy.parents")?;
            let parent = (!parent.trim().is_empty()).then(|| RoleName::from(parent.as_str()));
            Ok::<_, ConfigError>((RoleName::from(role.as_str()), parent))
        })
        .collect::<Result<_, _>>()?;

    for role in parent_of.keys() {
        let mut seen = HashSet::new();
        let mut current = Some(role);
        while let Some(name) = current {
            if !seen.insert(name) {
                return Err(ConfigError::CyclicHierarchy {
                    role: role.to_string(),
                });
            }
            current = parent_of.get(name).and_then(Option::as_ref);
        }
    }

    let mut children: HashMap<&RoleName, Vec<&RoleName>> = HashMap::new();
    let mut roots: Vec<RoleName> = Vec::new();
    for (role, parent) in &parent_of {
        match parent {
            Some(parent) => {
                children.entry(parent).or_default().push(role);
                if !parent_of.contains_key(parent) {
                    roots.push(parent.clone());
                }
            }
            None => roots.push(role.clone()),
        }
    }
    for role in bare {
        let role = RoleName::from(non_empty(role, "hierarchy.roots")?);
        if !parent_of.contains_key(&role) {
            roots.push(role);
        }
    }

    // HashMap order is arbitrary; sort so lookups are deterministic.
    roots.sort();
    roots.dedup();
    for siblings in children.values_mut() {
        siblings.sort();
    }

    Ok(roots
        .iter()
        .map(|root| build_flat_node(root, &children))
        .collect())
}

fn build_flat_node(role: &RoleName, children: &HashMap<&RoleName, Vec<&RoleName>>) -> RoleNode {
    match children.get(role) {
        Some(kids) if !kids.is_empty() => RoleNode::tree(
            role.clone(),
            kids.iter()
                .map(|kid| build_flat_node(kid, children))
                .collect(),
        ),
        _ => RoleNode::Leaf(role.clone()),
    }
}
