//! Authorization model types
//!
//! A declarative description of object types, their base relations, and
//! the permission rewrite rules. Published once to the tuple store at
//! setup time and referenced by a model identifier thereafter.

use serde::{Deserialize, Serialize};

/// A permission derived from a union of base relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRule {
    /// Permission name, e.g. `can_read`.
    pub name: String,
    /// Base relations any one of which grants the permission.
    pub any_of: Vec<String>,
}

/// One object type with its relations and derived permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub name: String,
    pub relations: Vec<String>,
    pub permissions: Vec<PermissionRule>,
}

/// The full declarative authorization model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationModel {
    pub types: Vec<TypeDefinition>,
}

impl AuthorizationModel {
    /// Find a type definition by wire name.
    pub fn type_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Resolve the set of relation names that satisfy `relation` on
    /// `object_type`: the name itself plus, if it names a permission,
    /// every base relation in its rewrite union.
    pub fn satisfying_relations<'a>(&'a self, object_type: &str, relation: &'a str) -> Vec<&'a str> {
        let mut names = vec![relation];
        if let Some(def) = self.type_definition(object_type) {
            if let Some(rule) = def.permissions.iter().find(|p| p.name == relation) {
                names.extend(rule.any_of.iter().map(String::as_str));
            }
        }
        names
    }
}
