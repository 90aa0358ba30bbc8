//! Per-type relation vocabularies
//!
//! The closed mapping from resource type to its base relations (in
//! priority order, highest privilege first), its derived permissions, and
//! the permission rewrite table. The probe order defines "highest
//! privilege wins" for role display.

use atrium_types::{Permission, Relation, ResourceType};

use atrium_store::{AuthorizationModel, PermissionRule, TypeDefinition};

/// Base relations for a resource type, highest privilege first.
pub fn relation_priority(resource_type: ResourceType) -> &'static [Relation] {
    match resource_type {
        ResourceType::Document => &[Relation::Owner, Relation::Editor, Relation::Viewer],
        ResourceType::Project => &[Relation::Owner, Relation::Member, Relation::Viewer],
        ResourceType::Task => &[Relation::Creator, Relation::Assignee],
        ResourceType::Note => &[Relation::Creator],
    }
}

/// Derived permissions applicable to a resource type.
pub fn permissions_for(resource_type: ResourceType) -> &'static [Permission] {
    match resource_type {
        ResourceType::Document => &[
            Permission::CanRead,
            Permission::CanWrite,
            Permission::CanDelete,
            Permission::CanShare,
        ],
        ResourceType::Project => &[
            Permission::CanRead,
            Permission::CanWrite,
            Permission::CanDelete,
            Permission::CanManageMembers,
        ],
        ResourceType::Task | ResourceType::Note => {
            &[Permission::CanRead, Permission::CanWrite, Permission::CanDelete]
        }
    }
}

/// The relations whose union grants `permission` on `resource_type`, or
/// an empty slice when the permission does not apply to the type.
pub fn granting_relations(
    resource_type: ResourceType,
    permission: Permission,
) -> &'static [Relation] {
    use Permission::*;
    use Relation::*;
    use ResourceType::*;
    match (resource_type, permission) {
        (Document, CanRead) => &[Owner, Editor, Viewer],
        (Document, CanWrite) => &[Owner, Editor],
        (Document, CanDelete) | (Document, CanShare) => &[Owner],
        (Project, CanRead) => &[Owner, Member, Viewer],
        (Project, CanWrite) => &[Owner, Member],
        (Project, CanDelete) | (Project, CanManageMembers) => &[Owner],
        (Task, CanRead) | (Task, CanWrite) => &[Creator, Assignee],
        (Task, CanDelete) => &[Creator],
        (Note, CanRead) | (Note, CanWrite) | (Note, CanDelete) => &[Creator],
        _ => &[],
    }
}

/// Whether `relation` is part of `resource_type`'s vocabulary.
pub fn relation_applies(resource_type: ResourceType, relation: Relation) -> bool {
    relation_priority(resource_type).contains(&relation)
}

/// Build the declarative workspace authorization model from the
/// vocabulary tables. Published to the tuple store once at setup.
pub fn workspace_model() -> AuthorizationModel {
    let types = ResourceType::ALL
        .into_iter()
        .map(|rt| TypeDefinition {
            name: rt.as_str().to_string(),
            relations: relation_priority(rt).iter().map(|r| r.as_str().to_string()).collect(),
            permissions: permissions_for(rt)
                .iter()
                .map(|p| PermissionRule {
                    name: p.as_str().to_string(),
                    any_of: granting_relations(rt, *p)
                        .iter()
                        .map(|r| r.as_str().to_string())
                        .collect(),
                })
                .collect(),
        })
        .collect();
    AuthorizationModel { types }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_orders() {
        assert_eq!(
            relation_priority(ResourceType::Document),
            &[Relation::Owner, Relation::Editor, Relation::Viewer]
        );
        assert_eq!(relation_priority(ResourceType::Note), &[Relation::Creator]);
    }

    #[test]
    fn test_rewrite_table() {
        assert_eq!(
            granting_relations(ResourceType::Project, Permission::CanManageMembers),
            &[Relation::Owner]
        );
        assert_eq!(
            granting_relations(ResourceType::Task, Permission::CanWrite),
            &[Relation::Creator, Relation::Assignee]
        );
        // can_share does not apply to notes
        assert!(granting_relations(ResourceType::Note, Permission::CanShare).is_empty());
    }

    #[test]
    fn test_relation_applies() {
        assert!(relation_applies(ResourceType::Document, Relation::Editor));
        assert!(!relation_applies(ResourceType::Document, Relation::Assignee));
    }

    #[test]
    fn test_workspace_model_covers_all_types() {
        let model = workspace_model();
        assert_eq!(model.types.len(), 4);
        let document = model.type_definition("document").unwrap();
        assert_eq!(document.relations, vec!["owner", "editor", "viewer"]);
        let can_read = document.permissions.iter().find(|p| p.name == "can_read").unwrap();
        assert_eq!(can_read.any_of, vec!["owner", "editor", "viewer"]);
    }
}
