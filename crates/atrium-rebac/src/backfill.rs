//! Bulk backfill of the authorization graph
//!
//! Seeds relations for records that existed before authorization was
//! wired in. Per-item failures are logged and counted, never abort the
//! run; re-runs are idempotent because re-granting an existing tuple is
//! a no-op.

use tracing::{error, info};

use atrium_types::{ObjectRef, Principal, Relation, ResourceType};

use crate::engine::{GrantOutcome, RebacEngine};

/// An existing document and its owner.
#[derive(Debug, Clone)]
pub struct DocumentSeed {
    pub id: String,
    pub owner: Principal,
}

/// An existing project: its owner plus any explicit member roles.
#[derive(Debug, Clone)]
pub struct ProjectSeed {
    pub id: String,
    pub owner: Principal,
    pub members: Vec<(Principal, Relation)>,
}

/// An existing task with its creator and optional assignee.
#[derive(Debug, Clone)]
pub struct TaskSeed {
    pub id: String,
    pub creator: Principal,
    pub assignee: Option<Principal>,
}

/// An existing note and its creator.
#[derive(Debug, Clone)]
pub struct NoteSeed {
    pub id: String,
    pub creator: Principal,
}

/// Aggregate outcome of a backfill run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BackfillReport {
    /// Tuples newly written.
    pub granted: usize,
    /// Tuples that already existed.
    pub skipped: usize,
    /// Grants that failed; details are in the log.
    pub failed: usize,
}

impl BackfillReport {
    fn record(&mut self, outcome: Result<GrantOutcome, crate::RebacError>, what: &ObjectRef) {
        match outcome {
            Ok(GrantOutcome::Granted) => self.granted += 1,
            Ok(GrantOutcome::AlreadyExisted) => self.skipped += 1,
            Err(err) => {
                error!(object = %what, error = %err, "backfill grant failed, continuing");
                self.failed += 1;
            }
        }
    }
}

/// Grant relations for all seed records. Partial progress is preserved:
/// a failing grant is counted and the run continues.
pub async fn backfill(
    engine: &RebacEngine,
    documents: &[DocumentSeed],
    projects: &[ProjectSeed],
    tasks: &[TaskSeed],
    notes: &[NoteSeed],
) -> BackfillReport {
    let mut report = BackfillReport::default();

    for doc in documents {
        let object = ObjectRef::new(ResourceType::Document, &doc.id);
        report.record(engine.grant(&doc.owner, &object, Relation::Owner).await, &object);
    }

    for project in projects {
        let object = ObjectRef::new(ResourceType::Project, &project.id);
        report.record(engine.grant(&project.owner, &object, Relation::Owner).await, &object);
        for (member, relation) in &project.members {
            report.record(engine.grant(member, &object, *relation).await, &object);
        }
    }

    for task in tasks {
        let object = ObjectRef::new(ResourceType::Task, &task.id);
        report.record(engine.grant(&task.creator, &object, Relation::Creator).await, &object);
        if let Some(assignee) = &task.assignee {
            if assignee != &task.creator {
                report.record(
                    engine.grant(assignee, &object, Relation::Assignee).await,
                    &object,
                );
            }
        }
    }

    for note in notes {
        let object = ObjectRef::new(ResourceType::Note, &note.id);
        report.record(engine.grant(&note.creator, &object, Relation::Creator).await, &object);
    }

    info!(
        granted = report.granted,
        skipped = report.skipped,
        failed = report.failed,
        "authorization backfill completed"
    );
    report
}
