use crate::checks;
use crate::model::{
    Project, ProjectDraft, ProjectId, ProjectPatch, ProjectStore, Registration, Role, Status,
    TransitionPolicy,
};
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransitionError {
    #[error("project {0} not found")]
    UnknownProject(ProjectId),
    #[error("role {role} is not allowed to {action}")]
    NotPermitted { role: Role, action: ActionKind },
    #[error("cannot {action} a project that is {from}")]
    IllegalTransition { action: ActionKind, from: Status },
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ActionKind {
    Submit,
    Register,
    Approve,
    Reject,
    Schedule,
    MarkAttendance,
    UpdateProgress,
    Validate,
    Finalize,
}

impl ActionKind {
    #[cfg(test)]
    pub const ALL: [ActionKind; 9] = [
        ActionKind::Submit,
        ActionKind::Register,
        ActionKind::Approve,
        ActionKind::Reject,
        ActionKind::Schedule,
        ActionKind::MarkAttendance,
        ActionKind::UpdateProgress,
        ActionKind::Validate,
        ActionKind::Finalize,
    ];

    /// The only role allowed to perform this action.
    pub fn actor(self) -> Role {
        match self {
            ActionKind::Submit => Role::Sales,
            ActionKind::Register => Role::Admin,
            ActionKind::Approve | ActionKind::Reject | ActionKind::Finalize => Role::Manager,
            ActionKind::Schedule | ActionKind::Validate => Role::Supervisor,
            ActionKind::MarkAttendance | ActionKind::UpdateProgress => Role::Technician,
        }
    }

    /// Status a project must be in for the action to apply. Submitting
    /// creates a project and so has none.
    pub fn source(self) -> Option<Status> {
        match self {
            ActionKind::Submit => None,
            ActionKind::Register => Some(Status::Draft),
            ActionKind::Approve | ActionKind::Reject => Some(Status::Registered),
            ActionKind::Schedule => Some(Status::Approved),
            ActionKind::MarkAttendance => Some(Status::Scheduled),
            ActionKind::UpdateProgress | ActionKind::Validate => Some(Status::InProgress),
            ActionKind::Finalize => Some(Status::Completed),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Submit => "submit",
            ActionKind::Register => "register",
            ActionKind::Approve => "approve",
            ActionKind::Reject => "reject",
            ActionKind::Schedule => "schedule",
            ActionKind::MarkAttendance => "mark-attendance",
            ActionKind::UpdateProgress => "update-progress",
            ActionKind::Validate => "validate",
            ActionKind::Finalize => "finalize",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome chosen by the manager when closing a completed project.
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum FinalStatus {
    Done,
    Pending,
    Cancelled,
}

impl From<FinalStatus> for Status {
    fn from(status: FinalStatus) -> Status {
        match status {
            FinalStatus::Done => Status::Done,
            FinalStatus::Pending => Status::Pending,
            FinalStatus::Cancelled => Status::Cancelled,
        }
    }
}

/// A role-triggered change to an existing project, with its payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Register(Registration),
    Approve { notes: String },
    Reject { notes: String },
    Schedule {
        date: String,
        technicians: Vec<String>,
    },
    MarkAttendance,
    UpdateProgress { progress: i64, notes: String },
    Validate { report: String },
    Finalize(FinalStatus),
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Register(_) => ActionKind::Register,
            Action::Approve { .. } => ActionKind::Approve,
            Action::Reject { .. } => ActionKind::Reject,
            Action::Schedule { .. } => ActionKind::Schedule,
            Action::MarkAttendance => ActionKind::MarkAttendance,
            Action::UpdateProgress { .. } => ActionKind::UpdateProgress,
            Action::Validate { .. } => ActionKind::Validate,
            Action::Finalize(_) => ActionKind::Finalize,
        }
    }

    pub fn target(&self) -> Status {
        match self {
            Action::Register(_) => Status::Registered,
            Action::Approve { .. } => Status::Approved,
            Action::Reject { .. } => Status::Rejected,
            Action::Schedule { .. } => Status::Scheduled,
            Action::MarkAttendance | Action::UpdateProgress { .. } => Status::InProgress,
            Action::Validate { .. } => Status::Completed,
            Action::Finalize(status) => (*status).into(),
        }
    }

    fn into_patch(self) -> ProjectPatch {
        let status = self.target();
        match self {
            Action::Register(registration) => ProjectPatch {
                registration: Some(registration),
                ..ProjectPatch::status(status)
            },
            Action::Approve { notes } | Action::Reject { notes } => ProjectPatch {
                review_notes: Some(notes),
                ..ProjectPatch::status(status)
            },
            Action::Schedule { date, technicians } => ProjectPatch {
                scheduled_date: Some(date.trim().to_owned()),
                assigned_technicians: Some(checks::normalize_technicians(technicians)),
                ..ProjectPatch::status(status)
            },
            // Progress reports never move the project.
            Action::UpdateProgress { progress, notes } => ProjectPatch {
                progress: Some(checks::clamp_progress(progress)),
                progress_notes: Some(notes),
                ..ProjectPatch::default()
            },
            Action::Validate { report } => ProjectPatch {
                report: Some(report),
                ..ProjectPatch::status(status)
            },
            Action::MarkAttendance | Action::Finalize(_) => ProjectPatch::status(status),
        }
    }
}

/// Resolve the status reached when `role` performs `action` on a project
/// currently in `from`.
pub fn transition(from: Status, role: Role, action: &Action) -> Result<Status, TransitionError> {
    let kind = action.kind();
    if kind.actor() != role {
        return Err(TransitionError::NotPermitted { role, action: kind });
    }
    if kind.source() != Some(from) {
        return Err(TransitionError::IllegalTransition { action: kind, from });
    }
    Ok(action.target())
}

impl ProjectStore {
    fn check_permitted(&self, result: Result<(), TransitionError>) -> Result<(), TransitionError> {
        match result {
            Err(e) if self.policy() == TransitionPolicy::Permissive => {
                warn!(error = %e, "permissive policy, applying anyway");
                Ok(())
            }
            other => other,
        }
    }

    /// Create a project on behalf of `role`.
    pub fn submit(&mut self, role: Role, draft: ProjectDraft) -> Result<&Project, TransitionError> {
        checks::check_submission(&draft)?;
        let permitted = if role == ActionKind::Submit.actor() {
            Ok(())
        } else {
            Err(TransitionError::NotPermitted {
                role,
                action: ActionKind::Submit,
            })
        };
        self.check_permitted(permitted)?;
        Ok(self.add(draft))
    }

    /// Perform `action` as `role` on the project `id`, attaching the
    /// action's fields and moving the project along the pipeline.
    pub fn apply(
        &mut self,
        id: &ProjectId,
        role: Role,
        action: Action,
    ) -> Result<&Project, TransitionError> {
        let from = self
            .get(id)
            .map(|p| p.status)
            .ok_or_else(|| TransitionError::UnknownProject(id.clone()))?;
        checks::check_action(&action)?;
        let result = transition(from, role, &action).map(|to| {
            info!(%id, %role, action = %action.kind(), %from, %to, "transition");
        });
        self.check_permitted(result)?;
        self.update(id, action.into_patch());
        self.get(id)
            .ok_or_else(|| TransitionError::UnknownProject(id.clone()))
    }
}
