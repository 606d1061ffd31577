use super::{Priority, Role, Status};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl ProjectId {
    pub fn generate() -> Self {
        ProjectId(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        ProjectId(s.to_owned())
    }
}

/// Fields attached by the administrator when registering a draft.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Registration {
    pub priority: Priority,
    pub budget: String,
    pub deadline: NaiveDate,
    pub requirements: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub client: String,
    pub description: String,
    pub status: Status,
    pub created_by: Role,
    pub assigned_technicians: Option<Vec<String>>,
    pub scheduled_date: Option<String>,
    pub progress: Option<u8>,
    pub report: Option<String>,
    pub progress_notes: Option<String>,
    pub registration: Option<Registration>,
    pub review_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn is_assigned_to(&self, technician: &str) -> bool {
        self.assigned_technicians
            .as_ref()
            .is_some_and(|technicians| technicians.iter().any(|t| t == technician))
    }

    /// Shallow overwrite of every field present in `patch`. Timestamps are
    /// left to the store.
    pub fn merge(&mut self, patch: ProjectPatch) {
        let ProjectPatch {
            title,
            client,
            description,
            status,
            created_by,
            assigned_technicians,
            scheduled_date,
            progress,
            report,
            progress_notes,
            registration,
            review_notes,
        } = patch;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(client) = client {
            self.client = client;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(created_by) = created_by {
            self.created_by = created_by;
        }
        if assigned_technicians.is_some() {
            self.assigned_technicians = assigned_technicians;
        }
        if scheduled_date.is_some() {
            self.scheduled_date = scheduled_date;
        }
        if let Some(progress) = progress {
            self.progress = Some(progress.min(100));
        }
        if report.is_some() {
            self.report = report;
        }
        if progress_notes.is_some() {
            self.progress_notes = progress_notes;
        }
        if registration.is_some() {
            self.registration = registration;
        }
        if review_notes.is_some() {
            self.review_notes = review_notes;
        }
    }
}

/// Everything a new project needs except its id and timestamps.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectDraft {
    pub title: String,
    pub client: String,
    pub description: String,
    pub status: Status,
    pub created_by: Role,
    pub assigned_technicians: Option<Vec<String>>,
    pub scheduled_date: Option<String>,
    pub progress: Option<u8>,
    pub report: Option<String>,
    pub progress_notes: Option<String>,
}

impl ProjectDraft {
    /// A proposal as submitted from the sales dashboard.
    pub fn submission(
        title: impl Into<String>,
        client: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        ProjectDraft {
            title: title.into(),
            client: client.into(),
            description: description.into(),
            status: Status::Draft,
            created_by: Role::Sales,
            assigned_technicians: None,
            scheduled_date: None,
            progress: None,
            report: None,
            progress_notes: None,
        }
    }

    pub fn into_project(self, id: ProjectId, now: DateTime<Utc>) -> Project {
        Project {
            id,
            title: self.title,
            client: self.client,
            description: self.description,
            status: self.status,
            created_by: self.created_by,
            assigned_technicians: self.assigned_technicians,
            scheduled_date: self.scheduled_date,
            progress: self.progress.map(|p| p.min(100)),
            report: self.report,
            progress_notes: self.progress_notes,
            registration: None,
            review_notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update. The id and creation time have no slot here and so can
/// never be overwritten.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub client: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub created_by: Option<Role>,
    pub assigned_technicians: Option<Vec<String>>,
    pub scheduled_date: Option<String>,
    pub progress: Option<u8>,
    pub report: Option<String>,
    pub progress_notes: Option<String>,
    pub registration: Option<Registration>,
    pub review_notes: Option<String>,
}

impl ProjectPatch {
    pub fn status(status: Status) -> Self {
        ProjectPatch {
            status: Some(status),
            ..ProjectPatch::default()
        }
    }
}
