use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown status '{0}'")]
    Status(String),
    #[error("unknown role '{0}'")]
    Role(String),
    #[error("unknown priority '{0}'")]
    Priority(String),
}

/// Pipeline stage of a project.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Draft,
    Registered,
    Approved,
    Rejected,
    Scheduled,
    InProgress,
    Completed,
    Done,
    Cancelled,
    Pending,
}

impl Status {
    pub const ALL: [Status; 10] = [
        Status::Draft,
        Status::Registered,
        Status::Approved,
        Status::Rejected,
        Status::Scheduled,
        Status::InProgress,
        Status::Completed,
        Status::Done,
        Status::Cancelled,
        Status::Pending,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Registered => "registered",
            Status::Approved => "approved",
            Status::Rejected => "rejected",
            Status::Scheduled => "scheduled",
            Status::InProgress => "in-progress",
            Status::Completed => "completed",
            Status::Done => "done",
            Status::Cancelled => "cancelled",
            Status::Pending => "pending",
        }
    }

    /// Approved and on its way through scheduling and execution.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            Status::Approved | Status::Scheduled | Status::InProgress
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseError::Status(s.to_owned()))
    }
}

/// Actor type selecting the dashboard and the permitted actions.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Sales,
    Admin,
    Manager,
    Supervisor,
    Technician,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Sales,
        Role::Admin,
        Role::Manager,
        Role::Supervisor,
        Role::Technician,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Sales => "sales",
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Supervisor => "supervisor",
            Role::Technician => "technician",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Sales => "Sales",
            Role::Admin => "Administrator",
            Role::Manager => "Manager Operasional",
            Role::Supervisor => "Supervisor",
            Role::Technician => "Teknisi",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ParseError::Role(s.to_owned()))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Priority::Low,
            Priority::Medium,
            Priority::High,
            Priority::Urgent,
        ]
        .into_iter()
        .find(|priority| priority.as_str() == s)
        .ok_or_else(|| ParseError::Priority(s.to_owned()))
    }
}

#[test]
fn test_status_round_trips_through_wire_form() {
    for status in Status::ALL {
        assert_eq!(status.as_str().parse::<Status>(), Ok(status));
    }
    assert_eq!("in-progress".parse::<Status>(), Ok(Status::InProgress));
}

#[test]
fn test_unknown_status_is_rejected() {
    assert_eq!(
        "in_progress".parse::<Status>(),
        Err(ParseError::Status("in_progress".into()))
    );
    assert!("".parse::<Status>().is_err());
    assert!("Draft".parse::<Status>().is_err());
}

#[test]
fn test_role_labels() {
    assert_eq!("technician".parse::<Role>(), Ok(Role::Technician));
    assert_eq!(Role::Technician.label(), "Teknisi");
    assert_eq!(Role::Manager.label(), "Manager Operasional");
    assert!("owner".parse::<Role>().is_err());
}
