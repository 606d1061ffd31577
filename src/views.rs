//! Role-dependent selection of menus, visible projects and action buttons.
//!
//! Everything here is recomputed from the live collection on each call.

use crate::model::{Project, Role, Status};
use crate::transitions::ActionKind;

/// Which projects a role gets to see, before the status filter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Scope {
    All,
    CreatedBy(Role),
    /// Projects the current technician is assigned to.
    Assigned,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Capabilities {
    pub visible: &'static [Status],
    pub scope: Scope,
    pub actions: &'static [ActionKind],
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MenuItem {
    pub id: &'static str,
    pub title: &'static str,
}

const fn item(id: &'static str, title: &'static str) -> MenuItem {
    MenuItem { id, title }
}

const SALES_MENU: &[MenuItem] = &[
    item("dashboard", "Dashboard"),
    item("new-project", "New Project"),
    item("submissions", "My Submissions"),
];

const ADMIN_MENU: &[MenuItem] = &[
    item("dashboard", "Dashboard"),
    item("registration", "Project Registration"),
    item("all-projects", "All Projects"),
    item("settings", "System Settings"),
];

const MANAGER_MENU: &[MenuItem] = &[
    item("dashboard", "Dashboard"),
    item("review", "Project Review"),
    item("reports", "Reports"),
    item("team", "Team Overview"),
];

const SUPERVISOR_MENU: &[MenuItem] = &[
    item("dashboard", "Dashboard"),
    item("scheduling", "Project Scheduling"),
    item("technicians", "Technician Management"),
    item("validation", "Progress Validation"),
];

const TECHNICIAN_MENU: &[MenuItem] = &[
    item("dashboard", "Dashboard"),
    item("my-projects", "My Projects"),
    item("attendance", "Attendance"),
    item("progress", "Progress Updates"),
];

impl Role {
    pub fn capabilities(self) -> Capabilities {
        match self {
            Role::Sales => Capabilities {
                visible: &Status::ALL,
                scope: Scope::CreatedBy(Role::Sales),
                actions: &[ActionKind::Submit],
            },
            Role::Admin => Capabilities {
                visible: &Status::ALL,
                scope: Scope::All,
                actions: &[ActionKind::Register],
            },
            Role::Manager => Capabilities {
                visible: &Status::ALL,
                scope: Scope::All,
                actions: &[
                    ActionKind::Approve,
                    ActionKind::Reject,
                    ActionKind::Finalize,
                ],
            },
            Role::Supervisor => Capabilities {
                visible: &[Status::Approved, Status::Scheduled, Status::InProgress],
                scope: Scope::All,
                actions: &[ActionKind::Schedule, ActionKind::Validate],
            },
            Role::Technician => Capabilities {
                visible: &[Status::Scheduled, Status::InProgress],
                scope: Scope::Assigned,
                actions: &[ActionKind::MarkAttendance, ActionKind::UpdateProgress],
            },
        }
    }

    pub fn menu_items(self) -> &'static [MenuItem] {
        match self {
            Role::Sales => SALES_MENU,
            Role::Admin => ADMIN_MENU,
            Role::Manager => MANAGER_MENU,
            Role::Supervisor => SUPERVISOR_MENU,
            Role::Technician => TECHNICIAN_MENU,
        }
    }

    /// Whether a project is waiting on this role.
    pub fn awaits(self, project: &Project) -> bool {
        match self {
            Role::Admin => project.status == Status::Draft,
            Role::Manager => project.status == Status::Registered,
            Role::Supervisor => {
                matches!(project.status, Status::Approved | Status::InProgress)
            }
            Role::Sales | Role::Technician => false,
        }
    }
}

pub fn pending_count(role: Role, projects: &[Project]) -> usize {
    projects.iter().filter(|p| role.awaits(p)).count()
}

pub fn is_visible(role: Role, project: &Project, technician: &str) -> bool {
    let capabilities = role.capabilities();
    let in_scope = match capabilities.scope {
        Scope::All => true,
        Scope::CreatedBy(creator) => project.created_by == creator,
        Scope::Assigned => project.is_assigned_to(technician),
    };
    in_scope && capabilities.visible.contains(&project.status)
}

pub fn visible_projects<'a>(role: Role, projects: &'a [Project], technician: &str) -> Vec<&'a Project> {
    projects
        .iter()
        .filter(|p| is_visible(role, p, technician))
        .collect()
}

/// The action buttons `role` is offered for `project`.
pub fn available_actions(role: Role, project: &Project) -> Vec<ActionKind> {
    role.capabilities()
        .actions
        .iter()
        .copied()
        .filter(|action| action.source() == Some(project.status))
        .collect()
}

/// Everything the shell needs to render one role's screen.
#[derive(Debug)]
pub struct RoleView<'a> {
    pub role: Role,
    pub label: &'static str,
    pub menu: &'static [MenuItem],
    pub pending_count: usize,
    pub projects: Vec<&'a Project>,
}

pub fn select_view<'a>(role: Role, projects: &'a [Project], technician: &str) -> RoleView<'a> {
    RoleView {
        role,
        label: role.label(),
        menu: role.menu_items(),
        pending_count: pending_count(role, projects),
        projects: visible_projects(role, projects, technician),
    }
}
