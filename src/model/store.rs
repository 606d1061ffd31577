use super::{Project, ProjectDraft, ProjectId, ProjectPatch};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, trace};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// What to do with a transition that the pipeline does not allow.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    #[default]
    Enforced,
    /// Log the illegal transition and apply it anyway.
    Permissive,
}

/// The single owned collection of projects, in insertion order.
pub struct ProjectStore {
    projects: Vec<Project>,
    clock: Box<dyn Clock>,
    policy: TransitionPolicy,
}

impl ProjectStore {
    pub fn new(clock: Box<dyn Clock>, policy: TransitionPolicy) -> ProjectStore {
        ProjectStore {
            projects: Vec::new(),
            clock,
            policy,
        }
    }

    pub fn with_projects(
        projects: Vec<Project>,
        clock: Box<dyn Clock>,
        policy: TransitionPolicy,
    ) -> ProjectStore {
        ProjectStore {
            projects,
            clock,
            policy,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    pub fn list(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| &p.id == id)
    }

    pub fn contains(&self, id: &ProjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn filter_projects<F>(&self, condition: F) -> Vec<&Project>
    where
        F: Fn(&Project) -> bool,
    {
        self.projects.iter().filter(|p| condition(p)).collect()
    }

    pub fn add(&mut self, draft: ProjectDraft) -> &Project {
        let mut id = ProjectId::generate();
        while self.contains(&id) {
            id = ProjectId::generate();
        }
        let project = draft.into_project(id, self.clock.now());
        info!(id = %project.id, title = %project.title, status = %project.status, "project created");
        let index = self.projects.len();
        self.projects.push(project);
        &self.projects[index]
    }

    /// Raw mutation with no legality check; pipeline actions go through
    /// [`ProjectStore::apply`].
    ///
    /// Merge `patch` into the project with the given id and stamp its
    /// modification time. Returns `false`, leaving the collection untouched,
    /// if no project has this id.
    pub fn update(&mut self, id: &ProjectId, patch: ProjectPatch) -> bool {
        let now = self.clock.now();
        let Some(project) = self.projects.iter_mut().find(|p| &p.id == id) else {
            debug!(%id, "update ignored for unknown project");
            return false;
        };
        trace!(%id, ?patch, "merging patch");
        project.merge(patch);
        project.updated_at = if now > project.updated_at {
            now
        } else {
            project.updated_at + Duration::microseconds(1)
        };
        debug!(%id, status = %project.status, "project updated");
        true
    }
}
