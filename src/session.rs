use crate::config::Config;
use crate::dates::DateDisplay;
use crate::display;
use crate::model::{
    Clock, Priority, Project, ProjectDraft, ProjectId, ProjectStore, Registration, Role,
};
use crate::seed::seed_projects;
use crate::stats::statistics;
use crate::transitions::{Action, FinalStatus};
use crate::views::{is_visible, select_view};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr, bail, eyre};
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Switch the active role
    Role { role: Role },
    /// List the projects visible to the active role
    List {
        /// List every project regardless of role
        #[arg(long)]
        all: bool,
    },
    /// Show every field of a project
    Show { id: String },
    /// Show the active role's sidebar and dashboard
    Dashboard,
    /// Submit a new project proposal (sales)
    Submit {
        title: String,
        client: String,
        description: String,
    },
    /// Register a draft project (admin)
    Register {
        id: String,
        #[arg(long)]
        priority: Priority,
        #[arg(long, default_value = "")]
        budget: String,
        #[arg(long)]
        deadline: NaiveDate,
        #[arg(long, default_value = "")]
        requirements: String,
    },
    /// Approve a registered project (manager)
    Approve {
        id: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Reject a registered project (manager)
    Reject {
        id: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Schedule an approved project and assign technicians (supervisor)
    Schedule {
        id: String,
        #[arg(long, default_value = "")]
        date: String,
        #[arg(long = "technician")]
        technicians: Vec<String>,
    },
    /// Mark attendance on a scheduled project (technician)
    Attend { id: String },
    /// Report progress on a project in progress (technician)
    Progress {
        id: String,
        #[arg(long, allow_negative_numbers = true)]
        percent: i64,
        #[arg(long)]
        notes: String,
    },
    /// Validate finished work with a report (supervisor)
    Validate {
        id: String,
        #[arg(long, default_value = "")]
        report: String,
    },
    /// Close a completed project (manager)
    Finalize {
        id: String,
        #[arg(value_enum)]
        status: FinalStatus,
    },
    /// Write the visible projects as CSV
    Export {
        #[arg(long)]
        all: bool,
        /// Write JSON records instead of CSV
        #[arg(long)]
        json: bool,
    },
    /// End the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Split a command line on whitespace, keeping double-quoted text together.
pub fn split_line(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;
    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quoted {
        bail!("unterminated quote");
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// One dashboard session: the project store plus the active role.
pub struct Session {
    store: ProjectStore,
    role: Role,
    config: Config,
    dates: DateDisplay,
}

impl Session {
    pub fn new(config: Config, clock: Box<dyn Clock>) -> Session {
        let policy = config.transitions.policy;
        let store = if config.session.seed {
            ProjectStore::with_projects(seed_projects(), clock, policy)
        } else {
            ProjectStore::new(clock, policy)
        };
        Session {
            store,
            role: config.session.initial_role,
            dates: config.display.date_display(),
            config,
        }
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn current_role(&self) -> Role {
        self.role
    }

    pub fn set_current_role(&mut self, role: Role) {
        info!(from = %self.role, to = %role, "switching role");
        self.role = role;
    }

    fn technician(&self) -> &str {
        &self.config.team.current_technician
    }

    /// Projects the active role can see, or every project.
    fn shown(&self, all: bool) -> Vec<&Project> {
        let (role, technician) = (self.role, self.technician());
        self.store
            .filter_projects(|p| all || is_visible(role, p, technician))
    }

    fn project_id(&self, id: String) -> Result<ProjectId> {
        let id = ProjectId(id);
        if self.store.contains(&id) {
            Ok(id)
        } else {
            Err(eyre!("no project with id {id}"))
        }
    }

    fn act(&mut self, out: &mut impl Write, id: String, action: Action) -> Result<()> {
        let id = self.project_id(id)?;
        let project = self.store.apply(&id, self.role, action)?;
        writeln!(out, "{} is now {}", project.title, project.status)?;
        Ok(())
    }

    /// Run one command line as the active role.
    pub fn execute(&mut self, line: &str, out: &mut impl Write) -> Result<Flow> {
        let words = split_line(line)?;
        if words.is_empty() {
            return Ok(Flow::Continue);
        }
        let command = match Line::try_parse_from(&words) {
            Ok(line) => line.command,
            Err(e) if e.use_stderr() => {
                let message = e.render().to_string();
                return Err(eyre!(
                    "{}",
                    message.trim_start_matches("error: ").trim_end()
                ));
            }
            Err(e) => {
                write!(out, "{}", e.render())?;
                return Ok(Flow::Continue);
            }
        };
        debug!(role = %self.role, ?command, "executing");
        let now = self.store.now();
        match command {
            Command::Role { role } => {
                self.set_current_role(role);
                writeln!(out, "Logged in as: {}", role.label())?;
            }
            Command::List { all } => {
                let projects = self.shown(all);
                if projects.is_empty() {
                    writeln!(out, "No projects to show")?;
                }
                for project in projects {
                    display::display_summary(out, project, &self.dates, now)?;
                }
            }
            Command::Show { id } => {
                let id = self.project_id(id)?;
                if let Some(project) = self.store.get(&id) {
                    display::display_details(out, project, &self.dates, now)?;
                }
            }
            Command::Dashboard => {
                let view = select_view(self.role, self.store.list(), self.technician());
                let stats = statistics(
                    self.role,
                    self.store.list(),
                    self.technician(),
                    &self.config.team.technicians,
                    now.date_naive(),
                );
                display::display_sidebar(out, &view)?;
                writeln!(out)?;
                display::display_dashboard(out, &view, &stats, &self.dates, now)?;
            }
            Command::Submit {
                title,
                client,
                description,
            } => {
                let draft = ProjectDraft::submission(title, client, description);
                let project = self.store.submit(self.role, draft)?;
                writeln!(out, "Submitted {} as {}", project.title, project.id)?;
            }
            Command::Register {
                id,
                priority,
                budget,
                deadline,
                requirements,
            } => {
                let registration = Registration {
                    priority,
                    budget,
                    deadline,
                    requirements,
                };
                self.act(out, id, Action::Register(registration))?;
            }
            Command::Approve { id, notes } => self.act(out, id, Action::Approve { notes })?,
            Command::Reject { id, notes } => self.act(out, id, Action::Reject { notes })?,
            Command::Schedule {
                id,
                date,
                technicians,
            } => {
                let unknown = technicians
                    .iter()
                    .filter(|&t| !self.config.team.technicians.contains(t))
                    .collect::<Vec<_>>();
                if !unknown.is_empty() {
                    warn!(?unknown, "scheduling technicians outside the team roster");
                }
                self.act(out, id, Action::Schedule { date, technicians })?;
            }
            Command::Attend { id } => self.act(out, id, Action::MarkAttendance)?,
            Command::Progress { id, percent, notes } => self.act(
                out,
                id,
                Action::UpdateProgress {
                    progress: percent,
                    notes,
                },
            )?,
            Command::Validate { id, report } => self.act(out, id, Action::Validate { report })?,
            Command::Finalize { id, status } => self.act(out, id, Action::Finalize(status))?,
            Command::Export { all, json } => {
                let projects = self.shown(all);
                if json {
                    display::write_json(&mut *out, &projects).wrap_err("cannot export projects")?;
                } else {
                    display::write_csv(&mut *out, projects).wrap_err("cannot export projects")?;
                }
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Execute every line of `input` until it is exhausted or a `quit`
    /// command is read. A failing command is reported and skipped.
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> Result<()> {
        for (n, line) in input.lines().enumerate() {
            let line = line.wrap_err("cannot read command")?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match self.execute(line, out) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) => {
                    warn!(line = n + 1, error = %e, "command failed");
                    writeln!(out, "error: {e}")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::testing::ManualClock;
    use crate::model::{Status, TransitionPolicy};
    use crate::views::pending_count;

    fn session() -> Session {
        Session::new(Config::default(), Box::new(ManualClock::new()))
    }

    fn run(session: &mut Session, line: &str) -> String {
        let mut out = Vec::new();
        session.execute(line, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn status(session: &Session, id: &str) -> Status {
        session.store().get(&ProjectId::from(id)).unwrap().status
    }

    #[test]
    fn test_split_line() {
        assert_eq!(
            split_line(r#"submit "Office Move" Initech  "Move two floors""#).unwrap(),
            vec!["submit", "Office Move", "Initech", "Move two floors"]
        );
        assert_eq!(split_line(r#"approve 3 --notes """#).unwrap(), vec!["approve", "3", "--notes", ""]);
        assert!(split_line("   ").unwrap().is_empty());
        assert!(split_line(r#"submit "open"#).is_err());
    }

    #[test]
    fn test_switching_roles_and_manager_approval() {
        let mut session = session();
        assert_eq!(session.current_role(), Role::Sales);
        run(&mut session, "role admin");
        assert_eq!(pending_count(session.current_role(), session.store().list()), 0);
        run(&mut session, "role manager");
        assert_eq!(pending_count(session.current_role(), session.store().list()), 1);
        let text = run(&mut session, r#"approve 3 --notes "Budget confirmed""#);
        assert_eq!(text, "Database Migration is now approved\n");
        assert_eq!(status(&session, "3"), Status::Approved);
        assert_eq!(pending_count(session.current_role(), session.store().list()), 0);
    }

    #[test]
    fn test_submit_as_sales() {
        let mut session = session();
        let text = run(&mut session, "submit X Y Z");
        assert!(text.starts_with("Submitted X as "));
        let project = session.store().list().last().unwrap();
        assert_eq!(project.status, Status::Draft);
        assert_eq!(project.created_by, Role::Sales);
        assert!(!["1", "2", "3"].contains(&project.id.0.as_str()));
    }

    #[test]
    fn test_wrong_role_is_refused() {
        let mut session = session();
        let mut out = Vec::new();
        let err = session.execute("attend 1", &mut out).unwrap_err();
        assert!(err.to_string().contains("not allowed"));
        assert_eq!(status(&session, "1"), Status::Scheduled);
    }

    #[test]
    fn test_unknown_project_is_reported() {
        let mut session = session();
        session.set_current_role(Role::Technician);
        let mut out = Vec::new();
        let err = session.execute("attend 99", &mut out).unwrap_err();
        assert_eq!(err.to_string(), "no project with id 99");
    }

    #[test]
    fn test_scripted_pipeline() {
        let mut session = session();
        let script = r#"
            # technician starts the seeded scheduled project
            role technician
            attend 1
            progress 1 --percent 90 --notes "Almost there"
            role supervisor
            validate 1 --report "Client signed off"
            role manager
            finalize 1 done
            quit
            role admin
        "#;
        let mut out = Vec::new();
        session.run(script.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("error"), "{text}");
        let project = session.store().get(&ProjectId::from("1")).unwrap();
        assert_eq!(project.status, Status::Done);
        assert_eq!(project.progress, Some(90));
        assert_eq!(project.report.as_deref(), Some("Client signed off"));
        assert_eq!(session.current_role(), Role::Manager);
    }

    #[test]
    fn test_failed_commands_do_not_stop_the_session() {
        let mut session = session();
        let script = "role supervisor\nschedule 2 --date 2024-03-04\nschedule 2 --date 2024-03-04 --technician \"Jane Smith\"\n";
        let mut out = Vec::new();
        session.run(script.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("error: missing required field: assigned technicians"));
        assert!(text.contains("Mobile App Development is now scheduled"));
        assert_eq!(status(&session, "2"), Status::Scheduled);
    }

    #[test]
    fn test_register_draft() {
        let mut session = session();
        run(&mut session, "submit Kiosk Initech \"Lobby kiosk\"");
        let id = session.store().list().last().unwrap().id.clone();
        run(&mut session, "role admin");
        run(
            &mut session,
            &format!(
                "register {id} --priority urgent --budget 2500 --deadline 2024-05-01 --requirements \"Touch screen\""
            ),
        );
        let project = session.store().get(&id).unwrap();
        assert_eq!(project.status, Status::Registered);
        assert_eq!(
            project.registration.as_ref().map(|r| r.priority),
            Some(Priority::Urgent)
        );
    }

    #[test]
    fn test_dashboard_and_export() {
        let mut session = session();
        run(&mut session, "role supervisor");
        let text = run(&mut session, "dashboard");
        assert!(text.contains("  - Dashboard (1)"));
        assert!(text.contains("Available Technicians: 6"));
        let csv = run(&mut session, "export");
        assert_eq!(csv.lines().count(), 3);
        let csv = run(&mut session, "export --all");
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn test_progress_requires_notes() {
        let mut session = session();
        session.set_current_role(Role::Technician);
        run(&mut session, "attend 1");
        let mut out = Vec::new();
        let err = session.execute("progress 1 --percent 50", &mut out).unwrap_err();
        assert!(err.to_string().contains("--notes"));
        let err = session
            .execute(r#"progress 1 --percent 50 --notes """#, &mut out)
            .unwrap_err();
        assert_eq!(err.to_string(), "missing required field: progress notes");
        let err = session
            .execute("progress 1 --percent 0 --notes Started", &mut out)
            .unwrap_err();
        assert!(err.to_string().contains("progress"));
        run(&mut session, r#"progress 1 --percent 50 --notes "Half the racks""#);
        let project = session.store().get(&ProjectId::from("1")).unwrap();
        assert_eq!(project.progress, Some(50));
        assert_eq!(project.progress_notes.as_deref(), Some("Half the racks"));
    }

    #[test]
    fn test_json_export_follows_visibility() {
        let mut session = session();
        run(&mut session, "role technician");
        let json = run(&mut session, "export --json");
        let records: serde_json::Value = serde_json::from_str(&json).unwrap();
        let records = records.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["id"], "1");
        assert_eq!(records[0]["assignedTechnicians"][1], "Jane Smith");
        let json = run(&mut session, "export --all --json");
        let records: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(records.as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_help_is_printed_not_failed() {
        let mut session = session();
        let text = run(&mut session, "help");
        assert!(text.contains("finalize"));
    }

    #[test]
    fn test_unknown_command_is_an_error() {
        let mut session = session();
        let mut out = Vec::new();
        let err = session.execute("teleport 1", &mut out).unwrap_err();
        assert!(err.to_string().contains("teleport"));
        assert!(!err.to_string().starts_with("error:"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_permissive_session() {
        let mut config = Config::default();
        config.transitions.policy = TransitionPolicy::Permissive;
        let mut session = Session::new(config, Box::new(ManualClock::new()));
        run(&mut session, "finalize 2 cancelled");
        assert_eq!(status(&session, "2"), Status::Cancelled);
    }

    #[test]
    fn test_unseeded_session_starts_empty() {
        let mut config = Config::default();
        config.session.seed = false;
        config.session.initial_role = Role::Admin;
        let mut session = Session::new(config, Box::new(ManualClock::new()));
        assert!(session.store().list().is_empty());
        assert_eq!(run(&mut session, "list"), "No projects to show\n");
    }
}
