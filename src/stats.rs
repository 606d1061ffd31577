use crate::model::{Project, Role, Status};
use crate::views::visible_projects;
use chrono::NaiveDate;

/// Counters shown at the top of each role's dashboard.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DashboardStats {
    Sales {
        submissions: usize,
        under_review: usize,
        approved: usize,
    },
    Admin {
        pending_registration: usize,
        registered: usize,
        active: usize,
        total: usize,
    },
    Manager {
        pending_review: usize,
        active: usize,
        awaiting_final_review: usize,
        completion_rate: u32,
    },
    Supervisor {
        ready_to_schedule: usize,
        scheduled: usize,
        in_progress: usize,
        available_technicians: usize,
    },
    Technician {
        assigned: usize,
        in_progress: usize,
        scheduled_today: usize,
    },
}

fn count(projects: &[&Project], condition: impl Fn(Status) -> bool) -> usize {
    projects.iter().filter(|p| condition(p.status)).count()
}

/// Share of `done` projects, as a rounded percentage.
pub fn completion_rate(projects: &[Project]) -> u32 {
    if projects.is_empty() {
        return 0;
    }
    let done = projects.iter().filter(|p| p.status == Status::Done).count();
    (100.0 * done as f64 / projects.len() as f64).round() as u32
}

pub fn statistics(
    role: Role,
    projects: &[Project],
    technician: &str,
    technicians: &[String],
    today: NaiveDate,
) -> DashboardStats {
    let all = projects.iter().collect::<Vec<_>>();
    let mine = visible_projects(role, projects, technician);
    match role {
        Role::Sales => DashboardStats::Sales {
            submissions: mine.len(),
            under_review: count(&mine, |s| matches!(s, Status::Draft | Status::Registered)),
            approved: count(&mine, Status::is_active),
        },
        Role::Admin => DashboardStats::Admin {
            pending_registration: count(&all, |s| s == Status::Draft),
            registered: count(&all, |s| s == Status::Registered),
            active: count(&all, |s| matches!(s, Status::Scheduled | Status::InProgress)),
            total: all.len(),
        },
        Role::Manager => DashboardStats::Manager {
            pending_review: count(&all, |s| s == Status::Registered),
            active: count(&all, Status::is_active),
            awaiting_final_review: count(&all, |s| s == Status::Completed),
            completion_rate: completion_rate(projects),
        },
        Role::Supervisor => DashboardStats::Supervisor {
            ready_to_schedule: count(&all, |s| s == Status::Approved),
            scheduled: count(&all, |s| s == Status::Scheduled),
            in_progress: count(&all, |s| s == Status::InProgress),
            available_technicians: technicians.len(),
        },
        Role::Technician => {
            let today = today.format("%Y-%m-%d").to_string();
            DashboardStats::Technician {
                assigned: mine.len(),
                in_progress: count(&mine, |s| s == Status::InProgress),
                scheduled_today: mine
                    .iter()
                    .filter(|p| p.scheduled_date.as_deref() == Some(today.as_str()))
                    .count(),
            }
        }
    }
}

impl DashboardStats {
    pub fn cards(&self) -> Vec<(&'static str, String)> {
        match *self {
            DashboardStats::Sales {
                submissions,
                under_review,
                approved,
            } => vec![
                ("Total Submissions", submissions.to_string()),
                ("Under Review", under_review.to_string()),
                ("Approved", approved.to_string()),
            ],
            DashboardStats::Admin {
                pending_registration,
                registered,
                active,
                total,
            } => vec![
                ("Pending Registration", pending_registration.to_string()),
                ("Registered", registered.to_string()),
                ("Active Projects", active.to_string()),
                ("Total Projects", total.to_string()),
            ],
            DashboardStats::Manager {
                pending_review,
                active,
                awaiting_final_review,
                completion_rate,
            } => vec![
                ("Pending Review", pending_review.to_string()),
                ("Active Projects", active.to_string()),
                ("Awaiting Final Review", awaiting_final_review.to_string()),
                ("Completion Rate", format!("{completion_rate}%")),
            ],
            DashboardStats::Supervisor {
                ready_to_schedule,
                scheduled,
                in_progress,
                available_technicians,
            } => vec![
                ("Ready to Schedule", ready_to_schedule.to_string()),
                ("Scheduled", scheduled.to_string()),
                ("In Progress", in_progress.to_string()),
                ("Available Technicians", available_technicians.to_string()),
            ],
            DashboardStats::Technician {
                assigned,
                in_progress,
                scheduled_today,
            } => vec![
                ("Assigned Projects", assigned.to_string()),
                ("In Progress", in_progress.to_string()),
                ("Scheduled Today", scheduled_today.to_string()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_projects;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()
    }

    fn team() -> Vec<String> {
        vec!["John Doe".into(), "Jane Smith".into()]
    }

    #[test]
    fn test_seed_statistics() {
        let projects = seed_projects();
        let stats = |role| statistics(role, &projects, "John Doe", &team(), today());
        assert_eq!(
            stats(Role::Sales),
            DashboardStats::Sales {
                submissions: 2,
                under_review: 0,
                approved: 2
            }
        );
        assert_eq!(
            stats(Role::Admin),
            DashboardStats::Admin {
                pending_registration: 0,
                registered: 1,
                active: 1,
                total: 3
            }
        );
        assert_eq!(
            stats(Role::Manager),
            DashboardStats::Manager {
                pending_review: 1,
                active: 2,
                awaiting_final_review: 0,
                completion_rate: 0
            }
        );
        assert_eq!(
            stats(Role::Supervisor),
            DashboardStats::Supervisor {
                ready_to_schedule: 1,
                scheduled: 1,
                in_progress: 0,
                available_technicians: 2
            }
        );
        assert_eq!(
            stats(Role::Technician),
            DashboardStats::Technician {
                assigned: 1,
                in_progress: 0,
                scheduled_today: 1
            }
        );
    }

    #[test]
    fn test_completion_rate() {
        assert_eq!(completion_rate(&[]), 0);
        let mut projects = seed_projects();
        projects[0].status = Status::Done;
        assert_eq!(completion_rate(&projects), 33);
        projects[1].status = Status::Done;
        assert_eq!(completion_rate(&projects), 67);
    }

    #[test]
    fn test_cards_follow_stats() {
        let projects = seed_projects();
        let cards = statistics(Role::Manager, &projects, "John Doe", &team(), today()).cards();
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[3], ("Completion Rate", "0%".to_owned()));
    }
}
