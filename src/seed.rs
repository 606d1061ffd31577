use crate::model::{Project, ProjectId, Role, Status};
use chrono::{DateTime, NaiveDate, Utc};

fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

fn seed(id: &str, title: &str, client: &str, description: &str, status: Status) -> Project {
    Project {
        id: ProjectId::from(id),
        title: title.into(),
        client: client.into(),
        description: description.into(),
        status,
        created_by: Role::Sales,
        assigned_technicians: None,
        scheduled_date: None,
        progress: None,
        report: None,
        progress_notes: None,
        registration: None,
        review_notes: None,
        created_at: DateTime::default(),
        updated_at: DateTime::default(),
    }
}

/// The collection every fresh session starts from.
pub fn seed_projects() -> Vec<Project> {
    vec![
        Project {
            assigned_technicians: Some(vec!["John Doe".into(), "Jane Smith".into()]),
            scheduled_date: Some("2024-02-15".into()),
            progress: Some(45),
            created_at: day(2024, 1, 15),
            updated_at: day(2024, 1, 20),
            ..seed(
                "1",
                "Website Redesign",
                "Acme Corp",
                "Complete website redesign with modern UI/UX",
                Status::Scheduled,
            )
        },
        Project {
            created_at: day(2024, 1, 18),
            updated_at: day(2024, 1, 18),
            ..seed(
                "2",
                "Mobile App Development",
                "Tech Solutions",
                "Native mobile app for iOS and Android",
                Status::Approved,
            )
        },
        Project {
            created_by: Role::Admin,
            created_at: day(2024, 1, 20),
            updated_at: day(2024, 1, 20),
            ..seed(
                "3",
                "Database Migration",
                "DataFlow Inc",
                "Migrate legacy database to cloud infrastructure",
                Status::Registered,
            )
        },
    ]
}

#[test]
fn test_seed_collection() {
    let projects = seed_projects();
    let statuses = projects.iter().map(|p| p.status).collect::<Vec<_>>();
    assert_eq!(
        statuses,
        vec![Status::Scheduled, Status::Approved, Status::Registered]
    );
    assert!(projects.iter().all(|p| p.created_at <= p.updated_at));
    assert_eq!(projects[0].created_at.to_rfc3339(), "2024-01-15T00:00:00+00:00");
    assert_eq!(projects[2].created_by, Role::Admin);
}
