use crate::dates::{DateDisplay, DisplayFormat};
use crate::model::{Project, Status};
use crate::stats::DashboardStats;
use crate::views::{RoleView, available_actions};
use chrono::{DateTime, Utc};
use std::io::{self, Write};

/// Badge colour for each status, shared by every dashboard.
pub fn status_color(status: Status) -> &'static str {
    match status {
        Status::Draft => "gray",
        Status::Registered => "blue",
        Status::Approved => "green",
        Status::Rejected => "red",
        Status::Scheduled => "purple",
        Status::InProgress => "yellow",
        Status::Completed => "emerald",
        Status::Done => "green",
        Status::Cancelled => "red",
        Status::Pending => "orange",
    }
}

pub fn display_sidebar(out: &mut impl Write, view: &RoleView<'_>) -> io::Result<()> {
    writeln!(out, "ProjectFlow")?;
    writeln!(out, "Navigation:")?;
    for item in view.menu {
        write!(out, "  - {}", item.title)?;
        if item.id == "dashboard" && view.pending_count > 0 {
            write!(out, " ({})", view.pending_count)?;
        }
        writeln!(out)?;
    }
    writeln!(out, "Logged in as: {}", view.label)
}

pub fn display_dashboard(
    out: &mut impl Write,
    view: &RoleView<'_>,
    stats: &DashboardStats,
    dates: &DateDisplay,
    now: DateTime<Utc>,
) -> io::Result<()> {
    writeln!(out, "{} dashboard", view.label)?;
    for (title, value) in stats.cards() {
        writeln!(out, "  {title}: {value}")?;
    }
    writeln!(out)?;
    if view.projects.is_empty() {
        writeln!(out, "No projects to show")?;
    }
    for project in &view.projects {
        display_summary(out, project, dates, now)?;
        let actions = available_actions(view.role, project);
        if !actions.is_empty() {
            let actions = actions.iter().map(|a| a.as_str()).collect::<Vec<_>>();
            writeln!(out, "      actions: {}", actions.join(", "))?;
        }
    }
    Ok(())
}

pub fn display_summary(
    out: &mut impl Write,
    project: &Project,
    dates: &DateDisplay,
    now: DateTime<Utc>,
) -> io::Result<()> {
    writeln!(
        out,
        "  [{}] {} - {} ({} / {}) updated {}",
        project.id,
        project.title,
        project.client,
        project.status,
        status_color(project.status),
        dates.render(&project.updated_at, now),
    )
}

pub fn display_details(
    out: &mut impl Write,
    project: &Project,
    dates: &DateDisplay,
    now: DateTime<Utc>,
) -> io::Result<()> {
    writeln!(out, "{} ({})", project.title, project.id)?;
    writeln!(out, "  client: {}", project.client)?;
    writeln!(out, "  description: {}", project.description)?;
    writeln!(out, "  status: {} ({})", project.status, status_color(project.status))?;
    writeln!(out, "  created by: {}", project.created_by)?;
    if let Some(registration) = &project.registration {
        writeln!(
            out,
            "  registration: priority {}, budget {}, deadline {}",
            registration.priority, registration.budget, registration.deadline
        )?;
        writeln!(out, "  requirements: {}", registration.requirements)?;
    }
    if let Some(notes) = &project.review_notes {
        writeln!(out, "  review notes: {notes}")?;
    }
    if let Some(technicians) = &project.assigned_technicians {
        writeln!(out, "  technicians: {}", technicians.join(", "))?;
    }
    if project.scheduled_date.is_some() {
        writeln!(out, "  scheduled: {}", dates.render(&project.scheduled_date, now))?;
    }
    if let Some(progress) = project.progress {
        writeln!(out, "  progress: {progress}%")?;
    }
    if let Some(notes) = &project.progress_notes {
        writeln!(out, "  progress notes: {notes}")?;
    }
    if let Some(report) = &project.report {
        writeln!(out, "  report: {report}")?;
    }
    let relative = DateDisplay {
        format: DisplayFormat::Relative,
        ..dates.clone()
    };
    writeln!(
        out,
        "  created {} ({}), updated {} ({})",
        dates.render(&project.created_at, now),
        relative.render(&project.created_at, now),
        dates.render(&project.updated_at, now),
        relative.render(&project.updated_at, now),
    )
}

/// Write the project list as CSV with one row per project.
pub fn write_csv<'a>(
    out: impl Write,
    projects: impl IntoIterator<Item = &'a Project>,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "id",
        "title",
        "client",
        "status",
        "created_by",
        "technicians",
        "scheduled_date",
        "progress",
        "created_at",
        "updated_at",
    ])?;
    for p in projects {
        let technicians = p
            .assigned_technicians
            .as_deref()
            .map(|t| t.join("; "))
            .unwrap_or_default();
        let progress = p.progress.map(|n| n.to_string()).unwrap_or_default();
        writer.write_record([
            p.id.0.as_str(),
            p.title.as_str(),
            p.client.as_str(),
            p.status.as_str(),
            p.created_by.as_str(),
            technicians.as_str(),
            p.scheduled_date.as_deref().unwrap_or_default(),
            progress.as_str(),
            p.created_at.to_rfc3339().as_str(),
            p.updated_at.to_rfc3339().as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the projects as a pretty-printed JSON array of records.
pub fn write_json(mut out: impl Write, projects: &[&Project]) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut out, projects)?;
    writeln!(out).map_err(serde_json::Error::io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use crate::seed::seed_projects;
    use crate::stats::statistics;
    use crate::views::select_view;
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 20, 12, 0, 0).unwrap()
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_every_status_has_a_color() {
        for status in Status::ALL {
            assert!(!status_color(status).is_empty());
        }
        assert_eq!(status_color(Status::Pending), "orange");
        assert_eq!(status_color(Status::InProgress), "yellow");
    }

    #[test]
    fn test_sidebar_badge_only_when_pending() {
        let projects = seed_projects();
        let manager = render(|out| display_sidebar(out, &select_view(Role::Manager, &projects, "")));
        assert!(manager.contains("  - Dashboard (1)\n"));
        assert!(manager.contains("Logged in as: Manager Operasional"));
        let admin = render(|out| display_sidebar(out, &select_view(Role::Admin, &projects, "")));
        assert!(admin.contains("  - Dashboard\n"));
    }

    #[test]
    fn test_dashboard_lists_actions() {
        let projects = seed_projects();
        let view = select_view(Role::Supervisor, &projects, "John Doe");
        let stats = statistics(
            Role::Supervisor,
            &projects,
            "John Doe",
            &[],
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
        );
        let text = render(|out| display_dashboard(out, &view, &stats, &DateDisplay::default(), now()));
        assert!(text.contains("Ready to Schedule: 1"));
        assert!(text.contains("[2] Mobile App Development"));
        assert!(text.contains("actions: schedule"));
        assert!(!text.contains("Database Migration"));
    }

    #[test]
    fn test_details_use_fallback_for_missing_dates() {
        let mut project = seed_projects().remove(1);
        project.scheduled_date = Some("someday".into());
        let text = render(|out| display_details(out, &project, &DateDisplay::default(), now()));
        assert!(text.contains("scheduled: --"));
        assert!(text.contains("created 01/18/2024 (2 days ago)"));
    }

    #[test]
    fn test_json_export_uses_record_field_names() {
        let projects = seed_projects();
        let mut out = Vec::new();
        write_json(&mut out, &projects.iter().collect::<Vec<_>>()).unwrap();
        let records: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let first = &records[0];
        assert_eq!(first["status"], "scheduled");
        assert_eq!(first["createdBy"], "sales");
        assert_eq!(first["scheduledDate"], "2024-02-15");
        assert_eq!(first["progress"], 45);
        assert!(first["reviewNotes"].is_null());
        let created = first["createdAt"].as_str().unwrap();
        assert_eq!(
            DateTime::parse_from_rfc3339(created).unwrap(),
            projects[0].created_at
        );
        assert!(first.get("created_at").is_none());
    }

    #[test]
    fn test_csv_export() {
        let projects = seed_projects();
        let mut out = Vec::new();
        write_csv(&mut out, &projects).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("id,title,client,status"));
        assert!(lines[1].starts_with(
            "1,Website Redesign,Acme Corp,scheduled,sales,John Doe; Jane Smith,2024-02-15,45,"
        ));
        assert!(lines[3].starts_with("3,Database Migration,DataFlow Inc,registered,admin,,,,"));
    }
}
