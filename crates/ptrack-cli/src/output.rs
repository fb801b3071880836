//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use ptrack_core::project::model::Project;
use ptrack_core::task::model::Task;
use ptrack_core::user::model::User;
use std::collections::HashMap;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const BAR_WIDTH: usize = 20;

/// Render a percentage as a fixed-width bar.
pub fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled),
        percent
    )
}

fn colored_percent(percent: u8) -> ColoredString {
    let text = format!("{percent:>3}%");
    match percent {
        100 => text.green(),
        0 => text.dimmed(),
        _ => text.yellow(),
    }
}

/// Print projects as a table.
pub fn print_projects_table(projects: &[Project]) {
    if projects.is_empty() {
        println!(
            "{}",
            "No projects found. Create one with 'ptrack project new <name>'.".dimmed()
        );
        return;
    }

    println!("{:<36} {:<32} {:>8} {:>8}", "ID", "Name", "Members", "Progress");
    println!("{}", "─".repeat(87));

    for project in projects {
        println!("{}", project_row(project));
    }
}

/// One table row. The ID is printed whole so it can be pasted into other commands.
fn project_row(project: &Project) -> String {
    format!(
        "{:<36} {} {:>8} {:>8}",
        project.id,
        pad_visual(&truncate_visual(&project.name, 32), 32),
        project.members.len(),
        colored_percent(project.progress)
    )
}

/// Print a project with its tasks.
pub fn print_project(project: &Project, tasks: &[Task], users: &[User]) {
    let names = usernames(users);

    println!("{} {}", project.name.cyan().bold(), format!("({})", project.id).dimmed());
    println!();

    if !project.description.is_empty() {
        println!("{}", project.description);
        println!();
    }

    println!("{}: {}", "Owner".bold(), display_user(&names, &project.created_by));
    if project.members.is_empty() {
        println!("{}: {}", "Members".bold(), "none".dimmed());
    } else {
        let members: Vec<&str> = project
            .members
            .iter()
            .map(|m| display_user(&names, m))
            .collect();
        println!("{}: {}", "Members".bold(), members.join(", "));
    }
    println!("{}: {}", "Progress".bold(), progress_bar(project.progress));
    println!();

    print_tasks_table(tasks, users);
}

/// Print tasks as a table.
pub fn print_tasks_table(tasks: &[Task], users: &[User]) {
    if tasks.is_empty() {
        println!("{}", "No tasks found.".dimmed());
        return;
    }

    let names = usernames(users);

    println!(
        "{:<36} {:<30} {:<16} {:<6} {:>8}",
        "ID", "Name", "Assignee", "Done", "Progress"
    );
    println!("{}", "─".repeat(100));

    for task in tasks {
        println!("{}", task_row(task, &names));
    }
}

fn task_row(task: &Task, names: &HashMap<&str, &str>) -> String {
    let done = if task.completed { "yes".green() } else { "no".normal() };
    format!(
        "{:<36} {} {} {:<6} {:>8}",
        task.id,
        pad_visual(&truncate_visual(&task.name, 30), 30),
        pad_visual(&truncate_visual(display_user(names, &task.assigned_to), 16), 16),
        done,
        colored_percent(task.progress)
    )
}

/// Print users as a table.
pub fn print_users_table(users: &[User]) {
    if users.is_empty() {
        println!(
            "{}",
            "No users found. Create one with 'ptrack user create <username>'.".dimmed()
        );
        return;
    }

    println!("{:<36} {:<20} {:<28} {:<10}", "ID", "Username", "Email", "Role");
    println!("{}", "─".repeat(96));

    for user in users {
        let role = if user.is_administrator {
            "admin".yellow()
        } else {
            "user".normal()
        };
        println!(
            "{:<36} {} {} {}",
            user.id,
            pad_visual(&truncate_visual(&user.username, 20), 20),
            pad_visual(&truncate_visual(&user.email, 28), 28),
            role
        );
    }
}

fn usernames(users: &[User]) -> HashMap<&str, &str> {
    users
        .iter()
        .map(|u| (u.id.as_str(), u.username.as_str()))
        .collect()
}

fn display_user<'a>(names: &HashMap<&str, &'a str>, id: &'a str) -> &'a str {
    names.get(id).copied().unwrap_or(id)
}

/// Truncate to a display width, marking the cut with "..".
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}

/// Left-align to a display width; `format!` pads by chars, not columns.
fn pad_visual(s: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(used)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0), format!("[{}]   0%", "░".repeat(20)));
        assert_eq!(progress_bar(100), format!("[{}] 100%", "█".repeat(20)));
        assert_eq!(
            progress_bar(50),
            format!("[{}{}]  50%", "█".repeat(10), "░".repeat(10))
        );
    }

    #[test]
    fn test_rows_carry_full_ids() {
        colored::control::set_override(false);
        let project = Project {
            id: "7f1c2a9e-3b4d-4e5f-8a6b-0c1d2e3f4a5b".into(),
            name: "Launch".into(),
            description: String::new(),
            created_by: "u1".into(),
            members: vec!["u2".into()],
            progress: 33,
        };
        let row = project_row(&project);
        assert!(row.starts_with("7f1c2a9e-3b4d-4e5f-8a6b-0c1d2e3f4a5b "));
        assert!(row.ends_with("33%"));

        let task = Task {
            id: "0a1b2c3d-4e5f-4a6b-8c7d-9e0f1a2b3c4d".into(),
            name: "Copy".into(),
            description: String::new(),
            assigned_to: "u2".into(),
            project_id: project.id.clone(),
            completed: true,
            progress: 80,
        };
        let names = HashMap::from([("u2", "dev")]);
        let row = task_row(&task, &names);
        assert!(row.starts_with("0a1b2c3d-4e5f-4a6b-8c7d-9e0f1a2b3c4d "));
        assert!(row.contains("dev"));
    }

    #[test]
    fn test_truncate_visual() {
        assert_eq!(truncate_visual("short", 10), "short");
        assert_eq!(truncate_visual("a long project name", 10), "a long p..");
        assert_eq!(UnicodeWidthStr::width(truncate_visual("日本語のプロジェクト", 9).as_str()), 8);
    }
}
