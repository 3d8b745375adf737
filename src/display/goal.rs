//! Goal display formatting

use chrono::NaiveDate;
use tabled::Tabled;

use crate::models::Goal;

use super::{render_table, truncate, DisplayFormat};

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "%")]
    percentage: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Days left")]
    days_left: i64,
    #[tabled(rename = "Done")]
    done: &'static str,
}

/// Format goals as a table, with days remaining counted from `today`
pub fn format_goal_list(goals: &[Goal], today: NaiveDate, format: &DisplayFormat) -> String {
    if goals.is_empty() {
        return "No goals yet.\n".to_string();
    }

    let rows = goals
        .iter()
        .map(|g| GoalRow {
            id: g.id.to_string(),
            title: truncate(&g.title, 28),
            progress: format.money(g.current_progress),
            target: format.money(g.target_amount),
            percentage: g.progress_percentage().to_string(),
            due: format.date(g.target_date),
            days_left: g.days_remaining_from(today),
            done: if g.is_completed { "yes" } else { "" },
        })
        .collect();

    render_table(rows)
}

pub fn format_goal_details(goal: &Goal, today: NaiveDate, format: &DisplayFormat) -> String {
    let mut output = String::new();

    output.push_str(&format!("Goal:        {} ({})\n", goal.title, goal.id));
    output.push_str(&format!("Target:      {}\n", format.money(goal.target_amount)));
    output.push_str(&format!(
        "Progress:    {} ({})\n",
        format.money(goal.current_progress),
        goal.progress_percentage()
    ));
    output.push_str(&format!("Remaining:   {}\n", format.money(goal.remaining_amount())));
    output.push_str(&format!(
        "Due:         {} ({} days left)\n",
        format.date(goal.target_date),
        goal.days_remaining_from(today)
    ));
    if goal.is_completed {
        output.push_str("Status:      completed\n");
    }

    output
}
