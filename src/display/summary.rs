//! Summary display formatting

use tabled::Tabled;

use crate::models::{DailySummary, MonthlySummary};

use super::{render_table, DisplayFormat};

#[derive(Tabled)]
struct DailyRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Expense")]
    expense: String,
    #[tabled(rename = "Net")]
    net: String,
}

pub fn format_daily_summaries(days: &[DailySummary], format: &DisplayFormat) -> String {
    if days.is_empty() {
        return "No daily summaries yet.\n".to_string();
    }

    let rows = days
        .iter()
        .map(|d| DailyRow {
            date: format.date(d.date),
            income: format.money(d.total_income),
            expense: format.money(d.total_expense),
            net: format.money(d.net_amount),
        })
        .collect();

    render_table(rows)
}

pub fn format_monthly_summary(summary: &MonthlySummary, format: &DisplayFormat) -> String {
    let mut output = String::new();
    output.push_str(&format!("Income:        {}\n", format.money(summary.total_income)));
    output.push_str(&format!("Expense:       {}\n", format.money(summary.total_expense)));
    output.push_str(&format!(
        "Remaining:     {}\n",
        format.money(summary.remaining_balance)
    ));
    output.push_str(&format!("Savings rate:  {}\n", summary.savings_rate));
    output.push_str(&format!(
        "Updated:       {} {} UTC\n",
        format.date(summary.updated_at.date_naive()),
        summary.updated_at.format("%H:%M:%S")
    ));
    output
}
