//! Budget period display formatting

use tabled::Tabled;

use crate::models::{BudgetPeriod, Money};
use crate::services::CategorySummary;

use super::category::format_category_summary;
use super::{render_table, DisplayFormat};

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Active")]
    active: &'static str,
}

/// Format budget periods as a table
pub fn format_budget_list(budgets: &[BudgetPeriod], format: &DisplayFormat) -> String {
    if budgets.is_empty() {
        return "No budgets found.\n\nCreate one with 'budget budget create'.\n".to_string();
    }

    let rows = budgets
        .iter()
        .map(|b| BudgetRow {
            id: b.id.to_string(),
            start: format.date(b.start_date),
            end: format.date(b.end_date),
            total: format.money(b.total_budget),
            active: if b.is_active { "yes" } else { "no" },
        })
        .collect();

    render_table(rows)
}

/// Format one period with its totals and category breakdown
pub fn format_budget_details(
    budget: &BudgetPeriod,
    total_income: Money,
    total_spent: Money,
    remaining: Money,
    categories: &[CategorySummary],
    format: &DisplayFormat,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Budget:      {}\n", budget.id));
    output.push_str(&format!(
        "Period:      {} to {} ({} days)\n",
        format.date(budget.start_date),
        format.date(budget.end_date),
        budget.length_in_days()
    ));
    output.push_str(&format!("Total:       {}\n", format.money(budget.total_budget)));
    output.push_str(&format!("Income:      {}\n", format.money(total_income)));
    output.push_str(&format!("Spent:       {}\n", format.money(total_spent)));
    output.push_str(&format!("Remaining:   {}\n", format.money(remaining)));
    if !budget.is_active {
        output.push_str("Status:      inactive\n");
    }

    output.push('\n');
    output.push_str(&format_category_summary(categories, format));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Email;
    use chrono::NaiveDate;

    #[test]
    fn test_budget_list() {
        let budget = BudgetPeriod::new(
            Email::new("alice@example.com"),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            None,
            Money::from_units(1000),
            30,
        )
        .unwrap();
        let output = format_budget_list(&[budget], &DisplayFormat::default());
        assert!(output.contains("2025-01-01"));
        assert!(output.contains("2025-01-31"));
        assert!(output.contains("$1000.00"));
    }

    #[test]
    fn test_details_use_configured_symbol() {
        let budget = BudgetPeriod::new(
            Email::new("alice@example.com"),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            None,
            Money::from_units(1000),
            30,
        )
        .unwrap();
        let format = DisplayFormat {
            currency_symbol: "€".to_string(),
            date_format: "%d/%m/%Y".to_string(),
        };
        let output = format_budget_details(
            &budget,
            Money::zero(),
            Money::from_units(200),
            Money::from_units(800),
            &[],
            &format,
        );
        assert!(output.contains("01/01/2025 to 31/01/2025"));
        assert!(output.contains("€800.00"));
        assert!(!output.contains('$'));
    }

    #[test]
    fn test_empty_list() {
        assert!(format_budget_list(&[], &DisplayFormat::default()).contains("No budgets found"));
    }
}
