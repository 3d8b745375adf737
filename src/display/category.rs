//! Category display formatting
//!
//! Formats categories as plain lists and as the allocated/spent breakdown.

use tabled::Tabled;

use crate::models::{Category, Money};
use crate::services::CategorySummary;

use super::{render_table, truncate, DisplayFormat};

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Allocated")]
    allocated: String,
    #[tabled(rename = "Color")]
    color: String,
}

#[derive(Tabled)]
struct CategorySummaryRow {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Allocated")]
    allocated: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Used")]
    percentage: String,
}

/// Format the categories of a period as a table
pub fn format_category_list(categories: &[Category], format: &DisplayFormat) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'budget category setup' to create the defaults.\n"
            .to_string();
    }

    let rows = categories
        .iter()
        .map(|c| CategoryRow {
            id: c.id.to_string(),
            name: truncate(&c.name, 28),
            kind: c
                .category_type
                .map(|t| t.key().to_string())
                .unwrap_or_else(|| "custom".to_string()),
            allocated: format.money(c.allocated_amount),
            color: c.color.clone(),
        })
        .collect();

    render_table(rows)
}

/// Format the allocated/spent/remaining breakdown, with a totals row.
///
/// Overspent categories are marked with "*".
pub fn format_category_summary(summary: &[CategorySummary], format: &DisplayFormat) -> String {
    if summary.is_empty() {
        return "No categories.\n".to_string();
    }

    let mut rows: Vec<CategorySummaryRow> = summary
        .iter()
        .map(|s| CategorySummaryRow {
            name: truncate(&s.category.name, 28),
            allocated: format.money(s.allocated),
            spent: format.money(s.spent),
            remaining: if s.remaining.is_negative() {
                format!("{} *", format.money(s.remaining))
            } else {
                format.money(s.remaining)
            },
            percentage: s.percentage.to_string(),
        })
        .collect();

    let allocated: Money = summary.iter().map(|s| s.allocated).sum();
    let spent: Money = summary.iter().map(|s| s.spent).sum();
    rows.push(CategorySummaryRow {
        name: "TOTAL".to_string(),
        allocated: format.money(allocated),
        spent: format.money(spent),
        remaining: format.money(allocated - spent),
        percentage: String::new(),
    });

    let mut output = render_table(rows);
    if summary.iter().any(|s| s.remaining.is_negative()) {
        output.push_str("* = Overspent\n");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetId, CategoryType, Percentage};

    #[test]
    fn test_category_list() {
        let budget_id = BudgetId::new();
        let categories = vec![
            Category::predefined(budget_id, CategoryType::Food, Money::from_units(300)),
            Category::custom(budget_id, "Pets", Money::zero()),
        ];
        let output = format_category_list(&categories, &DisplayFormat::default());
        assert!(output.contains("Food & Dining"));
        assert!(output.contains("food"));
        assert!(output.contains("custom"));
    }

    #[test]
    fn test_summary_marks_overspent() {
        let category = Category::predefined(BudgetId::new(), CategoryType::Food, Money::from_units(300));
        let summary = vec![CategorySummary {
            allocated: Money::from_units(300),
            spent: Money::from_units(350),
            remaining: Money::from_units(-50),
            percentage: Percentage::of(Money::from_units(350), Money::from_units(300)),
            category,
        }];
        let output = format_category_summary(&summary, &DisplayFormat::default());
        assert!(output.contains("-$50.00 *"));
        assert!(output.contains("116.67%"));
        assert!(output.contains("TOTAL"));
        assert!(output.contains("* = Overspent"));
    }
}
