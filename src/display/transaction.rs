//! Transaction display formatting

use tabled::Tabled;

use crate::models::{Money, Transaction};

use super::{render_table, truncate, DisplayFormat};

#[derive(Tabled)]
struct RegisterRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Note")]
    note: String,
}

/// Format transactions as a register, newest first as given.
///
/// `category_name` resolves a transaction's category for display.
pub fn format_transaction_register<F>(
    transactions: &[Transaction],
    category_name: F,
    format: &DisplayFormat,
) -> String
where
    F: Fn(&Transaction) -> Option<String>,
{
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows = transactions
        .iter()
        .map(|txn| RegisterRow {
            id: txn.id.to_string(),
            date: format.date(txn.date),
            kind: txn.transaction_type.to_string(),
            amount: format.money(txn.signed_amount()),
            category: category_name(txn).unwrap_or_else(|| "-".to_string()),
            note: truncate(txn.note.as_deref().unwrap_or(""), 30),
        })
        .collect();

    let net: Money = transactions.iter().map(|t| t.signed_amount()).sum();
    let mut output = render_table(rows);
    output.push_str(&format!("{} transaction(s), net {}\n", transactions.len(), format.money(net)));
    output
}

/// Format transaction details for display
pub fn format_transaction_details(
    txn: &Transaction,
    category_name: Option<&str>,
    format: &DisplayFormat,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Type:        {}\n", txn.transaction_type));
    output.push_str(&format!("Date:        {}\n", format.date(txn.date)));
    output.push_str(&format!("Amount:      {}\n", format.money(txn.amount)));
    output.push_str(&format!(
        "Category:    {}\n",
        category_name.unwrap_or("(uncategorized)")
    ));
    if let Some(note) = &txn.note {
        output.push_str(&format!("Note:        {}\n", note));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BudgetId;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()
    }

    #[test]
    fn test_register() {
        let budget_id = BudgetId::new();
        let transactions = vec![
            Transaction::expense(budget_id, Money::from_units(200), date()).with_note("groceries"),
            Transaction::income(budget_id, Money::from_units(50), date()),
        ];
        let output = format_transaction_register(
            &transactions,
            |t| t.is_expense().then(|| "Food & Dining".to_string()),
            &DisplayFormat::default(),
        );
        assert!(output.contains("-$200.00"));
        assert!(output.contains("groceries"));
        assert!(output.contains("Food & Dining"));
        assert!(output.contains("net -$150.00"));
    }

    #[test]
    fn test_details_uncategorized() {
        let txn = Transaction::expense(BudgetId::new(), Money::from_units(12), date());
        let output = format_transaction_details(&txn, None, &DisplayFormat::default());
        assert!(output.contains("(uncategorized)"));
        assert!(!output.contains("Note:"));
    }
}
