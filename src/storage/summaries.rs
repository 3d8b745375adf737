//! Summary repository for JSON storage
//!
//! Daily and monthly summaries share summaries.json. Both are keyed by their
//! natural key rather than their ID: daily rows by (period, date), monthly
//! rows by period. An upsert keeps the existing row identity and only
//! replaces the figures.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::BudgetError;
use crate::models::{BudgetId, DailySummary, DailyTotals, MonthlySummary, MonthlyTotals};

use super::file_io::{lock_error, read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct SummaryData {
    #[serde(default)]
    daily: Vec<DailySummary>,
    #[serde(default)]
    monthly: Vec<MonthlySummary>,
}

/// Outcome of an upsert on a summary row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upserted<T> {
    /// No row existed for the key
    Created(T),
    /// The row existed and its figures changed
    Updated { before: T, after: T },
    /// The row existed with identical figures; nothing was written
    Unchanged(T),
}

impl<T> Upserted<T> {
    /// The row as stored after the upsert
    pub fn row(&self) -> &T {
        match self {
            Upserted::Created(row) | Upserted::Unchanged(row) => row,
            Upserted::Updated { after, .. } => after,
        }
    }

    pub fn into_row(self) -> T {
        match self {
            Upserted::Created(row) | Upserted::Unchanged(row) => row,
            Upserted::Updated { after, .. } => after,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Upserted::Created(_))
    }

    pub fn is_changed(&self) -> bool {
        !matches!(self, Upserted::Unchanged(_))
    }
}

#[derive(Default)]
struct Rows {
    daily: BTreeMap<(BudgetId, NaiveDate), DailySummary>,
    monthly: HashMap<BudgetId, MonthlySummary>,
}

/// Repository for daily and monthly summary persistence
pub struct SummaryRepository {
    path: PathBuf,
    rows: RwLock<Rows>,
}

impl SummaryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            rows: RwLock::new(Rows::default()),
        }
    }

    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: SummaryData = read_json(&self.path)?;

        let mut rows = self.rows.write().map_err(lock_error)?;
        *rows = Rows::default();
        for day in file_data.daily {
            rows.daily.insert((day.budget_id, day.date), day);
        }
        for month in file_data.monthly {
            rows.monthly.insert(month.budget_id, month);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), BudgetError> {
        let rows = self.rows.read().map_err(lock_error)?;

        let daily: Vec<_> = rows.daily.values().cloned().collect();
        let mut monthly: Vec<_> = rows.monthly.values().cloned().collect();
        monthly.sort_by_key(|m| m.budget_id);

        write_json_atomic(&self.path, &SummaryData { daily, monthly })
    }

    pub fn get_daily(
        &self,
        budget_id: BudgetId,
        date: NaiveDate,
    ) -> Result<Option<DailySummary>, BudgetError> {
        let rows = self.rows.read().map_err(lock_error)?;
        Ok(rows.daily.get(&(budget_id, date)).cloned())
    }

    /// Daily rows of a period in ascending date order
    pub fn daily_for_budget(&self, budget_id: BudgetId) -> Result<Vec<DailySummary>, BudgetError> {
        let rows = self.rows.read().map_err(lock_error)?;
        Ok(rows
            .daily
            .values()
            .filter(|d| d.budget_id == budget_id)
            .cloned()
            .collect())
    }

    pub fn get_monthly(&self, budget_id: BudgetId) -> Result<Option<MonthlySummary>, BudgetError> {
        let rows = self.rows.read().map_err(lock_error)?;
        Ok(rows.monthly.get(&budget_id).cloned())
    }

    /// Create or refresh the daily row for (period, date)
    pub fn upsert_daily(
        &self,
        budget_id: BudgetId,
        date: NaiveDate,
        totals: DailyTotals,
    ) -> Result<Upserted<DailySummary>, BudgetError> {
        let mut rows = self.rows.write().map_err(lock_error)?;

        match rows.daily.get_mut(&(budget_id, date)) {
            Some(existing) => {
                let before = existing.clone();
                if existing.apply(totals) {
                    Ok(Upserted::Updated {
                        before,
                        after: existing.clone(),
                    })
                } else {
                    Ok(Upserted::Unchanged(before))
                }
            }
            None => {
                let created = DailySummary::new(budget_id, date, totals);
                rows.daily.insert((budget_id, date), created.clone());
                Ok(Upserted::Created(created))
            }
        }
    }

    /// Create or refresh the monthly row of a period
    pub fn upsert_monthly(
        &self,
        budget_id: BudgetId,
        totals: MonthlyTotals,
    ) -> Result<Upserted<MonthlySummary>, BudgetError> {
        let mut rows = self.rows.write().map_err(lock_error)?;

        match rows.monthly.get_mut(&budget_id) {
            Some(existing) => {
                let before = existing.clone();
                if existing.apply(totals) {
                    Ok(Upserted::Updated {
                        before,
                        after: existing.clone(),
                    })
                } else {
                    Ok(Upserted::Unchanged(before))
                }
            }
            None => {
                let created = MonthlySummary::new(budget_id, totals);
                rows.monthly.insert(budget_id, created.clone());
                Ok(Upserted::Created(created))
            }
        }
    }

    /// Remove all summary rows of a period
    pub fn delete_for_budget(
        &self,
        budget_id: BudgetId,
    ) -> Result<(Vec<DailySummary>, Option<MonthlySummary>), BudgetError> {
        let mut rows = self.rows.write().map_err(lock_error)?;

        let keys: Vec<_> = rows
            .daily
            .keys()
            .filter(|(id, _)| *id == budget_id)
            .copied()
            .collect();
        let daily = keys
            .iter()
            .filter_map(|key| rows.daily.remove(key))
            .collect();
        let monthly = rows.monthly.remove(&budget_id);

        Ok((daily, monthly))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, SummaryRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = SummaryRepository::new(temp_dir.path().join("summaries.json"));
        repo.load().unwrap();
        (temp_dir, repo)
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn test_daily_upsert_keeps_identity() {
        let (_temp, repo) = create_test_repo();
        let budget_id = BudgetId::new();

        let first = repo
            .upsert_daily(budget_id, date(5), DailyTotals::new(Money::zero(), Money::from_units(200)))
            .unwrap();
        assert!(first.is_created());
        let id = first.row().id;

        let second = repo
            .upsert_daily(budget_id, date(5), DailyTotals::new(Money::zero(), Money::from_units(250)))
            .unwrap();
        assert!(matches!(second, Upserted::Updated { .. }));
        assert_eq!(second.row().id, id);
        assert_eq!(second.row().net_amount, Money::from_units(-250));

        assert_eq!(repo.daily_for_budget(budget_id).unwrap().len(), 1);
    }

    #[test]
    fn test_identical_upsert_is_unchanged() {
        let (_temp, repo) = create_test_repo();
        let budget_id = BudgetId::new();
        let totals = MonthlyTotals::new(Money::from_units(1000), Money::zero(), Money::from_units(200));

        let first = repo.upsert_monthly(budget_id, totals).unwrap().into_row();
        let again = repo.upsert_monthly(budget_id, totals).unwrap();

        assert!(!again.is_changed());
        assert_eq!(again.row(), &first);
    }

    #[test]
    fn test_delete_for_budget_and_reload() {
        let (temp, repo) = create_test_repo();
        let keep = BudgetId::new();
        let drop = BudgetId::new();
        let totals = DailyTotals::new(Money::from_units(5), Money::zero());
        repo.upsert_daily(keep, date(1), totals).unwrap();
        repo.upsert_daily(drop, date(1), totals).unwrap();
        repo.upsert_daily(drop, date(2), totals).unwrap();
        repo.upsert_monthly(drop, MonthlyTotals::default()).unwrap();

        let (daily, monthly) = repo.delete_for_budget(drop).unwrap();
        assert_eq!(daily.len(), 2);
        assert!(monthly.is_some());
        repo.save().unwrap();

        let reloaded = SummaryRepository::new(temp.path().join("summaries.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.daily_for_budget(keep).unwrap().len(), 1);
        assert!(reloaded.daily_for_budget(drop).unwrap().is_empty());
        assert!(reloaded.get_monthly(drop).unwrap().is_none());
    }
}
