//! Savings goal model
//!
//! Long-term targets owned by a user. Progress is entered by hand and is not
//! derived from transactions.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::GoalId;
use super::money::Money;
use super::percentage::Percentage;
use super::user::Email;

/// A long-term savings goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub owner: Email,
    pub title: String,
    pub target_amount: Money,
    #[serde(default)]
    pub current_progress: Money,
    pub target_date: NaiveDate,
    #[serde(default)]
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(
        owner: Email,
        title: impl Into<String>,
        target_amount: Money,
        target_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: GoalId::new(),
            owner,
            title: title.into().trim().to_string(),
            target_amount,
            current_progress: Money::zero(),
            target_date,
            is_completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// `current_progress / target_amount * 100`, or zero when the target is not positive
    pub fn progress_percentage(&self) -> Percentage {
        Percentage::of(self.current_progress, self.target_amount)
    }

    /// What is left to save; negative once the goal is exceeded
    pub fn remaining_amount(&self) -> Money {
        self.target_amount - self.current_progress
    }

    /// Whole days from `today` until the target date, never negative
    pub fn days_remaining_from(&self, today: NaiveDate) -> i64 {
        (self.target_date - today).num_days().max(0)
    }

    /// Days remaining counted from the local calendar date
    pub fn days_remaining(&self) -> i64 {
        self.days_remaining_from(Local::now().date_naive())
    }

    pub fn set_progress(&mut self, progress: Money) {
        self.current_progress = progress;
        self.updated_at = Utc::now();
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.is_completed = completed;
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Vec<GoalValidationError> {
        let mut errors = Vec::new();
        if self.title.is_empty() {
            errors.push(GoalValidationError::EmptyTitle);
        } else if self.title.chars().count() > 200 {
            errors.push(GoalValidationError::TitleTooLong(self.title.chars().count()));
        }
        if !self.target_amount.is_positive() {
            errors.push(GoalValidationError::NonPositiveTarget);
        } else if self.target_amount.exceeds_max() {
            errors.push(GoalValidationError::TargetTooLarge(self.target_amount));
        }
        if self.current_progress.is_negative() {
            errors.push(GoalValidationError::NegativeProgress);
        } else if self.current_progress.exceeds_max() {
            errors.push(GoalValidationError::ProgressTooLarge(self.current_progress));
        }
        errors
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}/{}",
            self.title, self.current_progress, self.target_amount
        )
    }
}

/// Validation errors for goals
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyTitle,
    TitleTooLong(usize),
    NonPositiveTarget,
    TargetTooLarge(Money),
    NegativeProgress,
    ProgressTooLarge(Money),
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Goal title is required"),
            Self::TitleTooLong(len) => write!(f, "Goal title too long ({} chars, max 200)", len),
            Self::NonPositiveTarget => write!(f, "Target amount must be greater than zero"),
            Self::TargetTooLarge(amount) => {
                write!(f, "Target amount must be at most {} (got {})", Money::MAX, amount)
            }
            Self::NegativeProgress => write!(f, "Progress cannot be negative"),
            Self::ProgressTooLarge(amount) => {
                write!(f, "Progress must be at most {} (got {})", Money::MAX, amount)
            }
        }
    }
}

impl std::error::Error for GoalValidationError {}
