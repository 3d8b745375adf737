//! Category model
//!
//! Categories are spending buckets inside one budget period. Each has an
//! allocated amount; what has been spent is derived from transactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{BudgetId, CategoryId};
use super::money::Money;

/// Colour used when none is given
pub const DEFAULT_CATEGORY_COLOR: &str = "#3B82F6";

/// The predefined category types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Food,
    Transport,
    Shopping,
    Utilities,
    Entertainment,
    Health,
    Education,
    Savings,
    Other,
}

impl CategoryType {
    /// All predefined types in display order
    pub fn all() -> &'static [Self] {
        &[
            Self::Food,
            Self::Transport,
            Self::Shopping,
            Self::Utilities,
            Self::Entertainment,
            Self::Health,
            Self::Education,
            Self::Savings,
            Self::Other,
        ]
    }

    /// The stored key (e.g. "food")
    pub fn key(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Shopping => "shopping",
            Self::Utilities => "utilities",
            Self::Entertainment => "entertainment",
            Self::Health => "health",
            Self::Education => "education",
            Self::Savings => "savings",
            Self::Other => "other",
        }
    }

    /// Human-readable label (e.g. "Food & Dining")
    pub fn label(&self) -> &'static str {
        match self {
            Self::Food => "Food & Dining",
            Self::Transport => "Transportation",
            Self::Shopping => "Shopping",
            Self::Utilities => "Utilities",
            Self::Entertainment => "Entertainment",
            Self::Health => "Health & Fitness",
            Self::Education => "Education",
            Self::Savings => "Savings",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CategoryType {
    type Err = CategoryValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|t| t.key() == needle || t.label().to_lowercase() == needle)
            .ok_or_else(|| CategoryValidationError::UnknownType(s.to_string()))
    }
}

/// A spending category within a budget period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,

    /// The period this category belongs to
    pub budget_id: BudgetId,

    pub name: String,

    /// Predefined type, `None` for custom categories
    pub category_type: Option<CategoryType>,

    pub allocated_amount: Money,

    #[serde(default)]
    pub is_custom: bool,

    /// Display colour as "#RRGGBB"
    #[serde(default = "default_color")]
    pub color: String,

    pub created_at: DateTime<Utc>,
}

fn default_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_string()
}

impl Category {
    /// Create a category of a predefined type, named after its label
    pub fn predefined(budget_id: BudgetId, category_type: CategoryType, allocated: Money) -> Self {
        Self {
            id: CategoryId::new(),
            budget_id,
            name: category_type.label().to_string(),
            category_type: Some(category_type),
            allocated_amount: allocated,
            is_custom: false,
            color: default_color(),
            created_at: Utc::now(),
        }
    }

    /// Create a user-defined category
    pub fn custom(budget_id: BudgetId, name: impl Into<String>, allocated: Money) -> Self {
        Self {
            id: CategoryId::new(),
            budget_id,
            name: name.into().trim().to_string(),
            category_type: None,
            allocated_amount: allocated,
            is_custom: true,
            color: default_color(),
            created_at: Utc::now(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Validate the category, returning every problem found
    pub fn validate(&self) -> Vec<CategoryValidationError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(CategoryValidationError::EmptyName);
        } else if self.name.chars().count() > 100 {
            errors.push(CategoryValidationError::NameTooLong(self.name.chars().count()));
        }

        if self.allocated_amount.is_negative() {
            errors.push(CategoryValidationError::NegativeAllocation);
        } else if self.allocated_amount.exceeds_max() {
            errors.push(CategoryValidationError::AllocationTooLarge(self.allocated_amount));
        }

        if !is_hex_color(&self.color) {
            errors.push(CategoryValidationError::InvalidColor(self.color.clone()));
        }

        errors
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.allocated_amount)
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    NegativeAllocation,
    AllocationTooLarge(Money),
    InvalidColor(String),
    UnknownType(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 100)", len)
            }
            Self::NegativeAllocation => write!(f, "Allocated amount cannot be negative"),
            Self::AllocationTooLarge(amount) => {
                write!(f, "Allocated amount must be at most {} (got {})", Money::MAX, amount)
            }
            Self::InvalidColor(c) => write!(f, "Invalid colour '{}', expected #RRGGBB", c),
            Self::UnknownType(t) => write!(f, "Unknown category type: {}", t),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nine_predefined_types() {
        assert_eq!(CategoryType::all().len(), 9);
        assert_eq!(CategoryType::Health.label(), "Health & Fitness");
        assert_eq!(CategoryType::Transport.key(), "transport");
    }

    #[test]
    fn test_type_from_str() {
        assert_eq!("food".parse::<CategoryType>().unwrap(), CategoryType::Food);
        assert_eq!(
            "Food & Dining".parse::<CategoryType>().unwrap(),
            CategoryType::Food
        );
        assert!("rent".parse::<CategoryType>().is_err());
    }

    #[test]
    fn test_predefined_and_custom() {
        let budget_id = BudgetId::new();
        let food = Category::predefined(budget_id, CategoryType::Food, Money::from_units(300));
        assert_eq!(food.name, "Food & Dining");
        assert!(!food.is_custom);
        assert_eq!(food.color, DEFAULT_CATEGORY_COLOR);

        let pets = Category::custom(budget_id, " Pets ", Money::from_units(40));
        assert_eq!(pets.name, "Pets");
        assert!(pets.is_custom);
        assert!(pets.category_type.is_none());
    }

    #[test]
    fn test_validation() {
        let budget_id = BudgetId::new();
        let ok = Category::custom(budget_id, "Pets", Money::zero());
        assert!(ok.validate().is_empty());

        let bad = Category::custom(budget_id, "", Money::from_cents(-1)).with_color("blue");
        assert_eq!(
            bad.validate(),
            vec![
                CategoryValidationError::EmptyName,
                CategoryValidationError::NegativeAllocation,
                CategoryValidationError::InvalidColor("blue".into()),
            ]
        );
    }

    #[test]
    fn test_allocation_and_name_limits() {
        let budget_id = BudgetId::new();
        let huge = Money::from_cents(Money::MAX.cents() + 1);
        assert_eq!(
            Category::custom(budget_id, "Rent", huge).validate(),
            vec![CategoryValidationError::AllocationTooLarge(huge)]
        );

        let accented = Category::custom(budget_id, "é".repeat(100), Money::MAX);
        assert!(accented.validate().is_empty());
        let long = Category::custom(budget_id, "é".repeat(101), Money::zero());
        assert_eq!(
            long.validate(),
            vec![CategoryValidationError::NameTooLong(101)]
        );
    }

    #[test]
    fn test_serialization() {
        let category = Category::predefined(BudgetId::new(), CategoryType::Savings, Money::zero());
        let json = serde_json::to_string(&category).unwrap();
        assert!(json.contains("\"category_type\":\"savings\""));
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, category.id);
        assert_eq!(back.category_type, Some(CategoryType::Savings));
    }
}
