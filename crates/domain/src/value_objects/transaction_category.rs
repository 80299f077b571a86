//! TransactionCategory - spending/income tag attached to a transaction

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of categories assigned by the classification step upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionCategory {
    #[serde(rename = "Food & Drink")]
    FoodDrink,
    Transport,
    Shopping,
    Housing,
    Entertainment,
    Income,
    Groceries,
    Utilities,
    Transfers,
    Refund,
    Bills,
    Health,
    Gas,
    #[serde(rename = "Home Improvement")]
    HomeImprovement,
    Electronics,
    Other,
}

impl TransactionCategory {
    pub const ALL: [TransactionCategory; 16] = [
        TransactionCategory::FoodDrink,
        TransactionCategory::Transport,
        TransactionCategory::Shopping,
        TransactionCategory::Housing,
        TransactionCategory::Entertainment,
        TransactionCategory::Income,
        TransactionCategory::Groceries,
        TransactionCategory::Utilities,
        TransactionCategory::Transfers,
        TransactionCategory::Refund,
        TransactionCategory::Bills,
        TransactionCategory::Health,
        TransactionCategory::Gas,
        TransactionCategory::HomeImprovement,
        TransactionCategory::Electronics,
        TransactionCategory::Other,
    ];

    /// Get human-readable category name
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionCategory::FoodDrink => "Food & Drink",
            TransactionCategory::Transport => "Transport",
            TransactionCategory::Shopping => "Shopping",
            TransactionCategory::Housing => "Housing",
            TransactionCategory::Entertainment => "Entertainment",
            TransactionCategory::Income => "Income",
            TransactionCategory::Groceries => "Groceries",
            TransactionCategory::Utilities => "Utilities",
            TransactionCategory::Transfers => "Transfers",
            TransactionCategory::Refund => "Refund",
            TransactionCategory::Bills => "Bills",
            TransactionCategory::Health => "Health",
            TransactionCategory::Gas => "Gas",
            TransactionCategory::HomeImprovement => "Home Improvement",
            TransactionCategory::Electronics => "Electronics",
            TransactionCategory::Other => "Other",
        }
    }
}

impl fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown transaction category: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names_match_display() {
        for category in TransactionCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
            let back: TransactionCategory = serde_json::from_str(&json).unwrap();
            assert_eq!(back, category);
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "food & drink".parse::<TransactionCategory>().unwrap(),
            TransactionCategory::FoodDrink
        );
        assert_eq!(
            " Gas ".parse::<TransactionCategory>().unwrap(),
            TransactionCategory::Gas
        );
        assert!("Crypto".parse::<TransactionCategory>().is_err());
    }
}
