use crate::error::{InsightsError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Assigns `category` to any name containing one of `keywords`
/// (case-insensitive substring match).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryRule {
    pub category: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: &str, keywords: &[&str]) -> Self {
        Self {
            category: category.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// `lowercase_name` must already be lowercased.
    pub fn matches(&self, lowercase_name: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| lowercase_name.contains(&keyword.to_lowercase()))
    }
}

/// Ordered rules evaluated first-match-wins, with a catch-all category.
///
/// Order is significant: "Sling Backpack" is a Backpack under the canonical
/// set because the backpack rule comes first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryRuleSet {
    pub rules: Vec<CategoryRule>,
    pub fallback: String,
}

impl Default for CategoryRuleSet {
    fn default() -> Self {
        Self::canonical()
    }
}

impl CategoryRuleSet {
    /// The bag catalogue classification used across every report.
    pub fn canonical() -> Self {
        Self {
            rules: vec![
                CategoryRule::new("Backpack", &["backpack", "ransel"]),
                CategoryRule::new("Totebag", &["tote", "totebag"]),
                CategoryRule::new("Wallet", &["dompet", "wallet"]),
                CategoryRule::new("Shoulder Bag", &["shoulder"]),
                CategoryRule::new("Sling Bag", &["sling", "selempang"]),
                CategoryRule::new("Laptop Case", &["laptop", "sleeve"]),
                CategoryRule::new("Pouch", &["pouch", "tempat", "makeup"]),
            ],
            fallback: "Other".to_string(),
        }
    }

    pub fn classify(&self, name: &str) -> &str {
        self.rules
            .get(self.position(name))
            .map(|rule| rule.category.as_str())
            .unwrap_or(self.fallback.as_str())
    }

    /// Index of the matching rule, or `rules.len()` for the fallback.
    /// Lines up with [`CategoryRuleSet::categories`].
    pub fn position(&self, name: &str) -> usize {
        let lowercase = name.to_lowercase();
        self.rules
            .iter()
            .position(|rule| rule.matches(&lowercase))
            .unwrap_or(self.rules.len())
    }

    /// Rule categories in evaluation order, then the fallback.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .map(|rule| rule.category.as_str())
            .chain(std::iter::once(self.fallback.as_str()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.fallback.trim().is_empty() {
            return Err(InsightsError::InvalidCategoryRule {
                category: self.fallback.clone(),
                details: "Fallback category name must not be empty".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for rule in &self.rules {
            if rule.category.trim().is_empty() {
                return Err(InsightsError::InvalidCategoryRule {
                    category: rule.category.clone(),
                    details: "Category name must not be empty".to_string(),
                });
            }

            if rule.keywords.is_empty() || rule.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(InsightsError::InvalidCategoryRule {
                    category: rule.category.clone(),
                    details: "Rules need at least one keyword and no blank keywords".to_string(),
                });
            }

            if rule.category == self.fallback || !seen.insert(rule.category.as_str()) {
                return Err(InsightsError::InvalidCategoryRule {
                    category: rule.category.clone(),
                    details: "Category appears more than once".to_string(),
                });
            }
        }

        Ok(())
    }
}
