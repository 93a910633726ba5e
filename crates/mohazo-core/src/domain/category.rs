//! Shared work category.
//!
//! One closed enum is used both as `Member::role` and as `Work::category` /
//! `Task::category`, so role-to-category matching is a plain `==`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Planning,
    Design,
    Frontend,
    Backend,
    Data,
    Pm,
    Other,
}

impl Category {
    /// Declaration order. Derived tasks cycle through this sequence.
    pub const ALL: [Category; 7] = [
        Category::Planning,
        Category::Design,
        Category::Frontend,
        Category::Backend,
        Category::Data,
        Category::Pm,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Planning => "planning",
            Category::Design => "design",
            Category::Frontend => "frontend",
            Category::Backend => "backend",
            Category::Data => "data",
            Category::Pm => "pm",
            Category::Other => "other",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Planning => "Planning",
            Category::Design => "Design",
            Category::Frontend => "Frontend",
            Category::Backend => "Backend",
            Category::Data => "Data",
            Category::Pm => "PM",
            Category::Other => "Other",
        }
    }

    /// `ALL[index % ALL.len()]`.
    pub fn cycled(index: usize) -> Category {
        Self::ALL[index % Self::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category `{0}`; expected planning|design|frontend|backend|data|pm|other")]
pub struct ParseCategoryError(String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or(ParseCategoryError(normalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Category::Planning)]
    #[case(3, Category::Backend)]
    #[case(6, Category::Other)]
    #[case(7, Category::Planning)]
    #[case(9, Category::Frontend)]
    fn cycled_wraps_around(#[case] index: usize, #[case] expected: Category) {
        assert_eq!(Category::cycled(index), expected);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(" Backend ".parse::<Category>(), Ok(Category::Backend));
        assert_eq!("PM".parse::<Category>(), Ok(Category::Pm));
        assert!("ops".parse::<Category>().is_err());
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&Category::Frontend).unwrap();
        assert_eq!(json, "\"frontend\"");
    }
}
