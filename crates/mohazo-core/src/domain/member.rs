//! Team members.

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::errors::DashboardError;
use super::ids::MemberId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Junior,
    Mid,
    Senior,
}

/// A team member that Works can be assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub role: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_level: Option<SkillLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_hours: Option<u32>,
}

impl Member {
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>, role: Category) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            skill_level: None,
            available_hours: None,
        }
    }

    pub fn with_skill_level(mut self, level: SkillLevel) -> Self {
        self.skill_level = Some(level);
        self
    }

    pub fn with_available_hours(mut self, hours: u32) -> Self {
        self.available_hours = Some(hours);
        self
    }
}

/// Input for the "add member" settings action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    pub name: String,
    pub role: Category,
    #[serde(default)]
    pub skill_level: Option<SkillLevel>,
    #[serde(default)]
    pub available_hours: Option<u32>,
}

impl NewMember {
    pub const DEFAULT_SKILL_LEVEL: SkillLevel = SkillLevel::Mid;
    pub const DEFAULT_AVAILABLE_HOURS: u32 = 40;

    pub fn new(name: impl Into<String>, role: Category) -> Self {
        Self {
            name: name.into(),
            role,
            skill_level: None,
            available_hours: None,
        }
    }

    /// Validates the input and builds the member with defaults filled in.
    ///
    /// The name is stored trimmed.
    pub fn into_member(self, id: MemberId) -> Result<Member, DashboardError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DashboardError::EmptyField("name"));
        }
        Ok(Member {
            id,
            name: name.to_string(),
            role: self.role,
            skill_level: Some(self.skill_level.unwrap_or(Self::DEFAULT_SKILL_LEVEL)),
            available_hours: Some(
                self.available_hours
                    .unwrap_or(Self::DEFAULT_AVAILABLE_HOURS),
            ),
        })
    }
}
