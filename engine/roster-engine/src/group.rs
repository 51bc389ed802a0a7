//! Groups: the competition a roster is entered in
//!
//! A group has an owner, a member cap and an entry fee. Every member builds
//! one roster per group.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Default member cap for a new group
pub const DEFAULT_MAX_MEMBERS: usize = 12;

/// Default entry fee for a new group
pub const DEFAULT_ENTRY_FEE: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Member,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub username: String,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

/// Request to open a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,
    pub description: String,
    pub owner: String,
    #[serde(default = "default_max_members")]
    pub max_members: usize,
    #[serde(default = "default_entry_fee")]
    pub entry_fee: f64,
    #[serde(default)]
    pub is_private: bool,
}

fn default_max_members() -> usize {
    DEFAULT_MAX_MEMBERS
}

fn default_entry_fee() -> f64 {
    DEFAULT_ENTRY_FEE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner: String,
    pub members: Vec<Member>,
    pub max_members: usize,
    pub entry_fee: f64,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroupError {
    #[error("Invalid group: {0}")]
    Invalid(String),

    #[error("Group {group_id} is full ({max_members} members)")]
    GroupFull { group_id: Uuid, max_members: usize },

    #[error("{username} is already a member of group {group_id}")]
    AlreadyMember { group_id: Uuid, username: String },
}

impl GroupError {
    pub fn code(&self) -> &'static str {
        match self {
            GroupError::Invalid(_) => "INVALID_GROUP",
            GroupError::GroupFull { .. } => "GROUP_FULL",
            GroupError::AlreadyMember { .. } => "ALREADY_MEMBER",
        }
    }
}

fn required(field: &str, value: &str) -> Result<String, GroupError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GroupError::Invalid(format!("{field} must not be blank")));
    }
    Ok(trimmed.to_string())
}

impl Group {
    /// Open a group with its owner as the first member
    pub fn create(request: NewGroup) -> Result<Self, GroupError> {
        let name = required("name", &request.name)?;
        let description = required("description", &request.description)?;
        let owner = required("owner", &request.owner)?;
        if request.max_members == 0 {
            return Err(GroupError::Invalid("max_members must be at least 1".to_string()));
        }
        if !request.entry_fee.is_finite() || request.entry_fee < 0.0 {
            return Err(GroupError::Invalid(format!(
                "entry_fee must be a finite, non-negative amount, got {}",
                request.entry_fee
            )));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description,
            members: vec![Member { username: owner.clone(), role: MemberRole::Owner, joined_at: now }],
            owner,
            max_members: request.max_members,
            entry_fee: request.entry_fee,
            is_private: request.is_private,
            created_at: now,
        })
    }

    pub fn member(&self, username: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.username == username)
    }

    pub fn is_member(&self, username: &str) -> bool {
        self.member(username).is_some()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.max_members
    }

    /// Add `username` as a member, respecting the member cap
    pub fn join(&mut self, username: &str) -> Result<&Member, GroupError> {
        let username = required("username", username)?;
        if self.is_member(&username) {
            return Err(GroupError::AlreadyMember { group_id: self.id, username });
        }
        if self.is_full() {
            return Err(GroupError::GroupFull { group_id: self.id, max_members: self.max_members });
        }

        self.members.push(Member { username, role: MemberRole::Member, joined_at: Utc::now() });
        Ok(&self.members[self.members.len() - 1])
    }

    /// Entry fees collected so far
    pub fn prize_pool(&self) -> f64 {
        self.members.len() as f64 * self.entry_fee
    }
}
