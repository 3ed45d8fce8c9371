use crate::domain::{
    ids::{BoardId, OrganizationId, UserId},
    list::ListWithCards,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An organization owning boards; access is granted through membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
}

impl Organization {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: OrganizationId::generate(),
            name: name.into(),
        }
    }
}

/// Role of a member inside an organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Admin,
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

/// Membership row linking a user to an organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub organization_id: OrganizationId,
    pub user_id: UserId,
    pub role: MemberRole,
}

/// A kanban board owned by an organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub organization_id: OrganizationId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    pub fn new(organization_id: OrganizationId, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: BoardId::generate(),
            organization_id,
            title: title.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A board together with its lists and their cards, all in display order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardWithLists {
    #[serde(flatten)]
    pub board: Board,
    pub lists: Vec<ListWithCards>,
}
