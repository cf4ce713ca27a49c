use serde::{Deserialize, Serialize};
use strum::Display;

use crate::models::{RecordId, null_as_empty};

/// A user record as returned by `GET /customers`.
///
/// Moderators travel in the same collection and are told apart by [`Role`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Customer {
    pub fn new(id: impl Into<RecordId>, name: &str, email: &str, phone: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            avatar: None,
            role: None,
            is_active: None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_active(mut self, is_active: Option<bool>) -> Self {
        self.is_active = is_active;
        self
    }

    /// The name shown to an operator, falling back to the email and then the id.
    pub fn display_name(&self) -> String {
        if !self.name.trim().is_empty() {
            self.name.clone()
        } else if !self.email.trim().is_empty() {
            self.email.clone()
        } else {
            format!("#{}", self.id)
        }
    }

    pub fn is_moderator(&self) -> bool {
        self.role == Some(Role::Moderator)
    }

    /// Only an explicit `false` marks a record inactive. A missing or `null` flag counts as
    /// active.
    pub fn is_active(&self) -> bool {
        self.is_active != Some(false)
    }

    /// Apply a patch the way the server does: present fields replace, absent fields are kept.
    pub fn apply(&mut self, patch: &CustomerPatch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(email) = &patch.email {
            self.email.clone_from(email);
        }
        if let Some(phone) = &patch.phone {
            self.phone.clone_from(phone);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum Role {
    Customer,
    Moderator,
    Worker,
    Admin,
    #[serde(other)]
    Other,
}

/// Partial update body for `PUT /customers/{id}`. Absent fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl CustomerPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}
