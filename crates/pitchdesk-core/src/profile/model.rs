//! Profile domain models.

use serde::{Deserialize, Serialize};

/// A registered freelancer.
///
/// Only the fields prompt assembly and the radar need are modelled; all of
/// them are optional from the user's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier (UUID format)
    pub id: String,
    /// Display name
    #[serde(default)]
    pub first_name: Option<String>,
    /// Selected specializations (e.g. "Дизайн", "Python-разработка")
    #[serde(default)]
    pub specializations: Vec<String>,
    /// Free-form description of the services offered
    #[serde(default)]
    pub services_description: Option<String>,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

/// Partial update of a user's profile fields.
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub specializations: Option<Vec<String>>,
    pub services_description: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.specializations.is_none()
            && self.services_description.is_none()
    }
}

/// Saved vacancy search preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchProfile {
    pub id: String,
    pub user_id: String,
    /// Keywords joined with spaces to form the profile-driven radar query
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub min_budget: Option<u32>,
    #[serde(default)]
    pub work_format: Vec<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl SearchProfile {
    /// Radar query built from the saved keywords, or `None` if there are none.
    pub fn keyword_query(&self) -> Option<String> {
        let keywords: Vec<&str> = self
            .keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            None
        } else {
            Some(keywords.join(" "))
        }
    }
}
