//! Draft user record and the submission gate.
//!
//! The record is treated as a value: every edit produces a copy with exactly
//! one field overwritten, so an edit can never drop another field.
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Local part, `@`, a domain containing at least one dot. No whitespace, no second `@`.
static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// The in-progress, unsaved user being created.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftUser {
    pub name: String,
    pub email: String,
    pub organization_id: String,
    pub cost_center_id: String,
    pub role_id: String,
}

/// Editable fields of [`DraftUser`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Email,
    CostCenter,
    Role,
}

impl DraftUser {
    /// Empty record seeded with the organization and an optional default cost center.
    pub fn seeded(organization_id: &str, cost_center_id: Option<&str>) -> Self {
        Self {
            organization_id: organization_id.to_string(),
            cost_center_id: cost_center_id.unwrap_or_default().to_string(),
            ..Self::default()
        }
    }

    /// Copy of `self` with `field` replaced by `value`.
    pub fn with_field(&self, field: DraftField, value: impl Into<String>) -> Self {
        let value = value.into();
        match field {
            DraftField::Name => Self { name: value, ..self.clone() },
            DraftField::Email => Self { email: value, ..self.clone() },
            DraftField::CostCenter => Self { cost_center_id: value, ..self.clone() },
            DraftField::Role => Self { role_id: value, ..self.clone() },
        }
    }

    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::Name => &self.name,
            DraftField::Email => &self.email,
            DraftField::CostCenter => &self.cost_center_id,
            DraftField::Role => &self.role_id,
        }
    }

    /// Whether the confirm action may be used for this record.
    pub fn can_submit(&self) -> bool {
        !self.name.is_empty()
            && is_valid_email(&self.email)
            && !self.organization_id.is_empty()
            && !self.cost_center_id.is_empty()
            && !self.role_id.is_empty()
    }
}

/// Structural email check. Shape only; says nothing about deliverability.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}
