//! Directory service layer: wire models, the [`Directory`] trait and its backends.
//!
//! Two backends exist: [`graphql::GraphqlDirectory`] talks to a remote GraphQL
//! endpoint and [`fixture::FixtureDirectory`] serves data from a JSON file.
//! [`fetch`] runs directory calls on background threads for the TUI loop.
pub mod fetch;
pub mod fixture;
pub mod graphql;

use serde::{Deserialize, Serialize};

use crate::app::form::DraftUser;
use crate::error::Result;

/// Page size requested for cost-center listings.
pub const COST_CENTER_LIMIT: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub slug: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostCenter {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Cost-center listing as returned by either the operator or the storefront query.
///
/// Exactly one of the two fields is normally present, depending on which query ran.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostCentersResponse {
    #[serde(rename = "getCostCentersByOrganizationId", default)]
    pub cost_centers: Option<Page<CostCenter>>,
    #[serde(rename = "getCostCentersByOrganizationIdStorefront", default)]
    pub store_cost_centers: Option<Page<CostCenter>>,
}

impl CostCentersResponse {
    pub fn operator(data: Vec<CostCenter>) -> Self {
        Self { cost_centers: Some(Page { data }), store_cost_centers: None }
    }

    pub fn storefront(data: Vec<CostCenter>) -> Self {
        Self { cost_centers: None, store_cost_centers: Some(Page { data }) }
    }

    /// The payload for `scope`, if that shape is present.
    pub fn for_scope(&self, scope: Scope) -> Option<&[CostCenter]> {
        let page = match scope {
            Scope::Operator => self.cost_centers.as_ref(),
            Scope::Storefront => self.store_cost_centers.as_ref(),
        };
        page.map(|p| p.data.as_slice())
    }
}

/// User returned by the directory after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUser {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role_id: String,
    #[serde(default)]
    pub cost_center_id: String,
}

/// Which view the operator works in; selects query shape and label namespace.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Scope {
    Operator,
    Storefront,
}

impl Scope {
    pub fn from_admin(is_admin: bool) -> Self {
        if is_admin { Scope::Operator } else { Scope::Storefront }
    }
}

/// Remote source of reference data and sink for new users.
pub trait Directory: Send + Sync {
    fn list_roles(&self) -> Result<Vec<Role>>;

    fn list_cost_centers(
        &self,
        organization_id: &str,
        scope: Scope,
        limit: usize,
    ) -> Result<CostCentersResponse>;

    fn create_user(&self, record: &DraftUser) -> Result<CreatedUser>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_decodes_both_shapes() {
        let op: CostCentersResponse =
            serde_json::from_str(r#"{"getCostCentersByOrganizationId":{"data":[{"id":"c1","name":"HQ"}]}}"#).unwrap();
        assert_eq!(op.for_scope(Scope::Operator).map(|d| d.len()), Some(1));
        assert!(op.for_scope(Scope::Storefront).is_none());

        let store: CostCentersResponse =
            serde_json::from_str(r#"{"getCostCentersByOrganizationIdStorefront":{"data":[]}}"#).unwrap();
        assert_eq!(store.for_scope(Scope::Storefront).map(|d| d.len()), Some(0));
        assert!(store.for_scope(Scope::Operator).is_none());
    }

    #[test]
    fn scope_from_admin_flag() {
        assert_eq!(Scope::from_admin(true), Scope::Operator);
        assert_eq!(Scope::from_admin(false), Scope::Storefront);
    }
}
