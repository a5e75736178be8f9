//! File-backed [`Directory`] for offline use and tests.
//!
//! The fixture is a JSON document:
//!
//! ```json
//! {
//!   "roles": [{ "id": "r1", "name": "Buyer", "slug": "customer-buyer" }],
//!   "organizations": {
//!     "org-1": { "costCenters": [{ "id": "c1", "name": "HQ" }] }
//!   }
//! }
//! ```
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

use super::{CostCenter, CostCentersResponse, CreatedUser, Directory, Role, Scope};
use crate::app::form::DraftUser;
use crate::error::{Context, Result, simple_error};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub organizations: HashMap<String, OrganizationFixture>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationFixture {
    #[serde(default)]
    pub cost_centers: Vec<CostCenter>,
}

pub struct FixtureDirectory {
    fixture: Fixture,
    created: Mutex<Vec<(String, CreatedUser)>>,
}

impl FixtureDirectory {
    pub fn new(fixture: Fixture) -> Self {
        Self { fixture, created: Mutex::new(Vec::new()) }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let fixture: Fixture = serde_json::from_str(json).with_ctx(|| "parse fixture".to_string())?;
        Ok(Self::new(fixture))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_ctx(|| format!("read fixture {}", path.display()))?;
        Self::from_json(&contents)
    }

    /// Users created through this directory for `organization_id`.
    pub fn created_in(&self, organization_id: &str) -> Vec<CreatedUser> {
        self.created
            .lock()
            .map(|list| {
                list.iter()
                    .filter(|(org, _)| org == organization_id)
                    .map(|(_, u)| u.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Directory for FixtureDirectory {
    fn list_roles(&self) -> Result<Vec<Role>> {
        Ok(self.fixture.roles.clone())
    }

    fn list_cost_centers(
        &self,
        organization_id: &str,
        scope: Scope,
        limit: usize,
    ) -> Result<CostCentersResponse> {
        let data: Vec<CostCenter> = self
            .fixture
            .organizations
            .get(organization_id)
            .map(|o| o.cost_centers.iter().take(limit).cloned().collect())
            .unwrap_or_default();
        Ok(match scope {
            Scope::Operator => CostCentersResponse::operator(data),
            Scope::Storefront => CostCentersResponse::storefront(data),
        })
    }

    fn create_user(&self, record: &DraftUser) -> Result<CreatedUser> {
        if !self.fixture.organizations.contains_key(&record.organization_id) {
            return Err(simple_error(format!(
                "unknown organization '{}'",
                record.organization_id
            )));
        }
        let mut created = self
            .created
            .lock()
            .map_err(|_| simple_error("fixture store poisoned"))?;
        let duplicate = created.iter().any(|(org, u)| {
            org == &record.organization_id && u.email.eq_ignore_ascii_case(&record.email)
        });
        if duplicate {
            return Err(simple_error(format!("a user with email {} already exists", record.email)));
        }
        let user = CreatedUser {
            id: format!("u{}", created.len() + 1),
            name: record.name.clone(),
            email: record.email.clone(),
            role_id: record.role_id.clone(),
            cost_center_id: record.cost_center_id.clone(),
        };
        created.push((record.organization_id.clone(), user.clone()));
        info!(id = %user.id, organization = %record.organization_id, "fixture user created");
        Ok(user)
    }
}
