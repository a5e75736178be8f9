//! GraphQL backend for [`Directory`].
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use super::{CostCentersResponse, CreatedUser, Directory, Role, Scope};
use crate::app::form::DraftUser;
use crate::error::{Context, Result, simple_error};

const ROLES_QUERY: &str = "query Roles { listRoles { id name slug } }";

const COST_CENTERS_QUERY: &str = "query CostCenters($id: ID!, $pageSize: Int) { \
     getCostCentersByOrganizationId(id: $id, pageSize: $pageSize) { data { id name } } }";

const STORE_COST_CENTERS_QUERY: &str = "query StoreCostCenters($id: ID, $pageSize: Int) { \
     getCostCentersByOrganizationIdStorefront(id: $id, pageSize: $pageSize) { data { id name } } }";

const CREATE_USER_MUTATION: &str = "mutation CreateUser($input: CreateUserInput!) { \
     createUser(input: $input) { id name email roleId costCenterId } }";

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize)]
struct RolesData {
    #[serde(rename = "listRoles", default)]
    roles: Vec<Role>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserData {
    create_user: CreatedUser,
}

pub struct GraphqlDirectory {
    client: reqwest::blocking::Client,
    endpoint: String,
    token: Option<String>,
}

impl GraphqlDirectory {
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(format!("orguser-manager/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .with_ctx(|| "build http client".to_string())?;
        Ok(Self { client, endpoint: endpoint.into(), token })
    }

    fn execute<T: DeserializeOwned>(&self, operation: &str, query: &str, variables: Value) -> Result<T> {
        debug!(operation, endpoint = %self.endpoint, "graphql request");
        let mut req = self
            .client
            .post(&self.endpoint)
            // reference lists are always read fresh
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) {
            req = req.bearer_auth(token);
        }
        let resp = req.send().with_ctx(|| format!("{operation}: request failed"))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(simple_error(format!("{operation}: HTTP {status}: {}", body.trim())));
        }
        let envelope: Envelope<T> = resp
            .json()
            .with_ctx(|| format!("{operation}: invalid response body"))?;
        decode_envelope(operation, envelope)
    }
}

fn decode_envelope<T>(operation: &str, envelope: Envelope<T>) -> Result<T> {
    if !envelope.errors.is_empty() {
        let joined = envelope
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(simple_error(format!("{operation}: {joined}")));
    }
    envelope
        .data
        .ok_or_else(|| simple_error(format!("{operation}: response carried no data")))
}

impl Directory for GraphqlDirectory {
    fn list_roles(&self) -> Result<Vec<Role>> {
        let data: RolesData = self.execute("listRoles", ROLES_QUERY, json!({}))?;
        Ok(data.roles)
    }

    fn list_cost_centers(
        &self,
        organization_id: &str,
        scope: Scope,
        limit: usize,
    ) -> Result<CostCentersResponse> {
        let (operation, query) = match scope {
            Scope::Operator => ("getCostCentersByOrganizationId", COST_CENTERS_QUERY),
            Scope::Storefront => ("getCostCentersByOrganizationIdStorefront", STORE_COST_CENTERS_QUERY),
        };
        self.execute(
            operation,
            query,
            json!({ "id": organization_id, "pageSize": limit }),
        )
    }

    fn create_user(&self, record: &DraftUser) -> Result<CreatedUser> {
        let data: CreateUserData =
            self.execute("createUser", CREATE_USER_MUTATION, json!({ "input": record }))?;
        Ok(data.create_user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_errors_are_joined() {
        let env: Envelope<RolesData> = serde_json::from_str(
            r#"{"data":null,"errors":[{"message":"forbidden"},{"message":"try later"}]}"#,
        )
        .unwrap();
        let err = decode_envelope("roles", env).err().unwrap();
        assert_eq!(err.to_string(), "roles: forbidden; try later");
    }

    #[test]
    fn envelope_without_data_is_an_error() {
        let env: Envelope<RolesData> = serde_json::from_str(r#"{}"#).unwrap();
        assert!(decode_envelope("roles", env).is_err());
    }

    #[test]
    fn envelope_decodes_storefront_cost_centers() {
        let env: Envelope<CostCentersResponse> = serde_json::from_str(
            r#"{"data":{"getCostCentersByOrganizationIdStorefront":{"data":[{"id":"c1","name":"HQ"}]}}}"#,
        )
        .unwrap();
        let resp = decode_envelope("getCostCentersByOrganizationIdStorefront", env).unwrap();
        assert_eq!(resp.for_scope(Scope::Storefront).unwrap()[0].name, "HQ");
        assert!(resp.for_scope(Scope::Operator).is_none());
    }

    #[test]
    fn envelope_decodes_list_roles() {
        let env: Envelope<RolesData> = serde_json::from_str(
            r#"{"data":{"listRoles":[{"id":"r1","name":"Buyer","slug":"customer-buyer"}]}}"#,
        )
        .unwrap();
        let data = decode_envelope("listRoles", env).unwrap();
        assert_eq!(data.roles[0].slug, "customer-buyer");
    }

    #[test]
    fn queries_use_service_field_and_variable_names() {
        assert!(ROLES_QUERY.contains("listRoles"));
        assert!(COST_CENTERS_QUERY.contains("getCostCentersByOrganizationId("));
        assert!(STORE_COST_CENTERS_QUERY.contains("getCostCentersByOrganizationIdStorefront("));
        for q in [COST_CENTERS_QUERY, STORE_COST_CENTERS_QUERY] {
            assert!(q.contains("$id") && q.contains("$pageSize"));
        }
    }
}
