//! Projection of directory reference data into selectable option lists.
use crate::api::{CostCenter, CostCentersResponse, Role, Scope};

/// Only roles whose slug contains this marker can be assigned from the dialog.
pub const ASSIGNABLE_ROLE_MARKER: &str = "customer";

/// A `(value, label)` pair shown in a dropdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionEntry {
    pub value: String,
    pub label: String,
}

impl OptionEntry {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into() }
    }
}

pub fn project_roles(roles: &[Role]) -> Vec<OptionEntry> {
    roles
        .iter()
        .filter(|r| r.slug.contains(ASSIGNABLE_ROLE_MARKER))
        .map(|r| OptionEntry::new(&r.id, &r.name))
        .collect()
}

pub fn project_cost_centers(cost_centers: &[CostCenter]) -> Vec<OptionEntry> {
    cost_centers
        .iter()
        .map(|c| OptionEntry::new(&c.id, &c.name))
        .collect()
}

/// Option lists held by the dialog. They survive the dialog closing.
#[derive(Clone, Debug, Default)]
pub struct ReferenceOptions {
    pub roles: Vec<OptionEntry>,
    pub cost_centers: Vec<OptionEntry>,
}

impl ReferenceOptions {
    /// Replace the role options. An empty upstream list leaves the current
    /// options alone; a non-empty one replaces them even if nothing survives
    /// the filter.
    pub fn apply_roles(&mut self, roles: &[Role]) {
        if roles.is_empty() {
            return;
        }
        self.roles = project_roles(roles);
    }

    /// Replace the cost-center options from the shape matching `scope`.
    ///
    /// Returns the new default cost-center id (the first option), or `None`
    /// when that shape is missing or empty and nothing changed.
    pub fn apply_cost_centers(&mut self, response: &CostCentersResponse, scope: Scope) -> Option<String> {
        let data = response.for_scope(scope).filter(|d| !d.is_empty())?;
        self.cost_centers = project_cost_centers(data);
        self.first_cost_center().map(str::to_string)
    }

    pub fn first_cost_center(&self) -> Option<&str> {
        self.cost_centers.first().map(|o| o.value.as_str())
    }

    pub fn is_ready(&self) -> bool {
        !self.roles.is_empty() && !self.cost_centers.is_empty()
    }
}

pub fn label_for<'a>(options: &'a [OptionEntry], value: &str) -> Option<&'a str> {
    options.iter().find(|o| o.value == value).map(|o| o.label.as_str())
}

pub fn index_of(options: &[OptionEntry], value: &str) -> Option<usize> {
    options.iter().position(|o| o.value == value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(id: &str, slug: &str) -> Role {
        Role { id: id.into(), name: format!("Role {id}"), slug: slug.into() }
    }

    #[test]
    fn only_customer_roles_are_projected() {
        let roles = [
            role("1", "customer-buyer"),
            role("2", "sales-rep"),
            role("3", "customer-approver"),
        ];
        let opts = project_roles(&roles);
        let values: Vec<&str> = opts.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["1", "3"]);
        assert_eq!(opts[0].label, "Role 1");
    }

    #[test]
    fn cost_centers_project_and_default_to_first() {
        let mut refs = ReferenceOptions::default();
        let resp = CostCentersResponse::operator(vec![
            CostCenter { id: "c1".into(), name: "HQ".into() },
            CostCenter { id: "c2".into(), name: "Branch".into() },
        ]);
        let default = refs.apply_cost_centers(&resp, Scope::Operator);
        assert_eq!(default.as_deref(), Some("c1"));
        assert_eq!(
            refs.cost_centers,
            vec![OptionEntry::new("c1", "HQ"), OptionEntry::new("c2", "Branch")]
        );
    }

    #[test]
    fn missing_shape_keeps_prior_options() {
        let mut refs = ReferenceOptions {
            roles: vec![],
            cost_centers: vec![OptionEntry::new("c9", "Old")],
        };
        let resp = CostCentersResponse::storefront(vec![]);
        assert_eq!(refs.apply_cost_centers(&resp, Scope::Operator), None);
        assert_eq!(refs.cost_centers, vec![OptionEntry::new("c9", "Old")]);
    }

    #[test]
    fn empty_page_keeps_prior_options() {
        let mut refs = ReferenceOptions {
            roles: vec![],
            cost_centers: vec![OptionEntry::new("c1", "HQ"), OptionEntry::new("c2", "Branch")],
        };
        assert_eq!(refs.apply_cost_centers(&CostCentersResponse::operator(vec![]), Scope::Operator), None);
        assert_eq!(refs.cost_centers.len(), 2);
    }

    #[test]
    fn empty_role_list_keeps_prior_options() {
        let mut refs = ReferenceOptions::default();
        refs.apply_roles(&[role("1", "customer-buyer")]);
        refs.apply_roles(&[]);
        assert_eq!(refs.roles, vec![OptionEntry::new("1", "Role 1")]);

        // a real list without assignable roles still replaces them
        refs.apply_roles(&[role("2", "sales-rep")]);
        assert!(refs.roles.is_empty());
    }

    #[test]
    fn readiness_needs_both_lists() {
        let mut refs = ReferenceOptions::default();
        assert!(!refs.is_ready());
        refs.apply_roles(&[role("1", "customer-buyer")]);
        assert!(!refs.is_ready());
        refs.apply_cost_centers(
            &CostCentersResponse::storefront(vec![CostCenter { id: "c1".into(), name: "HQ".into() }]),
            Scope::Storefront,
        );
        assert!(refs.is_ready());
        refs.apply_roles(&[role("2", "admin")]);
        assert!(!refs.is_ready());
    }
}
