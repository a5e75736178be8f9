//! Background workers that run [`Directory`] calls off the UI thread.
//!
//! Each call runs on its own thread and reports a [`FetchEvent`] over an mpsc
//! channel; the event loop drains the channel between input polls.
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use tracing::{info, warn};

use super::{COST_CENTER_LIMIT, CostCentersResponse, CreatedUser, Directory, Role, Scope};
use crate::app::form::DraftUser;

/// Completion of a background directory call. Errors are carried as display strings.
#[derive(Debug)]
pub enum FetchEvent {
    Roles(Result<Vec<Role>, String>),
    CostCenters(Result<CostCentersResponse, String>),
    UserCreated(Result<CreatedUser, String>),
}

/// Start the role and cost-center fetches. They run independently; either may finish first.
pub fn spawn_reference_fetches(
    directory: Arc<dyn Directory>,
    organization_id: &str,
    scope: Scope,
    tx: Sender<FetchEvent>,
) -> Vec<JoinHandle<()>> {
    let roles_dir = Arc::clone(&directory);
    let roles_tx = tx.clone();
    let roles = thread::spawn(move || {
        let res = roles_dir.list_roles().map_err(|e| e.to_string());
        match &res {
            Ok(list) => info!(count = list.len(), "roles fetched"),
            Err(e) => warn!(error = %e, "roles fetch failed"),
        }
        // receiver gone means the app is shutting down
        let _ = roles_tx.send(FetchEvent::Roles(res));
    });

    let org = organization_id.to_string();
    let cost_centers = thread::spawn(move || {
        let res = directory
            .list_cost_centers(&org, scope, COST_CENTER_LIMIT)
            .map_err(|e| e.to_string());
        match &res {
            Ok(_) => info!(organization = %org, ?scope, "cost centers fetched"),
            Err(e) => warn!(organization = %org, error = %e, "cost centers fetch failed"),
        }
        let _ = tx.send(FetchEvent::CostCenters(res));
    });

    vec![roles, cost_centers]
}

/// Submit `record` on a background thread.
pub fn spawn_create_user(
    directory: Arc<dyn Directory>,
    record: DraftUser,
    tx: Sender<FetchEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let res = directory.create_user(&record).map_err(|e| e.to_string());
        match &res {
            Ok(user) => info!(id = %user.id, email = %user.email, "user created"),
            Err(e) => warn!(email = %record.email, error = %e, "create user failed"),
        }
        let _ = tx.send(FetchEvent::UserCreated(res));
    })
}
