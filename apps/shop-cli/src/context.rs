//! Per-invocation state shared by every command.

use std::sync::Arc;

use serde::Serialize;
use threadline_api::{ApiClient, AuthToken, ClientConfig};
use threadline_store::{PaymentFlow, PaymentGateway, Route, RouteTree, Store};

use crate::error::{CommandError, CommandResult};
use crate::gateway::TerminalGateway;

pub struct AppContext {
    pub store: Store,
    pub tree: RouteTree,
    /// Print machine-readable JSON instead of text.
    pub json: bool,
    gateway: Arc<dyn PaymentGateway>,
}

impl AppContext {
    /// Context with the interactive terminal gateway.
    pub fn new(config: &ClientConfig, json: bool) -> CommandResult<Self> {
        let auth = AuthToken::new(config.auth.token.clone());
        let api = ApiClient::from_config(config, auth)?;
        Ok(AppContext {
            store: Store::new(api),
            tree: RouteTree::for_role(config.role()),
            json,
            gateway: Arc::new(TerminalGateway),
        })
    }

    pub fn with_gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.gateway = gateway;
        self
    }

    /// Payment flow over this context's store and gateway.
    pub fn payments(&self) -> PaymentFlow {
        self.store.payments(Arc::clone(&self.gateway))
    }

    /// Fails unless the role's navigation tree contains `route`.
    pub fn require(&self, route: &Route) -> CommandResult<()> {
        if self.tree.allows(route) {
            Ok(())
        } else {
            Err(CommandError::forbidden(&format!("{:?}", route.screen())))
        }
    }

    /// Prints `value` as JSON, or hands it to `human` for text output.
    pub fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> CommandResult<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(value);
        }
        Ok(())
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("store", &self.store)
            .field("tree", &self.tree)
            .field("json", &self.json)
            .finish_non_exhaustive()
    }
}
