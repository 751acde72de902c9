//! Tool registry
//!
//! The [`ToolRegistry`] owns every tool provider and implements
//! [`ToolDispatcherPort`]: one namespace of capability name → provider.
//!
//! # Resolution
//!
//! Providers are ordered builtin first, then delegated providers by
//! descending [`priority`](ToolProvider::priority). The first provider to
//! claim a name owns it, so a builtin tool always shadows a delegated tool of
//! the same name.
//!
//! # Refresh
//!
//! Delegated membership changes as capability servers come and go.
//! [`refresh`](ToolDispatcherPort::refresh) rebuilds the routing table, and a
//! dispatch to a delegated name re-checks the provider's current list, so a
//! tool that vanished after the last refresh yields `NOT_FOUND` instead of a
//! call into a dead server.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use shipwright_application::ports::tool_dispatcher::ToolDispatcherPort;
use shipwright_domain::tool::{
    ExecutionContext, ToolCall, ToolDefinition, ToolError, ToolProvider, ToolResult, ToolSpec,
};
use tracing::{debug, trace, warn};

#[derive(Default)]
struct Routing {
    spec: ToolSpec,
    /// Tool name → index into `providers`
    owners: HashMap<String, usize>,
}

pub struct ToolRegistry {
    providers: Vec<Arc<dyn ToolProvider>>,
    routing: RwLock<Routing>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            routing: RwLock::new(Routing::default()),
        }
    }

    pub fn register<P: ToolProvider + 'static>(self, provider: P) -> Self {
        self.register_arc(Arc::new(provider))
    }

    pub fn register_arc(mut self, provider: Arc<dyn ToolProvider>) -> Self {
        debug!(provider = provider.id(), builtin = provider.is_builtin(), "Registered tool provider");
        self.providers.push(provider);
        self.providers
            .sort_by_key(|p| (!p.is_builtin(), std::cmp::Reverse(p.priority())));
        self
    }

    pub fn provider_ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// Id of the provider that currently owns `tool_name`.
    pub fn owner_of(&self, tool_name: &str) -> Option<&str> {
        let index = *self.read_routing().owners.get(tool_name)?;
        self.providers.get(index).map(|p| p.id())
    }

    fn read_routing(&self) -> RwLockReadGuard<'_, Routing> {
        self.routing.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_routing(&self) -> RwLockWriteGuard<'_, Routing> {
        self.routing.write().unwrap_or_else(|e| e.into_inner())
    }

    async fn discover(&self) -> Routing {
        let mut routing = Routing::default();

        for (index, provider) in self.providers.iter().enumerate() {
            if !provider.is_available().await {
                debug!(provider = provider.id(), "Provider not available, skipping");
                continue;
            }

            match provider.discover_tools().await {
                Ok(tools) => {
                    for tool in tools {
                        if routing.owners.contains_key(&tool.name) {
                            trace!(
                                tool = %tool.name,
                                provider = provider.id(),
                                "Tool already owned by an earlier provider"
                            );
                            continue;
                        }
                        debug!(tool = %tool.name, provider = provider.id(), "Registered tool");
                        routing.owners.insert(tool.name.clone(), index);
                        routing.spec = std::mem::take(&mut routing.spec).register(tool);
                    }
                }
                Err(e) => {
                    warn!(
                        provider = provider.id(),
                        error = %e,
                        "Failed to discover tools from provider"
                    );
                }
            }
        }

        routing
    }

    /// Find a delegated provider that offers `tool_name` right now.
    async fn live_delegate(&self, tool_name: &str) -> Option<&Arc<dyn ToolProvider>> {
        for provider in self.providers.iter().filter(|p| !p.is_builtin()) {
            if provider.has_tool(tool_name).await {
                return Some(provider);
            }
        }
        None
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolDispatcherPort for ToolRegistry {
    fn list_capabilities(&self) -> Vec<ToolDefinition> {
        self.read_routing().spec.all().cloned().collect()
    }

    fn definition(&self, name: &str) -> Option<ToolDefinition> {
        self.read_routing().spec.get(name).cloned()
    }

    async fn dispatch(&self, call: &ToolCall, ctx: &ExecutionContext) -> ToolResult {
        let owner = self
            .read_routing()
            .owners
            .get(&call.tool_name)
            .and_then(|index| self.providers.get(*index))
            .cloned();

        let provider = match owner {
            Some(provider) if provider.is_builtin() => provider,
            _ => match self.live_delegate(&call.tool_name).await {
                Some(provider) => provider.clone(),
                None => {
                    warn!(tool = %call.tool_name, "Dispatch to unknown or vanished tool");
                    return ToolResult::failure(
                        &call.tool_name,
                        ToolError::tool_not_found(&call.tool_name),
                    );
                }
            },
        };

        debug!(tool = %call.tool_name, provider = provider.id(), "Dispatching tool call");
        provider.execute(call, ctx).await
    }

    async fn refresh(&self) -> usize {
        let routing = self.discover().await;
        let count = routing.spec.len();
        *self.write_routing() = routing;
        debug!(tools = count, "Tool registry refreshed");
        count
    }
}
