//! MCP service implementation using rmcp.
//!
//! This module defines the SqlService struct, which exposes every command in
//! the [`CommandRegistry`] as an MCP tool. Tools are listed from the registry
//! at request time, so the service itself carries no per-tool code.

use crate::models::ResultEnvelope;
use crate::tools::CommandRegistry;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject,
        ListToolsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
        Tool,
    },
    service::{RequestContext, RoleServer},
};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct SqlService {
    /// Shared, read-only command registry
    registry: Arc<CommandRegistry>,
}

impl SqlService {
    /// Create a new SqlService instance.
    ///
    /// # Arguments
    ///
    /// * `registry` - Commands to expose as tools
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    /// One MCP tool per registered command, in name order.
    pub fn tools(&self) -> Vec<Tool> {
        self.registry
            .commands()
            .map(|command| {
                Tool::new(
                    command.name().to_string(),
                    command.description().to_string(),
                    Arc::new(command.schema().to_json_schema()),
                )
            })
            .collect()
    }

    /// Dispatch a tool call and render the envelope as pretty JSON text.
    ///
    /// Unknown commands and invalid arguments become protocol errors; every
    /// other outcome is a normal result, flagged `is_error` when the envelope
    /// status is `error`.
    pub async fn invoke(
        &self,
        name: &str,
        arguments: JsonObject,
    ) -> Result<CallToolResult, McpError> {
        let envelope = match self.registry.dispatch(name, &arguments).await {
            Ok(envelope) => envelope,
            Err(e) if e.is_structural() => return Err(e.into()),
            Err(e) => ResultEnvelope::from_result(Err(e)),
        };
        let content = vec![Content::text(envelope.to_json_string())];

        Ok(if envelope.is_error() {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        })
    }
}

impl ServerHandler for SqlService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "sql-tool-server".to_owned(),
                title: Some("SQL Tool Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "SQLite tools for querying and managing database files.\n\
                \n\
                ## Workflow\n\
                1. Call `list_tables` with a `connection_string` (a file path or sqlite: URL)\n\
                2. Call `describe_table` to see a table's columns\n\
                3. Use `execute_statement` to run SQL; SELECT returns `data`, anything else `affected_rows`\n\
                \n\
                ## Results\n\
                Every tool returns a JSON object with a `status` of `success`, `error`, \
                `not_found` or `exists`, plus the tool's payload or a `message`.\n\
                \n\
                ## Table Names\n\
                `table_name` must be letters, digits and underscores, not starting with a digit."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = self.tools();
        info!(count = tools.len(), "ListTools");
        Ok(ListToolsResult::with_all_items(tools))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let arguments = request.arguments.unwrap_or_default();
        self.invoke(&request.name, arguments).await
    }
}
