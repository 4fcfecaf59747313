//! MCP (Model Context Protocol) server implementation.
//!
//! This module exposes prose checks over the MCP protocol, making them
//! available to AI assistants (Claude Code, Cursor, etc.) via stdio transport.
//!
//! # Architecture
//!
//! The MCP server is a presentation layer. It wraps the same core library
//! that the CLI commands use; each `#[tool]` method delegates to
//! `prosecheck_core` rather than implementing checks itself.
//!
//! # Adding Tools
//!
//! 1. Define a parameter struct with `Deserialize` + `JsonSchema`
//! 2. Add a `#[tool(description = "...")]` method to the `#[tool_router]` impl
//! 3. Call core library functions, convert errors to `McpError`
//! 4. Return `CallToolResult::success(vec![Content::text(...)])`

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use prosecheck_core::config::{Config, DialectKind};
use prosecheck_core::markup::MarkupDialect;
use prosecheck_core::rules::{RuleConfig, describe};
use prosecheck_core::{measure, validate};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `validate_text` and `compute_metrics` tools.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct DocumentParams {
    /// The document text.
    pub text: String,
    /// Markup dialect: html, markdown, bold-headings, class-spans or custom.
    /// Defaults to the configured dialect, then html.
    pub dialect: Option<DialectKind>,
    /// Strip markup syntax before counting words (default: true).
    pub normalize: Option<bool>,
    /// Rule option overrides as `rule.option=value` strings.
    #[serde(default)]
    pub settings: Vec<String>,
}

/// Parameters for the `list_rules` tool.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct ListRulesParams {
    /// Rule option overrides as `rule.option=value` strings.
    #[serde(default)]
    pub settings: Vec<String>,
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))
}

/// MCP server exposing prose checks to AI assistants.
///
/// Each `#[tool]` method in the `#[tool_router]` impl block is automatically
/// registered and callable via the MCP protocol.
#[derive(Clone)]
pub struct ProjectServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    config: Config,
    max_input_bytes: Option<usize>,
}

impl Default for ProjectServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl ProjectServer {
    /// Create a server with default configuration.
    pub fn new() -> Self {
        let config = Config::default();
        let max_input_bytes = config.input_limit();
        Self::with_config(config, max_input_bytes)
    }

    /// Create a server that checks documents under `config`.
    pub fn with_config(config: Config, max_input_bytes: Option<usize>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            config,
            max_input_bytes,
        }
    }

    fn rule_config(&self, settings: &[String]) -> Result<RuleConfig, McpError> {
        let mut rules = self.config.rules.clone();
        for setting in settings {
            rules
                .apply_setting(setting)
                .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        }
        Ok(rules)
    }

    fn prepare(&self, params: &DocumentParams) -> Result<(MarkupDialect, RuleConfig), McpError> {
        if let Some(max) = self.max_input_bytes
            && params.text.len() > max
        {
            return Err(McpError::invalid_params(
                format!(
                    "input too large: {} bytes (limit: {max} bytes)",
                    params.text.len()
                ),
                None,
            ));
        }
        let kind = params
            .dialect
            .or(self.config.dialect)
            .unwrap_or(DialectKind::Html);
        let dialect = self
            .config
            .dialect_for(kind, params.normalize)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        Ok((dialect, self.rule_config(&params.settings)?))
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
        });

        let text = if params.format == "json" {
            to_json(&info)?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Validate a document against every enabled rule.
    #[tool(
        description = "Check a document against the writing rules (sentence length, paragraph length, subheadings, passive voice, transitions, readability, intro shape, heading nesting, links). Returns one pass/fail verdict per rule plus metrics."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn validate_text(
        &self,
        Parameters(params): Parameters<DocumentParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "validate_text", dialect = ?params.dialect, "executing MCP tool");

        let (dialect, rules) = self.prepare(&params)?;
        let report = validate(&params.text, &dialect, &rules)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        let json = to_json(&report)?;

        tracing::info!(
            tool = "validate_text",
            passed = report.passed(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Compute document metrics without evaluating rules.
    #[tool(
        description = "Compute word, sentence and syllable counts, Flesch reading ease, passive and transition ratios, and link density for a document."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn compute_metrics(
        &self,
        Parameters(params): Parameters<DocumentParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "compute_metrics", dialect = ?params.dialect, "executing MCP tool");

        let (dialect, rules) = self.prepare(&params)?;
        let metrics = measure(&params.text, &dialect, &rules)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        let json = to_json(&metrics)?;

        tracing::info!(
            tool = "compute_metrics",
            words = metrics.word_count,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// List rules with their effective thresholds.
    #[tool(description = "List the writing rules, whether each is enabled, and its thresholds.")]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn list_rules(
        &self,
        Parameters(params): Parameters<ListRulesParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "list_rules", "executing MCP tool");

        let rules = self.rule_config(&params.settings)?;
        rules
            .validate_thresholds()
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        let summaries =
            describe(&rules).map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        let json = to_json(&summaries)?;

        tracing::info!(tool = "list_rules", count = summaries.len(), "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for ProjectServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use validate_text to check a document against the writing rules.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    const DOC: &str = "Guides help teams write. They set shared rules. However, rules need care.\n\
                       <h2>Details</h2>\n\
                       Short sentences read well. Therefore, we keep them short.";

    #[test]
    fn server_info_has_correct_name() {
        let server = ProjectServer::new();
        let info = ServerHandler::get_info(&server);

        assert_eq!(info.server_info.name, env!("CARGO_PKG_NAME"));
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn server_has_tools_capability() {
        let server = ProjectServer::new();
        let info = ServerHandler::get_info(&server);

        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn server_has_instructions() {
        let server = ProjectServer::new();
        let info = ServerHandler::get_info(&server);

        let instructions = info.instructions.expect("server should have instructions");
        assert!(instructions.contains(env!("CARGO_PKG_NAME")));
    }

    /// Extract text from the first content item in a `CallToolResult`.
    fn extract_text(result: &CallToolResult) -> Option<&str> {
        result.content.first().and_then(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
    }

    fn doc_params(text: &str) -> DocumentParams {
        DocumentParams {
            text: text.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn get_info_tool_returns_text_by_default() {
        let server = ProjectServer::new();
        let params = Parameters(GetInfoParams {
            format: "text".to_string(),
        });

        let result = server.get_info(params).expect("get_info should succeed");

        assert!(!result.is_error.unwrap_or(false));
        let text = extract_text(&result).expect("should have text content");
        assert!(text.contains(env!("CARGO_PKG_NAME")));
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn get_info_tool_returns_json_when_requested() {
        let server = ProjectServer::new();
        let params = Parameters(GetInfoParams {
            format: "json".to_string(),
        });

        let result = server.get_info(params).expect("get_info should succeed");
        let text = extract_text(&result).expect("should have text content");
        let json: serde_json::Value =
            serde_json::from_str(text).expect("output should be valid JSON");

        assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn validate_text_returns_every_verdict() {
        let server = ProjectServer::new();
        let result = server
            .validate_text(Parameters(doc_params(DOC)))
            .expect("validate_text should succeed");

        let text = extract_text(&result).expect("should have text content");
        let json: serde_json::Value = serde_json::from_str(text).expect("valid JSON");
        let verdicts = json["verdicts"].as_array().unwrap();
        assert_eq!(verdicts.len(), 14);
        assert_eq!(verdicts[0]["rule"], "sentence-length");
        assert!(json["metrics"]["word_count"].as_u64().unwrap() > 0);
    }

    #[test]
    fn validate_text_applies_settings() {
        let server = ProjectServer::new();
        let params = DocumentParams {
            settings: vec!["content-length.min-words=5".to_string()],
            ..doc_params(DOC)
        };
        let result = server.validate_text(Parameters(params)).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(extract_text(&result).unwrap()).unwrap();
        let content = json["verdicts"]
            .as_array()
            .unwrap()
            .iter()
            .find(|v| v["rule"] == "content-length")
            .unwrap();
        assert_eq!(content["passed"], true);
    }

    #[test]
    fn validate_text_rejects_unknown_setting() {
        let server = ProjectServer::new();
        let params = DocumentParams {
            settings: vec!["no-such-rule.max=1".to_string()],
            ..doc_params(DOC)
        };
        assert!(server.validate_text(Parameters(params)).is_err());
    }

    #[test]
    fn validate_text_rejects_oversized_input() {
        let server = ProjectServer::with_config(Config::default(), Some(8));
        assert!(server.validate_text(Parameters(doc_params(DOC))).is_err());
    }

    #[test]
    fn custom_dialect_without_patterns_is_invalid() {
        let server = ProjectServer::new();
        let params = DocumentParams {
            dialect: Some(DialectKind::Custom),
            ..doc_params(DOC)
        };
        assert!(server.validate_text(Parameters(params)).is_err());
    }

    #[test]
    fn compute_metrics_tool_works() {
        let server = ProjectServer::new();
        let params = DocumentParams {
            dialect: Some(DialectKind::Markdown),
            ..doc_params("The cat sat on the mat. The dog ran [home](x.md).")
        };
        let result = server.compute_metrics(Parameters(params)).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(extract_text(&result).unwrap()).unwrap();
        assert_eq!(json["sentence_count"], 2);
        assert_eq!(json["link_count"], 1);
        assert_eq!(json["link_density"]["state"], "words_per_link");
    }

    #[test]
    fn list_rules_tool_works() {
        let server = ProjectServer::new();
        let result = server
            .list_rules(Parameters(ListRulesParams::default()))
            .unwrap();
        let json: serde_json::Value =
            serde_json::from_str(extract_text(&result).unwrap()).unwrap();
        let rules = json.as_array().unwrap();
        assert_eq!(rules.len(), 14);
        assert_eq!(rules[6]["id"], "readability");
        assert_eq!(rules[6]["options"]["min-score"], "60");
    }
}
