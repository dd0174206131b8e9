//! Absurdum MCP Server
//!
//! Line-delimited JSON-RPC over stdio.
//!
//! Tools:
//! - find_units: Every quantity mention in a text
//! - find_first_unit: The first mention only
//! - normalize: Mentions converted to their base units
//! - render_useless: A base-unit value in a random useless unit
//! - prettify: Human-friendly rendering of a number
//! - categories: Supported categories and their base units
//!
//! Configuration: `ABSURDUM_CONFIG` may point to a JSON file with rendering
//! options. Logs go to stderr, filtered by `RUST_LOG` (default `info`).

use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use absurdum_core::Number;
use absurdum_units::{
    find_all, find_first, find_normalized, parse_amount, prettify_with, render_useless_with,
    thread_picker, Category, Mention, RenderConfig,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "absurdum";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const CONFIG_ENV: &str = "ABSURDUM_CONFIG";

/// Load rendering options from `ABSURDUM_CONFIG`, falling back to defaults
fn load_config() -> RenderConfig {
    let Ok(path) = env::var(CONFIG_ENV) else {
        return RenderConfig::default();
    };

    let parsed = fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str::<RenderConfig>(&content).map_err(|e| e.to_string()));

    match parsed {
        Ok(config) => {
            info!(path = %path, "loaded configuration");
            config
        }
        Err(e) => {
            warn!(path = %path, error = %e, "invalid configuration, using defaults");
            RenderConfig::default()
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

// MCP Protocol types
#[derive(Debug, Deserialize)]
struct McpRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpError {
    fn invalid_params(message: impl Into<String>) -> Self {
        McpError { code: -32602, message: message.into(), data: None }
    }

    fn internal(message: impl Into<String>) -> Self {
        McpError { code: -32603, message: message.into(), data: None }
    }
}

fn main() {
    init_tracing();
    let config = load_config();

    info!(version = SERVER_VERSION, protocol = PROTOCOL_VERSION, "Absurdum MCP server started");

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                debug!(bytes = line.len(), "received request");

                let request: McpRequest = match serde_json::from_str(line) {
                    Ok(r) => r,
                    Err(e) => {
                        warn!(error = %e, "error parsing request");
                        let response = McpResponse {
                            jsonrpc: "2.0".to_string(),
                            id: None,
                            result: None,
                            error: Some(McpError {
                                code: -32700,
                                message: format!("Parse error: {}", e),
                                data: None,
                            }),
                        };
                        if !write_response(&response) {
                            break;
                        }
                        continue;
                    }
                };

                let response = handle_request(&config, &request);

                // Notifications (no id) get no response
                if request.id.is_none() {
                    debug!(method = %request.method, "notification processed");
                    continue;
                }

                if !write_response(&response) {
                    break;
                }
                debug!(method = %request.method, "sent response");
            }
            Err(e) => {
                error!(error = %e, "error reading input");
                break;
            }
        }
    }

    info!("server shutting down");
}

/// Write one response line to stdout. Returns false when stdout is gone.
fn write_response(response: &McpResponse) -> bool {
    let response_json = match serde_json::to_string(response) {
        Ok(json) => json,
        Err(e) => {
            error!(error = %e, "error serializing response");
            return true;
        }
    };

    let mut stdout = io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{}", response_json) {
        error!(error = %e, "error writing response");
        return false;
    }
    if let Err(e) = stdout.flush() {
        error!(error = %e, "error flushing stdout");
        return false;
    }
    true
}

fn handle_request(config: &RenderConfig, request: &McpRequest) -> McpResponse {
    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => handle_tools_list(),
        "tools/call" => handle_tool_call(config, &request.params),

        _ => Err(McpError {
            code: -32601,
            message: format!("Method not found: {}", request.method),
            data: None,
        }),
    };

    match result {
        Ok(r) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: Some(r),
            error: None,
        },
        Err(e) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: None,
            error: Some(e),
        },
    }
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params.as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Finds physical quantities in text and restates them in useless units"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Use 'find_units' to locate quantities in a text, 'normalize' to convert them to base units, and 'render_useless' to restate a base-unit value in a whimsical unit."
    }))
}

fn text_tool(name: &str, description: &str) -> JsonValue {
    json!({
        "name": name,
        "description": description,
        "inputSchema": {
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Free text to scan"
                }
            },
            "required": ["text"]
        }
    })
}

fn handle_tools_list() -> Result<JsonValue, McpError> {
    let categories: Vec<&str> = Category::ALL.iter().map(|c| c.name()).collect();

    Ok(json!({
        "tools": [
            text_tool("find_units", "List every quantity mention in a text, in category order."),
            text_tool("find_first_unit", "Return the first quantity mention in a text, if any."),
            text_tool("normalize", "List every quantity mention converted to its category's base unit."),
            {
                "name": "render_useless",
                "description": "Restate a base-unit value in a randomly chosen useless unit.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "enum": categories,
                            "description": "Category of the value"
                        },
                        "value": {
                            "type": "string",
                            "description": "Value in the category's base unit"
                        }
                    },
                    "required": ["category", "value"]
                }
            },
            {
                "name": "prettify",
                "description": "Render a number the way useless units are rendered.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "value": {
                            "type": "string",
                            "description": "Decimal number, thousands separators allowed"
                        },
                        "places": {
                            "type": "integer",
                            "description": "Fractional digits before compaction (default: 6)"
                        }
                    },
                    "required": ["value"]
                }
            },
            {
                "name": "categories",
                "description": "List supported categories and their base units.",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            }
        ]
    }))
}

fn handle_tool_call(config: &RenderConfig, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params.as_ref().ok_or(McpError::invalid_params("Missing params"))?;

    let name = params.get("name")
        .and_then(|v| v.as_str())
        .ok_or(McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));

    match name {
        "find_units" => tool_find_units(args),
        "find_first_unit" => tool_find_first_unit(args),
        "normalize" => tool_normalize(args),
        "render_useless" => tool_render_useless(config, args),
        "prettify" => tool_prettify(config, args),
        "categories" => tool_categories(args),
        _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    }
}

fn string_arg<'a>(args: &'a JsonValue, name: &str) -> Result<&'a str, McpError> {
    args.get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params(format!("Missing {} argument", name)))
}

fn amount_arg(args: &JsonValue) -> Result<Number, McpError> {
    parse_amount(string_arg(args, "value")?).map_err(|e| McpError::invalid_params(e.to_string()))
}

fn to_json<T: Serialize>(value: &T) -> Result<JsonValue, McpError> {
    serde_json::to_value(value).map_err(|e| McpError::internal(e.to_string()))
}

fn describe(mention: &Mention) -> String {
    let normal = mention.to_normal();
    format!(
        "- {} ({}): {} {}",
        mention.original_text(),
        mention.category(),
        normal.value,
        mention.category().base_unit()
    )
}

fn mention_list(mentions: &[Mention]) -> String {
    if mentions.is_empty() {
        return "No quantities found.".to_string();
    }
    mentions.iter().map(describe).collect::<Vec<_>>().join("\n")
}

fn tool_find_units(args: JsonValue) -> Result<JsonValue, McpError> {
    let text = string_arg(&args, "text")?;
    let mentions: Vec<Mention> = find_all(text).collect();

    Ok(json!({
        "content": [{ "type": "text", "text": mention_list(&mentions) }],
        "mentions": to_json(&mentions)?
    }))
}

fn tool_find_first_unit(args: JsonValue) -> Result<JsonValue, McpError> {
    let text = string_arg(&args, "text")?;
    let mention = find_first(text);
    let summary = match &mention {
        Some(m) => describe(m),
        None => "No quantities found.".to_string(),
    };

    Ok(json!({
        "content": [{ "type": "text", "text": summary }],
        "mention": to_json(&mention)?
    }))
}

fn tool_normalize(args: JsonValue) -> Result<JsonValue, McpError> {
    let text = string_arg(&args, "text")?;
    let normalized: Vec<_> = find_normalized(text).collect();

    let summary = if normalized.is_empty() {
        "No quantities found.".to_string()
    } else {
        normalized
            .iter()
            .map(|q| format!("- {} {}", q.value, q.category.base_unit()))
            .collect::<Vec<_>>()
            .join("\n")
    };

    Ok(json!({
        "content": [{ "type": "text", "text": summary }],
        "quantities": to_json(&normalized)?
    }))
}

fn tool_render_useless(config: &RenderConfig, args: JsonValue) -> Result<JsonValue, McpError> {
    let category: Category = string_arg(&args, "category")?
        .parse()
        .map_err(|e: absurdum_units::UnitsError| McpError::invalid_params(e.to_string()))?;
    let value = amount_arg(&args)?;

    let mut picker = thread_picker();
    let rendered = render_useless_with(category, &value, config, &mut picker);

    Ok(json!({
        "content": [{
            "type": "text",
            "text": rendered.clone().unwrap_or_else(|| "Nothing useless to say about that.".to_string())
        }],
        "rendered": rendered
    }))
}

fn tool_prettify(config: &RenderConfig, args: JsonValue) -> Result<JsonValue, McpError> {
    let value = amount_arg(&args)?;

    let mut pretty_config = config.pretty.clone();
    if let Some(places) = args.get("places") {
        let places = places.as_u64()
            .filter(|p| *p <= 30)
            .ok_or(McpError::invalid_params("places must be an integer between 0 and 30"))?;
        pretty_config.places = places as usize;
    }
    let pretty = prettify_with(&value, &pretty_config);

    Ok(json!({
        "content": [{ "type": "text", "text": pretty }],
        "value": value.to_string()
    }))
}

fn tool_categories(_args: JsonValue) -> Result<JsonValue, McpError> {
    let listing: Vec<JsonValue> = Category::ALL
        .iter()
        .map(|c| json!({ "name": c.name(), "base_unit": c.base_unit() }))
        .collect();
    let summary = Category::ALL
        .iter()
        .map(|c| format!("- {} ({})", c.name(), c.base_unit()))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(json!({
        "content": [{ "type": "text", "text": summary }],
        "categories": listing
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: &str, params: JsonValue) -> McpRequest {
        McpRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params: Some(params),
        }
    }

    fn call(tool: &str, arguments: JsonValue) -> McpResponse {
        let req = request("tools/call", json!({ "name": tool, "arguments": arguments }));
        handle_request(&RenderConfig::default(), &req)
    }

    #[test]
    fn test_unknown_method() {
        let response = handle_request(&RenderConfig::default(), &request("nope", json!({})));
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[test]
    fn test_tools_list() {
        let response = handle_request(&RenderConfig::default(), &request("tools/list", json!({})));
        let tools = response.result.unwrap();
        let names: Vec<&str> = tools["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["find_units", "find_first_unit", "normalize", "render_useless", "prettify", "categories"]
        );
    }

    #[test]
    fn test_find_units_tool() {
        let response = call("find_units", json!({ "text": "I walked 12 miles to have 5 minutes of peace." }));
        let result = response.result.unwrap();
        let mentions = result["mentions"].as_array().unwrap();
        assert_eq!(mentions.len(), 2);
        assert_eq!(mentions[0]["unit"], "miles");
        assert_eq!(mentions[1]["unit"], "minutes");
    }

    #[test]
    fn test_find_first_unit_tool_empty() {
        let response = call("find_first_unit", json!({ "text": "nothing here" }));
        let result = response.result.unwrap();
        assert!(result["mention"].is_null());
    }

    #[test]
    fn test_normalize_tool() {
        let response = call("normalize", json!({ "text": "300 km" }));
        let result = response.result.unwrap();
        assert_eq!(result["quantities"][0]["value"], "300000");
    }

    #[test]
    fn test_render_useless_invalid_category() {
        let response = call("render_useless", json!({ "category": "temperature", "value": "10" }));
        let err = response.error.unwrap();
        assert_eq!(err.code, -32602);
        assert!(err.message.contains("temperature"));
    }

    #[test]
    fn test_render_useless_tool() {
        let response = call("render_useless", json!({ "category": "power", "value": "10" }));
        let result = response.result.unwrap();
        assert!(result["rendered"].as_str().unwrap().starts_with("40 "));
    }

    #[test]
    fn test_prettify_tool() {
        let response = call("prettify", json!({ "value": "1234567890" }));
        let result = response.result.unwrap();
        assert_eq!(result["content"][0]["text"], "1,234 million");
    }

    #[test]
    fn test_prettify_tool_places() {
        let response = call("prettify", json!({ "value": "0.125", "places": 2 }));
        let result = response.result.unwrap();
        assert_eq!(result["content"][0]["text"], "0.12");

        let response = call("prettify", json!({ "value": "1", "places": "many" }));
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[test]
    fn test_missing_argument() {
        let response = call("find_units", json!({}));
        assert_eq!(response.error.unwrap().code, -32602);
    }
}
