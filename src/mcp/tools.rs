//! Tool implementations: each call runs a fresh discovery pass.

use serde_json::{json, Value};
use std::path::Path;

use super::types::{ToolOutput, ToolSpec};
use crate::config::EndpointsConfig;
use crate::manifest::{list_endpoints, EndpointDescriptor, Verb};

pub fn list_tools() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "endpoints_list",
            description: "List every HTTP endpoint defined by script files under the root, \
                with verb, required roles, input arguments, and inferred CRUD/SQL type.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "verb": {
                        "type": "string",
                        "description": "Optional: only endpoints with this verb",
                        "enum": ["get", "post", "put", "delete"]
                    }
                }
            }),
        },
        ToolSpec {
            name: "endpoints_describe",
            description: "Describe one endpoint by path and verb.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Endpoint path, e.g. 'magic/modules/shop/items'"
                    },
                    "verb": {
                        "type": "string",
                        "enum": ["get", "post", "put", "delete"]
                    }
                },
                "required": ["path", "verb"]
            }),
        },
    ]
}

pub fn call_tool(root: &Path, config: &EndpointsConfig, name: &str, arguments: &Value) -> ToolOutput {
    match name {
        "endpoints_list" => handle_list(root, config, arguments),
        "endpoints_describe" => handle_describe(root, config, arguments),
        _ => ToolOutput::error(format!("Unknown tool: {}", name)),
    }
}

fn verb_arg(args: &Value) -> Result<Option<Verb>, ToolOutput> {
    match args.get("verb").and_then(Value::as_str) {
        None => Ok(None),
        Some(v) => Verb::from_segment(v)
            .map(Some)
            .ok_or_else(|| ToolOutput::error(format!("Unsupported verb: {}", v))),
    }
}

fn to_output(endpoints: &[EndpointDescriptor]) -> ToolOutput {
    match serde_json::to_string_pretty(endpoints) {
        Ok(json) => ToolOutput::text(json),
        Err(e) => ToolOutput::error(e.to_string()),
    }
}

fn handle_list(root: &Path, config: &EndpointsConfig, args: &Value) -> ToolOutput {
    let verb = match verb_arg(args) {
        Ok(v) => v,
        Err(out) => return out,
    };
    match list_endpoints(root, config) {
        Ok(manifest) => {
            let selected: Vec<_> = manifest
                .into_iter()
                .filter(|e| verb.map_or(true, |v| e.verb == v))
                .collect();
            to_output(&selected)
        }
        Err(e) => ToolOutput::error(e.to_string()),
    }
}

fn handle_describe(root: &Path, config: &EndpointsConfig, args: &Value) -> ToolOutput {
    let Some(path) = args.get("path").and_then(Value::as_str) else {
        return ToolOutput::error("Missing required parameter: path");
    };
    let verb = match verb_arg(args) {
        Ok(Some(v)) => v,
        Ok(None) => return ToolOutput::error("Missing required parameter: verb"),
        Err(out) => return out,
    };
    match list_endpoints(root, config) {
        Ok(manifest) => match manifest.into_iter().find(|e| e.path == path && e.verb == verb) {
            Some(endpoint) => to_output(&[endpoint]),
            None => ToolOutput::error(format!("No endpoint {} {}", verb, path)),
        },
        Err(e) => ToolOutput::error(e.to_string()),
    }
}
