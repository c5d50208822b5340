//! JSON-RPC 2.0 server: reads requests from stdin, writes responses to stdout.
//!
//! Messages are newline-delimited JSON. Tracing output goes to stderr so it
//! doesn't interfere with the protocol.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use super::tools;
use super::types::*;
use crate::config::EndpointsConfig;

/// What the server discovers endpoints from.
#[derive(Debug, Clone)]
pub struct ServerContext {
    pub root: PathBuf,
    pub config: EndpointsConfig,
}

/// Serve stdin/stdout until stdin closes.
pub fn run(context: &ServerContext) {
    let stdin = io::stdin();
    let stdout = io::stdout();
    serve(context, stdin.lock(), &mut stdout.lock());
}

/// Serve requests from `input`, writing one response line per request.
pub fn serve<R: BufRead, W: Write>(context: &ServerContext, input: R, output: &mut W) {
    info!(root = %context.root.display(), "endpoint server starting");

    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!(error = %e, "failed to read input");
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        debug!(request = %trimmed, "received request");

        let response = match serde_json::from_str::<RpcRequest>(trimmed) {
            Ok(request) => handle_request(context, &request),
            Err(e) => {
                warn!(error = %e, "invalid JSON-RPC request");
                Some(RpcResponse::failure(None, PARSE_ERROR, format!("Parse error: {}", e)))
            }
        };

        if let Some(response) = response {
            write_response(output, &response);
        }
    }

    info!("endpoint server shutting down");
}

/// Handle one request. Notifications get no response.
fn handle_request(context: &ServerContext, request: &RpcRequest) -> Option<RpcResponse> {
    let id = request.id.clone();

    match request.method.as_str() {
        "initialize" => Some(RpcResponse::success(
            id,
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": "lambda-endpoints",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )),

        "notifications/initialized" => None,

        "tools/list" => Some(RpcResponse::success(
            id,
            json!({ "tools": tools::list_tools() }),
        )),

        "tools/call" => {
            let call: ToolCall = match serde_json::from_value(request.params.clone()) {
                Ok(c) => c,
                Err(e) => {
                    return Some(RpcResponse::failure(
                        id,
                        INVALID_PARAMS,
                        format!("Invalid params: {}", e),
                    ));
                }
            };
            debug!(tool = %call.name, "calling tool");
            let output = tools::call_tool(&context.root, &context.config, &call.name, &call.arguments);
            Some(match serde_json::to_value(output) {
                Ok(result) => RpcResponse::success(id, result),
                Err(e) => RpcResponse::failure(id, INVALID_PARAMS, e.to_string()),
            })
        }

        "ping" => Some(RpcResponse::success(id, Value::Object(Default::default()))),

        _ => {
            warn!(method = %request.method, "unknown method");
            Some(RpcResponse::failure(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ))
        }
    }
}

fn write_response(output: &mut impl Write, response: &RpcResponse) {
    let json = serde_json::to_string(response).unwrap_or_default();
    debug!(response = %json, "sending response");
    let _ = writeln!(output, "{}", json);
    let _ = output.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn exchange(context: &ServerContext, requests: &str) -> Vec<Value> {
        let mut out = Vec::new();
        serve(context, requests.as_bytes(), &mut out);
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn context_with_endpoint() -> (tempfile::TempDir, ServerContext) {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("modules/shop/items.delete.hl");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(
            &file,
            "auth.ticket.verify:admin\nwait.signal\n   database:shop\n   table:items\n",
        )
        .unwrap();
        let context = ServerContext {
            root: dir.path().to_path_buf(),
            config: EndpointsConfig::default(),
        };
        (dir, context)
    }

    #[test]
    fn test_initialize_and_notification() {
        let (_dir, context) = context_with_endpoint();
        let responses = exchange(
            &context,
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"initialize\",\"params\":{}}\n\
             {\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n",
        );
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["result"]["serverInfo"]["name"], "lambda-endpoints");
    }

    #[test]
    fn test_tools_call_lists_endpoints() {
        let (_dir, context) = context_with_endpoint();
        let responses = exchange(
            &context,
            "{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"tools/call\",\"params\":{\"name\":\"endpoints_list\",\"arguments\":{\"verb\":\"delete\"}}}\n",
        );
        let text = responses[0]["result"]["content"][0]["text"].as_str().unwrap();
        let manifest: Value = serde_json::from_str(text).unwrap();
        assert_eq!(manifest[0]["path"], "magic/modules/shop/items");
        assert_eq!(manifest[0]["type"], "crud-delete");
        assert_eq!(manifest[0]["auth"][0], "admin");
    }

    #[test]
    fn test_describe_missing_endpoint_is_tool_error() {
        let (_dir, context) = context_with_endpoint();
        let responses = exchange(
            &context,
            "{\"jsonrpc\":\"2.0\",\"id\":3,\"method\":\"tools/call\",\"params\":{\"name\":\"endpoints_describe\",\"arguments\":{\"path\":\"magic/nope\",\"verb\":\"get\"}}}\n",
        );
        assert_eq!(responses[0]["result"]["isError"], true);
    }

    #[test]
    fn test_bad_json_and_unknown_method() {
        let (_dir, context) = context_with_endpoint();
        let responses = exchange(
            &context,
            "not json\n{\"jsonrpc\":\"2.0\",\"id\":4,\"method\":\"resources/list\"}\n",
        );
        assert_eq!(responses[0]["error"]["code"], PARSE_ERROR);
        assert_eq!(responses[1]["error"]["code"], METHOD_NOT_FOUND);
    }
}
