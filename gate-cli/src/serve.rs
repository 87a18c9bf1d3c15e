//! Line-delimited JSON loop advertising the filtered tool set.
//!
//! Each input line is one request object: `{"id": .., "method": ..,
//! "params": {..}}`. Each request gets exactly one response line. Bad input
//! yields an error response; the loop only stops at end of input.

use anyhow::Result;
use gate_filter::FilteredRegistry;
use gate_primitives::CategoryScope;
use gate_registry::ToolSource;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

const PARSE_ERROR: i64 = -32700;
const METHOD_NOT_FOUND: i64 = -32601;
const RELOAD_FAILED: i64 = -32001;

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Value,
    method: String,
    #[serde(default)]
    params: Option<ListParams>,
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Serialize)]
struct Response {
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: i64,
    message: String,
}

impl Response {
    fn ok(id: Value, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    fn err(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(ErrorBody {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Answers requests from `input` until end of input.
///
/// Returns the number of requests handled.
///
/// # Errors
///
/// Fails only on I/O errors reading `input` or writing `output`.
pub async fn serve<S, R, W>(
    tools: &FilteredRegistry<S>,
    mut input: R,
    mut output: W,
) -> Result<usize>
where
    S: ToolSource,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut handled = 0;
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => respond(tools, line.trim()),
            Err(err) => {
                warn!(error = %err, "request line is not valid UTF-8");
                Response::err(
                    Value::Null,
                    PARSE_ERROR,
                    format!("request is not valid UTF-8: {err}"),
                )
            }
        };
        let mut bytes = serde_json::to_vec(&response)?;
        bytes.push(b'\n');
        output.write_all(&bytes).await?;
        output.flush().await?;
        handled += 1;
    }

    info!(requests = handled, "input closed; stopping");
    Ok(handled)
}

fn respond<S: ToolSource>(tools: &FilteredRegistry<S>, line: &str) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(err) => {
            warn!(error = %err, "malformed request");
            return Response::err(Value::Null, PARSE_ERROR, format!("malformed request: {err}"));
        }
    };
    debug!(method = %request.method, "request received");

    match request.method.as_str() {
        "tools/list" => {
            let scope = CategoryScope::from(request.params.and_then(|params| params.category));
            let listed = tools.list_tools(&scope);
            Response::ok(request.id, json!({ "tools": listed }))
        }
        "tools/reload" => match tools.allow_list().reload() {
            Ok(state) => Response::ok(
                request.id,
                json!({
                    "filtered": state.is_configured(),
                    "entries": state.allow_list().map(gate_filter::AllowList::len),
                }),
            ),
            Err(err) => {
                warn!(error = %err, "allow-list reload failed; keeping previous list");
                Response::err(request.id, RELOAD_FAILED, err.to_string())
            }
        },
        other => Response::err(
            request.id,
            METHOD_NOT_FOUND,
            format!("unknown method `{other}`"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use gate_filter::{AllowListHandle, AllowListState, parse_lines};
    use gate_primitives::ToolDescriptor;
    use gate_registry::ToolRegistry;

    use super::*;

    fn registry() -> ToolRegistry {
        ToolRegistry::from_descriptors([
            ToolDescriptor::new("ArXiv_search_papers")
                .unwrap()
                .with_category("literature"),
            ToolDescriptor::new("Other_tool").unwrap(),
            ToolDescriptor::new("PubMed_search_articles")
                .unwrap()
                .with_category("literature"),
        ])
        .unwrap()
    }

    async fn exchange<S: ToolSource>(tools: &FilteredRegistry<S>, input: &str) -> Vec<Value> {
        let mut output = Vec::new();
        serve(tools, input.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn names(response: &Value) -> Vec<&str> {
        response["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|tool| tool["name"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn lists_only_permitted_tools() {
        let handle = AllowListHandle::fixed(AllowListState::Filter(parse_lines([
            "PubMed_search_articles",
            "Other_tool",
        ])));
        let tools = FilteredRegistry::new(registry(), Arc::new(handle));

        let responses = exchange(&tools, "{\"id\": 1, \"method\": \"tools/list\"}\n").await;
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(names(&responses[0]), ["Other_tool", "PubMed_search_articles"]);
    }

    #[tokio::test]
    async fn category_param_scopes_listing() {
        let tools = FilteredRegistry::new(
            registry(),
            Arc::new(AllowListHandle::fixed(AllowListState::NoFilter)),
        );

        let responses = exchange(
            &tools,
            r#"{"id": "a", "method": "tools/list", "params": {"category": "literature"}}"#,
        )
        .await;
        assert_eq!(
            names(&responses[0]),
            ["ArXiv_search_papers", "PubMed_search_articles"]
        );
    }

    #[tokio::test]
    async fn bad_requests_get_errors_and_loop_continues() {
        let tools = FilteredRegistry::new(
            registry(),
            Arc::new(AllowListHandle::fixed(AllowListState::NoFilter)),
        );

        let input = "not json\n\n{\"id\": 2, \"method\": \"tools/call\"}\n{\"id\": 3, \"method\": \"tools/list\"}\n";
        let responses = exchange(&tools, input).await;

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["error"]["code"], PARSE_ERROR);
        assert_eq!(responses[1]["id"], 2);
        assert_eq!(responses[1]["error"]["code"], METHOD_NOT_FOUND);
        assert_eq!(names(&responses[2]).len(), 3);
    }

    #[tokio::test]
    async fn invalid_utf8_line_is_rejected_and_loop_continues() {
        let tools = FilteredRegistry::new(
            registry(),
            Arc::new(AllowListHandle::fixed(AllowListState::NoFilter)),
        );

        let mut output = Vec::new();
        let input: &[u8] = b"\xff\xfe garbage\n{\"id\": 2, \"method\": \"tools/list\"}\n";
        let handled = serve(&tools, input, &mut output).await.unwrap();
        assert_eq!(handled, 2);

        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(responses[0]["id"], Value::Null);
        assert_eq!(responses[0]["error"]["code"], PARSE_ERROR);
        assert_eq!(responses[1]["id"], 2);
        assert_eq!(names(&responses[1]).len(), 3);
    }

    #[tokio::test]
    async fn null_params_list_everything_and_keep_the_id() {
        let tools = FilteredRegistry::new(
            registry(),
            Arc::new(AllowListHandle::fixed(AllowListState::NoFilter)),
        );

        let responses = exchange(
            &tools,
            r#"{"id": 7, "method": "tools/list", "params": null}"#,
        )
        .await;
        assert_eq!(responses[0]["id"], 7);
        assert!(responses[0].get("error").is_none());
        assert_eq!(names(&responses[0]).len(), 3);
    }

    #[tokio::test]
    async fn reload_swaps_list_and_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.txt");
        fs::write(&path, "Other_tool\n").unwrap();

        let handle = Arc::new(AllowListHandle::load(Some(path.clone())).unwrap());
        let tools = FilteredRegistry::new(registry(), Arc::clone(&handle));

        fs::write(&path, "# none\n").unwrap();
        let responses = exchange(
            &tools,
            "{\"id\": 1, \"method\": \"tools/reload\"}\n{\"id\": 2, \"method\": \"tools/list\"}\n",
        )
        .await;
        assert_eq!(responses[0]["result"]["filtered"], true);
        assert_eq!(responses[0]["result"]["entries"], 0);
        assert!(names(&responses[1]).is_empty());

        fs::remove_file(&path).unwrap();
        let responses = exchange(&tools, "{\"id\": 3, \"method\": \"tools/reload\"}\n").await;
        assert_eq!(responses[0]["error"]["code"], RELOAD_FAILED);
        let message = responses[0]["error"]["message"].as_str().unwrap();
        assert!(message.contains("tools.txt"));
        assert!(handle.snapshot().is_configured());
    }
}
