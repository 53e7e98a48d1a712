//! HTTP server for the dashboard UI.
//! Simple HTTP server using tokio and basic HTTP handling; JSON endpoints
//! for the metric tiles, the dataset preview, and the chatbot.

use std::path::PathBuf;
use std::sync::Arc;
use steamdash::chatbot;
use steamdash::dashboard::DashboardView;
use steamdash::dataset::Dataset;
use steamdash::intent::classify;
use steamdash::llm::AiBridge;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

const DATASET_PREVIEW_ROWS: usize = 50;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let data_path =
        std::env::var("STEAMDASH_DATA").unwrap_or_else(|_| "data/steam_games.csv".to_string());
    let bind_addr =
        std::env::var("STEAMDASH_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    // The dataset is loaded exactly once and shared read-only with every
    // connection. A failed load is fatal; there is no dashboard without it.
    info!("Loading dataset from {}", data_path);
    let dataset = Arc::new(Dataset::load(&PathBuf::from(&data_path))?);
    info!("Loaded {} games", dataset.height());

    let bridge = Arc::new(AiBridge::from_env());
    if !bridge.is_enabled() {
        warn!("AI answers disabled: OPENAI_API_KEY not set");
    }

    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Server listening on http://{}", bind_addr);

    loop {
        let (stream, addr) = listener.accept().await?;
        info!("New connection from {}", addr);
        let dataset = Arc::clone(&dataset);
        let bridge = Arc::clone(&bridge);
        tokio::spawn(handle_connection(stream, dataset, bridge));
    }
}

async fn handle_connection(mut stream: TcpStream, dataset: Arc<Dataset>, bridge: Arc<AiBridge>) {
    let mut buffer = [0; 8192];

    match stream.read(&mut buffer).await {
        Ok(size) => {
            let request = String::from_utf8_lossy(&buffer[..size]);
            let response = handle_request(&request, &dataset, &bridge).await;

            if let Err(e) = stream.write_all(response.as_bytes()).await {
                warn!("Failed to write response: {}", e);
            }
        }
        Err(e) => {
            warn!("Failed to read from stream: {}", e);
        }
    }
}

async fn handle_request(request: &str, dataset: &Dataset, bridge: &AiBridge) -> String {
    let lines: Vec<&str> = request.lines().collect();
    if lines.is_empty() {
        return create_response(400, "Bad Request", "{}");
    }

    let request_line = lines[0];
    let parts: Vec<&str> = request_line.split_whitespace().collect();

    if parts.len() < 2 {
        return create_response(400, "Bad Request", "{}");
    }

    let method = parts[0];
    let mut path_str = parts[1].to_string();

    // Remove query parameters if present
    if let Some(query_start) = path_str.find('?') {
        path_str = path_str[..query_start].to_string();
    }

    // Normalize path (remove trailing slash except for root)
    path_str = path_str.trim_end_matches('/').to_string();
    if path_str.is_empty() {
        path_str = "/".to_string();
    }
    let path = path_str.as_str();

    info!("Request: {} {}", method, path);

    match (method, path) {
        ("GET", "/api/health") => {
            let body = serde_json::json!({
                "status": "ok",
                "service": "steamdash-api",
                "total_games": dataset.height(),
                "ai_enabled": bridge.is_enabled()
            });
            create_response(200, "OK", &body.to_string())
        }
        ("GET", "/api/dashboard") => match DashboardView::build(dataset) {
            Ok(view) => match serde_json::to_string(&view) {
                Ok(json) => create_response(200, "OK", &json),
                Err(_) => create_response(
                    500,
                    "Internal Server Error",
                    r#"{"error":"Failed to serialize dashboard"}"#,
                ),
            },
            Err(e) => {
                warn!("Dashboard build failed: {}", e);
                let body = serde_json::json!({ "error": e.to_string() });
                create_response(200, "OK", &body.to_string())
            }
        },
        ("GET", "/api/dataset") => match dataset.rows_json(DATASET_PREVIEW_ROWS) {
            Ok(rows) => {
                let body = serde_json::json!({
                    "columns": dataset.columns(),
                    "rows": rows,
                    "row_count": dataset.height()
                });
                create_response(200, "OK", &body.to_string())
            }
            Err(e) => {
                warn!("Dataset preview failed: {}", e);
                create_response(
                    500,
                    "Internal Server Error",
                    r#"{"error":"Failed to render dataset preview"}"#,
                )
            }
        },
        ("POST", "/api/chat") => {
            // Extract query from body
            let body_start = request.find("\r\n\r\n").unwrap_or(request.len());
            let body = &request[body_start..].trim();

            let mut query = String::new();
            let mut use_ai = false;

            if let Some(json_start) = body.find('{') {
                let json_str = &body[json_start..];
                if let Ok(json) = serde_json::from_str::<serde_json::Value>(json_str) {
                    if let Some(q) = json.get("query").and_then(|v| v.as_str()) {
                        query = q.to_string();
                    }
                    use_ai = json.get("use_ai").and_then(|v| v.as_bool()).unwrap_or(false);
                }
            }

            if query.is_empty() {
                return create_response(400, "Bad Request", r#"{"error":"Query is required"}"#);
            }

            let request_id = uuid::Uuid::new_v4();
            info!("Chat request {}: {}", request_id, query);

            let intent = classify(&query);
            let reply = match chatbot::respond(dataset, &query) {
                Ok(reply) => reply,
                Err(e) => {
                    warn!("Chat request {} failed: {}", request_id, e);
                    return create_response(
                        500,
                        "Internal Server Error",
                        r#"{"error":"Failed to answer query"}"#,
                    );
                }
            };

            let mut response = serde_json::json!({
                "intent": intent,
                "reply": reply
            });

            if use_ai {
                // AI failures ride along as text; the rule-based reply above
                // is unaffected.
                let ai_answer = match bridge.ask(&query, dataset).await {
                    Ok(answer) => answer,
                    Err(e) => e.to_string(),
                };
                response["ai_answer"] = serde_json::Value::String(ai_answer);
            }

            create_response(200, "OK", &response.to_string())
        }
        ("OPTIONS", _) => {
            // Handle CORS preflight
            create_response(200, "OK", "")
        }
        _ => {
            warn!("404: {} {} not found", method, path);
            create_response(
                404,
                "Not Found",
                &format!(r#"{{"error":"Endpoint not found: {} {}"}}"#, method, path),
            )
        }
    }
}

fn create_response(status: u16, status_text: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {} {}\r\n\
         Content-Type: application/json\r\n\
         Access-Control-Allow-Origin: *\r\n\
         Access-Control-Allow-Methods: GET, POST, OPTIONS\r\n\
         Access-Control-Allow-Headers: Content-Type\r\n\
         Content-Length: {}\r\n\
         \r\n\
         {}",
        status,
        status_text,
        body.len(),
        body
    )
}
