//! API Server Module
//!
//! This module implements a JSON-RPC server in front of the contract.
//! The JSON-RPC `method` names the contract function; the params carry the
//! ordered string arguments and, optionally, the ambient transaction
//! timestamp assigned by the ordering service.

use crate::{
    Receipt, ValidationError,
    config::Config,
    context::{Clock, Invocation},
    contract::Contract,
    state::StateStore,
};
use axum::{Router, routing::post, Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn, error};

/// Shared application state that is accessible across all request handlers
///
/// - `contract`: Routes invocations to the registrar and validator
/// - `store`: Ledger and node registry storage
/// - `clock`: Validator wall clock used for freshness checks
/// - `stamp_on_receipt`: Whether unstamped requests get the server time as their timestamp
#[derive(Clone)]
pub struct AppState {
    contract: Arc<Contract>,
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
    stamp_on_receipt: bool,
}

/// The main API server struct
///
/// Encapsulates the server configuration and application state.
pub struct Server {
    config: Config,
    state: AppState,
}

impl Server {
    /// Creates a new API server instance
    ///
    /// # Arguments
    /// * `config` - Server configuration (host, port, validation rules)
    /// * `store` - The state store shared by every request
    /// * `clock` - Source of the validator's current time
    pub fn new(config: Config, store: Arc<dyn StateStore>, clock: Arc<dyn Clock>) -> Self {
        let contract = Arc::new(Contract::new(&config.validation));

        let state = AppState {
            contract,
            store,
            clock,
            stamp_on_receipt: config.api.stamp_on_receipt,
        };

        Self { config, state }
    }

    /// Builds the router with a single POST endpoint that handles JSON-RPC requests
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", post(handle_rpc))
            .with_state(self.state.clone())
    }

    /// Starts the API server and begins listening for incoming requests
    ///
    /// Runs the contract init hook once, then serves until the listener fails.
    pub async fn start(self) -> anyhow::Result<()> {
        self.state.contract.init()?;
        let app = self.router();

        let addr = format!("{}:{}", self.config.api.host, self.config.api.port);
        info!("API server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// JSON-RPC 2.0 request structure
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: Value,
    id: Value,
}

/// Contract call parameters
///
/// ```json
/// { "args": ["k1", "10", "30", "node1"], "txTimestamp": 1700000000 }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvokeParams {
    args: Vec<String>,
    #[serde(default)]
    tx_timestamp: Option<i64>,
}

/// JSON-RPC 2.0 response structure
///
/// Either `result` or `error` will be populated, but not both.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
    id: Value,
}

/// JSON-RPC error object
///
/// - `code`: -32601 for an unknown function, -32602 for invalid params, -32603 for internal errors
/// - `message`: Human-readable error description
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

impl JsonRpcResponse {
    fn result(id: Value, result: Value) -> Json<Self> {
        Json(Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        })
    }

    fn error(id: Value, code: i32, message: String) -> Json<Self> {
        Json(Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError { code, message }),
            id,
        })
    }
}

/// Main RPC request handler
///
/// 1. Deserializes the call parameters
/// 2. Stamps the request with the server clock if allowed and needed
/// 3. Invokes the contract
/// 4. Returns a receipt: applied, or rejected with the reason
///
/// Domain rejections are still successful JSON-RPC calls; only unknown
/// functions and malformed params produce JSON-RPC errors.
async fn handle_rpc(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> Json<JsonRpcResponse> {
    info!("Received RPC request: {}", request.method);

    let params: InvokeParams = match serde_json::from_value(request.params) {
        Ok(params) => params,
        Err(e) => {
            error!("Failed to deserialize params for {}: {}", request.method, e);
            return JsonRpcResponse::error(request.id, -32602, format!("Invalid params: {}", e));
        }
    };

    let now = state.clock.now();
    let tx_timestamp = match params.tx_timestamp {
        Some(ts) => Some(ts),
        None if state.stamp_on_receipt => Some(now.timestamp()),
        None => None,
    };
    let invocation = Invocation {
        function: request.method,
        args: params.args,
        tx_timestamp,
    };

    let result = state
        .contract
        .invoke(state.store.as_ref(), &invocation, now)
        .await;

    if let Err(ValidationError::UnknownFunction(name)) = &result {
        warn!("Unknown function {}", name);
        return JsonRpcResponse::error(request.id, -32601, format!("Method not found: {}", name));
    }

    let receipt = Receipt::new(&invocation.function, &result, now);
    match serde_json::to_value(&receipt) {
        Ok(value) => JsonRpcResponse::result(request.id, value),
        Err(e) => {
            error!("Failed to serialize receipt: {}", e);
            JsonRpcResponse::error(request.id, -32603, "Internal error".to_string())
        }
    }
}
