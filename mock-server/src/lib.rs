use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};
use url::form_urlencoded;

pub mod store;

pub use store::{Failure, Params, Store};

/// The `{code, message, data}` body every API call answers with.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope {
    pub code: i64,
    pub message: String,
    pub data: Value,
}

impl Envelope {
    fn ok(data: Value) -> Self {
        Self {
            code: 0,
            message: "ok".to_string(),
            data,
        }
    }

    fn failure(failure: Failure) -> Self {
        Self {
            code: failure.code,
            message: failure.message,
            data: Value::Null,
        }
    }
}

pub struct AppState {
    api_key: String,
    store: RwLock<Store>,
}

pub type Shared = Arc<AppState>;

pub fn app(api_key: &str) -> Router {
    let state: Shared = Arc::new(AppState {
        api_key: api_key.to_string(),
        store: RwLock::new(Store::new()),
    });
    Router::new()
        .route("/api/{version}/{method}", get(dispatch).post(dispatch))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

/// Merge parameters from the query string and a form-encoded body.
pub fn decode_params(query: Option<&str>, body: &str) -> Params {
    let mut params: HashMap<String, String> = form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .into_owned()
        .collect();
    params.extend(form_urlencoded::parse(body.as_bytes()).into_owned());
    Params::new(params)
}

async fn dispatch(
    State(state): State<Shared>,
    Path((_version, method)): Path<(String, String)>,
    RawQuery(query): RawQuery,
    body: String,
) -> (StatusCode, Json<Envelope>) {
    let params = decode_params(query.as_deref(), &body);

    if params.get("apikey") != Some(state.api_key.as_str()) {
        tracing::info!(method = %method, "rejected call with wrong API key");
        let failure = Failure {
            code: store::CODE_INVALID_API_KEY,
            message: "no or wrong API Key".to_string(),
        };
        return (StatusCode::UNAUTHORIZED, Json(Envelope::failure(failure)));
    }

    let result = state.store.write().await.call(&method, &params);
    match result {
        Ok(data) => {
            tracing::debug!(method = %method, "handled call");
            (StatusCode::OK, Json(Envelope::ok(data)))
        }
        Err(failure) => {
            tracing::info!(method = %method, code = failure.code, message = %failure.message, "call failed");
            let status = if failure.code == store::CODE_INVALID_METHOD {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::OK
            };
            (status, Json(Envelope::failure(failure)))
        }
    }
}
