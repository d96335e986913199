//! REST API server for recap.
//!
//! Provides HTTP endpoints for driving the capture-and-analysis workflow
//! and reading its status and results.

pub mod error;
pub mod routes;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tracing::info;

pub use routes::workflow::{ApiCommand, Reply, WorkflowApiState};

pub struct ApiServer {
    port: u16,
    workflow_state: WorkflowApiState,
}

impl ApiServer {
    pub fn new(
        tx: tokio::sync::mpsc::Sender<ApiCommand>,
        status: crate::workflow::WorkflowStatusHandle,
        port: u16,
    ) -> Self {
        Self {
            port,
            workflow_state: WorkflowApiState { tx, status },
        }
    }

    pub async fn start(self) -> Result<()> {
        let app = Router::new()
            .route("/", get(status))
            .route("/version", get(version))
            .merge(routes::workflow::router(self.workflow_state))
            .layer(ServiceBuilder::new());

        let listener = tokio::net::TcpListener::bind(&format!("127.0.0.1:{}", self.port)).await?;

        info!("API server listening on http://127.0.0.1:{}", self.port);
        info!("Endpoints:");
        info!("  GET  /              - Service info");
        info!("  GET  /version       - Version info");
        info!("  POST /capture/file  - Attach a media file {{\"path\": ...}}");
        info!("  POST /capture/mode  - Switch capture mode {{\"mode\": \"upload\"|\"record\"}}");
        info!("  POST /record/start  - Start microphone recording");
        info!("  POST /record/stop   - Stop recording and attach the capture");
        info!("  POST /submit        - Submit the capture for analysis");
        info!("  POST /reset         - Discard results and return to idle");
        info!("  GET  /status        - Workflow status");
        info!("  GET  /notes         - Generated meeting notes");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn status() -> Json<Value> {
    Json(json!({
        "service": "recap",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn version() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "name": "recap"
    }))
}
