use crate::analysis;
use crate::api::{ApiCommand, ApiServer, Reply};
use crate::capture::LazyMicSource;
use crate::config::Config;
use crate::workflow::{WorkflowMachine, WorkflowStatusHandle};
use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub async fn run_service() -> Result<()> {
    info!("Starting recap service");

    let config = Config::load()?;

    let (tx, mut rx) = mpsc::channel::<ApiCommand>(10);

    let provider = analysis::from_config(&config.notes)?;
    let mic = LazyMicSource::new(config.capture.sample_rate);

    let status_handle = WorkflowStatusHandle::default();
    let mut machine = WorkflowMachine::new(provider, Box::new(mic), status_handle.clone());

    let api_server = ApiServer::new(tx, status_handle.clone(), config.server.port);
    tokio::spawn(async move {
        if let Err(e) = api_server.start().await {
            error!("API server failed: {}", e);
        }
    });

    info!("recap is ready!");
    info!(
        "Try: curl -X POST http://127.0.0.1:{}/capture/file -H 'Content-Type: application/json' -d '{{\"path\": \"/path/to/meeting.mp3\"}}'",
        config.server.port
    );
    info!(
        "Then: curl -X POST http://127.0.0.1:{}/submit",
        config.server.port
    );

    while let Some(command) = rx.recv().await {
        match command {
            ApiCommand::SelectFile { path, reply } => {
                respond(reply, machine.select_file(&path).await);
            }
            ApiCommand::SetMode { mode, reply } => {
                respond(reply, machine.set_mode(mode).await);
            }
            ApiCommand::StartRecording { reply } => {
                respond(reply, machine.start_recording().await);
            }
            ApiCommand::StopRecording { reply } => {
                respond(reply, machine.stop_recording().await);
            }
            ApiCommand::Submit { reply } => {
                respond(reply, machine.submit().await);
            }
            ApiCommand::Reset { reply } => {
                respond(reply, machine.reset().await);
            }
        }
    }

    Ok(())
}

fn respond(reply: Reply, result: Result<()>) {
    let payload = match result {
        Ok(()) => Ok(()),
        Err(e) => {
            warn!("Workflow command rejected: {}", e);
            Err(e.to_string())
        }
    };

    if reply.send(payload).is_err() {
        warn!("Workflow command caller went away before the reply");
    }
}
