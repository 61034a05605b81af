use std::sync::Arc;

use futures::future::join_all;
use mockloom_core::ServiceName;
use mockloom_engine::ResolvedDocument;
use tokio::sync::oneshot;
use tracing::{error, info};

use crate::error::ServerError;
use crate::service_runtime::build_router;

struct Listener {
    service: ServiceName,
    shutdown: oneshot::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

/// `Run(selection…)`: resolve once, spin up one listener per
/// selected Service, block until SIGINT/SIGTERM, then shut every
/// listener down.
pub async fn run(doc: ResolvedDocument, selection: &[String]) -> Result<(), ServerError> {
    let doc = Arc::new(doc);
    let http_client = reqwest::Client::new();

    let mut listeners = Vec::new();
    for (name, service) in &doc.services {
        if !selection.is_empty() && !selection.iter().any(|s| s.as_str() == name.as_str()) {
            continue;
        }

        let router = build_router(doc.clone(), service, http_client.clone());
        let addr = format!("0.0.0.0:{}", service.port);
        let tcp_listener = tokio::net::TcpListener::bind(&addr).await?;
        info!(service = %name, port = service.port, "service listening");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let service_name = name.clone();
        let task = tokio::spawn(async move {
            let result = axum::serve(tcp_listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(err) = result {
                error!(service = %service_name, error = %err, "listener exited with an error");
            }
        });

        listeners.push(Listener {
            service: name.clone(),
            shutdown: shutdown_tx,
            task,
        });
    }

    if listeners.is_empty() {
        error!("there are no servers to run");
        return Err(ServerError::NoServers);
    }

    wait_for_signal().await;
    info!("shutdown signal received, stopping listeners");

    let mut joins = Vec::with_capacity(listeners.len());
    for listener in listeners {
        let service = listener.service;
        let _ = listener.shutdown.send(());
        joins.push(async move {
            if let Err(source) = listener.task.await {
                let err = ServerError::Shutdown { service: service.to_string(), source };
                error!(service = %service, error = %err, "listener failed to shut down cleanly");
            }
        });
    }
    join_all(joins).await;

    info!("mockloom server shut down");
    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received SIGINT"),
        () = terminate => info!("received SIGTERM"),
    }
}
