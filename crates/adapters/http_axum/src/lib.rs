//! # brainhost-adapter-http-axum
//!
//! Device server built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Implement the `DeviceServer` port: bind, serve, and shut down gracefully
//! - Serve a small JSON API describing the exposed devices and their brain
//!   (`/api/server`, `/api/devices`, `/api/devices/{id}`)
//! - Track running servers by name so stop finds the one start launched
//!
//! ## Dependency rule
//! Depends on `brainhost-app` (for the port trait) and `brainhost-domain`
//! (for types used in responses). Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::Instrument;

use brainhost_app::ports::DeviceServer;
use brainhost_domain::error::ServerError;
use brainhost_domain::server::ServerConfiguration;

use crate::state::AppState;

struct RunningServer {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

/// [`DeviceServer`] that serves each configuration on its own axum listener.
#[derive(Default)]
pub struct AxumDeviceServer {
    running: Mutex<HashMap<String, RunningServer>>,
}

impl AxumDeviceServer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Address the named server actually bound to, if it is running.
    #[must_use]
    pub fn local_addr(&self, name: &str) -> Option<SocketAddr> {
        self.running().get(name).map(|server| server.local_addr)
    }

    fn running(&self) -> MutexGuard<'_, HashMap<String, RunningServer>> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeviceServer for AxumDeviceServer {
    fn start(
        &self,
        config: &ServerConfiguration,
    ) -> impl Future<Output = Result<(), ServerError>> + Send {
        let span = tracing::info_span!("start", name = %config.name, port = config.port);
        async move {
            if self.running().contains_key(&config.name) {
                return Err(ServerError::AlreadyRunning {
                    name: config.name.clone(),
                });
            }

            let addr = config.bind_addr();
            let listener = TcpListener::bind(&addr)
                .await
                .map_err(|source| ServerError::Bind {
                    addr: addr.clone(),
                    source,
                })?;
            let local_addr = listener
                .local_addr()
                .map_err(|source| ServerError::Bind { addr, source })?;

            let app = router::build(AppState::new(config.clone()));
            let (shutdown, signal) = oneshot::channel::<()>();
            let task = tokio::spawn(async move {
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        // A dropped sender also means shut down.
                        let _ = signal.await;
                    })
                    .await
            });

            match self.running().entry(config.name.clone()) {
                Entry::Occupied(_) => {
                    task.abort();
                    Err(ServerError::AlreadyRunning {
                        name: config.name.clone(),
                    })
                }
                Entry::Vacant(slot) => {
                    slot.insert(RunningServer {
                        local_addr,
                        shutdown,
                        task,
                    });
                    tracing::info!(%local_addr, "device server listening");
                    Ok(())
                }
            }
        }
        .instrument(span)
    }

    fn stop(
        &self,
        config: &ServerConfiguration,
    ) -> impl Future<Output = Result<(), ServerError>> + Send {
        let span = tracing::info_span!("stop", name = %config.name);
        async move {
            let server = self
                .running()
                .remove(&config.name)
                .ok_or_else(|| ServerError::NotRunning {
                    name: config.name.clone(),
                })?;

            // The receiver is gone only if the serve task already ended.
            let _ = server.shutdown.send(());

            match server.task.await {
                Ok(Ok(())) => {
                    tracing::info!("device server stopped");
                    Ok(())
                }
                Ok(Err(err)) => Err(ServerError::Task(Box::new(err))),
                Err(err) => Err(ServerError::Task(Box::new(err))),
            }
        }
        .instrument(span)
    }
}
