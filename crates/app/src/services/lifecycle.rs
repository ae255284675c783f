//! Lifecycle orchestrator: load devices, resolve the brain, drive the server.
//!
//! `start` and `stop` return typed errors instead of terminating; the CLI
//! decides to exit. The [`ServerSession`] returned by `start` is the only
//! way to call `stop`, so callers are serialised by ownership.

use brainhost_domain::brain::BrainDescriptor;
use brainhost_domain::device::DeviceDescriptor;
use brainhost_domain::error::BrainhostError;
use brainhost_domain::server::{ServerConfiguration, ServerSession};

use crate::ports::{BrainDiscovery, DeviceLoader, DeviceServer};
use crate::services::brain_resolver::BrainResolver;

/// Caller-supplied settings for a start attempt. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartOptions {
    pub server_port: Option<u16>,
    pub server_name: Option<String>,
    pub brain_host: Option<String>,
    pub brain_port: Option<u16>,
    /// Local interface for the device server; defaults to all interfaces.
    pub bind_host: Option<String>,
}

/// Drives one device server through start and stop.
pub struct Orchestrator<L, D, S> {
    loader: L,
    resolver: BrainResolver<D>,
    server: S,
}

impl<L, D, S> Orchestrator<L, D, S>
where
    L: DeviceLoader + Sync,
    D: BrainDiscovery + Sync,
    S: DeviceServer + Sync,
{
    /// Create an orchestrator from its collaborators.
    pub fn new(loader: L, resolver: BrainResolver<D>, server: S) -> Self {
        Self {
            loader,
            resolver,
            server,
        }
    }

    /// Load devices and resolve the brain concurrently, then start the server.
    ///
    /// # Errors
    ///
    /// - [`BrainhostError::NoDevicesFound`] if the loader returns nothing
    /// - [`BrainhostError::DeviceLoad`] if a device file is unreadable or invalid
    /// - [`BrainhostError::BrainDiscoveryFailed`] if discovery fails
    /// - [`BrainhostError::ServerStartFailed`] if the server refuses to start
    ///
    /// The server is never started unless both devices and brain resolved.
    #[tracing::instrument(skip(self))]
    pub async fn start(&self, options: &StartOptions) -> Result<ServerSession, BrainhostError> {
        let (devices, brain) = tokio::try_join!(self.load_devices(), self.resolve_brain(options))?;

        tracing::info!(
            brain = brain.display_name(),
            host = %brain.host,
            "starting server, connecting to brain"
        );

        let mut config = ServerConfiguration::assemble(
            brain,
            devices,
            options.server_port,
            options.server_name.as_deref(),
        );
        if let Some(bind_host) = &options.bind_host {
            config = config.with_bind_host(bind_host.clone());
        }

        self.server
            .start(&config)
            .await
            .map_err(BrainhostError::ServerStartFailed)?;

        tracing::info!(
            name = %config.name,
            port = config.port,
            devices = config.devices.len(),
            "devices ready"
        );
        Ok(ServerSession::new(config))
    }

    /// Stop the server owned by `session`.
    ///
    /// The session is consumed whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`BrainhostError::ServerStopFailed`] if the server refuses to stop.
    #[tracing::instrument(skip_all, fields(name = %session.configuration().name))]
    pub async fn stop(&self, session: ServerSession) -> Result<(), BrainhostError> {
        let config = session.into_configuration();
        self.server
            .stop(&config)
            .await
            .map_err(BrainhostError::ServerStopFailed)?;
        tracing::info!("server stopped");
        Ok(())
    }

    /// Stop the server if one was started; a no-op otherwise.
    ///
    /// # Errors
    ///
    /// Same as [`stop`](Self::stop).
    pub async fn stop_if_started(
        &self,
        session: Option<ServerSession>,
    ) -> Result<(), BrainhostError> {
        match session {
            Some(session) => self.stop(session).await,
            None => Ok(()),
        }
    }

    async fn load_devices(&self) -> Result<Vec<DeviceDescriptor>, BrainhostError> {
        let devices = self.loader.load_devices().await?;
        if devices.is_empty() {
            return Err(BrainhostError::NoDevicesFound);
        }
        tracing::debug!(count = devices.len(), "devices loaded");
        Ok(devices)
    }

    async fn resolve_brain(&self, options: &StartOptions) -> Result<BrainDescriptor, BrainhostError> {
        Ok(self.resolver.resolve(options).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainhost_domain::device::DeviceKind;
    use brainhost_domain::error::{DiscoveryError, LoadError, ServerError, ValidationError};
    use std::future::Future;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn device(id: &str) -> DeviceDescriptor {
        DeviceDescriptor {
            id: id.to_string(),
            name: format!("Device {id}"),
            manufacturer: "Acme".to_string(),
            kind: DeviceKind::Accessory,
            driver_version: None,
            capabilities: vec![],
            source: None,
        }
    }

    enum StubLoader {
        Devices(Vec<DeviceDescriptor>),
        Broken,
    }

    impl DeviceLoader for StubLoader {
        fn load_devices(
            &self,
        ) -> impl Future<Output = Result<Vec<DeviceDescriptor>, LoadError>> + Send {
            let result = match self {
                Self::Devices(devices) => Ok(devices.clone()),
                Self::Broken => Err(LoadError::Invalid {
                    path: PathBuf::from("devices/broken.toml"),
                    source: ValidationError::EmptyDeviceId,
                }),
            };
            async { result }
        }
    }

    #[derive(Clone, Default)]
    struct CountingDiscovery {
        calls: Arc<AtomicUsize>,
    }

    impl BrainDiscovery for CountingDiscovery {
        fn discover_one_brain(
            &self,
        ) -> impl Future<Output = Result<BrainDescriptor, DiscoveryError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            async {
                Ok(BrainDescriptor {
                    host: "192.168.1.50".to_string(),
                    port: 3000,
                    name: Some("NEEO-abc".to_string()),
                })
            }
        }
    }

    /// Discovery that never answers; used to prove the join short-circuits.
    struct PendingDiscovery;

    impl BrainDiscovery for PendingDiscovery {
        fn discover_one_brain(
            &self,
        ) -> impl Future<Output = Result<BrainDescriptor, DiscoveryError>> + Send {
            std::future::pending()
        }
    }

    #[derive(Clone, Default)]
    struct RecordingServer {
        started: Arc<Mutex<Vec<ServerConfiguration>>>,
        stopped: Arc<Mutex<Vec<ServerConfiguration>>>,
        fail_start: bool,
        fail_stop: bool,
    }

    impl DeviceServer for RecordingServer {
        fn start(
            &self,
            config: &ServerConfiguration,
        ) -> impl Future<Output = Result<(), ServerError>> + Send {
            self.started.lock().unwrap().push(config.clone());
            let result = if self.fail_start {
                Err(ServerError::AlreadyRunning {
                    name: config.name.clone(),
                })
            } else {
                Ok(())
            };
            async { result }
        }

        fn stop(
            &self,
            config: &ServerConfiguration,
        ) -> impl Future<Output = Result<(), ServerError>> + Send {
            self.stopped.lock().unwrap().push(config.clone());
            let result = if self.fail_stop {
                Err(ServerError::NotRunning {
                    name: config.name.clone(),
                })
            } else {
                Ok(())
            };
            async { result }
        }
    }

    fn orchestrator(
        loader: StubLoader,
        discovery: CountingDiscovery,
        server: RecordingServer,
    ) -> Orchestrator<StubLoader, CountingDiscovery, RecordingServer> {
        Orchestrator::new(loader, BrainResolver::new(discovery), server)
    }

    #[tokio::test]
    async fn should_start_with_explicit_brain_and_port() {
        let discovery = CountingDiscovery::default();
        let server = RecordingServer::default();
        let orchestrator = orchestrator(
            StubLoader::Devices(vec![device("lamp")]),
            discovery.clone(),
            server.clone(),
        );
        let options = StartOptions {
            server_port: Some(1234),
            brain_host: Some("10.0.0.5".to_string()),
            ..StartOptions::default()
        };

        let session = orchestrator.start(&options).await.unwrap();

        assert_eq!(discovery.calls.load(Ordering::SeqCst), 0);
        let started = server.started.lock().unwrap();
        assert_eq!(started.len(), 1);
        let config = &started[0];
        assert_eq!(config.port, 1234);
        assert_eq!(config.name, "default");
        assert_eq!(
            config.brain,
            BrainDescriptor {
                host: "10.0.0.5".to_string(),
                port: 3000,
                name: None,
            }
        );
        assert_eq!(config.devices.len(), 1);
        assert_eq!(session.configuration(), config);
    }

    #[tokio::test]
    async fn should_fail_without_starting_when_no_devices() {
        let server = RecordingServer::default();
        let orchestrator =
            orchestrator(StubLoader::Devices(vec![]), CountingDiscovery::default(), server.clone());

        let result = orchestrator.start(&StartOptions::default()).await;

        assert!(matches!(result, Err(BrainhostError::NoDevicesFound)));
        assert!(server.started.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_start_with_env_override_without_discovery() {
        let discovery = CountingDiscovery::default();
        let server = RecordingServer::default();
        let orchestrator = Orchestrator::new(
            StubLoader::Devices(vec![device("lamp")]),
            BrainResolver::new(discovery.clone())
                .with_env_override(Some("192.168.1.1".to_string())),
            server.clone(),
        );

        let session = orchestrator.start(&StartOptions::default()).await.unwrap();

        assert_eq!(discovery.calls.load(Ordering::SeqCst), 0);
        assert_eq!(session.brain().host, "192.168.1.1");
        assert_eq!(session.brain().port, 3000);
        assert_eq!(server.started.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_discover_once_and_apply_defaults() {
        let discovery = CountingDiscovery::default();
        let orchestrator = orchestrator(
            StubLoader::Devices(vec![device("lamp"), device("fan")]),
            discovery.clone(),
            RecordingServer::default(),
        );

        let session = orchestrator.start(&StartOptions::default()).await.unwrap();

        assert_eq!(discovery.calls.load(Ordering::SeqCst), 1);
        let config = session.configuration();
        assert_eq!(config.port, 6336);
        assert_eq!(config.name, "default");
        assert_eq!(config.brain.name.as_deref(), Some("NEEO-abc"));
        assert_eq!(config.devices.len(), 2);
    }

    #[tokio::test]
    async fn should_pass_server_name_and_bind_host() {
        let server = RecordingServer::default();
        let orchestrator = orchestrator(
            StubLoader::Devices(vec![device("lamp")]),
            CountingDiscovery::default(),
            server.clone(),
        );
        let options = StartOptions {
            server_name: Some("kitchen".to_string()),
            bind_host: Some("127.0.0.1".to_string()),
            ..StartOptions::default()
        };

        orchestrator.start(&options).await.unwrap();

        let started = server.started.lock().unwrap();
        assert_eq!(started[0].name, "kitchen");
        assert_eq!(started[0].bind_addr(), "127.0.0.1:6336");
    }

    #[tokio::test]
    async fn should_short_circuit_when_devices_missing_while_discovery_pending() {
        let server = RecordingServer::default();
        let orchestrator = Orchestrator::new(
            StubLoader::Devices(vec![]),
            BrainResolver::new(PendingDiscovery),
            server.clone(),
        );

        let result = orchestrator.start(&StartOptions::default()).await;

        assert!(matches!(result, Err(BrainhostError::NoDevicesFound)));
        assert!(server.started.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_surface_device_load_error() {
        let orchestrator = orchestrator(
            StubLoader::Broken,
            CountingDiscovery::default(),
            RecordingServer::default(),
        );

        let result = orchestrator.start(&StartOptions::default()).await;

        assert!(matches!(result, Err(BrainhostError::DeviceLoad(_))));
    }

    #[tokio::test]
    async fn should_surface_server_start_failure() {
        let server = RecordingServer {
            fail_start: true,
            ..RecordingServer::default()
        };
        let orchestrator = orchestrator(
            StubLoader::Devices(vec![device("lamp")]),
            CountingDiscovery::default(),
            server,
        );

        let result = orchestrator.start(&StartOptions::default()).await;

        assert!(matches!(result, Err(BrainhostError::ServerStartFailed(_))));
    }

    #[tokio::test]
    async fn should_not_call_stop_without_session() {
        let server = RecordingServer::default();
        let orchestrator = orchestrator(
            StubLoader::Devices(vec![device("lamp")]),
            CountingDiscovery::default(),
            server.clone(),
        );

        orchestrator.stop_if_started(None).await.unwrap();

        assert!(server.stopped.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_stop_with_started_configuration() {
        let server = RecordingServer::default();
        let orchestrator = orchestrator(
            StubLoader::Devices(vec![device("lamp")]),
            CountingDiscovery::default(),
            server.clone(),
        );
        let session = orchestrator.start(&StartOptions::default()).await.unwrap();
        let expected = session.configuration().clone();

        orchestrator.stop_if_started(Some(session)).await.unwrap();

        let stopped = server.stopped.lock().unwrap();
        assert_eq!(stopped.len(), 1);
        assert_eq!(stopped[0], expected);
    }

    #[tokio::test]
    async fn should_surface_server_stop_failure() {
        let server = RecordingServer {
            fail_stop: true,
            ..RecordingServer::default()
        };
        let orchestrator = orchestrator(
            StubLoader::Devices(vec![device("lamp")]),
            CountingDiscovery::default(),
            server,
        );
        let session = orchestrator.start(&StartOptions::default()).await.unwrap();

        let result = orchestrator.stop(session).await;

        assert!(matches!(result, Err(BrainhostError::ServerStopFailed(_))));
    }
}
