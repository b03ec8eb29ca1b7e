//! JSON-RPC Server
//!
//! Serves the simulator over JSON-RPC 2.0 on localhost TCP.

use crate::handler::RpcHandler;
use crate::journal::EventJournal;
use crate::types::{InjectRequest, TailEventsRequest};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::sync::Arc;
use tracing::info;
use waitroom_core::application::QueueSimulator;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9630;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(
        config: RpcServerConfig,
        simulator: Arc<QueueSimulator>,
        journal: Arc<EventJournal>,
    ) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(simulator, journal)),
        }
    }

    /// Build the method table
    fn module(&self) -> Result<RpcModule<()>, String> {
        let mut module = RpcModule::new(());

        let handler = self.handler.clone();
        module
            .register_async_method("queue.state.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { Ok::<_, jsonrpsee::types::ErrorObjectOwned>(handler.state()) }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.start.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.start() }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.stop.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { Ok::<_, jsonrpsee::types::ErrorObjectOwned>(handler.stop()) }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.refresh.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { Ok::<_, jsonrpsee::types::ErrorObjectOwned>(handler.refresh()) }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.inject.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: InjectRequest = params.parse()?;
                    handler.inject(req)
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("events.tail.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: Option<TailEventsRequest> = params.parse()?;
                    Ok::<_, jsonrpsee::types::ErrorObjectOwned>(
                        handler.tail_events(req.unwrap_or_default()),
                    )
                }
            })
            .map_err(|e| e.to_string())?;

        // Admin APIs
        let handler = self.handler.clone();
        module
            .register_async_method("admin.stats.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { Ok::<_, jsonrpsee::types::ErrorObjectOwned>(handler.stats()) }
            })
            .map_err(|e| e.to_string())?;

        Ok(module)
    }

    /// Start the JSON-RPC server
    ///
    /// Security: only binds to the configured host, 127.0.0.1 by default
    pub async fn start(self) -> Result<ServerHandle, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server on TCP"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;

        let module = self.module()?;
        let handle = server.start(module);

        info!("JSON-RPC server started successfully");
        Ok(handle)
    }
}
