//! Server wiring and execution logic.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use lantern_shared::time::Clock;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    domain::{BlobRepository, IdFactory, MessagePusher, SessionRepository},
    infrastructure::{
        message_pusher::SseMessagePusher,
        repository::{InMemoryBlobRepository, InMemorySessionRepository},
        sweeper::spawn_blob_sweeper,
    },
    usecase::{
        AnnouncePresenceUseCase, ConnectSessionUseCase, DisconnectSessionUseCase,
        GetImageUseCase, ProcessCommandUseCase, ResolveSessionUseCase, SendMessageUseCase,
        SetNicknameUseCase, UploadImageUseCase,
    },
};

use super::{
    handler::{
        events, get_image, health_check, join, leave, send_message, set_nickname, upload_image,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Chat relay server
///
/// Owns the in-memory stores and the use cases built on them.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(ServerConfig::default(), Arc::new(SystemClock));
/// server.run("0.0.0.0".to_string(), 8080).await?;
/// ```
pub struct Server {
    config: ServerConfig,
    clock: Arc<dyn Clock>,
    /// BlobRepository（sweeper と共有する）
    blobs: Arc<dyn BlobRepository>,
    state: Arc<AppState>,
    /// Cancelled once the shutdown signal fires
    shutdown: CancellationToken,
}

impl Server {
    /// Create a new Server instance and wire its dependencies
    ///
    /// Dependencies are created in order:
    /// 1. Repositories
    /// 2. MessagePusher
    /// 3. UseCases
    /// 4. AppState
    pub fn new(config: ServerConfig, clock: Arc<dyn Clock>) -> Self {
        // 1. Repositories (in-memory)
        let sessions: Arc<dyn SessionRepository> = Arc::new(InMemorySessionRepository::new(
            IdFactory::system(),
            config.rate_limit,
        ));
        let blobs: Arc<dyn BlobRepository> = Arc::new(InMemoryBlobRepository::new(
            IdFactory::system(),
            clock.clone(),
            config.blob_ttl_millis(),
        ));

        // 2. MessagePusher (SSE implementation)
        let message_pusher: Arc<dyn MessagePusher> =
            Arc::new(SseMessagePusher::new(config.queue_capacity));

        // 3. UseCases
        let commands = Arc::new(ProcessCommandUseCase::new(
            sessions.clone(),
            message_pusher.clone(),
        ));
        let shutdown = CancellationToken::new();
        let state = Arc::new(AppState {
            resolve_session_usecase: Arc::new(ResolveSessionUseCase::new(sessions.clone())),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                sessions.clone(),
                message_pusher.clone(),
                commands,
                clock.clone(),
            )),
            set_nickname_usecase: Arc::new(SetNicknameUseCase::new(
                sessions.clone(),
                message_pusher.clone(),
            )),
            upload_image_usecase: Arc::new(UploadImageUseCase::new(
                sessions.clone(),
                blobs.clone(),
                message_pusher.clone(),
                config.max_upload_bytes,
            )),
            get_image_usecase: Arc::new(GetImageUseCase::new(blobs.clone())),
            connect_session_usecase: Arc::new(ConnectSessionUseCase::new(message_pusher.clone())),
            disconnect_session_usecase: Arc::new(DisconnectSessionUseCase::new(
                message_pusher.clone(),
            )),
            presence_usecase: Arc::new(AnnouncePresenceUseCase::new(sessions, message_pusher)),
            shutdown: shutdown.clone(),
        });

        Self {
            config,
            clock,
            blobs,
            state,
            shutdown,
        }
    }

    /// Build the HTTP router
    pub fn router(&self) -> Router {
        Router::new()
            // SSE エンドポイント
            .route("/events", get(events))
            // HTTP エンドポイント
            .route("/send", post(send_message))
            .route("/set-nickname", post(set_nickname))
            .route(
                "/upload-image",
                post(upload_image)
                    .layer(DefaultBodyLimit::max(self.config.upload_body_limit())),
            )
            .route("/image/{id}", get(get_image))
            .route("/join", get(join))
            .route("/leave", get(leave).post(leave))
            .route("/api/health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the chat relay until Ctrl+C or SIGTERM
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "0.0.0.0")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Press Ctrl+C to shutdown gracefully");
        self.serve(listener, shutdown_signal()).await?;
        Ok(())
    }

    /// Serve on an already bound listener until `signal` resolves
    ///
    /// When `signal` fires, open event streams end and the blob sweeper stops.
    pub async fn serve<F>(
        self,
        listener: TcpListener,
        signal: F,
    ) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        tracing::info!("Chat relay listening on {}", listener.local_addr()?);

        let sweeper = spawn_blob_sweeper(
            self.blobs.clone(),
            self.clock.clone(),
            self.config.sweep_interval,
            self.shutdown.clone(),
        );
        let shutdown = self.shutdown.clone();
        let on_signal = async move {
            signal.await;
            shutdown.cancel();
        };

        tracing::info!(
            "Images kept for {:?}, swept every {:?}",
            self.config.blob_ttl,
            self.config.sweep_interval
        );

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(on_signal)
            .await;

        self.shutdown.cancel();
        if let Err(e) = sweeper.await {
            tracing::warn!("Blob sweeper task failed: {}", e);
        }
        result?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
