//! Server-Sent Events stream handler.

use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::{
    extract::State,
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    domain::{ConnectionId, SessionId},
    ui::state::AppState,
    usecase::DisconnectSessionUseCase,
};

use super::session::resolve_session;

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Unregisters its connection when the stream is dropped.
///
/// Axum drops the stream when the client goes away or the server shuts down,
/// whichever comes first.
struct ConnectionGuard {
    disconnect: Arc<DisconnectSessionUseCase>,
    session_id: SessionId,
    connection: ConnectionId,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let disconnect = self.disconnect.clone();
        let session_id = self.session_id.clone();
        let connection = self.connection;
        runtime.spawn(async move {
            disconnect.execute(&session_id, connection).await;
        });
    }
}

/// Open the caller's event stream
///
/// Every message addressed to the session arrives as one `data:` frame holding
/// its JSON encoding. Reconnecting replaces (and ends) any previous stream of
/// the same session.
pub async fn events(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let (jar, session_id) = resolve_session(&state, jar).await;

    let subscription = state
        .connect_session_usecase
        .execute(session_id.clone())
        .await;
    let guard = ConnectionGuard {
        disconnect: state.disconnect_session_usecase.clone(),
        session_id,
        connection: subscription.connection,
    };
    let mut receiver = subscription.receiver;
    let shutdown = state.shutdown.clone();

    let stream = async_stream::stream! {
        let _guard = guard;
        loop {
            let frame = tokio::select! {
                _ = shutdown.cancelled() => None,
                frame = receiver.recv() => frame,
            };
            // None: replaced by a newer stream, or shutting down
            let Some(frame) = frame else { break };
            yield Ok::<_, Infallible>(Event::default().data(frame));
        }
    };

    (
        jar,
        Sse::new(stream).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL)),
    )
}
