use futures::StreamExt;
use mealgen_planner::{GenerationRequest, PlanState, SessionId};
use tokio::sync::{Mutex, watch};

use crate::{ClientError, GenerationClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The stream ran to its end.
    Completed,
    /// Another session started meanwhile; the stream was dropped early.
    Superseded,
}

/// Run one generation session against `state`.
///
/// Chunks are applied in arrival order and `on_update` sees the state after
/// each one. On failure the error is recorded on the state (text received so
/// far is kept) and returned. If another session takes over `state` or the
/// plan is cleared, the stream is dropped right away, even while the backend
/// is silent, which releases its connection.
#[tracing::instrument(skip_all, fields(days = request.days(), people = request.people()))]
pub async fn run_session<F>(
    client: &GenerationClient,
    request: &GenerationRequest,
    state: &Mutex<PlanState>,
    mut on_update: F,
) -> Result<SessionOutcome, ClientError>
where
    F: FnMut(&PlanState),
{
    let (session, mut active) = {
        let mut state = state.lock().await;
        (state.begin(), state.subscribe())
    };
    tracing::info!(%session, "Generation session started");

    let response = tokio::select! {
        response = client.generate(request) => response,
        _ = abandoned(&mut active, session) => {
            tracing::info!(%session, "Session abandoned before the response arrived");
            return Ok(SessionOutcome::Superseded);
        }
    };

    let mut chunks = match response {
        Ok(chunks) => chunks,
        Err(e) => {
            state.lock().await.fail(session, &e);
            return Err(e);
        }
    };

    loop {
        let chunk = tokio::select! {
            chunk = chunks.next() => chunk,
            _ = abandoned(&mut active, session) => {
                tracing::info!(%session, "Session abandoned, closing stream");
                return Ok(SessionOutcome::Superseded);
            }
        };
        let Some(chunk) = chunk else {
            break;
        };

        let mut state = state.lock().await;
        match chunk {
            Ok(text) => {
                if !state.apply_chunk(session, &text) {
                    tracing::info!(%session, "Session superseded, abandoning stream");
                    return Ok(SessionOutcome::Superseded);
                }
                on_update(&state);
            }
            Err(e) => {
                state.fail(session, &e);
                return Err(e);
            }
        }
    }

    let mut state = state.lock().await;
    if !state.finish(session) {
        return Ok(SessionOutcome::Superseded);
    }

    if state.buffer().split_index().is_none() {
        tracing::warn!(%session, "Stream ended without a shopping list separator");
    }
    tracing::info!(%session, bytes = state.buffer().text().len(), "Generation session completed");

    Ok(SessionOutcome::Completed)
}

/// Resolves once `session` is no longer the active one.
async fn abandoned(active: &mut watch::Receiver<Option<SessionId>>, session: SessionId) {
    loop {
        let current = *active.borrow_and_update();
        if current != Some(session) {
            return;
        }
        if active.changed().await.is_err() {
            // The state is gone, nothing can take the session over anymore.
            std::future::pending::<()>().await;
        }
    }
}
