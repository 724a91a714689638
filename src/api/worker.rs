//! Runs API calls off the UI thread.
//!
//! A view hands a closure to [`Requests::start`] and keeps the returned
//! [`InFlight`]; the shell calls the view's `update` every frame, which polls
//! it. Dropping an `InFlight` abandons the result.

use super::{ApiError, ApiResult, ClinicalsApi};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

/// The API handle shared between the UI and request threads.
pub type SharedApi = Arc<dyn ClinicalsApi + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Background,
    #[cfg(test)]
    Inline,
}

/// Starts requests against a shared [`ClinicalsApi`].
#[derive(Clone)]
pub struct Requests {
    api: SharedApi,
    mode: Mode,
}

impl Requests {
    /// Every request runs on its own thread.
    pub fn background(api: SharedApi) -> Self {
        Self {
            api,
            mode: Mode::Background,
        }
    }

    /// Requests complete inside [`Requests::start`], so the first poll sees the result.
    #[cfg(test)]
    pub fn inline(api: SharedApi) -> Self {
        Self {
            api,
            mode: Mode::Inline,
        }
    }

    pub fn start<T, F>(&self, job: F) -> InFlight<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn ClinicalsApi) -> ApiResult<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let api = Arc::clone(&self.api);
        let run = move || {
            // The receiving view may already be gone.
            let _ = tx.send(job(api.as_ref()));
        };
        match self.mode {
            Mode::Background => {
                if let Err(e) = thread::Builder::new()
                    .name("api-request".to_string())
                    .spawn(run)
                {
                    tracing::warn!(error = %e, "could not spawn request thread");
                }
            }
            #[cfg(test)]
            Mode::Inline => run(),
        }
        InFlight { rx }
    }
}

/// An outstanding request.
pub struct InFlight<T> {
    rx: Receiver<ApiResult<T>>,
}

impl<T> InFlight<T> {
    /// The result, once the request has finished.
    pub fn poll(&self) -> Option<ApiResult<T>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(ApiError::Interrupted)),
        }
    }
}

/// Polls the request in `slot` and clears the slot when it has finished.
pub fn take_finished<T>(slot: &mut Option<InFlight<T>>) -> Option<ApiResult<T>> {
    let result = slot.as_ref()?.poll()?;
    *slot = None;
    Some(result)
}
