use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, PoisonError,
    },
    time::Duration,
};

use serde_json::Value;
use shared::{
    domain::Quote,
    protocol::{all_quotes, first_quote},
};
use tracing::{debug, info, warn};

use crate::{
    display::{show_failure, swap_quote},
    error::FetchError,
    library::QuoteLibrary,
    source::QuoteSource,
    surface::{ControlSurface, DisplaySurface, NotificationKind, Notifier},
    WidgetConfig, LOADING_LABEL, READY_LABEL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Every fetch shows element 0 of a fresh payload.
    #[default]
    First,
    /// Keep the whole payload and draw from it until it is exhausted.
    Library,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Another fetch was in flight; nothing happened.
    Skipped,
    Displayed(Quote),
    Failed(FetchError),
}

/// Busy flag for one controller. At most one fetch holds it at a time.
#[derive(Debug, Default)]
pub struct FetchState {
    is_fetching: AtomicBool,
}

impl FetchState {
    pub fn is_fetching(&self) -> bool {
        self.is_fetching.load(Ordering::Acquire)
    }

    fn try_acquire(&self) -> bool {
        self.is_fetching
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn release(&self) {
        self.is_fetching.store(false, Ordering::Release);
    }
}

/// Holds the busy flag and the loading control state; both are restored on
/// drop, including when the fetch future itself is dropped.
struct FetchGuard<'a> {
    state: &'a FetchState,
    control: &'a dyn ControlSurface,
}

impl<'a> FetchGuard<'a> {
    fn acquire(state: &'a FetchState, control: &'a dyn ControlSurface) -> Option<Self> {
        if !state.try_acquire() {
            return None;
        }
        control.set_busy(true, LOADING_LABEL);
        Some(Self { state, control })
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.state.release();
        self.control.set_busy(false, READY_LABEL);
    }
}

pub struct QuoteFetchController {
    source: Arc<dyn QuoteSource>,
    display: Arc<dyn DisplaySurface>,
    control: Arc<dyn ControlSurface>,
    notifier: Arc<dyn Notifier>,
    state: FetchState,
    library: Option<Mutex<QuoteLibrary>>,
    fetch_timeout: Duration,
    fade_delay: Duration,
}

impl QuoteFetchController {
    pub fn new(
        config: &WidgetConfig,
        source: Arc<dyn QuoteSource>,
        display: Arc<dyn DisplaySurface>,
        control: Arc<dyn ControlSurface>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let library = match config.selection {
            SelectionMode::First => None,
            SelectionMode::Library => Some(Mutex::new(QuoteLibrary::default())),
        };
        Self {
            source,
            display,
            control,
            notifier,
            state: FetchState::default(),
            library,
            fetch_timeout: config.fetch_timeout,
            fade_delay: config.fade_delay,
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.state.is_fetching()
    }

    /// Fetches and shows one quote unless a fetch is already running, in
    /// which case the call returns `Skipped` without side effects.
    pub async fn request_quote(&self) -> FetchOutcome {
        let Some(_guard) = FetchGuard::acquire(&self.state, self.control.as_ref()) else {
            debug!("quote fetch already in flight; trigger dropped");
            return FetchOutcome::Skipped;
        };

        match self.next_quote().await {
            Ok(quote) => {
                swap_quote(self.display.as_ref(), &quote, self.fade_delay).await;
                info!(author = quote.author(), "quote displayed");
                FetchOutcome::Displayed(quote)
            }
            Err(err) => {
                warn!(error = %err, "quote fetch failed");
                let message = err.user_message();
                show_failure(self.display.as_ref(), message);
                self.notifier.notify(message, NotificationKind::Error);
                FetchOutcome::Failed(err)
            }
        }
    }

    async fn next_quote(&self) -> Result<Quote, FetchError> {
        let Some(library) = &self.library else {
            let payload = self.fetch_payload().await?;
            return Ok(first_quote(&payload)?);
        };

        if let Some(quote) = lock(library).draw() {
            return Ok(quote);
        }

        let payload = self.fetch_payload().await?;
        let quotes = all_quotes(&payload)?;
        debug!(count = quotes.len(), "quote library refilled");
        let mut library = lock(library);
        library.refill(quotes);
        library.draw().ok_or(FetchError::EmptyPayload)
    }

    async fn fetch_payload(&self) -> Result<Value, FetchError> {
        match tokio::time::timeout(self.fetch_timeout, self.source.fetch()).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout),
        }
    }
}

fn lock(library: &Mutex<QuoteLibrary>) -> std::sync::MutexGuard<'_, QuoteLibrary> {
    library.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
