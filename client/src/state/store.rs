use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::error::ClientError;
use crate::state::actions::Action;
use crate::state::reducer::{reduce, AppState};

/// How long an alert stays up before it is cleared automatically.
pub const ALERT_DURATION: Duration = Duration::from_millis(4000);

/// Holds the current snapshot and applies transitions to it.
///
/// Cloning is cheap; clones share the same snapshot. Subscribers observe
/// every new snapshot through a `watch` channel.
#[derive(Clone)]
pub struct Store {
    sender: Arc<watch::Sender<Arc<AppState>>>,
}

impl Store {
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    pub fn with_state(state: AppState) -> Self {
        let (sender, _) = watch::channel(Arc::new(state));
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn snapshot(&self) -> Arc<AppState> {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.sender.subscribe()
    }

    /// Applies one transition. A newly shown alert is scheduled to expire.
    pub fn dispatch(&self, action: Action) {
        let mut shown_alert = None;

        self.sender.send_modify(|state| {
            let next = reduce(state, &action);
            if next.show_alert && next.alert_id != state.alert_id {
                shown_alert = Some(next.alert_id);
            }
            *state = Arc::new(next);
        });

        if let Some(alert_id) = shown_alert {
            self.schedule_alert_expiry(alert_id);
        }
    }

    /// Dispatches a serialized action. Unknown action types are a programming
    /// error: debug builds report them, release builds log and ignore them.
    pub fn dispatch_json(&self, raw: &str) -> Result<(), ClientError> {
        match serde_json::from_str::<Action>(raw) {
            Ok(action) => {
                self.dispatch(action);
                Ok(())
            }
            Err(e) if cfg!(debug_assertions) => Err(ClientError::UnknownAction(format!("{}: {}", raw, e))),
            Err(e) => {
                warn!("Ignoring unknown action {}: {}", raw, e);
                Ok(())
            }
        }
    }

    fn schedule_alert_expiry(&self, alert_id: u64) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("No async runtime, alert {} will not expire on its own", alert_id);
            return;
        };

        let store = self.clone();
        runtime.spawn(async move {
            tokio::time::sleep(ALERT_DURATION).await;
            store.dispatch(Action::ExpireAlert { alert_id });
        });
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
