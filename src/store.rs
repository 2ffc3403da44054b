//! Shared exercise state store: one view context's copy of the live exercise.
//!
//! Every context holds a full [`ExerciseState`] in memory. Writes go through
//! [`SharedStore::write`], which merges a [`StatePatch`], persists the whole
//! snapshot under [`STATE_KEY`], swaps the in-memory copy, and announces the
//! new value on the [`SyncChannel`]. Other contexts pick it up on their next
//! [`SharedStore::sync`] and replace their copy wholesale.
//!
//! There is no merging between contexts. Two contexts writing at the same
//! time each persist their own snapshot and the last commit wins.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::model::{ExerciseState, StatePatch};
use crate::storage::{Storage, StorageError};
use crate::sync::{ContextId, StorageEvent, Subscription, SyncChannel};

/// The storage key holding the serialized exercise state.
pub const STATE_KEY: &str = "rr_gamestate";

/// Errors that can occur while writing state.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StoreError>;

/// One view context's handle on the shared exercise state.
pub struct SharedStore {
    id: ContextId,
    storage: Storage,
    channel: SyncChannel,
    subscription: Subscription,
    state: ExerciseState,
    seen_version: i64,
    default_scenario: String,
}

impl SharedStore {
    /// Opens a context, restoring the persisted snapshot if there is one.
    ///
    /// A missing or undecodable snapshot yields a fresh exercise for
    /// `default_scenario`. The undecodable value stays on disk until the
    /// next write replaces it.
    pub fn open(
        storage: Storage,
        channel: &SyncChannel,
        default_scenario: &str,
    ) -> Result<Self> {
        let id = Uuid::new_v4();
        let subscription = channel.subscribe(id);
        let seen_version = storage.data_version()?;
        let state = match storage.get(STATE_KEY)? {
            Some(json) => decode(&json).unwrap_or_else(|| ExerciseState::new(default_scenario)),
            None => ExerciseState::new(default_scenario),
        };
        debug!(context = %id, scenario = %state.scenario_id, turn = state.turn_index, "opened");

        Ok(Self {
            id,
            storage,
            channel: channel.clone(),
            subscription,
            state,
            seen_version,
            default_scenario: default_scenario.to_string(),
        })
    }

    /// The current snapshot.
    pub fn read(&self) -> &ExerciseState {
        &self.state
    }

    /// Merges `patch` into the current snapshot and publishes the result.
    ///
    /// The snapshot is persisted before the in-memory copy changes; if that
    /// fails, the error is returned and this context still holds the old
    /// snapshot.
    pub fn write(&mut self, patch: StatePatch) -> Result<&ExerciseState> {
        let next = patch.apply(&self.state);
        let json = serde_json::to_string(&next)?;
        self.storage.set(STATE_KEY, &json)?;
        self.state = next;
        self.channel.publish(
            self.id,
            &StorageEvent {
                key: STATE_KEY.to_string(),
                new_value: json,
            },
        );
        Ok(&self.state)
    }

    /// Applies every change made elsewhere since the last call.
    ///
    /// Queued channel events are applied in order first, then the storage
    /// change counter is checked for commits from other processes, in which
    /// case the persisted snapshot is reread. Values that fail to decode are
    /// skipped and the last good snapshot is kept. A snapshot deleted from
    /// storage resets this context to a fresh default exercise.
    ///
    /// Returns whether the in-memory snapshot changed.
    pub fn sync(&mut self) -> Result<bool> {
        let before = self.state.clone();

        for event in self.subscription.drain() {
            if event.key != STATE_KEY {
                continue;
            }
            if let Some(state) = decode(&event.new_value) {
                self.state = state;
            }
        }

        let version = self.storage.data_version()?;
        if version != self.seen_version {
            self.seen_version = version;
            match self.storage.get(STATE_KEY)? {
                Some(json) => {
                    if let Some(state) = decode(&json) {
                        self.state = state;
                    }
                }
                None => {
                    warn!(context = %self.id, "exercise state removed, starting fresh");
                    self.state = ExerciseState::new(self.default_scenario.as_str());
                }
            }
        }

        let changed = self.state != before;
        if changed {
            debug!(context = %self.id, turn = self.state.turn_index, "synced");
        }
        Ok(changed)
    }
}

/// Decodes a propagated snapshot, logging and discarding malformed values.
fn decode(json: &str) -> Option<ExerciseState> {
    match serde_json::from_str(json) {
        Ok(state) => Some(state),
        Err(e) => {
            warn!(error = %e, "ignoring undecodable exercise state");
            None
        }
    }
}
