//! Snapshot and restore functionality for machines.
//!
//! This module maps a machine's current state (and, for data-bearing
//! states, its payload) to a persistent token chosen by the caller, and
//! back. Persistent tokens are deliberately decoupled from the internal
//! state identifiers, so renaming a state does not invalidate stored
//! snapshots. Restoring is a cold start at the recorded state: no
//! transition runs and no output is invoked.

use crate::builder::StateHandle;
use crate::core::{Automaton, Schema, State, StateKind};
use crate::machine::Transitioner;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub mod error;

pub use error::PersistError;

/// Version identifier for the snapshot format.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable record of a machine's position.
///
/// A snapshot holds the persistent state token plus, for data-bearing
/// states, the JSON-encoded payload produced by the state's registered
/// codec. It never contains outputs, collectors or the shared core; the
/// caller owns those and supplies the core again on restore.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot format version.
    pub version: u32,

    /// Unique snapshot identifier.
    pub id: String,

    /// When the snapshot was taken.
    pub taken_at: DateTime<Utc>,

    /// Persistent token of the state the machine occupied.
    pub state: String,

    /// JSON-encoded state-specific payload, present only for data-bearing
    /// states.
    pub payload: Option<String>,
}

impl Snapshot {
    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, PersistError> {
        serde_json::to_string(self).map_err(|e| PersistError::SerializationFailed(e.to_string()))
    }

    /// Deserialize from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        serde_json::from_str(json).map_err(|e| PersistError::DeserializationFailed(e.to_string()))
    }

    /// Serialize to a compact binary format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PersistError> {
        bincode::serialize(self).map_err(|e| PersistError::SerializationFailed(e.to_string()))
    }

    /// Deserialize from the binary format.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PersistError> {
        bincode::deserialize(bytes).map_err(|e| PersistError::DeserializationFailed(e.to_string()))
    }
}

type DumpFn<M> = Arc<
    dyn Fn(&<M as Schema>::Core, &<M as Schema>::Data) -> serde_json::Value + Send + Sync,
>;
type LoadFn<M> = Arc<
    dyn Fn(&mut <M as Schema>::Core, &serde_json::Value) -> Result<<M as Schema>::Data, PersistError>
        + Send
        + Sync,
>;

struct Codec<M: Schema> {
    dump: DumpFn<M>,
    load: LoadFn<M>,
}

struct Entry<M: Schema> {
    token: String,
    codec: Option<Codec<M>>,
}

/// Registry mapping states to persistent tokens and payload codecs.
///
/// # Example
///
/// ```rust
/// use gearbox::builder::AutomatonBuilder;
/// use gearbox::machine::Transitioner;
/// use gearbox::persist::Persister;
/// use gearbox::{input_enum, state_enum, Schema};
///
/// state_enum! {
///     enum Switch { Off, On }
/// }
/// input_enum! {
///     enum Toggle { Flip }
/// }
///
/// struct Lamp;
/// impl Schema for Lamp {
///     type State = Switch;
///     type Input = Toggle;
///     type Core = ();
///     type Data = ();
///     type Args = ();
///     type Value = ();
///     type Collected = Vec<()>;
///     type Error = std::convert::Infallible;
/// }
///
/// let mut builder = AutomatonBuilder::<Lamp>::new();
/// let off = builder.add_initial_state(Switch::Off).unwrap();
/// let on = builder.add_state(Switch::On).unwrap();
/// let flip = builder.add_input(Toggle::Flip).unwrap();
/// builder.add_transition(off, flip, on, vec![]).unwrap();
/// builder.add_transition(on, flip, off, vec![]).unwrap();
/// let automaton = builder.build().unwrap();
///
/// let mut persister = Persister::<Lamp>::new(automaton.clone());
/// persister.register(off, "lamp-off").unwrap();
/// persister.register(on, "lamp-on").unwrap();
///
/// let machine = Transitioner::new(automaton, ());
/// machine.apply(flip, ()).unwrap();
///
/// let snapshot = persister.snapshot(&machine).unwrap();
/// assert_eq!(snapshot.state, "lamp-on");
///
/// let restored = persister.restore(&snapshot, ()).unwrap();
/// assert_eq!(restored.current_state(), &Switch::On);
/// ```
pub struct Persister<M: Schema> {
    automaton: Arc<Automaton<M>>,
    entries: Vec<Option<Entry<M>>>,
}

impl<M: Schema> Persister<M> {
    /// Create an empty registry for machines built from `automaton`.
    pub fn new(automaton: Arc<Automaton<M>>) -> Self {
        let mut entries = Vec::new();
        entries.resize_with(automaton.state_count(), || None);
        Self { automaton, entries }
    }

    /// Register a persistent token for a stateless state.
    pub fn register(
        &mut self,
        state: StateHandle,
        token: impl Into<String>,
    ) -> Result<(), PersistError> {
        let token = token.into();
        let index = self.checked_index(state)?;
        if matches!(self.automaton.kind(index), StateKind::DataBearing { .. }) {
            return Err(PersistError::PayloadCodecRequired {
                name: self.automaton.state_id(index).name().to_string(),
            });
        }
        self.insert(index, token, None)
    }

    /// Register a persistent token and payload codec for a data-bearing
    /// state.
    ///
    /// `dump` extracts a JSON representation of the payload when a
    /// snapshot is taken; `load` rebuilds the payload from that
    /// representation (with access to the fresh core) during restore.
    pub fn register_data<D, L>(
        &mut self,
        state: StateHandle,
        token: impl Into<String>,
        dump: D,
        load: L,
    ) -> Result<(), PersistError>
    where
        D: Fn(&M::Core, &M::Data) -> serde_json::Value + Send + Sync + 'static,
        L: Fn(&mut M::Core, &serde_json::Value) -> Result<M::Data, PersistError>
            + Send
            + Sync
            + 'static,
    {
        let token = token.into();
        let index = self.checked_index(state)?;
        if matches!(self.automaton.kind(index), StateKind::Stateless) {
            return Err(PersistError::PayloadCodecUnsupported {
                name: self.automaton.state_id(index).name().to_string(),
            });
        }
        self.insert(
            index,
            token,
            Some(Codec {
                dump: Arc::new(dump),
                load: Arc::new(load),
            }),
        )
    }

    /// Take a snapshot of a machine's current position.
    pub fn snapshot(&self, machine: &Transitioner<M>) -> Result<Snapshot, PersistError> {
        if !Arc::ptr_eq(machine.automaton(), &self.automaton) {
            return Err(PersistError::AutomatonMismatch);
        }
        let index = machine.state_index();
        let entry = self.entries[index]
            .as_ref()
            .ok_or_else(|| PersistError::UnregisteredState {
                name: self.automaton.state_id(index).name().to_string(),
            })?;
        let payload = match &entry.codec {
            None => None,
            Some(codec) => machine.with_live(|core, data| {
                // a registered codec implies a data-bearing state, whose
                // payload always exists while the state is occupied
                data.map(|data| (codec.dump)(core, data).to_string())
            }),
        };
        Ok(Snapshot {
            version: SNAPSHOT_VERSION,
            id: Uuid::new_v4().to_string(),
            taken_at: Utc::now(),
            state: entry.token.clone(),
            payload,
        })
    }

    /// Rebuild a machine from a snapshot and a fresh core.
    ///
    /// This is not a transition: the machine is pinned directly to the
    /// recorded state without invoking any outputs.
    pub fn restore(
        &self,
        snapshot: &Snapshot,
        mut core: M::Core,
    ) -> Result<Transitioner<M>, PersistError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(PersistError::UnsupportedVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        let (index, entry) = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| entry.as_ref().map(|entry| (index, entry)))
            .find(|(_, entry)| entry.token == snapshot.state)
            .ok_or_else(|| PersistError::UnknownState {
                token: snapshot.state.clone(),
            })?;

        let data = match &entry.codec {
            None => None,
            Some(codec) => {
                let raw = snapshot
                    .payload
                    .as_deref()
                    .ok_or_else(|| PersistError::MissingPayload {
                        token: snapshot.state.clone(),
                    })?;
                let value: serde_json::Value = serde_json::from_str(raw)
                    .map_err(|e| PersistError::DeserializationFailed(e.to_string()))?;
                Some((codec.load)(&mut core, &value)?)
            }
        };

        Ok(Transitioner::at(
            Arc::clone(&self.automaton),
            core,
            index,
            data,
        ))
    }

    fn checked_index(&self, state: StateHandle) -> Result<usize, PersistError> {
        if state.0 < self.entries.len() {
            Ok(state.0)
        } else {
            Err(PersistError::ForeignHandle)
        }
    }

    fn insert(
        &mut self,
        index: usize,
        token: String,
        codec: Option<Codec<M>>,
    ) -> Result<(), PersistError> {
        if let Some(existing) = &self.entries[index] {
            return Err(PersistError::StateAlreadyRegistered {
                name: self.automaton.state_id(index).name().to_string(),
                token: existing.token.clone(),
            });
        }
        let clash = self
            .entries
            .iter()
            .flatten()
            .any(|entry| entry.token == token);
        if clash {
            return Err(PersistError::DuplicateToken { token });
        }
        self.entries[index] = Some(Entry { token, codec });
        Ok(())
    }
}
