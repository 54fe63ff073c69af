//! Collaborator interfaces between the sim core and the host harness
//!
//! The simulation never talks to the browser directly; the harness feeds it
//! an [`input::InputSnapshot`] each tick, drains [`crate::sim::GameEvent`]s
//! into an [`audio::AudioPort`], and injects a [`storage::StoragePort`] for
//! best-effort hiscore persistence.

pub mod audio;
pub mod input;
pub mod storage;

pub use audio::{AudioPort, NullAudio, Sample};
pub use input::{Action, ActionState, InputPort, InputSnapshot, InputState};
pub use storage::{MemoryStorage, StoragePort};
