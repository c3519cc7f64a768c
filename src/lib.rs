#![forbid(unsafe_code)]
//! Corvée — rotation d'une corvée quotidienne entre quelques personnes.
//!
//! - Rotation circulaire qui saute les absents, bornée (pas de boucle infinie).
//! - Historique borné, upsert par date.
//! - État persisté par compare-and-swap sur une révision (JSON ou mémoire).
//! - Dates calendaires `YYYY-MM-DD` uniquement, jamais d'horodatage.

pub mod engine;
#[cfg(feature = "io")]
pub mod io;
pub mod model;
pub mod notice;
pub mod storage;

pub use engine::{EngineError, RotationConfig, RotationEngine};
pub use model::{
    Absence, AbsenceId, DutyHistory, DutyRecord, Person, PersonId, RotationState,
    DEFAULT_HISTORY_CAP,
};
pub use notice::{prepare_notice, Notice, NoticeRenderer, NoticeView, TextNotice};
#[cfg(feature = "io")]
pub use storage::JsonStorage;
pub use storage::{update, update_with, MemoryStorage, Storage, StoreError};
