mod absence;
mod history;
mod mutate;
mod rotation;
mod types;

pub use absence::{absentees_on, add_absence, is_absent, remove_absence, remove_absence_by_id};
pub use history::{append_duty_record, remove_duty_record};
pub use rotation::{next_duty_holder, predict_upcoming};
pub use types::{EngineError, RotationConfig};

use crate::model::{AbsenceId, DutyRecord, Person, PersonId, RotationState};
use chrono::NaiveDate;

/// Moteur de rotation : transitions pures d'un `RotationState` vers le suivant.
///
/// Le moteur ne possède aucun état hormis sa configuration ; chaque opération
/// rend un nouvel instantané que l'appelant persiste (voir `storage`). Le
/// champ `revision` n'est jamais touché ici.
#[derive(Debug, Default, Clone, Copy)]
pub struct RotationEngine {
    config: RotationConfig,
}

impl RotationEngine {
    pub fn new(config: RotationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> RotationConfig {
        self.config
    }

    pub fn validate_roster(&self, roster: &[Person]) -> Result<(), EngineError> {
        mutate::validate_roster(roster)
    }

    /// Passe la corvée au prochain présent et l'inscrit à `on_date`.
    pub fn advance(
        &self,
        state: &RotationState,
        on_date: NaiveDate,
    ) -> Result<RotationState, EngineError> {
        mutate::advance(self, state, on_date)
    }

    /// Attribue une date du calendrier à une personne (écrase l'existant).
    pub fn assign_date(
        &self,
        state: &RotationState,
        date: NaiveDate,
        person: &PersonId,
    ) -> Result<RotationState, EngineError> {
        mutate::assign_date(self, state, date, person)
    }

    pub fn clear_date(&self, state: &RotationState, date: NaiveDate) -> RotationState {
        mutate::clear_date(state, date)
    }

    pub fn add_absence(
        &self,
        state: &RotationState,
        person: &PersonId,
        start: NaiveDate,
        end: NaiveDate,
        reason: Option<String>,
    ) -> Result<(RotationState, AbsenceId), EngineError> {
        mutate::add_absence(state, person, start, end, reason)
    }

    pub fn remove_absence(
        &self,
        state: &RotationState,
        index: usize,
    ) -> Result<RotationState, EngineError> {
        let mut out = state.clone();
        out.absences = absence::remove_absence(&state.absences, index)?;
        Ok(out)
    }

    pub fn remove_absence_by_id(
        &self,
        state: &RotationState,
        id: &AbsenceId,
    ) -> Result<RotationState, EngineError> {
        let mut out = state.clone();
        out.absences = absence::remove_absence_by_id(&state.absences, id)?;
        Ok(out)
    }

    pub fn rename_person(
        &self,
        state: &RotationState,
        person: &PersonId,
        name: &str,
    ) -> Result<RotationState, EngineError> {
        mutate::rename_person(state, person, name)
    }

    pub fn complete_setup(&self, state: &RotationState) -> Result<RotationState, EngineError> {
        mutate::complete_setup(state)
    }

    /// Prévision sur `config.upcoming_days` jours après `from`.
    pub fn predict(
        &self,
        state: &RotationState,
        from: NaiveDate,
    ) -> Result<Vec<DutyRecord>, EngineError> {
        predict_upcoming(
            &state.roster,
            &state.current_duty,
            &state.absences,
            from,
            self.config.upcoming_days,
        )
    }
}
