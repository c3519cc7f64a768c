use super::{absence, history, rotation, EngineError, RotationEngine};
use crate::model::{Absence, AbsenceId, DutyHistory, Person, PersonId, RotationState};
use chrono::NaiveDate;
use std::collections::HashSet;

pub(super) fn validate_roster(roster: &[Person]) -> Result<(), EngineError> {
    if roster.is_empty() {
        return Err(EngineError::EmptyRoster);
    }
    let mut seen = HashSet::with_capacity(roster.len());
    for person in roster {
        if !seen.insert(&person.id) {
            return Err(EngineError::DuplicatePerson(person.id.as_str().to_string()));
        }
    }
    Ok(())
}

/// Upsert dans l'historique ; refuse une date que la troncature ferait
/// disparaître aussitôt.
fn record_duty(
    engine: &RotationEngine,
    state: &RotationState,
    date: NaiveDate,
    person: &PersonId,
) -> Result<DutyHistory, EngineError> {
    let cap = engine.config.history_cap;
    let out = history::append_duty_record(&state.history, date, person, cap);
    if !out.iter().any(|r| r.date == date) {
        return Err(EngineError::BeyondHistoryCap { date, cap });
    }
    Ok(out)
}

fn ensure_person(state: &RotationState, id: &PersonId) -> Result<(), EngineError> {
    state
        .find_person(id)
        .map(|_| ())
        .ok_or_else(|| EngineError::UnknownPerson(id.as_str().to_string()))
}

pub(super) fn advance(
    engine: &RotationEngine,
    state: &RotationState,
    on_date: NaiveDate,
) -> Result<RotationState, EngineError> {
    validate_roster(&state.roster)?;
    let next = rotation::next_duty_holder(
        &state.roster,
        &state.current_duty,
        &state.absences,
        on_date,
    )?;

    let mut out = state.clone();
    out.history = record_duty(engine, state, on_date, &next)?;
    out.current_duty = next;
    Ok(out)
}

pub(super) fn assign_date(
    engine: &RotationEngine,
    state: &RotationState,
    date: NaiveDate,
    person: &PersonId,
) -> Result<RotationState, EngineError> {
    ensure_person(state, person)?;
    let mut out = state.clone();
    out.history = record_duty(engine, state, date, person)?;
    Ok(out)
}

pub(super) fn clear_date(state: &RotationState, date: NaiveDate) -> RotationState {
    let mut out = state.clone();
    out.history = history::remove_duty_record(&state.history, date);
    out
}

pub(super) fn add_absence(
    state: &RotationState,
    person: &PersonId,
    start: NaiveDate,
    end: NaiveDate,
    reason: Option<String>,
) -> Result<(RotationState, AbsenceId), EngineError> {
    let reason = reason.filter(|r| !r.trim().is_empty());
    let new_absence = Absence::new(person.clone(), start, end, reason);
    let id = new_absence.id.clone();

    let mut out = state.clone();
    out.absences = absence::add_absence(&state.roster, &state.absences, new_absence)?;
    Ok((out, id))
}

pub(super) fn rename_person(
    state: &RotationState,
    person: &PersonId,
    name: &str,
) -> Result<RotationState, EngineError> {
    ensure_person(state, person)?;
    let mut out = state.clone();
    if let Some(p) = out.roster.iter_mut().find(|p| &p.id == person) {
        p.name = name.trim().to_string();
    }
    Ok(out)
}

pub(super) fn complete_setup(state: &RotationState) -> Result<RotationState, EngineError> {
    validate_roster(&state.roster)?;
    if state.roster.iter().any(|p| p.name.trim().is_empty()) {
        return Err(EngineError::IncompleteSetup);
    }
    if state.find_person(&state.current_duty).is_none() {
        return Err(EngineError::InvalidState(format!(
            "current holder {} not in roster",
            state.current_duty
        )));
    }
    let mut out = state.clone();
    out.initialized = true;
    Ok(out)
}
