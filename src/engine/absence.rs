use super::EngineError;
use crate::model::{Absence, AbsenceId, Person, PersonId};
use chrono::NaiveDate;

pub fn is_absent(person: &PersonId, on_date: NaiveDate, absences: &[Absence]) -> bool {
    absences
        .iter()
        .any(|a| &a.person_id == person && a.covers(on_date))
}

/// Personnes du roster absentes à `on_date`, dans l'ordre du roster.
pub fn absentees_on<'a>(
    roster: &'a [Person],
    absences: &[Absence],
    on_date: NaiveDate,
) -> Vec<&'a Person> {
    roster
        .iter()
        .filter(|p| is_absent(&p.id, on_date, absences))
        .collect()
}

/// Ajoute une absence validée. Les chevauchements sont permis.
pub fn add_absence(
    roster: &[Person],
    absences: &[Absence],
    new_absence: Absence,
) -> Result<Vec<Absence>, EngineError> {
    if new_absence.start > new_absence.end {
        return Err(EngineError::InvalidRange {
            start: new_absence.start,
            end: new_absence.end,
        });
    }
    if !roster.iter().any(|p| p.id == new_absence.person_id) {
        return Err(EngineError::UnknownPerson(
            new_absence.person_id.as_str().to_string(),
        ));
    }
    let mut out = absences.to_vec();
    out.push(new_absence);
    Ok(out)
}

pub fn remove_absence(absences: &[Absence], index: usize) -> Result<Vec<Absence>, EngineError> {
    if index >= absences.len() {
        return Err(EngineError::IndexOutOfRange {
            index,
            len: absences.len(),
        });
    }
    let mut out = absences.to_vec();
    out.remove(index);
    Ok(out)
}

pub fn remove_absence_by_id(
    absences: &[Absence],
    id: &AbsenceId,
) -> Result<Vec<Absence>, EngineError> {
    let Some(pos) = absences.iter().position(|a| &a.id == id) else {
        return Err(EngineError::UnknownAbsence(id.as_str().to_string()));
    };
    remove_absence(absences, pos)
}
