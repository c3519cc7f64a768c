use super::{absence::is_absent, EngineError};
use crate::model::{Absence, DutyRecord, Person, PersonId};
use chrono::{Days, NaiveDate};

/// Premier successeur présent de `current` dans l'ordre du roster.
///
/// Le parcours est borné à `roster.len()` pas : la personne courante est
/// examinée en dernier, et si tout le monde est absent on obtient
/// `NoEligibleCandidate` plutôt qu'une boucle infinie.
pub fn next_duty_holder(
    roster: &[Person],
    current: &PersonId,
    absences: &[Absence],
    on_date: NaiveDate,
) -> Result<PersonId, EngineError> {
    let Some(start) = roster.iter().position(|p| &p.id == current) else {
        return Err(EngineError::InvalidState(format!(
            "current holder {current} not in roster"
        )));
    };

    let total = roster.len();
    (1..=total)
        .map(|step| &roster[(start + step) % total])
        .find(|person| !is_absent(&person.id, on_date, absences))
        .map(|person| person.id.clone())
        .ok_or(EngineError::NoEligibleCandidate { date: on_date })
}

/// Prévision pour les `count` jours suivant `from` (exclu), sans rien modifier.
pub fn predict_upcoming(
    roster: &[Person],
    current: &PersonId,
    absences: &[Absence],
    from: NaiveDate,
    count: usize,
) -> Result<Vec<DutyRecord>, EngineError> {
    let overflow = EngineError::DateOverflow { from, days: count };
    if u64::try_from(count)
        .ok()
        .and_then(|days| from.checked_add_days(Days::new(days)))
        .is_none()
    {
        return Err(overflow);
    }

    let mut out = Vec::with_capacity(count.min(366));
    let mut holder = current.clone();
    let mut date = from;

    for _ in 0..count {
        date = date.succ_opt().ok_or_else(|| overflow.clone())?;
        holder = next_duty_holder(roster, &holder, absences, date)?;
        out.push(DutyRecord {
            date,
            person_id: holder.clone(),
        });
    }

    Ok(out)
}
