use crate::model::{DutyHistory, DutyRecord, PersonId};
use chrono::NaiveDate;

/// Upsert par date puis troncature à `max_len` (les plus anciennes partent).
///
/// L'entrée est placée avant la première date plus ancienne : pour la date du
/// jour c'est un simple ajout en tête.
pub fn append_duty_record(
    history: &[DutyRecord],
    date: NaiveDate,
    person_id: &PersonId,
    max_len: usize,
) -> DutyHistory {
    let mut out: DutyHistory = history.iter().filter(|r| r.date != date).cloned().collect();
    let pos = out
        .iter()
        .position(|r| r.date < date)
        .unwrap_or(out.len());
    out.insert(
        pos,
        DutyRecord {
            date,
            person_id: person_id.clone(),
        },
    );
    out.truncate(max_len);
    out
}

pub fn remove_duty_record(history: &[DutyRecord], date: NaiveDate) -> DutyHistory {
    history.iter().filter(|r| r.date != date).cloned().collect()
}
