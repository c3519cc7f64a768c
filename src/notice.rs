use crate::engine::{EngineError, RotationEngine};
use crate::model::{Absence, Person, PersonId, RotationState};
use chrono::NaiveDate;
use std::fmt::Write;

/// Ce qu'un rendu de notice a besoin de savoir pour une journée.
#[derive(Debug, Clone)]
pub struct NoticeView<'a> {
    pub date: NaiveDate,
    pub holder: Option<&'a Person>,
    pub absences: Vec<(&'a Person, &'a Absence)>,
    pub upcoming: Vec<(NaiveDate, &'a Person)>,
}

/// Notice générée pour une journée.
#[derive(Debug, Clone)]
pub struct Notice {
    pub date: NaiveDate,
    pub holder: Option<PersonId>,
    pub content: String,
}

/// Permet de customiser le rendu du message (terminal, mail, etc.).
pub trait NoticeRenderer {
    fn render(&self, view: &NoticeView<'_>) -> String;
}

/// Rendu texte brut.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextNotice;

impl NoticeRenderer for TextNotice {
    fn render(&self, view: &NoticeView<'_>) -> String {
        let mut out = String::new();
        let holder = view.holder.map_or("personne", |p| p.name.as_str());
        let _ = writeln!(out, "Corvée du {} : {holder}", view.date);

        if !view.absences.is_empty() {
            out.push_str("Absences :\n");
            for (person, absence) in &view.absences {
                let _ = write!(out, "  - {} jusqu'au {}", person.name, absence.end);
                if let Some(reason) = &absence.reason {
                    let _ = write!(out, " ({reason})");
                }
                out.push('\n');
            }
        }

        if !view.upcoming.is_empty() {
            out.push_str("À venir :\n");
            for (date, person) in &view.upcoming {
                let _ = writeln!(out, "  {date}  {}", person.name);
            }
        }
        out
    }
}

/// Prépare la notice du jour : titulaire (historique, sinon titulaire courant),
/// absences en cours et prévision sur `config.upcoming_days` jours.
pub fn prepare_notice(
    engine: &RotationEngine,
    state: &RotationState,
    date: NaiveDate,
    renderer: &dyn NoticeRenderer,
) -> Result<Notice, EngineError> {
    let holder_id = state
        .holder_on(date)
        .cloned()
        .unwrap_or_else(|| state.current_duty.clone());
    let holder = state.find_person(&holder_id);

    let absences = state
        .absences
        .iter()
        .filter(|a| a.covers(date))
        .filter_map(|a| state.find_person(&a.person_id).map(|p| (p, a)))
        .collect();

    let upcoming = engine
        .predict(state, date)?
        .into_iter()
        .filter_map(|r| state.find_person(&r.person_id).map(|p| (r.date, p)))
        .collect();

    let view = NoticeView {
        date,
        holder,
        absences,
        upcoming,
    };
    Ok(Notice {
        date,
        holder: holder.map(|p| p.id.clone()),
        content: renderer.render(&view),
    })
}
