use crate::model::{Absence, Person, PersonId, RotationState};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Date calendaire stricte `YYYY-MM-DD`, sans heure ni fuseau.
pub fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

/// Import de personnes depuis CSV: header `id,name`.
///
/// Un `id` vide reçoit le prochain entier libre après ceux de `existing`.
pub fn import_people_csv<P: AsRef<Path>>(
    path: P,
    existing: &[Person],
) -> anyhow::Result<Vec<Person>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut next_id = existing
        .iter()
        .filter_map(|p| p.id.as_str().parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    let mut seen: HashSet<String> = existing.iter().map(|p| p.id.as_str().to_owned()).collect();

    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let name = rec.get(1).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid people row (empty name)");
        }
        let id = if id.is_empty() {
            next_id += 1;
            next_id.to_string()
        } else {
            if let Ok(n) = id.parse::<u64>() {
                next_id = next_id.max(n);
            }
            id.to_string()
        };
        if !seen.insert(id.clone()) {
            bail!("duplicate person id {id}");
        }
        out.push(Person::new(id, name));
    }
    Ok(out)
}

/// Import d'absences: header `person_id,start,end[,reason]`.
///
/// Pas de validation ici ; passer chaque absence par `engine::add_absence`.
pub fn import_absences_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Absence>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let person = rec.get(0).context("missing person_id")?.trim();
        if person.is_empty() {
            bail!("invalid absence row (empty person_id)");
        }
        let start = parse_date(rec.get(1).context("missing start")?)?;
        let end = parse_date(rec.get(2).context("missing end")?)?;
        let reason = rec
            .get(3)
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);
        out.push(Absence::new(PersonId::new(person), start, end, reason));
    }
    Ok(out)
}

/// Export JSON de l'état (jolie mise en forme)
pub fn export_state_json<P: AsRef<Path>>(path: P, state: &RotationState) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(state)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV de l'historique: header `date,person_id,name`
pub fn export_history_csv<P: AsRef<Path>>(path: P, state: &RotationState) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "person_id", "name"])?;
    for r in &state.history {
        let name = state
            .find_person(&r.person_id)
            .map(|p| p.name.as_str())
            .unwrap_or("");
        let date = r.date.format("%Y-%m-%d").to_string();
        w.write_record([date.as_str(), r.person_id.as_str(), name])?;
    }
    w.flush()?;
    Ok(())
}
