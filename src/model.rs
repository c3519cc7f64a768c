use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Nombre maximal d'entrées conservées dans l'historique.
pub const DEFAULT_HISTORY_CAP: usize = 30;

/// Identifiant fort pour Person
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonId(String);

impl PersonId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Personne de la rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
}

impl Person {
    pub fn new<I: AsRef<str>, N: Into<String>>(id: I, name: N) -> Self {
        Self {
            id: PersonId::new(id),
            name: name.into(),
        }
    }
}

/// Identifiant stable d'une absence (UUID v4).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbsenceId(String);

impl AbsenceId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Période d'absence, bornes incluses `[start, end]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Absence {
    #[serde(default = "AbsenceId::random")]
    pub id: AbsenceId,
    pub person_id: PersonId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Absence {
    /// Construit une absence sans validation ; voir `engine::add_absence`.
    pub fn new(
        person_id: PersonId,
        start: NaiveDate,
        end: NaiveDate,
        reason: Option<String>,
    ) -> Self {
        Self {
            id: AbsenceId::random(),
            person_id,
            start,
            end,
            reason,
        }
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Une journée de corvée attribuée.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyRecord {
    pub date: NaiveDate,
    pub person_id: PersonId,
}

/// Historique, du plus récent au plus ancien.
pub type DutyHistory = Vec<DutyRecord>;

/// Instantané complet de l'état partagé.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationState {
    pub roster: Vec<Person>,
    pub current_duty: PersonId,
    #[serde(default)]
    pub history: DutyHistory,
    #[serde(default)]
    pub absences: Vec<Absence>,
    #[serde(default)]
    pub initialized: bool,
    #[serde(default)]
    pub revision: u64,
}

impl RotationState {
    /// État du premier lancement : trois personnes sans nom, la première de corvée.
    pub fn placeholder() -> Self {
        Self {
            roster: (1..=3).map(|i| Person::new(i.to_string(), "")).collect(),
            current_duty: PersonId::new("1"),
            history: Vec::new(),
            absences: Vec::new(),
            initialized: false,
            revision: 0,
        }
    }

    pub fn find_person(&self, id: &PersonId) -> Option<&Person> {
        self.roster.iter().find(|p| &p.id == id)
    }

    /// Résout une personne par identifiant, puis par nom exact.
    pub fn resolve_person(&self, key: &str) -> Option<&Person> {
        self.roster
            .iter()
            .find(|p| p.id.as_str() == key)
            .or_else(|| self.roster.iter().find(|p| p.name == key))
    }

    pub fn holder_on(&self, date: NaiveDate) -> Option<&PersonId> {
        self.history
            .iter()
            .find(|r| r.date == date)
            .map(|r| &r.person_id)
    }
}
