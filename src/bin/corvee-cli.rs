#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use corvee::{
    engine::{self, EngineError, RotationConfig, RotationEngine},
    io,
    model::{AbsenceId, Person, PersonId, RotationState, DEFAULT_HISTORY_CAP},
    notice::{prepare_notice, TextNotice},
    storage::{self, JsonStorage, Storage},
};
use clap::{Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de rotation de corvée (état dans un fichier JSON)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    #[cfg_attr(not(feature = "logging"), allow(dead_code))]
    log: bool,

    /// Fichier JSON d'état
    #[arg(long, global = true, default_value = "corvee.json")]
    state: String,

    /// Nombre maximal d'entrées d'historique conservées
    #[arg(long, global = true, default_value_t = DEFAULT_HISTORY_CAP)]
    history_cap: usize,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Créer la rotation à partir d'une liste de noms
    Init {
        /// liste "nom1,nom2,..." (ordre = ordre de rotation)
        #[arg(long)]
        names: String,
    },

    /// Renommer une personne
    Rename {
        /// id ou nom
        #[arg(long)]
        person: String,
        #[arg(long)]
        name: String,
    },

    /// Terminer la configuration initiale (tous les noms renseignés)
    Setup,

    /// Passer la corvée au prochain présent
    Next {
        /// YYYY-MM-DD (défaut : aujourd'hui)
        #[arg(long)]
        date: Option<String>,
    },

    /// Attribuer une date à une personne
    Assign {
        #[arg(long)]
        date: String,
        #[arg(long)]
        person: String,
    },

    /// Effacer l'attribution d'une date
    Unassign {
        #[arg(long)]
        date: String,
    },

    /// Déclarer une absence (bornes incluses)
    AbsenceAdd {
        #[arg(long)]
        person: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long)]
        reason: Option<String>,
    },

    /// Supprimer une absence par id (ou par position)
    AbsenceRemove {
        #[arg(long, conflicts_with = "index", required_unless_present = "index")]
        id: Option<String>,
        #[arg(long)]
        index: Option<usize>,
    },

    /// Lister les absences
    Absences,

    /// Prévoir les prochains titulaires
    Predict {
        /// YYYY-MM-DD (défaut : aujourd'hui)
        #[arg(long)]
        from: Option<String>,
        #[arg(long, default_value_t = 7)]
        count: usize,
    },

    /// Afficher et optionnellement exporter l'historique
    History {
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Résumé du jour : titulaire, absences, prévision
    Status {
        /// YYYY-MM-DD (défaut : aujourd'hui)
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value_t = 7)]
        upcoming: usize,
    },

    /// Importer des personnes depuis un CSV (avant `setup`)
    ImportPeople {
        #[arg(long)]
        csv: String,
    },

    /// Importer des absences depuis un CSV
    ImportAbsences {
        #[arg(long)]
        csv: String,
    },

    /// Exporter l'état complet en JSON
    Export {
        #[arg(long)]
        out_json: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.state)?;
    let config = RotationConfig::new(cli.history_cap, RotationConfig::default().upcoming_days)?;
    let engine = RotationEngine::new(config);

    let code = match cli.cmd {
        Commands::Init { names } => {
            let names: Vec<&str> = names
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            if names.is_empty() {
                bail!("aucun nom fourni");
            }
            if storage.load()?.initialized {
                bail!("rotation déjà configurée");
            }
            let state = storage::update(&storage, |state| {
                let mut next = state.clone();
                next.roster = names
                    .iter()
                    .enumerate()
                    .map(|(i, name)| Person::new((i + 1).to_string(), *name))
                    .collect();
                next.current_duty = PersonId::new("1");
                next.history.clear();
                next.absences.clear();
                engine.complete_setup(&next)
            })?;
            log_saved(&state);
            println!("Rotation créée pour {} personne(s)", state.roster.len());
            0
        }
        Commands::Rename { person, name } => {
            let state = storage::update(&storage, |state| {
                let id = resolve(state, &person)?;
                engine.rename_person(state, &id, &name)
            })?;
            log_saved(&state);
            0
        }
        Commands::Setup => {
            let state = storage::update(&storage, |state| engine.complete_setup(state))?;
            log_saved(&state);
            println!("Configuration terminée");
            0
        }
        Commands::Next { date } => {
            ensure_initialized(&storage)?;
            let on = date_or_today(date.as_deref())?;
            let state = storage::update(&storage, |state| engine.advance(state, on))?;
            log_saved(&state);
            println!("{on} : {}", display_name(&state, &state.current_duty));
            0
        }
        Commands::Assign { date, person } => {
            ensure_initialized(&storage)?;
            let on = io::parse_date(&date)?;
            let state = storage::update(&storage, |state| {
                let id = resolve(state, &person)?;
                engine.assign_date(state, on, &id)
            })?;
            log_saved(&state);
            0
        }
        Commands::Unassign { date } => {
            let on = io::parse_date(&date)?;
            let state = storage::update(&storage, |state| Ok(engine.clear_date(state, on)))?;
            log_saved(&state);
            0
        }
        Commands::AbsenceAdd {
            person,
            start,
            end,
            reason,
        } => {
            ensure_initialized(&storage)?;
            let start = io::parse_date(&start)?;
            let end = io::parse_date(&end)?;
            let (state, id) = storage::update_with(&storage, |state| {
                let pid = resolve(state, &person)?;
                engine.add_absence(state, &pid, start, end, reason)
            })?;
            log_saved(&state);
            println!("{}", id.as_str());
            0
        }
        Commands::AbsenceRemove { id, index } => {
            let state = storage::update(&storage, |state| match (&id, index) {
                (Some(id), _) => engine.remove_absence_by_id(state, &AbsenceId::new(id)),
                (None, Some(index)) => engine.remove_absence(state, index),
                (None, None) => Err(EngineError::InvalidState("no absence designated".into())),
            })?;
            log_saved(&state);
            0
        }
        Commands::Absences => {
            let state = storage.load()?;
            for (i, a) in state.absences.iter().enumerate() {
                println!(
                    "{i} | {} | {} | {} → {} | {}",
                    a.id.as_str(),
                    display_name(&state, &a.person_id),
                    a.start,
                    a.end,
                    a.reason.as_deref().unwrap_or("-")
                );
            }
            0
        }
        Commands::Predict { from, count } => {
            let state = storage.load()?;
            let from = date_or_today(from.as_deref())?;
            let upcoming = engine::predict_upcoming(
                &state.roster,
                &state.current_duty,
                &state.absences,
                from,
                count,
            )?;
            for r in &upcoming {
                println!("{} | {}", r.date, display_name(&state, &r.person_id));
            }
            0
        }
        Commands::History { out_csv } => {
            let state = storage.load()?;
            if let Some(path) = out_csv {
                io::export_history_csv(path, &state)?;
            }
            for r in &state.history {
                println!("{} | {}", r.date, display_name(&state, &r.person_id));
            }
            0
        }
        Commands::Status { date, upcoming } => {
            let state = storage.load()?;
            if !state.initialized {
                eprintln!("Configuration initiale incomplète : lancer `corvee-cli init` ou `setup`");
                2
            } else {
                let on = date_or_today(date.as_deref())?;
                let engine = RotationEngine::new(RotationConfig::new(cli.history_cap, upcoming)?);
                match prepare_notice(&engine, &state, on, &TextNotice) {
                    Ok(notice) => {
                        print!("{}", notice.content);
                        0
                    }
                    // Code 2 = personne de disponible sur la période
                    Err(err @ EngineError::NoEligibleCandidate { .. }) => {
                        eprintln!("{err}");
                        2
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }
        Commands::ImportPeople { csv } => {
            let current = storage.load()?;
            if current.initialized {
                bail!("rotation déjà configurée : import impossible");
            }
            let people = io::import_people_csv(csv, &[])?;
            let state = storage::update(&storage, |state| {
                engine.validate_roster(&people)?;
                let mut next = state.clone();
                next.current_duty = people[0].id.clone();
                next.roster = people;
                Ok(next)
            })?;
            log_saved(&state);
            println!("{} personne(s) importée(s)", state.roster.len());
            0
        }
        Commands::ImportAbsences { csv } => {
            ensure_initialized(&storage)?;
            let rows = io::import_absences_csv(csv)?;
            let count = rows.len();
            let state = storage::update(&storage, |state| {
                let mut next = state.clone();
                for row in rows {
                    let pid = resolve(&next, row.person_id.as_str())?;
                    let (updated, _) = engine.add_absence(&next, &pid, row.start, row.end, row.reason)?;
                    next = updated;
                }
                Ok(next)
            })?;
            log_saved(&state);
            println!("{count} absence(s) importée(s)");
            0
        }
        Commands::Export { out_json } => {
            let state = storage.load()?;
            io::export_state_json(out_json, &state)?;
            0
        }
    };

    std::process::exit(code);
}

fn resolve(state: &RotationState, key: &str) -> Result<PersonId, EngineError> {
    state
        .resolve_person(key)
        .map(|p| p.id.clone())
        .ok_or_else(|| EngineError::UnknownPerson(key.to_string()))
}

fn display_name<'a>(state: &'a RotationState, id: &'a PersonId) -> &'a str {
    state
        .find_person(id)
        .map(|p| p.name.as_str())
        .unwrap_or(id.as_str())
}

fn date_or_today(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(raw) => io::parse_date(raw),
        None => Ok(Local::now().date_naive()),
    }
}

fn ensure_initialized(storage: &JsonStorage) -> Result<()> {
    if !storage.load()?.initialized {
        bail!("configuration initiale incomplète : lancer `corvee-cli init` ou `setup`");
    }
    Ok(())
}

#[cfg_attr(not(feature = "logging"), allow(unused_variables))]
fn log_saved(state: &RotationState) {
    #[cfg(feature = "logging")]
    tracing::info!(
        revision = state.revision,
        current = %state.current_duty,
        "state updated"
    );
}
