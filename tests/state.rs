#![forbid(unsafe_code)]
use chrono::NaiveDate;
use corvee::{
    DutyRecord, EngineError, Person, PersonId, RotationConfig, RotationEngine, RotationState,
};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn ready_state() -> RotationState {
    let mut state = RotationState::placeholder();
    state.roster = vec![
        Person::new("1", "Alice"),
        Person::new("2", "Bob"),
        Person::new("3", "Chloé"),
    ];
    state.initialized = true;
    state
}

#[test]
fn placeholder_has_three_unnamed_people() {
    let state = RotationState::placeholder();
    assert_eq!(state.roster.len(), 3);
    assert!(state.roster.iter().all(|p| p.name.is_empty()));
    assert_eq!(state.current_duty, PersonId::new("1"));
    assert!(!state.initialized);
    assert_eq!(state.revision, 0);
}

#[test]
fn setup_requires_every_name() {
    let engine = RotationEngine::default();
    let state = RotationState::placeholder();
    assert_eq!(
        engine.complete_setup(&state).unwrap_err(),
        EngineError::IncompleteSetup
    );

    let mut state = state;
    for (id, name) in [("1", "Alice"), ("2", "Bob"), ("3", "Chloé")] {
        state = engine
            .rename_person(&state, &PersonId::new(id), name)
            .unwrap();
    }
    let done = engine.complete_setup(&state).unwrap();
    assert!(done.initialized);
    assert!(!state.initialized);
}

#[test]
fn rename_unknown_person_fails() {
    let engine = RotationEngine::default();
    let err = engine
        .rename_person(&ready_state(), &PersonId::new("9"), "Zoé")
        .unwrap_err();
    assert_eq!(err, EngineError::UnknownPerson("9".into()));
}

#[test]
fn validate_roster_rejects_empty_and_duplicates() {
    let engine = RotationEngine::default();
    assert_eq!(engine.validate_roster(&[]), Err(EngineError::EmptyRoster));
    let dup = [Person::new("1", "A"), Person::new("1", "B")];
    assert_eq!(
        engine.validate_roster(&dup),
        Err(EngineError::DuplicatePerson("1".into()))
    );
}

#[test]
fn advance_moves_holder_and_records_day() {
    let engine = RotationEngine::default();
    let state = ready_state();
    let next = engine.advance(&state, d("2024-01-01")).unwrap();
    assert_eq!(next.current_duty, PersonId::new("2"));
    assert_eq!(
        next.history,
        vec![DutyRecord {
            date: d("2024-01-01"),
            person_id: PersonId::new("2")
        }]
    );
    assert_eq!(next.revision, state.revision);
    // l'instantané d'origine est intact
    assert_eq!(state.current_duty, PersonId::new("1"));
}

#[test]
fn advance_twice_same_day_keeps_one_record() {
    let engine = RotationEngine::default();
    let state = engine.advance(&ready_state(), d("2024-01-01")).unwrap();
    let state = engine.advance(&state, d("2024-01-01")).unwrap();
    assert_eq!(state.current_duty, PersonId::new("3"));
    assert_eq!(state.history.len(), 1);
    assert_eq!(state.history[0].person_id, PersonId::new("3"));
}

#[test]
fn advance_respects_history_cap() {
    let engine = RotationEngine::new(RotationConfig::new(2, 7).unwrap());
    let mut state = ready_state();
    for day in ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"] {
        state = engine.advance(&state, d(day)).unwrap();
    }
    let dates: Vec<NaiveDate> = state.history.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![d("2024-01-04"), d("2024-01-03")]);
}

#[test]
fn advance_skips_absent_person() {
    let engine = RotationEngine::default();
    let (state, _) = engine
        .add_absence(
            &ready_state(),
            &PersonId::new("2"),
            d("2024-01-01"),
            d("2024-01-05"),
            Some("voyage".into()),
        )
        .unwrap();
    let next = engine.advance(&state, d("2024-01-02")).unwrap();
    assert_eq!(next.current_duty, PersonId::new("3"));
}

#[test]
fn assign_and_clear_calendar_dates() {
    let engine = RotationEngine::default();
    let state = engine
        .assign_date(&ready_state(), d("2024-01-10"), &PersonId::new("3"))
        .unwrap();
    assert_eq!(state.holder_on(d("2024-01-10")), Some(&PersonId::new("3")));
    // le titulaire courant ne bouge pas
    assert_eq!(state.current_duty, PersonId::new("1"));

    let err = engine
        .assign_date(&state, d("2024-01-11"), &PersonId::new("9"))
        .unwrap_err();
    assert_eq!(err, EngineError::UnknownPerson("9".into()));

    let cleared = engine.clear_date(&state, d("2024-01-10"));
    assert!(cleared.history.is_empty());
}

#[test]
fn absence_lifecycle_by_id() {
    let engine = RotationEngine::default();
    let (state, id) = engine
        .add_absence(
            &ready_state(),
            &PersonId::new("1"),
            d("2024-01-01"),
            d("2024-01-02"),
            Some("  ".into()),
        )
        .unwrap();
    assert_eq!(state.absences.len(), 1);
    assert_eq!(state.absences[0].reason, None);

    let state = engine.remove_absence_by_id(&state, &id).unwrap();
    assert!(state.absences.is_empty());
    assert!(matches!(
        engine.remove_absence(&state, 0),
        Err(EngineError::IndexOutOfRange { index: 0, len: 0 })
    ));
}

#[test]
fn zero_history_cap_is_rejected() {
    assert!(matches!(
        RotationConfig::new(0, 7),
        Err(EngineError::InvalidConfig(_))
    ));
}

#[test]
fn predict_uses_configured_window() {
    let engine = RotationEngine::new(RotationConfig::new(30, 4).unwrap());
    let days = engine.predict(&ready_state(), d("2024-01-01")).unwrap();
    let ids: Vec<&str> = days.iter().map(|r| r.person_id.as_str()).collect();
    assert_eq!(ids, vec!["2", "3", "1", "2"]);
}

#[test]
fn assign_beyond_full_history_is_rejected() {
    let engine = RotationEngine::new(RotationConfig::new(3, 7).unwrap());
    let mut state = ready_state();
    for day in ["2024-01-08", "2024-01-09", "2024-01-10"] {
        state = engine.advance(&state, d(day)).unwrap();
    }

    let err = engine
        .assign_date(&state, d("2023-12-01"), &PersonId::new("2"))
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::BeyondHistoryCap {
            date: d("2023-12-01"),
            cap: 3
        }
    );

    // une date encore dans la fenêtre reste modifiable
    let edited = engine
        .assign_date(&state, d("2024-01-09"), &PersonId::new("1"))
        .unwrap();
    assert_eq!(edited.holder_on(d("2024-01-09")), Some(&PersonId::new("1")));
    assert_eq!(edited.history.len(), 3);
}

#[test]
fn advance_on_date_beyond_full_history_is_rejected() {
    let engine = RotationEngine::new(RotationConfig::new(2, 7).unwrap());
    let mut state = ready_state();
    for day in ["2024-01-09", "2024-01-10"] {
        state = engine.advance(&state, d(day)).unwrap();
    }
    assert!(matches!(
        engine.advance(&state, d("2024-01-01")),
        Err(EngineError::BeyondHistoryCap { cap: 2, .. })
    ));
}
