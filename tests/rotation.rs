#![forbid(unsafe_code)]
use chrono::NaiveDate;
use corvee::engine::{next_duty_holder, predict_upcoming};
use corvee::{Absence, EngineError, Person, PersonId};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn roster3() -> Vec<Person> {
    vec![Person::new("1", "A"), Person::new("2", "B"), Person::new("3", "C")]
}

fn away(id: &str, start: &str, end: &str) -> Absence {
    Absence::new(PersonId::new(id), d(start), d(end), None)
}

#[test]
fn next_is_successor_without_absences() {
    let next = next_duty_holder(&roster3(), &PersonId::new("1"), &[], d("2024-01-01")).unwrap();
    assert_eq!(next, PersonId::new("2"));
}

#[test]
fn next_wraps_around() {
    let next = next_duty_holder(&roster3(), &PersonId::new("3"), &[], d("2024-01-01")).unwrap();
    assert_eq!(next, PersonId::new("1"));
}

#[test]
fn absent_successor_is_skipped() {
    let absences = [away("2", "2024-01-01", "2024-01-05")];
    let next =
        next_duty_holder(&roster3(), &PersonId::new("1"), &absences, d("2024-01-02")).unwrap();
    assert_eq!(next, PersonId::new("3"));
}

#[test]
fn absence_outside_target_date_is_ignored() {
    let absences = [away("2", "2024-01-01", "2024-01-05")];
    let next =
        next_duty_holder(&roster3(), &PersonId::new("1"), &absences, d("2024-01-06")).unwrap();
    assert_eq!(next, PersonId::new("2"));
}

#[test]
fn current_holder_comes_back_when_everyone_else_is_away() {
    let absences = [
        away("2", "2024-01-01", "2024-01-01"),
        away("3", "2024-01-01", "2024-01-01"),
    ];
    let next =
        next_duty_holder(&roster3(), &PersonId::new("1"), &absences, d("2024-01-01")).unwrap();
    assert_eq!(next, PersonId::new("1"));
}

#[test]
fn everyone_absent_is_an_error() {
    let roster = vec![Person::new("A", "A"), Person::new("B", "B")];
    let absences = [
        away("A", "2024-01-01", "2024-01-01"),
        away("B", "2023-12-31", "2024-01-02"),
    ];
    let err = next_duty_holder(&roster, &PersonId::new("A"), &absences, d("2024-01-01"))
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::NoEligibleCandidate {
            date: d("2024-01-01")
        }
    );
}

#[test]
fn single_person_roster() {
    let roster = vec![Person::new("1", "Solo")];
    let id = PersonId::new("1");
    assert_eq!(
        next_duty_holder(&roster, &id, &[], d("2024-01-01")).unwrap(),
        id
    );

    let absences = [away("1", "2024-01-01", "2024-01-01")];
    assert!(matches!(
        next_duty_holder(&roster, &id, &absences, d("2024-01-01")),
        Err(EngineError::NoEligibleCandidate { .. })
    ));
}

#[test]
fn unknown_current_holder_is_invalid_state() {
    let err = next_duty_holder(&roster3(), &PersonId::new("9"), &[], d("2024-01-01")).unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));

    let err = next_duty_holder(&[], &PersonId::new("1"), &[], d("2024-01-01")).unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));
}

#[test]
fn predict_three_days() {
    let got = predict_upcoming(&roster3(), &PersonId::new("1"), &[], d("2024-01-01"), 3).unwrap();
    let got: Vec<(NaiveDate, &str)> = got.iter().map(|r| (r.date, r.person_id.as_str())).collect();
    assert_eq!(
        got,
        vec![
            (d("2024-01-02"), "2"),
            (d("2024-01-03"), "3"),
            (d("2024-01-04"), "1"),
        ]
    );
}

#[test]
fn predict_skips_only_on_absent_days() {
    // B n'est absent que le 2024-01-02
    let absences = [away("2", "2024-01-02", "2024-01-02")];
    let got =
        predict_upcoming(&roster3(), &PersonId::new("1"), &absences, d("2024-01-01"), 4).unwrap();
    let ids: Vec<&str> = got.iter().map(|r| r.person_id.as_str()).collect();
    assert_eq!(ids, vec!["3", "1", "2", "3"]);
}

#[test]
fn predict_zero_days_is_empty() {
    let got = predict_upcoming(&roster3(), &PersonId::new("1"), &[], d("2024-01-01"), 0).unwrap();
    assert!(got.is_empty());
}

#[test]
fn predict_fails_when_a_day_has_nobody() {
    let roster = vec![Person::new("1", "A"), Person::new("2", "B")];
    let absences = [
        away("1", "2024-01-03", "2024-01-03"),
        away("2", "2024-01-03", "2024-01-03"),
    ];
    let err =
        predict_upcoming(&roster, &PersonId::new("1"), &absences, d("2024-01-01"), 5).unwrap_err();
    assert_eq!(
        err,
        EngineError::NoEligibleCandidate {
            date: d("2024-01-03")
        }
    );
}

#[test]
fn predict_huge_count_is_an_error() {
    let roster = vec![Person::new("1", "A"), Person::new("2", "B")];
    let err = predict_upcoming(&roster, &PersonId::new("1"), &[], d("2024-01-01"), usize::MAX)
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::DateOverflow {
            from: d("2024-01-01"),
            days: usize::MAX
        }
    );
}

#[test]
fn predict_past_last_date_is_an_error() {
    let err = predict_upcoming(&roster3(), &PersonId::new("1"), &[], NaiveDate::MAX, 1)
        .unwrap_err();
    assert!(matches!(err, EngineError::DateOverflow { days: 1, .. }));
    assert!(err.to_string().contains("date overflow"));
}
