mod common;

use common::{attempt_of, csv_file, init_logging, new_state, run_ingest, tick_until_done};
use intake_core::{update, AppState, Effect, Msg, Phase, Severity};
use intake_engine::{FailureKind, IngestError, RawFile};
use pretty_assertions::assert_eq;

fn error_entries(state: &AppState) -> usize {
    state
        .log()
        .iter()
        .filter(|entry| entry.severity == Severity::Error)
        .count()
}

fn failure_kind(state: &AppState) -> Option<FailureKind> {
    state.last_error().map(IngestError::kind)
}

#[test]
fn unsupported_file_errors_without_parsing() {
    init_logging();
    let file = RawFile::from_bytes("notes.txt", Some("text/plain"), b"a,b\n1,2\n".to_vec());
    let (state, effects) = update(new_state(), Msg::FileSubmitted(file));

    assert_eq!(state.phase(), Phase::Error);
    assert_eq!(failure_kind(&state), Some(FailureKind::InvalidFormat));
    assert!(state.table().is_none());
    assert!(!effects
        .iter()
        .any(|e| matches!(e, Effect::StartIngest { .. } | Effect::StartProgressTicker { .. })));
    assert!(matches!(
        effects.as_slice(),
        [Effect::Notify {
            severity: Severity::Error,
            ..
        }]
    ));
    assert_eq!(error_entries(&state), 1);
    assert!(state.log()[0].message.contains("notes.txt"));
}

#[test]
fn empty_xlsx_lands_in_error_with_one_error_entry() {
    init_logging();
    let file = RawFile::from_bytes("empty.xlsx", None, Vec::new());
    let (state, effects) = update(new_state(), Msg::FileSubmitted(file));
    assert_eq!(state.phase(), Phase::Uploading, "extension passes validation");

    let (state, effects) = run_ingest(state, &effects);
    assert_eq!(state.phase(), Phase::Error);
    assert_eq!(failure_kind(&state), Some(FailureKind::EmptyFile));
    assert_eq!(effects[0], Effect::StopProgressTicker);
    assert_eq!(error_entries(&state), 1);
    assert_eq!(state.log()[0].severity, Severity::Error);
}

#[test]
fn corrupt_workbook_lands_in_error() {
    let mut bytes = b"PK\x03\x04".to_vec();
    bytes.extend_from_slice(&[0xAB; 128]);
    let file = RawFile::from_bytes("broken.xlsx", None, bytes);
    let (state, effects) = update(new_state(), Msg::FileSubmitted(file));
    let (state, _) = run_ingest(state, &effects);

    assert_eq!(state.phase(), Phase::Error);
    assert_eq!(failure_kind(&state), Some(FailureKind::CorruptFile));
    assert!(state.view().error.is_some());
}

#[test]
fn read_failure_lands_in_error() {
    let (state, effects) = update(new_state(), Msg::FileSubmitted(csv_file("a.csv", "a\n1\n")));
    let attempt = attempt_of(&effects);
    let (state, effects) = update(
        state,
        Msg::IngestFinished {
            attempt,
            result: Err(IngestError::ReadFailure {
                reason: "permission denied".into(),
            }),
        },
    );

    assert_eq!(state.phase(), Phase::Error);
    assert_eq!(failure_kind(&state), Some(FailureKind::ReadFailure));
    assert!(effects.contains(&Effect::StopProgressTicker));
    assert!(state.log()[0].message.contains("permission denied"));
}

#[test]
fn submissions_are_refused_while_in_flight() {
    let (state, _) = update(new_state(), Msg::FileSubmitted(csv_file("a.csv", "a\n1\n")));
    let before = state.view();

    let (state, effects) = update(state, Msg::FileSubmitted(csv_file("b.csv", "b\n2\n")));
    assert_eq!(state.view(), before);
    assert!(matches!(
        effects.as_slice(),
        [Effect::Notify {
            severity: Severity::Error,
            ..
        }]
    ));
}

#[test]
fn error_state_accepts_a_new_file() {
    let file = RawFile::from_bytes("notes.txt", None, Vec::new());
    let (state, _) = update(new_state(), Msg::FileSubmitted(file));
    assert_eq!(state.phase(), Phase::Error);

    let (state, effects) = update(state, Msg::FileSubmitted(csv_file("a.csv", "a\n1\n")));
    assert_eq!(state.phase(), Phase::Uploading);
    assert!(state.last_error().is_none());
    assert_eq!(state.log().len(), 2, "log survives until reset");
    assert_eq!(attempt_of(&effects), 1);
}

#[test]
fn confirm_is_a_noop_outside_preview() {
    for state in [new_state(), {
        let (s, _) = update(new_state(), Msg::FileSubmitted(csv_file("a.csv", "a\n1\n")));
        s
    }] {
        let before = state.clone();
        let (after, effects) = update(state, Msg::ConfirmClicked);
        assert_eq!(after, before);
        assert!(effects.is_empty());
    }
}

#[test]
fn stale_messages_after_reset_are_ignored() {
    let (state, submit_effects) =
        update(new_state(), Msg::FileSubmitted(csv_file("a.csv", "a\n1\n")));
    let old_attempt = attempt_of(&submit_effects);

    let (state, effects) = update(state, Msg::ResetClicked);
    assert_eq!(effects, vec![Effect::CancelPending]);
    let idle = state.clone();

    let (state, effects) = update(state, Msg::ProgressTick {
        attempt: old_attempt,
    });
    assert!(effects.is_empty());
    let (state, effects) = run_ingest(state, &submit_effects);
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::ProcessingElapsed {
        attempt: old_attempt,
    });
    assert!(effects.is_empty());
    assert_eq!(state, idle);

    // A new attempt never reuses the old id.
    let (_, effects) = update(state, Msg::FileSubmitted(csv_file("b.csv", "b\n2\n")));
    assert_ne!(attempt_of(&effects), old_attempt);
}

#[test]
fn reset_from_every_phase_yields_the_same_idle_view() {
    let idle = new_state();

    let (uploading, effects) = update(new_state(), Msg::FileSubmitted(csv_file("a.csv", "a\n1\n")));
    let attempt = attempt_of(&effects);
    let (with_table, _) = run_ingest(uploading.clone(), &effects);
    let (preview, _, _) = tick_until_done(with_table, attempt);
    let (processing, _) = update(preview.clone(), Msg::ConfirmClicked);
    let (completed, _) = update(processing.clone(), Msg::ProcessingElapsed { attempt });
    let (errored, _) = update(
        new_state(),
        Msg::FileSubmitted(RawFile::from_bytes("x.pdf", None, Vec::new())),
    );

    let states = [idle, uploading, preview, processing, completed, errored];
    let phases: Vec<Phase> = states.iter().map(AppState::phase).collect();
    assert_eq!(
        phases,
        vec![
            Phase::Idle,
            Phase::Uploading,
            Phase::Preview,
            Phase::Processing,
            Phase::Completed,
            Phase::Error,
        ]
    );

    let views: Vec<_> = states
        .into_iter()
        .map(|state| {
            let (once, _) = update(state, Msg::ResetClicked);
            let (twice, _) = update(once.clone(), Msg::ResetClicked);
            assert_eq!(once.view(), twice.view());
            once.view()
        })
        .collect();

    for view in &views {
        assert_eq!(view, &views[0]);
        assert_eq!(view.phase, Phase::Idle);
        assert!(view.file.is_none());
        assert!(view.headers.is_empty());
        assert_eq!(view.progress, 0);
        assert!(view.log.is_empty());
        assert!(view.artifact.is_none());
        assert!(view.can_select_file);
    }
}

#[test]
fn completed_state_refuses_new_files_until_reset() {
    let (state, effects) = update(new_state(), Msg::FileSubmitted(csv_file("a.csv", "a\n1\n")));
    let attempt = attempt_of(&effects);
    let (state, _) = run_ingest(state, &effects);
    let (state, _, _) = tick_until_done(state, attempt);
    let (state, _) = update(state, Msg::ConfirmClicked);
    let (state, _) = update(state, Msg::ProcessingElapsed { attempt });
    assert_eq!(state.phase(), Phase::Completed);

    let (state, effects) = update(state, Msg::FileSubmitted(csv_file("b.csv", "b\n2\n")));
    assert_eq!(state.phase(), Phase::Completed);
    assert_eq!(effects.len(), 1);

    let (state, _) = update(state, Msg::ResetClicked);
    let (state, _) = update(state, Msg::FileSubmitted(csv_file("b.csv", "b\n2\n")));
    assert_eq!(state.phase(), Phase::Uploading);
}
