#![allow(dead_code)]

use std::sync::Once;

use chrono::{DateTime, Local, TimeZone};
use intake_core::{update, AppState, AttemptId, Clock, Effect, Msg, Phase};
use intake_engine::{parse, RawFile};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn fixed_now() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2026, 3, 14, 9, 26, 53)
        .single()
        .expect("unambiguous local time")
}

pub fn new_state() -> AppState {
    AppState::new().with_clock(Clock::new(fixed_now))
}

pub fn csv_file(name: &str, body: &str) -> RawFile {
    RawFile::from_bytes(name, Some("text/csv"), body.as_bytes().to_vec())
}

pub fn attempt_of(effects: &[Effect]) -> AttemptId {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::StartIngest { attempt, .. } => Some(*attempt),
            _ => None,
        })
        .expect("start ingest effect")
}

/// Runs what the engine would do for a `StartIngest` effect.
pub fn run_ingest(state: AppState, effects: &[Effect]) -> (AppState, Vec<Effect>) {
    let (attempt, file, shape) = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::StartIngest {
                attempt,
                file,
                shape,
            } => Some((*attempt, file.clone(), *shape)),
            _ => None,
        })
        .expect("start ingest effect");
    let bytes = match &file.source {
        intake_engine::FileSource::Memory(bytes) => bytes.clone(),
        other => panic!("tests only use in-memory files, got {other:?}"),
    };
    update(
        state,
        Msg::IngestFinished {
            attempt,
            result: parse(&bytes, shape),
        },
    )
}

/// Ticks until progress leaves `Uploading`, returning every progress value seen.
pub fn tick_until_done(
    mut state: AppState,
    attempt: AttemptId,
) -> (AppState, Vec<u8>, Vec<Effect>) {
    let mut seen = Vec::new();
    let mut last_effects = Vec::new();
    for _ in 0..1000 {
        if state.phase() != Phase::Uploading || state.progress() >= 100 {
            break;
        }
        let (next, effects) = update(state, Msg::ProgressTick { attempt });
        state = next;
        seen.push(state.progress());
        last_effects = effects;
    }
    (state, seen, last_effects)
}
