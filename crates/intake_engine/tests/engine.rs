use std::sync::{mpsc, Arc};
use std::time::Duration;

use intake_engine::{
    ChannelEventSink, EngineConfig, EngineEvent, EngineHandle, IngestError, RawFile, TableShape,
    TimerSettings,
};

const WAIT: Duration = Duration::from_secs(5);

fn engine(timers: TimerSettings) -> (EngineHandle, mpsc::Receiver<EngineEvent>) {
    let (tx, rx) = mpsc::channel();
    let config = EngineConfig {
        timers,
        ..EngineConfig::default()
    };
    (EngineHandle::new(config, Arc::new(ChannelEventSink::new(tx))), rx)
}

fn fast_timers() -> TimerSettings {
    TimerSettings {
        progress_interval: Duration::from_millis(5),
        processing_delay: Duration::from_millis(5),
    }
}

#[test]
fn ingest_reports_parsed_table() {
    let (engine, events) = engine(fast_timers());
    engine.ingest(
        1,
        RawFile::from_bytes("data.csv", Some("text/csv"), b"a,b\n1,2\n".to_vec()),
        TableShape::Positional,
    );

    match events.recv_timeout(WAIT).expect("ingest event") {
        EngineEvent::Ingested { attempt, result } => {
            assert_eq!(attempt, 1);
            let table = result.expect("parsed");
            assert_eq!(table.headers, vec!["a", "b"]);
            assert_eq!(table.row_count(), 1);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn ingest_reports_read_failure_for_missing_path() {
    let (engine, events) = engine(fast_timers());
    let mut file = RawFile::from_bytes("gone.csv", None, Vec::new());
    file.source = intake_engine::FileSource::Path("/no/such/dir/gone.csv".into());
    engine.ingest(9, file, TableShape::Keyed);

    match events.recv_timeout(WAIT).expect("ingest event") {
        EngineEvent::Ingested { attempt, result } => {
            assert_eq!(attempt, 9);
            assert!(matches!(result, Err(IngestError::ReadFailure { .. })));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn stopped_progress_goes_quiet() {
    let (engine, events) = engine(fast_timers());
    engine.start_progress(4);
    assert_eq!(
        events.recv_timeout(WAIT).unwrap(),
        EngineEvent::ProgressTick { attempt: 4 }
    );

    engine.stop_progress();
    // Drain ticks that raced the stop command.
    std::thread::sleep(Duration::from_millis(50));
    while events.try_recv().is_ok() {}
    std::thread::sleep(Duration::from_millis(50));
    assert!(events.try_recv().is_err());
}

#[test]
fn cancel_all_drops_pending_processing() {
    let (engine, events) = engine(TimerSettings {
        progress_interval: Duration::from_secs(60),
        processing_delay: Duration::from_millis(200),
    });
    engine.start_processing(2);
    engine.cancel_all();
    assert!(events.recv_timeout(Duration::from_millis(500)).is_err());
}

#[test]
fn processing_delay_elapses_once() {
    let (engine, events) = engine(fast_timers());
    engine.start_processing(3);
    assert_eq!(
        events.recv_timeout(WAIT).unwrap(),
        EngineEvent::ProcessingElapsed { attempt: 3 }
    );
    assert!(events.recv_timeout(Duration::from_millis(100)).is_err());
}
