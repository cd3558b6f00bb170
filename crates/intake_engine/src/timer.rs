use std::time::Duration;

use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{AttemptId, EngineEvent, EventSink};

/// Emit `ProgressTick` every `period` until `token` is cancelled.
///
/// The first tick fires one period after start, never immediately.
pub async fn run_progress_ticker(
    attempt: AttemptId,
    period: Duration,
    token: CancellationToken,
    sink: &dyn EventSink,
) {
    let mut ticks = interval_at(Instant::now() + period, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => return,
            _ = ticks.tick() => sink.emit(EngineEvent::ProgressTick { attempt }),
        }
    }
}

/// Emit a single `ProcessingElapsed` after `delay` unless cancelled first.
pub async fn run_processing_delay(
    attempt: AttemptId,
    delay: Duration,
    token: CancellationToken,
    sink: &dyn EventSink,
) {
    tokio::select! {
        biased;
        _ = token.cancelled() => {}
        _ = sleep(delay) => sink.emit(EngineEvent::ProcessingElapsed { attempt }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use tokio_util::sync::CancellationToken;

    use super::{run_processing_delay, run_progress_ticker};
    use crate::{EngineEvent, EventSink};

    #[derive(Default, Clone)]
    struct TestSink {
        events: Arc<Mutex<Vec<EngineEvent>>>,
    }

    impl TestSink {
        fn take(&self) -> Vec<EngineEvent> {
            self.events.lock().unwrap().drain(..).collect()
        }
    }

    impl EventSink for TestSink {
        fn emit(&self, event: EngineEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_fires_each_period_until_cancelled() {
        let sink = TestSink::default();
        let token = CancellationToken::new();
        let task = {
            let sink = sink.clone();
            let token = token.clone();
            tokio::spawn(async move {
                run_progress_ticker(7, Duration::from_millis(200), token, &sink).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(650)).await;
        assert_eq!(
            sink.take(),
            vec![EngineEvent::ProgressTick { attempt: 7 }; 3]
        );

        token.cancel();
        task.await.unwrap();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(sink.take().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn delay_fires_once() {
        let sink = TestSink::default();
        run_processing_delay(3, Duration::from_secs(2), CancellationToken::new(), &sink).await;
        assert_eq!(sink.take(), vec![EngineEvent::ProcessingElapsed { attempt: 3 }]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_delay_never_fires() {
        let sink = TestSink::default();
        let token = CancellationToken::new();
        let task = {
            let sink = sink.clone();
            let token = token.clone();
            tokio::spawn(async move {
                run_processing_delay(3, Duration::from_secs(2), token, &sink).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(500)).await;
        token.cancel();
        task.await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(sink.take().is_empty());
    }
}
