//! The countdown engine task.
//!
//! One task per process drives the [`Countdown`] state machine: a 1-second
//! interval recomputes the display state, and the store's watch channel
//! replaces the record whole whenever a write lands. Reaching EXPIRED drops
//! the interval exactly once; a replacement record with a future end date
//! re-creates it. All mutation happens inside this single task, so the two
//! event sources can never interleave mid-update.

use chrono::Utc;
use tokio::{
  sync::watch,
  time::{Duration, Interval, interval},
};
use vigil_core::{
  countdown::{Countdown, DisplayState},
  record::DeadlineRecord,
};

/// Spawn the engine over a record subscription. The returned receiver always
/// holds the most recent [`DisplayState`]; it updates once per second while
/// counting and goes quiet after expiry until the record is replaced.
pub fn spawn(
  mut records: watch::Receiver<Option<DeadlineRecord>>,
) -> watch::Receiver<DisplayState> {
  let now = Utc::now();
  let record = records
    .borrow_and_update()
    .clone()
    .unwrap_or_else(|| DeadlineRecord::fallback(now));

  let mut countdown = Countdown::new(record, now);
  let (tx, rx) = watch::channel(countdown.tick(now));

  tokio::spawn(async move {
    let mut ticker = new_ticker(&countdown);

    loop {
      tokio::select! {
        changed = records.changed() => {
          // The sender is gone: the store was dropped, tear down.
          if changed.is_err() {
            break;
          }
          let now = Utc::now();
          let record = records
            .borrow_and_update()
            .clone()
            .unwrap_or_else(|| DeadlineRecord::fallback(now));
          countdown.replace_record(record, now);
          ticker = new_ticker(&countdown);
          tracing::info!(
            name = %countdown.record().display_name(),
            phase = ?countdown.phase(),
            "deadline record replaced"
          );
          tx.send_replace(countdown.tick(now));
        }
        () = tick(&mut ticker) => {
          let was_counting = !countdown.is_expired();
          let state = countdown.tick(Utc::now());
          if state.expired && was_counting {
            tracing::info!("countdown expired, timer stopped");
            ticker = None;
          }
          tx.send_replace(state);
        }
      }
    }
  });

  rx
}

fn new_ticker(countdown: &Countdown) -> Option<Interval> {
  if countdown.is_expired() { None } else { Some(interval(Duration::from_secs(1))) }
}

/// Await the next tick, or forever when the timer has been cancelled.
async fn tick(ticker: &mut Option<Interval>) {
  match ticker {
    Some(interval) => {
      interval.tick().await;
    }
    None => std::future::pending().await,
  }
}
