//! The countdown engine — pure display-state computation and the
//! COUNTING→EXPIRED state machine.
//!
//! [`compute_display_state`] never touches presentation; callers render the
//! returned [`DisplayState`]. The [`Countdown`] wrapper owns the one-way
//! expiry transition so a driving timer can observe it and stop.

use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::record::DeadlineRecord;

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_DAY: i64 = 86_400;

// ─── Time parts ──────────────────────────────────────────────────────────────

/// Fixed-radix decomposition of a non-negative remaining duration.
///
/// Invariant: `days*86400 + hours*3600 + minutes*60 + seconds` reconstructs
/// the whole-second remaining time, with `hours < 24`, `minutes < 60`,
/// `seconds < 60`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeParts {
  pub days:    i64,
  pub hours:   i64,
  pub minutes: i64,
  pub seconds: i64,
}

impl TimeParts {
  /// Decompose `total` whole seconds; negative input is treated as zero.
  pub fn from_seconds(total: i64) -> Self {
    let total = total.max(0);
    Self {
      days:    total / SECS_PER_DAY,
      hours:   (total % SECS_PER_DAY) / SECS_PER_HOUR,
      minutes: (total % SECS_PER_HOUR) / SECS_PER_MINUTE,
      seconds: total % SECS_PER_MINUTE,
    }
  }

  pub fn total_seconds(&self) -> i64 {
    self.days * SECS_PER_DAY
      + self.hours * SECS_PER_HOUR
      + self.minutes * SECS_PER_MINUTE
      + self.seconds
  }
}

// Rendered as two-digit zero-padded strings, the form the pages display.
impl Serialize for TimeParts {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut s = serializer.serialize_struct("TimeParts", 4)?;
    s.serialize_field("days", &format!("{:02}", self.days))?;
    s.serialize_field("hours", &format!("{:02}", self.hours))?;
    s.serialize_field("minutes", &format!("{:02}", self.minutes))?;
    s.serialize_field("seconds", &format!("{:02}", self.seconds))?;
    s.end()
  }
}

// ─── Urgency ─────────────────────────────────────────────────────────────────

/// Tri-state classification of remaining time. Comparisons are strict, so
/// exactly 24h is `Warning` and exactly 2h is `Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
  Normal,
  Warning,
  Critical,
}

impl Urgency {
  pub fn from_remaining(remaining: Duration) -> Self {
    if remaining > Duration::hours(24) {
      Self::Normal
    } else if remaining > Duration::hours(2) {
      Self::Warning
    } else {
      Self::Critical
    }
  }
}

/// Cosmetic pulse intensity. Independent thresholds from [`Urgency`]; it
/// never feeds back into the computed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PulseLevel {
  Steady,
  Warning,
  Urgent,
}

impl PulseLevel {
  pub fn from_remaining(remaining: Duration) -> Self {
    if remaining < Duration::hours(1) {
      Self::Urgent
    } else if remaining < Duration::hours(6) {
      Self::Warning
    } else {
      Self::Steady
    }
  }
}

// ─── Display state ───────────────────────────────────────────────────────────

/// Everything a countdown page needs for one frame — computed, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayState {
  /// Whole seconds until the deadline, clamped at zero.
  pub remaining_seconds:  i64,
  pub time_parts:         TimeParts,
  /// Percentage of the start→end window already elapsed, in `[0, 100]`.
  pub elapsed_percentage: f64,
  /// Full start→end span in hours, rounded up.
  pub total_hours:        i64,
  pub urgency:            Urgency,
  pub pulse:              PulseLevel,
  pub expired:            bool,
}

/// Compute the display state for `record` at instant `now`.
pub fn compute_display_state(
  now: DateTime<Utc>,
  record: &DeadlineRecord,
) -> DisplayState {
  let remaining = (record.end_date - now).max(Duration::zero());
  let total = record.end_date - record.start_date;

  // A zero-length (or inverted) window is degenerate input: fully elapsed.
  let elapsed_percentage = if total <= Duration::zero() {
    100.0
  } else {
    let elapsed = (now - record.start_date).num_milliseconds() as f64;
    (100.0 * elapsed / total.num_milliseconds() as f64).clamp(0.0, 100.0)
  };

  let total_hours = {
    let ms = total.num_milliseconds().max(0);
    ms / (SECS_PER_HOUR * 1000) + i64::from(ms % (SECS_PER_HOUR * 1000) != 0)
  };

  DisplayState {
    remaining_seconds: remaining.num_seconds(),
    time_parts: TimeParts::from_seconds(remaining.num_seconds()),
    elapsed_percentage,
    total_hours,
    urgency: Urgency::from_remaining(remaining),
    pulse: PulseLevel::from_remaining(remaining),
    expired: now >= record.end_date,
  }
}

// ─── State machine ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
  Counting,
  Expired,
}

/// The countdown state machine: `Counting` until a tick observes
/// `remaining <= 0`, then terminally `Expired`. The only way back to
/// `Counting` is [`Countdown::replace_record`] with a future end date —
/// re-initialization, not recovery.
#[derive(Debug, Clone)]
pub struct Countdown {
  record: DeadlineRecord,
  phase:  Phase,
}

impl Countdown {
  pub fn new(record: DeadlineRecord, now: DateTime<Utc>) -> Self {
    let phase = if now >= record.end_date { Phase::Expired } else { Phase::Counting };
    Self { record, phase }
  }

  pub fn record(&self) -> &DeadlineRecord { &self.record }

  pub fn phase(&self) -> Phase { self.phase }

  pub fn is_expired(&self) -> bool { self.phase == Phase::Expired }

  /// Replace the whole record in one step (the subscription push). The phase
  /// is re-derived from the new record, so a future end date resumes
  /// counting.
  pub fn replace_record(&mut self, record: DeadlineRecord, now: DateTime<Utc>) {
    *self = Self::new(record, now);
  }

  /// One timer tick. Expiry is observed at most once; ticking an already
  /// expired countdown returns the identical terminal state.
  pub fn tick(&mut self, now: DateTime<Utc>) -> DisplayState {
    // Terminal: pin the clock at the end date so the zeroed state is stable
    // even if the caller's clock steps backwards.
    let effective_now =
      if self.phase == Phase::Expired { now.max(self.record.end_date) } else { now };

    let state = compute_display_state(effective_now, &self.record);
    if state.expired {
      self.phase = Phase::Expired;
    }
    state
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};

  use super::*;
  use crate::record::DeadlineRecord;

  fn record(start: DateTime<Utc>, end: DateTime<Utc>) -> DeadlineRecord {
    DeadlineRecord {
      name:        "test".into(),
      description: String::new(),
      start_date:  start,
      end_date:    end,
      is_active:   true,
      created_at:  None,
      updated_at:  None,
    }
  }

  fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
  }

  // ── Time parts ────────────────────────────────────────────────────────────

  #[test]
  fn time_parts_reconstruct_remaining() {
    for total in [0, 1, 59, 60, 61, 3_599, 3_600, 86_399, 86_400, 1_234_567] {
      let parts = TimeParts::from_seconds(total);
      assert_eq!(parts.total_seconds(), total, "total={total}");
      assert!((0..24).contains(&parts.hours), "total={total}");
      assert!((0..60).contains(&parts.minutes), "total={total}");
      assert!((0..60).contains(&parts.seconds), "total={total}");
    }
  }

  #[test]
  fn time_parts_negative_clamps_to_zero() {
    assert_eq!(TimeParts::from_seconds(-5), TimeParts::from_seconds(0));
  }

  #[test]
  fn time_parts_serialize_zero_padded() {
    let json = serde_json::to_value(TimeParts::from_seconds(7)).unwrap();
    assert_eq!(json["days"], "00");
    assert_eq!(json["seconds"], "07");
  }

  // ── Urgency boundaries ────────────────────────────────────────────────────

  #[test]
  fn urgency_buckets_are_strict() {
    assert_eq!(Urgency::from_remaining(Duration::hours(25)), Urgency::Normal);
    assert_eq!(Urgency::from_remaining(Duration::hours(24)), Urgency::Warning);
    assert_eq!(Urgency::from_remaining(Duration::hours(3)), Urgency::Warning);
    assert_eq!(Urgency::from_remaining(Duration::hours(2)), Urgency::Critical);
    assert_eq!(
      Urgency::from_remaining(Duration::minutes(90)),
      Urgency::Critical
    );
    assert_eq!(Urgency::from_remaining(Duration::zero()), Urgency::Critical);
  }

  #[test]
  fn pulse_is_an_independent_predicate() {
    // At 7h remaining urgency is already Warning but the pulse is not.
    assert_eq!(PulseLevel::from_remaining(Duration::hours(7)), PulseLevel::Steady);
    assert_eq!(Urgency::from_remaining(Duration::hours(7)), Urgency::Warning);
    assert_eq!(
      PulseLevel::from_remaining(Duration::minutes(59)),
      PulseLevel::Urgent
    );
  }

  // ── Display state ─────────────────────────────────────────────────────────

  #[test]
  fn twenty_five_hour_window_is_normal_and_barely_elapsed() {
    let now = t0();
    let state = compute_display_state(now, &record(now, now + Duration::hours(25)));
    assert_eq!(state.urgency, Urgency::Normal);
    assert!(state.elapsed_percentage < 0.001);
    assert!(!state.expired);
    assert_eq!(state.total_hours, 25);
  }

  #[test]
  fn thirty_minutes_left_is_critical_with_exact_parts() {
    let now = t0();
    let rec = record(now - Duration::hours(1), now + Duration::minutes(30));
    let state = compute_display_state(now, &rec);
    assert_eq!(state.urgency, Urgency::Critical);
    assert_eq!(
      state.time_parts,
      TimeParts { days: 0, hours: 0, minutes: 30, seconds: 0 }
    );
  }

  #[test]
  fn elapsed_percentage_is_clamped() {
    let now = t0();
    let rec = record(now + Duration::hours(1), now + Duration::hours(2));
    // Before the window opens.
    assert_eq!(compute_display_state(now, &rec).elapsed_percentage, 0.0);
    // Long after it closed.
    let late = now + Duration::hours(10);
    assert_eq!(compute_display_state(late, &rec).elapsed_percentage, 100.0);
  }

  #[test]
  fn zero_length_window_is_fully_elapsed_not_a_division() {
    let now = t0();
    let state = compute_display_state(now, &record(now, now));
    assert_eq!(state.elapsed_percentage, 100.0);
    assert!(state.expired);
  }

  #[test]
  fn remaining_monotone_and_elapsed_monotone_as_now_advances() {
    let start = t0();
    let rec = record(start, start + Duration::hours(48));
    let mut prev_remaining = i64::MAX;
    let mut prev_elapsed = -1.0;
    for minutes in (0..48 * 60).step_by(37) {
      let state = compute_display_state(start + Duration::minutes(minutes), &rec);
      assert!(state.remaining_seconds <= prev_remaining);
      assert!(state.elapsed_percentage >= prev_elapsed);
      prev_remaining = state.remaining_seconds;
      prev_elapsed = state.elapsed_percentage;
    }
  }

  #[test]
  fn remaining_exactly_zero_is_expired() {
    let now = t0();
    let state = compute_display_state(now, &record(now - Duration::hours(1), now));
    assert_eq!(state.remaining_seconds, 0);
    assert!(state.expired);
  }

  // ── State machine ─────────────────────────────────────────────────────────

  #[test]
  fn counting_transitions_to_expired_once() {
    let start = t0();
    let mut cd = Countdown::new(record(start, start + Duration::seconds(1)), start);
    assert_eq!(cd.phase(), Phase::Counting);

    let before = cd.tick(start);
    assert!(!before.expired);
    assert_eq!(cd.phase(), Phase::Counting);

    let after = cd.tick(start + Duration::seconds(2));
    assert!(after.expired);
    assert_eq!(cd.phase(), Phase::Expired);
  }

  #[test]
  fn expiry_is_idempotent() {
    let start = t0();
    let mut cd = Countdown::new(record(start, start + Duration::seconds(1)), start);
    let first = cd.tick(start + Duration::seconds(5));
    let second = cd.tick(start + Duration::seconds(6));
    assert_eq!(first, second);
    assert_eq!(cd.phase(), Phase::Expired);
  }

  #[test]
  fn expired_state_is_stable_against_clock_regression() {
    let start = t0();
    let mut cd = Countdown::new(record(start, start + Duration::seconds(1)), start);
    cd.tick(start + Duration::seconds(5));
    // Clock steps back before the end date; the countdown stays terminal.
    let state = cd.tick(start);
    assert!(state.expired);
    assert_eq!(state.remaining_seconds, 0);
  }

  #[test]
  fn replace_record_with_future_end_resumes_counting() {
    let start = t0();
    let mut cd = Countdown::new(record(start, start + Duration::seconds(1)), start);
    cd.tick(start + Duration::seconds(5));
    assert!(cd.is_expired());

    let now = start + Duration::seconds(10);
    cd.replace_record(record(now, now + Duration::hours(1)), now);
    assert_eq!(cd.phase(), Phase::Counting);
    assert!(!cd.tick(now).expired);
  }

  #[test]
  fn replace_record_with_past_end_is_immediately_expired() {
    let start = t0();
    let mut cd = Countdown::new(record(start, start + Duration::hours(1)), start);
    cd.replace_record(record(start, start + Duration::seconds(1)), start + Duration::hours(2));
    assert!(cd.is_expired());
  }
}
