//! Controllable time for pacing and rate limiting tests.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::PacingSleeper;

/// Clock that only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => {
                panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}")
            }
        };
        *self.lock_clock() += delta;
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Sleeper that records each pause without waiting.
#[derive(Default)]
pub struct RecordingSleeper(pub Mutex<Vec<Duration>>);

impl RecordingSleeper {
    pub fn pauses(&self) -> Vec<Duration> {
        match self.0.lock() {
            Ok(entries) => entries.clone(),
            Err(_) => panic!("sleeper mutex"),
        }
    }
}

#[async_trait]
impl PacingSleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        match self.0.lock() {
            Ok(mut entries) => entries.push(duration),
            Err(_) => panic!("sleeper mutex"),
        }
    }
}

/// Sleeper that moves a [`MutableClock`] forward instead of waiting.
pub struct ClockAdvancingSleeper {
    clock: Arc<MutableClock>,
    recorded: RecordingSleeper,
}

impl ClockAdvancingSleeper {
    pub fn new(clock: Arc<MutableClock>) -> Self {
        Self {
            clock,
            recorded: RecordingSleeper::default(),
        }
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.recorded.pauses()
    }
}

#[async_trait]
impl PacingSleeper for ClockAdvancingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.clock.advance(duration);
        self.recorded.sleep(duration).await;
    }
}
