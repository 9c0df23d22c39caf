// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Time source used by token issuance, validation and the in-memory store.
//!
//! Nothing in the auth path reads the wall clock directly. Production code
//! uses [`SystemClock`]; tests pin time with [`FixedClock`] so expiry can be
//! exercised without waiting.

use chrono::{DateTime, Duration, TimeZone, Utc};

/// Supplies the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// Returns a new clock frozen `by` later than this one, saturating at the
    /// representable range.
    pub fn advanced_by(self, by: Duration) -> Self {
        Self(self.0.checked_add_signed(by).unwrap_or(if by < Duration::zero() {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        }))
    }
}

impl Default for FixedClock {
    /// 2022-08-23T23:59:59Z
    fn default() -> Self {
        Self(
            Utc.with_ymd_and_hms(2022, 8, 23, 23, 59, 59)
                .single()
                .unwrap_or_default(),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_always_returns_same_instant() {
        let clock = FixedClock::default();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().to_rfc3339(), "2022-08-23T23:59:59+00:00");
    }

    #[test]
    fn advanced_by_moves_forward_without_mutating_original() {
        let base = FixedClock::default();
        let later = base.advanced_by(Duration::minutes(31));
        assert_eq!(later.now() - base.now(), Duration::minutes(31));
        assert_eq!(base, FixedClock::default());
    }

    #[test]
    fn advanced_by_saturates_instead_of_overflowing() {
        let base = FixedClock::default();
        assert_eq!(base.advanced_by(Duration::MAX).now(), DateTime::<Utc>::MAX_UTC);
        assert_eq!(base.advanced_by(Duration::MIN).now(), DateTime::<Utc>::MIN_UTC);
        assert_eq!(
            FixedClock::at(DateTime::<Utc>::MAX_UTC)
                .advanced_by(Duration::seconds(1))
                .now(),
            DateTime::<Utc>::MAX_UTC
        );
    }

    #[test]
    fn system_clock_is_close_to_now() {
        let before = Utc::now();
        let now = SystemClock.now();
        assert!(now >= before);
    }
}
