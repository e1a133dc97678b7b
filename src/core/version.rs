//! Version-code derivation: a sortable `YYMMDDNN` integer
//!
//! The code encodes the release date plus a two-digit same-day sequence.
//! The sequence starts at 01, increments only when the previous release
//! carries today's date, and resets to 01 on a new date. Feeding the
//! function its own prior output on the same day never decreases it.

use crate::core::error::{PackError, PackResult};
use chrono::{Datelike, NaiveDate};

/// Highest same-day sequence number; release 100 on one day is an error
const SEQ_MAX: u64 = 99;

/// Compute the next version code for a release on `today`.
///
/// `previous` is the version code of the last release, if any. The result
/// is `YYMMDD * 100 + NN` where `NN` continues the same-day sequence or
/// restarts at 01 for a new date.
///
/// # Errors
///
/// Returns an error when the same-day sequence would exceed 99. That limit
/// is part of the code's shape; it is never widened or wrapped silently.
pub fn compute(today: NaiveDate, previous: Option<u64>) -> PackResult<u64> {
  let today_part = date_part(today);

  let sequence = match previous {
    Some(prev) if prev / 100 == today_part => prev % 100 + 1,
    _ => 1,
  };

  if sequence > SEQ_MAX {
    return Err(PackError::with_help(
      format!("Version-code sequence exhausted for {}: {} releases already made today", today, SEQ_MAX),
      "Wait for the next calendar day before releasing again.",
    ));
  }

  Ok(today_part * 100 + sequence)
}

/// The `YYMMDD` integer for a date (two-digit year)
fn date_part(date: NaiveDate) -> u64 {
  let yy = u64::from(date.year_ce().1) % 100;
  yy * 10_000 + u64::from(date.month()) * 100 + u64::from(date.day())
}
