// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Time related utils.

use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::format::Item;
use chrono::format::Numeric;
use chrono::format::Pad;
use chrono::Utc;

/// DateTime is the alias for chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// DATE is a time format like `20220301`
const DATE: &[Item<'static>] = &[
    Item::Numeric(Numeric::Year, Pad::Zero),
    Item::Numeric(Numeric::Month, Pad::Zero),
    Item::Numeric(Numeric::Day, Pad::Zero),
];

/// Format time into date: `20220301`
pub fn format_date(t: DateTime) -> String {
    t.format_with_items(DATE.iter()).to_string()
}

/// ISO8601 is a time format like `20220313T072004Z`.
const ISO8601: &[Item<'static>] = &[
    Item::Numeric(Numeric::Year, Pad::Zero),
    Item::Numeric(Numeric::Month, Pad::Zero),
    Item::Numeric(Numeric::Day, Pad::Zero),
    Item::Literal("T"),
    Item::Numeric(Numeric::Hour, Pad::Zero),
    Item::Numeric(Numeric::Minute, Pad::Zero),
    Item::Numeric(Numeric::Second, Pad::Zero),
    Item::Literal("Z"),
];

/// Format time into ISO8601: `20220313T072004Z`
pub fn format_iso8601(t: DateTime) -> String {
    t.format_with_items(ISO8601.iter()).to_string()
}

/// Add a std duration to a datetime, saturating instead of overflowing.
pub fn add_duration(t: DateTime, d: Duration) -> DateTime {
    chrono::TimeDelta::from_std(d)
        .ok()
        .and_then(|delta| t.checked_add_signed(delta))
        .unwrap_or(DateTime::MAX_UTC)
}

/// Subtract a std duration from a datetime, saturating instead of overflowing.
pub fn sub_duration(t: DateTime, d: Duration) -> DateTime {
    chrono::TimeDelta::from_std(d)
        .ok()
        .and_then(|delta| t.checked_sub_signed(delta))
        .unwrap_or(DateTime::MIN_UTC)
}

/// Clock is the source of "now" for signing and token expiry.
///
/// Providers never read the system clock directly, so tests can pin or
/// advance time deterministically.
pub trait Clock: Debug + Send + Sync + 'static {
    /// Current instant in UTC.
    fn now(&self) -> DateTime;
}

/// SystemClock reads the wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime {
        now()
    }
}

/// FixedClock returns a settable instant.
///
/// Clones share the same instant, so a test can keep one handle and
/// advance the clock seen by a provider.
#[derive(Debug, Clone)]
pub struct FixedClock {
    time: Arc<Mutex<DateTime>>,
}

impl FixedClock {
    /// Create a clock pinned at `time`.
    pub fn new(time: DateTime) -> Self {
        Self {
            time: Arc::new(Mutex::new(time)),
        }
    }

    /// Pin the clock at `time`.
    pub fn set(&self, time: DateTime) {
        *self.time.lock().expect("lock poisoned") = time;
    }

    /// Move the clock forward.
    pub fn advance(&self, d: Duration) {
        let mut time = self.time.lock().expect("lock poisoned");
        *time = add_duration(*time, d);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime {
        *self.time.lock().expect("lock poisoned")
    }
}
