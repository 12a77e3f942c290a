// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use jiff::Zoned;

/// The source of wall-clock time for timestamps and daily file names.
#[derive(Debug, Clone, Default)]
pub enum Clock {
    /// Read the system clock in the system time zone.
    #[default]
    DefaultClock,
    /// Always return a fixed time.
    ManualClock(ManualClock),
}

impl Clock {
    /// Create a manual clock pinned at `now`.
    pub fn manual(now: Zoned) -> Clock {
        Clock::ManualClock(ManualClock::new(now))
    }

    pub fn now(&self) -> Zoned {
        match self {
            Clock::DefaultClock => Zoned::now(),
            Clock::ManualClock(clock) => clock.now(),
        }
    }

    /// The `HH:MM:SS` stamp written into each record.
    pub fn time_of_day(&self) -> String {
        self.now().strftime("%H:%M:%S").to_string()
    }

    /// The `YYYY-MM-DD` date used by daily rotation.
    pub fn date(&self) -> String {
        self.now().strftime("%Y-%m-%d").to_string()
    }

    pub fn set_now(&mut self, new_time: Zoned) {
        if let Clock::ManualClock(clock) = self {
            clock.set_now(new_time);
        }
    }
}

/// The time could be reset.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Zoned,
}

impl ManualClock {
    pub fn new(now: Zoned) -> ManualClock {
        ManualClock { now }
    }

    fn now(&self) -> Zoned {
        self.now.clone()
    }

    pub fn set_now(&mut self, now: Zoned) {
        self.now = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_adjusting() {
        let now: Zoned = "2023-01-01T12:00:00[UTC]".parse().unwrap();
        let mut clock = Clock::manual(now.clone());
        assert_eq!(clock.now(), now);
        assert_eq!(clock.time_of_day(), "12:00:00");
        assert_eq!(clock.date(), "2023-01-01");

        let now: Zoned = "2024-02-29T07:08:09[UTC]".parse().unwrap();
        clock.set_now(now);
        assert_eq!(clock.time_of_day(), "07:08:09");
        assert_eq!(clock.date(), "2024-02-29");
    }
}
