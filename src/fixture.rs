// src/fixture.rs
//! iCalendar fixture feed: a streaming line scan over VEVENT blocks that
//! yields the next scheduled match. Only DTSTART, SUMMARY, and LOCATION are
//! interpreted; everything else in the feed is ignored.

use chrono::{DateTime, Duration, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// A scheduled match record.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MatchFixture {
    pub opponent: String,
    pub kickoff: DateTime<Utc>,
    pub venue: String,
    pub is_home: bool,
}

/// Outcome of next-match selection. `NoneScheduled` is a valid result, kept
/// distinct from a fetch/parse failure (which surfaces as an error upstream).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureOutcome {
    Upcoming(MatchFixture),
    NoneScheduled,
}

/// Team-name separator inside SUMMARY: "-", an en-dash, or a lone "v",
/// each surrounded by whitespace.
static RE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+[-\u{2013}v]\s+").expect("summary separator regex"));

#[derive(Default)]
struct PartialEvent {
    kickoff: Option<DateTime<Utc>>,
    teams: Option<(String, bool)>,
    venue: Option<String>,
}

/// Parse an iCalendar body into eligible fixtures, sorted ascending by
/// kickoff. An event stays eligible while kickoff + 2h is in the future, so
/// a match in progress still counts.
pub fn parse_calendar(ics: &str, home_club: &str, now: DateTime<Utc>) -> Vec<MatchFixture> {
    let mut fixtures = Vec::new();
    let mut current: Option<PartialEvent> = None;

    for line in ics.split(['\r', '\n']) {
        if line.starts_with("BEGIN:VEVENT") {
            current = Some(PartialEvent::default());
            continue;
        }
        if line.starts_with("END:VEVENT") {
            if let Some(event) = current.take() {
                if let (Some(kickoff), Some((opponent, is_home))) = (event.kickoff, event.teams) {
                    if kickoff + Duration::hours(2) > now {
                        fixtures.push(MatchFixture {
                            opponent,
                            kickoff,
                            venue: event.venue.unwrap_or_default(),
                            is_home,
                        });
                    }
                }
            }
            continue;
        }
        let Some(event) = current.as_mut() else {
            continue;
        };

        if line.starts_with("DTSTART") {
            // Covers both DTSTART:... and DTSTART;VALUE=DATE:...
            event.kickoff = line
                .split_once(':')
                .and_then(|(_, value)| parse_compact_datetime(value.trim()));
        } else if let Some(summary) = line.strip_prefix("SUMMARY:") {
            event.teams = Some(split_fixture_summary(summary, home_club));
        } else if let Some(location) = line.strip_prefix("LOCATION:") {
            event.venue = Some(location.replace("\\,", ",").trim().to_string());
        }
    }

    fixtures.sort_by_key(|f| f.kickoff);
    fixtures
}

/// Select the earliest eligible fixture.
pub fn next_fixture(ics: &str, home_club: &str, now: DateTime<Utc>) -> FixtureOutcome {
    match parse_calendar(ics, home_club, now).into_iter().next() {
        Some(fixture) => FixtureOutcome::Upcoming(fixture),
        None => FixtureOutcome::NoneScheduled,
    }
}

/// Parse the compact iCalendar form `YYYYMMDD[THHmmss][Z]`. Date-only
/// values default to midnight UTC.
fn parse_compact_datetime(value: &str) -> Option<DateTime<Utc>> {
    let year: i32 = value.get(0..4)?.parse().ok()?;
    let month: u32 = value.get(4..6)?.parse().ok()?;
    let day: u32 = value.get(6..8)?.parse().ok()?;

    let (hour, minute, second) = if value.get(8..9) == Some("T") {
        let hour: u32 = value.get(9..11)?.parse().ok()?;
        let minute: u32 = value.get(11..13)?.parse().ok()?;
        let second: u32 = value
            .get(13..15)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        (hour, minute, second)
    } else {
        (0, 0, 0)
    };

    Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
}

/// Recover (opponent, is_home) from a SUMMARY line. The side matching the
/// home club decides home status; a summary without the club name is treated
/// as the opponent alone, defaulting to a home fixture.
fn split_fixture_summary(summary: &str, home_club: &str) -> (String, bool) {
    let summary = summary.trim();
    if !summary.contains(home_club) {
        return (summary.to_string(), true);
    }

    let parts: Vec<&str> = RE_SEPARATOR.split(summary).collect();
    let first = parts.first().map(|p| p.trim()).unwrap_or_default();
    if first == home_club {
        let opponent = parts
            .get(1)
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .unwrap_or("TBD");
        (opponent.to_string(), true)
    } else {
        let opponent = if first.is_empty() { "TBD" } else { first };
        (opponent.to_string(), false)
    }
}
