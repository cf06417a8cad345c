//! Community leaderboard builder
//!
//! Pure, single-pass derivation of two rankings over a community's events:
//! "top attendees" (distinct events attended) and "attendance streak"
//! (consecutive most-recent events attended, broken on first miss). The
//! builder holds no state, reads no clock, and never errors; malformed or
//! missing input collections degrade to empty results.
//!
//! Output order is fully determined by the sort keys - count/streak
//! descending, case-insensitive name ascending, user id as the final total
//! order - so identical inputs produce bit-identical output regardless of
//! hash-map iteration order.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::entities::{Event, MemberProfile, Registration};
use crate::value_objects::Snowflake;

/// Truncation limits for the two rankings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardLimits {
    pub max_top_entries: usize,
    pub max_streak_entries: usize,
}

impl LeaderboardLimits {
    /// Default number of entries per ranking
    pub const DEFAULT_ENTRIES: usize = 10;

    pub fn new(max_top_entries: usize, max_streak_entries: usize) -> Self {
        Self {
            max_top_entries,
            max_streak_entries,
        }
    }
}

impl Default for LeaderboardLimits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ENTRIES, Self::DEFAULT_ENTRIES)
    }
}

/// A member ranked by total distinct events attended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedAttendee {
    pub user_id: Snowflake,
    pub name: Option<String>,
    pub image_url: String,
    /// 1-based position within the truncated list, no gaps
    pub rank: u32,
    pub total_events_attended: u32,
}

/// A member ranked by consecutive most-recent events attended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedStreak {
    pub user_id: Snowflake,
    pub name: Option<String>,
    pub image_url: String,
    pub rank: u32,
    pub streak: u32,
}

/// Immutable leaderboard snapshot, recomputed from scratch on every build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    pub top_attendees: Vec<RankedAttendee>,
    pub attendance_streak: Vec<RankedStreak>,
}

/// Build the community leaderboard
///
/// `events` is one community's event list; `registrations_by_event` maps
/// event id to that event's registrations (a missing entry means no
/// registrations); `members` is the current roster. `now` bounds which
/// events count toward streaks - it is supplied by the caller, never read
/// from a system clock.
pub fn build(
    events: &[Event],
    registrations_by_event: &HashMap<Snowflake, Vec<Registration>>,
    members: &[MemberProfile],
    now: DateTime<Utc>,
    limits: LeaderboardLimits,
) -> Leaderboard {
    // No events or no roster: neither ranking is meaningful.
    if events.is_empty() || members.is_empty() {
        return Leaderboard::default();
    }

    let roster: HashMap<Snowflake, &MemberProfile> =
        members.iter().map(|m| (m.id, m)).collect();

    // Per event, the set of eligible attendee ids: non-rejected, checked-in,
    // and currently on the roster. Shared by both rankings. The set also
    // collapses duplicate registrations for the same event.
    let mut eligible_by_event: HashMap<Snowflake, HashSet<Snowflake>> =
        HashMap::with_capacity(events.len());
    for event in events {
        let mut attendees = HashSet::new();
        if let Some(registrations) = registrations_by_event.get(&event.id) {
            for registration in registrations {
                if registration.has_attended() && roster.contains_key(&registration.user_id) {
                    attendees.insert(registration.user_id);
                }
            }
        }
        eligible_by_event.insert(event.id, attendees);
    }

    let top_attendees = rank_top_attendees(events, &eligible_by_event, members, limits);
    let attendance_streak =
        rank_attendance_streaks(events, &eligible_by_event, members, now, limits);

    Leaderboard {
        top_attendees,
        attendance_streak,
    }
}

fn rank_top_attendees(
    events: &[Event],
    eligible_by_event: &HashMap<Snowflake, HashSet<Snowflake>>,
    members: &[MemberProfile],
    limits: LeaderboardLimits,
) -> Vec<RankedAttendee> {
    let mut totals: HashMap<Snowflake, u32> = HashMap::new();
    for event in events {
        if let Some(attendees) = eligible_by_event.get(&event.id) {
            for user_id in attendees {
                *totals.entry(*user_id).or_insert(0) += 1;
            }
        }
    }

    // Members with zero attended events never appear.
    let mut standings: Vec<(&MemberProfile, u32)> = members
        .iter()
        .filter_map(|member| totals.get(&member.id).map(|count| (member, *count)))
        .collect();

    standings.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| a.0.sort_name().cmp(&b.0.sort_name()))
            .then_with(|| a.0.id.cmp(&b.0.id))
    });
    standings.truncate(limits.max_top_entries);

    standings
        .into_iter()
        .enumerate()
        .map(|(position, (member, count))| RankedAttendee {
            user_id: member.id,
            name: member.name.clone(),
            image_url: member.image_url.clone(),
            rank: position as u32 + 1,
            total_events_attended: count,
        })
        .collect()
}

fn rank_attendance_streaks(
    events: &[Event],
    eligible_by_event: &HashMap<Snowflake, HashSet<Snowflake>>,
    members: &[MemberProfile],
    now: DateTime<Utc>,
    limits: LeaderboardLimits,
) -> Vec<RankedStreak> {
    // Streaks run over completed events only, most recent first.
    let mut completed: Vec<&Event> = events
        .iter()
        .filter(|event| event.is_completed(now))
        .collect();
    completed.sort_by(|a, b| {
        b.start_date
            .cmp(&a.start_date)
            .then_with(|| b.id.cmp(&a.id))
    });

    let mut standings: Vec<(&MemberProfile, u32)> = Vec::new();
    for member in members {
        let mut streak = 0u32;
        for event in &completed {
            let attended = eligible_by_event
                .get(&event.id)
                .is_some_and(|attendees| attendees.contains(&member.id));
            if !attended {
                // A gap ends the streak; older attendance does not revive it.
                break;
            }
            streak += 1;
        }
        if streak > 0 {
            standings.push((member, streak));
        }
    }

    standings.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| a.0.sort_name().cmp(&b.0.sort_name()))
            .then_with(|| a.0.id.cmp(&b.0.id))
    });
    standings.truncate(limits.max_streak_entries);

    standings
        .into_iter()
        .enumerate()
        .map(|(position, (member, streak))| RankedStreak {
            user_id: member.id,
            name: member.name.clone(),
            image_url: member.image_url.clone(),
            rank: position as u32 + 1,
            streak,
        })
        .collect()
}
