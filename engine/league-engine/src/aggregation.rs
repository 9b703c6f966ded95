//! Weekly matchup aggregation: head-to-head grouping, league-wide ranking and
//! the median split.

use crate::models::{Matchup, Roster, User};
use crate::roster::{fantasy_points_per_game, parse_streak, win_percentage, Streak};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Point differential at or below which a matchup counts as close
pub const CLOSE_MARGIN: f64 = 15.0;

/// Point differential above which a matchup counts as a blowout
pub const BLOWOUT_MARGIN: f64 = 60.0;

/// Where a team's weekly score sits relative to the league median
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MedianBand {
    Above,
    At,
    Below,
}

/// One team's ranked score for a week
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamScore {
    /// 1-based position after sorting
    pub rank: usize,
    pub roster_id: u32,
    pub points: f64,
    pub owner_name: Option<String>,
    pub avatar: Option<String>,
    pub band: MedianBand,
}

/// Matchup records partitioned by pairing id
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchupGroups {
    pub groups: BTreeMap<u32, Vec<Matchup>>,
    /// Records with no pairing id (byes)
    pub unpaired: Vec<Matchup>,
}

impl MatchupGroups {
    pub fn record_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum::<usize>() + self.unpaired.len()
    }
}

/// Partition records by `matchup_id`
///
/// Groups of any size are kept and input order is preserved within a group.
pub fn group_matchups(records: &[Matchup]) -> MatchupGroups {
    let mut grouped = MatchupGroups::default();

    for record in records {
        match record.matchup_id {
            Some(id) => grouped.groups.entry(id).or_default().push(record.clone()),
            None => grouped.unpaired.push(record.clone()),
        }
    }

    for (id, members) in &grouped.groups {
        if members.len() != 2 {
            debug!("Matchup {} has {} members", id, members.len());
        }
    }

    grouped
}

/// Resolves roster ids to their owner's user record
struct OwnerIndex<'a> {
    owners: HashMap<u32, &'a User>,
}

impl<'a> OwnerIndex<'a> {
    fn new(rosters: &'a [Roster], users: &'a [User]) -> Self {
        let users_by_id: HashMap<&str, &User> =
            users.iter().map(|user| (user.user_id.as_str(), user)).collect();

        let owners = rosters
            .iter()
            .filter_map(|roster| {
                users_by_id.get(roster.owner_id.as_str()).map(|user| (roster.roster_id, *user))
            })
            .collect();

        Self { owners }
    }

    fn owner(&self, roster_id: u32) -> Option<&'a User> {
        self.owners.get(&roster_id).copied()
    }
}

/// Band for the team at `index` given the median index
fn band_for(index: usize, median_index: usize) -> MedianBand {
    match index.cmp(&median_index) {
        std::cmp::Ordering::Less => MedianBand::Above,
        std::cmp::Ordering::Equal => MedianBand::At,
        std::cmp::Ordering::Greater => MedianBand::Below,
    }
}

/// Rank every record for the week by points and band it against the median
///
/// The sort is stable with no tie-break. The median index is `floor(n / 2)`,
/// so exactly one team is `At` for any non-empty list, even when n is even.
pub fn rank_and_band(records: &[Matchup], rosters: &[Roster], users: &[User]) -> Vec<TeamScore> {
    let owners = OwnerIndex::new(rosters, users);

    let mut sorted: Vec<&Matchup> = records.iter().collect();
    sorted.sort_by(|a, b| b.points.total_cmp(&a.points));

    let median_index = sorted.len() / 2;

    sorted
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let owner = owners.owner(record.roster_id);
            TeamScore {
                rank: index + 1,
                roster_id: record.roster_id,
                points: record.points,
                owner_name: owner.map(|user| user.display_name.clone()),
                avatar: owner.and_then(|user| user.avatar.clone()),
                band: band_for(index, median_index),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MatchupMargin {
    Close,
    Standard,
    Blowout,
}

/// Scores carry two decimals; compare them as exact cents
fn cents(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO).round_dp(2)
}

/// Classify a head-to-head differential: `<= 15` close, `> 60` blowout
pub fn classify_margin(a: f64, b: f64) -> MatchupMargin {
    let diff = (cents(a) - cents(b)).abs();
    if diff <= cents(CLOSE_MARGIN) {
        MatchupMargin::Close
    } else if diff > cents(BLOWOUT_MARGIN) {
        MatchupMargin::Blowout
    } else {
        MatchupMargin::Standard
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupSide {
    pub roster_id: u32,
    pub points: f64,
    pub owner_name: Option<String>,
}

/// A pairing as displayed on the matchups board
///
/// `margin` and `leader` are only set for two-team groups. Ties have no leader.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHead {
    pub matchup_id: u32,
    pub sides: Vec<MatchupSide>,
    pub margin: Option<MatchupMargin>,
    pub leader: Option<u32>,
}

pub fn head_to_heads(
    groups: &MatchupGroups,
    rosters: &[Roster],
    users: &[User],
) -> Vec<HeadToHead> {
    let owners = OwnerIndex::new(rosters, users);

    groups
        .groups
        .iter()
        .map(|(matchup_id, members)| {
            let sides: Vec<MatchupSide> = members
                .iter()
                .map(|record| MatchupSide {
                    roster_id: record.roster_id,
                    points: record.points,
                    owner_name: owners
                        .owner(record.roster_id)
                        .map(|user| user.display_name.clone()),
                })
                .collect();

            let (margin, leader) = match sides.as_slice() {
                [home, away] => {
                    let leader = if home.points > away.points {
                        Some(home.roster_id)
                    } else if away.points > home.points {
                        Some(away.roster_id)
                    } else {
                        None
                    };
                    (Some(classify_margin(home.points, away.points)), leader)
                }
                _ => (None, None),
            };

            HeadToHead { matchup_id: *matchup_id, sides, margin, leader }
        })
        .collect()
}

/// A row of the season standings table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingRow {
    pub roster_id: u32,
    pub owner_name: Option<String>,
    pub team_name: Option<String>,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub win_percentage: f64,
    pub points_for: f64,
    pub points_per_game: f64,
    pub streak: Option<Streak>,
}

impl StandingRow {
    pub fn record(&self) -> String {
        if self.ties > 0 {
            format!("{}-{}-{}", self.wins, self.losses, self.ties)
        } else {
            format!("{}-{}", self.wins, self.losses)
        }
    }
}

/// Rosters ordered by wins, most first; equal records keep roster order
pub fn standings(rosters: &[Roster], users: &[User]) -> Vec<StandingRow> {
    let owners = OwnerIndex::new(rosters, users);

    let mut rows: Vec<StandingRow> = rosters
        .iter()
        .map(|roster| StandingRow {
            roster_id: roster.roster_id,
            owner_name: owners.owner(roster.roster_id).map(|user| user.display_name.clone()),
            team_name: roster.metadata_str("team_name").map(str::to_string),
            wins: roster.settings.wins,
            losses: roster.settings.losses,
            ties: roster.settings.ties,
            win_percentage: win_percentage(roster),
            points_for: roster.settings.points_for(),
            points_per_game: fantasy_points_per_game(roster),
            streak: parse_streak(roster),
        })
        .collect();

    rows.sort_by(|a, b| b.wins.cmp(&a.wins));
    rows
}
