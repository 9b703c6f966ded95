//! Joins league ownership with platform-wide ownership and start rates

use crate::models::{null_to_default, Roster};
use player_registry::PlayerRegistry;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Platform-wide ownership and start percentages for one player
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchStat {
    #[serde(default, deserialize_with = "null_to_default")]
    pub owned: f64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub started: f64,
}

/// Research stats annotated with whether a league team rosters the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OwnershipEntry {
    pub owned: f64,
    pub started: f64,
    pub team_owned: bool,
}

impl OwnershipEntry {
    pub fn ratio(&self) -> f64 {
        ownership_ratio(self.started, self.owned)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeOutcome {
    pub entries: BTreeMap<String, OwnershipEntry>,
    /// Research ids with no registry entry, dropped from `entries`
    pub missing: usize,
}

/// Started / owned, or 0 when nobody owns the player
pub fn ownership_ratio(started: f64, owned: f64) -> f64 {
    if owned == 0.0 {
        return 0.0;
    }
    let ratio = started / owned;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

/// Every player id on any roster in the league
pub fn owned_player_ids(rosters: &[Roster]) -> HashSet<&str> {
    rosters.iter().flat_map(|roster| roster.players.iter().map(String::as_str)).collect()
}

pub fn merge_ownership(
    research: &HashMap<String, ResearchStat>,
    rosters: &[Roster],
    registry: &PlayerRegistry,
) -> MergeOutcome {
    let owned_ids = owned_player_ids(rosters);
    let mut outcome = MergeOutcome::default();

    for (player_id, stat) in research {
        if !registry.contains(player_id) {
            outcome.missing += 1;
            continue;
        }

        outcome.entries.insert(
            player_id.clone(),
            OwnershipEntry {
                owned: stat.owned,
                started: stat.started,
                team_owned: owned_ids.contains(player_id.as_str()),
            },
        );
    }

    if outcome.missing > 0 {
        debug!("Dropped {} research entries with no known player", outcome.missing);
    }

    outcome
}

/// A row of the research table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResearchRow {
    pub player_id: String,
    pub name: String,
    pub team: String,
    pub owned: f64,
    pub started: f64,
    pub ratio: f64,
    pub team_owned: bool,
}

/// Research table sort column; every column sorts descending
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchSort {
    Name,
    #[default]
    Owned,
    Started,
    Ratio,
    TeamOwned,
}

pub fn research_rows(
    outcome: &MergeOutcome,
    registry: &PlayerRegistry,
    sort: ResearchSort,
) -> Vec<ResearchRow> {
    let mut rows: Vec<ResearchRow> = outcome
        .entries
        .iter()
        .map(|(player_id, entry)| {
            let player = registry.get(player_id);
            ResearchRow {
                player_id: player_id.clone(),
                name: player.map(|p| p.full_name()).unwrap_or_else(|| player_id.clone()),
                team: player.map(|p| p.team.clone()).unwrap_or_default(),
                owned: entry.owned,
                started: entry.started,
                ratio: entry.ratio(),
                team_owned: entry.team_owned,
            }
        })
        .collect();

    match sort {
        ResearchSort::Name => rows.sort_by(|a, b| b.name.cmp(&a.name)),
        ResearchSort::Owned => rows.sort_by(|a, b| b.owned.total_cmp(&a.owned)),
        ResearchSort::Started => rows.sort_by(|a, b| b.started.total_cmp(&a.started)),
        ResearchSort::Ratio => rows.sort_by(|a, b| b.ratio.total_cmp(&a.ratio)),
        ResearchSort::TeamOwned => rows.sort_by(|a, b| b.team_owned.cmp(&a.team_owned)),
    }

    rows
}

/// Rows for players no league team has rostered
pub fn free_agents(rows: &[ResearchRow]) -> Vec<&ResearchRow> {
    rows.iter().filter(|row| !row.team_owned).collect()
}
