//! Lookup tables built from a fetched stage tree, used to render participant
//! names — including placeholder labels for slots whose participant is not
//! yet determined (bracket positions, group ranks).

use crate::{Match, Slot, Stage};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct Lookups {
    stage_item_names: HashMap<i64, String>,
    matches: HashMap<i64, Match>,
}

impl Lookups {
    pub fn from_stages(stages: &[Stage]) -> Self {
        let mut stage_item_names = HashMap::new();
        let mut matches = HashMap::new();
        for stage in stages {
            for item in &stage.stage_items {
                stage_item_names.insert(item.id, item.name.clone());
                for round in &item.rounds {
                    for game in &round.matches {
                        matches.insert(game.id, game.clone());
                    }
                }
            }
        }
        Self { stage_item_names, matches }
    }

    pub fn resolve_stage_item_label(&self, stage_item_id: i64) -> String {
        self.stage_item_names
            .get(&stage_item_id)
            .cloned()
            .unwrap_or_else(|| format!("stage item {stage_item_id}"))
    }

    /// Label for a match referenced from a placeholder slot, e.g.
    /// "Dragons vs Lions". Falls back to the bare id for unknown matches.
    pub fn resolve_match_label(&self, match_id: i64) -> String {
        match self.matches.get(&match_id) {
            Some(game) => format!(
                "{} vs {}",
                direct_team_name(&game.input1),
                direct_team_name(&game.input2)
            ),
            None => format!("match {match_id}"),
        }
    }

    /// Participant display name for one slot of a match.
    pub fn slot_label(&self, slot: &Slot) -> String {
        match slot {
            Slot::Team(team) => team.name.clone(),
            Slot::MatchWinner { match_id } => {
                format!("Winner of {}", self.resolve_match_label(*match_id))
            }
            Slot::StageItemRank { stage_item_id, position } => {
                format!("#{position} of {}", self.resolve_stage_item_label(*stage_item_id))
            }
            Slot::Tbd => "TBD".to_owned(),
        }
    }

    pub fn get_match(&self, match_id: i64) -> Option<&Match> {
        self.matches.get(&match_id)
    }
}

/// One level only — a placeholder inside the referenced match stays "TBD"
/// rather than recursing through the bracket.
fn direct_team_name(slot: &Slot) -> &str {
    match slot {
        Slot::Team(team) => team.name.as_str(),
        _ => "TBD",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Round, StageItem, Team};

    fn sample_stages() -> Vec<Stage> {
        vec![Stage {
            id: 1,
            name: "Knockout".into(),
            is_active: true,
            stage_items: vec![StageItem {
                id: 10,
                name: "Main bracket".into(),
                rounds: vec![Round {
                    id: 100,
                    name: "Semifinals".into(),
                    is_draft: false,
                    matches: vec![
                        Match {
                            id: 1000,
                            round_id: 100,
                            input1: Slot::Team(Team { id: 1, name: "Dragons".into() }),
                            input2: Slot::Team(Team { id: 2, name: "Lions".into() }),
                            ..Default::default()
                        },
                        Match {
                            id: 1001,
                            round_id: 100,
                            input1: Slot::MatchWinner { match_id: 1000 },
                            input2: Slot::StageItemRank { stage_item_id: 10, position: 2 },
                            ..Default::default()
                        },
                    ],
                }],
            }],
        }]
    }

    #[test]
    fn team_slot_resolves_to_team_name() {
        let lookups = Lookups::from_stages(&sample_stages());
        let game = lookups.get_match(1000).unwrap().clone();
        assert_eq!(lookups.slot_label(&game.input1), "Dragons");
        assert_eq!(lookups.slot_label(&game.input2), "Lions");
    }

    #[test]
    fn match_winner_slot_labels_the_source_match() {
        let lookups = Lookups::from_stages(&sample_stages());
        let game = lookups.get_match(1001).unwrap().clone();
        assert_eq!(lookups.slot_label(&game.input1), "Winner of Dragons vs Lions");
    }

    #[test]
    fn stage_item_rank_slot_names_position_and_item() {
        let lookups = Lookups::from_stages(&sample_stages());
        let game = lookups.get_match(1001).unwrap().clone();
        assert_eq!(lookups.slot_label(&game.input2), "#2 of Main bracket");
    }

    #[test]
    fn unknown_references_fall_back_to_ids() {
        let lookups = Lookups::from_stages(&[]);
        assert_eq!(lookups.resolve_match_label(5), "match 5");
        assert_eq!(lookups.resolve_stage_item_label(9), "stage item 9");
        assert_eq!(
            lookups.slot_label(&Slot::MatchWinner { match_id: 5 }),
            "Winner of match 5"
        );
    }
}
