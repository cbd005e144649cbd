//! Score reconciliation: which score pair is authoritative for display, and
//! how each side of the match is colored.

use tourney_api::Match;

/// The scores a match row actually shows, and whether they are tentative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreDisplay {
    pub score1: u32,
    pub score2: u32,
    pub pending: bool,
}

/// Decide between the committed and pending score pairs.
///
/// The pending pair wins only while the committed pair is still (0, 0) —
/// indistinguishable from "not yet played" on its own — and both pending
/// values are present. A half-set pending pair (partial update in flight) is
/// ignored, and once a committed pair goes non-zero it always wins; any
/// pending data still around is assumed stale.
pub fn resolve_display(game: &Match) -> ScoreDisplay {
    let has_pending = game.pending_score1.is_some() && game.pending_score2.is_some();
    let committed_is_zero_zero = game.score1 == 0 && game.score2 == 0;
    let pending = has_pending && committed_is_zero_zero;

    if pending {
        ScoreDisplay {
            score1: game.pending_score1.unwrap_or_default(),
            score2: game.pending_score2.unwrap_or_default(),
            pending: true,
        }
    } else {
        ScoreDisplay { score1: game.score1, score2: game.score2, pending: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeColor {
    /// Tentative result — neither side gets a win/draw/loss color yet.
    Pending,
    Win,
    Draw,
    Loss,
}

/// Color each side of the displayed score pair. Total over all non-negative
/// pairs; no error cases.
pub fn classify_outcome(score1: u32, score2: u32, pending: bool) -> (OutcomeColor, OutcomeColor) {
    if pending {
        return (OutcomeColor::Pending, OutcomeColor::Pending);
    }
    if score1 > score2 {
        (OutcomeColor::Win, OutcomeColor::Loss)
    } else if score1 < score2 {
        (OutcomeColor::Loss, OutcomeColor::Win)
    } else {
        (OutcomeColor::Draw, OutcomeColor::Draw)
    }
}
