//! Roster state transitions.
//!
//! A batch is applied as: all deletions first, then additions in request order. The first
//! addition the bank cannot fund stops the batch; everything applied before it is kept.

use crate::errors::AppError;
use crate::models::{FeedSnapshot, PlayerId, RosterEntry, SelectedPlayerRequest, UserGameweekState};

/// Which of the feed's prices applies to the roster being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingWeek {
    /// Roster for the feed's own gameweek, priced at `current_price`.
    Current,
    /// Roster for the following gameweek, priced at `next_price`.
    Next,
}

/// How a batch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterOutcome {
    Applied,
    InsufficientFunds {
        player_id: PlayerId,
        player_name: String,
        price: i64,
        bank_money: i64,
    },
}

impl RosterOutcome {
    /// User-facing description, `None` when the whole batch went through.
    pub fn message(&self) -> Option<String> {
        match self {
            RosterOutcome::Applied => None,
            RosterOutcome::InsufficientFunds {
                player_id,
                player_name,
                price,
                bank_money,
            } => Some(format!(
                "Insufficient funds to add {} ({}): price {}, bank {}",
                player_name, player_id, price, bank_money
            )),
        }
    }
}

/// Checks that `target` is the snapshot's gameweek or the one after it.
pub fn validate_gameweek(snapshot: &FeedSnapshot, target: &str) -> Result<PricingWeek, AppError> {
    let current: i64 = snapshot.gameweek.trim().parse().map_err(|_| {
        AppError::Upstream(format!(
            "Feed gameweek {:?} is not a number",
            snapshot.gameweek
        ))
    })?;
    let invalid = || AppError::InvalidGameweek {
        requested: target.to_string(),
        current: snapshot.gameweek.clone(),
    };
    let requested: i64 = target.trim().parse().map_err(|_| invalid())?;

    if requested == current {
        Ok(PricingWeek::Current)
    } else if requested == current + 1 {
        Ok(PricingWeek::Next)
    } else {
        Err(invalid())
    }
}

/// Applies roster batches against a fixed starting budget.
#[derive(Debug, Clone, Copy)]
pub struct RosterEngine {
    starting_budget: i64,
}

impl RosterEngine {
    pub fn new(starting_budget: i64) -> Self {
        Self { starting_budget }
    }

    pub fn starting_budget(&self) -> i64 {
        self.starting_budget
    }

    /// State used when nothing has been stored for the key yet.
    pub fn initial_state(&self, gameweek: &str) -> UserGameweekState {
        UserGameweekState::empty(gameweek, self.starting_budget)
    }

    /// Apply `deletions` then `additions` to `current`.
    ///
    /// Returns the new state together with the outcome. On
    /// [`RosterOutcome::InsufficientFunds`] the returned state still carries every deletion and
    /// every addition processed before the unaffordable one.
    ///
    /// Fails with `InvalidGameweek` before touching anything, or with `UnknownPlayer` when an
    /// addition is missing from the snapshot.
    pub fn apply(
        &self,
        current: Option<UserGameweekState>,
        snapshot: &FeedSnapshot,
        target_gameweek: &str,
        deletions: &[PlayerId],
        additions: &[SelectedPlayerRequest],
    ) -> Result<(UserGameweekState, RosterOutcome), AppError> {
        let pricing = validate_gameweek(snapshot, target_gameweek)?;
        let mut state = current.unwrap_or_else(|| self.initial_state(target_gameweek));

        for id in deletions {
            if let Some(entry) = state.roster.remove(id) {
                state.bank_money += entry.price;
            }
        }

        for addition in additions {
            if state.roster.contains_key(&addition.id) {
                continue;
            }

            let player = snapshot
                .get(&addition.id)
                .ok_or_else(|| AppError::UnknownPlayer(addition.id.clone()))?;

            let price = match pricing {
                PricingWeek::Current => player.current_price,
                // Prices carry over until the week's results publish a new one.
                PricingWeek::Next => player.next_price.unwrap_or(player.current_price),
            };

            if price > state.bank_money {
                let outcome = RosterOutcome::InsufficientFunds {
                    player_id: player.id.clone(),
                    player_name: player.name.clone(),
                    price,
                    bank_money: state.bank_money,
                };
                return Ok((state, outcome));
            }

            state.bank_money -= price;
            state.roster.insert(
                player.id.clone(),
                RosterEntry {
                    id: player.id.clone(),
                    is_substitute: addition.is_substitute,
                    is_captain: addition.is_captain,
                    name: player.name.clone(),
                    position: player.position,
                    price,
                },
            );
        }

        Ok((state, RosterOutcome::Applied))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerRecord, Position};

    fn player(id: &str, current_price: i64, next_price: Option<i64>) -> PlayerRecord {
        PlayerRecord {
            id: id.to_string(),
            name: format!("Name {}", id),
            position: Position::FW,
            current_price,
            next_price,
            current_score: None,
        }
    }

    fn snapshot() -> FeedSnapshot {
        let mut snapshot = FeedSnapshot::new("5");
        snapshot.insert(player("A", 60, Some(65)));
        snapshot.insert(player("B", 50, Some(45)));
        snapshot.insert(player("C", 30, None));
        snapshot
    }

    fn add(id: &str) -> SelectedPlayerRequest {
        SelectedPlayerRequest {
            id: id.to_string(),
            is_substitute: false,
            is_captain: false,
        }
    }

    #[test]
    fn test_gameweek_boundary() {
        let snapshot = snapshot();
        assert_eq!(validate_gameweek(&snapshot, "5"), Ok(PricingWeek::Current));
        assert_eq!(validate_gameweek(&snapshot, "6"), Ok(PricingWeek::Next));
        for target in ["4", "7", "five", ""] {
            let err = validate_gameweek(&snapshot, target).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_GAMEWEEK", "target {:?}", target);
        }
    }

    #[test]
    fn test_invalid_gameweek_rejects_before_mutating() {
        let engine = RosterEngine::new(100);
        let err = engine
            .apply(None, &snapshot(), "7", &[], &[add("A")])
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidGameweek { .. }));
    }

    #[test]
    fn test_insufficient_funds_keeps_prior_steps() {
        let engine = RosterEngine::new(100);
        let (state, outcome) = engine
            .apply(None, &snapshot(), "5", &[], &[add("A"), add("B"), add("C")])
            .unwrap();

        match outcome {
            RosterOutcome::InsufficientFunds {
                player_id,
                price,
                bank_money,
                ..
            } => {
                assert_eq!(player_id, "B");
                assert_eq!(price, 50);
                assert_eq!(bank_money, 40);
            }
            other => panic!("expected insufficient funds, got {:?}", other),
        }
        assert_eq!(state.roster.keys().collect::<Vec<_>>(), vec!["A"]);
        assert_eq!(state.bank_money, 40);
        // C would have been affordable but the batch stopped at B.
        assert!(!state.roster.contains_key("C"));
    }

    #[test]
    fn test_next_week_uses_forward_price() {
        let engine = RosterEngine::new(200);
        let (state, outcome) = engine
            .apply(None, &snapshot(), "6", &[], &[add("A"), add("C")])
            .unwrap();

        assert_eq!(outcome, RosterOutcome::Applied);
        assert_eq!(state.gameweek, "6");
        assert_eq!(state.roster["A"].price, 65);
        assert_eq!(state.roster["C"].price, 30);
        assert_eq!(state.bank_money, 105);
    }

    #[test]
    fn test_idempotent_add_keeps_original_entry() {
        let engine = RosterEngine::new(100);
        let (state, _) = engine
            .apply(None, &snapshot(), "5", &[], &[add("A")])
            .unwrap();

        let mut repriced = snapshot();
        repriced.insert(player("A", 10, None));
        let flagged = SelectedPlayerRequest {
            id: "A".to_string(),
            is_substitute: true,
            is_captain: true,
        };
        let (after, outcome) = engine
            .apply(Some(state.clone()), &repriced, "5", &[], &[flagged])
            .unwrap();

        assert_eq!(outcome, RosterOutcome::Applied);
        assert_eq!(after, state);
    }

    #[test]
    fn test_idempotent_delete() {
        let engine = RosterEngine::new(100);
        let (state, _) = engine
            .apply(None, &snapshot(), "5", &[], &[add("C")])
            .unwrap();

        let (after, outcome) = engine
            .apply(Some(state.clone()), &snapshot(), "5", &["A".to_string()], &[])
            .unwrap();

        assert_eq!(outcome, RosterOutcome::Applied);
        assert_eq!(after, state);
    }

    #[test]
    fn test_delete_refunds_acquisition_price() {
        let engine = RosterEngine::new(100);
        let (state, _) = engine
            .apply(None, &snapshot(), "5", &[], &[add("A")])
            .unwrap();
        assert_eq!(state.bank_money, 40);

        let mut repriced = snapshot();
        repriced.insert(player("A", 90, None));
        let (after, _) = engine
            .apply(Some(state), &repriced, "5", &["A".to_string()], &[])
            .unwrap();

        assert!(after.roster.is_empty());
        assert_eq!(after.bank_money, 100);
    }

    #[test]
    fn test_deletions_fund_additions_in_same_batch() {
        let engine = RosterEngine::new(100);
        let (state, _) = engine
            .apply(None, &snapshot(), "5", &[], &[add("A")])
            .unwrap();

        let (after, outcome) = engine
            .apply(Some(state), &snapshot(), "5", &["A".to_string()], &[add("B"), add("C")])
            .unwrap();

        assert_eq!(outcome, RosterOutcome::Applied);
        assert_eq!(after.bank_money, 20);
        assert_eq!(after.total_value() + after.bank_money, engine.starting_budget());
    }

    #[test]
    fn test_budget_conserved_over_sequence() {
        let engine = RosterEngine::new(150);
        let snapshot = snapshot();
        let batches: Vec<(Vec<PlayerId>, Vec<SelectedPlayerRequest>)> = vec![
            (vec![], vec![add("A"), add("C")]),
            (vec!["C".to_string()], vec![add("B")]),
            (vec!["A".to_string(), "Z".to_string()], vec![add("C"), add("B")]),
            (vec!["B".to_string()], vec![add("A")]),
        ];

        let mut state = None;
        for (deletions, additions) in batches {
            let (next, outcome) = engine
                .apply(state, &snapshot, "5", &deletions, &additions)
                .unwrap();
            assert_eq!(outcome, RosterOutcome::Applied);
            assert!(next.bank_money >= 0);
            assert_eq!(next.total_value() + next.bank_money, 150);
            state = Some(next);
        }
    }

    #[test]
    fn test_unknown_player_is_fatal() {
        let engine = RosterEngine::new(100);
        let err = engine
            .apply(None, &snapshot(), "5", &[], &[add("NOPE")])
            .unwrap_err();
        assert_eq!(err, AppError::UnknownPlayer("NOPE".to_string()));
    }

    #[test]
    fn test_outcome_message() {
        assert!(RosterOutcome::Applied.message().is_none());
        let outcome = RosterOutcome::InsufficientFunds {
            player_id: "B".to_string(),
            player_name: "Name B".to_string(),
            price: 50,
            bank_money: 40,
        };
        assert!(outcome.message().unwrap().contains("Name B"));
    }
}
