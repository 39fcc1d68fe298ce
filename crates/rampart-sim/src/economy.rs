//! Gold, lives and score.
//!
//! Every mutation goes through the ledger so the counters never go negative
//! and the session statistics stay in step with them.

use tracing::debug;

use rampart_core::config::EconomyConfig;
use rampart_core::error::{CommandError, CommandResult};
use rampart_core::state::{EconomyView, StatsView};

#[derive(Debug, Clone)]
pub struct Ledger {
    gold: u32,
    lives: u32,
    score: u64,
    score_per_reward: u64,
    stats: StatsView,
}

impl Ledger {
    pub fn new(config: &EconomyConfig) -> Self {
        Self {
            gold: config.starting_gold,
            lives: config.starting_lives,
            score: 0,
            score_per_reward: config.score_per_reward,
            stats: StatsView::default(),
        }
    }

    pub fn gold(&self) -> u32 {
        self.gold
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Debit `cost` if affordable. On failure the balance is untouched.
    pub fn try_debit(&mut self, cost: u32) -> CommandResult<()> {
        if cost > self.gold {
            return Err(CommandError::InsufficientFunds {
                required: cost,
                available: self.gold,
            });
        }
        self.gold -= cost;
        Ok(())
    }

    /// Return gold for an action that did not go through.
    pub fn refund(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Credit a killed attacker's reward as gold and score.
    pub fn credit_kill(&mut self, reward: u32) {
        self.gold = self.gold.saturating_add(reward);
        self.score = self
            .score
            .saturating_add(u64::from(reward) * self.score_per_reward);
        self.stats.attackers_killed += 1;
    }

    /// Credit a wave completion bonus as gold and score.
    pub fn credit_bonus(&mut self, bonus: u32) {
        self.gold = self.gold.saturating_add(bonus);
        self.score = self.score.saturating_add(u64::from(bonus));
        self.stats.waves_cleared += 1;
    }

    /// Take one life for a leaked attacker. Returns `true` once lives hit zero.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.stats.attackers_leaked += 1;
        debug!(lives = self.lives, "attacker leaked");
        self.lives == 0
    }

    pub fn record_shots(&mut self, shots: u32) {
        self.stats.shots_fired += shots;
    }

    pub fn is_depleted(&self) -> bool {
        self.lives == 0
    }

    pub fn view(&self) -> EconomyView {
        EconomyView {
            gold: self.gold,
            lives: self.lives,
            score: self.score,
        }
    }

    pub fn stats(&self) -> StatsView {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(gold: u32, lives: u32) -> Ledger {
        Ledger::new(&EconomyConfig {
            starting_gold: gold,
            starting_lives: lives,
            score_per_reward: 10,
        })
    }

    #[test]
    fn debit_rejects_overspend() {
        let mut ledger = ledger(100, 20);
        assert_eq!(
            ledger.try_debit(150),
            Err(CommandError::InsufficientFunds {
                required: 150,
                available: 100
            })
        );
        assert_eq!(ledger.gold(), 100);
        ledger.try_debit(100).unwrap();
        assert_eq!(ledger.gold(), 0);
    }

    #[test]
    fn kill_credits_gold_and_score() {
        let mut ledger = ledger(0, 20);
        ledger.credit_kill(12);
        assert_eq!(ledger.gold(), 12);
        // 12 reward * 10 score per reward
        assert_eq!(ledger.score(), 120);
        assert_eq!(ledger.stats().attackers_killed, 1);
    }

    #[test]
    fn bonus_counts_cleared_waves() {
        let mut ledger = ledger(0, 20);
        ledger.credit_bonus(35);
        assert_eq!(ledger.gold(), 35);
        assert_eq!(ledger.score(), 35);
        assert_eq!(ledger.stats().waves_cleared, 1);
    }

    #[test]
    fn lives_saturate_at_zero() {
        let mut ledger = ledger(0, 2);
        assert!(!ledger.lose_life());
        assert!(ledger.lose_life());
        assert!(ledger.lose_life());
        assert_eq!(ledger.lives(), 0);
        assert_eq!(ledger.stats().attackers_leaked, 3);
    }

    #[test]
    fn refund_restores_balance() {
        let mut ledger = ledger(90, 20);
        ledger.try_debit(50).unwrap();
        ledger.refund(50);
        assert_eq!(ledger.view().gold, 90);
    }
}
