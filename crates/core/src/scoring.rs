//! Scoring module - point totals, combo streaks and the line table
//!
//! Base points come from [`LINE_SCORES`] (100/300/500/800). [`Score::add`]
//! multiplies whatever it is given by the current combo (floored at 1).
//!
//! On top of that, the controller applies the clear a second time whenever
//! the streak has just grown past 1 ([`ScoringRule::Compounding`]). The
//! compounding is kept for parity with the reference scoring feel;
//! [`ScoringRule::MultiplierOnly`] drops the second application.

use crate::types::LINE_SCORES;

/// How a line clear is credited once the combo has been updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoringRule {
    /// Add the base score, bump the combo, then add the base again when combo > 1.
    #[default]
    Compounding,
    /// Add the base score once, multiplied by the combo, then bump the combo.
    MultiplierOnly,
}

impl ScoringRule {
    /// Parse from string (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "compounding" => Some(ScoringRule::Compounding),
            "multiplier" | "multiplieronly" | "multiplier_only" => Some(ScoringRule::MultiplierOnly),
            _ => None,
        }
    }
}

/// Base points for removing `lines` rows at once (0 outside 1..=4)
pub fn line_score(lines: usize) -> u32 {
    LINE_SCORES.get(lines).copied().unwrap_or(0)
}

/// Running counters for one game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    total: u32,
    combo: u32,
    lines_cleared: u32,
    high_score: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    /// Highest total reached this session (survives [`Score::reset`]).
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Add `points` times `max(1, combo)`; returns what was actually added.
    pub fn add(&mut self, points: u32) -> u32 {
        let awarded = points.saturating_mul(self.combo.max(1));
        self.total = self.total.saturating_add(awarded);
        self.high_score = self.high_score.max(self.total);
        awarded
    }

    pub fn add_combo(&mut self) {
        self.combo += 1;
    }

    pub fn reset_combo(&mut self) {
        self.combo = 0;
    }

    pub fn add_lines_cleared(&mut self, lines: u32) {
        self.lines_cleared = self.lines_cleared.saturating_add(lines);
    }

    /// Zero everything except the session high score.
    pub fn reset(&mut self) {
        *self = Self {
            high_score: self.high_score,
            ..Self::default()
        };
    }

    /// Credit one lock that removed `lines` rows (0 resets the streak).
    ///
    /// Returns the points added by this lock.
    pub fn record_lock(&mut self, lines: usize, rule: ScoringRule) -> u32 {
        if lines == 0 {
            self.reset_combo();
            return 0;
        }

        let base = line_score(lines);
        self.add_lines_cleared(lines as u32);
        match rule {
            ScoringRule::Compounding => {
                let mut awarded = self.add(base);
                self.add_combo();
                if self.combo > 1 {
                    awarded += self.add(base);
                }
                awarded
            }
            ScoringRule::MultiplierOnly => {
                let awarded = self.add(base);
                self.add_combo();
                awarded
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scores() {
        assert_eq!(line_score(0), 0);
        assert_eq!(line_score(1), 100);
        assert_eq!(line_score(2), 300);
        assert_eq!(line_score(3), 500);
        assert_eq!(line_score(4), 800);
        assert_eq!(line_score(5), 0);
    }

    #[test]
    fn test_add_floors_multiplier_at_one() {
        let mut score = Score::new();
        assert_eq!(score.add(100), 100);
        assert_eq!(score.total(), 100);

        score.add_combo();
        assert_eq!(score.add(100), 100);
        assert_eq!(score.total(), 200);

        score.add_combo();
        assert_eq!(score.add(100), 200);
        assert_eq!(score.total(), 400);
    }

    #[test]
    fn test_high_score_tracks_and_survives_reset() {
        let mut score = Score::new();
        score.add(500);
        score.add_lines_cleared(3);
        score.reset();
        assert_eq!(score.total(), 0);
        assert_eq!(score.lines_cleared(), 0);
        assert_eq!(score.high_score(), 500);

        score.add(100);
        assert_eq!(score.high_score(), 500);
    }

    #[test]
    fn test_compounding_streak() {
        let mut score = Score::new();
        // First clear: plain base.
        assert_eq!(score.record_lock(1, ScoringRule::Compounding), 100);
        assert_eq!(score.combo(), 1);
        // Second clear: 100 * 1, then doubled again at combo 2 -> 100 + 200.
        assert_eq!(score.record_lock(1, ScoringRule::Compounding), 300);
        assert_eq!(score.combo(), 2);
        assert_eq!(score.total(), 400);
        assert_eq!(score.lines_cleared(), 2);
    }

    #[test]
    fn test_multiplier_only_streak() {
        let mut score = Score::new();
        assert_eq!(score.record_lock(2, ScoringRule::MultiplierOnly), 300);
        assert_eq!(score.record_lock(2, ScoringRule::MultiplierOnly), 300);
        assert_eq!(score.record_lock(2, ScoringRule::MultiplierOnly), 600);
        assert_eq!(score.combo(), 3);
    }

    #[test]
    fn test_empty_lock_breaks_streak() {
        let mut score = Score::new();
        score.record_lock(4, ScoringRule::Compounding);
        assert_eq!(score.record_lock(0, ScoringRule::Compounding), 0);
        assert_eq!(score.combo(), 0);
        assert_eq!(score.total(), 800);
    }
}
