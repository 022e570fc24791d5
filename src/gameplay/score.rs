use crate::core::components::GamePiece;

/// Running score for the current session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScoreKeeper {
    current: u32,
}

impl ScoreKeeper {
    /// Points awarded for clearing `piece`: `score_value * multiplier + bonus`.
    pub fn points_for(piece: &GamePiece, multiplier: u32, bonus: u32) -> u32 {
        piece
            .score_value
            .saturating_mul(multiplier)
            .saturating_add(bonus)
    }

    pub fn add(&mut self, points: u32) -> u32 {
        self.current = self.current.saturating_add(points);
        self.current
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::components::MatchValue;

    #[test]
    fn points_use_multiplier_then_bonus() {
        let piece = GamePiece::new(MatchValue::Red, 20);
        assert_eq!(ScoreKeeper::points_for(&piece, 3, 5), 65);
        assert_eq!(ScoreKeeper::points_for(&piece, 0, 5), 5);
    }

    #[test]
    fn accumulates_and_resets() {
        let mut s = ScoreKeeper::default();
        s.add(40);
        assert_eq!(s.add(60), 100);
        s.reset();
        assert_eq!(s.current(), 0);
    }
}
