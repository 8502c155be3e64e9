use std::ops;

/// An observed game ratio or an expected result in the range `0.0..=1.0`,
/// where `0.0` is a shutout loss and `1.0` is a perfect win.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default)]
pub struct Score(pub f64);

impl From<Score> for f64 {
    #[inline]
    fn from(Score(score): Score) -> f64 {
        score
    }
}

impl Score {
    pub const LOSS: Score = Score(0.0);
    pub const DRAW: Score = Score(0.5);
    pub const WIN: Score = Score(1.0);

    /// The same result seen from the other side of the game.
    #[inline]
    pub fn opposite(self) -> Score {
        Score(1.0 - self.0)
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Signed residual between an observed and an expected score.
impl ops::Sub<Score> for Score {
    type Output = f64;

    #[inline]
    fn sub(self, rhs: Score) -> f64 {
        self.0 - rhs.0
    }
}
