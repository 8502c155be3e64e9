use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::Score;

const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Constants that turn raw points into bounded *scoring opportunities* for
/// a particular sport.
///
/// The adjustment has diminishing returns, so that running up the score in
/// a blowout counts for less than the raw margin suggests.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sport {
    score_factor: f64,
    max_score: f64,
    exponent: f64,
}

impl Default for Sport {
    fn default() -> Sport {
        Sport::GENERIC
    }
}

impl Sport {
    /// Sports where every score is worth a single point, like baseball or
    /// hockey.
    pub const GENERIC: Sport = Sport {
        score_factor: 100.0,
        max_score: 1.0,
        exponent: GOLDEN_RATIO,
    };

    /// The largest single score is a touchdown worth 6.
    pub const FOOTBALL: Sport = Sport {
        score_factor: 500.0,
        max_score: 6.0,
        exponent: GOLDEN_RATIO,
    };

    /// The largest single score is a three-pointer.
    pub const BASKETBALL: Sport = Sport {
        score_factor: 750.0,
        max_score: 3.0,
        exponent: GOLDEN_RATIO,
    };

    pub fn new(score_factor: f64, max_score: f64) -> Sport {
        assert!(score_factor.is_finite() && score_factor > 0.0);
        assert!(max_score.is_finite() && max_score > 0.0);
        Sport {
            score_factor,
            max_score,
            exponent: GOLDEN_RATIO,
        }
    }

    #[must_use]
    pub fn with_exponent(self, exponent: f64) -> Sport {
        assert!(exponent.is_finite() && exponent > 0.0);
        Sport { exponent, ..self }
    }

    pub fn score_factor(&self) -> f64 {
        self.score_factor
    }

    pub fn max_score(&self) -> f64 {
        self.max_score
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    /// Maps raw points to scoring opportunities.
    ///
    /// Growth is sub-linear and peaks at half the score factor. Points
    /// beyond the score factor would adjust to a negative value and are
    /// clamped to zero.
    pub fn normalize(&self, points: u32) -> f64 {
        let points = f64::from(points);
        let adjusted = (points - points * points / self.score_factor).max(0.0);
        (adjusted / self.max_score).powf(self.exponent)
    }

    /// The observed outcome of a game from the point of view of the team
    /// that scored `points`.
    ///
    /// A share of the normalized scoring, offset so that `0-0` is a draw,
    /// averaged with a bonus of `1.0` for a win and `0.5` for a tie. The
    /// result is in `0.0..=1.0`, and the two sides of a game always add up
    /// to `1.0`.
    pub fn game_ratio(&self, points: u32, opponent_points: u32) -> Score {
        let first = self.normalize(points);
        let second = self.normalize(opponent_points);
        let share = (first + 1.0) / (first + second + 2.0);
        let bonus = match points.cmp(&opponent_points) {
            std::cmp::Ordering::Greater => 1.0,
            std::cmp::Ordering::Equal => 0.5,
            std::cmp::Ordering::Less => 0.0,
        };
        Score((share + bonus) * 0.5)
    }
}

#[derive(Debug, Error)]
#[error("unknown sport {0:?} (expected generic, football or basketball)")]
pub struct UnknownSport(pub String);

impl FromStr for Sport {
    type Err = UnknownSport;

    fn from_str(s: &str) -> Result<Sport, UnknownSport> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "generic" => Sport::GENERIC,
            "football" => Sport::FOOTBALL,
            "basketball" => Sport::BASKETBALL,
            _ => return Err(UnknownSport(s.to_owned())),
        })
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if *self == Sport::GENERIC {
            f.write_str("generic")
        } else if *self == Sport::FOOTBALL {
            f.write_str("football")
        } else if *self == Sport::BASKETBALL {
            f.write_str("basketball")
        } else {
            write!(
                f,
                "custom(score_factor={}, max_score={}, exponent={})",
                self.score_factor, self.max_score, self.exponent
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn by_hand(points: f64, score_factor: f64, max_score: f64) -> f64 {
        ((points - points * points / score_factor) / max_score).powf(GOLDEN_RATIO)
    }

    #[test]
    fn test_normalize() {
        for points in [1, 6, 12, 35] {
            assert_abs_diff_eq!(
                Sport::FOOTBALL.normalize(points),
                by_hand(f64::from(points), 500.0, 6.0),
                epsilon = 1e-12
            );
        }
        for points in [80, 90, 100] {
            assert_abs_diff_eq!(
                Sport::BASKETBALL.normalize(points),
                by_hand(f64::from(points), 750.0, 3.0),
                epsilon = 1e-9
            );
        }
        assert_eq!(Sport::GENERIC.normalize(0), 0.0);
    }

    #[test]
    fn test_normalize_diminishing_returns() {
        let sport = Sport::new(100.0, 1.0).with_exponent(1.0);
        let first_ten = sport.normalize(10) - sport.normalize(0);
        let next_ten = sport.normalize(20) - sport.normalize(10);
        assert!(next_ten < first_ten);
        assert_eq!(sport.normalize(100), 0.0);
        assert_eq!(sport.normalize(150), 0.0);
    }

    #[test]
    fn test_game_ratio() {
        let a1 = by_hand(1.0, 500.0, 6.0);
        let a2 = by_hand(2.0, 500.0, 6.0);
        assert_abs_diff_eq!(
            Sport::FOOTBALL.game_ratio(1, 2).value(),
            (a1 + 1.0) / (a1 + a2 + 2.0) / 2.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            Sport::FOOTBALL.game_ratio(2, 2).value(),
            ((a2 + 1.0) / (a2 + a2 + 2.0) + 0.5) / 2.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            Sport::FOOTBALL.game_ratio(2, 1).value(),
            ((a2 + 1.0) / (a2 + a1 + 2.0) + 1.0) / 2.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_game_ratio_scoreless_draw() {
        for sport in [Sport::GENERIC, Sport::FOOTBALL, Sport::BASKETBALL] {
            assert_eq!(sport.game_ratio(0, 0), Score::DRAW);
        }
    }

    #[test]
    fn test_game_ratio_complementary() {
        for sport in [Sport::GENERIC, Sport::FOOTBALL, Sport::BASKETBALL] {
            for a in 0..60 {
                for b in 0..60 {
                    let forward = sport.game_ratio(a, b);
                    let backward = sport.game_ratio(b, a);
                    assert_abs_diff_eq!(forward.value() + backward.value(), 1.0, epsilon = 1e-9);
                    assert!((0.0..=1.0).contains(&forward.value()));
                    if a == b {
                        assert_eq!(forward, backward);
                    }
                }
            }
        }
    }

    #[test]
    fn test_winner_beats_loser() {
        let win = Sport::FOOTBALL.game_ratio(3, 0);
        let blowout = Sport::FOOTBALL.game_ratio(56, 0);
        assert!(win.value() > 0.75);
        assert!(blowout > win);
        assert!(blowout.value() < 1.0);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Football".parse::<Sport>().unwrap(), Sport::FOOTBALL);
        assert_eq!(" basketball ".parse::<Sport>().unwrap(), Sport::BASKETBALL);
        assert_eq!("generic".parse::<Sport>().unwrap(), Sport::GENERIC);
        assert!("curling".parse::<Sport>().is_err());
        assert_eq!(Sport::FOOTBALL.to_string(), "football");
    }
}
