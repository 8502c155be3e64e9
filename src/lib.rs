//! Power ratings for teams, computed from nothing but the final scores of
//! the games they played.
//!
//! Each game is turned into an observed *game ratio*: a share of the
//! normalized scoring plus a bonus for the winner, so that the margin of
//! victory counts, but with diminishing returns for running up the score.
//! Powers are then iterated until the results predicted by a logistic model
//! of the power difference agree with the observed ratios across the whole
//! schedule.
//!
//! ```
//! use powerrank::{GameRecord, RatingSystem, Sport};
//!
//! let games = [
//!     ("wagner", 21, "hofstra", 7),
//!     ("hofstra", 14, "alfred", 10),
//!     ("alfred", 3, "wagner", 10),
//! ]
//! .into_iter()
//! .map(|(team1, score1, team2, score2)| GameRecord {
//!     date: String::new(),
//!     team1: team1.to_owned(),
//!     score1,
//!     team2: team2.to_owned(),
//!     score2,
//!     neutral: false,
//! });
//!
//! let standings = RatingSystem::builder()
//!     .sport(Sport::FOOTBALL)
//!     .build()
//!     .compute_ratings(games)?;
//!
//! assert!(standings.converged());
//! assert_eq!(standings.ranked()[0].name, "wagner");
//! # Ok::<_, powerrank::ComputeError>(())
//! ```

mod rating;
mod rating_system;
mod schedule;
mod score;
mod sport;
mod standings;

pub use rating::{Power, PowerDifference};
pub use rating_system::{
    expected_score, ComputeError, RatingSystem, RatingSystemBuilder, SolveError,
};
pub use schedule::{Game, GameRecord, InvalidGame, Schedule, Team, TeamId};
pub use score::Score;
pub use sport::{Sport, UnknownSport};
pub use standings::{Forecast, Record, Split, Standings, TeamRating, Venue};

/// Observed outcome of a game for the team that scored `points`.
///
/// See [`Sport::game_ratio`].
pub fn game_ratio(points: u32, opponent_points: u32, sport: &Sport) -> Score {
    sport.game_ratio(points, opponent_points)
}

/// Solves a schedule in one call.
///
/// Equivalent to building a [`RatingSystem`] with the given parameters and
/// calling [`RatingSystem::compute_ratings`].
pub fn compute_ratings<I>(
    records: I,
    sport: Sport,
    kfactor: f64,
    tolerance: f64,
    max_iterations: u32,
) -> Result<Standings, ComputeError>
where
    I: IntoIterator<Item = GameRecord>,
{
    RatingSystem::builder()
        .sport(sport)
        .kfactor(kfactor)
        .tolerance(tolerance)
        .max_iterations(max_iterations)
        .build()
        .compute_ratings(records)
}
