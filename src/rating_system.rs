use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    schedule::{ByTeamId, GameRecord, InvalidGame, Schedule},
    standings::{Forecast, Standings, TeamRating},
    Power, PowerDifference, Score, Sport,
};

/// Epochs between progress logs.
const PROGRESS_INTERVAL: u32 = 250;

#[derive(Debug, Clone)]
pub struct RatingSystemBuilder {
    sport: Sport,
    kfactor: f64,
    tolerance: f64,
    max_iterations: u32,
    initial_power: f64,
}

impl Default for RatingSystemBuilder {
    fn default() -> RatingSystemBuilder {
        RatingSystemBuilder::new()
    }
}

impl RatingSystemBuilder {
    pub fn new() -> RatingSystemBuilder {
        RatingSystemBuilder {
            sport: Sport::GENERIC,
            kfactor: 10.0,
            tolerance: 1e-9,
            max_iterations: 25_000,
            initial_power: 100.0,
        }
    }

    pub fn sport(&mut self, sport: Sport) -> &mut Self {
        self.sport = sport;
        self
    }

    pub fn kfactor(&mut self, kfactor: f64) -> &mut Self {
        assert!(kfactor.is_finite() && kfactor > 0.0);
        self.kfactor = kfactor;
        self
    }

    pub fn tolerance(&mut self, tolerance: f64) -> &mut Self {
        assert!(tolerance >= 0.0);
        self.tolerance = tolerance;
        self
    }

    pub fn max_iterations(&mut self, max_iterations: u32) -> &mut Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn initial_power(&mut self, initial_power: f64) -> &mut Self {
        assert!(initial_power.is_finite());
        self.initial_power = initial_power;
        self
    }

    pub fn build(&self) -> RatingSystem {
        RatingSystem {
            sport: self.sport,
            kfactor: self.kfactor,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            initial_power: Power(self.initial_power),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolveError {
    #[error("team {team:?} has no games played")]
    NoGamesPlayed { team: String },
    #[error("power of team {team:?} is no longer finite after epoch {epoch}")]
    NonFinitePower { team: String, epoch: u32 },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ComputeError {
    #[error("invalid game #{index}: {source}")]
    InvalidGame {
        index: usize,
        #[source]
        source: InvalidGame,
    },
    #[error(transparent)]
    Solve(#[from] SolveError),
}

/// Predicted outcome for the first team, given both powers.
///
/// A logistic curve: a power gap of `kfactor` corresponds to odds of
/// 10 to 1.
pub fn expected_score(first: Power, second: Power, kfactor: f64) -> Score {
    let PowerDifference(gap) = second - first;
    Score(1.0 / (1.0 + 10f64.powf(gap / kfactor)))
}

/// Parameters of the iterative power rating model.
#[derive(Debug, Clone)]
pub struct RatingSystem {
    sport: Sport,
    kfactor: f64,
    tolerance: f64,
    max_iterations: u32,
    initial_power: Power,
}

impl Default for RatingSystem {
    fn default() -> RatingSystem {
        RatingSystem::new()
    }
}

impl RatingSystem {
    pub fn builder() -> RatingSystemBuilder {
        RatingSystemBuilder::default()
    }

    pub fn new() -> RatingSystem {
        RatingSystem::builder().build()
    }

    pub fn sport(&self) -> Sport {
        self.sport
    }

    pub fn kfactor(&self) -> f64 {
        self.kfactor
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn initial_power(&self) -> Power {
        self.initial_power
    }

    pub fn expected_score(&self, first: Power, second: Power) -> Score {
        expected_score(first, second, self.kfactor)
    }

    /// Builds a schedule for this system's sport and solves it.
    pub fn compute_ratings<I>(&self, records: I) -> Result<Standings, ComputeError>
    where
        I: IntoIterator<Item = GameRecord>,
    {
        let mut schedule = Schedule::new(self.sport);
        for (index, record) in records.into_iter().enumerate() {
            schedule
                .push(record)
                .map_err(|source| ComputeError::InvalidGame { index, source })?;
        }
        Ok(self.solve(&schedule)?)
    }

    /// Iterates power ratings until the expected results they predict are
    /// consistent with the observed game ratios.
    ///
    /// Each epoch compares every game's observed ratio with the result
    /// expected from the powers as they stood at the start of the epoch,
    /// accumulating the residuals per team. Only after the whole schedule
    /// has been processed is each power moved by `kfactor` times its mean
    /// residual.
    ///
    /// Convergence is judged on the aggregate residual
    /// `sum(max(|d1|, |d2|))` over all games, turned into a standard
    /// deviation; the solve stops once that changes by less than the
    /// tolerance (squared difference) between consecutive epochs.
    ///
    /// Ratings are always computed against the schedule's own sport
    /// ratios; the system's sport only matters for
    /// [`RatingSystem::compute_ratings`].
    pub fn solve(&self, schedule: &Schedule) -> Result<Standings, SolveError> {
        let teams = schedule.teams();
        let games = schedule.games();

        let mut games_played = ByTeamId::filled(0.0, teams.len());
        for (id, played) in games_played.iter_mut() {
            let team = schedule.team(id);
            match team.record.games_played() {
                0 => {
                    return Err(SolveError::NoGamesPlayed {
                        team: team.name.clone(),
                    })
                }
                n => *played = f64::from(n),
            }
        }

        let mut powers = ByTeamId::filled(self.initial_power, teams.len());
        let mut accum = ByTeamId::filled(0.0, teams.len());

        let mut iterations = 0;
        let mut prev_std_dev = 1.0;

        while !games.is_empty() && iterations < self.max_iterations {
            accum.fill(0.0);
            let mut residual = 0.0;

            for game in games {
                let expected =
                    self.expected_score(*powers.get(game.first), *powers.get(game.second));
                let first_delta = game.ratio - expected;
                let second_delta = game.ratio.opposite() - expected.opposite();
                *accum.get_mut(game.first) += first_delta;
                *accum.get_mut(game.second) += second_delta;
                residual += f64::max(first_delta.abs(), second_delta.abs());
            }

            let std_dev = (residual * residual / games.len() as f64).sqrt();
            let diff = (prev_std_dev - std_dev).powi(2);
            prev_std_dev = std_dev;

            for (id, power) in powers.iter_mut() {
                *power += self.kfactor * PowerDifference(*accum.get(id) / *games_played.get(id));
                if !power.is_finite() {
                    return Err(SolveError::NonFinitePower {
                        team: schedule.team(id).name.clone(),
                        epoch: iterations,
                    });
                }
            }

            iterations += 1;

            if iterations % PROGRESS_INTERVAL == 0 {
                debug!(iterations, std_dev, diff, "game ratio standard deviation");
            }
            if diff < self.tolerance {
                break;
            }
        }

        // Stopping on the last permitted epoch still counts as hitting the cap.
        let converged = games.is_empty() || iterations < self.max_iterations;

        if converged {
            info!(iterations, games = games.len(), "ratings converged");
        } else {
            warn!(
                iterations,
                tolerance = self.tolerance,
                "game ratios did not converge within the iteration cap"
            );
        }

        Ok(Standings::new(
            collect_ratings(schedule, &powers),
            iterations,
            converged,
            forecast(schedule, &powers),
        ))
    }
}

fn collect_ratings(schedule: &Schedule, powers: &ByTeamId<Power>) -> Vec<TeamRating> {
    let mut opponent_power = ByTeamId::filled(0.0, schedule.teams().len());
    for game in schedule.games() {
        *opponent_power.get_mut(game.first) += f64::from(*powers.get(game.second));
        *opponent_power.get_mut(game.second) += f64::from(*powers.get(game.first));
    }

    let mut ratings = Vec::with_capacity(schedule.teams().len());
    for (id, total) in opponent_power.iter_mut() {
        let team = schedule.team(id);
        ratings.push(TeamRating {
            name: team.name.clone(),
            record: team.record,
            power: *powers.get(id),
            schedule_strength: Power(*total / f64::from(team.record.games_played())),
        });
    }
    ratings
}

fn forecast(schedule: &Schedule, powers: &ByTeamId<Power>) -> Forecast {
    let mut forecast = Forecast::default();
    for game in schedule.games() {
        let first = *powers.get(game.first);
        let second = *powers.get(game.second);
        let hit = (first > second && game.first_points > game.second_points)
            || (second > first && game.second_points > game.first_points);
        if hit {
            forecast.hits += 1;
        } else {
            forecast.misses += 1;
        }
    }
    forecast
}
