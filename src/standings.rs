use std::cmp::{Ordering, Reverse};

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

use crate::Power;

/// Where a team played a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Venue {
    Home,
    Away,
    Neutral,
}

/// Home or away part of a [`Record`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Split {
    pub won: u32,
    pub lost: u32,
    pub tied: u32,
    pub points_for: u64,
    pub points_against: u64,
}

impl Split {
    fn update(&mut self, points: u32, opponent_points: u32) {
        self.points_for += u64::from(points);
        self.points_against += u64::from(opponent_points);
        match points.cmp(&opponent_points) {
            Ordering::Greater => self.won += 1,
            Ordering::Less => self.lost += 1,
            Ordering::Equal => self.tied += 1,
        }
    }

    pub fn games_played(&self) -> u32 {
        self.won + self.lost + self.tied
    }
}

/// Win/loss/tie record and points for and against, overall and split by
/// venue. Games on neutral ground only count towards the overall figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Record {
    pub won: u32,
    pub lost: u32,
    pub tied: u32,
    pub points_for: u64,
    pub points_against: u64,
    pub home: Split,
    pub away: Split,
}

impl Record {
    /// Records a single game from this team's point of view.
    pub fn update(&mut self, points: u32, opponent_points: u32, venue: Venue) {
        self.points_for += u64::from(points);
        self.points_against += u64::from(opponent_points);
        match points.cmp(&opponent_points) {
            Ordering::Greater => self.won += 1,
            Ordering::Less => self.lost += 1,
            Ordering::Equal => self.tied += 1,
        }
        match venue {
            Venue::Home => self.home.update(points, opponent_points),
            Venue::Away => self.away.update(points, opponent_points),
            Venue::Neutral => (),
        }
    }

    pub fn games_played(&self) -> u32 {
        self.won + self.lost + self.tied
    }
}

/// Final rating of a single team.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamRating {
    pub name: String,
    pub record: Record,
    pub power: Power,
    /// Average final power of the opponents faced.
    pub schedule_strength: Power,
}

/// How often the final ratings pick the winner of a game in the schedule
/// they were computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Forecast {
    /// Games won by the team with the strictly higher power.
    pub hits: u32,
    /// Upsets, ties and games between equally rated teams.
    pub misses: u32,
}

impl Forecast {
    pub fn accuracy(&self) -> Option<f64> {
        let total = self.hits + self.misses;
        if total == 0 {
            None
        } else {
            Some(f64::from(self.hits) / f64::from(total))
        }
    }
}

/// Solver output: every team of the schedule in order of first
/// appearance, with the convergence outcome of the run.
#[derive(Debug, Clone)]
pub struct Standings {
    teams: Vec<TeamRating>,
    by_name: FxHashMap<String, usize>,
    iterations: u32,
    converged: bool,
    forecast: Forecast,
}

impl Standings {
    pub(crate) fn new(
        teams: Vec<TeamRating>,
        iterations: u32,
        converged: bool,
        forecast: Forecast,
    ) -> Standings {
        let by_name = teams
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.clone(), i))
            .collect();
        Standings {
            teams,
            by_name,
            iterations,
            converged,
            forecast,
        }
    }

    /// Number of epochs the solver ran.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// `true` if the solve stopped in fewer epochs than the iteration cap.
    /// Meeting the tolerance on the last permitted epoch still reports
    /// `false`. The ratings are the ones from the last epoch either way.
    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn forecast(&self) -> Forecast {
        self.forecast
    }

    /// Looks up a team by name, ignoring case and surrounding whitespace.
    pub fn get(&self, name: &str) -> Option<&TeamRating> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(|&i| &self.teams[i])
    }

    /// Teams in order of first appearance in the schedule.
    pub fn iter(&self) -> impl Iterator<Item = &TeamRating> {
        self.teams.iter()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Teams by descending power. Teams with exactly equal power keep
    /// their order of first appearance.
    pub fn ranked(&self) -> Vec<&TeamRating> {
        let mut ranked: Vec<&TeamRating> = self.teams.iter().collect();
        ranked.sort_by_key(|t| Reverse(OrderedFloat(f64::from(t.power))));
        ranked
    }
}

impl<'a> IntoIterator for &'a Standings {
    type Item = &'a TeamRating;
    type IntoIter = std::slice::Iter<'a, TeamRating>;

    fn into_iter(self) -> Self::IntoIter {
        self.teams.iter()
    }
}
