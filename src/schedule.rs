use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    standings::{Record, Venue},
    Score, Sport,
};

/// Dense index of a team within a [`Schedule`], in order of first
/// appearance.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TeamId(pub(crate) usize);

impl TeamId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Interns case-normalized team names.
#[derive(Debug, Default, Clone)]
pub(crate) struct TeamIds {
    inner: FxHashMap<Box<str>, TeamId>,
}

impl TeamIds {
    pub fn get_or_insert(&mut self, name: &str) -> (TeamId, bool) {
        let next_id = TeamId(self.inner.len());
        match self.inner.get(name) {
            Some(&id) => (id, false),
            None => {
                self.inner.insert(name.into(), next_id);
                (next_id, true)
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<TeamId> {
        self.inner.get(name).copied()
    }
}

/// Values indexed by [`TeamId`].
#[derive(Debug, Clone)]
pub(crate) struct ByTeamId<T> {
    inner: Vec<T>,
}

impl<T: Clone> ByTeamId<T> {
    pub fn filled(value: T, len: usize) -> ByTeamId<T> {
        ByTeamId {
            inner: vec![value; len],
        }
    }

    pub fn fill(&mut self, value: T) {
        self.inner.fill(value);
    }
}

impl<T> ByTeamId<T> {
    #[inline]
    pub fn get(&self, TeamId(id): TeamId) -> &T {
        &self.inner[id]
    }

    #[inline]
    pub fn get_mut(&mut self, TeamId(id): TeamId) -> &mut T {
        &mut self.inner[id]
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (TeamId, &mut T)> {
        self.inner.iter_mut().enumerate().map(|(i, t)| (TeamId(i), t))
    }
}

/// A game result as delivered by an ingestion layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    /// Carried through for reporting. Not used for ratings.
    pub date: String,
    pub team1: String,
    pub score1: u32,
    pub team2: String,
    pub score2: u32,
    /// Played on neutral ground. Otherwise `team2` is the home team.
    pub neutral: bool,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidGame {
    #[error("missing team name")]
    MissingTeam,
    #[error("team {0:?} cannot play against itself")]
    SameTeam(String),
}

/// A game between two known teams, with its observed outcome.
#[derive(Debug, Clone)]
pub struct Game {
    pub date: String,
    pub first: TeamId,
    pub second: TeamId,
    pub first_points: u32,
    pub second_points: u32,
    pub neutral: bool,
    /// Observed outcome from the point of view of the first team.
    pub ratio: Score,
}

/// A team as known to the schedule: its normalized name and its
/// win/loss/tie record.
#[derive(Debug, Clone)]
pub struct Team {
    pub name: String,
    pub record: Record,
}

/// An ordered list of games, together with every team that appears in it.
///
/// The order of games is significant: it fixes the summation order of the
/// solver and thereby makes ratings reproducible.
#[derive(Debug, Clone)]
pub struct Schedule {
    sport: Sport,
    ids: TeamIds,
    teams: Vec<Team>,
    games: Vec<Game>,
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Schedule {
    pub fn new(sport: Sport) -> Schedule {
        Schedule {
            sport,
            ids: TeamIds::default(),
            teams: Vec::new(),
            games: Vec::new(),
        }
    }

    pub fn from_records<I>(sport: Sport, records: I) -> Result<Schedule, InvalidGame>
    where
        I: IntoIterator<Item = GameRecord>,
    {
        let mut schedule = Schedule::new(sport);
        for record in records {
            schedule.push(record)?;
        }
        Ok(schedule)
    }

    fn team_or_insert(&mut self, name: String) -> TeamId {
        let (id, inserted) = self.ids.get_or_insert(&name);
        if inserted {
            self.teams.push(Team {
                name,
                record: Record::default(),
            });
        }
        id
    }

    /// Appends a game, creating teams on first appearance and updating the
    /// records of both participants.
    pub fn push(&mut self, record: GameRecord) -> Result<&Game, InvalidGame> {
        let first_name = normalize_name(&record.team1);
        let second_name = normalize_name(&record.team2);
        if first_name.is_empty() || second_name.is_empty() {
            return Err(InvalidGame::MissingTeam);
        }
        if first_name == second_name {
            return Err(InvalidGame::SameTeam(first_name));
        }

        let first = self.team_or_insert(first_name);
        let second = self.team_or_insert(second_name);

        let (first_venue, second_venue) = if record.neutral {
            (Venue::Neutral, Venue::Neutral)
        } else {
            (Venue::Away, Venue::Home)
        };
        self.teams[first.0]
            .record
            .update(record.score1, record.score2, first_venue);
        self.teams[second.0]
            .record
            .update(record.score2, record.score1, second_venue);

        self.games.push(Game {
            date: record.date,
            first,
            second,
            first_points: record.score1,
            second_points: record.score2,
            neutral: record.neutral,
            ratio: self.sport.game_ratio(record.score1, record.score2),
        });

        Ok(&self.games[self.games.len() - 1])
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    /// Teams in order of first appearance.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, TeamId(id): TeamId) -> &Team {
        &self.teams[id]
    }

    pub fn team_id(&self, name: &str) -> Option<TeamId> {
        self.ids.get(&normalize_name(name))
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Sum of both scores over all games.
    pub fn total_points(&self) -> u64 {
        self.games
            .iter()
            .map(|g| u64::from(g.first_points) + u64::from(g.second_points))
            .sum()
    }

    /// Average points scored per team per game.
    pub fn average_points_per_team(&self) -> Option<f64> {
        if self.games.is_empty() {
            None
        } else {
            Some(self.total_points() as f64 / self.games.len() as f64 / 2.0)
        }
    }
}
