use std::{io, str::FromStr};

use powerrank::{GameRecord, InvalidGame, Schedule};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// One row of game history, as found in the input file.
#[derive(Deserialize, Debug)]
struct RawHistory {
    date: String,
    team1: String,
    score1: u32,
    team2: String,
    score2: u32,
    /// `0` or `n` for a neutral site. Anything else, or nothing, makes
    /// `team2` the home team.
    #[serde(default)]
    location: Option<String>,
}

impl RawHistory {
    fn into_record(self) -> GameRecord {
        let neutral = matches!(
            self.location.as_deref().and_then(|l| l.chars().next()),
            Some('0' | 'n' | 'N')
        );
        GameRecord {
            date: self.date,
            team1: self.team1,
            score1: self.score1,
            team2: self.team2,
            score2: self.score2,
            neutral,
        }
    }
}

/// Layout of a history file.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum HistoryFormat {
    /// Comma separated, with a header row naming the columns `date`,
    /// `team1`, `score1`, `team2`, `score2` and optionally `location` in
    /// any order.
    #[default]
    Csv,
    /// Pipe separated, without header row, columns in the order
    /// `date|team1|score1|team2|score2`, optionally followed by `|location`.
    Pipe,
}

#[derive(Debug, Error)]
#[error("unsupported delimiter {0:?} (expected ',' or '|')")]
pub struct InvalidFormat(String);

impl FromStr for HistoryFormat {
    type Err = InvalidFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "," | "csv" => HistoryFormat::Csv,
            "|" | "pipe" => HistoryFormat::Pipe,
            _ => return Err(InvalidFormat(s.to_owned())),
        })
    }
}

#[derive(Debug, Error)]
pub enum InvalidHistory {
    #[error("line {line}: {source}")]
    Malformed {
        line: u64,
        #[source]
        source: csv::Error,
    },
    #[error("line {line}: {source}")]
    InvalidGame {
        line: u64,
        #[source]
        source: InvalidGame,
    },
    #[error("could not read history: {0}")]
    Io(#[from] csv::Error),
}

/// What to do about a record that cannot be used.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum LoadPolicy {
    /// Log and count the record, then carry on.
    #[default]
    Skip,
    /// Fail on the first bad record.
    Strict,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub games: u64,
    pub skipped: u64,
}

pub struct HistoryReader<R> {
    inner: csv::Reader<R>,
    headers: Option<csv::StringRecord>,
}

impl<R: io::Read> HistoryReader<R> {
    pub fn new(format: HistoryFormat, reader: R) -> Result<HistoryReader<R>, InvalidHistory> {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .flexible(true);
        match format {
            HistoryFormat::Csv => builder.has_headers(true),
            HistoryFormat::Pipe => builder.has_headers(false).delimiter(b'|'),
        };

        let mut inner = builder.from_reader(reader);
        let headers = match format {
            HistoryFormat::Csv => Some(inner.headers()?.clone()),
            HistoryFormat::Pipe => None,
        };
        Ok(HistoryReader { inner, headers })
    }

    /// Game records in file order. Errors are per record, except for I/O
    /// failures of the underlying reader.
    pub fn records(&mut self) -> impl Iterator<Item = Result<GameRecord, InvalidHistory>> + '_ {
        self.entries().map(|entry| entry.map(|(_, record)| record))
    }

    fn entries(&mut self) -> impl Iterator<Item = Result<(u64, GameRecord), InvalidHistory>> + '_ {
        let headers = self.headers.as_ref();
        self.inner.records().map(move |record| {
            let record = record.map_err(|err| match err.position().map(|p| p.line()) {
                Some(line) => InvalidHistory::Malformed { line, source: err },
                None => InvalidHistory::Io(err),
            })?;
            let line = record.position().map_or(0, |p| p.line());
            record
                .deserialize::<RawHistory>(headers)
                .map(|raw| (line, raw.into_record()))
                .map_err(|source| InvalidHistory::Malformed { line, source })
        })
    }

    /// Appends every usable record to the schedule.
    pub fn load_into(
        &mut self,
        schedule: &mut Schedule,
        policy: LoadPolicy,
    ) -> Result<LoadStats, InvalidHistory> {
        let mut stats = LoadStats::default();
        for entry in self.entries() {
            let result = entry.and_then(|(line, record)| {
                schedule
                    .push(record)
                    .map(|_| ())
                    .map_err(|source| InvalidHistory::InvalidGame { line, source })
            });
            match result {
                Ok(()) => stats.games += 1,
                Err(err @ InvalidHistory::Io(_)) => return Err(err),
                Err(err) if policy == LoadPolicy::Strict => return Err(err),
                Err(err) => {
                    warn!("skipping record: {err}");
                    stats.skipped += 1;
                }
            }
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use powerrank::Sport;

    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("|".parse::<HistoryFormat>().unwrap(), HistoryFormat::Pipe);
        assert_eq!(",".parse::<HistoryFormat>().unwrap(), HistoryFormat::Csv);
        assert!(";".parse::<HistoryFormat>().is_err());
    }

    #[test]
    fn test_csv_columns_in_any_order() {
        let data = "team2,score2,date,team1,score1\nHofstra,7,1979-09-08,Wagner,21\n";
        let mut reader = HistoryReader::new(HistoryFormat::Csv, data.as_bytes()).unwrap();
        let records: Vec<_> = reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(
            records,
            [GameRecord {
                date: "1979-09-08".to_owned(),
                team1: "Wagner".to_owned(),
                score1: 21,
                team2: "Hofstra".to_owned(),
                score2: 7,
                neutral: false,
            }]
        );
    }

    #[test]
    fn test_location_column() {
        let data = "\
1979-09-08|Wagner|21|Hofstra|7|n
1979-09-08|Alfred|3|Ithaca|10|0
1979-09-15|Hofstra|14|Alfred|14|h
1979-09-15|Ithaca|24|Wagner|17
";
        let mut reader = HistoryReader::new(HistoryFormat::Pipe, data.as_bytes()).unwrap();
        let neutral: Vec<bool> = reader
            .records()
            .map(|record| record.unwrap().neutral)
            .collect();
        assert_eq!(neutral, [true, true, false, false]);

        let data = "date,team1,score1,team2,score2,location\n1979-09-08,Wagner,21,Hofstra,7,N\n";
        let mut schedule = Schedule::new(Sport::FOOTBALL);
        HistoryReader::new(HistoryFormat::Csv, data.as_bytes())
            .unwrap()
            .load_into(&mut schedule, LoadPolicy::Strict)
            .unwrap();
        let hofstra = &schedule.teams()[1].record;
        assert_eq!(hofstra.lost, 1);
        assert_eq!(hofstra.home.games_played(), 0);
    }

    #[test]
    fn test_pipe_format() {
        let data = "# week 1\n1979-09-08|Wagner |21| Hofstra|7\n\n1979-09-15|Alfred|3|Ithaca|10\n";
        let mut reader = HistoryReader::new(HistoryFormat::Pipe, data.as_bytes()).unwrap();
        let records: Vec<_> = reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].team1, "Wagner");
        assert_eq!(records[0].team2, "Hofstra");
        assert_eq!(records[1].score2, 10);
    }

    #[test]
    fn test_skip_malformed() {
        let data = "\
1979-09-08|Wagner|21|Hofstra|7
1979-09-08|Alfred|three|Ithaca|10
1979-09-08|Cornell|-3|Yale|10
1979-09-15|Hofstra|14|hofstra|14
1979-09-15|Ithaca|24|Wagner|17
";
        let mut schedule = Schedule::new(Sport::FOOTBALL);
        let stats = HistoryReader::new(HistoryFormat::Pipe, data.as_bytes())
            .unwrap()
            .load_into(&mut schedule, LoadPolicy::Skip)
            .unwrap();
        assert_eq!(stats, LoadStats { games: 2, skipped: 3 });
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.teams().len(), 3);
    }

    #[test]
    fn test_strict_fails_on_first_bad_record() {
        let data = "1979-09-08|Wagner|21|Hofstra|7\n1979-09-08|Alfred|x|Ithaca|10\n";
        let mut schedule = Schedule::new(Sport::FOOTBALL);
        let err = HistoryReader::new(HistoryFormat::Pipe, data.as_bytes())
            .unwrap()
            .load_into(&mut schedule, LoadPolicy::Strict)
            .unwrap_err();
        assert!(matches!(err, InvalidHistory::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_missing_team_rejected() {
        let data = "1979-09-08||21|Hofstra|7\n";
        let mut schedule = Schedule::new(Sport::FOOTBALL);
        let err = HistoryReader::new(HistoryFormat::Pipe, data.as_bytes())
            .unwrap()
            .load_into(&mut schedule, LoadPolicy::Strict)
            .unwrap_err();
        assert!(matches!(
            err,
            InvalidHistory::InvalidGame {
                source: InvalidGame::MissingTeam,
                ..
            }
        ));
    }
}
