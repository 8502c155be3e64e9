use powerrank::{RatingSystem, Schedule, Sport};
use powerrank_rankings::{
    history::{HistoryFormat, HistoryReader, LoadPolicy},
    report,
};

const SEASON: &str = include_str!("../../tests/data/synthetic_season.txt");

fn season() -> Schedule {
    let mut schedule = Schedule::new(Sport::FOOTBALL);
    let stats = HistoryReader::new(HistoryFormat::Pipe, SEASON.as_bytes())
        .unwrap()
        .load_into(&mut schedule, LoadPolicy::Strict)
        .unwrap();
    assert_eq!(stats.games, 88);
    assert_eq!(stats.skipped, 0);
    schedule
}

fn solve(schedule: &Schedule) -> powerrank::Standings {
    RatingSystem::builder()
        .sport(Sport::FOOTBALL)
        .build()
        .solve(schedule)
        .unwrap()
}

#[test]
fn test_summary() {
    let mut out = Vec::new();
    report::write_summary(&mut out, &season()).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "The total number of games played is 88\n\
         The total number of points scored is 3647\n\
         The average number of points scored per team per game is 20.722\n"
    );
}

#[test]
fn test_table() {
    let schedule = season();
    let standings = solve(&schedule);

    let mut out = Vec::new();
    report::write_table(&mut out, &standings).unwrap();
    let out = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines.len(), 23);
    assert!(lines[0].starts_with("Rank "));
    assert!(lines[0].ends_with("Rating      SOS SOSRk     Home     Away"));
    assert_eq!(
        lines[1],
        format!(
            "{:4} {:40} {:4} {:5} {:5} {:5} {:5} {:8.3} {:8.3} {:5} {:>8} {:>8}",
            1, "NORWICH", 8, 0, 0, 291, 13, 115.224, 97.448, 21, "4-0-0", "4-0-0"
        )
    );
    assert!(lines[22].starts_with("  22 WABASH "));
    assert!(lines[22].ends_with("   19    0-6-0    0-1-1"));
}

#[test]
fn test_csv() {
    let standings = solve(&season());

    let mut out = Vec::new();
    report::write_csv(&mut out, &standings).unwrap();
    let out = String::from_utf8(out).unwrap();
    let mut lines = out.lines();

    assert_eq!(
        lines.next(),
        Some(
            "Rank,Team,Won,Lost,Tied,PF,PA,Rating,SOS,SOSRank,\
             HomeWon,HomeLost,HomeTied,HomePF,HomePA,\
             AwayWon,AwayLost,AwayTied,AwayPF,AwayPA"
        )
    );
    assert_eq!(
        lines.next(),
        Some("1,NORWICH,8,0,0,291,13,115.224,97.448,21,4,0,0,143,12,4,0,0,148,1")
    );
    assert_eq!(lines.count(), 21);
}

#[test]
fn test_forecast_line() {
    let standings = solve(&season());
    let mut out = Vec::new();
    report::write_forecast(&mut out, standings.forecast()).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Computer performance: 78-10 0.886\n"
    );
}

#[test]
fn test_shared_places() {
    let mut schedule = Schedule::new(Sport::GENERIC);
    for (team1, team2) in [("a", "b"), ("c", "d")] {
        schedule
            .push(powerrank::GameRecord {
                date: String::new(),
                team1: team1.to_owned(),
                score1: 3,
                team2: team2.to_owned(),
                score2: 1,
                neutral: false,
            })
            .unwrap();
    }
    let standings = RatingSystem::new().solve(&schedule).unwrap();
    let ranked = standings.ranked();
    let names: Vec<&str> = ranked.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["a", "c", "b", "d"]);
    assert_eq!(report::places(&ranked), [1, 1, 3, 3]);
    // The losers faced the winners, the toughest opposition there is.
    assert_eq!(report::schedule_places(&ranked), [3, 3, 1, 1]);
    assert_eq!(ranked[0].record.away.won, 1);
    assert_eq!(ranked[2].record.home.lost, 1);
}

#[test]
fn test_neutral_site_columns() {
    let data = "1979-09-08|Wagner|21|Hofstra|7|n\n1979-09-15|Hofstra|10|Wagner|3\n";
    let mut schedule = Schedule::new(Sport::FOOTBALL);
    HistoryReader::new(HistoryFormat::Pipe, data.as_bytes())
        .unwrap()
        .load_into(&mut schedule, LoadPolicy::Strict)
        .unwrap();
    let standings = RatingSystem::builder()
        .sport(Sport::FOOTBALL)
        .build()
        .solve(&schedule)
        .unwrap();

    let mut out = Vec::new();
    report::write_csv(&mut out, &standings).unwrap();
    let out = String::from_utf8(out).unwrap();
    let rows: Vec<Vec<&str>> = out.lines().skip(1).map(|l| l.split(',').collect()).collect();
    assert_eq!(rows.len(), 2);
    for row in rows {
        // Only the second game counts towards the split.
        let (home, away) = (&row[10..15], &row[15..20]);
        match row[1] {
            "WAGNER" => {
                assert_eq!(home, ["0", "1", "0", "3", "10"]);
                assert_eq!(away, ["0", "0", "0", "0", "0"]);
            }
            "HOFSTRA" => {
                assert_eq!(home, ["0", "0", "0", "0", "0"]);
                assert_eq!(away, ["1", "0", "0", "10", "3"]);
            }
            other => panic!("unexpected team {other}"),
        }
    }
}
