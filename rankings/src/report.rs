use std::{
    cmp::Reverse,
    io::{self, Write},
};

use ordered_float::OrderedFloat;
use powerrank::{Forecast, Power, Schedule, Split, Standings, TeamRating};
use serde::Serialize;

/// Competition ranks ("1224") of values sorted in descending order.
fn competition_places(sorted: &[Power]) -> Vec<usize> {
    let mut places = Vec::with_capacity(sorted.len());
    for (i, value) in sorted.iter().enumerate() {
        let place = match i.checked_sub(1) {
            Some(prev) if sorted[prev] == *value => places[prev],
            _ => i + 1,
        };
        places.push(place);
    }
    places
}

/// Competition ranks ("1224"): teams with equal power share a place.
pub fn places(ranked: &[&TeamRating]) -> Vec<usize> {
    competition_places(&ranked.iter().map(|t| t.power).collect::<Vec<_>>())
}

/// Place of each team by strength of schedule, toughest first, in the
/// order the teams are given. Equal strengths share a place.
pub fn schedule_places(teams: &[&TeamRating]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..teams.len()).collect();
    order.sort_by_key(|&i| Reverse(OrderedFloat(f64::from(teams[i].schedule_strength))));
    let sorted: Vec<Power> = order.iter().map(|&i| teams[i].schedule_strength).collect();

    let mut places = vec![0; teams.len()];
    for (i, place) in order.into_iter().zip(competition_places(&sorted)) {
        places[i] = place;
    }
    places
}

fn won_lost_tied(split: &Split) -> String {
    format!("{}-{}-{}", split.won, split.lost, split.tied)
}

pub fn write_summary<W: Write>(mut writer: W, schedule: &Schedule) -> io::Result<()> {
    writeln!(writer, "The total number of games played is {}", schedule.len())?;
    writeln!(
        writer,
        "The total number of points scored is {}",
        schedule.total_points()
    )?;
    if let Some(average) = schedule.average_points_per_team() {
        writeln!(
            writer,
            "The average number of points scored per team per game is {average:.3}"
        )?;
    }
    Ok(())
}

pub fn write_table<W: Write>(mut writer: W, standings: &Standings) -> io::Result<()> {
    if !standings.converged() {
        writeln!(
            writer,
            "# Ratings did not converge after {} iterations",
            standings.iterations()
        )?;
    }
    writeln!(
        writer,
        "{:>4} {:40} {:>4} {:>5} {:>5} {:>5} {:>5} {:>8} {:>8} {:>5} {:>8} {:>8}",
        "Rank", "", "Won", "Lost", "Tied", "PF", "PA", "Rating", "SOS", "SOSRk", "Home", "Away"
    )?;

    let ranked = standings.ranked();
    let sos_places = schedule_places(&ranked);
    for ((place, sos_place), team) in places(&ranked).into_iter().zip(sos_places).zip(&ranked) {
        writeln!(
            writer,
            "{:4} {:40} {:4} {:5} {:5} {:5} {:5} {:8.3} {:8.3} {:5} {:>8} {:>8}",
            place,
            team.name.to_uppercase(),
            team.record.won,
            team.record.lost,
            team.record.tied,
            team.record.points_for,
            team.record.points_against,
            f64::from(team.power),
            f64::from(team.schedule_strength),
            sos_place,
            won_lost_tied(&team.record.home),
            won_lost_tied(&team.record.away),
        )?;
    }
    Ok(())
}

pub fn write_forecast<W: Write>(mut writer: W, forecast: Forecast) -> io::Result<()> {
    match forecast.accuracy() {
        Some(accuracy) => writeln!(
            writer,
            "Computer performance: {}-{} {accuracy:.3}",
            forecast.hits, forecast.misses
        ),
        None => Ok(()),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CsvRow<'a> {
    rank: usize,
    team: &'a str,
    won: u32,
    lost: u32,
    tied: u32,
    #[serde(rename = "PF")]
    pf: u64,
    #[serde(rename = "PA")]
    pa: u64,
    rating: String,
    #[serde(rename = "SOS")]
    sos: String,
    #[serde(rename = "SOSRank")]
    sos_rank: usize,
    home_won: u32,
    home_lost: u32,
    home_tied: u32,
    #[serde(rename = "HomePF")]
    home_pf: u64,
    #[serde(rename = "HomePA")]
    home_pa: u64,
    away_won: u32,
    away_lost: u32,
    away_tied: u32,
    #[serde(rename = "AwayPF")]
    away_pf: u64,
    #[serde(rename = "AwayPA")]
    away_pa: u64,
}

pub fn write_csv<W: Write>(writer: W, standings: &Standings) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    let ranked = standings.ranked();
    let sos_places = schedule_places(&ranked);
    for ((place, sos_rank), team) in places(&ranked).into_iter().zip(sos_places).zip(&ranked) {
        let name = team.name.to_uppercase();
        let (home, away) = (team.record.home, team.record.away);
        writer.serialize(CsvRow {
            rank: place,
            team: &name,
            won: team.record.won,
            lost: team.record.lost,
            tied: team.record.tied,
            pf: team.record.points_for,
            pa: team.record.points_against,
            rating: format!("{:.3}", f64::from(team.power)),
            sos: format!("{:.3}", f64::from(team.schedule_strength)),
            sos_rank,
            home_won: home.won,
            home_lost: home.lost,
            home_tied: home.tied,
            home_pf: home.points_for,
            home_pa: home.points_against,
            away_won: away.won,
            away_lost: away.lost,
            away_tied: away.tied,
            away_pf: away.points_for,
            away_pa: away.points_against,
        })?;
    }
    writer.flush()?;
    Ok(())
}
