#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use powerrank::{GameRecord, RatingSystem, Sport};

#[derive(Arbitrary, Debug)]
struct ArbitraryGame {
    first: u8,
    second: u8,
    first_points: u16,
    second_points: u16,
    neutral: bool,
}

#[derive(Arbitrary, Debug)]
struct ArbitrarySchedule {
    sport: u8,
    kfactor: u8,
    games: Vec<ArbitraryGame>,
}

impl ArbitrarySchedule {
    fn sport(&self) -> Sport {
        match self.sport % 3 {
            0 => Sport::GENERIC,
            1 => Sport::FOOTBALL,
            _ => Sport::BASKETBALL,
        }
    }

    fn records(&self) -> Vec<GameRecord> {
        self.games
            .iter()
            .take(64)
            .filter(|game| game.first % 16 != game.second % 16)
            .map(|game| GameRecord {
                date: String::new(),
                team1: format!("team{}", game.first % 16),
                score1: u32::from(game.first_points),
                team2: format!("team{}", game.second % 16),
                score2: u32::from(game.second_points),
                neutral: game.neutral,
            })
            .collect()
    }
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(schedule) = ArbitrarySchedule::arbitrary(&mut u) else {
        return;
    };

    let sport = schedule.sport();
    for game in &schedule.games {
        let points = u32::from(game.first_points);
        let opponent_points = u32::from(game.second_points);
        let forward = sport.game_ratio(points, opponent_points).value();
        let backward = sport.game_ratio(opponent_points, points).value();
        assert!((0.0..=1.0).contains(&forward));
        assert!((forward + backward - 1.0).abs() < 1e-9);
    }

    let standings = RatingSystem::builder()
        .sport(sport)
        .kfactor(f64::from(schedule.kfactor.max(1)))
        .max_iterations(2_000)
        .build()
        .compute_ratings(schedule.records())
        .expect("valid schedule");

    assert!(standings.iterations() <= 2_000);
    for team in &standings {
        assert!(team.power.is_finite());
        assert!(team.schedule_strength.is_finite());
        let record = team.record;
        assert!(record.home.games_played() + record.away.games_played() <= record.games_played());
    }
});
