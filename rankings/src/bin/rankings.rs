use std::{
    error::Error as StdError,
    fs::File,
    io,
    io::{BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use clap::Parser as _;
use powerrank::{RatingSystem, Schedule, Sport};
use powerrank_rankings::{
    history::{HistoryFormat, HistoryReader, LoadPolicy},
    report,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Power rankings computed from game scores.
///
/// Each input row is a game: date, team1, score1, team2, score2 and an
/// optional location, `0` or `n` for a neutral site. All input files are
/// read into a single schedule.
#[derive(clap::Parser)]
#[command(name = "rankings", version, about)]
struct Opt {
    /// Score normalization: generic, football or basketball
    #[arg(long, env = "POWERRANK_SPORT", default_value = "generic")]
    sport: Sport,
    /// Field delimiter: ',' for CSV with a header row, '|' for headerless
    /// pipe-delimited rows
    #[arg(short = 'd', long, env = "POWERRANK_DELIMITER", default_value = ",")]
    delimiter: HistoryFormat,
    /// Steepness of the expected result curve and size of each update
    #[arg(long, env = "POWERRANK_KFACTOR", default_value = "10")]
    kfactor: f64,
    #[arg(long, env = "POWERRANK_TOLERANCE", default_value = "1e-9")]
    tolerance: f64,
    #[arg(long, env = "POWERRANK_MAX_ITERATIONS", default_value = "25000")]
    max_iterations: u32,
    /// Power every team starts from
    #[arg(long, env = "POWERRANK_INITIAL_POWER", default_value = "100")]
    initial_power: f64,
    /// Write the rankings table to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
    /// CSV export path. Defaults to the output path with a .csv extension,
    /// or rankings.csv
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Fail on the first malformed record instead of skipping it
    #[arg(long)]
    strict: bool,
    /// Files with game history
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

impl Opt {
    fn csv_path(&self) -> PathBuf {
        match (&self.csv, &self.output) {
            (Some(csv), _) => csv.clone(),
            (None, Some(output)) => output.with_extension("csv"),
            (None, None) => PathBuf::from("rankings.csv"),
        }
    }

    fn validate(&self) -> Result<(), String> {
        if !(self.kfactor.is_finite() && self.kfactor > 0.0) {
            return Err(format!("kfactor must be positive, got {}", self.kfactor));
        }
        if !(self.tolerance >= 0.0) {
            return Err(format!("tolerance must not be negative, got {}", self.tolerance));
        }
        if !self.initial_power.is_finite() {
            return Err(format!("initial power must be finite, got {}", self.initial_power));
        }
        Ok(())
    }
}

fn open(path: &Path) -> io::Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|err| io::Error::new(err.kind(), format!("{}: {err}", path.display())))
}

fn main() -> Result<(), Box<dyn StdError>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let opt = Opt::parse();
    opt.validate()?;

    let policy = if opt.strict {
        LoadPolicy::Strict
    } else {
        LoadPolicy::Skip
    };

    let mut schedule = Schedule::new(opt.sport);
    for path in &opt.files {
        let stats =
            HistoryReader::new(opt.delimiter, open(path)?)?.load_into(&mut schedule, policy)?;
        info!(
            file = %path.display(),
            games = stats.games,
            skipped = stats.skipped,
            "games successfully read"
        );
    }

    let rating_system = RatingSystem::builder()
        .sport(opt.sport)
        .kfactor(opt.kfactor)
        .tolerance(opt.tolerance)
        .max_iterations(opt.max_iterations)
        .initial_power(opt.initial_power)
        .build();

    info!(sport = %opt.sport, teams = schedule.teams().len(), "calculating ratings");
    let standings = rating_system.solve(&schedule)?;
    if standings.converged() {
        info!("the scores were examined {} times", standings.iterations());
    } else {
        warn!(
            "game ratios aren't converging after {} iterations, reporting last estimate",
            standings.iterations()
        );
    }

    let stdout = io::stdout();
    report::write_summary(stdout.lock(), &schedule)?;
    match &opt.output {
        Some(output) => {
            let mut writer = BufWriter::new(File::create(output)?);
            report::write_table(&mut writer, &standings)?;
            writer.flush()?;
        }
        None => report::write_table(stdout.lock(), &standings)?,
    }
    report::write_forecast(stdout.lock(), standings.forecast())?;

    let csv_path = opt.csv_path();
    report::write_csv(BufWriter::new(File::create(&csv_path)?), &standings)?;
    info!("rankings have been exported to {}", csv_path.display());

    Ok(())
}
