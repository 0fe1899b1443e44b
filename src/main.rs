use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use showdigest::config::AppConfig;
use showdigest::dataset::Dataset;
use showdigest::dataset::source::{Location, LocationSource};
use showdigest::graph::{Metric, SongSummary, TimingCategory, TimingSelection};
use showdigest::report::{Digest, GraphReport, GraphRequest, ShowReport};
use showdigest::setlist::SetChoice;

#[derive(Parser)]
#[command(name = "showdigest", version, about = "Setlists and song trends by show date")]
struct Cli {
    /// Read the track-length table from a local CSV instead of fetching it
    #[arg(long, global = true)]
    tracks: Option<PathBuf>,

    /// Read the set-placement table from a local CSV instead of fetching it
    #[arg(long, global = true)]
    placements: Option<PathBuf>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum MetricArg {
    #[value(alias = "dur")]
    Duration,
    #[value(alias = "place")]
    Placement,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Duration => Metric::Duration,
            MetricArg::Placement => Metric::Placement,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SetArg {
    #[value(name = "1")]
    One,
    #[value(name = "2")]
    Two,
    #[value(name = "3")]
    Three,
    #[value(alias = "e")]
    Encore,
}

impl From<SetArg> for SetChoice {
    fn from(arg: SetArg) -> Self {
        match arg {
            SetArg::One => SetChoice::One,
            SetArg::Two => SetChoice::Two,
            SetArg::Three => SetChoice::Three,
            SetArg::Encore => SetChoice::Encore,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TimingArg {
    Before,
    #[value(alias = "prev")]
    Previous50,
    Next50,
    After,
}

impl From<TimingArg> for TimingCategory {
    fn from(arg: TimingArg) -> Self {
        match arg {
            TimingArg::Before => TimingCategory::Before,
            TimingArg::Previous50 => TimingCategory::Previous50,
            TimingArg::Next50 => TimingCategory::Next50,
            TimingArg::After => TimingCategory::After,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the setlist for a date
    Setlist {
        /// Show date (YYYY-MM-DD or M/D/YYYY)
        date: String,
    },

    /// Compare one set's songs against surrounding shows
    Graph {
        /// Show date (YYYY-MM-DD or M/D/YYYY)
        date: String,

        /// What to plot
        #[arg(short, long, value_enum, default_value = "duration")]
        metric: MetricArg,

        /// Which set's songs to plot
        #[arg(short, long, value_enum, default_value = "1")]
        set: SetArg,

        /// Shows to include besides the chosen one (default: all)
        #[arg(short, long, value_enum, value_delimiter = ',')]
        timing: Vec<TimingArg>,

        /// Plot only the chosen show, with no surrounding shows
        #[arg(long, conflicts_with = "timing")]
        only_show: bool,

        /// Write the plot data as JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Show dataset statistics
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let config = AppConfig::load();

    // Resolve table locations: CLI > config
    let tracks = cli.tracks.map(Location::Local).unwrap_or_else(|| config.data.track_lengths());
    let placements = cli
        .placements
        .map(Location::Local)
        .unwrap_or_else(|| config.data.set_placement());

    let dataset = load_dataset(LocationSource::new(tracks, placements, config.data.timeout()))
        .context("Failed to load datasets")?;
    let digest = Digest::new(&dataset, config.band.clone());

    match cli.command {
        Commands::Setlist { date } => {
            let (year, month, day) = parse_date(&date)?;
            match digest.check_setlist(year, month, day) {
                Ok(report) => print_setlist(&report),
                Err(e) => println!("{e}"),
            }
        }

        Commands::Graph { date, metric, set, timing, only_show, json } => {
            let (year, month, day) = parse_date(&date)?;
            let request = GraphRequest {
                metric: metric.into(),
                set: set.into(),
                selection: timing_selection(timing, only_show),
            };

            let report = match digest.graph(year, month, day, &request) {
                Ok(r) => r,
                Err(e) => {
                    println!("{e}");
                    return Ok(());
                }
            };

            print_graph(&report);

            if let Some(path) = json {
                let file = std::fs::File::create(&path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                serde_json::to_writer_pretty(file, &report)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!();
                println!("Plot data written to {}", path.display());
            }
        }

        Commands::Stats => {
            let stats = dataset.stats();
            println!("Dataset Statistics");
            println!("==================");
            println!("Shows:            {}", stats.shows);
            println!("Track rows:       {}", stats.track_rows);
            println!("Placement rows:   {}", stats.placement_rows);
            println!("Distinct songs:   {}", stats.distinct_songs);
            if let (Some(first), Some(last)) = (stats.first_show, stats.last_show) {
                println!("Date range:       {} to {}", first, last);
            }
        }
    }

    Ok(())
}

/// Fetch both tables behind a spinner.
fn load_dataset(source: LocationSource) -> Result<Dataset> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    pb.set_message("Loading show data...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = Dataset::load(&source);
    pb.finish_and_clear();
    Ok(result?)
}

/// No `--timing` means every category, unless `--only-show` narrows it to the show itself.
fn timing_selection(timing: Vec<TimingArg>, only_show: bool) -> TimingSelection {
    if only_show {
        TimingSelection::new([])
    } else if timing.is_empty() {
        TimingSelection::all()
    } else {
        TimingSelection::new(timing.into_iter().map(TimingCategory::from))
    }
}

fn parse_date(input: &str) -> Result<(i32, u32, u32)> {
    showdigest::show::parse_date_input(input).with_context(|| {
        format!("Unrecognized date \"{input}\" (expected YYYY-MM-DD or M/D/YYYY)")
    })
}

fn print_setlist(report: &ShowReport) {
    println!("Show: {} (#{})", report.show.date, report.show.show_id);
    println!();

    for (set, songs) in report.setlist.sets() {
        let line = if songs.is_empty() {
            "-".to_string()
        } else {
            songs.join(", ")
        };
        println!("{:<8} {}", format!("{}:", set.label()), line);
    }
}

/// Print a per-song table of the plotted values, one line per category.
fn print_graph(report: &GraphReport) {
    let graph = &report.graph;

    println!("{}: {}, {}", graph.y_label, report.set, report.show.date);
    println!();
    println!(
        "{:<25} {:<18} {:>5} {:>7} {:>7} {:>7}",
        "Song", "Shows", "N", "Min", "Median", "Max"
    );
    println!("{}", "-".repeat(74));

    for song in graph.summary() {
        print_song_summary(&song, graph.show_date);
    }

    println!();
    let legend: Vec<String> = graph
        .legend
        .iter()
        .map(|e| format!("{} {}", e.label, e.color))
        .collect();
    println!("Legend: {}", legend.join("  "));
    if !graph.y_ticks.is_empty() {
        let ticks: Vec<String> = graph
            .y_ticks
            .iter()
            .map(|t| format!("{} = {}", t.value, t.label))
            .collect();
        println!("Scale: {}", ticks.join(", "));
    }
}

fn print_song_summary(song: &SongSummary, show_date: chrono::NaiveDate) {
    let title: String = if song.title.chars().count() > 25 {
        format!("{}...", song.title.chars().take(22).collect::<String>())
    } else {
        song.title.clone()
    };

    for (i, stats) in song.categories.iter().enumerate() {
        let name = if i == 0 { title.as_str() } else { "" };
        println!(
            "{:<25} {:<18} {:>5} {:>7.2} {:>7.2} {:>7.2}",
            name,
            stats.category.label(show_date),
            stats.count,
            stats.min,
            stats.median,
            stats.max,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_selection(args: &[&str]) -> TimingSelection {
        let argv = ["showdigest", "graph", "1999-12-31"].iter().chain(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Graph { timing, only_show, .. } => timing_selection(timing, only_show),
            _ => panic!("expected graph command"),
        }
    }

    #[test]
    fn test_default_timing_is_all() {
        assert_eq!(graph_selection(&[]), TimingSelection::all());
    }

    #[test]
    fn test_timing_list() {
        let selection = graph_selection(&["--timing", "before,next50"]);
        let got: Vec<TimingCategory> = selection.ordered().collect();
        assert_eq!(
            got,
            vec![TimingCategory::Before, TimingCategory::ShowDate, TimingCategory::Next50]
        );
    }

    #[test]
    fn test_only_show() {
        let selection = graph_selection(&["--only-show"]);
        let got: Vec<TimingCategory> = selection.ordered().collect();
        assert_eq!(got, vec![TimingCategory::ShowDate]);
    }

    #[test]
    fn test_only_show_conflicts_with_timing() {
        let argv = ["showdigest", "graph", "1999-12-31", "--only-show", "--timing", "after"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
