mod report;
mod tui;

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use chrono::{Duration, Local};
use clap::Parser;
use hostelbook_core::usecase::{movements, occupancy, overview};
use hostelbook_core::{
    parse_input_date, AppConfig, BookingService, FileBookingRepository, HostelFilter, ManualEntry,
    SnapshotSource,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "hostelbook.log";
const DEFAULT_OCCUPANCY_DAYS: i64 = 7;

#[derive(Parser)]
#[command(name = "hostelbook")]
#[command(about = "Hostel booking scraper and dashboard", long_about = None)]
struct Cli {
    /// Directory holding bookings.json (default: ~/.hostelbook)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in to the portal, scrape all bookings and save them
    Refresh,
    /// Scrape a saved bookings-overview page instead of the live portal
    Import {
        /// Path to the saved overview HTML
        path: PathBuf,
    },
    /// List all stored bookings
    List,
    /// Booking and guest totals
    Stats,
    /// Current guests grouped by hostel and room
    Current,
    /// Arrivals and departures for a day and the day after
    Movements {
        /// Day to show (today, tomorrow, +3d, 2024-05-01, 2024-May-01)
        #[arg(long)]
        date: Option<String>,
    },
    /// Guests staying within a date range
    Occupancy {
        /// all, taghazout or tamraght
        #[arg(long, default_value = "all")]
        hostel: String,
        /// First day of the range (default: today)
        #[arg(long)]
        from: Option<String>,
        /// Last day of the range (default: a week after --from)
        #[arg(long)]
        to: Option<String>,
    },
    /// Add a manual booking (usage: add Jane Doe arrival:today dep:+7d hostel:tag room:Dorm guests:2)
    Add {
        /// Guest name followed by key:value fields
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Write a timestamped copy of the bookings file
    Export {
        /// Target directory (default: the data directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Open the dashboard
    Tui,
}

fn init_logging(command: &Option<Commands>, data_dir: &std::path::Path) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    match command {
        // The dashboard owns the terminal, so its log goes to a file.
        None | Some(Commands::Tui) => {
            fs::create_dir_all(data_dir)
                .with_context(|| format!("Failed to create {}", data_dir.display()))?;
            let log_path = data_dir.join(LOG_FILE_NAME);
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        Some(_) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env();

    let repo = FileBookingRepository::new(cli.data_dir.clone().or_else(|| config.data_dir.clone()))?;
    init_logging(&cli.command, repo.data_dir())?;
    info!("using bookings file {}", repo.path().display());

    let service = BookingService::new(repo);
    let today = Local::now().date_naive();

    match cli.command {
        Some(Commands::Refresh) => {
            let bookings = service.refresh_from_portal(&config)?;
            println!("Saved {} bookings to {}", bookings.len(), service.repository().path().display());
            report::print_stats(&overview::stats(&bookings));
        }
        Some(Commands::Import { path }) => {
            let mut source = SnapshotSource::from_file(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let bookings = service.refresh(&mut source)?;
            println!("Imported {} bookings from {}", bookings.len(), path.display());
            report::print_stats(&overview::stats(&bookings));
        }
        Some(Commands::List) => {
            report::print_bookings(&service.load());
        }
        Some(Commands::Stats) => {
            report::print_stats(&overview::stats(&service.load()));
        }
        Some(Commands::Current) => {
            let bookings = service.load();
            report::print_current(&overview::group_current_by_hostel_and_room(&bookings));
        }
        Some(Commands::Movements { date }) => {
            let day = match date {
                Some(d) => parse_input_date(&d, today)?,
                None => today,
            };
            let bookings = service.load();
            let (first, second) = movements::today_and_tomorrow(&bookings, day);
            report::print_movements(&first);
            report::print_movements(&second);
        }
        Some(Commands::Occupancy { hostel, from, to }) => {
            let filter: HostelFilter = hostel.parse()?;
            let start = match from {
                Some(d) => parse_input_date(&d, today)?,
                None => today,
            };
            let end = match to {
                Some(d) => parse_input_date(&d, today)?,
                None => start + Duration::days(DEFAULT_OCCUPANCY_DAYS - 1),
            };
            if end < start {
                bail!("--to ({}) is before --from ({})", end, start);
            }
            let bookings = service.load();
            report::print_occupancy(&occupancy::occupancy(&bookings, filter, start, end), start, end);
        }
        Some(Commands::Add { args }) => {
            if args.is_empty() {
                bail!("Guest name is required.");
            }
            let entry = ManualEntry::from_args(&args, today)?;
            let booking = service.add_manual(entry, today)?;
            println!(
                "Booking added: {} ({} {}, {} -> {}, {} guests, {})",
                booking.full_name,
                booking.hostel,
                booking.room_type,
                booking.arrival_date,
                booking.departure_date,
                booking.number_of_guests,
                booking.booking_type
            );
        }
        Some(Commands::Export { out }) => {
            let dir = out.unwrap_or_else(|| service.repository().data_dir().to_path_buf());
            let path = service.export(&dir, Local::now().naive_local())?;
            println!("Exported bookings to {}", path.display());
        }
        Some(Commands::Tui) | None => {
            tui::run(service, config)?;
        }
    }
    Ok(())
}
