pub mod config;
pub mod error;
pub mod model;
pub mod repository;
pub mod input;
pub mod time;
pub mod scrape;
pub mod service;
pub mod usecase;

pub use config::{AppConfig, Credentials, PortalConfig};
pub use error::{EntryError, RecordError, ScrapeError, StoreError};
pub use model::{Booking, BookingStats, BookingType, Hostel, Source};
pub use repository::{BookingRepository, FileBookingRepository};
pub use input::{parse_args, expand_key, tokenize, ParsedInput};
pub use time::{format_date, parse_date, parse_input_date};
pub use scrape::{extract_bookings, BookingSource, PortalClient, SnapshotSource};
pub use service::{BookingService, ManualEntry};
pub use usecase::occupancy::HostelFilter;
