use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::info;

use crate::error::StoreError;
use crate::model::booking::Booking;
use crate::repository::traits::BookingRepository;

pub const DEFAULT_FILE_NAME: &str = "bookings.json";
pub const DEFAULT_DIR_NAME: &str = ".hostelbook";

#[derive(Clone, Debug)]
pub struct FileBookingRepository {
    file_path: PathBuf,
}

impl FileBookingRepository {
    /// Repository for `bookings.json` in `base_dir`, or in `~/.hostelbook` when none is given.
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self, StoreError> {
        let dir = match base_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        Ok(Self::at(dir.join(DEFAULT_FILE_NAME)))
    }

    pub fn at(file_path: impl Into<PathBuf>) -> Self {
        FileBookingRepository { file_path: file_path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn data_dir(&self) -> &Path {
        self.file_path.parent().unwrap_or_else(|| Path::new("."))
    }
}

pub fn default_data_dir() -> Result<PathBuf, StoreError> {
    let home_dir = dirs::home_dir().ok_or(StoreError::NoDataDir)?;
    Ok(home_dir.join(DEFAULT_DIR_NAME))
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn write_json(path: &Path, bookings: &[Booking]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    let file = File::create(path).map_err(io_error(path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, bookings).map_err(|source| StoreError::Json {
        path: path.display().to_string(),
        source,
    })?;
    writer.flush().map_err(io_error(path))?;
    Ok(())
}

impl BookingRepository for FileBookingRepository {
    fn try_load(&self) -> Result<Vec<Booking>, StoreError> {
        let file = File::open(&self.file_path).map_err(io_error(&self.file_path))?;
        let reader = BufReader::new(file);
        let bookings: Vec<Booking> = serde_json::from_reader(reader).map_err(|source| StoreError::Json {
            path: self.file_path.display().to_string(),
            source,
        })?;
        Ok(bookings)
    }

    fn save(&self, bookings: &[Booking]) -> Result<(), StoreError> {
        write_json(&self.file_path, bookings)?;
        info!("saved {} bookings to {}", bookings.len(), self.file_path.display());
        Ok(())
    }
}

pub fn export_file_name(now: NaiveDateTime) -> String {
    format!("bookings_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// Writes a timestamped copy of `bookings` into `dir` and returns its path.
pub fn export_snapshot(bookings: &[Booking], dir: &Path, now: NaiveDateTime) -> Result<PathBuf, StoreError> {
    let path = dir.join(export_file_name(now));
    write_json(&path, bookings)?;
    info!("exported {} bookings to {}", bookings.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::booking::{BookingType, Hostel, Source};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("hostelbook-test-{}", Uuid::new_v4()))
    }

    fn booking(name: &str, source: Source) -> Booking {
        Booking {
            full_name: name.to_string(),
            package_name: "7 Day Surf Taghazout".to_string(),
            hostel: Hostel::Taghazout,
            price: "€420".to_string(),
            arrival_date: "2024-Jan-05".to_string(),
            departure_date: "2024-Jan-12".to_string(),
            number_of_nights: 7,
            number_of_guests: "2".to_string(),
            room_type: "Dorm".to_string(),
            conversation_link: None,
            booking_type: BookingType::Current,
            source,
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let repo = FileBookingRepository::new(Some(temp_dir())).unwrap();
        assert!(repo.try_load().is_err());
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_load_malformed_file_is_empty() {
        let dir = temp_dir();
        fs::create_dir_all(&dir).unwrap();
        let repo = FileBookingRepository::new(Some(dir)).unwrap();
        fs::write(repo.path(), "{ not json").unwrap();
        assert!(matches!(repo.try_load(), Err(StoreError::Json { .. })));
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let repo = FileBookingRepository::new(Some(temp_dir().join("nested"))).unwrap();
        let mut ines = booking("Inès Müller", Source::Manual);
        ines.conversation_link = Some("Not found".to_string());
        ines.booking_type = BookingType::Upcoming;
        let bookings = vec![booking("Ana", Source::Scraped), ines];

        repo.save(&bookings).unwrap();
        assert_eq!(repo.load(), bookings);

        // Pretty-printed with non-ASCII kept as-is.
        let text = fs::read_to_string(repo.path()).unwrap();
        assert!(text.contains("Inès Müller"));
        assert!(text.contains("\n  {\n    \"full_name\""));
    }

    #[test]
    fn test_refresh_and_merge_keeps_manual() {
        let repo = FileBookingRepository::new(Some(temp_dir())).unwrap();
        repo.save(&[booking("A", Source::Scraped), booking("M", Source::Manual)]).unwrap();

        let mut fresh_a = booking("A", Source::Scraped);
        fresh_a.room_type = "Private".to_string();
        let merged = repo.refresh_and_merge(vec![fresh_a.clone(), booking("B", Source::Scraped)]).unwrap();

        let names: Vec<&str> = merged.iter().map(|b| b.full_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "M"]);
        assert_eq!(merged[0], fresh_a);
        assert_eq!(repo.load(), merged);
    }

    #[test]
    fn test_refresh_and_merge_without_existing_file() {
        let repo = FileBookingRepository::new(Some(temp_dir())).unwrap();
        let merged = repo.refresh_and_merge(vec![booking("A", Source::Scraped)]).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(repo.load().len(), 1);
    }

    #[test]
    fn test_append() {
        let repo = FileBookingRepository::new(Some(temp_dir())).unwrap();
        repo.append(booking("A", Source::Scraped)).unwrap();
        let all = repo.append(booking("M", Source::Manual)).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(repo.load()[1].full_name, "M");
    }

    #[test]
    fn test_append_keeps_malformed_file() {
        let dir = temp_dir();
        fs::create_dir_all(&dir).unwrap();
        let repo = FileBookingRepository::new(Some(dir)).unwrap();
        fs::write(repo.path(), "{ not json").unwrap();

        let err = repo.append(booking("M", Source::Manual)).unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }));
        assert!(!err.is_missing_file());
        assert_eq!(fs::read_to_string(repo.path()).unwrap(), "{ not json");
    }

    #[test]
    fn test_missing_file_error() {
        let repo = FileBookingRepository::new(Some(temp_dir())).unwrap();
        assert!(repo.try_load().unwrap_err().is_missing_file());
    }

    #[test]
    fn test_export_snapshot() {
        let dir = temp_dir();
        let now = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap();
        let bookings = vec![booking("A", Source::Scraped)];

        let path = export_snapshot(&bookings, &dir, now).unwrap();
        assert_eq!(path.file_name().unwrap(), "bookings_20240309_140507.json");
        assert_eq!(FileBookingRepository::at(&path).load(), bookings);
    }
}
