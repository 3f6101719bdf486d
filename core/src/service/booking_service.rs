use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use crate::config::AppConfig;
use crate::model::booking::Booking;
use crate::repository::{export_snapshot, BookingRepository};
use crate::scrape::{extract_bookings, BookingSource, PortalClient};
use crate::service::manual_entry::ManualEntry;

pub struct BookingService<R: BookingRepository> {
    repo: R,
}

impl<R: BookingRepository> BookingService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn load(&self) -> Vec<Booking> {
        self.repo.load()
    }

    /// Scrapes `source` and replaces the stored scraped records, keeping manual ones.
    ///
    /// The file is not touched when extraction fails.
    pub fn refresh<S: BookingSource + ?Sized>(&self, source: &mut S) -> Result<Vec<Booking>> {
        let fresh = extract_bookings(source).context("Failed to extract bookings")?;
        info!("extracted {} bookings", fresh.len());
        let merged = self
            .repo
            .refresh_and_merge(fresh)
            .context("Failed to save refreshed bookings")?;
        Ok(merged)
    }

    /// Logs in with the configured credentials and refreshes from the live portal.
    pub fn refresh_from_portal(&self, config: &AppConfig) -> Result<Vec<Booking>> {
        let credentials = config.credentials.as_ref().ok_or_else(|| {
            anyhow!("Portal credentials missing: set HOSTELBOOK_USERNAME and HOSTELBOOK_PASSWORD")
        })?;

        let mut client = PortalClient::new(&config.portal).context("Failed to build portal client")?;
        client.login(credentials).context("Failed to log in to the portal")?;
        let result = self.refresh(&mut client);
        client.logout();
        result
    }

    pub fn add_manual(&self, entry: ManualEntry, today: NaiveDate) -> Result<Booking> {
        let booking = entry.into_booking(today)?;
        self.repo
            .append(booking.clone())
            .context("Failed to save manual booking")?;
        info!("added manual booking for {}", booking.full_name);
        Ok(booking)
    }

    pub fn export(&self, dir: &Path, now: NaiveDateTime) -> Result<PathBuf> {
        let bookings = self.repo.load();
        let path = export_snapshot(&bookings, dir, now).context("Failed to export bookings")?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ScrapeError, StoreError};
    use crate::model::booking::{BookingType, Hostel, Source};
    use crate::scrape::SnapshotSource;
    use std::cell::RefCell;

    struct MockRepo {
        bookings: RefCell<Vec<Booking>>,
        saves: RefCell<usize>,
    }

    impl MockRepo {
        fn with(bookings: Vec<Booking>) -> Self {
            MockRepo {
                bookings: RefCell::new(bookings),
                saves: RefCell::new(0),
            }
        }
    }

    impl BookingRepository for MockRepo {
        fn try_load(&self) -> Result<Vec<Booking>, StoreError> {
            Ok(self.bookings.borrow().clone())
        }

        fn save(&self, bookings: &[Booking]) -> Result<(), StoreError> {
            *self.bookings.borrow_mut() = bookings.to_vec();
            *self.saves.borrow_mut() += 1;
            Ok(())
        }
    }

    struct BrokenPortal;

    impl BookingSource for BrokenPortal {
        fn fetch_overview(&mut self) -> Result<String, ScrapeError> {
            Err(ScrapeError::Status(503))
        }

        fn fetch_detail(&mut self, _link: &str) -> Result<String, ScrapeError> {
            Err(ScrapeError::Status(503))
        }
    }

    fn manual(name: &str) -> Booking {
        Booking {
            full_name: name.to_string(),
            package_name: "7-day surf trip".to_string(),
            hostel: Hostel::Tamraght,
            price: "N/A".to_string(),
            arrival_date: "2024-Jan-01".to_string(),
            departure_date: "2024-Jan-08".to_string(),
            number_of_nights: 7,
            number_of_guests: "1".to_string(),
            room_type: "Dorm".to_string(),
            conversation_link: Some("Not found".to_string()),
            booking_type: BookingType::Current,
            source: Source::Manual,
        }
    }

    fn overview() -> String {
        r#"<ul class="recent-inquiries--new">
          <li>
            <div class="customer-name"><strong>Alice</strong></div>
            <div class="listing-title"><p>7 Days Surf Camp Taghazout</p></div>
            <div class="inquiry-meta"><strong>€500</strong> <strong>2024-Jan-10</strong> <strong>2024-Jan-17</strong></div>
          </li>
        </ul>
        <ul class="recent-inquiries--new"></ul>"#
            .to_string()
    }

    #[test]
    fn test_refresh_keeps_manual_records() {
        let mut stale = manual("stale");
        stale.source = Source::Scraped;
        let repo = MockRepo::with(vec![stale, manual("M")]);
        let service = BookingService::new(repo);

        let mut source = SnapshotSource::new(overview());
        let merged = service.refresh(&mut source).unwrap();

        let names: Vec<&str> = merged.iter().map(|b| b.full_name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "M"]);
        assert_eq!(merged[0].hostel, Hostel::Taghazout);
        assert_eq!(service.load().len(), 2);
    }

    #[test]
    fn test_refresh_failure_leaves_store_untouched() {
        let repo = MockRepo::with(vec![manual("M")]);
        let service = BookingService::new(repo);

        assert!(service.refresh(&mut BrokenPortal).is_err());
        assert_eq!(*service.repository().saves.borrow(), 0);
        assert_eq!(service.load().len(), 1);
    }

    #[test]
    fn test_refresh_from_portal_requires_credentials() {
        let service = BookingService::new(MockRepo::with(vec![]));
        let config = AppConfig::default();
        let err = service.refresh_from_portal(&config).unwrap_err();
        assert!(err.to_string().contains("HOSTELBOOK_USERNAME"));
    }

    #[test]
    fn test_add_manual() {
        let service = BookingService::new(MockRepo::with(vec![manual("M")]));
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let entry = ManualEntry {
            full_name: "Bob".to_string(),
            arrival: NaiveDate::from_ymd_opt(2024, 5, 10),
            departure: NaiveDate::from_ymd_opt(2024, 5, 12),
            hostel: Some(Hostel::Taghazout),
            room_type: "Private".to_string(),
            ..ManualEntry::default()
        };

        let booking = service.add_manual(entry, today).unwrap();
        assert_eq!(booking.booking_type, BookingType::Upcoming);
        assert_eq!(booking.package_name, "2-day surf trip");

        let stored = service.load();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].full_name, "Bob");
    }

    #[test]
    fn test_add_manual_rejects_invalid_entry() {
        let service = BookingService::new(MockRepo::with(vec![]));
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert!(service.add_manual(ManualEntry::default(), today).is_err());
        assert_eq!(*service.repository().saves.borrow(), 0);
    }
}
