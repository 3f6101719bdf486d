use tracing::warn;

use crate::error::StoreError;
use crate::model::booking::{Booking, Source};

pub trait BookingRepository {
    fn try_load(&self) -> Result<Vec<Booking>, StoreError>;
    fn save(&self, bookings: &[Booking]) -> Result<(), StoreError>;

    /// Like `try_load`, but a missing or unreadable file counts as "no bookings yet".
    fn load(&self) -> Vec<Booking> {
        self.try_load().unwrap_or_else(|e| {
            warn!("{}; starting with no bookings", e);
            Vec::new()
        })
    }

    /// Replaces every scraped record with `fresh`, keeping manual entries after them.
    fn refresh_and_merge(&self, fresh: Vec<Booking>) -> Result<Vec<Booking>, StoreError> {
        let manual = self.load().into_iter().filter(|b| b.source == Source::Manual);
        let merged: Vec<Booking> = fresh.into_iter().chain(manual).collect();
        self.save(&merged)?;
        Ok(merged)
    }

    /// Records a write builds on. Only a missing file counts as empty; a file that
    /// cannot be read or parsed is an error so it is never overwritten.
    fn load_existing(&self) -> Result<Vec<Booking>, StoreError> {
        match self.try_load() {
            Err(e) if e.is_missing_file() => Ok(Vec::new()),
            other => other,
        }
    }

    fn append(&self, booking: Booking) -> Result<Vec<Booking>, StoreError> {
        let mut bookings = self.load_existing()?;
        bookings.push(booking);
        self.save(&bookings)?;
        Ok(bookings)
    }
}
