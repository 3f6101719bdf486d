use serde::{Deserialize, Serialize};

use crate::model::booking::{Booking, BookingType};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingStats {
    pub total: usize,
    pub current: usize,
    pub upcoming: usize,
    pub total_guests: u64,
}

impl BookingStats {
    pub fn add(&mut self, booking: &Booking) {
        self.total += 1;
        match booking.booking_type {
            BookingType::Current => self.current += 1,
            BookingType::Upcoming => self.upcoming += 1,
        }
        // Sentinels and free text contribute nothing.
        if let Some(guests) = booking.guests() {
            self.total_guests = self.total_guests.saturating_add(u64::from(guests));
        }
    }
}
