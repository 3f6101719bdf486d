use std::collections::BTreeMap;

use crate::model::booking::{Booking, Hostel};
use crate::model::stats::BookingStats;

pub fn stats(bookings: &[Booking]) -> BookingStats {
    let mut stats = BookingStats::default();
    for booking in bookings {
        stats.add(booking);
    }
    stats
}

/// Hostel -> room type -> current bookings in that room.
pub type RoomGroups<'a> = BTreeMap<Hostel, BTreeMap<String, Vec<&'a Booking>>>;

pub fn group_current_by_hostel_and_room(bookings: &[Booking]) -> RoomGroups<'_> {
    let mut groups: RoomGroups = BTreeMap::new();
    for booking in bookings.iter().filter(|b| b.is_current()) {
        groups
            .entry(booking.hostel)
            .or_default()
            .entry(booking.room_label().to_string())
            .or_default()
            .push(booking);
    }
    groups
}
