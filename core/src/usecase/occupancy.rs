use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::model::booking::{Booking, Hostel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostelFilter {
    #[default]
    All,
    Only(Hostel),
}

impl HostelFilter {
    pub fn matches(&self, hostel: Hostel) -> bool {
        match self {
            HostelFilter::All => true,
            HostelFilter::Only(h) => *h == hostel,
        }
    }

    /// All -> Tamraght -> Taghazout -> All, the order the dashboard cycles through.
    pub fn next(self) -> Self {
        match self {
            HostelFilter::All => HostelFilter::Only(Hostel::Tamraght),
            HostelFilter::Only(Hostel::Tamraght) => HostelFilter::Only(Hostel::Taghazout),
            HostelFilter::Only(Hostel::Taghazout) => HostelFilter::All,
        }
    }
}

impl fmt::Display for HostelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostelFilter::All => f.write_str("All"),
            HostelFilter::Only(h) => write!(f, "{}", h),
        }
    }
}

impl FromStr for HostelFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(HostelFilter::All)
        } else {
            s.parse().map(HostelFilter::Only)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostelOccupancy<'a> {
    pub total_guests: u64,
    /// Bookings keyed by departure date, earliest first.
    pub departures: BTreeMap<NaiveDate, Vec<&'a Booking>>,
}

pub type Occupancy<'a> = BTreeMap<Hostel, HostelOccupancy<'a>>;

/// Guests staying at any point within `[start, end]`, per hostel.
///
/// Bookings without parseable dates or a numeric guest count are left out.
/// Callers must ensure `start <= end`.
pub fn occupancy(bookings: &[Booking], filter: HostelFilter, start: NaiveDate, end: NaiveDate) -> Occupancy<'_> {
    let mut result: Occupancy = BTreeMap::new();

    for booking in bookings {
        let (Some(arrival), Some(departure), Some(guests)) =
            (booking.arrival(), booking.departure(), booking.guests())
        else {
            continue;
        };
        if arrival > end || departure < start || !filter.matches(booking.hostel) {
            continue;
        }

        let entry = result.entry(booking.hostel).or_default();
        entry.total_guests = entry.total_guests.saturating_add(u64::from(guests));
        entry.departures.entry(departure).or_default().push(booking);
    }
    result
}
