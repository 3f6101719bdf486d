use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use anyhow::anyhow;

use crate::time::parse_date;

pub const NOT_FOUND: &str = "Not found";
pub const NOT_AVAILABLE: &str = "Not available";
pub const UNKNOWN_ROOM: &str = "Unknown Room";
pub const DEFAULT_PRICE: &str = "N/A";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Hostel {
    Taghazout,
    Tamraght,
}

impl Hostel {
    pub const ALL: [Hostel; 2] = [Hostel::Taghazout, Hostel::Tamraght];

    pub fn as_str(&self) -> &'static str {
        match self {
            Hostel::Taghazout => "Taghazout",
            Hostel::Tamraght => "Tamraght",
        }
    }
}

impl fmt::Display for Hostel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Hostel {
    type Err = anyhow::Error;

    // Accepts unambiguous prefixes ("tag", "tam") as well as full names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower.len() >= 3 {
            for hostel in Hostel::ALL {
                if hostel.as_str().to_lowercase().starts_with(&lower) {
                    return Ok(hostel);
                }
            }
        }
        Err(anyhow!("Unknown hostel: '{}' (expected Taghazout or Tamraght)", s))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingType {
    // Files written before the upcoming list was scraped carry no booking_type.
    #[default]
    Current,
    Upcoming,
}

impl fmt::Display for BookingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingType::Current => f.write_str("Current"),
            BookingType::Upcoming => f.write_str("Upcoming"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[default]
    Scraped,
    Manual,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Scraped => f.write_str("Scraped"),
            Source::Manual => f.write_str("Manual"),
        }
    }
}

/// One guest stay, either scraped from the portal or entered by hand.
///
/// Field names match the on-disk `bookings.json` schema. Dates and guest counts
/// stay textual so sentinels round-trip; use the typed accessors to read them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Booking {
    pub full_name: String,
    pub package_name: String,
    pub hostel: Hostel,
    pub price: String,
    pub arrival_date: String,
    pub departure_date: String,
    pub number_of_nights: u32,
    pub number_of_guests: String,
    pub room_type: String,
    pub conversation_link: Option<String>,
    #[serde(default)]
    pub booking_type: BookingType,
    #[serde(default)]
    pub source: Source,
}

impl Booking {
    pub fn arrival(&self) -> Option<NaiveDate> {
        parse_date(&self.arrival_date)
    }

    pub fn departure(&self) -> Option<NaiveDate> {
        parse_date(&self.departure_date)
    }

    /// Guest count, or `None` for sentinels and other non-numeric text.
    pub fn guests(&self) -> Option<u32> {
        self.number_of_guests.trim().parse().ok()
    }

    pub fn link(&self) -> Option<&str> {
        self.conversation_link
            .as_deref()
            .filter(|l| !l.is_empty() && !is_sentinel(l))
    }

    pub fn is_manual(&self) -> bool {
        self.source == Source::Manual
    }

    pub fn is_current(&self) -> bool {
        self.booking_type == BookingType::Current
    }

    /// Room type with sentinels and blanks folded into "Unknown Room".
    pub fn room_label(&self) -> &str {
        let room = self.room_type.trim();
        if room.is_empty() || is_sentinel(room) {
            UNKNOWN_ROOM
        } else {
            room
        }
    }
}

pub fn is_sentinel(value: &str) -> bool {
    value == NOT_FOUND || value == NOT_AVAILABLE
}

/// The "7 day ... Taghazout" packages are the only ones hosted in Taghazout.
pub fn classify_hostel(package_name: &str) -> Hostel {
    let lower = package_name.to_lowercase();
    if lower.contains("7 day") && lower.contains("taghazout") {
        Hostel::Taghazout
    } else {
        Hostel::Tamraght
    }
}
