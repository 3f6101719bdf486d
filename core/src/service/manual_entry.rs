use chrono::NaiveDate;

use crate::error::EntryError;
use crate::input::{expand_key, parse_args};
use crate::model::booking::{Booking, BookingType, Hostel, Source, DEFAULT_PRICE, NOT_FOUND};
use crate::time::{format_date, nights_between, parse_input_date};

pub const ENTRY_KEYS: [&str; 8] = [
    "arrival", "departure", "hostel", "room", "guests", "price", "package", "link",
];

/// A booking typed in by hand, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManualEntry {
    pub full_name: String,
    pub arrival: Option<NaiveDate>,
    pub departure: Option<NaiveDate>,
    pub hostel: Option<Hostel>,
    pub room_type: String,
    pub package_name: Option<String>,
    pub price: Option<String>,
    pub conversation_link: Option<String>,
    pub guests: Option<u32>,
}

impl ManualEntry {
    /// Builds an entry from words plus `key:value` tokens, e.g.
    /// `Jane Doe arrival:today dep:+7d hostel:tam room:Dorm guests:2`.
    pub fn from_args(args: &[String], today: NaiveDate) -> Result<Self, EntryError> {
        let parsed = parse_args(args);
        let mut entry = ManualEntry {
            full_name: parsed.name,
            ..ManualEntry::default()
        };

        for (key, value) in parsed.metadata {
            let key = expand_key(&key, &ENTRY_KEYS).map_err(|e| EntryError::Invalid {
                field: "key",
                reason: e.to_string(),
            })?;
            let value = value.trim().to_string();

            match key.as_str() {
                "arrival" => entry.arrival = Some(date_field("arrival", &value, today)?),
                "departure" => entry.departure = Some(date_field("departure", &value, today)?),
                "hostel" => {
                    entry.hostel = Some(value.parse().map_err(|e: anyhow::Error| EntryError::Invalid {
                        field: "hostel",
                        reason: e.to_string(),
                    })?)
                }
                "room" => entry.room_type = value,
                "guests" => {
                    entry.guests = Some(value.parse().map_err(|_| EntryError::Invalid {
                        field: "guests",
                        reason: format!("'{value}' is not a whole number"),
                    })?)
                }
                "price" => entry.price = Some(value),
                "package" => entry.package_name = Some(value),
                "link" => entry.conversation_link = Some(value),
                _ => {}
            }
        }
        Ok(entry)
    }

    /// Validates the entry and derives the stored record.
    ///
    /// The booking is current when `today` falls within its stay, upcoming otherwise.
    pub fn into_booking(self, today: NaiveDate) -> Result<Booking, EntryError> {
        let full_name = self.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(EntryError::MissingField("full name"));
        }
        let arrival = self.arrival.ok_or(EntryError::MissingField("arrival date"))?;
        let departure = self.departure.ok_or(EntryError::MissingField("departure date"))?;
        let hostel = self.hostel.ok_or(EntryError::MissingField("hostel"))?;
        let room_type = self.room_type.trim().to_string();
        if room_type.is_empty() {
            return Err(EntryError::MissingField("room type"));
        }
        if departure < arrival {
            return Err(EntryError::DepartureBeforeArrival {
                arrival: format_date(arrival),
                departure: format_date(departure),
            });
        }
        let guests = self.guests.unwrap_or(1);
        if guests == 0 {
            return Err(EntryError::Invalid {
                field: "guests",
                reason: "at least one guest is required".to_string(),
            });
        }

        let nights = nights_between(arrival, departure);
        let booking_type = if arrival <= today && today <= departure {
            BookingType::Current
        } else {
            BookingType::Upcoming
        };

        Ok(Booking {
            full_name,
            package_name: non_empty(self.package_name).unwrap_or_else(|| format!("{nights}-day surf trip")),
            hostel,
            price: non_empty(self.price).unwrap_or_else(|| DEFAULT_PRICE.to_string()),
            arrival_date: format_date(arrival),
            departure_date: format_date(departure),
            number_of_nights: nights,
            number_of_guests: guests.to_string(),
            room_type,
            conversation_link: Some(non_empty(self.conversation_link).unwrap_or_else(|| NOT_FOUND.to_string())),
            booking_type,
            source: Source::Manual,
        })
    }
}

fn date_field(field: &'static str, value: &str, today: NaiveDate) -> Result<NaiveDate, EntryError> {
    parse_input_date(value, today).map_err(|e| EntryError::Invalid {
        field,
        reason: e.to_string(),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry() -> ManualEntry {
        ManualEntry {
            full_name: "Jane Doe".to_string(),
            arrival: Some(ymd(2024, 3, 1)),
            departure: Some(ymd(2024, 3, 8)),
            hostel: Some(Hostel::Tamraght),
            room_type: "Shared Dorm".to_string(),
            ..ManualEntry::default()
        }
    }

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_defaults() {
        let booking = entry().into_booking(ymd(2024, 2, 1)).unwrap();
        assert_eq!(booking.package_name, "7-day surf trip");
        assert_eq!(booking.price, "N/A");
        assert_eq!(booking.conversation_link.as_deref(), Some("Not found"));
        assert_eq!(booking.number_of_guests, "1");
        assert_eq!(booking.number_of_nights, 7);
        assert_eq!(booking.arrival_date, "2024-Mar-01");
        assert_eq!(booking.departure_date, "2024-Mar-08");
        assert_eq!(booking.source, Source::Manual);
        assert_eq!(booking.hostel, Hostel::Tamraght);
    }

    #[test]
    fn test_booking_type_from_today() {
        assert_eq!(entry().into_booking(ymd(2024, 2, 29)).unwrap().booking_type, BookingType::Upcoming);
        assert_eq!(entry().into_booking(ymd(2024, 3, 1)).unwrap().booking_type, BookingType::Current);
        assert_eq!(entry().into_booking(ymd(2024, 3, 8)).unwrap().booking_type, BookingType::Current);
        assert_eq!(entry().into_booking(ymd(2024, 3, 9)).unwrap().booking_type, BookingType::Upcoming);
    }

    #[test]
    fn test_validation() {
        let today = ymd(2024, 1, 1);

        let mut missing_room = entry();
        missing_room.room_type = "  ".to_string();
        assert_eq!(missing_room.into_booking(today), Err(EntryError::MissingField("room type")));

        let mut missing_hostel = entry();
        missing_hostel.hostel = None;
        assert_eq!(missing_hostel.into_booking(today), Err(EntryError::MissingField("hostel")));

        let mut reversed = entry();
        reversed.departure = Some(ymd(2024, 2, 1));
        assert!(matches!(reversed.into_booking(today), Err(EntryError::DepartureBeforeArrival { .. })));

        let mut nobody = entry();
        nobody.guests = Some(0);
        assert!(matches!(nobody.into_booking(today), Err(EntryError::Invalid { field: "guests", .. })));
    }

    #[test]
    fn test_from_args() {
        let today = ymd(2024, 3, 10);
        let entry = ManualEntry::from_args(
            &args("Jane Doe arr:today dep:+5d hostel:tag room:Dorm guests:3 pri:€300 pa:Yoga"),
            today,
        )
        .unwrap();
        assert_eq!(entry.full_name, "Jane Doe");
        assert_eq!(entry.arrival, Some(today));
        assert_eq!(entry.departure, Some(ymd(2024, 3, 15)));
        assert_eq!(entry.hostel, Some(Hostel::Taghazout));
        assert_eq!(entry.room_type, "Dorm");
        assert_eq!(entry.guests, Some(3));
        assert_eq!(entry.price.as_deref(), Some("€300"));
        assert_eq!(entry.package_name.as_deref(), Some("Yoga"));

        let booking = entry.into_booking(today).unwrap();
        assert_eq!(booking.booking_type, BookingType::Current);
        assert_eq!(booking.number_of_nights, 5);
    }

    #[test]
    fn test_from_args_errors() {
        let today = ymd(2024, 3, 10);
        assert!(matches!(
            ManualEntry::from_args(&args("Jane p:1"), today),
            Err(EntryError::Invalid { field: "key", .. })
        ));
        assert!(matches!(
            ManualEntry::from_args(&args("Jane arrival:someday"), today),
            Err(EntryError::Invalid { field: "arrival", .. })
        ));
        assert!(matches!(
            ManualEntry::from_args(&args("Jane guests:two"), today),
            Err(EntryError::Invalid { field: "guests", .. })
        ));
    }
}
