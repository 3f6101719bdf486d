use crate::model::booking::{classify_hostel, Booking, BookingType, Source, NOT_AVAILABLE, NOT_FOUND};
use crate::time::nights;

/// Guest/room values read from a conversation page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailFields {
    pub guests: Option<String>,
    pub room_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailOutcome {
    /// The item had no conversation link, so nothing was fetched.
    #[default]
    NoLink,
    /// The conversation page could not be fetched or read.
    Failed,
    Found(DetailFields),
}

/// Fields pulled out of one overview list item, before any derivation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBooking {
    pub full_name: Option<String>,
    pub package_name: Option<String>,
    pub price: Option<String>,
    pub arrival_date: Option<String>,
    pub departure_date: Option<String>,
    pub conversation_link: Option<String>,
    pub detail: DetailOutcome,
}

pub fn normalize(raw: RawBooking, booking_type: BookingType) -> Booking {
    let or_not_found = |value: Option<String>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| NOT_FOUND.to_string())
    };

    let package_name = or_not_found(raw.package_name);
    let arrival_date = or_not_found(raw.arrival_date);
    let departure_date = or_not_found(raw.departure_date);

    let (number_of_guests, room_type) = match raw.detail {
        DetailOutcome::NoLink => (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
        DetailOutcome::Failed => (NOT_FOUND.to_string(), NOT_FOUND.to_string()),
        DetailOutcome::Found(fields) => (or_not_found(fields.guests), or_not_found(fields.room_type)),
    };

    Booking {
        full_name: or_not_found(raw.full_name),
        hostel: classify_hostel(&package_name),
        number_of_nights: nights(&arrival_date, &departure_date),
        package_name,
        price: or_not_found(raw.price),
        arrival_date,
        departure_date,
        number_of_guests,
        room_type,
        conversation_link: raw.conversation_link,
        booking_type,
        source: Source::Scraped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::booking::Hostel;

    fn raw() -> RawBooking {
        RawBooking {
            full_name: Some("  Lena Fischer ".to_string()),
            package_name: Some("7 Day Surf & Yoga Camp in Taghazout".to_string()),
            price: Some("€540".to_string()),
            arrival_date: Some("2024-Mar-02".to_string()),
            departure_date: Some("2024-Mar-09".to_string()),
            conversation_link: Some("https://portal.example/4/conversations/1/".to_string()),
            detail: DetailOutcome::Found(DetailFields {
                guests: Some("2".to_string()),
                room_type: Some("Private Double Room".to_string()),
            }),
        }
    }

    #[test]
    fn test_normalize_full_record() {
        let booking = normalize(raw(), BookingType::Upcoming);
        assert_eq!(booking.full_name, "Lena Fischer");
        assert_eq!(booking.hostel, Hostel::Taghazout);
        assert_eq!(booking.number_of_nights, 7);
        assert_eq!(booking.number_of_guests, "2");
        assert_eq!(booking.room_type, "Private Double Room");
        assert_eq!(booking.booking_type, BookingType::Upcoming);
        assert_eq!(booking.source, Source::Scraped);
    }

    #[test]
    fn test_missing_fields_become_sentinels() {
        let booking = normalize(RawBooking::default(), BookingType::Current);
        assert_eq!(booking.full_name, NOT_FOUND);
        assert_eq!(booking.package_name, NOT_FOUND);
        assert_eq!(booking.price, NOT_FOUND);
        assert_eq!(booking.arrival_date, NOT_FOUND);
        assert_eq!(booking.number_of_nights, 0);
        assert_eq!(booking.hostel, Hostel::Tamraght);
        assert_eq!(booking.number_of_guests, NOT_AVAILABLE);
        assert_eq!(booking.room_type, NOT_AVAILABLE);
        assert_eq!(booking.conversation_link, None);
    }

    #[test]
    fn test_detail_outcomes() {
        let mut failed = raw();
        failed.detail = DetailOutcome::Failed;
        let booking = normalize(failed, BookingType::Current);
        assert_eq!(booking.number_of_guests, NOT_FOUND);
        assert_eq!(booking.room_type, NOT_FOUND);

        let mut partial = raw();
        partial.detail = DetailOutcome::Found(DetailFields {
            guests: Some("3".to_string()),
            room_type: None,
        });
        let booking = normalize(partial, BookingType::Current);
        assert_eq!(booking.number_of_guests, "3");
        assert_eq!(booking.room_type, NOT_FOUND);
    }
}
