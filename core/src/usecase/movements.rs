use chrono::{Duration, NaiveDate};

use crate::model::booking::Booking;

/// Who arrives and who leaves on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct Movements<'a> {
    pub date: NaiveDate,
    pub arrivals: Vec<&'a Booking>,
    pub departures: Vec<&'a Booking>,
}

impl Movements<'_> {
    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty() && self.departures.is_empty()
    }
}

pub fn movements_on(bookings: &[Booking], date: NaiveDate) -> Movements<'_> {
    Movements {
        date,
        arrivals: bookings.iter().filter(|b| b.arrival() == Some(date)).collect(),
        departures: bookings.iter().filter(|b| b.departure() == Some(date)).collect(),
    }
}

pub fn today_and_tomorrow(bookings: &[Booking], today: NaiveDate) -> (Movements<'_>, Movements<'_>) {
    (
        movements_on(bookings, today),
        movements_on(bookings, today + Duration::days(1)),
    )
}
