pub mod http;
pub mod parser;
pub mod snapshot;

use tracing::{info, warn};

use crate::error::ScrapeError;
use crate::model::booking::Booking;
use crate::service::normalizer::{normalize, DetailOutcome};

pub use http::PortalClient;
pub use snapshot::SnapshotSource;

/// Where overview and conversation pages come from.
///
/// The live portal and a saved snapshot are interchangeable behind this trait;
/// `extract_bookings` drives either one.
pub trait BookingSource {
    fn fetch_overview(&mut self) -> Result<String, ScrapeError>;

    fn fetch_detail(&mut self, link: &str) -> Result<String, ScrapeError>;

    /// Turns an href from the overview page into the link stored on the booking.
    fn resolve_link(&self, href: &str) -> String {
        href.to_string()
    }
}

/// Scrapes both overview lists into bookings, current list first.
///
/// Fails only when the overview page itself cannot be fetched or has no booking
/// lists. Bad items are logged and skipped; a conversation page that cannot be
/// read leaves the guest and room fields at "Not found".
pub fn extract_bookings<S: BookingSource + ?Sized>(source: &mut S) -> Result<Vec<Booking>, ScrapeError> {
    let html = source.fetch_overview()?;
    let lists = parser::parse_overview(&html)?;

    let mut bookings = Vec::new();
    for list in lists {
        let total = list.items.len();
        info!("found {} {} bookings", total, list.booking_type);

        for (index, item) in list.items.into_iter().enumerate() {
            let mut raw = match item {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("skipping {} booking {} of {}: {}", list.booking_type, index + 1, total, e);
                    continue;
                }
            };

            if let Some(href) = raw.conversation_link.take() {
                let link = source.resolve_link(&href);
                raw.detail = fetch_detail(source, &link);
                raw.conversation_link = Some(link);
            }

            let booking = normalize(raw, list.booking_type);
            info!(
                "extracted {} booking {} of {}: {} ({} guests, {})",
                list.booking_type, index + 1, total, booking.full_name, booking.number_of_guests, booking.room_type
            );
            bookings.push(booking);
        }
    }
    Ok(bookings)
}

fn fetch_detail<S: BookingSource + ?Sized>(source: &mut S, link: &str) -> DetailOutcome {
    match source.fetch_detail(link).and_then(|html| parser::parse_detail(&html)) {
        Ok(fields) => DetailOutcome::Found(fields),
        Err(e) => {
            warn!("could not read guest/room details from {}: {}", link, e);
            DetailOutcome::Failed
        }
    }
}
