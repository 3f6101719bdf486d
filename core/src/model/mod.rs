pub mod booking;
pub mod stats;

pub use booking::{Booking, BookingType, Hostel, Source};
pub use stats::BookingStats;
