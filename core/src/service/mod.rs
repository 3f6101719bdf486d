pub mod booking_service;
pub mod manual_entry;
pub mod normalizer;

pub use booking_service::BookingService;
pub use manual_entry::ManualEntry;
