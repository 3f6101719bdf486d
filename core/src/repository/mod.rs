pub mod file;
pub mod traits;

// Re-export
pub use file::{default_data_dir, export_snapshot, FileBookingRepository};
pub use traits::BookingRepository;
