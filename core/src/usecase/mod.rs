pub mod movements;
pub mod occupancy;
pub mod overview;
