use chrono::NaiveDate;
use hostelbook_core::model::{Booking, BookingStats};
use hostelbook_core::time::format_date;
use hostelbook_core::usecase::movements::Movements;
use hostelbook_core::usecase::occupancy::Occupancy;
use hostelbook_core::usecase::overview::RoomGroups;
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const PACKAGE_WIDTH: usize = 32;
const ROOM_WIDTH: usize = 24;

#[derive(Tabled)]
struct BookingRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Hostel")]
    hostel: String,
    #[tabled(rename = "Package")]
    package: String,
    #[tabled(rename = "Arrival")]
    arrival: String,
    #[tabled(rename = "Departure")]
    departure: String,
    #[tabled(rename = "Nights")]
    nights: u32,
    #[tabled(rename = "Guests")]
    guests: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Type")]
    booking_type: String,
    #[tabled(rename = "Src")]
    source: String,
}

#[derive(Tabled)]
struct GuestRow {
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Guest")]
    name: String,
    #[tabled(rename = "Guests")]
    guests: String,
    #[tabled(rename = "Until")]
    departure: String,
}

#[derive(Tabled)]
struct MovementRow {
    #[tabled(rename = "")]
    direction: &'static str,
    #[tabled(rename = "Guest")]
    name: String,
    #[tabled(rename = "Hostel")]
    hostel: String,
    #[tabled(rename = "Guests")]
    guests: String,
    #[tabled(rename = "Room")]
    room: String,
}

#[derive(Tabled)]
struct DepartureRow {
    #[tabled(rename = "Leaves")]
    date: String,
    #[tabled(rename = "Guest")]
    name: String,
    #[tabled(rename = "Guests")]
    guests: String,
    #[tabled(rename = "Room")]
    room: String,
}

/// Cuts `text` to `max_width` terminal columns, marking the cut with an ellipsis.
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}

fn styled(mut table: Table) -> Table {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table
}

fn heading(text: &str) {
    println!("\n\x1b[1;36m{}\x1b[0m", text);
}

pub fn print_bookings(bookings: &[Booking]) {
    if bookings.is_empty() {
        println!("No bookings found.");
        return;
    }

    let rows: Vec<BookingRow> = bookings
        .iter()
        .map(|b| BookingRow {
            name: b.full_name.clone(),
            hostel: b.hostel.to_string(),
            package: truncate(&b.package_name, PACKAGE_WIDTH),
            arrival: b.arrival_date.clone(),
            departure: b.departure_date.clone(),
            nights: b.number_of_nights,
            guests: b.number_of_guests.clone(),
            room: truncate(&b.room_type, ROOM_WIDTH),
            price: b.price.clone(),
            booking_type: b.booking_type.to_string(),
            source: b.source.to_string(),
        })
        .collect();

    println!("{}", styled(Table::new(rows)));
}

pub fn print_stats(stats: &BookingStats) {
    heading("Bookings");
    println!("  Total:    {}", stats.total);
    println!("  Current:  {}", stats.current);
    println!("  Upcoming: {}", stats.upcoming);
    println!("  Guests:   {}", stats.total_guests);
}

pub fn print_current(groups: &RoomGroups) {
    if groups.is_empty() {
        println!("No current guests.");
        return;
    }

    for (hostel, rooms) in groups {
        let guests: u64 = rooms.values().flatten().filter_map(|b| b.guests()).map(u64::from).sum();
        heading(&format!("{} ({} guests)", hostel, guests));

        let mut rows = Vec::new();
        for (room, bookings) in rooms {
            for (i, booking) in bookings.iter().enumerate() {
                rows.push(GuestRow {
                    // Room only on the first row of its group.
                    room: if i == 0 { truncate(room, ROOM_WIDTH) } else { String::new() },
                    name: booking.full_name.clone(),
                    guests: booking.number_of_guests.clone(),
                    departure: booking.departure_date.clone(),
                });
            }
        }
        println!("{}", styled(Table::new(rows)));
    }
}

pub fn print_movements(movements: &Movements) {
    heading(&format!("{} ({})", format_date(movements.date), movements.date.format("%a")));

    if movements.is_empty() {
        println!("  No arrivals or departures.");
        return;
    }

    let row = |direction: &'static str, b: &Booking| MovementRow {
        direction,
        name: b.full_name.clone(),
        hostel: b.hostel.to_string(),
        guests: b.number_of_guests.clone(),
        room: truncate(&b.room_type, ROOM_WIDTH),
    };
    let rows: Vec<MovementRow> = movements
        .arrivals
        .iter()
        .map(|b| row("IN", *b))
        .chain(movements.departures.iter().map(|b| row("OUT", *b)))
        .collect();

    println!("{}", styled(Table::new(rows)));
}

pub fn print_occupancy(occupancy: &Occupancy, start: NaiveDate, end: NaiveDate) {
    println!("Occupancy {} to {}", format_date(start), format_date(end));

    if occupancy.is_empty() {
        println!("No guests in this period.");
        return;
    }

    for (hostel, entry) in occupancy {
        heading(&format!("{}: {} guests", hostel, entry.total_guests));

        let rows: Vec<DepartureRow> = entry
            .departures
            .iter()
            .flat_map(|(date, bookings)| {
                bookings.iter().enumerate().map(move |(i, b)| DepartureRow {
                    date: if i == 0 { format_date(*date) } else { String::new() },
                    name: b.full_name.clone(),
                    guests: b.number_of_guests.clone(),
                    room: truncate(&b.room_type, ROOM_WIDTH),
                })
            })
            .collect();
        println!("{}", styled(Table::new(rows)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Dorm", 10), "Dorm");
        assert_eq!(truncate("Shared Dorm Room", 8), "Shared …");
        assert_eq!(truncate("anything", 0), "");
        // Wide characters take two columns each.
        assert_eq!(truncate("海辺の部屋です", 7), "海辺の…");
    }
}
