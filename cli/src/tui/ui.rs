use chrono::NaiveDate;
use hostelbook_core::model::{Booking, BookingType, Source};
use hostelbook_core::time::format_date;
use hostelbook_core::usecase::{movements, occupancy, overview};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, BorderType, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::report::truncate;
use crate::tui::app::{App, InputMode, Tab};

struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    arrival: Color,
    departure: Color,
    upcoming: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    arrival: Color::Green,
    departure: Color::Red,
    upcoming: Color::Yellow,
};

fn panel(title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
}

fn label(text: &str) -> Span<'static> {
    Span::styled(text.to_string(), Style::default().fg(THEME.muted))
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let input_height = if matches!(app.input_mode, InputMode::Adding) { 3 } else { 0 };
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Tabs
            Constraint::Min(1),               // Content
            Constraint::Length(input_height), // Manual entry
            Constraint::Length(1),            // Footer
        ])
        .split(f.area());

    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, t)| Line::from(format!("{} {}", i + 1, t.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .block(panel(" HOSTELBOOK ".to_string()))
        .style(Style::default().fg(THEME.muted))
        .highlight_style(Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, main_chunks[0]);

    match app.tab {
        Tab::Current => draw_current(f, app, main_chunks[1]),
        Tab::Movements => draw_movements(f, app, main_chunks[1]),
        Tab::Bookings => draw_bookings(f, app, main_chunks[1]),
        Tab::Occupancy => draw_occupancy(f, app, main_chunks[1]),
    }

    if let InputMode::Adding = app.input_mode {
        draw_input(f, app, main_chunks[2]);
    }

    let footer = match &app.message {
        Some(message) => Paragraph::new(message.as_str()).style(Style::default().fg(THEME.text)),
        None => Paragraph::new(help_text(app.tab)).style(Style::default().fg(THEME.muted)),
    };
    f.render_widget(footer.alignment(Alignment::Center), main_chunks[3]);
}

fn help_text(tab: Tab) -> &'static str {
    match tab {
        Tab::Bookings => "Tab/1-4: Tabs | j/k: Select | a: Add | r: Reload | R: Refresh | e: Export | q: Quit",
        Tab::Movements => "Tab/1-4: Tabs | h/l: Day | a: Add | r: Reload | R: Refresh | e: Export | q: Quit",
        Tab::Occupancy => "Tab/1-4: Tabs | h/l: Shift | +/-: Range | f: Hostel | R: Refresh | q: Quit",
        Tab::Current => "Tab/1-4: Tabs | a: Add | r: Reload | R: Refresh | e: Export | q: Quit",
    }
}

fn draw_current(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(1)])
        .split(area);

    let stats = overview::stats(&app.bookings);
    let summary = vec![
        Line::from(Span::styled("Overview", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(vec![label("Total:    "), Span::raw(stats.total.to_string())]),
        Line::from(vec![
            label("Current:  "),
            Span::styled(stats.current.to_string(), Style::default().fg(THEME.arrival)),
        ]),
        Line::from(vec![
            label("Upcoming: "),
            Span::styled(stats.upcoming.to_string(), Style::default().fg(THEME.upcoming)),
        ]),
        Line::from(vec![
            label("Guests:   "),
            Span::styled(stats.total_guests.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
    ];
    f.render_widget(Paragraph::new(summary).block(panel(" Summary ".to_string())), chunks[0]);

    let groups = overview::group_current_by_hostel_and_room(&app.bookings);
    let mut lines = Vec::new();
    if groups.is_empty() {
        lines.push(Line::from(label("No current guests")));
    }
    for (hostel, rooms) in &groups {
        lines.push(Line::from(Span::styled(
            hostel.to_string(),
            Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD),
        )));
        for (room, bookings) in rooms {
            lines.push(Line::from(Span::styled(format!("  {}", room), Style::default().add_modifier(Modifier::BOLD))));
            for booking in bookings {
                lines.push(Line::from(vec![
                    Span::raw(format!("    {}", booking.full_name)),
                    label(&format!("  {} guests, until {}", booking.number_of_guests, booking.departure_date)),
                ]));
            }
        }
        lines.push(Line::from(""));
    }
    f.render_widget(
        Paragraph::new(lines).block(panel(" Current Guests ".to_string())).wrap(Wrap { trim: false }),
        chunks[1],
    );
}

fn movement_lines(day: &movements::Movements) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled("Arrivals", Style::default().fg(THEME.arrival).add_modifier(Modifier::BOLD)))];
    let entry = |b: &Booking| {
        Line::from(vec![
            Span::raw(format!("  {}", b.full_name)),
            label(&format!("  {} · {} · {} guests", b.hostel, b.room_type, b.number_of_guests)),
        ])
    };

    if day.arrivals.is_empty() {
        lines.push(Line::from(label("  none")));
    }
    lines.extend(day.arrivals.iter().map(|b| entry(*b)));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Departures", Style::default().fg(THEME.departure).add_modifier(Modifier::BOLD))));
    if day.departures.is_empty() {
        lines.push(Line::from(label("  none")));
    }
    lines.extend(day.departures.iter().map(|b| entry(*b)));
    lines
}

fn draw_movements(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let (first, second) = movements::today_and_tomorrow(&app.bookings, app.movement_day);
    for (day, chunk) in [first, second].iter().zip(chunks.iter()) {
        let marker = if day.date == app.today { " (today)" } else { "" };
        let title = format!(" {} {}{} ", day.date.format("%a"), format_date(day.date), marker);
        f.render_widget(Paragraph::new(movement_lines(day)).block(panel(title)), *chunk);
    }
}

fn draw_bookings(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let rows: Vec<Row> = app.bookings.iter().map(|b| {
        let type_style = match b.booking_type {
            BookingType::Current => Style::default().fg(THEME.arrival),
            BookingType::Upcoming => Style::default().fg(THEME.upcoming),
        };
        let source = match b.source {
            Source::Scraped => "",
            Source::Manual => "M",
        };

        Row::new(vec![
            Span::styled(source, Style::default().fg(THEME.primary)),
            Span::styled(truncate(&b.full_name, 22), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(b.hostel.as_str()),
            Span::raw(b.arrival_date.clone()),
            Span::raw(b.departure_date.clone()),
            Span::raw(b.number_of_guests.clone()),
            Span::styled(b.booking_type.to_string(), type_style),
        ])
    }).collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(1),  // Source
            Constraint::Min(12),    // Name
            Constraint::Length(9),  // Hostel
            Constraint::Length(11), // Arrival
            Constraint::Length(11), // Departure
            Constraint::Length(6),  // Guests
            Constraint::Length(8),  // Type
        ]
    )
    .header(Row::new(vec!["", "Name", "Hostel", "Arrival", "Departure", "Guests", "Type"]).style(Style::default().fg(THEME.upcoming)))
    .block(panel(format!(" Bookings ({}) ", app.bookings.len())))
    .row_highlight_style(Style::default().bg(THEME.muted).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[0], &mut app.state);
    draw_detail_view(f, app, chunks[1]);
}

fn draw_detail_view(f: &mut Frame, app: &App, area: Rect) {
    let Some(booking) = app.selected_booking() else {
        f.render_widget(panel(" Detail ".to_string()), area);
        return;
    };

    let field = |name: &str, value: String| Line::from(vec![
        Span::styled(format!("{}: ", name), Style::default().fg(Color::Blue)),
        Span::raw(value),
    ]);

    let detail_text = vec![
        Line::from(Span::styled(booking.full_name.clone(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        field("Package", booking.package_name.clone()),
        field("Hostel", booking.hostel.to_string()),
        field("Room", booking.room_type.clone()),
        field("Price", booking.price.clone()),
        field("Stay", format!("{} -> {} ({} nights)", booking.arrival_date, booking.departure_date, booking.number_of_nights)),
        field("Guests", booking.number_of_guests.clone()),
        field("Type", booking.booking_type.to_string()),
        field("Source", booking.source.to_string()),
        Line::from(""),
        field("Link", booking.link().unwrap_or("-").to_string()),
    ];

    let detail_block = Paragraph::new(detail_text)
        .block(panel(" Detail ".to_string()))
        .wrap(Wrap { trim: true });
    f.render_widget(detail_block, area);
}

fn draw_occupancy(f: &mut Frame, app: &App, area: Rect) {
    let start = app.window_start;
    let end = app.window_end();
    let result = occupancy::occupancy(&app.bookings, app.filter, start, end);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let header = Line::from(vec![
        label(" Range: "),
        Span::styled(range_text(start, end), Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)),
        label("   Hostel: "),
        Span::styled(app.filter.to_string(), Style::default().fg(THEME.primary)),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    if result.is_empty() {
        f.render_widget(
            Paragraph::new("No guests in this period").alignment(Alignment::Center).block(panel(" Occupancy ".to_string())),
            chunks[1],
        );
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, result.len() as u32); result.len()])
        .split(chunks[1]);

    for ((hostel, entry), column) in result.iter().zip(columns.iter()) {
        let mut lines = Vec::new();
        for (date, bookings) in &entry.departures {
            lines.push(Line::from(Span::styled(
                format!("Leaving {}", format_date(*date)),
                Style::default().fg(THEME.departure).add_modifier(Modifier::BOLD),
            )));
            for b in bookings {
                lines.push(Line::from(vec![
                    Span::raw(format!("  {}", b.full_name)),
                    label(&format!("  {} guests · {}", b.number_of_guests, b.room_type)),
                ]));
            }
        }
        let title = format!(" {}: {} guests ", hostel, entry.total_guests);
        f.render_widget(Paragraph::new(lines).block(panel(title)).wrap(Wrap { trim: false }), *column);
    }
}

fn range_text(start: NaiveDate, end: NaiveDate) -> String {
    let days = (end - start).num_days() + 1;
    if days == 1 {
        format_date(start)
    } else {
        format!("{} - {} ({} days)", format_date(start), format_date(end), days)
    }
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let input = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(THEME.upcoming))
        .block(panel(" Add booking: Name arrival:D departure:D hostel:H room:R [guests:N price:P] ".to_string()));
    f.render_widget(input, area);

    let before_cursor: String = app.input.chars().take(app.cursor_position).collect();
    f.set_cursor_position((area.x + before_cursor.width() as u16 + 1, area.y + 1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_range_text() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(range_text(start, start), "2024-Mar-10");
        assert_eq!(range_text(start, start + Duration::days(6)), "2024-Mar-10 - 2024-Mar-16 (7 days)");
    }
}
