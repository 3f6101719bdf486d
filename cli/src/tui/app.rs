use chrono::{Duration, Local, NaiveDate};
use hostelbook_core::{
    tokenize, AppConfig, Booking, BookingRepository, BookingService, FileBookingRepository, HostelFilter,
    ManualEntry, StoreError,
};
use ratatui::widgets::TableState;
use tracing::{error, info, warn};

const DEFAULT_WINDOW_DAYS: i64 = 7;
const MAX_WINDOW_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Current,
    Movements,
    Bookings,
    Occupancy,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Current, Tab::Movements, Tab::Bookings, Tab::Occupancy];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Current => "Current Guests",
            Tab::Movements => "Movements",
            Tab::Bookings => "Bookings",
            Tab::Occupancy => "Occupancy",
        }
    }

    pub fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }
}

pub enum InputMode {
    Normal,
    Adding,
}

pub struct App {
    pub service: BookingService<FileBookingRepository>,
    pub config: AppConfig,
    pub bookings: Vec<Booking>,
    pub tab: Tab,
    pub state: TableState,
    pub today: NaiveDate,
    pub movement_day: NaiveDate,
    pub window_start: NaiveDate,
    pub window_days: i64,
    pub filter: HostelFilter,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    /// One-line feedback shown in the footer.
    pub message: Option<String>,
}

impl App {
    pub fn new(service: BookingService<FileBookingRepository>, config: AppConfig, today: NaiveDate) -> App {
        let (bookings, message) = read_bookings(&service);
        let mut state = TableState::default();
        if !bookings.is_empty() {
            state.select(Some(0));
        }
        App {
            service,
            config,
            bookings,
            tab: Tab::Current,
            state,
            today,
            movement_day: today,
            window_start: today,
            window_days: DEFAULT_WINDOW_DAYS,
            filter: HostelFilter::All,
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            message,
        }
    }

    pub fn window_end(&self) -> NaiveDate {
        self.window_start + Duration::days(self.window_days - 1)
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
    }

    pub fn next(&mut self) {
        if self.bookings.is_empty() { return; }

        let i = match self.state.selected() {
            Some(i) if i + 1 < self.bookings.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.bookings.is_empty() { return; }

        let i = match self.state.selected() {
            Some(0) | None => self.bookings.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn selected_booking(&self) -> Option<&Booking> {
        self.state.selected().and_then(|i| self.bookings.get(i))
    }

    /// Moves the day shown on the Movements tab, or the Occupancy window.
    pub fn shift_day(&mut self, days: i64) {
        match self.tab {
            Tab::Movements => self.movement_day += Duration::days(days),
            Tab::Occupancy => self.window_start += Duration::days(days),
            _ => {}
        }
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
    }

    pub fn widen_window(&mut self) {
        self.window_days = (self.window_days + 1).min(MAX_WINDOW_DAYS);
    }

    pub fn narrow_window(&mut self) {
        self.window_days = (self.window_days - 1).max(1);
    }

    pub fn reload(&mut self) {
        let (bookings, problem) = read_bookings(&self.service);
        self.bookings = bookings;
        self.clamp_selection();
        self.message = problem.or_else(|| Some(format!("Loaded {} bookings", self.bookings.len())));
    }

    pub fn refresh_from_portal(&mut self) {
        match self.service.refresh_from_portal(&self.config) {
            Ok(bookings) => {
                self.message = Some(format!("Refreshed: {} bookings", bookings.len()));
                self.bookings = bookings;
                self.clamp_selection();
            }
            Err(e) => {
                error!("portal refresh failed: {:#}", e);
                self.message = Some(format!("Refresh failed: {:#}", e));
            }
        }
    }

    pub fn export(&mut self) {
        let dir = self.service.repository().data_dir().to_path_buf();
        self.message = Some(match self.service.export(&dir, Local::now().naive_local()) {
            Ok(path) => format!("Exported to {}", path.display()),
            Err(e) => format!("Export failed: {:#}", e),
        });
    }

    fn clamp_selection(&mut self) {
        if self.bookings.is_empty() {
            self.state.select(None);
        } else {
            let i = self.state.selected().unwrap_or(0).min(self.bookings.len() - 1);
            self.state.select(Some(i));
        }
    }

    pub fn enter_add_mode(&mut self) {
        self.input_mode = InputMode::Adding;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.input.chars().take(self.cursor_position).map(|c| c.len_utf8()).sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self.input.chars().take(self.cursor_position - 1).map(|c| c.len_utf8()).sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn submit_command(&mut self) {
        if !self.input.trim().is_empty() {
            self.submit_add();
        }
        self.input.clear();
        self.cursor_position = 0;
        self.exit_input_mode();
    }

    fn submit_add(&mut self) {
        let args = tokenize(&self.input);
        let result = ManualEntry::from_args(&args, self.today)
            .map_err(anyhow::Error::from)
            .and_then(|entry| self.service.add_manual(entry, self.today));

        match result {
            Ok(booking) => {
                info!("manual booking added from dashboard: {}", booking.full_name);
                self.message = Some(format!("Added {}", booking.full_name));
                self.bookings = self.service.load();
                self.state.select(Some(self.bookings.len().saturating_sub(1)));
            }
            Err(e) => self.message = Some(format!("Not added: {:#}", e)),
        }
    }
}

/// Bookings plus a footer message when the file exists but cannot be used.
fn read_bookings(service: &BookingService<FileBookingRepository>) -> (Vec<Booking>, Option<String>) {
    let repo = service.repository();
    match repo.try_load() {
        Ok(bookings) => (bookings, None),
        Err(e) if e.is_missing_file() => (Vec::new(), None),
        Err(e) => {
            warn!("{}", e);
            let message = match &e {
                StoreError::Json { source, .. } => format!("{} is malformed: {}", repo.path().display(), source),
                other => format!("Could not read bookings: {}", other),
            };
            (Vec::new(), Some(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        // Nothing is written unless a booking is added or exported.
        let repo = FileBookingRepository::at(std::env::temp_dir().join("hostelbook-tui-test/missing.json"));
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        App::new(BookingService::new(repo), AppConfig::default(), today)
    }

    fn repo_with(contents: &str, name: &str) -> FileBookingRepository {
        let dir = std::env::temp_dir().join(format!("hostelbook-tui-{}-{}", std::process::id(), name));
        std::fs::create_dir_all(&dir).unwrap();
        let repo = FileBookingRepository::at(dir.join("bookings.json"));
        std::fs::write(repo.path(), contents).unwrap();
        repo
    }

    #[test]
    fn test_missing_file_starts_quietly() {
        let app = app();
        assert!(app.bookings.is_empty());
        assert_eq!(app.message, None);
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let repo = repo_with("{ not json", "malformed");
        let path = repo.path().to_path_buf();
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let mut app = App::new(BookingService::new(repo), AppConfig::default(), today);

        assert!(app.bookings.is_empty());
        assert!(app.message.as_deref().unwrap_or_default().contains("is malformed"));

        app.reload();
        assert!(app.message.as_deref().unwrap_or_default().contains("is malformed"));

        // Adding must not replace the unreadable file.
        app.enter_add_mode();
        app.input = "Jane arrival:today dep:+2d hostel:tam room:Dorm".to_string();
        app.submit_command();
        assert!(app.message.as_deref().unwrap_or_default().starts_with("Not added"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_reload_reports_count() {
        let repo = repo_with("[]", "empty-list");
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let mut app = App::new(BookingService::new(repo), AppConfig::default(), today);
        assert_eq!(app.message, None);
        app.reload();
        assert_eq!(app.message.as_deref(), Some("Loaded 0 bookings"));
    }

    #[test]
    fn test_tab_cycle() {
        let mut app = app();
        assert_eq!(app.tab, Tab::Current);
        for expected in [Tab::Movements, Tab::Bookings, Tab::Occupancy, Tab::Current] {
            app.next_tab();
            assert_eq!(app.tab, expected);
        }
    }

    #[test]
    fn test_shift_day_follows_tab() {
        let mut app = app();
        app.select_tab(Tab::Movements);
        app.shift_day(1);
        assert_eq!(app.movement_day, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(app.window_start, app.today);

        app.select_tab(Tab::Occupancy);
        app.shift_day(-2);
        assert_eq!(app.window_start, NaiveDate::from_ymd_opt(2024, 3, 8).unwrap());
    }

    #[test]
    fn test_window_bounds() {
        let mut app = app();
        assert_eq!(app.window_end(), NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
        for _ in 0..20 {
            app.narrow_window();
        }
        assert_eq!(app.window_days, 1);
        assert_eq!(app.window_end(), app.window_start);
        app.widen_window();
        assert_eq!(app.window_days, 2);
    }

    #[test]
    fn test_input_editing() {
        let mut app = app();
        app.enter_add_mode();
        for c in "Jné".chars() {
            app.input_char(c);
        }
        app.move_cursor_left();
        app.delete_char();
        assert_eq!(app.input, "Jé");
        app.exit_input_mode();
        assert!(matches!(app.input_mode, InputMode::Normal));
    }

    #[test]
    fn test_selection_on_empty_list() {
        let mut app = app();
        app.next();
        app.previous();
        assert!(app.selected_booking().is_none());
    }
}
