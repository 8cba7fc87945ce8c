use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::Action;
use crate::ui::theme::Theme;
use procmon::config::{Config, KeybindsConfig, parse_key};
use procmon::system::collector::Collector;
use procmon::system::process::{ProcessSnapshot, SortOrder, sort_by_ram};
use procmon::system::snapshot::SystemSnapshot;
use procmon::system::source::CounterSource;

const PAGE_SIZE: usize = 10;
const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub toggle_sort: KeyCode,
    pub refresh: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            toggle_sort: parse_key(&kb.toggle_sort).unwrap_or(KeyCode::Char('s')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('r')),
        }
    }
}

pub fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        _ => "?".to_string(),
    }
}

pub struct App {
    pub running: bool,
    pub collector: Collector,
    pub snapshot: SystemSnapshot,
    pub selected_index: usize,
    pub max_processes: usize,
    pub theme: Theme,
    pub status_message: Option<(String, Instant)>,
    pub keybinds: ResolvedKeybinds,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let collector = Collector::with_interval(
            CounterSource::from_config(&config.paths),
            Duration::from_millis(config.general.sample_interval_ms),
        )
        .with_sort_order(SortOrder::from_str_config(&config.general.default_sort));
        let mut app = Self::with_collector(collector, config);
        app.refresh_data();
        app
    }

    /// Builds the app around an existing collector without taking a first
    /// snapshot.
    pub fn with_collector(collector: Collector, config: &Config) -> Self {
        let snapshot = SystemSnapshot {
            sort_order: collector.sort_order(),
            ..SystemSnapshot::default()
        };
        App {
            running: true,
            collector,
            snapshot,
            selected_index: 0,
            max_processes: config.general.max_processes,
            theme: Theme::from_config(&config.colors),
            status_message: None,
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
        }
    }

    pub fn refresh_data(&mut self) {
        let snapshot = self.collector.refresh();
        self.install_snapshot(snapshot);
    }

    pub async fn refresh_data_async(&mut self) {
        let snapshot = self.collector.refresh_async().await;
        self.install_snapshot(snapshot);
    }

    fn install_snapshot(&mut self, snapshot: SystemSnapshot) {
        self.snapshot = snapshot;
        self.clamp_selection();

        if let Some((_, created)) = &self.status_message
            && created.elapsed() >= STATUS_TTL
        {
            self.status_message = None;
        }
    }

    /// Rows the table shows: the snapshot's processes, in sort order, capped
    /// at `max_processes`.
    pub fn visible_processes(&self) -> &[ProcessSnapshot] {
        let len = self.snapshot.processes.len().min(self.max_processes);
        &self.snapshot.processes[..len]
    }

    pub fn sort_order(&self) -> SortOrder {
        self.snapshot.sort_order
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }
        match key.code {
            code if code == self.keybinds.quit => Action::Quit,
            code if code == self.keybinds.toggle_sort => Action::ToggleSort,
            code if code == self.keybinds.refresh => Action::Refresh,
            KeyCode::Up | KeyCode::Char('k') => Action::SelectPrevious,
            KeyCode::Down | KeyCode::Char('j') => Action::SelectNext,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::Home => Action::SelectFirst,
            KeyCode::End => Action::SelectLast,
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::SelectPrevious => self.move_selection(-1),
            Action::SelectNext => self.move_selection(1),
            Action::PageUp => self.move_selection(-(PAGE_SIZE as isize)),
            Action::PageDown => self.move_selection(PAGE_SIZE as isize),
            Action::SelectFirst => self.selected_index = 0,
            Action::SelectLast => {
                self.selected_index = self.visible_processes().len().saturating_sub(1)
            }
            Action::ToggleSort => self.toggle_sort(),
            Action::Refresh => {
                self.refresh_data();
                self.set_status("Refreshed");
            }
            Action::None => {}
        }
    }

    fn toggle_sort(&mut self) {
        let order = self.snapshot.sort_order.toggle();
        self.collector.set_sort_order(order);
        sort_by_ram(&mut self.snapshot.processes, order);
        self.snapshot.sort_order = order;
        self.selected_index = 0;
        self.set_status(format!("Sorted by {}", order.label()));
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.visible_processes().len();
        if len == 0 {
            self.selected_index = 0;
            return;
        }
        let next = self.selected_index.saturating_add_signed(delta);
        self.selected_index = next.min(len - 1);
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_processes().len();
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app(ram: &[u64]) -> App {
        let config = Config::default();
        let collector = Collector::new(CounterSource::with_root("/nonexistent/procmon-root"));
        let mut app = App::with_collector(collector, &config);
        let mut processes: Vec<ProcessSnapshot> = ram
            .iter()
            .enumerate()
            .map(|(i, kb)| ProcessSnapshot::new(i as u32 + 1, format!("proc{i}"), *kb, "root", 5, 0.1))
            .collect();
        sort_by_ram(&mut processes, SortOrder::Descending);
        app.snapshot.processes = processes;
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn default_keys_map_to_actions() {
        let app = test_app(&[]);
        assert_eq!(app.map_key(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(app.map_key(key(KeyCode::Char('s'))), Action::ToggleSort);
        assert_eq!(app.map_key(key(KeyCode::Down)), Action::SelectNext);
        assert_eq!(app.map_key(key(KeyCode::Char('x'))), Action::None);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.map_key(ctrl_c), Action::Quit);
    }

    #[test]
    fn toggle_sort_reorders_current_snapshot() {
        let mut app = test_app(&[50, 10, 200]);
        let ram = |app: &App| app.snapshot.processes.iter().map(|p| p.ram_kb()).collect::<Vec<_>>();
        assert_eq!(ram(&app), vec![200, 50, 10]);
        app.dispatch(Action::ToggleSort);
        assert_eq!(app.sort_order(), SortOrder::Ascending);
        assert_eq!(app.collector.sort_order(), SortOrder::Ascending);
        assert_eq!(ram(&app), vec![10, 50, 200]);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut app = test_app(&[3, 2, 1]);
        app.dispatch(Action::SelectPrevious);
        assert_eq!(app.selected_index, 0);
        app.dispatch(Action::PageDown);
        assert_eq!(app.selected_index, 2);
        app.dispatch(Action::SelectFirst);
        app.dispatch(Action::SelectNext);
        assert_eq!(app.visible_processes()[app.selected_index].ram_kb(), 2);
    }

    #[test]
    fn visible_processes_are_capped() {
        let mut app = test_app(&[5, 4, 3, 2, 1]);
        app.max_processes = 2;
        assert_eq!(app.visible_processes().len(), 2);
        app.dispatch(Action::SelectLast);
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut app = test_app(&[]);
        app.dispatch(Action::Quit);
        assert!(!app.running);
    }
}
