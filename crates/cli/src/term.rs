use std::{
    convert::TryFrom,
    io::{self, BufRead, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue, style, terminal,
};
use life_common::Board;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::sim::{Screen, Signal};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Keeps the terminal in raw mode until dropped.
pub struct RawMode(());

impl RawMode {
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self(()))
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            warn!(%e, "failed to leave raw mode");
        }
    }
}

/// The alternate screen the board is drawn on.
pub struct Terminal {
    out: io::Stdout,
    _raw: RawMode,
}

impl Terminal {
    pub fn enter() -> io::Result<Self> {
        let raw = RawMode::enable()?;
        let mut out = io::stdout();
        execute!(out, terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(Self { out, _raw: raw })
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if let Err(e) = execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen) {
            warn!(%e, "failed to restore terminal");
        }
    }
}

impl Screen for Terminal {
    fn draw(&mut self, board: &Board) -> io::Result<()> {
        queue!(
            self.out,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0),
            style::Print("Press ESC to save and exit, Q to quit")
        )?;
        let rendered = board.render_scaled();
        let mut line_count = 0;
        for (index, line) in rendered.lines().enumerate() {
            queue!(self.out, cursor::MoveTo(0, screen_row(index + 1)), style::Print(line))?;
            line_count = index + 1;
        }
        queue!(
            self.out,
            cursor::MoveTo(0, screen_row(line_count + 1)),
            style::Print(format!("Number of Alive Cells: {}", board.alive_count())),
            cursor::MoveTo(0, screen_row(line_count + 2)),
            style::Print(format!("Generation: {}", board.generation()))
        )?;
        self.out.flush()
    }
}

/// Polls the keyboard on its own thread and forwards [`Signal`]s until
/// dropped.
pub struct KeyWatcher {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl KeyWatcher {
    pub fn spawn(signals: mpsc::UnboundedSender<Signal>) -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let handle = thread::Builder::new().name("key-watcher".to_string()).spawn({
            let stop = Arc::clone(&stop);
            move || watch_keys(&signals, &stop)
        })?;
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }
}

impl Drop for KeyWatcher {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("key watcher panicked");
            }
        }
    }
}

fn watch_keys(signals: &mpsc::UnboundedSender<Signal>, stop: &AtomicBool) {
    debug!("watching keyboard");
    while !stop.load(Ordering::Relaxed) {
        match event::poll(POLL_INTERVAL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                warn!(%e, "keyboard polling failed");
                return;
            }
        }
        let signal = match event::read() {
            Ok(Event::Key(key)) => key_signal(key),
            Ok(_) => None,
            Err(e) => {
                warn!(%e, "keyboard read failed");
                return;
            }
        };
        if let Some(signal) = signal {
            debug!(?signal, "key signal");
            if signals.send(signal).is_err() {
                return;
            }
        }
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

pub fn key_signal(key: KeyEvent) -> Option<Signal> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if is_interrupt(&key) {
        return Some(Signal::Quit);
    }
    match key.code {
        KeyCode::Esc => Some(Signal::Save),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Signal::Quit),
        _ => None,
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    Load,
    Rebuild,
    Exit,
}

pub fn menu_choice(key: KeyEvent) -> Option<MenuChoice> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if is_interrupt(&key) {
        return Some(MenuChoice::Exit);
    }
    match key.code {
        KeyCode::Char('r') | KeyCode::Char('R') => Some(MenuChoice::Load),
        KeyCode::Char('i') | KeyCode::Char('I') => Some(MenuChoice::Rebuild),
        KeyCode::Esc => Some(MenuChoice::Exit),
        _ => None,
    }
}

/// Shows the startup menu and waits for a key that picks an entry.
pub fn menu() -> io::Result<MenuChoice> {
    let mut out = io::stdout();
    execute!(
        out,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0),
        style::Print("Press R to load from file"),
        cursor::MoveTo(0, 1),
        style::Print("Press I to rebuild"),
        cursor::MoveTo(0, 2)
    )?;

    let _raw = RawMode::enable()?;
    loop {
        if let Event::Key(key) = event::read()? {
            if let Some(choice) = menu_choice(key) {
                return Ok(choice);
            }
        }
    }
}

/// Reads one line from stdin after printing `message`.
pub fn prompt(message: &str) -> io::Result<String> {
    let mut out = io::stdout();
    execute!(out, terminal::Clear(terminal::ClearType::All), cursor::MoveTo(0, 0))?;
    writeln!(out, "{}", message)?;
    out.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let line = line.trim_end_matches(|c| c == '\n' || c == '\r').to_string();
    if line.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "no file name given"));
    }
    Ok(line)
}

/// Converts a screen row (row 0 is the header line) to a crossterm row,
/// clamped to what crossterm can address.
pub fn screen_row(line: usize) -> u16 {
    u16::try_from(line).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn escape_requests_save() {
        assert_eq!(key_signal(press(KeyCode::Esc)), Some(Signal::Save));
    }

    #[test]
    fn quit_keys() {
        assert_eq!(key_signal(press(KeyCode::Char('q'))), Some(Signal::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_signal(ctrl_c), Some(Signal::Quit));
        assert_eq!(key_signal(press(KeyCode::Char('c'))), None);
    }

    #[test]
    fn releases_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Esc,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(key_signal(release), None);
        assert_eq!(menu_choice(release), None);
    }

    #[test]
    fn menu_keys() {
        assert_eq!(menu_choice(press(KeyCode::Char('R'))), Some(MenuChoice::Load));
        assert_eq!(menu_choice(press(KeyCode::Char('i'))), Some(MenuChoice::Rebuild));
        assert_eq!(menu_choice(press(KeyCode::Esc)), Some(MenuChoice::Exit));
        assert_eq!(menu_choice(press(KeyCode::Enter)), None);
    }

    #[test]
    fn rows_clamp() {
        assert_eq!(screen_row(3), 3);
        assert_eq!(screen_row(1 << 20), u16::MAX);
    }
}
