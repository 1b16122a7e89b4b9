//! Single-key console input.
//!
//! On a terminal keys are read raw with `crossterm`, one key press per call
//! and no Enter needed. Piped input falls back to [`StdinKeys`].

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Source of menu keystrokes.
///
/// `Ok(None)` means the input is exhausted.
pub trait KeySource {
    fn next_key(&mut self) -> io::Result<Option<char>>;
}

impl<K: KeySource + ?Sized> KeySource for Box<K> {
    fn next_key(&mut self) -> io::Result<Option<char>> {
        (**self).next_key()
    }
}

/// Reads buffered lines and hands out their characters one key at a time.
///
/// Whitespace is skipped; a line with nothing else counts as pressing Enter
/// (`'\n'`).
pub struct StdinKeys<R> {
    reader: R,
    line: String,
    pending: VecDeque<char>,
}

impl<R: BufRead> StdinKeys<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            pending: VecDeque::new(),
        }
    }
}

impl<R: BufRead> KeySource for StdinKeys<R> {
    fn next_key(&mut self) -> io::Result<Option<char>> {
        if let Some(key) = self.pending.pop_front() {
            return Ok(Some(key));
        }
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        self.pending
            .extend(self.line.chars().filter(|c| !c.is_whitespace()));
        Ok(Some(self.pending.pop_front().unwrap_or('\n')))
    }
}

/// Reads single key presses from the terminal in raw mode.
///
/// Raw mode is only held while waiting for a key, so regular output keeps
/// its line endings. The pressed character is echoed.
pub struct TerminalKeys;

struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> io::Result<Option<char>> {
        let key = {
            let _raw = RawMode::enable()?;
            loop {
                if let Event::Key(ev) = event::read()? {
                    if let Some(key) = key_from_event(ev) {
                        break key;
                    }
                }
            }
        };
        if let Some(c) = key.filter(|c| !c.is_control()) {
            let mut out = io::stdout();
            write!(out, "{c}")?;
            out.flush()?;
        }
        Ok(key)
    }
}

/// Maps a terminal key event to a key.
///
/// Returns `None` for events to ignore (releases, repeats, bare modifiers),
/// `Some(None)` for Ctrl-C / Ctrl-D, which end the input.
fn key_from_event(ev: KeyEvent) -> Option<Option<char>> {
    if ev.kind != KeyEventKind::Press {
        return None;
    }
    match ev.code {
        KeyCode::Char('c' | 'd') if ev.modifiers.contains(KeyModifiers::CONTROL) => Some(None),
        KeyCode::Char(c) => Some(Some(c)),
        KeyCode::Enter => Some(Some('\n')),
        KeyCode::Tab => Some(Some('\t')),
        KeyCode::Esc => Some(Some('\u{1b}')),
        KeyCode::Modifier(_) => None,
        _ => Some(Some('\0')),
    }
}
