//! Front-panel application state and logic.

use crate::alpha::group_text;
use crate::Machine;
use tracing::debug;

/// Lampboard and keyboard rows of the German QWERTZ layout.
pub const LAMP_ROWS: [&str; 3] = ["QWERTZUIO", "ASDFGHJK", "PYXCVBNML"];

/// Front-panel application state.
pub struct LampboardApp {
    /// The machine being operated.
    pub machine: Machine,
    /// Window letters to return to on reset.
    start_display: String,
    /// Letters typed so far.
    pub input: String,
    /// Lamps lit so far.
    pub output: String,
    /// The lamp currently lit.
    pub lit: Option<char>,
    /// Should we quit?
    pub should_quit: bool,
    /// Status message to display.
    pub status: String,
}

impl LampboardApp {
    /// Create a front panel for a machine, remembering its current windows.
    pub fn new(machine: Machine) -> Self {
        let start_display = machine.get_display();
        Self {
            machine,
            start_display,
            input: String::new(),
            output: String::new(),
            lit: None,
            should_quit: false,
            status: "Ready. Type letters to encipher, Tab to reset, Esc to quit.".into(),
        }
    }

    /// Press a key on the keyboard.
    pub fn press(&mut self, c: char) {
        match self.machine.key_press(c) {
            Ok(lamp) => {
                self.input.push(c.to_ascii_uppercase());
                self.output.push(lamp);
                self.lit = Some(lamp);
                self.status = format!(
                    "{} -> {}   window {}",
                    c.to_ascii_uppercase(),
                    lamp,
                    self.machine.get_display()
                );
            }
            Err(e) => {
                self.status = format!("Error: {}", e);
            }
        }
    }

    /// Turn the rotors back to the starting windows and clear the tapes.
    pub fn reset(&mut self) {
        if let Err(e) = self.machine.set_display(&self.start_display) {
            self.status = format!("Error: {}", e);
            return;
        }
        debug!(display = %self.start_display, "front panel reset");
        self.input.clear();
        self.output.clear();
        self.lit = None;
        self.status = format!("Reset to {}. Ready.", self.start_display);
    }

    /// The input tape in five-letter groups.
    pub fn input_tape(&self) -> String {
        group_text(&self.input, 5)
    }

    /// The output tape in five-letter groups.
    pub fn output_tape(&self) -> String {
        group_text(&self.output, 5)
    }
}

/// Run the interactive front panel.
pub fn run_lampboard(machine: Machine) -> std::io::Result<()> {
    use crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    };
    use ratatui::prelude::*;
    use std::io::stdout;
    use std::time::Duration;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = LampboardApp::new(machine);

    loop {
        terminal.draw(|frame| {
            super::ui::draw(frame, &app);
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc => app.should_quit = true,
                        KeyCode::Tab => app.reset(),
                        KeyCode::Char(c) if c.is_ascii_alphabetic() => app.press(c),
                        KeyCode::Backspace => {
                            app.status = "The rotors cannot be turned back by a key.".into();
                        }
                        _ => {}
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RotorCatalog;

    fn app() -> LampboardApp {
        let machine =
            Machine::from_key_sheet(&RotorCatalog::historical(), &["I", "II", "III"], &[], "B", "")
                .unwrap();
        LampboardApp::new(machine)
    }

    #[test]
    fn test_press_lights_lamp() {
        let mut app = app();
        for c in "aaaaaa".chars() {
            app.press(c);
        }
        assert_eq!(app.output_tape(), "BDZGO W");
        assert_eq!(app.input_tape(), "AAAAA A");
        assert_eq!(app.lit, Some('W'));
    }

    #[test]
    fn test_reset_restores_windows() {
        let mut app = app();
        app.press('H');
        app.press('I');
        app.reset();
        assert_eq!(app.machine.get_display(), "AAA");
        assert!(app.input.is_empty());
        assert_eq!(app.lit, None);
    }

    #[test]
    fn test_lamp_rows_cover_alphabet() {
        let mut letters: Vec<char> = LAMP_ROWS.iter().flat_map(|r| r.chars()).collect();
        letters.sort();
        let expected: Vec<char> = crate::alpha::ALPHABET.chars().collect();
        assert_eq!(letters, expected);
    }
}
