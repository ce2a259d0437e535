//! UI rendering for the front panel.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
    style::{Color, Style, Modifier},
};
use super::app::{LampboardApp, LAMP_ROWS};

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &LampboardApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(7),
            Constraint::Min(6),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_windows(frame, chunks[0], app);
    draw_lampboard(frame, chunks[1], app);
    draw_tapes(frame, chunks[2], app);
    draw_status(frame, chunks[3], app);
    draw_help(frame, chunks[4]);
}

/// Draw the rotor windows, reflector on the left.
fn draw_windows(frame: &mut Frame, area: Rect, app: &LampboardApp) {
    let machine = &app.machine;

    let mut names = vec![Span::styled(
        format!(" UKW {:<7}", machine.reflector().name()),
        Style::default().fg(Color::DarkGray),
    )];
    let mut windows = vec![Span::raw(" ".repeat(12))];
    let mut rings = vec![Span::raw(" ".repeat(12))];

    for i in 0..machine.num_rotors() {
        if let Some(rotor) = machine.rotor(i) {
            names.push(Span::styled(
                format!("{:^7}", rotor.name()),
                Style::default().fg(Color::Cyan),
            ));
            windows.push(Span::styled(
                format!("  [{}]  ", rotor.get_display()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
            rings.push(Span::styled(
                format!("{:^7}", format!("ring {:02}", rotor.ring_setting() + 1)),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }

    let paragraph = Paragraph::new(vec![Line::from(names), Line::from(windows), Line::from(rings)])
        .block(Block::default()
            .title(" Rotors ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)));

    frame.render_widget(paragraph, area);
}

/// Draw the lampboard with the lit lamp highlighted.
fn draw_lampboard(frame: &mut Frame, area: Rect, app: &LampboardApp) {
    let lines: Vec<Line> = LAMP_ROWS
        .iter()
        .enumerate()
        .map(|(row, letters)| {
            let mut spans = vec![Span::raw(" ".repeat(row * 2 + 1))];
            for c in letters.chars() {
                let style = if app.lit == Some(c) {
                    Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                spans.push(Span::styled(format!(" {} ", c), style));
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        })
        .collect();

    let lamps = Paragraph::new(lines)
        .block(Block::default()
            .title(" Lampboard ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)));

    frame.render_widget(lamps, area);
}

/// Draw the input and output tapes.
fn draw_tapes(frame: &mut Frame, area: Rect, app: &LampboardApp) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(50),
        ])
        .split(area);

    let input = Paragraph::new(app.input_tape())
        .wrap(Wrap { trim: false })
        .block(Block::default()
            .title(" Keyboard ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)));

    let output = Paragraph::new(app.output_tape())
        .style(Style::default().fg(Color::Yellow))
        .wrap(Wrap { trim: false })
        .block(Block::default()
            .title(" Lamps ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)));

    frame.render_widget(input, halves[0]);
    frame.render_widget(output, halves[1]);
}

/// Draw status bar.
fn draw_status(frame: &mut Frame, area: Rect, app: &LampboardApp) {
    let status = Paragraph::new(format!("{}   [{}]", app.status, app.machine.plugboard()))
        .style(Style::default().fg(Color::White))
        .block(Block::default()
            .title(" Status ")
            .borders(Borders::ALL));

    frame.render_widget(status, area);
}

/// Draw help panel.
fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(Line::from("A-Z: Press key  Tab: Reset windows  Esc: Quit"))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default()
            .title(" Help ")
            .borders(Borders::ALL));

    frame.render_widget(help, area);
}
