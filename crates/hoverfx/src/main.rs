use std::io::stdout;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
};
use hoverfx_config::Config;
use hoverfx_effects::EffectState;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style, Stylize},
    text::Line,
    widgets::Paragraph,
};

mod cli;
mod logging;
mod nav;

use cli::Cli;
use nav::{HoverEvent, HoverTracker, NavBar};

const TITLE: &str = "hoverfx";

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let (mut config, path) = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;

    logging::init(&config)?;
    match &path {
        Some(path) => tracing::info!(path = %path.display(), "config loaded"),
        None => tracing::info!("no config file, using defaults"),
    }

    let terminal = ratatui::init();
    let result = execute!(stdout(), EnableMouseCapture)
        .map_err(Into::into)
        .and_then(|()| App::new(&config, cli.seed).run(terminal));
    if let Err(err) = execute!(stdout(), DisableMouseCapture) {
        tracing::warn!(%err, "failed to release the mouse");
    }
    ratatui::restore();
    result
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Hover animations behind the page.
    effects: EffectState,
    nav: NavBar,
    hover: HoverTracker,
    /// Time between redraws.
    frame_time: Duration,
    started: Instant,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: &Config, seed: Option<u64>) -> Self {
        Self {
            running: false,
            effects: EffectState::new(config, seed),
            nav: NavBar::new(&config.links),
            hover: HoverTracker::default(),
            frame_time: Duration::from_millis(1000 / u64::from(config.display.fps.max(1))),
            started: Instant::now(),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }
        tracing::info!("quit");
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let elapsed_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.effects.render(frame, area, elapsed_ms);

        let chunks = Layout::vertical([
            Constraint::Fill(1),   // Top padding
            Constraint::Length(1), // Title
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Links
            Constraint::Fill(1),   // Bottom padding
            Constraint::Length(1), // Help text
        ])
        .split(area);

        let title = Paragraph::new(Line::from(TITLE.bold().white()).centered());
        frame.render_widget(title, chunks[1]);

        self.nav.layout(chunks[3]);
        let active = self.effects.active_kind();
        for (i, link) in self.nav.links().iter().enumerate() {
            let mut style = Style::new().fg(Color::Gray);
            if self.hover.current() == Some(i) {
                style = style.fg(Color::White).add_modifier(Modifier::BOLD);
            }
            if link.effect.is_some() && link.effect == active {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            frame.render_widget(Paragraph::new(link.label.as_str()).style(style), link.area);
        }

        let help = Line::from(vec![
            "hover".bold().white(),
            " a link  ".dark_gray(),
            "q".bold().white(),
            " quit".dark_gray(),
        ])
        .centered();
        frame.render_widget(help, chunks[5]);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Polls with the frame time as timeout so animations keep running.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(self.frame_time)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            _ => {}
        }
    }

    /// Hit-test the pointer against the links and start or stop effects.
    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        if !matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
            return;
        }
        let hit = self.nav.hit(mouse.column, mouse.row);
        for hover in self.hover.update(hit) {
            match hover {
                HoverEvent::Enter(i) => {
                    let Some(link) = self.nav.link(i) else {
                        continue;
                    };
                    tracing::info!(link = %link.label, "link hovered");
                    if let Some(kind) = link.effect {
                        self.effects.start(kind);
                    }
                }
                HoverEvent::Leave(i) => {
                    let Some(link) = self.nav.link(i) else {
                        continue;
                    };
                    tracing::info!(link = %link.label, "link unhovered");
                    if let Some(kind) = link.effect {
                        self.effects.stop(kind);
                    }
                }
            }
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use hoverfx_core::EffectKind;
    use ratatui::layout::Rect;

    fn app() -> App {
        let mut config = Config::default();
        config.cosmos.noise_count = 20;
        config.cosmos.dust_count = 20;
        config.cosmos.star_count_min = 10;
        config.cosmos.star_count_max = 10;
        let mut app = App::new(&config, Some(3));
        app.nav.layout(Rect::new(0, 5, 40, 1));
        app.running = true;
        app
    }

    fn moved(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Moved,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_hover_starts_and_stops_effects() {
        let mut app = app();
        app.on_mouse_event(moved(11, 5));
        assert_eq!(app.effects.active_kind(), Some(EffectKind::Ticker));

        app.on_mouse_event(moved(18, 5));
        assert_eq!(app.effects.active_kind(), Some(EffectKind::Cosmos));

        app.on_mouse_event(moved(25, 5));
        assert_eq!(app.effects.active_kind(), None);

        app.on_mouse_event(moved(0, 0));
        assert_eq!(app.effects.active_kind(), None);
    }

    #[test]
    fn test_clicks_are_ignored() {
        let mut app = app();
        let mut click = moved(11, 5);
        click.kind = MouseEventKind::Down(crossterm::event::MouseButton::Left);
        app.on_mouse_event(click);
        assert_eq!(app.effects.active_kind(), None);
    }

    #[test]
    fn test_quit_keys() {
        for (code, modifiers) in [
            (KeyCode::Char('q'), KeyModifiers::NONE),
            (KeyCode::Esc, KeyModifiers::NONE),
            (KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let mut app = app();
            app.on_key_event(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                state: KeyEventState::NONE,
            });
            assert!(!app.running);
        }

        let mut app = app();
        app.on_key_event(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert!(app.running);
    }
}
