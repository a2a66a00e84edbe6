use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use auric_core::{Chord, Key, Modifiers, Outcome, Review, RuntimeConfig};
use auric_navigation::{Screen, Window};
use auric_platform::{FrameClock, Host, LogSpeech, SystemClipboard};
use auric_ui::{Grid, Leaf, Menu, MenuBar, TextField};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

fn chord(event: &KeyEvent) -> Option<Chord> {
    let mut mods = Modifiers::empty();
    if event.modifiers.contains(KeyModifiers::SHIFT) {
        mods |= Modifiers::SHIFT;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        mods |= Modifiers::CTRL;
    }
    if event.modifiers.contains(KeyModifiers::ALT) {
        mods |= Modifiers::ALT;
    }
    if event.modifiers.intersects(KeyModifiers::SUPER | KeyModifiers::META) {
        mods |= Modifiers::META;
    }
    let key = match event.code {
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) if c.is_uppercase() => {
            mods |= Modifiers::SHIFT;
            Key::Character(c.to_ascii_lowercase())
        }
        KeyCode::Char(c) => Key::Character(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => {
            mods |= Modifiers::SHIFT;
            Key::Tab
        }
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Esc => Key::Escape,
        KeyCode::Left => Key::ArrowLeft,
        KeyCode::Right => Key::ArrowRight,
        KeyCode::Up => Key::ArrowUp,
        KeyCode::Down => Key::ArrowDown,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    };
    Some(Chord::with(key, mods))
}

fn build(config: &RuntimeConfig) -> anyhow::Result<Window> {
    let difficulty = Menu::with_items(
        "Difficulty",
        &[("easy", "Easy"), ("normal", "Normal"), ("hard", "Hard")],
    )?
    .with_config(config);

    let mut bar = MenuBar::new().with_config(config);
    bar.add_menu(
        "file",
        "File",
        Menu::with_items("", &[("new", "New"), ("exit", "Exit")])?.with_config(config),
    )?;
    bar.add_menu(
        "help",
        "Help",
        Menu::with_items("", &[("about", "About")])?.with_config(config),
    )?;

    let main = Screen::new("Main")
        .with_config(config)
        .with_menu_bar(bar)
        .with("name", TextField::new("Player name").with_config(config))?
        .with("difficulty", difficulty)?
        .with("board", Grid::new("Board", 3, 3)?.with_config(config))?
        .with("sound", Leaf::checkbox("Sound", true).with_config(config))?
        .with("save", Leaf::button("Save").with_config(config))?
        .with("quit", Leaf::button("Quit").with_config(config))?;

    Ok(Window::new("Auric demo")
        .escapable(true)
        .with_config(config)
        .with_screen("main", main)?)
}

fn notice(text: &str, config: &RuntimeConfig) -> anyhow::Result<Screen> {
    Ok(Screen::dialog(text)
        .with_config(config)
        .with("ok", Leaf::button("OK").with_config(config))?)
}

/// Reacts to what the tree submitted. False once the demo should stop.
fn respond(host: &mut Host, outcome: Outcome) -> anyhow::Result<bool> {
    let Outcome::Submitted(key) = outcome else {
        return Ok(host.is_open());
    };
    log::debug!("submitted {key:?}");
    let config = host.config().clone();
    match key.as_str() {
        "quit" | "exit" => {
            host.close()?;
            return Ok(false);
        }
        "save" | "about" => {
            let (text, caption) = if key == "save" {
                ("Settings saved", "Saved")
            } else {
                ("Auric terminal demo", "About")
            };
            let dialog = notice(text, &config)?;
            if let Some(screen) = host.window_mut().current_screen_mut() {
                screen.open_dialog(dialog, caption)?;
            }
        }
        "ok" => host.with_cx(|window, cx| {
            if let Some(screen) = window.current_screen_mut() {
                screen.close_dialog(cx);
            }
        }),
        _ => {}
    }
    Ok(true)
}

fn run(host: &mut Host) -> anyhow::Result<()> {
    let mut clock = FrameClock::new();
    host.open()?;
    loop {
        if event::poll(Duration::from_millis(16))?
            && let Event::Key(key) = event::read()?
            && matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat)
            && let Some(chord) = chord(&key)
        {
            // F2/F3 walk back and forth through what was said.
            let review = match chord {
                c if c == Chord::new(Key::F(2)) => Some(Review::Previous),
                c if c == Chord::new(Key::F(3)) => Some(Review::Next),
                _ => None,
            };
            if let Some(step) = review {
                host.speech_mut().review(step);
            } else {
                let outcome = host.tap(chord)?;
                if !respond(host, outcome)? {
                    break;
                }
            }
        }
        host.tick(clock.tick())?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| write!(buf, "[{}] {}\r\n", record.level(), record.args()))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            RuntimeConfig::from_json(&text).with_context(|| format!("parsing {path}"))?
        }
        None => RuntimeConfig::default(),
    };

    let window = build(&config)?;
    let mut host = Host::new(window, Box::new(LogSpeech), config)
        .with_clipboard(Box::new(SystemClipboard::new()));

    terminal::enable_raw_mode()?;
    let result = run(&mut host);
    terminal::disable_raw_mode()?;
    result
}
