mod input;
mod ui;

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use input::InputResult;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};
use recall::core::{Settings, FRAME_POLL_MS, MAX_FRAME_DT_MS};
use recall::memory::GameController;
use recall::notes::{FileStore, NotesReader, NotesWriter};
use recall::utils::{build_info, logging};
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use ui::memory_scene::{render_memory_scene, TerminalPresenter};
use ui::menu_scene::{MenuItem, MenuScreen};
use ui::notes_scene::{render_reader_scene, render_writer_scene};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Menu,
    Memory,
    Writer,
    Reader,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run { screen: Screen, seed: Option<u64> },
    Version,
    Help,
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut screen = Screen::Menu;
    let mut seed = None;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "memory" => screen = Screen::Memory,
            "writer" => screen = Screen::Writer,
            "reader" => screen = Screen::Reader,
            "--seed" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--seed needs a value".to_string())?;
                seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("Invalid seed: {}", value))?,
                );
            }
            "--version" | "-v" => return Ok(Command::Version),
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(format!("Unknown command: {}", other)),
        }
    }
    Ok(Command::Run { screen, seed })
}

fn print_help() {
    println!("Recall - terminal memory game and shared notes\n");
    println!("Usage: recall [memory|writer|reader] [--seed <n>]\n");
    println!("Commands:");
    println!("  memory       Open the memory game directly");
    println!("  writer       Open the notes writer");
    println!("  reader       Open the notes reader");
    println!("  --seed <n>   Use a fixed random seed");
    println!("  --version    Show version information");
    println!("  --help       Show this help message");
}

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (screen, seed) = match parse_args(&args) {
        Ok(Command::Run { screen, seed }) => (screen, seed),
        Ok(Command::Version) => {
            println!("{}", build_info::version_line());
            std::process::exit(0);
        }
        Ok(Command::Help) => {
            print_help();
            std::process::exit(0);
        }
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("Run 'recall --help' for usage.");
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init() {
        eprintln!("Warning: logging disabled: {}", e);
    }
    info!(version = %build_info::version_line(), ?seed, "starting");

    let settings = Settings::load();
    let store = Rc::new(FileStore::open_default()?);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, screen, seed, settings, store);

    // Cleanup terminal, even when the loop failed
    disable_raw_mode()?;
    terminal.backend_mut().execute(DisableMouseCapture)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        warn!(error = %e, "exited with error");
    }
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    start: Screen,
    seed: Option<u64>,
    settings: Settings,
    store: Rc<FileStore>,
) -> io::Result<()> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let sync_ms = settings.notes_sync_interval_ms;
    let mut game = GameController::new(
        TerminalPresenter::new(settings.default_count, settings.default_footprint),
        rng,
        settings,
    );
    let mut menu = MenuScreen::new();
    let mut writer: Option<NotesWriter<Rc<FileStore>>> = None;
    let mut reader: Option<NotesReader<Rc<FileStore>>> = None;

    let mut screen = Screen::Menu;
    open_screen(start, &mut screen, &mut writer, &mut reader, &store, sync_ms);

    let version = build_info::version_line();
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|frame| {
            let area = frame.size();
            if ui::draw_size_guard(frame, area) {
                return;
            }
            match screen {
                Screen::Menu => menu.draw(frame, area, &version),
                Screen::Memory => render_memory_scene(frame, area, game.presenter_mut()),
                Screen::Writer => {
                    if let Some(writer) = &writer {
                        render_writer_scene(frame, area, writer);
                    }
                }
                Screen::Reader => {
                    if let Some(reader) = &reader {
                        render_reader_scene(frame, area, reader);
                    }
                }
            }
        })?;

        // Poll for input (50ms non-blocking)
        if event::poll(Duration::from_millis(FRAME_POLL_MS))? {
            let result = match (event::read()?, screen) {
                (Event::Key(key), Screen::Menu) => input::handle_menu_input(key, &mut menu),
                (Event::Key(key), Screen::Memory) => input::handle_memory_key(key, &mut game),
                (Event::Mouse(mouse), Screen::Memory) => {
                    input::handle_memory_mouse(mouse, &mut game);
                    InputResult::Continue
                }
                (Event::Key(key), Screen::Writer) => match writer.as_mut() {
                    Some(writer) => input::handle_writer_input(key, writer),
                    None => InputResult::Back,
                },
                (Event::Key(key), Screen::Reader) => input::handle_reader_input(key),
                _ => InputResult::Continue,
            };

            match result {
                InputResult::Continue => {}
                InputResult::Back => {
                    writer = None;
                    reader = None;
                    screen = Screen::Menu;
                }
                InputResult::Open(item) => {
                    let target = match item {
                        MenuItem::MemoryGame => Screen::Memory,
                        MenuItem::NotesWriter => Screen::Writer,
                        MenuItem::NotesReader => Screen::Reader,
                        MenuItem::Quit => break,
                    };
                    open_screen(target, &mut screen, &mut writer, &mut reader, &store, sync_ms);
                }
                InputResult::Quit => break,
            }
        }

        // Advance timers by real elapsed time; a long stall counts as one frame
        let dt = (last_frame.elapsed().as_millis() as u64).min(MAX_FRAME_DT_MS);
        last_frame = Instant::now();
        game.tick(dt);
        if let Some(writer) = writer.as_mut() {
            writer.tick(dt);
        }
        if let Some(reader) = reader.as_mut() {
            reader.tick(dt);
        }
    }

    if let Some(writer) = writer.as_mut() {
        if let Err(e) = writer.flush() {
            warn!(error = %e, "final flush failed");
        }
    }
    info!("goodbye");
    Ok(())
}

fn open_screen(
    target: Screen,
    screen: &mut Screen,
    writer: &mut Option<NotesWriter<Rc<FileStore>>>,
    reader: &mut Option<NotesReader<Rc<FileStore>>>,
    store: &Rc<FileStore>,
    sync_ms: u64,
) {
    match target {
        Screen::Writer => *writer = Some(NotesWriter::new(Rc::clone(store), sync_ms)),
        Screen::Reader => *reader = Some(NotesReader::new(Rc::clone(store), sync_ms)),
        Screen::Menu | Screen::Memory => {}
    }
    *screen = target;
}
