// algoscope: step-by-step algorithm animations in the terminal

use std::fs::OpenOptions;
use std::io;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use algoscope::config::Config;
use algoscope::player::SystemClock;
use algoscope::recorder::{record, Params};
use algoscope::session::Session;
use algoscope::ui::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _guard = init_tracing(&config)?;

    let params = config.params()?;

    if config.dump {
        dump(&config, &params);
        return Ok(());
    }

    let session = Session::new(
        SystemClock,
        config.algorithm,
        params,
        config.record_config(),
        config.player_config(),
        config.scheduler(),
    );
    info!(
        algorithm = config.algorithm.name(),
        snapshots = session.player().len(),
        "starting TUI"
    );

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(session);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Logs go to `--log-file` when given, to stderr in headless mode, and
/// nowhere otherwise since the TUI owns the terminal.
fn init_tracing(config: &Config) -> io::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if let Some(path) = &config.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let (writer, guard) = tracing_appender::non_blocking(file);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .init();
        Ok(Some(guard))
    } else if config.dump {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
        Ok(None)
    } else {
        Ok(None)
    }
}

/// Headless mode: record once and print the narration of every snapshot
fn dump(config: &Config, params: &Params) {
    let timeline = record(config.algorithm, params, &config.record_config());
    println!(
        "{} ({}): {} snapshot(s)",
        config.algorithm.name(),
        config.algorithm.family().name(),
        timeline.len()
    );
    for (index, snapshot) in timeline.iter().enumerate() {
        let line = snapshot
            .source_line
            .map_or_else(|| "  ".to_string(), |l| format!("{:>2}", l + 1));
        println!("{:>5} L{} {}", index + 1, line, snapshot.narration);
    }
    println!("outcome: {:?}", timeline.outcome());
}
