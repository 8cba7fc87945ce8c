mod action;
mod app;
mod event;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use app::App;
use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use event::{Event, EventHandler};
use procmon::config::{self, load_config, load_config_from_path};
use procmon::logging::{init_tracing_json, parse_level};
use procmon::report::{render_json, render_text};
use procmon::system::collector::Collector;
use procmon::system::process::SortOrder;
use procmon::system::source::CounterSource;

#[derive(Parser)]
#[command(
    name = "procmon",
    about = "Terminal system monitor reading CPU, memory and process metrics from /proc"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Minimum gap between the two CPU readings, in milliseconds
    #[arg(long)]
    sample_interval: Option<u64>,

    /// Maximum number of processes shown
    #[arg(long)]
    max_processes: Option<usize>,

    /// Process table root (default /proc)
    #[arg(long)]
    proc_dir: Option<String>,

    /// Sort order by RAM: asc or desc
    #[arg(long)]
    sort: Option<String>,

    /// Print one report and exit instead of starting the terminal UI.
    #[arg(long, default_value_t = false)]
    once: bool,

    /// With --once, print the snapshot as JSON.
    #[arg(long, default_value_t = false, requires = "once")]
    json: bool,

    /// Write JSON-lines logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level for --log-file: error, warn, info, debug, trace
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_tracing_json(path, parse_level(&cli.log_level))?;
    }
    let config = load_config_for_cli(&cli);

    if cli.once {
        return run_once(&config, cli.json);
    }

    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, config).await;

    ratatui::restore();

    result
}

async fn run(terminal: &mut ratatui::DefaultTerminal, config: config::Config) -> Result<()> {
    let tick_rate = Duration::from_millis(config.general.refresh_rate_ms.max(1));
    let mut app = App::new(&config);
    let mut events = EventHandler::new(tick_rate);
    tracing::info!(
        refresh_rate_ms = config.general.refresh_rate_ms,
        proc_dir = %config.paths.proc_dir,
        "monitor started"
    );

    terminal.draw(|frame| ui::draw(frame, &app))?;

    while app.running {
        if let Some(event) = events.next().await {
            let mut should_draw = false;
            match event {
                Event::Key(key) => {
                    if key.kind == crossterm::event::KeyEventKind::Press {
                        let action = app.map_key(key);
                        app.dispatch(action);
                        should_draw = true;
                    }
                }
                Event::Tick => {
                    app.refresh_data_async().await;
                    should_draw = true;
                }
                Event::Resize => {
                    should_draw = true;
                }
            }
            if should_draw {
                terminal.draw(|frame| ui::draw(frame, &app))?;
            }
        } else {
            return Err(eyre!("terminal event stream closed"));
        }
    }

    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(interval) = cli.sample_interval {
        config.general.sample_interval_ms = interval;
    }
    if let Some(max) = cli.max_processes {
        config.general.max_processes = max;
    }
    if let Some(ref sort) = cli.sort {
        config.general.default_sort = sort.clone();
    }
    if let Some(ref dir) = cli.proc_dir {
        config.paths.proc_dir = dir.clone();
    }

    config
}

fn run_once(config: &config::Config, json: bool) -> Result<()> {
    let mut collector = Collector::with_interval(
        CounterSource::from_config(&config.paths),
        Duration::from_millis(config.general.sample_interval_ms),
    )
    .with_sort_order(SortOrder::from_str_config(&config.general.default_sort));
    let snapshot = collector.refresh();

    if json {
        println!("{}", render_json(&snapshot)?);
    } else {
        print!("{}", render_text(&snapshot, config.general.max_processes));
    }
    Ok(())
}
