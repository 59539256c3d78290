// tily: block programs on a tiled board

use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use tily::board::Board;
use tily::config::Config;
use tily::interpreter::{NoDelay, RunOutcome, Runner, Sleeper, SpeedControl};
use tily::logging::{self, LogTarget};
use tily::program::Workspace;
use tily::project::{self, StartCorner};
use tily::ui::App;

#[derive(Parser)]
#[command(name = "tily", version, about = "Block programs on a tiled board")]
struct Cli {
    /// Extra config file, read after the user and local ones
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Board rows (overrides config and project)
    #[arg(long, global = true)]
    rows: Option<i64>,

    /// Board columns (overrides config and project)
    #[arg(long, global = true)]
    cols: Option<i64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive board (default)
    Play {
        /// Project file to open and save to
        file: Option<PathBuf>,
    },

    /// Run a project headless and print the final board
    Run(RunArgs),

    /// Write an empty project
    New(NewArgs),

    /// Print a sample config and the files config was read from
    Config,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Project file to run
    file: PathBuf,

    /// Print the board on every redraw
    #[arg(long)]
    trace: bool,

    /// Pace the run with real delays at this speed (5-100)
    #[arg(long)]
    speed: Option<i64>,

    /// Export the final board as a portable bitmap, optionally naming the file
    #[arg(long, value_name = "BASENAME")]
    export: Option<Option<String>>,
}

#[derive(clap::Args)]
struct NewArgs {
    /// Project file to create
    file: PathBuf,

    /// Start preset
    #[arg(long, value_enum)]
    start: Option<StartCorner>,

    /// Overwrite an existing file
    #[arg(short, long)]
    force: bool,
}

/// Board from config, then the project's settings, then explicit CLI flags
fn prepare_board(cli: &Cli, board: &mut Board, corner: StartCorner) {
    if cli.rows.is_some() || cli.cols.is_some() {
        let rows = cli.rows.unwrap_or(board.rows() as i64);
        let cols = cli.cols.unwrap_or(board.cols() as i64);
        board.set_grid(rows, cols);
        corner.apply(board);
    }
    log::debug!("board {}x{}", board.rows(), board.cols());
}

fn configured_board(config: &Config) -> Board {
    let mut board = Board::new(config.rows(), config.cols());
    config.start().apply(&mut board);
    board
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let (config, sources) = Config::load(cli.config.as_deref());

    match &cli.command {
        None => play(&cli, &config, None),
        Some(Command::Play { file }) => play(&cli, &config, file.as_deref()),
        Some(Command::Run(args)) => run_headless(&cli, &config, args),
        Some(Command::New(args)) => new_project(&cli, &config, args),
        Some(Command::Config) => {
            print!("{}", Config::sample_config());
            if sources.is_empty() {
                eprintln!("# no config files found, using defaults");
            }
            for source in &sources {
                eprintln!("# read {}", source.display());
            }
            Ok(())
        }
    }
}

fn play(
    cli: &Cli,
    config: &Config,
    file: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let target = match &config.log_file {
        Some(path) => LogTarget::File(PathBuf::from(path)),
        None => LogTarget::Off,
    };
    logging::init(target)?;

    let project_path = file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.project_file());
    let mut workspace = Workspace::new();
    let mut board = configured_board(config);
    let mut corner = config.start();

    if project_path.exists() {
        match project::load_from_file(&project_path, &mut workspace, &mut board) {
            Ok(settings) => corner = settings.corner(),
            Err(e) => fail(e),
        }
    } else if file.is_some() {
        eprintln!(
            "{} does not exist yet; it will be created on save",
            project_path.display()
        );
    }
    prepare_board(cli, &mut board, corner);

    let runner = Runner::new(board, SpeedControl::new(config.speed()));
    let mut app = App::new(runner, workspace, corner)
        .with_project_path(project_path)
        .with_export(PathBuf::from("."), config.export_basename());

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

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

fn run_headless(
    cli: &Cli,
    config: &Config,
    args: &RunArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    logging::init(LogTarget::Stderr)?;

    let mut workspace = Workspace::new();
    let mut board = configured_board(config);
    let settings = match project::load_from_file(&args.file, &mut workspace, &mut board) {
        Ok(settings) => settings,
        Err(e) => fail(e),
    };
    prepare_board(cli, &mut board, settings.corner());

    if args.trace {
        board.set_draw_hook(|b| println!("{}\n", b));
    }

    let speed = SpeedControl::new(args.speed.unwrap_or_else(|| config.speed()));
    let mut runner = Runner::new(board, speed);
    let result = if args.speed.is_some() {
        let mut sleeper = Sleeper::default();
        let result = runner.run(&workspace, &mut sleeper);
        for notice in &sleeper.notices {
            eprintln!("{}", notice.message());
        }
        result
    } else {
        runner.run(&workspace, &mut NoDelay)
    };

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => fail(e),
    };
    if outcome != RunOutcome::Completed {
        log::warn!("run ended as {:?}", outcome);
    }

    let final_board = runner.board();
    print!("{}", final_board);
    let (row, col) = final_board.position();
    println!(
        "piece at ({}, {}), {} cells colored",
        row,
        col,
        final_board.fill_colors().len()
    );

    if let Some(basename) = &args.export {
        let basename = basename.clone().unwrap_or_else(|| config.export_basename());
        let bitmap = final_board.export_bitmap();
        let path = bitmap.write_to(Path::new("."), &basename)?;
        println!("wrote {} ({})", path.display(), bitmap.format.magic());
    }

    Ok(())
}

fn new_project(
    cli: &Cli,
    config: &Config,
    args: &NewArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    logging::init(LogTarget::Stderr)?;

    if args.file.exists() && !args.force {
        fail(format!(
            "{} already exists (use --force to overwrite)",
            args.file.display()
        ));
    }

    let corner = args.start.unwrap_or_else(|| config.start());
    let mut board = configured_board(config);
    corner.apply(&mut board);
    prepare_board(cli, &mut board, corner);

    let workspace = Workspace::new();
    if let Err(e) = project::save_to_file(&args.file, &workspace, &board) {
        fail(e);
    }
    println!(
        "created {} ({}x{}, start {})",
        args.file.display(),
        board.rows(),
        board.cols(),
        corner.label()
    );
    Ok(())
}
