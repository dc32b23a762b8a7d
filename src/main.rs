use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::{Parser, Subcommand};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use indicatif::{ProgressBar, ProgressStyle};

use asciimate::ascii::RenderOptions;
use asciimate::config::Config;
use asciimate::effects::{EffectKind, EffectSession};
use asciimate::pipeline::{convert_animation, convert_still, export_frames};
use asciimate::playback::{Player, MAX_INTERVAL_MS, MIN_INTERVAL_MS};
use asciimate::source::{FrameSource, ImageFileSource};

/// Parse and validate render width (1-1000 characters)
fn parse_width(s: &str) -> Result<u32, String> {
    let width: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(1..=1000).contains(&width) {
        return Err(format!(
            "Width must be between 1 and 1000 characters, got {}",
            width
        ));
    }
    Ok(width)
}

/// Parse and validate effect intensity (0-100)
fn parse_intensity(s: &str) -> Result<u8, String> {
    let intensity: u64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if intensity > 100 {
        return Err(format!(
            "Intensity must be between 0 and 100, got {}",
            intensity
        ));
    }
    Ok(intensity as u8)
}

/// Parse and validate playback interval (50-1000 ms)
fn parse_interval(s: &str) -> Result<u64, String> {
    let interval: u64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(MIN_INTERVAL_MS..=MAX_INTERVAL_MS).contains(&interval) {
        return Err(format!(
            "Interval must be between {} and {} ms, got {}",
            MIN_INTERVAL_MS, MAX_INTERVAL_MS, interval
        ));
    }
    Ok(interval)
}

/// Parse a procedural effect name
fn parse_effect(s: &str) -> Result<EffectKind, String> {
    EffectKind::from_str(s).ok_or_else(|| {
        let names: Vec<String> = EffectKind::all().iter().map(|e| e.to_string()).collect();
        format!(
            "Unknown effect '{}'. Available effects: {}",
            s,
            names.join(", ")
        )
    })
}

/// asciimate: images and GIFs as ASCII art in your terminal
#[derive(Parser)]
#[command(name = "asciimate")]
#[command(version, about = "Images and GIFs as ASCII art in your terminal")]
#[command(long_about = "Convert images and animated GIFs to monospace character art, \
    export animation frames as numbered text files, and play animations back in \
    the terminal. Still images are animated with procedural effects.")]
#[command(after_help = "EXAMPLES:
    # Render a photo to stdout at 100 characters wide
    asciimate render photo.jpg -w 100

    # Convert an animated GIF to numbered text files
    asciimate convert clip.gif -o clip_frames

    # Play a GIF in the terminal
    asciimate play clip.gif

    # Animate a still image with the rain effect
    asciimate play photo.jpg -e rain --intensity 80")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an image as ASCII art
    ///
    /// Animated inputs render their first frame; use `convert` or `play`
    /// for the full animation.
    #[command(after_help = "EXAMPLES:
    asciimate render photo.jpg                   # Default 80 characters wide
    asciimate render photo.jpg -w 120            # Wider output
    asciimate render photo.png --black-as-space  # Dark pixels become blanks
    asciimate render photo.jpg -o photo.txt      # Save to a file")]
    Render {
        /// Image file to render (PNG, JPEG, GIF, ...)
        input: PathBuf,

        /// Output width in characters (1-1000)
        /// Default: 80 (or from config file)
        #[arg(long, short = 'w', value_parser = parse_width)]
        width: Option<u32>,

        /// Map near-black pixels to blank cells instead of dense glyphs
        #[arg(long, short = 'b')]
        black_as_space: bool,

        /// Write the ASCII art to this file instead of stdout
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,

        /// Custom config file path (default: ~/.config/asciimate/config.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Convert an animation to numbered text files
    ///
    /// Every frame is rendered eagerly and written as
    /// `<NAME>_frame_NNN.txt`; a failed frame aborts the whole conversion
    /// and writes nothing.
    #[command(after_help = "EXAMPLES:
    asciimate convert clip.gif                     # Exports to clip_frames/
    asciimate convert clip.gif -o art --name cat   # art/cat_frame_001.txt ...
    asciimate convert photo.jpg                    # Single-frame export")]
    Convert {
        /// Animated GIF (or still image) to convert
        input: PathBuf,

        /// Directory to write the text files into
        /// Default: <INPUT stem>_frames in the current directory
        #[arg(long, short = 'o')]
        out_dir: Option<PathBuf>,

        /// Base name for the exported files
        /// Default: the input file's stem
        #[arg(long)]
        name: Option<String>,

        /// Output width in characters (1-1000)
        /// Default: 80 (or from config file)
        #[arg(long, short = 'w', value_parser = parse_width)]
        width: Option<u32>,

        /// Map near-black pixels to blank cells instead of dense glyphs
        #[arg(long, short = 'b')]
        black_as_space: bool,

        /// Custom config file path (default: ~/.config/asciimate/config.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Play an animation or a procedural effect in the terminal
    ///
    /// Animated inputs play their rendered frames in a loop. Still images
    /// animate with a procedural effect (wave unless configured otherwise).
    #[command(after_help = "EXAMPLES:
    asciimate play clip.gif                      # Play an animated GIF
    asciimate play clip.gif -i 200               # Slower playback
    asciimate play photo.jpg                     # Animate a still (wave)
    asciimate play photo.jpg -e rain             # Rain effect instead
    asciimate play photo.jpg -e wave --intensity 80

CONTROLS (while playing):
    space    Pause / resume
    n, right Step forward (while paused or stopped)
    p, left  Step backward (while paused or stopped)
    s        Stop and rewind
    q, Esc   Quit")]
    Play {
        /// Image or GIF file to play
        input: PathBuf,

        /// Procedural effect for still images (wave, flicker, cycle, glitch, rain, morph)
        #[arg(long, short = 'e', value_parser = parse_effect)]
        effect: Option<EffectKind>,

        /// Effect intensity (0-100)
        /// Default: 50 (or from config file)
        #[arg(long, value_parser = parse_intensity)]
        intensity: Option<u8>,

        /// Frame interval in milliseconds (50-1000)
        /// Default: 100 (or from config file)
        #[arg(long, short = 'i', value_parser = parse_interval)]
        interval: Option<u64>,

        /// Output width in characters (1-1000)
        /// Default: 80 (or from config file)
        #[arg(long, short = 'w', value_parser = parse_width)]
        width: Option<u32>,

        /// Map near-black pixels to blank cells instead of dense glyphs
        #[arg(long, short = 'b')]
        black_as_space: bool,

        /// Custom config file path (default: ~/.config/asciimate/config.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

/// Load the config file.
///
/// An explicit --config path must exist; with no flag, a missing default
/// file silently falls back to built-in defaults and any other failure
/// warns and falls back.
fn load_config(path: Option<&PathBuf>) -> Config {
    match Config::load(path.map(|p| p.as_path())) {
        Ok(cfg) => cfg,
        Err(e) => {
            if path.is_some() {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            eprintln!("Warning: Failed to load config file: {}", e);
            eprintln!("Using default settings.\n");
            Config::default()
        }
    }
}

/// Merge render settings: CLI args > config file > built-in defaults
fn merge_render_options(width: Option<u32>, black_as_space: bool, cfg: &Config) -> RenderOptions {
    RenderOptions {
        width: width.unwrap_or(cfg.render.width),
        black_as_space: black_as_space || cfg.render.black_as_space,
    }
}

fn make_progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.green/white} {pos}/{len} frames")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    bar
}

/// Run the render command: one frame to stdout or a file.
fn run_render(input: &Path, out: Option<PathBuf>, options: &RenderOptions) -> Result<(), String> {
    let source = ImageFileSource::open(input)
        .map_err(|e| format!("Failed to open '{}': {}", input.display(), e))?;
    let frame =
        convert_still(&source, options).map_err(|e| format!("Render failed: {}", e))?;

    match out {
        Some(path) => {
            fs::write(&path, frame.to_text())
                .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
            println!(
                "Saved {}x{} characters to {}",
                frame.width(),
                frame.height(),
                path.display()
            );
        }
        None => println!("{}", frame),
    }
    Ok(())
}

/// Run the convert command: all frames to numbered text files.
fn run_convert(
    input: &Path,
    out_dir: Option<PathBuf>,
    name: Option<String>,
    options: &RenderOptions,
) -> Result<(), String> {
    let mut source = ImageFileSource::open(input)
        .map_err(|e| format!("Failed to open '{}': {}", input.display(), e))?;

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("ascii")
        .to_string();
    let out_dir = out_dir.unwrap_or_else(|| PathBuf::from(format!("{}_frames", stem)));
    let base_name = name.unwrap_or(stem);

    let bar = make_progress_bar(source.frame_count() as u64);
    let sequence = convert_animation(&mut source, options, |done, _| {
        bar.set_position(done as u64);
    })
    .map_err(|e| format!("Conversion failed: {}", e))?;
    bar.finish_and_clear();

    let paths = export_frames(&sequence, &out_dir, &base_name)
        .map_err(|e| format!("Failed to write frames to '{}': {}", out_dir.display(), e))?;

    let (grid_w, grid_h) = sequence
        .frame(0)
        .map(|frame| (frame.width(), frame.height()))
        .unwrap_or((0, 0));
    println!(
        "Exported {} frame{} ({}x{} characters) to {}",
        paths.len(),
        if paths.len() == 1 { "" } else { "s" },
        grid_w,
        grid_h,
        out_dir.display()
    );
    Ok(())
}

/// Run the play command: convert, then hand off to the terminal UI.
///
/// An effect given on the command line is refused for animated inputs;
/// an effect coming only from the config file is ignored for them, since
/// it is a standing preference for stills.
fn run_play(
    input: &Path,
    cli_effect: Option<EffectKind>,
    config_effect: Option<EffectKind>,
    intensity: u8,
    interval: u64,
    options: &RenderOptions,
) -> Result<(), String> {
    let mut source = ImageFileSource::open(input)
        .map_err(|e| format!("Failed to open '{}': {}", input.display(), e))?;

    let mut player = Player::new();
    player.set_interval(interval);

    let frame_total = if source.frame_count() > 1 {
        if cli_effect.is_some() {
            return Err(
                "Effects animate still images; this input already has frames".to_string(),
            );
        }
        let bar = make_progress_bar(source.frame_count() as u64);
        let sequence = convert_animation(&mut source, options, |done, _| {
            bar.set_position(done as u64);
        })
        .map_err(|e| format!("Conversion failed: {}", e))?;
        bar.finish_and_clear();
        let total = sequence.len();
        player.load_sequence(sequence);
        Some(total)
    } else {
        // Effect: CLI > config > wave
        let kind = cli_effect.or(config_effect).unwrap_or(EffectKind::Wave);
        let base =
            convert_still(&source, options).map_err(|e| format!("Render failed: {}", e))?;
        player.load_effect(EffectSession::new(base, kind, f32::from(intensity) / 100.0));
        None
    };

    player.play().map_err(|e| e.to_string())?;

    if let Err(e) = setup_ctrlc_handler() {
        eprintln!("Warning: Could not set up Ctrl+C handler: {}", e);
    }

    run_playback_ui(&mut player, frame_total).map_err(|e| format!("Terminal error: {}", e))
}

#[derive(PartialEq)]
enum KeyAction {
    Continue,
    Quit,
}

fn handle_key(player: &mut Player, key: &KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return KeyAction::Quit;
        }
        KeyCode::Char(' ') => {
            if player.is_playing() {
                player.pause();
            } else {
                // Content is loaded before the UI starts.
                let _ = player.play();
            }
        }
        KeyCode::Char('n') | KeyCode::Right => player.step_forward(),
        KeyCode::Char('p') | KeyCode::Left => player.step_backward(),
        KeyCode::Char('s') => player.stop(),
        _ => {}
    }
    KeyAction::Continue
}

fn status_line(player: &Player, frame_total: Option<usize>) -> String {
    let position = match frame_total {
        Some(total) => format!("frame {}/{}", player.position() as usize + 1, total),
        None => format!("tick {}", player.position()),
    };
    format!(
        " {} | {} | {}ms | space pause  n/p step  s stop  q quit",
        player.mode(),
        position,
        player.interval_ms()
    )
}

fn draw_screen(stdout: &mut io::Stdout, frame: &str, status: &str) -> io::Result<()> {
    queue!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    let mut row = 0u16;
    for line in frame.lines() {
        queue!(stdout, MoveTo(0, row), Print(line))?;
        row = row.saturating_add(1);
    }
    queue!(stdout, MoveTo(0, row.saturating_add(1)), Print(status))?;
    stdout.flush()
}

/// Draw frames and handle keys until the user quits.
fn run_playback_ui(player: &mut Player, frame_total: Option<usize>) -> io::Result<()> {
    let mut stdout = io::stdout();
    let _guard = ScreenGuard::enter(&mut stdout)?;

    let mut last_screen = String::new();
    loop {
        if ctrlc_received() {
            break;
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(player, &key) == KeyAction::Quit
                {
                    break;
                }
            }
        }

        let frame = player.current_frame().unwrap_or_default();
        let status = status_line(player, frame_total);
        let screen = format!("{}\n{}", frame, status);
        if screen != last_screen {
            draw_screen(&mut stdout, &frame, &status)?;
            last_screen = screen;
        }
    }
    Ok(())
}

/// Static flag to track if the playback screen is active (for panic handler)
static SCREEN_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Guard that restores the terminal on drop, including on panics.
struct ScreenGuard;

impl ScreenGuard {
    /// Enter raw mode on the alternate screen with the cursor hidden.
    fn enter(stdout: &mut io::Stdout) -> io::Result<Self> {
        install_panic_hook();

        enable_raw_mode()?;
        if let Err(e) = crossterm::execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        SCREEN_ACTIVE.store(true, Ordering::SeqCst);
        Ok(Self)
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        SCREEN_ACTIVE.store(false, Ordering::SeqCst);
        // Best-effort cleanup - ignore errors during drop
        let _ = crossterm::execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Install a panic hook that restores terminal state before panicking.
/// This ensures the terminal is usable even if the app panics mid-playback.
fn install_panic_hook() {
    static HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);

    if HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        return; // Already installed
    }

    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        if SCREEN_ACTIVE.load(Ordering::SeqCst) {
            let _ = crossterm::execute!(io::stdout(), Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
            SCREEN_ACTIVE.store(false, Ordering::SeqCst);
        }
        original_hook(panic_info);
    }));
}

/// Global flag for handling Ctrl+C across the application
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Check if Ctrl+C has been received.
fn ctrlc_received() -> bool {
    CTRLC_RECEIVED.load(Ordering::SeqCst)
}

/// Set up the Ctrl+C handler.
///
/// Installed right before playback so that Ctrl+C still kills the process
/// during a long conversion.
fn setup_ctrlc_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        CTRLC_RECEIVED.store(true, Ordering::SeqCst);
    })
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render {
            input,
            width,
            black_as_space,
            out,
            config,
        }) => {
            let cfg = load_config(config.as_ref());
            let options = merge_render_options(width, black_as_space, &cfg);
            if let Err(e) = run_render(&input, out, &options) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Convert {
            input,
            out_dir,
            name,
            width,
            black_as_space,
            config,
        }) => {
            let cfg = load_config(config.as_ref());
            let options = merge_render_options(width, black_as_space, &cfg);
            if let Err(e) = run_convert(&input, out_dir, name, &options) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Play {
            input,
            effect,
            intensity,
            interval,
            width,
            black_as_space,
            config,
        }) => {
            let cfg = load_config(config.as_ref());
            let options = merge_render_options(width, black_as_space, &cfg);

            let config_effect = cfg
                .effect
                .kind
                .as_ref()
                .and_then(|k| EffectKind::from_str(k));

            // Intensity: CLI > config > default (50)
            let intensity = intensity.unwrap_or(cfg.effect.intensity);

            // Interval: CLI > config > default (100)
            let interval = interval.unwrap_or(cfg.playback.interval);

            if let Err(e) = run_play(&input, effect, config_effect, intensity, interval, &options)
            {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            // Show brief help when no command is provided
            println!("asciimate {}", env!("CARGO_PKG_VERSION"));
            println!("Images and GIFs as ASCII art in your terminal\n");
            println!("USAGE:");
            println!("    asciimate <COMMAND>\n");
            println!("COMMANDS:");
            println!("    render   Render an image as ASCII art");
            println!("    convert  Convert an animation to numbered text files");
            println!("    play     Play an animation or a procedural effect in the terminal");
            println!("    help     Print this message or the help of a subcommand\n");
            println!("Run 'asciimate --help' for more details and examples.");
        }
    }
}
