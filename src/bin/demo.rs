//! `gridscope-demo` - interactive gradient world
//!
//! Renders a hue/brightness gradient world with a sample overlay and a
//! cell tooltip.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin gridscope-demo
//! cargo run --bin gridscope-demo -- --color 16 --autoplay 10
//! GRIDSCOPE_LOG=/tmp/gridscope.log RUST_LOG=debug cargo run --bin gridscope-demo
//! cargo run --bin gridscope-demo -- --headless-smoke
//! ```
//!
//! Press Ctrl+Q to quit, F1 for the key list.

use gridscope::{
    Cell, ColorMode, Error, Frame, GridWorld, MainLoop, Rgb, Terminal, TickOutcome, UiLayers,
    VizConfig, WorldSource, is_tty,
};
use std::ffi::OsString;
use std::fs::File;
use std::io;
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const HELP_TEXT: &str = "gridscope-demo - zoomable terminal world viewer

USAGE:
    gridscope-demo [OPTIONS]

OPTIONS:
    -h, --help              Print this help message and exit
    --fps <N>               Cap frames per second, 0 for no cap (default: 30)
    --color <MODE>          truecolor, 16 or auto (default: auto)
    --autoplay <RATE>       Start autoplay at RATE steps per second
    --world-size <WxH>      World dimensions (default: 120x60)
    --headless-smoke        Render one frame into memory and exit
    --headless-size <WxH>   Screen size for --headless-smoke (default: 80x24)

ENVIRONMENT:
    GRIDSCOPE_LOG           Write logs to this file
    RUST_LOG                Log filter (default: info)
";

const GLYPH_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Application configuration parsed from command-line arguments.
#[derive(Clone, Debug)]
struct Config {
    fps: u32,
    color: Option<ColorMode>,
    autoplay: Option<f64>,
    world_size: (u16, u16),
    headless_smoke: bool,
    headless_size: (u16, u16),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 30,
            color: None,
            autoplay: None,
            world_size: (120, 60),
            headless_smoke: false,
            headless_size: (80, 24),
        }
    }
}

/// Result of CLI parsing.
enum ParseResult {
    Config(Config),
    Help,
    Error(String),
}

impl Config {
    fn from_args<I>(args: I) -> ParseResult
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        // Skip program name
        args.next();

        while let Some(arg) = args.next() {
            let arg_str = arg.to_string_lossy();

            match arg_str.as_ref() {
                "-h" | "--help" => return ParseResult::Help,

                "--fps" => match take_value(&mut args, "--fps") {
                    Ok(v) => match v.parse::<u32>() {
                        Ok(n) => config.fps = n,
                        Err(_) => return ParseResult::Error(format!("Invalid --fps value: {v}")),
                    },
                    Err(msg) => return ParseResult::Error(msg),
                },

                "--color" => match take_value(&mut args, "--color") {
                    Ok(v) => match v.as_str() {
                        "truecolor" | "24bit" => config.color = Some(ColorMode::TrueColor),
                        "16" => config.color = Some(ColorMode::Color16),
                        "auto" => config.color = None,
                        _ => {
                            return ParseResult::Error(format!(
                                "Unknown --color: {v} (valid: truecolor, 16, auto)"
                            ));
                        }
                    },
                    Err(msg) => return ParseResult::Error(msg),
                },

                "--autoplay" => match take_value(&mut args, "--autoplay") {
                    Ok(v) => match v.parse::<f64>() {
                        Ok(rate) if rate > 0.0 => config.autoplay = Some(rate),
                        _ => {
                            return ParseResult::Error(format!(
                                "Invalid --autoplay value: {v} (must be positive)"
                            ));
                        }
                    },
                    Err(msg) => return ParseResult::Error(msg),
                },

                "--world-size" => match take_value(&mut args, "--world-size") {
                    Ok(v) => match parse_size(&v) {
                        Some(size) => config.world_size = size,
                        None => return ParseResult::Error(format!("Invalid --world-size: {v} (use WxH)")),
                    },
                    Err(msg) => return ParseResult::Error(msg),
                },

                "--headless-smoke" => config.headless_smoke = true,

                "--headless-size" => match take_value(&mut args, "--headless-size") {
                    Ok(v) => match parse_size(&v) {
                        Some(size) => config.headless_size = size,
                        None => {
                            return ParseResult::Error(format!("Invalid --headless-size: {v} (use WxH)"));
                        }
                    },
                    Err(msg) => return ParseResult::Error(msg),
                },

                other => return ParseResult::Error(format!("Unknown option: {other}")),
            }
        }

        ParseResult::Config(config)
    }

    fn viz_config(&self) -> VizConfig {
        let mut viz = VizConfig::detect();
        if let Some(mode) = self.color {
            viz = viz.with_color_mode(mode);
        }
        if let Some(rate) = self.autoplay {
            viz = viz.with_auto_play(rate);
        }
        viz.target_fps = self.fps;
        viz
    }
}

fn take_value<I>(args: &mut I, flag: &str) -> Result<String, String>
where
    I: Iterator<Item = OsString>,
{
    args.next()
        .map(|v| v.to_string_lossy().into_owned())
        .ok_or_else(|| format!("{flag} requires a value"))
}

/// Parse a size string like "80x24" into (width, height).
fn parse_size(s: &str) -> Option<(u16, u16)> {
    let (w, h) = s.split_once('x')?;
    let w = w.parse::<u16>().ok()?;
    let h = h.parse::<u16>().ok()?;
    (w > 0 && h > 0).then_some((w, h))
}

/// Hue runs left to right, brightness top to bottom.
fn gradient_world(width: u16, height: u16) -> GridWorld {
    let fw = f64::from(width.max(2) - 1);
    let fh = f64::from(height.max(2) - 1);
    GridWorld::from_fn(u32::from(width), u32::from(height), |x, y| {
        let hue = x as f64 / fw * 360.0;
        let value = 0.25 + 0.75 * (y as f64 / fh);
        let bg = Rgb::from_hsv(hue, 1.0, value);
        let fg = if bg.luma() < 140 {
            Rgb::new(240, 240, 240)
        } else {
            Rgb::new(20, 20, 20)
        };
        let ch = GLYPH_RAMP[((x + y) as usize) % GLYPH_RAMP.len()];
        Cell::new(ch, fg, bg)
    })
}

/// World plus a marker that walks one cell per simulation step.
struct Scene {
    world: GridWorld,
    marker: (f64, f64),
}

impl Scene {
    fn new(world: GridWorld) -> Self {
        Self {
            world,
            marker: (10.0, 10.0),
        }
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        for _ in 0..frame.steps() {
            self.marker.0 = (self.marker.0 + 1.0) % self.world.width() as f64;
        }

        frame.draw_world(&self.world);
        frame.draw_rect_world(self.marker.0, self.marker.1, 3.0, 2.0, '#', Rgb::BLACK, Rgb::YELLOW);
        frame.draw_circle_world(60.0, 30.0, 12.0, 'o', Rgb::WHITE, Rgb::RED);

        let (w, _) = frame.screen_size();
        let label = format!("steps: {}", frame.steps());
        frame.draw_text_screen(w - 16, 1, &label, Rgb::WHITE, Rgb::BLUE);
    }
}

/// Log to the file named by `GRIDSCOPE_LOG`; without it nothing is
/// installed, since stdout and stderr belong to the UI.
fn init_logging() {
    let Some(path) = std::env::var_os("GRIDSCOPE_LOG") else {
        return;
    };
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Cannot open log file {}: {err}", path.to_string_lossy());
            return;
        }
    };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init();
}

fn main() -> gridscope::Result<()> {
    match Config::from_args(std::env::args_os()) {
        ParseResult::Config(config) => {
            init_logging();
            if config.headless_smoke {
                run_headless_smoke(&config)
            } else {
                run_interactive(&config)
            }
        }
        ParseResult::Help => {
            print!("{HELP_TEXT}");
            Ok(())
        }
        ParseResult::Error(msg) => {
            eprintln!("Error: {msg}");
            eprintln!("Run with --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn run_interactive(config: &Config) -> gridscope::Result<()> {
    if !is_tty(&io::stdin()) || !is_tty(&io::stdout()) {
        eprintln!("Not a terminal; try --headless-smoke");
        return Err(Error::NotATerminal);
    }
    let (ww, wh) = config.world_size;
    let mut scene = Scene::new(gradient_world(ww, wh));
    let (world_w, world_h) = (i64::from(ww), i64::from(wh));

    let mut app = MainLoop::new(Terminal::new(io::stdout()), config.viz_config()).with_tooltip(
        move |x, y| {
            let inside = (0..world_w).contains(&x) && (0..world_h).contains(&y);
            inside.then(|| format!("Cell {x},{y}"))
        },
    );
    info!(world_w, world_h, "demo starting");
    app.run(|frame| scene.draw(frame))
}

/// Draw a single frame into memory; no tty required.
fn run_headless_smoke(config: &Config) -> gridscope::Result<()> {
    let (w, h) = config.headless_size;
    eprintln!("Running headless smoke test ({w}x{h})...");

    let (ww, wh) = config.world_size;
    let mut scene = Scene::new(gradient_world(ww, wh));
    let terminal = Terminal::new(Vec::new()).with_fixed_size(w, h);
    let mut app = MainLoop::new(terminal, config.viz_config().with_layers(UiLayers::ALL))
        .with_tooltip(|x, y| Some(format!("Cell {x},{y}")));

    let outcome = app.tick(0.0, &mut |frame: &mut Frame<'_>| scene.draw(frame))?;
    if outcome != TickOutcome::Rendered {
        warn!(?outcome, "smoke frame not rendered");
        eprintln!("Smoke test failed: no frame rendered");
        std::process::exit(1);
    }
    let written = app.terminal_mut().writer_mut().len();
    eprintln!("Rendered {w}x{h} frame, {written} bytes of output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(strs: &[&str]) -> Vec<OsString> {
        strs.iter().map(|s| OsString::from(*s)).collect()
    }

    fn parse(strs: &[&str]) -> Config {
        match Config::from_args(args(strs)) {
            ParseResult::Config(c) => c,
            _ => panic!("Expected Config"),
        }
    }

    #[test]
    fn test_default_config() {
        let config = parse(&["demo"]);
        assert_eq!(config.fps, 30);
        assert_eq!(config.color, None);
        assert_eq!(config.world_size, (120, 60));
        assert!(!config.headless_smoke);
    }

    #[test]
    fn test_flags() {
        let config = parse(&["demo", "--fps", "0", "--color", "16", "--autoplay", "12.5"]);
        assert_eq!(config.fps, 0);
        assert_eq!(config.color, Some(ColorMode::Color16));
        assert_eq!(config.autoplay, Some(12.5));

        let viz = config.viz_config();
        assert!(viz.auto_play);
        assert_eq!(viz.color_mode, ColorMode::Color16);
        assert_eq!(viz.target_fps, 0);
    }

    #[test]
    fn test_help_and_errors() {
        assert!(matches!(Config::from_args(args(&["demo", "-h"])), ParseResult::Help));
        assert!(matches!(Config::from_args(args(&["demo", "--fps"])), ParseResult::Error(_)));
        assert!(matches!(
            Config::from_args(args(&["demo", "--color", "mono"])),
            ParseResult::Error(_)
        ));
        assert!(matches!(Config::from_args(args(&["demo", "--bogus"])), ParseResult::Error(_)));
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("80x24"), Some((80, 24)));
        assert_eq!(parse_size("0x24"), None);
        assert_eq!(parse_size("80"), None);
    }

    #[test]
    fn test_gradient_world() {
        let world = gradient_world(10, 5);
        assert_eq!((world.width(), world.height()), (10, 5));
        let corner = world.cell(0, 0).unwrap();
        assert_eq!(corner.ch, ' ');
        assert_eq!(corner.fg, Rgb::new(240, 240, 240));
        assert_eq!(world.cell(3, 4).unwrap().ch, '#');
        assert!(world.cell(10, 0).is_none());
    }
}
