//! `gridscope` - zoomable terminal viewport for 2-D cell worlds
//!
//! Renders any [`WorldSource`] into a cell grid through a pan/zoom
//! [`Viewport`], composites overlays and floating [`Window`]s with alpha
//! blending, and streams the result to a truecolor or 16-color terminal.
//! Keyboard and SGR mouse input is decoded on a background thread.
//!
//! ```no_run
//! use gridscope::{Cell, GridWorld, MainLoop, Rgb, Terminal, VizConfig};
//!
//! let world = GridWorld::filled(64, 32, Cell::new('#', Rgb::WHITE, Rgb::BLUE));
//! let mut app = MainLoop::new(Terminal::new(std::io::stdout()), VizConfig::detect())
//!     .with_tooltip(|x, y| Some(format!("Cell {x},{y}")));
//! app.run(|frame| frame.draw_world(&world))?;
//! # Ok::<(), gridscope::Error>(())
//! ```

// Crate-level lint configuration
#![warn(unsafe_code)] // Unsafe code needs justification (required for termios FFI)
#![allow(clippy::cast_possible_truncation)] // Intentional coordinate casts
#![allow(clippy::cast_sign_loss)] // Intentional coordinate conversions
#![allow(clippy::cast_precision_loss)] // Intentional for color math
#![allow(clippy::cast_possible_wrap)] // Intentional coordinate conversions
#![allow(clippy::module_name_repetitions)] // WindowManager in window etc
#![allow(clippy::struct_excessive_bools)] // Terminal and mouse state need multiple flags
#![allow(clippy::missing_errors_doc)] // Only terminal I/O fails
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::suboptimal_flops)] // Standard math notation is clearer than mul_add
#![allow(clippy::cast_lossless)] // as casts are fine for primitive widening
#![allow(clippy::items_after_statements)] // Common pattern in tests

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod input;
pub mod render;
pub mod scheduler;
pub mod terminal;
pub mod viewport;
pub mod window;
pub mod world;

// Re-export core types at crate root
pub use buffer::CellBuffer;
pub use cell::Cell;
pub use color::Rgb;
pub use error::{Error, Result};
pub use viewport::Viewport;
pub use world::{GridWorld, TooltipProvider, WorldSource};

// Re-export input types
pub use input::{EscapeDecoder, InputEvent, InputState, KeyCode, KeyEvent, KeyModifiers, MouseReport};

// Re-export configuration and output types
pub use ansi::ColorMode;
pub use config::{UiLayers, VizConfig};
pub use terminal::{RawModeGuard, Terminal, enable_raw_mode, is_tty, terminal_size};

// Re-export the loop and what the draw callback touches
pub use frame::Frame;
pub use scheduler::{MainLoop, TickOutcome};
pub use window::{Window, WindowId, WindowManager};
