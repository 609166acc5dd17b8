//! Terminal input: key and mouse types, the escape decoder, the state
//! shared with the main loop, and the background reader that ties them
//! together.

mod keyboard;
mod mouse;
mod parser;
mod reader;
mod state;

pub use keyboard::{KeyCode, KeyEvent, KeyModifiers};
pub use mouse::{MouseButton, MouseReport};
pub use parser::{EscapeDecoder, InputEvent, MAX_PENDING};
pub use reader::{InputReader, JOIN_TIMEOUT};
pub use state::{INITIAL_MOUSE, InputSnapshot, InputState};
