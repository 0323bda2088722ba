// Library surface for headless/integration tests and reuse.
// The binary in main.rs only owns the terminal and the CLI.
pub mod app;
pub mod app_dirs;
pub mod celebration;
pub mod config;
pub mod deck;
pub mod engine;
pub mod error;
pub mod game;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod timer;
pub mod ui;
pub mod util;

pub use engine::{MatchEngine, SessionStatus, ValidationReport};
pub use error::{MatchError, TimerError};
pub use game::{Game, GameEvent};
pub use session::Pair;
pub use timer::{Countdown, Threshold};
