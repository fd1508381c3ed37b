//! Picture-frame memory game
//!
//! Images come from the player's own files or from a preset roster. Roster
//! images are fetched, decoded and re-encoded into self-contained PNG data, then
//! laid out on a board of frames that flip when clicked.

pub mod config;
pub mod error;
pub mod logging;
pub mod materialize;
pub mod roster;
pub mod state;

pub use config::GameConfig;
pub use error::{BoardError, BuildError, MaterializeError, RosterError};
pub use state::board::Board;
pub use state::data::{EncodedImage, ImageEntry};
pub use state::session::{Session, SessionPhase};
