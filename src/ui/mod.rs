/// View helpers for the game window
pub mod board;
