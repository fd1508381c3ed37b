/// State management module
///
/// This module handles all game state, including:
/// - Shared data structures (data.rs)
/// - The ordered board of frames (board.rs)
/// - The Idle/Active session around the board (session.rs)

pub mod board;
pub mod data;
pub mod session;
