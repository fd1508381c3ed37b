use super::board::Board;
use super::data::ImageEntry;
use crate::error::BoardError;

/// Which screen the game is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Choosing images; the upload and roster controls are live
    #[default]
    Idle,
    /// Board is laid out and frames can be flipped
    Active,
}

/// A board plus the Idle/Active phase around it
#[derive(Debug, Default)]
pub struct Session {
    board: Board,
    phase: SessionPhase,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Install a fresh batch of images and go back to choosing
    pub fn replace_all(&mut self, entries: Vec<ImageEntry>) {
        self.board.replace_all(entries);
        self.phase = SessionPhase::Idle;
    }

    pub fn can_start(&self) -> bool {
        self.board.count() > 0
    }

    /// Idle -> Active; refused while the board is empty
    pub fn start(&mut self) -> Result<(), BoardError> {
        if !self.can_start() {
            return Err(BoardError::EmptyBoard);
        }
        self.phase = SessionPhase::Active;
        Ok(())
    }

    pub fn toggle(&mut self, index: usize) -> Result<bool, BoardError> {
        self.board.toggle(index)
    }

    /// Active -> Idle with an empty board
    pub fn reset(&mut self) {
        self.board.clear();
        self.phase = SessionPhase::Idle;
    }
}
