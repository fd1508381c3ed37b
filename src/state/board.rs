use super::data::ImageEntry;
use crate::error::BoardError;

/// The ordered frames of the current game.
///
/// Positions are contiguous from 0 and stay stable until the next
/// `replace_all` or `clear`; a position is the identity `toggle` works with.
#[derive(Debug, Default, Clone)]
pub struct Board {
    entries: Vec<ImageEntry>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard every frame and install `entries` in the given order
    pub fn replace_all(&mut self, entries: Vec<ImageEntry>) {
        self.entries = entries;
    }

    /// Flip one frame and return its new `revealed` flag
    pub fn toggle(&mut self, index: usize) -> Result<bool, BoardError> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(BoardError::OutOfRange { index, len })?;

        entry.revealed = !entry.revealed;
        Ok(entry.revealed)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::EncodedImage;

    fn board_of(names: &[&str]) -> Board {
        let mut board = Board::new();
        board.replace_all(
            names
                .iter()
                .map(|name| ImageEntry::new(EncodedImage::png(Vec::new()), *name))
                .collect(),
        );
        board
    }

    fn revealed(board: &Board) -> Vec<bool> {
        board.entries().iter().map(|e| e.revealed).collect()
    }

    #[test]
    fn test_toggle_twice_restores_flag() {
        let mut board = board_of(&["a.jpg", "b.png", "c.gif"]);

        assert_eq!(board.toggle(1), Ok(true));
        assert_eq!(board.toggle(1), Ok(false));
        assert_eq!(revealed(&board), vec![false, false, false]);
    }

    #[test]
    fn test_toggle_only_touches_its_index() {
        let mut board = board_of(&["a.jpg", "b.png", "c.gif", "d.webp"]);
        board.toggle(0).unwrap();

        board.toggle(2).unwrap();
        assert_eq!(revealed(&board), vec![true, false, true, false]);
    }

    #[test]
    fn test_toggle_out_of_range() {
        let mut board = board_of(&["a.jpg"]);
        assert_eq!(board.toggle(1), Err(BoardError::OutOfRange { index: 1, len: 1 }));
    }

    #[test]
    fn test_clear_invalidates_old_indices() {
        let mut board = board_of(&["a.jpg", "b.png"]);
        board.clear();

        for index in 0..2 {
            assert_eq!(board.toggle(index), Err(BoardError::OutOfRange { index, len: 0 }));
        }
    }

    #[test]
    fn test_replace_all_keeps_order_and_resets_flags() {
        let mut board = board_of(&["old.png"]);
        board.toggle(0).unwrap();

        board.replace_all(vec![
            ImageEntry::new(EncodedImage::png(Vec::new()), "a.jpg"),
            ImageEntry::new(EncodedImage::png(Vec::new()), "b.png"),
        ]);

        let names: Vec<_> = board.entries().iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
        assert_eq!(revealed(&board), vec![false, false]);
    }

    proptest::proptest! {
        /// Toggling twice restores the flag and leaves every other frame alone
        #[test]
        fn toggle_is_an_isolated_involution(
            flags in proptest::collection::vec(proptest::bool::ANY, 1..24),
            pick in proptest::prelude::any::<proptest::sample::Index>(),
        ) {
            let mut board = Board::new();
            board.replace_all(
                flags
                    .iter()
                    .enumerate()
                    .map(|(i, &revealed)| ImageEntry {
                        revealed,
                        ..ImageEntry::new(EncodedImage::png(Vec::new()), format!("{i}.png"))
                    })
                    .collect(),
            );
            let index = pick.index(flags.len());

            let flipped = board.toggle(index).unwrap();
            proptest::prop_assert_eq!(flipped, !flags[index]);
            for (i, entry) in board.entries().iter().enumerate() {
                if i != index {
                    proptest::prop_assert_eq!(entry.revealed, flags[i]);
                }
            }

            board.toggle(index).unwrap();
            proptest::prop_assert_eq!(revealed(&board), flags);
        }
    }

    #[test]
    fn test_replace_all_empty() {
        let mut board = board_of(&["a.jpg"]);
        board.replace_all(Vec::new());
        assert_eq!(board.count(), 0);
    }
}
