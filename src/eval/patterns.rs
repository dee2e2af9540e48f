//! Window pattern classification for Gomoku evaluation
//!
//! Every (cell, axis) pair on the board defines a 9-cell window: the
//! cells within ±4 steps of the center along that axis. A window is
//! encoded as a base-3 integer from one side's perspective
//! (0 = empty, 1 = mine, 2 = opponent; off-board cells encode as 2,
//! blocking exactly like an opponent stone). With 3^9 = 19,683 possible
//! encodings the full classification table is small enough to precompute
//! exhaustively; it is built lazily exactly once and shared process-wide.
//!
//! Classification is derived from the geometric definitions (runs,
//! flanks, single-gap completions), not from pattern-string matching,
//! so it is uniform over all 19,683 encodings.

use std::sync::OnceLock;

use crate::board::{Board, Player, Pos};

/// Cells on each side of a window's center.
pub const WINDOW_RADIUS: i32 = 4;
/// Total cells in a window.
pub const WINDOW_LEN: usize = 9;
/// Number of distinct window encodings (3^9).
pub const TABLE_SIZE: usize = 19_683;

const EMPTY: u8 = 0;
const MINE: u8 = 1;
const THEIRS: u8 = 2;

/// Threat category of a 9-cell window, weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pattern {
    None,
    BlockedTwo,
    OpenTwo,
    BlockedThree,
    OpenThree,
    BlockedFour,
    OpenFour,
    Five,
}

impl Pattern {
    /// Fixed score per category. Monotonically increasing with threat
    /// level; Five dominates everything below it.
    #[inline]
    #[must_use]
    pub const fn score(self) -> i32 {
        match self {
            Pattern::Five => 100_000,
            Pattern::OpenFour => 10_000,
            Pattern::BlockedFour => 5_000,
            Pattern::OpenThree => 1_000,
            Pattern::BlockedThree => 100,
            Pattern::OpenTwo => 10,
            Pattern::BlockedTwo => 1,
            Pattern::None => 0,
        }
    }
}

/// Complete classification table over all window encodings.
///
/// Each entry holds the pattern for the encoding's "mine" stones and for
/// its "opponent" stones (the 1↔2-swapped window). The second half is
/// only meaningful for windows with no off-board cells: off-board
/// encodes as 2, which the swap would turn into the opponent's own
/// stones. Callers near an edge encode from the other perspective and
/// read the first half instead.
pub struct PatternTable {
    pairs: Box<[(Pattern, Pattern)]>,
}

static TABLE: OnceLock<PatternTable> = OnceLock::new();

impl PatternTable {
    /// Process-wide table, built on first use.
    #[must_use]
    pub fn global() -> &'static PatternTable {
        TABLE.get_or_init(PatternTable::build)
    }

    fn build() -> Self {
        let mut pairs = vec![(Pattern::None, Pattern::None); TABLE_SIZE];
        for (code, pair) in pairs.iter_mut().enumerate() {
            let cells = decode(code as u16);
            *pair = (classify_cells(&cells), classify_cells(&swap_sides(&cells)));
        }
        Self {
            pairs: pairs.into_boxed_slice(),
        }
    }

    /// Classify a window encoding: (pattern for mine, pattern for the
    /// opponent's stones in the same window).
    #[inline]
    #[must_use]
    pub fn classify(&self, code: u16) -> (Pattern, Pattern) {
        self.pairs[code as usize]
    }
}

/// Swap mine and opponent digits; the mirror image of an encoding.
#[must_use]
pub fn mirror_encoding(code: u16) -> u16 {
    let mut cells = decode(code);
    cells = swap_sides(&cells);
    encode_cells(&cells)
}

/// Encode the window centered at `center` along `axis`, from
/// `perspective`'s point of view. Off-board cells encode as blocking.
#[must_use]
pub fn encode_window(board: &Board, center: Pos, axis: (i8, i8), perspective: Player) -> u16 {
    let mut code = 0u16;
    let mut weight = 1u16;
    for k in -WINDOW_RADIUS..=WINDOW_RADIUS {
        let digit = match center.offset(axis, k) {
            None => THEIRS,
            Some(p) => match board.get(p) {
                None => EMPTY,
                Some(side) if side == perspective => MINE,
                Some(_) => THEIRS,
            },
        };
        code += u16::from(digit) * weight;
        weight = weight.saturating_mul(3);
    }
    code
}

/// Encode the window centered at `center` as if `perspective` had just
/// played there, without mutating the board. Used by move ordering to
/// score the pattern a candidate move would create.
#[must_use]
pub fn encode_window_with_move(
    board: &Board,
    center: Pos,
    axis: (i8, i8),
    perspective: Player,
) -> u16 {
    let mut code = 0u16;
    let mut weight = 1u16;
    for k in -WINDOW_RADIUS..=WINDOW_RADIUS {
        let digit = if k == 0 {
            MINE
        } else {
            match center.offset(axis, k) {
                None => THEIRS,
                Some(p) => match board.get(p) {
                    None => EMPTY,
                    Some(side) if side == perspective => MINE,
                    Some(_) => THEIRS,
                },
            }
        };
        code += u16::from(digit) * weight;
        weight = weight.saturating_mul(3);
    }
    code
}

fn decode(code: u16) -> [u8; WINDOW_LEN] {
    let mut cells = [0u8; WINDOW_LEN];
    let mut rest = code as usize;
    for cell in &mut cells {
        *cell = (rest % 3) as u8;
        rest /= 3;
    }
    cells
}

fn encode_cells(cells: &[u8; WINDOW_LEN]) -> u16 {
    let mut code = 0u16;
    for i in (0..WINDOW_LEN).rev() {
        code = code * 3 + u16::from(cells[i]);
    }
    code
}

fn swap_sides(cells: &[u8; WINDOW_LEN]) -> [u8; WINDOW_LEN] {
    let mut out = *cells;
    for cell in &mut out {
        *cell = match *cell {
            MINE => THEIRS,
            THEIRS => MINE,
            other => other,
        };
    }
    out
}

/// Maximal consecutive runs of mine stones: (start, length).
fn runs(cells: &[u8; WINDOW_LEN]) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < WINDOW_LEN {
        if cells[i] == MINE {
            let start = i;
            while i < WINDOW_LEN && cells[i] == MINE {
                i += 1;
            }
            out.push((start, i - start));
        } else {
            i += 1;
        }
    }
    out
}

/// Count of empty in-window flanks (0..=2) for a run. A flank outside
/// the window counts as blocked, same as an opponent stone.
fn open_flanks(cells: &[u8; WINDOW_LEN], start: usize, len: usize) -> usize {
    let mut open = 0;
    if start > 0 && cells[start - 1] == EMPTY {
        open += 1;
    }
    if start + len < WINDOW_LEN && cells[start + len] == EMPTY {
        open += 1;
    }
    open
}

/// Does filling some single empty cell produce a run of at least
/// `target` through that cell? The run must pass through the fill, so a
/// pre-existing dead run elsewhere in the window does not count.
fn single_fill_reaches(cells: &[u8; WINDOW_LEN], target: usize) -> bool {
    for i in 0..WINDOW_LEN {
        if cells[i] != EMPTY {
            continue;
        }
        let mut len = 1;
        let mut j = i;
        while j > 0 && cells[j - 1] == MINE {
            len += 1;
            j -= 1;
        }
        j = i;
        while j + 1 < WINDOW_LEN && cells[j + 1] == MINE {
            len += 1;
            j += 1;
        }
        if len >= target {
            return true;
        }
    }
    false
}

/// Classify a window from the perspective its cells are encoded in.
///
/// Precedence: Five > OpenFour > BlockedFour > OpenThree > BlockedThree
/// > OpenTwo > BlockedTwo > None; the strongest pattern present wins.
fn classify_cells(cells: &[u8; WINDOW_LEN]) -> Pattern {
    let run_list = runs(cells);

    if run_list.iter().any(|&(_, len)| len >= 5) {
        return Pattern::Five;
    }

    if run_list
        .iter()
        .any(|&(start, len)| len == 4 && open_flanks(cells, start, len) == 2)
    {
        return Pattern::OpenFour;
    }
    // One-flank fours and single-gap fours (MM_MM, M_MMM): one stone
    // away from five, exactly one playable completion in this window.
    if single_fill_reaches(cells, 5) {
        return Pattern::BlockedFour;
    }

    let mut blocked_three = false;
    for &(start, len) in &run_list {
        if len == 3 {
            match open_flanks(cells, start, len) {
                2 => return Pattern::OpenThree,
                1 => blocked_three = true,
                _ => {}
            }
        }
    }
    // Gapped threes whose gap-fill makes a four also count as blocked.
    if blocked_three || single_fill_reaches(cells, 4) {
        return Pattern::BlockedThree;
    }

    let mut blocked_two = false;
    for &(start, len) in &run_list {
        if len == 2 {
            match open_flanks(cells, start, len) {
                2 => return Pattern::OpenTwo,
                1 => blocked_two = true,
                _ => {}
            }
        }
    }
    if blocked_two {
        return Pattern::BlockedTwo;
    }

    Pattern::None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build an encoding from a 9-char picture: `M` mine, `O` opponent,
    /// `_` empty. Index 0 is offset -4, index 8 is offset +4.
    fn code(picture: &str) -> u16 {
        assert_eq!(picture.len(), WINDOW_LEN);
        let mut cells = [0u8; WINDOW_LEN];
        for (i, ch) in picture.chars().enumerate() {
            cells[i] = match ch {
                '_' => EMPTY,
                'M' => MINE,
                'O' => THEIRS,
                other => panic!("bad cell char {other}"),
            };
        }
        encode_cells(&cells)
    }

    fn classify(picture: &str) -> Pattern {
        PatternTable::global().classify(code(picture)).0
    }

    #[test]
    fn test_score_hierarchy() {
        assert!(Pattern::Five.score() > Pattern::OpenFour.score());
        assert!(Pattern::OpenFour.score() > Pattern::BlockedFour.score());
        assert!(Pattern::BlockedFour.score() > Pattern::OpenThree.score());
        assert!(Pattern::OpenThree.score() > Pattern::BlockedThree.score());
        assert!(Pattern::BlockedThree.score() > Pattern::OpenTwo.score());
        assert!(Pattern::OpenTwo.score() > Pattern::BlockedTwo.score());
        assert!(Pattern::BlockedTwo.score() > Pattern::None.score());
        assert_eq!(Pattern::Five.score(), 100_000);
        assert_eq!(Pattern::None.score(), 0);
    }

    #[test]
    fn test_fives() {
        assert_eq!(classify("MMMMM____"), Pattern::Five);
        assert_eq!(classify("__MMMMM__"), Pattern::Five);
        assert_eq!(classify("OMMMMMO__"), Pattern::Five);
        assert_eq!(classify("MMMMMMMMM"), Pattern::Five);
    }

    #[test]
    fn test_open_four() {
        assert_eq!(classify("_MMMM____"), Pattern::OpenFour);
        assert_eq!(classify("___MMMM__"), Pattern::OpenFour);
    }

    #[test]
    fn test_blocked_four() {
        // One flank blocked by an opponent stone
        assert_eq!(classify("OMMMM____"), Pattern::BlockedFour);
        // One flank blocked by the window edge
        assert_eq!(classify("MMMM_____"), Pattern::BlockedFour);
        assert_eq!(classify("_____MMMM"), Pattern::BlockedFour);
        // Single-gap fours, playable to complete five
        assert_eq!(classify("MM_MM____"), Pattern::BlockedFour);
        assert_eq!(classify("M_MMM____"), Pattern::BlockedFour);
        assert_eq!(classify("OMMM_M___"), Pattern::BlockedFour);
    }

    #[test]
    fn test_dead_four_is_none() {
        // Blocked on both sides with no gap: can never become five here
        assert_eq!(classify("OMMMMO___"), Pattern::None);
    }

    #[test]
    fn test_threes() {
        assert_eq!(classify("_MMM_____"), Pattern::OpenThree);
        assert_eq!(classify("___MMM___"), Pattern::OpenThree);
        assert_eq!(classify("OMMM_____"), Pattern::BlockedThree);
        assert_eq!(classify("MMM______"), Pattern::BlockedThree);
        // Gapped three: filling the gap makes a four
        assert_eq!(classify("OMM_M____"), Pattern::BlockedThree);
    }

    #[test]
    fn test_twos() {
        assert_eq!(classify("___MM____"), Pattern::OpenTwo);
        assert_eq!(classify("OMM______"), Pattern::BlockedTwo);
        assert_eq!(classify("MM_______"), Pattern::BlockedTwo);
    }

    #[test]
    fn test_none() {
        assert_eq!(classify("_________"), Pattern::None);
        assert_eq!(classify("____M____"), Pattern::None);
        assert_eq!(classify("OMO______"), Pattern::None);
        assert_eq!(classify("OMMO_____"), Pattern::None);
    }

    #[test]
    fn test_strongest_pattern_wins() {
        // A five and a loose stone: still Five
        assert_eq!(classify("MMMMM__M_"), Pattern::Five);
        // An open three outranks a blocked two in the same window
        assert_eq!(classify("_MMM__OMM"), Pattern::OpenThree);
    }

    #[test]
    fn test_exhaustive_determinism_and_mirror_symmetry() {
        let table = PatternTable::global();
        for code in 0..TABLE_SIZE as u16 {
            // Deterministic: a second lookup agrees
            assert_eq!(table.classify(code), table.classify(code));
            // Side symmetry: my pattern in this window is the opponent's
            // pattern in the mirrored window
            let (mine, theirs) = table.classify(code);
            let (m_mine, m_theirs) = table.classify(mirror_encoding(code));
            assert_eq!(mine, m_theirs, "code {code}");
            assert_eq!(theirs, m_mine, "code {code}");
        }
    }

    #[test]
    fn test_mirror_roundtrip() {
        for code in [0u16, 1, 42, 9_999, (TABLE_SIZE - 1) as u16] {
            assert_eq!(mirror_encoding(mirror_encoding(code)), code);
        }
    }

    #[test]
    fn test_encode_window_off_board_blocks() {
        let board = Board::new();
        // Corner cell along the horizontal axis: offsets -4..-1 are all
        // off-board and must read as blocking for either perspective
        let code_black = encode_window(&board, Pos::new(0, 0), (0, 1), Player::Black);
        let code_white = encode_window(&board, Pos::new(0, 0), (0, 1), Player::White);
        assert_eq!(code_black, code_white);

        let cells = decode(code_black);
        assert_eq!(&cells[0..4], &[THEIRS; 4]);
        assert_eq!(&cells[4..], &[EMPTY; 5]);
    }

    #[test]
    fn test_encode_window_perspectives() {
        let mut board = Board::new();
        board.place_stone(Pos::new(7, 8), Player::Black);
        board.place_stone(Pos::new(7, 6), Player::White);

        let black = encode_window(&board, Pos::new(7, 7), (0, 1), Player::Black);
        let white = encode_window(&board, Pos::new(7, 7), (0, 1), Player::White);

        // Interior window: the two perspectives are mirror encodings
        assert_eq!(mirror_encoding(black), white);

        let cells = decode(black);
        assert_eq!(cells[3], THEIRS); // White at offset -1
        assert_eq!(cells[4], EMPTY); // center
        assert_eq!(cells[5], MINE); // Black at offset +1
    }

    #[test]
    fn test_encode_window_with_move() {
        let mut board = Board::new();
        for col in 3..7 {
            board.place_stone(Pos::new(7, col), Player::Black);
        }

        // Playing (7,7) would complete five
        let code = encode_window_with_move(&board, Pos::new(7, 7), (0, 1), Player::Black);
        assert_eq!(PatternTable::global().classify(code).0, Pattern::Five);

        // For White the same cell merely blocks: four Black stones read
        // as opponent, the placed stone is a lone mine
        let code = encode_window_with_move(&board, Pos::new(7, 7), (0, 1), Player::White);
        assert_eq!(PatternTable::global().classify(code).0, Pattern::None);
    }

    #[test]
    fn test_five_line_classifies_five_from_every_center() {
        let mut board = Board::new();
        for col in 5..10 {
            board.place_stone(Pos::new(7, col), Player::Black);
        }
        // Any window on the row that contains all five stones sees Five
        for col in 5..10 {
            let code = encode_window(&board, Pos::new(7, col), (0, 1), Player::Black);
            assert_eq!(PatternTable::global().classify(code).0, Pattern::Five);
        }
    }
}
