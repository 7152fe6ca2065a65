//! Core game state and logic
//!
//! [`GameEngine`] owns the board, the falling piece, the preview piece
//! and the score. Hosts drive it with commands (move, rotate, tick,
//! reset) and read it back through [`Snapshot`]s; nothing outside the
//! engine gets a mutable handle on game state.

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH, Board};
use crate::error::Result;
use crate::piece::{Direction, Piece, Position};
use crate::randomizer::{PieceSource, UniformRandomizer};
use crate::score::Score;
use serde::Serialize;
use tracing::{debug, trace};

/// Where every new piece appears: top row, fourth column
pub const SPAWN_POSITION: Position = Position::new(0, (BOARD_WIDTH / 2) as i32 - 2);

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameState {
    Running,
    /// Terminal until [`GameEngine::reset`]
    GameOver,
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    Reset,
}

/// What a single [`GameEngine::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game is over; nothing changed
    Ignored,
    /// The piece moved down one row
    Moved,
    /// The piece locked, `lines` rows were cleared and the next piece spawned
    Locked { lines: usize },
    /// The piece locked but the next piece had no room to spawn
    ToppedOut { lines: usize },
}

/// Read-only copy of everything a renderer needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub board: Board,
    pub active: Piece,
    pub position: Position,
    pub next: Piece,
    pub score: Score,
    pub game_over: bool,
}

impl Snapshot {
    /// Board cell values with the active piece drawn in
    pub fn composed_values(&self) -> [[u8; BOARD_WIDTH]; BOARD_HEIGHT] {
        let mut values = self.board.values();
        let value = self.active.cell_value();
        for (row, col) in self.active.cells_at(self.position) {
            if let (Ok(row), Ok(col)) = (usize::try_from(row), usize::try_from(col)) {
                if row < BOARD_HEIGHT && col < BOARD_WIDTH {
                    values[row][col] = value;
                }
            }
        }
        values
    }
}

/// The main game struct
#[derive(Debug)]
pub struct GameEngine<S = UniformRandomizer> {
    /// Locked cells
    board: Board,
    /// Current falling piece
    active: Piece,
    /// Preview of the piece that spawns after the current one locks
    next: Piece,
    /// Top-left of the active piece's shape
    position: Position,
    score: Score,
    state: GameState,
    source: S,
}

impl GameEngine<UniformRandomizer> {
    /// Create a new game with pieces drawn from OS entropy
    pub fn new() -> Self {
        Self::with_source(UniformRandomizer::from_entropy())
    }

    /// Create a new game whose piece sequence is fixed by `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self::with_source(UniformRandomizer::with_seed(seed))
    }
}

impl Default for GameEngine<UniformRandomizer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PieceSource> GameEngine<S> {
    /// Create a new game drawing pieces from `source`
    pub fn with_source(mut source: S) -> Self {
        let active = Piece::new(source.next_piece());
        let next = Piece::new(source.next_piece());
        debug!(active = ?active.kind, next = ?next.kind, "new game");
        Self {
            board: Board::new(),
            active,
            next,
            position: SPAWN_POSITION,
            score: Score::new(),
            state: GameState::Running,
            source,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> &Piece {
        &self.active
    }

    pub fn next(&self) -> &Piece {
        &self.next
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    /// Copy out the current state for rendering
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            active: self.active.clone(),
            position: self.position,
            next: self.next.clone(),
            score: self.score.clone(),
            game_over: self.is_game_over(),
        }
    }

    /// Process an action
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::MoveLeft => {
                self.move_left();
            }
            Action::MoveRight => {
                self.move_right();
            }
            Action::SoftDrop => {
                self.soft_drop();
            }
            Action::Rotate => {
                self.rotate();
            }
            Action::Reset => self.reset(),
        }
    }

    /// Try to move left, returns true if successful
    pub fn move_left(&mut self) -> bool {
        self.move_by(Direction::Left)
    }

    /// Try to move right, returns true if successful
    pub fn move_right(&mut self) -> bool {
        self.move_by(Direction::Right)
    }

    /// Shift the piece one column; a blocked move is a no-op
    pub fn move_by(&mut self, direction: Direction) -> bool {
        if self.is_game_over() {
            return false;
        }
        let target = self.position.offset(0, direction.offset());
        if self.board.collides(&self.active, target) {
            return false;
        }
        self.position = target;
        true
    }

    /// Like [`move_by`](Self::move_by) for hosts that speak in column
    /// offsets. Anything but -1 or 1 is rejected before touching state.
    pub fn move_by_offset(&mut self, offset: i32) -> Result<bool> {
        let direction = Direction::try_from(offset)?;
        Ok(self.move_by(direction))
    }

    /// Rotate clockwise in place; rejected without kicks if the rotated
    /// shape would collide
    pub fn rotate(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }
        let rotated = self.active.rotated();
        if self.board.collides(&rotated, self.position) {
            return false;
        }
        self.active = rotated;
        true
    }

    /// Player-requested drop; identical to a gravity tick
    pub fn soft_drop(&mut self) -> TickOutcome {
        self.tick()
    }

    /// Move the piece down one row, or lock it if it is resting on
    /// something
    pub fn tick(&mut self) -> TickOutcome {
        if self.is_game_over() {
            return TickOutcome::Ignored;
        }

        let below = self.position.offset(1, 0);
        if !self.board.collides(&self.active, below) {
            self.position = below;
            return TickOutcome::Moved;
        }

        self.lock_piece()
    }

    /// Lock the current piece, clear lines and spawn next
    fn lock_piece(&mut self) -> TickOutcome {
        let mut board = self.board.merged(&self.active, self.position);
        let lines = board.clear_lines();
        let delta = self.score.add_lock(lines);

        debug!(
            piece = ?self.active.kind,
            row = self.position.row,
            col = self.position.col,
            lines,
            delta,
            score = self.score.points,
            "piece locked"
        );

        // Topping out keeps the score but commits nothing else: the board,
        // the resting piece and the preview stay as they were
        if board.collides(&self.next, SPAWN_POSITION) {
            self.state = GameState::GameOver;
            debug!(score = self.score.points, lines = self.score.lines, "game over");
            return TickOutcome::ToppedOut { lines };
        }

        self.board = board;
        let fresh = Piece::new(self.source.next_piece());
        self.active = std::mem::replace(&mut self.next, fresh);
        self.position = SPAWN_POSITION;
        trace!(active = ?self.active.kind, next = ?self.next.kind, "spawned");

        TickOutcome::Locked { lines }
    }

    /// Start over with an empty board, two fresh pieces and zero score
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.active = Piece::new(self.source.next_piece());
        self.next = Piece::new(self.source.next_piece());
        self.position = SPAWN_POSITION;
        self.score = Score::new();
        self.state = GameState::Running;
        debug!(active = ?self.active.kind, next = ?self.next.kind, "game reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::error::Error;
    use crate::randomizer::ScriptedSource;
    use crate::tetromino::TetrominoType;

    fn game_with(pieces: &[TetrominoType]) -> GameEngine<ScriptedSource> {
        GameEngine::with_source(ScriptedSource::new(pieces.to_vec()))
    }

    fn fill_row(board: &mut Board, row: i32, except: &[i32]) {
        for col in 0..BOARD_WIDTH as i32 {
            if !except.contains(&col) {
                board.set(row, col, Cell::Filled(TetrominoType::I));
            }
        }
    }

    fn assert_cells_in_range(game: &GameEngine<ScriptedSource>) {
        let values = game.board().values();
        assert_eq!(values.len(), BOARD_HEIGHT);
        for row in values {
            assert_eq!(row.len(), BOARD_WIDTH);
            assert!(row.iter().all(|&v| v <= 7));
        }
    }

    #[test]
    fn test_new_game() {
        let game = game_with(&[TetrominoType::T, TetrominoType::L]);
        assert_eq!(game.state(), GameState::Running);
        assert_eq!(game.active().kind, TetrominoType::T);
        assert_eq!(game.next().kind, TetrominoType::L);
        assert_eq!(game.position(), Position::new(0, 3));
        assert_eq!(game.score().points, 0);
        assert!(game.board().is_empty());
    }

    #[test]
    fn test_o_piece_falls_to_floor() {
        let mut game = game_with(&[TetrominoType::O]);
        for _ in 0..18 {
            assert_eq!(game.tick(), TickOutcome::Moved);
        }
        assert_eq!(game.position(), Position::new(18, 3));
        assert_eq!(game.tick(), TickOutcome::Locked { lines: 0 });

        let board = game.board();
        assert_eq!(board.filled_count(), 4);
        for (row, col) in [(18, 3), (18, 4), (19, 3), (19, 4)] {
            assert_eq!(board.get(row, col), Some(Cell::Filled(TetrominoType::O)));
        }
        assert_eq!(game.score().points, 0);
        assert_eq!(game.position(), SPAWN_POSITION);
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_lock_clears_row_and_scores() {
        let mut game = game_with(&[TetrominoType::O]);
        fill_row(&mut game.board, 19, &[3, 4]);

        let mut outcome = game.tick();
        while outcome == TickOutcome::Moved {
            outcome = game.tick();
        }

        assert_eq!(outcome, TickOutcome::Locked { lines: 1 });
        assert_eq!(game.score().points, 100);
        assert_eq!(game.score().lines, 1);
        // Top half of the O slid down into the cleared row
        assert_eq!(game.board().filled_count(), 2);
        assert_eq!(game.board().get(19, 3), Some(Cell::Filled(TetrominoType::O)));
        assert_eq!(game.board().get(19, 4), Some(Cell::Filled(TetrominoType::O)));
        assert!(game.board().rows()[0].iter().all(Cell::is_empty));
    }

    #[test]
    fn test_two_adjacent_rows_clear_in_one_lock() {
        let mut game = game_with(&[TetrominoType::O]);
        fill_row(&mut game.board, 18, &[3, 4]);
        fill_row(&mut game.board, 19, &[3, 4]);

        let mut outcome = game.tick();
        while outcome == TickOutcome::Moved {
            outcome = game.tick();
        }

        assert_eq!(outcome, TickOutcome::Locked { lines: 2 });
        assert_eq!(game.score().points, 200);
        assert!(game.board().is_empty());
        assert_cells_in_range(&game);
    }

    #[test]
    fn test_move_left_then_right_round_trip() {
        let mut game = game_with(&[TetrominoType::T]);
        let start = game.position();
        assert!(game.move_left());
        assert!(game.move_right());
        assert_eq!(game.position(), start);
    }

    #[test]
    fn test_move_blocked_by_wall() {
        let mut game = game_with(&[TetrominoType::O]);
        for _ in 0..3 {
            assert!(game.move_left());
        }
        assert_eq!(game.position().col, 0);
        assert!(!game.move_left());
        assert_eq!(game.position().col, 0);

        for _ in 0..8 {
            assert!(game.move_right());
        }
        assert_eq!(game.position().col, 8);
        assert!(!game.move_right());
    }

    #[test]
    fn test_move_blocked_by_stack() {
        let mut game = game_with(&[TetrominoType::O]);
        game.board.set(0, 2, Cell::Filled(TetrominoType::Z));
        let before = game.snapshot();
        assert!(!game.move_left());
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_move_by_offset_rejects_bad_direction() {
        let mut game = game_with(&[TetrominoType::T]);
        let before = game.snapshot();
        assert!(matches!(
            game.move_by_offset(3),
            Err(Error::InvalidDirection(3))
        ));
        assert!(game.move_by_offset(0).is_err());
        assert_eq!(game.snapshot(), before);
        assert!(game.move_by_offset(-1).unwrap());
        assert_eq!(game.position().col, 2);
    }

    #[test]
    fn test_rotate_four_times() {
        let mut game = game_with(&[TetrominoType::L]);
        game.tick();
        let original = game.active().shape.clone();
        for _ in 0..4 {
            assert!(game.rotate());
        }
        assert_eq!(game.active().shape, original);
    }

    #[test]
    fn test_rotate_blocked_against_wall() {
        let mut game = game_with(&[TetrominoType::I]);
        // Stand the bar up and push it against the right wall
        game.tick();
        assert!(game.rotate());
        while game.move_right() {}
        assert_eq!(game.position().col, 9);

        let before = game.snapshot();
        assert!(!game.rotate());
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_spawn_collision_ends_game() {
        let mut game = game_with(&[TetrominoType::T, TetrominoType::O]);
        // Stack reaching the spawn rows, leaving no full line
        for row in 2..BOARD_HEIGHT as i32 {
            fill_row(&mut game.board, row, &[0]);
        }
        let filled_before = game.board().filled_count();
        let position_before = game.position();

        assert_eq!(game.tick(), TickOutcome::ToppedOut { lines: 0 });
        assert!(game.is_game_over());
        assert!(game.snapshot().game_over);

        // Nothing is placed: the T stays active where it came to rest
        // and the O stays in the preview
        assert_eq!(game.board().filled_count(), filled_before);
        assert_eq!(game.active().kind, TetrominoType::T);
        assert_eq!(game.position(), position_before);
        assert_eq!(game.next().kind, TetrominoType::O);
        assert_cells_in_range(&game);
    }

    #[test]
    fn test_top_out_keeps_score_of_final_lock() {
        let mut game = game_with(&[TetrominoType::I, TetrominoType::O]);
        assert!(game.rotate());
        // A well in column 3; only the bottom row completes when the bar lands
        for row in 1..19 {
            fill_row(&mut game.board, row, &[3, 9]);
        }
        fill_row(&mut game.board, 19, &[3]);
        // Shifts into row 1 once the bottom row clears, blocking the spawn
        game.board.set(0, 4, Cell::Filled(TetrominoType::Z));
        let before = game.board().clone();

        let mut outcome = game.tick();
        while outcome == TickOutcome::Moved {
            outcome = game.tick();
        }

        assert_eq!(outcome, TickOutcome::ToppedOut { lines: 1 });
        assert_eq!(game.score().points, 100);
        assert_eq!(game.board(), &before);
        assert_eq!(game.active().kind, TetrominoType::I);
        assert_eq!(game.position(), Position::new(16, 3));
        assert_eq!(game.next().kind, TetrominoType::O);
    }

    #[test]
    fn test_game_over_rejects_commands() {
        let mut game = game_with(&[TetrominoType::O]);
        for row in 2..BOARD_HEIGHT as i32 {
            fill_row(&mut game.board, row, &[0]);
        }
        game.tick();
        assert!(game.is_game_over());

        let frozen = game.snapshot();
        assert_eq!(game.tick(), TickOutcome::Ignored);
        assert_eq!(game.soft_drop(), TickOutcome::Ignored);
        assert!(!game.move_left());
        assert!(!game.move_right());
        assert!(!game.rotate());
        game.apply(Action::SoftDrop);
        assert_eq!(game.snapshot(), frozen);
    }

    #[test]
    fn test_reset_from_game_over() {
        let mut game = game_with(&[TetrominoType::O, TetrominoType::S, TetrominoType::J]);
        for row in 2..BOARD_HEIGHT as i32 {
            fill_row(&mut game.board, row, &[0]);
        }
        game.score.add_lock(3);
        game.tick();
        assert!(game.is_game_over());

        game.apply(Action::Reset);
        let snapshot = game.snapshot();
        assert!(!snapshot.game_over);
        assert_eq!(snapshot.score.points, 0);
        assert!(snapshot.board.is_empty());
        assert_eq!(snapshot.position, SPAWN_POSITION);
        assert!(TetrominoType::all().contains(&snapshot.active.kind));
        assert!(TetrominoType::all().contains(&snapshot.next.kind));
        assert_eq!(snapshot.active.shape, snapshot.active.kind.shape());
    }

    #[test]
    fn test_next_piece_becomes_active() {
        let mut game = game_with(&[TetrominoType::I, TetrominoType::T, TetrominoType::Z]);
        while game.tick() == TickOutcome::Moved {}
        assert_eq!(game.active().kind, TetrominoType::T);
        assert_eq!(game.next().kind, TetrominoType::Z);
    }

    #[test]
    fn test_soft_drop_matches_tick() {
        let mut a = game_with(&[TetrominoType::S, TetrominoType::Z]);
        let mut b = game_with(&[TetrominoType::S, TetrominoType::Z]);
        for _ in 0..40 {
            assert_eq!(a.tick(), b.soft_drop());
            assert_eq!(a.snapshot(), b.snapshot());
        }
    }

    #[test]
    fn test_score_never_decreases_and_cells_stay_valid() {
        let mut game = GameEngine::with_seed(1234);
        let mut last = 0;
        for step in 0..5_000 {
            match step % 7 {
                0 => game.apply(Action::MoveLeft),
                1 | 4 => game.apply(Action::MoveRight),
                2 => game.apply(Action::Rotate),
                _ => game.apply(Action::SoftDrop),
            }
            let snapshot = game.snapshot();
            assert!(snapshot.score.points >= last);
            last = snapshot.score.points;
            assert!(snapshot.board.values().iter().flatten().all(|&v| v <= 7));
            if snapshot.game_over {
                break;
            }
        }
    }

    #[test]
    fn test_composed_values_include_active_piece() {
        let game = game_with(&[TetrominoType::O]);
        let values = game.snapshot().composed_values();
        assert_eq!(values[0][3], 4);
        assert_eq!(values[1][4], 4);
        assert_eq!(values.iter().flatten().filter(|&&v| v != 0).count(), 4);
    }

    #[test]
    fn test_snapshot_serializes_cell_values() {
        let mut game = game_with(&[TetrominoType::O]);
        while game.tick() == TickOutcome::Moved {}
        let json = serde_json::to_value(game.snapshot()).unwrap();
        assert_eq!(json["game_over"], false);
        assert_eq!(json["board"].as_array().unwrap().len(), BOARD_HEIGHT);
        assert_eq!(json["board"][19][3], 4);
        assert_eq!(json["board"][0][0], 0);
        assert_eq!(json["position"]["col"], 3);
        assert_eq!(json["score"]["points"], 0);
    }
}
