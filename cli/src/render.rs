use std::fmt::Write;

use minegrid_core::{Cell, MineSource, Session, SessionState, Visibility};

fn glyph(cell: &Cell) -> char {
    match (cell.visibility(), cell.is_mine()) {
        (Visibility::Hidden, _) => '#',
        (Visibility::Flagged, _) => 'F',
        (Visibility::Revealed, true) => '*',
        (Visibility::Revealed, false) => match cell.adjacent_mine_count() {
            0 => '.',
            // wide kernels can see more than 9 mines
            count => char::from_digit(count.into(), 36).unwrap_or('+'),
        },
    }
}

/// Text picture of the board with a status line on top.
pub fn board<S: MineSource>(session: &Session<S>) -> String {
    let grid = session.grid();
    let mut out = format!(
        "{:?}  mines left: {}  ticks: {}\n",
        session.state(),
        session.mines_left(),
        session.ticks()
    );

    let mut row = None;
    for ((r, _), cell) in grid.iter_cells() {
        if row.is_some_and(|current| current != r) {
            out.push('\n');
        }
        row = Some(r);
        out.push(glyph(cell));
    }
    out
}

pub fn verdict<S: MineSource>(session: &Session<S>) -> String {
    let mut out = String::new();
    match session.state() {
        SessionState::Won => out.push_str("You won!"),
        SessionState::Lost => {
            out.push_str("Boom, game over");
            if let Some((row, col)) = session.triggered_mine() {
                let _ = write!(out, " (mine at row {row}, column {col})");
            }
        }
        SessionState::Pending | SessionState::Active => {}
    }
    out
}
