//! Plain text board files: one line per row, `*` for a live cell and a
//! space for a dead one.

use std::{fs, io, path::Path};

use tracing::{debug, info};

use crate::{
    board::{check_shape, Board, DEAD},
    error::{Error, Result},
};

/// Parses board text into a `[row][column]` matrix.
///
/// A newline starts a new row unless it ends the input. Spaces and carriage
/// returns are dead cells, every other character is alive.
pub fn parse(text: &str) -> Result<Vec<Vec<bool>>> {
    let mut matrix = vec![Vec::new()];
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' => {
                if chars.peek().is_some() {
                    matrix.push(Vec::new());
                }
            }
            DEAD | '\r' => push(&mut matrix, false),
            _ => push(&mut matrix, true),
        }
    }

    check_shape(&matrix)?;
    Ok(matrix)
}

fn push(matrix: &mut [Vec<bool>], alive: bool) {
    if let Some(row) = matrix.last_mut() {
        row.push(alive);
    }
}

pub fn load(path: impl AsRef<Path>) -> Result<Board> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading board");
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::InvalidData => {
            Error::MalformedInput(format!("{} is not valid UTF-8 text", path.display()))
        }
        _ => Error::io(path, e),
    })?;
    let board = Board::from_matrix(parse(&text)?)?;
    info!(
        path = %path.display(),
        columns = board.columns(),
        rows = board.rows(),
        "loaded board"
    );
    Ok(board)
}

pub fn save(board: &Board, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, board.render()).map_err(|e| Error::io(path, e))?;
    info!(path = %path.display(), generation = board.generation().get(), "saved board");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{board::Position, error::ErrorKind};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn keeps_row_and_column_order() {
        let matrix = parse("*  \n * \n  *\n").unwrap();
        assert_eq!(
            matrix,
            vec![
                vec![true, false, false],
                vec![false, true, false],
                vec![false, false, true],
            ]
        );
    }

    #[test]
    fn final_newline_is_optional() {
        assert_eq!(parse("* \n *").unwrap(), parse("* \n *\n").unwrap());
    }

    #[test]
    fn carriage_returns_are_dead_cells() {
        // a CRLF file keeps its shape, with one extra dead column
        let matrix = parse("*\r\n \r\n").unwrap();
        assert_eq!(matrix, vec![vec![true, false], vec![false, false]]);
    }

    #[test]
    fn any_other_character_is_alive() {
        assert_eq!(parse("#.o\n").unwrap(), vec![vec![true; 3]]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = parse("***\n*\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(err.to_string().contains("row 2"), "{}", err);

        // a blank line before the end counts as an empty row
        let err = parse("**\n**\n\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn empty_input_is_rejected() {
        for text in ["", "\n"].iter() {
            assert_eq!(parse(text).unwrap_err().kind(), ErrorKind::MalformedInput);
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("life_common_text_does_not_exist.txt");
        let err = load(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn binary_file_is_malformed_input() {
        let path = std::env::temp_dir().join(format!("life_common_binary_{}.txt", std::process::id()));
        fs::write(&path, [b'*', 0xff, 0xfe, b'\n']).unwrap();
        let err = load(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert_eq!(err.kind(), ErrorKind::MalformedInput, "{}", err);
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut board = Board::with_rng(23, 9, 1, 0.4, &mut rng).unwrap();
        board.advance();

        let path = std::env::temp_dir().join(format!("life_common_round_trip_{}.txt", std::process::id()));
        save(&board, &path).unwrap();
        let loaded = load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!((loaded.columns(), loaded.rows()), (23, 9));
        assert_eq!(loaded.alive_count(), board.alive_count());
        for row in 0..board.rows() {
            for column in 0..board.columns() {
                let position = Position::new(column, row);
                assert_eq!(loaded.is_alive(position), board.is_alive(position));
            }
        }
    }

    #[test]
    fn all_dead_board_round_trips() {
        let text = "   \n   \n";
        let board = Board::from_matrix(parse(text).unwrap()).unwrap();
        assert_eq!(board.alive_count(), 0);
        assert_eq!(board.render(), text);
    }
}
