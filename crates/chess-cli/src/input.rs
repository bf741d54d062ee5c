//! Parsing of the lines typed during `play`.

use chess_core::{Move, PieceKind, Square};

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Move(Move),
    Resign,
    Draw,
    Promote(Square, PieceKind),
    Board,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  e2e4                  move a piece (start and end square)
  promote <sq> <piece>  exchange the pawn that just promoted on <sq>
  resign                give up the match
  draw                  agree to a draw
  board                 show the board
  help                  show this text
  quit                  leave";

/// Parses one input line.
pub fn parse(line: &str) -> Result<Input, String> {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Err("empty input".to_string());
    };

    let input = match first.to_ascii_lowercase().as_str() {
        "resign" => Input::Resign,
        "draw" => Input::Draw,
        "board" => Input::Board,
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        "promote" => {
            let square = words
                .next()
                .and_then(Square::from_algebraic)
                .ok_or("usage: promote <square> <piece>")?;
            let kind: PieceKind = words
                .next()
                .ok_or("usage: promote <square> <piece>")?
                .parse()?;
            Input::Promote(square, kind)
        }
        coordinate => Move::from_coordinate(coordinate)
            .map(Input::Move)
            .ok_or_else(|| format!("unknown command: {}", first))?,
    };

    if words.next().is_some() {
        return Err(format!("unexpected input after '{}'", first));
    }
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        let input = parse("e2e4").unwrap();
        assert_eq!(input, Input::Move(Move::from_coordinate("e2e4").unwrap()));
        assert_eq!(parse("  E7E5 ").unwrap(), Input::Move(Move::from_coordinate("e7e5").unwrap()));
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse("resign").unwrap(), Input::Resign);
        assert_eq!(parse("Draw").unwrap(), Input::Draw);
        assert_eq!(parse("board").unwrap(), Input::Board);
        assert_eq!(parse("quit").unwrap(), Input::Quit);
        assert_eq!(parse("?").unwrap(), Input::Help);
    }

    #[test]
    fn test_parse_promote() {
        let d8 = Square::from_algebraic("d8").unwrap();
        assert_eq!(
            parse("promote d8 knight").unwrap(),
            Input::Promote(d8, PieceKind::Knight)
        );
        assert!(parse("promote d8").is_err());
        assert!(parse("promote z9 queen").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("").is_err());
        assert!(parse("castle").is_err());
        assert!(parse("e2e4 now").is_err());
    }
}
