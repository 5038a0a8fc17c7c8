use super::{Instruction, Location, Program};

/// Strips everything that isn't one of the eight symbols, remembering where each one was
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    /** Human Readable positions in file */
    pub cur_line: usize,
    pub cur_col: usize,

    chars: std::str::Chars<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(chars: &'a str) -> Lexer<'a> {
        Lexer {
            cur_col: 1,
            cur_line: 1,
            chars: chars.chars(),
        }
    }

    fn consume_char(&mut self) -> Option<(char, Location)> {
        let c = self.chars.next()?;
        let location = Location {
            line: self.cur_line,
            column: self.cur_col,
        };

        self.cur_col += 1;
        if c == '\n' {
            self.cur_line += 1;
            self.cur_col = 1;
        }
        Some((c, location))
    }

    /// Next recognised instruction, comments are skipped over
    pub fn next_instruction(&mut self) -> Option<(Instruction, Location)> {
        while let Some((c, location)) = self.consume_char() {
            if let Some(instruction) = Instruction::from_symbol(c) {
                return Some((instruction, location));
            }
        }
        None
    }

    pub fn collect_program(&mut self) -> Program {
        let mut instructions = vec![];
        let mut locations = vec![];
        while let Some((instruction, location)) = self.next_instruction() {
            instructions.push(instruction);
            locations.push(location);
        }
        Program::new(instructions, locations)
    }
}

/// Filter raw source down to the canonical instruction sequence
pub fn filter(source: &str) -> Program {
    Lexer::new(source).collect_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Instruction::*;

    #[test]
    fn keeps_only_the_eight_symbols() {
        let program = filter("a+b-c>d<e.f,g[h]i");
        assert_eq!(
            program.instructions(),
            &[
                Increment, Decrement, MoveRight, MoveLeft, Output, Input, LoopOpen, LoopClose
            ]
        );
        assert_eq!(program.to_string(), "+-><.,[]");
    }

    #[test]
    fn comments_only_gives_empty_program() {
        assert!(filter("hello world! 123").is_empty());
        assert!(filter("").is_empty());
    }

    #[test]
    fn tracks_lines_and_columns() {
        let program = filter("+ +\n  -\n\n]");
        assert_eq!(program.location(0), Some(Location { line: 1, column: 1 }));
        assert_eq!(program.location(1), Some(Location { line: 1, column: 3 }));
        assert_eq!(program.location(2), Some(Location { line: 2, column: 3 }));
        assert_eq!(program.location(3), Some(Location { line: 4, column: 1 }));
        assert_eq!(program.location(4), None);
    }

    #[test]
    fn multibyte_comments_count_as_one_column() {
        let program = filter("é+");
        assert_eq!(program.location(0), Some(Location { line: 1, column: 2 }));
    }
}
