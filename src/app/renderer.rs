use std::{fmt, io::Write};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::{maze::Maze, session::MazeSession};

/// One character cell of the drawn maze. Cells and walls share one grid, so an R x C maze
/// is drawn as (2R + 1) x (2C + 1) glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Wall,
    Empty,
    Searched,
    Solution,
    Player,
    Door,
}

impl Glyph {
    /// The width of each glyph when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Glyph::Wall => "⬜".with(Color::White),
            Glyph::Empty => "  ".with(Color::Reset),
            Glyph::Searched => "* ".with(Color::Blue),
            Glyph::Solution => "🟨".with(Color::Yellow),
            Glyph::Player => "🟡".with(Color::Yellow),
            Glyph::Door => "🟥".with(Color::Red),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Glyph::CELL_WIDTH as usize,
                "Each glyph must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// Size of the glyph grid for `maze`, as (width, height).
pub fn frame_size(maze: &Maze) -> (usize, usize) {
    (maze.cols() * 2 + 1, maze.rows() * 2 + 1)
}

/// Lays the session out as rows of glyphs.
///
/// Passages between two cells take the glyph of the cells when both share it, so a
/// solution or explored region reads as one continuous trail.
pub fn frame(session: &MazeSession) -> Vec<Vec<Glyph>> {
    let maze = session.maze();
    let (width, height) = frame_size(maze);
    let mut grid = vec![vec![Glyph::Wall; width]; height];

    let player = session.manual_position();
    let glyph_of = |i: usize| {
        let visit = session.visit(i);
        if Some(i) == player {
            Glyph::Player
        } else if visit.on_solution_path {
            Glyph::Solution
        } else if visit.searched {
            Glyph::Searched
        } else {
            Glyph::Empty
        }
    };
    let trail = |a: Glyph, b: Glyph| match (a, b) {
        (Glyph::Solution, Glyph::Solution) => Glyph::Solution,
        (Glyph::Player | Glyph::Searched, Glyph::Player | Glyph::Searched) => Glyph::Searched,
        _ => Glyph::Empty,
    };

    for i in 0..maze.len() {
        let (row, col) = maze.coords_of(i);
        let (y, x) = (row * 2 + 1, col * 2 + 1);
        let walls = session.walls(i);
        let here = glyph_of(i);
        grid[y][x] = here;
        if !walls.right {
            grid[y][x + 1] = trail(here, glyph_of(i + 1));
        }
        if !walls.bottom {
            grid[y + 1][x] = if i == maze.exit() {
                Glyph::Door
            } else {
                trail(here, glyph_of(i + maze.cols()))
            };
        }
        if i == maze.entrance() && !walls.left {
            grid[y][x - 1] = Glyph::Door;
        }
    }
    grid
}

/// Draws the session and a status line to the terminal.
pub fn draw(stdout: &mut impl Write, session: &MazeSession, status: &str) -> std::io::Result<()> {
    queue!(stdout, cursor::MoveTo(0, 0), terminal::Clear(ClearType::All))?;
    for (y, row) in frame(session).iter().enumerate() {
        stdout.queue(cursor::MoveTo(0, y as u16))?;
        for glyph in row {
            stdout.queue(style::Print(glyph))?;
        }
    }
    let (_, height) = frame_size(session.maze());
    queue!(
        stdout,
        cursor::MoveTo(0, height as u16),
        style::PrintStyledContent(status.with(Color::Cyan).attribute(Attribute::Bold)),
    )?;
    stdout.flush()
}
