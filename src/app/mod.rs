pub mod renderer;

use std::{
    io::{Stdout, Write},
    time::Duration,
};

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{self, KeyCode},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::{
    app::renderer::{Glyph, draw},
    maze::{Direction, Maze},
    session::{MazeSession, SessionConfig},
    solvers::{Heuristic, MoveOutcome, Solver, StepOutcome},
};

/// Entries of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search(Solver),
    Manual,
    NewMaze,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Search(solver) => write!(f, "{}", solver),
            Action::Manual => write!(f, "Play manually"),
            Action::NewMaze => write!(f, "Generate a new maze"),
        }
    }
}

/// Timing and seeding knobs of the terminal front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppConfig {
    /// Delay between two automatic steps
    pub step_delay: Duration,
    /// Bounds for the step delay when changing speed
    pub min_step_delay: Duration,
    pub max_step_delay: Duration,
    /// How long to wait for a key press before redrawing during manual play
    pub input_poll_timeout: Duration,
    /// Seed for maze generation, `None` for a random one
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            step_delay: Duration::from_millis(15),
            min_step_delay: Duration::from_millis(1),
            max_step_delay: Duration::from_millis(500),
            input_poll_timeout: Duration::from_millis(100),
            seed: None,
        }
    }
}

/// Terminal front end: asks for a maze size, then lets the user watch strategies solve it
/// or walk it by hand.
#[derive(Debug, Default)]
pub struct App {
    config: AppConfig,
}

impl App {
    /// Rows below the maze reserved for the status line
    const NUM_STATUS_ROWS: u16 = 2;
    const ACTIONS: [Action; 6] = [
        Action::Search(Solver::Dfs),
        Action::Search(Solver::Bfs),
        Action::Search(Solver::AStar(Heuristic::TotalCost)),
        Action::Search(Solver::AStar(Heuristic::ExitOnly)),
        Action::Manual,
        Action::NewMaze,
    ];

    pub fn new(mut config: AppConfig) -> Self {
        config.step_delay = config
            .step_delay
            .clamp(config.min_step_delay, config.max_step_delay);
        Self { config }
    }

    /// Set a panic hook to restore terminal state on panic
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        crossterm::queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Main application loop
    pub fn run(&mut self, stdout: &mut Stdout) -> std::io::Result<()> {
        let (rows, cols) = match App::ask_maze_dimensions(stdout)? {
            Some(dims) => dims,
            None => return Ok(()),
        };
        let mut session = MazeSession::new(SessionConfig {
            rows,
            cols,
            seed: self.config.seed,
        })
        .map_err(std::io::Error::other)?;
        tracing::info!("[app] Started main app loop with a {}x{} maze", rows, cols);

        loop {
            draw(stdout, &session, "")?;
            let prompt = "\r\nChoose what to do next (arrow keys and Enter, Esc to exit):";
            let Some(action) = App::select_from_menu(stdout, prompt, &App::ACTIONS)? else {
                break;
            };
            match action {
                Action::Search(solver) => self.animate(stdout, &mut session, solver)?,
                Action::Manual => self.play(stdout, &mut session)?,
                Action::NewMaze => {
                    session.generate().map_err(std::io::Error::other)?;
                }
            }
        }

        tracing::info!("[app] Exiting main app loop");
        Ok(())
    }

    fn status(session: &MazeSession, label: &str) -> String {
        format!(
            "{} | steps: {} | searched: {} | frontier: {}",
            label,
            session.steps(),
            session.searched_count(),
            session.frontier_len()
        )
    }

    /// Step `solver` with a delay between steps until it stops or the user cancels.
    /// Up/Down change the speed, Esc cancels.
    fn animate(
        &mut self,
        stdout: &mut Stdout,
        session: &mut MazeSession,
        solver: Solver,
    ) -> std::io::Result<()> {
        session.start(solver);
        let outcome = loop {
            let label = format!("{} ({}ms/step)", solver, self.config.step_delay.as_millis());
            draw(stdout, session, &App::status(session, &label))?;

            // Waiting for input doubles as the pause between steps
            if event::poll(self.config.step_delay)? {
                if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                    if kind == event::KeyEventKind::Press {
                        match code {
                            KeyCode::Esc => {
                                tracing::debug!("[app] Esc pressed, cancelling {}", solver);
                                session.cancel();
                                break StepOutcome::Idle;
                            }
                            KeyCode::Up => {
                                self.config.step_delay =
                                    (self.config.step_delay / 2).max(self.config.min_step_delay);
                            }
                            KeyCode::Down => {
                                self.config.step_delay =
                                    (self.config.step_delay * 2).min(self.config.max_step_delay);
                            }
                            _ => {}
                        }
                    }
                }
                continue;
            }

            match session.step().map_err(std::io::Error::other)? {
                StepOutcome::Expanded(_) => continue,
                outcome => break outcome,
            }
        };

        let message = match outcome {
            StepOutcome::ExitFound(path) => {
                format!("{} found the exit, path length {}.", solver, path.len())
            }
            StepOutcome::Exhausted => format!("{} found no path to the exit.", solver),
            _ => format!("{} cancelled.", solver),
        };
        App::show_result(stdout, session, &message)
    }

    /// Manual play: arrow keys or WASD move, moving back onto the trail undoes a step.
    /// `n` swaps in a freshly generated maze and starts over.
    fn play(&self, stdout: &mut Stdout, session: &mut MazeSession) -> std::io::Result<()> {
        session.start_manual().map_err(std::io::Error::other)?;
        while session.is_running() {
            let label = format!(
                "Manual play (arrows/WASD, n for a new maze, Esc to give up), depth {}",
                session.manual_depth()
            );
            draw(stdout, session, &App::status(session, &label))?;

            if !event::poll(self.config.input_poll_timeout)? {
                continue;
            }
            let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? else {
                continue;
            };
            if kind != event::KeyEventKind::Press {
                continue;
            }
            let direction = match code {
                KeyCode::Esc => {
                    session.cancel();
                    return App::show_result(stdout, session, "Manual play abandoned.");
                }
                KeyCode::Char('n') => {
                    tracing::debug!("[app] Regenerating maze during manual play");
                    session.generate().map_err(std::io::Error::other)?;
                    session.start_manual().map_err(std::io::Error::other)?;
                    continue;
                }
                code => match App::direction_of(code) {
                    Some(direction) => direction,
                    None => continue,
                },
            };
            if let MoveOutcome::ExitReached(path) =
                session.manual_move(direction).map_err(std::io::Error::other)?
            {
                let message = format!(
                    "Exit reached in {} moves, path length {}.",
                    session.steps(),
                    path.len()
                );
                return App::show_result(stdout, session, &message);
            }
        }
        App::show_result(stdout, session, "Exit reached.")
    }

    /// Maps arrow keys and WASD to directions.
    fn direction_of(code: KeyCode) -> Option<Direction> {
        match code {
            KeyCode::Up | KeyCode::Char('w') => Some(Direction::Up),
            KeyCode::Left | KeyCode::Char('a') => Some(Direction::Left),
            KeyCode::Down | KeyCode::Char('s') => Some(Direction::Down),
            KeyCode::Right | KeyCode::Char('d') => Some(Direction::Right),
            _ => None,
        }
    }

    /// Draw the final state with a message and wait for any key.
    fn show_result(
        stdout: &mut Stdout,
        session: &MazeSession,
        message: &str,
    ) -> std::io::Result<()> {
        tracing::info!("[app] {}", message);
        draw(stdout, session, &format!("{} Press any key...", message))?;
        loop {
            if let event::Event::Key(event::KeyEvent { kind, .. }) = event::read()? {
                if kind == event::KeyEventKind::Press {
                    return Ok(());
                }
            }
        }
    }

    /// Get user input with real-time validation and feedback
    /// Returns None if user cancels input with Esc
    /// Returns Some(T) if user inputs a valid input and presses Enter, where T is the validated type
    fn prompt_with_validation<F, T>(
        stdout: &mut Stdout,
        prompt: &str,
        validate: F,
    ) -> std::io::Result<Option<T>>
    where
        F: Fn(&str) -> Result<T, String>,
    {
        // Save cursor position so we can restore / redraw
        queue!(stdout, cursor::Hide, cursor::SavePosition)?;
        stdout.flush()?;

        let mut input = String::new();

        let value = loop {
            queue!(
                stdout,
                cursor::RestorePosition,
                terminal::Clear(ClearType::FromCursorDown)
            )?;

            stdout.queue(style::PrintStyledContent(
                prompt.with(Color::Cyan).attribute(Attribute::Bold),
            ))?;

            // Decide color based on validity
            let validation_result = validate(input.trim());
            match validation_result {
                Ok(_) => stdout.queue(style::SetForegroundColor(Color::Green))?,
                Err(_) => stdout.queue(style::SetForegroundColor(Color::Red))?,
            };

            queue!(stdout, style::Print(&input), style::ResetColor)?;
            stdout.queue(style::Print(" \r\n"))?;

            // Error message line (if any)
            if let Err(msg) = validation_result {
                stdout.queue(style::PrintStyledContent(
                    msg.with(Color::DarkGrey).attribute(Attribute::Dim),
                ))?;
            }

            stdout.flush()?;

            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                match code {
                    KeyCode::Enter => match validate(input.trim()) {
                        Ok(n) => break Some(n),
                        Err(_) => continue,
                    },
                    KeyCode::Char(c) if kind == event::KeyEventKind::Press => {
                        if !c.is_whitespace() && !c.is_control() {
                            input.push(c);
                        }
                    }
                    KeyCode::Backspace => {
                        input.pop();
                    }
                    KeyCode::Esc => break None,
                    _ => {}
                }
            }
        };
        queue!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown),
            cursor::Show
        )?;
        stdout.flush()?;

        Ok(value)
    }

    /// Largest maze dimension whose drawing fits in `term_size` character cells
    /// when each glyph takes `glyph_size` of them.
    fn get_max_maze_size(term_size: u16, glyph_size: u16) -> usize {
        let glyphs = (term_size / glyph_size) as usize;
        // n cells need 2n + 1 glyphs
        (glyphs.saturating_sub(1) / 2).clamp(1, Maze::MAX_DIMENSION)
    }

    /// Parse one dimension, falling back to `default` on empty input.
    fn parse_dimension(s: &str, default: usize, max: usize) -> Result<usize, String> {
        if s.is_empty() {
            return Ok(default.min(max));
        }
        let error_msg = format!("Please enter a number between 1 and {}.", max);
        s.parse::<usize>()
            .map_err(|_| error_msg.clone())
            .and_then(|n| match n {
                1.. if n <= max => Ok(n),
                _ => Err(error_msg),
            })
    }

    /// Ask user for maze dimensions, bounded by the current terminal size.
    /// Returns None if user cancels input with Esc
    fn ask_maze_dimensions(stdout: &mut Stdout) -> std::io::Result<Option<(usize, usize)>> {
        stdout.execute(style::PrintStyledContent(
            "Enter maze dimensions, or press Esc to exit. Leave empty for the default of 20. \
Maximum acceptable values are based on current terminal size.\r\n"
                .with(Color::Blue),
        ))?;

        let default = SessionConfig::default();
        let (max_cols, max_rows) = match terminal::size() {
            Ok((term_width, term_height)) => (
                App::get_max_maze_size(term_width, Glyph::CELL_WIDTH),
                App::get_max_maze_size(term_height.saturating_sub(App::NUM_STATUS_ROWS), 1),
            ),
            // Fallback to max size if terminal size cannot be determined
            Err(_) => (Maze::MAX_DIMENSION, Maze::MAX_DIMENSION),
        };

        let rows = match App::prompt_with_validation(stdout, "Rows: ", |s| {
            App::parse_dimension(s, default.rows, max_rows)
        })? {
            Some(r) => r,
            None => return Ok(None),
        };
        stdout.execute(style::PrintStyledContent(
            format!("Rows set to {}\r\n", rows)
                .with(Color::Green)
                .attribute(Attribute::Bold),
        ))?;

        let cols = match App::prompt_with_validation(stdout, "Columns: ", |s| {
            App::parse_dimension(s, default.cols, max_cols)
        })? {
            Some(c) => c,
            None => return Ok(None),
        };
        stdout.execute(style::PrintStyledContent(
            format!("Columns set to {}\r\n", cols)
                .with(Color::Green)
                .attribute(Attribute::Bold),
        ))?;

        Ok(Some((rows, cols)))
    }

    /// Present a menu of options to the user and let them select one using arrow keys
    /// Returns None if user cancels input with Esc
    fn select_from_menu<T: std::fmt::Display + Copy>(
        stdout: &mut Stdout,
        prompt: &str,
        options: &[T],
    ) -> std::io::Result<Option<T>> {
        if options.is_empty() {
            return Ok(None);
        }

        queue!(stdout, cursor::Hide, cursor::SavePosition)?;

        let mut selected = 0;

        let selected_option = loop {
            queue!(
                stdout,
                cursor::RestorePosition,
                terminal::Clear(ClearType::FromCursorDown)
            )?;

            stdout.queue(style::PrintStyledContent(prompt.with(Color::Yellow)))?;

            for (i, option) in options.iter().enumerate() {
                if i == selected {
                    stdout.queue(style::SetAttribute(Attribute::Reverse))?;
                }
                stdout.queue(style::Print(format!("\r\n{}", option)))?;
                if i == selected {
                    stdout.queue(style::SetAttribute(Attribute::NoReverse))?;
                }
            }
            stdout.queue(style::Print("\r\n"))?;

            stdout.flush()?;

            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                if kind != event::KeyEventKind::Press {
                    continue;
                }
                match code {
                    KeyCode::Up => {
                        selected = match selected {
                            0 => options.len() - 1,
                            _ => selected - 1,
                        };
                    }
                    KeyCode::Down => {
                        selected = if selected >= options.len() - 1 {
                            0
                        } else {
                            selected + 1
                        };
                    }
                    KeyCode::Enter => break Some(options[selected]),
                    KeyCode::Esc => break None,
                    _ => {}
                }
            }
        };
        queue!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown),
            cursor::Show
        )?;
        stdout.flush()?;

        Ok(selected_option)
    }

    /// Generate and solve one maze with every strategy `num_iters` times, logging timings.
    pub fn profile(
        &self,
        rows: usize,
        cols: usize,
        num_iters: Option<usize>,
    ) -> std::io::Result<()> {
        let mut session = MazeSession::new(SessionConfig {
            rows,
            cols,
            seed: self.config.seed,
        })
        .map_err(std::io::Error::other)?;
        for iter in 0..num_iters.unwrap_or(1) {
            let started = std::time::Instant::now();
            session.generate().map_err(std::io::Error::other)?;
            tracing::info!("[profile] iter {} generation took {:?}", iter, started.elapsed());

            for action in App::ACTIONS {
                let Action::Search(solver) = action else {
                    continue;
                };
                let started = std::time::Instant::now();
                session.start(solver);
                let outcome = session.run_to_end().map_err(std::io::Error::other)?;
                tracing::info!(
                    "[profile] iter {} {} took {:?} over {} steps, found exit: {}",
                    iter,
                    solver,
                    started.elapsed(),
                    session.steps(),
                    matches!(outcome, StepOutcome::ExitFound(_))
                );
            }
        }
        Ok(())
    }
}
