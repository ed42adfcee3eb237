//! Line-oriented interactive session.

use std::fs;
use std::io::{self, BufRead, Write};

use passlab_core::{PipelineState, Update};
use tracing::warn;

use crate::commands::{help_text, suggestions, Command, CommandError, PassRef};
use crate::render::{render_available, render_outcomes, render_result};

/// Program loaded when a session starts without a file.
pub const DEMO_PROGRAM: &str = r#"func.func @hello(%n : index) -> index {
  %two = arith.constant 2 : index
  %res = arith.muli %n, %two : index
  func.return %res : index
}
"#;

const PROMPT: &str = "passlab> ";
const INPUT_PROMPT: &str = "... ";
const END_OF_INPUT: &str = ".";

/// Whether the loop should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Drives a [`PipelineState`] from commands read off `input`.
pub struct Repl<R, W> {
    state: PipelineState,
    tool: String,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(state: PipelineState, tool: impl Into<String>, input: R, output: W) -> Self {
        Self {
            state,
            tool: tool.into(),
            input,
            output,
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until `quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "passlab: type 'help' for commands")?;
        self.print_result()?;
        self.print_available()?;
        loop {
            write!(self.output, "{}", PROMPT)?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                writeln!(self.output)?;
                return Ok(());
            };
            match Command::parse(&line) {
                Ok(None) => {}
                Ok(Some(command)) => {
                    if self.execute(command)? == Flow::Quit {
                        return Ok(());
                    }
                }
                Err(err) => self.report_command_error(&err)?,
            }
        }
    }

    /// Executes one command and prints what changed.
    pub fn execute(&mut self, command: Command) -> io::Result<Flow> {
        match command {
            Command::Help => write!(self.output, "{}", help_text())?,
            Command::Passes => self.print_available()?,
            Command::Why => match self.state.explain() {
                Some(outcomes) => write!(self.output, "{}", render_outcomes(&outcomes))?,
                None => writeln!(self.output, "There is no program to analyse.")?,
            },
            Command::Add(pass) => self.add(pass)?,
            Command::Pop => {
                let update = self.state.pop_pass();
                self.show_update(update)?;
            }
            Command::Clear => {
                let update = self.state.clear_pipeline();
                self.show_update(update)?;
            }
            Command::Condense => {
                let update = self.state.set_condense(true);
                self.show_update(update)?;
            }
            Command::Uncondense => {
                let update = self.state.set_condense(false);
                self.show_update(update)?;
            }
            Command::Load(path) => match fs::read_to_string(&path) {
                Ok(text) => {
                    let update = self.state.load_source(text);
                    self.show_update(update)?;
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "failed to load program");
                    writeln!(self.output, "error: cannot read '{}': {}", path.display(), err)?;
                }
            },
            Command::Input => {
                let text = self.read_program()?;
                let update = self.state.set_source(text);
                self.show_update(update)?;
            }
            Command::ClearInput => {
                let update = self.state.set_source(String::new());
                self.show_update(update)?;
            }
            Command::Show => self.print_result()?,
            Command::Source => {
                if self.state.source().is_empty() {
                    writeln!(self.output, "{}", crate::render::NO_INPUT)?;
                } else {
                    write!(self.output, "{}", self.state.source())?;
                    if !self.state.source().ends_with('\n') {
                        writeln!(self.output)?;
                    }
                }
            }
            Command::Query => writeln!(self.output, "{}", self.state.query_string(&self.tool))?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn add(&mut self, pass: PassRef) -> io::Result<()> {
        let name = match pass {
            PassRef::Name(name) => name,
            PassRef::Index(index) => {
                let offered = index
                    .checked_sub(1)
                    .and_then(|i| self.state.available().get(i));
                match offered {
                    Some(def) => def.name().to_string(),
                    None => {
                        writeln!(
                            self.output,
                            "error: no pass numbered {} (see 'passes')",
                            index
                        )?;
                        return Ok(());
                    }
                }
            }
        };
        match self.state.push_pass(&name) {
            Ok(update) => {
                writeln!(self.output, "{}", self.state.query_string(&self.tool))?;
                self.show_update(update)
            }
            Err(err) => writeln!(self.output, "error: {}", err),
        }
    }

    fn show_update(&mut self, update: Update) -> io::Result<()> {
        if update.result_changed {
            self.print_result()?;
        }
        if update.available_changed {
            self.print_available()?;
        }
        Ok(())
    }

    fn print_result(&mut self) -> io::Result<()> {
        let text = render_result(self.state.current());
        write!(self.output, "{}", text)?;
        if !text.ends_with('\n') {
            writeln!(self.output)?;
        }
        Ok(())
    }

    fn print_available(&mut self) -> io::Result<()> {
        write!(self.output, "{}", render_available(&self.state))
    }

    fn report_command_error(&mut self, err: &CommandError) -> io::Result<()> {
        writeln!(self.output, "error: {}", err)?;
        if let CommandError::Unknown(word) = err {
            let hints: Vec<&str> = suggestions(word).iter().map(|m| m.usage).collect();
            if !hints.is_empty() {
                writeln!(self.output, "did you mean: {}", hints.join(", "))?;
            }
        }
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    /// Reads lines up to a lone `.` or end of input.
    fn read_program(&mut self) -> io::Result<String> {
        writeln!(
            self.output,
            "Enter the program; finish with a line containing only '{}'.",
            END_OF_INPUT
        )?;
        let mut text = String::new();
        loop {
            write!(self.output, "{}", INPUT_PROMPT)?;
            self.output.flush()?;
            match self.read_line()? {
                Some(line) if line.trim() == END_OF_INPUT => break,
                Some(line) => {
                    text.push_str(&line);
                    text.push('\n');
                }
                None => break,
            }
        }
        Ok(text)
    }
}
