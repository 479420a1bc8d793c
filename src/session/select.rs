//! Interactive confirmation loop
//!
//! Before anything touches the ledger, the operator reviews the proposed
//! actions and may veto individual entries. Modeled as an explicit state
//! machine so the commit and cancel paths are testable without a terminal:
//!
//! ```text
//! Rendering -> AwaitingCommand -> Rendering   (toggle / ignored input)
//!                              -> Committed   ("do")
//!                              -> Cancelled   ("quit" or end of input)
//! ```
//!
//! The loop is synchronous and blocking; the operator is trusted to respond
//! eventually.

use std::io::{self, BufRead, Write};

use crate::domain::{Action, ActionSelection};

/// One parsed operator command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `do`: commit the current selection set
    Commit,
    /// `quit`: abort the session with no side effects
    Cancel,
    /// An index to toggle
    Toggle(usize),
    /// Anything else; ignored
    Unknown,
}

impl Command {
    /// Parses one input line
    pub fn parse(line: &str) -> Self {
        let token = line.trim();
        match token {
            "do" => Command::Commit,
            "quit" => Command::Cancel,
            _ => match token.parse::<usize>() {
                Ok(index) => Command::Toggle(index),
                Err(_) => Command::Unknown,
            },
        }
    }
}

/// Selection loop state; `Committed` and `Cancelled` are terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Rendering,
    AwaitingCommand,
    Committed,
    Cancelled,
}

/// The confirmation loop over one decided action list
#[derive(Debug)]
pub struct SelectionLoop {
    selections: Vec<ActionSelection>,
    state: State,
}

impl SelectionLoop {
    /// Wraps decided actions, every one selected initially
    pub fn new(actions: Vec<Action>) -> Self {
        Self {
            selections: actions.into_iter().map(ActionSelection::new).collect(),
            state: State::Rendering,
        }
    }

    /// Returns the current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the current selection set
    pub fn selections(&self) -> &[ActionSelection] {
        &self.selections
    }

    /// Renders the full numbered table; `Rendering` -> `AwaitingCommand`
    pub fn render<W: Write + ?Sized>(&mut self, out: &mut W) -> io::Result<()> {
        render_table(&self.selections, out)?;
        self.state = State::AwaitingCommand;
        Ok(())
    }

    /// Applies one command; `AwaitingCommand` -> next state
    ///
    /// An out-of-range toggle reports a bounds error and re-renders without
    /// mutating any flag; unrecognized input re-renders unchanged.
    pub fn apply<W: Write + ?Sized>(&mut self, command: Command, out: &mut W) -> io::Result<()> {
        match command {
            Command::Commit => self.state = State::Committed,
            Command::Cancel => self.state = State::Cancelled,
            Command::Toggle(index) => {
                match self.selections.get_mut(index) {
                    Some(selection) => selection.toggle(),
                    None => {
                        writeln!(
                            out,
                            "Index must be in range 0 - {}.",
                            self.selections.len().saturating_sub(1)
                        )?;
                    }
                }
                self.state = State::Rendering;
            }
            Command::Unknown => self.state = State::Rendering,
        }
        Ok(())
    }

    /// Runs the blocking read-eval cycle to a terminal state
    ///
    /// `pending` is a line carried over from barcode collection, evaluated
    /// before anything is read from `input`. End of input cancels. Returns
    /// the full selection set on commit, `None` on cancel.
    pub fn run<R, W>(
        mut self,
        input: &mut R,
        out: &mut W,
        pending: Option<String>,
    ) -> io::Result<Option<Vec<ActionSelection>>>
    where
        R: BufRead + ?Sized,
        W: Write + ?Sized,
    {
        let mut pending = pending;
        loop {
            match self.state {
                State::Rendering => self.render(out)?,
                State::AwaitingCommand => {
                    write!(out, "\"do\", \"quit\", or an index> ")?;
                    out.flush()?;

                    let line = match pending.take() {
                        Some(line) => Some(line),
                        None => read_line(input)?,
                    };
                    match line {
                        Some(line) => self.apply(Command::parse(&line), out)?,
                        None => self.state = State::Cancelled,
                    }
                }
                State::Committed => return Ok(Some(self.selections)),
                State::Cancelled => return Ok(None),
            }
        }
    }
}

fn read_line<R: BufRead + ?Sized>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Renders the selection table; the action-name and ISBN columns are sized
/// to the longest value currently in the list
fn render_table<W: Write + ?Sized>(selections: &[ActionSelection], out: &mut W) -> io::Result<()> {
    let name_width = selections
        .iter()
        .map(|s| s.action.name().len())
        .max()
        .unwrap_or(0);
    let isbn_width = selections
        .iter()
        .map(|s| s.action.isbn().len())
        .max()
        .unwrap_or(0);

    writeln!(
        out,
        "{:3}: {:3} {:nw$}  {:iw$}  {} ({})",
        "sel",
        "Idx",
        "Action",
        "ISBN",
        "Book title",
        "Type",
        nw = name_width,
        iw = isbn_width,
    )?;

    for (index, selection) in selections.iter().enumerate() {
        let marker = if selection.selected { "[*]" } else { "[ ]" };
        let (title, kind) = match selection.action.record() {
            Some(record) => (record.title.as_str(), record.kind.as_str()),
            None => ("no-title", "no-type"),
        };
        writeln!(
            out,
            "{:3}: {:3} {:nw$}  {:iw$}  {} ({})",
            marker,
            index,
            selection.action.name(),
            selection.action.isbn(),
            title,
            kind,
            nw = name_width,
            iw = isbn_width,
        )?;
    }
    Ok(())
}
