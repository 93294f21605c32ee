//! The polled command loop
//!
//! [`Monitor::poll`] never waits for input. Call it from the main loop as
//! often as convenient; a command line may arrive one byte per call.

use core::fmt::Write;

use log::trace;
use picomon_driver_traits::{PhysMemory, SerialPort};
use picomon_readline::{split, LineEditor};

use crate::commands::dispatch;
use crate::session::Session;

pub struct Monitor<M: PhysMemory, S: SerialPort> {
    editor: LineEditor,
    prompt_shown: bool,
    session: Session<M, S>,
}

impl<M: PhysMemory, S: SerialPort> Monitor<M, S> {
    pub fn new(session: Session<M, S>) -> Self {
        Monitor {
            editor: LineEditor::new(),
            prompt_shown: false,
            session,
        }
    }

    /// Show the prompt if due, take any pending input, and run the command
    /// once a line is complete.
    ///
    /// Returns the command's status, or `None` while the line is still
    /// being typed.
    pub fn poll(&mut self) -> Option<i32> {
        if !self.prompt_shown {
            self.editor.reset();
            let _ = self.session.con.write_str(self.session.config.prompt);
            self.prompt_shown = true;
        }

        self.editor.poll_line(&mut self.session.con)?;
        self.prompt_shown = false;

        let tokens = split(self.editor.line());
        trace!("line {:?}, {} tokens", self.editor.line(), tokens.len());
        let status = dispatch(&mut self.session, tokens.as_slice());
        Some(status)
    }

    pub fn session(&self) -> &Session<M, S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<M, S> {
        &mut self.session
    }

    pub fn into_session(self) -> Session<M, S> {
        self.session
    }
}
