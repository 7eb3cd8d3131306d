//! Terminal backend.
//!
//! Draws the LCD inside a box on the alternate screen and turns key presses into quit
//! requests. Raw mode is entered when the presenter is created and restored when it is
//! dropped. Diagnostics written while the alternate screen is up are held back by
//! [`DeferredStderr`] and replayed on the normal screen afterwards.

use std::io::{self, Stdout, Write};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::{cursor, execute, queue, terminal};

use tamasim_core::common::constants::{ICON_COUNT, LCD_WIDTH};
use tamasim_core::hal::PollStatus;
use tamasim_core::host::{FramePresenter, InputSource, LcdFrame};
use tracing_subscriber::fmt::MakeWriter;

/// Indicator labels, left to right along the top and bottom of the device.
const ICON_LABELS: [&str; ICON_COUNT as usize] =
    ["FOOD", "LIGHT", "GAME", "MEDIC", "BATH", "STATS", "DISCI", "ATTN"];

/// Stderr writer for the tracing subscriber that can hold output back.
///
/// While held, formatted events accumulate in memory; [`release`](Self::release) writes
/// them to stderr and switches back to writing through.
#[derive(Debug, Clone, Default)]
pub struct DeferredStderr {
    held: Arc<Mutex<Option<Vec<u8>>>>,
}

impl DeferredStderr {
    /// Starts buffering events instead of writing them.
    pub fn hold(&self) {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        if held.is_none() {
            *held = Some(Vec::new());
        }
    }

    /// Writes any buffered events to stderr and stops buffering.
    pub fn release(&self) {
        let pending = self
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(bytes) = pending {
            let _ = io::stderr().write_all(&bytes);
        }
    }
}

/// One event's worth of output from [`DeferredStderr`].
#[derive(Debug)]
pub struct DeferredWriter {
    held: Arc<Mutex<Option<Vec<u8>>>>,
}

impl Write for DeferredWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        match held.as_mut() {
            Some(pending) => {
                pending.extend_from_slice(buf);
                Ok(buf.len())
            }
            None => io::stderr().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for DeferredStderr {
    type Writer = DeferredWriter;

    fn make_writer(&'a self) -> Self::Writer {
        DeferredWriter {
            held: Arc::clone(&self.held),
        }
    }
}

/// Renders frames to the terminal.
pub struct TerminalPresenter {
    stdout: Stdout,
    diagnostics: DeferredStderr,
    failed: bool,
}

impl TerminalPresenter {
    /// Switches the terminal to raw mode on the alternate screen.
    ///
    /// `diagnostics` is held until the presenter is dropped.
    ///
    /// # Errors
    ///
    /// Any I/O error from the terminal; the terminal is restored before returning.
    pub fn new(diagnostics: DeferredStderr) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(err);
        }
        diagnostics.hold();
        Ok(Self {
            stdout,
            diagnostics,
            failed: false,
        })
    }

    fn render(&mut self, frame: &LcdFrame) -> io::Result<()> {
        let border = "─".repeat(usize::from(LCD_WIDTH));
        queue!(self.stdout, cursor::MoveTo(0, 0), Print(format!("┌{border}┐\r\n")))?;
        for row in frame.to_matrix() {
            let line: String = row.iter().map(|&on| if on { '█' } else { ' ' }).collect();
            queue!(self.stdout, Print(format!("│{line}│\r\n")))?;
        }
        queue!(self.stdout, Print(format!("└{border}┘\r\n")))?;

        let icons: Vec<&str> = ICON_LABELS
            .iter()
            .enumerate()
            .filter(|&(id, _)| frame.icon(id as u8))
            .map(|(_, label)| *label)
            .collect();
        queue!(
            self.stdout,
            terminal::Clear(terminal::ClearType::CurrentLine),
            Print(icons.join(" ")),
            Print("\r\n"),
            Print("q / Esc to quit\r\n")
        )?;
        self.stdout.flush()
    }
}

impl FramePresenter for TerminalPresenter {
    fn present(&mut self, frame: &LcdFrame) {
        if let Err(err) = self.render(frame) {
            if !self.failed {
                tracing::warn!(%err, "terminal render failed");
            }
            self.failed = true;
        }
    }
}

impl Drop for TerminalPresenter {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        self.diagnostics.release();
    }
}

impl std::fmt::Debug for TerminalPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalPresenter")
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}

/// Keyboard input: `q`, `Esc` or `Ctrl-C` request a quit.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalInput;

impl TerminalInput {
    fn drain(&mut self) -> io::Result<PollStatus> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                let quit = matches!(key.code, KeyCode::Esc | KeyCode::Char('q'))
                    || (key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL));
                if quit {
                    return Ok(PollStatus::Quit);
                }
            }
        }
        Ok(PollStatus::Continue)
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> PollStatus {
        self.drain().unwrap_or_else(|err| {
            tracing::warn!(%err, "terminal input failed");
            PollStatus::Continue
        })
    }
}
