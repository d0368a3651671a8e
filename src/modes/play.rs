use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stderr, stderr};
use tracing::warn;

use super::scheduler::TickScheduler;
use crate::game::GameEngine;
use crate::host::{ExitPayload, HostEvent};
use crate::input::InputHandler;
use crate::render::Renderer;

/// Interactive terminal session: one engine, keyboard input, ratatui output.
pub struct PlayMode {
    engine: GameEngine,
    renderer: Renderer,
    input_handler: InputHandler,
    exit: Option<ExitPayload>,
}

impl PlayMode {
    pub fn new(engine: GameEngine) -> Self {
        Self {
            engine,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            exit: None,
        }
    }

    /// Play until the player exits; returns the score for the host.
    pub async fn run(&mut self) -> Result<ExitPayload> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<ExitPayload> {
        let mut event_stream = EventStream::new();
        let mut scheduler = TickScheduler::new(&self.engine);
        let mut listen_ctrl_c = true;

        self.draw(terminal)?;

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            let phase_before = self.engine.phase();
                            if self.handle_event(event) {
                                scheduler.after_input(phase_before, &self.engine);
                                self.draw(terminal)?;
                            }
                        }
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.exit = Some(self.engine.exit_payload()),
                    }
                }

                // Game logic tick, only while a round is running
                _ = scheduler.next_tick(&self.engine) => {
                    let outcome = self.engine.tick();
                    scheduler.after_tick(outcome, &self.engine);
                    self.draw(terminal)?;
                }

                // Handle Ctrl+C
                signal = tokio::signal::ctrl_c(), if listen_ctrl_c => {
                    listen_ctrl_c = self.handle_ctrl_c(signal);
                }
            }

            if let Some(payload) = self.exit {
                return Ok(payload);
            }
        }
    }

    /// Returns whether Ctrl+C is still worth listening for.
    fn handle_ctrl_c(&mut self, signal: io::Result<()>) -> bool {
        match signal {
            Ok(()) => {
                self.exit = HostEvent::Exit.apply(&mut self.engine);
                true
            }
            Err(err) => {
                warn!(%err, "failed to listen for Ctrl+C; Q and Esc still exit");
                false
            }
        }
    }

    /// Returns true when the event may have changed what is on screen.
    fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return false;
                }

                match self.input_handler.handle_key_event(key).into_host_event() {
                    Some(host_event) => {
                        self.exit = host_event.apply(&mut self.engine);
                        true
                    }
                    None => false,
                }
            }
            Event::Resize(..) => true,
            _ => false,
        }
    }

    fn draw(&self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        terminal
            .draw(|frame| self.renderer.render(frame, &self.engine))
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
