//! Session lifecycle and frame loop
//!
//! A session owns at most one [`World`] and drives it one tick per scheduled
//! frame. After each tick it drains the world's events into the renderer and
//! the UI, hands over the render list, and asks for the next frame.

use glam::DVec2;
use thiserror::Error;

use crate::consts::DIAGNOSTICS_PERIOD_MS;
use crate::diagnostics::{Diagnostics, DiagnosticsReadout};
use crate::platform::{FrameHandle, FrameScheduler, IntervalHandle};
use crate::renderer::Renderer;
use crate::sim::{self, GameEvent, GamePhase, SimError, TickInput, Viewport, World};
use crate::tuning::Tuning;
use crate::ui::SessionUi;

/// Lifecycle misuse and simulation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session is already running")]
    AlreadyRunning,
    #[error("session has not been started")]
    NotStarted,
    #[error("simulation stopped: {0}")]
    Sim(#[from] SimError),
}

/// One play session: world, loop handles, and the surfaces it talks to
pub struct Session<R: Renderer, U: SessionUi, S: FrameScheduler> {
    renderer: R,
    ui: U,
    scheduler: S,
    tuning: Tuning,
    viewport: Viewport,
    seed: u64,
    world: Option<World>,
    /// Last pointer sample; kept when no new one arrives
    pointer: Option<DVec2>,
    pending_frame: Option<FrameHandle>,
    diagnostics_interval: Option<IntervalHandle>,
    diagnostics: Diagnostics,
}

impl<R: Renderer, U: SessionUi, S: FrameScheduler> Session<R, U, S> {
    /// Build a session with a fresh, not yet started world
    pub fn new(
        renderer: R,
        ui: U,
        scheduler: S,
        viewport: Viewport,
        tuning: Tuning,
        seed: u64,
    ) -> Self {
        let world = World::new(seed, viewport, tuning.clone());
        Self {
            renderer,
            ui,
            scheduler,
            tuning,
            viewport,
            seed,
            world: Some(world),
            pointer: None,
            pending_frame: None,
            diagnostics_interval: None,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Start the world and the loop. A second call is rejected.
    pub fn start(&mut self) -> Result<(), SessionError> {
        let world = self
            .world
            .get_or_insert_with(|| World::new(self.seed, self.viewport, self.tuning.clone()));
        if world.is_started() {
            log::warn!("Ignoring start: session already running");
            return Err(SessionError::AlreadyRunning);
        }
        world.start()?;
        self.ui.on_start();
        self.begin_loop();
        Ok(())
    }

    /// Tear down the current world and start a new one
    pub fn restart(&mut self, seed: u64) -> Result<(), SessionError> {
        self.teardown();
        self.seed = seed;
        let mut world = World::new(seed, self.viewport, self.tuning.clone());
        world.start()?;
        self.world = Some(world);
        self.ui.on_restart();
        self.begin_loop();
        Ok(())
    }

    /// Stop the loop and drop the world
    pub fn teardown(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        if let Some(handle) = self.diagnostics_interval.take() {
            self.scheduler.cancel_interval(handle);
        }
        if self.world.take().is_some() {
            log::info!("Session torn down");
        }
    }

    /// Stop ticking. Returns whether anything changed.
    pub fn pause(&mut self) -> Result<bool, SessionError> {
        let world = self.started_world()?;
        if !world.pause() {
            return Ok(false);
        }
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        log::info!("Paused at frame {}", self.world.as_ref().map_or(0, |w| w.frame));
        Ok(true)
    }

    /// Continue ticking after a pause. Returns whether anything changed.
    pub fn resume(&mut self) -> Result<bool, SessionError> {
        let world = self.started_world()?;
        if !world.resume() {
            return Ok(false);
        }
        self.request_frame();
        log::info!("Resumed");
        Ok(true)
    }

    /// Scheduler callback: run one tick and present it.
    ///
    /// Deliveries for anything but the pending frame are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle, time_ms: f64) -> Result<(), SessionError> {
        if self.pending_frame != Some(handle) {
            log::debug!("Ignoring stale frame {:?}", handle);
            return Ok(());
        }
        self.pending_frame = None;

        let Some(world) = self.world.as_mut() else {
            return Ok(());
        };

        let input = TickInput {
            pointer: self.pointer,
        };
        if let Err(e) = sim::tick(world, &input) {
            log::error!("Tick failed, stopping loop: {}", e);
            return Err(e.into());
        }

        for event in world.drain_events() {
            match event {
                GameEvent::ScreenFlash { color } => self.renderer.flash(color),
                GameEvent::Explosion { at, color, ripples } => {
                    self.renderer.explode(at, color, ripples)
                }
                GameEvent::GameOver { frame, statistics } => {
                    self.ui.on_game_over(frame, &statistics)
                }
            }
        }

        let records = world.render_list();
        let drawn = self.renderer.present(time_ms, &records);
        self.diagnostics.record_frame(drawn);

        if world.phase != GamePhase::Paused {
            self.request_frame();
        }
        Ok(())
    }

    /// Latest pointer position in surface coordinates
    pub fn on_pointer(&mut self, x: f64, y: f64) {
        self.pointer = Some(DVec2::new(x, y));
    }

    /// Surface size changed
    pub fn resize(&mut self, width: f64, height: f64) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.viewport = Viewport::new(width, height);
        self.renderer.resize(width, height);
        if let Some(world) = self.world.as_mut() {
            world.set_viewport(width, height);
        }
    }

    /// Interval callback: sample counters for the debug panel
    pub fn on_diagnostics_interval(&mut self) -> DiagnosticsReadout {
        let readout = self.diagnostics.sample(self.world.as_ref());
        log::debug!("{}", readout);
        readout
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    pub fn phase(&self) -> Option<GamePhase> {
        self.world.as_ref().map(|w| w.phase)
    }

    pub fn is_running(&self) -> bool {
        self.phase() == Some(GamePhase::Running)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn pointer(&self) -> Option<DVec2> {
        self.pointer
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn started_world(&mut self) -> Result<&mut World, SessionError> {
        match self.world.as_mut() {
            Some(world) if world.is_started() => Ok(world),
            _ => Err(SessionError::NotStarted),
        }
    }

    fn begin_loop(&mut self) {
        self.request_frame();
        if self.diagnostics_interval.is_none() {
            self.diagnostics_interval = Some(self.scheduler.start_interval(DIAGNOSTICS_PERIOD_MS));
        }
    }

    /// Keep at most one frame pending
    fn request_frame(&mut self) {
        if self.pending_frame.is_none() {
            self.pending_frame = Some(self.scheduler.request_frame());
        }
    }
}
