//! Frame sequencing for playback and export.
//!
//! An [`Animation`] walks the distinct timesteps of a table in ascending
//! order, rendering each exactly once onto the caller's canvas. It never
//! loops: once the last timestep has been rendered the state is `Done` and
//! further steps do nothing.

use crate::canvas::Canvas;
use crate::error::{RenderError, Result};
use crate::frame::{FrameRenderer, FrameStats};
use crate::loader::TrajectoryTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Rendering(usize),
    Done,
}

/// Consumer of rendered frames.
pub trait FrameSink {
    type Output;

    /// Receives the canvas right after `stats.time` was drawn on it.
    fn push_frame(&mut self, canvas: &Canvas, stats: &FrameStats) -> Result<()>;

    fn finish(self) -> Result<Self::Output>;
}

pub struct Animation {
    timesteps: Vec<f64>,
    state: PlaybackState,
}

impl Animation {
    /// `timesteps` must be ascending and free of duplicates.
    pub fn new(timesteps: Vec<f64>) -> Self {
        Self {
            timesteps,
            state: PlaybackState::Idle,
        }
    }

    pub fn for_table(table: &TrajectoryTable) -> Result<Self> {
        if table.is_empty() {
            return Err(RenderError::EmptyDataset);
        }
        Ok(Self::new(table.timesteps()))
    }

    pub fn timesteps(&self) -> &[f64] {
        &self.timesteps
    }

    pub fn len(&self) -> usize {
        self.timesteps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timesteps.is_empty()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == PlaybackState::Done
    }

    /// Renders the next timestep, or returns `None` once every timestep has
    /// been rendered.
    pub fn step(&mut self, renderer: &FrameRenderer<'_>, canvas: &mut Canvas) -> Option<FrameStats> {
        let next = match self.state {
            PlaybackState::Idle => 0,
            PlaybackState::Rendering(current) => current + 1,
            PlaybackState::Done => return None,
        };

        let Some(&time) = self.timesteps.get(next) else {
            self.state = PlaybackState::Done;
            return None;
        };

        self.state = PlaybackState::Rendering(next);
        let stats = renderer.render(canvas, time);
        log::debug!(
            "Rendered frame {}/{} (time {:.4}, {} points)",
            next + 1,
            self.timesteps.len(),
            stats.time,
            stats.points
        );
        Some(stats)
    }

    /// Renders every remaining frame into `sink`, then finishes it.
    pub fn run<S: FrameSink>(
        &mut self,
        renderer: &FrameRenderer<'_>,
        canvas: &mut Canvas,
        mut sink: S,
    ) -> Result<S::Output> {
        while let Some(stats) = self.step(renderer, canvas) {
            sink.push_frame(canvas, &stats)?;
        }
        sink.finish()
    }
}
