//! Animated 3D scatter playback of particle trajectories.
//!
//! A `time,body,x,y,z` CSV is loaded into a [`TrajectoryTable`], bodies get
//! fixed colors and the axes a fixed [`Viewport`], then every timestep is
//! drawn once onto a reusable [`Canvas`] and handed either to the live
//! window or to an [`AnimationExporter`].

pub mod animation;
pub mod camera;
pub mod canvas;
pub mod config;
pub mod error;
pub mod frame;
pub mod glyphs;
pub mod gpu;
pub mod loader;
pub mod palette;
pub mod video;
pub mod viewport;
pub mod window;

pub use animation::{Animation, FrameSink, PlaybackState};
pub use canvas::Canvas;
pub use config::RenderSettings;
pub use error::{RenderError, Result};
pub use frame::{FrameRenderer, FrameStats};
pub use loader::{Record, TrajectoryLoader, TrajectoryTable};
pub use palette::ColorAssignment;
pub use video::AnimationExporter;
pub use viewport::{AxisBounds, Viewport};
