//! Animation export.
//!
//! Rendered frames are written out as they are produced, and the finished
//! file only appears at the destination once encoding has succeeded.
//!
//! # Formats
//! - `.gif`: encoded in-process with the `gif` encoder, played once.
//! - anything else (`.mp4`, `.mov`, `.webm`, ...): frames are saved as PNGs in
//!   a temporary directory and encoded by FFmpeg, which must be in PATH.
//!
//! # Finalizing
//! Encoders write to a temporary file next to the destination, which is then
//! renamed over the destination. A failed export leaves the destination as it
//! was.

use crate::animation::FrameSink;
use crate::canvas::Canvas;
use crate::config::RenderSettings;
use crate::error::{RenderError, Result};
use crate::frame::FrameStats;
use image::ImageFormat;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::{NamedTempFile, TempDir, TempPath};

const GIF_ENCODER_SPEED: i32 = 10;
const TEMP_PREFIX: &str = ".trajectory-export-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Gif,
    Video,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Self {
        match extension_of(path).as_deref() {
            Some("gif") => ExportFormat::Gif,
            _ => ExportFormat::Video,
        }
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

fn destination_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn temp_file_beside(destination: &Path) -> Result<NamedTempFile> {
    let suffix = extension_of(destination)
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();
    tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(&suffix)
        .tempfile_in(destination_dir(destination))
        .map_err(|e| {
            RenderError::Export(format!(
                "cannot create temporary file for {}: {}",
                destination.display(),
                e
            ))
        })
}

fn persist(temp: TempPath, destination: &Path) -> Result<()> {
    temp.persist(destination).map_err(|e| {
        RenderError::Export(format!("cannot write {}: {}", destination.display(), e.error))
    })
}

/// Frame sink writing an animation file at a fixed frame rate.
pub struct AnimationExporter {
    destination: PathBuf,
    frames: usize,
    backend: Backend,
}

enum Backend {
    Gif {
        encoder: gif::Encoder<BufWriter<File>>,
        delay: u16,
        temp: TempPath,
    },
    Ffmpeg {
        frame_dir: TempDir,
        fps: u32,
    },
}

impl AnimationExporter {
    /// Prepares an export to `destination`. Fails before any frame is
    /// rendered if the destination directory or encoder is unusable.
    pub fn create(destination: impl Into<PathBuf>, settings: &RenderSettings) -> Result<Self> {
        let destination = destination.into();
        if settings.fps == 0 {
            return Err(RenderError::Export("fps must be greater than zero".into()));
        }

        let backend = match ExportFormat::from_path(&destination) {
            ExportFormat::Gif => {
                let (width, height) = gif_dimensions(settings.width, settings.height)?;
                let (file, temp) = temp_file_beside(&destination)?.into_parts();
                // No loop extension is written, so viewers play the frames once.
                let encoder = gif::Encoder::new(BufWriter::new(file), width, height, &[])
                    .map_err(RenderError::export)?;
                Backend::Gif {
                    encoder,
                    delay: gif_delay(settings.fps),
                    temp,
                }
            }
            ExportFormat::Video => {
                ensure_ffmpeg_available()?;
                // Probe that the destination directory is writable.
                drop(temp_file_beside(&destination)?);
                let frame_dir = tempfile::Builder::new()
                    .prefix("trajectory_frames_")
                    .tempdir()
                    .map_err(RenderError::export)?;
                Backend::Ffmpeg {
                    frame_dir,
                    fps: settings.fps,
                }
            }
        };

        log::info!("Exporting animation to {}", destination.display());
        Ok(Self {
            destination,
            frames: 0,
            backend,
        })
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn frame_count(&self) -> usize {
        self.frames
    }
}

impl FrameSink for AnimationExporter {
    type Output = PathBuf;

    fn push_frame(&mut self, canvas: &Canvas, stats: &FrameStats) -> Result<()> {
        match &mut self.backend {
            Backend::Gif { encoder, delay, .. } => {
                let (width, height) = gif_dimensions(canvas.width(), canvas.height())?;
                let mut pixels = canvas.pixels().to_vec();
                let mut frame = gif::Frame::from_rgba_speed(width, height, &mut pixels, GIF_ENCODER_SPEED);
                frame.delay = *delay;
                encoder.write_frame(&frame).map_err(RenderError::export)?;
            }
            Backend::Ffmpeg { frame_dir, .. } => {
                let filename = frame_dir.path().join(frame_filename(self.frames));
                canvas
                    .image()
                    .save_with_format(&filename, ImageFormat::Png)
                    .map_err(RenderError::export)?;
            }
        }

        self.frames += 1;
        if self.frames % 30 == 0 {
            println!("Encoded frame {} (time {:.2})", self.frames, stats.time);
        }
        Ok(())
    }

    fn finish(self) -> Result<PathBuf> {
        if self.frames == 0 {
            return Err(RenderError::Export("no frames to export".into()));
        }

        match self.backend {
            Backend::Gif { encoder, temp, .. } => {
                let file = finish_gif(encoder).map_err(RenderError::export)?;
                file.sync_all().map_err(RenderError::export)?;
                persist(temp, &self.destination)?;
            }
            Backend::Ffmpeg { frame_dir, fps } => {
                let temp = temp_file_beside(&self.destination)?.into_temp_path();
                encode_pngs_to_video(frame_dir.path(), &temp, fps, &self.destination)?;
                persist(temp, &self.destination)?;
            }
        }

        println!("Saved {} frames to {}", self.frames, self.destination.display());
        Ok(self.destination)
    }
}

fn gif_dimensions(width: u32, height: u32) -> Result<(u16, u16)> {
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(RenderError::Export(format!(
            "{}x{} is too large for a GIF frame",
            width, height
        ))),
    }
}

/// Frame delay in the GIF unit of 1/100 s.
fn gif_delay(fps: u32) -> u16 {
    (100.0 / fps.max(1) as f64).round().clamp(1.0, u16::MAX as f64) as u16
}

/// Writes the trailer and flushes, returning the underlying writer only if
/// every byte reached it.
fn finish_gif<W: Write>(encoder: gif::Encoder<BufWriter<W>>) -> io::Result<W> {
    encoder
        .into_inner()?
        .into_inner()
        .map_err(|e| e.into_error())
}

fn frame_filename(index: usize) -> String {
    format!("frame_{:06}.png", index)
}

fn ensure_ffmpeg_available() -> Result<()> {
    let status = Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match status {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(RenderError::Export(format!("ffmpeg -version exited with {}", status))),
        Err(e) => Err(RenderError::Export(format!("ffmpeg is not available: {}", e))),
    }
}

fn video_codec_args(destination: &Path) -> &'static [&'static str] {
    match extension_of(destination).as_deref() {
        Some("webm") => &["-c:v", "libvpx-vp9"],
        _ => &["-c:v", "libx264", "-preset", "fast", "-crf", "23", "-pix_fmt", "yuv420p"],
    }
}

fn encode_pngs_to_video(frame_dir: &Path, output: &Path, fps: u32, destination: &Path) -> Result<()> {
    let output_status = Command::new("ffmpeg")
        .args(["-y", "-loglevel", "error"])
        .args(["-framerate", &fps.to_string()])
        .arg("-i")
        .arg(frame_dir.join("frame_%06d.png"))
        .args(video_codec_args(destination))
        // H.264 needs even dimensions.
        .args(["-vf", "pad=ceil(iw/2)*2:ceil(ih/2)*2"])
        .arg(output)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| RenderError::Export(format!("cannot run ffmpeg: {}", e)))?;

    if !output_status.status.success() {
        let stderr = String::from_utf8_lossy(&output_status.stderr);
        return Err(RenderError::Export(format!(
            "ffmpeg encoding failed ({}): {}",
            output_status.status,
            stderr.trim()
        )));
    }
    Ok(())
}

/// Writes a single rendered frame to `path` as PNG.
pub fn save_frame_as_png(canvas: &Canvas, path: &Path) -> Result<()> {
    let mut temp = temp_file_beside(path)?;
    canvas
        .image()
        .write_to(temp.as_file_mut(), image::ImageOutputFormat::Png)
        .map_err(RenderError::export)?;
    persist(temp.into_temp_path(), path)
}
