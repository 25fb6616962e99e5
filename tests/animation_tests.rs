use image::Rgba;
use std::collections::BTreeMap;
use trajectory_renderer::{
    Animation, Canvas, ColorAssignment, FrameRenderer, FrameSink, FrameStats, PlaybackState,
    Record, RenderError, RenderSettings, Result, TrajectoryTable, Viewport,
};

fn record(time: f64, body: u32, x: f64, y: f64, z: f64) -> Record {
    Record { time, body, x, y, z }
}

fn example_table() -> TrajectoryTable {
    TrajectoryTable::from_records(vec![
        record(1.0, 1, 2.0, 2.0, 2.0),
        record(0.0, 0, 0.0, 0.0, 0.0),
        record(1.0, 0, 1.0, 1.0, 1.0),
        record(0.0, 1, 1.0, 1.0, 1.0),
    ])
}

fn small_settings() -> RenderSettings {
    RenderSettings {
        width: 320,
        height: 240,
        point_radius: 3,
        ..Default::default()
    }
}

/// Records every frame it receives.
#[derive(Default)]
struct CollectingSink {
    frames: Vec<FrameStats>,
}

impl FrameSink for CollectingSink {
    type Output = Vec<FrameStats>;

    fn push_frame(&mut self, _canvas: &Canvas, stats: &FrameStats) -> Result<()> {
        self.frames.push(*stats);
        Ok(())
    }

    fn finish(self) -> Result<Vec<FrameStats>> {
        Ok(self.frames)
    }
}

/// Samples the pixel under each body in every frame.
struct BodyColorSink<'r> {
    renderer: &'r FrameRenderer<'r>,
    table: &'r TrajectoryTable,
    seen: BTreeMap<u32, Vec<Rgba<u8>>>,
}

impl FrameSink for BodyColorSink<'_> {
    type Output = BTreeMap<u32, Vec<Rgba<u8>>>;

    fn push_frame(&mut self, canvas: &Canvas, stats: &FrameStats) -> Result<()> {
        for record in self.table.records_at(stats.time) {
            let p = self.renderer.project(record.position()).unwrap();
            let pixel = canvas.pixel(p.x.round() as u32, p.y.round() as u32).unwrap();
            self.seen.entry(record.body).or_default().push(pixel);
        }
        Ok(())
    }

    fn finish(self) -> Result<Self::Output> {
        Ok(self.seen)
    }
}

/// Fails on the given frame index.
struct FailingSink {
    fail_at: usize,
    received: usize,
}

impl FrameSink for FailingSink {
    type Output = ();

    fn push_frame(&mut self, _canvas: &Canvas, _stats: &FrameStats) -> Result<()> {
        if self.received == self.fail_at {
            return Err(RenderError::Export("disk full".into()));
        }
        self.received += 1;
        Ok(())
    }

    fn finish(self) -> Result<()> {
        panic!("finish must not be called after a failed frame");
    }
}

#[test]
fn test_frames_in_ascending_order_exactly_once() {
    let table = example_table();
    let colors = ColorAssignment::for_table(&table);
    let viewport = Viewport::from_table(&table).unwrap();
    let renderer = FrameRenderer::new(&table, &colors, &viewport, small_settings());
    let mut canvas = renderer.create_canvas();

    let mut animation = Animation::for_table(&table).unwrap();
    let frames = animation
        .run(&renderer, &mut canvas, CollectingSink::default())
        .unwrap();

    let times: Vec<f64> = frames.iter().map(|f| f.time).collect();
    assert_eq!(times, vec![0.0, 1.0]);
    assert!(frames.iter().all(|f| f.points == 2));
    assert!(animation.is_done());
}

#[test]
fn test_irregular_spacing_preserved() {
    let table = TrajectoryTable::from_records(vec![
        record(5.0, 0, 0.0, 0.0, 0.0),
        record(0.1, 0, 1.0, 0.0, 0.0),
        record(0.0, 0, 2.0, 0.0, 0.0),
        record(0.1, 1, 3.0, 0.0, 0.0),
    ]);
    let colors = ColorAssignment::for_table(&table);
    let viewport = Viewport::from_table(&table).unwrap();
    let renderer = FrameRenderer::new(&table, &colors, &viewport, small_settings());
    let mut canvas = renderer.create_canvas();

    let mut animation = Animation::for_table(&table).unwrap();
    let frames = animation
        .run(&renderer, &mut canvas, CollectingSink::default())
        .unwrap();

    let summary: Vec<(f64, usize)> = frames.iter().map(|f| (f.time, f.points)).collect();
    assert_eq!(summary, vec![(0.0, 1), (0.1, 2), (5.0, 1)]);
}

#[test]
fn test_state_machine_transitions() {
    let table = example_table();
    let colors = ColorAssignment::for_table(&table);
    let viewport = Viewport::from_table(&table).unwrap();
    let renderer = FrameRenderer::new(&table, &colors, &viewport, small_settings());
    let mut canvas = renderer.create_canvas();

    let mut animation = Animation::for_table(&table).unwrap();
    assert_eq!(animation.state(), PlaybackState::Idle);

    assert_eq!(animation.step(&renderer, &mut canvas).map(|s| s.time), Some(0.0));
    assert_eq!(animation.state(), PlaybackState::Rendering(0));

    assert_eq!(animation.step(&renderer, &mut canvas).map(|s| s.time), Some(1.0));
    assert_eq!(animation.state(), PlaybackState::Rendering(1));

    assert_eq!(animation.step(&renderer, &mut canvas), None);
    assert_eq!(animation.state(), PlaybackState::Done);

    // No looping back to the first frame.
    assert_eq!(animation.step(&renderer, &mut canvas), None);
    assert_eq!(animation.state(), PlaybackState::Done);
}

#[test]
fn test_body_colors_identical_in_every_frame() {
    let table = example_table();
    let colors = ColorAssignment::for_table(&table);
    let viewport = Viewport::from_table(&table).unwrap();
    let renderer = FrameRenderer::new(&table, &colors, &viewport, small_settings());
    let mut canvas = renderer.create_canvas();

    let sink = BodyColorSink {
        renderer: &renderer,
        table: &table,
        seen: BTreeMap::new(),
    };
    let seen = Animation::for_table(&table)
        .unwrap()
        .run(&renderer, &mut canvas, sink)
        .unwrap();

    assert_eq!(seen.len(), 2);
    for (body, pixels) in seen {
        assert_eq!(pixels.len(), 2);
        assert!(pixels.iter().all(|p| Some(*p) == colors.color_of(body)));
    }
}

#[test]
fn test_sink_error_aborts_run() {
    let table = example_table();
    let colors = ColorAssignment::for_table(&table);
    let viewport = Viewport::from_table(&table).unwrap();
    let renderer = FrameRenderer::new(&table, &colors, &viewport, small_settings());
    let mut canvas = renderer.create_canvas();

    let mut animation = Animation::for_table(&table).unwrap();
    let sink = FailingSink { fail_at: 1, received: 0 };
    let err = animation.run(&renderer, &mut canvas, sink).unwrap_err();

    assert!(matches!(err, RenderError::Export(_)));
    assert_eq!(animation.state(), PlaybackState::Rendering(1));
}

#[test]
fn test_pipeline_reruns_identically() {
    let run = || {
        let table = example_table();
        let colors = ColorAssignment::for_table(&table);
        let viewport = Viewport::from_table(&table).unwrap();
        let renderer = FrameRenderer::new(&table, &colors, &viewport, small_settings());
        let mut canvas = renderer.create_canvas();
        let mut animation = Animation::for_table(&table).unwrap();
        let mut frames = Vec::new();
        while animation.step(&renderer, &mut canvas).is_some() {
            frames.push(canvas.pixels().to_vec());
        }
        (colors, frames)
    };

    let (first_colors, first_frames) = run();
    let (second_colors, second_frames) = run();

    assert_eq!(first_colors, second_colors);
    assert_eq!(first_frames, second_frames);
}

#[test]
fn test_empty_table_cannot_animate() {
    let table = TrajectoryTable::from_records(Vec::new());
    assert!(matches!(Animation::for_table(&table), Err(RenderError::EmptyDataset)));
}
