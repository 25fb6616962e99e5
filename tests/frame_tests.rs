use trajectory_renderer::{
    Canvas, ColorAssignment, FrameRenderer, Record, RenderSettings, TrajectoryTable, Viewport,
};

fn record(time: f64, body: u32, x: f64, y: f64, z: f64) -> Record {
    Record { time, body, x, y, z }
}

fn example_table() -> TrajectoryTable {
    TrajectoryTable::from_records(vec![
        record(0.0, 0, 0.0, 0.0, 0.0),
        record(0.0, 1, 1.0, 1.0, 1.0),
        record(1.0, 0, 1.0, 1.0, 1.0),
        record(1.0, 1, 2.0, 2.0, 2.0),
    ])
}

fn test_settings() -> RenderSettings {
    RenderSettings {
        width: 320,
        height: 240,
        point_radius: 4,
        ..Default::default()
    }
}

fn pixel_at(renderer: &FrameRenderer<'_>, canvas: &Canvas, position: [f64; 3]) -> image::Rgba<u8> {
    let p = renderer.project(position).unwrap();
    canvas.pixel(p.x.round() as u32, p.y.round() as u32).unwrap()
}

fn count_color(canvas: &Canvas, color: image::Rgba<u8>) -> usize {
    canvas.image().pixels().filter(|p| **p == color).count()
}

#[test]
fn test_frame_draws_every_record_at_time() {
    let table = example_table();
    let colors = ColorAssignment::for_table(&table);
    let viewport = Viewport::from_table(&table).unwrap();
    let renderer = FrameRenderer::new(&table, &colors, &viewport, test_settings());
    let mut canvas = renderer.create_canvas();

    let stats = renderer.render(&mut canvas, 0.0);
    assert_eq!(stats.time, 0.0);
    assert_eq!(stats.points, 2);

    assert_eq!(pixel_at(&renderer, &canvas, [0.0, 0.0, 0.0]), colors.color_of(0).unwrap());
    assert_eq!(pixel_at(&renderer, &canvas, [1.0, 1.0, 1.0]), colors.color_of(1).unwrap());
}

#[test]
fn test_body_color_stable_across_frames() {
    let table = example_table();
    let colors = ColorAssignment::for_table(&table);
    let viewport = Viewport::from_table(&table).unwrap();
    let renderer = FrameRenderer::new(&table, &colors, &viewport, test_settings());
    let mut canvas = renderer.create_canvas();

    renderer.render(&mut canvas, 0.0);
    let body0_first = pixel_at(&renderer, &canvas, [0.0, 0.0, 0.0]);

    renderer.render(&mut canvas, 1.0);
    let body0_second = pixel_at(&renderer, &canvas, [1.0, 1.0, 1.0]);

    assert_eq!(body0_first, body0_second);
    assert_eq!(body0_first, colors.color_of(0).unwrap());
}

#[test]
fn test_previous_frame_is_cleared() {
    let table = example_table();
    let colors = ColorAssignment::for_table(&table);
    let viewport = Viewport::from_table(&table).unwrap();
    let renderer = FrameRenderer::new(&table, &colors, &viewport, test_settings());
    let mut canvas = renderer.create_canvas();

    renderer.render(&mut canvas, 0.0);
    renderer.render(&mut canvas, 1.0);

    // Body 0 moved away from the origin; its old position is background again.
    let old = pixel_at(&renderer, &canvas, [0.0, 0.0, 0.0]);
    assert_ne!(old, colors.color_of(0).unwrap());
}

#[test]
fn test_rendering_is_repeatable() {
    let table = example_table();
    let colors = ColorAssignment::for_table(&table);
    let viewport = Viewport::from_table(&table).unwrap();
    let renderer = FrameRenderer::new(&table, &colors, &viewport, test_settings());

    let mut fresh = renderer.create_canvas();
    renderer.render(&mut fresh, 0.0);

    let mut reused = renderer.create_canvas();
    renderer.render(&mut reused, 1.0);
    renderer.render(&mut reused, 0.0);

    assert_eq!(fresh.pixels(), reused.pixels());
}

#[test]
fn test_missing_timestep_renders_empty_titled_frame() {
    let table = example_table();
    let colors = ColorAssignment::for_table(&table);
    let viewport = Viewport::from_table(&table).unwrap();
    let settings = test_settings();
    let renderer = FrameRenderer::new(&table, &colors, &viewport, settings);
    let mut canvas = renderer.create_canvas();

    let stats = renderer.render(&mut canvas, 0.5);

    assert_eq!(stats.points, 0);
    for (_, color) in colors.iter() {
        assert_eq!(count_color(&canvas, color), 0);
    }
    assert!(count_color(&canvas, settings.foreground) > 0, "title should be drawn");
}

#[test]
fn test_frames_differ_only_by_time_when_title_changes() {
    let table = TrajectoryTable::from_records(vec![
        record(0.0, 0, 0.0, 0.0, 0.0),
        record(2.0, 0, 0.0, 0.0, 0.0),
        record(2.0, 1, 1.0, 1.0, 1.0),
    ]);
    let colors = ColorAssignment::for_table(&table);
    let viewport = Viewport::from_table(&table).unwrap();
    let renderer = FrameRenderer::new(&table, &colors, &viewport, test_settings());

    let mut first = renderer.create_canvas();
    let mut second = renderer.create_canvas();
    renderer.render(&mut first, 0.0);
    renderer.render(&mut second, 2.0);

    assert_ne!(first.pixels(), second.pixels());
}

#[test]
fn test_viewport_fixed_for_renderer_lifetime() {
    let table = example_table();
    let colors = ColorAssignment::for_table(&table);
    let viewport = Viewport::from_table(&table).unwrap();
    let renderer = FrameRenderer::new(&table, &colors, &viewport, test_settings());
    let mut canvas = renderer.create_canvas();

    let before = renderer.project([0.5, 1.5, 2.0]);
    renderer.render(&mut canvas, 0.0);
    renderer.render(&mut canvas, 1.0);

    assert_eq!(renderer.project([0.5, 1.5, 2.0]), before);
    assert_eq!(*renderer.viewport(), viewport);
}

#[test]
fn test_flat_dataset_renders_inside_canvas() {
    // All z equal: the degenerate axis is expanded, so the points sit on the
    // cube's middle plane instead of collapsing the projection.
    let table = TrajectoryTable::from_records(vec![
        record(0.0, 0, 0.0, 0.0, 5.0),
        record(0.0, 1, 4.0, 3.0, 5.0),
    ]);
    let colors = ColorAssignment::for_table(&table);
    let viewport = Viewport::from_table(&table).unwrap();
    let settings = test_settings();
    let renderer = FrameRenderer::new(&table, &colors, &viewport, settings);
    let mut canvas = renderer.create_canvas();

    let stats = renderer.render(&mut canvas, 0.0);
    assert_eq!(stats.points, 2);

    for position in [[0.0, 0.0, 5.0], [4.0, 3.0, 5.0]] {
        let p = renderer.project(position).unwrap();
        assert!(p.x >= 0.0 && p.x < settings.width as f32);
        assert!(p.y >= 0.0 && p.y < settings.height as f32);
    }
}
