// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use fractal_explorer::evaluator::Escape;
use fractal_explorer::planes::PlaneMapper;
use fractal_explorer::{Color, Config, Coordinator, FractalKind};
use num::Complex;

// 100x100 over a 5x5 square of the plane centered on the origin, so
// pixel (50, 50) sits on 0 and pixel (90, 10) sits on 2 + 2i.
fn small(workers: usize) -> Config {
    Config {
        workers,
        max_iterations: 50,
        mandelbrot_escape_radius: 2.0,
        base_extent: 5.0,
        ..Config::default()
    }
}

fn assert_fully_drawn(c: &Coordinator) {
    let mapper = PlaneMapper::new(c.viewport(), c.size());
    let canvas = c.canvas();
    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            assert_eq!(
                canvas.pixel(x, y),
                c.evaluator().evaluate(&mapper, x, y),
                "pixel ({}, {})",
                x,
                y
            );
        }
    }
}

#[test]
fn single_worker_draws_the_whole_canvas() {
    let c = Coordinator::new(small(1), 100, 100).unwrap();
    c.wait_rendered();
    assert_fully_drawn(&c);

    let origin = c.screen_to_fractal(50.0, 50.0);
    assert!(origin.norm() < 1e-12);
    assert_eq!(c.canvas().pixel(50, 50), Color::INTERIOR);

    let corner = c.screen_to_fractal(90.0, 10.0);
    assert!((corner - Complex::new(2.0, 2.0)).norm() < 1e-12);
    match c.evaluator().escape_time(corner) {
        Escape::Escaped { iterations: 1, .. } => (),
        other => panic!("2+2i should escape at once, got {:?}", other),
    }
    assert_ne!(c.canvas().pixel(90, 10), Color::INTERIOR);
}

#[test]
fn worker_count_does_not_change_the_picture() {
    let one = Coordinator::new(small(1), 100, 100).unwrap();
    let many = Coordinator::new(small(7), 100, 100).unwrap();
    one.wait_rendered();
    many.wait_rendered();
    assert_eq!(one.canvas().snapshot(), many.canvas().snapshot());
}

#[test]
fn zero_pan_changes_nothing() {
    let mut c = Coordinator::new(small(3), 100, 100).unwrap();
    c.wait_rendered();
    let before = c.canvas().snapshot();
    let drains = c.drains();
    c.pan((0.0, 0.0));
    c.wait_rendered();
    assert_eq!(c.drains(), drains);
    assert_eq!(c.canvas().snapshot(), before);
}

#[test]
fn unit_zoom_keeps_the_view_bit_for_bit() {
    let mut c = Coordinator::new(small(2), 100, 100).unwrap();
    let view = c.viewport();
    c.zoom((37.0, 81.0), 1.0).unwrap();
    assert_eq!(c.viewport(), view);
    assert_eq!(c.generation(), 2);
    c.wait_rendered();
    assert_fully_drawn(&c);
}

#[test]
fn zoom_keeps_the_focus_in_place() {
    let mut c = Coordinator::new(small(4), 100, 100).unwrap();
    let focus = (20.0, 70.0);
    let before = c.screen_to_fractal(focus.0, focus.1);
    c.zoom(focus, 2.5).unwrap();
    let after = c.screen_to_fractal(focus.0, focus.1);
    assert!((before - after).norm() < 1e-12);
    assert!((c.viewport().zoom_level - 2.5).abs() < 1e-12);
    c.wait_rendered();
    assert_fully_drawn(&c);
}

#[test]
fn pan_moves_the_view_with_the_pointer() {
    let mut c = Coordinator::new(small(4), 100, 100).unwrap();
    c.wait_rendered();
    let grabbed = c.screen_to_fractal(30.0, 30.0);
    c.pan((10.0, -5.0));
    let released = c.screen_to_fractal(40.0, 25.0);
    assert!((grabbed - released).norm() < 1e-12);
    c.wait_rendered();
    assert_fully_drawn(&c);
}

#[test]
fn resize_redraws_at_the_new_size() {
    let mut c = Coordinator::new(small(3), 100, 100).unwrap();
    c.resize(150, 60).unwrap();
    c.wait_rendered();
    assert_eq!(c.canvas().snapshot().len(), 150 * 60);
    assert_fully_drawn(&c);
}

#[test]
fn zero_iterations_leaves_everything_interior() {
    let config = Config {
        max_iterations: 0,
        ..small(4)
    };
    let c = Coordinator::new(config, 100, 100).unwrap();
    c.wait_rendered();
    assert!(c
        .canvas()
        .snapshot()
        .iter()
        .all(|&w| w == Color::INTERIOR.to_argb()));
}

#[test]
fn julia_sets_render_too() {
    let config = Config {
        workers: 3,
        max_iterations: 80,
        ..Config::julia(Complex::new(-0.8, 0.156))
    };
    let c = Coordinator::new(config, 90, 60).unwrap();
    assert_eq!(c.evaluator().kind(), FractalKind::Julia(Complex::new(-0.8, 0.156)));
    c.wait_rendered();
    assert_fully_drawn(&c);
}
