// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

// Randomized checks of the drain protocol: whatever the pool was doing
// when a drain started, it holds nothing afterwards.

use fractal_explorer::tiles::{partition, tile_edge};
use fractal_explorer::{Config, Coordinator};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn config(workers: usize, max_iterations: u32) -> Config {
    Config {
        workers,
        max_iterations,
        ..Config::default()
    }
}

#[test]
fn partitions_cover_every_pixel_exactly_once() {
    let mut rng = rand::thread_rng();
    for _ in 0..40 {
        let (w, h) = (rng.gen_range(1, 400), rng.gen_range(1, 400));
        let tiles = partition(w, h, tile_edge(w, h));
        let mut hits = vec![0u8; w * h];
        for t in &tiles {
            assert!(t.max_x <= w && t.max_y <= h, "{:?} leaves {}x{}", t, w, h);
            for y in t.min_y..t.max_y {
                for x in t.min_x..t.max_x {
                    hits[y * w + x] += 1;
                }
            }
        }
        assert!(hits.iter().all(|&n| n == 1), "bad cover of {}x{}", w, h);
    }
}

#[test]
fn stop_drawing_always_leaves_the_pool_idle() {
    let mut rng = rand::thread_rng();
    for _ in 0..12 {
        let workers = rng.gen_range(1, 9);
        let (w, h) = (rng.gen_range(60, 260), rng.gen_range(60, 260));
        let mut c = Coordinator::new(config(workers, 300), w, h).unwrap();
        thread::sleep(Duration::from_millis(rng.gen_range(0, 6)));
        c.stop_drawing();
        assert_eq!(c.queued_tiles(), 0);
        assert_eq!(c.idle_workers(), workers);
        assert!(!c.is_drawing());

        // Nobody may write once the drain has returned.
        let before = c.canvas().snapshot();
        thread::sleep(Duration::from_millis(15));
        assert_eq!(c.canvas().snapshot(), before);
    }
}

#[test]
fn repeated_stops_drain_once() {
    let mut c = Coordinator::new(config(4, 200), 200, 200).unwrap();
    c.stop_drawing();
    c.stop_drawing();
    c.stop_drawing();
    assert_eq!(c.drains(), 1);
    c.start_drawing();
    c.stop_drawing();
    assert_eq!(c.drains(), 2);
}

#[test]
fn random_interactions_never_leave_stale_work() {
    let mut rng = rand::thread_rng();
    let mut c = Coordinator::new(config(rng.gen_range(2, 7), 150), 160, 120).unwrap();
    for _ in 0..30 {
        match rng.gen_range(0, 3) {
            0 => c.pan((rng.gen_range(-40.0, 40.0), rng.gen_range(-40.0, 40.0))),
            1 => {
                let focus = (rng.gen_range(0.0, 160.0), rng.gen_range(0.0, 120.0));
                c.zoom(focus, rng.gen_range(0.5, 3.0)).unwrap();
            }
            _ => {
                c.resize(rng.gen_range(40, 200), rng.gen_range(40, 200)).unwrap();
            }
        }
        assert!(c.is_drawing());
        if rng.gen::<bool>() {
            thread::sleep(Duration::from_millis(rng.gen_range(0, 3)));
        }
    }
    c.stop_drawing();
    assert_eq!(c.queued_tiles(), 0);
    assert_eq!(c.idle_workers(), c.workers());
}

#[test]
fn display_can_read_while_the_view_changes() {
    let mut c = Coordinator::new(config(4, 200), 200, 150).unwrap();
    let done = Arc::new(AtomicBool::new(false));
    let canvas = c.canvas();
    let reader = {
        let done = done.clone();
        thread::spawn(move || {
            let mut frames = 0;
            while !done.load(Ordering::Relaxed) {
                assert_eq!(canvas.snapshot().len(), 200 * 150);
                frames += 1;
            }
            frames
        })
    };
    for i in 0..10 {
        c.pan((3.0 * i as f64, -2.0));
        c.zoom((100.0, 75.0), 1.25).unwrap();
    }
    c.wait_rendered();
    done.store(true, Ordering::Relaxed);
    assert!(reader.join().unwrap() > 0);
}
