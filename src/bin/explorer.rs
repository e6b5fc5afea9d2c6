extern crate clap;
extern crate env_logger;
extern crate failure;
extern crate fractal_explorer;
extern crate log;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use failure::err_msg;
use fractal_explorer::display::zoom_to_scroll;
use fractal_explorer::export::write_pnm;
use fractal_explorer::{
    drive, Config, Coordinator, FractalKind, HeadlessDisplay, InputEvent, Palette,
};
use log::info;
use num::Complex;
use std::str::FromStr;
use std::time::Instant;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn parse_palette(s: &str) -> Option<Palette> {
    if s == "warm" {
        return Some(Palette::warm());
    }
    if s.starts_with("mono:") {
        if let Ok(hue) = f32::from_str(&s[5..]) {
            if hue >= 0.0 && hue <= 1.0 {
                return Some(Palette::monochrome(hue));
            }
        }
    }
    None
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const WORKERS: &str = "workers";
const ITERATIONS: &str = "iterations";
const JULIA: &str = "julia";
const CENTER: &str = "center";
const ZOOM: &str = "zoom";
const PAN: &str = "pan";
const PALETTE: &str = "palette";

fn args<'a>() -> ArgMatches<'a> {
    let max_workers = num_cpus::get() * 16;

    App::new("explorer")
        .version("0.1.0")
        .about("Tile-parallel Mandelbrot and Julia renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file (binary PPM)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x800")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(WORKERS)
                .long(WORKERS)
                .short("t")
                .takes_value(true)
                .default_value("16")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_workers,
                        "Could not parse worker count",
                        &format!("Worker count must be between 1 and {}", max_workers),
                    )
                })
                .help("Number of worker threads"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        200_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 200000",
                    )
                })
                .help("Iteration cap per pixel"),
        )
        .arg(
            Arg::with_name(JULIA)
                .long(JULIA)
                .short("j")
                .takes_value(true)
                .allow_hyphen_values(true)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse Julia constant"))
                .help("Draw the Julia set for this constant instead of the Mandelbrot set"),
        )
        .arg(
            Arg::with_name(CENTER)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0,0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse center"))
                .help("Point of the complex plane shown in the middle"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        0.001,
                        1000.0,
                        "Could not parse zoom factor",
                        "Zoom factor must be between 0.001 and 1000",
                    )
                })
                .help("Zoom around the middle of the image by this factor"),
        )
        .arg(
            Arg::with_name(PAN)
                .long(PAN)
                .short("p")
                .takes_value(true)
                .allow_hyphen_values(true)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse pan offset"))
                .help("Drag the image by this many pixels, dx,dy"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .long(PALETTE)
                .takes_value(true)
                .default_value("warm")
                .validator(|s| match parse_palette(&s) {
                    Some(_) => Ok(()),
                    None => Err("Palette must be 'warm' or 'mono:<hue in 0..1>'".to_string()),
                })
                .help("Color palette"),
        )
        .get_matches()
}

fn value<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str, failure::Error> {
    matches
        .value_of(name)
        .ok_or_else(|| err_msg(format!("missing value for --{}", name)))
}

fn run(matches: &ArgMatches) -> Result<(), failure::Error> {
    let (width, height) = parse_pair::<usize>(value(matches, SIZE)?, 'x')
        .ok_or_else(|| err_msg("Error parsing image dimensions"))?;
    let mut config = Config {
        workers: usize::from_str(value(matches, WORKERS)?)?,
        max_iterations: u32::from_str(value(matches, ITERATIONS)?)?,
        center: parse_complex(value(matches, CENTER)?)
            .ok_or_else(|| err_msg("Error parsing center"))?,
        palette: parse_palette(value(matches, PALETTE)?)
            .ok_or_else(|| err_msg("Error parsing palette"))?,
        ..Config::default()
    };
    if let Some(c) = matches.value_of(JULIA) {
        let c = parse_complex(c).ok_or_else(|| err_msg("Error parsing Julia constant"))?;
        config.fractal = FractalKind::Julia(c);
    }

    let started = Instant::now();
    let mut coordinator = Coordinator::new(config, width, height)?;
    let (mut display, script) = HeadlessDisplay::new(width, height);
    let middle = (width as f64 / 2.0, height as f64 / 2.0);
    script.send(InputEvent::PointerMoved(middle.0, middle.1))?;
    if let Some(zoom) = matches.value_of(ZOOM) {
        let amount = f64::from_str(zoom)?;
        script.send(InputEvent::Scroll(0.0, zoom_to_scroll(amount, height)))?;
    }
    if let Some(pan) = matches.value_of(PAN) {
        let (dx, dy) =
            parse_pair::<f64>(pan, ',').ok_or_else(|| err_msg("Error parsing pan offset"))?;
        script.send(InputEvent::PrimaryPressed)?;
        script.send(InputEvent::PointerMoved(middle.0 + dx, middle.1 + dy))?;
        script.send(InputEvent::PrimaryReleased)?;
    }
    drop(script);
    drive(&mut coordinator, &mut display);

    coordinator.wait_rendered();
    info!(
        "rendered {}x{} in {:?} over {} generations",
        width,
        height,
        started.elapsed(),
        coordinator.generation()
    );
    write_pnm(value(matches, OUTPUT)?, &coordinator.canvas())?;
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
