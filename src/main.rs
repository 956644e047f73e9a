extern crate clap;
extern crate image;
extern crate juliabrot;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use image::jpeg::JPEGEncoder;
use image::ColorType;
use num::Complex;
use std::fs::File;
use std::str::FromStr;
use std::time::Instant;

use juliabrot::{Camera, Fractal, Palette, Renderer, Strategy};

fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
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

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
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

// f64 has no total order, so the zoom gets its own validator.
fn validate_zoom(s: String) -> Result<(), String> {
    match f64::from_str(&s) {
        Ok(zoom) => {
            if zoom > 0.0 {
                Ok(())
            } else {
                Err("Zoom must be positive".to_string())
            }
        }
        Err(_) => Err("Could not parse zoom factor".to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const FRACTAL: &str = "fractal";
const JULIA_C: &str = "julia-c";
const OFFSET: &str = "offset";
const ZOOM: &str = "zoom";
const THREADS: &str = "threads";
const STRATEGY: &str = "strategy";
const QUEUE_CAPACITY: &str = "queue-capacity";
const QUALITY: &str = "quality";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("juliabrot")
        .version("0.1.0")
        .about("Escape-time Mandelbrot and Julia set renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output JPEG file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(FRACTAL)
                .required(false)
                .long(FRACTAL)
                .short("f")
                .takes_value(true)
                .default_value("mandelbrot")
                .possible_values(&["mandelbrot", "julia"])
                .help("Fractal to render"),
        )
        .arg(
            Arg::with_name(JULIA_C)
                .required(false)
                .long(JULIA_C)
                .takes_value(true)
                .default_value("-0.7,0.27015")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse the Julia constant"))
                .help("Julia constant as re,im (only used with --fractal julia)"),
        )
        .arg(
            Arg::with_name(OFFSET)
                .required(false)
                .long(OFFSET)
                .takes_value(true)
                .default_value("0,0")
                .validator(|s| validate_pair::<i32>(&s, ',', "Could not parse camera offset"))
                .help("Camera pan in pixels, as x,y"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .required(false)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .default_value("1.0")
                .validator(validate_zoom)
                .help("Camera zoom factor"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of render workers"),
        )
        .arg(
            Arg::with_name(STRATEGY)
                .required(false)
                .long(STRATEGY)
                .takes_value(true)
                .default_value("rows")
                .possible_values(&["rows", "queue"])
                .help("Work distribution: contiguous rows per worker, or a task queue"),
        )
        .arg(
            Arg::with_name(QUEUE_CAPACITY)
                .required(false)
                .long(QUEUE_CAPACITY)
                .takes_value(true)
                .default_value("20")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        65536,
                        "Could not parse queue capacity",
                        "Queue capacity must be between 1 and 65536",
                    )
                })
                .help("Task queue bound for the queue strategy"),
        )
        .arg(
            Arg::with_name(QUALITY)
                .required(false)
                .long(QUALITY)
                .short("q")
                .takes_value(true)
                .default_value("100")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        100,
                        "Could not parse JPEG quality",
                        "JPEG quality must be between 1 and 100",
                    )
                })
                .help("JPEG quality"),
        )
        .get_matches()
}

fn write_image(
    outfile: &str,
    pixels: &[u8],
    bounds: (usize, usize),
    quality: u8,
) -> Result<(), std::io::Error> {
    let mut output = File::create(outfile)?;
    let mut encoder = JPEGEncoder::new_with_quality(&mut output, quality);
    encoder.encode(pixels, bounds.0 as u32, bounds.1 as u32, ColorType::RGB(8))?;
    Ok(())
}

fn main() {
    let matches = args();

    let size: (usize, usize) =
        parse_pair(matches.value_of(SIZE).unwrap(), 'x').expect("Error parsing image dimensions");
    let offset: (i32, i32) =
        parse_pair(matches.value_of(OFFSET).unwrap(), ',').expect("Error parsing camera offset");
    let zoom = f64::from_str(matches.value_of(ZOOM).unwrap()).expect("Error parsing zoom factor");
    let threads =
        usize::from_str(matches.value_of(THREADS).unwrap()).expect("Could not parse thread count");
    let queue_capacity = usize::from_str(matches.value_of(QUEUE_CAPACITY).unwrap())
        .expect("Could not parse queue capacity");
    let quality =
        u8::from_str(matches.value_of(QUALITY).unwrap()).expect("Could not parse JPEG quality");

    let strategy = match matches.value_of(STRATEGY).unwrap() {
        "queue" => Strategy::ProducerConsumer,
        _ => Strategy::StaticPartition,
    };

    let (fractal, palette) = match matches.value_of(FRACTAL).unwrap() {
        "julia" => {
            let c = parse_complex(matches.value_of(JULIA_C).unwrap())
                .expect("Error parsing the Julia constant");
            (Fractal::julia_with_c(c), Palette::julia_default())
        }
        _ => (Fractal::mandelbrot(), Palette::mandelbrot_default()),
    };

    let camera = Camera::new(offset.0, offset.1, zoom);
    let outfile = matches.value_of(OUTPUT).unwrap();

    let start = Instant::now();

    let renderer = match Renderer::new(threads, strategy) {
        Ok(renderer) => renderer.queue_capacity(queue_capacity),
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
    };
    let image = renderer.render(&fractal, camera, &palette, size.0, size.1);

    if let Err(e) = write_image(outfile, image.as_raw(), (size.0, size.1), quality) {
        eprintln!("Write failure: {}", e);
        std::process::exit(1);
    }

    println!("Complete in {} ms", start.elapsed().as_millis());
    println!("Image created: {}", outfile);
}
