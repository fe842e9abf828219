use std::{env, path::Path, process};

use visvoc::*;

const USAGE: &str = "usage: correct-dir <in_dir> <out_dir> [max_size] [color]";

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("{}", USAGE);
        process::exit(2);
    }
    let (in_dir, out_dir) = (Path::new(&args[1]), Path::new(&args[2]));
    let mut params = CorrectionParams::default();
    if let Some(max_size) = args.get(3) {
        params.max_size = match max_size.parse() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("max_size must be an integer\n{}", USAGE);
                process::exit(2);
            }
        };
    }
    if args.get(4).map(String::as_str) == Some("color") {
        params = params.color();
    }

    let entries = match in_dir.read_dir() {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Cannot read {:?}: {}\n{}", in_dir, e, USAGE);
            process::exit(1);
        }
    };
    for entry in entries.flatten() {
        match save_corrected_image(entry.file_name(), in_dir, out_dir, &params) {
            Ok(out) => println!("{:?} -> {:?}", entry.path(), out),
            Err(e) => println!("{:?}: {}", entry.path(), e),
        }
    }
}
