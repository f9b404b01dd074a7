//! Packed-storage contract generator CLI.

use std::path::PathBuf;

use pwc::commands::{check_file, generate, layout_file, GenerateOptions, WriteOutcome};
use pwc::DriverError;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "-v" || a == "--verbose");
    pwc::init_tracing(verbose);

    if args.len() < 2 {
        print_usage();
        return;
    }

    let result = match args[1].as_str() {
        "generate" => run_generate(&args[2..]),
        "layout" => {
            let Some(path) = first_path(&args[2..]) else {
                eprintln!("Usage: pwc layout <config.json>");
                std::process::exit(1);
            };
            layout_file(&path).map(|table| print!("{table}"))
        }
        "check" => {
            let Some(path) = first_path(&args[2..]) else {
                eprintln!("Usage: pwc check <config.json>");
                std::process::exit(1);
            };
            check_file(&path).map(|schema| {
                println!(
                    "{}: ok ({}, {} storage words)",
                    path.display(),
                    schema.name,
                    schema.slot_count()
                );
            })
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_generate(args: &[String]) -> Result<(), DriverError> {
    let mut options = GenerateOptions::default();
    let mut paths = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-o" if i + 1 < args.len() => {
                options.output_dir = Some(PathBuf::from(&args[i + 1]));
                i += 2;
                continue;
            }
            "--force-wrapper" => options.force_wrapper = true,
            "-v" | "--verbose" => {}
            arg if arg.starts_with('-') => {
                eprintln!("warning: ignoring unknown option '{arg}'");
            }
            path => paths.push(PathBuf::from(path)),
        }
        i += 1;
    }

    if paths.is_empty() {
        eprintln!("Usage: pwc generate <config.json>... [options]");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  -o <dir>            Output directory (default: next to each config)");
        eprintln!("  --force-wrapper     Overwrite an existing wrapper contract");
        eprintln!("  -v, --verbose       Debug logging");
        std::process::exit(1);
    }

    for outcome in generate(&paths, &options)? {
        match outcome {
            WriteOutcome::Written(path) => println!("wrote {}", path.display()),
            WriteOutcome::Kept(path) => println!("kept  {}", path.display()),
        }
    }
    Ok(())
}

fn first_path(args: &[String]) -> Option<PathBuf> {
    args.iter()
        .find(|a| !a.starts_with('-'))
        .map(PathBuf::from)
}

fn print_usage() {
    println!("pwc - packed-storage contract generator");
    println!();
    println!("Usage: pwc <command> [options]");
    println!();
    println!("Commands:");
    println!("  generate <config.json>...  Write <Name>Generated.sol, <Name>-schema.json");
    println!("                             and, if absent, the <Name>.sol wrapper");
    println!("  layout <config.json>       Print the storage slot table");
    println!("  check <config.json>        Validate a configuration");
    println!("  help                       Show this message");
    println!();
    println!("Options:");
    println!("  -o <dir>           Output directory for generate");
    println!("  --force-wrapper    Overwrite an existing wrapper contract");
    println!("  -v, --verbose      Debug logging for the compiler crates");
    println!();
    println!("Set RUST_LOG for finer-grained tracing output.");
}
