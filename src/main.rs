use clap::{builder::RangedU64ValueParser, ArgAction, Parser};
use color_eyre::{eyre::WrapErr, Report};
use std::{
    fs::File,
    io::{self, BufReader, Write},
    path::PathBuf,
};

use rope_editor::{
    rope::DEFAULT_LEAF_SIZE,
    util::{logging, Config},
    Editor,
};

/// Apply scripted edits to a text buffer backed by a balanced rope.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// File loaded into the buffer before the script runs
    file: Option<PathBuf>,

    /// Command script to execute; commands are read from stdin when omitted
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Maximum chars stored in a single rope leaf (at least 2)
    #[arg(
        long,
        env = "ROPE_LEAF_SIZE",
        default_value_t = DEFAULT_LEAF_SIZE,
        value_parser = RangedU64ValueParser::<usize>::new().range(2..)
    )]
    leaf_size: usize,

    /// Stop at the first failing command
    #[arg(long)]
    strict: bool,

    /// Print the buffer once the script finishes
    #[arg(short, long)]
    print: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let args = Args::parse();
    logging::init(args.verbose);

    let config = Config {
        leaf_size: args.leaf_size,
        strict: args.strict,
    };
    let mut editor = Editor::new(config).wrap_err("invalid configuration")?;

    if let Some(file) = &args.file {
        editor.load_file(file)?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &args.script {
        Some(path) => {
            let script = File::open(path)
                .wrap_err_with(|| format!("failed to open script '{}'", path.display()))?;
            editor.run(BufReader::new(script), &mut out)?;
        }
        None => editor.run(io::stdin().lock(), &mut out)?,
    }

    if args.print {
        write!(out, "{}", editor.rope())?;
        out.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "rope-editor",
            "notes.txt",
            "-s",
            "edits.txt",
            "--leaf-size",
            "64",
            "-vv",
            "-p",
        ])
        .unwrap();

        assert_eq!(args.file, Some(PathBuf::from("notes.txt")));
        assert_eq!(args.script, Some(PathBuf::from("edits.txt")));
        assert_eq!(args.leaf_size, 64);
        assert_eq!(args.verbose, 2);
        assert!(args.print);
        assert!(!args.strict);
    }

    #[test]
    fn rejects_bad_leaf_sizes() {
        for size in ["big", "1", "0"] {
            let args = Args::try_parse_from(["rope-editor", "--leaf-size", size]);
            assert!(args.is_err(), "accepted leaf size {}", size);
        }
    }

    #[test]
    fn leaf_size_falls_back_to_env() {
        std::env::set_var("ROPE_LEAF_SIZE", "32");
        let args = Args::try_parse_from(["rope-editor"]);
        std::env::remove_var("ROPE_LEAF_SIZE");

        assert_eq!(args.unwrap().leaf_size, 32);
    }
}
