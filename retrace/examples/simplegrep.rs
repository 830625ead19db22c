// Retrace example program: simplegrep
//
// This is a simple example of retrace's most basic functionality: it will
// search a given input file for a pattern supplied as a command-line argument
// and print every match with its capture groups.
//
// Patterns are scanned in 'DOTALL' mode unless `--no-dotall` is given.
//
// Build instructions:
//
//     cargo run --example simplegrep -- <pattern> <input file>
//
// Example:
//
//     ./simplegrep -i 'fn (\w+)' src/lib.rs
//

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use structopt::StructOpt;

use retrace::prelude::*;

#[derive(Debug, StructOpt)]
#[structopt(name = "simplegrep", about = "An example search a given input file for a pattern.")]
struct Opt {
    /// Match case insensitively.
    #[structopt(short = "i", long)]
    ignore_case: bool,

    /// Make `^` and `$` match at line boundaries.
    #[structopt(short = "m", long)]
    multi_line: bool,

    /// Do not let `.` match newlines.
    #[structopt(long)]
    no_dotall: bool,

    /// Stop after this many matches.
    #[structopt(short = "n", long)]
    max_count: Option<usize>,

    /// The regular expression to search for.
    pattern: String,

    /// The file to search.
    #[structopt(parse(from_os_str))]
    input_file: PathBuf,
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let opt = Opt::from_args();

    // First, we attempt to compile the pattern provided on the command line.
    // The compiler will either return a compiled database, or an error
    // explaining why and where the pattern didn't compile.
    let mut pattern = Pattern::new(opt.pattern.as_str());

    if !opt.no_dotall {
        pattern = pattern.dot_all();
    }
    if opt.ignore_case {
        pattern = pattern.caseless();
    }
    if opt.multi_line {
        pattern = pattern.multi_line();
    }

    let database = pattern.build().context("compile pattern")?;

    // Next, we read the input data file into a buffer.
    let input_data = fs::read_to_string(&opt.input_file)
        .with_context(|| format!("read input file {}", opt.input_file.display()))?;

    // Finally, we scan the buffer. Scratch space can be reused for many scans
    // with the same database; we only need it once here.
    let mut scratch = database.alloc_scratch().context("allocate scratch space")?;
    let max_count = opt.max_count.unwrap_or(usize::MAX);
    let mut count = 0;

    println!("Scanning {} bytes with retrace", input_data.len());

    let stop = database
        .scan(&input_data, &mut scratch, |m| {
            let groups = m
                .iter()
                .skip(1)
                .map(|group| group.map_or("<unset>", |c| &input_data[c.range()]))
                .collect::<Vec<_>>();

            println!(
                "Match for pattern \"{}\" at {:?}: {:?} {:?}",
                pattern.expression,
                m.range(),
                &input_data[m.range()],
                groups
            );

            count += 1;

            if count >= max_count {
                Matching::Terminate
            } else {
                Matching::Continue
            }
        })
        .context("scan input buffer")?;

    println!("{} matches, {:?}", count, stop);

    Ok(())
}
