#![allow(clippy::uninlined_format_args)]

use regex_examples::{Error, Flags, Options, Pattern};
use std::time::Instant;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "examples-tool")]
struct Opt {
    /// The regular expression.
    pattern: String,

    /// The flags of the regular expression, like "mix".
    #[structopt(long, short, parse(from_str = Flags::from))]
    flags: Option<Flags>,

    /// Maximum results per character, set, group or alternation.
    #[structopt(long)]
    max_group_results: Option<usize>,

    /// Maximum number of extra repetitions tried per repeater.
    #[structopt(long)]
    max_repeater_variance: Option<usize>,

    /// Maximum results per sequence or repeater, and overall.
    #[structopt(long)]
    max_results_limit: Option<usize>,

    /// Dump the IR to stdout.
    #[structopt(long)]
    dump_ir: bool,

    /// Time repeated generation instead of printing the examples.
    #[structopt(long)]
    bench: bool,
}

impl Opt {
    fn options(&self) -> Options {
        let defaults = Options::default();
        Options {
            max_group_results: self.max_group_results.unwrap_or(defaults.max_group_results),
            max_repeater_variance: self
                .max_repeater_variance
                .unwrap_or(defaults.max_repeater_variance),
            max_results_limit: self.max_results_limit.unwrap_or(defaults.max_results_limit),
        }
    }
}

fn bench_pattern(pattern: &Pattern, options: &Options) {
    // Warmup
    pattern.examples_with(options);
    let start = Instant::now();
    for _ in 0..25 {
        pattern.examples_with(options);
    }
    let duration = start.elapsed();
    println!("{} ms", duration.as_millis());
}

fn main() -> Result<(), Error> {
    let args = Opt::from_args();

    let flags = args.flags.unwrap_or_default();
    let pattern = Pattern::with_flags(&args.pattern, flags)?;
    if args.dump_ir {
        println!("IR:\n{}", pattern.dump_ir());
    }

    let options = args.options();
    if args.bench {
        bench_pattern(&pattern, &options);
        return Ok(());
    }
    let examples = pattern.examples_with(&options);
    for example in &examples {
        println!("{:?}", example);
    }
    if examples.is_empty() {
        println!("No examples");
    }
    Ok(())
}
