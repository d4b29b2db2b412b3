mod config;
mod data;
mod error;

use std::io::{self, Write};
use std::process;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use config::Config;
use data::descriptor::Inspector;

#[derive(Parser, Debug)]
#[command(
    name = "fdsnoop",
    version,
    about = "Snapshot a process's open file descriptors and their open flags"
)]
struct Cli {
    /// PID to analyze
    #[arg(short, long, value_name = "PID", default_value_t = 0, hide_default_value = true)]
    pid: u32,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            print!("{e}");
            process::exit(1);
        }
    };

    if cli.pid == 0 {
        let _ = Cli::command().print_help();
        process::exit(1);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = run(&Config::default(), cli.pid, &mut out) {
        let _ = writeln!(out, "{e:#}");
        process::exit(1);
    }
}

/// Print every qualifying descriptor of `pid` as soon as it is resolved.
///
/// Returns the number of records written. Records printed before a fatal
/// error stay in `out`.
fn run<W: Write>(config: &Config, pid: u32, out: &mut W) -> Result<usize> {
    let inspector = Inspector::new(config, pid);
    let mut count = 0;
    for record in inspector.records()? {
        let record = record?;
        record.write_to(out)?;
        count += 1;
    }
    log::debug!("pid {pid}: {count} descriptors reported");
    Ok(count)
}
