//! Command-line driver that exercises the report facility against a toy
//! simulation: a CPU and a bus model log through the macros while a
//! "vendor" component writes plain text into a redirected stream.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use simlog::{
    LogLevel, SharedStream, VerbosityRegistry, sim_debug, sim_error, sim_info, sim_trace,
    sim_traceall, sim_warn,
};
use simlog_sink::{LogConfig, ManualClock, init_logging_with_clock};

/// Runs a short simulated workload and logs it through simlog.
#[derive(Parser, Debug)]
#[command(name = "simlog-demo")]
#[command(about = "Exercise the simlog report facility on a toy simulation")]
#[command(version)]
pub struct Args {
    /// Global log level (NONE, FATAL, ERROR, WARNING, INFO, DEBUG, TRACE, TRACEALL).
    #[arg(long, value_name = "LEVEL", default_value = "WARNING", value_parser = parse_level)]
    pub level: LogLevel,

    /// Override a category's level, as CATEGORY=LEVEL. Repeatable.
    #[arg(long = "category", value_name = "CATEGORY=LEVEL", value_parser = parse_override)]
    pub categories: Vec<(String, LogLevel)>,

    /// Width of the category column; 0 hides it.
    #[arg(long, value_name = "N", default_value_t = simlog_sink::DEFAULT_CATEGORY_WIDTH)]
    pub category_width: usize,

    /// Prefix lines with the wall-clock time.
    #[arg(long)]
    pub sys_time: bool,

    /// Print delta-cycle counts after the simulated time.
    #[arg(long)]
    pub delta: bool,

    /// Print cycles of this many nanoseconds instead of simulated time.
    #[arg(long, value_name = "NS")]
    pub cycle_ns: Option<u64>,

    /// Disable ANSI colour.
    #[arg(long)]
    pub no_color: bool,

    /// Also write the log to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Write the log file synchronously.
    #[arg(long)]
    pub sync: bool,

    /// Keep only categories matching this regular expression.
    #[arg(long, value_name = "REGEX")]
    pub filter: Option<String>,

    /// Number of simulated clock cycles to run.
    #[arg(long, value_name = "N", default_value_t = 4)]
    pub cycles: u32,
}

fn parse_level(text: &str) -> Result<LogLevel, String> {
    text.to_ascii_uppercase()
        .parse()
        .map_err(|error: simlog::ParseLogLevelError| error.to_string())
}

fn parse_override(text: &str) -> Result<(String, LogLevel), String> {
    let (category, level) = text
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=LEVEL, got '{text}'"))?;
    if category.is_empty() {
        return Err("category name must not be empty".to_owned());
    }
    Ok((category.to_owned(), parse_level(level)?))
}

impl Args {
    fn log_config(&self) -> LogConfig {
        let mut config = LogConfig::default()
            .with_level(self.level)
            .with_category_width(self.category_width)
            .with_sys_time(self.sys_time)
            .with_delta(self.delta)
            .with_colored_output(!self.no_color)
            .with_log_async(!self.sync);
        if let Some(path) = &self.log_file {
            config = config.with_log_file(path);
        }
        if let Some(filter) = &self.filter {
            config = config.with_category_filter(filter.as_str());
        }
        config
    }
}

/// Parses `args`, installs logging and runs the workload.
pub fn run_with<I, T, W>(args: I, stdout: &mut W) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
{
    let args = match Args::try_parse_from(args) {
        Ok(args) => args,
        Err(error) => {
            let _ = error.print();
            return if error.use_stderr() {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let clock = Arc::new(ManualClock::new());
    let _guard = match init_logging_with_clock(&args.log_config(), clock.clone()) {
        Ok(guard) => guard,
        Err(error) => {
            eprintln!("simlog-demo: {error}");
            return ExitCode::FAILURE;
        }
    };

    let registry = VerbosityRegistry::global();
    for (category, level) in &args.categories {
        registry.set_category_level(category.as_str(), *level);
    }
    if let Some(ns) = args.cycle_ns.filter(|ns| *ns > 0) {
        registry.set_cycle_base(Duration::from_nanos(ns));
    }

    simulate(&clock, args.cycles);

    let _ = writeln!(stdout, "simulated {} cycles", args.cycles);
    ExitCode::SUCCESS
}

const CLOCK_PERIOD: Duration = Duration::from_nanos(10);

fn simulate(clock: &ManualClock, cycles: u32) {
    let vendor_out = SharedStream::stdout();

    sim_info!(category: "top", "elaboration done, running {} cycles", cycles);
    for cycle in 0..cycles {
        sim_debug!(category: "top.cpu", "fetch pc=0x{:08x}", 0x8000_0000_u32 + cycle * 4);
        clock.next_delta();
        sim_trace!(category: "top.bus", "request issued in cycle {}", cycle);
        sim_traceall!(category: "top.bus", "arbiter state idle={}", cycle % 2 == 0);

        if cycle == 2 {
            sim_warn!(category: "top.bus", "slave response delayed");
        }

        {
            let _redirect = vendor_out.redirect(LogLevel::Info);
            let mut out = &vendor_out;
            let _ = write!(out, "vendor model: cycle {cycle} ");
            let _ = writeln!(out, "ok");
        }

        clock.advance(CLOCK_PERIOD);
    }
    if cycles == 0 {
        sim_error!(category: "top", "nothing was simulated");
    }
}
