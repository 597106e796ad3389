use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use keycalc::calculator::{CalcResult, ExpressionEngine, FendEvaluator};
use keycalc::config::Config;
use keycalc::graph::Graph;
use keycalc::repl::Session;
use keycalc::ui::{PlotSize, render_plot, render_shortcuts};

/// Keyboard-driven calculator with scientific functions, algebra and graphing.
#[derive(Parser, Debug)]
#[command(name = "keycalc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Config file to use instead of the default location.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start an interactive session (the default).
    Repl,

    /// Evaluate one expression and print the result.
    Eval(EvalArgs),

    /// Draw functions of x as an ASCII plot.
    Plot(PlotArgs),

    /// Print the keyboard shortcut sheet.
    Keys,
}

#[derive(Args, Debug)]
struct EvalArgs {
    /// Expression, e.g. "sin(30) + 2^3" or "factor(x^2-1)".
    expression: String,

    /// Take trigonometric arguments in radians.
    #[arg(long)]
    radians: bool,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct PlotArgs {
    /// Functions to plot, e.g. "x^2" or "y = sin(x)".
    #[arg(required = true)]
    functions: Vec<String>,

    #[arg(long, allow_hyphen_values = true)]
    x_min: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    x_max: Option<f64>,

    #[arg(long, default_value_t = 72)]
    width: usize,

    #[arg(long, default_value_t = 24)]
    height: usize,

    /// Also plot each function's derivative.
    #[arg(long)]
    derivatives: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Repl) {
        Command::Repl => {
            let mut session = Session::new(&config);
            session.run(io::stdin().lock(), io::stdout().lock())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Eval(args) => eval(&args, &config),
        Command::Plot(args) => plot(&args, &config),
        Command::Keys => {
            println!("{}", render_shortcuts());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn eval(args: &EvalArgs, config: &Config) -> Result<ExitCode> {
    let engine = ExpressionEngine::new(FendEvaluator);
    let degree_mode = config.degree_mode && !args.radians;
    let result = engine.evaluate_expression(&args.expression, degree_mode);

    if args.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
        println!("{}", json);
    } else {
        match &result {
            CalcResult::Success { result, .. } => println!("{}", result),
            CalcResult::Error { message, .. } => eprintln!("Error: {}", message),
        }
    }

    Ok(if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn plot(args: &PlotArgs, config: &Config) -> Result<ExitCode> {
    let mut settings = config.graph.clone();
    settings.x_range = (
        args.x_min.unwrap_or(settings.x_range.0),
        args.x_max.unwrap_or(settings.x_range.1),
    );
    if settings.x_range.0 >= settings.x_range.1 {
        anyhow::bail!("--x-min must be below --x-max");
    }
    settings.show_derivatives |= args.derivatives;

    let mut graph = Graph::new(settings);
    for function in &args.functions {
        graph
            .add_function(function)
            .with_context(|| format!("Cannot plot {:?}", function))?;
    }

    let size = PlotSize {
        width: args.width,
        height: args.height,
    };
    println!("{}", render_plot(&graph.plot_series(), graph.settings(), size));
    Ok(ExitCode::SUCCESS)
}
