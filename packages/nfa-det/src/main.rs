use clap::Parser;
use nfa_det_lib::{
    automaton::Automaton,
    config::{DeterminizeConfig, OutputFormat},
    logger::{LogLevel, init_tracing},
};

#[derive(Parser, Debug)]
#[command(name = "NFA Determinizer")]
#[command(version = "0.1")]
#[command(about = "Turn a finite automaton into a deterministic one using the subset construction", long_about = None)]
struct Args {
    /// JSON file containing the automaton.
    file: String,

    /// TOML config file, command line flags take precedence over it.
    #[arg(short, long)]
    config: Option<String>,

    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Give up if more macro-states than this are needed.
    #[arg(short, long)]
    max_macro_states: Option<usize>,

    /// Print the macro-states to stderr. This always runs the subset
    /// construction, even for deterministic input.
    #[arg(short, long)]
    summary: bool,

    /// Enables logging at the given level.
    #[arg(short, long)]
    log_level: Option<LogLevel>,
}

impl Args {
    fn apply(&self, mut config: DeterminizeConfig) -> DeterminizeConfig {
        let mut output = config.get_output().clone();
        if let Some(format) = self.format {
            output.set_format(format);
        }
        if self.summary {
            output.set_summary(true);
        }
        config.set_output(output);

        if let Some(limit) = self.max_macro_states {
            config.set_max_macro_states(Some(limit));
        }

        if let Some(level) = self.log_level {
            let logger = config
                .get_logger()
                .clone()
                .with_enabled(true)
                .with_log_level(level);
            config.set_logger(logger);
        }

        config
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = args.apply(DeterminizeConfig::from_optional_file(args.config.as_ref())?);
    init_tracing(config.get_logger())?;

    let automaton = Automaton::<char>::from_file(&args.file)?;
    tracing::debug!(
        "Loaded `{}` with {} states and {} transitions",
        automaton.name(),
        automaton.state_count(),
        automaton.transition_count()
    );

    let limit = *config.get_max_macro_states();
    let output = config.get_output();

    let result = if *output.get_summary() {
        let determinization = automaton.subset_construction(limit)?;
        eprintln!("{}", determinization.summary());
        determinization.into_automaton()
    } else {
        automaton.try_determine(limit)?
    };

    match output.get_format() {
        OutputFormat::Json => println!("{}", result.to_json(*output.get_pretty())?),
        OutputFormat::Graphviz => println!("{}", result.to_graphviz()),
    }

    Ok(())
}
