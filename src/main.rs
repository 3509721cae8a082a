use clap::{Parser, Subcommand};
use dotenv::dotenv;
use scope_filter::scope::condition::SqlSchema;
use scope_filter::scope::loader::DataLoader;
use scope_filter::scope::report::write_matches;
use scope_filter::scope::{ActionSpecification, Rule};
use scope_filter::ScopeFilterError;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the IDs of actions matching one or more rules
    Filter {
        /// Actions file (YAML or JSON)
        #[arg(short, long)]
        actions: PathBuf,

        /// Context file (YAML or JSON)
        #[arg(short, long, env = "SCOPE_FILTER_CONTEXT")]
        context: PathBuf,

        /// Rule to apply; repeat for several, omit for all
        #[arg(short, long, value_enum)]
        rule: Vec<Rule>,

        /// Evaluate actions in parallel
        #[arg(long)]
        parallel: bool,
    },
    /// Print the SQL query for a rule
    Sql {
        /// Context file (YAML or JSON)
        #[arg(short, long, env = "SCOPE_FILTER_CONTEXT")]
        context: PathBuf,

        /// Rule to render
        #[arg(short, long, value_enum)]
        rule: Rule,
    },
    /// Print a rule's condition in readable form
    Explain {
        /// Context file (YAML or JSON)
        #[arg(short, long, env = "SCOPE_FILTER_CONTEXT")]
        context: PathBuf,

        /// Rule to explain
        #[arg(short, long, value_enum)]
        rule: Rule,
    },
}

fn main() -> Result<(), ScopeFilterError> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let loader = DataLoader::new();

    match args.command {
        Commands::Filter {
            actions,
            context,
            rule,
            parallel,
        } => {
            let actions = loader.load_actions(&actions)?;
            let specs = ActionSpecification::new(loader.load_context(&context)?);

            let mut out = std::io::stdout().lock();
            write_matches(&mut out, &specs, &actions, &rule, parallel)?;
        }
        Commands::Sql { context, rule } => {
            let specs = ActionSpecification::new(loader.load_context(&context)?);
            let spec = specs.specification(rule)?;
            println!("{}", spec.to_sql(&SqlSchema::default()));
        }
        Commands::Explain { context, rule } => {
            let specs = ActionSpecification::new(loader.load_context(&context)?);
            let spec = specs.specification(rule)?;
            println!("{}: {}", rule, spec.expression);
        }
    }

    Ok(())
}
