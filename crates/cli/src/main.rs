mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::GlobalArgs;
use output::{OutputFormat, print_error};

#[derive(Parser)]
#[command(name = "sysdef")]
#[command(author, version, about = "Declare systems in Lua manifests and build them in dependency order")]
struct Cli {
  /// Directory searched for *.sys.lua manifests (repeatable)
  #[arg(long = "path", global = true, default_value = ".")]
  paths: Vec<PathBuf>,

  /// Cache directory build roots are created under
  #[arg(long, global = true)]
  cache_dir: Option<PathBuf>,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t)]
  output: OutputFormat,

  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// List every defined system
  List,

  /// Show a system's metadata and components
  Show {
    /// System name (case-insensitive)
    system: String,
  },

  /// Generate and compile a system and its dependencies without loading them
  Build {
    /// System name (case-insensitive)
    system: String,
  },

  /// Build and load a system and its dependencies
  Load {
    /// System name (case-insensitive)
    system: String,

    /// Lua chunk evaluated after loading, its result printed
    #[arg(long)]
    eval: Option<String>,
  },

  /// Display toolchain and cache information
  Info,
}

fn init_tracing(verbose: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if verbose {
      EnvFilter::new("sysdef_lib=debug,sysdef=debug")
    } else {
      EnvFilter::new("warn")
    }
  });

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(verbose)
    .without_time()
    .init();
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let args = GlobalArgs {
    paths: cli.paths,
    cache_dir: cli.cache_dir,
    output: cli.output,
  };

  let result = match cli.command {
    Commands::List => cmd::cmd_list(&args),
    Commands::Show { system } => cmd::cmd_show(&args, &system),
    Commands::Build { system } => cmd::cmd_build(&args, &system),
    Commands::Load { system, eval } => cmd::cmd_load(&args, &system, eval.as_deref()),
    Commands::Info => cmd::cmd_info(&args),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
