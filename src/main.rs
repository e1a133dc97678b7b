mod commands;
mod core;
mod release;
mod ui;
mod utils;

use clap::{Parser, Subcommand};
use core::error::{PackError, print_error};
use std::path::PathBuf;

/// Package self-updating modules: version codes, changelogs, artifacts, archives
#[derive(Parser)]
#[command(name = "modpack")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct ModpackCli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Scaffold a new module directory
  Init {
    /// Stable module identifier (also the directory name)
    #[arg(long = "new-id")]
    new_id: String,
    /// Human-readable display name (defaults to the id)
    #[arg(long)]
    name: Option<String>,
    /// Short module description
    #[arg(long)]
    description: String,
    /// Module author
    #[arg(long)]
    author: String,
    /// Module type: module (single) or modules (bundle)
    #[arg(long, value_name = "TYPE")]
    r#type: Option<String>,
  },

  /// Package a module release: archive, hash, manifest, changelog
  Pack {
    /// Semantic version for this release
    #[arg(long)]
    version: String,
    /// Module directory (defaults to the current directory)
    #[arg(long)]
    dir: Option<PathBuf>,
    /// Changelog body override for this release
    #[arg(long)]
    changelog: Option<String>,
    /// Skip the per-target executable builds
    #[arg(long)]
    skip_executables: bool,
    /// Skip the dependency refresh step
    #[arg(long)]
    skip_dependencies: bool,
    /// Override the external bundler command
    #[arg(long)]
    bundler: Option<String>,
    /// Override the dependency refresh command line
    #[arg(long)]
    deps_cmd: Option<String>,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = ModpackCli::parse();

  let result = match cli.command {
    Commands::Init {
      new_id,
      name,
      description,
      author,
      r#type,
    } => commands::run_init(new_id, name, description, author, r#type),
    Commands::Pack {
      version,
      dir,
      changelog,
      skip_executables,
      skip_dependencies,
      bundler,
      deps_cmd,
    } => commands::run_pack(
      version,
      dir,
      changelog,
      skip_executables,
      skip_dependencies,
      bundler,
      deps_cmd,
    ),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: PackError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
