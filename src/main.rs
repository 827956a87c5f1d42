mod cargo;
mod commands;
mod core;
mod release;

use clap::{Parser, Subcommand};
use crate::core::error::{LockstepError, LockstepResult, print_error};
use crate::core::tools::SystemTools;
use crate::release::Version;

/// Release a crate family in lockstep with its changelog
#[derive(Parser)]
#[command(name = "cargo")]
#[command(bin_name = "cargo")]
#[command(styles = get_styles())]
enum CargoCli {
  Lockstep(LockstepCli),
}

#[derive(Parser)]
#[command(name = "lockstep")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct LockstepCli {
  /// Defaults to `prepare`
  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Edit the changelog, annotate its header and propagate the version to every manifest
  Prepare {
    /// Release this version (skips the editor)
    #[arg(id = "release_version", value_name = "VERSION")]
    version: Option<String>,
    /// Do not open the editor, use the changelog as it is
    #[arg(long)]
    no_edit: bool,
    /// Print diffs instead of writing files
    #[arg(long)]
    dry_run: bool,
    /// Output the report in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Publish every crate in order, stopping at the first failure
  Publish {
    /// Arguments passed through to the publish command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    cargo_args: Vec<String>,
  },

  /// Verify that the changelog header and every manifest match the release version
  Check {
    /// Output the report in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Anything else runs `prepare`; a version (`cargo lockstep 1.3.0`) is released as given
  #[command(external_subcommand)]
  External(Vec<String>),
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
  let CargoCli::Lockstep(cli) = CargoCli::parse();

  let workspace_root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => handle_error(LockstepError::io(".", e)),
  };

  let ctx = match crate::core::context::ReleaseContext::build(&workspace_root) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };
  let tools = SystemTools::from_config(&ctx.config);

  let result = match cli.command {
    Some(Commands::Prepare {
      version,
      no_edit,
      dry_run,
      json,
    }) => version
      .map(|v| v.parse::<Version>())
      .transpose()
      .map_err(LockstepError::from)
      .and_then(|version| {
        let opts = commands::PrepareOptions {
          version,
          edit: !no_edit,
          dry_run,
          json,
        };
        commands::run_prepare(&ctx, &tools, opts)
      })
      .map(drop),
    Some(Commands::Publish { cargo_args }) => commands::run_publish(&ctx, &tools, &cargo_args).map(drop),
    Some(Commands::Check { json }) => commands::run_check(&ctx, json).map(drop),
    Some(Commands::External(words)) => {
      external_prepare_options(&words).and_then(|opts| commands::run_prepare(&ctx, &tools, opts).map(drop))
    }
    None => commands::run_prepare(
      &ctx,
      &tools,
      commands::PrepareOptions {
        edit: true,
        ..Default::default()
      },
    )
    .map(drop),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

/// Options for `cargo lockstep <word>`: a version word is released as given.
/// Anything after the first word is refused rather than ignored.
fn external_prepare_options(words: &[String]) -> LockstepResult<commands::PrepareOptions> {
  if words.len() > 1 {
    return Err(LockstepError::with_help(
      format!("Unexpected arguments after `{}`: {}", words[0], words[1..].join(" ")),
      format!("Flags belong to a subcommand: cargo lockstep prepare {} {}", words[0], words[1..].join(" ")),
    ));
  }
  Ok(commands::PrepareOptions {
    version: words.first().and_then(|w| w.parse().ok()),
    edit: true,
    ..Default::default()
  })
}

fn handle_error(err: LockstepError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
