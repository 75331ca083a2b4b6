use dhub_config::Config;

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "View or change preferences",
        "config [show|set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => show(context),
        [sub] if sub.eq_ignore_ascii_case("show") => show(context),
        [sub, key, value @ ..] if sub.eq_ignore_ascii_case("set") && !value.is_empty() => {
            set(context, key, &value.join(" "))
        }
        _ => Err(CommandError::InvalidArguments(format!(
            "usage: config [show|set <key> <value>]; keys: {}",
            Config::KEYS.join(", ")
        ))),
    }
}

fn show(context: &ShellContext) -> CommandResult {
    let session = context.session();
    output::section("Configuration");
    for (key, value) in session.config().entries() {
        output::info(format!("  {key:<20} {value}"));
    }
    if let Some(manager) = session.config_manager() {
        output::info(format!("  {:<20} {}", "config file", manager.config_path().display()));
        output::info(format!(
            "  {:<20} {}",
            "data directory",
            manager.data_dir(session.config()).display()
        ));
    }
    Ok(())
}

fn set(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    context.session_mut().set_config_value(key, value)?;
    context.apply_output_preferences();
    if key == "data_dir" {
        output::hint("The new data directory is used the next time the shell starts.");
    }
    output::success(format!("Set {key} = {value}"));
    Ok(())
}
