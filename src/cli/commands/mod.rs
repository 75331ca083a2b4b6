use std::collections::HashMap;

pub mod config;
pub mod donation;
pub mod report;
pub mod system;

use crate::cli::core::{CommandResult, ShellContext};

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(donation::definitions());
    commands.extend(report::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

/// Command table keyed by name, remembering registration order for `help`.
pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }
}

/// Splits `--flag value` pairs from positional arguments.
pub(crate) fn split_flags<'a>(
    args: &[&'a str],
    value_flags: &[&str],
    switch_flags: &[&str],
) -> Result<(Vec<&'a str>, HashMap<String, Option<&'a str>>), String> {
    let mut positional = Vec::new();
    let mut flags = HashMap::new();
    let mut iter = args.iter().copied();
    while let Some(arg) = iter.next() {
        let Some(name) = arg.strip_prefix("--") else {
            positional.push(arg);
            continue;
        };
        let name = name.to_ascii_lowercase();
        if switch_flags.contains(&name.as_str()) {
            flags.insert(name, None);
        } else if value_flags.contains(&name.as_str()) {
            let value = iter
                .next()
                .ok_or_else(|| format!("flag `--{name}` needs a value"))?;
            flags.insert(name, Some(value));
        } else {
            return Err(format!("unknown flag `--{name}`"));
        }
    }
    Ok((positional, flags))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_keeps_registration_order() {
        let registry = CommandRegistry::new(all_definitions());
        let names: Vec<_> = registry.names().collect();

        assert_eq!(names.first(), Some(&"add"));
        assert!(names.contains(&"summary"));
        assert!(names.contains(&"exit"));
        assert_eq!(registry.iter().count(), names.len());
    }

    #[test]
    fn split_flags_separates_values_and_switches() {
        let args = ["abc123", "--amount", "750", "--clear-notes"];
        let (positional, flags) = split_flags(&args, &["amount"], &["clear-notes"]).unwrap();

        assert_eq!(positional, vec!["abc123"]);
        assert_eq!(flags.get("amount"), Some(&Some("750")));
        assert_eq!(flags.get("clear-notes"), Some(&None));
    }

    #[test]
    fn split_flags_rejects_unknown_or_dangling() {
        assert!(split_flags(&["--colour", "red"], &["amount"], &[]).is_err());
        assert!(split_flags(&["--amount"], &["amount"], &[]).is_err());
    }
}
