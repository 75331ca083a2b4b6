use std::io;

use dhub_config::{ConfigError, ConfigManager};
use dhub_core::CoreError;
use dhub_domain::DonationRecord;
use strsim::levenshtein;
use thiserror::Error;

use crate::cli::commands::{self, CommandDefinition, CommandRegistry};
use crate::cli::output::{self, OutputPreferences};
use crate::errors::{CliError, HubError};
use crate::session::HubSession;

const SUGGESTION_DISTANCE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// State shared by every command handler for the lifetime of the shell.
pub struct ShellContext {
    mode: CliMode,
    pub(crate) registry: CommandRegistry,
    session: HubSession,
    pub(crate) running: bool,
}

impl ShellContext {
    /// Opens the session described by the environment (`DONATION_HUB_HOME`) and saved config.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let manager = ConfigManager::from_environment()?;
        let session = HubSession::open(manager)?;
        Ok(Self::with_session(mode, session))
    }

    pub fn with_session(mode: CliMode, session: HubSession) -> Self {
        let context = Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            session,
            running: true,
        };
        context.apply_output_preferences();
        context
    }

    pub(crate) fn mode(&self) -> CliMode {
        self.mode
    }

    pub(crate) fn session(&self) -> &HubSession {
        &self.session
    }

    pub(crate) fn session_mut(&mut self) -> &mut HubSession {
        &mut self.session
    }

    pub(crate) fn currency(&self) -> &str {
        &self.session.config().currency_label
    }

    pub(crate) fn apply_output_preferences(&self) {
        let config = self.session.config();
        output::set_preferences(OutputPreferences {
            color_enabled: config.ui_color_enabled,
            quiet_mode: self.mode == CliMode::Script,
        });
        if config.ui_color_enabled {
            colored::control::unset_override();
        } else {
            colored::control::set_override(false);
        }
    }

    pub(crate) fn prompt(&self) -> String {
        let count = self
            .session
            .ledger()
            .with(|ledger| ledger.len())
            .unwrap_or_default();
        format!("donations [{count}]> ")
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    /// Finds a record by id, id prefix or receipt number and returns an owned copy.
    pub(crate) fn resolve_record(&self, key: &str) -> Result<DonationRecord, CommandError> {
        let found = self
            .session
            .ledger()
            .with(|ledger| ledger.resolve(key).cloned())??;
        Ok(found)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.get(command).map(|entry| entry.handler) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn closest_command(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_lowercase();
        self.registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, name)| name)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.closest_command(input) {
            output::hint(format!("Did you mean `{}`?", best));
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(&message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Hub(HubError::NotFound(message)) => {
                output::error(format!("No donation matches {message}."));
                output::hint("Use `list` to see receipt numbers and short ids.");
                Ok(())
            }
            CommandError::Hub(HubError::Storage(message)) => {
                output::error(format!("Could not save changes: {message}"));
                output::hint("The ledger was left as it was before the command; retry once the problem is fixed.");
                Ok(())
            }
            CommandError::Io(err) => Err(CliError::Io(err)),
            other => {
                output::error(other);
                Ok(())
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("exit requested")]
    ExitRequested,
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Hub(#[from] HubError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        CommandError::Hub(HubError::from(err))
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        CommandError::Hub(HubError::from(err))
    }
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Hub(inner) => CommandError::Hub(inner),
            CliError::Input(message) => CommandError::InvalidArguments(message),
            CliError::Io(err) => CommandError::Io(err),
            other => CommandError::Message(other.to_string()),
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Hub(inner) => CliError::Hub(inner),
            CommandError::InvalidArguments(message) => CliError::Input(message),
            CommandError::Io(err) => CliError::Io(err),
            other => CliError::Command(other.to_string()),
        }
    }
}
