use std::{
    borrow::Cow,
    fmt,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::core::{CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output;
use crate::errors::CliError;
use crate::utils::build_info;

/// When set, commands are read line by line from stdin without a prompt.
pub const SCRIPT_ENV_VAR: &str = "DONATION_HUB_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV_VAR).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context, io::stdin().lock()),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_names())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output::section(format!("Donation Hub {}", build_info::current().short()));
    output::info("Type `help` to see available commands.");

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();

                match handle_line(context, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
            }
            Err(ReadlineError::Interrupted) => {
                output::info("Type `exit` or press Ctrl-D to leave.");
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

pub(crate) fn run_script(context: &mut ShellContext, input: impl BufRead) -> Result<(), CliError> {
    for line in input.lines() {
        if !context.running {
            break;
        }
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match handle_line(context, trimmed) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(&err);
            return Ok(LoopControl::Continue);
        }
    };

    let Some(raw) = tokens.first() else {
        return Ok(LoopControl::Continue);
    };
    let command = raw.to_lowercase();
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

    let control = context.dispatch(&command, raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names.into_iter().map(str::to_string).collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    /// Completes the command word only; arguments are free text.
    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix.len() - prefix.trim_start().len();
        if prefix[start..].contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }

        let needle = prefix[start..].to_ascii_lowercase();
        let candidates = self
            .commands
            .iter()
            .filter(|name| name.starts_with(&needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not parse command: {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::HubSession;
    use dhub_config::Config;

    fn script_context() -> ShellContext {
        let session = HubSession::ephemeral(Config::default()).expect("ephemeral session");
        ShellContext::with_session(CliMode::Script, session)
    }

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = parse_command_line(r#"add "Ali Ahmed" 5000 Zakat "5 NO""#).unwrap();
        assert_eq!(tokens, vec!["add", "Ali Ahmed", "5000", "Zakat", "5 NO"]);
        assert!(parse_command_line(r#"add "unterminated"#).is_err());
    }

    #[test]
    fn script_records_and_stops_at_exit() {
        let mut context = script_context();
        let script = "add \"Ali Ahmed\" 5000 Zakat \"5 NO\"\n# comment\nadd Sana 2000 Fitra J-1\nexit\nadd Late 1 Zakat J-1\n";
        run_script(&mut context, script.as_bytes()).unwrap();

        let records = context.session().ledger().snapshot().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].donor_name, "Sana");
        assert!(!context.running);
    }

    #[test]
    fn failing_commands_do_not_abort_script() {
        let mut context = script_context();
        let script = "add Nobody -5 Zakat J-1\nfrobnicate\nedit missing --amount 10\nadd Ayesha 300\n";
        run_script(&mut context, script.as_bytes()).unwrap();

        let records = context.session().ledger().snapshot().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, Config::default().default_category);
    }

    #[test]
    fn edit_and_delete_by_receipt_number() {
        let mut context = script_context();
        run_script(&mut context, "add Bilal 1000 General \"J Area\"\n".as_bytes()).unwrap();
        let receipt = context.session().ledger().snapshot().unwrap()[0]
            .receipt_number
            .to_string();

        let script = format!("edit {receipt} --amount 1500 --notes \"Eid fund\"\n");
        run_script(&mut context, script.as_bytes()).unwrap();
        let edited = context.session().ledger().snapshot().unwrap()[0].clone();
        assert_eq!(edited.amount, 1500.0);
        assert_eq!(edited.notes.as_deref(), Some("Eid fund"));
        assert_eq!(edited.receipt_number.to_string(), receipt);

        run_script(&mut context, format!("delete {receipt}\ndelete {receipt}\n").as_bytes())
            .unwrap();
        assert!(context.session().ledger().snapshot().unwrap().is_empty());
    }

    #[test]
    fn typos_get_a_suggestion() {
        let context = script_context();
        assert_eq!(context.closest_command("sumary"), Some("summary"));
        assert_eq!(context.closest_command("reciept"), Some("receipt"));
        assert_eq!(context.closest_command("zzzzzzzzzz"), None);
    }
}
