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
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::core::{CliError, CliMode, LoopControl};
use crate::cli::io::print_info;
use crate::cli::registry::{ArgumentKind, CommandRegistry};
use crate::cli::shell_context::ShellContext;
use crate::domain::CategoryKind;

const SCRIPT_ENV: &str = "BUDGET_BUILDER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<BudgetHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(BudgetHelper::new(
        &context.registry,
        context.category_paths(),
    )));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    print_info("Type `help` to list commands, `show` to render the budget.");

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();

                if run_line(context, trimmed) == LoopControl::Exit {
                    break;
                }
                // Paths shift after adds and deletes.
                if let Some(helper) = editor.helper_mut() {
                    helper.paths = context.category_paths();
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                print_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        if run_line(context, &line?) == LoopControl::Exit || !context.running {
            break;
        }
    }
    Ok(())
}

fn run_line(context: &mut ShellContext, line: &str) -> LoopControl {
    match context.process_line(line) {
        Ok(control) => control,
        Err(err) => {
            context.report_error(err);
            LoopControl::Continue
        }
    }
}

/// Completes command names, then the first argument according to the command:
/// `income`/`expense` for `add`, live category paths for path-taking commands.
struct BudgetHelper {
    commands: Vec<(&'static str, ArgumentKind)>,
    paths: Vec<String>,
}

impl BudgetHelper {
    fn new(registry: &CommandRegistry, paths: Vec<String>) -> Self {
        let mut commands: Vec<_> = registry
            .entries()
            .iter()
            .map(|entry| (entry.name, entry.argument))
            .collect();
        commands.sort_by_key(|(name, _)| *name);
        Self { commands, paths }
    }

    fn candidates(&self, preceding: &[&str], partial: &str) -> Vec<String> {
        let pool: Vec<String> = match preceding {
            [] => self.command_names(),
            [command] => match self.argument_of(command) {
                ArgumentKind::CategoryKind => [CategoryKind::Income, CategoryKind::Expense]
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
                ArgumentKind::CategoryPath => self.paths.clone(),
                ArgumentKind::Command => self.command_names(),
                ArgumentKind::None => Vec::new(),
            },
            _ => Vec::new(),
        };

        let partial = partial.to_ascii_lowercase();
        pool.into_iter()
            .filter(|candidate| candidate.starts_with(&partial))
            .collect()
    }

    fn command_names(&self) -> Vec<String> {
        self.commands
            .iter()
            .map(|(name, _)| name.to_string())
            .collect()
    }

    fn argument_of(&self, command: &str) -> ArgumentKind {
        let command = command.to_ascii_lowercase();
        self.commands
            .iter()
            .find(|(name, _)| *name == command)
            .map_or(ArgumentKind::None, |(_, argument)| *argument)
    }
}

impl Helper for BudgetHelper {}

impl Completer for BudgetHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map_or(0, |idx| idx + 1);
        let preceding: Vec<&str> = prefix[..start].split_whitespace().collect();

        let pairs = self
            .candidates(&preceding, &prefix[start..])
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for BudgetHelper {
    type Hint = String;
}

impl Highlighter for BudgetHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for BudgetHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

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
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    fn helper() -> BudgetHelper {
        let registry = CommandRegistry::from_entries(commands::all_definitions());
        BudgetHelper::new(
            &registry,
            vec!["income/0".into(), "income/0/0".into(), "expense/0".into()],
        )
    }

    #[test]
    fn quoted_names_stay_single_tokens() {
        let tokens = parse_command_line(r#"add expense "Salaries & Wages""#).unwrap();
        assert_eq!(tokens, vec!["add", "expense", "Salaries & Wages"]);
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        assert!(parse_command_line(r#"add income "Oops"#).is_err());
    }

    #[test]
    fn first_word_completes_command_names() {
        assert_eq!(helper().candidates(&[], "s"), vec!["set", "show", "sub"]);
    }

    #[test]
    fn add_completes_category_kinds() {
        let helper = helper();
        assert_eq!(helper.candidates(&["add"], ""), vec!["income", "expense"]);
        assert_eq!(helper.candidates(&["ADD"], "ex"), vec!["expense"]);
    }

    #[test]
    fn path_commands_complete_known_paths() {
        let helper = helper();
        assert_eq!(
            helper.candidates(&["set"], "income"),
            vec!["income/0", "income/0/0"]
        );
        assert_eq!(helper.candidates(&["delete"], "exp"), vec!["expense/0"]);
        assert!(helper.candidates(&["set", "income/0"], "").is_empty());
        assert!(helper.candidates(&["show"], "").is_empty());
    }
}
