use strsim::levenshtein;

use crate::{
    cli::{
        commands,
        core::{CliError, CliMode, CommandError, LoopControl},
        io as cli_io,
        registry::{CommandEntry, CommandRegistry},
        shell::parse_command_line,
    },
    config::{Config, ConfigManager},
    core::BudgetBuilder,
};

const MAX_SUGGESTION_DISTANCE: usize = 3;

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub builder: BudgetBuilder,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        Ok(Self::with_config(mode, config_manager, config))
    }

    pub fn with_config(mode: CliMode, config_manager: ConfigManager, config: Config) -> Self {
        Self {
            mode,
            registry: CommandRegistry::from_entries(commands::all_definitions()),
            builder: BudgetBuilder::from_config(&config),
            config_manager,
            config,
            running: true,
        }
    }

    pub fn prompt(&self) -> String {
        format!("budget [{}]> ", self.builder.window())
    }

    /// Text paths of every category currently in the budget, in grid order.
    pub fn category_paths(&self) -> Vec<String> {
        self.builder
            .rows()
            .into_iter()
            .map(|row| row.path.to_string())
            .collect()
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.get(command).map(|entry| entry.handler) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    /// Tokenises and runs one input line. Blank lines and `#` comments are skipped.
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(err);
                return Ok(LoopControl::Continue);
            }
        };

        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        if raw.starts_with('#') {
            return Ok(LoopControl::Continue);
        }

        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        let control = self.dispatch(&raw.to_lowercase(), raw, &args)?;
        if control == LoopControl::Exit {
            self.running = false;
        }
        Ok(control)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .entries()
            .iter()
            .map(|entry| (levenshtein(entry.name, &needle), entry.name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = best {
            if distance <= MAX_SUGGESTION_DISTANCE {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action("Exit shell?", true)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            other => cli_io::print_error(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoryKind, CategoryPath};
    use tempfile::TempDir;

    fn context() -> (ShellContext, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
        let context = ShellContext::with_config(CliMode::Script, manager, Config::default());
        (context, dir)
    }

    #[test]
    fn set_command_updates_builder_with_one_based_month() {
        let (mut ctx, _dir) = context();
        ctx.process_line("set income/0 2 1500").expect("set");
        let path = CategoryPath::root(CategoryKind::Income, 0);
        assert_eq!(ctx.builder.category(&path).unwrap().values()[1], 1500.0);
        assert_eq!(ctx.builder.income_total()[1], 1500.0);
    }

    #[test]
    fn non_numeric_value_is_stored_as_zero() {
        let (mut ctx, _dir) = context();
        ctx.process_line("set expense/0 1 250").unwrap();
        ctx.process_line("set expense/0 1 abc").unwrap();
        let path = CategoryPath::root(CategoryKind::Expense, 0);
        assert_eq!(ctx.builder.category(&path).unwrap().values()[0], 0.0);
    }

    #[test]
    fn unknown_command_keeps_shell_running() {
        let (mut ctx, _dir) = context();
        let control = ctx.process_line("shwo").unwrap();
        assert_eq!(control, LoopControl::Continue);
    }

    #[test]
    fn exit_command_stops_loop() {
        let (mut ctx, _dir) = context();
        assert_eq!(ctx.process_line("exit").unwrap(), LoopControl::Exit);
        assert!(!ctx.running);
    }

    #[test]
    fn comment_lines_are_ignored() {
        let (mut ctx, _dir) = context();
        let before = ctx.builder.forest().clone();
        assert_eq!(ctx.process_line("# add income Ignored").unwrap(), LoopControl::Continue);
        assert_eq!(ctx.builder.forest(), &before);
    }

    #[test]
    fn set_accepts_calendar_month_inside_window() {
        let (mut ctx, _dir) = context();
        ctx.process_line("set expense/1 2025-03 800").unwrap();
        let path = CategoryPath::root(CategoryKind::Expense, 1);
        assert_eq!(ctx.builder.category(&path).unwrap().values()[2], 800.0);
        assert!(ctx.process_line("set expense/1 2026-01 800").is_err());
    }

    #[test]
    fn category_paths_follow_the_forest() {
        let (mut ctx, _dir) = context();
        ctx.process_line("sub income/1 Grants").unwrap();
        assert_eq!(
            ctx.category_paths(),
            vec!["income/0", "income/1", "income/1/0", "expense/0", "expense/1"]
        );
    }

    #[test]
    fn bad_path_surfaces_core_error() {
        let (mut ctx, _dir) = context();
        let err = ctx.process_line("sub income/9 Extra").unwrap_err();
        assert!(matches!(err, CommandError::Core(_)));
    }
}
