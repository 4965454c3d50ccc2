use crate::cli::core::{CommandError, CommandResult};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{ArgumentKind, CommandEntry};
use crate::cli::shell_context::ShellContext;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "config",
            "Show configuration or store the current window as default",
            "config [save]",
            cmd_config,
        ),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        )
        .taking(ArgumentKind::Command),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_lowercase()).as_deref() {
        None => {
            let config = &context.config;
            output_section("Configuration");
            io::print_info(format!("  File       : {}", context.config_manager.path().display()));
            io::print_info(format!(
                "  Window     : {} .. {}",
                config.window_start.format("%Y-%m"),
                config.window_end.format("%Y-%m")
            ));
            io::print_info(format!("  Income     : {}", config.income_categories.join(", ")));
            io::print_info(format!("  Expense    : {}", config.expense_categories.join(", ")));
            io::print_info(format!("  Decimals   : {}", config.decimal_places));
            Ok(())
        }
        Some("save") => {
            let window = *context.builder.window();
            context.config.window_start = window.start();
            context.config.window_end = window.end();
            context.config_manager.save(&context.config)?;
            io::print_success(format!("Default window set to {}.", window));
            Ok(())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{}` (use `config` or `config save`)",
            other
        ))),
    }
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(command) = args.first().map(|name| name.to_lowercase()) {
        if let Some(entry) = context.command(&command) {
            help::print_command(entry);
        } else {
            context.suggest_command(args[0]);
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
