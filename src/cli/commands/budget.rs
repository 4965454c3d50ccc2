use crate::cli::core::{CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{ArgumentKind, CommandEntry};
use crate::cli::shell_context::ShellContext;
use crate::cli::table::{budget_grid, format_amount, summary_grid};
use crate::domain::{parse_month, CategoryKind, CategoryPath, PeriodWindow};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("show", "Render categories and totals", "show", cmd_show),
        CommandEntry::new(
            "totals",
            "Show income, expense, profit/loss and balances",
            "totals",
            cmd_totals,
        ),
        CommandEntry::new("months", "List the months in the window", "months", cmd_months),
        CommandEntry::new(
            "range",
            "Change the budget window",
            "range <YYYY-MM> <YYYY-MM>",
            cmd_range,
        ),
        CommandEntry::new(
            "add",
            "Add a root category",
            "add <income|expense> <name>",
            cmd_add,
        )
        .taking(ArgumentKind::CategoryKind),
        CommandEntry::new(
            "sub",
            "Add a subcategory under a category",
            "sub <path> <name>",
            cmd_sub,
        )
        .taking(ArgumentKind::CategoryPath),
        CommandEntry::new(
            "delete",
            "Delete a category and its subcategories",
            "delete <path>",
            cmd_delete,
        )
        .taking(ArgumentKind::CategoryPath),
        CommandEntry::new(
            "set",
            "Set a category's amount for one month",
            "set <path> <month|YYYY-MM> <value>",
            cmd_set,
        )
        .taking(ArgumentKind::CategoryPath),
        CommandEntry::new(
            "fill",
            "Copy one month's amount to every month of the category",
            "fill <path> <month|YYYY-MM>",
            cmd_fill,
        )
        .taking(ArgumentKind::CategoryPath),
    ]
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let builder = &context.builder;
    let labels = builder.month_labels();
    let decimals = context.config.decimal_places;
    output_section(format!("Budget {}", builder.window()));
    if builder.forest().is_empty() {
        io::print_info("No categories yet. Use `add income <name>` to create one.");
    } else {
        io::print_info(budget_grid(&labels, &builder.rows(), decimals).render());
    }
    io::print_info("");
    io::print_info(summary_grid(&labels, builder.aggregates(), decimals).render());
    Ok(())
}

fn cmd_totals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let builder = &context.builder;
    output_section("Totals");
    io::print_info(
        summary_grid(
            &builder.month_labels(),
            builder.aggregates(),
            context.config.decimal_places,
        )
        .render(),
    );
    io::print_info(format!(
        "Closing balance at end of window: {}",
        format_amount(
            builder.aggregates().final_balance(),
            context.config.decimal_places
        )
    ));
    Ok(())
}

fn cmd_months(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output_section(format!("{} months", context.builder.month_count()));
    for (idx, label) in context.builder.month_labels().iter().enumerate() {
        io::print_info(format!("  {:>2}  {}", idx + 1, label));
    }
    Ok(())
}

fn cmd_range(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [start, end] = args else {
        return Err(usage("range <YYYY-MM> <YYYY-MM>"));
    };
    let start = parse_month(start)?;
    let end = parse_month(end)?;
    if end < start {
        io::print_warning("End month is before start month; using a single-month window.");
    }
    context.builder.update_date_range(start, end);
    io::print_success(format!(
        "Window set to {} ({} months).",
        context.builder.window(),
        context.builder.month_count()
    ));
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (kind, name) = match args {
        [kind, rest @ ..] if !rest.is_empty() => (kind.parse::<CategoryKind>()?, rest.join(" ")),
        _ => return Err(usage("add <income|expense> <name>")),
    };
    let path = context.builder.add_root_category(kind, name.clone());
    io::print_success(format!("Added `{}` at {}.", name, path));
    Ok(())
}

fn cmd_sub(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (parent, name) = match args {
        [parent, rest @ ..] if !rest.is_empty() => (parse_path(parent)?, rest.join(" ")),
        _ => return Err(usage("sub <path> <name>")),
    };
    let path = context.builder.add_subcategory(&parent, name.clone())?;
    io::print_success(format!("Added `{}` at {}.", name, path));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [path] = args else {
        return Err(usage("delete <path>"));
    };
    let path = parse_path(path)?;
    let removed = context.builder.delete(&path)?;
    io::print_success(format!("Deleted `{}`.", removed.name));
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [path, month, value] = args else {
        return Err(usage("set <path> <month|YYYY-MM> <value>"));
    };
    let path = parse_path(path)?;
    let month_index = resolve_month(context.builder.window(), month)?;
    let value = value.trim().parse::<f64>().unwrap_or_else(|_| {
        io::print_warning(format!("`{}` is not a number; storing 0.", value));
        f64::NAN
    });
    context.builder.set_value(&path, month_index, value)?;
    Ok(())
}

fn cmd_fill(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [path, month] = args else {
        return Err(usage("fill <path> <month|YYYY-MM>"));
    };
    let path = parse_path(path)?;
    let month_index = resolve_month(context.builder.window(), month)?;
    context.builder.apply_to_all_months(&path, month_index)?;
    io::print_success(format!(
        "Applied month {} of {} to all months.",
        month_index + 1,
        path
    ));
    Ok(())
}

fn parse_path(input: &str) -> Result<CategoryPath, CommandError> {
    Ok(input.parse::<CategoryPath>()?)
}

/// Resolves a 1-based month column or a `YYYY-MM` month inside the window to an index.
fn resolve_month(window: &PeriodWindow, input: &str) -> Result<usize, CommandError> {
    if let Ok(column) = input.trim().parse::<usize>() {
        return column.checked_sub(1).ok_or_else(|| {
            CommandError::InvalidArguments("month columns start at 1".to_string())
        });
    }
    let month = parse_month(input).map_err(|_| {
        CommandError::InvalidArguments(format!(
            "month must be a column number or YYYY-MM, got `{}`",
            input
        ))
    })?;
    window.index_of(month).ok_or_else(|| {
        CommandError::InvalidArguments(format!("{} is outside the window {}", input, window))
    })
}

fn usage(text: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {}", text))
}
