pub mod budget;
pub mod system;

use crate::cli::registry::CommandEntry;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(budget::definitions());
    commands.extend(system::definitions());
    commands
}
