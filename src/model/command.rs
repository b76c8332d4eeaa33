use serenity::all::CreateCommand;

/// Slash command definition submitted to Discord at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
}

impl CommandDefinition {
    /// Converts the definition into Serenity's command builder.
    pub fn to_builder(&self) -> CreateCommand {
        CreateCommand::new(self.name).description(self.description)
    }
}
