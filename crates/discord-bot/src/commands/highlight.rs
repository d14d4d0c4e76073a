use serenity::{
    builder::CreateApplicationCommand,
    model::application::command::CommandOptionType,
};

pub const COMMAND_NAME: &str = "hl";

/// Create the `/hl` command and its subcommands
pub fn highlight_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name(COMMAND_NAME)
        .description("Highlight management commands")
        .dm_permission(false)
        // Add subcommand
        .create_option(|option| {
            option
                .name("add")
                .description("Adds a term to be tracked")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("term")
                        .description("Term to be highlighted")
                        .kind(CommandOptionType::String)
                        .required(true)
                })
        })
        // List subcommand
        .create_option(|option| {
            option
                .name("list")
                .description("Lists the terms you're currently tracking")
                .kind(CommandOptionType::SubCommand)
        })
        // Remove subcommand
        .create_option(|option| {
            option
                .name("remove")
                .description("Remove a term from being tracked")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("term")
                        .description("Term to be removed")
                        .kind(CommandOptionType::String)
                        .required(true)
                })
        })
        // Clear subcommand
        .create_option(|option| {
            option
                .name("clear")
                .description("Clears all terms being tracked")
                .kind(CommandOptionType::SubCommand)
        });

    command
}
