use eyre::Result;
use highlight_core::{
    capabilities::SubscriptionStore,
    errors::{HighlightError, HighlightResult},
    subscriptions::SubscriptionService,
};
use serenity::{
    model::application::interaction::{
        InteractionResponseType,
        application_command::{ApplicationCommandInteraction, CommandDataOption},
    },
    utils::Color,
};
use tracing::error;

use crate::handlers::HandlerContext;

/// A parsed `/hl` subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightAction {
    Add(String),
    List,
    Remove(String),
    Clear,
}

impl HighlightAction {
    pub fn from_parts(subcommand: &str, term: Option<String>) -> Result<Self> {
        let require_term = || term.clone().ok_or_else(|| eyre::eyre!("Missing term parameter"));

        match subcommand {
            "add" => Ok(Self::Add(require_term()?)),
            "list" => Ok(Self::List),
            "remove" => Ok(Self::Remove(require_term()?)),
            "clear" => Ok(Self::Clear),
            other => Err(eyre::eyre!("Unknown subcommand: {}", other)),
        }
    }
}

/// Embed sent back to the user who ran the command.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub title: String,
    pub description: String,
    pub color: Color,
}

impl Reply {
    fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            color: Color::DARK_GREEN,
        }
    }

    pub fn error(err: &HighlightError) -> Self {
        Self {
            title: "Error".to_string(),
            description: err.user_message(),
            color: Color::RED,
        }
    }
}

/// A failed command, remembering whether Discord already received a response.
#[derive(Debug)]
pub struct CommandError {
    pub acknowledged: bool,
    pub source: eyre::Report,
}

impl CommandError {
    pub fn before_ack(source: impl Into<eyre::Report>) -> Self {
        Self {
            acknowledged: false,
            source: source.into(),
        }
    }

    pub fn after_ack(source: impl Into<eyre::Report>) -> Self {
        Self {
            acknowledged: true,
            source: source.into(),
        }
    }

    pub fn content(&self) -> String {
        format!("Error: {}", self.source)
    }
}

/// Handle the /hl command
pub async fn handle_highlight_command(
    ctx: HandlerContext,
    command: &ApplicationCommandInteraction,
) -> Result<(), CommandError> {
    // Get the subcommand
    let subcommand = command.data.options.first()
        .ok_or_else(|| CommandError::before_ack(eyre::eyre!("Missing subcommand")))?;
    let action = HighlightAction::from_parts(&subcommand.name, get_option_string(subcommand, "term"))
        .map_err(CommandError::before_ack)?;

    // Storage round trips can outlast the initial response window
    command.create_interaction_response(&ctx.ctx.http, |r| {
        r.kind(InteractionResponseType::DeferredChannelMessageWithSource)
            .interaction_response_data(|m| m.ephemeral(true))
    }).await.map_err(CommandError::before_ack)?;

    let reply = match run_action(&ctx.subscriptions, command.user.id.0, action).await {
        Ok(reply) => reply,
        Err(e) => {
            if matches!(e, HighlightError::Database(_) | HighlightError::Internal(_)) {
                error!("Highlight command failed for {}: {:?}", command.user.id, e);
            }
            Reply::error(&e)
        }
    };

    command.create_followup_message(&ctx.ctx.http, |m| {
        m.ephemeral(true).embed(|e| {
            e.title(&reply.title)
                .description(&reply.description)
                .color(reply.color)
                .author(|a| a.name(&command.user.name).icon_url(command.user.face()))
        })
    }).await.map_err(CommandError::after_ack)?;

    Ok(())
}

/// Apply `action` for `user_id` and describe the result.
pub async fn run_action<S>(
    subscriptions: &SubscriptionService<S>,
    user_id: u64,
    action: HighlightAction,
) -> HighlightResult<Reply>
where
    S: SubscriptionStore + ?Sized,
{
    match action {
        HighlightAction::Add(term) => {
            let term = subscriptions.add(user_id, &term).await?;
            Ok(Reply::success(
                "Highlight added",
                format!("The term `{}` was added to your highlights list.", term),
            ))
        }
        HighlightAction::List => {
            let terms = subscriptions.list(user_id).await?;
            Ok(Reply::success(
                "You're currently tracking the following words:",
                terms.join("\n"),
            ))
        }
        HighlightAction::Remove(term) => {
            let term = subscriptions.remove(user_id, &term).await?;
            Ok(Reply::success(
                "Highlight removed",
                format!("The term `{}` was removed from your highlights list.", term),
            ))
        }
        HighlightAction::Clear => {
            subscriptions.clear(user_id).await?;
            Ok(Reply::success(
                "Highlights cleared",
                "All of the terms in your highlight list were cleared.",
            ))
        }
    }
}

fn get_option_string(options: &CommandDataOption, name: &str) -> Option<String> {
    options.options.iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}
