use serenity::{
    async_trait,
    model::{
        application::{
            command::Command,
            interaction::{Interaction, InteractionResponseType},
        },
        channel::Message,
        gateway::Ready,
        id::GuildId,
    },
    prelude::*,
};
use std::sync::Arc;
use highlight_core::{
    index::TermIndex,
    scanner::Scanner,
    subscriptions::SubscriptionService,
};
use highlight_db::PgSubscriptionStore;
use tracing::{error, info};

pub mod highlight;
pub mod message;

use crate::commands::highlight::COMMAND_NAME;
use crate::handlers::highlight::CommandError;
use crate::config::BotConfig;

/// Main Discord handler that processes all events.
///
/// Owns the highlight state shared by every event: the subscription
/// service (and through it the term index) and the message scanner.
pub struct Handler {
    config: BotConfig,
    subscriptions: SubscriptionService<PgSubscriptionStore>,
    scanner: Scanner,
}

impl Handler {
    /// Create a new handler
    pub fn new(config: BotConfig, store: Arc<PgSubscriptionStore>, index: Arc<TermIndex>) -> Self {
        let subscriptions = SubscriptionService::new(store, index, config.subscription_limits());
        let scanner = Scanner::new(config.scanner_config());

        Self {
            config,
            subscriptions,
            scanner,
        }
    }

    fn handler_context(&self, ctx: &Context) -> HandlerContext {
        HandlerContext {
            ctx: ctx.clone(),
            config: self.config.clone(),
            subscriptions: self.subscriptions.clone(),
            scanner: self.scanner.clone(),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Handle ready events (when bot connects to Discord)
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        // Guild registration is instant; global registration can take a while to propagate
        let registered = match self.config.guild_id {
            Some(guild_id) => {
                GuildId(guild_id)
                    .set_application_commands(&ctx.http, |commands| {
                        crate::commands::register_commands(commands)
                    })
                    .await
            }
            None => {
                Command::set_global_application_commands(&ctx.http, |commands| {
                    crate::commands::register_commands(commands)
                })
                .await
            }
        };

        match registered {
            Ok(cmds) => {
                info!("Commands registered successfully! Total commands: {}", cmds.len());
                for cmd in cmds {
                    info!("Command registered: /{} - {}", cmd.name, cmd.description);
                }
            }
            Err(why) => {
                error!("Error registering commands: {:?}", why);
            }
        }
    }

    /// Scan every guild message for highlighted terms
    async fn message(&self, ctx: Context, new_message: Message) {
        let handler_ctx = self.handler_context(&ctx);

        if let Err(e) = message::handle_message(handler_ctx, &new_message).await {
            error!("Error scanning message {}: {:?}", new_message.id, e);
        }
    }

    /// Handle interactions (slash commands)
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::ApplicationCommand(command) = interaction {
            info!("Received command: {}", command.data.name);

            let handler_ctx = self.handler_context(&ctx);

            let result = match command.data.name.as_str() {
                COMMAND_NAME => highlight::handle_highlight_command(handler_ctx, &command).await,
                _ => {
                    error!("Unknown command: {}", command.data.name);
                    Err(CommandError::before_ack(eyre::eyre!("Unknown command")))
                }
            };

            if let Err(e) = result {
                error!("Error handling command: {:?}", e.source);

                // A deferred interaction can only be answered with a followup
                let sent = if e.acknowledged {
                    command
                        .create_followup_message(&ctx.http, |m| {
                            m.content(e.content()).ephemeral(true)
                        })
                        .await
                        .map(|_| ())
                } else {
                    command
                        .create_interaction_response(&ctx.http, |r| {
                            r.kind(InteractionResponseType::ChannelMessageWithSource)
                                .interaction_response_data(|m| {
                                    m.content(e.content()).ephemeral(true)
                                })
                        })
                        .await
                };

                if let Err(why) = sent {
                    error!("Failed to send error response: {:?}", why);
                }
            }
        }
    }
}

/// Shared context for event handlers.
///
/// Bundles the Discord context with the bot configuration and the
/// highlight services so handlers take a single argument.
pub struct HandlerContext {
    pub ctx: Context,
    pub config: BotConfig,
    pub subscriptions: SubscriptionService<PgSubscriptionStore>,
    pub scanner: Scanner,
}
