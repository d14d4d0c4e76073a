use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::capabilities::{Delivery, DeliveryStatus, Membership};
use crate::models::message::Notification;

/// What happened to a single notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    /// The subscriber has left the guild.
    NotMember,
    /// The subscriber cannot see the channel the message was sent in.
    CannotView,
    /// The subscriber does not accept direct messages.
    DmClosed,
    /// A lookup or the send itself failed.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub subscriber_id: u64,
    pub term: String,
    pub outcome: DeliveryOutcome,
}

impl DispatchReport {
    fn new(notification: &Notification, outcome: DeliveryOutcome) -> Self {
        Self {
            subscriber_id: notification.subscriber_id,
            term: notification.term.clone(),
            outcome,
        }
    }
}

/// Delivers notifications produced by the scanner.
///
/// Every notification is attempted exactly once; skips and failures are
/// terminal and never reported to anyone but the log.
pub struct Dispatcher<M, D> {
    membership: Arc<M>,
    delivery: Arc<D>,
}

impl<M, D> Clone for Dispatcher<M, D> {
    fn clone(&self) -> Self {
        Self {
            membership: self.membership.clone(),
            delivery: self.delivery.clone(),
        }
    }
}

impl<M, D> Dispatcher<M, D>
where
    M: Membership + 'static,
    D: Delivery + 'static,
{
    pub fn new(membership: Arc<M>, delivery: Arc<D>) -> Self {
        Self {
            membership,
            delivery,
        }
    }

    /// Resolves, checks and sends a single notification, in that order.
    pub async fn deliver(&self, notification: &Notification) -> DeliveryOutcome {
        deliver(&*self.membership, &*self.delivery, notification).await
    }

    /// Delivers every notification, running distinct subscribers concurrently.
    ///
    /// Reports are returned in completion order.
    pub async fn dispatch(&self, notifications: Vec<Notification>) -> Vec<DispatchReport> {
        let mut tasks = JoinSet::new();

        for notification in notifications {
            let membership = self.membership.clone();
            let delivery = self.delivery.clone();
            tasks.spawn(async move {
                let outcome = deliver(&*membership, &*delivery, &notification).await;
                DispatchReport::new(&notification, outcome)
            });
        }

        let mut reports = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(report) => reports.push(report),
                Err(e) => error!("Highlight delivery task failed: {}", e),
            }
        }

        reports
    }
}

async fn deliver<M, D>(membership: &M, delivery: &D, notification: &Notification) -> DeliveryOutcome
where
    M: Membership + ?Sized,
    D: Delivery + ?Sized,
{
    let subscriber_id = notification.subscriber_id;

    let member = match membership
        .resolve_member(notification.guild_id, subscriber_id)
        .await
    {
        Ok(Some(member)) => member,
        Ok(None) => {
            debug!("Highlight subscriber {} is no longer a member", subscriber_id);
            return DeliveryOutcome::NotMember;
        }
        Err(e) => {
            warn!("Failed to resolve highlight subscriber {}: {}", subscriber_id, e);
            return DeliveryOutcome::Failed;
        }
    };

    match membership.can_view(&member, notification.channel_id).await {
        Ok(true) => {}
        Ok(false) => return DeliveryOutcome::CannotView,
        Err(e) => {
            warn!(
                "Failed to check channel {} permissions for {}: {}",
                notification.channel_id, subscriber_id, e
            );
            return DeliveryOutcome::Failed;
        }
    }

    match delivery.send_direct_message(notification).await {
        Ok(DeliveryStatus::Delivered) => DeliveryOutcome::Delivered,
        Ok(DeliveryStatus::Forbidden) => {
            debug!("Highlight subscriber {} does not accept DMs", subscriber_id);
            DeliveryOutcome::DmClosed
        }
        Err(e) => {
            warn!("Failed to send highlight to {}: {}", subscriber_id, e);
            DeliveryOutcome::Failed
        }
    }
}
