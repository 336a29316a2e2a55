//! Notification feed commands.

use clap::Subcommand;
use threadline_store::Route;

use crate::context::AppContext;
use crate::error::CommandResult;

#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    /// Show the feed
    List,

    /// Mark one notification read
    Read { notification_id: String },

    /// Mark everything read
    ReadAll,
}

pub async fn run(ctx: &AppContext, command: NotificationsCommand) -> CommandResult<()> {
    ctx.require(&Route::Notifications)?;
    let notifications = &ctx.store.notifications;

    match command {
        NotificationsCommand::List => {
            notifications.fetch_notifications().await?;
        }
        NotificationsCommand::Read { notification_id } => {
            // The unread check needs the feed loaded first
            notifications.fetch_notifications().await?;
            notifications.mark_read(&notification_id).await?;
        }
        NotificationsCommand::ReadAll => {
            notifications.mark_all_read().await?;
        }
    }

    ctx.emit(&notifications.snapshot(), |state| {
        println!("{} unread", state.unread_count);
        for n in &state.items {
            let marker = if n.is_read { " " } else { "•" };
            println!("  {marker} [{}] {}: {}", n.id, n.title, n.message);
        }
    })
}
