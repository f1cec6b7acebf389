/*
[INPUT]:  Notifications raised by the bridge and session store
[OUTPUT]: Styled toast lines on the terminal
[POS]:    CLI output layer
[UPDATE]: When toast formatting changes
*/

use console::style;
use docpress_adapter::{Notification, Notifier};
use tracing::info;

/// Prints every notification as it arrives
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        info!(
            title = %notification.title,
            destructive = notification.is_destructive(),
            "notification"
        );
        let title = if notification.is_destructive() {
            style(notification.title).bold().red()
        } else {
            style(notification.title).bold().green()
        };
        println!("{title}  {}", style(notification.description).dim());
    }
}
