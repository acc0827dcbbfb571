//! Editor window services the playground consumes.

use async_trait::async_trait;

/// Notifications, prompts and commands provided by the host window.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Window: Send + Sync {
    fn show_error_message(&self, message: &str);

    fn show_information_message(&self, message: &str);

    /// Offer `items` and wait for one to be chosen. `None` means cancelled.
    async fn show_quick_pick(&self, items: Vec<String>, placeholder: &str) -> Option<String>;

    /// Set a context key the host uses to gate menus and views.
    fn set_context(&self, key: &str, value: &str);

    fn execute_command(&self, command: &str);
}
