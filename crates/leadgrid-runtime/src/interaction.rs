use async_trait::async_trait;

/// Asks the user to confirm a destructive action.
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self, title: &str, message: &str) -> bool;
}

/// System clipboard.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), String>;
}
