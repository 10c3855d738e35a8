use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use leadgrid_runtime::{Config, DepartmentGateway, LeadBoard, LeadGateway, ToastQueue};
use leadgrid_types::UserProfile;

use crate::backend::FileApiClient;
use crate::console::Console;

/// Everything a handler needs: config, backend, console and a runtime to
/// drive the async gateways.
pub struct HandlerContext {
    pub config: Config,
    pub console: Console,
    /// User restored from `session.json`, if any
    pub user: Option<UserProfile>,
    client: Arc<FileApiClient>,
    toasts: ToastQueue,
    runtime: tokio::runtime::Runtime,
}

impl HandlerContext {
    pub fn new(
        config: Config,
        client: FileApiClient,
        user: Option<UserProfile>,
        console: Console,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let toasts = ToastQueue::new(config.max_notifications, config.notification_ttl());
        Ok(Self {
            config,
            console,
            user,
            client: Arc::new(client),
            toasts,
            runtime,
        })
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn client(&self) -> &FileApiClient {
        &self.client
    }

    pub fn leads(&self) -> LeadGateway<FileApiClient> {
        LeadGateway::new(self.client.clone())
    }

    pub fn departments(&self) -> DepartmentGateway<FileApiClient> {
        DepartmentGateway::new(self.client.clone())
    }

    pub fn relay(&self) -> &ToastQueue {
        &self.toasts
    }

    /// A leads board loaded from the backend, with stage and status options.
    pub fn board(&self) -> Result<LeadBoard> {
        let mut board = LeadBoard::new(&self.config)?;
        let gateway = self.leads();
        self.block_on(async {
            board.refresh(&gateway).await?;
            board.load_options(self.client.as_ref()).await
        })?;
        Ok(board)
    }

    /// Print and clear pending notifications.
    pub fn flush(&self) {
        let pending = self.toasts.drain();
        if self.console.is_json() {
            for n in &pending {
                if let Ok(line) = serde_json::to_string(n) {
                    eprintln!("{}", line);
                }
            }
        } else {
            self.console.notifications(&pending);
        }
    }
}
