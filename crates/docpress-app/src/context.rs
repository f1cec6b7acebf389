/*
[INPUT]:  Application configuration and a notification sink
[OUTPUT]: Shared application state with startup and shutdown lifecycle
[POS]:    Application layer - owns bridge, session and chat transcript
[UPDATE]: When adding shared state or background tasks
*/

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use docpress_adapter::{
    Address, CertificateRecord, CertificateRegistry, HttpWalletProvider, JsonRpcClient,
    MockCertificateRegistry, MockWalletProvider, Notifier, RpcCertificateRegistry, WalletBridge,
    WalletProvider, spawn_account_listener,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::chatbot::{ChatMessage, Chatbot};
use crate::config::AppConfig;
use crate::form::{CertificateForm, FormKind, ValidationErrors};
use crate::routes::{AccessState, Route, resolve};
use crate::session::SessionStore;
use crate::state::{JsonFileStore, KeyValueStore};
use crate::views::{DashboardView, ProfileView};

/// Account exposed by the in-memory demo wallet
pub const DEMO_ACCOUNT: Address = Address::new([
    0xf3, 0x9f, 0xd6, 0xe5, 0x1a, 0xad, 0x88, 0xf6, 0xf4, 0xce, 0x6a, 0xb8, 0x82, 0x72, 0x79,
    0xcf, 0xff, 0xb9, 0x22, 0x66,
]);

pub struct AppContext {
    config: AppConfig,
    bridge: Arc<WalletBridge>,
    session: Arc<SessionStore>,
    chatbot: Mutex<Chatbot>,
    account_watcher: Option<Arc<HttpWalletProvider>>,
    cancel: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl AppContext {
    /// Build the context with file-backed storage under the configured data dir
    pub fn from_config(config: AppConfig, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let data_dir = config.data_dir()?;
        let storage: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(&data_dir));
        Self::with_storage(config, storage, notifier)
    }

    pub fn with_storage(
        config: AppConfig,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        config.validate().context("invalid configuration")?;
        let contract_address = config.contract_address()?;

        let mut account_watcher = None;
        let bridge = if config.wallet.demo {
            info!(account = %DEMO_ACCOUNT, "using in-memory demo wallet");
            let provider: Arc<dyn WalletProvider> =
                Arc::new(MockWalletProvider::new(vec![DEMO_ACCOUNT]));
            let registry: Arc<dyn CertificateRegistry> =
                Arc::new(MockCertificateRegistry::new(contract_address));
            WalletBridge::with_provider(provider, registry, notifier.clone())
        } else if let Some(rpc_url) = &config.wallet.rpc_url {
            info!(rpc_url = %rpc_url, contract = %contract_address, "using json-rpc wallet provider");
            let client = Arc::new(
                JsonRpcClient::new(rpc_url)
                    .with_context(|| format!("create json-rpc client for {rpc_url}"))?,
            );
            let provider = Arc::new(HttpWalletProvider::new(client.clone()));
            let registry: Arc<dyn CertificateRegistry> = Arc::new(
                RpcCertificateRegistry::new(client, contract_address)
                    .with_confirmations(config.contract.confirmations)
                    .with_poll_interval(config.receipt_poll_interval()),
            );
            account_watcher = Some(provider.clone());
            WalletBridge::with_provider(provider, registry, notifier.clone())
        } else {
            warn!("no wallet provider configured; wallet features are unavailable");
            WalletBridge::new(notifier.clone())
        };

        let session = SessionStore::new(storage, notifier).with_latency(config.simulated_latency());

        Ok(Self {
            config,
            bridge: Arc::new(bridge),
            session: Arc::new(session),
            chatbot: Mutex::new(Chatbot::new()),
            account_watcher,
            cancel: CancellationToken::new(),
            tasks: Mutex::new(Vec::new()),
        })
    }

    /// Hydrate the session and start the account listeners
    pub fn start(&self) {
        self.session.hydrate();

        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = spawn_account_listener(self.bridge.clone(), self.cancel.clone()) {
            tasks.push(handle);
        }
        if let Some(watcher) = &self.account_watcher {
            tasks.push(
                watcher
                    .clone()
                    .watch_accounts(self.config.account_poll_interval(), self.cancel.clone()),
            );
        }
        debug!(tasks = tasks.len(), "application context started");
    }

    /// Cancel background tasks and wait for them to finish
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let tasks: Vec<_> = {
            let mut guard = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
            guard.drain(..).collect()
        };
        for task in tasks {
            if let Err(err) = task.await {
                warn!(error = %err, "background task ended abnormally");
            }
        }
        info!("application context shut down");
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn bridge(&self) -> &Arc<WalletBridge> {
        &self.bridge
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub async fn access(&self) -> AccessState {
        AccessState {
            wallet_connected: self.bridge.is_connected().await,
            signed_in: self.session.is_signed_in(),
        }
    }

    /// Route that should render for a requested page right now
    pub async fn resolve(&self, route: Route) -> Route {
        let target = resolve(route, self.access().await);
        if target != route {
            debug!(from = %route, to = %target, "route redirected");
        }
        target
    }

    pub async fn dashboard(&self) -> DashboardView {
        let user = self.session.current_user();
        DashboardView::build(user.as_ref(), self.bridge.address().await)
    }

    pub async fn profile(&self) -> ProfileView {
        let user = self.session.current_user();
        ProfileView::build(
            user.as_ref(),
            self.bridge.address().await,
            &self.bridge.activity(),
            &self.config.explorer_url,
        )
    }

    pub async fn submit_certificate(
        &self,
        kind: FormKind,
        record: &CertificateRecord,
    ) -> Result<Option<bool>, ValidationErrors> {
        CertificateForm::new(kind).submit(&self.bridge, record).await
    }

    /// Send a chat message and return the assistant's reply
    pub fn chat(&self, input: &str) -> Option<String> {
        let mut chatbot = self.chatbot.lock().unwrap_or_else(|e| e.into_inner());
        chatbot.send(input).map(|reply| reply.text.clone())
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        let chatbot = self.chatbot.lock().unwrap_or_else(|e| e.into_inner());
        chatbot.messages().to_vec()
    }
}
