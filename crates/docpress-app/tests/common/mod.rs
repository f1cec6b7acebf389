#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use docpress_adapter::{CertificateRecord, ToastQueue};
use docpress_app::{AppConfig, AppContext};

pub fn demo_config(data_dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.wallet.demo = true;
    config.auth.simulated_latency_ms = 0;
    config.storage.data_dir = Some(data_dir.to_path_buf());
    config
}

pub fn offline_config(data_dir: &Path) -> AppConfig {
    let mut config = demo_config(data_dir);
    config.wallet.demo = false;
    config
}

pub fn build_context(config: AppConfig) -> (AppContext, ToastQueue) {
    let toasts = ToastQueue::new();
    let ctx = AppContext::from_config(config, Arc::new(toasts.clone()))
        .expect("context should build");
    (ctx, toasts)
}

pub fn sample_record() -> CertificateRecord {
    CertificateRecord::new(
        "John Doe",
        "Computer Science",
        "University of Blockchain",
        "2024-06-01",
    )
}
