use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use flowbridge_agent::assets::{Asset, AssetError, AssetSource};
use flowbridge_agent::document::Designer;
use flowbridge_agent::interpreter::Interpreter;

/// Asset source that serves any `https://` reference without a network
/// round trip and counts how often it was asked.
#[derive(Default)]
pub struct StubAssets {
    pub fetches: AtomicUsize,
}

#[async_trait]
impl AssetSource for StubAssets {
    async fn fetch(&self, reference: &str) -> Result<Asset, AssetError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !reference.starts_with("https://") {
            return Err(AssetError::UnsupportedReference(reference.to_string()));
        }
        Ok(Asset {
            id: format!("asset-{}", self.fetches.load(Ordering::SeqCst)),
            url: reference.to_string(),
            content_type: Some("image/png".to_string()),
            size_bytes: 128,
        })
    }
}

/// Interpreter over a fresh `Home` page plus a handle on its stub assets.
pub fn interpreter() -> (Interpreter, Arc<StubAssets>) {
    let assets = Arc::new(StubAssets::default());
    let interpreter = Interpreter::new(Designer::with_home_page(), assets.clone());
    (interpreter, assets)
}
