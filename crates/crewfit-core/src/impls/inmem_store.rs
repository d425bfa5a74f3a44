//! InMemoryEntityStore - セッション内で People / Projects を保持する EntityStore
//!
//! # 実装方針
//! - `Arc<Mutex<Snapshot>>` で保持（clone すると同じ中身を共有）
//! - load は clone を返すので、呼び出し側の変更は replace するまで見えない

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::StoreError;
use crate::ports::{EntityStore, Snapshot};

#[derive(Clone, Default)]
pub struct InMemoryEntityStore {
    state: Arc<Mutex<Snapshot>>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            state: Arc::new(Mutex::new(snapshot)),
        }
    }
}

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn load_all(&self) -> Result<Snapshot, StoreError> {
        let state = self.state.lock().await;
        Ok(state.clone())
    }

    async fn replace_all(&self, snapshot: Snapshot) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        *state = snapshot;
        Ok(())
    }
}
