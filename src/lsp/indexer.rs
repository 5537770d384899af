use crate::workspace::Workspace;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_lsp::lsp_types::{MessageType, Url};
use tower_lsp::Client;

/// Walk the workspace root and index every PHP file in the background, so
/// cross-file definitions resolve before the editor opens them.
pub fn spawn_preload(root: PathBuf, client: Client, workspace: Arc<RwLock<Workspace>>) {
    tokio::spawn(async move {
        let start = std::time::Instant::now();
        client
            .log_message(
                MessageType::INFO,
                format!("phpscope indexing started for {:?}", root),
            )
            .await;

        let mut indexed = 0usize;
        for entry in ignore::WalkBuilder::new(&root).build().flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("php") {
                continue;
            }
            let Ok(uri) = Url::from_file_path(path) else {
                continue;
            };
            // Parse-and-publish per file; each document's delta is applied
            // atomically under the write lock.
            let mut ws = workspace.write().await;
            match ws.load_and_index(uri) {
                Ok(_) => indexed += 1,
                Err(e) => tracing::warn!("failed to index {}: {}", path.display(), e),
            }
        }

        let stats = {
            let ws = workspace.read().await;
            format!(
                "Indexing complete in {:?}: {} files, {} symbols",
                start.elapsed(),
                indexed,
                ws.graph().definition_count()
            )
        };
        client.log_message(MessageType::INFO, stats).await;
    });
}
