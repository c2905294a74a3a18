//! MCP resource handlers: documents exposed as `docquery://<key>`

use crate::protocol::ResourceContent;
use anyhow::Result;
use docquery_core::RelevanceEngine;
use serde_json::Value;

const URI_SCHEME: &str = "docquery://";

fn document_uri(key: &str) -> String {
    format!("{}{}", URI_SCHEME, key)
}

/// List every searchable document as a resource
pub async fn list_resources(engine: &RelevanceEngine) -> Result<Value> {
    let keys = engine.list_documents().await?;
    let resources: Vec<Value> = keys
        .iter()
        .map(|key| {
            serde_json::json!({
                "uri": document_uri(key),
                "name": key,
                "mimeType": "text/plain"
            })
        })
        .collect();
    Ok(serde_json::json!({ "resources": resources }))
}

/// Read a document by URI
pub async fn read_resource(engine: &RelevanceEngine, uri: &str) -> Result<ResourceContent> {
    let key = uri
        .strip_prefix(URI_SCHEME)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Invalid URI: {}", uri))?;

    let document = engine.fetch_document(key).await?;

    Ok(ResourceContent {
        uri: uri.to_string(),
        name: document.key,
        mime_type: "text/plain".to_string(),
        text: document.text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use docquery_core::MemoryStore;
    use std::sync::Arc;

    fn engine() -> RelevanceEngine {
        let store = MemoryStore::new()
            .with_document("docs/faq.txt", "Frequently asked questions")
            .with_document("docs/logo.png", "binary");
        RelevanceEngine::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_list_resources_uses_filtered_keys() {
        let listed = list_resources(&engine()).await.unwrap();
        let resources = listed["resources"].as_array().unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0]["uri"], "docquery://docs/faq.txt");
    }

    #[tokio::test]
    async fn test_read_resource() {
        let content = read_resource(&engine(), "docquery://docs/faq.txt")
            .await
            .unwrap();
        assert_eq!(content.name, "docs/faq.txt");
        assert_eq!(content.text, "Frequently asked questions");

        assert!(read_resource(&engine(), "file:///etc/passwd").await.is_err());
        assert!(read_resource(&engine(), "docquery://").await.is_err());
    }
}
