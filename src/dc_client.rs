use crate::error::{ImporterError, Result};
use crate::resolve::Resolver;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

// Environment variables.
const KEY_ENV: &str = "DC_API_KEY";
const API_ROOT_ENV: &str = "DC_API_ROOT";

// Default REST API endpoint root.
const DEFAULT_API_ROOT: &str = "https://api.datacommons.org";

/// Client for the Data Commons REST resolve API.
///
/// See: https://docs.datacommons.org/api/rest/v2/resolve
pub struct DataCommonsClient {
    client: reqwest::blocking::Client,
    api_root: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct ResolveRequest {
    nodes: Vec<String>,
    property: String,
}

#[derive(Debug, Deserialize)]
struct ResolveResponse {
    #[serde(default)]
    entities: Vec<ResolvedEntity>,
}

#[derive(Debug, Deserialize)]
struct ResolvedEntity {
    #[serde(default)]
    node: String,
    #[serde(default)]
    candidates: Vec<ResolveCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResolveCandidate {
    #[serde(default)]
    dcid: String,
}

impl DataCommonsClient {
    /// Builds a client from `DC_API_ROOT` / `DC_API_KEY`, falling back to
    /// the public endpoint and no key.
    pub fn from_env() -> Self {
        let api_root =
            std::env::var(API_ROOT_ENV).unwrap_or_else(|_| DEFAULT_API_ROOT.to_string());
        let api_key = std::env::var(KEY_ENV).unwrap_or_default();
        info!("DC API root: {}", api_root);
        Self::new(api_root, api_key)
    }

    pub fn new(api_root: String, api_key: String) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            api_root,
            api_key,
        }
    }

    fn post(&self, path: &str, body: &ResolveRequest) -> Result<ResolveResponse> {
        let url = format!("{}{}", self.api_root.trim_end_matches('/'), path);
        debug!("POST {} with {} nodes", url, body.nodes.len());

        let mut request = self.client.post(&url).json(body);
        if !self.api_key.is_empty() {
            request = request.header("x-api-key", &self.api_key);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(ImporterError::Api {
                message: format!("{}: {}", status, message),
            });
        }
        Ok(response.json()?)
    }
}

impl Resolver for DataCommonsClient {
    fn resolve(&self, entities: &[String], entity_type: &str) -> Result<HashMap<String, String>> {
        let type_of = if entity_type.is_empty() {
            String::new()
        } else {
            format!("{{typeOf:{}}}", entity_type)
        };
        let request = ResolveRequest {
            nodes: entities.to_vec(),
            property: format!("<-description{}->dcid", type_of),
        };

        let response = self.post("/v2/resolve", &request)?;

        // Take the first candidate per node; nodes without candidates are
        // left out of the result and treated as unresolved upstream.
        let mut resolved = HashMap::new();
        for entity in response.entities {
            let dcid = entity
                .candidates
                .first()
                .map(|c| c.dcid.clone())
                .unwrap_or_default();
            if !entity.node.is_empty() && !dcid.is_empty() {
                resolved.insert(entity.node, dcid);
            }
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing_takes_first_candidate() {
        let raw = r#"{
            "entities": [
                {"node": "e1", "candidates": [{"dcid": "E1"}, {"dcid": "E1b"}]},
                {"node": "e2", "candidates": []},
                {"node": "", "candidates": [{"dcid": "X"}]}
            ]
        }"#;
        let response: ResolveResponse = serde_json::from_str(raw).unwrap();

        let mut resolved = HashMap::new();
        for entity in response.entities {
            let dcid = entity
                .candidates
                .first()
                .map(|c| c.dcid.clone())
                .unwrap_or_default();
            if !entity.node.is_empty() && !dcid.is_empty() {
                resolved.insert(entity.node, dcid);
            }
        }
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved["e1"], "E1");
    }

    #[test]
    fn test_empty_response_body() {
        let response: ResolveResponse = serde_json::from_str("{}").unwrap();
        assert!(response.entities.is_empty());
    }
}
