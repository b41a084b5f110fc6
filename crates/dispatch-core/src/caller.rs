//! Callers and Knowledge Bases
//!
//! A caller identifies the integration/tenant issuing a request. Knowledge
//! bases answer `knowledge_qa` questions and are selected per caller through
//! a fixed mapping.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Identity of the integration/tenant issuing a request
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Caller(String);

impl Caller {
    pub const ZLTX: &'static str = "zltx";
    pub const HYT: &'static str = "hyt";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Caller {
    fn from(id: &str) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for Caller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a knowledge base in the retrieval service
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnowledgeId(String);

impl KnowledgeId {
    pub const ZLTX: &'static str = "kb-00000001";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for KnowledgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Map a caller to its knowledge base, if one is provisioned
pub fn knowledge_base_for(caller: &Caller) -> Option<KnowledgeId> {
    match caller.as_str() {
        Caller::ZLTX => Some(KnowledgeId::new(KnowledgeId::ZLTX)),
        _ => None,
    }
}

/// Knowledge retrieval collaborator (Strategy pattern)
///
/// Answers `knowledge_qa` questions against a caller-selected knowledge
/// base. The concrete retrieval service lives outside this crate.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Answer a question against the given knowledge base
    async fn query(&self, knowledge_id: &KnowledgeId, question: &str) -> Result<String>;
}
