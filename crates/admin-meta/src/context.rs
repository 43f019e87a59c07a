//! What a request brings along to the admin meta resolvers.

use std::sync::Arc;

use async_trait::async_trait;
use schema_builder::TypeName;

use crate::error::{LookupError, ResolveError};

/// A record of a list, as returned by an [`UnrestrictedReader`].
pub type Item = serde_json::Value;

/// The authenticated caller. Its contents are opaque here and only interpreted by configured
/// policies.
#[derive(Debug, Clone, PartialEq)]
pub struct Session(pub serde_json::Value);

impl Session {
    pub fn new(data: serde_json::Value) -> Self {
        Session(data)
    }

    pub fn data(&self) -> &serde_json::Value {
        &self.0
    }

    /// Looks up a value in the session data by JSON pointer, e.g. `/data/role/canManageRoles`.
    pub fn pointer(&self, pointer: &str) -> Option<&serde_json::Value> {
        self.0.pointer(pointer)
    }
}

/// Reads records while bypassing access control. Only used to feed the item into item view
/// policies, never to return data to the caller.
#[async_trait]
pub trait UnrestrictedReader: Send + Sync {
    /// Finds the item of `list_key` with the given id. A missing item is `Ok(None)`.
    async fn find_one(&self, list_key: &str, item_id: &str) -> Result<Option<Item>, LookupError>;
}

pub struct LiveRequest {
    pub session: Option<Session>,
    pub unrestricted_reader: Arc<dyn UnrestrictedReader>,
}

impl std::fmt::Debug for LiveRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveRequest")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Request data every execution of the admin meta schema must carry.
#[derive(Debug)]
pub enum RequestContext {
    /// A request made by a client.
    LiveRequest(LiveRequest),
    /// The static export performed while building the admin UI. There is no session and nothing
    /// dynamic can be resolved.
    BuildTimeExport,
}

impl RequestContext {
    pub fn live(
        session: Option<Session>,
        unrestricted_reader: Arc<dyn UnrestrictedReader>,
    ) -> Self {
        RequestContext::LiveRequest(LiveRequest {
            session,
            unrestricted_reader,
        })
    }

    /// The live request, or a build phase violation naming the GraphQL field being resolved.
    pub fn live_request(
        &self,
        type_name: TypeName,
        field_name: &'static str,
    ) -> Result<&LiveRequest, ResolveError> {
        match self {
            RequestContext::LiveRequest(live_request) => Ok(live_request),
            RequestContext::BuildTimeExport => Err(ResolveError::BuildPhaseViolation {
                type_name,
                field_name,
            }),
        }
    }
}

/// A reader for contexts that never look anything up, e.g. when no list has item view policies
/// depending on the item.
pub struct NoRecords;

#[async_trait]
impl UnrestrictedReader for NoRecords {
    async fn find_one(
        &self,
        _list_key: &str,
        _item_id: &str,
    ) -> Result<Option<Item>, LookupError> {
        Ok(None)
    }
}
