//! HTTP transport to the external authorization service
//!
//! JSON-over-HTTP client for the tuple store protocol. Timeouts and
//! transport failures surface as [`StoreError::Unavailable`] so the
//! check-family callers above us can fail closed.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use atrium_types::{StoreError, StoreResult, Tuple};

use crate::{AuthorizationModel, TupleStore};

/// Tuple store client speaking the authorization service's JSON protocol.
pub struct HttpTupleStore {
    client: reqwest::Client,
    base_url: String,
    /// Model id referenced on every evaluation request, once published.
    model_id: Option<String>,
}

impl HttpTupleStore {
    /// Build a client with a per-request timeout.
    pub fn new(
        base_url: impl Into<String>,
        model_id: Option<String>,
        timeout: Duration,
    ) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self { client, base_url: base_url.into(), model_id })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post<Req: Serialize, Res: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &Req,
    ) -> StoreResult<Res> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            // The service reports duplicate tuple writes as a client error
            // with a recognizable message.
            if text.contains("already exists") {
                return Err(StoreError::AlreadyExists);
            }
            return Err(StoreError::Protocol(format!("{status}: {text}")));
        }

        response
            .json::<Res>()
            .await
            .map_err(|e| StoreError::Protocol(format!("malformed response body: {e}")))
    }
}

fn map_transport_error(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::Unavailable(format!("request timed out: {err}"))
    } else {
        StoreError::Unavailable(err.to_string())
    }
}

#[derive(Serialize)]
struct CheckBody<'a> {
    user: &'a str,
    relation: &'a str,
    object: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_id: Option<&'a str>,
}

#[derive(Deserialize)]
struct CheckReply {
    #[serde(default)]
    allowed: bool,
}

#[derive(Serialize)]
struct WriteBody {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    writes: Vec<Tuple>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    deletes: Vec<Tuple>,
}

#[derive(Deserialize)]
struct WriteReply {}

#[derive(Serialize)]
struct ListObjectsBody<'a> {
    user: &'a str,
    relation: &'a str,
    #[serde(rename = "type")]
    object_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_id: Option<&'a str>,
}

#[derive(Deserialize)]
struct ListObjectsReply {
    #[serde(default)]
    objects: Vec<String>,
}

#[derive(Serialize)]
struct UserFilter<'a> {
    #[serde(rename = "type")]
    user_type: &'a str,
}

#[derive(Serialize)]
struct ListUsersBody<'a> {
    object: &'a str,
    relation: &'a str,
    user_filters: Vec<UserFilter<'a>>,
}

#[derive(Deserialize)]
struct ListedUser {
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

#[derive(Deserialize)]
struct ListUsersReply {
    #[serde(default)]
    users: Vec<ListedUser>,
}

#[derive(Deserialize)]
struct PublishModelReply {
    authorization_model_id: String,
}

#[async_trait]
impl TupleStore for HttpTupleStore {
    async fn check(&self, user: &str, relation: &str, object: &str) -> StoreResult<bool> {
        let reply: CheckReply = self
            .post(
                "check",
                &CheckBody { user, relation, object, model_id: self.model_id.as_deref() },
            )
            .await?;
        Ok(reply.allowed)
    }

    async fn write(&self, tuples: Vec<Tuple>) -> StoreResult<()> {
        let _: WriteReply =
            self.post("write", &WriteBody { writes: tuples, deletes: Vec::new() }).await?;
        Ok(())
    }

    async fn delete(&self, tuples: Vec<Tuple>) -> StoreResult<()> {
        let _: WriteReply =
            self.post("write", &WriteBody { writes: Vec::new(), deletes: tuples }).await?;
        Ok(())
    }

    async fn list_objects(
        &self,
        user: &str,
        object_type: &str,
        relation: &str,
    ) -> StoreResult<Vec<String>> {
        let reply: ListObjectsReply = self
            .post(
                "list-objects",
                &ListObjectsBody { user, relation, object_type, model_id: self.model_id.as_deref() },
            )
            .await?;
        Ok(reply.objects)
    }

    async fn list_users(&self, object: &str, relation: &str) -> StoreResult<Vec<String>> {
        let reply: ListUsersReply = self
            .post(
                "list-users",
                &ListUsersBody {
                    object,
                    relation,
                    user_filters: vec![UserFilter { user_type: "user" }],
                },
            )
            .await?;
        Ok(reply
            .users
            .into_iter()
            .filter_map(|u| u.user.or(u.id))
            .collect())
    }

    async fn publish_model(&self, model: &AuthorizationModel) -> StoreResult<String> {
        let reply: PublishModelReply = self.post("authorization-models", model).await?;
        Ok(reply.authorization_model_id)
    }
}
