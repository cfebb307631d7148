//! The backend access layer: thin async wrappers over the external
//! document/file/auth store. All encoding is the store's JSON; nothing here
//! retries or handles failures beyond classifying them — call sites catch,
//! log, and toast.

use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::AppConfig;
use crate::model::{Blog, Session};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),
    #[error("record not found")]
    NotFound,
    #[error("not signed in")]
    Unauthorized,
    #[error("backend returned status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, BackendError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryOp {
    Eq,
}

impl QueryOp {
    fn as_str(self) -> &'static str {
        match self {
            QueryOp::Eq => "eq",
        }
    }
}

#[derive(Deserialize)]
struct CreatedId {
    id: String,
}

#[derive(Deserialize)]
struct FileUrl {
    url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Backend {
    cfg: AppConfig,
}

impl Backend {
    pub fn new(cfg: AppConfig) -> Self {
        Self { cfg }
    }

    fn doc_url(&self, collection: &str) -> String {
        format!("{}/collections/{}", self.cfg.api_base, collection)
    }

    async fn read_json<T: DeserializeOwned>(response: gloo_net::http::Response) -> Result<T> {
        match response.status() {
            404 => Err(BackendError::NotFound),
            401 => Err(BackendError::Unauthorized),
            status if !response.ok() => Err(BackendError::Status(status)),
            _ => response
                .json::<T>()
                .await
                .map_err(|e| BackendError::Decode(e.to_string())),
        }
    }

    fn check_status(response: &gloo_net::http::Response) -> Result<()> {
        match response.status() {
            404 => Err(BackendError::NotFound),
            401 => Err(BackendError::Unauthorized),
            status if !response.ok() => Err(BackendError::Status(status)),
            _ => Ok(()),
        }
    }

    // ---- document store ----

    pub async fn fetch_all<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        let response = Request::get(&self.doc_url(collection))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    /// `fetch_all` with a server-side ordering applied.
    pub async fn fetch_all_ordered<T: DeserializeOwned>(
        &self,
        collection: &str,
        order_by: &str,
        descending: bool,
    ) -> Result<Vec<T>> {
        let response = Request::get(&self.doc_url(collection))
            .query(order_params(order_by, descending))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    pub async fn fetch_by_id<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<T> {
        let url = format!("{}/{}", self.doc_url(collection), id);
        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    pub async fn query<T: DeserializeOwned>(
        &self,
        collection: &str,
        field: &str,
        op: QueryOp,
        value: &str,
    ) -> Result<Vec<T>> {
        let response = Request::get(&self.doc_url(collection))
            .query(filter_params(field, op, value))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    pub async fn create(&self, collection: &str, fields: &Value) -> Result<String> {
        let response = Request::post(&self.doc_url(collection))
            .json(fields)
            .map_err(|e| BackendError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::read_json::<CreatedId>(response).await.map(|c| c.id)
    }

    pub async fn update(&self, collection: &str, id: &str, partial: &Value) -> Result<()> {
        let url = format!("{}/{}", self.doc_url(collection), id);
        let response = Request::patch(&url)
            .json(partial)
            .map_err(|e| BackendError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::check_status(&response)
    }

    pub async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let url = format!("{}/{}", self.doc_url(collection), id);
        let response = Request::delete(&url)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::check_status(&response)
    }

    // ---- file store ----

    pub async fn upload_file(&self, path: &str, bytes: Vec<u8>) -> Result<String> {
        let url = format!("{}/files/{}", self.cfg.storage_base, path);
        let body = js_sys::Uint8Array::from(bytes.as_slice());
        let response = Request::put(&url)
            .header("content-type", "application/octet-stream")
            .body(body)
            .map_err(|e| BackendError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::read_json::<FileUrl>(response).await.map(|f| f.url)
    }

    /// Deletes a stored file. A file that is already gone is not an error.
    pub async fn delete_file(&self, path: &str) -> Result<()> {
        let url = format!("{}/files/{}", self.cfg.storage_base, path);
        let response = Request::delete(&url)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        match Self::check_status(&response) {
            Err(BackendError::NotFound) => Ok(()),
            other => other,
        }
    }

    // ---- auth ----

    pub async fn current_user(&self) -> Result<Option<Session>> {
        let url = format!("{}/auth/session", self.cfg.api_base);
        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        match Self::read_json::<Session>(response).await {
            Ok(session) => Ok(Some(session)),
            Err(BackendError::Unauthorized) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let url = format!("{}/auth/login", self.cfg.api_base);
        let response = Request::post(&url)
            .json(&json!({ "email": email, "password": password }))
            .map_err(|e| BackendError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    pub async fn logout(&self) -> Result<()> {
        let url = format!("{}/auth/logout", self.cfg.api_base);
        let response = Request::post(&url)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::check_status(&response)
    }

    pub async fn update_auth_profile(&self, patch: &Value) -> Result<()> {
        let url = format!("{}/auth/profile", self.cfg.api_base);
        let response = Request::patch(&url)
            .json(patch)
            .map_err(|e| BackendError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::check_status(&response)
    }

    pub async fn change_password(&self, current: &str, new: &str) -> Result<()> {
        let url = format!("{}/auth/password", self.cfg.api_base);
        let response = Request::post(&url)
            .json(&json!({ "currentPassword": current, "newPassword": new }))
            .map_err(|e| BackendError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::check_status(&response)
    }

    // ---- blog choreography ----

    /// Creates a post, then uploads the thumbnail and patches its URL in if a
    /// file is attached. Returns the new blog id.
    pub async fn create_blog(
        &self,
        session: &Session,
        title: &str,
        content: &str,
        date_secs: i64,
        thumbnail: Option<Vec<u8>>,
    ) -> Result<String> {
        let fields = new_blog_fields(session, title, content, date_secs);
        let id = self.create("blogs", &fields).await?;
        if let Some(bytes) = thumbnail {
            let url = self.upload_file(&thumbnail_path(&id), bytes).await?;
            self.update("blogs", &id, &thumbnail_patch(&url)).await?;
        }
        Ok(id)
    }

    /// Edits a post in place; a newly attached file replaces the stored
    /// thumbnail.
    pub async fn update_blog(
        &self,
        id: &str,
        title: &str,
        content: &str,
        thumbnail: Option<Vec<u8>>,
    ) -> Result<()> {
        let mut patch = json!({ "title": title, "content": content });
        if let Some(bytes) = thumbnail {
            let url = self.upload_file(&thumbnail_path(id), bytes).await?;
            patch["thumbnail"] = Value::String(url);
        }
        self.update("blogs", id, &patch).await
    }

    /// Removes the stored thumbnail (tolerating its absence), then the post.
    pub async fn delete_blog(&self, blog: &Blog) -> Result<()> {
        if blog.thumbnail.is_some() {
            self.delete_file(&thumbnail_path(&blog.id)).await?;
        }
        self.delete("blogs", &blog.id).await
    }

    pub async fn bulk_delete_blogs(&self, blogs: &[Blog]) -> Result<()> {
        for blog in blogs {
            self.delete_blog(blog).await?;
        }
        Ok(())
    }
}

// Query strings go through the builder so values are URL-encoded; these only
// assemble the pairs.

fn order_params(order_by: &str, descending: bool) -> [(&str, &str); 2] {
    [
        ("order_by", order_by),
        ("dir", if descending { "desc" } else { "asc" }),
    ]
}

fn filter_params<'a>(field: &'a str, op: QueryOp, value: &'a str) -> [(&'a str, &'a str); 3] {
    [("field", field), ("op", op.as_str()), ("value", value)]
}

pub fn thumbnail_path(blog_id: &str) -> String {
    format!("thumbnails/{blog_id}")
}

pub fn profile_photo_path(user_id: &str) -> String {
    format!("profile_photos/{user_id}")
}

/// Fields for a freshly created post; the author is stamped from the
/// authenticated session, never from form input.
pub fn new_blog_fields(session: &Session, title: &str, content: &str, date_secs: i64) -> Value {
    json!({
        "title": title,
        "content": content,
        "author": session.display_name,
        "userId": session.id,
        "date": date_secs,
    })
}

pub fn thumbnail_patch(url: &str) -> Value {
    json!({ "thumbnail": url })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            id: "u1".to_string(),
            email: "ada@example.com".to_string(),
            display_name: "Ada".to_string(),
            photo_url: None,
        }
    }

    #[test]
    fn create_payload_carries_session_author() {
        let fields = new_blog_fields(&session(), "T", "C", 1_700_000_000);
        assert_eq!(fields["title"], "T");
        assert_eq!(fields["content"], "C");
        assert_eq!(fields["author"], "Ada");
        assert_eq!(fields["userId"], "u1");
        assert_eq!(fields["date"], 1_700_000_000);
        assert_eq!(fields.as_object().unwrap().len(), 5);
    }

    #[test]
    fn thumbnail_patch_touches_only_thumbnail() {
        let patch = thumbnail_patch("https://cdn/x.png");
        assert_eq!(patch.as_object().unwrap().len(), 1);
        assert_eq!(patch["thumbnail"], "https://cdn/x.png");
    }

    #[test]
    fn query_values_stay_whole_pairs() {
        // Values with reserved characters must reach the encoder intact
        // rather than being spliced into the URL by hand.
        let params = filter_params("title", QueryOp::Eq, "cats & dogs #1");
        assert_eq!(
            params,
            [("field", "title"), ("op", "eq"), ("value", "cats & dogs #1")]
        );
        assert_eq!(order_params("date", true), [("order_by", "date"), ("dir", "desc")]);
        assert_eq!(order_params("title", false)[1], ("dir", "asc"));
    }

    #[test]
    fn storage_paths_are_keyed_by_id() {
        assert_eq!(thumbnail_path("b1"), "thumbnails/b1");
        assert_eq!(profile_photo_path("u1"), "profile_photos/u1");
    }
}
