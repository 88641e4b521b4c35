//! One method per Etherpad HTTP API endpoint.
//!
//! # Design
//! `EtherpadClient` is pure marshaling over a [`Connection`]: each method
//! builds an [`Args`] map, picks GET or POST, and shapes the decoded result.
//! Methods returning an object coerce a null `data` to an empty map so
//! callers never special-case it. `get_author_name` and
//! `get_revision_changeset` return bare strings because the server does,
//! or `None` when it answers with null (an author created without a name).
//! Every method is exactly one request/response round trip.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::connection::Connection;
use crate::error::{EtherpadError, Result};
use crate::transport::{Transport, UreqTransport};
use crate::types::{Args, JsonMap, ValidUntil};

/// Port conventionally used for HTTPS.
const SECURE_PORT: u16 = 443;

/// Client for the Etherpad administrative HTTP API.
///
/// # Example
///
/// ```no_run
/// use etherpad_core::EtherpadClient;
///
/// # fn example() -> etherpad_core::Result<()> {
/// let client = EtherpadClient::new("http://localhost:9001", "secret")?;
/// let pad = client.get_text("my_pad", None)?;
/// println!("{}", pad["text"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct EtherpadClient<T = UreqTransport> {
    connection: Connection<T>,
}

impl EtherpadClient<UreqTransport> {
    /// Create a client with the default API version and UTF-8 encoding.
    pub fn new(url: &str, api_key: &str) -> Result<Self> {
        let config = ClientConfig::builder().base_url(url).api_key(api_key).build()?;
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            connection: Connection::new(config),
        }
    }
}

impl<T: Transport> EtherpadClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            connection: Connection::with_transport(config, transport),
        }
    }

    pub fn connection(&self) -> &Connection<T> {
        &self.connection
    }

    pub fn config(&self) -> &ClientConfig {
        self.connection.config()
    }

    /// Whether the base URL targets port 443, explicitly or through the
    /// scheme's default.
    ///
    /// `https://host` with no port counts as secure because the scheme
    /// default is 443. Checks that consult only an explicit port would
    /// answer `false` there.
    ///
    /// This is a port heuristic only. It says nothing about the scheme
    /// actually negotiated or whether certificates are verified.
    pub fn is_secure(&self) -> bool {
        self.config().base_url().port_or_known_default() == Some(SECURE_PORT)
    }

    // -----------------------------------------------------------------------
    // Groups
    // -----------------------------------------------------------------------
    //
    // Pads inside a group are not public; they are reachable through the web
    // UI only with a session for that group.

    /// Create a new group. Returns `{groupID}`.
    pub fn create_group(&self) -> Result<JsonMap> {
        self.connection.post("createGroup", &Args::new())
    }

    /// Create a group for `group_mapper` unless one is already mapped.
    /// Returns `{groupID}`.
    pub fn create_group_if_not_exists_for(&self, group_mapper: &str) -> Result<JsonMap> {
        let args = Args::new().with("groupMapper", group_mapper);
        self.connection.post("createGroupIfNotExistsFor", &args)
    }

    /// Delete a group and all of its pads.
    pub fn delete_group(&self, group_id: &str) -> Result<JsonMap> {
        let args = Args::new().with("groupID", group_id);
        self.connection.post("deleteGroup", &args)
    }

    /// Returns `{padIDs: [...]}`.
    pub fn list_pads(&self, group_id: &str) -> Result<JsonMap> {
        let args = Args::new().with("groupID", group_id);
        self.connection.get("listPads", &args)
    }

    /// Create a pad named `{groupID}${padName}`. Returns `{padID}`.
    pub fn create_group_pad(
        &self,
        group_id: &str,
        pad_name: &str,
        text: Option<&str>,
    ) -> Result<JsonMap> {
        let args = Args::new()
            .with("groupID", group_id)
            .with("padName", pad_name)
            .with_opt("text", text);
        self.connection.post("createGroupPad", &args)
    }

    /// Returns `{groupIDs: [...]}`.
    pub fn list_all_groups(&self) -> Result<JsonMap> {
        self.connection.get("listAllGroups", &Args::new())
    }

    // -----------------------------------------------------------------------
    // Authors
    // -----------------------------------------------------------------------

    /// Create an author, optionally with a display name. Returns `{authorID}`.
    ///
    /// Without a name this is a GET, with one a POST.
    pub fn create_author(&self, name: Option<&str>) -> Result<JsonMap> {
        match name {
            None => self.connection.get("createAuthor", &Args::new()),
            Some(name) => {
                let args = Args::new().with("name", name);
                self.connection.post("createAuthor", &args)
            }
        }
    }

    /// Create an author for `author_mapper` unless one is already mapped.
    /// A given name replaces the author's current name. Returns `{authorID}`.
    pub fn create_author_if_not_exists_for(
        &self,
        author_mapper: &str,
        name: Option<&str>,
    ) -> Result<JsonMap> {
        let args = Args::new()
            .with("authorMapper", author_mapper)
            .with_opt("name", name);
        self.connection.post("createAuthorIfNotExistsFor", &args)
    }

    /// Returns `{padIDs: [...]}`.
    pub fn list_pads_of_author(&self, author_id: &str) -> Result<JsonMap> {
        let args = Args::new().with("authorID", author_id);
        self.connection.get("listPadsOfAuthor", &args)
    }

    /// Display name of an author. `None` for an author created without one.
    pub fn get_author_name(&self, author_id: &str) -> Result<Option<String>> {
        let args = Args::new().with("authorID", author_id);
        self.connection
            .get_object("getAuthorName", &args)
            .and_then(into_text)
    }

    // -----------------------------------------------------------------------
    // Sessions
    // -----------------------------------------------------------------------

    /// Create a session giving `author_id` access to `group_id`'s pads.
    /// Returns `{sessionID}`.
    pub fn create_session(
        &self,
        group_id: &str,
        author_id: &str,
        valid_until: ValidUntil,
    ) -> Result<JsonMap> {
        let expires = valid_until.to_epoch_seconds(Utc::now());
        tracing::debug!(group_id, author_id, expires, "creating session");
        let args = Args::new()
            .with("groupID", group_id)
            .with("authorID", author_id)
            .with("validUntil", expires.to_string());
        self.connection.post("createSession", &args)
    }

    /// Session expiring at `valid_until` seconds since the Unix epoch.
    pub fn create_session_until(
        &self,
        group_id: &str,
        author_id: &str,
        valid_until: i64,
    ) -> Result<JsonMap> {
        self.create_session(group_id, author_id, ValidUntil::EpochSeconds(valid_until))
    }

    /// Session expiring `hours` hours from now.
    pub fn create_session_for_hours(
        &self,
        group_id: &str,
        author_id: &str,
        hours: i64,
    ) -> Result<JsonMap> {
        self.create_session(group_id, author_id, ValidUntil::HoursFromNow(hours))
    }

    pub fn create_session_at(
        &self,
        group_id: &str,
        author_id: &str,
        valid_until: DateTime<Utc>,
    ) -> Result<JsonMap> {
        self.create_session(group_id, author_id, ValidUntil::At(valid_until))
    }

    pub fn delete_session(&self, session_id: &str) -> Result<JsonMap> {
        let args = Args::new().with("sessionID", session_id);
        self.connection.post("deleteSession", &args)
    }

    /// Returns `{authorID, groupID, validUntil}`.
    pub fn get_session_info(&self, session_id: &str) -> Result<JsonMap> {
        let args = Args::new().with("sessionID", session_id);
        self.connection.get("getSessionInfo", &args)
    }

    /// Returns a map from session ID to session info.
    pub fn list_sessions_of_group(&self, group_id: &str) -> Result<JsonMap> {
        let args = Args::new().with("groupID", group_id);
        self.connection.get("listSessionsOfGroup", &args)
    }

    /// Returns a map from session ID to session info.
    pub fn list_sessions_of_author(&self, author_id: &str) -> Result<JsonMap> {
        let args = Args::new().with("authorID", author_id);
        self.connection.get("listSessionsOfAuthor", &args)
    }

    // -----------------------------------------------------------------------
    // Pad content
    // -----------------------------------------------------------------------

    /// Text of a pad, at `rev` or the latest revision. Returns `{text}`.
    pub fn get_text(&self, pad_id: &str, rev: Option<i64>) -> Result<JsonMap> {
        let args = Args::new().with("padID", pad_id).with_opt("rev", rev);
        self.connection.get("getText", &args)
    }

    pub fn set_text(&self, pad_id: &str, text: &str) -> Result<JsonMap> {
        let args = Args::new().with("padID", pad_id).with("text", text);
        self.connection.post("setText", &args)
    }

    pub fn append_text(&self, pad_id: &str, text: &str) -> Result<JsonMap> {
        let args = Args::new().with("padID", pad_id).with("text", text);
        self.connection.post("appendText", &args)
    }

    /// HTML of a pad, at `rev` or the latest revision. Returns `{html}`.
    pub fn get_html(&self, pad_id: &str, rev: Option<i64>) -> Result<JsonMap> {
        let args = Args::new().with("padID", pad_id).with_opt("rev", rev);
        self.connection.get("getHTML", &args)
    }

    pub fn set_html(&self, pad_id: &str, html: &str) -> Result<JsonMap> {
        let args = Args::new().with("padID", pad_id).with("html", html);
        self.connection.post("setHTML", &args)
    }

    /// Returns `{pool}`.
    pub fn get_attribute_pool(&self, pad_id: &str) -> Result<JsonMap> {
        let args = Args::new().with("padID", pad_id);
        self.connection.get("getAttributePool", &args)
    }

    /// Encoded changeset of `rev`, or of the latest revision.
    pub fn get_revision_changeset(&self, pad_id: &str, rev: Option<i64>) -> Result<Option<String>> {
        let args = Args::new().with("padID", pad_id).with_opt("rev", rev);
        self.connection
            .get_object("getRevisionChangeset", &args)
            .and_then(into_text)
    }

    /// Returns `{html, authors}` describing the edits between two revisions.
    pub fn create_diff_html(&self, pad_id: &str, start_rev: i64, end_rev: i64) -> Result<JsonMap> {
        let args = Args::new()
            .with("padID", pad_id)
            .with("startRev", start_rev)
            .with("endRev", end_rev);
        self.connection.get("createDiffHTML", &args)
    }

    // -----------------------------------------------------------------------
    // Chat
    // -----------------------------------------------------------------------

    /// Chat messages of a pad, optionally limited to `(start, end)`.
    /// Returns `{messages: [...]}`.
    pub fn get_chat_history(&self, pad_id: &str, range: Option<(i64, i64)>) -> Result<JsonMap> {
        let mut args = Args::new().with("padID", pad_id);
        if let Some((start, end)) = range {
            args.insert("start", start);
            args.insert("end", end);
        }
        self.connection.get("getChatHistory", &args)
    }

    /// Returns `{chatHead}`.
    pub fn get_chat_head(&self, pad_id: &str) -> Result<JsonMap> {
        let args = Args::new().with("padID", pad_id);
        self.connection.get("getChatHead", &args)
    }

    /// Append a chat message. `time` is in milliseconds since the Unix epoch
    /// and defaults to the server's clock.
    pub fn append_chat_message(
        &self,
        pad_id: &str,
        text: &str,
        author_id: &str,
        time: Option<i64>,
    ) -> Result<JsonMap> {
        let args = Args::new()
            .with("padID", pad_id)
            .with("text", text)
            .with("authorID", author_id)
            .with_opt("time", time);
        self.connection.post("appendChatMessage", &args)
    }

    // -----------------------------------------------------------------------
    // Pads
    // -----------------------------------------------------------------------
    //
    // Group pads are named `GROUPID$PADNAME`; ordinary pad IDs may not
    // contain `$`.

    /// Returns `{padIDs: [...]}`.
    pub fn list_all_pads(&self) -> Result<JsonMap> {
        self.connection.get("listAllPads", &Args::new())
    }

    pub fn create_pad(&self, pad_id: &str, text: Option<&str>) -> Result<JsonMap> {
        let args = Args::new().with("padID", pad_id).with_opt("text", text);
        self.connection.post("createPad", &args)
    }

    /// Returns `{revisions}`.
    pub fn get_revisions_count(&self, pad_id: &str) -> Result<JsonMap> {
        let args = Args::new().with("padID", pad_id);
        self.connection.get("getRevisionsCount", &args)
    }

    /// Returns `{savedRevisions}`.
    pub fn get_saved_revisions_count(&self, pad_id: &str) -> Result<JsonMap> {
        let args = Args::new().with("padID", pad_id);
        self.connection.get("getSavedRevisionsCount", &args)
    }

    /// Returns `{savedRevisions: [...]}`.
    pub fn list_saved_revisions(&self, pad_id: &str) -> Result<JsonMap> {
        let args = Args::new().with("padID", pad_id);
        self.connection.get("listSavedRevisions", &args)
    }

    /// Mark `rev` (or the latest revision) as saved.
    pub fn save_revision(&self, pad_id: &str, rev: Option<i64>) -> Result<JsonMap> {
        let args = Args::new().with("padID", pad_id).with_opt("rev", rev);
        self.connection.post("saveRevision", &args)
    }

    /// Returns `{padUsersCount}`.
    pub fn pad_users_count(&self, pad_id: &str) -> Result<JsonMap> {
        let args = Args::new().with("padID", pad_id);
        self.connection.get("padUsersCount", &args)
    }

    /// Returns `{padUsers: [...]}`.
    pub fn pad_users(&self, pad_id: &str) -> Result<JsonMap> {
        let args = Args::new().with("padID", pad_id);
        self.connection.get("padUsers", &args)
    }

    pub fn delete_pad(&self, pad_id: &str) -> Result<JsonMap> {
        let args = Args::new().with("padID", pad_id);
        self.connection.post("deletePad", &args)
    }

    /// Copy a pad with its history. `force` (default false) overwrites an
    /// existing destination. Returns `{padID}`.
    pub fn copy_pad(
        &self,
        source_id: &str,
        destination_id: &str,
        force: Option<bool>,
    ) -> Result<JsonMap> {
        let args = pad_transfer_args(source_id, destination_id, force);
        self.connection.post("copyPad", &args)
    }

    /// Move a pad. `force` (default false) overwrites an existing destination.
    pub fn move_pad(
        &self,
        source_id: &str,
        destination_id: &str,
        force: Option<bool>,
    ) -> Result<JsonMap> {
        let args = pad_transfer_args(source_id, destination_id, force);
        self.connection.post("movePad", &args)
    }

    /// Returns `{readOnlyID}`.
    pub fn get_read_only_id(&self, pad_id: &str) -> Result<JsonMap> {
        let args = Args::new().with("padID", pad_id);
        self.connection.get("getReadOnlyID", &args)
    }

    /// Resolve a read-only ID back to its pad. Returns `{padID}`.
    pub fn get_pad_id(&self, read_only_id: &str) -> Result<JsonMap> {
        let args = Args::new().with("roID", read_only_id);
        self.connection.get("getPadID", &args)
    }

    /// Only applies to group pads.
    pub fn set_public_status(&self, pad_id: &str, public_status: bool) -> Result<JsonMap> {
        let args = Args::new()
            .with("padID", pad_id)
            .with("publicStatus", public_status);
        self.connection.post("setPublicStatus", &args)
    }

    /// Returns `{publicStatus}`.
    pub fn get_public_status(&self, pad_id: &str) -> Result<JsonMap> {
        let args = Args::new().with("padID", pad_id);
        self.connection.get("getPublicStatus", &args)
    }

    pub fn set_password(&self, pad_id: &str, password: &str) -> Result<JsonMap> {
        let args = Args::new().with("padID", pad_id).with("password", password);
        self.connection.post("setPassword", &args)
    }

    /// Returns `{isPasswordProtected}`.
    pub fn is_password_protected(&self, pad_id: &str) -> Result<JsonMap> {
        let args = Args::new().with("padID", pad_id);
        self.connection.get("isPasswordProtected", &args)
    }

    /// Returns `{authorIDs: [...]}`.
    pub fn list_authors_of_pad(&self, pad_id: &str) -> Result<JsonMap> {
        let args = Args::new().with("padID", pad_id);
        self.connection.get("listAuthorsOfPad", &args)
    }

    /// Returns `{lastEdited}` in milliseconds since the Unix epoch.
    pub fn get_last_edited(&self, pad_id: &str) -> Result<JsonMap> {
        let args = Args::new().with("padID", pad_id);
        self.connection.get("getLastEdited", &args)
    }

    /// Send a custom message to every client connected to the pad.
    pub fn send_clients_message(&self, pad_id: &str, msg: &str) -> Result<JsonMap> {
        let args = Args::new().with("padID", pad_id).with("msg", msg);
        self.connection.post("sendClientsMessage", &args)
    }

    /// Succeeds when the configured API key is accepted.
    pub fn check_token(&self) -> Result<()> {
        self.connection.get("checkToken", &Args::new()).map(|_| ())
    }
}

fn pad_transfer_args(source_id: &str, destination_id: &str, force: Option<bool>) -> Args {
    Args::new()
        .with("sourceID", source_id)
        .with("destinationID", destination_id)
        .with("force", force.unwrap_or(false))
}

fn into_text(value: Value) -> Result<Option<String>> {
    match value {
        Value::String(text) => Ok(Some(text)),
        Value::Null => Ok(None),
        other => Err(EtherpadError::UnexpectedResponse {
            code: Some(0),
            body: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::TimeZone;

    use super::*;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Replies with a canned body and records every request.
    #[derive(Default)]
    struct RecordingTransport {
        body: String,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl Transport for RecordingTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: self.body.clone(),
            })
        }
    }

    fn client_replying(body: &str) -> EtherpadClient<RecordingTransport> {
        let config = ClientConfig::builder()
            .base_url("http://localhost:9001/")
            .api_key("key")
            .api_version("1.2.13")
            .build()
            .unwrap();
        let transport = RecordingTransport {
            body: body.to_string(),
            ..Default::default()
        };
        EtherpadClient::with_transport(config, transport)
    }

    fn ok_client() -> EtherpadClient<RecordingTransport> {
        client_replying(r#"{"code":0,"message":"ok","data":null}"#)
    }

    fn last_request(client: &EtherpadClient<RecordingTransport>) -> HttpRequest {
        client
            .connection()
            .transport()
            .requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .unwrap()
    }

    /// Decode the key/value pairs of a GET query or POST body.
    fn params(request: &HttpRequest) -> HashMap<String, String> {
        let raw = match request.method {
            HttpMethod::Get => request.url.split_once('?').map(|(_, q)| q.to_string()).unwrap_or_default(),
            HttpMethod::Post => request.body.clone().unwrap_or_default(),
        };
        url::form_urlencoded::parse(raw.as_bytes()).into_owned().collect()
    }

    #[test]
    fn create_group_posts_only_apikey() {
        let client = ok_client();
        let result = client.create_group().unwrap();
        assert!(result.is_empty());
        let req = last_request(&client);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:9001/api/1.2.13/createGroup");
        assert_eq!(req.body.as_deref(), Some("apikey=key"));
    }

    #[test]
    fn list_pads_is_a_get_with_group_id() {
        let client = client_replying(r#"{"code":0,"message":"ok","data":{"padIDs":["g.x$a"]}}"#);
        let result = client.list_pads("g.x").unwrap();
        assert_eq!(result["padIDs"][0], "g.x$a");
        let req = last_request(&client);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.url,
            "http://localhost:9001/api/1.2.13/listPads?apikey=key&groupID=g.x"
        );
    }

    #[test]
    fn create_author_verb_depends_on_name() {
        let client = ok_client();
        client.create_author(None).unwrap();
        assert_eq!(last_request(&client).method, HttpMethod::Get);

        client.create_author(Some("Ada")).unwrap();
        let req = last_request(&client);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(params(&req)["name"], "Ada");
    }

    #[test]
    fn optional_text_is_omitted_when_absent() {
        let client = ok_client();
        client.create_group_pad("g.x", "notes", None).unwrap();
        assert!(!params(&last_request(&client)).contains_key("text"));

        client.create_group_pad("g.x", "notes", Some("hi")).unwrap();
        assert_eq!(params(&last_request(&client))["text"], "hi");
    }

    #[test]
    fn get_text_sends_rev_as_number() {
        let client = ok_client();
        client.get_text("pad", Some(27)).unwrap();
        let req = last_request(&client);
        assert!(req.url.ends_with("getText?apikey=key&padID=pad&rev=27"), "{}", req.url);
    }

    #[test]
    fn create_session_sends_epoch_seconds_as_string() {
        let client = ok_client();
        client.create_session_until("g.x", "a.y", 1_700_000_000).unwrap();
        let req = last_request(&client);
        assert_eq!(req.method, HttpMethod::Post);
        let params = params(&req);
        assert_eq!(params["validUntil"], "1700000000");
        assert_eq!(params["groupID"], "g.x");
        assert_eq!(params["authorID"], "a.y");
    }

    #[test]
    fn create_session_at_converts_calendar_time() {
        let client = ok_client();
        let at = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        client.create_session_at("g.x", "a.y", at).unwrap();
        assert_eq!(params(&last_request(&client))["validUntil"], at.timestamp().to_string());
    }

    #[test]
    fn create_session_for_hours_is_in_the_future() {
        let client = ok_client();
        let before = Utc::now().timestamp();
        client.create_session_for_hours("g.x", "a.y", 2).unwrap();
        let sent: i64 = params(&last_request(&client))["validUntil"].parse().unwrap();
        assert!(sent >= before + 7200);
        assert!(sent <= Utc::now().timestamp() + 7200);
    }

    #[test]
    fn copy_and_move_default_force_to_false() {
        let client = ok_client();
        client.copy_pad("src", "dst", None).unwrap();
        let req = last_request(&client);
        assert!(req.url.ends_with("/copyPad"));
        assert_eq!(params(&req)["force"], "false");

        client.move_pad("src", "dst", None).unwrap();
        let req = last_request(&client);
        assert!(req.url.ends_with("/movePad"));
        let params = params(&req);
        assert_eq!(params["force"], "false");
        assert_eq!(params["sourceID"], "src");
        assert_eq!(params["destinationID"], "dst");

        client.move_pad("src", "dst", Some(true)).unwrap();
        assert_eq!(last_request(&client).body.as_deref(), Some("apikey=key&destinationID=dst&force=true&sourceID=src"));
    }

    #[test]
    fn get_pad_id_uses_ro_id_param() {
        let client = ok_client();
        client.get_pad_id("r.abc").unwrap();
        assert_eq!(params(&last_request(&client))["roID"], "r.abc");
    }

    #[test]
    fn chat_history_range_is_optional() {
        let client = ok_client();
        client.get_chat_history("pad", None).unwrap();
        assert!(!params(&last_request(&client)).contains_key("start"));

        client.get_chat_history("pad", Some((0, 10))).unwrap();
        let params = params(&last_request(&client));
        assert_eq!(params["start"], "0");
        assert_eq!(params["end"], "10");
    }

    #[test]
    fn set_public_status_sends_boolean() {
        let client = ok_client();
        client.set_public_status("g.x$pad", true).unwrap();
        assert_eq!(params(&last_request(&client))["publicStatus"], "true");
    }

    #[test]
    fn author_name_is_returned_as_text() {
        let client = client_replying(r#"{"code":0,"message":"ok","data":"Ada"}"#);
        assert_eq!(client.get_author_name("a.x").unwrap().as_deref(), Some("Ada"));
    }

    #[test]
    fn revision_changeset_is_returned_as_text() {
        let client = client_replying(r#"{"code":0,"message":"ok","data":"Z:1>5*0+5$hello"}"#);
        assert_eq!(
            client.get_revision_changeset("pad", None).unwrap().as_deref(),
            Some("Z:1>5*0+5$hello")
        );
    }

    #[test]
    fn null_author_name_is_none() {
        let client = ok_client();
        assert_eq!(client.get_author_name("a.x").unwrap(), None);
    }

    #[test]
    fn null_revision_changeset_is_none() {
        let client = ok_client();
        assert_eq!(client.get_revision_changeset("pad", Some(3)).unwrap(), None);
    }

    #[test]
    fn non_text_author_name_is_unexpected() {
        let client = client_replying(r#"{"code":0,"message":"ok","data":{"name":"Ada"}}"#);
        let err = client.get_author_name("a.x").unwrap_err();
        assert!(matches!(err, EtherpadError::UnexpectedResponse { .. }));
    }

    #[test]
    fn api_errors_propagate_from_facade() {
        let client = client_replying(r#"{"code":1,"message":"padID does not exist","data":null}"#);
        let err = client.get_text("missing", None).unwrap_err();
        assert_eq!(err.to_string(), "padID does not exist");
    }

    #[test]
    fn check_token_discards_payload() {
        let client = ok_client();
        client.check_token().unwrap();
        assert!(last_request(&client).url.contains("/checkToken?apikey=key"));
    }

    #[test]
    fn is_secure_follows_port() {
        let secure = EtherpadClient::new("https://pads.example.com", "k").unwrap();
        assert!(secure.is_secure());
        let default_port = EtherpadClient::new("https://pads.example.com:443", "k").unwrap();
        assert!(default_port.is_secure());
        let explicit = EtherpadClient::new("http://pads.example.com:443/", "k").unwrap();
        assert!(explicit.is_secure());
        let plain = EtherpadClient::new("http://pads.example.com:9001", "k").unwrap();
        assert!(!plain.is_secure());
        let tls_other_port = EtherpadClient::new("https://pads.example.com:8443", "k").unwrap();
        assert!(!tls_other_port.is_secure());
    }
}
