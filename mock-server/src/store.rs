//! In-memory model of an Etherpad instance.
//!
//! `Store::call` takes an API method name plus its decoded parameters and
//! returns the `data` payload, or a `Failure` carrying the envelope code and
//! message. Nothing here knows about HTTP.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::Utc;
use serde_json::{json, Map, Value};
use uuid::Uuid;

pub const CODE_INVALID_PARAMETERS: i64 = 1;
pub const CODE_INVALID_METHOD: i64 = 3;
pub const CODE_INVALID_API_KEY: i64 = 4;

/// A failed call: envelope code plus message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub code: i64,
    pub message: String,
}

impl Failure {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            code: CODE_INVALID_PARAMETERS,
            message: message.into(),
        }
    }
}

type CallResult = Result<Value, Failure>;

/// Decoded request parameters from the query string and form body.
#[derive(Debug, Clone, Default)]
pub struct Params(HashMap<String, String>);

impl Params {
    pub fn new(map: HashMap<String, String>) -> Self {
        Self(map)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    fn required(&self, name: &str) -> Result<&str, Failure> {
        self.get(name)
            .ok_or_else(|| Failure::invalid(format!("{name} is required")))
    }

    fn int(&self, name: &str) -> Result<Option<i64>, Failure> {
        self.get(name)
            .map(|raw| {
                raw.parse::<i64>()
                    .map_err(|_| Failure::invalid(format!("{name} is not a number")))
            })
            .transpose()
    }

    fn required_int(&self, name: &str) -> Result<i64, Failure> {
        self.int(name)?
            .ok_or_else(|| Failure::invalid(format!("{name} is required")))
    }

    fn bool(&self, name: &str) -> Result<Option<bool>, Failure> {
        match self.get(name) {
            None => Ok(None),
            Some("true") => Ok(Some(true)),
            Some("false") => Ok(Some(false)),
            Some(_) => Err(Failure::invalid(format!("{name} is not a boolean"))),
        }
    }
}

#[derive(Debug, Clone)]
struct Revision {
    text: String,
    changeset: String,
    author: Option<String>,
}

#[derive(Debug, Clone)]
struct ChatMessage {
    text: String,
    author_id: String,
    time: i64,
}

#[derive(Debug, Clone)]
struct Pad {
    revisions: Vec<Revision>,
    saved: Vec<i64>,
    chat: Vec<ChatMessage>,
    public: bool,
    password: Option<String>,
    read_only_id: String,
    last_edited: i64,
}

impl Pad {
    fn new(text: &str) -> Self {
        let mut pad = Self {
            revisions: Vec::new(),
            saved: Vec::new(),
            chat: Vec::new(),
            public: false,
            password: None,
            read_only_id: random_id("r"),
            last_edited: now_millis(),
        };
        pad.push_text(text);
        pad
    }

    fn head(&self) -> i64 {
        self.revisions.len() as i64 - 1
    }

    fn text(&self) -> &str {
        self.revisions.last().map_or("\n", |rev| rev.text.as_str())
    }

    fn push_text(&mut self, text: &str) {
        let mut text = text.to_string();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        let old_len = self.text().chars().count();
        let changeset = changeset(old_len, &text);
        self.revisions.push(Revision {
            text,
            changeset,
            author: None,
        });
        self.last_edited = now_millis();
    }

    fn revision(&self, rev: Option<i64>) -> Result<&Revision, Failure> {
        let rev = self.checked_rev(rev)?;
        usize::try_from(rev)
            .ok()
            .and_then(|index| self.revisions.get(index))
            .ok_or_else(|| Failure::invalid("rev is not a valid revision"))
    }

    fn checked_rev(&self, rev: Option<i64>) -> Result<i64, Failure> {
        match rev {
            None => Ok(self.head()),
            Some(rev) if rev < 0 => Err(Failure::invalid("rev is a negative number")),
            Some(rev) if rev > self.head() => Err(Failure::invalid(
                "rev is higher than the head revision of the pad",
            )),
            Some(rev) => Ok(rev),
        }
    }
}

#[derive(Debug, Clone)]
struct Session {
    group_id: String,
    author_id: String,
    valid_until: i64,
}

impl Session {
    fn info(&self) -> Value {
        json!({
            "groupID": self.group_id,
            "authorID": self.author_id,
            "validUntil": self.valid_until,
        })
    }
}

/// Everything the server knows.
#[derive(Debug, Default)]
pub struct Store {
    groups: BTreeSet<String>,
    group_mappers: HashMap<String, String>,
    authors: BTreeMap<String, Option<String>>,
    author_mappers: HashMap<String, String>,
    sessions: BTreeMap<String, Session>,
    pads: BTreeMap<String, Pad>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute one API method.
    pub fn call(&mut self, method: &str, params: &Params) -> CallResult {
        match method {
            "checkToken" => Ok(Value::Null),

            "createGroup" => Ok(json!({ "groupID": self.create_group() })),
            "createGroupIfNotExistsFor" => self.create_group_if_not_exists_for(params),
            "deleteGroup" => self.delete_group(params),
            "listPads" => self.list_pads(params),
            "createGroupPad" => self.create_group_pad(params),
            "listAllGroups" => Ok(json!({ "groupIDs": self.groups })),

            "createAuthor" => Ok(json!({ "authorID": self.create_author(params.get("name")) })),
            "createAuthorIfNotExistsFor" => self.create_author_if_not_exists_for(params),
            "listPadsOfAuthor" => self.list_pads_of_author(params),
            "getAuthorName" => self.get_author_name(params),

            "createSession" => self.create_session(params),
            "deleteSession" => self.delete_session(params),
            "getSessionInfo" => self.get_session_info(params),
            "listSessionsOfGroup" => self.list_sessions_of_group(params),
            "listSessionsOfAuthor" => self.list_sessions_of_author(params),

            "getText" => self.get_text(params),
            "setText" => self.set_text(params),
            "appendText" => self.append_text(params),
            "getHTML" => self.get_html(params),
            "setHTML" => self.set_html(params),
            "getAttributePool" => self.get_attribute_pool(params),
            "getRevisionChangeset" => self.get_revision_changeset(params),
            "createDiffHTML" => self.create_diff_html(params),

            "getChatHistory" => self.get_chat_history(params),
            "getChatHead" => self.get_chat_head(params),
            "appendChatMessage" => self.append_chat_message(params),

            "listAllPads" => Ok(json!({ "padIDs": self.pads.keys().collect::<Vec<_>>() })),
            "createPad" => self.create_pad(params),
            "getRevisionsCount" => {
                let pad = self.pad(params)?;
                Ok(json!({ "revisions": pad.head() }))
            }
            "getSavedRevisionsCount" => {
                let pad = self.pad(params)?;
                Ok(json!({ "savedRevisions": pad.saved.len() }))
            }
            "listSavedRevisions" => {
                let pad = self.pad(params)?;
                Ok(json!({ "savedRevisions": pad.saved }))
            }
            "saveRevision" => self.save_revision(params),
            "padUsersCount" => {
                self.pad(params)?;
                Ok(json!({ "padUsersCount": 0 }))
            }
            "padUsers" => {
                self.pad(params)?;
                Ok(json!({ "padUsers": [] }))
            }
            "deletePad" => {
                let pad_id = self.pad_id(params)?;
                self.pads.remove(&pad_id);
                Ok(Value::Null)
            }
            "copyPad" => self.copy_pad(params, false),
            "movePad" => self.copy_pad(params, true),
            "getReadOnlyID" => {
                let pad = self.pad(params)?;
                Ok(json!({ "readOnlyID": pad.read_only_id }))
            }
            "getPadID" => self.get_pad_id(params),
            "setPublicStatus" => self.set_public_status(params),
            "getPublicStatus" => {
                let pad = self.group_pad(params)?;
                Ok(json!({ "publicStatus": pad.public }))
            }
            "setPassword" => self.set_password(params),
            "isPasswordProtected" => {
                let pad = self.group_pad(params)?;
                Ok(json!({ "isPasswordProtected": pad.password.is_some() }))
            }
            "listAuthorsOfPad" => {
                let pad = self.pad(params)?;
                let authors: BTreeSet<&String> =
                    pad.revisions.iter().filter_map(|rev| rev.author.as_ref()).collect();
                Ok(json!({ "authorIDs": authors }))
            }
            "getLastEdited" => {
                let pad = self.pad(params)?;
                Ok(json!({ "lastEdited": pad.last_edited }))
            }
            "sendClientsMessage" => {
                self.pad(params)?;
                Ok(Value::Null)
            }

            _ => Err(Failure {
                code: CODE_INVALID_METHOD,
                message: "no such function".to_string(),
            }),
        }
    }

    // --- groups ---

    fn create_group(&mut self) -> String {
        let group_id = random_id("g");
        self.groups.insert(group_id.clone());
        group_id
    }

    fn create_group_if_not_exists_for(&mut self, params: &Params) -> CallResult {
        let mapper = params.required("groupMapper")?;
        let group_id = match self.group_mappers.get(mapper) {
            Some(existing) if self.groups.contains(existing) => existing.clone(),
            _ => {
                let group_id = self.create_group();
                self.group_mappers.insert(mapper.to_string(), group_id.clone());
                group_id
            }
        };
        Ok(json!({ "groupID": group_id }))
    }

    fn group_id(&self, params: &Params) -> Result<String, Failure> {
        let group_id = params.required("groupID")?;
        if !self.groups.contains(group_id) {
            return Err(Failure::invalid("groupID does not exist"));
        }
        Ok(group_id.to_string())
    }

    fn delete_group(&mut self, params: &Params) -> CallResult {
        let group_id = self.group_id(params)?;
        let prefix = format!("{group_id}$");
        self.pads.retain(|pad_id, _| !pad_id.starts_with(&prefix));
        self.sessions.retain(|_, session| session.group_id != group_id);
        self.group_mappers.retain(|_, mapped| *mapped != group_id);
        self.groups.remove(&group_id);
        Ok(Value::Null)
    }

    fn list_pads(&self, params: &Params) -> CallResult {
        let group_id = self.group_id(params)?;
        let prefix = format!("{group_id}$");
        let pad_ids: Vec<&String> = self
            .pads
            .keys()
            .filter(|pad_id| pad_id.starts_with(&prefix))
            .collect();
        Ok(json!({ "padIDs": pad_ids }))
    }

    fn create_group_pad(&mut self, params: &Params) -> CallResult {
        let group_id = self.group_id(params)?;
        let pad_name = params.required("padName")?;
        let pad_id = format!("{group_id}${pad_name}");
        if self.pads.contains_key(&pad_id) {
            return Err(Failure::invalid("padName does already exist"));
        }
        self.pads
            .insert(pad_id.clone(), Pad::new(params.get("text").unwrap_or_default()));
        Ok(json!({ "padID": pad_id }))
    }

    // --- authors ---

    fn create_author(&mut self, name: Option<&str>) -> String {
        let author_id = random_id("a");
        self.authors
            .insert(author_id.clone(), name.map(str::to_string));
        author_id
    }

    fn create_author_if_not_exists_for(&mut self, params: &Params) -> CallResult {
        let mapper = params.required("authorMapper")?;
        let name = params.get("name");
        let author_id = match self.author_mappers.get(mapper).cloned() {
            Some(existing) => {
                if let Some(name) = name {
                    self.authors.insert(existing.clone(), Some(name.to_string()));
                }
                existing
            }
            None => {
                let author_id = self.create_author(name);
                self.author_mappers.insert(mapper.to_string(), author_id.clone());
                author_id
            }
        };
        Ok(json!({ "authorID": author_id }))
    }

    fn author_id(&self, params: &Params) -> Result<String, Failure> {
        let author_id = params.required("authorID")?;
        if !self.authors.contains_key(author_id) {
            return Err(Failure::invalid("authorID does not exist"));
        }
        Ok(author_id.to_string())
    }

    fn list_pads_of_author(&self, params: &Params) -> CallResult {
        let author_id = self.author_id(params)?;
        let pad_ids: Vec<&String> = self
            .pads
            .iter()
            .filter(|(_, pad)| {
                pad.revisions
                    .iter()
                    .any(|rev| rev.author.as_deref() == Some(author_id.as_str()))
                    || pad.chat.iter().any(|msg| msg.author_id == author_id)
            })
            .map(|(pad_id, _)| pad_id)
            .collect();
        Ok(json!({ "padIDs": pad_ids }))
    }

    fn get_author_name(&self, params: &Params) -> CallResult {
        let author_id = self.author_id(params)?;
        Ok(self
            .authors
            .get(&author_id)
            .cloned()
            .flatten()
            .map_or(Value::Null, Value::String))
    }

    // --- sessions ---

    fn create_session(&mut self, params: &Params) -> CallResult {
        let group_id = self.group_id(params)?;
        let author_id = self.author_id(params)?;
        let valid_until = params.required_int("validUntil")?;
        if valid_until < 0 {
            return Err(Failure::invalid("validUntil is a negative number"));
        }
        if valid_until < Utc::now().timestamp() {
            return Err(Failure::invalid("validUntil is in the past"));
        }
        let session_id = random_id("s");
        self.sessions.insert(
            session_id.clone(),
            Session {
                group_id,
                author_id,
                valid_until,
            },
        );
        Ok(json!({ "sessionID": session_id }))
    }

    fn session_id(&self, params: &Params) -> Result<String, Failure> {
        let session_id = params.required("sessionID")?;
        if !self.sessions.contains_key(session_id) {
            return Err(Failure::invalid("sessionID does not exist"));
        }
        Ok(session_id.to_string())
    }

    fn delete_session(&mut self, params: &Params) -> CallResult {
        let session_id = self.session_id(params)?;
        self.sessions.remove(&session_id);
        Ok(Value::Null)
    }

    fn get_session_info(&self, params: &Params) -> CallResult {
        let session_id = self.session_id(params)?;
        Ok(self.sessions.get(&session_id).map_or(Value::Null, Session::info))
    }

    fn list_sessions_of_group(&self, params: &Params) -> CallResult {
        let group_id = self.group_id(params)?;
        Ok(self.sessions_where(|session| session.group_id == group_id))
    }

    fn list_sessions_of_author(&self, params: &Params) -> CallResult {
        let author_id = self.author_id(params)?;
        Ok(self.sessions_where(|session| session.author_id == author_id))
    }

    fn sessions_where(&self, keep: impl Fn(&Session) -> bool) -> Value {
        let sessions: Map<String, Value> = self
            .sessions
            .iter()
            .filter(|(_, session)| keep(session))
            .map(|(id, session)| (id.clone(), session.info()))
            .collect();
        Value::Object(sessions)
    }

    // --- pad content ---

    fn pad_id(&self, params: &Params) -> Result<String, Failure> {
        let pad_id = params.required("padID")?;
        if !self.pads.contains_key(pad_id) {
            return Err(Failure::invalid("padID does not exist"));
        }
        Ok(pad_id.to_string())
    }

    fn pad(&self, params: &Params) -> Result<&Pad, Failure> {
        let pad_id = self.pad_id(params)?;
        self.pads
            .get(&pad_id)
            .ok_or_else(|| Failure::invalid("padID does not exist"))
    }

    fn pad_mut(&mut self, params: &Params) -> Result<&mut Pad, Failure> {
        let pad_id = self.pad_id(params)?;
        self.pads
            .get_mut(&pad_id)
            .ok_or_else(|| Failure::invalid("padID does not exist"))
    }

    fn group_pad(&self, params: &Params) -> Result<&Pad, Failure> {
        let pad_id = self.pad_id(params)?;
        if !pad_id.contains('$') {
            return Err(Failure::invalid(
                "You can only get/set the publicStatus of pads that belong to a group",
            ));
        }
        self.pad(params)
    }

    fn get_text(&self, params: &Params) -> CallResult {
        let pad = self.pad(params)?;
        let revision = pad.revision(params.int("rev")?)?;
        Ok(json!({ "text": revision.text }))
    }

    fn set_text(&mut self, params: &Params) -> CallResult {
        let text = params.required("text")?.to_string();
        self.pad_mut(params)?.push_text(&text);
        Ok(Value::Null)
    }

    fn append_text(&mut self, params: &Params) -> CallResult {
        let appended = params.required("text")?;
        let pad = self.pad_mut(params)?;
        let text = format!("{}{appended}", pad.text());
        pad.push_text(&text);
        Ok(Value::Null)
    }

    fn get_html(&self, params: &Params) -> CallResult {
        let pad = self.pad(params)?;
        let revision = pad.revision(params.int("rev")?)?;
        Ok(json!({ "html": document_html(&revision.text) }))
    }

    fn set_html(&mut self, params: &Params) -> CallResult {
        let html = params.required("html")?;
        let text = html_to_text(html);
        self.pad_mut(params)?.push_text(&text);
        Ok(Value::Null)
    }

    fn get_attribute_pool(&self, params: &Params) -> CallResult {
        self.pad(params)?;
        Ok(json!({
            "pool": {
                "numToAttrib": { "0": ["author", ""] },
                "attribToNum": { "author,": 0 },
                "nextNum": 1,
            }
        }))
    }

    fn get_revision_changeset(&self, params: &Params) -> CallResult {
        let pad = self.pad(params)?;
        let revision = pad.revision(params.int("rev")?)?;
        Ok(Value::String(revision.changeset.clone()))
    }

    fn create_diff_html(&self, params: &Params) -> CallResult {
        let pad = self.pad(params)?;
        let start = pad.checked_rev(Some(params.required_int("startRev")?))?;
        let end = pad.checked_rev(Some(params.required_int("endRev")?))?;
        if start > end {
            return Err(Failure::invalid("startRev is higher than endRev"));
        }
        let revision = pad.revision(Some(end))?;
        let authors: BTreeSet<&String> = pad
            .revisions
            .iter()
            .skip(usize::try_from(start).unwrap_or_default())
            .take(usize::try_from(end - start + 1).unwrap_or_default())
            .filter_map(|rev| rev.author.as_ref())
            .collect();
        Ok(json!({
            "html": format!("<style>\n.removed {{text-decoration: line-through;}}\n</style>{}", body_html(&revision.text)),
            "authors": authors,
        }))
    }

    // --- chat ---

    fn get_chat_history(&self, params: &Params) -> CallResult {
        let pad = self.pad(params)?;
        let len = pad.chat.len() as i64;
        let (start, end) = match (params.int("start")?, params.int("end")?) {
            (None, None) => (0, len - 1),
            (Some(start), Some(end)) => {
                if start < 0 || end < 0 {
                    return Err(Failure::invalid("start or end is negative"));
                }
                if start > end {
                    return Err(Failure::invalid("start is higher than end"));
                }
                if end >= len {
                    return Err(Failure::invalid(
                        "end is higher or equal to the current chatHead",
                    ));
                }
                (start, end)
            }
            _ => return Err(Failure::invalid("start and end must be given together")),
        };
        let messages: Vec<Value> = pad
            .chat
            .iter()
            .enumerate()
            .filter(|(i, _)| (start..=end).contains(&(*i as i64)))
            .map(|(_, msg)| {
                json!({
                    "text": msg.text,
                    "userId": msg.author_id,
                    "time": msg.time,
                    "userName": self.authors.get(&msg.author_id).cloned().flatten(),
                })
            })
            .collect();
        Ok(json!({ "messages": messages }))
    }

    fn get_chat_head(&self, params: &Params) -> CallResult {
        let pad = self.pad(params)?;
        Ok(json!({ "chatHead": pad.chat.len() as i64 - 1 }))
    }

    fn append_chat_message(&mut self, params: &Params) -> CallResult {
        let text = params.required("text")?.to_string();
        let author_id = params.required("authorID")?.to_string();
        let time = params.int("time")?.unwrap_or_else(now_millis);
        self.pad_mut(params)?.chat.push(ChatMessage {
            text,
            author_id,
            time,
        });
        Ok(Value::Null)
    }

    // --- pads ---

    fn create_pad(&mut self, params: &Params) -> CallResult {
        let pad_id = params.required("padID")?;
        if pad_id.contains('$') {
            return Err(Failure::invalid("createPad can't create group pads"));
        }
        if self.pads.contains_key(pad_id) {
            return Err(Failure::invalid("padID does already exist"));
        }
        self.pads
            .insert(pad_id.to_string(), Pad::new(params.get("text").unwrap_or_default()));
        Ok(Value::Null)
    }

    fn save_revision(&mut self, params: &Params) -> CallResult {
        let rev = params.int("rev")?;
        let pad = self.pad_mut(params)?;
        let rev = pad.checked_rev(rev)?;
        if !pad.saved.contains(&rev) {
            pad.saved.push(rev);
            pad.saved.sort_unstable();
        }
        Ok(Value::Null)
    }

    fn copy_pad(&mut self, params: &Params, remove_source: bool) -> CallResult {
        let source_id = params.required("sourceID")?.to_string();
        let destination_id = params.required("destinationID")?.to_string();
        let force = params.bool("force")?.unwrap_or(false);
        let Some(source) = self.pads.get(&source_id) else {
            return Err(Failure::invalid("padID does not exist"));
        };
        if self.pads.contains_key(&destination_id) && !force {
            return Err(Failure::invalid("destinationID already exists"));
        }
        if let Some((group_id, _)) = destination_id.split_once('$') {
            if !self.groups.contains(group_id) {
                return Err(Failure::invalid("groupID does not exist for destinationID"));
            }
        }

        let mut copy = source.clone();
        copy.read_only_id = random_id("r");
        self.pads.insert(destination_id.clone(), copy);

        if remove_source {
            self.pads.remove(&source_id);
            return Ok(Value::Null);
        }
        Ok(json!({ "padID": destination_id }))
    }

    fn get_pad_id(&self, params: &Params) -> CallResult {
        let read_only_id = params.required("roID")?;
        self.pads
            .iter()
            .find(|(_, pad)| pad.read_only_id == read_only_id)
            .map(|(pad_id, _)| json!({ "padID": pad_id }))
            .ok_or_else(|| Failure::invalid("padID does not exist"))
    }

    fn set_public_status(&mut self, params: &Params) -> CallResult {
        let public = params
            .bool("publicStatus")?
            .ok_or_else(|| Failure::invalid("publicStatus is required"))?;
        self.group_pad(params)?;
        self.pad_mut(params)?.public = public;
        Ok(Value::Null)
    }

    fn set_password(&mut self, params: &Params) -> CallResult {
        let password = params.get("password").filter(|p| !p.is_empty()).map(str::to_string);
        self.group_pad(params)?;
        self.pad_mut(params)?.password = password;
        Ok(Value::Null)
    }
}

fn random_id(prefix: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{prefix}.{}", &id[..16])
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// A changeset-shaped summary of replacing the whole text.
fn changeset(old_len: usize, text: &str) -> String {
    let new_len = text.chars().count();
    let op = if new_len >= old_len {
        format!(">{:x}", new_len - old_len)
    } else {
        format!("<{:x}", old_len - new_len)
    };
    format!("Z:{old_len:x}{op}|1-{old_len:x}|1+{new_len:x}${text}")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c if c.is_ascii() => out.push(c),
            c => out.push_str(&format!("&#{};", u32::from(c))),
        }
    }
    out
}

fn body_html(text: &str) -> String {
    text.split('\n')
        .map(escape_html)
        .collect::<Vec<_>>()
        .join("<br>")
}

fn document_html(text: &str) -> String {
    format!("<!DOCTYPE HTML><html><body>{}</body></html>", body_html(text))
}

/// Strip markup, turning line breaks into newlines.
fn html_to_text(html: &str) -> String {
    let html = html
        .replace("<br>", "\n")
        .replace("<br/>", "\n")
        .replace("<br />", "\n");
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        Params::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn unknown_method_is_code_3() {
        let err = Store::new().call("frobnicate", &Params::default()).unwrap_err();
        assert_eq!(err.code, CODE_INVALID_METHOD);
    }

    #[test]
    fn text_always_ends_with_newline() {
        let mut store = Store::new();
        store.call("createPad", &params(&[("padID", "p"), ("text", "hi")])).unwrap();
        let data = store.call("getText", &params(&[("padID", "p")])).unwrap();
        assert_eq!(data["text"], "hi\n");
    }

    #[test]
    fn group_mapper_is_idempotent() {
        let mut store = Store::new();
        let first = store
            .call("createGroupIfNotExistsFor", &params(&[("groupMapper", "team")]))
            .unwrap();
        let second = store
            .call("createGroupIfNotExistsFor", &params(&[("groupMapper", "team")]))
            .unwrap();
        assert_eq!(first, second);
        assert!(first["groupID"].as_str().unwrap().starts_with("g."));
    }

    #[test]
    fn group_pads_are_deleted_with_group() {
        let mut store = Store::new();
        let group_id = store.create_group();
        store
            .call("createGroupPad", &params(&[("groupID", &group_id), ("padName", "notes")]))
            .unwrap();
        store.call("deleteGroup", &params(&[("groupID", &group_id)])).unwrap();
        let all = store.call("listAllPads", &Params::default()).unwrap();
        assert_eq!(all["padIDs"], json!([]));
    }

    #[test]
    fn rev_past_head_is_rejected() {
        let mut store = Store::new();
        store.call("createPad", &params(&[("padID", "p")])).unwrap();
        let err = store
            .call("getText", &params(&[("padID", "p"), ("rev", "5")]))
            .unwrap_err();
        assert_eq!(err.code, CODE_INVALID_PARAMETERS);
    }

    #[test]
    fn copy_without_force_refuses_existing_destination() {
        let mut store = Store::new();
        store.call("createPad", &params(&[("padID", "a")])).unwrap();
        store.call("createPad", &params(&[("padID", "b")])).unwrap();
        let args = [("sourceID", "a"), ("destinationID", "b"), ("force", "false")];
        assert!(store.call("copyPad", &params(&args)).is_err());
        let args = [("sourceID", "a"), ("destinationID", "b"), ("force", "true")];
        assert!(store.call("copyPad", &params(&args)).is_ok());
    }

    #[test]
    fn html_round_trips_through_text() {
        assert_eq!(html_to_text("a<b>b</b><br>c &amp; d"), "ab\nc & d");
        assert_eq!(document_html("gå\n"), "<!DOCTYPE HTML><html><body>g&#229;<br></body></html>");
    }
}
