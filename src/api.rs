// API client module: a small blocking HTTP client for the GroupMe v3 API.
// Only the two read-only endpoints the harvester needs are wrapped, and
// every request carries the operator's token as a query parameter.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{Config, GROUPS_PER_PAGE, MESSAGES_PER_PAGE};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP status {0}")]
    Status(StatusCode),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A group the token holder belongs to. The API sends many more fields;
/// only these two are kept.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: String,
    pub name: String,
}

/// One chat message. `text` is null for attachment-only messages and
/// `name` is the sender's display name at the time of sending.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    #[serde(default, deserialize_with = "text_as_string")]
    pub text: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Strings pass through, null stays `None`, and any other JSON value is
/// kept as its JSON text so one odd message cannot fail a whole page.
fn text_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

/// Every GroupMe payload is wrapped in `{"response": ...}`.
#[derive(Deserialize, Debug)]
struct Envelope<T> {
    response: Option<T>,
}

#[derive(Deserialize, Debug, Default)]
struct MessagePage {
    #[serde(default)]
    messages: Vec<Message>,
}

/// Source of message history, newest first. `before_id` asks for the page
/// of messages strictly older than that message; `None` means "most recent".
///
/// An empty page means the history is exhausted.
pub trait MessageSource {
    fn fetch_messages(
        &self,
        group_id: &str,
        before_id: Option<&str>,
    ) -> Result<Vec<Message>, ApiError>;
}

/// Blocking client holding a reqwest client, the API base URL and the
/// token supplied by the operator.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder().build()?;
        Ok(ApiClient {
            client,
            base_url: config.api_base_url.clone(),
            token: None,
        })
    }

    /// Store the access token used for every subsequent call.
    pub fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    fn token(&self) -> &str {
        self.token.as_deref().unwrap_or_default()
    }

    /// Issue a GET and decode the enveloped JSON body. Any status other
    /// than 200 is an error; the body of a failed call is discarded.
    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, ApiError> {
        let res = self
            .client
            .get(url)
            .query(&[("token", self.token())])
            .query(query)
            .send()?;
        let status = res.status();
        if status != StatusCode::OK {
            return Err(ApiError::Status(status));
        }
        let body = res.text()?;
        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        Ok(envelope.response)
    }

    /// List the groups the token holder belongs to. Only the first page of
    /// up to 50 groups is requested.
    pub fn list_groups(&self) -> Result<Vec<Group>, ApiError> {
        let url = format!("{}/groups", self.base_url);
        let query = [("per_page", GROUPS_PER_PAGE.to_string())];
        let groups: Vec<Group> = self
            .get_json(&url, &query)
            .inspect_err(|e| warn!(error = %e, "listing groups failed"))?
            .unwrap_or_default();
        debug!(count = groups.len(), "groups listed");
        Ok(groups)
    }
}

impl MessageSource for ApiClient {
    /// Fetch one page of up to 100 messages. A 304 Not Modified is how the
    /// API says there is nothing older than `before_id`, so it is reported
    /// as an empty page.
    fn fetch_messages(
        &self,
        group_id: &str,
        before_id: Option<&str>,
    ) -> Result<Vec<Message>, ApiError> {
        let url = format!("{}/groups/{}/messages", self.base_url, group_id);
        let mut query = vec![("limit", MESSAGES_PER_PAGE.to_string())];
        if let Some(id) = before_id {
            query.push(("before_id", id.to_string()));
        }
        match self.get_json::<MessagePage>(&url, &query) {
            Ok(page) => Ok(page.unwrap_or_default().messages),
            Err(ApiError::Status(StatusCode::NOT_MODIFIED)) => Ok(Vec::new()),
            Err(e) => {
                warn!(group_id, before_id = ?before_id, error = %e, "fetching messages failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_tolerates_null_and_missing_fields() {
        let page: Envelope<MessagePage> = serde_json::from_str(
            r#"{"response":{"count":2,"messages":[
                {"id":"2","text":null,"name":"Alice","attachments":[]},
                {"id":"1"}
            ]}}"#,
        )
        .unwrap();
        let messages = page.response.unwrap().messages;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, None);
        assert_eq!(messages[0].name.as_deref(), Some("Alice"));
        assert_eq!(messages[1].name, None);
    }

    #[test]
    fn null_response_decodes_as_none() {
        let env: Envelope<Vec<Group>> =
            serde_json::from_str(r#"{"response":null,"meta":{"code":200}}"#).unwrap();
        assert!(env.response.is_none());
    }

    #[test]
    fn missing_response_decodes_as_none() {
        let env: Envelope<MessagePage> = serde_json::from_str(r#"{"meta":{"code":200}}"#).unwrap();
        assert!(env.response.is_none());
    }

    #[test]
    fn non_string_text_is_kept_as_json_text() {
        let page: Envelope<MessagePage> = serde_json::from_str(
            r#"{"response":{"messages":[
                {"id":"3","text":12345,"name":"Alice"},
                {"id":"2","text":true,"name":"Bob"},
                {"id":"1","text":"plain","name":"Carol"}
            ]}}"#,
        )
        .unwrap();
        let texts: Vec<_> = page
            .response
            .unwrap()
            .messages
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(
            texts,
            vec![Some("12345".to_string()), Some("true".into()), Some("plain".into())]
        );
    }

    #[test]
    fn group_ignores_extra_fields() {
        let env: Envelope<Vec<Group>> = serde_json::from_str(
            r#"{"response":[{"id":"42","name":"Alumni","members":[],"type":"private"}]}"#,
        )
        .unwrap();
        assert_eq!(
            env.response.unwrap(),
            vec![Group { id: "42".into(), name: "Alumni".into() }]
        );
    }
}
