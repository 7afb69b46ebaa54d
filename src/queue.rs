// Queue operations: count, access and navigation, place
use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actions::Action;
use crate::client::{PostOptions, SabreClient};
use crate::config::{env_lookup, resolve_pcc};
use crate::error::{ConfigError, Result};
use crate::response::{check_application_results, parse_number, parse_xml, FromSoapBody};
use crate::session::SessionContext;
use crate::soap::{lls_root, Envelope};
use crate::transport::Transport;

pub const QUEUE_COUNT_VERSION: &str = "2.2.1";
pub const QUEUE_ACCESS_VERSION: &str = "2.1.0";
pub const QUEUE_PLACE_VERSION: &str = "2.0.4";
pub const DEFAULT_PREFATORY_INSTRUCTION_CODE: &str = "11";

// Queue accessed last, reported in notifications of later navigation calls
#[derive(Debug, Default, Clone)]
pub(crate) struct QueueMeta {
    pub queue: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAction {
    Ignore,
    Remove,
    ExitIgnore,
}

impl NavigationAction {
    pub fn code(&self) -> &'static str {
        match self {
            NavigationAction::Ignore => "I",
            NavigationAction::Remove => "QR",
            NavigationAction::ExitIgnore => "QXI",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueueAccessOptions {
    pub number: String,
    pub pcc: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct QueuePlaceOptions {
    pub number: String,
    pub pcc: Option<String>,
    pub prefatory_instruction_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueCount {
    pub number: String,
    pub count: u32,
    pub pcc: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueCountResponse {
    pub queues: Vec<QueueCount>,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueNotification {
    pub queue: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueResponse {
    pub booking_id: String,
    pub notifications: Vec<QueueNotification>,
}

impl QueueResponse {
    fn new(booking_id: String, lines: &[String], queue: &str) -> Self {
        let notifications = lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(|line| QueueNotification {
                queue: queue.to_string(),
                message: line.to_string(),
            })
            .collect();
        Self {
            booking_id,
            notifications,
        }
    }
}

pub struct Queue<'a, T: Transport> {
    client: &'a mut SabreClient<T>,
}

impl<'a, T: Transport> Queue<'a, T> {
    pub(crate) fn new(client: &'a mut SabreClient<T>) -> Self {
        Self { client }
    }

    /// Counts the records waiting on every queue of a pseudo city.
    ///
    /// An omitted or empty `pcc` falls back to `SABRE_ORGANIZATION`.
    pub async fn count(&mut self, pcc: Option<&str>) -> Result<QueueCountResponse> {
        let pcc = resolve_pcc(pcc, env_lookup)?;
        self.client.set_action(Action::QueueCount);
        let xml = self
            .client
            .post(|ctx| count_request(ctx, &pcc), PostOptions::default())
            .await?;
        QueueCountResponse::from_soap_body(&xml)
    }

    pub async fn access(&mut self, options: QueueAccessOptions) -> Result<QueueResponse> {
        let pcc = resolve_pcc(options.pcc.as_deref(), env_lookup)?;
        if options.number.is_empty() {
            return Err(ConfigError::MissingParameter("number").into());
        }
        // the service routes access and navigation by the response-side id
        self.client.set_action(Action::QueueAccessResponse);
        let xml = self
            .client
            .post(
                |ctx| access_request(ctx, &options.number, &pcc),
                PostOptions::default(),
            )
            .await?;
        self.client.queue_meta.queue = options.number;
        debug!(queue = %self.client.queue_meta.queue, "queue accessed");
        self.access_response(&xml)
    }

    // Leaves the current record on the queue and moves to the next one
    pub async fn ignore(&mut self) -> Result<QueueResponse> {
        let xml = self.navigate(NavigationAction::Ignore).await?;
        self.access_response(&xml)
    }

    // Removes the current record from the queue and moves to the next one
    pub async fn remove(&mut self) -> Result<QueueResponse> {
        // QR drops the record; the "I" code would only skip past it
        let xml = self.navigate(NavigationAction::Remove).await?;
        self.access_response(&xml)
    }

    pub async fn exit(&mut self) -> Result<()> {
        self.navigate(NavigationAction::ExitIgnore).await?;
        self.client.queue_meta.queue.clear();
        Ok(())
    }

    pub async fn place(&mut self, options: QueuePlaceOptions) -> Result<QueueResponse> {
        let pcc = resolve_pcc(options.pcc.as_deref(), env_lookup)?;
        if options.number.is_empty() {
            return Err(ConfigError::MissingParameter("number").into());
        }
        let instruction = options
            .prefatory_instruction_code
            .as_deref()
            .filter(|code| !code.is_empty())
            .unwrap_or(DEFAULT_PREFATORY_INSTRUCTION_CODE);

        self.client.set_action(Action::QueuePlace);
        let xml = self
            .client
            .post(
                |ctx| place_request(ctx, &options.number, &pcc, instruction),
                PostOptions::default(),
            )
            .await?;

        let QueuePlaceResult { mut lines } = QueuePlaceResult::from_soap_body(&xml)?;
        // the confirmation line carries the locator; the rest are notices
        let booking_id = lines.pop().map(|line| find_booking_id(&line)).unwrap_or_default();
        Ok(QueueResponse::new(booking_id, &lines, &options.number))
    }

    async fn navigate(&mut self, action: NavigationAction) -> Result<String> {
        self.client.set_action(Action::QueueAccessResponse);
        self.client
            .post(|ctx| navigation_request(ctx, action), PostOptions::default())
            .await
    }

    fn access_response(&self, xml: &str) -> Result<QueueResponse> {
        let access = QueueAccessResult::from_soap_body(xml)?;
        Ok(QueueResponse::new(
            access.booking_id,
            &access.paragraph,
            &self.client.queue_meta.queue,
        ))
    }
}

pub fn count_request(context: &SessionContext<'_>, pcc: &str) -> String {
    let body = format!(
        r#"{}<QueueInfo><QueueIdentifier PseudoCityCode="{}"/></QueueInfo></QueueCountRQ>"#,
        lls_root("QueueCountRQ", QUEUE_COUNT_VERSION),
        escape(pcc)
    );
    Envelope::protected(Action::QueueCount, context, &body)
        .with_cpa_id(pcc)
        .render()
}

pub fn access_request(context: &SessionContext<'_>, number: &str, pcc: &str) -> String {
    let body = format!(
        r#"{}<QueueIdentifier Number="{}" PseudoCityCode="{}"/></QueueAccessRQ>"#,
        lls_root("QueueAccessRQ", QUEUE_ACCESS_VERSION),
        escape(number),
        escape(pcc)
    );
    Envelope::protected(Action::QueueAccess, context, &body)
        .with_cpa_id(pcc)
        .render()
}

pub fn navigation_request(context: &SessionContext<'_>, action: NavigationAction) -> String {
    let body = format!(
        r#"{}<Navigation Action="{}"/></QueueAccessRQ>"#,
        lls_root("QueueAccessRQ", QUEUE_ACCESS_VERSION),
        action.code()
    );
    Envelope::protected(Action::QueueAccess, context, &body).render()
}

pub fn place_request(
    context: &SessionContext<'_>,
    number: &str,
    pcc: &str,
    prefatory_instruction_code: &str,
) -> String {
    let body = format!(
        r#"{}<QueueInfo><QueueIdentifier Number="{}" PrefatoryInstructionCode="{}" PseudoCityCode="{}"/></QueueInfo></QueuePlaceRQ>"#,
        lls_root("QueuePlaceRQ", QUEUE_PLACE_VERSION),
        escape(number),
        escape(prefatory_instruction_code),
        escape(pcc)
    );
    Envelope::protected(Action::QueuePlace, context, &body)
        .with_cpa_id(pcc)
        .render()
}

/// Picks the record locator out of a confirmation line such as `OK 0612 ABC123`:
/// the last six-character token made of uppercase letters and digits.
pub fn find_booking_id(line: &str) -> String {
    line.split_whitespace()
        .rev()
        .find(|token| {
            token.len() == 6
                && token
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
                && token.chars().any(|c| c.is_ascii_uppercase())
        })
        .unwrap_or_default()
        .to_string()
}

// Structures for XML deserialization
#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct XmlQueueCountRS {
    queue_info: XmlQueueInfo,
    totals: Option<XmlTotals>,
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
struct XmlQueueInfo {
    #[serde(rename = "QueueIdentifier")]
    queue_identifiers: Vec<XmlQueueIdentifier>,
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
struct XmlQueueIdentifier {
    #[serde(rename = "@Number")]
    number: String,
    #[serde(rename = "@Count")]
    count: String,
    #[serde(rename = "@PseudoCityCode")]
    pseudo_city_code: String,
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
struct XmlTotals {
    #[serde(rename = "@Count")]
    count: String,
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct XmlQueueAccessRS {
    line: XmlLine,
    paragraph: XmlParagraph,
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
struct XmlLine {
    #[serde(rename = "@Number")]
    number: String,
    #[serde(rename = "UniqueID")]
    unique_id: XmlUniqueId,
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
struct XmlUniqueId {
    #[serde(rename = "@ID")]
    id: String,
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
struct XmlParagraph {
    #[serde(rename = "Text")]
    text: Vec<String>,
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
struct XmlQueuePlaceRS {
    #[serde(rename = "Text")]
    text: Vec<String>,
}

impl FromSoapBody for QueueCountResponse {
    fn from_soap_body(body: &str) -> Result<Self> {
        check_application_results(body)?;
        let rs: XmlQueueCountRS = parse_xml(body)?;

        let queues = rs
            .queue_info
            .queue_identifiers
            .into_iter()
            .map(|q| {
                Ok(QueueCount {
                    count: parse_number(&q.count, "queue count")?,
                    number: q.number,
                    pcc: q.pseudo_city_code,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let total: u32 = match rs.totals {
            Some(totals) if !totals.count.is_empty() => parse_number(&totals.count, "total")?,
            _ => queues.iter().map(|q| q.count).sum(),
        };

        Ok(Self { queues, total })
    }
}

#[derive(Debug, PartialEq)]
struct QueueAccessResult {
    booking_id: String,
    paragraph: Vec<String>,
}

impl FromSoapBody for QueueAccessResult {
    fn from_soap_body(body: &str) -> Result<Self> {
        check_application_results(body)?;
        let rs: XmlQueueAccessRS = parse_xml(body)?;
        Ok(Self {
            booking_id: rs.line.unique_id.id,
            paragraph: rs.paragraph.text,
        })
    }
}

#[derive(Debug, PartialEq)]
struct QueuePlaceResult {
    lines: Vec<String>,
}

impl FromSoapBody for QueuePlaceResult {
    fn from_soap_body(body: &str) -> Result<Self> {
        check_application_results(body)?;
        let rs: XmlQueuePlaceRS = parse_xml(body)?;
        Ok(Self { lines: rs.text })
    }
}
