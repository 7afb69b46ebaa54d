// Contract between extracted SOAP bodies and typed results
use std::fmt::Display;
use std::str::FromStr;

use quick_xml::de::from_str;
use serde::de::DeserializeOwned;

use crate::error::{Result, SabreError};
use crate::extract::{error_message, sub_string};

const APPLICATION_STATUS_OPEN: &str = r#"<stl:ApplicationResults status=""#;
const NOT_PROCESSED: &str = "NotProcessed";

pub trait FromSoapBody: Sized {
    fn from_soap_body(body: &str) -> Result<Self>;
}

pub fn parse_xml<T: DeserializeOwned>(body: &str) -> Result<T> {
    from_str(body.trim()).map_err(|e| SabreError::Parse(e.to_string()))
}

// Numeric attribute or element text; `field` names it in the error
pub fn parse_number<N>(value: &str, field: &str) -> Result<N>
where
    N: FromStr,
    N::Err: Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| SabreError::Parse(format!("invalid {field} '{value}': {e}")))
}

/// Detects the service's domain error block: `stl:ApplicationResults` with status
/// `NotProcessed`. Typed `<stl:Error type="...">` blocks end up here because the
/// dispatcher only matches the bare `<stl:Error>` marker.
pub fn check_application_results(body: &str) -> Result<()> {
    let status = sub_string(body, APPLICATION_STATUS_OPEN, "\"", false);
    if status != NOT_PROCESSED {
        return Ok(());
    }

    let message = match error_message(body) {
        "" => system_message(body).unwrap_or("request not processed"),
        message => message,
    };
    Err(SabreError::Application {
        message: message.to_string(),
    })
}

// <stl:Message code="..."> variant
fn system_message(body: &str) -> Option<&str> {
    let tag = sub_string(body, "<stl:Message ", "</stl:Message>", false);
    let (_, message) = tag.split_once('>')?;
    (!message.is_empty()).then_some(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(r#"<QueueCountRS><stl:ApplicationResults status="Complete"/></QueueCountRS>"#; "complete")]
    #[test_case("<QueueCountRS/>"; "no results block")]
    fn test_processed_bodies_pass(body: &str) {
        assert!(check_application_results(body).is_ok());
    }

    #[test_case(
        r#"<stl:ApplicationResults status="NotProcessed"><stl:Error type="BusinessLogic"><stl:SystemSpecificResults><stl:Message>NOPE</stl:Message></stl:SystemSpecificResults></stl:Error></stl:ApplicationResults>"#,
        "NOPE"; "plain message")]
    #[test_case(
        r#"<stl:ApplicationResults status="NotProcessed"><stl:Error type="BusinessLogic"><stl:SystemSpecificResults><stl:Message code="ERR.SWS">QUEUE EMPTY</stl:Message></stl:SystemSpecificResults></stl:Error></stl:ApplicationResults>"#,
        "QUEUE EMPTY"; "coded message")]
    #[test_case(
        r#"<stl:ApplicationResults status="NotProcessed"/>"#,
        "request not processed"; "no message")]
    fn test_not_processed_is_application_error(body: &str, expected: &str) {
        match check_application_results(body) {
            Err(SabreError::Application { message }) => assert_eq!(message, expected),
            other => panic!("expected application error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number::<u32>(" 12 ", "count").unwrap(), 12);
        assert_eq!(parse_number::<f64>("0.92", "rate").unwrap(), 0.92);
        match parse_number::<u32>("many", "count") {
            Err(SabreError::Parse(message)) => assert!(message.starts_with("invalid count 'many'")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
