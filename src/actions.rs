// SOAP action vocabulary used for the SOAPAction header and the eb:Action element
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    SessionCreate,
    TokenCreate,
    SessionClose,
    QueueCount,
    QueueAccess,
    QueuePlace,
    DisplayCurrency,
    DailySalesReport,
    // Response-side identifiers
    SessionCreateResponse,
    TokenCreateResponse,
    SessionCloseResponse,
    QueueCountResponse,
    QueueAccessResponse,
    QueuePlaceResponse,
    DisplayCurrencyResponse,
    DailySalesReportResponse,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown SOAP action: {0}")]
pub struct UnknownAction(pub String);

impl Action {
    pub const ALL: [Action; 16] = [
        Action::SessionCreate,
        Action::TokenCreate,
        Action::SessionClose,
        Action::QueueCount,
        Action::QueueAccess,
        Action::QueuePlace,
        Action::DisplayCurrency,
        Action::DailySalesReport,
        Action::SessionCreateResponse,
        Action::TokenCreateResponse,
        Action::SessionCloseResponse,
        Action::QueueCountResponse,
        Action::QueueAccessResponse,
        Action::QueuePlaceResponse,
        Action::DisplayCurrencyResponse,
        Action::DailySalesReportResponse,
    ];

    /// Wire identifier, sent verbatim.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::SessionCreate => "SessionCreateRQ",
            Action::TokenCreate => "TokenCreateRQ",
            Action::SessionClose => "SessionCloseRQ",
            Action::QueueCount => "QueueCountLLSRQ",
            Action::QueueAccess => "QueueAccessLLSRQ",
            Action::QueuePlace => "QueuePlaceLLSRQ",
            Action::DisplayCurrency => "DisplayCurrencyLLSRQ",
            Action::DailySalesReport => "DailySalesReportLLSRQ",
            Action::SessionCreateResponse => "SessionCreateRS",
            Action::TokenCreateResponse => "TokenCreateRS",
            Action::SessionCloseResponse => "SessionCloseRS",
            Action::QueueCountResponse => "QueueCountLLSRS",
            Action::QueueAccessResponse => "QueueAccessLLSRS",
            Action::QueuePlaceResponse => "QueuePlaceLLSRS",
            Action::DisplayCurrencyResponse => "DisplayCurrencyLLSRS",
            Action::DailySalesReportResponse => "DailySalesReportLLSRS",
        }
    }

    /// Response-side counterpart; response identifiers map to themselves.
    pub fn response(&self) -> Action {
        match self {
            Action::SessionCreate => Action::SessionCreateResponse,
            Action::TokenCreate => Action::TokenCreateResponse,
            Action::SessionClose => Action::SessionCloseResponse,
            Action::QueueCount => Action::QueueCountResponse,
            Action::QueueAccess => Action::QueueAccessResponse,
            Action::QueuePlace => Action::QueuePlaceResponse,
            Action::DisplayCurrency => Action::DisplayCurrencyResponse,
            Action::DailySalesReport => Action::DailySalesReportResponse,
            other => *other,
        }
    }

    pub fn is_response(&self) -> bool {
        self.response() == *self
    }

    // A completed call with one of these actions yields a fresh security token
    pub fn is_session_opening(&self) -> bool {
        matches!(self, Action::SessionCreate | Action::TokenCreate)
    }

    pub fn is_session_closing(&self) -> bool {
        matches!(self, Action::SessionClose)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("SessionCreateRQ", Action::SessionCreate; "session create")]
    #[test_case("TokenCreateRQ", Action::TokenCreate; "token create")]
    #[test_case("SessionCloseRQ", Action::SessionClose; "session close")]
    #[test_case("QueueAccessLLSRQ", Action::QueueAccess; "queue access")]
    #[test_case("DisplayCurrencyLLSRQ", Action::DisplayCurrency; "display currency")]
    #[test_case("DailySalesReportLLSRQ", Action::DailySalesReport; "daily sales report")]
    #[test_case("SessionCreateRS", Action::SessionCreateResponse; "session create response")]
    #[test_case("QueueAccessLLSRS", Action::QueueAccessResponse; "queue access response")]
    #[test_case("DailySalesReportLLSRS", Action::DailySalesReportResponse; "daily sales report response")]
    fn test_parse_wire_identifier(wire: &str, expected: Action) {
        assert_eq!(wire.parse::<Action>(), Ok(expected));
        assert_eq!(expected.to_string(), wire);
    }

    #[test]
    fn test_unknown_identifier_is_rejected() {
        let result = "sessioncreaterq".parse::<Action>();
        assert_eq!(result, Err(UnknownAction("sessioncreaterq".to_string())));
    }

    #[test]
    fn test_session_discriminants() {
        let opening: Vec<_> = Action::ALL
            .iter()
            .filter(|a| a.is_session_opening())
            .collect();
        assert_eq!(opening, vec![&Action::SessionCreate, &Action::TokenCreate]);

        let closing: Vec<_> = Action::ALL
            .iter()
            .filter(|a| a.is_session_closing())
            .collect();
        assert_eq!(closing, vec![&Action::SessionClose]);
    }

    #[test]
    fn test_response_counterparts() {
        let (requests, responses): (Vec<&Action>, Vec<&Action>) =
            Action::ALL.iter().partition(|a| !a.is_response());
        assert_eq!(requests.len(), 8);
        assert_eq!(responses.len(), 8);
        for request in requests {
            let response = request.response();
            assert!(response.is_response());
            assert_eq!(
                response.as_str(),
                format!("{}S", request.as_str().trim_end_matches('Q'))
            );
        }
    }

    #[test]
    fn test_wire_identifiers_are_unique() {
        let mut wire: Vec<_> = Action::ALL.iter().map(|a| a.as_str()).collect();
        wire.sort_unstable();
        wire.dedup();
        assert_eq!(wire.len(), Action::ALL.len());
    }
}
