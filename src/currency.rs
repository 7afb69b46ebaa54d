// Currency conversion through DisplayCurrencyLLSRQ
use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::client::{PostOptions, SabreClient};
use crate::error::{ConfigError, Result};
use crate::response::{check_application_results, parse_number, parse_xml, FromSoapBody};
use crate::session::SessionContext;
use crate::soap::{lls_root, Envelope};
use crate::transport::Transport;

pub const DISPLAY_CURRENCY_VERSION: &str = "2.1.0";

#[derive(Debug, Clone, Default)]
pub struct CurrencyConversionOptions {
    // ISO 4217 codes
    pub from: String,
    pub to: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyConversion {
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub amount: f64,
}

pub struct Currency<'a, T: Transport> {
    client: &'a mut SabreClient<T>,
}

impl<'a, T: Transport> Currency<'a, T> {
    pub(crate) fn new(client: &'a mut SabreClient<T>) -> Self {
        Self { client }
    }

    pub async fn convert(&mut self, options: CurrencyConversionOptions) -> Result<CurrencyConversion> {
        if options.from.is_empty() {
            return Err(ConfigError::MissingParameter("from").into());
        }
        if options.to.is_empty() {
            return Err(ConfigError::MissingParameter("to").into());
        }

        self.client.set_action(Action::DisplayCurrency);
        let xml = self
            .client
            .post(
                |ctx| conversion_request(ctx, &options),
                PostOptions::default(),
            )
            .await?;
        CurrencyConversion::from_soap_body(&xml)
    }
}

pub fn conversion_request(context: &SessionContext<'_>, options: &CurrencyConversionOptions) -> String {
    let body = format!(
        "{}<OriginDestinationInformation><FromCurrency>{}</FromCurrency><ToCurrency>{}</ToCurrency></OriginDestinationInformation><Amount>{}</Amount></DisplayCurrencyRQ>",
        lls_root("DisplayCurrencyRQ", DISPLAY_CURRENCY_VERSION),
        escape(&options.from),
        escape(&options.to),
        options.amount
    );
    Envelope::protected(Action::DisplayCurrency, context, &body).render()
}

// Structures for XML deserialization
#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct XmlDisplayCurrencyRS {
    origin_destination_information: XmlOriginDestination,
    rate: String,
    amount: String,
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct XmlOriginDestination {
    from_currency: String,
    to_currency: String,
}

impl FromSoapBody for CurrencyConversion {
    fn from_soap_body(body: &str) -> Result<Self> {
        check_application_results(body)?;
        let rs: XmlDisplayCurrencyRS = parse_xml(body)?;
        Ok(Self {
            rate: parse_number(&rs.rate, "rate")?,
            amount: parse_number(&rs.amount, "amount")?,
            from: rs.origin_destination_information.from_currency,
            to: rs.origin_destination_information.to_currency,
        })
    }
}
