// Daily sales report through DailySalesReportLLSRQ
use chrono::{NaiveDate, Utc};
use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::client::{PostOptions, SabreClient};
use crate::config::{env_lookup, resolve_pcc};
use crate::error::Result;
use crate::response::{check_application_results, parse_number, parse_xml, FromSoapBody};
use crate::session::SessionContext;
use crate::soap::{lls_root, Envelope};
use crate::transport::Transport;

pub const DAILY_SALES_VERSION: &str = "2.0.0";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default)]
pub struct DailySalesOptions {
    // Today (UTC) when omitted
    pub date: Option<NaiveDate>,
    pub pcc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesTransaction {
    pub ticket_number: String,
    pub booking_id: String,
    pub agent: String,
    pub kind: String,
    pub amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySalesReport {
    pub date: String,
    pub pcc: String,
    pub transactions: Vec<SalesTransaction>,
    pub total: f64,
}

pub struct DailySales<'a, T: Transport> {
    client: &'a mut SabreClient<T>,
}

impl<'a, T: Transport> DailySales<'a, T> {
    pub(crate) fn new(client: &'a mut SabreClient<T>) -> Self {
        Self { client }
    }

    /// Ticketing activity of one pseudo city for a single day.
    ///
    /// An omitted or empty `pcc` falls back to `SABRE_ORGANIZATION`.
    pub async fn report(&mut self, options: DailySalesOptions) -> Result<DailySalesReport> {
        let pcc = resolve_pcc(options.pcc.as_deref(), env_lookup)?;
        let date = options
            .date
            .unwrap_or_else(|| Utc::now().date_naive())
            .format(DATE_FORMAT)
            .to_string();

        self.client.set_action(Action::DailySalesReport);
        let xml = self
            .client
            .post(|ctx| report_request(ctx, &date, &pcc), PostOptions::default())
            .await?;
        DailySalesReport::from_soap_body(&xml)
    }
}

pub fn report_request(context: &SessionContext<'_>, date: &str, pcc: &str) -> String {
    let body = format!(
        r#"{}<SalesReport StartDate="{}"/></DailySalesReportRQ>"#,
        lls_root("DailySalesReportRQ", DAILY_SALES_VERSION),
        escape(date)
    );
    Envelope::protected(Action::DailySalesReport, context, &body)
        .with_cpa_id(pcc)
        .render()
}

// Structures for XML deserialization
#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct XmlDailySalesReportRS {
    sales_report: XmlSalesReport,
    totals: Option<XmlSalesTotals>,
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
struct XmlSalesReport {
    #[serde(rename = "@StartDate")]
    start_date: String,
    #[serde(rename = "@PseudoCityCode")]
    pseudo_city_code: String,
    #[serde(rename = "Transaction")]
    transactions: Vec<XmlTransaction>,
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
struct XmlTransaction {
    #[serde(rename = "@TicketNumber")]
    ticket_number: String,
    #[serde(rename = "@ItineraryRef")]
    itinerary_ref: String,
    #[serde(rename = "@AgentSine")]
    agent_sine: String,
    #[serde(rename = "@Type")]
    kind: String,
    #[serde(rename = "@Amount")]
    amount: String,
    #[serde(rename = "@CurrencyCode")]
    currency_code: String,
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
struct XmlSalesTotals {
    #[serde(rename = "@Amount")]
    amount: String,
}

impl FromSoapBody for DailySalesReport {
    fn from_soap_body(body: &str) -> Result<Self> {
        check_application_results(body)?;
        let rs: XmlDailySalesReportRS = parse_xml(body)?;

        let transactions = rs
            .sales_report
            .transactions
            .into_iter()
            .map(|t| {
                Ok(SalesTransaction {
                    amount: parse_number(&t.amount, "transaction amount")?,
                    ticket_number: t.ticket_number,
                    booking_id: t.itinerary_ref,
                    agent: t.agent_sine,
                    kind: t.kind,
                    currency: t.currency_code,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let total: f64 = match rs.totals {
            Some(totals) if !totals.amount.is_empty() => parse_number(&totals.amount, "total")?,
            _ => transactions.iter().map(|t| t.amount).sum(),
        };

        Ok(Self {
            date: rs.sales_report.start_date,
            pcc: rs.sales_report.pseudo_city_code,
            transactions,
            total,
        })
    }
}
