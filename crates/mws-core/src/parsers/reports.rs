//! RequestReport and GetReportRequestList.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::DecodeError;

use super::fields::{self, text};
use super::{from_xml, Decode};

#[derive(Debug, Deserialize)]
struct RequestReportEnvelope {
    #[serde(rename = "RequestReportResult", default)]
    result: Option<RequestReportResult>,
}

#[derive(Debug, Deserialize)]
struct RequestReportResult {
    #[serde(rename = "ReportRequestInfo", default)]
    info: Option<RawInfo>,
}

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    #[serde(rename = "GetReportRequestListResult", default)]
    result: Option<ListResult>,
}

#[derive(Debug, Deserialize)]
struct ListResult {
    #[serde(rename = "NextToken", default)]
    next_token: Option<String>,
    #[serde(rename = "HasNext", default)]
    has_next: Option<String>,
    #[serde(rename = "ReportRequestInfo", default)]
    infos: Vec<RawInfo>,
}

#[derive(Debug, Deserialize)]
struct RawInfo {
    #[serde(rename = "ReportRequestId", default)]
    report_request_id: Option<String>,
    #[serde(rename = "ReportType", default)]
    report_type: Option<String>,
    #[serde(rename = "StartDate", default)]
    start_date: Option<String>,
    #[serde(rename = "EndDate", default)]
    end_date: Option<String>,
    #[serde(rename = "Scheduled", default)]
    scheduled: Option<String>,
    #[serde(rename = "SubmittedDate", default)]
    submitted_date: Option<String>,
    #[serde(rename = "ReportProcessingStatus", default)]
    processing_status: Option<String>,
    #[serde(rename = "GeneratedReportId", default)]
    generated_report_id: Option<String>,
    #[serde(rename = "StartedProcessingDate", default)]
    started_processing_date: Option<String>,
    #[serde(rename = "CompletedDate", default)]
    completed_date: Option<String>,
}

/// State of one report request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequestInfo {
    pub report_request_id: String,
    pub report_type: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub scheduled: bool,
    pub submitted_date: Option<DateTime<Utc>>,
    /// e.g. `_SUBMITTED_`, `_IN_PROGRESS_`, `_DONE_`.
    pub processing_status: String,
    /// Set once the report is done; pass to `GetReport`.
    pub generated_report_id: Option<String>,
    pub started_processing_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
}

impl ReportRequestInfo {
    pub fn is_done(&self) -> bool {
        self.processing_status == "_DONE_"
    }

    fn from_raw(what: &'static str, raw: RawInfo) -> Result<Self, DecodeError> {
        let ts = |field, value: &Option<String>| {
            fields::parse_opt_timestamp(what, field, value.as_deref())
        };
        Ok(Self {
            start_date: ts("StartDate", &raw.start_date)?,
            end_date: ts("EndDate", &raw.end_date)?,
            submitted_date: ts("SubmittedDate", &raw.submitted_date)?,
            started_processing_date: ts("StartedProcessingDate", &raw.started_processing_date)?,
            completed_date: ts("CompletedDate", &raw.completed_date)?,
            report_request_id: text(raw.report_request_id).unwrap_or_default(),
            report_type: text(raw.report_type).unwrap_or_default(),
            scheduled: raw.scheduled.as_deref().is_some_and(fields::parse_bool),
            processing_status: text(raw.processing_status).unwrap_or_default(),
            generated_report_id: text(raw.generated_report_id),
        })
    }
}

/// Decodes a `RequestReport` response into its single request info.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRequestInfoDecoder;

impl Decode for ReportRequestInfoDecoder {
    type Record = ReportRequestInfo;

    fn decode_result(&self, payload: &[u8]) -> Result<Vec<ReportRequestInfo>, DecodeError> {
        const WHAT: &str = "RequestReport";
        let envelope: RequestReportEnvelope = from_xml(WHAT, payload)?;
        envelope
            .result
            .and_then(|r| r.info)
            .map(|info| ReportRequestInfo::from_raw(WHAT, info))
            .into_iter()
            .collect()
    }
}

/// One page of `GetReportRequestList`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequestPage {
    pub next_token: Option<String>,
    pub has_next: bool,
    pub infos: Vec<ReportRequestInfo>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRequestListDecoder;

impl Decode for ReportRequestListDecoder {
    type Record = ReportRequestPage;

    fn decode_result(&self, payload: &[u8]) -> Result<Vec<ReportRequestPage>, DecodeError> {
        const WHAT: &str = "GetReportRequestList";
        let envelope: ListEnvelope = from_xml(WHAT, payload)?;
        let Some(result) = envelope.result else {
            return Ok(Vec::new());
        };
        let infos = result
            .infos
            .into_iter()
            .map(|info| ReportRequestInfo::from_raw(WHAT, info))
            .collect::<Result<_, _>>()?;
        Ok(vec![ReportRequestPage {
            next_token: text(result.next_token),
            has_next: result.has_next.as_deref().is_some_and(fields::parse_bool),
            infos,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_request_report_info() {
        let xml = r#"<?xml version="1.0"?>
<RequestReportResponse xmlns="http://mws.amazonaws.com/doc/2009-01-01/">
  <RequestReportResult>
    <ReportRequestInfo>
      <ReportRequestId>2291326454</ReportRequestId>
      <ReportType>_GET_MERCHANT_LISTINGS_DATA_</ReportType>
      <StartDate>2009-01-21T02:10:39+00:00</StartDate>
      <EndDate>2009-02-13T02:10:39+00:00</EndDate>
      <Scheduled>false</Scheduled>
      <SubmittedDate>2009-02-20T02:10:39+00:00</SubmittedDate>
      <ReportProcessingStatus>_SUBMITTED_</ReportProcessingStatus>
    </ReportRequestInfo>
  </RequestReportResult>
  <ResponseMetadata><RequestId>88faca76-b600-46d2-b53c-0c8c4533e43a</RequestId></ResponseMetadata>
</RequestReportResponse>"#;
        let infos = ReportRequestInfoDecoder.decode_result(xml.as_bytes()).unwrap();
        assert_eq!(infos.len(), 1);
        let info = &infos[0];
        assert_eq!(info.report_request_id, "2291326454");
        assert_eq!(info.report_type, "_GET_MERCHANT_LISTINGS_DATA_");
        assert!(!info.scheduled);
        assert!(!info.is_done());
        assert_eq!(
            info.submitted_date.map(|t| t.to_rfc3339()),
            Some("2009-02-20T02:10:39+00:00".to_string())
        );
        assert!(info.generated_report_id.is_none());
    }

    #[test]
    fn decodes_request_list_page() {
        let xml = r#"<GetReportRequestListResponse>
  <GetReportRequestListResult>
    <NextToken>2YgYW55IGNhcm5hbCBwbGVhc3VyZS4=</NextToken>
    <HasNext>true</HasNext>
    <ReportRequestInfo>
      <ReportRequestId>2291326454</ReportRequestId>
      <ReportType>_GET_MERCHANT_LISTINGS_DATA_</ReportType>
      <Scheduled>false</Scheduled>
      <ReportProcessingStatus>_DONE_</ReportProcessingStatus>
      <GeneratedReportId>3538561173</GeneratedReportId>
      <CompletedDate>2009-02-20T02:12:00+00:00</CompletedDate>
    </ReportRequestInfo>
    <ReportRequestInfo>
      <ReportRequestId>2291326455</ReportRequestId>
      <ReportType>_GET_ORDERS_DATA_</ReportType>
      <Scheduled>true</Scheduled>
      <ReportProcessingStatus>_IN_PROGRESS_</ReportProcessingStatus>
    </ReportRequestInfo>
  </GetReportRequestListResult>
</GetReportRequestListResponse>"#;
        let pages = ReportRequestListDecoder.decode_result(xml.as_bytes()).unwrap();
        assert_eq!(pages.len(), 1);
        let page = &pages[0];
        assert!(page.has_next);
        assert_eq!(page.next_token.as_deref(), Some("2YgYW55IGNhcm5hbCBwbGVhc3VyZS4="));
        assert_eq!(page.infos.len(), 2);
        assert!(page.infos[0].is_done());
        assert_eq!(page.infos[0].generated_report_id.as_deref(), Some("3538561173"));
        assert!(page.infos[1].scheduled);
    }

    #[test]
    fn malformed_date_is_a_decode_error() {
        let xml = r#"<RequestReportResponse><RequestReportResult><ReportRequestInfo>
  <ReportRequestId>1</ReportRequestId><StartDate>last week</StartDate>
</ReportRequestInfo></RequestReportResult></RequestReportResponse>"#;
        assert!(matches!(
            ReportRequestInfoDecoder.decode_result(xml.as_bytes()),
            Err(DecodeError::Field {
                field: "StartDate",
                ..
            })
        ));
    }
}
