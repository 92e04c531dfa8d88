//! Reports section helpers.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::clock::Clock;
use crate::control::CancelToken;
use crate::error::{DecodeError, MwsError};
use crate::operation::{GET_REPORT, GET_REPORT_REQUEST_LIST, REQUEST_REPORT};
use crate::parsers::{
    RawDecoder, ReportRequestInfo, ReportRequestInfoDecoder, ReportRequestListDecoder,
    ReportRequestPage,
};
use crate::request::Fetch;

use super::MwsClient;

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

impl<F: Fetch, C: Clock> MwsClient<F, C> {
    /// Ask for a report of `report_type` (upper-cased before sending),
    /// optionally limited to `[start, end]`.
    pub fn request_report(
        &self,
        report_type: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<ReportRequestInfo, MwsError> {
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                return Err(MwsError::InvalidInput(format!(
                    "report end date {} is before start date {}",
                    end.format(DATE_FORMAT),
                    start.format(DATE_FORMAT)
                )));
            }
        }
        let mut params = vec![("ReportType".to_string(), report_type.to_uppercase())];
        if let Some(start) = start {
            params.push(("StartDate".to_string(), start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = end {
            params.push(("EndDate".to_string(), end.format(DATE_FORMAT).to_string()));
        }

        self.call(&REQUEST_REPORT, &params, &ReportRequestInfoDecoder, &CancelToken::new())?
            .records
            .pop()
            .ok_or(MwsError::Decode(DecodeError::Missing {
                what: "RequestReport",
                field: "ReportRequestInfo",
            }))
    }

    /// One page of report requests matching `filters`, e.g.
    /// `ReportRequestIdList.Id.1` or `ReportProcessingStatusList.Status.1`.
    pub fn report_request_list(
        &self,
        filters: &[(String, String)],
    ) -> Result<ReportRequestPage, MwsError> {
        let page = self
            .call(&GET_REPORT_REQUEST_LIST, filters, &ReportRequestListDecoder, &CancelToken::new())?
            .records
            .pop();
        Ok(page.unwrap_or(ReportRequestPage {
            next_token: None,
            has_next: false,
            infos: Vec::new(),
        }))
    }

    /// Fetch a generated report and write its body to `dest`. Returns the byte count.
    pub fn download_report(&self, report_id: &str, dest: &Path) -> Result<u64, MwsError> {
        let params = [("ReportId".to_string(), report_id.to_string())];
        let body = self
            .call(&GET_REPORT, &params, &RawDecoder, &CancelToken::new())?
            .records
            .pop()
            .unwrap_or_default();
        fs::write(dest, &body)?;
        info!(report_id, bytes = body.len(), path = %dest.display(), "report saved");
        Ok(body.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::client;
    use super::*;
    use chrono::TimeZone;

    const SUBMITTED: &str = r#"<RequestReportResponse>
  <RequestReportResult>
    <ReportRequestInfo>
      <ReportRequestId>2291326454</ReportRequestId>
      <ReportType>_GET_MERCHANT_LISTINGS_DATA_</ReportType>
      <Scheduled>false</Scheduled>
      <ReportProcessingStatus>_SUBMITTED_</ReportProcessingStatus>
    </ReportRequestInfo>
  </RequestReportResult>
</RequestReportResponse>"#;

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn request_report_uppercases_type_and_formats_dates() {
        let c = client(SUBMITTED);
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 59).unwrap();
        let info = c
            .request_report("_get_merchant_listings_data_", Some(start), Some(end))
            .unwrap();
        assert_eq!(info.report_request_id, "2291326454");

        let sent = c.fetch.sent.lock().unwrap();
        assert_eq!(sent[0].0, "RequestReport");
        let params = &sent[0].1;
        assert_eq!(param(params, "ReportType"), Some("_GET_MERCHANT_LISTINGS_DATA_"));
        assert_eq!(param(params, "StartDate"), Some("2024-03-01T00:00:00Z"));
        assert_eq!(param(params, "EndDate"), Some("2024-03-31T23:59:59Z"));
        assert_eq!(param(params, "MarketplaceId"), Some("ATVPDKIKX0DER"));
    }

    #[test]
    fn request_report_rejects_inverted_range() {
        let c = client(SUBMITTED);
        let start = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            c.request_report("_GET_ORDERS_DATA_", Some(start), Some(end)),
            Err(MwsError::InvalidInput(_))
        ));
        assert!(c.fetch.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn request_report_without_info_is_missing() {
        let c = client("<RequestReportResponse/>");
        assert!(matches!(
            c.request_report("_GET_ORDERS_DATA_", None, None),
            Err(MwsError::Decode(DecodeError::Missing { .. }))
        ));
    }

    #[test]
    fn request_list_passes_filters_through() {
        let c = client(
            "<GetReportRequestListResponse><GetReportRequestListResult><HasNext>false</HasNext></GetReportRequestListResult></GetReportRequestListResponse>",
        );
        let filters = [("ReportRequestIdList.Id.1".to_string(), "2291326454".to_string())];
        let page = c.report_request_list(&filters).unwrap();
        assert!(!page.has_next);
        assert!(page.infos.is_empty());
        let sent = c.fetch.sent.lock().unwrap();
        assert_eq!(param(&sent[0].1, "ReportRequestIdList.Id.1"), Some("2291326454"));
    }

    #[test]
    fn download_writes_body_to_path() {
        let c = client("sku\tprice\nA1\t9.99\n");
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("report.txt");
        let written = c.download_report("3538561173", &dest).unwrap();
        assert_eq!(written, 18);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "sku\tprice\nA1\t9.99\n");
        let sent = c.fetch.sent.lock().unwrap();
        assert_eq!(param(&sent[0].1, "ReportId"), Some("3538561173"));
    }
}
