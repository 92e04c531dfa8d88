//! Integration test: signed requests over curl against a scripted local endpoint.
//!
//! The client runs on a manual clock so backoff and pacing are recorded
//! rather than slept.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::mws_server::{self, MwsServer, Reply};
use mws_core::clock::ManualClock;
use mws_core::config::Credentials;
use mws_core::operation::{GET_MY_PRICE_FOR_SKU, GET_REPORT};
use mws_core::parsers::{MyPriceDecoder, RawDecoder};
use mws_core::request::{CurlTransport, Endpoint, Signer};
use mws_core::error::TransportError;
use mws_core::retry::ErrorClass;
use mws_core::{MwsClient, MwsError, RetryPolicy, TerminalError};
use tempfile::tempdir;

const THROTTLED: &str = r#"<?xml version="1.0"?>
<ErrorResponse xmlns="http://mws.amazonservices.com/schema/Products/2011-10-01">
  <Error><Type>Sender</Type><Code>RequestThrottled</Code><Message>Request is throttled</Message></Error>
  <RequestID>5e7f6a1c-throttled</RequestID>
</ErrorResponse>"#;

const DENIED: &str = r#"<?xml version="1.0"?>
<ErrorResponse xmlns="http://mws.amazonservices.com/schema/Products/2011-10-01">
  <Error><Type>Sender</Type><Code>AccessDenied</Code><Message>Access denied</Message></Error>
  <RequestID>5e7f6a1c-denied</RequestID>
</ErrorResponse>"#;

const MY_PRICE: &str = r#"<?xml version="1.0"?>
<GetMyPriceForSKUResponse xmlns="http://mws.amazonservices.com/schema/Products/2011-10-01">
  <GetMyPriceForSKUResult SellerSKU="SKU-A" status="Success"><Product><Offers/></Product></GetMyPriceForSKUResult>
  <GetMyPriceForSKUResult SellerSKU="SKU-B" status="Success"><Product><Offers/></Product></GetMyPriceForSKUResult>
</GetMyPriceForSKUResponse>"#;

fn client(server: &MwsServer) -> MwsClient<CurlTransport, ManualClock> {
    let credentials = Credentials {
        access_key: "AKIAEXAMPLE".into(),
        secret_key: "secret".into(),
        seller_id: "A1SELLER".into(),
        marketplace_id: "ATVPDKIKX0DER".into(),
        auth_token: None,
    };
    let endpoint = Endpoint::parse(&server.base_url).unwrap();
    let transport = CurlTransport::new(
        Signer::new(credentials, endpoint),
        Duration::from_secs(5),
        Duration::from_secs(10),
    );
    MwsClient::with_parts(transport, ManualClock::new(), RetryPolicy::default(), "ATVPDKIKX0DER")
}

fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

#[test]
fn throttled_chunk_is_resent_after_backoff() {
    let server = mws_server::start(vec![Reply::status(503, THROTTLED), Reply::ok(MY_PRICE)]);
    let c = client(&server);

    let prices = c
        .my_price_for_sku(&["SKU-A", "SKU-B"])
        .expect("second attempt succeeds");
    let skus: Vec<&str> = prices.iter().map(|p| p.seller_sku.as_str()).collect();
    assert_eq!(skus, vec!["SKU-A", "SKU-B"]);

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].starts_with("/Products/2011-10-01?"));
    for n in 0..2 {
        let params = server.params(n);
        assert_eq!(param(&params, "Action"), Some("GetMyPriceForSKU"));
        assert_eq!(param(&params, "SellerSKUList.SellerSKU.1"), Some("SKU-A"));
        assert_eq!(param(&params, "SellerSKUList.SellerSKU.2"), Some("SKU-B"));
        assert_eq!(param(&params, "MarketplaceId"), Some("ATVPDKIKX0DER"));
        assert!(param(&params, "Signature").is_some());
    }

    assert_eq!(c.clock().sleeps(), vec![Duration::from_secs(1)]);
    let state = c.throttle_snapshot(&GET_MY_PRICE_FOR_SKU).unwrap();
    assert_eq!(state.attempt, 1);
    assert_eq!(state.throttled_events, 1);
    assert_eq!(state.success_events, 1);
    assert!(!state.throttled);
}

#[test]
fn access_denied_aborts_after_one_request() {
    let server = mws_server::start(vec![Reply::status(401, DENIED), Reply::ok(MY_PRICE)]);
    let c = client(&server);

    let err = c.my_price_for_sku(&["SKU-A"]).unwrap_err();
    match &err {
        MwsError::Terminal(TerminalError::Fault { class, fault, .. }) => {
            assert_eq!(*class, ErrorClass::Fatal);
            assert_eq!(fault.request_id.as_deref(), Some("5e7f6a1c-denied"));
        }
        other => panic!("expected fatal fault, got {other:?}"),
    }
    assert_eq!(server.requests().len(), 1);
    assert!(c.clock().sleeps().is_empty());
    assert!(c.throttle_snapshot(&GET_MY_PRICE_FOR_SKU).unwrap().denied);
}

#[test]
fn report_body_is_written_to_disk() {
    let server = mws_server::start(vec![Reply::ok("sku\tprice\nSKU-A\t12.50\n")]);
    let c = client(&server);
    let dir = tempdir().unwrap();
    let dest = dir.path().join("3538561173.txt");

    let bytes = c.download_report("3538561173", &dest).unwrap();
    assert_eq!(bytes, std::fs::metadata(&dest).unwrap().len());
    let params = server.params(0);
    assert!(server.requests()[0].starts_with("/Reports/2009-01-01?"));
    assert_eq!(param(&params, "Action"), Some("GetReport"));
    assert_eq!(param(&params, "ReportId"), Some("3538561173"));
    assert!(c.throttle_snapshot(&GET_REPORT).is_some());
}

#[test]
fn error_page_is_not_taken_for_a_result() {
    let page = "<html><body>Service Unavailable</body></html>";
    let server = mws_server::start(vec![Reply::status(503, page)]);
    let c = client(&server);
    let dir = tempdir().unwrap();
    let dest = dir.path().join("1.txt");

    let err = c.download_report("1", &dest).unwrap_err();
    match &err {
        MwsError::Transport(TransportError::HttpStatus { status, body }) => {
            assert_eq!(*status, 503);
            assert_eq!(body, page);
        }
        other => panic!("expected HTTP status error, got {other:?}"),
    }
    assert!(!dest.exists());

    let err = c.competitive_pricing_for_asin(&["B1"]).unwrap_err();
    assert!(matches!(
        err,
        MwsError::Transport(TransportError::HttpStatus { status: 503, .. })
    ));
    // Transport errors are surfaced, never retried.
    assert_eq!(server.requests().len(), 2);
    assert!(c.clock().sleeps().is_empty());
}

#[tokio::test]
async fn async_submit_uses_the_same_pipeline() {
    let server = mws_server::start(vec![Reply::status(503, THROTTLED), Reply::ok(MY_PRICE)]);
    let c = Arc::new(client(&server));

    let records = Arc::clone(&c)
        .submit_batch_async(
            &GET_MY_PRICE_FOR_SKU,
            vec!["SKU-A".into(), "SKU-B".into()],
            MyPriceDecoder,
        )
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(server.requests().len(), 2);

    let raw = Arc::clone(&c)
        .submit_batch_async(&GET_MY_PRICE_FOR_SKU, vec!["SKU-C".into()], RawDecoder)
        .await
        .unwrap();
    assert_eq!(raw.len(), 1);
    assert_eq!(server.requests().len(), 3);
}
