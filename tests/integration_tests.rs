//! Integration tests for the Razorgator library.
//!
//! These tests use wiremock to simulate the Pearl web service
//! and test the complete flow without hitting the real API.

use async_trait::async_trait;
use razorgator::{
    ExcludeBy, Options, RazorgatorClient, RazorgatorConfig, RazorgatorError, ResultType, Transport,
    TransportRequest, TransportResponse,
};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SAMPLE_ORDERS_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<orders>
  <order>
    <orderDetails orderId="5001" orderToken="tok-5001" brokerTicketId="777" quantity="2"
                  cost="245.50" electronicDelivery="true" event="Lakers vs. Celtics" status="UNCONFIRMED">
      <office id="12"><brokerage id="4"/></office>
    </orderDetails>
  </order>
  <order>
    <orderDetails orderId="5002" orderToken="tok-5002" brokerTicketId="778" quantity="4"
                  cost="80" electronicDelivery="false" event="Hamilton" status="UNCONFIRMED">
      <office id="31"><brokerage id="9"/></office>
    </orderDetails>
  </order>
  <order>
    <orderDetails orderId="5003" orderToken="tok-5003" brokerTicketId="779" quantity="1"
                  cost="19.99" electronicDelivery="true" event="Dodgers vs. Giants" status="UNCONFIRMED">
      <office id="12"><brokerage id="4"/></office>
    </orderDetails>
  </order>
</orders>"#;

const SAMPLE_ORDER_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<order orderId="5001" orderToken="tok-5001" status="CONFIRMED"/>"#;

const SAMPLE_AIRBILL_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<airbill>
  <trackingNumber>794698570000</trackingNumber>
  <document>JVBERi0xLjQK</document>
</airbill>"#;

const SAMPLE_PDF: &[u8] = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n1 0 obj\n<<>>\nendobj\n";

const TOKEN: &str = "test-token";

fn create_test_client(mock_server_uri: &str) -> RazorgatorClient {
    let config = RazorgatorConfig {
        base_uri: mock_server_uri.to_string(),
        user_agent: "razorgator-test/1.0".to_string(),
        timeout_seconds: 5,
        ..RazorgatorConfig::new(TOKEN)
    };

    RazorgatorClient::with_config(config).unwrap()
}

/// Transport that records requests and answers with a fixed response
#[derive(Clone)]
struct RecordingTransport {
    status: u16,
    body: &'static str,
    requests: Arc<Mutex<Vec<TransportRequest>>>,
}

impl RecordingTransport {
    fn new(status: u16, body: &'static str) -> Self {
        Self {
            status,
            body,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: TransportRequest) -> razorgator::Result<TransportResponse> {
        self.requests.lock().unwrap().push(request);
        Ok(TransportResponse::new(self.status, self.body))
    }
}

#[tokio::test]
async fn test_list_orders_returns_result_set() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/WebserviceV1.asmx/GetOrders"))
        .and(query_param("apiToken", TOKEN))
        .and(query_param("status", "UNCONFIRMED"))
        .and(header("accept", "application/xml"))
        .and(header("user-agent", "razorgator-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_ORDERS_RESPONSE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let response = client.list_orders(Options::new()).await.unwrap();

    let mut orders = response.into_result_set().expect("Expected a result set");
    assert_eq!(orders.count(), 3);
    assert_eq!(orders.total_results(), 3);

    orders.seek(1).unwrap();
    let order = orders.current().unwrap();
    assert_eq!(order.order_id(), Some(5002));
    assert_eq!(order.broker_ticket_id(), Some(778));
    assert_eq!(order.quantity(), Some(4));
    assert_eq!(order.cost(), Some(80.0));
    assert_eq!(order.electronic_delivery(), Some(false));
    assert_eq!(order.get_str("event"), Some("Hamilton"));
    assert_eq!(order.get_str("orderToken"), Some("tok-5002"));

    orders.exclude_results([12], ExcludeBy::Office);
    let remaining: Vec<i64> = orders.iter().filter_map(|o| o.order_id()).collect();
    assert_eq!(remaining, vec![5002]);
}

#[tokio::test]
async fn test_list_orders_status_can_be_overridden() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/WebserviceV1.asmx/GetOrders"))
        .and(query_param("status", "SHIPPED"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<orders/>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let response = client
        .list_orders(Options::new().with("status", "SHIPPED"))
        .await
        .unwrap();

    let orders = response.into_result_set().unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_list_completed_orders() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/WebserviceV1.asmx/GetCompletedOrders"))
        .and(query_param("apiToken", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_ORDERS_RESPONSE))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let orders = client
        .list_completed_orders(Options::new())
        .await
        .unwrap()
        .into_result_set()
        .unwrap();

    let brokerages: Vec<String> = orders
        .iter()
        .filter_map(|o| o.get_path(&["office", "brokerage", "id"]))
        .map(|id| id.to_string())
        .collect();
    assert_eq!(brokerages, vec!["4", "9", "4"]);
}

#[tokio::test]
async fn test_show_order_returns_xml() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/WebserviceV1.asmx/GetOrder"))
        .and(query_param("orderId", "5001"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_ORDER_RESPONSE))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let response = client.show_order(5001).await.unwrap();

    let document = response.into_xml().expect("Expected raw XML");
    assert_eq!(document.root_name(), "order");
    assert_eq!(document.root().attribute("status"), Some("CONFIRMED"));
}

#[tokio::test]
async fn test_accept_order_posts_form() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/WebserviceV1.asmx/ConfirmOrder"))
        .and(body_string(
            "apiToken=test-token&orderId=5001&orderToken=tok-5001",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_ORDER_RESPONSE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let response = client
        .accept_order(5001, Options::new().with("orderToken", "tok-5001"))
        .await
        .unwrap();
    assert!(!response.is_result_set());
}

#[tokio::test]
async fn test_ship_order_posts_form() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/WebserviceV1.asmx/ShipOrder"))
        .and(body_string(
            "apiToken=test-token&orderId=5001&trackingNumber=794698570000",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_ORDER_RESPONSE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let options = Options::new().with("trackingNumber", "794698570000");
    assert!(client.ship_order(5001, options).await.is_ok());
}

#[tokio::test]
async fn test_reject_order_posts_form() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/WebserviceV1.asmx/RejectOrder"))
        .and(body_string("apiToken=test-token&orderId=5002&orderToken=tok-5002"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_ORDER_RESPONSE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    assert!(client.reject_order(5002, "tok-5002").await.is_ok());
}

#[tokio::test]
async fn test_get_airbill_and_purchase_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/WebserviceV1.asmx/GetAirbill"))
        .and(query_param("orderId", "5001"))
        .and(query_param("orderToken", "tok-5001"))
        .and(query_param("purchaseOrderId", "88"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_AIRBILL_RESPONSE))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/WebserviceV1.asmx/GetPurchaseOrder"))
        .and(query_param("purchaseOrderId", "88"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<purchaseOrder purchaseOrderId="88">JVBERi0=</purchaseOrder>"#),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    let airbill = client.get_airbill(5001, "tok-5001", 88).await.unwrap();
    let airbill = airbill.as_xml().unwrap();
    assert_eq!(
        airbill.root().child("trackingNumber").unwrap().text(),
        "794698570000"
    );

    let purchase_order = client.get_purchase_order(88, 5001, "tok-5001").await.unwrap();
    let purchase_order = purchase_order.into_xml().unwrap();
    assert_eq!(purchase_order.root().text(), "JVBERi0=");
}

#[tokio::test]
async fn test_downloads_return_raw_bytes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/WebserviceV1.asmx/DownloadAirbill"))
        .and(query_param("purchaseOrderId", "88"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(SAMPLE_PDF))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    let airbill = client.download_airbill(5001, "tok-5001", 88).await.unwrap();
    assert_eq!(airbill.as_ref(), SAMPLE_PDF);

    let purchase_order = client
        .download_purchase_order(88, 5001, "tok-5001")
        .await
        .unwrap();
    assert_eq!(purchase_order.as_ref(), SAMPLE_PDF);
}

#[tokio::test]
async fn test_error_status_is_reported_for_every_operation() {
    let mock_server = MockServer::start().await;

    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(503).set_body_string("<orders>"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    let results = vec![
        client.list_orders(Options::new()).await.map(|_| ()),
        client.list_completed_orders(Options::new()).await.map(|_| ()),
        client.show_order(1).await.map(|_| ()),
        client.accept_order(1, Options::new()).await.map(|_| ()),
        client.ship_order(1, Options::new()).await.map(|_| ()),
        client.reject_order(1, "t").await.map(|_| ()),
        client.get_airbill(1, "t", 2).await.map(|_| ()),
        client.download_airbill(1, "t", 2).await.map(|_| ()),
        client.get_purchase_order(2, 1, "t").await.map(|_| ()),
        client.download_purchase_order(2, 1, "t").await.map(|_| ()),
    ];

    for result in results {
        match result {
            Err(RazorgatorError::Request { status }) => assert_eq!(status, 503),
            other => panic!("Expected Request error, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_malformed_orders_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<orders><order><d orderId=\"1\"></order>"),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let err = client.list_orders(Options::new()).await.unwrap_err();
    assert!(err.is_parse_error(), "unexpected error: {:?}", err);
}

#[tokio::test]
async fn test_xml_result_type_returns_documents() {
    let transport = RecordingTransport::new(200, SAMPLE_ORDERS_RESPONSE);
    let config = RazorgatorConfig {
        result_type: ResultType::Xml,
        ..RazorgatorConfig::new(TOKEN)
    };
    let client = RazorgatorClient::with_transport(config, transport).unwrap();

    let response = client.list_orders(Options::new()).await.unwrap();
    let document = response.into_xml().expect("Expected raw XML");
    assert_eq!(document.root_name(), "orders");
    assert_eq!(document.root().children.len(), 3);
}

#[tokio::test]
async fn test_token_and_ordering_through_transport() {
    let transport = RecordingTransport::new(200, "<orders/>");
    let client = RazorgatorClient::with_transport(RazorgatorConfig::new(TOKEN), transport.clone())
        .unwrap();

    let options = Options::new()
        .with("apiToken", "spoofed")
        .with("zone", "west")
        .with("fromDate", "2024-01-01");
    client.list_orders(options).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert!(request.url.ends_with("/WebserviceV1.asmx/GetOrders"));
    assert_eq!(
        request.params,
        vec![
            ("apiToken".to_string(), TOKEN.to_string()),
            ("fromDate".to_string(), "2024-01-01".to_string()),
            ("status".to_string(), "UNCONFIRMED".to_string()),
            ("zone".to_string(), "west".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_download_never_parses_body() {
    let transport = RecordingTransport::new(200, "<<< definitely not xml");
    let client = RazorgatorClient::with_transport(RazorgatorConfig::new(TOKEN), transport.clone())
        .unwrap();

    let body = client.download_airbill(1, "t", 2).await.unwrap();
    assert_eq!(body.as_ref(), b"<<< definitely not xml");
    assert!(requests_hit(&transport, "DownloadAirbill"));

    let body = client.download_purchase_order(2, 1, "t").await.unwrap();
    assert_eq!(body.len(), 22);
}

fn requests_hit(transport: &RecordingTransport, endpoint: &str) -> bool {
    transport
        .requests()
        .iter()
        .any(|request| request.url.ends_with(endpoint))
}

#[test]
fn test_invalid_configuration() {
    match RazorgatorClient::new("") {
        Err(RazorgatorError::Config { message }) => assert!(message.contains("API token")),
        Err(other) => panic!("Expected Config error, got {:?}", other),
        Ok(_) => panic!("Expected Config error"),
    }
}
