//! Integration tests for the `#[tether]` proc-macro.

#![allow(missing_docs)]

use tether::prelude::*;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_bytes, body_json, header, method, path, query_param, query_param_is_missing},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Station {
    name: String,
    line: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Status {
    running: bool,
}

fn gangnam() -> Station {
    Station {
        name: "Gangnam".to_string(),
        line: 2,
    }
}

#[tether(url = "https://metro.example.com")]
trait Metro {
    /// Look a station up by its name.
    #[get("/metro/station")]
    async fn get_station(&self, #[query("name")] station_name: &str) -> tether::Result<Station>;

    #[get("/metro/lines/{line}/stations")]
    async fn line_stations(
        &self,
        line: u8,
        #[query] limit: Option<u32>,
    ) -> tether::Result<Vec<Station>>;

    #[request("DELETE", "/metro/reports/{id}")]
    async fn delete_report(&self, id: u32, #[header(name = "X-Token")] token: &str)
    -> tether::Result<()>;

    #[post("/metro/reports")]
    #[default_header("X-Client", "tether-tests")]
    async fn report(
        &self,
        #[body_json] station: &str,
        #[body_json(camel)] delay_minutes: u32,
        #[response] response: Response,
    ) -> tether::Result<u16> {
        Ok(response.status())
    }

    #[put("/metro/photos/{id}")]
    async fn upload_photo(&self, id: u32, #[body] photo: Vec<u8>) -> tether::Result<Response>;

    #[get("/metro/status")]
    #[directly_response]
    async fn status(&self, #[response] response: Response) -> tether::Result<Status> {
        response.error_for_status()?;
        Ok(Status { running: false })
    }
}

async fn client(mock_server: &MockServer) -> MetroClient {
    let session = Session::connect(mock_server.uri()).expect("session");
    MetroClient::new(session).expect("client")
}

#[tokio::test]
async fn test_connect_uses_attribute_url() {
    let metro = MetroClient::connect().expect("client");

    assert_eq!(MetroClient::BASE_URL, "https://metro.example.com");
    assert_eq!(
        metro.session().base_url().as_str(),
        "https://metro.example.com/"
    );
    assert_eq!(metro.endpoints().get_station.name(), "get_station");
    metro.session().close().await;
}

#[tokio::test]
async fn test_query_param_with_custom_name() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metro/station"))
        .and(query_param("name", "Gangnam"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gangnam()))
        .mount(&mock_server)
        .await;

    let metro = client(&mock_server).await;
    let station = metro.get_station("Gangnam").await.expect("station");

    assert_eq!(station, gangnam());
}

#[tokio::test]
async fn test_placeholder_argument_fills_path() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metro/lines/2/stations"))
        .and(query_param_is_missing("limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![gangnam()]))
        .mount(&mock_server)
        .await;

    let metro = client(&mock_server).await;
    let stations = metro.line_stations(2, None).await.expect("stations");

    assert_eq!(stations, vec![gangnam()]);
}

#[tokio::test]
async fn test_request_attribute_and_header() {
    let mock_server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/metro/reports/7"))
        .and(header("X-Token", "secret"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let metro = client(&mock_server).await;
    metro.delete_report(7, "secret").await.expect("deleted");
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metro/station"))
        .respond_with(ResponseTemplate::new(404).set_body_string("unknown station"))
        .mount(&mock_server)
        .await;

    let metro = client(&mock_server).await;
    let err = metro.get_station("Atlantis").await.expect_err("404");

    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_handler_body_receives_response() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/metro/reports"))
        .and(header("X-Client", "tether-tests"))
        .and(body_json(serde_json::json!({"station": "Gangnam", "delayMinutes": 4})))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;

    let metro = client(&mock_server).await;
    let status = metro.report("Gangnam", 4).await.expect("report");

    assert_eq!(status, 201);
}

#[tokio::test]
async fn test_raw_bytes_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/metro/photos/3"))
        .and(header("Content-Type", "application/octet-stream"))
        .and(body_bytes(vec![0xFF, 0xD8, 0xFF]))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let metro = client(&mock_server).await;
    let response = metro
        .upload_photo(3, vec![0xFF, 0xD8, 0xFF])
        .await
        .expect("upload");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_directly_response_skips_handler() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metro/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Status { running: true }))
        .mount(&mock_server)
        .await;

    let metro = client(&mock_server).await;
    let status = metro.status().await.expect("status");

    assert_eq!(status, Status { running: true });
}

#[tokio::test]
async fn test_endpoint_hooks_through_endpoints_mut() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metro/station"))
        .and(header("X-Line", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gangnam()))
        .mount(&mock_server)
        .await;

    let mut metro = client(&mock_server).await;
    metro
        .endpoints_mut()
        .get_station
        .before_hook(|mut request: WorkingRequest, path: String| async move {
            request.set_header("X-Line", "2");
            Ok::<_, Error>((request, path))
        });
    response_model(
        &mut metro.endpoints_mut().get_station,
        JsonModel::<Station>::new(),
        None,
    );

    let station = metro.get_station("Gangnam").await.expect("station");
    assert_eq!(station, gangnam());
}

#[tokio::test]
async fn test_single_session_with_generated_client() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metro/station"))
        .and(query_param("name", "Gangnam"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gangnam()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let station = single_session(
        move || MetroClient::new(Session::connect(uri)?),
        |metro| async move { metro.get_station("Gangnam").await },
    )
    .await
    .expect("station");

    assert_eq!(station, gangnam());
}

#[tokio::test]
async fn test_scoped_closes_generated_client() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metro/station"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let metro = client(&mock_server).await;
    let (tx, rx) = tokio::sync::oneshot::channel();
    let err = scoped(metro, |metro| async move {
        let _ = tx.send(std::sync::Arc::clone(&metro));
        metro.get_station("Gangnam").await
    })
    .await
    .expect_err("500");

    assert_eq!(err.status(), Some(500));
    let metro = rx.await.expect("client handle");
    assert!(metro.session().is_closed());
}
