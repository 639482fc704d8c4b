//! HTTP collaborators against mock servers

use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use herald::Error;
use herald::tools::{Encyclopedia, OpenWeatherMap, WeatherProvider, Wikipedia};
use herald::voice::ElevenLabs;

#[tokio::test]
async fn test_weather_report_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "london"))
        .and(query_param("appid", "owm-key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "London",
            "main": { "temp": 12.3, "humidity": 76 },
            "weather": [{ "description": "overcast clouds" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let weather = OpenWeatherMap::new("owm-key", server.uri()).unwrap();
    let report = assert_ok!(weather.current("london").await);

    assert_eq!(report.city, "London");
    assert!((report.temperature_c - 12.3).abs() < f64::EPSILON);
    assert_eq!(report.description, "overcast clouds");
    assert_eq!(report.humidity, 76);
}

#[tokio::test]
async fn test_weather_unknown_city_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "cod": "404", "message": "city not found"
        })))
        .mount(&server)
        .await;

    let weather = OpenWeatherMap::new("owm-key", server.uri()).unwrap();
    let err = assert_err!(weather.current("atlantis").await);
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_weather_server_error_is_collaborator_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&server)
        .await;

    let weather = OpenWeatherMap::new("bad-key", server.uri()).unwrap();
    let err = assert_err!(weather.current("london").await);
    assert!(matches!(err, Error::Collaborator(_)));
}

#[test]
fn test_weather_requires_key() {
    assert!(OpenWeatherMap::new("  ", "http://localhost").is_err());
}

#[tokio::test]
async fn test_wikipedia_direct_summary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/rest_v1/page/summary/Ferris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "standard",
            "extract": "Ferris is a crab. It is orange. It is the Rust mascot."
        })))
        .mount(&server)
        .await;

    let wikipedia = Wikipedia::new(server.uri(), 2).unwrap();
    let summary = assert_ok!(wikipedia.summary("Ferris").await);
    assert_eq!(summary, "Ferris is a crab. It is orange.");
}

#[tokio::test]
async fn test_wikipedia_falls_back_to_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/rest_v1/page/summary/mercury"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "disambiguation",
            "extract": "Mercury may refer to:"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("action", "opensearch"))
        .and(query_param("search", "mercury"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            "mercury",
            ["Mercury planet", "Mercury element"],
            ["", ""],
            ["", ""]
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/rest_v1/page/summary/Mercury_planet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "standard",
            "extract": "Mercury is the first planet from the Sun."
        })))
        .mount(&server)
        .await;

    let wikipedia = Wikipedia::new(server.uri(), 2).unwrap();
    let summary = assert_ok!(wikipedia.summary("mercury").await);
    assert_eq!(summary, "Mercury is the first planet from the Sun.");
}

#[tokio::test]
async fn test_wikipedia_nothing_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["zzxq", [], [], []])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let wikipedia = Wikipedia::new(server.uri(), 2).unwrap();
    let err = assert_err!(wikipedia.summary("zzxq").await);
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_elevenlabs_voice_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/voices"))
        .and(header("xi-api-key", "el-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "voices": [
                { "voice_id": "v1", "name": "Rachel" },
                { "voice_id": "v2", "name": "default_voice" }
            ]
        })))
        .mount(&server)
        .await;

    let client = ElevenLabs::new("el-key", "eleven_multilingual_v2", server.uri()).unwrap();

    assert_eq!(client.voices().await.unwrap().len(), 2);
    assert_eq!(
        client.find_voice_id("default_voice").await.unwrap().as_deref(),
        Some("v2")
    );
    assert_eq!(client.find_voice_id("Nobody").await.unwrap(), None);
}

#[tokio::test]
async fn test_elevenlabs_synthesis() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/text-to-speech/v2"))
        .and(header("xi-api-key", "el-key"))
        .and(body_json(json!({
            "text": "Hello there",
            "model_id": "eleven_multilingual_v2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xFB, 0x90, 0x00]))
        .mount(&server)
        .await;

    let client = ElevenLabs::new("el-key", "eleven_multilingual_v2", server.uri()).unwrap();
    let audio = assert_ok!(client.synthesize("v2", "Hello there").await);
    assert_eq!(audio, [0xFF, 0xFB, 0x90, 0x00]);
}

#[tokio::test]
async fn test_elevenlabs_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/text-to-speech/empty"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/text-to-speech/limited"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let client = ElevenLabs::new("el-key", "eleven_multilingual_v2", server.uri()).unwrap();

    assert!(matches!(
        client.synthesize("empty", "hi").await,
        Err(Error::Tts(_))
    ));
    let err = assert_err!(client.synthesize("limited", "hi").await);
    assert!(err.to_string().contains("429"));
}
