// tests/session_integration.rs
use mapillary_explorer::error::ExplorerError;
use mapillary_explorer::{Coordinate, SearchOutcome, SearchSession};
use mockito::{Matcher, Server};
use serde_json::json;

use test_utils::shared::{image, images_body, north_of, setup_client, TEST_TOKEN};

fn geocoder_body() -> String {
    json!([{"lat": "52.5162746", "lon": "13.3777041", "display_name": "Brandenburger Tor, Berlin"}])
        .to_string()
}

fn brandenburg_gate() -> Coordinate {
    Coordinate::new(52.5162746, 13.3777041).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_explore_rejects_blank_address_without_network() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = setup_client(&server.url());
        let mut session = SearchSession::new();
        let result = client
            .explore(&mut session, "   ", Some(TEST_TOKEN), true)
            .await;
        assert!(matches!(result, Err(ExplorerError::EmptyQuery)));
        assert!(session.last().is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_explore_rejects_bad_token_without_network() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = setup_client(&server.url());
        let mut session = SearchSession::new();
        let result = client
            .explore(&mut session, "Berlin", Some("not-a-token"), true)
            .await;
        assert!(matches!(result, Err(ExplorerError::InvalidCredential(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_explore_unknown_address_keeps_previous_entry() {
        let mut server = Server::new_async().await;
        let geocoder = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .expect(1)
            .create_async()
            .await;
        let imagery = server
            .mock("GET", "/images")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = setup_client(&server.url());
        let mut session = SearchSession::new();
        let result = client
            .explore(&mut session, "Nowhere Street 0", Some(TEST_TOKEN), false)
            .await;
        match result {
            Err(ExplorerError::AddressNotFound(address)) => assert_eq!(address, "Nowhere Street 0"),
            other => panic!("Expected AddressNotFound, got {:?}", other),
        }
        assert!(session.last().is_none());
        geocoder.assert_async().await;
        imagery.assert_async().await;
    }

    #[tokio::test]
    async fn test_explore_records_panorama() {
        let origin = brandenburg_gate();
        let mut server = Server::new_async().await;
        let _geocoder = server
            .mock("GET", "/search")
            .match_query(Matcher::UrlEncoded("q".into(), "Brandenburger Tor".into()))
            .with_status(200)
            .with_body(geocoder_body())
            .create_async()
            .await;
        let imagery = server
            .mock("GET", "/images")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(images_body(vec![image(
                "gate-pano",
                &north_of(&origin, 30.0),
                true,
            )]))
            .expect(1)
            .create_async()
            .await;

        let client = setup_client(&server.url());
        let mut session = SearchSession::new();
        let entry = client
            .explore(&mut session, "  Brandenburger Tor ", Some(TEST_TOKEN), true)
            .await
            .expect("explore should succeed");

        assert_eq!(entry.location.label, "Brandenburger Tor, Berlin");
        assert_eq!(entry.location.coordinate, origin);
        assert_eq!(entry.imagery.candidate().unwrap().id, "gate-pano");
        assert!(!entry.panorama_fallback);
        imagery.assert_async().await;
    }

    #[tokio::test]
    async fn test_explore_with_no_imagery_is_still_recorded() {
        let mut server = Server::new_async().await;
        let _geocoder = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(geocoder_body())
            .create_async()
            .await;
        let _imagery = server
            .mock("GET", "/images")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(images_body(vec![]))
            .create_async()
            .await;

        let client = setup_client(&server.url());
        let mut session = SearchSession::new();
        let entry = client
            .explore(&mut session, "Brandenburger Tor", Some(TEST_TOKEN), true)
            .await
            .unwrap();

        assert_eq!(entry.imagery, SearchOutcome::Empty);
        assert!(entry.panorama_fallback);
        assert!(session.last().is_some());
    }

    #[tokio::test]
    async fn test_new_search_replaces_session_entry() {
        let origin = brandenburg_gate();
        let mut server = Server::new_async().await;
        let _geocoder = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(geocoder_body())
            .create_async()
            .await;
        let _imagery = server
            .mock("GET", "/images")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(images_body(vec![image(
                "flat",
                &north_of(&origin, 15.0),
                false,
            )]))
            .create_async()
            .await;

        let client = setup_client(&server.url());
        let mut session = SearchSession::new();
        client
            .explore(&mut session, "first search", Some(TEST_TOKEN), false)
            .await
            .unwrap();
        client
            .explore(&mut session, "second search", Some(TEST_TOKEN), false)
            .await
            .unwrap();

        let last = session.last().unwrap();
        assert_eq!(last.imagery.candidate().unwrap().id, "flat");
        assert!(!last.panorama_fallback);
    }
}
