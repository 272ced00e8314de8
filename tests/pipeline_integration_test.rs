use anyhow::Result;
use httpmock::prelude::*;
use image::{Rgb, RgbImage};
use plotters::style::{FontStyle, IntoFont};
use pollution_printouts::{CliConfig, LocalStorage, PrintoutEngine, PrintoutPipeline};
use tempfile::TempDir;

const FIRST_ID: &str = "9a1d3c52-1f57-4f6e-b7c4-52f0c8b2a001";
const SECOND_ID: &str = "9a1d3c52-1f57-4f6e-b7c4-52f0c8b2a002";

fn font_available(family: &str) -> bool {
    (family, 20.0)
        .into_font()
        .style(FontStyle::Bold)
        .box_size("A")
        .is_ok()
}

fn write_background(dir: &TempDir, width: u32, height: u32) -> String {
    let path = dir.path().join("background.png");
    RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))
        .save(&path)
        .unwrap();
    path.to_str().unwrap().to_string()
}

fn config(server: &MockServer, output_path: &str, background: String) -> CliConfig {
    CliConfig {
        contact_email: "printouts@example.com".to_string(),
        project_url: String::new(),
        api_base_url: server.base_url(),
        postcodes: vec!["L15 5AE".to_string()],
        output_path: output_path.to_string(),
        background,
        font_family: "sans-serif".to_string(),
        request_interval_ms: 0,
        max_addresses: None,
        config: None,
        json_logs: false,
        verbose: false,
    }
}

fn address_body(address: &str, concentration: &str, health_costs: &str) -> serde_json::Value {
    serde_json::json!({
        "data": {
            "id": "ignored",
            "postcode": {
                "postcode": "L15 5AE",
                "district": "Liverpool",
                "constituency": "Liverpool, Wavertree",
                "mp": { "name": "A Member", "email": "member@example.com" }
            },
            "airPollution": {
                "concentration": concentration,
                "rating": {
                    "healthCosts": health_costs,
                    "level": 3,
                    "whoLimit": "10",
                    "levelDesc": "Very high"
                },
                "percentile": "92"
            },
            "solutions": [
                { "type": "walk", "title": "Walk", "body": "Walk to school" }
            ],
            "formatted_address": address,
            "latitude": 53.39,
            "longitude": -2.93
        }
    })
}

fn mock_address_list(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET)
            .path("/addresses")
            .query_param("postcode", "L15 5AE")
            .header("user-agent", "bot | printouts@example.com");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "data": [
                    { "id": FIRST_ID, "formatted_address": "1 Smithdown Road, Liverpool" },
                    { "id": SECOND_ID, "formatted_address": "2 Smithdown Road, Liverpool" }
                ]
            }));
    })
}

#[tokio::test]
async fn test_unreadable_responses_are_skipped_not_guessed() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();
    let background = write_background(&temp_dir, 64, 64);

    let server = MockServer::start();
    let list_mock = mock_address_list(&server);
    let first_mock = server.mock(|when, then| {
        when.method(GET).path(format!("/addresses/{}", FIRST_ID));
        then.status(200).json_body(address_body(
            "1 Smithdown Road, Liverpool",
            "not a number",
            "The annual average of the pollutant PM2.5 is 9.0mcg/m3. The reading for PM10 at this address is 16.0mcg/m3.",
        ));
    });
    let second_mock = server.mock(|when, then| {
        when.method(GET).path(format!("/addresses/{}", SECOND_ID));
        then.status(200).json_body(address_body(
            "2 Smithdown Road, Liverpool",
            "21.0",
            "Fine particles are described in a new way now.",
        ));
    });

    let config = config(&server, &output_path, background);
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = PrintoutPipeline::new(storage, config)?;
    let report = PrintoutEngine::new(pipeline).run().await?;

    list_mock.assert();
    first_mock.assert();
    second_mock.assert();
    assert_eq!(report.fetched, 2);
    assert_eq!(report.rendered, 0);
    assert_eq!(report.skipped, 2);

    let summary = std::fs::read_to_string(std::path::Path::new(&output_path).join("summary.csv"))?;
    assert_eq!(summary.lines().count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_postcode_lookup_failure_aborts_run() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();
    let background = write_background(&temp_dir, 64, 64);

    let server = MockServer::start();
    let list_mock = server.mock(|when, then| {
        when.method(GET).path("/addresses");
        then.status(500);
    });

    let config = config(&server, &output_path, background);
    let pipeline = PrintoutPipeline::new(LocalStorage::new(output_path.clone()), config).unwrap();
    let result = PrintoutEngine::new(pipeline).run().await;

    list_mock.assert();
    assert!(matches!(
        result,
        Err(pollution_printouts::PrintoutError::ApiStatusError { .. })
    ));
}

#[tokio::test]
async fn test_end_to_end_renders_leaflets() -> Result<()> {
    if !font_available("sans-serif") {
        eprintln!("skipping: no sans-serif font installed");
        return Ok(());
    }

    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();
    let background = write_background(&temp_dir, 2480, 3508);

    let server = MockServer::start();
    let list_mock = mock_address_list(&server);
    let prose = "The annual average of the pollutant PM2.5 is 9.0mcg/m3. The reading for PM10 at this address is 16.0mcg/m3.";
    let first_mock = server.mock(|when, then| {
        when.method(GET).path(format!("/addresses/{}", FIRST_ID));
        then.status(200)
            .json_body(address_body("1 Smithdown Road, Liverpool", "21.0", prose));
    });
    let second_mock = server.mock(|when, then| {
        when.method(GET).path(format!("/addresses/{}", SECOND_ID));
        then.status(200)
            .json_body(address_body("2 Smithdown Road, Liverpool", "8.5", prose));
    });

    let config = config(&server, &output_path, background);
    let pipeline = PrintoutPipeline::new(LocalStorage::new(output_path.clone()), config)?;
    let report = PrintoutEngine::new(pipeline).run().await?;

    list_mock.assert();
    first_mock.assert();
    second_mock.assert();
    assert_eq!(report.rendered, 2);

    let out = std::path::Path::new(&output_path);
    let leaflet = image::open(out.join("000-1-smithdown-road-liverpool.png"))?;
    assert_eq!((leaflet.width(), leaflet.height()), (2480, 3508));
    assert!(out.join("001-2-smithdown-road-liverpool.png").exists());

    let summary = std::fs::read_to_string(out.join("summary.csv"))?;
    let rows: Vec<&str> = summary.lines().collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[1].starts_with("0,\"1 Smithdown Road, Liverpool\",Very high,21.0,9.0,16.0,3,"));
    assert!(rows[2].starts_with("1,\"2 Smithdown Road, Liverpool\",Very high,8.5,9.0,16.0,2,"));
    Ok(())
}
