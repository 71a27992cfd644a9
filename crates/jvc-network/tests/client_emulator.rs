//! End-to-end tests: ProjectorClient against the emulator
//!
//! Both ends run in-process over loopback, so these tests exercise the real
//! handshake, framing, transaction lock and power sequencing together.

use std::time::Duration;

use jvc_core::{Error, PowerState, StatusField};
use jvc_emulator::{Emulator, EmulatorConfig};
use jvc_network::{ClientConfig, ProjectorClient, TcpTransport, Transport};
use rstest::rstest;

const TIMEOUT: Duration = Duration::from_secs(1);

async fn emulator(config: EmulatorConfig) -> Emulator {
    Emulator::start(EmulatorConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        warmup_time: Duration::from_millis(300),
        ..config
    })
    .await
    .unwrap()
}

fn client_config(emulator: &Emulator) -> ClientConfig {
    ClientConfig {
        host: Some(emulator.local_addr().to_string()),
        timeout: TIMEOUT,
        stable_power_timeout: Duration::from_secs(5),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_power_on_warms_up_then_reports_on() {
    let emulator = emulator(EmulatorConfig::default()).await;
    let client = ProjectorClient::connect(&client_config(&emulator)).await.unwrap();

    assert_eq!(client.power_status().await.unwrap(), PowerState::Standby);
    assert_eq!(client.power_on(false, None).await.unwrap(), PowerState::Warming);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(client.power_status().await.unwrap(), PowerState::On);
}

#[tokio::test]
async fn test_power_on_waits_out_cooling() {
    let emulator = emulator(EmulatorConfig {
        power: "On".into(),
        ..Default::default()
    })
    .await;
    let client = ProjectorClient::connect(&client_config(&emulator)).await.unwrap();

    assert_eq!(client.power_off(false, None).await.unwrap(), PowerState::Cooling);
    assert_eq!(client.power_on(true, None).await.unwrap(), PowerState::On);
    assert_eq!(emulator.status(StatusField::Power).await.unwrap(), "On");
}

#[tokio::test]
async fn test_power_off_with_wait() {
    let emulator = emulator(EmulatorConfig {
        power: "On".into(),
        ..Default::default()
    })
    .await;
    let client = ProjectorClient::connect(&client_config(&emulator)).await.unwrap();

    assert_eq!(client.power_off(true, None).await.unwrap(), PowerState::Standby);
}

#[tokio::test]
async fn test_emergency_is_reported() {
    let emulator = emulator(EmulatorConfig {
        power: "Emergency".into(),
        ..Default::default()
    })
    .await;
    let client = ProjectorClient::connect(&client_config(&emulator)).await.unwrap();

    assert!(matches!(
        client.power_on(false, None).await,
        Err(Error::EmergencyState)
    ));
}

#[rstest]
#[case::wrong(Some("guess"))]
#[case::longer(Some("secretX"))]
#[case::prefix(Some("secre"))]
#[tokio::test]
async fn test_wrong_password_fails_authentication(#[case] password: Option<&str>) {
    let emulator = emulator(EmulatorConfig {
        password: Some("secret".into()),
        handshake_timeout: Duration::from_millis(200),
        ..Default::default()
    })
    .await;

    let err = TcpTransport::connect(emulator.local_addr(), password, TIMEOUT)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AuthenticationFailed));

    let transport = TcpTransport::connect(emulator.local_addr(), Some("secret"), TIMEOUT)
        .await
        .unwrap();
    assert!(!transport.is_shutting_down());
}

#[tokio::test]
async fn test_missing_password_fails_after_handshake_timeout() {
    let emulator = emulator(EmulatorConfig {
        password: Some("secret".into()),
        handshake_timeout: Duration::from_millis(100),
        ..Default::default()
    })
    .await;

    let err = TcpTransport::connect(emulator.local_addr(), None, TIMEOUT)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AuthenticationFailed));
}

#[tokio::test]
async fn test_status_strings() {
    let emulator = emulator(EmulatorConfig {
        gamma_table: "Custom 2".into(),
        ..Default::default()
    })
    .await;
    let client = ProjectorClient::connect(&client_config(&emulator)).await.unwrap();

    assert_eq!(client.input_status().await.unwrap(), "HDMI 1");
    assert_eq!(client.gamma_table_status().await.unwrap(), "Custom 2");
    assert_eq!(client.gamma_value_status().await.unwrap(), "2.2");
    assert_eq!(client.source_status().await.unwrap(), "Signal OK");

    emulator.set_status(StatusField::Source, "No Signal").await.unwrap();
    assert_eq!(client.source_status().await.unwrap(), "No Signal");
    client.null_command().await.unwrap();
}

#[tokio::test]
async fn test_model_is_learned() {
    let emulator = emulator(EmulatorConfig {
        model: "DLA-X30".into(),
        ..Default::default()
    })
    .await;
    let client = ProjectorClient::connect(&client_config(&emulator)).await.unwrap();
    assert!(client.model().is_none());

    let model = client.model_status().await.unwrap();
    assert_eq!(model.name, "DLA-X30");
    assert_eq!(client.model().map(|m| m.name), Some("DLA-X30"));
}

#[tokio::test]
async fn test_reconnects_after_idle_disconnect() {
    let emulator = emulator(EmulatorConfig::default()).await;
    let config = ClientConfig {
        idle_disconnect: Duration::from_millis(100),
        ..client_config(&emulator)
    };
    let client = ProjectorClient::connect(&config).await.unwrap();

    client.null_command().await.unwrap();
    assert_eq!(emulator.sessions().len(), 1);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(emulator.sessions().is_empty());

    client.null_command().await.unwrap();
    assert_eq!(emulator.sessions().len(), 1);
}

#[tokio::test]
async fn test_direct_transport_fails_after_emulator_shutdown() {
    let emulator = emulator(EmulatorConfig::default()).await;
    let config = ClientConfig {
        auto_reconnect: false,
        ..client_config(&emulator)
    };
    let client = ProjectorClient::connect(&config).await.unwrap();
    client.null_command().await.unwrap();

    emulator.shutdown();
    emulator.wait().await;

    assert!(client.power_status().await.is_err());
    assert!(client.transport().is_shutting_down());
}
