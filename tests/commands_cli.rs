use std::time::{Duration, Instant};

use clap::Parser;
use clap::error::ErrorKind;
use pretty_assertions::assert_eq;

const FAKE_SCAN: &str = "hci0|AA:BB:CC|AQ-S 90cm|-43";

#[derive(Debug, Default)]
struct FakeTerminalClient;

impl aqs::TerminalClient for FakeTerminalClient {
    fn stdout_is_terminal(&self) -> bool {
        false
    }

    fn stderr_is_terminal(&self) -> bool {
        false
    }
}

fn state_frame_hex(payload: &[u8]) -> String {
    let frame = aqs::FrameCodec::encode(aqs::STATE_UPDATE_OPCODE, payload)
        .expect("test state payload should encode");
    hex::encode(frame)
}

async fn run_with_parsed_args(
    args: aqs::Args,
    output_format: aqs::OutputFormat,
) -> anyhow::Result<String> {
    let mut output = Vec::new();
    let (command, maybe_fake_args) = args.into_command_and_fake_args()?;
    let hardware_client = match maybe_fake_args {
        Some(fake_args) => aqs::fake_hardware_client(fake_args),
        None => aqs::unconfigured_hardware_client(),
    };
    aqs::run_with_clients(
        command,
        &mut output,
        &FakeTerminalClient,
        hardware_client,
        output_format,
    )
    .await?;
    Ok(String::from_utf8(output)?)
}

async fn run_with_argv<const N: usize>(
    argv: [&str; N],
    output_format: aqs::OutputFormat,
) -> anyhow::Result<String> {
    let parsed_args = aqs::Args::try_parse_from(argv)?;
    run_with_parsed_args(parsed_args, output_format).await
}

#[tokio::test]
async fn encode_command_prints_frame_breakdown() -> anyhow::Result<()> {
    let stdout = run_with_argv(["aqs", "encode", "POWER_ON"], aqs::OutputFormat::Pretty).await?;

    assert!(stdout.contains("POWER_ON"));
    assert!(stdout.contains("7E 02 01 01 00 EF"));
    Ok(())
}

#[tokio::test]
async fn encode_command_emits_hex_json() -> anyhow::Result<()> {
    let stdout = run_with_argv(
        ["aqs", "encode", "COLOR_HEX:ff8800"],
        aqs::OutputFormat::Json,
    )
    .await?;

    let value: serde_json::Value = serde_json::from_str(&stdout)?;
    assert_eq!("COLOR_HEX", value["command"]);
    assert_eq!("04", value["opcode"]);
    assert_eq!("ff8800", value["payload"]);
    assert_eq!("7e0404ff880073ef", value["frame"]);
    Ok(())
}

#[tokio::test]
async fn encode_command_rejects_unknown_commands() {
    let result = run_with_argv(["aqs", "encode", "DISCO_MODE:1"], aqs::OutputFormat::Pretty).await;

    let error = result.expect_err("unknown command must not encode");
    assert!(format!("{error:#}").contains("unknown command"));
}

#[tokio::test]
async fn decode_command_renders_state_snapshot() -> anyhow::Result<()> {
    let frame_hex = state_frame_hex(&[0x01, 75, 0x02, 0x3B, 0x82, 0xF6]);
    let stdout = run_with_argv(
        ["aqs", "decode", &frame_hex],
        aqs::OutputFormat::Json,
    )
    .await?;

    let value: serde_json::Value = serde_json::from_str(&stdout)?;
    assert_eq!(serde_json::json!(true), value["power"]);
    assert_eq!(serde_json::json!(75), value["brightness"]);
    assert_eq!("solid", value["mode"]);
    assert_eq!("#3b82f6", value["colour"]);
    Ok(())
}

#[tokio::test]
async fn decode_command_rejects_corrupted_frames() {
    let mut frame = aqs::FrameCodec::encode(aqs::STATE_UPDATE_OPCODE, &[0x01, 75, 0x00])
        .expect("test frame should encode");
    frame[3] ^= 0x40;
    let frame_hex = hex::encode(frame);

    let result = run_with_argv(["aqs", "decode", &frame_hex], aqs::OutputFormat::Pretty).await;
    let error = result.expect_err("corrupted frame must not decode");
    assert!(format!("{error:#}").contains("checksum mismatch"));
}

#[tokio::test]
async fn control_power_command_applies_state() -> anyhow::Result<()> {
    let stdout = run_with_argv(
        [
            "aqs",
            "--fake",
            "--fake-scan",
            FAKE_SCAN,
            "control",
            "power",
            "on",
        ],
        aqs::OutputFormat::Pretty,
    )
    .await?;

    assert_eq!("Applied power state: on", stdout.trim_end());
    Ok(())
}

#[tokio::test]
async fn control_preset_command_emits_json() -> anyhow::Result<()> {
    let stdout = run_with_argv(
        [
            "aqs",
            "--fake",
            "--fake-scan",
            FAKE_SCAN,
            "control",
            "preset",
            "coral",
        ],
        aqs::OutputFormat::Json,
    )
    .await?;

    let value: serde_json::Value = serde_json::from_str(&stdout)?;
    assert_eq!("preset", value["action"]);
    assert_eq!("coral", value["preset"]);
    Ok(())
}

#[test]
fn control_brightness_rejects_out_of_range_input() {
    let result = aqs::Args::try_parse_from([
        "aqs",
        "--fake",
        "--fake-scan",
        FAKE_SCAN,
        "control",
        "brightness",
        "101",
    ]);

    let error = result.expect_err("brightness 101 should fail command parsing");
    assert_eq!(ErrorKind::ValueValidation, error.kind());
}

#[test]
fn control_schedule_add_requires_exactly_one_action() {
    let result = aqs::Args::try_parse_from([
        "aqs",
        "--fake",
        "--fake-scan",
        FAKE_SCAN,
        "control",
        "schedule-add",
        "0",
        "08:00",
        "18:00",
        "1111100",
    ]);

    let error = result.expect_err("schedule-add without an action should fail");
    assert_eq!(ErrorKind::MissingRequiredArgument, error.kind());
}

#[tokio::test]
async fn control_schedule_add_reports_stored_slot() -> anyhow::Result<()> {
    let stdout = run_with_argv(
        [
            "aqs",
            "--fake",
            "--fake-scan",
            FAKE_SCAN,
            "control",
            "schedule-add",
            "0",
            "08:00",
            "18:00",
            "1111100",
            "--preset",
            "clear",
        ],
        aqs::OutputFormat::Pretty,
    )
    .await?;

    assert_eq!(
        "Stored schedule slot 0: 08:00 -> 18:00 on 1111100 (preset:clear)",
        stdout.trim_end()
    );
    Ok(())
}

#[tokio::test]
async fn control_request_state_decodes_scripted_reply() -> anyhow::Result<()> {
    let fake = aqs::FakeArgs::builder()
        .scan_fixture(FAKE_SCAN)?
        .notifications(&state_frame_hex(&[0x01, 60, 0x03, 30, 50, 100, 80, 90]))?
        .build();
    let args = aqs::Args::new(aqs::Command::Control(aqs::ControlArgs::new(
        aqs::ControlAction::RequestState,
    )))
    .with_fake(fake);

    let stdout = run_with_parsed_args(args, aqs::OutputFormat::Json).await?;
    let value: serde_json::Value = serde_json::from_str(&stdout)?;

    assert_eq!("request_state", value["action"]);
    assert_eq!("spectrum", value["snapshot"]["mode"]);
    assert_eq!(serde_json::json!(60), value["snapshot"]["brightness"]);
    assert_eq!(serde_json::json!(100), value["snapshot"]["levels"]["blue"]);
    Ok(())
}

#[tokio::test]
async fn control_sync_time_reports_requested_timestamp() -> anyhow::Result<()> {
    let stdout = run_with_argv(
        [
            "aqs",
            "--fake",
            "--fake-scan",
            FAKE_SCAN,
            "control",
            "sync-time",
            "--unix",
            "1700000000",
        ],
        aqs::OutputFormat::Json,
    )
    .await?;

    let value: serde_json::Value = serde_json::from_str(&stdout)?;
    assert_eq!("sync_time", value["action"]);
    assert_eq!(serde_json::json!(1_700_000_000), value["unix_timestamp"]);
    Ok(())
}

#[tokio::test]
async fn listen_command_streams_decoded_snapshots() -> anyhow::Result<()> {
    let notifications = format!(
        "{},{}",
        state_frame_hex(&[0x01, 75, 0x02, 0x3B, 0x82, 0xF6]),
        state_frame_hex(&[0x00, 10, 0x00]),
    );
    let fake = aqs::FakeArgs::builder()
        .scan_fixture(FAKE_SCAN)?
        .initial_read(&state_frame_hex(&[0x01, 75, 0x01, 0x02]))?
        .notifications(&notifications)?
        .build();
    let args =
        aqs::Args::new(aqs::Command::Listen(aqs::ListenArgs::new(Some(2)))).with_fake(fake);

    let stdout = run_with_parsed_args(args, aqs::OutputFormat::Pretty).await?;

    assert!(stdout.contains("AQ-S 90cm"));
    assert!(stdout.contains("[0001] power=on brightness=75% mode=solid:#3b82f6"));
    assert!(stdout.contains("[0002] power=off brightness=10% mode=off"));
    assert!(stdout.contains("reached max notifications (2)"));
    Ok(())
}

#[tokio::test]
async fn listen_command_labels_undecodable_frames() -> anyhow::Result<()> {
    let fake = aqs::FakeArgs::builder()
        .scan_fixture(FAKE_SCAN)?
        .notifications("deadbeef")?
        .build();
    let args =
        aqs::Args::new(aqs::Command::Listen(aqs::ListenArgs::new(Some(1)))).with_fake(fake);

    let stdout = run_with_parsed_args(args, aqs::OutputFormat::Pretty).await?;

    assert!(stdout.contains("decode_error:"));
    assert!(stdout.contains("raw=DE AD BE EF"));
    Ok(())
}

#[tokio::test]
async fn control_without_fake_transport_fails_with_guidance() {
    let result = run_with_argv(
        ["aqs", "control", "power", "on"],
        aqs::OutputFormat::Pretty,
    )
    .await;

    let error = result.expect_err("device commands need a transport backend");
    assert!(format!("{error:#}").contains("no transport backend is configured"));
}

#[tokio::test]
async fn listen_command_applies_fake_discovery_delay() -> anyhow::Result<()> {
    let started_at = Instant::now();
    let _ = run_with_argv(
        [
            "aqs",
            "--fake",
            "--fake-scan",
            FAKE_SCAN,
            "--fake-discovery-delay",
            "40ms",
            "listen",
            "--max-notifications",
            "1",
        ],
        aqs::OutputFormat::Pretty,
    )
    .await?;

    assert!(started_at.elapsed() >= Duration::from_millis(40));
    Ok(())
}
