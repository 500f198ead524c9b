// Shared helpers for driving a full replay session from integration tests.
use grenade_flag::frameworks::config::SettingsFile;
use grenade_flag::{ReplayOptions, ReplaySummary};
use serde_json::Value;
use tokio::io::AsyncReadExt;

// Perfect accuracy keeps launch geometry deterministic.
pub fn exact_settings() -> SettingsFile {
    SettingsFile::parse("[grenade]\naccuracy = 0.0\n").expect("valid settings")
}

pub fn options(settings: SettingsFile) -> ReplayOptions {
    ReplayOptions {
        rng_seed: Some(11),
        settings: Some(settings),
        ..ReplayOptions::default()
    }
}

// Run the given commands through a session and collect every published report.
pub async fn replay(commands: &[Value], options: ReplayOptions) -> (ReplaySummary, Vec<Value>) {
    let script: String = commands.iter().map(|c| format!("{c}\n")).collect();
    // Large enough that the serializer never waits on the reader.
    let (writer, mut reader) = tokio::io::duplex(1 << 20);

    let (summary, output) = tokio::join!(
        grenade_flag::run(script.as_bytes(), writer, options),
        async move {
            let mut text = String::new();
            reader
                .read_to_string(&mut text)
                .await
                .expect("report stream readable");
            text
        }
    );

    let reports = output
        .lines()
        .map(|line| serde_json::from_str(line).expect("each report is one JSON object"))
        .collect();
    (summary.expect("replay succeeds"), reports)
}

pub fn of_type<'a>(reports: &'a [Value], kind: &str) -> Vec<&'a Value> {
    reports.iter().filter(|r| r["type"] == kind).collect()
}

pub fn vec3(value: &Value) -> [f64; 3] {
    let arr = value.as_array().expect("vector is an array");
    [
        arr[0].as_f64().expect("number"),
        arr[1].as_f64().expect("number"),
        arr[2].as_f64().expect("number"),
    ]
}

pub fn assert_close(actual: [f64; 3], expected: [f64; 3]) {
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-3, "expected {expected:?}, got {actual:?}");
    }
}
