use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context as _, ensure};
use serde::{Deserialize, Serialize};

use crate::driver::GameRecord;

/// Bumped whenever `GameRecord` changes shape.
const RECORDS_VERSION: u32 = 1;

#[derive(Serialize)]
struct RecordsOut<'a> {
    version: u32,
    games: &'a [GameRecord],
}

#[derive(Deserialize)]
struct RecordsIn {
    version: u32,
    games: Vec<GameRecord>,
}

/// Writes game records as pretty JSON to `output`, or to stdout when `None`.
pub(crate) fn save_records(records: &[GameRecord], output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create records file: {}", path.display()))?;
            write_records(BufWriter::new(file), records)
                .with_context(|| format!("Failed to write records to {}", path.display()))
        }
        None => write_records(io::stdout().lock(), records)
            .context("Failed to write records to stdout"),
    }
}

/// Reads game records written by [`save_records`].
pub(crate) fn load_records(path: &Path) -> anyhow::Result<Vec<GameRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open records file: {}", path.display()))?;
    read_records(BufReader::new(file))
        .with_context(|| format!("Failed to parse records file: {}", path.display()))
}

fn write_records<W: Write>(mut writer: W, records: &[GameRecord]) -> anyhow::Result<()> {
    let out = RecordsOut {
        version: RECORDS_VERSION,
        games: records,
    };
    serde_json::to_writer_pretty(&mut writer, &out)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn read_records<R: Read>(reader: R) -> anyhow::Result<Vec<GameRecord>> {
    let records: RecordsIn = serde_json::from_reader(reader)?;
    ensure!(
        records.version == RECORDS_VERSION,
        "unsupported records version {} (expected {RECORDS_VERSION})",
        records.version
    );
    Ok(records.games)
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{QueuePolicy, ShapeSeed};

    use super::*;
    use crate::driver::{self, GameSettings};

    fn played(games: u8) -> Vec<GameRecord> {
        let settings = GameSettings {
            rows: 20,
            cols: 10,
            policy: QueuePolicy::SevenBag,
            lines_per_level: 10,
        };
        (0..games)
            .map(|i| {
                let seed = ShapeSeed::from_bytes([i; 16]);
                driver::play_game(settings, seed, 8).unwrap().1
            })
            .collect()
    }

    #[test]
    fn test_records_round_trip() {
        let records = played(2);
        let mut buf = Vec::new();
        write_records(&mut buf, &records).unwrap();

        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("{\n  \"version\": 1,"));
        assert!(text.ends_with("}\n"));
        assert_eq!(read_records(buf.as_slice()).unwrap(), records);
    }

    #[test]
    fn test_rejects_other_version() {
        let json = r#"{"version": 2, "games": []}"#;
        let err = read_records(json.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("unsupported records version 2"));
    }

    #[test]
    fn test_rejects_bare_array() {
        assert!(read_records("[]".as_bytes()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let path = Path::new("does-not-exist/records.json");
        let err = load_records(path).unwrap_err();
        assert!(err.to_string().contains("does-not-exist/records.json"));
    }
}
