//! Loading cassettes from disk for replay.

use std::path::Path;

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Read a YAML cassette and wrap it in a replayer.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_cassette(path: &Path) -> Result<CassetteReplayer, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
    let cassette: Cassette = serde_yaml::from_str(&content)
        .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
    tracing::debug!(
        name = %cassette.name,
        interactions = cassette.interactions.len(),
        "loaded cassette"
    );
    Ok(CassetteReplayer::new(&cassette))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_valid_cassette() {
        let dir = std::env::temp_dir().join("txt2img_cassette_loader_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test.cassette.yaml");
        std::fs::write(
            &path,
            r#"name: sunset
recorded_at: "2026-03-01T12:00:00Z"
commit: abc
interactions:
  - seq: 0
    port: image_service
    method: generate
    input:
      prompt: a sunset
      steps: 50
      scale: 7.5
    output:
      Ok:
        url: /generated/a_sunset_50_7.5.png
"#,
        )
        .unwrap();

        let mut replayer = load_cassette(&path).unwrap();
        let i = replayer.next_interaction("image_service", "generate").unwrap();
        assert_eq!(i.seq, 0);
        assert_eq!(i.output["Ok"]["url"], "/generated/a_sunset_50_7.5.png");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_malformed_fails() {
        let dir = std::env::temp_dir().join("txt2img_cassette_loader_bad_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.cassette.yaml");
        std::fs::write(&path, "interactions: [unclosed").unwrap();

        let err = load_cassette(&path).err().unwrap();
        assert!(err.starts_with("Failed to parse cassette file"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_nonexistent_fails() {
        assert!(load_cassette(Path::new("/nonexistent/cassette.yaml")).is_err());
    }
}
