use crate::error::Result;
use crate::profile::RequestProfile;
use std::io::Write;
use std::path::PathBuf;

/// Receives a finalized profile on submission. The storage format is the
/// sink's business.
pub trait ProfileSink {
    fn accept(&mut self, profile: &RequestProfile) -> Result<()>;
}

/// Writes the profile as YAML, atomically replacing any existing file.
pub struct YamlFileSink {
    path: PathBuf,
}

impl YamlFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProfileSink for YamlFileSink {
    fn accept(&mut self, profile: &RequestProfile) -> Result<()> {
        let data = serde_yaml::to_string(profile)?;
        crate::io::atomic_write(&self.path, data.as_bytes())?;
        tracing::info!(profile = %profile.id, path = %self.path.display(), "request submitted");
        Ok(())
    }
}

/// Writes the profile as pretty JSON to any writer.
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProfileSink for JsonSink<W> {
    fn accept(&mut self, profile: &RequestProfile) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, profile)?;
        writeln!(self.out)?;
        tracing::info!(profile = %profile.id, "request submitted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldName;
    use tempfile::TempDir;

    fn profile() -> RequestProfile {
        let mut p = RequestProfile::new();
        p.fields.insert(FieldName::Title, "Leak".to_string());
        p.completeness = 14;
        p
    }

    #[test]
    fn yaml_sink_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/request.yaml");
        let p = profile();
        YamlFileSink::new(&path).accept(&p).unwrap();

        let parsed: RequestProfile =
            serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.id, p.id);
        assert_eq!(parsed.completeness, 14);
    }

    #[test]
    fn json_sink_writes_to_buffer() {
        let mut sink = JsonSink::new(Vec::new());
        sink.accept(&profile()).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["fields"]["title"], "Leak");
        assert_eq!(v["completeness"], 14);
    }
}
