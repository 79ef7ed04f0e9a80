//! Output naming and tidy table writer

use crate::types::{Result, SessionInfo, TidyRow};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Output identifier: phase, subject and session concatenated without
/// delimiters (`["A", 1]`, `"034"`, `1` -> `A10341`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OutputKey(String);

impl OutputKey {
    pub fn new(info: &SessionInfo) -> Self {
        Self(format!("{}{}{}", info.phase, info.subject, info.session))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<output_dir>/<key>.csv`
    pub fn path_in(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}.csv", self.0))
    }
}

impl fmt::Display for OutputKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Write tidy rows as a two-column CSV (time, event) with no index column
///
/// Rows go to a temporary file in the destination directory which is renamed
/// over `path` once everything is flushed, so readers never see a partial
/// table. On unix the file is created with mode 0o666 filtered by the umask,
/// the same as a plain `fs::write`.
pub fn write_tidy_csv(path: &Path, rows: &[TidyRow], write_header: bool) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir)?;
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(&mut tmp);

        if write_header {
            writer.write_record(["time", "event"])?;
        }
        for row in rows {
            writer.write_record([row.time.as_str(), row.event.as_str()])?;
        }
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;

    tmp.persist(path).map_err(|e| e.error)?;
    log::debug!("Wrote {} rows to {:?}", rows.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Label, Phase};

    #[test]
    fn test_output_key_concatenates_phase_sequence() {
        let info = SessionInfo::new(
            Phase::Sequence(vec![Label::from("A"), Label::from(1i64)]),
            "034",
            1i64,
        );
        let key = OutputKey::new(&info);
        assert_eq!(key.as_str(), "A10341");
        assert_eq!(
            key.path_in(Path::new("tidy")),
            PathBuf::from("tidy").join("A10341.csv")
        );
    }

    #[test]
    fn test_output_key_scalar_phase() {
        let info = SessionInfo::new(2i64, "7", "12");
        assert_eq!(OutputKey::new(&info).to_string(), "2712");
    }

    #[test]
    fn test_write_tidy_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let rows = vec![
            TidyRow { time: "120".into(), event: "100".into() },
            TidyRow { time: "130".into(), event: "200".into() },
        ];

        write_tidy_csv(&path, &rows, true).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "time,event\n120,100\n130,200\n"
        );

        write_tidy_csv(&path, &rows, false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "120,100\n130,200\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_written_table_follows_umask() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let plain = dir.path().join("plain.csv");
        write_tidy_csv(&path, &[], true).unwrap();
        std::fs::write(&plain, "time,event\n").unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&path), mode(&plain));
    }

    #[test]
    fn test_write_into_missing_dir_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        assert!(write_tidy_csv(&path, &[], true).is_err());
        assert!(!path.exists());
    }
}
