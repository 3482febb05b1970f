use std::{
    fs::{self, File},
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use marevt_events::merge::RunEventTable;

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    /// Creates the output file, along with any missing parent directories.
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_tsv(&mut self, table: &RunEventTable) -> anyhow::Result<()> {
        let bytes = table
            .to_tsv_bytes()
            .with_context(|| format!("Failed to serialize events for {}", self.display_path()))?;
        self.write_all(&bytes)
            .with_context(|| format!("Failed to write TSV to {}", self.display_path()))?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Splits a filter list given as space or comma separated labels.
pub fn split_labels(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Adds the BIDS entity prefix (`sub-`, `ses-`) to a bare label.
pub fn with_entity_prefix(prefix: &str, label: &str) -> String {
    if label.starts_with(prefix) {
        label.to_owned()
    } else {
        format!("{prefix}{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_labels() {
        assert_eq!(split_labels("sub-01 sub-02"), ["sub-01", "sub-02"]);
        assert_eq!(split_labels("sub-01,sub-02, sub-03"), ["sub-01", "sub-02", "sub-03"]);
        assert!(split_labels("  ").is_empty());
    }

    #[test]
    fn test_with_entity_prefix() {
        assert_eq!(with_entity_prefix("sub-", "01"), "sub-01");
        assert_eq!(with_entity_prefix("sub-", "sub-01"), "sub-01");
        assert_eq!(with_entity_prefix("ses-", "001"), "ses-001");
    }
}
