use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use blastgrid_engine::{Command, PieceSeed};

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
    /// Writes `value` as pretty JSON to `output_path`, or to stdout when none
    /// is given.
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = match output_path {
            Some(path) => {
                let file = File::create(&path).with_context(|| {
                    format!("Failed to create output file: {}", path.display())
                })?;
                Output::File {
                    writer: BufWriter::new(file),
                    path,
                }
            }
            None => Output::Stdout {
                writer: io::stdout().lock(),
            },
        };
        output.write_json(value)
    }

    fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self)
            .with_context(|| format!("Failed to write newline to {}", self.display_path()))?;
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

/// Read a list of session commands from a JSON file
pub fn read_script_file<P>(path: P) -> anyhow::Result<Vec<Command>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open script file: {}", path.display()))?;
    serde_json::from_reader(io::BufReader::new(file))
        .with_context(|| format!("Failed to parse script file: {}", path.display()))
}

/// Parses a `--seed` argument written as 8 hex digits.
pub fn parse_seed(s: &str) -> Result<PieceSeed, String> {
    PieceSeed::from_hex(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed() {
        assert_eq!(parse_seed("0000002a").unwrap(), PieceSeed::from(42));
        assert!(parse_seed("2a").is_err());
        assert!(parse_seed("xyzxyzxy").is_err());
    }

    #[test]
    fn test_script_written_by_save_json_reads_back() {
        let path = std::env::temp_dir()
            .join(format!("blastgrid-{}-script.json", std::process::id()));
        let commands = [
            Command::Spawn,
            Command::Move(blastgrid_engine::Direction::Right),
            Command::SelectSlot(2),
            Command::Finalize,
        ];
        Output::save_json(&commands, Some(path.clone())).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(
            value,
            serde_json::json!(["Spawn", {"Move": "Right"}, {"SelectSlot": 2}, "Finalize"])
        );
        assert_eq!(read_script_file(&path).unwrap(), commands);

        let err = read_script_file(path.with_extension("missing")).unwrap_err();
        assert!(err.to_string().contains("Failed to open script file"));
    }
}
