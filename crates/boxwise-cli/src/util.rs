use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
    str::FromStr,
};

use anyhow::Context;
use boxwise_engine::Board;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

/// Destination of a command's main output: a created file or stdout.
pub struct Output {
    writer: Box<dyn Write>,
    target: String,
}

impl Output {
    /// Opens `path` if given, stdout otherwise.
    pub fn to(path: Option<&Path>) -> anyhow::Result<Self> {
        path.map_or_else(|| Ok(Self::stdout()), Self::create)
    }

    pub fn stdout() -> Self {
        Self {
            writer: Box::new(io::stdout().lock()),
            target: "stdout".to_owned(),
        }
    }

    pub fn create(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self {
            writer: Box::new(BufWriter::new(file)),
            target: path.display().to_string(),
        })
    }

    pub fn write_json<T>(mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut self.writer, value)
            .with_context(|| format!("Failed to write JSON to {}", self.target))?;
        self.write_text("\n")
    }

    pub fn write_text(mut self, text: &str) -> anyhow::Result<()> {
        self.writer
            .write_all(text.as_bytes())
            .and_then(|()| self.writer.flush())
            .with_context(|| format!("Failed to write to {}", self.target))
    }
}

/// Reads a whole text file, naming `file_kind` in the error.
pub fn read_text_file<P>(file_kind: &str, path: P) -> anyhow::Result<String>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file: {}", file_kind, path.display()))
}

/// Reads and parses a text file with `FromStr`.
pub fn parse_text_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    read_text_file(file_kind, path)?
        .parse()
        .with_context(|| format!("Failed to parse {} file: {}", file_kind, path.display()))
}

pub fn write_text_file<P>(file_kind: &str, path: P, contents: &str) -> anyhow::Result<()>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write {} file: {}", file_kind, path.display()))
}

/// Board dimensions given on the command line as `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("{width}x{height}")]
pub struct BoardSize {
    pub width: u8,
    pub height: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid board size {text:?}, expected WIDTHxHEIGHT with both sides in 3..=8")]
pub struct ParseBoardSizeError {
    #[error(not(source))]
    text: String,
}

impl FromStr for BoardSize {
    type Err = ParseBoardSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseBoardSizeError { text: s.to_owned() };
        let (width, height) = s.split_once(['x', 'X']).ok_or_else(error)?;
        let width = width.trim().parse().map_err(|_| error())?;
        let height = height.trim().parse().map_err(|_| error())?;
        Board::new(width, height).map_err(|_| error())?;
        Ok(Self { width, height })
    }
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SeedArg {
    /// Seed of the random number generator; drawn from the OS if omitted
    #[arg(long)]
    seed: Option<u64>,
}

impl SeedArg {
    /// The run's root generator. The seed is logged so any run can be repeated.
    pub fn rng(&self) -> Pcg32 {
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        tracing::info!(seed, "seeded random number generator");
        Pcg32::seed_from_u64(seed)
    }
}

#[cfg(test)]
pub(crate) fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("boxwise-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_writes_json_file() {
        let dir = scratch_dir("output-json");
        let path = dir.join("value.json");
        Output::to(Some(&path))
            .unwrap()
            .write_json(&serde_json::json!({ "generation": 3 }))
            .unwrap();
        let text = read_text_file("JSON", &path).unwrap();
        assert!(text.ends_with("}\n"));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["generation"], 3);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_output_reports_target_on_failure() {
        let dir = scratch_dir("output-missing");
        let path = dir.join("missing").join("value.json");
        let error = Output::create(&path).err().unwrap();
        assert!(error.to_string().contains("missing"));
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_parse_board_size() {
        assert_eq!(
            "5x4".parse::<BoardSize>(),
            Ok(BoardSize {
                width: 5,
                height: 4
            })
        );
        assert_eq!("8X3".parse::<BoardSize>().map(|s| s.to_string()), Ok("8x3".to_owned()));
        for bad in ["", "5", "5x", "x5", "2x4", "9x9", "ax3", "3x3x3"] {
            assert!(bad.parse::<BoardSize>().is_err(), "{bad:?} parsed");
        }
    }
}
