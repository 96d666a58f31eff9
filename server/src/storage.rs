use std::fmt;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use figboard_shared::{decode_figure_file, encode_figure_file, Figure, FigureFileError};

#[derive(Debug)]
pub enum StorageError {
    NotFound,
    Io(io::Error),
    Format(FigureFileError),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound => f.write_str("board not found"),
            StorageError::Io(error) => write!(f, "board storage i/o: {error}"),
            StorageError::Format(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<io::Error> for StorageError {
    fn from(error: io::Error) -> Self {
        if error.kind() == io::ErrorKind::NotFound {
            StorageError::NotFound
        } else {
            StorageError::Io(error)
        }
    }
}

#[async_trait]
pub trait Storage: Send + Sync {
    async fn load_board(&self, board_id: &str) -> Result<Vec<Figure>, StorageError>;
    async fn save_board(&self, board_id: &str, figures: &[Figure]) -> Result<(), StorageError>;
}

/// One `<board_id>.json` figure file per board.
pub struct FileStorage {
    board_dir: PathBuf,
}

impl FileStorage {
    pub fn new(board_dir: PathBuf) -> Self {
        Self { board_dir }
    }

    fn board_path(&self, board_id: &str) -> PathBuf {
        self.board_dir.join(format!("{board_id}.json"))
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn load_board(&self, board_id: &str) -> Result<Vec<Figure>, StorageError> {
        let text = tokio::fs::read_to_string(self.board_path(board_id)).await?;
        decode_figure_file(&text).map_err(StorageError::Format)
    }

    async fn save_board(&self, board_id: &str, figures: &[Figure]) -> Result<(), StorageError> {
        let path = self.board_path(board_id);
        let text = encode_figure_file(figures).map_err(StorageError::Format)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, text).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}
