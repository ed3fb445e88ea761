use std::path::PathBuf;
use thiserror::Error;

use crate::actions::ActionError;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access trip data at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse trip data at {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported trip data format: {0}")]
    UnsupportedFormat(u32),

    #[error("trip data kept changing while saving ({attempts} attempts); try again")]
    Conflict { attempts: u32 },

    #[error(transparent)]
    Action(#[from] ActionError),
}
