use std::error;
use std::fmt;
use std::path::PathBuf;

use abonados_barcode::BitmapError;


#[derive(Debug)]
pub(crate) enum ConfigError {
    OpeningFile(PathBuf, std::io::Error),
    Loading(serde_json::Error),
}
impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::OpeningFile(p, e)
                => write!(f, "error opening config file {}: {}", p.display(), e),
            ConfigError::Loading(e)
                => write!(f, "error loading configuration: {}", e),
        }
    }
}
impl error::Error for ConfigError {
}


#[derive(Debug)]
pub(crate) enum JobError {
    NotRenderable,
    Bitmap(BitmapError),
    CreatingDirectory(PathBuf, std::io::Error),
    Writing(PathBuf, std::io::Error),
}
impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobError::NotRenderable
                => write!(f, "data cannot be rendered"),
            JobError::Bitmap(e)
                => write!(f, "{}", e),
            JobError::CreatingDirectory(p, e)
                => write!(f, "error creating directory {}: {}", p.display(), e),
            JobError::Writing(p, e)
                => write!(f, "error writing {}: {}", p.display(), e),
        }
    }
}
impl error::Error for JobError {
}


#[derive(Debug)]
pub(crate) enum GeneralError {
    Config(ConfigError),
    JobsFailed { failed: usize, total: usize },
}
impl fmt::Display for GeneralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneralError::Config(e)
                => write!(f, "configuration error: {}", e),
            GeneralError::JobsFailed { failed, total }
                => write!(f, "{} of {} jobs failed", failed, total),
        }
    }
}
impl error::Error for GeneralError {
}
impl From<ConfigError> for GeneralError {
    fn from(e: ConfigError) -> Self {
        GeneralError::Config(e)
    }
}
