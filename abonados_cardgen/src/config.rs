use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use abonados_barcode::{RasterOptions, Symbology};
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;


pub(crate) const DEFAULT_CONFIG_FILE_NAME: &str = "cardgen.json";


#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct Config {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub raster: RasterOptions,
    pub jobs: Vec<JobConfig>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("cards")
}


#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum JobConfig {
    Barcode {
        data: String,
        #[serde(default)]
        symbology: Symbology,
        #[serde(default)]
        width: u32,
        #[serde(default)]
        height: u32,
        file: PathBuf,
    },
    PseudoQr {
        data: String,
        #[serde(default)]
        size: u32,
        file: PathBuf,
    },
}
impl JobConfig {
    pub fn file(&self) -> &Path {
        match self {
            Self::Barcode { file, .. } => file,
            Self::PseudoQr { file, .. } => file,
        }
    }
}


pub(crate) fn parse_config<R: Read>(reader: R) -> Result<Config, ConfigError> {
    serde_json::from_reader(reader)
        .map_err(|e| ConfigError::Loading(e))
}

pub(crate) fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let file = File::open(path)
        .map_err(|e| ConfigError::OpeningFile(path.to_owned(), e))?;
    parse_config(file)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        let json = r#"{
            "output_dir": "out",
            "raster": {"min_height": 90},
            "jobs": [
                {"kind": "barcode", "data": "0042", "symbology": "EAN-13", "width": 400, "height": 120, "file": "ean.png"},
                {"kind": "barcode", "data": "Socio 42", "file": "socio.png"},
                {"kind": "pseudo_qr", "data": "Socio 42", "size": 250, "file": "qr.png"}
            ]
        }"#;
        let config = parse_config(json.as_bytes()).unwrap();

        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.raster.min_height, 90);
        assert_eq!(config.raster.dpi, 300);
        assert_eq!(config.jobs.len(), 3);
        assert_eq!(
            config.jobs[0],
            JobConfig::Barcode {
                data: "0042".to_owned(),
                symbology: Symbology::Ean13,
                width: 400,
                height: 120,
                file: PathBuf::from("ean.png"),
            },
        );
        assert!(matches!(
            &config.jobs[1],
            JobConfig::Barcode { symbology: Symbology::Code128, width: 0, height: 0, .. },
        ));
        assert_eq!(config.jobs[2].file(), Path::new("qr.png"));
    }

    #[test]
    fn test_parse_defaults() {
        let config = parse_config(r#"{"jobs": []}"#.as_bytes()).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("cards"));
        assert_eq!(config.raster, RasterOptions::default());
    }

    #[test]
    fn test_parse_unknown_symbology() {
        let json = r#"{"jobs": [{"kind": "barcode", "data": "x", "symbology": "PDF417", "file": "x.png"}]}"#;
        assert!(matches!(parse_config(json.as_bytes()), Err(ConfigError::Loading(_))));
    }
}
