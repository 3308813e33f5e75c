use std::{fs, io, path::Path};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    board::{dimensions, validate_density, Board},
    error::{Error, Result},
};

pub const DEFAULT_PATH: &str = "options.json";

/// Board dimensions and seeding density, as read from `options.json`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardConfig {
    #[serde(alias = "Width")]
    pub width: usize,
    #[serde(alias = "Height")]
    pub height: usize,
    #[serde(alias = "CellSize")]
    pub cell_size: usize,
    #[serde(alias = "LiveDensity", default = "default_live_density")]
    pub live_density: f64,
}

fn default_live_density() -> f64 {
    0.1
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 20,
            cell_size: 1,
            live_density: 0.5,
        }
    }
}

impl BoardConfig {
    pub fn from_json(json: &str, path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|source| Error::ConfigurationParse {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the config at `path`, or `None` if there is no such file.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file");
                return Ok(None);
            }
            Err(e) => return Err(Error::io(path, e)),
        };
        let config = Self::from_json(&json, path)?;
        info!(path = %path.display(), ?config, "loaded config");
        Ok(Some(config))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::load(path)?.unwrap_or_default())
    }

    /// Checks everything [`Board::new`] would reject, without building a board.
    pub fn validate(&self) -> Result<()> {
        dimensions(self.width, self.height, self.cell_size)?;
        validate_density(self.live_density)
    }

    pub fn build(&self) -> Result<Board> {
        self.build_with_rng(&mut rand::thread_rng())
    }

    pub fn build_with_rng<R>(&self, rng: &mut R) -> Result<Board>
    where
        R: Rng + ?Sized,
    {
        Board::with_rng(
            self.width,
            self.height,
            self.cell_size,
            self.live_density,
            rng,
        )
    }
}
