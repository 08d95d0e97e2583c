use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_defence_core::{CellCoord, TowerTypeId};

const LAYOUT_DOMAIN: &str = "td";
const LAYOUT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
pub(crate) const LAYOUT_HEADER: &str = "td:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Towers placed on a grid of known dimensions, in a form that can be pasted
/// between sessions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct TowerLayout {
    /// Number of grid rows.
    pub rows: u32,
    /// Number of grid columns.
    pub cols: u32,
    /// Edge length of a cell in pixels.
    pub tile_size: f32,
    /// Towers in placement order.
    pub towers: Vec<LayoutTower>,
}

impl TowerLayout {
    /// Encodes the layout into a single-line string.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let payload = LayoutPayload {
            tile_size: self.tile_size,
            towers: self.towers.clone(),
        };
        let json = serde_json::to_vec(&payload).map_err(LayoutTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{LAYOUT_HEADER}:{}x{}:{encoded}",
            self.rows, self.cols
        ))
    }

    /// Decodes a layout from its string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(LayoutTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != LAYOUT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != LAYOUT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (rows, cols) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let decoded: LayoutPayload =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        Ok(Self {
            rows,
            cols,
            tile_size: decoded.tile_size,
            towers: decoded.towers,
        })
    }
}

/// Tower captured within a layout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct LayoutTower {
    /// Catalogue entry of the tower.
    pub kind: TowerTypeId,
    /// Cell the tower occupies.
    pub cell: CellCoord,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct LayoutPayload {
    tile_size: f32,
    towers: Vec<LayoutTower>,
}

/// Errors that can occur while encoding or decoding layout strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("layout string was empty")]
    EmptyPayload,
    /// The prefix segment was missing.
    #[error("layout string is missing the prefix")]
    MissingPrefix,
    /// The version segment was missing.
    #[error("layout string is missing the version")]
    MissingVersion,
    /// The grid dimensions were missing.
    #[error("layout string is missing the grid dimensions")]
    MissingDimensions,
    /// The payload segment was missing.
    #[error("layout string is missing the payload")]
    MissingPayload,
    /// The prefix segment named another format.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The version segment named an unsupported revision.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode layout payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload could not be converted to or from JSON.
    #[error("could not parse layout payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());
    let (rows, cols) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;
    let cols = cols.trim().parse::<u32>().map_err(|_| invalid())?;

    if rows == 0 || cols == 0 {
        return Err(invalid());
    }

    Ok((rows, cols))
}
