use ratmaze_core::{Board, BLOCKS_PER_CELL, DEFAULT_SURFACE_PIXELS, PIXELS_PER_UNIT};
use ratmaze_system_spawning::Quotas;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seed used when the host does not provide one.
pub const DEFAULT_SEED: u64 = 0x5eed_f00d;

/// Host-provided parameters of a session.
///
/// Missing fields fall back to the defaults, so an empty TOML document is a
/// valid configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Width of the drawing surface in pixels.
    pub surface_width: u32,
    /// Height of the drawing surface in pixels.
    pub surface_height: u32,
    /// Surface pixels drawn per grid unit.
    pub pixels_per_unit: u32,
    /// Seed feeding piece placement and adversary wandering.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            surface_width: DEFAULT_SURFACE_PIXELS,
            surface_height: DEFAULT_SURFACE_PIXELS,
            pixels_per_unit: PIXELS_PER_UNIT,
            seed: DEFAULT_SEED,
        }
    }
}

impl SessionConfig {
    /// Derives the board geometry and checks that the quotas fit on it.
    pub fn board(&self) -> Result<Board, ConfigError> {
        if self.pixels_per_unit == 0 {
            return Err(ConfigError::ZeroPixelScale);
        }

        let board = Board::from_surface(
            self.surface_width,
            self.surface_height,
            self.pixels_per_unit,
            BLOCKS_PER_CELL,
        );
        if board.slot_count() == 0 {
            return Err(ConfigError::SurfaceTooSmall {
                width: board.width(),
                height: board.height(),
                stride: board.stride(),
            });
        }

        let required = Quotas::default().total();
        let slots = board.slot_count();
        if u64::try_from(required).unwrap_or(u64::MAX) >= slots {
            return Err(ConfigError::InsufficientCapacity { required, slots });
        }

        Ok(board)
    }
}

/// Reasons a session configuration may be refused.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The pixel scale would divide by zero.
    #[error("pixels_per_unit must be greater than zero")]
    ZeroPixelScale,
    /// Not even one piece fits on the derived board.
    #[error("a {width}x{height} grid cannot hold a single {stride}x{stride} piece")]
    SurfaceTooSmall {
        /// Derived grid width in units.
        width: u32,
        /// Derived grid height in units.
        height: u32,
        /// Piece footprint edge in units.
        stride: u32,
    },
    /// The quotas leave no free slot, so spawning could never terminate.
    #[error("board offers {slots} slots but the quotas need more than {required}")]
    InsufficientCapacity {
        /// Pieces kept on the board once every quota is met.
        required: usize,
        /// Placement slots offered by the board.
        slots: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds_default_board() {
        assert_eq!(SessionConfig::default().board(), Ok(Board::default()));
    }

    #[test]
    fn zero_scale_is_rejected() {
        let config = SessionConfig {
            pixels_per_unit: 0,
            ..SessionConfig::default()
        };
        assert_eq!(config.board(), Err(ConfigError::ZeroPixelScale));
    }

    #[test]
    fn tiny_surface_is_rejected() {
        let config = SessionConfig {
            surface_width: 20,
            surface_height: 20,
            ..SessionConfig::default()
        };
        assert!(matches!(
            config.board(),
            Err(ConfigError::SurfaceTooSmall { width: 4, .. })
        ));
    }

    #[test]
    fn crowded_surface_is_rejected() {
        // 30 x 30 units offer 6 x 6 = 36 slots, enough for 30 pieces.
        let roomy = SessionConfig {
            surface_width: 150,
            surface_height: 150,
            ..SessionConfig::default()
        };
        assert!(roomy.board().is_ok());

        // 25 x 30 units offer 5 x 6 = 30 slots, leaving none free.
        let crowded = SessionConfig {
            surface_width: 125,
            surface_height: 150,
            ..SessionConfig::default()
        };
        assert_eq!(
            crowded.board(),
            Err(ConfigError::InsufficientCapacity {
                required: 30,
                slots: 30,
            })
        );
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: SessionConfig = toml::from_str("seed = 7\n").expect("valid toml");
        assert_eq!(config.seed, 7);
        assert_eq!(config.surface_width, DEFAULT_SURFACE_PIXELS);

        let unknown = toml::from_str::<SessionConfig>("speed = 2\n");
        assert!(unknown.is_err());
    }
}
