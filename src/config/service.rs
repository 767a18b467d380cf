//! Tuning for the notification queue, the public board and the seed directory.

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use crate::application::BoardLimits;

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Messages buffered before new ones are dropped
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl NotificationConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.queue_capacity == 0 {
            return Err(ValidationError::InvalidQueueCapacity);
        }
        Ok(())
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_queue_capacity() -> usize {
    1024
}

/// Page sizes for the public board and its searches.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl BoardConfig {
    pub fn limits(&self) -> BoardLimits {
        BoardLimits {
            default_limit: self.default_limit,
            max_limit: self.max_limit,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_limit == 0 || self.default_limit > self.max_limit {
            return Err(ValidationError::InvalidBoardLimits);
        }
        Ok(())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_limit() -> usize {
    50
}

fn default_max_limit() -> usize {
    200
}

/// Users, campaigns and grants loaded at startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryConfig {
    /// JSON seed file; without one the directory starts empty
    pub seed_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_board_limits() {
        assert_eq!(BoardConfig::default().limits(), BoardLimits::default());
        assert_eq!(NotificationConfig::default().queue_capacity, 1024);
    }

    #[test]
    fn default_limit_above_max_is_invalid() {
        let config = BoardConfig {
            default_limit: 300,
            max_limit: 200,
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidBoardLimits)));
    }

    #[test]
    fn zero_queue_capacity_is_invalid() {
        let config = NotificationConfig { queue_capacity: 0 };
        assert!(config.validate().is_err());
    }
}
