//! Preprocessing configuration

use serde::{Deserialize, Serialize};

/// Rule used to cap an outlying numeric column at its IQR upper whisker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PriceCapConfig {
    /// Column to cap
    pub column: String,
    /// Whisker multiplier applied to the interquartile range
    pub iqr_factor: f64,
    /// Values at or above this ceiling are replaced by the whisker.
    /// `None` replaces every value above the whisker.
    pub sentinel: Option<f64>,
}

impl Default for PriceCapConfig {
    fn default() -> Self {
        Self {
            column: "avg_price_per_room".to_string(),
            iqr_factor: 1.5,
            sentinel: Some(500.0),
        }
    }
}

/// Remaps out-of-range integer codes onto the nearest valid code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CategoryRemapConfig {
    pub column: String,
    /// Accepted codes; anything else is moved to the nearest one
    pub valid: Vec<i64>,
}

impl Default for CategoryRemapConfig {
    fn default() -> Self {
        Self {
            column: "no_of_children".to_string(),
            valid: vec![0, 1, 2, 3],
        }
    }
}

/// Configuration for booking data cleaning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Identifier column dropped before modeling
    pub id_column: String,

    /// Outcome column
    pub target_column: String,

    /// Label mapped to 1
    pub positive_label: String,

    /// Label mapped to 0
    pub negative_label: String,

    /// Categorical outlier remapping
    pub category_remap: Option<CategoryRemapConfig>,

    /// Numeric whisker capping
    pub price_cap: Option<PriceCapConfig>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            id_column: "Booking_ID".to_string(),
            target_column: "booking_status".to_string(),
            positive_label: "Canceled".to_string(),
            negative_label: "Not_Canceled".to_string(),
            category_remap: Some(CategoryRemapConfig::default()),
            price_cap: Some(PriceCapConfig::default()),
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the sentinel ceiling (`None` for strict whisker capping)
    pub fn with_price_sentinel(mut self, sentinel: Option<f64>) -> Self {
        if let Some(cap) = self.price_cap.as_mut() {
            cap.sentinel = sentinel;
        }
        self
    }

    /// Builder method to disable price capping
    pub fn without_price_cap(mut self) -> Self {
        self.price_cap = None;
        self
    }

    /// Builder method to set the target column
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_column = target.into();
        self
    }
}

/// Configuration for the train/test split
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Fraction of rows held out for testing
    pub test_size: f64,
    /// Seed for the shuffling RNG
    pub random_state: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_size: 0.3,
            random_state: 1,
        }
    }
}

impl SplitConfig {
    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }
}
