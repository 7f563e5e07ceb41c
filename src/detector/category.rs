use std::fmt;

use serde::{Deserialize, Serialize};

/// Geometric segment surrounding the target.
///
/// The set is closed: histogram layout, table schema and collection slots are
/// all derived from which of these a setup registers, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Right,
    Left,
    Bottom,
    Front,
    Back,
    TopRight,
    TopLeft,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Right,
        Category::Left,
        Category::Bottom,
        Category::Front,
        Category::Back,
        Category::TopRight,
        Category::TopLeft,
    ];

    /// Short tag used in histogram, column, sensor and collection names.
    pub fn tag(self) -> &'static str {
        match self {
            Category::Right => "Right",
            Category::Left => "Left",
            Category::Bottom => "Bot",
            Category::Front => "Front",
            Category::Back => "Back",
            Category::TopRight => "TopR",
            Category::TopLeft => "TopL",
        }
    }

    /// Human-readable label used in histogram titles.
    pub fn label(self) -> &'static str {
        match self {
            Category::Right => "right",
            Category::Left => "left",
            Category::Bottom => "bottom",
            Category::Front => "front",
            Category::Back => "back",
            Category::TopRight => "top right",
            Category::TopLeft => "top left",
        }
    }

    pub fn default_sensor_name(self) -> String {
        format!("{}SD", self.tag())
    }

    pub fn default_collection_name(self) -> String {
        format!("{}HitsCollection", self.tag())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
