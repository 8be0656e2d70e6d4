use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Trailing window for coalescing target updates.
    pub debounce_ms: u64,
    pub workspace: WorkspaceOptions,
    pub my_blocks_category: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            workspace: WorkspaceOptions::default(),
            my_blocks_category: "My Blocks".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceOptions {
    pub zoom: ZoomOptions,
    pub grid: GridOptions,
    pub colours: ColourOptions,
    pub comments: bool,
    pub collapse: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
}

impl Default for WorkspaceOptions {
    fn default() -> Self {
        Self {
            zoom: ZoomOptions::default(),
            grid: GridOptions::default(),
            colours: ColourOptions::default(),
            comments: false,
            collapse: false,
            media: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomOptions {
    pub controls: bool,
    pub wheel: bool,
    pub start_scale: f64,
}

impl Default for ZoomOptions {
    fn default() -> Self {
        Self {
            controls: true,
            wheel: true,
            start_scale: 0.675,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    pub spacing: u32,
    pub length: u32,
    pub colour: String,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            spacing: 40,
            length: 2,
            colour: "#ddd".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColourOptions {
    pub workspace: String,
    pub flyout: String,
    pub toolbox: String,
    pub toolbox_selected: String,
    pub scrollbar: String,
    pub scrollbar_hover: String,
    pub insertion_marker: String,
    pub insertion_marker_opacity: f64,
    pub field_shadow: String,
    pub drag_shadow_opacity: f64,
}

impl Default for ColourOptions {
    fn default() -> Self {
        Self {
            workspace: "#F9F9F9".to_string(),
            flyout: "#F9F9F9".to_string(),
            toolbox: "#FFFFFF".to_string(),
            toolbox_selected: "#E9EEF2".to_string(),
            scrollbar: "#CECDCE".to_string(),
            scrollbar_hover: "#CECDCE".to_string(),
            insertion_marker: "#000000".to_string(),
            insertion_marker_opacity: 0.2,
            field_shadow: "rgba(255, 255, 255, 0.3)".to_string(),
            drag_shadow_opacity: 0.6,
        }
    }
}
