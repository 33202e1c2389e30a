//! Per-compartment and camera-gate configuration, read once at construction.

use serde::{Deserialize, Serialize};

/// Shader swapping settings for one compartment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodConfig {
    /// `|`-separated names of the part's model nodes that become see-through.
    #[serde(default)]
    pub transparent_transforms: String,
    /// Shader applied to those nodes while the interior is shown from outside.
    #[serde(default = "default_transparent_shader")]
    pub transparent_shader_name: String,
    /// Shader applied on entering first person instead of each node's original.
    /// Empty means "restore the original".
    #[serde(default)]
    pub opaque_shader_name: String,
    /// When false, shaders are swapped once at startup and never touched again.
    #[serde(default = "default_true")]
    pub restore_shaders_on_iva: bool,
}

fn default_transparent_shader() -> String {
    "Transparent/Specular".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for PodConfig {
    fn default() -> Self {
        Self {
            transparent_transforms: String::new(),
            transparent_shader_name: default_transparent_shader(),
            opaque_shader_name: String::new(),
            restore_shaders_on_iva: default_true(),
        }
    }
}

impl PodConfig {
    /// Surface node names, trimmed, blanks dropped.
    pub fn surface_names(&self) -> Vec<&str> {
        self.transparent_transforms
            .split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Override shader name, if one is configured.
    pub fn opaque_shader_name(&self) -> Option<&str> {
        let name = self.opaque_shader_name.trim();
        (!name.is_empty()).then_some(name)
    }
}

/// Which cameras the culling gate drives and which layers hold interiors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Close-range exterior camera used in flight.
    #[serde(default = "default_flight_camera")]
    pub flight_camera: String,
    /// Camera used in the editor preview.
    #[serde(default = "default_editor_camera")]
    pub editor_camera: String,
    /// Render layers interior models live on.
    #[serde(default = "default_interior_layers")]
    pub interior_layers: Vec<u32>,
}

fn default_flight_camera() -> String {
    "Camera 00".to_string()
}
fn default_editor_camera() -> String {
    "Main Camera".to_string()
}
fn default_interior_layers() -> Vec<u32> {
    vec![16, 20]
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            flight_camera: default_flight_camera(),
            editor_camera: default_editor_camera(),
            interior_layers: default_interior_layers(),
        }
    }
}

impl GateConfig {
    /// Culling-mask bits covering every interior layer. Layers past 31 are ignored.
    pub fn layer_mask(&self) -> u32 {
        self.interior_layers.iter().fold(0, |mask, &layer| {
            if layer < 32 {
                mask | (1 << layer)
            } else {
                log::warn!("Ignoring interior layer {}: masks have 32 layers", layer);
                mask
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_names_are_trimmed_and_blanks_dropped() {
        let config = PodConfig {
            transparent_transforms: " windowA| windowB ||  ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.surface_names(), vec!["windowA", "windowB"]);
    }

    #[test]
    fn empty_opaque_name_means_no_override() {
        let mut config = PodConfig::default();
        assert_eq!(config.opaque_shader_name(), None);
        config.opaque_shader_name = "KSP/Specular".to_string();
        assert_eq!(config.opaque_shader_name(), Some("KSP/Specular"));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: PodConfig = ron::from_str("(transparent_transforms: \"glass\")").unwrap();
        assert_eq!(config.transparent_shader_name, "Transparent/Specular");
        assert!(config.restore_shaders_on_iva);
        let gate: GateConfig = ron::from_str("()").unwrap();
        assert_eq!(gate, GateConfig::default());
    }

    #[test]
    fn default_layer_mask_covers_layers_16_and_20() {
        assert_eq!(GateConfig::default().layer_mask(), (1 << 16) | (1 << 20));
        let gate = GateConfig {
            interior_layers: vec![3, 40],
            ..Default::default()
        };
        assert_eq!(gate.layer_mask(), 1 << 3);
    }
}
