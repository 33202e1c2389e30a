//! Swapping hull surfaces between a see-through shader and their originals.

use crate::config::PodConfig;
use crate::error::{AssetKind, InteriorError};
use crate::host::{SceneNodes, ShaderLibrary};
use engine_core::{NodeId, PartId, ShaderId};

/// A surface node and the shader it had before it was made transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderBackup {
    pub node: NodeId,
    pub original: ShaderId,
}

/// Tracks the surfaces of one compartment. Built once at startup; the backup
/// list never changes afterwards.
#[derive(Debug, Clone, Default)]
pub struct ShaderSwapManager {
    backups: Vec<ShaderBackup>,
    transparent: Option<ShaderId>,
    opaque: Option<ShaderId>,
    restore_enabled: bool,
}

impl ShaderSwapManager {
    /// Resolve every configured surface, back up its shader and make it transparent.
    ///
    /// A surface that cannot be resolved is logged and skipped; the rest still
    /// get tracked.
    pub fn build<H: SceneNodes + ShaderLibrary + ?Sized>(host: &mut H, part: PartId, config: &PodConfig) -> Self {
        let mut manager = Self {
            restore_enabled: config.restore_shaders_on_iva,
            ..Default::default()
        };

        let names = config.surface_names();
        if !names.is_empty() {
            manager.transparent = host.find_shader(&config.transparent_shader_name);
            match manager.transparent {
                Some(transparent) => {
                    for name in names {
                        if let Err(e) = manager.track(host, part, name, transparent) {
                            log::warn!("{}: skipping surface: {}", part, e);
                        }
                    }
                }
                None => log::error!(
                    "{}: {}; hull stays opaque",
                    part,
                    InteriorError::asset(AssetKind::Shader, config.transparent_shader_name.as_str())
                ),
            }
        }

        if let Some(name) = config.opaque_shader_name() {
            manager.opaque = host.find_shader(name);
            if manager.opaque.is_none() {
                log::warn!(
                    "{}: {}; restoring original shaders instead",
                    part,
                    InteriorError::asset(AssetKind::Shader, name)
                );
            }
        }

        log::debug!("{}: tracking {} transparent surfaces", part, manager.backups.len());
        manager
    }

    fn track<H: SceneNodes + ?Sized>(
        &mut self,
        host: &mut H,
        part: PartId,
        name: &str,
        transparent: ShaderId,
    ) -> Result<(), InteriorError> {
        let node = host
            .find_model_node(part, name)
            .ok_or_else(|| InteriorError::asset(AssetKind::Node, name))?;
        if self.backups.iter().any(|b| b.node == node) {
            return Ok(());
        }
        let original = host
            .shader(node)
            .ok_or_else(|| InteriorError::asset(AssetKind::Shader, format!("material of {}", name)))?;
        host.set_shader(node, transparent)?;
        self.backups.push(ShaderBackup { node, original });
        Ok(())
    }

    pub fn backups(&self) -> &[ShaderBackup] {
        &self.backups
    }

    /// Set every tracked surface transparent, or back to the override shader
    /// (if configured) or its own original. Does nothing when restoring is disabled.
    pub fn apply<H: SceneNodes + ?Sized>(&self, host: &mut H, transparent: bool) {
        if !self.restore_enabled {
            return;
        }
        for backup in &self.backups {
            let shader = match (transparent, self.transparent) {
                (true, Some(t)) => t,
                (true, None) => continue,
                (false, _) => self.opaque.unwrap_or(backup.original),
            };
            if let Err(e) = host.set_shader(backup.node, shader) {
                log::warn!("Could not set shader on {}: {}", backup.node, e);
            }
        }
    }
}
