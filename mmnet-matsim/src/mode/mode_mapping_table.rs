use std::collections::BTreeSet;

use indexmap::IndexMap;
use mmnet_core::model::{Mode, ModeId, PredefinedModeType};

use crate::config::ModeMappingConfig;

/// MATSim mode token of public transport modes
pub const DEFAULT_PT_TOKEN: &str = "pt";
/// MATSim mode token of every other predefined mode
pub const DEFAULT_CAR_TOKEN: &str = "car";
/// predefined modes not activated by default
pub const DEFAULT_DEACTIVATED: [PredefinedModeType; 2] =
    [PredefinedModeType::Bicycle, PredefinedModeType::Pedestrian];

/// the MATSim token a predefined mode maps to unless overridden. `None` for custom modes.
pub fn default_token(mode: PredefinedModeType) -> Option<&'static str> {
    match mode {
        PredefinedModeType::Custom => None,
        m if m.is_public_transport() => Some(DEFAULT_PT_TOKEN),
        _ => Some(DEFAULT_CAR_TOKEN),
    }
}

/// maps predefined mode types to MATSim mode tokens and tracks which modes are
/// activated. only modes that are both activated and mapped end up in the output.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeMappingTable {
    tokens: IndexMap<PredefinedModeType, String>,
    activated: BTreeSet<PredefinedModeType>,
}

impl Default for ModeMappingTable {
    fn default() -> Self {
        let tokens = PredefinedModeType::ALL
            .iter()
            .filter_map(|m| default_token(*m).map(|t| (*m, String::from(t))))
            .collect();
        let activated = PredefinedModeType::ALL
            .iter()
            .filter(|m| !DEFAULT_DEACTIVATED.contains(m))
            .copied()
            .collect();
        Self { tokens, activated }
    }
}

impl From<&ModeMappingConfig> for ModeMappingTable {
    fn from(config: &ModeMappingConfig) -> Self {
        let mut table = ModeMappingTable::default();
        if config.deactivate_all {
            table.deactivate_all();
        }
        for mode in config.activate.iter() {
            table.activate(*mode);
        }
        for mode in config.deactivate.iter() {
            table.deactivate(*mode);
        }
        for (mode, token) in config.tokens.iter() {
            table.override_mapping(*mode, token);
        }
        for mode in config.unmapped.iter() {
            table.remove_mapping(*mode);
        }
        table
    }
}

impl ModeMappingTable {
    /// replaces the MATSim token of a mode
    pub fn override_mapping(&mut self, mode: PredefinedModeType, token: &str) {
        if mode == PredefinedModeType::Custom {
            log::warn!("custom modes cannot be mapped, ignoring token '{token}'");
            return;
        }
        self.tokens.insert(mode, token.to_string());
    }

    /// removes the MATSim token of a mode, which excludes it from the output
    pub fn remove_mapping(&mut self, mode: PredefinedModeType) {
        self.tokens.shift_remove(&mode);
    }

    pub fn activate(&mut self, mode: PredefinedModeType) {
        self.activated.insert(mode);
    }

    pub fn deactivate(&mut self, mode: PredefinedModeType) {
        self.activated.remove(&mode);
    }

    pub fn deactivate_all(&mut self) {
        self.activated.clear();
    }

    pub fn is_activated(&self, mode: PredefinedModeType) -> bool {
        self.activated.contains(&mode)
    }

    pub fn token(&self, mode: PredefinedModeType) -> Option<&str> {
        self.tokens.get(&mode).map(String::as_str)
    }

    /// the MATSim token of every candidate mode that is activated and mapped, in
    /// candidate order. custom modes are never included.
    pub fn activated_mapping<'a, I>(&self, modes: I) -> IndexMap<ModeId, String>
    where
        I: IntoIterator<Item = &'a Mode>,
    {
        let mut result = IndexMap::new();
        for mode in modes {
            let mode_type = mode.predefined_type;
            if mode.is_custom() {
                log::info!(
                    "mode '{}' is a custom mode which is not supported, skipped",
                    mode.xml_id
                );
                continue;
            }
            if !self.is_activated(mode_type) {
                log::debug!("mode '{}' ({mode_type}) is not activated", mode.xml_id);
                continue;
            }
            match self.token(mode_type) {
                Some(token) => {
                    log::debug!("mode '{}' ({mode_type}) maps to '{token}'", mode.xml_id);
                    result.insert(mode.id, token.to_string());
                }
                None => log::warn!(
                    "mode '{}' ({mode_type}) is activated but has no MATSim mode, skipped",
                    mode.xml_id
                ),
            }
        }
        result
    }
}
