use stadium_sdk::{FanConfig, Intensity};

/// Holds the user's configuration for the session. Values are not checked
/// when edited; generation enforces non-empty team colors.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    config: FanConfig,
}

impl ConfigStore {
    #[must_use]
    pub fn new(config: FanConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &FanConfig {
        &self.config
    }

    pub fn set_sport(&mut self, sport: impl Into<String>) {
        self.config.sport = sport.into();
    }

    pub fn set_team_colors(&mut self, team_colors: impl Into<String>) {
        self.config.team_colors = team_colors.into();
    }

    pub fn set_atmosphere(&mut self, atmosphere: impl Into<String>) {
        self.config.atmosphere = atmosphere.into();
    }

    pub fn set_intensity(&mut self, intensity: Intensity) {
        self.config.intensity = intensity;
    }

    #[must_use]
    pub fn has_team_colors(&self) -> bool {
        !self.config.team_colors.is_empty()
    }

    /// Clear the team colors, keeping the other choices.
    pub fn reset(&mut self) {
        self.config.team_colors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stadium_sdk::{ATMOSPHERES, SPORTS};

    #[test]
    fn defaults_come_from_catalogs() {
        let store = ConfigStore::default();
        assert_eq!(store.config().sport, SPORTS[0]);
        assert_eq!(store.config().atmosphere, ATMOSPHERES[1]);
        assert_eq!(store.config().intensity, Intensity::High);
        assert!(!store.has_team_colors());
    }

    #[test]
    fn reset_only_clears_team_colors() {
        let mut store = ConfigStore::default();
        store.set_sport("Rugby");
        store.set_atmosphere("Golden Hour");
        store.set_intensity(Intensity::Low);
        store.set_team_colors("Green and Gold");

        store.reset();

        assert_eq!(
            store.config(),
            &FanConfig::default()
                .with_sport("Rugby")
                .with_atmosphere("Golden Hour")
                .with_intensity(Intensity::Low)
        );
    }
}
