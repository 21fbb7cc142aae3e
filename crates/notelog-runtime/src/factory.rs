//! `SessionFactory` implementation that launches real editor processes.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use notelog_core::{
    DriverSettings, EditorSession, KeyboardSink, LogError, ReadinessProbe, SessionFactory,
    validate_settings,
};

use crate::instance::EditorInstance;
use crate::keyboard::platform_keyboard;
use crate::readiness::platform_probe;

/// Launches one `EditorInstance` per session with shared settings,
/// keyboard sink and readiness probe.
pub struct EditorSessionFactory {
    settings: Arc<DriverSettings>,
    keyboard: Arc<dyn KeyboardSink>,
    probe: Arc<dyn ReadinessProbe>,
}

impl EditorSessionFactory {
    pub fn new(
        settings: DriverSettings,
        keyboard: Arc<dyn KeyboardSink>,
        probe: Arc<dyn ReadinessProbe>,
    ) -> Result<Self, LogError> {
        validate_settings(&settings)?;
        Ok(Self {
            settings: Arc::new(settings),
            keyboard,
            probe,
        })
    }

    /// Factory wired with the platform keyboard sink and readiness probe.
    pub fn for_platform(settings: DriverSettings) -> Result<Self, LogError> {
        let keyboard = platform_keyboard()?;
        let probe = platform_probe(&settings);
        Self::new(settings, keyboard, probe)
    }

    pub fn settings(&self) -> &DriverSettings {
        &self.settings
    }
}

#[async_trait]
impl SessionFactory for EditorSessionFactory {
    async fn open(&self, destination: &Path) -> Result<Box<dyn EditorSession>, LogError> {
        let instance = EditorInstance::launch(
            destination,
            self.settings.clone(),
            self.keyboard.clone(),
            self.probe.as_ref(),
        )
        .await?;
        Ok(Box::new(instance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::XdotoolKeyboard;
    use crate::readiness::SettleProbe;
    use std::time::Duration;

    #[test]
    fn invalid_settings_rejected() {
        let settings = DriverSettings {
            editor_program: String::new(),
            ..DriverSettings::default()
        };
        let result = EditorSessionFactory::new(
            settings,
            Arc::new(XdotoolKeyboard::new("xdotool")),
            Arc::new(SettleProbe::new(Duration::ZERO)),
        );
        assert!(matches!(result, Err(LogError::Settings(_))));
    }
}
