// src/repositories/theme_repository.rs

use std::sync::Arc;

use super::slot_repository::SlotRepository;
use crate::domain::Theme;
use crate::error::AppResult;

pub struct ThemeRepository {
    slots: Arc<dyn SlotRepository>,
    key: String,
}

impl ThemeRepository {
    pub fn new(slots: Arc<dyn SlotRepository>, key: impl Into<String>) -> Self {
        Self {
            slots,
            key: key.into(),
        }
    }

    pub fn load(&self) -> AppResult<Theme> {
        Ok(self
            .slots
            .read(&self.key)?
            .map(|raw| Theme::parse_or_default(&raw))
            .unwrap_or_default())
    }

    pub fn save(&self, theme: Theme) -> AppResult<()> {
        self.slots.write(&self.key, theme.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{InMemorySlotRepository, THEME_SLOT};

    #[test]
    fn test_default_is_light() {
        let repo = ThemeRepository::new(Arc::new(InMemorySlotRepository::new()), THEME_SLOT);
        assert_eq!(repo.load().unwrap(), Theme::Light);
    }

    #[test]
    fn test_save_and_load() {
        let repo = ThemeRepository::new(Arc::new(InMemorySlotRepository::new()), THEME_SLOT);
        repo.save(Theme::Dark).unwrap();
        assert_eq!(repo.load().unwrap(), Theme::Dark);
    }

    #[test]
    fn test_garbage_falls_back_to_light() {
        let slots = InMemorySlotRepository::with_slot(THEME_SLOT, "\"dark\"");
        let repo = ThemeRepository::new(Arc::new(slots), THEME_SLOT);
        assert_eq!(repo.load().unwrap(), Theme::Light);
    }
}
