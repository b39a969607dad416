use crate::{config, player, unlocks};

/// Everything the plugin knows between enable and disable.
pub struct Plugin {
    config: config::Config,
    unlock_cache: std::sync::OnceLock<unlocks::UnlockCache>,
    starting_note: std::sync::OnceLock<Option<unlocks::ClassHandle>>,
}

/// Only characters that are neither logging in nor carrying over existing player data are new.
pub fn is_new_character(is_from_login: bool, has_player_data: bool) -> bool {
    !is_from_login && !has_player_data
}

impl Plugin {
    pub fn new(config: config::Config) -> Self {
        Self {
            config,
            unlock_cache: std::sync::OnceLock::new(),
            starting_note: std::sync::OnceLock::new(),
        }
    }

    pub fn load(config_path: &std::path::Path) -> Self {
        Self::new(config::load_or_default(config_path))
    }

    pub fn config(&self) -> &config::Config {
        &self.config
    }

    pub fn unlock_cache(&self) -> Option<&unlocks::UnlockCache> {
        self.unlock_cache.get()
    }

    /// Builds the unlock cache. Must only be called once the host is done starting up, as classes can't be loaded before then.
    ///
    /// Returns false if the cache was already built.
    pub fn build_unlock_cache(&self, resolver: &impl unlocks::ClassResolver) -> bool {
        if self.unlock_cache.get().is_some() {
            log::warn!("unlock cache was built more than once?");
            return false;
        }
        self.unlock_cache
            .set(unlocks::build(&self.config, resolver))
            .is_ok()
    }

    fn starting_note(&self, resolver: &impl unlocks::ClassResolver) -> Option<unlocks::ClassHandle> {
        *self
            .starting_note
            .get_or_init(|| resolver.load_class(player::STARTING_NOTE_PATH))
    }

    pub fn on_new_player(
        &self,
        resolver: &impl unlocks::ClassResolver,
        player: &mut impl player::Player,
        is_new_character: bool,
    ) -> player::ApplyReport {
        let report = player::apply_unlocks(&self.config, self.unlock_cache(), player);
        if is_new_character {
            player::replace_starting_note(player, self.starting_note(resolver));
        }
        report
    }
}
