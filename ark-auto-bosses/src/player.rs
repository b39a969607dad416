use crate::{config, unlocks};

/// A host object that was needed for a step but wasn't there.
#[derive(thiserror::Error, Clone, Copy, PartialEq, Eq, Debug)]
pub enum MissingState {
    #[error("player state is missing")]
    PlayerState,

    #[error("player data is missing")]
    PlayerData,

    #[error("persistent character stats are missing")]
    PersistentStats,

    #[error("player character is missing")]
    Character,

    #[error("inventory is missing")]
    Inventory,
}

/// Mutations on a single player's state in the host.
pub trait Player {
    fn steam_id(&self) -> u64;

    fn defeat_boss(&mut self, boss: &str, difficulty: u32) -> Result<(), MissingState>;

    fn unlock_engram(&mut self, engram: unlocks::ClassHandle) -> Result<(), MissingState>;

    fn set_chibi_levels(&mut self, levels: u32) -> Result<(), MissingState>;

    /// Sets the persistent "has unlocked all explorer notes" flag.
    fn mark_explorer_notes_unlocked(&mut self) -> Result<(), MissingState>;

    /// Notifies the player's character of the unlocked notes and forces it to replicate.
    fn refresh_explorer_notes(&mut self) -> Result<(), MissingState>;

    fn grant_achievement_tag(&mut self, tag: &str) -> Result<(), MissingState>;

    fn save(&mut self) -> Result<(), MissingState>;

    /// Removes any item of the given template from the character's inventory and adds a fresh one.
    fn replace_item(&mut self, item: unlocks::ClassHandle) -> Result<(), MissingState>;
}

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub struct ApplyReport {
    pub applied: usize,
    pub skipped: usize,
}

impl ApplyReport {
    fn record(&mut self, step: &str, r: Result<(), MissingState>) {
        match r {
            Ok(()) => {
                self.applied += 1;
            }
            Err(e) => {
                log::debug!("skipping {}: {}", step, e);
                self.skipped += 1;
            }
        }
    }
}

pub fn apply_unlocks(
    config: &config::Config,
    cache: Option<&unlocks::UnlockCache>,
    player: &mut impl Player,
) -> ApplyReport {
    log::debug!("Processing Unlocks for {}.", player.steam_id());
    let mut report = ApplyReport::default();

    for boss in config.defeated_bosses.iter() {
        report.record("defeat boss", player.defeat_boss(&boss.boss, boss.difficulty));
    }

    if let Some(cache) = cache {
        for engram in cache.iter() {
            report.record("unlock engram", player.unlock_engram(*engram));
        }
    } else {
        log::warn!("unlock cache is not ready yet, no engrams granted");
    }

    report.record("chibi levels", player.set_chibi_levels(config.chibi_levels));

    if config.unlock_explorer_notes {
        report.record("explorer notes", player.mark_explorer_notes_unlocked());
        report.record("explorer notes refresh", player.refresh_explorer_notes());
    }

    for tag in config.generalized_achievement_tag_grants.iter() {
        report.record("achievement tag", player.grant_achievement_tag(tag));
    }

    report.record("save", player.save());

    log::debug!(
        "applied {} unlock steps for {} ({} skipped)",
        report.applied,
        player.steam_id(),
        report.skipped
    );
    report
}

pub const STARTING_NOTE_PATH: &str = "Blueprint'/Game/PrimalEarth/CoreBlueprints/Items/Notes/PrimalItem_StartingNote.PrimalItem_StartingNote'";

pub fn replace_starting_note(
    player: &mut impl Player,
    starting_note: Option<unlocks::ClassHandle>,
) -> bool {
    let Some(starting_note) = starting_note else {
        log::debug!("skipping starting note: class did not resolve");
        return false;
    };
    match player.replace_item(starting_note) {
        Ok(()) => true,
        Err(e) => {
            log::debug!("skipping starting note: {}", e);
            false
        }
    }
}
