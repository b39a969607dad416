//! In-memory stand-ins for the host, for tests.

use crate::{config, player, unlocks};
use unlocks::ClassHandle;

pub fn config_with(bosses: &[(&str, &str, u32)], engrams: &[&str]) -> config::Config {
    config::Config {
        defeated_bosses: bosses
            .iter()
            .map(|(boss, blueprint, difficulty)| config::DefeatedBoss {
                boss: boss.to_string(),
                blueprint: blueprint.to_string(),
                difficulty: *difficulty,
            })
            .collect(),
        additional_engrams: engrams.iter().map(|e| e.to_string()).collect(),
        ..Default::default()
    }
}

#[derive(Default)]
pub struct FakeResolver {
    classes: std::collections::HashMap<String, ClassHandle>,
    death_engrams: std::collections::HashMap<ClassHandle, Vec<ClassHandle>>,
    pub loads: std::cell::Cell<usize>,
}

impl FakeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, path: &str, class: usize) -> Self {
        self.classes.insert(path.to_string(), ClassHandle(class));
        self
    }

    pub fn with_death_engrams(mut self, class: usize, engrams: &[usize]) -> Self {
        self.death_engrams.insert(
            ClassHandle(class),
            engrams.iter().copied().map(ClassHandle).collect(),
        );
        self
    }
}

impl unlocks::ClassResolver for FakeResolver {
    fn load_class(&self, path: &str) -> Option<ClassHandle> {
        self.loads.set(self.loads.get() + 1);
        self.classes.get(path).copied()
    }

    fn death_engram_classes(&self, class: ClassHandle) -> Option<Vec<ClassHandle>> {
        self.death_engrams.get(&class).cloned()
    }
}

/// Records every mutation the pipeline makes. Grants and markers are sets, like they are in the host.
#[derive(Default)]
pub struct FakePlayer {
    pub steam_id: u64,

    pub missing_player_state: bool,
    pub missing_player_data: bool,
    pub missing_character: bool,
    pub missing_inventory: bool,

    pub calls: Vec<&'static str>,
    pub defeated_bosses: std::collections::HashSet<(String, u32)>,
    pub engrams: std::collections::HashSet<ClassHandle>,
    pub chibi_levels: u32,
    pub explorer_notes_unlocked: bool,
    pub explorer_note_refreshes: usize,
    pub achievement_tags: std::collections::HashSet<String>,
    pub saves: usize,
    pub items: Vec<ClassHandle>,
    pub fresh_items: usize,
}

impl FakePlayer {
    pub fn new(steam_id: u64) -> Self {
        Self {
            steam_id,
            ..Default::default()
        }
    }

    fn player_data(&self) -> Result<(), player::MissingState> {
        if self.missing_player_data {
            return Err(player::MissingState::PlayerData);
        }
        Ok(())
    }

    fn character(&self) -> Result<(), player::MissingState> {
        if self.missing_character {
            return Err(player::MissingState::Character);
        }
        Ok(())
    }
}

impl player::Player for FakePlayer {
    fn steam_id(&self) -> u64 {
        self.steam_id
    }

    fn defeat_boss(&mut self, boss: &str, difficulty: u32) -> Result<(), player::MissingState> {
        self.calls.push("defeat_boss");
        self.player_data()?;
        self.defeated_bosses.insert((boss.to_string(), difficulty));
        Ok(())
    }

    fn unlock_engram(&mut self, engram: ClassHandle) -> Result<(), player::MissingState> {
        self.calls.push("unlock_engram");
        if self.missing_player_state {
            return Err(player::MissingState::PlayerState);
        }
        self.engrams.insert(engram);
        Ok(())
    }

    fn set_chibi_levels(&mut self, levels: u32) -> Result<(), player::MissingState> {
        self.calls.push("set_chibi_levels");
        self.player_data()?;
        self.chibi_levels = levels;
        Ok(())
    }

    fn mark_explorer_notes_unlocked(&mut self) -> Result<(), player::MissingState> {
        self.calls.push("mark_explorer_notes_unlocked");
        self.player_data()?;
        self.explorer_notes_unlocked = true;
        Ok(())
    }

    fn refresh_explorer_notes(&mut self) -> Result<(), player::MissingState> {
        self.calls.push("refresh_explorer_notes");
        self.character()?;
        self.explorer_note_refreshes += 1;
        Ok(())
    }

    fn grant_achievement_tag(&mut self, tag: &str) -> Result<(), player::MissingState> {
        self.calls.push("grant_achievement_tag");
        self.player_data()?;
        self.achievement_tags.insert(tag.to_string());
        Ok(())
    }

    fn save(&mut self) -> Result<(), player::MissingState> {
        self.calls.push("save");
        self.player_data()?;
        self.saves += 1;
        Ok(())
    }

    fn replace_item(&mut self, item: ClassHandle) -> Result<(), player::MissingState> {
        self.calls.push("replace_item");
        self.character()?;
        if self.missing_inventory {
            return Err(player::MissingState::Inventory);
        }
        self.items.retain(|i| *i != item);
        self.items.push(item);
        self.fresh_items += 1;
        Ok(())
    }
}
