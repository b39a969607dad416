//! Glue between the plugin and the game server.
//!
//! The host's C++ side hands us a [`HostApi`] table of plain C functions wrapping the engine calls we need. Everything
//! in here deals in raw engine pointers and must only run on the game thread.

use crate::{config, hooks, logging, player, plugin, unlocks};
use std::ffi::{c_char, c_void};

pub enum AShooterGameMode {}
pub enum APlayerController {}
pub enum AShooterPlayerState {}
pub enum AShooterCharacter {}
pub enum UPrimalPlayerData {}
pub enum UPrimalInventoryComponent {}
pub enum UPrimalItem {}
pub enum UClass {}
pub enum FPrimalPlayerCharacterConfigStruct {}

pub const HOST_API_VERSION: u32 = 1;

#[repr(C)]
#[derive(Clone, Copy)]
pub struct HostApi {
    /// Must be [`HOST_API_VERSION`]. Always the first field, so it can be checked before anything else is read.
    pub version: u32,

    pub get_address: unsafe extern "C" fn(name: *const c_char) -> *mut c_void,
    pub log: unsafe extern "C" fn(message: *const c_char),
    pub delay_execute: unsafe extern "C" fn(callback: unsafe extern "C" fn(), delay_seconds: i32),

    pub load_class: unsafe extern "C" fn(path: *const c_char) -> *mut UClass,
    /// Returns -1 if the class has no default object.
    pub death_give_engram_classes_num: unsafe extern "C" fn(class: *mut UClass) -> i32,
    pub death_give_engram_class_at:
        unsafe extern "C" fn(class: *mut UClass, index: i32) -> *mut UClass,

    pub get_player_state:
        unsafe extern "C" fn(controller: *mut APlayerController) -> *mut AShooterPlayerState,
    pub get_player_data:
        unsafe extern "C" fn(player_state: *mut AShooterPlayerState) -> *mut UPrimalPlayerData,
    pub get_last_controlled_character:
        unsafe extern "C" fn(controller: *mut APlayerController) -> *mut AShooterCharacter,
    pub get_inventory:
        unsafe extern "C" fn(character: *mut AShooterCharacter) -> *mut UPrimalInventoryComponent,
    pub get_steam_id: unsafe extern "C" fn(controller: *mut APlayerController) -> u64,

    pub defeated_boss: unsafe extern "C" fn(
        player_data: *mut UPrimalPlayerData,
        boss_character: *mut AShooterCharacter,
        difficulty_index: u32,
        tag_override: *const c_char,
        controller: *mut APlayerController,
    ),
    pub server_unlock_engram:
        unsafe extern "C" fn(player_state: *mut AShooterPlayerState, engram: *mut UClass),
    pub set_chibi_levels: unsafe extern "C" fn(
        player_data: *mut UPrimalPlayerData,
        levels: u32,
        controller: *mut APlayerController,
    ),
    /// Returns false if the player data has no persistent character stats to set the flag on.
    pub set_unlocked_all_explorer_notes:
        unsafe extern "C" fn(player_data: *mut UPrimalPlayerData) -> bool,
    pub bp_unlocked_all_explorer_notes: unsafe extern "C" fn(character: *mut AShooterCharacter),
    pub force_replicate_now: unsafe extern "C" fn(character: *mut AShooterCharacter),
    pub grant_generalized_achievement_tag: unsafe extern "C" fn(
        player_data: *mut UPrimalPlayerData,
        tag: *const c_char,
        controller: *mut APlayerController,
    ),
    pub save_player_data: unsafe extern "C" fn(player_data: *mut UPrimalPlayerData),

    pub get_item_of_template: unsafe extern "C" fn(
        inventory: *mut UPrimalInventoryComponent,
        class: *mut UClass,
    ) -> *mut UPrimalItem,
    pub remove_item:
        unsafe extern "C" fn(inventory: *mut UPrimalInventoryComponent, item: *mut UPrimalItem),
    pub add_new_item: unsafe extern "C" fn(
        inventory: *mut UPrimalInventoryComponent,
        class: *mut UClass,
    ) -> *mut UPrimalItem,
}

fn to_cstring(s: &str) -> std::ffi::CString {
    std::ffi::CString::new(s.replace('\0', "")).unwrap_or_default()
}

fn non_null<T>(p: *mut T, missing: player::MissingState) -> Result<*mut T, player::MissingState> {
    if p.is_null() {
        Err(missing)
    } else {
        Ok(p)
    }
}

pub struct Host<'a> {
    api: &'a HostApi,
}

impl<'a> Host<'a> {
    pub fn new(api: &'a HostApi) -> Self {
        Self { api }
    }
}

impl<'a> unlocks::ClassResolver for Host<'a> {
    fn load_class(&self, path: &str) -> Option<unlocks::ClassHandle> {
        let path = to_cstring(path);
        let class = unsafe { (self.api.load_class)(path.as_ptr()) };
        if class.is_null() {
            None
        } else {
            Some(unlocks::ClassHandle(class as usize))
        }
    }

    fn death_engram_classes(&self, class: unlocks::ClassHandle) -> Option<Vec<unlocks::ClassHandle>> {
        let class = class.0 as *mut UClass;
        let n = unsafe { (self.api.death_give_engram_classes_num)(class) };
        if n < 0 {
            return None;
        }
        Some(
            (0..n)
                .map(|i| unsafe { (self.api.death_give_engram_class_at)(class, i) })
                .filter(|engram| !engram.is_null())
                .map(|engram| unlocks::ClassHandle(engram as usize))
                .collect(),
        )
    }
}

pub struct Player<'a> {
    api: &'a HostApi,
    controller: *mut APlayerController,
}

impl<'a> Player<'a> {
    pub unsafe fn new(api: &'a HostApi, controller: *mut APlayerController) -> Self {
        Self { api, controller }
    }

    fn player_state(&self) -> Result<*mut AShooterPlayerState, player::MissingState> {
        non_null(
            unsafe { (self.api.get_player_state)(self.controller) },
            player::MissingState::PlayerState,
        )
    }

    fn player_data(&self) -> Result<*mut UPrimalPlayerData, player::MissingState> {
        let player_state = self.player_state()?;
        non_null(
            unsafe { (self.api.get_player_data)(player_state) },
            player::MissingState::PlayerData,
        )
    }

    fn character(&self) -> Result<*mut AShooterCharacter, player::MissingState> {
        non_null(
            unsafe { (self.api.get_last_controlled_character)(self.controller) },
            player::MissingState::Character,
        )
    }

    fn inventory(&self) -> Result<*mut UPrimalInventoryComponent, player::MissingState> {
        let character = self.character()?;
        non_null(
            unsafe { (self.api.get_inventory)(character) },
            player::MissingState::Inventory,
        )
    }
}

impl<'a> player::Player for Player<'a> {
    fn steam_id(&self) -> u64 {
        unsafe { (self.api.get_steam_id)(self.controller) }
    }

    fn defeat_boss(&mut self, boss: &str, difficulty: u32) -> Result<(), player::MissingState> {
        let player_data = self.player_data()?;
        let boss = to_cstring(boss);
        unsafe {
            (self.api.defeated_boss)(
                player_data,
                std::ptr::null_mut(),
                difficulty,
                boss.as_ptr(),
                self.controller,
            );
        }
        Ok(())
    }

    fn unlock_engram(&mut self, engram: unlocks::ClassHandle) -> Result<(), player::MissingState> {
        let player_state = self.player_state()?;
        unsafe { (self.api.server_unlock_engram)(player_state, engram.0 as *mut UClass) };
        Ok(())
    }

    fn set_chibi_levels(&mut self, levels: u32) -> Result<(), player::MissingState> {
        let player_data = self.player_data()?;
        unsafe { (self.api.set_chibi_levels)(player_data, levels, self.controller) };
        Ok(())
    }

    fn mark_explorer_notes_unlocked(&mut self) -> Result<(), player::MissingState> {
        let player_data = self.player_data()?;
        if !unsafe { (self.api.set_unlocked_all_explorer_notes)(player_data) } {
            return Err(player::MissingState::PersistentStats);
        }
        Ok(())
    }

    fn refresh_explorer_notes(&mut self) -> Result<(), player::MissingState> {
        let character = self.character()?;
        unsafe {
            (self.api.bp_unlocked_all_explorer_notes)(character);
            (self.api.force_replicate_now)(character);
        }
        Ok(())
    }

    fn grant_achievement_tag(&mut self, tag: &str) -> Result<(), player::MissingState> {
        let player_data = self.player_data()?;
        let tag = to_cstring(tag);
        unsafe {
            (self.api.grant_generalized_achievement_tag)(player_data, tag.as_ptr(), self.controller)
        };
        Ok(())
    }

    fn save(&mut self) -> Result<(), player::MissingState> {
        let player_data = self.player_data()?;
        unsafe { (self.api.save_player_data)(player_data) };
        Ok(())
    }

    fn replace_item(&mut self, item: unlocks::ClassHandle) -> Result<(), player::MissingState> {
        let inventory = self.inventory()?;
        let class = item.0 as *mut UClass;
        unsafe {
            let existing = (self.api.get_item_of_template)(inventory, class);
            if !existing.is_null() {
                (self.api.remove_item)(inventory, existing);
            }
            (self.api.add_new_item)(inventory, class);
        }
        Ok(())
    }
}

pub struct ActivePlugin {
    api: HostApi,
    plugin: plugin::Plugin,
    _start_new_player_hook:
        hooks::Interception<hooks::start_new_player::StartNewShooterPlayerFunc>,
}

impl ActivePlugin {
    pub unsafe fn on_new_player(&self, controller: *mut APlayerController, is_new_character: bool) {
        let mut player = unsafe { Player::new(&self.api, controller) };
        self.plugin
            .on_new_player(&Host::new(&self.api), &mut player, is_new_character);
    }
}

static ACTIVE: std::sync::Mutex<Option<std::sync::Arc<ActivePlugin>>> =
    std::sync::Mutex::new(None);

pub fn active() -> Option<std::sync::Arc<ActivePlugin>> {
    ACTIVE
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .as_ref()
        .map(std::sync::Arc::clone)
}

unsafe extern "C" fn build_unlock_cache() {
    let Some(active) = active() else {
        log::warn!("plugin was unloaded before unlocks could be cached");
        return;
    };
    active.plugin.build_unlock_cache(&Host::new(&active.api));
}

pub unsafe fn enable(api: *const HostApi) -> Result<(), anyhow::Error> {
    if api.is_null() {
        return Err(anyhow::anyhow!("host api is null"));
    }

    let version = unsafe { (*api).version };
    if version != HOST_API_VERSION {
        return Err(anyhow::format_err!(
            "host api version mismatch: expected {}, got {}",
            HOST_API_VERSION,
            version
        ));
    }
    let api = unsafe { *api };

    logging::init(move |line| {
        let line = to_cstring(line);
        unsafe { (api.log)(line.as_ptr()) };
    });

    let plugin = plugin::Plugin::load(std::path::Path::new(config::CONFIG_FILE_PATH));

    let symbol = to_cstring(hooks::start_new_player::SYMBOL);
    let address = unsafe { (api.get_address)(symbol.as_ptr()) };
    if address.is_null() {
        return Err(anyhow::format_err!(
            "could not find address of {}",
            hooks::start_new_player::SYMBOL
        ));
    }
    let start_new_player_hook = unsafe { hooks::start_new_player::install(address)? };

    *ACTIVE.lock().unwrap_or_else(|e| e.into_inner()) = Some(std::sync::Arc::new(ActivePlugin {
        api,
        plugin,
        _start_new_player_hook: start_new_player_hook,
    }));

    // Classes can't be loaded until the server has finished starting up, so wait a tick.
    unsafe { (api.delay_execute)(build_unlock_cache, 0) };

    Ok(())
}

pub fn disable() {
    let active = ACTIVE.lock().unwrap_or_else(|e| e.into_inner()).take();
    if active.is_none() {
        log::warn!("plugin was disabled without being enabled?");
    }
}
