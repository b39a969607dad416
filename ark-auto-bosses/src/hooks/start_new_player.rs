use crate::{ark, hooks, plugin};
use retour::static_detour;

pub const SYMBOL: &str = "AShooterGameMode.StartNewShooterPlayer";

pub type StartNewShooterPlayerFunc = unsafe extern "C" fn(
    this: *mut ark::AShooterGameMode,
    new_player: *mut ark::APlayerController,
    force_create_new_player_data: bool,
    is_from_login: bool,
    character_config: *const ark::FPrimalPlayerCharacterConfigStruct,
    player_data: *mut ark::UPrimalPlayerData,
);

static_detour! {
    static StartNewShooterPlayer: unsafe extern "C" fn(
        /* this: */ *mut ark::AShooterGameMode,
        /* new_player: */ *mut ark::APlayerController,
        /* force_create_new_player_data: */ bool,
        /* is_from_login: */ bool,
        /* character_config: */ *const ark::FPrimalPlayerCharacterConfigStruct,
        /* player_data: */ *mut ark::UPrimalPlayerData
    );
}

unsafe fn on_start_new_shooter_player(
    this: *mut ark::AShooterGameMode,
    new_player: *mut ark::APlayerController,
    force_create_new_player_data: bool,
    is_from_login: bool,
    character_config: *const ark::FPrimalPlayerCharacterConfigStruct,
    player_data: *mut ark::UPrimalPlayerData,
) {
    // The game sets up the player first; everything we touch hangs off of what it creates.
    StartNewShooterPlayer.call(
        this,
        new_player,
        force_create_new_player_data,
        is_from_login,
        character_config,
        player_data,
    );

    if new_player.is_null() {
        return;
    }

    let Some(active) = ark::active() else {
        return;
    };
    active.on_new_player(
        new_player,
        plugin::is_new_character(is_from_login, !player_data.is_null()),
    );
}

pub unsafe fn install(
    address: *mut std::ffi::c_void,
) -> Result<hooks::Interception<StartNewShooterPlayerFunc>, retour::Error> {
    unsafe {
        match StartNewShooterPlayer.initialize(
            std::mem::transmute::<*mut std::ffi::c_void, StartNewShooterPlayerFunc>(address),
            |this,
             new_player,
             force_create_new_player_data,
             is_from_login,
             character_config,
             player_data| {
                on_start_new_shooter_player(
                    this,
                    new_player,
                    force_create_new_player_data,
                    is_from_login,
                    character_config,
                    player_data,
                )
            },
        ) {
            Ok(_) => {}
            // Already set up by an earlier load of the plugin in this process, so just turn it back on.
            Err(retour::Error::AlreadyInitialized) => {}
            Err(e) => {
                return Err(e);
            }
        }
        hooks::Interception::enable(&StartNewShooterPlayer)
    }
}
