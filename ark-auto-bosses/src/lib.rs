//! Unlocks boss rewards for every player on an ARK server, as if they had defeated the configured bosses themselves.

#[cfg(windows)]
pub mod ark;
pub mod config;
#[cfg(windows)]
mod hooks;
pub mod logging;
pub mod player;
pub mod plugin;
#[cfg(test)]
mod testing;
pub mod unlocks;

#[cfg(windows)]
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn Plugin_Init(api: *const ark::HostApi) -> bool {
    match unsafe { ark::enable(api) } {
        Ok(()) => true,
        Err(e) => {
            log::error!("failed to enable: {}", e);
            false
        }
    }
}

#[cfg(windows)]
#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn Plugin_Unload() -> bool {
    ark::disable();
    true
}
