pub mod start_new_player;

/// An enabled detour on a host function. The detour is disabled again when this is dropped.
pub struct Interception<T>
where
    T: retour::Function,
{
    detour: &'static retour::StaticDetour<T>,
}

impl<T> Interception<T>
where
    T: retour::Function,
{
    /// Enables an already initialized detour.
    pub unsafe fn enable(detour: &'static retour::StaticDetour<T>) -> Result<Self, retour::Error> {
        unsafe { detour.enable()? };
        Ok(Self { detour })
    }
}

impl<T> Drop for Interception<T>
where
    T: retour::Function,
{
    fn drop(&mut self) {
        if let Err(e) = unsafe { self.detour.disable() } {
            log::error!("failed to disable hook: {}", e);
        }
    }
}
