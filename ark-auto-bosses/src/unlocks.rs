use crate::config;

/// An opaque reference to a class object owned by the host. Never dereferenced outside of the host layer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ClassHandle(pub usize);

pub type UnlockCache = std::collections::HashSet<ClassHandle>;

pub trait ClassResolver {
    /// Loads a class by its blueprint path.
    fn load_class(&self, path: &str) -> Option<ClassHandle>;

    /// Gets the engram classes granted when a creature of this class dies. Returns `None` if the class has no default object.
    fn death_engram_classes(&self, class: ClassHandle) -> Option<Vec<ClassHandle>>;
}

pub fn build(config: &config::Config, resolver: &impl ClassResolver) -> UnlockCache {
    let mut cache = UnlockCache::new();

    for boss in config.defeated_bosses.iter() {
        let Some(engrams) = resolver
            .load_class(&boss.blueprint)
            .and_then(|class| resolver.death_engram_classes(class))
        else {
            continue;
        };
        cache.extend(engrams);
    }

    cache.extend(
        config
            .additional_engrams
            .iter()
            .filter_map(|engram| resolver.load_class(engram)),
    );

    log::info!("Cached {} total unlocks.", cache.len());
    cache
}
