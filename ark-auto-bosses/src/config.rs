/// Location of the config file, relative to the server's working directory.
pub const CONFIG_FILE_PATH: &str = "ArkApi/Plugins/ArkAutoBosses/config.json";

#[derive(serde::Deserialize, Clone, PartialEq, Eq, Hash, Debug)]
pub struct DefeatedBoss {
    #[serde(rename = "Boss")]
    pub boss: String,

    #[serde(rename = "Blueprint")]
    pub blueprint: String,

    #[serde(rename = "Difficulty")]
    pub difficulty: u32,
}

#[derive(serde::Deserialize, Default, Clone, PartialEq, Debug)]
pub struct Config {
    #[serde(rename = "ChibiLevels")]
    pub chibi_levels: u32,

    #[serde(rename = "DefeatedBosses")]
    pub defeated_bosses: std::collections::HashSet<DefeatedBoss>,

    #[serde(rename = "AdditionalEngrams")]
    pub additional_engrams: std::collections::HashSet<String>,

    #[serde(rename = "UnlockExplorerNotes")]
    pub unlock_explorer_notes: bool,

    #[serde(rename = "GeneralizedAchievementTagGrants")]
    pub generalized_achievement_tag_grants: std::collections::HashSet<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unable to read file {}", .0.display())]
    NotFound(std::path::PathBuf),

    #[error("Unable to read file {}: {source}", .path.display())]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Parse(#[from] serde_json::Error),
}

fn absolute(path: &std::path::Path) -> std::path::PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

pub fn parse(buf: &[u8]) -> Result<Config, Error> {
    Ok(serde_json::from_slice(buf)?)
}

pub fn load(path: &std::path::Path) -> Result<Config, Error> {
    let buf = match std::fs::read(path) {
        Ok(buf) => buf,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::NotFound(absolute(path)));
        }
        Err(e) => {
            return Err(Error::Io {
                path: absolute(path),
                source: e,
            });
        }
    };
    parse(&buf)
}

/// Loads the config, falling back to the default config if it can't be loaded. The plugin keeps running either way.
pub fn load_or_default(path: &std::path::Path) -> Config {
    match load(path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Load Error: {}", e);
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BROODMOTHER: &str = r#"{
    "ChibiLevels": 5,
    "DefeatedBosses": [
        {
            "Boss": "Broodmother",
            "Blueprint": "Blueprint'/Game/PrimalEarth/Dinos/Spider-Large/SpiderL_Character_BP_Hard.SpiderL_Character_BP_Hard'",
            "Difficulty": 2
        }
    ],
    "AdditionalEngrams": [
        "Blueprint'/Game/PrimalEarth/CoreBlueprints/Items/Armor/Saddles/PrimalItemArmor_RexSaddle.PrimalItemArmor_RexSaddle_C'"
    ],
    "UnlockExplorerNotes": true,
    "GeneralizedAchievementTagGrants": ["AlphaKing"]
}"#;

    #[test]
    fn test_parse_well_formed() {
        let config = parse(BROODMOTHER.as_bytes()).unwrap();
        assert_eq!(config.chibi_levels, 5);
        assert_eq!(
            config.defeated_bosses,
            [DefeatedBoss {
                boss: "Broodmother".to_string(),
                blueprint: "Blueprint'/Game/PrimalEarth/Dinos/Spider-Large/SpiderL_Character_BP_Hard.SpiderL_Character_BP_Hard'".to_string(),
                difficulty: 2,
            }]
            .into_iter()
            .collect::<std::collections::HashSet<_>>()
        );
        assert_eq!(
            config.additional_engrams,
            ["Blueprint'/Game/PrimalEarth/CoreBlueprints/Items/Armor/Saddles/PrimalItemArmor_RexSaddle.PrimalItemArmor_RexSaddle_C'".to_string()]
                .into_iter()
                .collect::<std::collections::HashSet<_>>()
        );
        assert!(config.unlock_explorer_notes);
        assert_eq!(
            config.generalized_achievement_tag_grants,
            ["AlphaKing".to_string()].into_iter().collect::<std::collections::HashSet<_>>()
        );
    }

    #[test]
    fn test_parse_collapses_duplicates() {
        let config = parse(
            br#"{
    "ChibiLevels": 0,
    "DefeatedBosses": [
        {"Boss": "Gorilla", "Blueprint": "A", "Difficulty": 0},
        {"Boss": "Gorilla", "Blueprint": "A", "Difficulty": 0},
        {"Boss": "Gorilla", "Blueprint": "A", "Difficulty": 1}
    ],
    "AdditionalEngrams": ["X", "X"],
    "UnlockExplorerNotes": false,
    "GeneralizedAchievementTagGrants": []
}"#,
        )
        .unwrap();
        assert_eq!(config.defeated_bosses.len(), 2);
        assert_eq!(config.additional_engrams.len(), 1);
    }

    #[test]
    fn test_parse_missing_field() {
        let err = parse(br#"{"ChibiLevels": 1}"#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_parse_mistyped_field() {
        let err = parse(
            br#"{
    "ChibiLevels": -3,
    "DefeatedBosses": [],
    "AdditionalEngrams": [],
    "UnlockExplorerNotes": false,
    "GeneralizedAchievementTagGrants": []
}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, BROODMOTHER).unwrap();
        assert_eq!(load(&path).unwrap(), parse(BROODMOTHER.as_bytes()).unwrap());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(err.to_string().starts_with("Unable to read file "));
        assert!(err.to_string().ends_with("config.json"));
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let dir = tempfile::tempdir().unwrap();

        let config = load_or_default(&dir.path().join("config.json"));
        assert_eq!(config, Config::default());
        assert_eq!(config.chibi_levels, 0);
        assert!(config.defeated_bosses.is_empty());
        assert!(config.additional_engrams.is_empty());
        assert!(!config.unlock_explorer_notes);
        assert!(config.generalized_achievement_tag_grants.is_empty());

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_or_default(&path), Config::default());
    }
}
