use std::io::Write;

use clap::Parser;

#[derive(clap::Parser)]
struct Args {
    /// Skip confirmations and run non-interactively.
    #[arg(short, long)]
    yes: bool,

    /// Install into this server directory instead of looking for one through Steam.
    #[arg(long)]
    server_dir: Option<std::path::PathBuf>,

    /// Only check the installed config file, without copying anything.
    #[arg(long)]
    check: bool,
}

const ARK_SERVER_APP_ID: u32 = 376030;
const BINARIES_DIR: &str = "ShooterGame/Binaries/Win64";

const DLL_SRC_NAME: &str = "ark_auto_bosses.dll";
const DLL_DEST_NAME: &str = "ArkAutoBosses.dll";

const DEFAULT_CONFIG: &str = include_str!("../../ark-auto-bosses/config.json");

fn config_path(server_dir: &std::path::Path) -> std::path::PathBuf {
    server_dir
        .join(BINARIES_DIR)
        .join(ark_auto_bosses::config::CONFIG_FILE_PATH)
}

fn find_server_dir() -> Result<Option<std::path::PathBuf>, anyhow::Error> {
    let steam_dir = steamlocate::SteamDir::locate()?;
    Ok(steam_dir
        .find_app(ARK_SERVER_APP_ID)?
        .map(|(app, library)| library.resolve_app_dir(&app)))
}

fn check_config(path: &std::path::Path) -> bool {
    match ark_auto_bosses::config::load(path) {
        Ok(config) => {
            println!("CHECK  {}", path.display());
            println!(" - {} defeated bosses", config.defeated_bosses.len());
            println!(" - {} additional engrams", config.additional_engrams.len());
            println!(" - {} chibi levels", config.chibi_levels);
            println!(
                " - explorer notes {}",
                if config.unlock_explorer_notes {
                    "unlocked"
                } else {
                    "locked"
                }
            );
            println!(
                " - {} achievement tags",
                config.generalized_achievement_tag_grants.len()
            );
            true
        }
        Err(e) => {
            println!(" ! {}", e);
            println!(" ! The plugin will run with an empty config until this is fixed.");
            false
        }
    }
}

/// Writes the default config, unless there's already one there.
fn write_default_config(path: &std::path::Path) -> Result<bool, std::io::Error> {
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(mut f) => {
            f.write_all(DEFAULT_CONFIG.as_bytes())?;
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e),
    }
}

fn install(server_dir: &std::path::Path) -> Result<(), anyhow::Error> {
    let exe_path = std::env::current_exe()?;
    let src_path = exe_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("could not get parent directory"))?;
    let dll = std::fs::read(src_path.join(DLL_SRC_NAME))?;

    let config_path = config_path(server_dir);
    let plugin_path = config_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("could not get plugin directory"))?;

    match std::fs::create_dir_all(plugin_path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
        Err(e) => {
            return Err(e.into());
        }
    }
    println!("MKDIR  {}", plugin_path.display());

    let dll_path = plugin_path.join(DLL_DEST_NAME);
    std::fs::File::create(&dll_path)?.write_all(&dll)?;
    println!("COPY   {}", dll_path.display());

    if write_default_config(&config_path)? {
        println!("CREATE {}", config_path.display());
    } else {
        println!("KEEP   {}", config_path.display());
    }

    Ok(())
}

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    let r = (|| -> Result<(), anyhow::Error> {
        println!("ArkAutoBosses installer");
        println!();

        let server_dir = match &args.server_dir {
            Some(server_dir) => server_dir.clone(),
            None => match find_server_dir()? {
                Some(server_dir) => server_dir,
                None => {
                    println!(" ! ARK: Survival Evolved Dedicated Server could not be detected on your computer.");
                    println!();
                    println!("If it is installed outside of Steam, run the installer again with --server-dir pointing at the server's root directory.");
                    println!();
                    println!("Installation cancelled.");
                    return Ok(());
                }
            },
        };
        println!("Found server: {}", server_dir.display());
        println!();

        if args.check {
            if !check_config(&config_path(&server_dir)) {
                return Err(anyhow::anyhow!("config is invalid"));
            }
            return Ok(());
        }

        if !args.yes {
            print!("Do you wish to proceed? [Y/n] ");
            std::io::stdout().flush()?;
            let mut response = String::new();
            std::io::stdin().read_line(&mut response)?;
            response = response.trim().to_lowercase();
            if response != "y" && response != "" {
                println!("Installation cancelled.");
                return Ok(());
            }
        }

        println!();
        install(&server_dir)?;
        println!();
        check_config(&config_path(&server_dir));
        println!();

        println!("Installation successful!");
        Ok(())
    })();

    if let Err(err) = &r {
        println!("Installation failed with error: {}", err);
    }

    if !args.yes {
        println!();
        print!("Press enter or close this window to finish.");
        std::io::stdout().flush()?;
        std::io::stdin().read_line(&mut String::new())?;
    }

    r
}
