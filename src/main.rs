use clap::Parser;
use photoswipe_gallery::{cli, config, error, inspect};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use inspect::InspectRequest;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Resolve { manifest, hash, hash_timing, pid, index, item, pointer, output, compact } => {
            let gallery = inspect::load_manifest(&manifest)?;
            let pointer = pointer.as_deref().map(inspect::parse_pointer).transpose()?;

            let request = InspectRequest { hash, hash_timing, pid, index, item, pointer };
            let report = inspect::inspect(&gallery, &config.default_options, &request)?;

            let json = if config.pretty && !compact {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    eprintln!("✔ 結果を保存: {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Config { set_option, unset_option, pretty, show } => {
            let mut config = config;
            let changed = !set_option.is_empty() || !unset_option.is_empty() || pretty.is_some();

            for assignment in &set_option {
                config.set_option(assignment)?;
            }
            for key in &unset_option {
                if !config.unset_option(key) {
                    eprintln!("未設定のキー: {}", key);
                }
            }
            if let Some(pretty) = pretty {
                config.pretty = pretty;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  整形出力: {}", if config.pretty { "有効" } else { "無効" });
                println!("  既定のビューア設定: {}", serde_json::to_string(&config.default_options)?);
            }
        }
    }

    Ok(())
}
