mod scenario;

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use folio_core::config::DisplayOverrides;
use folio_core::config::RawConfig;
use folio_core::config::TabsConfig;
use folio_core::config::Theme;
use folio_core::gate::authorize;
use folio_core::persistence::PreferenceStore;
use folio_core::route::path_for;
use folio_core::route::resolve_location;
use folio_core::state::Location;
use folio_core::state::Selection;
use folio_exec::backends::FixtureBackend;
use folio_exec::contracts::PortfolioBackend;
use tracing_subscriber::EnvFilter;

use crate::scenario::Replay;
use crate::scenario::Scenario;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let verbose = take_flag(&mut args, "--verbose");
    init_tracing(verbose);

    let mut args = args.into_iter();
    let Some(command) = args.next() else {
        print_help();
        return Ok(());
    };

    match command.as_str() {
        "--help" | "-h" | "help" => {
            print_help();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("folio {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "resolve" => run_resolve(args.collect()),
        "replay" => run_replay(args.collect()),
        "prefs" => run_prefs(args.collect()),
        _ => {
            print_help();
            Err(format!("unknown command: {command}").into())
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    let before = args.len();
    args.retain(|arg| arg != flag);
    args.len() != before
}

/// Splits `args` into positionals and the value of each `--name VALUE` pair.
fn parse_options(
    args: Vec<String>,
    known: &[&str],
) -> Result<(Vec<String>, Vec<(String, String)>), Box<dyn std::error::Error>> {
    let mut positionals = Vec::new();
    let mut options = Vec::new();
    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        if arg.starts_with("--") {
            if !known.contains(&arg.as_str()) {
                return Err(format!("unsupported argument: {arg}").into());
            }
            let Some(value) = args.get(i + 1) else {
                return Err(format!("{arg} requires a value").into());
            };
            options.push((arg.clone(), value.clone()));
            i += 2;
        } else {
            positionals.push(arg.clone());
            i += 1;
        }
    }
    Ok((positionals, options))
}

fn option<'a>(options: &'a [(String, String)], name: &str) -> Option<&'a str> {
    options
        .iter()
        .rev()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn load_config_file(path: &Path) -> Result<RawConfig, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let raw = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&text)?,
        _ => serde_json::from_str(&text)?,
    };
    Ok(raw)
}

fn run_resolve(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let (positionals, options) = parse_options(args, &["--config"])?;
    let [url] = positionals.as_slice() else {
        return Err("resolve requires exactly one URL".into());
    };

    let location = Location::parse(url);
    let candidate = resolve_location(&location);
    let tabs = option(&options, "--config")
        .map(|path| load_config_file(Path::new(path)))
        .transpose()?
        .map(|raw| TabsConfig::from_raw(&raw));

    println!("url:        {}", location.to_url());
    println!("candidate:  {} ({})", candidate.mode.key(), candidate.mode.label());
    let authorized = match &tabs {
        None => {
            println!("config:     none (first paint follows the URL)");
            candidate.mode
        }
        Some(tabs) => {
            let available: Vec<&str> = tabs.available_modes().map(|mode| mode.key()).collect();
            println!("available:  {}", available.join(", "));
            match authorize(candidate.mode, tabs) {
                Ok(mode) => mode,
                Err(err) => {
                    println!("authorized: none ({err})");
                    return Ok(());
                }
            }
        }
    };
    let selection = Selection::new(candidate.owner.clone(), candidate.group.clone());
    println!("authorized: {} ({})", authorized.key(), authorized.label());
    println!("owner:      {}", candidate.owner);
    println!("group:      {}", candidate.group);
    println!("canonical:  {}", path_for(authorized, &selection));
    Ok(())
}

fn run_replay(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let (positionals, options) = parse_options(args, &["--data", "--prefs"])?;
    let [path] = positionals.as_slice() else {
        return Err("replay requires a scenario file".into());
    };

    let scenario = Scenario::load(Path::new(path))?;
    let backend = option(&options, "--data").map(FixtureBackend::new);
    if let Some(backend) = &backend {
        tracing::debug!(root = %backend.root().display(), "serving fetches from fixtures");
    }
    let prefs = option(&options, "--prefs")
        .map(PreferenceStore::open)
        .transpose()?;

    let trace = Replay::new(
        &scenario,
        backend.as_ref().map(|backend| backend as &dyn PortfolioBackend),
        prefs.as_ref(),
    )
    .run(&scenario.steps)?;
    print!("{trace}");
    Ok(())
}

fn default_prefs_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let Some(dir) = dirs::config_dir() else {
        return Err("no config directory; pass --file".into());
    };
    Ok(dir.join("folio").join("preferences.json"))
}

fn parse_switch(value: &str) -> Result<bool, Box<dyn std::error::Error>> {
    match value {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(format!("expected on|off, got {other}").into()),
    }
}

fn run_prefs(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let (positionals, options) = parse_options(args, &["--file"])?;
    let path = match option(&options, "--file") {
        Some(path) => PathBuf::from(path),
        None => default_prefs_path()?,
    };
    let store = PreferenceStore::open(&path)?;
    let current = store.load()?.map(|prefs| prefs.overrides()).unwrap_or_default();

    let updated = match positionals.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["show"] => {
            print_overrides(&store, current);
            return Ok(());
        }
        ["theme", value] => {
            let Some(theme) = Theme::parse(value) else {
                return Err(format!("unknown theme: {value}").into());
            };
            DisplayOverrides {
                theme: Some(theme),
                ..current
            }
        }
        ["relative", value] => DisplayOverrides {
            relative_view_enabled: Some(parse_switch(value)?),
            ..current
        },
        ["clear"] => {
            store.clear()?;
            println!("cleared {}", store.path().display());
            return Ok(());
        }
        other => return Err(format!("unsupported prefs command: {}", other.join(" ")).into()),
    };

    store.save(&updated)?;
    print_overrides(&store, updated);
    Ok(())
}

fn print_overrides(store: &PreferenceStore, overrides: DisplayOverrides) {
    println!("file:     {}", store.path().display());
    println!(
        "theme:    {}",
        overrides.theme.map(Theme::label).unwrap_or("(from config)")
    );
    println!(
        "relative: {}",
        match overrides.relative_view_enabled {
            Some(true) => "on",
            Some(false) => "off",
            None => "(from config)",
        }
    );
}

fn print_help() {
    println!("folio {}", env!("CARGO_PKG_VERSION"));
    println!("Usage:");
    println!("  folio resolve URL [--config FILE.json|FILE.toml]");
    println!("  folio replay SCENARIO.yaml [--data DIR] [--prefs FILE]");
    println!("  folio prefs [show | theme dark|light|system | relative on|off | clear] [--file PATH]");
    println!("  folio --verbose ...");
    println!("  folio --help");
    println!("  folio --version");
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn parse_options_splits_positionals_and_values() {
        let (positionals, options) =
            parse_options(strings(&["/member", "--config", "tabs.toml"]), &["--config"])
                .expect("parse");

        assert_eq!(positionals, vec!["/member".to_string()]);
        assert_eq!(option(&options, "--config"), Some("tabs.toml"));
    }

    #[test]
    fn parse_options_rejects_unknown_and_dangling_flags() {
        assert!(parse_options(strings(&["--data"]), &["--config"]).is_err());
        assert!(parse_options(strings(&["--config"]), &["--config"]).is_err());
    }

    #[test]
    fn take_flag_removes_every_occurrence() {
        let mut args = strings(&["--verbose", "resolve", "/", "--verbose"]);
        assert!(take_flag(&mut args, "--verbose"));
        assert_eq!(args, strings(&["resolve", "/"]));
        assert!(!take_flag(&mut args, "--verbose"));
    }

    #[test]
    fn config_files_load_from_json_and_toml() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let json = dir.path().join("config.json");
        fs::write(&json, r#"{"tabs": {"support": true}, "theme": "light"}"#).expect("json");
        let toml_path = dir.path().join("config.toml");
        fs::write(
            &toml_path,
            "disabled_tabs = [\"owner\"]\ntheme = \"light\"\n\n[tabs]\nsupport = true\nowner = true\n",
        )
        .expect("toml");

        let from_json = TabsConfig::from_raw(&load_config_file(&json).expect("json config"));
        let from_toml = TabsConfig::from_raw(&load_config_file(&toml_path).expect("toml config"));

        assert_eq!(
            from_json.available_modes().collect::<Vec<_>>(),
            from_toml.available_modes().collect::<Vec<_>>()
        );
    }

    #[test]
    fn switch_values() {
        assert!(parse_switch("on").expect("on"));
        assert!(!parse_switch("off").expect("off"));
        assert!(parse_switch("maybe").is_err());
    }
}
