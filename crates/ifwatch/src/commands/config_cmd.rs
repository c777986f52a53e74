//! Config subcommand handlers.

use dialoguer::{Input, Password, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, KEYRING_SERVICE, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let d = &cfg.defaults;
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", d.output);
    let _ = writeln!(out, "insecure = {}", d.insecure);
    let _ = writeln!(out, "timeout = {}", d.timeout);
    let _ = writeln!(out, "sample_limit = {}", d.sample_limit);
    let _ = writeln!(out, "recency_window_hours = {}", d.recency_window_hours);
    let _ = writeln!(out, "top_errors_limit = {}", d.top_errors_limit);
    let _ = writeln!(out, "top_utilization_limit = {}", d.top_utilization_limit);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "store_url = \"{}\"", p.store_url);
        if p.api_key.is_some() {
            let _ = writeln!(out, "api_key = \"****\"");
        }
        if let Some(ref env) = p.api_key_env {
            let _ = writeln!(out, "api_key_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

/// Copy of the config safe to serialize for `config show`.
fn redacted(cfg: &Config) -> Config {
    let mut copy = cfg.clone();
    for profile in copy.profiles.values_mut() {
        if profile.api_key.is_some() {
            profile.api_key = Some("****".into());
        }
    }
    copy
}

fn save_config(cfg: &Config) -> Result<std::path::PathBuf, CliError> {
    Ok(config::save_config(cfg)?)
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::validation("interactive", format!("prompt failed: {e}"))
}

fn store_in_keyring(profile_name: &str, secret: &str) -> Result<(), CliError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/api-key"))
        .map_err(|e| CliError::validation("keyring", format!("failed to access keyring: {e}")))?;
    entry.set_password(secret).map_err(|e| {
        CliError::validation("keyring", format!("failed to store API key in keyring: {e}"))
    })
}

fn prompt_api_key() -> Result<String, CliError> {
    let key = Password::new()
        .with_prompt("API key")
        .interact()
        .map_err(prompt_err)?;
    if key.is_empty() {
        return Err(CliError::validation("api_key", "API key cannot be empty"));
    }
    Ok(key)
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(global.color);

    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("ifwatch -- configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let store_url: String = Input::new()
                .with_prompt("Sample service URL")
                .default("https://telemetry.example.net".into())
                .validate_with(|input: &String| {
                    ifwatch_config::parse_store_url(input)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let key_choices = &[
                "No API key",
                "Store API key in system keyring (recommended)",
                "Read API key from an environment variable",
                "Save API key to config file (plaintext)",
            ];
            let selection = Select::new()
                .with_prompt("Authentication")
                .items(key_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let (api_key, api_key_env) = match selection {
                0 => (None, None),
                1 => {
                    let key = prompt_api_key()?;
                    store_in_keyring(&profile_name, &key)?;
                    output::success("API key stored in system keyring", color);
                    (None, None)
                }
                2 => {
                    let var: String = Input::new()
                        .with_prompt("Environment variable")
                        .default("IFWATCH_API_KEY".into())
                        .interact_text()
                        .map_err(prompt_err)?;
                    (None, Some(var))
                }
                _ => (Some(prompt_api_key()?), None),
            };

            let profile = Profile {
                store_url,
                api_key,
                api_key_env,
                ..Profile::default()
            };

            // Re-running init adds a profile; existing ones are kept.
            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            let path = save_config(&cfg)?;

            output::success(&format!("Configuration written to {}", path.display()), color);
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: ifwatch errors --limit 5");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(global.output, &cfg, format_config_redacted, |_| {
                config::config_path().display().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            match key.as_str() {
                "store_url" | "store-url" => {
                    ifwatch_config::parse_store_url(&value)?;
                    profile.store_url = value;
                }
                "api_key" | "api-key" => profile.api_key = Some(value),
                "api_key_env" | "api-key-env" => profile.api_key_env = Some(value),
                "insecure" => {
                    profile.insecure = Some(
                        value
                            .parse()
                            .map_err(|_| CliError::validation("insecure", "must be 'true' or 'false'"))?,
                    );
                }
                "timeout" => {
                    profile.timeout = Some(
                        value
                            .parse()
                            .map_err(|_| CliError::validation("timeout", "must be a number (seconds)"))?,
                    );
                }
                "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
                other => {
                    return Err(CliError::validation(
                        other,
                        format!(
                            "unknown config key '{other}'. Valid keys: store_url, api_key, \
                             api_key_env, insecure, timeout, ca_cert"
                        ),
                    ));
                }
            }

            save_config(&cfg)?;
            output::success(&format!("Set {key} on profile '{profile_name}'"), color);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                output::notice("No profiles configured. Run: ifwatch config init", color, false);
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            save_config(&cfg)?;
            output::success(&format!("Default profile set to '{name}'"), color);
            Ok(())
        }

        // ── SetKey ──────────────────────────────────────────────────
        ConfigCommand::SetKey { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name: profile_name,
                });
            }

            let key = prompt_api_key()?;
            store_in_keyring(&profile_name, &key)?;
            output::success(
                &format!("API key stored in system keyring for profile '{profile_name}'"),
                color,
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                store_url: "https://telemetry.lab.example".into(),
                api_key: Some("hunter2".into()),
                timeout: Some(5),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn redacted_text_masks_api_key() {
        let text = format_config_redacted(&sample_config());
        assert!(text.contains("[profiles.lab]"));
        assert!(text.contains("api_key = \"****\""));
        assert!(text.contains("timeout = 5"));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn redacted_copy_masks_api_key() {
        let copy = redacted(&sample_config());
        assert_eq!(copy.profiles["lab"].api_key.as_deref(), Some("****"));
    }
}
