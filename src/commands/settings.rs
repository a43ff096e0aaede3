// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KeyValueStore;
use crate::models::Theme;
use crate::records::RecordStore;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, anyhow, bail};

pub fn handle<S: KeyValueStore>(store: &mut RecordStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let settings = store.settings();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), settings)? {
                let rows = vec![
                    vec!["currency".into(), settings.currency.clone()],
                    vec!["locale".into(), settings.locale.clone()],
                    vec!["decimals".into(), settings.decimal_places.to_string()],
                    vec![
                        "refresh".into(),
                        format!("{}s", settings.refresh_interval_secs),
                    ],
                    vec!["hide-balance".into(), settings.hide_balance.to_string()],
                    vec!["theme".into(), store.theme().as_str().to_string()],
                ];
                println!("{}", pretty_table(&["Setting", "Value"], rows));
            }
        }
        Some(("set", sub)) => {
            let mut settings = store.settings().clone();
            if let Some(ccy) = sub.get_one::<String>("currency") {
                let ccy = ccy.trim().to_uppercase();
                if ccy.is_empty() {
                    bail!("Currency cannot be empty");
                }
                settings.currency = ccy;
            }
            if let Some(locale) = sub.get_one::<String>("locale") {
                settings.locale = locale.trim().to_string();
            }
            if let Some(dp) = sub.get_one::<u32>("decimals") {
                if *dp > 8 {
                    bail!("Decimal places must be between 0 and 8");
                }
                settings.decimal_places = *dp;
            }
            if let Some(secs) = sub.get_one::<u64>("refresh") {
                if *secs == 0 {
                    bail!("Refresh interval must be at least one second");
                }
                settings.refresh_interval_secs = *secs;
            }
            if let Some(hide) = sub.get_one::<bool>("hide_balance") {
                settings.hide_balance = *hide;
            }
            store.update_settings(settings)?;
            println!("Settings saved");
        }
        Some(("theme", sub)) => match sub.get_one::<String>("theme") {
            Some(raw) => {
                let theme: Theme = raw.parse().map_err(|e: String| anyhow!(e))?;
                store.set_theme(theme)?;
                println!("Theme set to {}", theme.as_str());
            }
            None => println!("{}", store.theme().as_str()),
        },
        _ => {}
    }
    Ok(())
}
