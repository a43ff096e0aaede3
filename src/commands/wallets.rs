// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KeyValueStore;
use crate::models::WalletKind;
use crate::records::{NewWallet, RecordStore, WalletUpdate};
use crate::utils::{
    date_or_today, fmt_balance, id_for_wallet, maybe_print_json, parse_decimal, pretty_table,
};
use anyhow::{Result, anyhow, bail};

pub fn handle<S: KeyValueStore>(store: &mut RecordStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind: WalletKind = sub
                .get_one::<String>("type")
                .unwrap()
                .parse()
                .map_err(|e: String| anyhow!(e))?;
            let balance = parse_decimal(sub.get_one::<String>("balance").unwrap())?;
            let color = sub.get_one::<String>("color").unwrap().to_string();
            let wallet = store.add_wallet(NewWallet {
                name: name.to_string(),
                kind,
                balance,
                color,
            })?;
            println!("Added wallet '{}' ({}, #{})", wallet.name, wallet.kind, wallet.id);
        }
        Some(("list", sub)) => list(store, sub)?,
        Some(("edit", sub)) => {
            let id = id_for_wallet(store, sub.get_one::<String>("wallet").unwrap())?;
            let kind = match sub.get_one::<String>("type") {
                Some(t) => Some(t.parse::<WalletKind>().map_err(|e| anyhow!(e))?),
                None => None,
            };
            let balance = match sub.get_one::<String>("balance") {
                Some(b) => Some(parse_decimal(b)?),
                None => None,
            };
            let wallet = store.update_wallet(
                id,
                WalletUpdate {
                    name: sub.get_one::<String>("name").cloned(),
                    kind,
                    balance,
                    color: sub.get_one::<String>("color").cloned(),
                },
            )?;
            println!("Updated wallet '{}'", wallet.name);
        }
        Some(("rm", sub)) => {
            let id = id_for_wallet(store, sub.get_one::<String>("wallet").unwrap())?;
            let linked = store
                .transactions()
                .iter()
                .filter(|t| t.touches_wallet(id))
                .count();
            if linked > 0 && !sub.get_flag("yes") {
                bail!(
                    "Wallet has {} transaction(s); pass --yes to delete them as well",
                    linked
                );
            }
            let name = store.wallet(id)?.name.clone();
            let removed = store.delete_wallet(id)?;
            println!(
                "Removed wallet '{}' and {} transaction(s)",
                name, removed
            );
        }
        Some(("transfer", sub)) => {
            let from = id_for_wallet(store, sub.get_one::<String>("from").unwrap())?;
            let to = id_for_wallet(store, sub.get_one::<String>("to").unwrap())?;
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let date = date_or_today(sub.get_one::<String>("date"))?;
            let note = sub.get_one::<String>("note").map(String::as_str).unwrap_or("");
            let txn = store.transfer(from, to, amount, date, note)?;
            println!("{} (#{})", txn.description, txn.id);
        }
        _ => {}
    }
    Ok(())
}

fn list<S: KeyValueStore>(store: &RecordStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let wallets = store.wallets();
    if !maybe_print_json(json_flag, jsonl_flag, &wallets)? {
        let settings = store.settings();
        let mut data: Vec<Vec<String>> = wallets
            .iter()
            .map(|w| {
                vec![
                    w.id.to_string(),
                    w.name.clone(),
                    w.kind.to_string(),
                    fmt_balance(&w.balance, settings),
                ]
            })
            .collect();
        data.push(vec![
            String::new(),
            "Total".into(),
            String::new(),
            fmt_balance(&store.total_balance(), settings),
        ]);
        println!("{}", pretty_table(&["ID", "Wallet", "Type", "Balance"], data));
    }
    Ok(())
}
