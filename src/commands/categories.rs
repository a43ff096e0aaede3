// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KeyValueStore;
use crate::models::CategoryKind;
use crate::records::{CategoryUpdate, RecordStore};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};

pub fn handle<S: KeyValueStore>(store: &mut RecordStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind: CategoryKind = sub
                .get_one::<String>("type")
                .unwrap()
                .parse()
                .map_err(|e: String| anyhow!(e))?;
            let color = sub.get_one::<String>("color").unwrap();
            let category = store.add_category(name, kind, color)?;
            println!(
                "Added {} category '{}' (#{})",
                category.kind, category.name, category.id
            );
        }
        Some(("list", sub)) => {
            let kind = match sub.get_one::<String>("type") {
                Some(t) => Some(t.parse::<CategoryKind>().map_err(|e| anyhow!(e))?),
                None => None,
            };
            let categories: Vec<_> = store
                .categories()
                .iter()
                .filter(|c| kind.is_none_or(|k| k == c.kind))
                .collect();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &categories)? {
                let data = categories
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.to_string(),
                            c.name.clone(),
                            c.kind.to_string(),
                            c.color.clone(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["ID", "Category", "Type", "Color"], data));
            }
        }
        Some(("edit", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let category = store.update_category(
                id,
                CategoryUpdate {
                    name: sub.get_one::<String>("name").cloned(),
                    color: sub.get_one::<String>("color").cloned(),
                },
            )?;
            println!("Updated category '{}'", category.name);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let removed = store.delete_category(id)?;
            println!("Removed category '{}'", removed.name);
        }
        _ => {}
    }
    Ok(())
}
