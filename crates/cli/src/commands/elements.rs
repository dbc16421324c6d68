//! Print the element matrix.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use duel_content::BalanceLoader;
use duel_core::{Element, ElementMatrix};

use super::OutputFormat;
use crate::render;

/// Print the element advantage cycle and multiplier table
#[derive(Parser)]
pub struct Elements {
    /// Balance table to read the multipliers from
    #[arg(short, long, value_name = "FILE")]
    balance: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl Elements {
    pub fn execute(self) -> Result<()> {
        let matrix = match &self.balance {
            Some(path) => BalanceLoader::load(path)?.elements,
            None => ElementMatrix::DEFAULT,
        };

        match self.format {
            OutputFormat::Text => render::print_elements(&matrix),
            OutputFormat::Json => {
                let table = matrix.table();
                let rows: BTreeMap<&str, BTreeMap<&str, f64>> = Element::ALL
                    .iter()
                    .map(|attacker| {
                        let row = Element::ALL
                            .iter()
                            .map(|defender| {
                                (defender.as_str(), table[attacker.index()][defender.index()])
                            })
                            .collect();
                        (attacker.as_str(), row)
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            }
        }
        Ok(())
    }
}
