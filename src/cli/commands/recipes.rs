//! Recipes command implementation
//!
//! Lists the recipes compiled into the binary, or prints one of them so it
//! can be saved and edited.

use crate::deid::bundled::{bundled_recipe, bundled_recipe_names};
use crate::deid::recipe::DeidRecipe;
use clap::Args;

/// Arguments for the recipes command
#[derive(Args, Debug)]
pub struct RecipesArgs {
    /// Print the full text of a bundled recipe
    #[arg(long, value_name = "NAME")]
    pub show: Option<String>,
}

impl RecipesArgs {
    /// Execute the recipes command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        if let Some(name) = &self.show {
            return match bundled_recipe(name) {
                Some(text) => {
                    print!("{text}");
                    Ok(0)
                }
                None => {
                    eprintln!("Unknown bundled recipe: {name}");
                    eprintln!("Available: {}", bundled_recipe_names().join(", "));
                    Ok(1)
                }
            };
        }

        println!("Bundled recipes:");
        for name in bundled_recipe_names() {
            let actions = bundled_recipe(name)
                .and_then(|text| DeidRecipe::from_text(text).ok())
                .map(|recipe| recipe.header_actions().len())
                .unwrap_or(0);
            println!("  {name:<20} {actions} header actions");
        }
        Ok(0)
    }
}
