//! `pokedex types`: the type taxonomy.

use pokedex_api::PokedexClient;
use pokedex_core::{CatalogSource, PokemonType};
use tabled::Tabled;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct TypeRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Image")]
    image: String,
}

impl From<&PokemonType> for TypeRow {
    fn from(t: &PokemonType) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            image: t.image.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(client: &PokedexClient, global: &GlobalOpts) -> Result<(), CliError> {
    let types = CatalogSource::pokemon_types(client).await?;
    let out = output::render_list(&global.output, &types, |t| TypeRow::from(t), |t| {
        format!("{}\t{}", t.id, t.name)
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
