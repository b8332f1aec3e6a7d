use clap::Subcommand;
use shopfront_app::{context::AppContext, domain::products::models::ProductUuid};

#[derive(Debug, Subcommand)]
pub(crate) enum ProductCommand {
    /// Add units to a product's stock
    Restock {
        #[arg(long)]
        product_uuid: ProductUuid,

        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
    },
}

pub(crate) async fn run(command: ProductCommand, app: &AppContext) -> Result<(), String> {
    match command {
        ProductCommand::Restock {
            product_uuid,
            quantity,
        } => {
            let product = app
                .products
                .restock(product_uuid, quantity)
                .await
                .map_err(|error| format!("failed to restock product: {error}"))?;

            println!("{} ({}) now has {} in stock", product.title, product.uuid, product.stock);
        }
    }

    Ok(())
}
