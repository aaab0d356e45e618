use super::replies::send_command_reply;
use crate::core::exchange::filter_currencies;
use crate::discord::{Context, Error};

/// Convierte un monto de una moneda a otra
#[poise::command(slash_command)]
pub async fn convertir(
    ctx: Context<'_>,
    #[description = "Monto a convertir"] monto: f64,
    #[description = "Moneda de origen (ej. USD)"]
    #[autocomplete = "autocomplete_currency"]
    moneda_origen: String,
    #[description = "Moneda destino (ej. DOP)"]
    #[autocomplete = "autocomplete_currency"]
    moneda_destino: String,
) -> Result<(), Error> {
    let bridge = &ctx.data().bridge;
    let channel_id = ctx.channel_id().get();

    if bridge.allows_channel(channel_id) {
        ctx.defer().await?;
    }

    let reply = bridge
        .convert(channel_id, monto, &moneda_origen, &moneda_destino)
        .await;

    send_command_reply(ctx, reply).await
}

/// Suggests currencies from the fixed list by prefix.
async fn autocomplete_currency<'a>(
    _ctx: Context<'_>,
    partial: &'a str,
) -> impl Iterator<Item = String> + 'a {
    filter_currencies(partial).into_iter().map(str::to_string)
}
