//! Ranking and text rendering of option contracts

use super::{parse_option_symbol, FlowQuery, OptionContract, ParsedOptionSymbol, SortField, SortOrder};
use crate::display::{cents, group_thousands};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::cmp::Ordering;
use std::fmt::Write;

const DIVIDER: &str = "────────────";

/// Unexpired contracts ranked per `query`, at most `query.limit` of them.
///
/// Contracts whose symbol cannot be parsed are dropped, since their expiry
/// is unknown.
pub fn select_contracts(
    contracts: Vec<OptionContract>,
    query: &FlowQuery,
    today: NaiveDate,
) -> Vec<(OptionContract, ParsedOptionSymbol)> {
    let mut live: Vec<(OptionContract, ParsedOptionSymbol)> = contracts
        .into_iter()
        .filter_map(|c| {
            let parsed = parse_option_symbol(&c.option_symbol)?;
            (parsed.expiration >= today).then_some((c, parsed))
        })
        .collect();

    live.sort_by(|(a, _), (b, _)| {
        let ord = compare(a, b, query.sort);
        match query.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
    live.truncate(query.limit);
    live
}

fn compare(a: &OptionContract, b: &OptionContract, field: SortField) -> Ordering {
    match field {
        SortField::Premium => a.premium().cmp(&b.premium()),
        SortField::Volume => a.volume().cmp(&b.volume()),
        SortField::OpenInterest => a.open_interest().cmp(&b.open_interest()),
        SortField::ImpliedVolatility => a.implied_volatility().cmp(&b.implied_volatility()),
        SortField::Price => a.price().cmp(&b.price()),
        SortField::VolumeOiRatio => a.volume_oi_ratio().cmp(&b.volume_oi_ratio()),
    }
}

/// Chat text for the selected contracts
pub fn render_flow(query: &FlowQuery, selected: &[(OptionContract, ParsedOptionSymbol)]) -> String {
    if selected.is_empty() {
        return format!(
            "**Option Flow for {}**\nNo option contracts found.",
            query.ticker
        );
    }

    let mut out = format!("**Top Option Contracts for {}**\n", query.ticker);
    for (idx, (contract, parsed)) in selected.iter().enumerate() {
        let iv = cents(contract.implied_volatility() * Decimal::ONE_HUNDRED);
        // Writing into a String cannot fail
        let _ = write!(
            out,
            "\n__{root} {strike:.2} {side} {expiry}__\n\
             **Price:** ${price:.2}\n\
             **Volume:** {volume}\n\
             **OI:** {oi}\n\
             **IV:** {iv}%\n\
             **Premium:** ${premium}\n\
             **V/OI Ratio:** {voi:.2}\n",
            root = parsed.root,
            strike = cents(parsed.strike),
            side = parsed.side,
            expiry = parsed.expiration.format("%m/%d/%Y"),
            price = cents(contract.price()),
            volume = group_thousands(contract.volume()),
            oi = group_thousands(contract.open_interest()),
            premium = group_thousands(whole_dollars(contract.premium())),
            voi = cents(contract.volume_oi_ratio()),
        );
        if idx + 1 < selected.len() {
            out.push_str(DIVIDER);
            out.push('\n');
        }
    }
    out.push_str("\n_Data from Unusual Whales_");
    out
}

fn whole_dollars(value: Decimal) -> u64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(0)
}
