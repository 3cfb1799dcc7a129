use crate::claim_api::{api::ClaimApi, schemas::PoolInfo};

const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

fn lamports_to_sol(raw: &str) -> Option<f64> {
    raw.parse::<u64>()
        .ok()
        .map(|lamports| lamports as f64 / LAMPORTS_PER_SOL)
}

/// Claimable partner quote fees across `pools`, in SOL. Pools whose fee is not
/// a lamport amount are left out of the total.
pub fn total_partner_quote_fees(pools: &[PoolInfo]) -> f64 {
    pools
        .iter()
        .filter_map(|pool| {
            let sol = lamports_to_sol(&pool.account.partner_quote_fee);
            if sol.is_none() {
                tracing::warn!(
                    "Skipping pool `{}`: unreadable partner quote fee `{}`",
                    pool.public_key,
                    pool.account.partner_quote_fee
                );
            }
            sol
        })
        .sum()
}

pub async fn list_pools(api: &dyn ClaimApi, creator: &str) -> eyre::Result<Vec<PoolInfo>> {
    let pools = api.get_pools(creator).await?;

    for pool in &pools {
        tracing::info!(
            "Pool `{}` | base mint `{}` | partner fees: {} base / {} quote",
            pool.public_key,
            pool.account.base_mint,
            pool.account.partner_base_fee,
            pool.account.partner_quote_fee,
        );
    }

    tracing::info!(
        "{} pool(s), {:.4} SOL claimable",
        pools.len(),
        total_partner_quote_fees(&pools)
    );

    Ok(pools)
}
