use anyhow::{anyhow, Result};
use feed_structs::{Item, Solution};

/// Checks that `solution` is a feasible selection drawn from `items` and that
/// its totals add up.
pub fn verify_solution(items: &[Item], page_height: u64, solution: &Solution) -> Result<()> {
    if let Some(pair) = solution.ids.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(anyhow!(
            "Ids are not strictly ascending ({} then {})",
            pair[0],
            pair[1]
        ));
    }

    let mut total_value = 0u64;
    let mut total_weight = 0u64;
    for &id in &solution.ids {
        let item = items
            .iter()
            .find(|item| item.id == id)
            .ok_or_else(|| anyhow!("Item ({}) is not live", id))?;
        total_value += item.value;
        total_weight += item.weight;
    }

    if total_weight > page_height {
        return Err(anyhow!(
            "Total weight ({}) exceeded page height ({})",
            total_weight,
            page_height
        ));
    }
    if total_value != solution.value || total_weight != solution.weight {
        return Err(anyhow!(
            "Reported totals ({}, {}) do not match selected items ({}, {})",
            solution.value,
            solution.weight,
            total_value,
            total_weight
        ));
    }
    Ok(())
}
