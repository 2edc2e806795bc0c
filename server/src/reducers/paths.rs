//! Reducers that author route data: taxi legs and spline chains.

use crate::{schema::*, types::*};
use spacetimedb::{ReducerContext, Table};

/// Adds the directed taxi leg `from_node -> to_node` with its waypoints in flight order.
#[spacetimedb::reducer]
pub fn add_taxi_path(
    ctx: &ReducerContext,
    from_node: u32,
    to_node: u32,
    cost: u32,
    nodes: Vec<DbTaxiPathNode>,
) -> Result<(), String> {
    if nodes.is_empty() {
        return Err("Taxi path has no nodes".into());
    }
    if from_node == to_node {
        return Err("Taxi path must connect two different stops".into());
    }
    if ctx
        .db
        .taxi_path()
        .from_and_to()
        .filter((from_node, to_node))
        .next()
        .is_some()
    {
        return Err("Taxi path already exists".into());
    }

    let path = ctx.db.taxi_path().insert(TaxiPath {
        id: 0,
        from_node,
        to_node,
        cost,
    });
    for (index, node) in nodes.into_iter().enumerate() {
        ctx.db.taxi_path_node().insert(TaxiPathNodeRow {
            id: 0,
            path_id: path.id,
            index: index as u32,
            node,
        });
    }
    log::info!("Added taxi path {} ({from_node} -> {to_node})", path.id);
    Ok(())
}

#[spacetimedb::reducer]
pub fn add_spline_chain(ctx: &ReducerContext, links: Vec<DbSplineChainLink>) -> Result<(), String> {
    if links.is_empty() {
        return Err("Spline chain has no links".into());
    }
    if let Some(index) = links.iter().position(|link| link.points.len() < 2) {
        return Err(format!("Link {index} needs at least two points"));
    }
    if links.iter().any(|link| !(link.velocity >= 0.0)) {
        return Err("Link velocity must not be negative".into());
    }

    let chain = ctx.db.spline_chain().insert(SplineChain { id: 0, links });
    log::info!("Added spline chain {}", chain.id);
    Ok(())
}
