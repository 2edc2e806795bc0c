use crate::types::*;
use spacetimedb::*;

/// One directed leg between two taxi stops.
#[table(name = taxi_path, public, index(name = from_and_to, btree(columns = [from_node, to_node])))]
pub struct TaxiPath {
    #[primary_key]
    #[auto_inc]
    pub id: u32,

    pub from_node: u32,
    pub to_node: u32,

    /// Fare charged for flying this leg.
    pub cost: u32,
}

/// A waypoint of a taxi leg, ordered by `index` within its path.
#[table(name = taxi_path_node, public)]
pub struct TaxiPathNodeRow {
    #[primary_key]
    #[auto_inc]
    pub id: u64,

    #[index(btree)]
    pub path_id: u32,

    pub index: u32,
    pub node: DbTaxiPathNode,
}
