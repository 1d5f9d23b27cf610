//! Built-in rewrite tables per release boundary

use stepwise_core::ReleaseBoundary;

use crate::imports::{ManualPattern, PackageMapping, ReviewGuide};
use crate::set_ops::SetOperationRule;

/// Package mappings shipped for a boundary
#[must_use]
pub fn package_mappings(boundary: ReleaseBoundary) -> Vec<PackageMapping> {
    match boundary {
        ReleaseBoundary::Boot2_3 => vec![
            PackageMapping::new("com.datastax.driver.core", "com.datastax.oss.driver.api.core"),
            PackageMapping::new(
                "com.datastax.driver.core.querybuilder",
                "com.datastax.oss.driver.api.querybuilder",
            ),
        ],
        ReleaseBoundary::Boot2_4 | ReleaseBoundary::Boot2_5 => Vec::new(),
    }
}

/// Review guide attached to the import remap phase
#[must_use]
pub fn review_guide(boundary: ReleaseBoundary) -> ReviewGuide {
    match boundary {
        ReleaseBoundary::Boot2_3 => ReviewGuide::new("Cassandra driver 4")
            .with_pattern(ManualPattern::new(
                "Cluster/Session construction was replaced by CqlSession",
                "Session session = Cluster.builder().addContactPoint(host).build().connect(keyspace);",
                "CqlSession session = CqlSession.builder().addContactPoint(new InetSocketAddress(host, 9042)).withLocalDatacenter(dc).withKeyspace(keyspace).build();",
            ))
            .with_pattern(ManualPattern::new(
                "Result paging no longer fetches transparently across pages in async code",
                "ResultSet rs = session.execute(stmt); rs.fetchMoreResults();",
                "AsyncResultSet page = session.executeAsync(stmt).toCompletableFuture().join(); if (page.hasMorePages()) page.fetchNextPage();",
            ))
            .with_pattern(ManualPattern::new(
                "Programmatic driver configuration moved to the config loader",
                "cluster.getConfiguration().getQueryOptions().setConsistencyLevel(ConsistencyLevel.QUORUM);",
                "DriverConfigLoader.programmaticBuilder().withString(DefaultDriverOption.REQUEST_CONSISTENCY, \"QUORUM\").build();",
            )),
        ReleaseBoundary::Boot2_4 | ReleaseBoundary::Boot2_5 => ReviewGuide::new("Imports"),
    }
}

/// Set-operation rules shipped for a boundary
#[must_use]
pub fn set_operation_rules(boundary: ReleaseBoundary) -> Vec<SetOperationRule> {
    match boundary {
        ReleaseBoundary::Boot2_5 => ["union", "intersect", "difference"]
            .into_iter()
            .map(SetOperationRule::binary)
            .collect(),
        ReleaseBoundary::Boot2_3 | ReleaseBoundary::Boot2_4 => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cassandra_mappings_only_for_2_3() {
        assert_eq!(package_mappings(ReleaseBoundary::Boot2_3).len(), 2);
        assert!(package_mappings(ReleaseBoundary::Boot2_5).is_empty());
        assert_eq!(review_guide(ReleaseBoundary::Boot2_3).manual_patterns.len(), 3);
    }

    #[test]
    fn set_operations_only_for_2_5() {
        let rules = set_operation_rules(ReleaseBoundary::Boot2_5);
        assert_eq!(rules.len(), 3);
        assert!(rules.iter().all(|r| r.arity == 2));
        assert!(set_operation_rules(ReleaseBoundary::Boot2_3).is_empty());
    }
}
