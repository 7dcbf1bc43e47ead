//! Alias records mapping each routed host to the load balancer.

use serde::Serialize;

use crate::routing::rule::RoutingRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordTarget {
    /// A record aliased to the load balancer's DNS name.
    AliasToLoadBalancer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsRecordSpec {
    pub logical_id: String,
    pub record_name: String,
    pub target: RecordTarget,
}

impl From<&RoutingRule> for DnsRecordSpec {
    fn from(rule: &RoutingRule) -> Self {
        Self {
            logical_id: format!("{}-alb-record", rule.logical_id),
            record_name: rule.fully_qualified_host.clone(),
            target: RecordTarget::AliasToLoadBalancer,
        }
    }
}

/// One record per rule, in rule order.
pub fn dns_records(rules: &[RoutingRule]) -> Vec<DnsRecordSpec> {
    rules.iter().map(DnsRecordSpec::from).collect()
}
