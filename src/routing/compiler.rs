//! Routing table compilation.
//!
//! # Responsibilities
//! - Turn an ordered list of service bindings into listener rules
//! - Assign priorities from input order plus a starting offset
//! - Reject empty input, bad ports and colliding hosts before emitting anything
//!
//! # Design Decisions
//! - Pure function of its inputs: same bindings in, same rules out
//! - Priority of binding `i` is `starting_priority + i` (gapless, increasing)
//! - Host conditions are exact, single-host sets; no wildcards

use std::collections::{BTreeSet, HashMap};

use url::Host;

use crate::error::RoutingError;
use crate::observability::metrics;
use crate::routing::binding::ServiceBinding;
use crate::routing::listener::DEFAULT_RULE_PRIORITY;
use crate::routing::rule::{
    ForwardAction, HealthCheckSpec, RoutingRule, TargetGroupOptions, TargetGroupSpec,
};

/// Compile with default target group settings.
pub fn compile_rules(
    bindings: &[ServiceBinding],
    base_domain: &str,
    starting_priority: u32,
) -> Result<Vec<RoutingRule>, RoutingError> {
    compile(bindings, base_domain, starting_priority, &TargetGroupOptions::default())
}

/// Resolve bindings into priority-ordered rules for one listener.
///
/// Either every binding compiles or the call fails; no partial table is
/// returned.
pub fn compile(
    bindings: &[ServiceBinding],
    base_domain: &str,
    starting_priority: u32,
    options: &TargetGroupOptions,
) -> Result<Vec<RoutingRule>, RoutingError> {
    let result = compile_inner(bindings, base_domain, starting_priority, options);
    match &result {
        Ok(rules) => metrics::record_rules_compiled(rules.len()),
        Err(e) => {
            tracing::warn!(error = %e, "Routing table compilation failed");
            metrics::record_error("routing");
        }
    }
    result
}

fn compile_inner(
    bindings: &[ServiceBinding],
    base_domain: &str,
    starting_priority: u32,
    options: &TargetGroupOptions,
) -> Result<Vec<RoutingRule>, RoutingError> {
    if bindings.is_empty() {
        return Err(RoutingError::EmptyBindings);
    }

    let base_domain = normalize_base_domain(base_domain)?;
    check_priority_range(starting_priority, bindings.len())?;

    let mut seen_hosts: BTreeSet<String> = BTreeSet::new();
    let mut seen_ids: HashMap<String, &str> = HashMap::new();
    let mut rules = Vec::with_capacity(bindings.len());

    for (index, binding) in bindings.iter().enumerate() {
        binding.validate_subdomain()?;
        let port = binding.checked_port()?;

        let host = binding.fully_qualified_host(&base_domain);
        if !seen_hosts.insert(host.clone()) {
            return Err(RoutingError::DuplicateSubdomain { subdomain: host });
        }

        let logical_id = binding.logical_id();
        if let Some(other) = seen_ids.insert(logical_id.clone(), binding.subdomain()) {
            return Err(RoutingError::InvalidSubdomain {
                subdomain: binding.subdomain().to_string(),
                reason: format!("logical id {logical_id} collides with {other}"),
            });
        }

        // Range already checked, cannot overflow.
        let priority = starting_priority + index as u32;
        let target_group = TargetGroupSpec {
            name: format!("{logical_id}-target-group"),
            port,
            protocol: options.protocol,
            health_check: HealthCheckSpec {
                enabled: true,
                path: options.health_check_path.clone(),
                port: options.health_check_port.resolve(port),
                protocol: options.protocol,
            },
        };

        tracing::debug!(
            host = %host,
            priority,
            port,
            target_group = %target_group.name,
            "Compiled routing rule"
        );

        rules.push(RoutingRule {
            action: ForwardAction {
                target_group: target_group.name.clone(),
            },
            logical_id,
            condition_hosts: BTreeSet::from([host.clone()]),
            fully_qualified_host: host,
            priority,
            target_group,
        });
    }

    Ok(rules)
}

/// Lowercase and validate a DNS name, dropping a trailing root dot.
pub fn normalize_base_domain(domain: &str) -> Result<String, RoutingError> {
    let invalid = || RoutingError::InvalidDomain {
        domain: domain.to_string(),
    };

    let trimmed = domain.strip_suffix('.').unwrap_or(domain);
    if trimmed.is_empty() || trimmed.split('.').any(str::is_empty) {
        return Err(invalid());
    }

    match Host::parse(trimmed) {
        Ok(Host::Domain(name)) => Ok(name),
        _ => Err(invalid()),
    }
}

fn check_priority_range(starting_priority: u32, count: usize) -> Result<(), RoutingError> {
    if starting_priority == 0 {
        return Err(RoutingError::InvalidPriority { priority: 0 });
    }
    let last = u64::from(starting_priority) + count as u64 - 1;
    if last >= u64::from(DEFAULT_RULE_PRIORITY) {
        return Err(RoutingError::InvalidPriority { priority: last });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::rule::{HealthCheckPort, Protocol};

    fn clearml_bindings() -> Vec<ServiceBinding> {
        vec![
            ServiceBinding::new("app.clearml", 8080),
            ServiceBinding::new("files.clearml", 8081),
            ServiceBinding::new("api.clearml", 8008),
        ]
    }

    #[test]
    fn test_priorities_follow_input_order() {
        let rules = compile_rules(&clearml_bindings(), "example.org", 1).unwrap();

        let summary: Vec<(&str, u32, u16)> = rules
            .iter()
            .map(|r| (r.fully_qualified_host.as_str(), r.priority, r.backend_port()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("app.clearml.example.org", 1, 8080),
                ("files.clearml.example.org", 2, 8081),
                ("api.clearml.example.org", 3, 8008),
            ]
        );
    }

    #[test]
    fn test_starting_offset() {
        let rules = compile_rules(&clearml_bindings(), "example.org", 100).unwrap();
        let priorities: Vec<u32> = rules.iter().map(|r| r.priority).collect();
        assert_eq!(priorities, vec![100, 101, 102]);
    }

    #[test]
    fn test_condition_is_singleton_host() {
        let rules = compile_rules(&clearml_bindings(), "Example.ORG", 1).unwrap();
        for rule in &rules {
            assert_eq!(rule.condition_hosts.len(), 1);
            assert!(rule.condition_hosts.contains(&rule.fully_qualified_host));
        }
        assert_eq!(rules[0].fully_qualified_host, "app.clearml.example.org");
    }

    #[test]
    fn test_target_groups_are_per_rule() {
        let rules = compile_rules(&clearml_bindings(), "example.org", 1).unwrap();
        assert_eq!(rules[0].target_group.name, "app-clearml-target-group");
        assert_eq!(rules[0].action.target_group, "app-clearml-target-group");
        assert_eq!(rules[0].action_id(), "app-clearml-listener-action");

        let names: BTreeSet<&str> = rules.iter().map(|r| r.target_group.name.as_str()).collect();
        assert_eq!(names.len(), rules.len());
    }

    #[test]
    fn test_health_check_defaults_to_traffic_port() {
        let rules = compile_rules(&clearml_bindings(), "example.org", 1).unwrap();
        let files = &rules[1].target_group;
        assert_eq!(files.health_check.port, 8081);
        assert_eq!(files.health_check.path, "/");
        assert_eq!(files.health_check.protocol, Protocol::Http);
        assert!(files.health_check.enabled);
    }

    #[test]
    fn test_fixed_health_check_port() {
        let options = TargetGroupOptions {
            health_check_port: HealthCheckPort::Fixed(8080),
            ..TargetGroupOptions::default()
        };
        let rules = compile(&clearml_bindings(), "example.org", 1, &options).unwrap();
        assert!(rules.iter().all(|r| r.target_group.health_check.port == 8080));
        assert_eq!(rules[2].target_group.port, 8008);
    }

    #[test]
    fn test_duplicate_subdomain() {
        let mut bindings = clearml_bindings();
        bindings.push(ServiceBinding::new("app.clearml", 9000));

        assert_eq!(
            compile_rules(&bindings, "example.org", 1),
            Err(RoutingError::DuplicateSubdomain {
                subdomain: "app.clearml.example.org".into()
            })
        );
    }

    #[test]
    fn test_duplicate_is_case_insensitive() {
        let bindings = vec![
            ServiceBinding::new("app.clearml", 8080),
            ServiceBinding::new("APP.ClearML", 8081),
        ];
        assert!(matches!(
            compile_rules(&bindings, "example.org", 1),
            Err(RoutingError::DuplicateSubdomain { .. })
        ));
    }

    #[test]
    fn test_same_port_allowed() {
        let bindings = vec![
            ServiceBinding::new("app", 8080),
            ServiceBinding::new("ui", 8080),
        ];
        let rules = compile_rules(&bindings, "example.org", 1).unwrap();
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_invalid_port() {
        for port in [0, 65_536, 100_000] {
            let bindings = vec![ServiceBinding::new("app", 8080), ServiceBinding::new("api", port)];
            assert_eq!(
                compile_rules(&bindings, "example.org", 1),
                Err(RoutingError::InvalidPort { port })
            );
        }
    }

    #[test]
    fn test_empty_bindings() {
        assert_eq!(
            compile_rules(&[], "example.org", 1),
            Err(RoutingError::EmptyBindings)
        );
    }

    #[test]
    fn test_priority_bounds() {
        let bindings = clearml_bindings();
        assert_eq!(
            compile_rules(&bindings, "example.org", 0),
            Err(RoutingError::InvalidPriority { priority: 0 })
        );
        assert_eq!(
            compile_rules(&bindings, "example.org", 49_998),
            Err(RoutingError::InvalidPriority { priority: 50_000 })
        );
        assert!(compile_rules(&bindings, "example.org", 49_997).is_ok());
    }

    #[test]
    fn test_logical_id_collision() {
        let bindings = vec![ServiceBinding::new("a-b.c", 1), ServiceBinding::new("a.b-c", 2)];
        assert!(matches!(
            compile_rules(&bindings, "example.org", 1),
            Err(RoutingError::InvalidSubdomain { .. })
        ));
    }

    #[test]
    fn test_base_domain_normalization() {
        assert_eq!(normalize_base_domain("Example.org.").unwrap(), "example.org");
        for bad in ["", ".", "a..b", "10.0.0.1", "bad domain.org"] {
            assert!(normalize_base_domain(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_compile_is_deterministic() {
        let bindings = clearml_bindings();
        let first = compile_rules(&bindings, "example.org", 1).unwrap();
        let second = compile_rules(&bindings, "example.org", 1).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
