//! Behavioural checks for the routing compiler and template renderer.

use std::collections::{BTreeMap, BTreeSet};

use deploy_plan::routing::{ListenerSpec, Resolution, RoutingTable};
use deploy_plan::template::{Template, TemplateContext};
use deploy_plan::{compile_rules, render, RenderError, RoutingError, ServiceBinding};

mod common;

#[test]
fn test_clearml_scenario() {
    let rules = compile_rules(&common::clearml_bindings(), "example.org", 1).unwrap();

    let hosts: Vec<(&str, u32)> = rules
        .iter()
        .map(|r| (r.fully_qualified_host.as_str(), r.priority))
        .collect();
    assert_eq!(
        hosts,
        vec![
            ("app.clearml.example.org", 1),
            ("files.clearml.example.org", 2),
            ("api.clearml.example.org", 3),
        ]
    );
}

#[test]
fn test_clearml_duplicate_scenario() {
    let mut bindings = common::clearml_bindings();
    bindings.insert(1, ServiceBinding::new("app.clearml", 8080));

    assert_eq!(
        compile_rules(&bindings, "example.org", 1),
        Err(RoutingError::DuplicateSubdomain {
            subdomain: "app.clearml.example.org".into()
        })
    );
}

#[test]
fn test_priorities_gapless_for_many_bindings() {
    let bindings: Vec<ServiceBinding> = (0..50)
        .map(|i| ServiceBinding::new(format!("svc{i}"), 9000 + i))
        .collect();

    for start in [1, 7, 1000] {
        let rules = compile_rules(&bindings, "example.org", start).unwrap();
        assert_eq!(rules.len(), bindings.len());
        for (i, rule) in rules.iter().enumerate() {
            assert_eq!(rule.priority, start + i as u32);
            assert_eq!(u32::from(rule.backend_port()), bindings[i].port());
        }
    }
}

#[test]
fn test_host_sets_pairwise_disjoint() {
    let rules = compile_rules(&common::clearml_bindings(), "example.org", 1).unwrap();
    let mut all = BTreeSet::new();
    for rule in &rules {
        for host in &rule.condition_hosts {
            assert!(all.insert(host.clone()), "{host} routed twice");
        }
    }
}

#[test]
fn test_order_changes_priorities_not_hosts() {
    let mut reversed = common::clearml_bindings();
    reversed.reverse();

    let forward = compile_rules(&common::clearml_bindings(), "example.org", 1).unwrap();
    let backward = compile_rules(&reversed, "example.org", 1).unwrap();

    assert_eq!(backward[0].fully_qualified_host, "api.clearml.example.org");
    assert_eq!(backward[0].priority, 1);
    let hosts = |rules: &[deploy_plan::RoutingRule]| -> BTreeSet<String> {
        rules.iter().map(|r| r.fully_qualified_host.clone()).collect()
    };
    assert_eq!(hosts(&forward), hosts(&backward));
}

#[test]
fn test_compile_failure_attaches_nothing() {
    let mut bindings = common::clearml_bindings();
    bindings.push(ServiceBinding::new("metrics", 0));
    assert_eq!(
        compile_rules(&bindings, "example.org", 1),
        Err(RoutingError::InvalidPort { port: 0 })
    );
}

#[test]
fn test_resolve_against_listener() {
    let rules = compile_rules(&common::clearml_bindings(), "example.org", 1).unwrap();
    let table = RoutingTable::attach(ListenerSpec::https(443), rules).unwrap();

    match table.resolve("api.clearml.example.org") {
        Resolution::Forward(rule) => assert_eq!(rule.target_group.name, "api-clearml-target-group"),
        Resolution::Default(_) => panic!("api host should be forwarded"),
    }
    match table.resolve("www.example.org") {
        Resolution::Default(response) => assert_eq!(response.status_code, 404),
        Resolution::Forward(rule) => panic!("unexpected rule {}", rule.logical_id),
    }
}

#[test]
fn test_render_leaves_no_placeholders() {
    let template = Template::parse(common::TEMPLATE).unwrap();
    let values: BTreeMap<String, String> = template
        .placeholders()
        .into_iter()
        .map(|name| (name.to_string(), format!("value-of-{name}")))
        .collect();
    let context = TemplateContext::new(values);

    let script = render(common::TEMPLATE, &context).unwrap();
    assert!(!script.as_str().contains("{{"));
    assert!(script.as_str().contains("$HOSTNAME"));
    assert_eq!(render(common::TEMPLATE, &context).unwrap(), script);
}

#[test]
fn test_render_names_missing_key() {
    let mut values = BTreeMap::new();
    for name in Template::parse(common::TEMPLATE).unwrap().placeholders() {
        values.insert(name.to_string(), "x".to_string());
    }
    values.remove("CFN_WAIT_HANDLE");

    assert_eq!(
        render(common::TEMPLATE, &TemplateContext::new(values)),
        Err(RenderError::MissingParameter {
            name: "CFN_WAIT_HANDLE".into()
        })
    );
}
