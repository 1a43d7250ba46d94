//! End-to-end resolution over an in-memory cluster.

use std::net::IpAddr;
use std::sync::Arc;

use kdns_index::{
    ClusterIndex, ClusterState, IndexError, Result as IndexResult, Snapshot,
};
use kdns_objects::{
    CLUSTER_IP_NONE, EndpointAddress, EndpointSubset, Endpoints, MultiClusterEndpoints,
    Namespace, Node, Pod, Service, ServiceImport, ServicePort,
};
use kdns_resolver::{
    AnswerRecord, PodMode, QueryType, RecordKind, ResolveError, Resolver, ResolverConfig,
};
use test_case::test_case;

// ==================== Fixtures ====================

const INTERWEBS: &str = "interwebs.test.";
const CLUSTERSET: &str = "clusterset.test.";

fn ip(s: &str) -> IpAddr {
    s.parse().expect("valid IP address")
}

fn http() -> ServicePort {
    ServicePort::tcp(80).with_name("http")
}

fn slice(name: &str, service: &str, address: EndpointAddress) -> Endpoints {
    Endpoints::builder(name, service)
        .namespace("testns")
        .subset(EndpointSubset::new().address(address).port(http()))
        .build()
}

fn cluster_state() -> ClusterState {
    let state = ClusterState::new();
    state.upsert_namespace(Namespace::new("testns"));
    state.upsert_node(Node::new("test.node.foo.bar"));

    let services = [
        Service::builder("svc1")
            .namespace("testns")
            .cluster_ip("10.0.0.1")
            .port(http())
            .port(http())
            .build(),
        Service::builder("svc-dual-stack")
            .namespace("testns")
            .cluster_ip("10.0.0.2")
            .cluster_ip("10::2")
            .port(http())
            .build(),
        Service::builder("hdls1")
            .namespace("testns")
            .cluster_ip(CLUSTER_IP_NONE)
            .build(),
        Service::builder("external")
            .namespace("testns")
            .external_name("coredns.io")
            .port(http())
            .build(),
    ];
    for service in services {
        state.upsert_service(service).expect("valid service");
    }

    let endpoints = [
        slice("svc1-slice1", "svc1", EndpointAddress::new(ip("172.0.0.1")).with_hostname("ep1a")),
        slice("hdls1-slice1", "hdls1", EndpointAddress::new(ip("172.0.0.2"))),
        slice("hdls1-slice2", "hdls1", EndpointAddress::new(ip("172.0.0.2"))),
    ];
    for endpoints in endpoints {
        state.upsert_endpoints(endpoints).expect("valid endpoints");
    }

    let imports = [
        ServiceImport::builder("svc1")
            .namespace("testns")
            .cluster_ip("10.0.0.1")
            .port(http())
            .build(),
        ServiceImport::builder("svc-dual-stack")
            .namespace("testns")
            .cluster_ip("10.0.0.2")
            .cluster_ip("10::2")
            .port(http())
            .build(),
        ServiceImport::builder("hdls1").namespace("testns").headless().build(),
    ];
    for import in imports {
        state.upsert_service_import(import).expect("valid service import");
    }

    let multicluster = [
        MultiClusterEndpoints::new(
            "cluster1",
            slice("svc1-slice1", "svc1", EndpointAddress::new(ip("172.0.0.1")).with_hostname("ep1a")),
        ),
        MultiClusterEndpoints::new(
            "cluster1",
            slice("hdls1-slice1", "hdls1", EndpointAddress::new(ip("172.0.0.2"))),
        ),
    ];
    for mcep in multicluster {
        state.upsert_multicluster_endpoints(mcep).expect("valid multi-cluster endpoints");
    }

    state.mark_synced();
    state
}

fn config() -> ResolverConfig {
    ResolverConfig::new([INTERWEBS, CLUSTERSET]).with_multicluster_zones([CLUSTERSET])
}

fn resolver_over(state: ClusterState, config: ResolverConfig) -> Resolver {
    Resolver::new(Arc::new(state), config)
}

fn resolver() -> Resolver {
    resolver_over(cluster_state(), config())
}

fn zone_of(qname: &str) -> &'static str {
    if qname.contains(CLUSTERSET.trim_end_matches('.')) {
        CLUSTERSET
    } else {
        INTERWEBS
    }
}

fn answers(resolver: &Resolver, qname: &str, qtype: QueryType) -> Vec<AnswerRecord> {
    resolver.resolve(qname, qtype, zone_of(qname)).expect("resolve should succeed")
}

fn host_keys(answers: &[AnswerRecord]) -> Vec<(&str, &str)> {
    answers
        .iter()
        .map(|a| (a.host.as_str(), a.key.as_str()))
        .collect()
}

// ==================== Service Scenarios ====================

#[test_case("svc1.testns.svc.interwebs.test.", QueryType::A,
    &[("10.0.0.1", "/coredns/test/interwebs/svc/testns/svc1")] ; "cluster ip")]
#[test_case("_http._tcp.svc1.testns.svc.interwebs.test.", QueryType::Srv,
    &[("10.0.0.1", "/coredns/test/interwebs/svc/testns/svc1")] ; "cluster ip srv")]
#[test_case("ep1a.svc1.testns.svc.interwebs.test.", QueryType::A,
    &[("172.0.0.1", "/coredns/test/interwebs/svc/testns/svc1/ep1a")] ; "cluster ip endpoint")]
#[test_case("_http._tcp.svc-dual-stack.testns.svc.interwebs.test.", QueryType::Srv,
    &[("10.0.0.2", "/coredns/test/interwebs/svc/testns/svc-dual-stack"),
      ("10::2", "/coredns/test/interwebs/svc/testns/svc-dual-stack")] ; "dual stack srv")]
#[test_case("external.testns.svc.interwebs.test.", QueryType::Cname,
    &[("coredns.io", "/coredns/test/interwebs/svc/testns/external")] ; "external name")]
#[test_case("hdls1.testns.svc.interwebs.test.", QueryType::A,
    &[("172.0.0.2", "/coredns/test/interwebs/svc/testns/hdls1/172-0-0-2")] ; "headless")]
#[test_case("svc1.testns.svc.clusterset.test.", QueryType::A,
    &[("10.0.0.1", "/coredns/test/clusterset/svc/testns/svc1")] ; "cluster set ip")]
#[test_case("_http._tcp.svc1.testns.svc.clusterset.test.", QueryType::Srv,
    &[("10.0.0.1", "/coredns/test/clusterset/svc/testns/svc1")] ; "cluster set srv")]
#[test_case("ep1a.cluster1.svc1.testns.svc.clusterset.test.", QueryType::A,
    &[("172.0.0.1", "/coredns/test/clusterset/svc/testns/svc1/cluster1/ep1a")] ; "cluster set endpoint")]
#[test_case("_http._tcp.svc-dual-stack.testns.svc.clusterset.test.", QueryType::Srv,
    &[("10.0.0.2", "/coredns/test/clusterset/svc/testns/svc-dual-stack"),
      ("10::2", "/coredns/test/clusterset/svc/testns/svc-dual-stack")] ; "cluster set dual stack srv")]
#[test_case("hdls1.testns.svc.clusterset.test.", QueryType::A,
    &[("172.0.0.2", "/coredns/test/clusterset/svc/testns/hdls1/cluster1/172-0-0-2")] ; "cluster set headless")]
fn test_services(qname: &str, qtype: QueryType, expected: &[(&str, &str)]) {
    let resolver = resolver();
    let answers = answers(&resolver, qname, qtype);

    assert_eq!(host_keys(&answers), expected);
}

#[test]
fn test_srv_answers_carry_ports() {
    let resolver = resolver();

    let answers = answers(&resolver, "_http._tcp.svc1.testns.svc.interwebs.test.", QueryType::Srv);
    assert!(answers.iter().all(|a| a.kind == RecordKind::Srv && a.port == Some(80)));
}

#[test]
fn test_headless_srv_addresses_each_endpoint() {
    let resolver = resolver();
    let answers = answers(&resolver, "_http._tcp.hdls1.testns.svc.interwebs.test.", QueryType::Srv);

    assert_eq!(
        host_keys(&answers),
        vec![("172.0.0.2", "/coredns/test/interwebs/svc/testns/hdls1/172-0-0-2")]
    );
    assert_eq!(answers[0].port, Some(80));
}

#[test_case(QueryType::A, &["10.0.0.2"] ; "a")]
#[test_case(QueryType::Aaaa, &["10::2"] ; "aaaa")]
fn test_dual_stack_filters_by_family(qtype: QueryType, expected: &[&str]) {
    let resolver = resolver();
    let answers = answers(&resolver, "svc-dual-stack.testns.svc.interwebs.test.", qtype);

    let hosts: Vec<&str> = answers.iter().map(|a| a.host.as_str()).collect();
    assert_eq!(hosts, expected);
}

#[test_case(QueryType::A ; "a")]
#[test_case(QueryType::Aaaa ; "aaaa")]
#[test_case(QueryType::Cname ; "cname")]
fn test_external_name_answers_every_type_with_cname(qtype: QueryType) {
    let resolver = resolver();
    let answers = answers(&resolver, "external.testns.svc.interwebs.test.", qtype);

    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].kind, RecordKind::Cname);
    assert_eq!(answers[0].host, "coredns.io");
    assert_eq!(answers[0].key, "/coredns/test/interwebs/svc/testns/external");
}

#[test]
fn test_external_name_has_no_endpoints() {
    let resolver = resolver();
    let answers = answers(&resolver, "ep1a.external.testns.svc.interwebs.test.", QueryType::A);
    assert!(answers.is_empty());
}

// ==================== No Match ====================

#[test_case("svc1.testns.svc.interwebs.test.", QueryType::Srv ; "service level srv")]
#[test_case("_https._tcp.svc1.testns.svc.interwebs.test.", QueryType::Srv ; "unknown port")]
#[test_case("_http._udp.svc1.testns.svc.interwebs.test.", QueryType::Srv ; "wrong protocol")]
#[test_case("nope.svc1.testns.svc.interwebs.test.", QueryType::A ; "unknown endpoint")]
#[test_case("svc9.testns.svc.interwebs.test.", QueryType::A ; "unknown service")]
#[test_case("svc1.testns.svc.interwebs.test.", QueryType::Aaaa ; "no ipv6 cluster ip")]
#[test_case("hdls1.testns.svc.interwebs.test.", QueryType::Aaaa ; "no ipv6 endpoint")]
#[test_case("ep1a.cluster2.svc1.testns.svc.clusterset.test.", QueryType::A ; "other cluster")]
#[test_case("ep1a.svc1.testns.svc.clusterset.test.", QueryType::A ; "single cluster shape in cluster set")]
#[test_case("a.b.c.svc1.testns.svc.interwebs.test.", QueryType::A ; "unrecognized shape")]
fn test_no_match_is_empty(qname: &str, qtype: QueryType) {
    let resolver = resolver();
    assert!(answers(&resolver, qname, qtype).is_empty());
}

// ==================== Authority ====================

#[test_case(&["1.2.3.4"], QueryType::A, &["1.2.3.4"] ; "v4 local, A")]
#[test_case(&["1.2.3.4"], QueryType::Aaaa, &[] ; "v4 local, AAAA")]
#[test_case(&["1:2::3:4"], QueryType::A, &[] ; "v6 local, A")]
#[test_case(&["1:2::3:4"], QueryType::Aaaa, &["1:2::3:4"] ; "v6 local, AAAA")]
#[test_case(&["1.2.3.4", "1:2::3:4"], QueryType::Ns, &["1.2.3.4", "1:2::3:4"] ; "dual stack, NS")]
fn test_services_authority(locals: &[&str], qtype: QueryType, expected: &[&str]) {
    let config = ResolverConfig::new([INTERWEBS]).with_local_ips(locals.iter().map(|s| ip(s)));
    let resolver = resolver_over(cluster_state(), config);

    let answers = resolver.resolve("ns.dns.interwebs.test.", qtype, INTERWEBS).expect("resolve should succeed");

    let hosts: Vec<&str> = answers.iter().map(|a| a.host.as_str()).collect();
    assert_eq!(hosts, expected);
    assert!(answers.iter().all(|a| a.key == "/coredns/test/interwebs/dns/ns"));
}

// ==================== Multi-cluster Fan-out ====================

#[test]
fn test_multicluster_headless_fans_out_over_clusters() {
    let state = cluster_state();
    state
        .upsert_multicluster_endpoints(MultiClusterEndpoints::new(
            "cluster2",
            slice("hdls1-slice1", "hdls1", EndpointAddress::new(ip("172.1.0.2"))),
        ))
        
        .expect("valid multi-cluster endpoints");
    let resolver = resolver_over(state, config());

    let all = answers(&resolver, "hdls1.testns.svc.clusterset.test.", QueryType::A);
    assert_eq!(
        host_keys(&all),
        vec![
            ("172.0.0.2", "/coredns/test/clusterset/svc/testns/hdls1/cluster1/172-0-0-2"),
            ("172.1.0.2", "/coredns/test/clusterset/svc/testns/hdls1/cluster2/172-1-0-2"),
        ]
    );

    let one = answers(&resolver, "172-1-0-2.cluster2.hdls1.testns.svc.clusterset.test.", QueryType::A);
    assert_eq!(
        host_keys(&one),
        vec![("172.1.0.2", "/coredns/test/clusterset/svc/testns/hdls1/cluster2/172-1-0-2")]
    );
}

#[test]
fn test_same_address_in_two_clusters_keeps_distinct_keys() {
    let state = cluster_state();
    state
        .upsert_multicluster_endpoints(MultiClusterEndpoints::new(
            "cluster2",
            slice("hdls1-slice1", "hdls1", EndpointAddress::new(ip("172.0.0.2"))),
        ))
        
        .expect("valid multi-cluster endpoints");
    let resolver = resolver_over(state, config());

    let answers = answers(&resolver, "hdls1.testns.svc.clusterset.test.", QueryType::A);
    assert_eq!(answers.len(), 2);
    assert_eq!(answers[0].host, answers[1].host);
    assert_ne!(answers[0].key, answers[1].key);
}

#[test]
fn test_multicluster_srv_with_endpoint() {
    let resolver = resolver();
    let answers = answers(
        &resolver,
        "_http._tcp.ep1a.cluster1.svc1.testns.svc.clusterset.test.",
        QueryType::Srv,
    );

    assert_eq!(
        host_keys(&answers),
        vec![("172.0.0.1", "/coredns/test/clusterset/svc/testns/svc1/cluster1/ep1a")]
    );
    assert_eq!(answers[0].port, Some(80));
}

// ==================== Endpoint Names ====================

#[test]
fn test_shared_pod_name_answers_in_stored_order() {
    let state = cluster_state();
    state
        .upsert_service(Service::builder("web").namespace("testns").headless().build())
        
        .expect("valid service");
    state
        .upsert_endpoints(
            Endpoints::builder("web-slice1", "web")
                .namespace("testns")
                .subset(
                    EndpointSubset::new()
                        .address(EndpointAddress::new(ip("10.1.0.2")).with_pod_name("web-0"))
                        .address(EndpointAddress::new(ip("10.1.0.1")).with_pod_name("web-0")),
                )
                .build(),
        )
        
        .expect("valid endpoints");
    let resolver = resolver_over(state, config().with_endpoint_pod_names(true));

    let answers = answers(&resolver, "web-0.web.testns.svc.interwebs.test.", QueryType::A);

    let hosts: Vec<&str> = answers.iter().map(|a| a.host.as_str()).collect();
    assert_eq!(hosts, vec!["10.1.0.2", "10.1.0.1"]);
    assert!(answers.iter().all(|a| a.key == "/coredns/test/interwebs/svc/testns/web/web-0"));
}

#[test]
fn test_endpoint_label_is_case_insensitive() {
    let resolver = resolver();
    let answers = answers(&resolver, "EP1A.svc1.testns.svc.interwebs.test.", QueryType::A);

    assert_eq!(
        host_keys(&answers),
        vec![("172.0.0.1", "/coredns/test/interwebs/svc/testns/svc1/ep1a")]
    );
}

// ==================== Pods ====================

#[test]
fn test_verified_pod_records() {
    let state = cluster_state();
    state.upsert_pod(Pod::new("hello-abcde", "testns", ip("10.240.0.1"))).expect("valid pod");
    let resolver = resolver_over(state, config().with_pod_mode(PodMode::Verified));

    let found = answers(&resolver, "10-240-0-1.testns.pod.interwebs.test.", QueryType::A);
    assert_eq!(
        host_keys(&found),
        vec![("10.240.0.1", "/coredns/test/interwebs/pod/testns/10-240-0-1")]
    );

    let missing = answers(&resolver, "10-240-0-9.testns.pod.interwebs.test.", QueryType::A);
    assert!(missing.is_empty());
}

#[test]
fn test_pods_disabled_by_default() {
    let resolver = resolver();
    assert!(answers(&resolver, "10-240-0-1.testns.pod.interwebs.test.", QueryType::A).is_empty());
}

// ==================== Determinism ====================

#[test]
fn test_resolve_is_idempotent() {
    let resolver = resolver();
    let queries = [
        ("svc1.testns.svc.interwebs.test.", QueryType::A),
        ("_http._tcp.svc-dual-stack.testns.svc.interwebs.test.", QueryType::Srv),
        ("hdls1.testns.svc.clusterset.test.", QueryType::A),
        ("external.testns.svc.interwebs.test.", QueryType::Aaaa),
    ];

    for (qname, qtype) in queries {
        let first = answers(&resolver, qname, qtype);
        let second = answers(&resolver, qname, qtype);
        assert_eq!(first, second, "{qname} {qtype}");
    }
}

#[test]
fn test_concurrent_resolution_during_updates() {
    let state = Arc::new(cluster_state());
    let resolver = Resolver::new(Arc::clone(&state) as Arc<dyn ClusterIndex>, config());

    std::thread::scope(|scope| {
        scope.spawn(|| {
            for i in 0..50u8 {
                let address = EndpointAddress::new(IpAddr::from([172, 0, 1, i]));
                state.upsert_endpoints(slice("hdls1-slice2", "hdls1", address)).expect("valid endpoints");
            }
        });

        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..50 {
                    let answers = answers(&resolver, "hdls1.testns.svc.interwebs.test.", QueryType::A);
                    assert!(answers.len() == 1 || answers.len() == 2);
                    assert_eq!(answers[0].host, "172.0.0.2");
                }
            });
        }
    });
}

// ==================== Snapshots ====================

#[test]
fn test_resolve_from_snapshot_file() {
    use std::io::Write;

    let snapshot = cluster_state().snapshot();
    let mut file = tempfile::NamedTempFile::new().expect("failed to create temp file");
    file.write_all(snapshot.to_json().expect("snapshot should serialize").as_bytes()).expect("snapshot should serialize");

    let loaded = Snapshot::from_file(file.path()).expect("snapshot should load");
    let state = ClusterState::from_snapshot(loaded).expect("valid snapshot");
    let resolver = resolver_over(state, config());

    let answers = answers(&resolver, "ep1a.cluster1.svc1.testns.svc.clusterset.test.", QueryType::A);
    assert_eq!(
        host_keys(&answers),
        vec![("172.0.0.1", "/coredns/test/clusterset/svc/testns/svc1/cluster1/ep1a")]
    );
}

// ==================== Dependency Failures ====================

/// An index whose backing store is gone.
struct UnavailableIndex;

impl UnavailableIndex {
    fn fail<T>() -> IndexResult<T> {
        Err(IndexError::Unavailable("watch connection lost".to_string()))
    }
}

impl ClusterIndex for UnavailableIndex {
    fn has_synced(&self) -> bool {
        true
    }

    fn services_by_namespace_name(&self, _: &str, _: &str) -> IndexResult<Vec<Service>> {
        Self::fail()
    }

    fn endpoints_by_index(&self, _: &str, _: &str) -> IndexResult<Vec<Endpoints>> {
        Self::fail()
    }

    fn service_imports_by_namespace_name(&self, _: &str, _: &str) -> IndexResult<Vec<ServiceImport>> {
        Self::fail()
    }

    fn multicluster_endpoints_by_index(
        &self,
        _: &str,
        _: &str,
    ) -> IndexResult<Vec<MultiClusterEndpoints>> {
        Self::fail()
    }

    fn services_by_ip(&self, _: IpAddr) -> IndexResult<Vec<Service>> {
        Self::fail()
    }

    fn endpoints_by_ip(&self, _: IpAddr) -> IndexResult<Vec<Endpoints>> {
        Self::fail()
    }

    fn pods_by_ip(&self, _: IpAddr) -> IndexResult<Vec<Pod>> {
        Self::fail()
    }

    fn namespace_by_name(&self, name: &str) -> IndexResult<Option<Namespace>> {
        Ok(Some(Namespace::new(name)))
    }

    fn node_by_name(&self, _: &str) -> IndexResult<Option<Node>> {
        Self::fail()
    }
}

#[test]
fn test_index_failure_is_server_failure() {
    let resolver = Resolver::new(Arc::new(UnavailableIndex), config());

    let result = resolver.resolve("svc1.testns.svc.interwebs.test.", QueryType::A, INTERWEBS);

    let err = result.expect_err("lookup should fail");
    assert!(matches!(err, ResolveError::Dependency(IndexError::Unavailable(_))));
    assert!(err.is_server_failure());
}

#[test]
fn test_local_records_need_no_index_reads() {
    let config = config().with_local_ips([ip("1.2.3.4")]);
    let resolver = Resolver::new(Arc::new(UnavailableIndex), config);

    let answers = resolver.resolve("ns.dns.interwebs.test.", QueryType::A, INTERWEBS).expect("resolve should succeed");
    assert_eq!(answers.len(), 1);
}

#[test]
fn test_unsynced_index_is_server_failure() {
    let resolver = resolver_over(ClusterState::new(), config());

    let err = resolver
        .resolve("svc1.testns.svc.interwebs.test.", QueryType::A, INTERWEBS)
        .expect_err("resolve should fail");
    assert!(matches!(err, ResolveError::Dependency(IndexError::NotSynced)));
}

#[test_case("ns.dns.interwebs.test.", QueryType::A, "1.2.3.4" ; "authority")]
#[test_case("interwebs.test.", QueryType::Ns, "1.2.3.4" ; "apex ns")]
#[test_case("dns-version.interwebs.test.", QueryType::Txt, "" ; "dns version")]
fn test_local_records_answer_before_sync(qname: &str, qtype: QueryType, host: &str) {
    let resolver = resolver_over(
        ClusterState::new(),
        config().with_local_ips([ip("1.2.3.4")]),
    );

    let answers = resolver
        .resolve(qname, qtype, INTERWEBS)
        .expect("local records should not wait for sync");
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].host, host);
}
